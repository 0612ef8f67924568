use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::models::{DailyDietPlan, Dish, ExcludedFoodEntry, ExclusionCatalog, HealthProfile};
use crate::planner::WeeklyVarietyContext;

/// Load candidate dishes from a JSON file.
///
/// Deduplicates by lowercase title (last occurrence wins). The surviving
/// record keeps the position of the first occurrence so file order, and
/// therefore tie-breaking, stays stable.
pub fn load_dishes<P: AsRef<Path>>(path: P) -> Result<Vec<Dish>> {
    let content = fs::read_to_string(path)?;
    let dishes: Vec<Dish> = serde_json::from_str(&content)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<Dish> = Vec::with_capacity(dishes.len());
    for dish in dishes {
        match index.get(&dish.key()) {
            Some(&i) => deduped[i] = dish,
            None => {
                index.insert(dish.key(), deduped.len());
                deduped.push(dish);
            }
        }
    }

    tracing::debug!(count = deduped.len(), "dishes loaded");
    Ok(deduped)
}

/// Load a health profile from a JSON file. The profile is validated.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<HealthProfile> {
    let content = fs::read_to_string(path)?;
    let profile: HealthProfile = serde_json::from_str(&content)?;
    profile.validate()?;
    Ok(profile)
}

/// Save a health profile as pretty JSON.
pub fn save_profile<P: AsRef<Path>>(path: P, profile: &HealthProfile) -> Result<()> {
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the disease → excluded-food catalog from CSV.
///
/// Expected header:
/// `disease,excluded_food_name,excluded_type,severity,exclusion_type`.
/// An empty `exclusion_type` falls back to the severity rule.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ExclusionCatalog> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let entries = rdr
        .deserialize::<ExcludedFoodEntry>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    tracing::debug!(entries = entries.len(), "exclusion catalog loaded");
    Ok(ExclusionCatalog::new(entries))
}

/// Load the weekly variety context. A missing file means a fresh week.
pub fn load_weekly<P: AsRef<Path>>(path: P) -> Result<WeeklyVarietyContext> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("No weekly context at {:?}, starting a fresh week", path);
        return Ok(WeeklyVarietyContext::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_weekly<P: AsRef<Path>>(path: P, weekly: &WeeklyVarietyContext) -> Result<()> {
    let json = serde_json::to_string_pretty(weekly)?;
    fs::write(path, json)?;
    Ok(())
}

/// Save a plan as pretty JSON.
pub fn save_plan<P: AsRef<Path>>(path: P, plan: &DailyDietPlan) -> Result<()> {
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(path, json)?;
    Ok(())
}

/// Write one CSV row per planned dish.
pub fn write_plan_csv<P: AsRef<Path>>(path: P, plan: &DailyDietPlan) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "date", "meal", "slot", "title", "calories", "protein", "carbs", "fat", "sodium", "score",
        "warnings",
    ])?;

    for (meal, planned) in plan.all_dishes() {
        let n = &planned.dish.nutrition;
        let warnings: Vec<&str> = planned.warnings.iter().map(|w| w.message.as_str()).collect();
        wtr.write_record([
            plan.date.to_string(),
            meal.label().to_string(),
            planned.dish.dish_type.label().to_string(),
            planned.dish.title.clone(),
            format!("{:.1}", n.calories),
            format!("{:.1}", n.protein),
            format!("{:.1}", n.carbs),
            format!("{:.1}", n.fat),
            format!("{:.0}", n.sodium),
            format!("{:.2}", planned.score),
            warnings.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Disease, DishType, ExclusionType, MealComposition, Nutrition, PlannedDish, Severity,
    };
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_dish_deduplication_keeps_order() {
        let json = r#"[
            {"title": "흰쌀밥", "dish_type": "rice", "nutrition": {"calories": 300}, "rating": 3.0},
            {"title": "미역국", "dish_type": "soup", "nutrition": {"calories": 80}, "rating": 4.0},
            {"title": "흰쌀밥", "dish_type": "rice", "nutrition": {"calories": 310}, "rating": 5.0}
        ]"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let dishes = load_dishes(file.path()).unwrap();
        assert_eq!(dishes.len(), 2);
        assert_eq!(dishes[0].title, "흰쌀밥");
        // Last occurrence wins
        assert_eq!(dishes[0].rating, 5.0);
        assert_eq!(dishes[1].dish_type, DishType::Soup);
    }

    #[test]
    fn test_load_catalog_csv() {
        let csv = "disease,excluded_food_name,excluded_type,severity,exclusion_type\n\
                   gout,멸치,ingredient,severe,\n\
                   당뇨,사탕,recipe_keyword,mild,absolute\n\
                   hypertension,간장,ingredient,moderate,\n";

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        let entries = catalog.entries();
        assert_eq!(entries[0].disease, Disease::Gout);
        assert_eq!(entries[0].severity, Severity::Severe);
        assert!(entries[0].is_absolute());
        assert_eq!(entries[1].disease, Disease::Diabetes);
        assert_eq!(entries[1].exclusion_type, Some(ExclusionType::Absolute));
        assert!(!entries[2].is_absolute());
    }

    #[test]
    fn test_weekly_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weekly.json");
        assert!(load_weekly(&path).unwrap().is_empty());

        let mut weekly = WeeklyVarietyContext::default();
        weekly.record(DishType::Side, "멸치볶음");
        save_weekly(&path, &weekly).unwrap();
        assert_eq!(load_weekly(&path).unwrap(), weekly);
    }

    #[test]
    fn test_profile_validated_on_load() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"age": 40, "daily_calorie_goal": -1}"#).unwrap();
        assert!(load_profile(file.path()).is_err());
    }

    #[test]
    fn test_plan_csv_has_row_per_dish() {
        let rice = PlannedDish {
            dish: Dish::new(
                "현미밥",
                DishType::Rice,
                &["현미"],
                Nutrition {
                    calories: 300.0,
                    ..Default::default()
                },
            ),
            score: 42.0,
            warnings: Vec::new(),
        };
        let mut lunch = MealComposition {
            rice: Some(rice),
            ..Default::default()
        };
        lunch.refresh_totals();
        let plan = DailyDietPlan::new(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            MealComposition::default(),
            lunch,
            MealComposition::default(),
            None,
        );

        let dir = tempdir().unwrap();
        let path = dir.path().join("plan.csv");
        write_plan_csv(&path, &plan).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("2025-03-10,"));
        assert!(lines[1].contains("현미밥"));

        let json_path = dir.path().join("plan.json");
        save_plan(&json_path, &plan).unwrap();
        let reloaded: DailyDietPlan =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(reloaded, plan);
    }
}
