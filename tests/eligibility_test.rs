use health_diet_planner_rs::models::{
    Disease, Dish, DishType, ExcludedFoodEntry, ExcludedType, ExclusionCatalog, HealthProfile,
    Nutrition, Severity,
};
use health_diet_planner_rs::planner::{
    DailyNutrientTracker, ExclusionTier, FilterContext, Stage, filter_dish,
};

fn make_dish(
    title: &str,
    dish_type: DishType,
    ingredients: &[&str],
    sodium: f64,
    fat: f64,
) -> Dish {
    Dish::new(
        title,
        dish_type,
        ingredients,
        Nutrition {
            calories: 120.0,
            protein: 8.0,
            carbs: 10.0,
            fat,
            sodium,
            potassium: 150.0,
            phosphorus: 80.0,
            ..Default::default()
        },
    )
}

fn pool() -> Vec<Dish> {
    vec![
        make_dish("시금치나물", DishType::Side, &["시금치", "참기름"], 250.0, 3.0),
        make_dish("멸치볶음", DishType::Side, &["멸치", "간장"], 450.0, 4.0),
        make_dish("계란말이", DishType::Side, &["달걀", "대파"], 350.0, 10.0),
        make_dish("새우튀김", DishType::Side, &["새우", "튀김가루"], 400.0, 18.0),
        make_dish("고등어구이", DishType::Side, &["고등어"], 400.0, 12.0),
        make_dish("된장국", DishType::Soup, &["된장", "두부"], 650.0, 3.0),
        make_dish("짬뽕국", DishType::Soup, &["홍합", "고춧가루"], 2100.0, 8.0),
        make_dish("현미밥", DishType::Rice, &["현미"], 5.0, 2.0),
    ]
}

fn profile(diseases: Vec<Disease>, allergies: &[&str]) -> HealthProfile {
    HealthProfile {
        diseases,
        allergies: allergies.iter().map(|a| a.to_string()).collect(),
        age: 52,
        daily_calorie_goal: 1900.0,
        ..Default::default()
    }
}

fn passing_titles(profile: &HealthProfile, catalog: &ExclusionCatalog) -> Vec<String> {
    let tracker = DailyNutrientTracker::new(&profile.diseases);
    let ctx = FilterContext::new(profile, catalog, &tracker);
    pool()
        .iter()
        .filter(|d| filter_dish(d, &ctx).passed)
        .map(|d| d.title.clone())
        .collect()
}

#[test]
fn test_hypertension_rejects_oversalted_soup_outright() {
    let p = profile(vec![Disease::Hypertension], &[]);
    let catalog = ExclusionCatalog::default();
    let tracker = DailyNutrientTracker::new(&p.diseases);
    let ctx = FilterContext::new(&p, &catalog, &tracker);

    let soup = make_dish("짬뽕국", DishType::Soup, &["홍합"], 2100.0, 8.0);
    let result = filter_dish(&soup, &ctx);

    assert!(!result.passed);
    assert_eq!(result.exclusion_tier, Some(ExclusionTier::Absolute));
    assert_ne!(result.rejected_by, Some(Stage::DailyBudget));
}

#[test]
fn test_adding_conditions_never_widens_the_pool() {
    let catalog = ExclusionCatalog::new(vec![ExcludedFoodEntry {
        disease: Disease::Gout,
        excluded_food_name: "멸치".to_string(),
        excluded_type: ExcludedType::Ingredient,
        severity: Severity::Severe,
        exclusion_type: None,
    }]);

    let steps = [
        profile(vec![], &[]),
        profile(vec![Disease::Hypertension], &[]),
        profile(vec![Disease::Hypertension, Disease::Gout], &[]),
        profile(vec![Disease::Hypertension, Disease::Gout], &["egg"]),
        profile(
            vec![Disease::Hypertension, Disease::Gout, Disease::GastrointestinalDisorder],
            &["egg"],
        ),
    ];

    let mut previous = passing_titles(&steps[0], &catalog);
    assert_eq!(previous.len(), pool().len());

    for p in &steps[1..] {
        let current = passing_titles(p, &catalog);
        for title in &current {
            assert!(previous.contains(title), "{} appeared after adding a restriction", title);
        }
        previous = current;
    }

    assert!(!previous.contains(&"멸치볶음".to_string()));
    assert!(!previous.contains(&"계란말이".to_string()));
    assert!(!previous.contains(&"새우튀김".to_string()));
    assert!(previous.contains(&"시금치나물".to_string()));
}

#[test]
fn test_warnings_do_not_change_the_verdict() {
    let p = profile(vec![Disease::Hypertension], &[]);
    let catalog = ExclusionCatalog::default();
    let tracker = DailyNutrientTracker::new(&p.diseases);
    let ctx = FilterContext::new(&p, &catalog, &tracker);

    let salty = make_dish("멸치볶음", DishType::Side, &["멸치"], 550.0, 4.0);
    let result = filter_dish(&salty, &ctx);
    assert!(result.passed);
    assert!(!result.warnings.is_empty());
    assert!(result.reasons.is_empty());
}

#[test]
fn test_filtering_leaves_tracker_untouched() {
    let p = profile(vec![Disease::KidneyDisease], &[]);
    let catalog = ExclusionCatalog::default();
    let tracker = DailyNutrientTracker::new(&p.diseases);
    let ctx = FilterContext::new(&p, &catalog, &tracker);

    for dish in pool() {
        filter_dish(&dish, &ctx);
    }
    assert!(tracker.committed().is_empty());
}
