use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{DailyDietPlan, DishType, MealType};

/// Titles already served this week, per category.
///
/// The planner only reads this. The caller records a plan into it once the
/// plan is actually committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyVarietyContext {
    #[serde(default)]
    pub rice: BTreeSet<String>,
    #[serde(default)]
    pub side: BTreeSet<String>,
    #[serde(default)]
    pub soup: BTreeSet<String>,
    #[serde(default)]
    pub snack: BTreeSet<String>,
}

impl WeeklyVarietyContext {
    pub fn titles(&self, category: DishType) -> &BTreeSet<String> {
        match category {
            DishType::Rice => &self.rice,
            DishType::Side => &self.side,
            DishType::Soup => &self.soup,
            DishType::Snack => &self.snack,
        }
    }

    fn titles_mut(&mut self, category: DishType) -> &mut BTreeSet<String> {
        match category {
            DishType::Rice => &mut self.rice,
            DishType::Side => &mut self.side,
            DishType::Soup => &mut self.soup,
            DishType::Snack => &mut self.snack,
        }
    }

    /// Whether `title` was already used this week in `category`.
    pub fn is_excluded(&self, category: DishType, title: &str) -> bool {
        self.titles(category).contains(title.trim())
    }

    pub fn record(&mut self, category: DishType, title: &str) {
        self.titles_mut(category).insert(title.trim().to_string());
    }

    /// Record every dish of a committed plan under its slot category.
    pub fn record_plan(&mut self, plan: &DailyDietPlan) {
        for (meal, planned) in plan.all_dishes() {
            let category = if meal == MealType::Snack {
                DishType::Snack
            } else {
                planned.dish.dish_type
            };
            self.record(category, &planned.dish.title);
        }
    }

    /// Start a new week.
    pub fn clear(&mut self) {
        self.rice.clear();
        self.side.clear();
        self.soup.clear();
        self.snack.clear();
    }

    pub fn len(&self) -> usize {
        self.rice.len() + self.side.len() + self.soup.len() + self.snack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_exclude_per_category() {
        let mut ctx = WeeklyVarietyContext::default();
        ctx.record(DishType::Side, " 멸치볶음 ");
        assert!(ctx.is_excluded(DishType::Side, "멸치볶음"));
        assert!(!ctx.is_excluded(DishType::Soup, "멸치볶음"));
        assert_eq!(ctx.len(), 1);

        ctx.clear();
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let ctx: WeeklyVarietyContext = serde_json::from_str(r#"{"snack": ["사과"]}"#).unwrap();
        assert!(ctx.is_excluded(DishType::Snack, "사과"));
        assert!(ctx.rice.is_empty());
    }
}
