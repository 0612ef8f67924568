//! Keyword-based dish classification and nutrient estimation.
//!
//! This is the single place that decides whether a dish counts as sugary,
//! and the single place that estimates sugar and purine when a recipe does
//! not state them.

use serde::Serialize;

use crate::models::{Dish, DishType};
use crate::planner::constants::*;

/// Sugar class of a dish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DishClass {
    HighSugar,
    ModerateSugar,
    LowSugar,
    Vegetable,
}

impl DishClass {
    pub fn label(self) -> &'static str {
        match self {
            DishClass::HighSugar => "high_sugar",
            DishClass::ModerateSugar => "moderate_sugar",
            DishClass::LowSugar => "low_sugar",
            DishClass::Vegetable => "vegetable",
        }
    }
}

/// Sugar in grams: stated value, or a share of carbs chosen by keyword.
pub fn estimate_sugar(dish: &Dish) -> f64 {
    if let Some(sugar) = dish.nutrition.sugar {
        return sugar;
    }
    let ratio = if dish.first_mention(KeywordTable::HighSugar.keywords()).is_some() {
        SUGAR_RATIO_HIGH_KEYWORD
    } else if dish.first_mention(KeywordTable::ModerateSugar.keywords()).is_some() {
        SUGAR_RATIO_MODERATE_KEYWORD
    } else if dish.dish_type == DishType::Rice {
        SUGAR_RATIO_RICE
    } else {
        SUGAR_RATIO_DEFAULT
    };
    dish.nutrition.carbs * ratio
}

/// Purine in milligrams: stated value, or a tier estimate by keyword.
pub fn estimate_purine(dish: &Dish) -> f64 {
    if let Some(purine) = dish.nutrition.purine {
        return purine;
    }
    if dish.first_mention(KeywordTable::HighPurine.keywords()).is_some() {
        PURINE_HIGH_MG
    } else if dish.first_mention(KeywordTable::ModeratePurine.keywords()).is_some() {
        PURINE_MODERATE_MG
    } else {
        PURINE_LOW_MG
    }
}

/// Classify a dish by sugar content.
///
/// A high-sugar keyword wins regardless of the numbers. Otherwise the
/// estimated sugar decides, and low-sugar dishes with a vegetable keyword
/// are tagged `Vegetable`.
pub fn classify(dish: &Dish) -> DishClass {
    let sugar = estimate_sugar(dish);

    if dish.first_mention(KeywordTable::HighSugar.keywords()).is_some() || sugar >= HIGH_SUGAR_G {
        DishClass::HighSugar
    } else if dish.first_mention(KeywordTable::ModerateSugar.keywords()).is_some()
        || sugar >= MODERATE_SUGAR_G
    {
        DishClass::ModerateSugar
    } else if dish.first_mention(KeywordTable::Vegetable.keywords()).is_some() {
        DishClass::Vegetable
    } else {
        DishClass::LowSugar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Nutrition;

    fn dish(title: &str, dish_type: DishType, ingredients: &[&str], carbs: f64) -> Dish {
        Dish::new(
            title,
            dish_type,
            ingredients,
            Nutrition {
                calories: carbs * 4.0,
                carbs,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_stated_sugar_wins() {
        let mut d = dish("고구마맛탕", DishType::Side, &["고구마", "물엿"], 60.0);
        d.nutrition.sugar = Some(3.0);
        assert_eq!(estimate_sugar(&d), 3.0);
    }

    #[test]
    fn test_sugar_estimate_by_keyword() {
        let sweet = dish("고구마맛탕", DishType::Side, &["고구마", "물엿"], 50.0);
        assert!((estimate_sugar(&sweet) - 20.0).abs() < 1e-9);

        let rice = dish("흰쌀밥", DishType::Rice, &["쌀"], 65.0);
        assert!((estimate_sugar(&rice) - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_classify() {
        let sweet = dish("약과", DishType::Snack, &["밀가루", "꿀"], 30.0);
        assert_eq!(classify(&sweet), DishClass::HighSugar);

        let bulgogi = dish("소불고기", DishType::Side, &["소고기", "간장"], 10.0);
        assert_eq!(classify(&bulgogi), DishClass::ModerateSugar);

        let namul = dish("시금치나물", DishType::Side, &["시금치"], 4.0);
        assert_eq!(classify(&namul), DishClass::Vegetable);

        let rice = dish("흰쌀밥", DishType::Rice, &["쌀"], 65.0);
        assert_eq!(classify(&rice), DishClass::LowSugar);
    }

    #[test]
    fn test_numeric_threshold_without_keywords() {
        let mut d = dish("과일화채", DishType::Side, &["수박"], 10.0);
        d.nutrition.sugar = Some(16.0);
        assert_eq!(classify(&d), DishClass::HighSugar);
        d.nutrition.sugar = Some(6.0);
        assert_eq!(classify(&d), DishClass::ModerateSugar);
    }

    #[test]
    fn test_purine_tiers() {
        let anchovy = dish("멸치볶음", DishType::Side, &["멸치"], 5.0);
        assert_eq!(estimate_purine(&anchovy), PURINE_HIGH_MG);

        let pork = dish("제육볶음", DishType::Side, &["돼지고기"], 10.0);
        assert_eq!(estimate_purine(&pork), PURINE_MODERATE_MG);

        let namul = dish("콩나물무침", DishType::Side, &["콩나물"], 3.0);
        assert_eq!(estimate_purine(&namul), PURINE_LOW_MG);
    }
}
