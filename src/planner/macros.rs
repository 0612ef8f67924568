use serde::Serialize;

use crate::models::{Disease, DishType, HealthProfile, MealType};
use crate::planner::constants::*;

/// Target with an acceptable band, in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroRange {
    pub target: f64,
    pub min: f64,
    pub max: f64,
}

impl MacroRange {
    fn around(target: f64) -> Self {
        Self {
            target,
            min: target * (1.0 - MACRO_RANGE_TOLERANCE),
            max: target * (1.0 + MACRO_RANGE_TOLERANCE),
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            target: self.target * factor,
            min: self.min * factor,
            max: self.max * factor,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Calorie and macro targets for a day, meal or slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroGoals {
    pub calories: f64,
    pub protein: MacroRange,
    pub carbs: MacroRange,
    pub fat: MacroRange,
}

impl MacroGoals {
    /// Daily goals from the calorie goal and a disease-aware macro split.
    pub fn daily(profile: &HealthProfile) -> Self {
        let calories = profile.daily_calorie_goal;
        let (carbs_share, protein_share, fat_share) = macro_split(profile);
        Self {
            calories,
            protein: MacroRange::around(calories * protein_share / KCAL_PER_G_PROTEIN),
            carbs: MacroRange::around(calories * carbs_share / KCAL_PER_G_CARBS),
            fat: MacroRange::around(calories * fat_share / KCAL_PER_G_FAT),
        }
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein.scale(factor),
            carbs: self.carbs.scale(factor),
            fat: self.fat.scale(factor),
        }
    }

    /// This meal's share of the day.
    pub fn for_meal(&self, meal: MealType, ratios: &MealRatios) -> Self {
        self.scale(ratios.share(meal))
    }

    /// One slot's share of a meal. Each side slot gets a third of the sides.
    pub fn for_slot(&self, slot: DishType) -> Self {
        self.scale(slot_ratio(slot))
    }
}

/// Macro split (carbs, protein, fat) for a profile.
///
/// Kidney disease wins over everything (protein restriction), then
/// diabetes, then lipid disorders, then pregnancy.
pub fn macro_split(profile: &HealthProfile) -> (f64, f64, f64) {
    if profile.has(&Disease::KidneyDisease) {
        KIDNEY_MACRO_SPLIT
    } else if profile.has(&Disease::Diabetes) {
        DIABETES_MACRO_SPLIT
    } else if profile.has_any(&[Disease::Hyperlipidemia, Disease::CardiovascularDisease]) {
        LIPID_MACRO_SPLIT
    } else if profile.is_pregnant() {
        PREGNANCY_MACRO_SPLIT
    } else {
        DEFAULT_MACRO_SPLIT
    }
}

/// Share of a meal's calories for one slot.
pub fn slot_ratio(slot: DishType) -> f64 {
    match slot {
        DishType::Rice => RICE_RATIO,
        DishType::Side => SIDES_RATIO / SIDE_SLOTS as f64,
        DishType::Soup => SOUP_RATIO,
        DishType::Snack => 1.0,
    }
}

/// Share of daily calories per meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealRatios {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
    pub snack: f64,
}

impl MealRatios {
    pub const ADULT: MealRatios = MealRatios {
        breakfast: 0.25,
        lunch: 0.35,
        dinner: 0.30,
        snack: 0.10,
    };

    /// Growth-weighted: a bigger breakfast and a smaller snack.
    pub const MINOR: MealRatios = MealRatios {
        breakfast: 0.30,
        lunch: 0.35,
        dinner: 0.30,
        snack: 0.05,
    };

    pub fn for_profile(profile: &HealthProfile) -> Self {
        if profile.is_minor() {
            Self::MINOR
        } else {
            Self::ADULT
        }
    }

    pub fn share(&self, meal: MealType) -> f64 {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
            MealType::Snack => self.snack,
        }
    }

    pub fn total(&self) -> f64 {
        self.breakfast + self.lunch + self.dinner + self.snack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(age: u32, diseases: Vec<Disease>) -> HealthProfile {
        HealthProfile {
            diseases,
            age,
            daily_calorie_goal: 2000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_meal_ratios_sum_to_one() {
        assert!((MealRatios::ADULT.total() - 1.0).abs() < 1e-9);
        assert!((MealRatios::MINOR.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_slot_ratios_cover_meal() {
        let total = slot_ratio(DishType::Rice)
            + slot_ratio(DishType::Side) * SIDE_SLOTS as f64
            + slot_ratio(DishType::Soup);
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_daily_default_split() {
        let goals = MacroGoals::daily(&profile(30, vec![]));
        assert!((goals.carbs.target - 275.0).abs() < 1e-9);
        assert!((goals.protein.target - 100.0).abs() < 1e-9);
        assert!((goals.fat.target - 2000.0 * 0.25 / 9.0).abs() < 1e-9);
        assert!(goals.protein.contains(95.0));
        assert!(!goals.protein.contains(120.0));
    }

    #[test]
    fn test_kidney_restricts_protein() {
        let normal = MacroGoals::daily(&profile(50, vec![]));
        let kidney =
            MacroGoals::daily(&profile(50, vec![Disease::KidneyDisease, Disease::Diabetes]));
        assert!(kidney.protein.target < normal.protein.target);
    }

    #[test]
    fn test_meal_and_slot_scaling() {
        let p = profile(30, vec![]);
        let daily = MacroGoals::daily(&p);
        let lunch = daily.for_meal(MealType::Lunch, &MealRatios::for_profile(&p));
        assert!((lunch.calories - 700.0).abs() < 1e-9);

        let rice = lunch.for_slot(DishType::Rice);
        let side = lunch.for_slot(DishType::Side);
        assert!((rice.calories - 245.0).abs() < 1e-9);
        assert!((side.calories - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_minor_gets_growth_ratios() {
        assert_eq!(MealRatios::for_profile(&profile(10, vec![])), MealRatios::MINOR);
        assert_eq!(MealRatios::for_profile(&profile(40, vec![])), MealRatios::ADULT);
    }
}
