use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Dish, Nutrition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Meals built from rice/side/soup slots, in serving order.
    pub const COMPOSED: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    Sugar,
    Sodium,
    Fat,
    Potassium,
    Phosphorus,
    Purine,
    /// A moderate catalog entry matched; eat in small portions.
    QuantityControl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Moderate,
    High,
}

/// Informational note attached to an accepted dish. Never affects selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietWarning {
    pub kind: WarningKind,
    pub severity: WarningSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl DietWarning {
    pub fn new(kind: WarningKind, severity: WarningSeverity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// A dish chosen for a slot, with its score and display warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedDish {
    pub dish: Dish,
    pub score: f64,
    #[serde(default)]
    pub warnings: Vec<DietWarning>,
}

/// One meal built from rice, up to three sides and a soup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MealComposition {
    pub rice: Option<PlannedDish>,
    pub sides: Vec<PlannedDish>,
    pub soup: Option<PlannedDish>,
    pub total_nutrition: Nutrition,
    pub composition_summary: Vec<String>,
}

impl MealComposition {
    /// Dishes in serving order: rice, sides, soup.
    pub fn dishes(&self) -> impl Iterator<Item = &PlannedDish> {
        self.rice
            .iter()
            .chain(self.sides.iter())
            .chain(self.soup.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.dishes().next().is_none()
    }

    /// Recompute totals and summary from the chosen dishes.
    pub fn refresh_totals(&mut self) {
        self.total_nutrition = self.dishes().map(|p| &p.dish.nutrition).sum();
        self.composition_summary = self.dishes().map(|p| p.dish.title.clone()).collect();
    }
}

/// A full day of meals for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyDietPlan {
    pub date: NaiveDate,
    pub breakfast: MealComposition,
    pub lunch: MealComposition,
    pub dinner: MealComposition,
    pub snack: Option<PlannedDish>,
    pub total_nutrition: Nutrition,
}

impl DailyDietPlan {
    pub fn new(
        date: NaiveDate,
        breakfast: MealComposition,
        lunch: MealComposition,
        dinner: MealComposition,
        snack: Option<PlannedDish>,
    ) -> Self {
        let total_nutrition = [
            &breakfast.total_nutrition,
            &lunch.total_nutrition,
            &dinner.total_nutrition,
        ]
        .into_iter()
        .chain(snack.iter().map(|s| &s.dish.nutrition))
        .sum();
        Self {
            date,
            breakfast,
            lunch,
            dinner,
            snack,
            total_nutrition,
        }
    }

    pub fn meal(&self, meal_type: MealType) -> Option<&MealComposition> {
        match meal_type {
            MealType::Breakfast => Some(&self.breakfast),
            MealType::Lunch => Some(&self.lunch),
            MealType::Dinner => Some(&self.dinner),
            MealType::Snack => None,
        }
    }

    /// Every planned dish, meals first then the snack.
    pub fn all_dishes(&self) -> impl Iterator<Item = (MealType, &PlannedDish)> {
        MealType::COMPOSED
            .into_iter()
            .flat_map(move |m| {
                self.meal(m)
                    .into_iter()
                    .flat_map(move |meal| meal.dishes().map(move |d| (m, d)))
            })
            .chain(self.snack.iter().map(|s| (MealType::Snack, s)))
    }
}
