use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{PlannerError, Result};
use crate::models::{DietWarning, Disease, Dish, WarningKind, WarningSeverity};
use crate::planner::classifier::{estimate_purine, estimate_sugar};
use crate::planner::constants::*;

/// Nutrients with a disease-derived daily cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedNutrient {
    Sugar,
    Sodium,
    Fat,
    Potassium,
    Phosphorus,
    Purine,
}

impl TrackedNutrient {
    pub fn label(self) -> &'static str {
        match self {
            TrackedNutrient::Sugar => "sugar",
            TrackedNutrient::Sodium => "sodium",
            TrackedNutrient::Fat => "fat",
            TrackedNutrient::Potassium => "potassium",
            TrackedNutrient::Phosphorus => "phosphorus",
            TrackedNutrient::Purine => "purine",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            TrackedNutrient::Sugar | TrackedNutrient::Fat => "g",
            _ => "mg",
        }
    }

    fn warning_kind(self) -> WarningKind {
        match self {
            TrackedNutrient::Sugar => WarningKind::Sugar,
            TrackedNutrient::Sodium => WarningKind::Sodium,
            TrackedNutrient::Fat => WarningKind::Fat,
            TrackedNutrient::Potassium => WarningKind::Potassium,
            TrackedNutrient::Phosphorus => WarningKind::Phosphorus,
            TrackedNutrient::Purine => WarningKind::Purine,
        }
    }

    /// This dish's contribution, estimating where the recipe is silent.
    pub fn amount_in(self, dish: &Dish) -> f64 {
        match self {
            TrackedNutrient::Sugar => estimate_sugar(dish),
            TrackedNutrient::Sodium => dish.nutrition.sodium,
            TrackedNutrient::Fat => dish.nutrition.fat,
            TrackedNutrient::Potassium => dish.nutrition.potassium,
            TrackedNutrient::Phosphorus => dish.nutrition.phosphorus,
            TrackedNutrient::Purine => estimate_purine(dish),
        }
    }
}

impl fmt::Display for TrackedNutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Daily caps implied by a disease list. Overlapping caps keep the minimum.
pub fn daily_limits(diseases: &[Disease]) -> BTreeMap<TrackedNutrient, f64> {
    let mut limits: BTreeMap<TrackedNutrient, f64> = BTreeMap::new();
    let mut cap = |nutrient: TrackedNutrient, value: f64| {
        limits
            .entry(nutrient)
            .and_modify(|v| *v = v.min(value))
            .or_insert(value);
    };

    let has_cardio = diseases.contains(&Disease::CardiovascularDisease);

    for disease in diseases {
        match disease {
            Disease::Diabetes => cap(TrackedNutrient::Sugar, DIABETES_SUGAR_CAP_G),
            Disease::Hypertension => {
                let sodium = if has_cardio {
                    HYPERTENSION_CARDIO_SODIUM_CAP_MG
                } else {
                    HYPERTENSION_SODIUM_CAP_MG
                };
                cap(TrackedNutrient::Sodium, sodium);
            }
            Disease::CardiovascularDisease => {
                cap(TrackedNutrient::Sodium, CARDIO_SODIUM_CAP_MG);
                cap(TrackedNutrient::Fat, CARDIO_FAT_CAP_G);
            }
            Disease::Hyperlipidemia => cap(TrackedNutrient::Fat, HYPERLIPIDEMIA_FAT_CAP_G),
            Disease::KidneyDisease => {
                cap(TrackedNutrient::Potassium, KIDNEY_POTASSIUM_CAP_MG);
                cap(TrackedNutrient::Phosphorus, KIDNEY_PHOSPHORUS_CAP_MG);
                cap(TrackedNutrient::Sodium, KIDNEY_SODIUM_CAP_MG);
            }
            Disease::Gout => cap(TrackedNutrient::Purine, GOUT_PURINE_CAP_MG),
            Disease::GastrointestinalDisorder | Disease::Other(_) => {}
        }
    }

    limits
}

/// Outcome of a budget query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddCheck {
    pub can_add: bool,
    pub warnings: Vec<DietWarning>,
    pub reasons: Vec<String>,
}

/// Running per-day totals of capped nutrients for one user.
///
/// Created empty at the start of a day's generation and dropped (or
/// `reset`) at the day boundary. Only `add_recipe` mutates, and it refuses
/// any dish that would push a total past its cap.
#[derive(Debug, Clone)]
pub struct DailyNutrientTracker {
    limits: BTreeMap<TrackedNutrient, f64>,
    cumulative: BTreeMap<TrackedNutrient, f64>,
    committed: Vec<String>,
    warning_ratio: f64,
}

impl DailyNutrientTracker {
    pub fn new(diseases: &[Disease]) -> Self {
        Self::with_warning_ratio(diseases, BUDGET_WARNING_RATIO)
    }

    /// `warning_ratio` is the remaining share of a cap below which a
    /// budget warning is emitted.
    pub fn with_warning_ratio(diseases: &[Disease], warning_ratio: f64) -> Self {
        let limits = daily_limits(diseases);
        let cumulative = limits.keys().map(|n| (*n, 0.0)).collect();
        Self {
            limits,
            cumulative,
            committed: Vec::new(),
            warning_ratio,
        }
    }

    pub fn limits(&self) -> &BTreeMap<TrackedNutrient, f64> {
        &self.limits
    }

    pub fn limit(&self, nutrient: TrackedNutrient) -> Option<f64> {
        self.limits.get(&nutrient).copied()
    }

    pub fn cumulative(&self, nutrient: TrackedNutrient) -> f64 {
        self.cumulative.get(&nutrient).copied().unwrap_or(0.0)
    }

    pub fn remaining(&self, nutrient: TrackedNutrient) -> Option<f64> {
        self.limit(nutrient)
            .map(|limit| (limit - self.cumulative(nutrient)).max(0.0))
    }

    /// Titles committed today, in order.
    pub fn committed(&self) -> &[String] {
        &self.committed
    }

    /// Whether the dish fits every remaining budget. Never mutates.
    pub fn can_add_recipe(&self, dish: &Dish) -> AddCheck {
        let mut check = AddCheck {
            can_add: true,
            ..Default::default()
        };

        for (&nutrient, &limit) in &self.limits {
            let current = self.cumulative(nutrient);
            let amount = nutrient.amount_in(dish);
            let projected = current + amount;
            let unit = nutrient.unit();

            if projected > limit {
                check.can_add = false;
                check.reasons.push(format!(
                    "daily {} limit {:.0}{} would be exceeded: {:.1}{} + {:.1}{} = {:.1}{}",
                    nutrient, limit, unit, current, unit, amount, unit, projected, unit
                ));
                continue;
            }

            let remaining = limit - projected;
            if remaining < limit * self.warning_ratio {
                let severity = if remaining <= 0.0 {
                    WarningSeverity::High
                } else {
                    WarningSeverity::Moderate
                };
                check.warnings.push(
                    DietWarning::new(
                        nutrient.warning_kind(),
                        severity,
                        format!(
                            "{} budget nearly used: {:.1}{} left of {:.0}{} today",
                            nutrient, remaining, unit, limit, unit
                        ),
                    )
                    .with_amount(remaining),
                );
            }
        }

        check
    }

    /// Commit a dish to today's totals.
    ///
    /// Re-checks the budget; a dish that does not fit is refused and the
    /// totals are left untouched.
    pub fn add_recipe(&mut self, dish: &Dish) -> Result<()> {
        let check = self.can_add_recipe(dish);
        if !check.can_add {
            return Err(PlannerError::BudgetExceeded(check.reasons.join("; ")));
        }

        for (nutrient, total) in self.cumulative.iter_mut() {
            *total += nutrient.amount_in(dish);
        }
        self.committed.push(dish.title.clone());

        tracing::debug!(dish = %dish.title, "committed to daily budget");
        Ok(())
    }

    /// Clear totals for a new day. Limits are kept.
    pub fn reset(&mut self) {
        for total in self.cumulative.values_mut() {
            *total = 0.0;
        }
        self.committed.clear();
    }
}
