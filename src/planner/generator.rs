//! Top-level day planning.

use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::models::{
    DailyDietPlan, Dish, ExcludedFoodEntry, ExclusionCatalog, HealthProfile, MealType,
};
use crate::planner::composer::{ComposeContext, DayUsage, choose_snack, compose_meal};
use crate::planner::constants::{BUDGET_WARNING_RATIO, SNACK_MAX_ATTEMPTS, SODIUM_CEILING_MG};
use crate::planner::macros::{MacroGoals, MealRatios};
use crate::planner::tracker::DailyNutrientTracker;
use crate::planner::variety::WeeklyVarietyContext;

/// Tunable knobs of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Seasonal fruit draws before a weekly repeat is accepted.
    pub snack_max_attempts: usize,
    /// Per-dish sodium ceiling for low-sodium diseases, in mg.
    pub sodium_ceiling_mg: f64,
    /// Remaining share of a daily cap below which a budget warning is attached.
    pub budget_warning_ratio: f64,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            snack_max_attempts: SNACK_MAX_ATTEMPTS,
            sodium_ceiling_mg: SODIUM_CEILING_MG,
            budget_warning_ratio: BUDGET_WARNING_RATIO,
        }
    }
}

impl PlannerOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.sodium_ceiling_mg.is_finite() || self.sodium_ceiling_mg <= 0.0 {
            return Err(PlannerError::Config(format!(
                "sodium_ceiling_mg must be positive, got {}",
                self.sodium_ceiling_mg
            )));
        }
        if !(0.0..=1.0).contains(&self.budget_warning_ratio) {
            return Err(PlannerError::Config(format!(
                "budget_warning_ratio must be within 0..=1, got {}",
                self.budget_warning_ratio
            )));
        }
        Ok(())
    }
}

/// Everything needed to plan one day for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub profile: HealthProfile,
    pub candidates: Vec<Dish>,
    #[serde(default)]
    pub excluded_foods: Vec<ExcludedFoodEntry>,
    #[serde(default)]
    pub weekly: WeeklyVarietyContext,
    /// Titles served recently, excluded in every category.
    #[serde(default)]
    pub recently_used: Vec<String>,
    #[serde(default)]
    pub preferred_rice_type: Option<String>,
    #[serde(default)]
    pub premium_features: Vec<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub snack_seed: u64,
}

impl PlanRequest {
    pub fn new(profile: HealthProfile, candidates: Vec<Dish>, date: NaiveDate) -> Self {
        Self {
            profile,
            candidates,
            excluded_foods: Vec::new(),
            weekly: WeeklyVarietyContext::default(),
            recently_used: Vec::new(),
            preferred_rice_type: None,
            premium_features: Vec::new(),
            date,
            snack_seed: 0,
        }
    }

    /// Reject malformed profiles and dishes before any planning happens.
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        for dish in &self.candidates {
            dish.validate().map_err(|reason| PlannerError::MalformedDish {
                title: dish.title.clone(),
                reason,
            })?;
        }
        Ok(())
    }
}

/// Builds a [`DailyDietPlan`] from a [`PlanRequest`].
///
/// Each call owns a fresh [`DailyNutrientTracker`], so separate calls never
/// share budget state.
#[derive(Debug, Clone, Default)]
pub struct DietPlanGenerator {
    options: PlannerOptions,
}

impl DietPlanGenerator {
    pub fn new(options: PlannerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Plan breakfast, lunch and dinner, then the snack.
    ///
    /// Returns [`PlannerError::NoEligibleCandidates`] when every slot of every
    /// meal came back empty.
    pub fn generate(&self, request: &PlanRequest) -> Result<DailyDietPlan> {
        self.options.validate()?;
        request.validate()?;

        let profile = &request.profile;
        let catalog = ExclusionCatalog::new(request.excluded_foods.clone());
        let mut tracker = DailyNutrientTracker::with_warning_ratio(
            &profile.diseases,
            self.options.budget_warning_ratio,
        );

        let ctx = ComposeContext {
            profile,
            catalog: &catalog,
            candidates: &request.candidates,
            weekly: &request.weekly,
            recently_used: &request.recently_used,
            preferred_rice_type: request.preferred_rice_type.as_deref(),
            premium_features: &request.premium_features,
            sodium_ceiling_mg: self.options.sodium_ceiling_mg,
        };

        tracing::info!(
            date = %request.date,
            candidates = request.candidates.len(),
            diseases = profile.diseases.len(),
            "generating daily plan"
        );

        let daily = MacroGoals::daily(profile);
        let ratios = MealRatios::for_profile(profile);
        let mut day = DayUsage::default();

        let mut meals = Vec::with_capacity(MealType::COMPOSED.len());
        for meal in MealType::COMPOSED {
            let goals = daily.for_meal(meal, &ratios);
            meals.push(compose_meal(meal, &goals, &ctx, &mut tracker, &mut day)?);
        }

        if meals.iter().all(|m| m.is_empty()) {
            tracing::warn!(date = %request.date, "every meal slot came back empty");
            return Err(PlannerError::NoEligibleCandidates);
        }

        let mut rng = StdRng::seed_from_u64(request.snack_seed);
        let snack = choose_snack(
            daily.calories * ratios.snack,
            request.date.month(),
            &ctx,
            &mut tracker,
            &mut rng,
            self.options.snack_max_attempts,
        )?;

        let mut meals = meals.into_iter();
        let (Some(breakfast), Some(lunch), Some(dinner)) =
            (meals.next(), meals.next(), meals.next())
        else {
            return Err(PlannerError::InvalidInput("meal composition incomplete".to_string()));
        };

        let plan = DailyDietPlan::new(request.date, breakfast, lunch, dinner, snack);
        tracing::info!(
            date = %plan.date,
            calories = plan.total_nutrition.calories,
            dishes = plan.all_dishes().count(),
            "daily plan ready"
        );
        Ok(plan)
    }
}
