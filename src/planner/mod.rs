pub mod classifier;
pub mod composer;
pub mod constants;
pub mod eligibility;
pub mod generator;
pub mod macros;
pub mod scoring;
pub mod seasonal;
pub mod tracker;
pub mod variety;

pub use classifier::{DishClass, classify, estimate_purine, estimate_sugar};
pub use composer::{ComposeContext, DayUsage, choose_snack, compose_meal};
pub use eligibility::{
    ExclusionTier, FilterContext, FilterResult, PIPELINE, Stage, StageOutcome, filter_dish,
    run_stage,
};
pub use generator::{DietPlanGenerator, PlanRequest, PlannerOptions};
pub use macros::{MacroGoals, MacroRange, MealRatios, macro_split, slot_ratio};
pub use scoring::{pick_best, score_dish};
pub use seasonal::{fruits_in_season, seasonal_fruit};
pub use tracker::{AddCheck, DailyNutrientTracker, TrackedNutrient, daily_limits};
pub use variety::WeeklyVarietyContext;
