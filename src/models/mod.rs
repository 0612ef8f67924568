mod dish;
mod exclusion;
mod plan;
mod profile;

pub use dish::{Dish, DishType, Nutrition};
pub use exclusion::{ExcludedFoodEntry, ExcludedType, ExclusionCatalog, ExclusionType, Severity};
pub use plan::{
    DailyDietPlan, DietWarning, MealComposition, MealType, PlannedDish, WarningKind,
    WarningSeverity,
};
pub use profile::{Disease, HealthProfile, MINOR_AGE_LIMIT};
