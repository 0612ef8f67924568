pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use error::{PlannerError, Result};
pub use models::{DailyDietPlan, Dish, HealthProfile};
pub use planner::{DietPlanGenerator, PlanRequest};
