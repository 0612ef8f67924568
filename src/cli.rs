use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Health diet planner: daily Korean meal plans that respect medical
/// restrictions, nutrient budgets and weekly variety.
#[derive(Parser, Debug)]
#[command(name = "health_diet_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the health profile JSON file.
    #[arg(short, long, default_value = "profile.json")]
    pub profile: PathBuf,

    /// Path to the candidate dishes JSON file.
    #[arg(short, long, default_value = "dishes.json")]
    pub dishes: PathBuf,

    /// Path to the disease exclusion catalog CSV file.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a daily plan.
    Plan {
        /// Date to plan for (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Weekly variety file. Missing means a fresh week.
        #[arg(short, long, default_value = "weekly.json")]
        weekly: PathBuf,

        /// Titles served recently, excluded from every slot.
        #[arg(long, value_delimiter = ',')]
        recent: Vec<String>,

        /// Preferred rice, e.g. "현미".
        #[arg(long)]
        rice: Option<String>,

        /// Premium features to enable, e.g. "vegan".
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,

        /// Seed for the snack pick.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Write the plan as JSON.
        #[arg(long)]
        save: Option<PathBuf>,

        /// Write the plan as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Record the plan into the weekly variety file without asking.
        #[arg(long)]
        record: bool,
    },

    /// Show the eligibility verdict for every dish.
    Check {
        /// Premium features to enable, e.g. "vegan".
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
    },

    /// Show calorie and macro targets for the profile.
    Targets,

    /// Build a profile interactively and save it.
    Profile,
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan {
            date: None,
            weekly: PathBuf::from("weekly.json"),
            recent: Vec::new(),
            rice: None,
            features: Vec::new(),
            seed: 0,
            save: None,
            csv: None,
            record: false,
        }
    }
}
