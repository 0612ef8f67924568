use clap::Parser;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use health_diet_planner_rs::cli::{Cli, Command};
use health_diet_planner_rs::config::Config;
use health_diet_planner_rs::error::Result;
use health_diet_planner_rs::interface::{
    collect_profile, display_eligibility, display_plan, display_targets, prompt_yes_no,
};
use health_diet_planner_rs::logging;
use health_diet_planner_rs::models::ExclusionCatalog;
use health_diet_planner_rs::planner::{
    DailyNutrientTracker, DietPlanGenerator, FilterContext, PlanRequest, filter_dish,
};
use health_diet_planner_rs::state::{
    load_catalog, load_dishes, load_profile, load_weekly, save_plan, save_profile, save_weekly,
    write_plan_csv,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    logging::init_with_level(cli.log_level.as_deref().unwrap_or(&config.logging.level));
    if let Some(path) = &cli.config {
        tracing::info!("Loaded config from {:?}", path);
    }

    let command = cli.command.unwrap_or_default();

    match command {
        Command::Plan {
            date,
            weekly,
            recent,
            rice,
            features,
            seed,
            save,
            csv,
            record,
        } => cmd_plan(
            &cli.profile,
            &cli.dishes,
            cli.catalog.as_deref(),
            &config,
            PlanArgs {
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                weekly,
                recent,
                rice,
                features,
                seed,
                save,
                csv,
                record,
            },
        ),
        Command::Check { features } => {
            cmd_check(&cli.profile, &cli.dishes, cli.catalog.as_deref(), &config, &features)
        }
        Command::Targets => cmd_targets(&cli.profile),
        Command::Profile => cmd_profile(&cli.profile),
    }
}

struct PlanArgs {
    date: NaiveDate,
    weekly: PathBuf,
    recent: Vec<String>,
    rice: Option<String>,
    features: Vec<String>,
    seed: u64,
    save: Option<PathBuf>,
    csv: Option<PathBuf>,
    record: bool,
}

fn load_catalog_or_empty(path: Option<&Path>) -> Result<ExclusionCatalog> {
    match path {
        Some(path) => load_catalog(path),
        None => Ok(ExclusionCatalog::default()),
    }
}

/// Generate, show and optionally store a daily plan.
fn cmd_plan(
    profile_path: &Path,
    dishes_path: &Path,
    catalog_path: Option<&Path>,
    config: &Config,
    args: PlanArgs,
) -> Result<()> {
    if !profile_path.exists() {
        eprintln!("Profile file not found: {}", profile_path.display());
        eprintln!("Run the 'profile' command to create one.");
        return Ok(());
    }
    if !dishes_path.exists() {
        eprintln!("Dishes file not found: {}", dishes_path.display());
        return Ok(());
    }

    let profile = load_profile(profile_path)?;
    let dishes = load_dishes(dishes_path)?;
    let catalog = load_catalog_or_empty(catalog_path)?;
    let mut weekly = load_weekly(&args.weekly)?;

    println!("Loaded {} dishes", dishes.len());

    let request = PlanRequest {
        profile,
        candidates: dishes,
        excluded_foods: catalog.entries().to_vec(),
        weekly: weekly.clone(),
        recently_used: args.recent,
        preferred_rice_type: args.rice,
        premium_features: args.features,
        date: args.date,
        snack_seed: args.seed,
    };

    let generator = DietPlanGenerator::new(config.options());
    let plan = generator.generate(&request)?;

    display_plan(&plan);

    if let Some(path) = &args.save {
        save_plan(path, &plan)?;
        println!("Plan saved to {}", path.display());
    }
    if let Some(path) = &args.csv {
        write_plan_csv(path, &plan)?;
        println!("Plan exported to {}", path.display());
    }

    let record =
        args.record || prompt_yes_no("Record this plan into the weekly variety file?", true)?;
    if record {
        weekly.record_plan(&plan);
        save_weekly(&args.weekly, &weekly)?;
        println!("Weekly variety saved.");
    }

    Ok(())
}

/// Run the eligibility pipeline over every dish against an empty day.
fn cmd_check(
    profile_path: &Path,
    dishes_path: &Path,
    catalog_path: Option<&Path>,
    config: &Config,
    features: &[String],
) -> Result<()> {
    let profile = load_profile(profile_path)?;
    let dishes = load_dishes(dishes_path)?;
    let catalog = load_catalog_or_empty(catalog_path)?;
    let options = config.options();

    let tracker =
        DailyNutrientTracker::with_warning_ratio(&profile.diseases, options.budget_warning_ratio);
    let ctx = FilterContext::new(&profile, &catalog, &tracker)
        .with_premium_features(features)
        .with_sodium_ceiling(options.sodium_ceiling_mg);

    let results: Vec<_> = dishes.iter().map(|d| (d, filter_dish(d, &ctx))).collect();
    display_eligibility(&results);
    Ok(())
}

/// Print macro targets.
fn cmd_targets(profile_path: &Path) -> Result<()> {
    if !profile_path.exists() {
        eprintln!("Profile file not found: {}", profile_path.display());
        return Ok(());
    }
    let profile = load_profile(profile_path)?;
    display_targets(&profile);
    Ok(())
}

/// Build a profile interactively.
fn cmd_profile(profile_path: &Path) -> Result<()> {
    if profile_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("{} exists. Overwrite?", profile_path.display()),
            false,
        )?;
        if !overwrite {
            return Ok(());
        }
    }

    let profile = collect_profile()?;
    save_profile(profile_path, &profile)?;
    println!("Profile saved to {}", profile_path.display());
    Ok(())
}
