use crate::models::{
    DailyDietPlan, Dish, DishType, HealthProfile, MealComposition, MealType, PlannedDish,
};
use crate::planner::{ExclusionTier, FilterResult, MacroGoals, MealRatios};

fn print_dish(slot: &str, planned: &PlannedDish, width: usize) {
    let n = &planned.dish.nutrition;
    println!(
        "  {:<6} {:<width$} - {:>4.0} kcal | P {:>4.1} C {:>5.1} F {:>4.1} Na {:>5.0} | score {:.1}",
        slot,
        planned.dish.title,
        n.calories,
        n.protein,
        n.carbs,
        n.fat,
        n.sodium,
        planned.score,
        width = width
    );
    for warning in &planned.warnings {
        println!("         ! {}", warning.message);
    }
}

fn print_meal(meal: MealType, composition: &MealComposition, width: usize) {
    println!("--- {} ---", meal.label());
    if composition.is_empty() {
        println!("  (nothing suitable)");
        return;
    }
    for planned in composition.dishes() {
        print_dish(planned.dish.dish_type.label(), planned, width);
    }
    println!(
        "  total: {:.0} kcal, sodium {:.0} mg",
        composition.total_nutrition.calories, composition.total_nutrition.sodium
    );
}

/// Display a daily plan meal by meal.
pub fn display_plan(plan: &DailyDietPlan) {
    println!();
    println!("=== Diet Plan for {} ===", plan.date);
    println!();

    let width = plan
        .all_dishes()
        .map(|(_, p)| p.dish.title.chars().count())
        .max()
        .unwrap_or(10);

    for meal in MealType::COMPOSED {
        if let Some(composition) = plan.meal(meal) {
            print_meal(meal, composition, width);
        }
    }

    println!("--- {} ---", MealType::Snack.label());
    match &plan.snack {
        Some(snack) => print_dish("fruit", snack, width),
        None => println!("  (none)"),
    }

    let t = &plan.total_nutrition;
    println!();
    println!("--- Summary ---");
    println!("Total calories: {:.0}", t.calories);
    println!(
        "Protein {:.1}g | Carbs {:.1}g | Fat {:.1}g | Sodium {:.0}mg",
        t.protein, t.carbs, t.fat, t.sodium
    );
    println!();
}

/// Display daily, per-meal and per-slot calorie and macro targets.
pub fn display_targets(profile: &HealthProfile) {
    let daily = MacroGoals::daily(profile);
    let ratios = MealRatios::for_profile(profile);

    let row = |label: &str, goals: &MacroGoals| {
        println!(
            "  {:<10} {:>6.0} kcal | P {:>5.1} ({:.0}-{:.0}) | C {:>5.1} ({:.0}-{:.0}) | F {:>5.1} ({:.0}-{:.0})",
            label,
            goals.calories,
            goals.protein.target,
            goals.protein.min,
            goals.protein.max,
            goals.carbs.target,
            goals.carbs.min,
            goals.carbs.max,
            goals.fat.target,
            goals.fat.min,
            goals.fat.max,
        );
    };

    println!();
    println!("=== Targets ===");
    row("daily", &daily);
    for meal in MealType::COMPOSED {
        let goals = daily.for_meal(meal, &ratios);
        row(meal.label(), &goals);
        for slot in [DishType::Rice, DishType::Side, DishType::Soup] {
            row(&format!("  {}", slot.label()), &goals.for_slot(slot));
        }
    }
    row(MealType::Snack.label(), &daily.for_meal(MealType::Snack, &ratios));
    println!();
}

/// Display the eligibility verdict for each dish.
pub fn display_eligibility(results: &[(&Dish, FilterResult)]) {
    if results.is_empty() {
        println!("No dishes to check.");
        return;
    }

    let passed = results.iter().filter(|(_, r)| r.passed).count();
    println!();
    println!("=== Eligibility ({} of {} pass) ===", passed, results.len());
    println!();

    for (dish, result) in results {
        let verdict = match (result.passed, result.exclusion_tier) {
            (true, _) => "ok",
            (false, Some(ExclusionTier::Absolute)) => "unsafe",
            (false, Some(ExclusionTier::Moderate)) => "restricted",
            (false, Some(ExclusionTier::Limit)) => "over budget",
            (false, None) => "skipped",
        };
        println!("  [{:<11}] {} ({})", verdict, dish.title, dish.dish_type);
        for reason in &result.reasons {
            println!("      - {}", reason);
        }
        for warning in &result.warnings {
            println!("      ! {}", warning.message);
        }
    }
    println!();
}
