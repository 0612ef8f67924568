//! Slot-by-slot meal composition and snack selection.

use std::collections::BTreeSet;

use rand::Rng;

use crate::error::Result;
use crate::models::{
    DietWarning, Dish, DishType, ExclusionCatalog, HealthProfile, MealComposition, MealType,
    PlannedDish,
};
use crate::planner::constants::SIDE_SLOTS;
use crate::planner::eligibility::{FilterContext, filter_dish};
use crate::planner::macros::MacroGoals;
use crate::planner::scoring::{pick_best, score_dish};
use crate::planner::seasonal::seasonal_fruit;
use crate::planner::tracker::DailyNutrientTracker;
use crate::planner::variety::WeeklyVarietyContext;

/// Slot order inside one meal.
const MEAL_SLOTS: [DishType; 2 + SIDE_SLOTS] = [
    DishType::Rice,
    DishType::Side,
    DishType::Side,
    DishType::Side,
    DishType::Soup,
];

/// Read-only inputs shared by every slot of a day.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub profile: &'a HealthProfile,
    pub catalog: &'a ExclusionCatalog,
    pub candidates: &'a [Dish],
    pub weekly: &'a WeeklyVarietyContext,
    pub recently_used: &'a [String],
    pub preferred_rice_type: Option<&'a str>,
    pub premium_features: &'a [String],
    pub sodium_ceiling_mg: f64,
}

impl<'a> ComposeContext<'a> {
    fn filter_context<'t>(&self, tracker: &'t DailyNutrientTracker) -> FilterContext<'t>
    where
        'a: 't,
    {
        FilterContext::new(self.profile, self.catalog, tracker)
            .with_premium_features(self.premium_features)
            .with_sodium_ceiling(self.sodium_ceiling_mg)
    }

    fn is_recent(&self, title: &str) -> bool {
        let title = title.trim();
        self.recently_used.iter().any(|t| t.trim() == title)
    }
}

/// Titles already placed today. Sides and soups do not repeat within a day.
#[derive(Debug, Clone, Default)]
pub struct DayUsage {
    titles: BTreeSet<String>,
}

impl DayUsage {
    fn blocks(&self, slot: DishType, title: &str) -> bool {
        slot != DishType::Rice && self.titles.contains(title.trim())
    }

    fn record(&mut self, title: &str) {
        self.titles.insert(title.trim().to_string());
    }
}

/// Candidates for a slot that survive the pre-filters and the pipeline,
/// with the warnings the pipeline attached.
fn eligible_for_slot<'c>(
    slot: DishType,
    ctx: &ComposeContext<'c>,
    tracker: &DailyNutrientTracker,
    in_meal: &BTreeSet<String>,
    day: &DayUsage,
) -> Vec<(&'c Dish, Vec<DietWarning>)> {
    let filter_ctx = ctx.filter_context(tracker);

    let survivors: Vec<(&Dish, Vec<DietWarning>)> = ctx
        .candidates
        .iter()
        .filter(|d| d.dish_type == slot)
        .filter(|d| !in_meal.contains(d.title.trim()))
        .filter(|d| !ctx.weekly.is_excluded(slot, &d.title))
        .filter(|d| !ctx.is_recent(&d.title))
        .filter(|d| !day.blocks(slot, &d.title))
        .filter_map(|d| {
            let result = filter_dish(d, &filter_ctx);
            result.passed.then_some((d, result.warnings))
        })
        .collect();

    match (slot, ctx.preferred_rice_type) {
        (DishType::Rice, Some(preferred)) if !preferred.trim().is_empty() => {
            let preferred = preferred.trim().to_lowercase();
            let matching: Vec<_> = survivors
                .iter()
                .filter(|(d, _)| d.title.to_lowercase().contains(&preferred))
                .cloned()
                .collect();
            if matching.is_empty() {
                survivors
            } else {
                matching
            }
        }
        _ => survivors,
    }
}

/// Compose one meal from rice, three sides and a soup.
///
/// Each pick is committed to `tracker` before the next slot is filtered, so
/// later slots see the budget earlier slots used. Slots with no survivor are
/// left empty.
pub fn compose_meal(
    meal: MealType,
    meal_goals: &MacroGoals,
    ctx: &ComposeContext<'_>,
    tracker: &mut DailyNutrientTracker,
    day: &mut DayUsage,
) -> Result<MealComposition> {
    let mut composition = MealComposition::default();
    let mut in_meal = BTreeSet::new();

    for slot in MEAL_SLOTS {
        let slot_goals = meal_goals.for_slot(slot);
        let eligible = eligible_for_slot(slot, ctx, tracker, &in_meal, day);

        let scored: Vec<((&Dish, Vec<DietWarning>), f64)> = eligible
            .into_iter()
            .map(|(dish, warnings)| {
                let score = score_dish(dish, ctx.profile, slot_goals.calories, Some(&slot_goals));
                ((dish, warnings), score)
            })
            .collect();

        let Some(best) = pick_best(&scored) else {
            tracing::warn!(meal = %meal, slot = %slot, "no eligible candidate, leaving slot empty");
            continue;
        };
        let ((dish, warnings), score) = scored[best].clone();

        tracker.add_recipe(dish)?;
        in_meal.insert(dish.title.trim().to_string());
        day.record(&dish.title);

        tracing::info!(
            meal = %meal,
            slot = %slot,
            dish = %dish.title,
            score,
            "slot filled"
        );

        let planned = PlannedDish {
            dish: dish.clone(),
            score,
            warnings,
        };
        match slot {
            DishType::Rice => composition.rice = Some(planned),
            DishType::Side => composition.sides.push(planned),
            DishType::Soup => composition.soup = Some(planned),
            DishType::Snack => {}
        }
    }

    composition.refresh_totals();
    tracing::info!(
        meal = %meal,
        dishes = composition.composition_summary.len(),
        calories = composition.total_nutrition.calories,
        "meal composed"
    );
    Ok(composition)
}

/// Pick the day's snack from the seasonal fruit source.
///
/// Up to `max_attempts` fruits are drawn. The first one that passes the
/// pipeline and was not served this week wins. If every eligible draw was a
/// weekly repeat, the first such repeat is accepted.
pub fn choose_snack<R: Rng + ?Sized>(
    target_calories: f64,
    month: u32,
    ctx: &ComposeContext<'_>,
    tracker: &mut DailyNutrientTracker,
    rng: &mut R,
    max_attempts: usize,
) -> Result<Option<PlannedDish>> {
    let mut repeat: Option<PlannedDish> = None;

    for attempt in 1..=max_attempts {
        let Some(fruit) = seasonal_fruit(
            target_calories,
            month,
            ctx.profile.is_minor(),
            &ctx.profile.diseases,
            rng,
        ) else {
            break;
        };

        let result = filter_dish(&fruit, &ctx.filter_context(tracker));
        if !result.passed {
            tracing::debug!(attempt, fruit = %fruit.title, "snack rejected");
            continue;
        }

        let planned = PlannedDish {
            score: score_dish(&fruit, ctx.profile, target_calories, None),
            warnings: result.warnings,
            dish: fruit,
        };

        if ctx.weekly.is_excluded(DishType::Snack, &planned.dish.title) {
            tracing::debug!(attempt, fruit = %planned.dish.title, "snack already served this week");
            repeat.get_or_insert(planned);
            continue;
        }

        tracker.add_recipe(&planned.dish)?;
        tracing::info!(fruit = %planned.dish.title, attempt, "snack chosen");
        return Ok(Some(planned));
    }

    match repeat {
        Some(planned) => {
            tracing::warn!(
                fruit = %planned.dish.title,
                "no new snack after {} attempts, repeating one from this week",
                max_attempts
            );
            tracker.add_recipe(&planned.dish)?;
            Ok(Some(planned))
        }
        None => {
            tracing::warn!("no eligible snack");
            Ok(None)
        }
    }
}
