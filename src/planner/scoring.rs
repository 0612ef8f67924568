use std::cmp::Ordering;

use crate::models::{Disease, Dish, HealthProfile};
use crate::planner::constants::*;
use crate::planner::macros::MacroGoals;

/// Closeness reward: `max(0, cap - |value - target| / divisor)`.
fn proximity(value: f64, target: f64, cap: f64, divisor: f64) -> f64 {
    (cap - (value - target).abs() / divisor).max(0.0)
}

/// Count of profile preferences the dish's ingredients contain.
fn preference_matches(dish: &Dish, profile: &HealthProfile) -> usize {
    profile
        .dietary_preferences
        .iter()
        .filter(|p| dish.has_ingredient(p))
        .count()
}

/// Disease- and life-stage-specific bonus.
fn health_bonus(dish: &Dish, profile: &HealthProfile) -> f64 {
    let mut bonus = 0.0;

    if profile.has(&Disease::Diabetes)
        && dish.first_mention(KeywordTable::LowGi.keywords()).is_some()
    {
        bonus += DISEASE_BONUS;
    }
    if profile.has(&Disease::KidneyDisease)
        && dish.first_mention(KeywordTable::LowPotassium.keywords()).is_some()
    {
        bonus += DISEASE_BONUS;
    }
    if profile.has(&Disease::CardiovascularDisease) && dish.nutrition.sodium < LOW_SODIUM_BONUS_MG {
        bonus += DISEASE_BONUS;
    }
    if profile.is_minor() && dish.first_mention(KeywordTable::Growth.keywords()).is_some() {
        bonus += GROWTH_BONUS;
    }
    if profile.is_pregnant()
        && dish.first_mention(KeywordTable::PregnancyBeneficial.keywords()).is_some()
    {
        bonus += PREGNANCY_BONUS;
    }

    bonus
}

/// Score a dish for a slot. Higher is better.
///
/// Rating, preferences, calorie proximity, optional macro proximity
/// (protein weighted highest) and health bonuses are summed.
pub fn score_dish(
    dish: &Dish,
    profile: &HealthProfile,
    target_calories: f64,
    macro_goals: Option<&MacroGoals>,
) -> f64 {
    let n = &dish.nutrition;

    let mut score = dish.rating * RATING_WEIGHT;
    score += preference_matches(dish, profile) as f64 * PREFERENCE_BONUS;
    score += proximity(
        n.calories,
        target_calories,
        CALORIE_PROXIMITY_MAX,
        CALORIE_PROXIMITY_DIVISOR,
    );

    if let Some(goals) = macro_goals {
        score += proximity(
            n.protein,
            goals.protein.target,
            PROTEIN_PROXIMITY_MAX,
            PROTEIN_PROXIMITY_DIVISOR,
        );
        score += proximity(
            n.carbs,
            goals.carbs.target,
            CARBS_FAT_PROXIMITY_MAX,
            CARBS_FAT_PROXIMITY_DIVISOR,
        );
        score += proximity(
            n.fat,
            goals.fat.target,
            CARBS_FAT_PROXIMITY_MAX,
            CARBS_FAT_PROXIMITY_DIVISOR,
        );
    }

    score + health_bonus(dish, profile)
}

/// Index of the highest-scoring entry. On equal scores the earliest wins.
pub fn pick_best<T>(scored: &[(T, f64)]) -> Option<usize> {
    let mut order: Vec<usize> = (0..scored.len()).collect();
    // Stable sort keeps input order among equal scores.
    order.sort_by(|&a, &b| {
        scored[b]
            .1
            .partial_cmp(&scored[a].1)
            .unwrap_or(Ordering::Equal)
    });
    order.first().copied()
}
