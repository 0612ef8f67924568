//! Ordered eligibility checks for a candidate dish.
//!
//! Every stage is a plain function of the dish and a [`FilterContext`].
//! The first hard rejection stops the pipeline; warnings from stages that
//! passed are merged onto the result and never change the verdict.

use serde::Serialize;

use crate::models::{
    DietWarning, Disease, Dish, DishType, ExclusionCatalog, HealthProfile, Severity, WarningKind,
    WarningSeverity,
};
use crate::planner::classifier::{DishClass, classify, estimate_sugar};
use crate::planner::constants::*;
use crate::planner::tracker::DailyNutrientTracker;

/// Why a dish was rejected, for callers that need to tell safety
/// rejections from "today's budget is spent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionTier {
    /// Unsafe for this user no matter the amount.
    Absolute,
    /// Disease-specific soft rule escalated to a rejection.
    Moderate,
    /// Fine in isolation, but the daily budget cannot take it.
    Limit,
}

/// One check in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Allergy,
    AbsoluteExclusion,
    ModerateExclusion,
    DishLimits,
    SodiumCeiling,
    DailyBudget,
    DislikedIngredient,
    Pregnancy,
    Vegan,
}

/// Execution order. Per-dish ceilings run before the running budget so a
/// `Limit` rejection always means the dish was acceptable on its own.
pub const PIPELINE: [Stage; 9] = [
    Stage::Allergy,
    Stage::AbsoluteExclusion,
    Stage::ModerateExclusion,
    Stage::DishLimits,
    Stage::SodiumCeiling,
    Stage::DailyBudget,
    Stage::DislikedIngredient,
    Stage::Pregnancy,
    Stage::Vegan,
];

/// Everything the stages read. Nothing in here is mutated by filtering.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub profile: &'a HealthProfile,
    pub catalog: &'a ExclusionCatalog,
    pub tracker: &'a DailyNutrientTracker,
    pub premium_features: &'a [String],
    pub sodium_ceiling_mg: f64,
}

impl<'a> FilterContext<'a> {
    pub fn new(
        profile: &'a HealthProfile,
        catalog: &'a ExclusionCatalog,
        tracker: &'a DailyNutrientTracker,
    ) -> Self {
        Self {
            profile,
            catalog,
            tracker,
            premium_features: &[],
            sodium_ceiling_mg: SODIUM_CEILING_MG,
        }
    }

    pub fn with_premium_features(mut self, features: &'a [String]) -> Self {
        self.premium_features = features;
        self
    }

    pub fn with_sodium_ceiling(mut self, ceiling_mg: f64) -> Self {
        self.sodium_ceiling_mg = ceiling_mg;
        self
    }

    fn has_feature(&self, feature: &str) -> bool {
        self.premium_features
            .iter()
            .any(|f| f.trim().eq_ignore_ascii_case(feature))
    }
}

/// Outcome of a single stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    Pass(Vec<DietWarning>),
    Reject {
        reasons: Vec<String>,
        tier: Option<ExclusionTier>,
    },
}

impl StageOutcome {
    fn pass() -> Self {
        StageOutcome::Pass(Vec::new())
    }

    fn reject_if(reasons: Vec<String>, tier: Option<ExclusionTier>) -> Self {
        if reasons.is_empty() {
            StageOutcome::pass()
        } else {
            StageOutcome::Reject { reasons, tier }
        }
    }
}

/// Verdict for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterResult {
    pub passed: bool,
    pub reasons: Vec<String>,
    pub warnings: Vec<DietWarning>,
    pub exclusion_tier: Option<ExclusionTier>,
    pub rejected_by: Option<Stage>,
}

/// Run the full pipeline on one dish.
pub fn filter_dish(dish: &Dish, ctx: &FilterContext<'_>) -> FilterResult {
    let mut warnings = Vec::new();

    for stage in PIPELINE {
        match run_stage(stage, dish, ctx) {
            StageOutcome::Pass(stage_warnings) => warnings.extend(stage_warnings),
            StageOutcome::Reject { reasons, tier } => {
                tracing::debug!(
                    dish = %dish.debug_string(),
                    stage = ?stage,
                    reason = %reasons.join("; "),
                    "candidate rejected"
                );
                return FilterResult {
                    passed: false,
                    reasons,
                    warnings,
                    exclusion_tier: tier,
                    rejected_by: Some(stage),
                };
            }
        }
    }

    FilterResult {
        passed: true,
        warnings,
        ..Default::default()
    }
}

/// Dispatch one stage.
pub fn run_stage(stage: Stage, dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    match stage {
        Stage::Allergy => check_allergy(dish, ctx),
        Stage::AbsoluteExclusion => check_absolute_exclusion(dish, ctx),
        Stage::ModerateExclusion => check_moderate_exclusion(dish, ctx),
        Stage::DishLimits => check_dish_limits(dish, ctx),
        Stage::SodiumCeiling => check_sodium_ceiling(dish, ctx),
        Stage::DailyBudget => check_daily_budget(dish, ctx),
        Stage::DislikedIngredient => check_disliked(dish, ctx),
        Stage::Pregnancy => check_pregnancy(dish, ctx),
        Stage::Vegan => check_vegan(dish, ctx),
    }
}

fn check_allergy(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    let reasons: Vec<String> = ctx
        .profile
        .allergies
        .iter()
        .filter_map(|allergy| {
            allergy_keywords(allergy)
                .into_iter()
                .find(|k| dish.has_ingredient(k))
                .map(|k| format!("contains '{}' (allergy: {})", k, allergy))
        })
        .collect();
    StageOutcome::reject_if(reasons, Some(ExclusionTier::Absolute))
}

fn check_absolute_exclusion(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    let reasons: Vec<String> = ctx
        .catalog
        .for_diseases(&ctx.profile.diseases)
        .filter(|e| e.is_absolute() && e.matches(dish))
        .map(|e| format!("'{}' is excluded for {}", e.excluded_food_name, e.disease))
        .collect();
    StageOutcome::reject_if(reasons, Some(ExclusionTier::Absolute))
}

fn check_moderate_exclusion(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    let profile = ctx.profile;
    let n = &dish.nutrition;

    let mut warnings: Vec<DietWarning> = ctx
        .catalog
        .for_diseases(&profile.diseases)
        .filter(|e| !e.is_absolute() && e.matches(dish))
        .map(|e| {
            let severity = if e.severity == Severity::Severe {
                WarningSeverity::High
            } else {
                WarningSeverity::Moderate
            };
            DietWarning::new(
                WarningKind::QuantityControl,
                severity,
                format!(
                    "keep portions small: '{}' ({})",
                    e.excluded_food_name, e.disease
                ),
            )
        })
        .collect();

    if profile.has(&Disease::Diabetes) {
        let sugar = estimate_sugar(dish);
        match classify(dish) {
            DishClass::HighSugar => {
                return StageOutcome::Reject {
                    reasons: vec![format!(
                        "high-sugar dish not allowed with diabetes (about {:.1}g sugar)",
                        sugar
                    )],
                    tier: Some(ExclusionTier::Moderate),
                };
            }
            DishClass::ModerateSugar => {
                let severity = if sugar > SUGAR_WARNING_HIGH_G {
                    WarningSeverity::High
                } else {
                    WarningSeverity::Moderate
                };
                warnings.push(
                    DietWarning::new(
                        WarningKind::Sugar,
                        severity,
                        format!("contains about {:.1}g sugar", sugar),
                    )
                    .with_amount(sugar),
                );
            }
            DishClass::LowSugar | DishClass::Vegetable => {}
        }
    }

    let mut threshold =
        |disease: Disease, kind: WarningKind, value: f64, limit: f64, label: &str, unit: &str| {
            if profile.has(&disease) && value > limit {
                warnings.push(
                    DietWarning::new(
                        kind,
                        WarningSeverity::Moderate,
                        format!("{} {:.0}{} is above {:.0}{}", label, value, unit, limit, unit),
                    )
                    .with_amount(value),
                );
            }
        };

    threshold(
        Disease::Hypertension,
        WarningKind::Sodium,
        n.sodium,
        SODIUM_WARNING_MG,
        "sodium",
        "mg",
    );
    threshold(
        Disease::Hyperlipidemia,
        WarningKind::Fat,
        n.fat,
        FAT_WARNING_G,
        "fat",
        "g",
    );
    threshold(
        Disease::KidneyDisease,
        WarningKind::Potassium,
        n.potassium,
        POTASSIUM_WARNING_MG,
        "potassium",
        "mg",
    );
    threshold(
        Disease::KidneyDisease,
        WarningKind::Phosphorus,
        n.phosphorus,
        PHOSPHORUS_WARNING_MG,
        "phosphorus",
        "mg",
    );

    StageOutcome::Pass(warnings)
}

fn check_dish_limits(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    let n = &dish.nutrition;
    let mut reasons = Vec::new();

    for disease in &ctx.profile.diseases {
        let (limits, bans) = dish_limits(disease);

        let carbs_cap = limits.carbs_g.map(|cap| {
            if dish.dish_type == DishType::Rice {
                cap * 2.0
            } else {
                cap
            }
        });

        let checks = [
            ("potassium", n.potassium, limits.potassium_mg, "mg"),
            ("phosphorus", n.phosphorus, limits.phosphorus_mg, "mg"),
            ("sodium", n.sodium, limits.sodium_mg, "mg"),
            ("carbs", n.carbs, carbs_cap, "g"),
            ("protein", n.protein, limits.protein_g, "g"),
            ("fat", n.fat, limits.fat_g, "g"),
        ];
        for (label, value, cap, unit) in checks {
            if let Some(cap) = cap {
                if value > cap {
                    reasons.push(format!(
                        "{} {:.0}{} exceeds the per-dish limit of {:.0}{} for {}",
                        label, value, unit, cap, unit, disease
                    ));
                }
            }
        }

        if let (Some(gi), Some(cap)) = (dish.glycemic_index, limits.glycemic_index) {
            if gi > cap {
                reasons.push(format!(
                    "glycemic index {:.0} exceeds {:.0} for {}",
                    gi, cap, disease
                ));
            }
        }

        for table in bans {
            if let Some(keyword) = dish.first_mention(table.keywords()) {
                reasons.push(format!("'{}' is not allowed for {}", keyword, disease));
            }
        }
    }

    StageOutcome::reject_if(reasons, Some(ExclusionTier::Absolute))
}

fn check_sodium_ceiling(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    if !ctx.profile.has_any(&LOW_SODIUM_DISEASES) {
        return StageOutcome::pass();
    }
    let sodium = dish.nutrition.sodium;
    if sodium > ctx.sodium_ceiling_mg {
        return StageOutcome::Reject {
            reasons: vec![format!(
                "sodium {:.0}mg exceeds the {:.0}mg low-sodium ceiling",
                sodium, ctx.sodium_ceiling_mg
            )],
            tier: Some(ExclusionTier::Absolute),
        };
    }
    StageOutcome::pass()
}

fn check_daily_budget(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    let check = ctx.tracker.can_add_recipe(dish);
    if check.can_add {
        StageOutcome::Pass(check.warnings)
    } else {
        StageOutcome::Reject {
            reasons: check.reasons,
            tier: Some(ExclusionTier::Limit),
        }
    }
}

fn check_disliked(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    let reasons: Vec<String> = ctx
        .profile
        .disliked_ingredients
        .iter()
        .filter(|d| dish.mentions(d))
        .map(|d| format!("contains disliked '{}'", d.trim()))
        .collect();
    StageOutcome::reject_if(reasons, None)
}

fn check_pregnancy(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    if !ctx.profile.is_pregnant() {
        return StageOutcome::pass();
    }
    match dish.first_mention(KeywordTable::PregnancyUnsafe.keywords()) {
        Some(keyword) => StageOutcome::Reject {
            reasons: vec![format!("'{}' is unsafe during pregnancy", keyword)],
            tier: Some(ExclusionTier::Absolute),
        },
        None => StageOutcome::pass(),
    }
}

fn check_vegan(dish: &Dish, ctx: &FilterContext<'_>) -> StageOutcome {
    if !ctx.has_feature("vegan") {
        return StageOutcome::pass();
    }
    match dish.first_mention(KeywordTable::AnimalIngredient.keywords()) {
        Some(keyword) => StageOutcome::Reject {
            reasons: vec![format!("'{}' is an animal ingredient", keyword)],
            tier: None,
        },
        None => StageOutcome::pass(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExcludedFoodEntry, ExcludedType, ExclusionType, Nutrition};

    fn profile(diseases: Vec<Disease>) -> HealthProfile {
        HealthProfile {
            diseases,
            age: 45,
            daily_calorie_goal: 2000.0,
            ..Default::default()
        }
    }

    fn side(title: &str, ingredients: &[&str], nutrition: Nutrition) -> Dish {
        Dish::new(title, DishType::Side, ingredients, nutrition)
    }

    fn plain() -> Nutrition {
        Nutrition {
            calories: 120.0,
            protein: 8.0,
            carbs: 6.0,
            fat: 5.0,
            sodium: 300.0,
            potassium: 150.0,
            phosphorus: 90.0,
            ..Default::default()
        }
    }

    fn run(dish: &Dish, profile: &HealthProfile, catalog: &ExclusionCatalog) -> FilterResult {
        let tracker = DailyNutrientTracker::new(&profile.diseases);
        let ctx = FilterContext::new(profile, catalog, &tracker);
        filter_dish(dish, &ctx)
    }

    #[test]
    fn test_plain_dish_passes_for_healthy_profile() {
        let dish = side("두부조림", &["두부", "간장"], plain());
        let result = run(&dish, &profile(vec![]), &ExclusionCatalog::default());
        assert!(result.passed);
        assert!(result.reasons.is_empty());
        assert_eq!(result.exclusion_tier, None);
    }

    #[test]
    fn test_allergy_rejects_by_ingredient() {
        let mut p = profile(vec![]);
        p.allergies = vec!["egg".to_string()];
        let dish = side("계란말이", &["달걀", "대파"], plain());

        let result = run(&dish, &p, &ExclusionCatalog::default());
        assert!(!result.passed);
        assert_eq!(result.rejected_by, Some(Stage::Allergy));
        assert_eq!(result.exclusion_tier, Some(ExclusionTier::Absolute));
        assert!(result.reasons[0].contains("달걀"));
    }

    #[test]
    fn test_absolute_catalog_entry_rejects() {
        let catalog = ExclusionCatalog::new(vec![ExcludedFoodEntry {
            disease: Disease::Gout,
            excluded_food_name: "멸치".to_string(),
            excluded_type: ExcludedType::Ingredient,
            severity: Severity::Moderate,
            exclusion_type: Some(ExclusionType::Absolute),
        }]);
        let dish = side("멸치볶음", &["멸치", "간장"], plain());

        let result = run(&dish, &profile(vec![Disease::Gout]), &catalog);
        assert!(!result.passed);
        assert_eq!(result.rejected_by, Some(Stage::AbsoluteExclusion));

        // Entry for a disease the user does not have is ignored.
        let result = run(&dish, &profile(vec![]), &catalog);
        assert!(result.passed);
    }

    #[test]
    fn test_moderate_catalog_entry_warns() {
        let catalog = ExclusionCatalog::new(vec![ExcludedFoodEntry {
            disease: Disease::Hypertension,
            excluded_food_name: "간장".to_string(),
            excluded_type: ExcludedType::Ingredient,
            severity: Severity::Mild,
            exclusion_type: None,
        }]);
        let dish = side("두부조림", &["두부", "간장"], plain());

        let result = run(&dish, &profile(vec![Disease::Hypertension]), &catalog);
        assert!(result.passed);
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::QuantityControl)
        );
    }

    #[test]
    fn test_diabetes_high_sugar_rejected_moderate_warned() {
        let p = profile(vec![Disease::Diabetes]);
        let catalog = ExclusionCatalog::default();

        let candied = side("고구마맛탕", &["고구마", "물엿"], plain());
        let result = run(&candied, &p, &catalog);
        assert!(!result.passed);
        assert_eq!(result.exclusion_tier, Some(ExclusionTier::Moderate));

        let mut n = plain();
        n.sugar = Some(12.0);
        let bulgogi = side("소불고기", &["소고기"], n);
        let result = run(&bulgogi, &p, &catalog);
        assert!(result.passed);
        let sugar = result
            .warnings
            .iter()
            .find(|w| w.kind == WarningKind::Sugar)
            .unwrap();
        assert_eq!(sugar.severity, WarningSeverity::High);
        assert_eq!(sugar.amount, Some(12.0));
    }

    #[test]
    fn test_kidney_thresholds_warn_but_pass() {
        let mut n = plain();
        n.potassium = 250.0;
        n.phosphorus = 180.0;
        let dish = side("애호박볶음", &["애호박"], n);

        let catalog = ExclusionCatalog::default();
        let result = run(&dish, &profile(vec![Disease::KidneyDisease]), &catalog);
        assert!(result.passed);
        let kinds: Vec<WarningKind> = result.warnings.iter().map(|w| w.kind).collect();
        assert!(kinds.contains(&WarningKind::Potassium));
        assert!(kinds.contains(&WarningKind::Phosphorus));
    }

    #[test]
    fn test_hypertension_single_dish_over_sodium_rejected_as_unsafe() {
        let mut n = plain();
        n.sodium = 2100.0;
        let dish = Dish::new("짬뽕국", DishType::Soup, &["홍합"], n);

        let catalog = ExclusionCatalog::default();
        let result = run(&dish, &profile(vec![Disease::Hypertension]), &catalog);
        assert!(!result.passed);
        assert_eq!(result.rejected_by, Some(Stage::DishLimits));
        assert_eq!(result.exclusion_tier, Some(ExclusionTier::Absolute));
    }

    #[test]
    fn test_rice_doubles_carb_cap() {
        let p = profile(vec![Disease::Diabetes]);
        let n = Nutrition {
            calories: 300.0,
            carbs: 65.0,
            protein: 5.0,
            ..Default::default()
        };
        let rice = Dish::new("현미밥", DishType::Rice, &["현미"], n.clone());
        assert!(run(&rice, &p, &ExclusionCatalog::default()).passed);

        let noodles = side("잡채", &["당면"], n);
        let result = run(&noodles, &p, &ExclusionCatalog::default());
        assert!(!result.passed);
        assert_eq!(result.rejected_by, Some(Stage::DishLimits));
    }

    #[test]
    fn test_keyword_bans() {
        let gout = profile(vec![Disease::Gout]);
        let dish = side("고등어구이", &["고등어"], plain());
        let result = run(&dish, &gout, &ExclusionCatalog::default());
        assert!(!result.passed);
        assert!(result.reasons[0].contains("고등어"));

        let gi = profile(vec![Disease::GastrointestinalDisorder]);
        let fried = side("새우튀김", &["새우", "튀김가루"], plain());
        assert!(!run(&fried, &gi, &ExclusionCatalog::default()).passed);
    }

    #[test]
    fn test_sodium_ceiling_applies_to_low_sodium_diseases_only() {
        let mut n = plain();
        n.sodium = 650.0;
        let dish = Dish::new("된장국", DishType::Soup, &["된장", "두부"], n);

        let p = profile(vec![Disease::KidneyDisease]);
        let catalog = ExclusionCatalog::default();
        let tracker = DailyNutrientTracker::new(&p.diseases);
        let ctx = FilterContext::new(&p, &catalog, &tracker).with_sodium_ceiling(500.0);
        assert!(matches!(
            run_stage(Stage::SodiumCeiling, &dish, &ctx),
            StageOutcome::Reject { .. }
        ));

        let healthy = profile(vec![]);
        let ctx = FilterContext::new(&healthy, &catalog, &tracker).with_sodium_ceiling(500.0);
        assert_eq!(
            run_stage(Stage::SodiumCeiling, &dish, &ctx),
            StageOutcome::Pass(vec![])
        );
    }

    #[test]
    fn test_budget_rejection_has_limit_tier() {
        let p = profile(vec![Disease::Diabetes]);
        let catalog = ExclusionCatalog::default();
        let mut tracker = DailyNutrientTracker::new(&p.diseases);
        let mut n = plain();
        n.sugar = Some(4.0);
        for i in 0..12 {
            tracker
                .add_recipe(&side(&format!("반찬{}", i), &[], n.clone()))
                .unwrap();
        }

        let ctx = FilterContext::new(&p, &catalog, &tracker);
        let result = filter_dish(&side("오이무침", &["오이"], n), &ctx);
        assert!(!result.passed);
        assert_eq!(result.exclusion_tier, Some(ExclusionTier::Limit));
        assert_eq!(result.rejected_by, Some(Stage::DailyBudget));
    }

    #[test]
    fn test_disliked_pregnancy_and_vegan() {
        let catalog = ExclusionCatalog::default();

        let mut picky = profile(vec![]);
        picky.disliked_ingredients = vec!["가지".to_string()];
        let eggplant = side("가지볶음", &["가지"], plain());
        let result = run(&eggplant, &picky, &catalog);
        assert_eq!(result.rejected_by, Some(Stage::DislikedIngredient));
        assert_eq!(result.exclusion_tier, None);

        let mut pregnant = profile(vec![]);
        pregnant.pregnancy_trimester = Some(2);
        let sashimi = side("광어 생선회", &["광어"], plain());
        let result = run(&sashimi, &pregnant, &catalog);
        assert_eq!(result.rejected_by, Some(Stage::Pregnancy));

        let vegan_features = vec!["vegan".to_string()];
        let healthy = profile(vec![]);
        let tracker = DailyNutrientTracker::new(&[]);
        let ctx = FilterContext::new(&healthy, &catalog, &tracker)
            .with_premium_features(&vegan_features);
        let anchovy = side("멸치볶음", &["멸치"], plain());
        assert_eq!(filter_dish(&anchovy, &ctx).rejected_by, Some(Stage::Vegan));
        let namul = side("시금치나물", &["시금치", "참기름"], plain());
        assert!(filter_dish(&namul, &ctx).passed);
    }
}
