use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::Disease;

// ─────────────────────────────────────────────────────────────────────────────
// Composition ratios
// ─────────────────────────────────────────────────────────────────────────────

/// Share of a meal's calories for the rice slot.
pub const RICE_RATIO: f64 = 0.35;

/// Share of a meal's calories for all side dishes together.
pub const SIDES_RATIO: f64 = 0.45;

/// Share of a meal's calories for the soup slot.
pub const SOUP_RATIO: f64 = 0.20;

/// Number of side-dish slots per meal.
pub const SIDE_SLOTS: usize = 3;

/// Macro split as fractions of calories: (carbs, protein, fat).
pub const DEFAULT_MACRO_SPLIT: (f64, f64, f64) = (0.55, 0.20, 0.25);
pub const DIABETES_MACRO_SPLIT: (f64, f64, f64) = (0.45, 0.25, 0.30);
pub const KIDNEY_MACRO_SPLIT: (f64, f64, f64) = (0.60, 0.12, 0.28);
pub const LIPID_MACRO_SPLIT: (f64, f64, f64) = (0.58, 0.22, 0.20);
pub const PREGNANCY_MACRO_SPLIT: (f64, f64, f64) = (0.52, 0.23, 0.25);

/// Half-width of a macro range around its target.
pub const MACRO_RANGE_TOLERANCE: f64 = 0.15;

pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

// ─────────────────────────────────────────────────────────────────────────────
// Per-dish warning thresholds (moderate stage, never reject)
// ─────────────────────────────────────────────────────────────────────────────

pub const SODIUM_WARNING_MG: f64 = 500.0;
pub const FAT_WARNING_G: f64 = 15.0;
pub const POTASSIUM_WARNING_MG: f64 = 200.0;
pub const PHOSPHORUS_WARNING_MG: f64 = 150.0;

/// Sugar above this makes a moderate-sugar warning `high`.
pub const SUGAR_WARNING_HIGH_G: f64 = 10.0;

/// Per-dish sodium ceiling when a low-sodium disease is present.
pub const SODIUM_CEILING_MG: f64 = 700.0;

/// Diseases that require the sodium ceiling.
pub const LOW_SODIUM_DISEASES: [Disease; 3] = [
    Disease::Hypertension,
    Disease::KidneyDisease,
    Disease::CardiovascularDisease,
];

// ─────────────────────────────────────────────────────────────────────────────
// Classifier
// ─────────────────────────────────────────────────────────────────────────────

/// Estimated sugar at or above this is `HighSugar`.
pub const HIGH_SUGAR_G: f64 = 15.0;

/// Estimated sugar at or above this is `ModerateSugar`.
pub const MODERATE_SUGAR_G: f64 = 5.0;

/// Fraction of carbs counted as sugar when sugar is not given.
pub const SUGAR_RATIO_HIGH_KEYWORD: f64 = 0.4;
pub const SUGAR_RATIO_MODERATE_KEYWORD: f64 = 0.2;
pub const SUGAR_RATIO_DEFAULT: f64 = 0.1;
/// Rice carbs are starch, not sugar.
pub const SUGAR_RATIO_RICE: f64 = 0.02;

/// Purine estimate (mg) when the dish does not state it.
pub const PURINE_HIGH_MG: f64 = 200.0;
pub const PURINE_MODERATE_MG: f64 = 80.0;
pub const PURINE_LOW_MG: f64 = 20.0;

// ─────────────────────────────────────────────────────────────────────────────
// Daily caps
// ─────────────────────────────────────────────────────────────────────────────

pub const DIABETES_SUGAR_CAP_G: f64 = 50.0;
pub const HYPERTENSION_SODIUM_CAP_MG: f64 = 2000.0;
pub const HYPERTENSION_CARDIO_SODIUM_CAP_MG: f64 = 1500.0;
pub const CARDIO_SODIUM_CAP_MG: f64 = 2000.0;
pub const CARDIO_FAT_CAP_G: f64 = 60.0;
pub const HYPERLIPIDEMIA_FAT_CAP_G: f64 = 50.0;
pub const KIDNEY_POTASSIUM_CAP_MG: f64 = 2000.0;
pub const KIDNEY_PHOSPHORUS_CAP_MG: f64 = 800.0;
pub const KIDNEY_SODIUM_CAP_MG: f64 = 2000.0;
pub const GOUT_PURINE_CAP_MG: f64 = 400.0;

/// Warn once the remaining budget drops below this share of the cap.
pub const BUDGET_WARNING_RATIO: f64 = 0.2;

// ─────────────────────────────────────────────────────────────────────────────
// Scoring
// ─────────────────────────────────────────────────────────────────────────────

pub const RATING_WEIGHT: f64 = 10.0;
pub const PREFERENCE_BONUS: f64 = 20.0;
pub const CALORIE_PROXIMITY_MAX: f64 = 30.0;
pub const CALORIE_PROXIMITY_DIVISOR: f64 = 10.0;
pub const PROTEIN_PROXIMITY_MAX: f64 = 40.0;
pub const PROTEIN_PROXIMITY_DIVISOR: f64 = 2.0;
pub const CARBS_FAT_PROXIMITY_MAX: f64 = 20.0;
pub const CARBS_FAT_PROXIMITY_DIVISOR: f64 = 5.0;
pub const DISEASE_BONUS: f64 = 15.0;
pub const GROWTH_BONUS: f64 = 10.0;
pub const PREGNANCY_BONUS: f64 = 15.0;
/// Cardiovascular bonus applies below this sodium.
pub const LOW_SODIUM_BONUS_MG: f64 = 400.0;

// ─────────────────────────────────────────────────────────────────────────────
// Snack
// ─────────────────────────────────────────────────────────────────────────────

/// Attempts to find a snack outside the weekly snack set.
pub const SNACK_MAX_ATTEMPTS: usize = 3;

/// Upper bound on a child's fruit portion, in kcal.
pub const CHILD_SNACK_MAX_KCAL: f64 = 120.0;

/// Sugar allowed in a diabetic's fruit portion. Stays below `HIGH_SUGAR_G`.
pub const DIABETES_SNACK_SUGAR_G: f64 = SUGAR_WARNING_HIGH_G;

// ─────────────────────────────────────────────────────────────────────────────
// Keyword tables
// ─────────────────────────────────────────────────────────────────────────────

/// Named keyword lists used by the classifier, filters and scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordTable {
    HighSugar,
    ModerateSugar,
    Vegetable,
    LowGi,
    LowPotassium,
    Growth,
    PregnancyBeneficial,
    PregnancyUnsafe,
    Fodmap,
    Acidic,
    IrritatingCooking,
    HighPurine,
    ModeratePurine,
    Fructose,
    SaturatedFat,
    AnimalIngredient,
}

impl KeywordTable {
    pub const ALL: [KeywordTable; 16] = [
        KeywordTable::HighSugar,
        KeywordTable::ModerateSugar,
        KeywordTable::Vegetable,
        KeywordTable::LowGi,
        KeywordTable::LowPotassium,
        KeywordTable::Growth,
        KeywordTable::PregnancyBeneficial,
        KeywordTable::PregnancyUnsafe,
        KeywordTable::Fodmap,
        KeywordTable::Acidic,
        KeywordTable::IrritatingCooking,
        KeywordTable::HighPurine,
        KeywordTable::ModeratePurine,
        KeywordTable::Fructose,
        KeywordTable::SaturatedFat,
        KeywordTable::AnimalIngredient,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            KeywordTable::HighSugar => &[
                "설탕", "꿀", "시럽", "물엿", "올리고당", "조청", "케이크", "사탕", "초콜릿",
                "약과", "잼", "탕수", "맛탕", "강정", "sugar", "honey", "syrup", "cake",
                "candy", "chocolate",
            ],
            KeywordTable::ModerateSugar => &[
                "불고기", "양념", "갈비", "데리야끼", "케첩", "고구마", "단호박", "조림", "떡",
                "소스", "teriyaki", "ketchup",
            ],
            KeywordTable::Vegetable => &[
                "나물", "무침", "샐러드", "채소", "야채", "시금치", "브로콜리", "오이", "배추",
                "상추", "숙주", "콩나물", "salad", "vegetable",
            ],
            KeywordTable::LowGi => &[
                "현미", "잡곡", "보리", "귀리", "콩", "두부", "나물", "채소", "버섯", "oat",
                "barley", "brown rice",
            ],
            KeywordTable::LowPotassium => &[
                "흰쌀", "쌀밥", "양배추", "오이", "가지", "무생채", "무나물", "숙주", "양상추",
                "사과", "white rice", "cabbage",
            ],
            KeywordTable::Growth => &[
                "우유", "계란", "달걀", "멸치", "두부", "치즈", "생선", "소고기", "milk", "egg",
            ],
            KeywordTable::PregnancyBeneficial => &[
                "시금치", "브로콜리", "콩", "두부", "미역", "소고기", "달걀", "계란", "잡곡",
                "spinach", "broccoli",
            ],
            KeywordTable::PregnancyUnsafe => &[
                "생선회", "회덮밥", "물회", "육회", "사시미", "초밥", "생굴", "참치", "황새치",
                "상어", "옥돔", "브리", "카망베르", "블루치즈", "술", "소주", "맥주", "와인",
                "막걸리", "raw fish", "sashimi", "sushi", "tuna", "swordfish", "brie",
                "camembert", "alcohol", "wine", "beer",
            ],
            KeywordTable::Fodmap => &[
                "양파", "마늘", "부추", "대파", "강낭콩", "병아리콩", "우유", "사과", "수박",
                "onion", "garlic",
            ],
            KeywordTable::Acidic => &[
                "식초", "레몬", "토마토", "오렌지", "자몽", "초무침", "vinegar", "lemon",
                "tomato",
            ],
            KeywordTable::IrritatingCooking => &[
                "튀김", "매운", "불닭", "청양고추", "고추장", "훈제", "fried", "spicy",
            ],
            KeywordTable::HighPurine => &[
                "내장", "곱창", "막창", "소간", "돼지간", "닭간", "멸치", "정어리", "고등어",
                "꽁치", "새우", "조개", "홍합", "전복", "anchovy", "sardine", "organ",
            ],
            KeywordTable::ModeratePurine => &[
                "소고기", "돼지고기", "닭고기", "오리", "생선", "고기", "beef", "pork",
                "chicken",
            ],
            KeywordTable::Fructose => &["액상과당", "과당", "콜라", "사이다", "fructose", "soda"],
            KeywordTable::SaturatedFat => &[
                "삼겹살", "베이컨", "버터", "마가린", "쇼트닝", "튀김", "소시지", "햄", "곱창",
                "bacon", "butter", "margarine", "shortening", "fried",
            ],
            KeywordTable::AnimalIngredient => &[
                "고기", "소고기", "돼지", "닭", "오리", "계란", "달걀", "우유", "치즈", "버터",
                "멸치", "새우", "생선", "어묵", "햄", "베이컨", "젓갈", "굴", "조개", "참치",
                "연어", "육수", "meat", "beef", "pork", "chicken", "egg", "milk", "cheese",
                "fish",
            ],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Allergy keywords
// ─────────────────────────────────────────────────────────────────────────────

/// Allergy code → ingredient keywords that trigger it.
pub static ALLERGY_KEYWORDS: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| {
        let groups: [(&[&str], &[&str]); 12] = [
            (
                &["egg", "계란", "달걀", "난류"],
                &["계란", "달걀", "메추리알", "마요네즈", "egg", "mayonnaise"],
            ),
            (
                &["milk", "dairy", "우유", "유제품"],
                &[
                    "우유", "치즈", "버터", "요구르트", "생크림", "milk", "cheese", "butter",
                    "cream",
                ],
            ),
            (&["peanut", "땅콩"], &["땅콩", "peanut"]),
            (
                &["tree_nut", "nut", "견과류"],
                &["호두", "아몬드", "잣", "캐슈", "피스타치오", "walnut", "almond", "pine nut"],
            ),
            (
                &["shellfish", "crustacean", "갑각류", "새우", "게"],
                &["새우", "꽃게", "대게", "게살", "게맛살", "랍스터", "shrimp", "crab", "lobster"],
            ),
            (
                &["mollusc", "조개류"],
                &["조개", "굴", "홍합", "바지락", "전복", "오징어", "clam", "oyster", "mussel"],
            ),
            (
                &["fish", "생선", "어류"],
                &["생선", "고등어", "갈치", "연어", "참치", "멸치", "명태", "대구", "어묵", "fish"],
            ),
            (
                &["wheat", "gluten", "밀", "밀가루"],
                &["밀가루", "국수", "빵", "부침가루", "튀김가루", "칼국수", "wheat", "flour"],
            ),
            (
                &["soy", "대두", "콩"],
                &["대두", "두부", "된장", "간장", "두유", "콩", "soy", "tofu"],
            ),
            (&["buckwheat", "메밀"], &["메밀", "buckwheat"]),
            (&["pork", "돼지고기"], &["돼지", "삼겹살", "베이컨", "햄", "pork", "bacon"]),
            (&["peach", "복숭아"], &["복숭아", "peach"]),
        ];

        let mut m = HashMap::new();
        for (codes, keywords) in groups {
            for code in codes {
                m.insert(*code, keywords);
            }
        }
        m
    });

/// Keywords for one allergy: the table entry plus the allergy name itself.
pub fn allergy_keywords(allergy: &str) -> Vec<String> {
    let normalized = allergy.trim().to_lowercase();
    let mut keywords: Vec<String> = ALLERGY_KEYWORDS
        .get(normalized.as_str())
        .map(|ks| ks.iter().map(|k| k.to_string()).collect())
        .unwrap_or_default();
    if !normalized.is_empty() && !keywords.contains(&normalized) {
        keywords.push(normalized);
    }
    keywords
}

// ─────────────────────────────────────────────────────────────────────────────
// Static per-dish ceilings
// ─────────────────────────────────────────────────────────────────────────────

/// Hard ceilings on a single dish for one disease. `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DishLimits {
    pub potassium_mg: Option<f64>,
    pub phosphorus_mg: Option<f64>,
    pub sodium_mg: Option<f64>,
    /// Doubled for rice dishes.
    pub carbs_g: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub glycemic_index: Option<f64>,
}

/// Ceilings for a disease, plus the keyword tables it bans outright.
pub fn dish_limits(disease: &Disease) -> (DishLimits, &'static [KeywordTable]) {
    match disease {
        Disease::Diabetes => (
            DishLimits {
                carbs_g: Some(45.0),
                glycemic_index: Some(70.0),
                ..Default::default()
            },
            &[],
        ),
        Disease::Hypertension => (
            DishLimits {
                sodium_mg: Some(600.0),
                ..Default::default()
            },
            &[],
        ),
        Disease::Hyperlipidemia => (
            DishLimits {
                fat_g: Some(20.0),
                ..Default::default()
            },
            &[],
        ),
        Disease::KidneyDisease => (
            DishLimits {
                potassium_mg: Some(300.0),
                phosphorus_mg: Some(250.0),
                sodium_mg: Some(600.0),
                protein_g: Some(20.0),
                ..Default::default()
            },
            &[],
        ),
        Disease::CardiovascularDisease => (
            DishLimits {
                sodium_mg: Some(600.0),
                fat_g: Some(20.0),
                ..Default::default()
            },
            &[KeywordTable::SaturatedFat],
        ),
        Disease::Gout => (
            DishLimits {
                protein_g: Some(25.0),
                ..Default::default()
            },
            &[KeywordTable::HighPurine, KeywordTable::Fructose],
        ),
        Disease::GastrointestinalDisorder => (
            DishLimits {
                fat_g: Some(15.0),
                ..Default::default()
            },
            &[
                KeywordTable::Fodmap,
                KeywordTable::Acidic,
                KeywordTable::IrritatingCooking,
            ],
        ),
        Disease::Other(_) => (DishLimits::default(), &[]),
    }
}
