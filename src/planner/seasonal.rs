//! Built-in seasonal fruit source for the snack slot.

use rand::Rng;

use crate::models::{Disease, Dish, DishType, Nutrition};
use crate::planner::constants::{CHILD_SNACK_MAX_KCAL, DIABETES_SNACK_SUGAR_G, dish_limits};

/// Nutrition per 100 g of fruit.
#[derive(Debug, Clone, Copy)]
struct Fruit {
    name: &'static str,
    months: &'static [u32],
    kcal: f64,
    carbs: f64,
    sugar: f64,
    protein: f64,
    fat: f64,
    fiber: f64,
    potassium: f64,
    phosphorus: f64,
    glycemic_index: f64,
}

const YEAR_ROUND: &[u32] = &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

const FRUITS: &[Fruit] = &[
    Fruit {
        name: "딸기",
        months: &[1, 2, 3, 4, 5],
        kcal: 34.0,
        carbs: 8.0,
        sugar: 5.0,
        protein: 0.8,
        fat: 0.2,
        fiber: 1.8,
        potassium: 150.0,
        phosphorus: 25.0,
        glycemic_index: 40.0,
    },
    Fruit {
        name: "참외",
        months: &[5, 6, 7, 8],
        kcal: 31.0,
        carbs: 7.5,
        sugar: 6.0,
        protein: 1.0,
        fat: 0.1,
        fiber: 1.0,
        potassium: 280.0,
        phosphorus: 20.0,
        glycemic_index: 65.0,
    },
    Fruit {
        name: "수박",
        months: &[6, 7, 8],
        kcal: 31.0,
        carbs: 7.5,
        sugar: 6.2,
        protein: 0.6,
        fat: 0.1,
        fiber: 0.4,
        potassium: 110.0,
        phosphorus: 11.0,
        glycemic_index: 72.0,
    },
    Fruit {
        name: "블루베리",
        months: &[6, 7, 8],
        kcal: 57.0,
        carbs: 14.0,
        sugar: 10.0,
        protein: 0.7,
        fat: 0.3,
        fiber: 2.4,
        potassium: 77.0,
        phosphorus: 12.0,
        glycemic_index: 53.0,
    },
    Fruit {
        name: "복숭아",
        months: &[7, 8, 9],
        kcal: 39.0,
        carbs: 10.0,
        sugar: 8.4,
        protein: 0.9,
        fat: 0.3,
        fiber: 1.5,
        potassium: 190.0,
        phosphorus: 20.0,
        glycemic_index: 42.0,
    },
    Fruit {
        name: "포도",
        months: &[8, 9, 10],
        kcal: 69.0,
        carbs: 18.0,
        sugar: 15.0,
        protein: 0.7,
        fat: 0.2,
        fiber: 0.9,
        potassium: 190.0,
        phosphorus: 20.0,
        glycemic_index: 59.0,
    },
    Fruit {
        name: "배",
        months: &[9, 10, 11],
        kcal: 44.0,
        carbs: 11.0,
        sugar: 9.0,
        protein: 0.3,
        fat: 0.1,
        fiber: 1.6,
        potassium: 120.0,
        phosphorus: 11.0,
        glycemic_index: 38.0,
    },
    Fruit {
        name: "감",
        months: &[10, 11],
        kcal: 70.0,
        carbs: 18.0,
        sugar: 12.5,
        protein: 0.6,
        fat: 0.2,
        fiber: 3.6,
        potassium: 160.0,
        phosphorus: 17.0,
        glycemic_index: 50.0,
    },
    Fruit {
        name: "사과",
        months: &[9, 10, 11, 12, 1, 2],
        kcal: 52.0,
        carbs: 14.0,
        sugar: 10.0,
        protein: 0.3,
        fat: 0.2,
        fiber: 2.4,
        potassium: 107.0,
        phosphorus: 11.0,
        glycemic_index: 36.0,
    },
    Fruit {
        name: "귤",
        months: &[11, 12, 1, 2],
        kcal: 39.0,
        carbs: 10.0,
        sugar: 9.0,
        protein: 0.7,
        fat: 0.1,
        fiber: 1.0,
        potassium: 160.0,
        phosphorus: 15.0,
        glycemic_index: 42.0,
    },
    Fruit {
        name: "키위",
        months: &[11, 12, 1, 2, 3, 4],
        kcal: 61.0,
        carbs: 15.0,
        sugar: 9.0,
        protein: 1.1,
        fat: 0.5,
        fiber: 3.0,
        potassium: 312.0,
        phosphorus: 34.0,
        glycemic_index: 50.0,
    },
    Fruit {
        name: "바나나",
        months: YEAR_ROUND,
        kcal: 89.0,
        carbs: 23.0,
        sugar: 12.0,
        protein: 1.1,
        fat: 0.3,
        fiber: 2.6,
        potassium: 358.0,
        phosphorus: 22.0,
        glycemic_index: 51.0,
    },
];

/// Fruits at or above this potassium per 100 g are skipped for kidney disease.
const KIDNEY_POTASSIUM_PER_100G: f64 = 200.0;

/// Fruits above this GI are skipped for diabetes.
const DIABETES_MAX_GI: f64 = 70.0;

impl Fruit {
    fn suits(&self, diseases: &[Disease]) -> bool {
        if diseases.contains(&Disease::KidneyDisease)
            && self.potassium >= KIDNEY_POTASSIUM_PER_100G
        {
            return false;
        }
        if diseases.contains(&Disease::Diabetes) && self.glycemic_index > DIABETES_MAX_GI {
            return false;
        }
        true
    }

    /// Largest portion in grams the disease list allows, if any bounds it.
    ///
    /// Diabetes keeps sugar out of the high-sugar class. Kidney disease keeps
    /// potassium within the per-dish limit.
    fn max_grams(&self, diseases: &[Disease]) -> Option<f64> {
        let sugar = (diseases.contains(&Disease::Diabetes) && self.sugar > 0.0)
            .then(|| DIABETES_SNACK_SUGAR_G / self.sugar * 100.0);
        let potassium = diseases
            .contains(&Disease::KidneyDisease)
            .then(|| dish_limits(&Disease::KidneyDisease).0.potassium_mg)
            .flatten()
            .filter(|_| self.potassium > 0.0)
            .map(|cap| cap / self.potassium * 100.0);

        [sugar, potassium]
            .into_iter()
            .flatten()
            .map(f64::floor)
            .reduce(f64::min)
    }

    fn portion(&self, target_calories: f64, diseases: &[Disease]) -> Dish {
        let mut grams = (target_calories / self.kcal * 100.0).round();
        if let Some(max) = self.max_grams(diseases) {
            grams = grams.min(max);
        }
        let grams = grams.max(1.0);
        let per_100g = Nutrition {
            calories: self.kcal,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            sodium: 1.0,
            potassium: self.potassium,
            phosphorus: self.phosphorus,
            fiber: self.fiber,
            sugar: Some(self.sugar),
            purine: Some(5.0),
        };
        Dish {
            title: self.name.to_string(),
            description: Some(format!("{:.0}g", grams)),
            dish_type: DishType::Snack,
            ingredients: vec![self.name.to_string()],
            nutrition: per_100g.scale(grams / 100.0),
            rating: 0.0,
            glycemic_index: Some(self.glycemic_index),
        }
    }
}

/// Names of fruits in season for `month` that suit the disease list.
pub fn fruits_in_season(month: u32, diseases: &[Disease]) -> Vec<&'static str> {
    FRUITS
        .iter()
        .filter(|f| f.months.contains(&month) && f.suits(diseases))
        .map(|f| f.name)
        .collect()
}

/// Pick a seasonal fruit portion sized to `target_calories`.
///
/// Children get at most a small portion, and diabetes or kidney disease
/// shrink the portion further. Returns `None` only when no fruit at all
/// suits the disease list.
pub fn seasonal_fruit<R: Rng + ?Sized>(
    target_calories: f64,
    month: u32,
    is_child: bool,
    diseases: &[Disease],
    rng: &mut R,
) -> Option<Dish> {
    let mut pool: Vec<&Fruit> = FRUITS
        .iter()
        .filter(|f| f.months.contains(&month) && f.suits(diseases))
        .collect();
    if pool.is_empty() {
        pool = FRUITS.iter().filter(|f| f.suits(diseases)).collect();
    }
    if pool.is_empty() {
        return None;
    }

    let target = if is_child {
        target_calories.min(CHILD_SNACK_MAX_KCAL)
    } else {
        target_calories
    };

    let fruit = pool[rng.gen_range(0..pool.len())];
    Some(fruit.portion(target, diseases))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::constants::HIGH_SUGAR_G;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_every_month_has_fruit() {
        for month in 1..=12 {
            assert!(!fruits_in_season(month, &[]).is_empty(), "month {}", month);
        }
    }

    #[test]
    fn test_kidney_disease_skips_high_potassium() {
        let fruits = fruits_in_season(7, &[Disease::KidneyDisease]);
        assert!(!fruits.contains(&"참외"));
        assert!(!fruits.contains(&"바나나"));
        assert!(fruits.contains(&"수박"));
    }

    #[test]
    fn test_diabetes_skips_high_gi() {
        let fruits = fruits_in_season(7, &[Disease::Diabetes]);
        assert!(!fruits.contains(&"수박"));
    }

    #[test]
    fn test_portion_matches_target() {
        let mut rng = StdRng::seed_from_u64(7);
        let fruit = seasonal_fruit(200.0, 10, false, &[], &mut rng).unwrap();
        assert_eq!(fruit.dish_type, DishType::Snack);
        assert!((fruit.nutrition.calories - 200.0).abs() < 2.0);
    }

    #[test]
    fn test_child_portion_capped() {
        let mut rng = StdRng::seed_from_u64(7);
        let fruit = seasonal_fruit(300.0, 10, true, &[], &mut rng).unwrap();
        assert!(fruit.nutrition.calories <= CHILD_SNACK_MAX_KCAL + 1.0);
    }

    #[test]
    fn test_diabetic_portion_stays_below_high_sugar() {
        for month in 1..=12 {
            for seed in 0..10 {
                let mut rng = StdRng::seed_from_u64(seed);
                let fruit = seasonal_fruit(200.0, month, false, &[Disease::Diabetes], &mut rng)
                    .unwrap();
                let sugar = fruit.nutrition.sugar.unwrap();
                assert!(sugar <= DIABETES_SNACK_SUGAR_G + 1e-9, "{} {}", fruit.title, sugar);
                assert!(sugar < HIGH_SUGAR_G);
            }
        }
    }

    #[test]
    fn test_kidney_portion_within_potassium_limit() {
        for month in 1..=12 {
            for seed in 0..10 {
                let mut rng = StdRng::seed_from_u64(seed);
                let fruit =
                    seasonal_fruit(200.0, month, false, &[Disease::KidneyDisease], &mut rng)
                        .unwrap();
                assert!(fruit.nutrition.potassium <= 300.0, "{}", fruit.title);
            }
        }
    }

    #[test]
    fn test_same_seed_same_fruit() {
        let a = seasonal_fruit(150.0, 1, false, &[], &mut StdRng::seed_from_u64(42));
        let b = seasonal_fruit(150.0, 1, false, &[], &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
