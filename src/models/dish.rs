use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Structural role a dish can fill in a meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishType {
    Rice,
    Side,
    Soup,
    Snack,
}

impl DishType {
    pub fn label(self) -> &'static str {
        match self {
            DishType::Rice => "rice",
            DishType::Side => "side",
            DishType::Soup => "soup",
            DishType::Snack => "snack",
        }
    }
}

impl fmt::Display for DishType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Nutrition facts for one serving.
///
/// Calories in kcal; protein, carbs, fat, fiber and sugar in grams; sodium,
/// potassium, phosphorus and purine in milligrams. `sugar` and `purine` are
/// optional because most recipe sources omit them; the classifier estimates
/// them when missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub potassium: f64,
    #[serde(default)]
    pub phosphorus: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purine: Option<f64>,
}

impl Nutrition {
    /// Multiply every value by `factor` (portion scaling).
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            calories: self.calories * factor,
            protein: self.protein * factor,
            carbs: self.carbs * factor,
            fat: self.fat * factor,
            sodium: self.sodium * factor,
            potassium: self.potassium * factor,
            phosphorus: self.phosphorus * factor,
            fiber: self.fiber * factor,
            sugar: self.sugar.map(|v| v * factor),
            purine: self.purine.map(|v| v * factor),
        }
    }

    /// Name of the first field that is negative or not finite, if any.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let fields = [
            ("calories", Some(self.calories)),
            ("protein", Some(self.protein)),
            ("carbs", Some(self.carbs)),
            ("fat", Some(self.fat)),
            ("sodium", Some(self.sodium)),
            ("potassium", Some(self.potassium)),
            ("phosphorus", Some(self.phosphorus)),
            ("fiber", Some(self.fiber)),
            ("sugar", self.sugar),
            ("purine", self.purine),
        ];
        fields
            .into_iter()
            .find(|(_, v)| v.is_some_and(|v| !v.is_finite() || v < 0.0))
            .map(|(name, _)| name)
    }
}

impl Add<&Nutrition> for Nutrition {
    type Output = Nutrition;

    fn add(self, other: &Nutrition) -> Nutrition {
        let opt_sum = |a: Option<f64>, b: Option<f64>| match (a, b) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
        };
        Nutrition {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            sodium: self.sodium + other.sodium,
            potassium: self.potassium + other.potassium,
            phosphorus: self.phosphorus + other.phosphorus,
            fiber: self.fiber + other.fiber,
            sugar: opt_sum(self.sugar, other.sugar),
            purine: opt_sum(self.purine, other.purine),
        }
    }
}

impl<'a> std::iter::Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Nutrition>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), |acc, n| acc + n)
    }
}

/// A candidate dish from the external recipe pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub dish_type: DishType,

    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub nutrition: Nutrition,

    /// User/editor rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glycemic_index: Option<f64>,
}

impl Dish {
    /// Create a dish with no description, rating or GI.
    pub fn new(
        title: impl Into<String>,
        dish_type: DishType,
        ingredients: &[&str],
        nutrition: Nutrition,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            dish_type,
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            nutrition,
            rating: 0.0,
            glycemic_index: None,
        }
    }

    /// Canonical key for lookups (lowercase, trimmed title).
    pub fn key(&self) -> String {
        self.title.trim().to_lowercase()
    }

    /// Title and description joined, lowercased, for keyword matching.
    pub fn text(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.title, desc).to_lowercase(),
            None => self.title.to_lowercase(),
        }
    }

    /// Whether any ingredient name contains `keyword` (case-insensitive).
    pub fn has_ingredient(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        !keyword.is_empty()
            && self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(&keyword))
    }

    /// Whether the title, description or any ingredient contains `keyword`.
    pub fn mentions(&self, keyword: &str) -> bool {
        let needle = keyword.to_lowercase();
        !needle.is_empty() && (self.text().contains(&needle) || self.has_ingredient(&needle))
    }

    /// First keyword from `keywords` that the dish mentions.
    pub fn first_mention<'k>(&self, keywords: &[&'k str]) -> Option<&'k str> {
        keywords.iter().copied().find(|k| self.mentions(k))
    }

    /// Reject records that would poison arithmetic downstream.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("empty title".to_string());
        }
        if let Some(field) = self.nutrition.invalid_field() {
            return Err(format!("{} must be a non-negative number", field));
        }
        if !self.rating.is_finite() {
            return Err("rating must be a number".to_string());
        }
        Ok(())
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} [{}]: {:.0} kcal, P:{:.1} C:{:.1} F:{:.1} Na:{:.0}",
            self.title,
            self.dish_type,
            self.nutrition.calories,
            self.nutrition.protein,
            self.nutrition.carbs,
            self.nutrition.fat,
            self.nutrition.sodium
        )
    }
}
