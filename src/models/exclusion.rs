use serde::{Deserialize, Serialize};

use crate::models::{Disease, Dish};

/// What an excluded-food entry is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcludedType {
    /// Substring of an ingredient name.
    Ingredient,
    /// Keyword in the dish title or description.
    RecipeKeyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// How hard a catalog match is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionType {
    Absolute,
    Moderate,
}

/// One row of the disease → excluded-food catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedFoodEntry {
    pub disease: Disease,
    pub excluded_food_name: String,
    pub excluded_type: ExcludedType,
    pub severity: Severity,
    #[serde(default)]
    pub exclusion_type: Option<ExclusionType>,
}

impl ExcludedFoodEntry {
    /// Explicit exclusion type, or derived from severity when unset.
    pub fn effective_type(&self) -> ExclusionType {
        match self.exclusion_type {
            Some(t) => t,
            None if self.severity == Severity::Severe => ExclusionType::Absolute,
            None => ExclusionType::Moderate,
        }
    }

    /// Whether this entry is absolute. A severe entry is always absolute.
    pub fn is_absolute(&self) -> bool {
        self.severity == Severity::Severe || self.effective_type() == ExclusionType::Absolute
    }

    /// Whether the dish matches this entry.
    pub fn matches(&self, dish: &Dish) -> bool {
        let name = self.excluded_food_name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        match self.excluded_type {
            ExcludedType::Ingredient => dish.has_ingredient(&name),
            ExcludedType::RecipeKeyword => dish.text().contains(&name),
        }
    }
}

/// Read-only catalog of excluded foods, resolved before generation.
#[derive(Debug, Clone, Default)]
pub struct ExclusionCatalog {
    entries: Vec<ExcludedFoodEntry>,
}

impl ExclusionCatalog {
    pub fn new(entries: Vec<ExcludedFoodEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ExcludedFoodEntry] {
        &self.entries
    }

    /// Entries that apply to any of `diseases`.
    pub fn for_diseases<'a>(
        &'a self,
        diseases: &'a [Disease],
    ) -> impl Iterator<Item = &'a ExcludedFoodEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| diseases.contains(&e.disease))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
