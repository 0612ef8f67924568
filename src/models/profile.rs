use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// Age below which the growth-weighted meal split and child portions apply.
pub const MINOR_AGE_LIMIT: u32 = 19;

/// Disease codes the planner has rules for.
///
/// Unknown codes are kept as `Other` so catalog entries keyed by them still
/// match; they simply carry no built-in nutrient rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Disease {
    Diabetes,
    Hypertension,
    Hyperlipidemia,
    KidneyDisease,
    CardiovascularDisease,
    Gout,
    GastrointestinalDisorder,
    Other(String),
}

impl Disease {
    /// All diseases with built-in rules.
    pub const KNOWN: [Disease; 7] = [
        Disease::Diabetes,
        Disease::Hypertension,
        Disease::Hyperlipidemia,
        Disease::KidneyDisease,
        Disease::CardiovascularDisease,
        Disease::Gout,
        Disease::GastrointestinalDisorder,
    ];

    /// Canonical code used in files and catalog entries.
    pub fn code(&self) -> &str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::Hypertension => "hypertension",
            Disease::Hyperlipidemia => "hyperlipidemia",
            Disease::KidneyDisease => "kidney_disease",
            Disease::CardiovascularDisease => "cardiovascular_disease",
            Disease::Gout => "gout",
            Disease::GastrointestinalDisorder => "gastrointestinal_disorder",
            Disease::Other(code) => code,
        }
    }

    /// Parse a code or a common Korean/English name.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "diabetes" | "당뇨" | "당뇨병" => Disease::Diabetes,
            "hypertension" | "고혈압" => Disease::Hypertension,
            "hyperlipidemia" | "dyslipidemia" | "고지혈증" | "이상지질혈증" => {
                Disease::Hyperlipidemia
            }
            "kidney_disease" | "ckd" | "chronic_kidney_disease" | "신장질환" | "신장병"
            | "만성신장병" => Disease::KidneyDisease,
            "cardiovascular_disease" | "heart_disease" | "심혈관질환" | "심장질환" => {
                Disease::CardiovascularDisease
            }
            "gout" | "통풍" => Disease::Gout,
            "gastrointestinal_disorder" | "gi_disorder" | "ibs" | "위장질환" | "과민성대장증후군"
            | "위염" => Disease::GastrointestinalDisorder,
            _ => Disease::Other(normalized),
        }
    }
}

impl From<String> for Disease {
    fn from(raw: String) -> Self {
        Disease::parse(&raw)
    }
}

impl From<Disease> for String {
    fn from(disease: Disease) -> Self {
        disease.code().to_string()
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The user's health profile for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    #[serde(default)]
    pub diseases: Vec<Disease>,

    #[serde(default)]
    pub allergies: Vec<String>,

    pub age: u32,

    pub daily_calorie_goal: f64,

    /// Preferred ingredient keywords.
    #[serde(default)]
    pub dietary_preferences: Vec<String>,

    #[serde(default)]
    pub disliked_ingredients: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pregnancy_trimester: Option<u8>,
}

impl HealthProfile {
    pub fn has(&self, disease: &Disease) -> bool {
        self.diseases.contains(disease)
    }

    pub fn has_any(&self, diseases: &[Disease]) -> bool {
        diseases.iter().any(|d| self.has(d))
    }

    pub fn is_minor(&self) -> bool {
        self.age < MINOR_AGE_LIMIT
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy_trimester.is_some()
    }

    /// Check the record before it reaches the planner.
    pub fn validate(&self) -> Result<()> {
        if !self.daily_calorie_goal.is_finite() || self.daily_calorie_goal <= 0.0 {
            return Err(PlannerError::InvalidInput(format!(
                "daily calorie goal must be positive, got {}",
                self.daily_calorie_goal
            )));
        }
        if let Some(trimester) = self.pregnancy_trimester {
            if !(1..=3).contains(&trimester) {
                return Err(PlannerError::InvalidInput(format!(
                    "pregnancy trimester must be 1-3, got {}",
                    trimester
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_korean_and_english_names() {
        assert_eq!(Disease::parse("당뇨병"), Disease::Diabetes);
        assert_eq!(Disease::parse("Kidney Disease"), Disease::KidneyDisease);
        assert_eq!(Disease::parse("heart-disease"), Disease::CardiovascularDisease);
        assert_eq!(
            Disease::parse("celiac"),
            Disease::Other("celiac".to_string())
        );
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = r#"{"diseases": ["고혈압", "gout"], "age": 40, "daily_calorie_goal": 2000}"#;
        let profile: HealthProfile = serde_json::from_str(json).unwrap();
        assert_eq!(
            profile.diseases,
            vec![Disease::Hypertension, Disease::Gout]
        );

        let out = serde_json::to_string(&profile).unwrap();
        assert!(out.contains("\"hypertension\""));
    }

    #[test]
    fn test_validate() {
        let mut profile = HealthProfile {
            age: 30,
            daily_calorie_goal: 1800.0,
            ..Default::default()
        };
        assert!(profile.validate().is_ok());

        profile.pregnancy_trimester = Some(4);
        assert!(profile.validate().is_err());

        profile.pregnancy_trimester = Some(2);
        profile.daily_calorie_goal = 0.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_minor_boundary() {
        let mut profile = HealthProfile {
            age: 18,
            daily_calorie_goal: 2000.0,
            ..Default::default()
        };
        assert!(profile.is_minor());
        profile.age = 19;
        assert!(!profile.is_minor());
    }
}
