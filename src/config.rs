//! TOML configuration for the planner and its logging.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::planner::PlannerOptions;
use crate::planner::constants::{BUDGET_WARNING_RATIO, SNACK_MAX_ATTEMPTS, SODIUM_CEILING_MG};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub planner: PlannerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Generator knobs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    #[serde(default = "default_snack_max_attempts")]
    pub snack_max_attempts: usize,

    #[serde(default = "default_sodium_ceiling_mg")]
    pub sodium_ceiling_mg: f64,

    #[serde(default = "default_budget_warning_ratio")]
    pub budget_warning_ratio: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            snack_max_attempts: default_snack_max_attempts(),
            sodium_ceiling_mg: default_sodium_ceiling_mg(),
            budget_warning_ratio: default_budget_warning_ratio(),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_snack_max_attempts() -> usize {
    SNACK_MAX_ATTEMPTS
}

fn default_sodium_ceiling_mg() -> f64 {
    SODIUM_CEILING_MG
}

fn default_budget_warning_ratio() -> f64 {
    BUDGET_WARNING_RATIO
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.options().validate()?;
        Ok(config)
    }

    /// Engine-facing options.
    pub fn options(&self) -> PlannerOptions {
        PlannerOptions {
            snack_max_attempts: self.planner.snack_max_attempts,
            sodium_ceiling_mg: self.planner.sodium_ceiling_mg,
            budget_warning_ratio: self.planner.budget_warning_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_planner_options() {
        assert_eq!(Config::default().options(), PlannerOptions::default());
        assert_eq!(Config::default().logging.level, "info");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[planner]\nsodium_ceiling_mg = 600.0\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.planner.sodium_ceiling_mg, 600.0);
        assert_eq!(config.planner.snack_max_attempts, SNACK_MAX_ATTEMPTS);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[planner]\nbudget_warning_ratio = 2.0").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, PlannerError::Config(_)));
    }

    #[test]
    fn test_missing_path_uses_defaults() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
