//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the scoring
//! configuration from a YAML file and validating its invariants.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{ScoringConfig, ScoringFile};

/// File name looked up inside the configuration directory.
pub const SCORING_FILE_NAME: &str = "scoring.yaml";

/// Loads and validates the scoring configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── scoring.yaml   # Weights, call target and sentinel scores
/// ```
///
/// # Example
///
/// ```no_run
/// use kpi_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Call target: {}", loader.config().call_target_per_day);
/// # Ok::<(), kpi_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ScoringConfig,
}

impl ConfigLoader {
    /// Loads configuration from `scoring.yaml` in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML (`ConfigParseError`)
    /// - A value violates a scoring invariant (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file_path = path.as_ref().join(SCORING_FILE_NAME);
        let path_str = file_path.display().to_string();

        let content = fs::read_to_string(&file_path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from an inline YAML document.
    ///
    /// # Example
    ///
    /// ```
    /// use kpi_engine::config::ConfigLoader;
    /// use rust_decimal::Decimal;
    ///
    /// let yaml = r#"
    /// scoring:
    ///   call_target_per_day: "8"
    /// "#;
    /// let loader = ConfigLoader::from_yaml_str(yaml).unwrap();
    /// assert_eq!(loader.config().call_target_per_day, Decimal::from(8));
    /// ```
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        Self::parse(yaml, "<inline>")
    }

    fn parse(content: &str, path: &str) -> EngineResult<Self> {
        let file: ScoringFile =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        validate(&file.scoring)?;
        Ok(Self {
            config: file.scoring,
        })
    }

    /// Returns the validated scoring configuration.
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ScoringConfig {
        self.config
    }
}

/// Checks every invariant the scorer relies on.
pub fn validate(config: &ScoringConfig) -> EngineResult<()> {
    let weights = &config.weights;
    let all = [
        ("weights.dcr_compliance", weights.dcr_compliance),
        ("weights.call_average", weights.call_average),
        ("weights.tp_submission", weights.tp_submission),
        ("weights.expense_efficiency", weights.expense_efficiency),
    ];
    for (field, weight) in all {
        if weight.is_sign_negative() {
            return Err(invalid(field, format!("must not be negative, got {}", weight)));
        }
    }

    let total = weights.total();
    if total != Decimal::ONE {
        return Err(invalid("weights", format!("must sum to 1.0, got {}", total)));
    }

    if config.call_target_per_day <= Decimal::ZERO {
        return Err(invalid(
            "call_target_per_day",
            format!("must be positive, got {}", config.call_target_per_day),
        ));
    }

    if !(1..=7).contains(&config.working_days_per_week) {
        return Err(invalid(
            "working_days_per_week",
            format!("must be between 1 and 7, got {}", config.working_days_per_week),
        ));
    }

    for (field, score) in [
        ("neutral_expense_score", config.neutral_expense_score),
        ("idle_peer_expense_score", config.idle_peer_expense_score),
    ] {
        if score < Decimal::ZERO || score > Decimal::ONE_HUNDRED {
            return Err(invalid(field, format!("must be within 0-100, got {}", score)));
        }
    }

    Ok(())
}

fn invalid(field: &str, message: String) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message,
    }
}
