//! Configuration types for performance scoring.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from `scoring.yaml`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Weights applied to the four normalized KPIs in the composite score.
///
/// The weights must sum to exactly 1.0 so that a composite of KPIs each
/// within [0, 100] stays within [0, 100].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiWeights {
    /// Weight of DCR compliance.
    pub dcr_compliance: Decimal,
    /// Weight of the normalized call average.
    pub call_average: Decimal,
    /// Weight of tour-program submission.
    pub tp_submission: Decimal,
    /// Weight of expense efficiency.
    pub expense_efficiency: Decimal,
}

impl KpiWeights {
    /// Returns the sum of all four weights.
    pub fn total(&self) -> Decimal {
        self.dcr_compliance + self.call_average + self.tp_submission + self.expense_efficiency
    }
}

impl Default for KpiWeights {
    fn default() -> Self {
        Self {
            dcr_compliance: Decimal::new(4, 1),
            call_average: Decimal::new(3, 1),
            tp_submission: Decimal::new(1, 1),
            expense_efficiency: Decimal::new(2, 1),
        }
    }
}

/// The complete scoring configuration.
///
/// `ScoringConfig::default()` reproduces the fixed constants of the scoring
/// model; a YAML file may override any of them.
///
/// # Example
///
/// ```
/// use kpi_engine::config::ScoringConfig;
/// use rust_decimal::Decimal;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.weights.total(), Decimal::ONE);
/// assert_eq!(config.call_target_per_day, Decimal::from(6));
/// assert_eq!(config.working_days_per_week, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Composite weights.
    #[serde(default)]
    pub weights: KpiWeights,
    /// Calls per field day that earn a full 100 on the call KPI.
    #[serde(default = "default_call_target")]
    pub call_target_per_day: Decimal,
    /// Numerator of the weekday ratio applied to calendar days (`n / 7`).
    #[serde(default = "default_working_days_per_week")]
    pub working_days_per_week: u32,
    /// Expense score when there is nothing to normalize against.
    #[serde(default = "default_neutral_expense_score")]
    pub neutral_expense_score: Decimal,
    /// Expense score when the highest peer average is zero.
    #[serde(default = "default_idle_peer_expense_score")]
    pub idle_peer_expense_score: Decimal,
}

fn default_call_target() -> Decimal {
    Decimal::from(6)
}

fn default_working_days_per_week() -> u32 {
    5
}

fn default_neutral_expense_score() -> Decimal {
    Decimal::from(50)
}

fn default_idle_peer_expense_score() -> Decimal {
    Decimal::ONE_HUNDRED
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: KpiWeights::default(),
            call_target_per_day: default_call_target(),
            working_days_per_week: default_working_days_per_week(),
            neutral_expense_score: default_neutral_expense_score(),
            idle_peer_expense_score: default_idle_peer_expense_score(),
        }
    }
}

/// Top-level layout of `scoring.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ScoringFile {
    pub scoring: ScoringConfig,
}
