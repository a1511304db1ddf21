//! Performance result models for the Performance Analytics Engine.
//!
//! This module contains [`PerformanceResult`] and its associated structures
//! that capture the outputs of scoring a representative: the KPI breakdown,
//! raw counters and the audit trace explaining each value.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for one KPI rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag neutral fallbacks that produced a valid but
/// uninformative score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The audit trace for one representative's score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The four KPI values plus the raw counters they were derived from.
///
/// KPI values are rounded to two decimal places.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiResult {
    /// DCR compliance percentage (0-100).
    pub dcr_compliance: Decimal,
    /// Average calls per field-work day, not normalized.
    pub call_average: Decimal,
    /// Call average normalized against the daily target (0-100).
    pub call_average_normalized: Decimal,
    /// Tour-program submission score (0-100).
    pub tp_submission: Decimal,
    /// Expense efficiency score (0-100).
    pub expense_efficiency: Decimal,
    /// Total DCRs filed in the period.
    pub total_dcrs: u32,
    /// Estimated working days in the period.
    pub working_days: u32,
    /// DCRs with work type field work.
    pub field_work_days: u32,
    /// Doctor visits summed over field-work days.
    pub total_doctors_visited: u32,
    /// Chemist visits summed over field-work days.
    pub total_chemists_visited: u32,
    /// Sum of approved expense amounts.
    pub total_expense_amount: Decimal,
    /// Whether a tour program was submitted for any covered month.
    pub tp_submitted: bool,
}

/// The composite score for one representative.
///
/// `rank` is `None` until the result is ranked against others with
/// [`rank_performances`](crate::calculation::rank_performances).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceResult {
    /// The scored representative.
    pub user_id: String,
    /// Weighted composite score (0-100), rounded to two places.
    pub performance_score: Decimal,
    /// 1-based rank within the scored population.
    pub rank: Option<u32>,
    /// KPI breakdown.
    pub kpis: KpiResult,
    /// How each KPI was derived.
    pub audit_trace: AuditTrace,
}

impl PerformanceResult {
    /// Creates an unranked result with zeroed KPIs and an empty trace.
    pub fn unranked(user_id: impl Into<String>, performance_score: Decimal) -> Self {
        Self {
            user_id: user_id.into(),
            performance_score,
            rank: None,
            kpis: KpiResult::default(),
            audit_trace: AuditTrace::default(),
        }
    }
}

/// Aggregate statistics over a set of scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSummary {
    /// Mean score, rounded to two places.
    pub average: Decimal,
    /// Highest score.
    pub highest: Decimal,
    /// Lowest score.
    pub lowest: Decimal,
    /// `highest - lowest`.
    pub range: Decimal,
}

impl ScoreSummary {
    /// Summarizes `scores`, returning `None` when there are none.
    ///
    /// # Example
    ///
    /// ```
    /// use kpi_engine::models::ScoreSummary;
    /// use rust_decimal::Decimal;
    ///
    /// let scores = [Decimal::from(80), Decimal::from(60), Decimal::from(70)];
    /// let summary = ScoreSummary::from_scores(&scores).unwrap();
    /// assert_eq!(summary.average, Decimal::from(70));
    /// assert_eq!(summary.range, Decimal::from(20));
    /// ```
    pub fn from_scores(scores: &[Decimal]) -> Option<Self> {
        let highest = scores.iter().copied().max()?;
        let lowest = scores.iter().copied().min()?;
        let total: Decimal = scores.iter().sum();
        let average = (total / Decimal::from(scores.len())).round_dp(2);

        Some(Self {
            average,
            highest,
            lowest,
            range: highest - lowest,
        })
    }
}

/// A ranked performance report for a population of representatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Unique identifier for this report.
    pub report_id: Uuid,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// The version of the engine that produced the report.
    pub engine_version: String,
    /// Report period start date.
    pub period_start: NaiveDate,
    /// Report period end date.
    pub period_end: NaiveDate,
    /// Number of representatives scored.
    pub total_users: usize,
    /// Ranked results, best first.
    pub performances: Vec<PerformanceResult>,
    /// Statistics over the scores.
    pub summary: Option<ScoreSummary>,
}

/// A compact ranked entry for dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformer {
    /// The representative.
    pub user_id: String,
    /// Composite score.
    pub performance_score: Decimal,
    /// 1-based rank.
    pub rank: u32,
}
