//! Composite performance scoring.
//!
//! This module runs the four KPI calculators for one representative,
//! normalizes the call average, and combines the KPIs with the configured
//! weights into a single 0-100 score.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{KpiWeights, ScoringConfig};
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, KpiResult, Period, PerformanceResult};
use crate::source::RecordSource;

use super::call_average::{calculate_call_average, normalize_call_average};
use super::dcr_compliance::calculate_dcr_compliance;
use super::expense_efficiency::calculate_expense_efficiency;
use super::peer_baseline::PeerBaseline;
use super::tp_submission::calculate_tp_submission;

/// Decimal places kept on the composite score and every KPI value.
pub const SCORE_DECIMAL_PLACES: u32 = 2;

/// The four normalized KPI values that feed the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiScores {
    /// DCR compliance (0-100).
    pub dcr_compliance: Decimal,
    /// Normalized call average (0-100).
    pub call_average_normalized: Decimal,
    /// Tour-program submission (0-100).
    pub tp_submission: Decimal,
    /// Expense efficiency (0-100).
    pub expense_efficiency: Decimal,
}

/// Combines normalized KPIs with `weights`.
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::{KpiScores, weighted_score};
/// use kpi_engine::config::KpiWeights;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let scores = KpiScores {
///     dcr_compliance: Decimal::from_str("23.81").unwrap(),
///     call_average_normalized: Decimal::from_str("33.33").unwrap(),
///     tp_submission: Decimal::ONE_HUNDRED,
///     expense_efficiency: Decimal::from(50),
/// };
/// let score = weighted_score(&scores, &KpiWeights::default());
/// assert_eq!(score.round_dp(2), Decimal::from_str("39.52").unwrap());
/// ```
pub fn weighted_score(scores: &KpiScores, weights: &KpiWeights) -> Decimal {
    scores.dcr_compliance * weights.dcr_compliance
        + scores.call_average_normalized * weights.call_average
        + scores.tp_submission * weights.tp_submission
        + scores.expense_efficiency * weights.expense_efficiency
}

/// Scores one representative against a precomputed peer baseline.
///
/// Every KPI is computed from unrounded inputs; the composite is taken over
/// the unrounded KPIs, then the composite and each KPI are rounded to two
/// places (banker's rounding). All raw counters are embedded in the result,
/// and the audit trace records one step per rule.
///
/// # Arguments
///
/// * `source` - The record store to query
/// * `user_id` - The representative
/// * `period` - The reporting period
/// * `baseline` - Peer expense averages for the same period
/// * `config` - Weights, call target and sentinel scores
pub fn score_representative<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
    baseline: &PeerBaseline,
    config: &ScoringConfig,
) -> EngineResult<PerformanceResult> {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings = Vec::new();

    let compliance = calculate_dcr_compliance(source, user_id, period, config, 1)?;
    let mut step_number = compliance.audit_steps.last().map_or(1, |s| s.step_number + 1);
    steps.extend(compliance.audit_steps);

    let calls = calculate_call_average(source, user_id, period, step_number)?;
    steps.push(calls.audit_step);
    step_number += 1;

    let tp = calculate_tp_submission(source, user_id, period, step_number)?;
    steps.push(tp.audit_step);
    step_number += 1;

    let expense =
        calculate_expense_efficiency(source, user_id, period, baseline, config, step_number)?;
    steps.push(expense.audit_step);
    warnings.extend(expense.warning);
    step_number += 1;

    let scores = KpiScores {
        dcr_compliance: compliance.compliance,
        call_average_normalized: normalize_call_average(
            calls.call_average,
            config.call_target_per_day,
        ),
        tp_submission: tp.score,
        expense_efficiency: expense.efficiency,
    };
    let composite = weighted_score(&scores, &config.weights);
    let performance_score = composite.round_dp(SCORE_DECIMAL_PLACES);

    let weights = &config.weights;
    steps.push(AuditStep {
        step_number,
        rule_id: "composite_score".to_string(),
        rule_name: "Weighted Composite Score".to_string(),
        input: serde_json::json!({
            "dcr_compliance": scores.dcr_compliance.round_dp(SCORE_DECIMAL_PLACES).to_string(),
            "call_average_normalized": scores.call_average_normalized.round_dp(SCORE_DECIMAL_PLACES).to_string(),
            "tp_submission": scores.tp_submission.round_dp(SCORE_DECIMAL_PLACES).to_string(),
            "expense_efficiency": scores.expense_efficiency.round_dp(SCORE_DECIMAL_PLACES).to_string(),
            "weights": {
                "dcr_compliance": weights.dcr_compliance.to_string(),
                "call_average": weights.call_average.to_string(),
                "tp_submission": weights.tp_submission.to_string(),
                "expense_efficiency": weights.expense_efficiency.to_string()
            }
        }),
        output: serde_json::json!({
            "performance_score": performance_score.to_string()
        }),
        reasoning: format!(
            "{} x {} + {} x {} + {} x {} + {} x {} = {}",
            scores.dcr_compliance.round_dp(SCORE_DECIMAL_PLACES),
            weights.dcr_compliance,
            scores.call_average_normalized.round_dp(SCORE_DECIMAL_PLACES),
            weights.call_average,
            scores.tp_submission.round_dp(SCORE_DECIMAL_PLACES),
            weights.tp_submission,
            scores.expense_efficiency.round_dp(SCORE_DECIMAL_PLACES),
            weights.expense_efficiency,
            performance_score
        ),
    });

    debug!(
        user_id = %user_id,
        performance_score = %performance_score,
        "Scored representative"
    );

    Ok(PerformanceResult {
        user_id: user_id.to_string(),
        performance_score,
        rank: None,
        kpis: KpiResult {
            dcr_compliance: scores.dcr_compliance.round_dp(SCORE_DECIMAL_PLACES),
            call_average: calls.call_average.round_dp(SCORE_DECIMAL_PLACES),
            call_average_normalized: scores
                .call_average_normalized
                .round_dp(SCORE_DECIMAL_PLACES),
            tp_submission: scores.tp_submission.round_dp(SCORE_DECIMAL_PLACES),
            expense_efficiency: scores.expense_efficiency.round_dp(SCORE_DECIMAL_PLACES),
            total_dcrs: compliance.total_dcrs,
            working_days: compliance.working_days,
            field_work_days: calls.field_work_days,
            total_doctors_visited: calls.total_doctors,
            total_chemists_visited: calls.total_chemists,
            total_expense_amount: expense.total_approved_amount,
            tp_submitted: tp.any_submitted,
        },
        audit_trace: AuditTrace { steps, warnings },
    })
}
