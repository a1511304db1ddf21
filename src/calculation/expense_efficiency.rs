//! Expense efficiency calculation.
//!
//! Lower approved spend per field-work day, relative to the highest-spending
//! peer, earns a higher score. Missing data degrades to sentinel scores
//! rather than errors.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::ScoringConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, AuditWarning, Period};
use crate::source::RecordSource;

use super::peer_baseline::{PeerBaseline, load_expense_activity};

/// The result of an expense efficiency calculation.
#[derive(Debug, Clone)]
pub struct ExpenseEfficiencyResult {
    /// Efficiency score in [0, 100], unrounded.
    pub efficiency: Decimal,
    /// Sum of approved expense amounts in the period.
    pub total_approved_amount: Decimal,
    /// Field-work days used as the per-day denominator.
    pub field_work_days: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Present when a sentinel score was used.
    pub warning: Option<AuditWarning>,
}

/// Scores `user_average` against the highest peer average.
///
/// `max(0, (1 - user_average / max_peer_average) * 100)`; when the highest
/// peer average is zero or negative, `idle_score` is returned instead.
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::relative_efficiency;
/// use rust_decimal::Decimal;
///
/// let idle = Decimal::ONE_HUNDRED;
/// assert_eq!(relative_efficiency(Decimal::from(400), Decimal::from(800), idle), Decimal::from(50));
/// assert_eq!(relative_efficiency(Decimal::ZERO, Decimal::from(800), idle), Decimal::ONE_HUNDRED);
/// assert_eq!(relative_efficiency(Decimal::from(900), Decimal::from(800), idle), Decimal::ZERO);
/// assert_eq!(relative_efficiency(Decimal::ZERO, Decimal::ZERO, idle), idle);
/// assert_eq!(relative_efficiency(Decimal::from(-100), Decimal::from(-50), idle), idle);
/// ```
pub fn relative_efficiency(
    user_average: Decimal,
    max_peer_average: Decimal,
    idle_score: Decimal,
) -> Decimal {
    if max_peer_average <= Decimal::ZERO {
        return idle_score;
    }

    let score = (Decimal::ONE - user_average / max_peer_average) * Decimal::ONE_HUNDRED;
    score.max(Decimal::ZERO).min(Decimal::ONE_HUNDRED)
}

/// Calculates expense efficiency for `user_id` against `baseline`.
///
/// # Arguments
///
/// * `source` - The record store to query
/// * `user_id` - The representative
/// * `period` - The reporting period
/// * `baseline` - Precomputed peer averages for the same period
/// * `config` - Supplies the neutral and idle-peer sentinel scores
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// - `neutral_expense_score` (50) when the user has no field-work days
/// - `neutral_expense_score` when no peer has field-work days
/// - `idle_peer_expense_score` (100) when the highest peer average is zero
/// - the relative score otherwise
pub fn calculate_expense_efficiency<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
    baseline: &PeerBaseline,
    config: &ScoringConfig,
    step_number: u32,
) -> EngineResult<ExpenseEfficiencyResult> {
    let activity = load_expense_activity(source, user_id, period)?;
    let approved = activity.approved_total;

    let step = |output: serde_json::Value, reasoning: String| AuditStep {
        step_number,
        rule_id: "expense_efficiency".to_string(),
        rule_name: "Expense Efficiency".to_string(),
        input: serde_json::json!({
            "field_work_days": activity.field_work_days,
            "total_approved_amount": approved.to_string(),
            "peers_with_field_work": baseline.len()
        }),
        output,
        reasoning,
    };

    let Some(user_average) = activity.average_per_field_day() else {
        warn!(user_id = %user_id, "No field-work days; using neutral expense score");
        let efficiency = config.neutral_expense_score;
        return Ok(ExpenseEfficiencyResult {
            efficiency,
            total_approved_amount: approved,
            field_work_days: 0,
            audit_step: step(
                serde_json::json!({ "efficiency": efficiency.to_string() }),
                format!(
                    "No field-work days to normalize against; neutral score {}",
                    efficiency
                ),
            ),
            warning: Some(AuditWarning::new(
                "NO_FIELD_WORK",
                "No field-work days in period; expense efficiency is neutral",
                "low",
            )),
        });
    };

    let Some(max_peer_average) = baseline.max_average() else {
        warn!(user_id = %user_id, "Empty peer baseline; using neutral expense score");
        let efficiency = config.neutral_expense_score;
        return Ok(ExpenseEfficiencyResult {
            efficiency,
            total_approved_amount: approved,
            field_work_days: activity.field_work_days,
            audit_step: step(
                serde_json::json!({
                    "user_average": user_average.round_dp(2).to_string(),
                    "efficiency": efficiency.to_string()
                }),
                format!(
                    "No peer has field-work days; neutral score {}",
                    efficiency
                ),
            ),
            warning: Some(AuditWarning::new(
                "EMPTY_PEER_BASELINE",
                "No peer has field-work days; expense efficiency is neutral",
                "medium",
            )),
        });
    };

    let efficiency =
        relative_efficiency(user_average, max_peer_average, config.idle_peer_expense_score);

    debug!(
        user_id = %user_id,
        user_average = %user_average.round_dp(2),
        max_peer_average = %max_peer_average.round_dp(2),
        efficiency = %efficiency.round_dp(2),
        "Calculated expense efficiency"
    );

    let (reasoning, warning) = if max_peer_average <= Decimal::ZERO {
        (
            format!(
                "No peer has approved spend; score {}",
                config.idle_peer_expense_score
            ),
            Some(AuditWarning::new(
                "IDLE_PEER_GROUP",
                "Highest peer spend per field day is not positive",
                "low",
            )),
        )
    } else {
        (
            format!(
                "(1 - {} / {}) x 100 = {}",
                user_average.round_dp(2),
                max_peer_average.round_dp(2),
                efficiency.round_dp(2)
            ),
            None,
        )
    };

    Ok(ExpenseEfficiencyResult {
        efficiency,
        total_approved_amount: approved,
        field_work_days: activity.field_work_days,
        audit_step: step(
            serde_json::json!({
                "user_average": user_average.round_dp(2).to_string(),
                "max_peer_average": max_peer_average.round_dp(2).to_string(),
                "efficiency": efficiency.round_dp(2).to_string()
            }),
            reasoning,
        ),
        warning,
    })
}
