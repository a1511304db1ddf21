//! Working-days estimation.
//!
//! This module estimates how many business days a representative had
//! available in a period, net of holidays and approved leave. The estimate
//! is the denominator of DCR compliance.

use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, LeaveStatus, Period};
use crate::source::RecordSource;

/// The result of a working-days estimate, including the audit step.
#[derive(Debug, Clone)]
pub struct WorkingDaysResult {
    /// Estimated working days, never below 1.
    pub working_days: u32,
    /// Calendar days before deductions scaled by the weekday ratio.
    pub weekday_estimate: i64,
    /// Active holidays in the period.
    pub holiday_count: u32,
    /// Approved leave days overlapping the period.
    pub leave_days: i64,
    /// The audit step recording this estimate.
    pub audit_step: AuditStep,
}

/// Applies the weekday ratio and deductions, flooring the result at 1.
///
/// `working_days = max(1, floor(total_days * per_week / 7) - holidays - leave_days)`
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::working_days_from_counts;
///
/// // 30 calendar days: floor(30 * 5 / 7) = 21
/// assert_eq!(working_days_from_counts(30, 5, 0, 0), 21);
/// assert_eq!(working_days_from_counts(30, 5, 2, 3), 16);
///
/// // Deductions never push the estimate below one day
/// assert_eq!(working_days_from_counts(1, 5, 0, 0), 1);
/// assert_eq!(working_days_from_counts(14, 5, 1, 14), 1);
/// ```
pub fn working_days_from_counts(
    total_days: i64,
    working_days_per_week: u32,
    holiday_count: u32,
    leave_days: i64,
) -> u32 {
    let weekday_estimate = total_days * i64::from(working_days_per_week) / 7;
    let net = weekday_estimate - i64::from(holiday_count) - leave_days;
    u32::try_from(net.max(1)).unwrap_or(u32::MAX)
}

/// Estimates the working days of `user_id` in `period`.
///
/// The estimate is a weekday-density ratio over calendar days, not a literal
/// Monday-to-Friday count: `floor(days * 5/7)` with the default
/// configuration. Active holidays in the period and the overlap of each
/// approved leave with the period are then subtracted.
///
/// # Arguments
///
/// * `source` - The record store to query
/// * `user_id` - The representative
/// * `period` - The reporting period
/// * `config` - Supplies the weekday ratio numerator
/// * `step_number` - The step number for audit trail sequencing
pub fn estimate_working_days<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
    config: &ScoringConfig,
    step_number: u32,
) -> EngineResult<WorkingDaysResult> {
    let total_days = period.date_range_days();
    let holiday_count = source.active_holiday_count(period)?;

    let leave_days: i64 = source
        .leave_records(user_id, LeaveStatus::Approved, period)?
        .iter()
        .map(|leave| period.overlap_days(leave.start_date, leave.end_date))
        .sum();

    let per_week = config.working_days_per_week;
    let weekday_estimate = total_days * i64::from(per_week) / 7;
    let working_days = working_days_from_counts(total_days, per_week, holiday_count, leave_days);

    debug!(
        user_id = %user_id,
        total_days,
        holiday_count,
        leave_days,
        working_days,
        "Estimated working days"
    );

    let audit_step = AuditStep {
        step_number,
        rule_id: "working_days_estimate".to_string(),
        rule_name: "Working Days Estimate".to_string(),
        input: serde_json::json!({
            "period_start": period.start_date().to_string(),
            "period_end": period.end_date().to_string(),
            "total_days": total_days,
            "working_days_per_week": per_week,
            "holiday_count": holiday_count,
            "leave_days": leave_days
        }),
        output: serde_json::json!({
            "weekday_estimate": weekday_estimate,
            "working_days": working_days
        }),
        reasoning: format!(
            "floor({} days x {}/7) = {}, less {} holidays and {} leave days = {} working days",
            total_days, per_week, weekday_estimate, holiday_count, leave_days, working_days
        ),
    };

    Ok(WorkingDaysResult {
        working_days,
        weekday_estimate,
        holiday_count,
        leave_days,
        audit_step,
    })
}
