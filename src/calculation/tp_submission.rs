//! Tour-program submission scoring.
//!
//! A representative is expected to submit a tour program for every month
//! the period touches. The score is the share of those months covered.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{AuditStep, Period};
use crate::source::RecordSource;

use super::saturating_count;

/// The result of a tour-program submission calculation.
#[derive(Debug, Clone)]
pub struct TpSubmissionResult {
    /// Submission score in [0, 100], unrounded.
    pub score: Decimal,
    /// Whether any covered month has a submitted or approved program.
    pub any_submitted: bool,
    /// Covered months with a submitted or approved program.
    pub submitted_months: u32,
    /// Months touched by the period.
    pub total_months: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes `submitted / total * 100`, or zero when `total` is zero.
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::submission_score;
/// use rust_decimal::Decimal;
///
/// assert_eq!(submission_score(1, 1), Decimal::ONE_HUNDRED);
/// assert_eq!(submission_score(1, 2), Decimal::from(50));
/// assert_eq!(submission_score(0, 0), Decimal::ZERO);
/// ```
pub fn submission_score(submitted_months: u32, total_months: u32) -> Decimal {
    if total_months == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(submitted_months) / Decimal::from(total_months) * Decimal::ONE_HUNDRED
}

/// Calculates the tour-program submission score for `user_id` in `period`.
///
/// # Arguments
///
/// * `source` - The record store to query
/// * `user_id` - The representative
/// * `period` - The reporting period
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_tp_submission<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
    step_number: u32,
) -> EngineResult<TpSubmissionResult> {
    let months = period.months();

    let mut submitted = Vec::new();
    let mut missing = Vec::new();
    for &(year, month) in &months {
        let label = format!("{:04}-{:02}", year, month);
        if source.tour_submitted(user_id, year, month)? {
            submitted.push(label);
        } else {
            missing.push(label);
        }
    }

    let total_months = saturating_count(months.len());
    let submitted_months = saturating_count(submitted.len());
    let score = submission_score(submitted_months, total_months);
    let any_submitted = submitted_months > 0;

    debug!(
        user_id = %user_id,
        submitted_months,
        total_months,
        score = %score.round_dp(2),
        "Calculated tour-program submission"
    );

    let reasoning = if missing.is_empty() {
        format!("Tour program submitted for all {} covered months", total_months)
    } else {
        format!(
            "{} of {} months submitted; missing: {}",
            submitted_months,
            total_months,
            missing.join(", ")
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tp_submission".to_string(),
        rule_name: "Tour Program Submission".to_string(),
        input: serde_json::json!({
            "covered_months": months
                .iter()
                .map(|(y, m)| format!("{:04}-{:02}", y, m))
                .collect::<Vec<_>>()
        }),
        output: serde_json::json!({
            "submitted_months": submitted,
            "missing_months": missing,
            "score": score.round_dp(2).to_string()
        }),
        reasoning,
    };

    Ok(TpSubmissionResult {
        score,
        any_submitted,
        submitted_months,
        total_months,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TourStatus, TourSubmission};
    use crate::source::InMemoryRecordSource;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tour(year: i32, month: u32, status: TourStatus) -> TourSubmission {
        TourSubmission {
            user_id: "mr_001".to_string(),
            year,
            month,
            status,
        }
    }

    /// TP-001: sole month submitted
    #[test]
    fn test_single_month_submitted_is_hundred() {
        let source = InMemoryRecordSource::new().with_tour(tour(2026, 1, TourStatus::Submitted));
        let period = Period::new(date(2026, 1, 1), date(2026, 1, 30)).unwrap();

        let result = calculate_tp_submission(&source, "mr_001", &period, 1).unwrap();

        assert_eq!(result.score, Decimal::ONE_HUNDRED);
        assert!(result.any_submitted);
        assert_eq!(result.total_months, 1);
    }

    /// TP-002: one of two months submitted
    #[test]
    fn test_half_of_months_submitted() {
        let source = InMemoryRecordSource::new().with_tour(tour(2026, 2, TourStatus::Approved));
        let period = Period::new(date(2026, 1, 15), date(2026, 2, 14)).unwrap();

        let result = calculate_tp_submission(&source, "mr_001", &period, 1).unwrap();

        assert_eq!(result.score, Decimal::from(50));
        assert!(result.any_submitted);
        assert_eq!(result.audit_step.output["missing_months"][0], "2026-01");
    }

    /// TP-003: drafts and rejections do not count
    #[test]
    fn test_draft_and_rejected_do_not_count() {
        let source = InMemoryRecordSource::new()
            .with_tour(tour(2026, 1, TourStatus::Draft))
            .with_tour(tour(2026, 2, TourStatus::Rejected));
        let period = Period::new(date(2026, 1, 1), date(2026, 2, 28)).unwrap();

        let result = calculate_tp_submission(&source, "mr_001", &period, 1).unwrap();

        assert_eq!(result.score, Decimal::ZERO);
        assert!(!result.any_submitted);
    }

    /// TP-004: end month counted even when its day precedes the start day
    #[test]
    fn test_end_month_is_covered() {
        let source = InMemoryRecordSource::new()
            .with_tour(tour(2026, 1, TourStatus::Submitted))
            .with_tour(tour(2026, 2, TourStatus::Submitted));
        let period = Period::new(date(2026, 1, 20), date(2026, 3, 5)).unwrap();

        let result = calculate_tp_submission(&source, "mr_001", &period, 1).unwrap();

        assert_eq!(result.total_months, 3);
        assert_eq!(result.submitted_months, 2);
        assert_eq!(result.score.round_dp(2), Decimal::new(6667, 2));
    }

    #[test]
    fn test_all_months_submitted_reasoning() {
        let source = InMemoryRecordSource::new()
            .with_tour(tour(2025, 12, TourStatus::Approved))
            .with_tour(tour(2026, 1, TourStatus::Submitted));
        let period = Period::new(date(2025, 12, 10), date(2026, 1, 9)).unwrap();

        let result = calculate_tp_submission(&source, "mr_001", &period, 1).unwrap();

        assert_eq!(result.score, Decimal::ONE_HUNDRED);
        assert!(result.audit_step.reasoning.contains("all 2 covered months"));
    }
}
