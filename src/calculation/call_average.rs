//! Call average calculation.
//!
//! This module computes the average number of calls (doctor plus chemist
//! visits) per field-work day, and its normalization against the daily
//! call target.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{AuditStep, Period};
use crate::source::RecordSource;

use super::saturating_count;

/// The result of a call average calculation.
#[derive(Debug, Clone)]
pub struct CallAverageResult {
    /// Calls per field-work day, unrounded and not normalized.
    pub call_average: Decimal,
    /// Number of field-work DCRs.
    pub field_work_days: u32,
    /// Doctor visits summed over field-work days.
    pub total_doctors: u32,
    /// Chemist visits summed over field-work days.
    pub total_chemists: u32,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Normalizes a call average to 0-100 against `target` calls per day.
///
/// Zero or negative averages normalize to zero; anything at or above the
/// target normalizes to 100.
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::normalize_call_average;
/// use rust_decimal::Decimal;
///
/// let target = Decimal::from(6);
/// assert_eq!(normalize_call_average(Decimal::from(2), target).round_dp(2), Decimal::new(3333, 2));
/// assert_eq!(normalize_call_average(Decimal::from(9), target), Decimal::ONE_HUNDRED);
/// assert_eq!(normalize_call_average(Decimal::ZERO, target), Decimal::ZERO);
/// ```
pub fn normalize_call_average(call_average: Decimal, target: Decimal) -> Decimal {
    if call_average <= Decimal::ZERO || target <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (call_average / target * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
}

/// Calculates calls per field-work day for `user_id` in `period`.
///
/// Only field-work DCRs contribute. Visits are counted per report, so the
/// same doctor seen on two different days counts twice. When there are no
/// field-work days the average is exactly zero.
///
/// # Arguments
///
/// * `source` - The record store to query
/// * `user_id` - The representative
/// * `period` - The reporting period
/// * `step_number` - The step number for audit trail sequencing
pub fn calculate_call_average<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
    step_number: u32,
) -> EngineResult<CallAverageResult> {
    let records = source.activity_records(user_id, period)?;

    let (field_work_days, total_doctors, total_chemists) = records
        .iter()
        .filter(|r| r.is_field_work())
        .fold((0u32, 0u32, 0u32), |(days, doctors, chemists), r| {
            (
                days.saturating_add(1),
                doctors.saturating_add(saturating_count(r.visited_doctor_ids.len())),
                chemists.saturating_add(saturating_count(r.visited_chemist_ids.len())),
            )
        });

    let total_calls = total_doctors.saturating_add(total_chemists);
    let call_average = if field_work_days > 0 {
        Decimal::from(total_calls) / Decimal::from(field_work_days)
    } else {
        Decimal::ZERO
    };

    debug!(
        user_id = %user_id,
        field_work_days,
        total_doctors,
        total_chemists,
        call_average = %call_average.round_dp(2),
        "Calculated call average"
    );

    let reasoning = if field_work_days == 0 {
        "No field-work days in period; call average is 0".to_string()
    } else {
        format!(
            "({} doctor + {} chemist visits) / {} field-work days = {} calls/day",
            total_doctors,
            total_chemists,
            field_work_days,
            call_average.round_dp(2)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "call_average".to_string(),
        rule_name: "Call Average".to_string(),
        input: serde_json::json!({
            "field_work_days": field_work_days,
            "total_doctors": total_doctors,
            "total_chemists": total_chemists
        }),
        output: serde_json::json!({
            "total_calls": total_calls,
            "call_average": call_average.round_dp(2).to_string()
        }),
        reasoning,
    };

    Ok(CallAverageResult {
        call_average,
        field_work_days,
        total_doctors,
        total_chemists,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityRecord, WorkType};
    use crate::source::InMemoryRecordSource;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn thirty_days() -> Period {
        Period::new(date(2026, 1, 1), date(2026, 1, 30)).unwrap()
    }

    /// CA-001: one doctor and one chemist on one field day
    #[test]
    fn test_one_doctor_one_chemist_is_two_calls() {
        let source = InMemoryRecordSource::new().with_activity(
            ActivityRecord::new("mr_001", date(2026, 1, 2), WorkType::FieldWork)
                .with_doctors(["doc_1"])
                .with_chemists(["chem_1"]),
        );

        let result = calculate_call_average(&source, "mr_001", &thirty_days(), 1).unwrap();

        assert_eq!(result.field_work_days, 1);
        assert_eq!(result.total_doctors, 1);
        assert_eq!(result.total_chemists, 1);
        assert_eq!(result.call_average, dec("2"));
        assert_eq!(
            normalize_call_average(result.call_average, dec("6")).round_dp(2),
            dec("33.33")
        );
    }

    /// CA-002: repeat visits across days are not deduplicated
    #[test]
    fn test_same_doctor_on_two_days_counts_twice() {
        let source = InMemoryRecordSource::new()
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 2), WorkType::FieldWork)
                    .with_doctors(["doc_1"]),
            )
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 3), WorkType::FieldWork)
                    .with_doctors(["doc_1"]),
            );

        let result = calculate_call_average(&source, "mr_001", &thirty_days(), 1).unwrap();

        assert_eq!(result.total_doctors, 2);
        assert_eq!(result.call_average, dec("1"));
    }

    /// CA-003: non-field DCRs are ignored even if they list visits
    #[test]
    fn test_non_field_work_records_are_ignored() {
        let source = InMemoryRecordSource::new()
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 2), WorkType::OfficeWork)
                    .with_doctors(["doc_1", "doc_2"]),
            )
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 3), WorkType::FieldWork)
                    .with_doctors(["doc_3", "doc_4", "doc_5"])
                    .with_chemists(["chem_1"]),
            );

        let result = calculate_call_average(&source, "mr_001", &thirty_days(), 1).unwrap();

        assert_eq!(result.field_work_days, 1);
        assert_eq!(result.total_doctors, 3);
        assert_eq!(result.call_average, dec("4"));
    }

    /// CA-004: no field work gives exactly zero
    #[test]
    fn test_no_field_work_is_zero() {
        let source = InMemoryRecordSource::new()
            .with_activity(ActivityRecord::new("mr_001", date(2026, 1, 2), WorkType::Leave));

        let result = calculate_call_average(&source, "mr_001", &thirty_days(), 1).unwrap();

        assert_eq!(result.field_work_days, 0);
        assert_eq!(result.call_average, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("No field-work days"));
    }

    #[test]
    fn test_fractional_average() {
        let source = InMemoryRecordSource::new()
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 2), WorkType::FieldWork)
                    .with_doctors(["d1", "d2", "d3", "d4"]),
            )
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 3), WorkType::FieldWork)
                    .with_doctors(["d1"]),
            )
            .with_activity(
                ActivityRecord::new("mr_001", date(2026, 1, 4), WorkType::FieldWork)
                    .with_chemists(["c1", "c2"]),
            );

        let result = calculate_call_average(&source, "mr_001", &thirty_days(), 1).unwrap();

        assert_eq!(result.call_average.round_dp(2), dec("2.33"));
        assert_eq!(result.audit_step.output["total_calls"], 7);
    }

    #[test]
    fn test_normalization_caps_at_hundred() {
        assert_eq!(
            normalize_call_average(dec("12.5"), dec("6")),
            Decimal::ONE_HUNDRED
        );
        assert_eq!(normalize_call_average(dec("6"), dec("6")), Decimal::ONE_HUNDRED);
    }
}
