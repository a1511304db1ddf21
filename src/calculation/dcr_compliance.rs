//! DCR compliance calculation.
//!
//! Compliance measures how many daily call reports a representative filed
//! against the working days estimated for the period.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, Period};
use crate::source::RecordSource;

use super::saturating_count;
use super::working_days::estimate_working_days;

/// The result of a DCR compliance calculation.
#[derive(Debug, Clone)]
pub struct DcrComplianceResult {
    /// Compliance percentage in [0, 100], unrounded.
    pub compliance: Decimal,
    /// DCRs of any work type filed in the period.
    pub total_dcrs: u32,
    /// The estimated working days used as denominator.
    pub working_days: u32,
    /// Audit steps: the working-days estimate, then the compliance rule.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes `min(100, total_dcrs / working_days * 100)`.
///
/// Returns zero when `working_days` is zero.
///
/// # Examples
///
/// ```
/// use kpi_engine::calculation::compliance_percentage;
/// use rust_decimal::Decimal;
///
/// assert_eq!(compliance_percentage(5, 21).round_dp(2), Decimal::new(2381, 2));
/// assert_eq!(compliance_percentage(25, 21), Decimal::ONE_HUNDRED);
/// assert_eq!(compliance_percentage(3, 0), Decimal::ZERO);
/// ```
pub fn compliance_percentage(total_dcrs: u32, working_days: u32) -> Decimal {
    if working_days == 0 {
        return Decimal::ZERO;
    }

    let ratio = Decimal::from(total_dcrs) / Decimal::from(working_days) * Decimal::ONE_HUNDRED;
    ratio.min(Decimal::ONE_HUNDRED)
}

/// Calculates DCR compliance for `user_id` in `period`.
///
/// Every DCR counts regardless of work type. The percentage is capped at
/// 100 because the working-days estimate is approximate and a diligent
/// representative can out-file it.
///
/// # Arguments
///
/// * `source` - The record store to query
/// * `user_id` - The representative
/// * `period` - The reporting period
/// * `config` - Scoring configuration (weekday ratio)
/// * `step_number` - The first step number for audit trail sequencing
pub fn calculate_dcr_compliance<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
    config: &ScoringConfig,
    step_number: u32,
) -> EngineResult<DcrComplianceResult> {
    let total_dcrs = saturating_count(source.activity_records(user_id, period)?.len());
    let working = estimate_working_days(source, user_id, period, config, step_number)?;
    let working_days = working.working_days;

    let compliance = compliance_percentage(total_dcrs, working_days);
    let capped = working_days > 0 && total_dcrs >= working_days;

    debug!(
        user_id = %user_id,
        total_dcrs,
        working_days,
        compliance = %compliance.round_dp(2),
        "Calculated DCR compliance"
    );

    let reasoning = if working_days == 0 {
        "No working days in period; compliance is 0".to_string()
    } else if capped {
        format!(
            "{} DCRs filed against {} working days; capped at 100%",
            total_dcrs, working_days
        )
    } else {
        format!(
            "{} DCRs / {} working days x 100 = {}%",
            total_dcrs,
            working_days,
            compliance.round_dp(2)
        )
    };

    let compliance_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "dcr_compliance".to_string(),
        rule_name: "DCR Compliance".to_string(),
        input: serde_json::json!({
            "total_dcrs": total_dcrs,
            "working_days": working_days
        }),
        output: serde_json::json!({
            "compliance": compliance.round_dp(2).to_string(),
            "capped": capped
        }),
        reasoning,
    };

    Ok(DcrComplianceResult {
        compliance,
        total_dcrs,
        working_days,
        audit_steps: vec![working.audit_step, compliance_step],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityRecord, WorkType};
    use crate::source::InMemoryRecordSource;
    use chrono::{Duration, NaiveDate};
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

    fn source_with_dcrs(count: i64, work_type: WorkType) -> InMemoryRecordSource {
        (0..count).fold(InMemoryRecordSource::new(), |source, i| {
            source.with_activity(ActivityRecord::new(
                "mr_001",
                date(2026, 1, 1) + Duration::days(i),
                work_type,
            ))
        })
    }

    /// DC-001: 5 DCRs over 21 working days
    #[test]
    fn test_five_dcrs_over_thirty_days() {
        let source = source_with_dcrs(5, WorkType::FieldWork);
        let result =
            calculate_dcr_compliance(&source, "mr_001", &thirty_days(), &ScoringConfig::default(), 1)
                .unwrap();

        assert_eq!(result.total_dcrs, 5);
        assert_eq!(result.working_days, 21);
        assert_eq!(result.compliance.round_dp(2), dec("23.81"));
    }

    /// DC-002: every work type counts toward compliance
    #[test]
    fn test_all_work_types_count() {
        let source = InMemoryRecordSource::new()
            .with_activity(ActivityRecord::new("mr_001", date(2026, 1, 1), WorkType::FieldWork))
            .with_activity(ActivityRecord::new("mr_001", date(2026, 1, 2), WorkType::OfficeWork))
            .with_activity(ActivityRecord::new("mr_001", date(2026, 1, 3), WorkType::Leave))
            .with_activity(ActivityRecord::new("mr_001", date(2026, 1, 4), WorkType::Holiday));

        let result =
            calculate_dcr_compliance(&source, "mr_001", &thirty_days(), &ScoringConfig::default(), 1)
                .unwrap();

        assert_eq!(result.total_dcrs, 4);
    }

    /// DC-003: more DCRs than working days caps at 100
    #[test]
    fn test_compliance_capped_at_hundred() {
        let source = source_with_dcrs(30, WorkType::FieldWork);
        let result =
            calculate_dcr_compliance(&source, "mr_001", &thirty_days(), &ScoringConfig::default(), 1)
                .unwrap();

        assert_eq!(result.compliance, Decimal::ONE_HUNDRED);
        assert_eq!(result.audit_steps[1].output["capped"], true);
    }

    /// DC-004: exactly working_days DCRs is exactly 100
    #[test]
    fn test_compliance_exactly_hundred_at_working_days() {
        let source = source_with_dcrs(21, WorkType::OfficeWork);
        let result =
            calculate_dcr_compliance(&source, "mr_001", &thirty_days(), &ScoringConfig::default(), 1)
                .unwrap();

        assert_eq!(result.compliance, Decimal::ONE_HUNDRED);
    }

    /// DC-005: no DCRs is zero
    #[test]
    fn test_no_dcrs_is_zero() {
        let result = calculate_dcr_compliance(
            &InMemoryRecordSource::new(),
            "mr_001",
            &thirty_days(),
            &ScoringConfig::default(),
            1,
        )
        .unwrap();

        assert_eq!(result.total_dcrs, 0);
        assert_eq!(result.compliance, Decimal::ZERO);
    }

    #[test]
    fn test_audit_steps_are_sequenced() {
        let source = source_with_dcrs(5, WorkType::FieldWork);
        let result =
            calculate_dcr_compliance(&source, "mr_001", &thirty_days(), &ScoringConfig::default(), 4)
                .unwrap();

        assert_eq!(result.audit_steps.len(), 2);
        assert_eq!(result.audit_steps[0].rule_id, "working_days_estimate");
        assert_eq!(result.audit_steps[0].step_number, 4);
        assert_eq!(result.audit_steps[1].rule_id, "dcr_compliance");
        assert_eq!(result.audit_steps[1].step_number, 5);
        assert_eq!(result.audit_steps[1].output["compliance"], "23.81");
    }

    #[test]
    fn test_zero_working_days_helper_returns_zero() {
        assert_eq!(compliance_percentage(10, 0), Decimal::ZERO);
    }
}
