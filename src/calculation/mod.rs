//! Calculation logic for the performance analytics engine.
//!
//! This module contains the working-days estimate, the four KPI calculators
//! (DCR compliance, call average, tour-program submission and expense
//! efficiency), the peer expense baseline, the weighted composite score and
//! ranking.

mod call_average;
mod composite;
mod dcr_compliance;
mod expense_efficiency;
mod peer_baseline;
mod ranking;
mod tp_submission;
mod working_days;

pub use call_average::{CallAverageResult, calculate_call_average, normalize_call_average};
pub use composite::{KpiScores, SCORE_DECIMAL_PLACES, score_representative, weighted_score};
pub use dcr_compliance::{DcrComplianceResult, calculate_dcr_compliance, compliance_percentage};
pub use expense_efficiency::{
    ExpenseEfficiencyResult, calculate_expense_efficiency, relative_efficiency,
};
pub use peer_baseline::{ExpenseActivity, PeerBaseline, load_expense_activity};
pub use ranking::rank_performances;
pub use tp_submission::{TpSubmissionResult, calculate_tp_submission, submission_score};
pub use working_days::{WorkingDaysResult, estimate_working_days, working_days_from_counts};

/// Converts a record count to `u32`, saturating at `u32::MAX`.
pub(crate) fn saturating_count(count: usize) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
