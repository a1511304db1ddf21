//! Core data models for the Performance Analytics Engine.
//!
//! This module contains the reporting period, the read-only projections of
//! external records, and the computed result types.

mod performance;
mod period;
mod records;

pub use performance::{
    AuditStep, AuditTrace, AuditWarning, KpiResult, PerformanceReport, PerformanceResult,
    ScoreSummary, TopPerformer,
};
pub use period::{DEFAULT_TRAILING_DAYS, Period};
pub use records::{
    ActivityRecord, ExpenseRecord, ExpenseStatus, HolidayRecord, LeaveRecord, LeaveStatus,
    Representative, TourStatus, TourSubmission, WorkType,
};
