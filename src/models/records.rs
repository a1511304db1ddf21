//! Read-only projections of the external records the engine consumes.
//!
//! The engine never owns or mutates these; they are produced by a
//! [`RecordSource`](crate::source::RecordSource) for a given user and period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of day a daily call report records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    /// The representative visited doctors and chemists.
    FieldWork,
    /// Office-bound work.
    OfficeWork,
    /// The representative was on leave.
    Leave,
    /// A holiday was logged.
    Holiday,
}

/// A daily call report (DCR).
///
/// Visited doctors and chemists are two separate typed sets, so counting
/// calls never needs to inspect what kind of contact an id refers to.
///
/// # Example
///
/// ```
/// use kpi_engine::models::{ActivityRecord, WorkType};
/// use chrono::NaiveDate;
///
/// let record = ActivityRecord::new("mr_001", NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(), WorkType::FieldWork)
///     .with_doctors(["doc_1", "doc_2"])
///     .with_chemists(["chem_1"]);
///
/// assert_eq!(record.call_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// The representative who filed the report.
    pub user_id: String,
    /// The day reported on.
    pub date: NaiveDate,
    /// What kind of day it was.
    pub work_type: WorkType,
    /// Doctors visited that day.
    #[serde(default)]
    pub visited_doctor_ids: BTreeSet<String>,
    /// Chemists visited that day.
    #[serde(default)]
    pub visited_chemist_ids: BTreeSet<String>,
}

impl ActivityRecord {
    /// Creates a report with no visits.
    pub fn new(user_id: impl Into<String>, date: NaiveDate, work_type: WorkType) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            work_type,
            visited_doctor_ids: BTreeSet::new(),
            visited_chemist_ids: BTreeSet::new(),
        }
    }

    /// Adds visited doctors.
    pub fn with_doctors<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visited_doctor_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Adds visited chemists.
    pub fn with_chemists<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visited_chemist_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Returns `true` for field-work reports.
    pub fn is_field_work(&self) -> bool {
        self.work_type == WorkType::FieldWork
    }

    /// Doctors plus chemists visited on this day.
    pub fn call_count(&self) -> usize {
        self.visited_doctor_ids.len() + self.visited_chemist_ids.len()
    }
}

/// Status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; deducted from working days.
    Approved,
    /// Rejected by the approver.
    Rejected,
    /// Withdrawn by the requester.
    Cancelled,
}

/// A leave request spanning `[start_date, end_date]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// The representative on leave.
    pub user_id: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Approval status.
    pub status: LeaveStatus,
}

/// Status of a monthly tour program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStatus {
    /// Still being drafted.
    Draft,
    /// Submitted for approval.
    Submitted,
    /// Approved by the manager.
    Approved,
    /// Sent back.
    Rejected,
}

impl TourStatus {
    /// `Submitted` and `Approved` both count as a submitted tour program.
    pub fn counts_as_submitted(self) -> bool {
        matches!(self, TourStatus::Submitted | TourStatus::Approved)
    }
}

/// A tour program for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourSubmission {
    /// The representative who planned the tour.
    pub user_id: String,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Workflow status.
    pub status: TourStatus,
}

/// Status of an expense claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// Awaiting review.
    Pending,
    /// Approved; counts toward spend.
    Approved,
    /// Rejected.
    Rejected,
    /// Returned to the claimant with a question.
    Queried,
}

/// An expense claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// The claimant.
    pub user_id: String,
    /// Date the expense was incurred.
    pub date: NaiveDate,
    /// Claimed amount, non-negative.
    pub amount: Decimal,
    /// Review status.
    pub status: ExpenseStatus,
}

/// A company holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// The holiday date.
    pub date: NaiveDate,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Inactive holidays are ignored.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// A representative known to the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representative {
    /// Unique user id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The manager this representative reports to, if any.
    #[serde(default)]
    pub manager_id: Option<String>,
    /// Inactive representatives are excluded from peer groups.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Representative {
    /// Creates an active representative with no manager.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            manager_id: None,
            is_active: true,
        }
    }

    /// Sets the reporting manager.
    pub fn with_manager(mut self, manager_id: impl Into<String>) -> Self {
        self.manager_id = Some(manager_id.into());
        self
    }

    /// Marks the representative inactive.
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

fn default_true() -> bool {
    true
}
