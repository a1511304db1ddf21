//! Snapshot-backed record source.
//!
//! [`InMemoryRecordSource`] answers every query from vectors held in memory.
//! Callers that pre-fetch a period's data once can score a whole team
//! without further round trips to the store.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::calculation::saturating_count;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ActivityRecord, ExpenseRecord, ExpenseStatus, HolidayRecord, LeaveRecord, LeaveStatus, Period,
    Representative, TourSubmission,
};

use super::{PeerGroup, RecordSource};

/// Serialized form of every record kind the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    /// Known representatives.
    #[serde(default)]
    pub representatives: Vec<Representative>,
    /// Daily call reports.
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
    /// Leave requests.
    #[serde(default)]
    pub leaves: Vec<LeaveRecord>,
    /// Monthly tour programs.
    #[serde(default)]
    pub tours: Vec<TourSubmission>,
    /// Expense claims.
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    /// Company holidays.
    #[serde(default)]
    pub holidays: Vec<HolidayRecord>,
}

/// A [`RecordSource`] over an in-memory [`RecordSnapshot`].
///
/// # Example
///
/// ```
/// use kpi_engine::models::{ActivityRecord, Period, Representative, WorkType};
/// use kpi_engine::source::{InMemoryRecordSource, PeerGroup, RecordSource};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let source = InMemoryRecordSource::new()
///     .with_representative(Representative {
///         id: "mr_001".to_string(),
///         name: "Asha".to_string(),
///         manager_id: None,
///         is_active: true,
///     })
///     .with_activity(ActivityRecord::new("mr_001", day, WorkType::FieldWork));
///
/// let period = Period::new(day, day).unwrap();
/// assert_eq!(source.activity_records("mr_001", &period).unwrap().len(), 1);
/// assert_eq!(source.peer_users(&PeerGroup::AllActive).unwrap(), vec!["mr_001"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    snapshot: RecordSnapshot,
}

impl InMemoryRecordSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing snapshot.
    pub fn from_snapshot(snapshot: RecordSnapshot) -> Self {
        Self { snapshot }
    }

    /// Loads a snapshot from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| EngineError::DataSource {
            message: format!("cannot read snapshot '{}': {}", path_str, e),
        })?;

        Self::from_json_str(&content).map_err(|e| match e {
            EngineError::DataSource { message } => EngineError::DataSource {
                message: format!("{} ({})", message, path_str),
            },
            other => other,
        })
    }

    /// Parses a snapshot from a JSON document.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let snapshot: RecordSnapshot =
            serde_json::from_str(json).map_err(|e| EngineError::DataSource {
                message: format!("invalid snapshot: {}", e),
            })?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Returns the underlying snapshot.
    pub fn snapshot(&self) -> &RecordSnapshot {
        &self.snapshot
    }

    /// Adds a representative.
    pub fn with_representative(mut self, representative: Representative) -> Self {
        self.snapshot.representatives.push(representative);
        self
    }

    /// Adds a daily call report.
    pub fn with_activity(mut self, record: ActivityRecord) -> Self {
        self.snapshot.activities.push(record);
        self
    }

    /// Adds a leave record.
    pub fn with_leave(mut self, record: LeaveRecord) -> Self {
        self.snapshot.leaves.push(record);
        self
    }

    /// Adds a tour program.
    pub fn with_tour(mut self, record: TourSubmission) -> Self {
        self.snapshot.tours.push(record);
        self
    }

    /// Adds an expense claim.
    pub fn with_expense(mut self, record: ExpenseRecord) -> Self {
        self.snapshot.expenses.push(record);
        self
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, record: HolidayRecord) -> Self {
        self.snapshot.holidays.push(record);
        self
    }
}

impl RecordSource for InMemoryRecordSource {
    fn activity_records(&self, user_id: &str, period: &Period) -> EngineResult<Vec<ActivityRecord>> {
        Ok(self
            .snapshot
            .activities
            .iter()
            .filter(|r| r.user_id == user_id && period.contains_date(r.date))
            .cloned()
            .collect())
    }

    fn leave_records(
        &self,
        user_id: &str,
        status: LeaveStatus,
        period: &Period,
    ) -> EngineResult<Vec<LeaveRecord>> {
        Ok(self
            .snapshot
            .leaves
            .iter()
            .filter(|r| {
                r.user_id == user_id
                    && r.status == status
                    && r.start_date <= period.end_date()
                    && r.end_date >= period.start_date()
            })
            .cloned()
            .collect())
    }

    fn tour_submitted(&self, user_id: &str, year: i32, month: u32) -> EngineResult<bool> {
        Ok(self.snapshot.tours.iter().any(|t| {
            t.user_id == user_id
                && t.year == year
                && t.month == month
                && t.status.counts_as_submitted()
        }))
    }

    fn expense_records(
        &self,
        user_id: &str,
        period: &Period,
        status: ExpenseStatus,
    ) -> EngineResult<Vec<ExpenseRecord>> {
        Ok(self
            .snapshot
            .expenses
            .iter()
            .filter(|r| r.user_id == user_id && r.status == status && period.contains_date(r.date))
            .cloned()
            .collect())
    }

    fn active_holiday_count(&self, period: &Period) -> EngineResult<u32> {
        let count = self
            .snapshot
            .holidays
            .iter()
            .filter(|h| h.is_active && period.contains_date(h.date))
            .count();
        Ok(saturating_count(count))
    }

    fn peer_users(&self, peer_group: &PeerGroup) -> EngineResult<Vec<String>> {
        let active = self.snapshot.representatives.iter().filter(|r| r.is_active);

        let ids = match peer_group {
            PeerGroup::AllActive => active.map(|r| r.id.clone()).collect(),
            PeerGroup::Team { manager_id } => active
                .filter(|r| r.manager_id.as_deref() == Some(manager_id.as_str()))
                .map(|r| r.id.clone())
                .collect(),
            PeerGroup::Users { user_ids } => user_ids.clone(),
        };

        Ok(ids)
    }
}
