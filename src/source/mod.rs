//! Query contract between the engine and the record store.
//!
//! The engine performs no storage of its own. Every calculator reads through
//! [`RecordSource`], so a database-backed store, a cached snapshot or a test
//! fixture can all drive the same scoring code.

mod memory;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineResult;
use crate::models::{
    ActivityRecord, ExpenseRecord, ExpenseStatus, LeaveRecord, LeaveStatus, Period,
};

pub use memory::{InMemoryRecordSource, RecordSnapshot};

/// The population a representative is compared against.
///
/// # Example
///
/// ```
/// use kpi_engine::source::PeerGroup;
///
/// assert_eq!(PeerGroup::default(), PeerGroup::AllActive);
/// assert_eq!(
///     PeerGroup::Team { manager_id: "mgr_001".to_string() }.to_string(),
///     "team of mgr_001"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeerGroup {
    /// Every active representative.
    #[default]
    AllActive,
    /// Active representatives reporting to one manager.
    Team {
        /// The manager whose team forms the group.
        manager_id: String,
    },
    /// An explicit list of user ids.
    Users {
        /// Members of the group.
        user_ids: Vec<String>,
    },
}

impl fmt::Display for PeerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerGroup::AllActive => write!(f, "all active representatives"),
            PeerGroup::Team { manager_id } => write!(f, "team of {}", manager_id),
            PeerGroup::Users { user_ids } => write!(f, "{} listed users", user_ids.len()),
        }
    }
}

/// Read-only queries the engine needs from the record store.
///
/// Implementations filter by user, status and date; calculators trust the
/// filtering and only aggregate.
pub trait RecordSource {
    /// Daily call reports of `user_id` dated within `period`.
    fn activity_records(&self, user_id: &str, period: &Period) -> EngineResult<Vec<ActivityRecord>>;

    /// Leave records of `user_id` with `status` that overlap `period`.
    fn leave_records(
        &self,
        user_id: &str,
        status: LeaveStatus,
        period: &Period,
    ) -> EngineResult<Vec<LeaveRecord>>;

    /// Whether `user_id` has a submitted or approved tour program for the month.
    fn tour_submitted(&self, user_id: &str, year: i32, month: u32) -> EngineResult<bool>;

    /// Expense records of `user_id` with `status` dated within `period`.
    fn expense_records(
        &self,
        user_id: &str,
        period: &Period,
        status: ExpenseStatus,
    ) -> EngineResult<Vec<ExpenseRecord>>;

    /// Number of active holidays dated within `period`.
    fn active_holiday_count(&self, period: &Period) -> EngineResult<u32>;

    /// User ids belonging to `peer_group`.
    fn peer_users(&self, peer_group: &PeerGroup) -> EngineResult<Vec<String>>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn activity_records(&self, user_id: &str, period: &Period) -> EngineResult<Vec<ActivityRecord>> {
        (**self).activity_records(user_id, period)
    }

    fn leave_records(
        &self,
        user_id: &str,
        status: LeaveStatus,
        period: &Period,
    ) -> EngineResult<Vec<LeaveRecord>> {
        (**self).leave_records(user_id, status, period)
    }

    fn tour_submitted(&self, user_id: &str, year: i32, month: u32) -> EngineResult<bool> {
        (**self).tour_submitted(user_id, year, month)
    }

    fn expense_records(
        &self,
        user_id: &str,
        period: &Period,
        status: ExpenseStatus,
    ) -> EngineResult<Vec<ExpenseRecord>> {
        (**self).expense_records(user_id, period, status)
    }

    fn active_holiday_count(&self, period: &Period) -> EngineResult<u32> {
        (**self).active_holiday_count(period)
    }

    fn peer_users(&self, peer_group: &PeerGroup) -> EngineResult<Vec<String>> {
        (**self).peer_users(peer_group)
    }
}
