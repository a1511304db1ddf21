//! Peer expense baseline.
//!
//! Expense efficiency is relative: a representative's approved spend per
//! field-work day is compared with the highest such average in the peer
//! group. [`PeerBaseline`] holds those peer averages, keyed by user id, so a
//! batch can compute them once and share them across every scored user.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{ExpenseStatus, Period};
use crate::source::RecordSource;

use super::saturating_count;

/// Approved spend and field activity of one representative in a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseActivity {
    /// Number of field-work DCRs.
    pub field_work_days: u32,
    /// Sum of approved expense amounts.
    pub approved_total: Decimal,
}

impl ExpenseActivity {
    /// Approved spend per field-work day, or `None` without field work.
    ///
    /// # Example
    ///
    /// ```
    /// use kpi_engine::calculation::ExpenseActivity;
    /// use rust_decimal::Decimal;
    ///
    /// let activity = ExpenseActivity { field_work_days: 4, approved_total: Decimal::from(1000) };
    /// assert_eq!(activity.average_per_field_day(), Some(Decimal::from(250)));
    ///
    /// let idle = ExpenseActivity { field_work_days: 0, approved_total: Decimal::from(1000) };
    /// assert_eq!(idle.average_per_field_day(), None);
    /// ```
    pub fn average_per_field_day(&self) -> Option<Decimal> {
        (self.field_work_days > 0)
            .then(|| self.approved_total / Decimal::from(self.field_work_days))
    }
}

/// Reads the field-work day count and approved spend of `user_id`.
pub fn load_expense_activity<S: RecordSource + ?Sized>(
    source: &S,
    user_id: &str,
    period: &Period,
) -> EngineResult<ExpenseActivity> {
    let field_work_days = source
        .activity_records(user_id, period)?
        .iter()
        .filter(|r| r.is_field_work())
        .count();
    let field_work_days = saturating_count(field_work_days);

    let approved_total = source
        .expense_records(user_id, period, ExpenseStatus::Approved)?
        .iter()
        .map(|e| e.amount)
        .sum();

    Ok(ExpenseActivity {
        field_work_days,
        approved_total,
    })
}

/// Per-field-day expense averages of a peer group.
///
/// Only peers with at least one field-work day have an entry.
///
/// # Example
///
/// ```
/// use kpi_engine::calculation::PeerBaseline;
/// use rust_decimal::Decimal;
///
/// let baseline = PeerBaseline::from_averages([
///     ("mr_001", Decimal::from(200)),
///     ("mr_002", Decimal::from(800)),
/// ]);
/// assert_eq!(baseline.len(), 2);
/// assert_eq!(baseline.max_average(), Some(Decimal::from(800)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerBaseline {
    averages: BTreeMap<String, Decimal>,
}

impl PeerBaseline {
    /// Queries every peer once and records their average spend per field day.
    ///
    /// Duplicate ids are queried once.
    pub fn collect<S: RecordSource + ?Sized>(
        source: &S,
        period: &Period,
        peer_ids: &[String],
    ) -> EngineResult<Self> {
        let mut averages = BTreeMap::new();

        for peer_id in peer_ids {
            if averages.contains_key(peer_id) {
                continue;
            }
            let activity = load_expense_activity(source, peer_id, period)?;
            if let Some(average) = activity.average_per_field_day() {
                averages.insert(peer_id.clone(), average);
            }
        }

        debug!(
            peers = peer_ids.len(),
            with_field_work = averages.len(),
            "Collected peer expense baseline"
        );

        Ok(Self { averages })
    }

    /// Builds a baseline from precomputed averages.
    pub fn from_averages<I, K>(averages: I) -> Self
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: Into<String>,
    {
        Self {
            averages: averages.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// The highest peer average, or `None` for an empty baseline.
    pub fn max_average(&self) -> Option<Decimal> {
        self.averages.values().copied().max()
    }

    /// The recorded average for one peer.
    pub fn average_for(&self, user_id: &str) -> Option<Decimal> {
        self.averages.get(user_id).copied()
    }

    /// Number of peers with field work.
    pub fn len(&self) -> usize {
        self.averages.len()
    }

    /// Returns `true` if no peer had field work.
    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}
