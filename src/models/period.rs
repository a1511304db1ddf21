//! Reporting period model.
//!
//! This module contains the [`Period`] type, an inclusive date range that
//! every KPI calculation is scoped to.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Default length of the trailing reporting window, in days.
pub const DEFAULT_TRAILING_DAYS: i64 = 30;

/// An inclusive date range with `start_date <= end_date`.
///
/// The ordering invariant is enforced on construction and on
/// deserialization, so calculators never see an inverted range.
///
/// # Example
///
/// ```
/// use kpi_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period::new(
///     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 1, 30).unwrap(),
/// ).unwrap();
///
/// assert_eq!(period.date_range_days(), 30);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Deserialize)]
struct RawPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawPeriod> for Period {
    type Error = EngineError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Period::new(raw.start_date, raw.end_date)
    }
}

impl Period {
    /// Creates a period, failing with `InvalidPeriod` if `start_date > end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        if start_date > end_date {
            return Err(EngineError::InvalidPeriod {
                start_date,
                end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Parses a period from two `YYYY-MM-DD` strings.
    ///
    /// # Example
    ///
    /// ```
    /// use kpi_engine::models::Period;
    ///
    /// let period = Period::parse("2026-03-01", "2026-03-31").unwrap();
    /// assert_eq!(period.date_range_days(), 31);
    ///
    /// assert!(Period::parse("2026-03-31", "2026-03-01").is_err());
    /// assert!(Period::parse("31/03/2026", "2026-04-01").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Builds the window `[end_date - days, end_date]`.
    ///
    /// Negative `days` are treated as zero. A window reaching before the
    /// earliest representable date fails with `InvalidDate`.
    ///
    /// # Example
    ///
    /// ```
    /// use kpi_engine::models::Period;
    /// use chrono::NaiveDate;
    ///
    /// let end = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
    /// let period = Period::trailing_days(end, 30).unwrap();
    /// assert_eq!(period.start_date(), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    ///
    /// assert!(Period::trailing_days(end, i64::MAX).is_err());
    /// ```
    pub fn trailing_days(end_date: NaiveDate, days: i64) -> EngineResult<Self> {
        let start_date = Duration::try_days(days.max(0))
            .and_then(|window| end_date.checked_sub_signed(window))
            .ok_or_else(|| EngineError::InvalidDate {
                value: days.to_string(),
                message: format!("a {} day window ending {} is out of range", days, end_date),
            })?;

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The first day of the period.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The last day of the period.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days in the period, counting both ends.
    pub fn date_range_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of days of `[start, end]` that fall inside this period.
    ///
    /// Ranges outside the period, or inverted ranges, overlap by zero days.
    pub fn overlap_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let overlap_start = start.max(self.start_date);
        let overlap_end = end.min(self.end_date);
        ((overlap_end - overlap_start).num_days() + 1).max(0)
    }

    /// The distinct `(year, month)` pairs touched by the period, in order.
    ///
    /// # Example
    ///
    /// ```
    /// use kpi_engine::models::Period;
    ///
    /// let period = Period::parse("2025-12-15", "2026-02-01").unwrap();
    /// assert_eq!(period.months(), vec![(2025, 12), (2026, 1), (2026, 2)]);
    /// ```
    pub fn months(&self) -> Vec<(i32, u32)> {
        let last = (self.end_date.year(), self.end_date.month());
        let mut current = (self.start_date.year(), self.start_date.month());
        let mut months = Vec::new();

        while current <= last {
            months.push(current);
            current = if current.1 == 12 {
                (current.0 + 1, 1)
            } else {
                (current.0, current.1 + 1)
            };
        }

        months
    }
}

fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| EngineError::InvalidDate {
        value: value.to_string(),
        message: format!("{} (expected YYYY-MM-DD)", e),
    })
}
