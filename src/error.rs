//! Error types for the Performance Analytics Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Only genuinely invalid input or collaborator failures are errors; empty
//! data (no working days, no field work, no peers) yields neutral scores.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the Performance Analytics Engine.
///
/// # Example
///
/// ```
/// use kpi_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::InvalidPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid period: start date 2026-02-01 is after end date 2026-01-01"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but violates a scoring invariant.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The offending field.
        field: String,
        /// A description of the violation.
        message: String,
    },

    /// The period starts after it ends.
    #[error("Invalid period: start date {start_date} is after end date {end_date}")]
    InvalidPeriod {
        /// The requested start date.
        start_date: NaiveDate,
        /// The requested end date.
        end_date: NaiveDate,
    },

    /// A date string could not be parsed.
    #[error("Invalid date '{value}': {message}")]
    InvalidDate {
        /// The raw input.
        value: String,
        /// A description of the parse failure.
        message: String,
    },

    /// The record store failed to answer a query.
    #[error("Record source error: {message}")]
    DataSource {
        /// A description of the failure.
        message: String,
    },

    /// A report was requested for a population with no members.
    #[error("No users found for peer group {peer_group}")]
    NoUsersFound {
        /// Description of the peer group that was empty.
        peer_group: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/scoring.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/scoring.yaml"
        );
    }

    #[test]
    fn test_invalid_config_displays_field_and_message() {
        let error = EngineError::InvalidConfig {
            field: "weights".to_string(),
            message: "must sum to 1.0".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration field 'weights': must sum to 1.0"
        );
    }

    #[test]
    fn test_invalid_date_displays_value() {
        let error = EngineError::InvalidDate {
            value: "not-a-date".to_string(),
            message: "expected YYYY-MM-DD".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid date 'not-a-date': expected YYYY-MM-DD"
        );
    }

    #[test]
    fn test_data_source_displays_message() {
        let error = EngineError::DataSource {
            message: "connection reset".to_string(),
        };
        assert_eq!(error.to_string(), "Record source error: connection reset");
    }

    #[test]
    fn test_no_users_found_displays_group() {
        let error = EngineError::NoUsersFound {
            peer_group: "team of mgr_001".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No users found for peer group team of mgr_001"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn fails() -> EngineResult<()> {
            Err(EngineError::DataSource {
                message: "down".to_string(),
            })
        }

        fn propagates() -> EngineResult<()> {
            fails()?;
            Ok(())
        }

        assert!(propagates().is_err());
    }
}
