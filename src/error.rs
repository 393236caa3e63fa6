//! Error types for the sales analysis engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine can report. Undefined ratios (growth from a
//! zero base, average price over zero units) are not errors; they surface as
//! `None` in the computed results.

use thiserror::Error;

/// The main error type for the sales analysis engine.
///
/// # Example
///
/// ```
/// use sales_insight::error::EngineError;
///
/// let error = EngineError::InvalidThreshold { min_stock: 0 };
/// assert_eq!(
///     error.to_string(),
///     "Invalid minimum stock level 0: must be greater than zero"
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

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A month or year token did not describe a valid period.
    #[error("Invalid period '{month} {year}': {message}")]
    InvalidPeriod {
        /// The month token as supplied.
        month: String,
        /// The year token as supplied.
        year: String,
        /// A description of what made the period invalid.
        message: String,
    },

    /// A row of a monthly extract had a missing or non-numeric field.
    #[error("Malformed record in {period} at row {row}, field '{field}': {message}")]
    MalformedRecord {
        /// The period label of the extract containing the row.
        period: String,
        /// Zero-based index of the row within the extract.
        row: usize,
        /// The offending field name.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A minimum stock level was zero or negative.
    #[error("Invalid minimum stock level {min_stock}: must be greater than zero")]
    InvalidThreshold {
        /// The rejected minimum stock level.
        min_stock: i64,
    },

    /// Two extracts were supplied for the same period under a rejecting policy.
    #[error("Duplicate extract for period {period}")]
    DuplicatePeriod {
        /// The period label that appeared more than once.
        period: String,
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
            path: "/missing/analytics.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/analytics.yaml"
        );
    }

    #[test]
    fn test_invalid_period_displays_tokens() {
        let error = EngineError::InvalidPeriod {
            month: "Smarch".to_string(),
            year: "2024".to_string(),
            message: "unknown month name".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid period 'Smarch 2024': unknown month name"
        );
    }

    #[test]
    fn test_malformed_record_displays_location() {
        let error = EngineError::MalformedRecord {
            period: "Mar 2024".to_string(),
            row: 4,
            field: "net_sales".to_string(),
            message: "not a number: 'n/a'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed record in Mar 2024 at row 4, field 'net_sales': not a number: 'n/a'"
        );
    }

    #[test]
    fn test_invalid_threshold_displays_value() {
        let error = EngineError::InvalidThreshold { min_stock: -3 };
        assert_eq!(
            error.to_string(),
            "Invalid minimum stock level -3: must be greater than zero"
        );
    }

    #[test]
    fn test_duplicate_period_displays_label() {
        let error = EngineError::DuplicatePeriod {
            period: "Jan 2024".to_string(),
        };
        assert_eq!(error.to_string(), "Duplicate extract for period Jan 2024");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_invalid_threshold() -> EngineResult<()> {
            Err(EngineError::InvalidThreshold { min_stock: 0 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_invalid_threshold()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
