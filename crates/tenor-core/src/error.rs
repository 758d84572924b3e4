//! Error types for the Tenor core types.
//!
//! Parsing and arithmetic on dates, periods and roll conventions report
//! failures through [`TenorError`].

use thiserror::Error;

use crate::types::Period;

/// A specialized Result type for core Tenor operations.
pub type TenorResult<T> = Result<T, TenorError>;

/// The error type for date, period and roll-convention operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TenorError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A period could not be parsed or is malformed.
    #[error("Invalid period: {message}")]
    InvalidPeriod {
        /// Description of the period error.
        message: String,
    },

    /// Arithmetic between periods expressed in incompatible units.
    #[error("Incompatible period units: {left} and {right}")]
    IncompatibleUnits {
        /// Left-hand operand.
        left: Period,
        /// Right-hand operand.
        right: Period,
    },

    /// A roll convention could not be parsed or is out of range.
    #[error("Invalid roll convention: {message}")]
    InvalidRollConvention {
        /// Description of the roll convention error.
        message: String,
    },
}

impl TenorError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(message: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            message: message.into(),
        }
    }

    /// Creates an incompatible units error.
    #[must_use]
    pub fn incompatible_units(left: Period, right: Period) -> Self {
        Self::IncompatibleUnits { left, right }
    }

    /// Creates an invalid roll convention error.
    #[must_use]
    pub fn invalid_roll_convention(message: impl Into<String>) -> Self {
        Self::InvalidRollConvention {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TenorError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_incompatible_units_display() {
        let err = TenorError::incompatible_units(Period::months(3), Period::days(10));
        assert_eq!(err.to_string(), "Incompatible period units: 3M and 10D");
    }
}
