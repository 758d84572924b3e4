//! Error types for schedule generation.

use thiserror::Error;

use tenor_core::{Date, Period, TenorError};

/// A specialized Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors raised while building a schedule.
///
/// All of them are detected synchronously before any schedule is
/// returned; a caller never sees a partially built schedule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// The tenor is not a whole multiple of the period interval and no
    /// stub type was requested.
    #[error("Tenor {tenor} is not a whole multiple of period {interval}")]
    NonDivisibleTenor {
        /// Tenor to maturity.
        tenor: Period,
        /// Regular period interval.
        interval: Period,
    },

    /// Schedule inputs are inconsistent.
    #[error("Schedule construction failed: {reason}")]
    ScheduleConstruction {
        /// Description of the failure.
        reason: String,
    },

    /// The effective date is not before the termination date.
    #[error("Degenerate date range: start {start} is not before end {end}")]
    DegenerateRange {
        /// Effective (start) date.
        start: Date,
        /// Termination (end) date.
        end: Date,
    },

    /// Settings could not be loaded.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration error.
        reason: String,
    },

    /// Core library error.
    #[error("Core error: {0}")]
    Core(#[from] TenorError),
}

impl ScheduleError {
    /// Creates a schedule construction error.
    #[must_use]
    pub fn construction(reason: impl Into<String>) -> Self {
        Self::ScheduleConstruction {
            reason: reason.into(),
        }
    }

    /// Creates a non-divisible tenor error.
    #[must_use]
    pub fn non_divisible(tenor: Period, interval: Period) -> Self {
        Self::NonDivisibleTenor { tenor, interval }
    }

    /// Creates a degenerate range error.
    #[must_use]
    pub fn degenerate(start: Date, end: Date) -> Self {
        Self::DegenerateRange { start, end }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

/// Rejects `start >= end`.
pub(crate) fn ensure_range(start: Date, end: Date) -> ScheduleResult<()> {
    if start < end {
        Ok(())
    } else {
        Err(ScheduleError::degenerate(start, end))
    }
}

/// Rejects zero or negative frequencies.
pub(crate) fn ensure_positive(interval: Period) -> ScheduleResult<()> {
    if interval.is_positive() {
        Ok(())
    } else {
        Err(ScheduleError::construction(format!(
            "period interval {interval} must be positive"
        )))
    }
}
