//! Calculation period date definitions.
//!
//! A [`CalculationPeriodDates`] is the trade-level description of a
//! calculation schedule: effective and termination dates, the period
//! frequency, and the optional first regular period start and last regular
//! period end that pin the regular run. It is built by
//! [`ScheduleGenerator::from_period_dates`](crate::ScheduleGenerator::from_period_dates).

use serde::{Deserialize, Serialize};

use tenor_core::{Date, Frequency};

use crate::stub::StubPeriodType;

/// Date definition of a calculation period schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationPeriodDates {
    /// Effective date of the stream
    pub effective_date: Date,
    /// Termination date of the stream
    pub termination_date: Date,
    /// Start of the first period when it differs from the effective date
    #[serde(default)]
    pub first_period_start: Option<Date>,
    /// Start of the first regular period
    #[serde(default)]
    pub first_regular_period_start: Option<Date>,
    /// End of the last regular period
    #[serde(default)]
    pub last_regular_period_end: Option<Date>,
    /// Regular period frequency and roll convention
    pub frequency: Frequency,
    /// Requested stub shape
    #[serde(default)]
    pub stub: StubPeriodType,
}

impl CalculationPeriodDates {
    /// Creates a definition with no regular-run bounds and no stub request.
    #[must_use]
    pub fn new(effective_date: Date, termination_date: Date, frequency: Frequency) -> Self {
        Self {
            effective_date,
            termination_date,
            first_period_start: None,
            first_regular_period_start: None,
            last_regular_period_end: None,
            frequency,
            stub: StubPeriodType::None,
        }
    }

    /// Sets the first period start.
    #[must_use]
    pub fn with_first_period_start(mut self, date: Date) -> Self {
        self.first_period_start = Some(date);
        self
    }

    /// Sets the first regular period start.
    #[must_use]
    pub fn with_first_regular_period_start(mut self, date: Date) -> Self {
        self.first_regular_period_start = Some(date);
        self
    }

    /// Sets the last regular period end.
    #[must_use]
    pub fn with_last_regular_period_end(mut self, date: Date) -> Self {
        self.last_regular_period_end = Some(date);
        self
    }

    /// Sets the stub request.
    #[must_use]
    pub fn with_stub(mut self, stub: StubPeriodType) -> Self {
        self.stub = stub;
        self
    }

    /// Date the first period starts on.
    pub fn start_date(&self) -> Date {
        self.first_period_start.unwrap_or(self.effective_date)
    }
}
