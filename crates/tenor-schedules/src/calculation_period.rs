//! A single unadjusted calculation period.

use serde::{Deserialize, Serialize};
use std::fmt;

use tenor_core::{Date, Period};

use crate::error::{ScheduleError, ScheduleResult};

/// Half-open interval `[unadjusted_start, unadjusted_end)` of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalculationPeriod {
    /// Unadjusted accrual start
    pub unadjusted_start: Date,
    /// Unadjusted accrual end
    pub unadjusted_end: Date,
}

impl CalculationPeriod {
    /// Creates a period, rejecting empty or inverted ranges.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::DegenerateRange` unless `start < end`.
    pub fn new(start: Date, end: Date) -> ScheduleResult<Self> {
        if start < end {
            Ok(Self {
                unadjusted_start: start,
                unadjusted_end: end,
            })
        } else {
            Err(ScheduleError::degenerate(start, end))
        }
    }

    /// Calendar days in the period.
    #[must_use]
    pub fn days(&self) -> i64 {
        self.unadjusted_start.days_between(&self.unadjusted_end)
    }

    /// Calendar-naive length in years (`days / 365`).
    ///
    /// For coarse comparisons only; accrual fractions belong to a day count.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.days() as f64 / 365.0
    }

    /// Returns true if the period ends exactly one interval after it starts.
    pub fn is_regular(&self, interval: Period) -> ScheduleResult<bool> {
        Ok(interval.add_to(self.unadjusted_start)? == self.unadjusted_end)
    }

    /// Returns true if the period ends before one interval has elapsed.
    pub fn is_short_stub(&self, interval: Period) -> ScheduleResult<bool> {
        Ok(self.unadjusted_end < interval.add_to(self.unadjusted_start)?)
    }

    /// Returns true if the period runs past one interval.
    pub fn is_long_stub(&self, interval: Period) -> ScheduleResult<bool> {
        Ok(self.unadjusted_end > interval.add_to(self.unadjusted_start)?)
    }

    /// Returns true if `date` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.unadjusted_start <= date && date < self.unadjusted_end
    }
}

impl fmt::Display for CalculationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.unadjusted_start, self.unadjusted_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        assert!(CalculationPeriod::new(date(2025, 1, 1), date(2025, 4, 1)).is_ok());
        assert!(matches!(
            CalculationPeriod::new(date(2025, 4, 1), date(2025, 4, 1)),
            Err(ScheduleError::DegenerateRange { .. })
        ));
        assert!(CalculationPeriod::new(date(2025, 4, 2), date(2025, 4, 1)).is_err());
    }

    #[test]
    fn test_stub_predicates() {
        let q = Period::months(3);
        let regular = CalculationPeriod::new(date(2007, 1, 26), date(2007, 4, 26)).unwrap();
        let short = CalculationPeriod::new(date(2011, 10, 26), date(2012, 1, 5)).unwrap();
        let long = CalculationPeriod::new(date(2011, 7, 26), date(2012, 1, 5)).unwrap();

        assert!(regular.is_regular(q).unwrap());
        assert!(!regular.is_short_stub(q).unwrap());
        assert!(!regular.is_long_stub(q).unwrap());

        assert!(short.is_short_stub(q).unwrap());
        assert!(!short.is_regular(q).unwrap());

        assert!(long.is_long_stub(q).unwrap());
        assert!(!long.is_short_stub(q).unwrap());
    }

    #[test]
    fn test_length() {
        let p = CalculationPeriod::new(date(2025, 1, 1), date(2025, 3, 15)).unwrap();
        assert_eq!(p.days(), 73);
        assert_relative_eq!(p.year_fraction(), 0.2);
        assert!(p.contains(date(2025, 1, 1)));
        assert!(!p.contains(date(2025, 3, 15)));
        assert_eq!(p.to_string(), "2025-01-01 to 2025-03-15");
    }
}
