//! Stub period types and classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tenor_core::{Date, Period};

use crate::error::ScheduleError;

/// Requested placement and shape of an irregular period.
///
/// `Short*` keeps the remainder as its own period; `Long*` folds it into
/// the adjacent regular period. `None` requests nothing and lets the
/// schedule pick by remainder length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StubPeriodType {
    /// No stub requested
    #[default]
    None,
    /// Short first period
    ShortInitial,
    /// Long first period
    LongInitial,
    /// Short last period
    ShortFinal,
    /// Long last period
    LongFinal,
}

impl StubPeriodType {
    /// Returns true if this requests a stub at the start of the schedule.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        matches!(self, StubPeriodType::ShortInitial | StubPeriodType::LongInitial)
    }

    /// Returns true if this requests a stub at the end of the schedule.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, StubPeriodType::ShortFinal | StubPeriodType::LongFinal)
    }

    /// Returns true for the folding variants.
    #[must_use]
    pub fn is_long(&self) -> bool {
        matches!(self, StubPeriodType::LongInitial | StubPeriodType::LongFinal)
    }

    /// Returns true for the standalone variants.
    #[must_use]
    pub fn is_short(&self) -> bool {
        matches!(self, StubPeriodType::ShortInitial | StubPeriodType::ShortFinal)
    }

    pub(crate) fn initial_policy(self) -> EndPolicy {
        match self {
            StubPeriodType::None => EndPolicy::Auto,
            StubPeriodType::ShortInitial => EndPolicy::Force(StubKind::Short),
            StubPeriodType::LongInitial => EndPolicy::Force(StubKind::Long),
            StubPeriodType::ShortFinal | StubPeriodType::LongFinal => EndPolicy::Keep,
        }
    }

    pub(crate) fn final_policy(self) -> EndPolicy {
        match self {
            StubPeriodType::None => EndPolicy::Auto,
            StubPeriodType::ShortFinal => EndPolicy::Force(StubKind::Short),
            StubPeriodType::LongFinal => EndPolicy::Force(StubKind::Long),
            StubPeriodType::ShortInitial | StubPeriodType::LongInitial => EndPolicy::Keep,
        }
    }
}

impl fmt::Display for StubPeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StubPeriodType::None => "None",
            StubPeriodType::ShortInitial => "ShortInitial",
            StubPeriodType::LongInitial => "LongInitial",
            StubPeriodType::ShortFinal => "ShortFinal",
            StubPeriodType::LongFinal => "LongFinal",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StubPeriodType {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(StubPeriodType::None),
            "shortinitial" | "short_initial" => Ok(StubPeriodType::ShortInitial),
            "longinitial" | "long_initial" => Ok(StubPeriodType::LongInitial),
            "shortfinal" | "short_final" => Ok(StubPeriodType::ShortFinal),
            "longfinal" | "long_final" => Ok(StubPeriodType::LongFinal),
            _ => Err(ScheduleError::construction(format!("unknown stub type '{s}'"))),
        }
    }
}

/// Realized shape of an irregular period relative to one regular period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StubKind {
    /// Shorter than a regular period
    Short,
    /// Longer than a regular period
    Long,
}

/// How one end of a schedule treats its irregular segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EndPolicy {
    /// Leave the segment as generated
    Keep,
    /// Make the segment this shape, splitting or folding as needed
    Force(StubKind),
    /// Pick the shape from the remainder length
    Auto,
}

/// Classifies a remainder against half of the period interval.
///
/// A remainder of at most half a period (inclusive) is `Short`, anything
/// longer is `Long`. Lengths are compared as calendar-naive year
/// fractions (`days / 365` against [`Period::to_year_fraction`]).
#[must_use]
pub fn classify_remainder(start: Date, end: Date, interval: Period) -> StubKind {
    let remainder = start.days_between(&end) as f64 / 365.0;
    if 2.0 * remainder <= interval.to_year_fraction() {
        StubKind::Short
    } else {
        StubKind::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_stub_type_predicates() {
        assert!(StubPeriodType::ShortInitial.is_initial());
        assert!(StubPeriodType::LongInitial.is_initial());
        assert!(!StubPeriodType::ShortInitial.is_final());

        assert!(StubPeriodType::ShortFinal.is_final());
        assert!(StubPeriodType::LongFinal.is_final());
        assert!(StubPeriodType::LongFinal.is_long());
        assert!(StubPeriodType::ShortFinal.is_short());

        assert!(!StubPeriodType::None.is_initial());
        assert!(!StubPeriodType::None.is_final());
        assert!(!StubPeriodType::None.is_long());
        assert!(!StubPeriodType::None.is_short());
    }

    #[test]
    fn test_policies() {
        assert_eq!(StubPeriodType::None.initial_policy(), EndPolicy::Auto);
        assert_eq!(StubPeriodType::None.final_policy(), EndPolicy::Auto);
        assert_eq!(
            StubPeriodType::LongInitial.initial_policy(),
            EndPolicy::Force(StubKind::Long)
        );
        assert_eq!(StubPeriodType::LongInitial.final_policy(), EndPolicy::Keep);
        assert_eq!(
            StubPeriodType::ShortFinal.final_policy(),
            EndPolicy::Force(StubKind::Short)
        );
        assert_eq!(StubPeriodType::ShortFinal.initial_policy(), EndPolicy::Keep);
    }

    #[test]
    fn test_parse_and_display() {
        for stub in [
            StubPeriodType::None,
            StubPeriodType::ShortInitial,
            StubPeriodType::LongInitial,
            StubPeriodType::ShortFinal,
            StubPeriodType::LongFinal,
        ] {
            assert_eq!(stub.to_string().parse::<StubPeriodType>().unwrap(), stub);
        }
        assert_eq!("long_final".parse::<StubPeriodType>().unwrap(), StubPeriodType::LongFinal);
        assert!("medium".parse::<StubPeriodType>().is_err());
    }

    #[test]
    fn test_remainder_exactly_half_is_short() {
        let interval = Period::days(10);
        let start = date(2025, 3, 1);
        assert_eq!(classify_remainder(start, date(2025, 3, 6), interval), StubKind::Short);
        assert_eq!(classify_remainder(start, date(2025, 3, 7), interval), StubKind::Long);
        assert_eq!(classify_remainder(start, date(2025, 3, 5), interval), StubKind::Short);
    }

    #[test]
    fn test_remainder_against_quarter() {
        // Half of 3M is 0.125y, i.e. 45.625 days
        let interval = Period::months(3);
        let start = date(2011, 10, 26);
        assert_eq!(classify_remainder(start, date(2011, 12, 10), interval), StubKind::Short);
        assert_eq!(classify_remainder(start, date(2011, 12, 11), interval), StubKind::Long);
        assert_eq!(classify_remainder(start, date(2012, 1, 5), interval), StubKind::Long);
    }
}
