//! Roll conventions: the rule snapping each schedule date to a
//! conventional day of its month.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::date::days_in_month;
use super::Date;
use crate::error::{TenorError, TenorResult};

/// Rule that picks the conventional day-of-month for a generated date.
///
/// The convention is a pure function of (year, month); it never carries
/// state, so resolving the same month twice always gives the same day.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::{Date, RollConvention};
///
/// let roll = RollConvention::day_of_month(31).unwrap();
/// assert_eq!(roll.resolve_day(2023, 2), Some(28));
/// assert_eq!(roll.resolve_day(2024, 2), Some(29));
///
/// let imm = RollConvention::IMM;
/// let date = Date::from_ymd(2025, 3, 1).unwrap();
/// assert_eq!(imm.adjust(date), Date::from_ymd(2025, 3, 19).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RollConvention {
    /// Fixed day of month, truncated to the month's length
    DayOfMonth(u32),
    /// Last day of the month
    EndOfMonth,
    /// The `occurrence`-th `weekday` of the month
    Imm {
        /// Day of week to land on
        weekday: Weekday,
        /// Which occurrence (1 = first); falls back to the last one
        occurrence: u8,
    },
    /// Leave the generated day untouched
    #[default]
    NoAdjustment,
}

impl RollConvention {
    /// IMM dates: third Wednesday of the month.
    pub const IMM: RollConvention = RollConvention::Imm {
        weekday: Weekday::Wed,
        occurrence: 3,
    };

    /// Creates a day-of-month convention.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidRollConvention` unless `1 <= day <= 31`.
    pub fn day_of_month(day: u32) -> TenorResult<Self> {
        if (1..=31).contains(&day) {
            Ok(RollConvention::DayOfMonth(day))
        } else {
            Err(TenorError::invalid_roll_convention(format!(
                "day of month {day} outside 1-31"
            )))
        }
    }

    /// Creates an nth-weekday convention.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidRollConvention` unless `1 <= occurrence <= 5`.
    pub fn nth_weekday(weekday: Weekday, occurrence: u8) -> TenorResult<Self> {
        if (1..=5).contains(&occurrence) {
            Ok(RollConvention::Imm {
                weekday,
                occurrence,
            })
        } else {
            Err(TenorError::invalid_roll_convention(format!(
                "occurrence {occurrence} outside 1-5"
            )))
        }
    }

    /// Returns true for [`RollConvention::NoAdjustment`].
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, RollConvention::NoAdjustment)
    }

    /// Conventional day for the given month.
    ///
    /// Returns `None` for `NoAdjustment`, meaning the caller's own day is
    /// kept. Every other convention resolves to a day that exists in the
    /// month: short months truncate, and a missing fifth weekday falls
    /// back to the last occurrence.
    #[must_use]
    pub fn resolve_day(&self, year: i32, month: u32) -> Option<u32> {
        let last = days_in_month(year, month);
        match *self {
            RollConvention::DayOfMonth(day) => Some(day.clamp(1, last)),
            RollConvention::EndOfMonth => Some(last),
            RollConvention::Imm {
                weekday,
                occurrence,
            } => Some(nth_weekday_day(year, month, weekday, occurrence)),
            RollConvention::NoAdjustment => None,
        }
    }

    /// Snaps a date to the convention within its own month.
    #[must_use]
    pub fn adjust(&self, date: Date) -> Date {
        self.resolve_day(date.year(), date.month())
            .and_then(|day| date.with_day(day))
            .unwrap_or(date)
    }
}

/// Day of the `occurrence`-th `weekday`, or of the last one if the month
/// is too short.
fn nth_weekday_day(year: i32, month: u32, weekday: Weekday, occurrence: u8) -> u32 {
    (1..=occurrence.clamp(1, 5))
        .rev()
        .find_map(|n| NaiveDate::from_weekday_of_month_opt(year, month, weekday, n))
        .map_or(1, |d| d.day())
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

impl fmt::Display for RollConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RollConvention::DayOfMonth(day) => write!(f, "{day}"),
            RollConvention::EndOfMonth => write!(f, "EOM"),
            RollConvention::Imm { .. } if *self == RollConvention::IMM => write!(f, "IMM"),
            RollConvention::Imm {
                weekday,
                occurrence,
            } => write!(f, "IMM-{occurrence}-{}", weekday_code(weekday)),
            RollConvention::NoAdjustment => write!(f, "NONE"),
        }
    }
}

impl FromStr for RollConvention {
    type Err = TenorError;

    /// Parses `1`-`31`, `EOM`, `IMM`, `IMM-<n>-<WEEKDAY>` and `NONE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_uppercase();
        match text.as_str() {
            "EOM" => return Ok(RollConvention::EndOfMonth),
            "IMM" => return Ok(RollConvention::IMM),
            "NONE" => return Ok(RollConvention::NoAdjustment),
            _ => {}
        }

        if let Some(rest) = text.strip_prefix("IMM-") {
            let (n, day) = rest
                .split_once('-')
                .ok_or_else(|| TenorError::invalid_roll_convention(format!("cannot parse '{s}'")))?;
            let occurrence = n
                .parse::<u8>()
                .map_err(|_| TenorError::invalid_roll_convention(format!("bad occurrence in '{s}'")))?;
            let weekday = day
                .parse::<Weekday>()
                .map_err(|_| TenorError::invalid_roll_convention(format!("bad weekday in '{s}'")))?;
            return Self::nth_weekday(weekday, occurrence);
        }

        let day = text
            .parse::<u32>()
            .map_err(|_| TenorError::invalid_roll_convention(format!("cannot parse '{s}'")))?;
        Self::day_of_month(day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_day_of_month_truncates() {
        let roll = RollConvention::day_of_month(31).unwrap();
        assert_eq!(roll.resolve_day(2024, 9), Some(30));
        assert_eq!(roll.resolve_day(2023, 2), Some(28));
        assert_eq!(roll.resolve_day(2024, 2), Some(29));
        assert_eq!(roll.resolve_day(2024, 1), Some(31));

        let roll = RollConvention::day_of_month(29).unwrap();
        assert_eq!(roll.resolve_day(2010, 2), Some(28));
        assert_eq!(roll.resolve_day(2010, 5), Some(29));
    }

    #[test]
    fn test_day_of_month_range() {
        assert!(RollConvention::day_of_month(0).is_err());
        assert!(RollConvention::day_of_month(32).is_err());
        // Unvalidated values still resolve inside the month
        assert_eq!(RollConvention::DayOfMonth(0).resolve_day(2025, 1), Some(1));
        assert_eq!(RollConvention::DayOfMonth(45).resolve_day(2025, 4), Some(30));
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(RollConvention::EndOfMonth.resolve_day(2100, 2), Some(28));
        assert_eq!(RollConvention::EndOfMonth.resolve_day(2000, 2), Some(29));
        assert_eq!(
            RollConvention::EndOfMonth.adjust(date(2025, 6, 3)),
            date(2025, 6, 30)
        );
    }

    #[test]
    fn test_imm_third_wednesday() {
        assert_eq!(RollConvention::IMM.resolve_day(2025, 3), Some(19));
        assert_eq!(RollConvention::IMM.resolve_day(2025, 6), Some(18));
        assert_eq!(RollConvention::IMM.resolve_day(2024, 12), Some(18));
        assert_eq!(
            RollConvention::IMM.adjust(date(2025, 9, 30)),
            date(2025, 9, 17)
        );
    }

    #[test]
    fn test_fifth_weekday_falls_back_to_last() {
        // February 2025 has four Fridays: 7, 14, 21, 28
        let roll = RollConvention::nth_weekday(Weekday::Fri, 5).unwrap();
        assert_eq!(roll.resolve_day(2025, 2), Some(28));
        // January 2025 has five Fridays
        assert_eq!(roll.resolve_day(2025, 1), Some(31));
    }

    #[test]
    fn test_no_adjustment_keeps_day() {
        let d = date(2025, 4, 17);
        assert_eq!(RollConvention::NoAdjustment.resolve_day(2025, 4), None);
        assert_eq!(RollConvention::NoAdjustment.adjust(d), d);
        assert!(RollConvention::default().is_none());
    }

    #[test]
    fn test_parse_and_display() {
        for text in ["1", "19", "30", "31", "EOM", "IMM", "IMM-2-MON", "NONE"] {
            let roll: RollConvention = text.parse().unwrap();
            assert_eq!(roll.to_string(), text);
        }
        assert_eq!("eom".parse::<RollConvention>().unwrap(), RollConvention::EndOfMonth);
        assert!("32".parse::<RollConvention>().is_err());
        assert!("IMM-6-WED".parse::<RollConvention>().is_err());
        assert!("IMM-3".parse::<RollConvention>().is_err());
        assert!("FRN".parse::<RollConvention>().is_err());
    }

    #[test]
    fn test_serde() {
        let roll = RollConvention::DayOfMonth(19);
        let json = serde_json::to_string(&roll).unwrap();
        let parsed: RollConvention = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, roll);
    }

    proptest! {
        #[test]
        fn prop_resolution_is_idempotent_and_in_month(
            year in 1900i32..2200,
            month in 1u32..13,
            day in 1u32..32,
        ) {
            for roll in [
                RollConvention::DayOfMonth(day),
                RollConvention::EndOfMonth,
                RollConvention::IMM,
            ] {
                let first = roll.resolve_day(year, month).unwrap();
                prop_assert_eq!(roll.resolve_day(year, month), Some(first));
                prop_assert!(first >= 1 && first <= days_in_month(year, month));
            }
        }

        #[test]
        fn prop_adjust_is_idempotent(year in 1950i32..2100, month in 1u32..13, day in 1u32..29) {
            let d = date(year, month, day);
            for roll in [RollConvention::DayOfMonth(31), RollConvention::IMM, RollConvention::NoAdjustment] {
                let once = roll.adjust(d);
                prop_assert_eq!(roll.adjust(once), once);
                prop_assert!(once.same_month(&d));
            }
        }
    }
}
