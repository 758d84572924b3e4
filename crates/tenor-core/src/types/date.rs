//! Calendar date used for schedule boundaries.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use crate::error::{TenorError, TenorResult};

/// An unadjusted calendar date.
///
/// This is a newtype wrapper around `chrono::NaiveDate` with the month
/// arithmetic schedule generation relies on: adding months clamps to the
/// last day of a shorter target month.
///
/// # Example
///
/// ```rust
/// use tenor_core::types::Date;
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next, Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the date does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> TenorResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| TenorError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Creates a date from an ISO 8601 string (YYYY-MM-DD).
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the string is not a valid date.
    pub fn parse(s: &str) -> TenorResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| TenorError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Checks if the year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Returns the number of days in the date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Returns the same year and month with the day replaced.
    ///
    /// Returns `None` if the day does not exist in that month.
    #[must_use]
    pub fn with_day(&self, day: u32) -> Option<Self> {
        self.0.with_day(day).map(Date)
    }

    /// Adds a signed number of calendar days.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the result is out of range.
    pub fn add_days(&self, days: i64) -> TenorResult<Self> {
        chrono::Duration::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Date)
            .ok_or_else(|| TenorError::invalid_date(format!("{self} + {days} days is out of range")))
    }

    /// Adds a number of months to the date.
    ///
    /// If the resulting day would be invalid (e.g., Jan 31 + 1 month),
    /// it rolls back to the last valid day of the month.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> TenorResult<Self> {
        let total_months = i64::from(self.year()) * 12 + i64::from(self.month()) - 1 + i64::from(months);
        let new_year = i32::try_from(total_months.div_euclid(12))
            .map_err(|_| TenorError::invalid_date(format!("{self} + {months} months is out of range")))?;
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let new_day = self.day().min(days_in_month(new_year, new_month));
        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a number of years to the date, clamping Feb 29 in non-leap years.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the result is out of range.
    pub fn add_years(&self, years: i32) -> TenorResult<Self> {
        let months = years
            .checked_mul(12)
            .ok_or_else(|| TenorError::invalid_date(format!("{self} + {years} years is out of range")))?;
        self.add_months(months)
    }

    /// Calculates the number of calendar days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Returns true if both dates fall in the same calendar month.
    #[must_use]
    pub fn same_month(&self, other: &Date) -> bool {
        self.year() == other.year() && self.month() == other.month()
    }

    /// Returns the underlying `NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the last day of the date's month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        self.with_day(self.days_in_month()).unwrap_or(*self)
    }

    /// Checks if the date is the end of month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// Returns the day of week.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = TenorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl Sub<Date> for Date {
    type Output = i64;

    /// Returns the number of days between two dates.
    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

/// Returns the number of days in a month of the given year.
///
/// Months outside 1-12 report 31, the widest month, so callers clamping a
/// day against the result never produce a smaller day than requested.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Gregorian leap-year rule.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_creation() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 6);
        assert_eq!(date.day(), 15);
    }

    #[test]
    fn test_invalid_date() {
        assert!(Date::from_ymd(2025, 2, 30).is_err());
        assert!(Date::from_ymd(2025, 13, 1).is_err());
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        let date = Date::from_ymd(2025, 1, 31).unwrap();
        assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(date.add_months(3).unwrap(), Date::from_ymd(2025, 4, 30).unwrap());

        let leap = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(leap.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_add_negative_months_across_year() {
        let date = Date::from_ymd(2025, 2, 15).unwrap();
        assert_eq!(date.add_months(-3).unwrap(), Date::from_ymd(2024, 11, 15).unwrap());
        assert_eq!(date.add_months(-14).unwrap(), Date::from_ymd(2023, 12, 15).unwrap());
    }

    #[test]
    fn test_add_years_from_leap_day() {
        let date = Date::from_ymd(2024, 2, 29).unwrap();
        assert_eq!(date.add_years(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(date.add_years(4).unwrap(), Date::from_ymd(2028, 2, 29).unwrap());
    }

    #[test]
    fn test_add_days() {
        let date = Date::from_ymd(2025, 12, 30).unwrap();
        assert_eq!(date.add_days(3).unwrap(), Date::from_ymd(2026, 1, 2).unwrap());
        assert_eq!(date.add_days(-30).unwrap(), Date::from_ymd(2025, 11, 30).unwrap());
        assert!(date.add_days(i64::MAX).is_err());
    }

    #[test]
    fn test_leap_year() {
        assert!(Date::from_ymd(2024, 1, 1).unwrap().is_leap_year());
        assert!(!Date::from_ymd(2025, 1, 1).unwrap().is_leap_year());
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2024, 9), 30);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_days_between_and_sub() {
        let d1 = Date::from_ymd(2025, 1, 1).unwrap();
        let d2 = Date::from_ymd(2025, 1, 31).unwrap();
        assert_eq!(d1.days_between(&d2), 30);
        assert_eq!(d2 - d1, 30);
    }

    #[test]
    fn test_end_of_month() {
        let date = Date::from_ymd(2023, 2, 10).unwrap();
        assert_eq!(date.end_of_month(), Date::from_ymd(2023, 2, 28).unwrap());
        assert!(date.end_of_month().is_end_of_month());
        assert!(!date.is_end_of_month());
    }

    #[test]
    fn test_same_month() {
        let a = Date::from_ymd(2010, 11, 19).unwrap();
        let b = Date::from_ymd(2010, 11, 27).unwrap();
        let c = Date::from_ymd(2011, 11, 27).unwrap();
        assert!(a.same_month(&b));
        assert!(!a.same_month(&c));
    }

    #[test]
    fn test_parse_and_display() {
        let date: Date = "2025-06-15".parse().unwrap();
        assert_eq!(date, Date::from_ymd(2025, 6, 15).unwrap());
        assert_eq!(format!("{}", date), "2025-06-15");
        assert!(Date::parse("15/06/2025").is_err());
    }

    #[test]
    fn test_serde() {
        let date = Date::from_ymd(2025, 6, 15).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2025-06-15\"");
        let parsed: Date = serde_json::from_str(&json).unwrap();
        assert_eq!(date, parsed);
    }
}
