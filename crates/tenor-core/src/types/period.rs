//! Periods: signed (multiplier, unit) calendar intervals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Mul, Neg};
use std::str::FromStr;

use super::Date;
use crate::error::{TenorError, TenorResult};

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days
    Day,
    /// Weeks of seven days
    Week,
    /// Calendar months
    Month,
    /// Calendar years
    Year,
}

impl TimeUnit {
    /// Single-letter code used in period text (`D`, `W`, `M`, `Y`).
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            TimeUnit::Day => 'D',
            TimeUnit::Week => 'W',
            TimeUnit::Month => 'M',
            TimeUnit::Year => 'Y',
        }
    }

    /// Returns true for the month-based units (`Month`, `Year`).
    #[must_use]
    pub fn is_month_based(&self) -> bool {
        matches!(self, TimeUnit::Month | TimeUnit::Year)
    }

    fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'D' => Some(TimeUnit::Day),
            'W' => Some(TimeUnit::Week),
            'M' => Some(TimeUnit::Month),
            'Y' => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

/// A calendar interval such as `3M` or `1Y`.
///
/// Periods used as schedule frequencies are strictly positive; negative
/// multipliers only appear in intermediate arithmetic (for instance
/// stepping backwards from a termination date).
///
/// # Example
///
/// ```rust
/// use tenor_core::types::{Date, Period};
///
/// let quarter: Period = "3M".parse().unwrap();
/// let start = Date::from_ymd(2024, 11, 30).unwrap();
/// assert_eq!(quarter.add_to(start).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
/// assert_eq!(Period::years(5).whole_multiple_of(&quarter).unwrap(), Some(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Number of units, negative only for backward stepping
    pub multiplier: i32,
    /// Unit of the interval
    pub unit: TimeUnit,
}

impl Period {
    /// Creates a period from a multiplier and unit.
    #[must_use]
    pub const fn new(multiplier: i32, unit: TimeUnit) -> Self {
        Self { multiplier, unit }
    }

    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Day)
    }

    /// A period of `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Week)
    }

    /// A period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Month)
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Year)
    }

    /// Parses period text such as `3M`, `10d` or `-1Y`.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidPeriod` for malformed text.
    pub fn parse(s: &str) -> TenorResult<Self> {
        let text = s.trim();
        let mut chars = text.chars();
        let unit = chars
            .next_back()
            .and_then(TimeUnit::from_code)
            .ok_or_else(|| TenorError::invalid_period(format!("missing unit in '{s}'")))?;
        let multiplier = chars
            .as_str()
            .parse::<i32>()
            .map_err(|_| TenorError::invalid_period(format!("bad multiplier in '{s}'")))?;
        Ok(Self::new(multiplier, unit))
    }

    /// Returns true if the multiplier is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.multiplier > 0
    }

    /// Returns true if the multiplier is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.multiplier == 0
    }

    /// Adds two periods of the same unit.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::IncompatibleUnits` when the units differ.
    pub fn try_add(&self, other: &Period) -> TenorResult<Period> {
        if self.unit != other.unit {
            return Err(TenorError::incompatible_units(*self, *other));
        }
        self.multiplier
            .checked_add(other.multiplier)
            .map(|m| Period::new(m, self.unit))
            .ok_or_else(|| TenorError::invalid_period(format!("{self} + {other} overflows")))
    }

    /// Subtracts a period of the same unit.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::IncompatibleUnits` when the units differ.
    pub fn try_sub(&self, other: &Period) -> TenorResult<Period> {
        self.try_add(&other.negate())
    }

    /// Returns the period with its sign flipped.
    #[must_use]
    pub fn negate(&self) -> Period {
        Period::new(self.multiplier.saturating_neg(), self.unit)
    }

    /// Scales the period by an integer factor.
    #[must_use]
    pub fn times(&self, factor: i32) -> Period {
        Period::new(self.multiplier.saturating_mul(factor), self.unit)
    }

    /// Approximate length in years: days/365, weeks/52, months/12.
    ///
    /// Calendar-naive and only meant for coarse comparisons such as stub
    /// length classification, never for accrual.
    #[must_use]
    pub fn to_year_fraction(&self) -> f64 {
        let m = f64::from(self.multiplier);
        match self.unit {
            TimeUnit::Day => m / 365.0,
            TimeUnit::Week => m / 52.0,
            TimeUnit::Month => m / 12.0,
            TimeUnit::Year => m,
        }
    }

    /// Adds the period to a date.
    ///
    /// Month and year arithmetic clamps to the end of a shorter target month.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the result is out of range.
    pub fn add_to(&self, date: Date) -> TenorResult<Date> {
        match self.unit {
            TimeUnit::Day => date.add_days(i64::from(self.multiplier)),
            TimeUnit::Week => date.add_days(i64::from(self.multiplier) * 7),
            TimeUnit::Month => date.add_months(self.multiplier),
            TimeUnit::Year => date.add_years(self.multiplier),
        }
    }

    /// Subtracts the period from a date.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::InvalidDate` if the result is out of range.
    pub fn subtract_from(&self, date: Date) -> TenorResult<Date> {
        self.negate().add_to(date)
    }

    /// Ratio of this period's length to `other`'s.
    ///
    /// Years are compared as 12 months and weeks as 7 days.
    ///
    /// # Errors
    ///
    /// Returns `TenorError::IncompatibleUnits` when one period is month-based
    /// and the other day-based, and `TenorError::InvalidPeriod` when `other`
    /// is zero.
    pub fn divide(&self, other: &Period) -> TenorResult<f64> {
        let (num, den) = self.normalized_pair(other)?;
        Ok(num as f64 / den as f64)
    }

    /// Returns how many times `other` fits into this period, if exactly.
    ///
    /// `Ok(None)` means the division leaves a remainder or is not positive.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Period::divide`].
    pub fn whole_multiple_of(&self, other: &Period) -> TenorResult<Option<u32>> {
        let (num, den) = self.normalized_pair(other)?;
        if num % den != 0 {
            return Ok(None);
        }
        Ok(u32::try_from(num / den).ok().filter(|&n| n > 0))
    }

    /// Multiplier expressed in the base unit (months or days).
    fn base_units(&self) -> i64 {
        let m = i64::from(self.multiplier);
        match self.unit {
            TimeUnit::Day | TimeUnit::Month => m,
            TimeUnit::Week => m * 7,
            TimeUnit::Year => m * 12,
        }
    }

    fn normalized_pair(&self, other: &Period) -> TenorResult<(i64, i64)> {
        if self.unit.is_month_based() != other.unit.is_month_based() {
            return Err(TenorError::incompatible_units(*self, *other));
        }
        let den = other.base_units();
        if den == 0 {
            return Err(TenorError::invalid_period(format!("cannot divide {self} by {other}")));
        }
        Ok((self.base_units(), den))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit.code())
    }
}

impl FromStr for Period {
    type Err = TenorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl Mul<i32> for Period {
    type Output = Period;

    fn mul(self, factor: i32) -> Self::Output {
        self.times(factor)
    }
}
