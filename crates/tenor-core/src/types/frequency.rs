//! Calculation-period frequency: a period paired with a roll convention.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Period, RollConvention};
use crate::error::TenorError;

/// How often a leg rolls and which day of the month it rolls on.
///
/// Text form is `<period>[/<roll convention>]`, e.g. `3M/EOM`, `6M/15`
/// or plain `1Y` for an unrolled frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frequency {
    /// Length of one regular period
    pub period: Period,
    /// Day-of-month rule applied to every generated date
    pub roll_convention: RollConvention,
}

impl Frequency {
    /// Creates a frequency with an explicit roll convention.
    #[must_use]
    pub const fn new(period: Period, roll_convention: RollConvention) -> Self {
        Self {
            period,
            roll_convention,
        }
    }

    /// Creates a frequency that never snaps generated dates.
    #[must_use]
    pub const fn unrolled(period: Period) -> Self {
        Self::new(period, RollConvention::NoAdjustment)
    }
}

impl From<Period> for Frequency {
    fn from(period: Period) -> Self {
        Self::unrolled(period)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.roll_convention.is_none() {
            write!(f, "{}", self.period)
        } else {
            write!(f, "{}/{}", self.period, self.roll_convention)
        }
    }
}

impl FromStr for Frequency {
    type Err = TenorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((period, roll)) => Ok(Self::new(period.parse()?, roll.parse()?)),
            None => Ok(Self::unrolled(s.parse()?)),
        }
    }
}
