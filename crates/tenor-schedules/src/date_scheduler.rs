//! Single-frequency date generation.
//!
//! [`DateScheduler`] produces the raw boundary lattice for one interval and
//! one roll convention, stepping forward from the effective date or
//! backward from the termination date. It applies no stub policy: the
//! remainder is left wherever the stepping direction puts it, and the
//! returned [`ScheduledDates`] marks where the run of regular periods
//! starts and ends.
//!
//! # Example
//!
//! ```rust
//! use tenor_core::{Date, Period, RollConvention};
//! use tenor_schedules::DateScheduler;
//!
//! let lattice = DateScheduler::from_effective_date(
//!     Date::from_ymd(2009, 5, 1).unwrap(),
//!     Date::from_ymd(2010, 11, 27).unwrap(),
//!     Period::months(3),
//!     RollConvention::DayOfMonth(19),
//! )
//! .unwrap();
//!
//! assert_eq!(lattice.dates.len(), 7);
//! assert_eq!(lattice.first_regular_start, Date::from_ymd(2009, 8, 19).unwrap());
//! assert_eq!(lattice.last_regular_end, Date::from_ymd(2010, 8, 19).unwrap());
//! ```

use serde::{Deserialize, Serialize};

use tenor_core::{Date, Period, RollConvention};

use crate::error::{ensure_positive, ensure_range, ScheduleError, ScheduleResult};

/// Direction in which boundaries are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenerationDirection {
    /// From the effective date towards termination; remainder at the end
    #[default]
    Forward,
    /// From the termination date towards the effective date; remainder at the start
    Backward,
}

/// Boundary dates produced by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDates {
    /// Sorted boundaries, first = effective date, last = termination date
    pub dates: Vec<Date>,
    /// Start of the first regular-length period
    pub first_regular_start: Date,
    /// End of the last regular-length period
    pub last_regular_end: Date,
}

impl ScheduledDates {
    /// Returns true if the first period is irregular.
    #[must_use]
    pub fn has_initial_stub(&self) -> bool {
        self.dates.first() != Some(&self.first_regular_start)
    }

    /// Returns true if the last period is irregular.
    #[must_use]
    pub fn has_final_stub(&self) -> bool {
        self.dates.last() != Some(&self.last_regular_end)
    }

    /// Iterates over consecutive `(start, end)` boundary pairs.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.dates.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Coupon dates bracketing an effective (settlement) date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDates {
    /// All coupon dates from the last one on or before the effective date
    /// up to maturity
    pub dates: Vec<Date>,
    /// Last coupon date on or before the effective date
    pub last_coupon: Date,
    /// First coupon date after the effective date
    pub next_coupon: Date,
}

/// Generator of single-frequency boundary lattices.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateScheduler;

impl DateScheduler {
    /// Rolls forward from `effective` until `termination`.
    ///
    /// The k-th boundary is `roll(effective + k * interval)`. Generation
    /// stops at the first candidate on or after `termination`, or, for
    /// month-based intervals, at the first candidate falling in the
    /// termination month; `termination` replaces that candidate so the
    /// last segment absorbs the difference.
    ///
    /// # Errors
    ///
    /// - `DegenerateRange` if `effective >= termination`
    /// - `ScheduleConstruction` for a non-positive interval or a roll
    ///   convention used with a day or week interval
    pub fn from_effective_date(
        effective: Date,
        termination: Date,
        interval: Period,
        roll: RollConvention,
    ) -> ScheduleResult<ScheduledDates> {
        validate(effective, termination, interval, roll)?;
        let month_based = interval.unit.is_month_based();

        let first_step = interval.add_to(effective)?;
        let first_rolled = roll.adjust(first_step);
        let first_regular_start = if first_rolled == first_step || roll.adjust(effective) == effective {
            effective
        } else {
            first_rolled
        };

        let mut dates = vec![effective];
        let mut k = 1;
        let last_regular_end = loop {
            let candidate = roll.adjust(interval.times(k).add_to(effective)?);
            let previous = dates[dates.len() - 1];
            if candidate >= termination || (month_based && candidate.same_month(&termination)) {
                dates.push(termination);
                break if candidate == termination {
                    termination
                } else {
                    previous
                };
            }
            dates.push(candidate);
            k += 1;
        };

        Ok(ScheduledDates {
            dates,
            first_regular_start: first_regular_start.min(last_regular_end),
            last_regular_end,
        })
    }

    /// Rolls backward from `termination` until `effective`.
    ///
    /// Mirror image of [`DateScheduler::from_effective_date`]: the first
    /// boundary is forced to `effective` and any remainder lands in the
    /// first period.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DateScheduler::from_effective_date`].
    pub fn from_termination_date(
        effective: Date,
        termination: Date,
        interval: Period,
        roll: RollConvention,
    ) -> ScheduleResult<ScheduledDates> {
        validate(effective, termination, interval, roll)?;
        let month_based = interval.unit.is_month_based();

        let first_step = interval.subtract_from(termination)?;
        let first_rolled = roll.adjust(first_step);
        let last_regular_end = if first_rolled == first_step || roll.adjust(termination) == termination {
            termination
        } else {
            first_rolled
        };

        let mut dates = vec![termination];
        let mut k = 1;
        let first_regular_start = loop {
            let candidate = roll.adjust(interval.times(-k).add_to(termination)?);
            let previous = dates[dates.len() - 1];
            if candidate <= effective || (month_based && candidate.same_month(&effective)) {
                dates.push(effective);
                break if candidate == effective {
                    effective
                } else {
                    previous
                };
            }
            dates.push(candidate);
            k += 1;
        };
        dates.reverse();

        Ok(ScheduledDates {
            dates,
            first_regular_start,
            last_regular_end: last_regular_end.max(first_regular_start),
        })
    }

    /// Dispatches to forward or backward generation.
    pub fn generate(
        direction: GenerationDirection,
        effective: Date,
        termination: Date,
        interval: Period,
        roll: RollConvention,
    ) -> ScheduleResult<ScheduledDates> {
        match direction {
            GenerationDirection::Forward => {
                Self::from_effective_date(effective, termination, interval, roll)
            }
            GenerationDirection::Backward => {
                Self::from_termination_date(effective, termination, interval, roll)
            }
        }
    }

    /// Plain lattice `effective + k * interval` for `k = 0..=n`, where the
    /// interval divides `tenor` exactly `n` times.
    ///
    /// # Errors
    ///
    /// Returns `NonDivisibleTenor` if `interval` does not divide `tenor`.
    pub fn regular_dates(effective: Date, tenor: Period, interval: Period) -> ScheduleResult<Vec<Date>> {
        ensure_positive(interval)?;
        let count = tenor
            .whole_multiple_of(&interval)?
            .ok_or_else(|| ScheduleError::non_divisible(tenor, interval))?;
        let count = i32::try_from(count)
            .map_err(|_| ScheduleError::construction(format!("{count} periods of {interval} is too many")))?;

        (0..=count)
            .map(|k| {
                interval
                    .times(k)
                    .add_to(effective)
                    .map_err(ScheduleError::from)
            })
            .collect()
    }

    /// Coupon dates stepped back from `maturity` until one falls on or
    /// before `effective`.
    ///
    /// Used to find the coupon period a settlement date sits in.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DateScheduler::from_effective_date`].
    pub fn coupon_dates_from_maturity(
        effective: Date,
        maturity: Date,
        interval: Period,
        roll: RollConvention,
    ) -> ScheduleResult<CouponDates> {
        validate(effective, maturity, interval, roll)?;

        let mut dates = vec![maturity];
        let mut k = 1;
        loop {
            let candidate = roll.adjust(interval.times(-k).add_to(maturity)?);
            dates.push(candidate);
            if candidate <= effective {
                break;
            }
            k += 1;
        }
        dates.reverse();

        Ok(CouponDates {
            last_coupon: dates[0],
            next_coupon: dates[1],
            dates,
        })
    }
}

fn validate(
    effective: Date,
    termination: Date,
    interval: Period,
    roll: RollConvention,
) -> ScheduleResult<()> {
    ensure_range(effective, termination)?;
    ensure_positive(interval)?;
    ensure_roll_compatible(interval, roll)
}

/// Roll conventions snap within a month, so they only make sense when
/// consecutive boundaries fall in different months.
pub(crate) fn ensure_roll_compatible(interval: Period, roll: RollConvention) -> ScheduleResult<()> {
    if roll.is_none() || interval.unit.is_month_based() {
        Ok(())
    } else {
        Err(ScheduleError::construction(format!(
            "roll convention {roll} requires a month or year interval, got {interval}"
        )))
    }
}
