//! Calculation period schedules.
//!
//! A [`CalculationPeriodSchedule`] is the validated, immutable output of
//! every construction form: a contiguous list of unadjusted
//! [`CalculationPeriod`]s plus the realized stub classification at each
//! end. [`ScheduleGenerator`] carries the [`ScheduleSettings`] that govern
//! the policy choices; the `CalculationPeriodSchedule::from_*` associated
//! functions use the default settings.
//!
//! # Example
//!
//! ```rust
//! use tenor_core::{Date, Frequency, Period, RollConvention};
//! use tenor_schedules::{CalculationPeriodSchedule, StubKind, StubPeriodType};
//!
//! let schedule = CalculationPeriodSchedule::from_first_regular_date(
//!     Date::from_ymd(2007, 1, 5).unwrap(),
//!     Date::from_ymd(2012, 1, 5).unwrap(),
//!     Date::from_ymd(2007, 1, 26).unwrap(),
//!     Frequency::new(Period::months(3), RollConvention::DayOfMonth(26)),
//!     StubPeriodType::ShortFinal,
//! )
//! .unwrap();
//!
//! assert_eq!(schedule.len(), 21);
//! assert!(schedule.has_initial_stub());
//! assert_eq!(schedule.final_stub(), Some(StubKind::Short));
//! ```

use serde::Serialize;

use tenor_core::{Date, Frequency, Period, RollConvention};

use crate::calculation_period::CalculationPeriod;
use crate::config::{ScheduleSettings, TenorMismatchPolicy};
use crate::date_scheduler::{DateScheduler, GenerationDirection, ScheduledDates};
use crate::error::{ensure_positive, ensure_range, ScheduleError, ScheduleResult};
use crate::lattice::Lattice;
use crate::period_dates::CalculationPeriodDates;
use crate::stub::{EndPolicy, StubKind, StubPeriodType};

/// An ordered, contiguous list of unadjusted calculation periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationPeriodSchedule {
    periods: Vec<CalculationPeriod>,
    period_interval: Period,
    roll_convention: RollConvention,
    initial_stub: Option<StubKind>,
    final_stub: Option<StubKind>,
}

impl CalculationPeriodSchedule {
    /// Schedule over `start + tenor`, one period per `interval`.
    ///
    /// Fails with `NonDivisibleTenor` when `interval` does not divide
    /// `tenor`; use [`ScheduleGenerator`] to tolerate the mismatch or to
    /// request a stub.
    pub fn from_tenor(start: Date, tenor: Period, interval: Period) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_tenor(start, tenor, interval, StubPeriodType::None)
    }

    /// Like [`CalculationPeriodSchedule::from_tenor`], rolling every
    /// boundary with the frequency's convention.
    pub fn from_frequency(start: Date, tenor: Period, frequency: Frequency) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_frequency(start, tenor, frequency, StubPeriodType::None)
    }

    /// Schedule with an explicit first regular period start.
    pub fn from_first_regular_date(
        start: Date,
        end: Date,
        first_regular: Date,
        frequency: Frequency,
        stub: StubPeriodType,
    ) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_first_regular_date(start, end, first_regular, frequency, stub)
    }

    /// Schedule whose first regular period starts one
    /// `interval_to_first_regular` after `start`, rolled.
    pub fn from_first_regular_interval(
        start: Date,
        end: Date,
        interval_to_first_regular: Period,
        frequency: Frequency,
        stub: StubPeriodType,
    ) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_first_regular_interval(start, end, interval_to_first_regular, frequency, stub)
    }

    /// Schedule from a trade-level date definition.
    pub fn from_period_dates(dates: &CalculationPeriodDates) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_period_dates(dates)
    }

    /// Schedule under a single roll convention with automatic stub detection.
    pub fn from_roll_convention(
        start: Date,
        end: Date,
        interval: Period,
        roll: RollConvention,
        stub: StubPeriodType,
    ) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_roll_convention(start, end, interval, roll, stub)
    }

    /// `count` regular periods ending at `end`.
    pub fn from_termination_and_count(end: Date, interval: Period, count: u32) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_termination_and_count(end, interval, count)
    }

    /// Backward schedule with control over the leading remainder.
    pub fn from_termination_with_full_first(
        start: Date,
        end: Date,
        interval: Period,
        full_first_period: bool,
    ) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_termination_with_full_first(start, end, interval, full_first_period)
    }

    /// Schedule whose regular run ends at `last_regular_end`.
    pub fn from_last_regular_end(
        start: Date,
        end: Date,
        interval: Period,
        last_regular_end: Date,
        roll: RollConvention,
        stub: StubPeriodType,
    ) -> ScheduleResult<Self> {
        ScheduleGenerator::default().from_last_regular_end(start, end, interval, last_regular_end, roll, stub)
    }

    fn from_lattice(lattice: Lattice, merged_initial: bool) -> ScheduleResult<Self> {
        lattice.validate()?;

        let initial_stub = if merged_initial {
            None
        } else {
            lattice.initial_segment()?.map(|s| s.kind)
        };
        let final_stub = lattice.final_segment()?.map(|s| s.kind);

        let periods = lattice
            .dates
            .windows(2)
            .map(|w| CalculationPeriod::new(w[0], w[1]))
            .collect::<ScheduleResult<Vec<_>>>()?;

        tracing::debug!(
            start = %lattice.dates[0],
            end = %lattice.dates[lattice.dates.len() - 1],
            interval = %lattice.interval,
            periods = periods.len(),
            initial_stub = ?initial_stub,
            final_stub = ?final_stub,
            "built calculation period schedule"
        );

        Ok(Self {
            periods,
            period_interval: lattice.interval,
            roll_convention: lattice.roll,
            initial_stub,
            final_stub,
        })
    }

    /// Returns the periods.
    pub fn periods(&self) -> &[CalculationPeriod] {
        &self.periods
    }

    /// Returns the number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns true if there are no periods.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Returns the first period.
    pub fn first(&self) -> Option<&CalculationPeriod> {
        self.periods.first()
    }

    /// Returns the last period.
    pub fn last(&self) -> Option<&CalculationPeriod> {
        self.periods.last()
    }

    /// Returns all boundary dates, effective through termination.
    pub fn dates(&self) -> Vec<Date> {
        let mut dates: Vec<Date> = self.start_dates().collect();
        if let Some(last) = self.periods.last() {
            dates.push(last.unadjusted_end);
        }
        dates
    }

    /// Returns the period start dates.
    pub fn start_dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.periods.iter().map(|p| p.unadjusted_start)
    }

    /// Returns the period end dates.
    pub fn end_dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.periods.iter().map(|p| p.unadjusted_end)
    }

    /// Returns the regular period interval.
    pub fn period_interval(&self) -> Period {
        self.period_interval
    }

    /// Returns the roll convention boundaries were snapped with.
    pub fn roll_convention(&self) -> RollConvention {
        self.roll_convention
    }

    /// Returns true if the first period is an irregular stub.
    pub fn has_initial_stub(&self) -> bool {
        self.initial_stub.is_some()
    }

    /// Returns true if the last period is an irregular stub.
    pub fn has_final_stub(&self) -> bool {
        self.final_stub.is_some()
    }

    /// Realized shape of the first period, if irregular.
    pub fn initial_stub(&self) -> Option<StubKind> {
        self.initial_stub
    }

    /// Realized shape of the last period, if irregular.
    pub fn final_stub(&self) -> Option<StubKind> {
        self.final_stub
    }

    /// Returns the start of the first period.
    pub fn effective_date(&self) -> Date {
        self.periods[0].unadjusted_start
    }

    /// Returns the end of the last period.
    pub fn termination_date(&self) -> Date {
        self.periods[self.periods.len() - 1].unadjusted_end
    }

    /// Iterates over the periods.
    pub fn iter(&self) -> std::slice::Iter<'_, CalculationPeriod> {
        self.periods.iter()
    }
}

impl<'a> IntoIterator for &'a CalculationPeriodSchedule {
    type Item = &'a CalculationPeriod;
    type IntoIter = std::slice::Iter<'a, CalculationPeriod>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}

impl IntoIterator for CalculationPeriodSchedule {
    type Item = CalculationPeriod;
    type IntoIter = std::vec::IntoIter<CalculationPeriod>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.into_iter()
    }
}

/// Builds [`CalculationPeriodSchedule`]s under a set of [`ScheduleSettings`].
#[derive(Debug, Clone, Default)]
pub struct ScheduleGenerator {
    settings: ScheduleSettings,
}

impl ScheduleGenerator {
    /// Creates a generator with the given settings.
    #[must_use]
    pub fn new(settings: ScheduleSettings) -> Self {
        Self { settings }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    /// Schedule from `start` over `tenor`, unrolled.
    ///
    /// An initial stub request generates backward from `start + tenor`;
    /// anything else generates forward.
    ///
    /// # Errors
    ///
    /// `NonDivisibleTenor` when `interval` does not divide `tenor`, no stub
    /// is requested and the settings reject mismatches.
    pub fn from_tenor(
        &self,
        start: Date,
        tenor: Period,
        interval: Period,
        stub: StubPeriodType,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        self.from_frequency(start, tenor, Frequency::unrolled(interval), stub)
    }

    /// Schedule from `start` over `tenor`, rolled with the frequency's
    /// convention.
    pub fn from_frequency(
        &self,
        start: Date,
        tenor: Period,
        frequency: Frequency,
        stub: StubPeriodType,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        let interval = frequency.period;
        ensure_positive(interval)?;

        if stub == StubPeriodType::None && tenor.whole_multiple_of(&interval)?.is_none() {
            match self.settings.tenor_mismatch {
                TenorMismatchPolicy::Reject => {
                    return Err(ScheduleError::non_divisible(tenor, interval));
                }
                TenorMismatchPolicy::Tolerate => {
                    tracing::warn!(
                        start = %start,
                        tenor = %tenor,
                        interval = %interval,
                        "tenor is not a whole multiple of the period interval, final stub follows"
                    );
                }
            }
        }

        let end = tenor.add_to(start)?;
        self.from_roll_convention(start, end, interval, frequency.roll_convention, stub)
    }

    /// Schedule with a front segment to `first_regular` and regular
    /// periods from there.
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` unless `start <= first_regular < end`.
    pub fn from_first_regular_date(
        &self,
        start: Date,
        end: Date,
        first_regular: Date,
        frequency: Frequency,
        stub: StubPeriodType,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        ensure_range(start, end)?;
        if first_regular < start || first_regular >= end {
            return Err(ScheduleError::construction(format!(
                "first regular period date {first_regular} outside [{start}, {end})"
            )));
        }

        let interval = frequency.period;
        let roll = frequency.roll_convention;
        let back = DateScheduler::from_effective_date(first_regular, end, interval, roll)?;
        let scheduled = prepend_front(start, back, interval, roll)?;
        self.shape(Lattice::new(scheduled, interval, roll), stub)
    }

    /// Schedule whose first regular period starts at
    /// `roll(start + interval_to_first_regular)`.
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` for a non-positive offset or one that lands
    /// on or after `end`.
    pub fn from_first_regular_interval(
        &self,
        start: Date,
        end: Date,
        interval_to_first_regular: Period,
        frequency: Frequency,
        stub: StubPeriodType,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        ensure_positive(interval_to_first_regular)?;
        let first_regular = frequency
            .roll_convention
            .adjust(interval_to_first_regular.add_to(start)?);
        self.from_first_regular_date(start, end, first_regular, frequency, stub)
    }

    /// Schedule from a trade-level date definition.
    ///
    /// The first period starts at `first_period_start` when given and at
    /// the effective date otherwise. With both regular-run bounds the run
    /// between them must be regular throughout; with one bound this is
    /// [`from_first_regular_date`](Self::from_first_regular_date) or
    /// [`from_last_regular_end`](Self::from_last_regular_end); with none it
    /// is [`from_roll_convention`](Self::from_roll_convention).
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` when the regular-run bounds are out of order
    /// or stepping from the first regular start does not land on the last
    /// regular end.
    pub fn from_period_dates(&self, dates: &CalculationPeriodDates) -> ScheduleResult<CalculationPeriodSchedule> {
        let start = dates.start_date();
        let end = dates.termination_date;
        let frequency = dates.frequency;
        let interval = frequency.period;
        let roll = frequency.roll_convention;

        match (dates.first_regular_period_start, dates.last_regular_period_end) {
            (Some(first_regular), Some(last_regular)) => {
                ensure_range(start, end)?;
                if first_regular < start || first_regular >= last_regular || last_regular > end {
                    return Err(ScheduleError::construction(format!(
                        "regular run [{first_regular}, {last_regular}] outside [{start}, {end}]"
                    )));
                }

                let run = DateScheduler::from_effective_date(first_regular, last_regular, interval, roll)?;
                if run.has_initial_stub() || run.has_final_stub() {
                    return Err(ScheduleError::construction(format!(
                        "irregular period between first regular start {first_regular} and last regular end {last_regular}"
                    )));
                }

                let mut scheduled = prepend_front(start, run, interval, roll)?;
                if last_regular < end {
                    scheduled.dates.push(end);
                }
                self.shape(Lattice::new(scheduled, interval, roll), dates.stub)
            }
            (Some(first_regular), None) => {
                self.from_first_regular_date(start, end, first_regular, frequency, dates.stub)
            }
            (None, Some(last_regular)) => {
                self.from_last_regular_end(start, end, interval, last_regular, roll, dates.stub)
            }
            (None, None) => self.from_roll_convention(start, end, interval, roll, dates.stub),
        }
    }

    /// Schedule under one roll convention.
    ///
    /// Generation is backward for an initial stub request and forward
    /// otherwise, so an exact multiple with aligned roll days has no stub.
    pub fn from_roll_convention(
        &self,
        start: Date,
        end: Date,
        interval: Period,
        roll: RollConvention,
        stub: StubPeriodType,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        let direction = if stub.is_initial() {
            GenerationDirection::Backward
        } else {
            GenerationDirection::Forward
        };
        let scheduled = DateScheduler::generate(direction, start, end, interval, roll)?;
        self.shape(Lattice::new(scheduled, interval, roll), stub)
    }

    /// `count` unrolled periods stepping back from `end`.
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` for a zero count or non-positive interval.
    pub fn from_termination_and_count(
        &self,
        end: Date,
        interval: Period,
        count: u32,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        ensure_positive(interval)?;
        if count == 0 {
            return Err(ScheduleError::construction("period count must be at least 1"));
        }
        let count = i32::try_from(count)
            .map_err(|_| ScheduleError::construction(format!("period count {count} too large")))?;

        let dates = (0..=count)
            .rev()
            .map(|k| interval.times(-k).add_to(end).map_err(ScheduleError::from))
            .collect::<ScheduleResult<Vec<_>>>()?;

        let scheduled = ScheduledDates {
            first_regular_start: dates[0],
            last_regular_end: end,
            dates,
        };
        CalculationPeriodSchedule::from_lattice(
            Lattice::new(scheduled, interval, RollConvention::NoAdjustment),
            false,
        )
    }

    /// Backward schedule from `end`, unrolled.
    ///
    /// With `full_first_period` the leading remainder is merged into the
    /// first regular period, which then counts as regular, provided the
    /// merged period is at most
    /// [`ScheduleSettings::max_merged_period_ratio`] regular periods long.
    /// Otherwise, and always without the flag, the remainder is a
    /// standalone short stub.
    pub fn from_termination_with_full_first(
        &self,
        start: Date,
        end: Date,
        interval: Period,
        full_first_period: bool,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        let roll = RollConvention::NoAdjustment;
        let scheduled = DateScheduler::from_termination_date(start, end, interval, roll)?;
        let mut lattice = Lattice::new(scheduled, interval, roll);

        let Some(segment) = lattice.initial_segment()? else {
            return CalculationPeriodSchedule::from_lattice(lattice, false);
        };
        if !full_first_period {
            lattice.apply_initial(EndPolicy::Force(StubKind::Short))?;
            return CalculationPeriodSchedule::from_lattice(lattice, false);
        }

        let merged_end = match segment.kind {
            StubKind::Long => lattice.first_regular_start,
            StubKind::Short if lattice.has_regular_run() => lattice.dates[2],
            StubKind::Short => {
                tracing::debug!(start = %start, end = %end, "no regular period to merge first stub into");
                return CalculationPeriodSchedule::from_lattice(lattice, false);
            }
        };

        let merged_years = start.days_between(&merged_end) as f64 / 365.0;
        let bound = self.settings.max_merged_period_ratio * interval.to_year_fraction();
        if merged_years <= bound {
            if segment.kind == StubKind::Short {
                lattice.merge_initial();
            }
            CalculationPeriodSchedule::from_lattice(lattice, true)
        } else {
            tracing::debug!(
                start = %start,
                merged_end = %merged_end,
                merged_years,
                bound,
                "merged first period too long, keeping standalone stub"
            );
            lattice.apply_initial(EndPolicy::Force(StubKind::Short))?;
            CalculationPeriodSchedule::from_lattice(lattice, false)
        }
    }

    /// Schedule whose regular run is generated backward from
    /// `last_regular_end` to `start`, followed by a final segment to `end`.
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` unless `start < last_regular_end <= end`.
    pub fn from_last_regular_end(
        &self,
        start: Date,
        end: Date,
        interval: Period,
        last_regular_end: Date,
        roll: RollConvention,
        stub: StubPeriodType,
    ) -> ScheduleResult<CalculationPeriodSchedule> {
        ensure_range(start, end)?;
        if last_regular_end <= start || last_regular_end > end {
            return Err(ScheduleError::construction(format!(
                "last regular period end {last_regular_end} outside ({start}, {end}]"
            )));
        }

        let run = DateScheduler::from_termination_date(start, last_regular_end, interval, roll)?;
        let mut dates = run.dates;
        if last_regular_end < end {
            dates.push(end);
        }

        let scheduled = ScheduledDates {
            dates,
            first_regular_start: run.first_regular_start,
            last_regular_end,
        };
        self.shape(Lattice::new(scheduled, interval, roll), stub)
    }

    fn shape(&self, mut lattice: Lattice, stub: StubPeriodType) -> ScheduleResult<CalculationPeriodSchedule> {
        lattice.apply_initial(stub.initial_policy())?;
        lattice.apply_final(stub.final_policy())?;
        CalculationPeriodSchedule::from_lattice(lattice, false)
    }
}

/// Joins a front segment generated backward from the start of `run` to
/// `start`. The run's regular start moves to wherever the front segment's
/// regular run begins.
fn prepend_front(
    start: Date,
    run: ScheduledDates,
    interval: Period,
    roll: RollConvention,
) -> ScheduleResult<ScheduledDates> {
    let run_start = run.dates[0];
    if run_start <= start {
        return Ok(run);
    }

    let front = DateScheduler::from_termination_date(start, run_start, interval, roll)?;
    let mut dates = front.dates;
    dates.pop();
    dates.extend(run.dates);
    Ok(ScheduledDates {
        dates,
        first_regular_start: front.first_regular_start,
        last_regular_end: run.last_regular_end,
    })
}
