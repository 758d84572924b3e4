//! Multi-segment schedules whose roll frequency changes over the trade.
//!
//! Each [`MetaScheduleItem`] says how long a segment runs and which roll
//! frequency and convention apply inside it. [`MetaScheduleComposer`]
//! stitches the per-segment [`DateScheduler`] output together, the end of
//! one segment being the start of the next, and continues with a regular
//! tail until the termination date.
//!
//! Segments whose roll frequency does not divide their length keep the
//! irregular remainder inside the segment; no stub merging is applied.

use serde::{Deserialize, Serialize};

use tenor_core::{Date, Frequency, Period, RollConvention};

use crate::date_scheduler::{ensure_roll_compatible, DateScheduler, GenerationDirection};
use crate::error::{ensure_positive, ensure_range, ScheduleError, ScheduleResult};

/// One segment of a meta schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetaScheduleItem {
    /// Length of the segment
    pub period: Period,
    /// Period between boundaries inside the segment
    pub roll_frequency: Period,
    /// Convention snapping every boundary of the segment
    pub roll_convention: RollConvention,
}

impl MetaScheduleItem {
    /// Creates a segment.
    #[must_use]
    pub const fn new(period: Period, roll_frequency: Period, roll_convention: RollConvention) -> Self {
        Self {
            period,
            roll_frequency,
            roll_convention,
        }
    }

    /// The roll frequency and convention as a [`Frequency`].
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        Frequency::new(self.roll_frequency, self.roll_convention)
    }

    fn validate(&self) -> ScheduleResult<()> {
        ensure_positive(self.period)?;
        ensure_positive(self.roll_frequency)?;
        if self.period.divide(&self.roll_frequency)? < 1.0 {
            return Err(ScheduleError::construction(format!(
                "roll frequency {} is longer than segment {}",
                self.roll_frequency, self.period
            )));
        }
        ensure_roll_compatible(self.roll_frequency, self.roll_convention)
    }
}

/// Composes an ordered list of [`MetaScheduleItem`]s into one boundary list.
///
/// # Example
///
/// ```rust
/// use tenor_core::{Date, Frequency, Period, RollConvention};
/// use tenor_schedules::{GenerationDirection, MetaScheduleComposer, MetaScheduleItem};
///
/// // Monthly for six months, quarterly thereafter
/// let composer = MetaScheduleComposer::new(vec![MetaScheduleItem::new(
///     Period::months(6),
///     Period::months(1),
///     RollConvention::NoAdjustment,
/// )])
/// .unwrap()
/// .with_tail(Frequency::unrolled(Period::months(3)))
/// .unwrap();
///
/// let dates = composer
///     .compose(
///         Date::from_ymd(2025, 1, 15).unwrap(),
///         Some(Date::from_ymd(2026, 1, 15).unwrap()),
///         GenerationDirection::Forward,
///     )
///     .unwrap();
/// assert_eq!(dates.len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaScheduleComposer {
    segments: Vec<MetaScheduleItem>,
    tail: Option<Frequency>,
}

impl MetaScheduleComposer {
    /// Creates a composer after validating every segment.
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` for an empty list, a non-positive period or
    /// roll frequency, a roll frequency longer than its segment, or a roll
    /// convention incompatible with the roll frequency. Mixing month-based
    /// and day-based units in one segment is a `Core` unit error.
    pub fn new(segments: Vec<MetaScheduleItem>) -> ScheduleResult<Self> {
        if segments.is_empty() {
            return Err(ScheduleError::construction("meta schedule needs at least one segment"));
        }
        for segment in &segments {
            segment.validate()?;
        }
        Ok(Self { segments, tail: None })
    }

    /// Overrides the frequency of the tail after the last segment.
    pub fn with_tail(mut self, tail: Frequency) -> ScheduleResult<Self> {
        ensure_positive(tail.period)?;
        ensure_roll_compatible(tail.period, tail.roll_convention)?;
        self.tail = Some(tail);
        Ok(self)
    }

    /// Returns the segments.
    pub fn segments(&self) -> &[MetaScheduleItem] {
        &self.segments
    }

    /// Frequency of the tail: the override, or the last segment's.
    pub fn tail(&self) -> Frequency {
        match self.tail {
            Some(tail) => tail,
            None => self.segments[self.segments.len() - 1].frequency(),
        }
    }

    /// Generates the boundary dates.
    ///
    /// Forward composition lays segments out from `start`, each ending at
    /// `roll(boundary + period)` clamped to `end`, then runs the tail to
    /// `end`. Without `end` it stops at the last segment boundary.
    ///
    /// Backward composition lays segments out from `end` toward `start`,
    /// the first segment adjacent to `end`, then runs the tail back to
    /// `start`; `end` is required.
    ///
    /// The result is sorted with no duplicates.
    pub fn compose(
        &self,
        start: Date,
        end: Option<Date>,
        direction: GenerationDirection,
    ) -> ScheduleResult<Vec<Date>> {
        let mut dates = match direction {
            GenerationDirection::Forward => self.compose_forward(start, end)?,
            GenerationDirection::Backward => {
                let end = end.ok_or_else(|| {
                    ScheduleError::construction("backward meta schedule requires a termination date")
                })?;
                self.compose_backward(start, end)?
            }
        };
        dates.sort_unstable();
        dates.dedup();

        tracing::debug!(
            start = %start,
            segments = self.segments.len(),
            direction = ?direction,
            dates = dates.len(),
            "composed meta schedule"
        );
        Ok(dates)
    }

    fn compose_forward(&self, start: Date, end: Option<Date>) -> ScheduleResult<Vec<Date>> {
        if let Some(end) = end {
            ensure_range(start, end)?;
        }

        let mut dates = vec![start];
        let mut cursor = start;
        for segment in &self.segments {
            if end.is_some_and(|end| cursor >= end) {
                break;
            }
            let mut boundary = segment.roll_convention.adjust(segment.period.add_to(cursor)?);
            if let Some(end) = end {
                boundary = boundary.min(end);
            }
            if boundary <= cursor {
                return Err(ScheduleError::construction(format!(
                    "segment {} does not advance past {cursor}",
                    segment.period
                )));
            }
            let part = DateScheduler::from_effective_date(
                cursor,
                boundary,
                segment.roll_frequency,
                segment.roll_convention,
            )?;
            dates.extend(part.dates.into_iter().skip(1));
            cursor = boundary;
        }

        if let Some(end) = end.filter(|&end| cursor < end) {
            let tail = self.tail();
            let part = DateScheduler::from_effective_date(cursor, end, tail.period, tail.roll_convention)?;
            dates.extend(part.dates.into_iter().skip(1));
        }
        Ok(dates)
    }

    fn compose_backward(&self, start: Date, end: Date) -> ScheduleResult<Vec<Date>> {
        ensure_range(start, end)?;

        let mut dates = vec![end];
        let mut cursor = end;
        for segment in &self.segments {
            if cursor <= start {
                break;
            }
            let boundary = segment
                .roll_convention
                .adjust(segment.period.subtract_from(cursor)?)
                .max(start);
            if boundary >= cursor {
                return Err(ScheduleError::construction(format!(
                    "segment {} does not advance before {cursor}",
                    segment.period
                )));
            }
            let part = DateScheduler::from_termination_date(
                boundary,
                cursor,
                segment.roll_frequency,
                segment.roll_convention,
            )?;
            dates.extend(part.dates.into_iter().rev().skip(1));
            cursor = boundary;
        }

        if cursor > start {
            let tail = self.tail();
            let part = DateScheduler::from_termination_date(start, cursor, tail.period, tail.roll_convention)?;
            dates.extend(part.dates.into_iter().rev().skip(1));
        }
        Ok(dates)
    }

    /// Steps an unsnapped reference date through `breakpoints`, snapping
    /// each boundary with its own convention.
    ///
    /// Returns `start` followed by one boundary per breakpoint.
    ///
    /// # Errors
    ///
    /// `ScheduleConstruction` for an empty list, a non-positive step, a
    /// convention incompatible with its step, or a snapped boundary that
    /// does not advance.
    pub fn compose_breakpoints(
        start: Date,
        breakpoints: &[(Period, RollConvention)],
    ) -> ScheduleResult<Vec<Date>> {
        if breakpoints.is_empty() {
            return Err(ScheduleError::construction("meta schedule needs at least one breakpoint"));
        }

        let mut dates = Vec::with_capacity(breakpoints.len() + 1);
        dates.push(start);
        let mut reference = start;
        for &(step, roll) in breakpoints {
            ensure_positive(step)?;
            ensure_roll_compatible(step, roll)?;
            reference = step.add_to(reference)?;
            let boundary = roll.adjust(reference);
            let previous = dates[dates.len() - 1];
            if boundary <= previous {
                return Err(ScheduleError::construction(format!(
                    "breakpoint {step} snapped to {boundary}, not after {previous}"
                )));
            }
            dates.push(boundary);
        }
        Ok(dates)
    }
}
