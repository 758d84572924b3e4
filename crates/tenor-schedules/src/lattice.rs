//! Stub shaping on a generated boundary lattice.
//!
//! A [`Lattice`] is a [`ScheduledDates`] tied to the interval and roll
//! convention that produced it. The end segments (effective date to first
//! regular start, last regular end to termination) are classified by
//! stepping one interval out of the regular run and comparing against the
//! schedule boundary, then split or folded per [`EndPolicy`].

use tenor_core::{Date, Period, RollConvention};

use crate::date_scheduler::ScheduledDates;
use crate::error::{ScheduleError, ScheduleResult};
use crate::stub::{classify_remainder, EndPolicy, StubKind};

/// An irregular end segment.
///
/// For a long segment the remainder is the part beyond `split_at`; for a
/// short one it is the whole segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EndSegment {
    pub kind: StubKind,
    /// Where one regular period from the inner boundary lands, when that is
    /// strictly inside the segment
    pub split_at: Option<Date>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lattice {
    pub dates: Vec<Date>,
    pub first_regular_start: Date,
    pub last_regular_end: Date,
    pub interval: Period,
    pub roll: RollConvention,
}

impl Lattice {
    pub fn new(scheduled: ScheduledDates, interval: Period, roll: RollConvention) -> Self {
        Self {
            dates: scheduled.dates,
            first_regular_start: scheduled.first_regular_start,
            last_regular_end: scheduled.last_regular_end,
            interval,
            roll,
        }
    }

    fn start(&self) -> Date {
        self.dates[0]
    }

    fn end(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }

    pub fn has_regular_run(&self) -> bool {
        self.first_regular_start < self.last_regular_end
    }

    /// Classifies `[start, first_regular_start]`.
    pub fn initial_segment(&self) -> ScheduleResult<Option<EndSegment>> {
        let start = self.start();
        if self.first_regular_start == start {
            return Ok(None);
        }
        let previous = self
            .roll
            .adjust(self.interval.subtract_from(self.first_regular_start)?);
        Ok(if previous > start {
            Some(EndSegment {
                kind: StubKind::Long,
                split_at: Some(previous),
            })
        } else if previous < start {
            Some(EndSegment {
                kind: StubKind::Short,
                split_at: None,
            })
        } else {
            None
        })
    }

    /// Classifies `[last_regular_end, end]`.
    pub fn final_segment(&self) -> ScheduleResult<Option<EndSegment>> {
        let end = self.end();
        if self.last_regular_end == end {
            return Ok(None);
        }
        let next = self
            .roll
            .adjust(self.interval.add_to(self.last_regular_end)?);
        Ok(if next < end {
            Some(EndSegment {
                kind: StubKind::Long,
                split_at: Some(next),
            })
        } else if next > end {
            Some(EndSegment {
                kind: StubKind::Short,
                split_at: None,
            })
        } else {
            None
        })
    }

    pub fn apply_initial(&mut self, policy: EndPolicy) -> ScheduleResult<()> {
        let Some(segment) = self.initial_segment()? else {
            return Ok(());
        };
        let target = match policy {
            EndPolicy::Keep => return Ok(()),
            EndPolicy::Force(kind) => kind,
            EndPolicy::Auto => {
                let remainder_end = segment.split_at.unwrap_or(self.first_regular_start);
                classify_remainder(self.start(), remainder_end, self.interval)
            }
        };

        match (segment.kind, target, segment.split_at) {
            (StubKind::Long, StubKind::Short, Some(split)) => {
                self.dates.insert(1, split);
                self.first_regular_start = split;
            }
            (StubKind::Short, StubKind::Long, _) => {
                if self.has_regular_run() {
                    self.dates.remove(1);
                    self.first_regular_start = self.dates[1];
                } else {
                    tracing::debug!(
                        start = %self.start(),
                        end = %self.end(),
                        "no regular period to fold initial stub into"
                    );
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn apply_final(&mut self, policy: EndPolicy) -> ScheduleResult<()> {
        let Some(segment) = self.final_segment()? else {
            return Ok(());
        };
        let target = match policy {
            EndPolicy::Keep => return Ok(()),
            EndPolicy::Force(kind) => kind,
            EndPolicy::Auto => {
                let remainder_start = segment.split_at.unwrap_or(self.last_regular_end);
                classify_remainder(remainder_start, self.end(), self.interval)
            }
        };

        let last = self.dates.len() - 1;
        match (segment.kind, target, segment.split_at) {
            (StubKind::Long, StubKind::Short, Some(split)) => {
                self.dates.insert(last, split);
                self.last_regular_end = split;
            }
            (StubKind::Short, StubKind::Long, _) => {
                if self.has_regular_run() {
                    self.dates.remove(last - 1);
                    self.last_regular_end = self.dates[self.dates.len() - 2];
                } else {
                    tracing::debug!(
                        start = %self.start(),
                        end = %self.end(),
                        "no regular period to fold final stub into"
                    );
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Removes the first regular start, merging the initial stub into the
    /// following period, which then counts as regular.
    pub fn merge_initial(&mut self) {
        if self.has_regular_run() && self.dates.len() > 2 {
            self.dates.remove(1);
            self.first_regular_start = self.start();
        }
    }

    /// Checks boundary ordering and the regular-run markers.
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.dates.len() < 2 {
            return Err(ScheduleError::construction(
                "schedule needs at least two boundary dates",
            ));
        }
        if let Some(w) = self.dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ScheduleError::construction(format!(
                "boundary dates out of order: {} then {}",
                w[0], w[1]
            )));
        }
        if self.first_regular_start > self.last_regular_end
            || !self.dates.contains(&self.first_regular_start)
            || !self.dates.contains(&self.last_regular_end)
        {
            return Err(ScheduleError::construction(format!(
                "regular run [{}, {}] is not on the boundary lattice",
                self.first_regular_start, self.last_regular_end
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_scheduler::DateScheduler;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn forward(start: Date, end: Date, interval: Period, roll: RollConvention) -> Lattice {
        Lattice::new(
            DateScheduler::from_effective_date(start, end, interval, roll).unwrap(),
            interval,
            roll,
        )
    }

    #[test]
    fn test_segments_on_rolled_lattice() {
        let lattice = forward(
            date(2009, 5, 1),
            date(2010, 11, 27),
            Period::months(3),
            RollConvention::DayOfMonth(19),
        );

        assert_eq!(
            lattice.initial_segment().unwrap(),
            Some(EndSegment {
                kind: StubKind::Long,
                split_at: Some(date(2009, 5, 19)),
            })
        );
        assert_eq!(
            lattice.final_segment().unwrap(),
            Some(EndSegment {
                kind: StubKind::Long,
                split_at: Some(date(2010, 11, 19)),
            })
        );
    }

    #[test]
    fn test_force_short_splits_long_segments() {
        let mut lattice = forward(
            date(2009, 5, 1),
            date(2010, 11, 27),
            Period::months(3),
            RollConvention::DayOfMonth(19),
        );
        lattice.apply_initial(EndPolicy::Force(StubKind::Short)).unwrap();
        lattice.apply_final(EndPolicy::Force(StubKind::Short)).unwrap();
        lattice.validate().unwrap();

        assert_eq!(lattice.dates.len(), 9);
        assert_eq!(lattice.dates[1], date(2009, 5, 19));
        assert_eq!(lattice.dates[7], date(2010, 11, 19));
        assert_eq!(lattice.first_regular_start, date(2009, 5, 19));
        assert_eq!(lattice.last_regular_end, date(2010, 11, 19));
        assert_eq!(lattice.initial_segment().unwrap().unwrap().kind, StubKind::Short);
        assert_eq!(lattice.final_segment().unwrap().unwrap().kind, StubKind::Short);
    }

    #[test]
    fn test_auto_folds_standalone_remainders_over_half() {
        // 45-day final remainder on a 6M interval stays standalone
        let mut short = forward(
            date(2025, 1, 15),
            date(2026, 3, 1),
            Period::months(6),
            RollConvention::NoAdjustment,
        );
        short.apply_final(EndPolicy::Auto).unwrap();
        assert_eq!(short.dates.len(), 4);

        // 136-day final remainder is folded
        let mut long = forward(
            date(2025, 1, 15),
            date(2026, 5, 31),
            Period::months(6),
            RollConvention::NoAdjustment,
        );
        long.apply_final(EndPolicy::Auto).unwrap();
        assert_eq!(
            long.dates,
            vec![date(2025, 1, 15), date(2025, 7, 15), date(2026, 5, 31)]
        );
        assert_eq!(long.last_regular_end, date(2025, 7, 15));
        assert_eq!(long.final_segment().unwrap().unwrap().kind, StubKind::Long);
    }

    #[test]
    fn test_auto_splits_short_remainder_out_of_long_segments() {
        // 18-day front and 8-day back remainders on a 3M roll-19 lattice
        let mut lattice = forward(
            date(2009, 5, 1),
            date(2010, 11, 27),
            Period::months(3),
            RollConvention::DayOfMonth(19),
        );
        lattice.apply_initial(EndPolicy::Auto).unwrap();
        lattice.apply_final(EndPolicy::Auto).unwrap();
        lattice.validate().unwrap();

        assert_eq!(lattice.dates.len(), 9);
        assert_eq!(lattice.dates[1], date(2009, 5, 19));
        assert_eq!(lattice.dates[7], date(2010, 11, 19));
        assert_eq!(lattice.initial_segment().unwrap().unwrap().kind, StubKind::Short);
        assert_eq!(lattice.final_segment().unwrap().unwrap().kind, StubKind::Short);
    }

    #[test]
    fn test_auto_keeps_long_segment_with_remainder_over_half() {
        // 1M interval snapped to the 28th: 26-day front remainder
        let mut lattice = forward(
            date(2025, 1, 2),
            date(2025, 6, 28),
            Period::months(1),
            RollConvention::DayOfMonth(28),
        );
        assert_eq!(lattice.dates[1], date(2025, 2, 28));
        lattice.apply_initial(EndPolicy::Auto).unwrap();

        assert_eq!(lattice.dates[1], date(2025, 2, 28));
        assert_eq!(lattice.first_regular_start, date(2025, 2, 28));
        assert_eq!(
            lattice.initial_segment().unwrap(),
            Some(EndSegment {
                kind: StubKind::Long,
                split_at: Some(date(2025, 1, 28)),
            })
        );
    }

    #[test]
    fn test_fold_without_regular_run_is_noop() {
        let mut lattice = forward(
            date(2025, 1, 10),
            date(2025, 3, 20),
            Period::months(3),
            RollConvention::NoAdjustment,
        );
        lattice.apply_final(EndPolicy::Force(StubKind::Long)).unwrap();
        assert_eq!(lattice.dates, vec![date(2025, 1, 10), date(2025, 3, 20)]);
    }

    #[test]
    fn test_merge_initial() {
        let mut lattice = Lattice::new(
            DateScheduler::from_termination_date(
                date(2007, 5, 5),
                date(2010, 1, 5),
                Period::months(6),
                RollConvention::NoAdjustment,
            )
            .unwrap(),
            Period::months(6),
            RollConvention::NoAdjustment,
        );
        assert_eq!(lattice.dates.len(), 7);
        lattice.merge_initial();
        lattice.validate().unwrap();
        assert_eq!(lattice.dates.len(), 6);
        assert_eq!(lattice.dates[1], date(2008, 1, 5));
        assert_eq!(lattice.first_regular_start, date(2007, 5, 5));
    }

    #[test]
    fn test_validate_rejects_unordered_dates() {
        let lattice = Lattice {
            dates: vec![date(2025, 1, 1), date(2025, 1, 1)],
            first_regular_start: date(2025, 1, 1),
            last_regular_end: date(2025, 1, 1),
            interval: Period::months(1),
            roll: RollConvention::NoAdjustment,
        };
        assert!(lattice.validate().is_err());
    }
}
