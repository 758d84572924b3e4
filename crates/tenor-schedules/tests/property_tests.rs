//! Property-based tests for schedule invariants.
//!
//! - Every construction yields contiguous periods from effective to termination
//! - Forward and backward generation agree on exact multiples
//! - Count-driven schedules have exactly the requested number of periods

use proptest::prelude::*;
use tenor_schedules::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn any_date() -> impl Strategy<Value = Date> {
    (1990i32..2060, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        let day = d.min(tenor_core::types::days_in_month(y, m));
        Date::from_ymd(y, m, day).unwrap()
    })
}

fn month_interval() -> impl Strategy<Value = Period> {
    prop_oneof![
        Just(Period::months(1)),
        Just(Period::months(2)),
        Just(Period::months(3)),
        Just(Period::months(6)),
        Just(Period::years(1)),
    ]
}

fn roll_convention() -> impl Strategy<Value = RollConvention> {
    prop_oneof![
        Just(RollConvention::NoAdjustment),
        Just(RollConvention::EndOfMonth),
        Just(RollConvention::IMM),
        (1u32..=31).prop_map(RollConvention::DayOfMonth),
    ]
}

fn stub_type() -> impl Strategy<Value = StubPeriodType> {
    prop_oneof![
        Just(StubPeriodType::None),
        Just(StubPeriodType::ShortInitial),
        Just(StubPeriodType::LongInitial),
        Just(StubPeriodType::ShortFinal),
        Just(StubPeriodType::LongFinal),
    ]
}

fn assert_contiguous(schedule: &CalculationPeriodSchedule, start: Date, end: Date) -> Result<(), TestCaseError> {
    prop_assert!(!schedule.is_empty());
    prop_assert_eq!(schedule.effective_date(), start);
    prop_assert_eq!(schedule.termination_date(), end);
    for pair in schedule.periods().windows(2) {
        prop_assert_eq!(pair[0].unadjusted_end, pair[1].unadjusted_start);
        prop_assert!(pair[0].unadjusted_start < pair[0].unadjusted_end);
    }
    Ok(())
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn roll_convention_schedules_are_contiguous(
        start in any_date(),
        length in 1i64..4000,
        interval in month_interval(),
        roll in roll_convention(),
        stub in stub_type(),
    ) {
        let end = start.add_days(length).unwrap();
        let schedule = CalculationPeriodSchedule::from_roll_convention(start, end, interval, roll, stub).unwrap();
        assert_contiguous(&schedule, start, end)?;
    }

    #[test]
    fn first_regular_date_schedules_are_contiguous(
        start in any_date(),
        lead in 0i64..400,
        length in 1i64..3000,
        interval in month_interval(),
        stub in stub_type(),
    ) {
        let first_regular = start.add_days(lead).unwrap();
        let end = first_regular.add_days(length).unwrap();
        let frequency = Frequency::new(interval, RollConvention::DayOfMonth(first_regular.day()));
        let schedule = CalculationPeriodSchedule::from_first_regular_date(start, end, first_regular, frequency, stub)
            .unwrap();
        assert_contiguous(&schedule, start, end)?;
        prop_assert!(schedule.dates().contains(&first_regular) || stub.is_long() || stub == StubPeriodType::None);
    }

    #[test]
    fn full_first_schedules_are_contiguous(
        start in any_date(),
        length in 1i64..4000,
        interval in month_interval(),
        full_first in any::<bool>(),
    ) {
        let end = start.add_days(length).unwrap();
        let schedule =
            CalculationPeriodSchedule::from_termination_with_full_first(start, end, interval, full_first).unwrap();
        assert_contiguous(&schedule, start, end)?;
        if !full_first {
            prop_assert_ne!(schedule.initial_stub(), Some(StubKind::Long));
        }
    }

    #[test]
    fn forward_and_backward_agree_on_exact_multiples(
        year in 1990i32..2060,
        month in 1u32..=12,
        day in 1u32..=28,
        interval in month_interval(),
        count in 1i32..40,
    ) {
        let start = Date::from_ymd(year, month, day).unwrap();
        let end = interval.times(count).add_to(start).unwrap();
        let roll = RollConvention::NoAdjustment;

        let forward = DateScheduler::from_effective_date(start, end, interval, roll).unwrap();
        let backward = DateScheduler::from_termination_date(start, end, interval, roll).unwrap();

        prop_assert_eq!(&forward.dates, &backward.dates);
        prop_assert_eq!(forward.dates.len(), count as usize + 1);
        prop_assert!(!forward.has_initial_stub() && !forward.has_final_stub());
        prop_assert!(!backward.has_initial_stub() && !backward.has_final_stub());
    }

    #[test]
    fn count_driven_schedules_have_requested_length(
        end in any_date(),
        interval in month_interval(),
        count in 1u32..60,
    ) {
        let schedule = CalculationPeriodSchedule::from_termination_and_count(end, interval, count).unwrap();
        prop_assert_eq!(schedule.len(), count as usize);
        prop_assert_eq!(schedule.termination_date(), end);
        prop_assert!(!schedule.has_initial_stub());
        prop_assert!(!schedule.has_final_stub());
    }
}
