//! # Tenor Schedules
//!
//! Unadjusted calculation-period schedule generation for the Tenor library.
//!
//! This crate turns an effective date, a termination date (or tenor), a
//! period interval, a roll convention and a stub policy into the ordered,
//! gap-free lattice of unadjusted period boundaries:
//!
//! - **DateScheduler**: forward and backward single-frequency stepping
//! - **CalculationPeriodSchedule**: validated period lists with stub
//!   classification, built by [`ScheduleGenerator`]
//! - **MetaScheduleComposer**: schedules whose roll frequency changes at
//!   defined points in the life of a trade
//!
//! Business-day adjustment and accrual fractions are applied downstream.
//!
//! ## Example
//!
//! ```rust
//! use tenor_schedules::prelude::*;
//!
//! let schedule = CalculationPeriodSchedule::from_tenor(
//!     Date::from_ymd(2007, 1, 5).unwrap(),
//!     Period::years(5),
//!     Period::months(3),
//! )
//! .unwrap();
//!
//! assert_eq!(schedule.len(), 20);
//! assert!(!schedule.has_initial_stub());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::wrong_self_convention)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]

pub mod calculation_period;
pub mod config;
pub mod date_scheduler;
pub mod error;
mod lattice;
pub mod meta;
pub mod period_dates;
pub mod schedule;
pub mod stub;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calculation_period::CalculationPeriod;
    pub use crate::config::{ScheduleSettings, TenorMismatchPolicy};
    pub use crate::date_scheduler::{DateScheduler, GenerationDirection, ScheduledDates};
    pub use crate::error::{ScheduleError, ScheduleResult};
    pub use crate::meta::{MetaScheduleComposer, MetaScheduleItem};
    pub use crate::period_dates::CalculationPeriodDates;
    pub use crate::schedule::{CalculationPeriodSchedule, ScheduleGenerator};
    pub use crate::stub::{StubKind, StubPeriodType};
    pub use tenor_core::prelude::*;
}

// Re-export commonly used types at crate root
pub use calculation_period::CalculationPeriod;
pub use config::{ScheduleSettings, TenorMismatchPolicy};
pub use date_scheduler::{CouponDates, DateScheduler, GenerationDirection, ScheduledDates};
pub use error::{ScheduleError, ScheduleResult};
pub use meta::{MetaScheduleComposer, MetaScheduleItem};
pub use period_dates::CalculationPeriodDates;
pub use schedule::{CalculationPeriodSchedule, ScheduleGenerator};
pub use stub::{classify_remainder, StubKind, StubPeriodType};
