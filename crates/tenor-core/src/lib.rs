//! # Tenor Core
//!
//! Date, period and roll-convention types for the Tenor schedule library.
//!
//! - **Dates**: `Date`, a `chrono::NaiveDate` newtype with end-of-month
//!   clamping month arithmetic
//! - **Periods**: `Period` (`3M`, `1Y`, `2W`) with unit-checked arithmetic
//! - **Roll Conventions**: `RollConvention`, the total resolver mapping a
//!   (year, month) to its conventional day
//!
//! ## Example
//!
//! ```rust
//! use tenor_core::prelude::*;
//!
//! let start = Date::from_ymd(2009, 5, 1).unwrap();
//! let next = Period::months(3).add_to(start).unwrap();
//! let rolled = RollConvention::DayOfMonth(19).adjust(next);
//! assert_eq!(rolled, Date::from_ymd(2009, 8, 19).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{TenorError, TenorResult};
    pub use crate::types::{Date, Frequency, Period, RollConvention, TimeUnit};
}

// Re-export commonly used types at crate root
pub use error::{TenorError, TenorResult};
pub use types::{Date, Frequency, Period, RollConvention, TimeUnit};
