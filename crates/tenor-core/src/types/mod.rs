//! Value types for schedule generation.
//!
//! - [`Date`]: Unadjusted calendar date
//! - [`Period`]: Signed calendar interval (`3M`, `1Y`)
//! - [`RollConvention`]: Day-of-month snapping rule
//! - [`Frequency`]: Period paired with a roll convention

mod date;
mod frequency;
mod period;
mod roll_convention;

pub use date::{days_in_month, is_leap_year, Date};
pub use frequency::Frequency;
pub use period::{Period, TimeUnit};
pub use roll_convention::RollConvention;
