//! Domain model: scheduled intervals, overlap pairs and catalog rows.

pub mod calendar;
pub mod catalog;
pub mod error;
pub mod interval;
pub mod overlap;
pub mod time;

pub use calendar::{Term, Weekday};
pub use catalog::{Catalog, SectionRow, TimeSlotRow};
pub use error::IntervalError;
pub use interval::{ScheduledInterval, SectionKey};
pub use overlap::{OverlapKey, OverlapPair, OVERLAP_COLUMNS};
pub use time::{clock_to_minute, format_hhmm, parse_hhmm, MINUTES_PER_DAY};
