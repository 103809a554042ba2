//! Error types raised while building interval model values.

/// Errors raised when an input row cannot become a [`ScheduledInterval`](super::ScheduledInterval).
///
/// Every variant means the row falls outside the recognised domain. Loading
/// fails fast on the first one, before any grouping happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntervalError {
    /// `start_minute >= end_minute`, or a bound lies outside the day.
    #[error("invalid range for {key}: [{start}, {end}) must satisfy 0 <= start < end <= 1440")]
    InvalidRange { key: String, start: i32, end: i32 },

    /// An hour/minute pair that does not name a clock time.
    #[error("invalid clock time {hour:02}:{minute:02}")]
    InvalidClock { hour: i32, minute: i32 },

    /// A persisted time that is not an `HH:MM` literal.
    #[error("'{0}' is not an HH:MM time")]
    InvalidTimeLiteral(String),

    /// A day value outside the weekday enumeration.
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    /// A term value outside the recognised academic terms.
    #[error("unknown term '{0}'")]
    UnknownTerm(String),

    /// Academic years are four-digit integers.
    #[error("year {0} is not a four-digit academic year")]
    InvalidYear(i32),

    /// A required identifier was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}
