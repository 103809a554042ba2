//! Clock-minute helpers.
//!
//! Times of day are carried as minutes since midnight. `1440` is allowed only
//! as an exclusive end bound and renders as `24:00`.

use chrono::{NaiveTime, Timelike};

use super::error::IntervalError;

/// Minutes in one day; the largest valid exclusive end bound.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Convert an hour/minute pair from the catalog into minutes since midnight.
pub fn clock_to_minute(hour: i32, minute: i32) -> Result<u16, IntervalError> {
    let valid = (0..=59).contains(&minute)
        && ((0..=23).contains(&hour) || (hour == 24 && minute == 0));
    if !valid {
        return Err(IntervalError::InvalidClock { hour, minute });
    }
    Ok((hour * 60 + minute) as u16)
}

/// Format minutes since midnight as `HH:MM`.
pub fn format_hhmm(minute: u16) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Parse an `HH:MM` string back into minutes since midnight.
pub fn parse_hhmm(value: &str) -> Result<u16, IntervalError> {
    let value = value.trim();
    if value == "24:00" {
        return Ok(MINUTES_PER_DAY);
    }
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| IntervalError::InvalidTimeLiteral(value.to_string()))?;
    Ok((time.hour() * 60 + time.minute()) as u16)
}
