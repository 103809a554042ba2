//! The scheduled interval value type and its identity key.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::calendar::{Term, Weekday};
use super::error::IntervalError;
use super::time::{clock_to_minute, format_hhmm, MINUTES_PER_DAY};

/// Identity of a section offering: `(course_id, section_id, year, term)`.
///
/// The derived ordering (course, then section, then year, then term) is the
/// canonical order used to orient overlap pairs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionKey {
    course_id: String,
    section_id: String,
    year: i32,
    term: Term,
}

impl SectionKey {
    pub fn new(
        course_id: impl Into<String>,
        section_id: impl Into<String>,
        year: i32,
        term: Term,
    ) -> Result<Self, IntervalError> {
        let course_id = course_id.into().trim().to_string();
        let section_id = section_id.into().trim().to_string();
        if course_id.is_empty() {
            return Err(IntervalError::EmptyField("course_id"));
        }
        if section_id.is_empty() {
            return Err(IntervalError::EmptyField("section_id"));
        }
        if !(1000..=9999).contains(&year) {
            return Err(IntervalError::InvalidYear(year));
        }
        Ok(Self {
            course_id,
            section_id,
            year,
            term,
        })
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn term(&self) -> Term {
        self.term
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} ({} {})",
            self.course_id, self.section_id, self.term, self.year
        )
    }
}

/// One weekly meeting of a section: a weekday plus a half-open minute range.
///
/// Immutable once built; every constructor enforces
/// `start_minute < end_minute <= 1440`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledInterval {
    key: SectionKey,
    day: Weekday,
    start_minute: u16,
    end_minute: u16,
}

impl ScheduledInterval {
    pub fn new(
        key: SectionKey,
        day: Weekday,
        start_minute: u16,
        end_minute: u16,
    ) -> Result<Self, IntervalError> {
        if start_minute >= end_minute || end_minute > MINUTES_PER_DAY {
            return Err(IntervalError::InvalidRange {
                key: key.to_string(),
                start: i32::from(start_minute),
                end: i32::from(end_minute),
            });
        }
        Ok(Self {
            key,
            day,
            start_minute,
            end_minute,
        })
    }

    /// Build from the catalog's `(start_hr, start_min, end_hr, end_min)` columns.
    pub fn from_clock(
        key: SectionKey,
        day: Weekday,
        start_hr: i32,
        start_min: i32,
        end_hr: i32,
        end_min: i32,
    ) -> Result<Self, IntervalError> {
        let start = clock_to_minute(start_hr, start_min)?;
        let end = clock_to_minute(end_hr, end_min)?;
        Self::new(key, day, start, end)
    }

    pub fn key(&self) -> &SectionKey {
        &self.key
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn year(&self) -> i32 {
        self.key.year
    }

    pub fn term(&self) -> Term {
        self.key.term
    }

    pub fn start_minute(&self) -> u16 {
        self.start_minute
    }

    pub fn end_minute(&self) -> u16 {
        self.end_minute
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end_minute - self.start_minute
    }
}

impl fmt::Display for ScheduledInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{}",
            self.key,
            self.day,
            format_hhmm(self.start_minute),
            format_hhmm(self.end_minute)
        )
    }
}
