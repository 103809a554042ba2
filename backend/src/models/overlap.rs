//! Detected overlap pairs and their tabular record shape.

use serde::{Deserialize, Serialize};

use super::calendar::{Term, Weekday};
use super::interval::SectionKey;
use super::time::format_hhmm;

/// Column names of the `overlapping_sections` relation, in order.
pub const OVERLAP_COLUMNS: [&str; 11] = [
    "day",
    "course_id_1",
    "sec_id_1",
    "year_1",
    "semester_1",
    "course_id_2",
    "sec_id_2",
    "year_2",
    "semester_2",
    "overlap_time_start",
    "overlap_time_end",
];

/// Natural key of an overlap row: everything except the two time columns.
pub type OverlapKey = (Weekday, i32, Term, SectionKey, SectionKey);

/// Two sections that meet at the same time on the same day of the same term.
///
/// `interval_a` always sorts before `interval_b`, so an unordered pair has
/// exactly one representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlapPair {
    pub day: Weekday,
    pub year: i32,
    pub term: Term,
    pub interval_a: SectionKey,
    pub interval_b: SectionKey,
    pub overlap_start_minute: u16,
    pub overlap_end_minute: u16,
}

impl OverlapPair {
    /// Build a pair with its members placed in canonical order.
    ///
    /// Returns `None` for an empty sub-range or for two copies of the same
    /// identity.
    pub fn canonical(
        day: Weekday,
        first: &SectionKey,
        second: &SectionKey,
        overlap_start_minute: u16,
        overlap_end_minute: u16,
    ) -> Option<Self> {
        if overlap_start_minute >= overlap_end_minute || first == second {
            return None;
        }
        let (interval_a, interval_b) = if first < second {
            (first.clone(), second.clone())
        } else {
            (second.clone(), first.clone())
        };
        Some(Self {
            day,
            year: interval_a.year(),
            term: interval_a.term(),
            interval_a,
            interval_b,
            overlap_start_minute,
            overlap_end_minute,
        })
    }

    pub fn key(&self) -> OverlapKey {
        (
            self.day,
            self.year,
            self.term,
            self.interval_a.clone(),
            self.interval_b.clone(),
        )
    }

    pub fn overlap_start(&self) -> String {
        format_hhmm(self.overlap_start_minute)
    }

    pub fn overlap_end(&self) -> String {
        format_hhmm(self.overlap_end_minute)
    }

    /// Fixed-arity record matching [`OVERLAP_COLUMNS`].
    pub fn to_record(&self) -> [String; 11] {
        [
            self.day.code().to_string(),
            self.interval_a.course_id().to_string(),
            self.interval_a.section_id().to_string(),
            self.interval_a.year().to_string(),
            self.interval_a.term().to_string(),
            self.interval_b.course_id().to_string(),
            self.interval_b.section_id().to_string(),
            self.interval_b.year().to_string(),
            self.interval_b.term().to_string(),
            self.overlap_start(),
            self.overlap_end(),
        ]
    }
}
