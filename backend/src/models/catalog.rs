//! Raw catalog rows and the section/time-slot join that yields intervals.
//!
//! These mirror the `section` and `time_slot` relations of the university
//! schema. A time slot id can cover several days, so one section usually
//! produces several intervals.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::calendar::{Term, Weekday};
use super::error::IntervalError;
use super::interval::{ScheduledInterval, SectionKey};

/// One row of the `section` relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRow {
    pub course_id: String,
    pub sec_id: String,
    pub semester: String,
    pub year: i32,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub room_number: Option<String>,
    #[serde(default)]
    pub time_slot_id: Option<String>,
}

/// One row of the `time_slot` relation (one meeting day of a slot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotRow {
    pub time_slot_id: String,
    pub day: String,
    pub start_hr: i32,
    pub start_min: i32,
    pub end_hr: i32,
    pub end_min: i32,
}

/// Section and time slot rows as supplied by the source system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub sections: Vec<SectionRow>,
    pub time_slots: Vec<TimeSlotRow>,
}

impl Catalog {
    pub fn new(sections: Vec<SectionRow>, time_slots: Vec<TimeSlotRow>) -> Self {
        Self {
            sections,
            time_slots,
        }
    }

    /// Inner-join sections with their time slots.
    ///
    /// Sections without a time slot, or pointing at an unknown slot, have no
    /// meetings and are skipped. The first malformed row aborts the join.
    pub fn intervals(&self) -> Result<Vec<ScheduledInterval>, IntervalError> {
        let mut slots: HashMap<&str, Vec<&TimeSlotRow>> = HashMap::new();
        for slot in &self.time_slots {
            slots
                .entry(slot.time_slot_id.trim())
                .or_default()
                .push(slot);
        }

        let mut intervals = Vec::new();
        for section in &self.sections {
            let Some(slot_id) = section.time_slot_id.as_deref().map(str::trim) else {
                debug!(
                    "Section {}-{} has no time slot, skipping",
                    section.course_id, section.sec_id
                );
                continue;
            };
            let Some(meetings) = slots.get(slot_id) else {
                debug!(
                    "Section {}-{} references unknown time slot '{}', skipping",
                    section.course_id, section.sec_id, slot_id
                );
                continue;
            };

            let term: Term = section.semester.parse()?;
            let key = SectionKey::new(&section.course_id, &section.sec_id, section.year, term)?;
            for meeting in meetings {
                let day: Weekday = meeting.day.parse()?;
                intervals.push(ScheduledInterval::from_clock(
                    key.clone(),
                    day,
                    meeting.start_hr,
                    meeting.start_min,
                    meeting.end_hr,
                    meeting.end_min,
                )?);
            }
        }
        Ok(intervals)
    }
}
