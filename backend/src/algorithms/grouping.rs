//! Partitioning of intervals into independently checked groups.
//!
//! Intervals on different days, in different years or in different terms can
//! never conflict, so detection only ever compares members of one group.

use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{ScheduledInterval, SectionKey, Term, Weekday};

/// Grouping key shared by every member of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub day: Weekday,
    pub year: i32,
    pub term: Term,
}

impl GroupKey {
    pub fn of(interval: &ScheduledInterval) -> Self {
        Self {
            day: interval.day(),
            year: interval.year(),
            term: interval.term(),
        }
    }
}

/// Two intervals with the same identity meet at different times on the same day.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectionError {
    #[error(
        "duplicate identity {key} on {day}: [{first_start}, {first_end}) conflicts with [{second_start}, {second_end})"
    )]
    DuplicateIdentity {
        key: SectionKey,
        day: Weekday,
        first_start: u16,
        first_end: u16,
        second_start: u16,
        second_end: u16,
    },
}

/// Partition intervals by `(day, year, term)`.
///
/// Every input interval lands in exactly one group. Order inside a group
/// follows input order.
pub fn group_intervals(intervals: &[ScheduledInterval]) -> BTreeMap<GroupKey, Vec<&ScheduledInterval>> {
    let mut groups: BTreeMap<GroupKey, Vec<&ScheduledInterval>> = BTreeMap::new();
    for interval in intervals {
        groups.entry(GroupKey::of(interval)).or_default().push(interval);
    }
    groups
}

/// Enforce one interval per identity within a group.
///
/// Exact repeats (same identity, same range) are collapsed; a repeat with a
/// different range is ambiguous and rejected.
pub fn unique_members<'a>(
    group: &[&'a ScheduledInterval],
) -> Result<Vec<&'a ScheduledInterval>, DetectionError> {
    let mut seen: HashMap<&SectionKey, &ScheduledInterval> = HashMap::with_capacity(group.len());
    let mut members = Vec::with_capacity(group.len());

    for &interval in group {
        match seen.get(interval.key()) {
            Some(existing)
                if existing.start_minute() == interval.start_minute()
                    && existing.end_minute() == interval.end_minute() =>
            {
                debug!("Collapsing repeated interval {}", interval);
            }
            Some(existing) => {
                return Err(DetectionError::DuplicateIdentity {
                    key: interval.key().clone(),
                    day: interval.day(),
                    first_start: existing.start_minute(),
                    first_end: existing.end_minute(),
                    second_start: interval.start_minute(),
                    second_end: interval.end_minute(),
                });
            }
            None => {
                seen.insert(interval.key(), interval);
                members.push(interval);
            }
        }
    }
    Ok(members)
}
