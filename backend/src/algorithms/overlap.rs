//! Overlap detection over grouped intervals.
//!
//! Two detectors are provided and produce the same pair set:
//!
//! - [`pairwise`]: compares every unordered pair in a group, O(n²).
//! - [`sweep_line`]: sorts by start time and keeps an end-ordered active set,
//!   so an interval is only compared with intervals still running when it
//!   starts.
//!
//! Both use the half-open predicate from [`overlaps`]; an interval ending at
//! minute `m` does not conflict with one starting at `m`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use super::grouping::{group_intervals, unique_members, DetectionError};
use crate::models::{OverlapPair, ScheduledInterval};

/// Groups larger than this use the sweep line under [`DetectionStrategy::Auto`].
pub const DEFAULT_SWEEP_THRESHOLD: usize = 64;

/// Which detector to run per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionStrategy {
    Pairwise,
    SweepLine,
    #[default]
    Auto,
}

impl DetectionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStrategy::Pairwise => "pairwise",
            DetectionStrategy::SweepLine => "sweep_line",
            DetectionStrategy::Auto => "auto",
        }
    }
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "pairwise" | "naive" => Ok(Self::Pairwise),
            "sweep_line" | "sweep" => Ok(Self::SweepLine),
            "auto" => Ok(Self::Auto),
            _ => Err(format!("Unknown detection strategy: {}", s)),
        }
    }
}

/// Tuning knobs for a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOptions {
    pub strategy: DetectionStrategy,
    pub sweep_threshold: usize,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            strategy: DetectionStrategy::Auto,
            sweep_threshold: DEFAULT_SWEEP_THRESHOLD,
        }
    }
}

impl DetectionOptions {
    pub fn with_strategy(strategy: DetectionStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    fn uses_sweep_line(&self, group_len: usize) -> bool {
        match self.strategy {
            DetectionStrategy::Pairwise => false,
            DetectionStrategy::SweepLine => true,
            DetectionStrategy::Auto => group_len > self.sweep_threshold,
        }
    }
}

/// Counters describing one detection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub interval_count: usize,
    pub group_count: usize,
    pub pair_count: usize,
}

/// Half-open overlap test: `x.start < y.end && y.start < x.end`.
pub fn overlaps(x: &ScheduledInterval, y: &ScheduledInterval) -> bool {
    x.start_minute() < y.end_minute() && y.start_minute() < x.end_minute()
}

/// Shared sub-range of two overlapping intervals, or `None` when they do not overlap.
pub fn overlap_range(x: &ScheduledInterval, y: &ScheduledInterval) -> Option<(u16, u16)> {
    if !overlaps(x, y) {
        return None;
    }
    Some((
        x.start_minute().max(y.start_minute()),
        x.end_minute().min(y.end_minute()),
    ))
}

/// Canonical pair for two members of the same group, if they overlap.
pub fn pair_of(x: &ScheduledInterval, y: &ScheduledInterval) -> Option<OverlapPair> {
    debug_assert_eq!(
        (x.day(), x.year(), x.term()),
        (y.day(), y.year(), y.term()),
        "pair_of called across groups"
    );
    let (start, end) = overlap_range(x, y)?;
    OverlapPair::canonical(x.day(), x.key(), y.key(), start, end)
}

/// Compare every unordered pair of distinct members.
pub fn pairwise(group: &[&ScheduledInterval], out: &mut Vec<OverlapPair>) {
    for (i, x) in group.iter().enumerate() {
        for y in &group[i + 1..] {
            if let Some(pair) = pair_of(x, y) {
                out.push(pair);
            }
        }
    }
}

/// Sweep over the group in start order, keeping intervals that are still
/// running in a min-heap keyed by end minute.
pub fn sweep_line(group: &[&ScheduledInterval], out: &mut Vec<OverlapPair>) {
    let mut order: Vec<&ScheduledInterval> = group.to_vec();
    order.sort_by(|a, b| {
        a.start_minute()
            .cmp(&b.start_minute())
            .then_with(|| a.key().cmp(b.key()))
    });

    let mut active: BinaryHeap<Reverse<(u16, usize)>> = BinaryHeap::new();
    for (idx, current) in order.iter().enumerate() {
        while let Some(Reverse((end, _))) = active.peek() {
            if *end > current.start_minute() {
                break;
            }
            active.pop();
        }
        // Every interval left in the heap started no later than `current`
        // and ends after it starts.
        for Reverse((_, other)) in active.iter() {
            if let Some(pair) = pair_of(order[*other], current) {
                out.push(pair);
            }
        }
        active.push(Reverse((current.end_minute(), idx)));
    }
}

/// Detect every overlapping pair across all groups.
///
/// Results are sorted by `(day, year, term, interval_a, interval_b)`.
pub fn detect_overlaps(
    intervals: &[ScheduledInterval],
    options: &DetectionOptions,
) -> Result<Vec<OverlapPair>, DetectionError> {
    detect_overlaps_with_report(intervals, options).map(|(pairs, _)| pairs)
}

/// Same as [`detect_overlaps`], also returning run counters.
pub fn detect_overlaps_with_report(
    intervals: &[ScheduledInterval],
    options: &DetectionOptions,
) -> Result<(Vec<OverlapPair>, DetectionReport), DetectionError> {
    let groups = group_intervals(intervals);
    let mut pairs = Vec::new();

    for (key, group) in &groups {
        let members = unique_members(group)?;
        let before = pairs.len();
        if options.uses_sweep_line(members.len()) {
            sweep_line(&members, &mut pairs);
        } else {
            pairwise(&members, &mut pairs);
        }
        debug!(
            "Group {} {} {}: {} intervals, {} overlaps",
            key.day,
            key.term,
            key.year,
            members.len(),
            pairs.len() - before
        );
    }

    pairs.sort_by(|a, b| a.key().cmp(&b.key()));

    let report = DetectionReport {
        interval_count: intervals.len(),
        group_count: groups.len(),
        pair_count: pairs.len(),
    };
    Ok((pairs, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SectionKey, Term, Weekday};

    fn interval(course: &str, section: &str, start: u16, end: u16) -> ScheduledInterval {
        let key = SectionKey::new(course, section, 2017, Term::Fall).unwrap();
        ScheduledInterval::new(key, Weekday::Monday, start, end).unwrap()
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let x = interval("CPSC-437", "001", 540, 615);
        let y = interval("CPSC-237", "002", 600, 645);
        assert!(overlaps(&x, &y));
        assert!(overlaps(&y, &x));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let x = interval("A", "001", 540, 600);
        let y = interval("B", "001", 600, 660);
        assert!(!overlaps(&x, &y));
        assert!(!overlaps(&y, &x));
        assert_eq!(overlap_range(&x, &y), None);
    }

    #[test]
    fn test_overlap_range_contained() {
        let outer = interval("A", "001", 480, 720);
        let inner = interval("B", "001", 540, 600);
        assert_eq!(overlap_range(&outer, &inner), Some((540, 600)));
        assert_eq!(overlap_range(&inner, &outer), Some((540, 600)));
    }

    #[test]
    fn test_pair_of_boundary_example() {
        let x = interval("CPSC-437", "001", 540, 615);
        let y = interval("CPSC-237", "002", 600, 645);
        let pair = pair_of(&x, &y).unwrap();
        assert_eq!(pair.interval_a.course_id(), "CPSC-237");
        assert_eq!(pair.overlap_start(), "10:00");
        assert_eq!(pair.overlap_end(), "10:15");
    }

    #[test]
    fn test_sweep_line_matches_pairwise_on_equal_starts() {
        let a = interval("A", "001", 540, 600);
        let b = interval("B", "001", 540, 560);
        let c = interval("C", "001", 559, 700);
        let group = vec![&a, &b, &c];

        let mut naive = Vec::new();
        pairwise(&group, &mut naive);
        let mut swept = Vec::new();
        sweep_line(&group, &mut swept);

        naive.sort_by(|x, y| x.key().cmp(&y.key()));
        swept.sort_by(|x, y| x.key().cmp(&y.key()));
        assert_eq!(naive, swept);
        assert_eq!(naive.len(), 3);
    }

    #[test]
    fn test_auto_threshold() {
        let options = DetectionOptions {
            strategy: DetectionStrategy::Auto,
            sweep_threshold: 2,
        };
        assert!(!options.uses_sweep_line(2));
        assert!(options.uses_sweep_line(3));
        assert!(DetectionOptions::with_strategy(DetectionStrategy::SweepLine).uses_sweep_line(0));
        assert!(!DetectionOptions::with_strategy(DetectionStrategy::Pairwise).uses_sweep_line(1000));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("sweep-line".parse::<DetectionStrategy>().unwrap(), DetectionStrategy::SweepLine);
        assert_eq!("PAIRWISE".parse::<DetectionStrategy>().unwrap(), DetectionStrategy::Pairwise);
        assert_eq!("auto".parse::<DetectionStrategy>().unwrap(), DetectionStrategy::Auto);
        assert!("quadtree".parse::<DetectionStrategy>().is_err());
    }

    #[test]
    fn test_report_counts() {
        let intervals = vec![
            interval("A", "001", 540, 600),
            interval("B", "001", 570, 630),
            interval("C", "001", 700, 760),
        ];
        let (pairs, report) =
            detect_overlaps_with_report(&intervals, &DetectionOptions::default()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(
            report,
            DetectionReport {
                interval_count: 3,
                group_count: 1,
                pair_count: 1
            }
        );
    }
}
