//! Property tests for the overlap predicate and the two detectors.

use std::collections::HashSet;

use proptest::prelude::*;

use section_overlap::algorithms::{
    detect_overlaps, overlap_range, overlaps, DetectionOptions, DetectionStrategy,
};
use section_overlap::models::{ScheduledInterval, SectionKey, Term, Weekday, MINUTES_PER_DAY};

const COURSES: [&str; 6] = ["ACCT-101", "CPSC-237", "CPSC-240", "HIST-101", "MATH-101", "PHYS-150"];
const DAYS: [Weekday; 3] = [Weekday::Monday, Weekday::Wednesday, Weekday::Friday];
const TERMS: [Term; 2] = [Term::Fall, Term::Spring];

fn arb_interval() -> impl Strategy<Value = ScheduledInterval> {
    (
        0..COURSES.len(),
        1..4u8,
        0..TERMS.len(),
        0..DAYS.len(),
        0..MINUTES_PER_DAY - 1,
        1..180u16,
    )
        .prop_map(|(course, section, term, day, start, length)| {
            let key = SectionKey::new(COURSES[course], section.to_string(), 2017, TERMS[term])
                .unwrap();
            let end = (start + length).min(MINUTES_PER_DAY);
            ScheduledInterval::new(key, DAYS[day], start, end).unwrap()
        })
}

/// Intervals with at most one meeting per identity and day, as a
/// well-formed catalog provides.
fn arb_catalog() -> impl Strategy<Value = Vec<ScheduledInterval>> {
    prop::collection::vec(arb_interval(), 0..60).prop_map(|intervals| {
        let mut seen = HashSet::new();
        intervals
            .into_iter()
            .filter(|i| seen.insert((i.key().clone(), i.day())))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_overlaps_is_symmetric(x in arb_interval(), y in arb_interval()) {
        prop_assert_eq!(overlaps(&x, &y), overlaps(&y, &x));
        prop_assert_eq!(overlap_range(&x, &y), overlap_range(&y, &x));
    }

    #[test]
    fn prop_overlap_range_is_inside_both(x in arb_interval(), y in arb_interval()) {
        if let Some((start, end)) = overlap_range(&x, &y) {
            prop_assert!(start < end);
            prop_assert!(x.start_minute() <= start && end <= x.end_minute());
            prop_assert!(y.start_minute() <= start && end <= y.end_minute());
        }
    }

    #[test]
    fn prop_sweep_line_matches_pairwise(intervals in arb_catalog()) {
        let pairwise = detect_overlaps(
            &intervals,
            &DetectionOptions::with_strategy(DetectionStrategy::Pairwise),
        )
        .unwrap();
        let sweep = detect_overlaps(
            &intervals,
            &DetectionOptions::with_strategy(DetectionStrategy::SweepLine),
        )
        .unwrap();
        prop_assert_eq!(pairwise, sweep);
    }

    #[test]
    fn prop_pairs_are_canonical_and_unique(intervals in arb_catalog()) {
        let pairs = detect_overlaps(&intervals, &DetectionOptions::default()).unwrap();
        let mut keys = HashSet::new();
        for pair in &pairs {
            prop_assert!(pair.interval_a < pair.interval_b);
            prop_assert_eq!(pair.interval_a.term(), pair.term);
            prop_assert_eq!(pair.interval_b.term(), pair.term);
            prop_assert!(keys.insert(pair.key()));
        }
    }

    #[test]
    fn prop_pair_count_matches_brute_force(intervals in arb_catalog()) {
        let mut expected = 0;
        for (i, x) in intervals.iter().enumerate() {
            for y in &intervals[i + 1..] {
                let same_group = x.day() == y.day() && x.year() == y.year() && x.term() == y.term();
                if same_group && x.key() != y.key() && overlaps(x, y) {
                    expected += 1;
                }
            }
        }
        let pairs = detect_overlaps(&intervals, &DetectionOptions::default()).unwrap();
        prop_assert_eq!(pairs.len(), expected);
    }
}
