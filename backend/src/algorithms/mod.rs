//! Overlap detection algorithms.
//!
//! - [`grouping`]: partition by `(day, year, term)` and identity checks
//! - [`overlap`]: overlap predicate, pairwise and sweep-line detectors

pub mod grouping;
pub mod overlap;

pub use grouping::{group_intervals, unique_members, DetectionError, GroupKey};
pub use overlap::{
    detect_overlaps, detect_overlaps_with_report, overlap_range, overlaps, pair_of, pairwise,
    sweep_line, DetectionOptions, DetectionReport, DetectionStrategy, DEFAULT_SWEEP_THRESHOLD,
};
