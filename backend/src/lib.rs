//! # Section Overlap
//!
//! Detects course sections that meet at the same time on the same day of the
//! same academic term, and materializes the result once per scope.
//!
//! ## Architecture
//!
//! - [`models`]: Scheduled intervals, calendar enums, catalog rows and overlap pairs
//! - [`algorithms`]: Grouping and the pairwise / sweep-line detectors
//! - [`db`]: Repository traits, local and Postgres backends, and the
//!   materialization gate
//! - [`io`]: CSV catalog loading and overlap table export
//!
//! ## Example
//!
//! ```
//! use section_overlap::algorithms::{detect_overlaps, DetectionOptions};
//! use section_overlap::models::{ScheduledInterval, SectionKey, Term, Weekday};
//!
//! let a = SectionKey::new("CPSC-237", "002", 2017, Term::Fall).unwrap();
//! let b = SectionKey::new("CPSC-240", "001", 2017, Term::Fall).unwrap();
//! let intervals = vec![
//!     ScheduledInterval::new(a, Weekday::Monday, 540, 615).unwrap(),
//!     ScheduledInterval::new(b, Weekday::Monday, 600, 645).unwrap(),
//! ];
//!
//! let pairs = detect_overlaps(&intervals, &DetectionOptions::default()).unwrap();
//! assert_eq!(pairs.len(), 1);
//! assert_eq!(pairs[0].overlap_start(), "10:00");
//! assert_eq!(pairs[0].overlap_end(), "10:15");
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod db;
pub mod io;
pub mod models;
