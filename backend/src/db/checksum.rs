//! Checksum calculation for materialization markers.

use sha2::{Digest, Sha256};

use crate::models::ScheduledInterval;

/// Calculate SHA-256 checksum of arbitrary text content.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Fingerprint of a detection input, independent of load order.
///
/// Each interval contributes one `course|section|year|term|day|start|end`
/// line; lines are sorted before hashing.
pub fn interval_fingerprint(intervals: &[ScheduledInterval]) -> String {
    let mut lines: Vec<String> = intervals
        .iter()
        .map(|i| {
            format!(
                "{}|{}|{}|{}|{}|{}|{}",
                i.key().course_id(),
                i.key().section_id(),
                i.year(),
                i.term(),
                i.day().code(),
                i.start_minute(),
                i.end_minute()
            )
        })
        .collect();
    lines.sort();
    calculate_checksum(&lines.join("\n"))
}
