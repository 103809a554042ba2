//! Overlap repository trait for the materialized `overlapping_sections` relation.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{MaterializationRecord, OverlapBatch};
use crate::models::OverlapPair;

/// Repository trait for the persisted overlap relation.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait OverlapRepository: Send + Sync {
    /// Marker of the last completed materialization, if any.
    async fn materialization_status(&self) -> RepositoryResult<Option<MaterializationRecord>>;

    /// Persist a full batch of pairs together with its marker.
    ///
    /// Either every pair and the marker become visible, or nothing does.
    /// Implementations serialize concurrent callers and re-check the marker
    /// inside that critical section.
    ///
    /// # Returns
    /// * `Ok(MaterializationRecord)` - The marker that was written
    /// * `Err(RepositoryError::MaterializationConflict)` - Another run populated
    ///   the relation first; nothing was written
    /// * `Err(RepositoryError)` - The write failed and was rolled back
    async fn persist_overlaps(&self, batch: &OverlapBatch)
        -> RepositoryResult<MaterializationRecord>;

    /// All persisted pairs sorted by `(day, year, term, interval_a, interval_b)`.
    async fn fetch_overlaps(&self) -> RepositoryResult<Vec<OverlapPair>>;

    /// Remove every pair and the marker.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of pair rows deleted
    async fn clear_overlaps(&self) -> RepositoryResult<usize>;
}
