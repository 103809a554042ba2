//! High-level database service layer.
//!
//! Repository-agnostic operations that work with any implementation of the
//! repository traits. The materialization gate lives here so the
//! compute-once rule is the same for every storage backend.
//!
//! # Usage
//!
//! ```no_run
//! use section_overlap::algorithms::DetectionOptions;
//! use section_overlap::db::{repositories::LocalRepository, services};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!
//!     let outcome = services::ensure_computed(&repo, &DetectionOptions::default()).await?;
//!     println!("{} overlapping pairs", outcome.record().pair_count);
//!
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use super::checksum::interval_fingerprint;
use super::models::{MaterializationOutcome, OverlapBatch};
use super::repository::{FullRepository, RepositoryResult};
use crate::algorithms::{detect_overlaps_with_report, DetectionOptions};
use crate::models::{OverlapPair, ScheduledInterval};

// ==================== Health & Connection ====================

/// Check if the data source is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Catalog ====================

/// Load every scheduled interval from the source.
pub async fn load_intervals<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<ScheduledInterval>> {
    repo.load_scheduled_intervals().await
}

// ==================== Materialization ====================

/// Compute and persist the overlap relation unless it already exists.
///
/// 1. If a materialization marker is present, return it without loading or
///    detecting anything.
/// 2. Otherwise load all intervals, detect overlaps and persist the pairs
///    together with a new marker as one unit.
///
/// # Returns
/// * `Ok(MaterializationOutcome::AlreadyMaterialized)` - Nothing was done
/// * `Ok(MaterializationOutcome::Computed)` - This call populated the relation
/// * `Err(RepositoryError::InvalidInterval)` - A source row is malformed
/// * `Err(RepositoryError::DuplicateIdentity)` - A section meets twice with different ranges
/// * `Err(RepositoryError::MaterializationConflict)` - Another run populated
///   the relation after the status check
///
/// [`RepositoryError::InvalidInterval`]: super::RepositoryError::InvalidInterval
pub async fn ensure_computed<R: FullRepository + ?Sized>(
    repo: &R,
    options: &DetectionOptions,
) -> RepositoryResult<MaterializationOutcome> {
    if let Some(record) = repo.materialization_status().await? {
        info!(
            "Service layer: overlaps already materialized at {} ({} pairs), skipping",
            record.materialized_at, record.pair_count
        );
        return Ok(MaterializationOutcome::AlreadyMaterialized(record));
    }

    info!("Service layer: overlaps missing, computing...");
    let intervals = repo.load_scheduled_intervals().await?;
    let checksum = interval_fingerprint(&intervals);
    let (pairs, report) = detect_overlaps_with_report(&intervals, options)?;
    debug!(
        "Detection over {} intervals in {} groups found {} pairs (strategy={}, input={})",
        report.interval_count, report.group_count, report.pair_count, options.strategy, checksum
    );

    let batch = OverlapBatch::new(pairs, checksum, intervals.len(), options.strategy);
    let record = repo.persist_overlaps(&batch).await?;
    info!(
        "Service layer: materialized {} overlapping pairs from {} intervals",
        record.pair_count, record.interval_count
    );
    Ok(MaterializationOutcome::Computed(record))
}

/// Drop the persisted relation and compute it again.
pub async fn refresh_overlaps<R: FullRepository + ?Sized>(
    repo: &R,
    options: &DetectionOptions,
) -> RepositoryResult<MaterializationOutcome> {
    let removed = repo.clear_overlaps().await?;
    info!("Service layer: cleared {} overlapping pairs", removed);
    ensure_computed(repo, options).await
}

/// Fetch every persisted overlap pair.
pub async fn fetch_overlaps<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<OverlapPair>> {
    repo.fetch_overlaps().await
}

/// Check whether the overlap relation has been materialized.
pub async fn has_materialized_overlaps<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<bool> {
    Ok(repo.materialization_status().await?.is_some())
}
