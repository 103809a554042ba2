//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. The catalog, the overlap
//! relation and its marker all live behind one lock, which gives
//! `persist_overlaps` the same all-or-nothing behaviour as a database
//! transaction.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::models::{MaterializationRecord, OverlapBatch, OVERLAP_SCOPE};
use crate::db::repository::*;
use crate::models::{Catalog, OverlapPair, ScheduledInterval};

/// In-memory local repository.
///
/// # Example
/// ```
/// use section_overlap::db::repositories::LocalRepository;
/// use section_overlap::models::Catalog;
///
/// let repo = LocalRepository::with_catalog(Catalog::default());
/// assert_eq!(repo.overlap_count(), 0);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    // Source relations
    catalog: Catalog,
    intervals: Vec<ScheduledInterval>,

    // Materialized relation
    overlaps: Vec<OverlapPair>,
    marker: Option<MaterializationRecord>,

    // Test hooks
    fail_next_persist: bool,
    persist_calls: usize,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            catalog: Catalog::default(),
            intervals: Vec::new(),
            overlaps: Vec::new(),
            marker: None,
            fail_next_persist: false,
            persist_calls: 0,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository whose source is a section/time slot catalog.
    pub fn with_catalog(catalog: Catalog) -> Self {
        let repo = Self::new();
        repo.seed_catalog(catalog);
        repo
    }

    /// Create a repository whose source is a list of ready-made intervals.
    pub fn with_intervals(intervals: Vec<ScheduledInterval>) -> Self {
        let repo = Self::new();
        repo.seed_intervals(intervals);
        repo
    }

    /// Replace the catalog rows.
    pub fn seed_catalog(&self, catalog: Catalog) {
        self.data.write().catalog = catalog;
    }

    /// Replace the ready-made intervals. They are returned after the ones
    /// built from the catalog.
    pub fn seed_intervals(&self, intervals: Vec<ScheduledInterval>) {
        self.data.write().intervals = intervals;
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Make the next `persist_overlaps` call fail after staging its rows.
    pub fn fail_next_persist(&self) {
        self.data.write().fail_next_persist = true;
    }

    /// Number of `persist_overlaps` calls that reached the write step.
    pub fn persist_count(&self) -> usize {
        self.data.read().persist_calls
    }

    /// Number of pair rows currently materialized.
    pub fn overlap_count(&self) -> usize {
        self.data.read().overlaps.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_unique_keys(pairs: &[OverlapPair]) -> RepositoryResult<()> {
    let mut seen = HashSet::with_capacity(pairs.len());
    for pair in pairs {
        if !seen.insert(pair.key()) {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "pair {} / {} on {} appears twice",
                    pair.interval_a, pair.interval_b, pair.day
                ),
                ErrorContext::new("persist_overlaps").with_entity(OVERLAP_SCOPE),
            ));
        }
    }
    Ok(())
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn load_scheduled_intervals(&self) -> RepositoryResult<Vec<ScheduledInterval>> {
        self.check_health("load_intervals")?;
        let data = self.data.read();
        let mut intervals = data.catalog.intervals()?;
        intervals.extend(data.intervals.iter().cloned());
        debug!("Loaded {} intervals from local catalog", intervals.len());
        Ok(intervals)
    }
}

// ==================== Overlap Repository ====================

#[async_trait]
impl OverlapRepository for LocalRepository {
    async fn materialization_status(&self) -> RepositoryResult<Option<MaterializationRecord>> {
        self.check_health("materialization_status")?;
        Ok(self.data.read().marker.clone())
    }

    async fn persist_overlaps(
        &self,
        batch: &OverlapBatch,
    ) -> RepositoryResult<MaterializationRecord> {
        self.check_health("persist_overlaps")?;
        // Held for the whole check-and-write step.
        let mut data = self.data.write();

        if let Some(existing) = &data.marker {
            return Err(RepositoryError::materialization_conflict(
                format!(
                    "relation already populated at {} with {} pairs",
                    existing.materialized_at, existing.pair_count
                ),
                ErrorContext::new("persist_overlaps").with_entity(OVERLAP_SCOPE),
            ));
        }

        ensure_unique_keys(&batch.pairs)?;
        data.persist_calls += 1;

        let mut staged = batch.pairs.clone();
        staged.sort_by(|a, b| a.key().cmp(&b.key()));

        if data.fail_next_persist {
            data.fail_next_persist = false;
            return Err(RepositoryError::transaction(
                "injected failure before commit; staged rows discarded",
            )
            .with_operation("persist_overlaps"));
        }

        let record = batch.record(Utc::now());
        data.overlaps = staged;
        data.marker = Some(record.clone());
        info!(
            "Materialized {} overlapping pairs into local repository",
            record.pair_count
        );
        Ok(record)
    }

    async fn fetch_overlaps(&self) -> RepositoryResult<Vec<OverlapPair>> {
        self.check_health("fetch_overlaps")?;
        Ok(self.data.read().overlaps.clone())
    }

    async fn clear_overlaps(&self) -> RepositoryResult<usize> {
        self.check_health("clear_overlaps")?;
        let mut data = self.data.write();
        let removed = data.overlaps.len();
        data.overlaps.clear();
        data.marker = None;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::DetectionStrategy;
    use crate::models::{SectionKey, SectionRow, Term, TimeSlotRow, Weekday};

    fn key(course: &str) -> SectionKey {
        SectionKey::new(course, "1", 2017, Term::Fall).unwrap()
    }

    fn pair(a: &str, b: &str) -> OverlapPair {
        OverlapPair::canonical(Weekday::Monday, &key(a), &key(b), 600, 615).unwrap()
    }

    fn batch(pairs: Vec<OverlapPair>) -> OverlapBatch {
        OverlapBatch::new(pairs, "checksum", 2, DetectionStrategy::Pairwise)
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(repo.load_scheduled_intervals().await.is_err());
    }

    #[tokio::test]
    async fn test_load_joins_catalog_and_seeded_intervals() {
        let catalog = Catalog::new(
            vec![SectionRow {
                course_id: "CPSC-237".into(),
                sec_id: "1".into(),
                semester: "Fall".into(),
                year: 2017,
                building: None,
                room_number: None,
                time_slot_id: Some("A".into()),
            }],
            vec![TimeSlotRow {
                time_slot_id: "A".into(),
                day: "M".into(),
                start_hr: 9,
                start_min: 0,
                end_hr: 9,
                end_min: 50,
            }],
        );
        let repo = LocalRepository::with_catalog(catalog);
        let extra = ScheduledInterval::new(key("MATH-101"), Weekday::Friday, 480, 530).unwrap();
        repo.seed_intervals(vec![extra.clone()]);

        let intervals = repo.load_scheduled_intervals().await.unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].start_minute(), 540);
        assert_eq!(intervals[1], extra);
    }

    #[tokio::test]
    async fn test_persist_writes_pairs_and_marker() {
        let repo = LocalRepository::new();
        assert!(repo.materialization_status().await.unwrap().is_none());

        let record = repo
            .persist_overlaps(&batch(vec![pair("B", "C"), pair("A", "B")]))
            .await
            .unwrap();
        assert_eq!(record.pair_count, 2);
        assert_eq!(record.scope, OVERLAP_SCOPE);

        let stored = repo.fetch_overlaps().await.unwrap();
        assert_eq!(stored[0].interval_a.course_id(), "A");
        assert_eq!(repo.materialization_status().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_second_persist_is_a_conflict() {
        let repo = LocalRepository::new();
        repo.persist_overlaps(&batch(vec![])).await.unwrap();

        let err = repo
            .persist_overlaps(&batch(vec![pair("A", "B")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::MaterializationConflict { .. }));
        assert_eq!(repo.overlap_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_nothing_visible() {
        let repo = LocalRepository::new();
        repo.fail_next_persist();

        let err = repo
            .persist_overlaps(&batch(vec![pair("A", "B")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::TransactionError { .. }));
        assert_eq!(repo.overlap_count(), 0);
        assert!(repo.materialization_status().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_pair_rejected() {
        let repo = LocalRepository::new();
        let err = repo
            .persist_overlaps(&batch(vec![pair("A", "B"), pair("B", "A")]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert!(repo.materialization_status().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_overlaps() {
        let repo = LocalRepository::new();
        repo.persist_overlaps(&batch(vec![pair("A", "B")]))
            .await
            .unwrap();

        assert_eq!(repo.clear_overlaps().await.unwrap(), 1);
        assert!(repo.materialization_status().await.unwrap().is_none());
        assert!(repo.fetch_overlaps().await.unwrap().is_empty());
    }
}
