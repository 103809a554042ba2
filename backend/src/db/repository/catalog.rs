//! Catalog repository trait: the data source of scheduled intervals.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::ScheduledInterval;

/// Read access to the section and time slot source.
///
/// A repository handle is created by the caller and passed into each run;
/// nothing here relies on process-wide connection state.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Check if the data source is reachable.
    ///
    /// # Returns
    /// * `Ok(true)` - The source answered
    /// * `Ok(false)` - The source is reachable but reports itself unhealthy
    /// * `Err(RepositoryError)` - The check could not be performed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Load every scheduled meeting occurrence (section joined with its
    /// time slot) as validated intervals.
    ///
    /// Fails with [`RepositoryError::InvalidInterval`] on the first row that
    /// does not form a valid interval; intervals are never partially loaded.
    ///
    /// [`RepositoryError::InvalidInterval`]: super::RepositoryError::InvalidInterval
    async fn load_scheduled_intervals(&self) -> RepositoryResult<Vec<ScheduledInterval>>;
}
