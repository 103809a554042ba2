//! Repository trait definitions for database operations.
//!
//! Responsibilities are split across focused traits so implementations stay
//! small and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`catalog`]: Reading scheduled intervals from the section source
//! - [`overlap`]: The materialized overlap relation and its marker
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let intervals = repo.load_scheduled_intervals().await?;
//!     let status = repo.materialization_status().await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod error;
pub mod overlap;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use catalog::CatalogRepository;
pub use overlap::OverlapRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits.
pub trait FullRepository: CatalogRepository + OverlapRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: CatalogRepository + OverlapRepository {}
