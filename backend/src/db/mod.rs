//! Database module: the section data source and the materialized overlap relation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (course-overlap binary, tests)       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Materialization gate (ensure_computed)                │
//! │  - Input fingerprinting                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                         │
//! │  - CatalogRepository (intervals in)                      │
//! │  - OverlapRepository (pairs out, marker)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────────┐  ┌──────────▼──────────────┐
//! │ Postgres Repository  │  │ Local Repository        │
//! │ (Diesel, r2d2)       │  │ (in-memory)             │
//! └──────────────────────┘  └─────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use section_overlap::db::{services, RepositoryBuilder};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let builder = RepositoryBuilder::new().from_default_config()?;
//!     let options = builder.detection_options()?;
//!     let repo = builder.build().await?;
//!
//!     services::ensure_computed(repo.as_ref(), &options).await?;
//!     let pairs = services::fetch_overlaps(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod checksum;
pub mod factory;
pub mod models;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

// ==================== Service Layer ====================

pub use services::{
    ensure_computed, fetch_overlaps, has_materialized_overlaps, health_check, load_intervals,
    refresh_overlaps,
};

// ==================== Repository Pattern Exports ====================

pub use checksum::{calculate_checksum, interval_fingerprint};
pub use models::{MaterializationOutcome, MaterializationRecord, OverlapBatch, OVERLAP_SCOPE};
pub use repo_config::{DetectionSettings, RepositoryConfig};

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    CatalogRepository, ErrorContext, FullRepository, OverlapRepository, RepositoryError,
    RepositoryResult,
};
