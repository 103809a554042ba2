//! Storage backends for the catalog source and the overlap relation.
//!
//! - `local`: everything in memory behind one lock; seeded from a [`Catalog`]
//! - `postgres`: university schema plus the materialized tables, via Diesel
//!
//! [`Catalog`]: crate::models::Catalog

pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresConfig, PostgresRepository};
