//! Postgres repository implementation using Diesel.
//!
//! The catalog is read from the university `section` and `time_slot`
//! relations. The overlap result lives in `overlapping_sections` next to a
//! marker row in `overlap_materializations`; both tables are created by the
//! embedded migrations.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Connections validated on check-out
//! - Automatic migration execution
//! - Populate step serialized by a transaction-scoped advisory lock
//!
//! Failed operations are reported as-is; nothing is retried here.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::BigInt;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{debug, info};
use std::time::Duration;
use tokio::task;

use crate::db::models::{MaterializationRecord, OverlapBatch, OVERLAP_SCOPE};
use crate::db::repository::{
    CatalogRepository, ErrorContext, OverlapRepository, RepositoryError, RepositoryResult,
};
use crate::models::{OverlapPair, ScheduledInterval};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Advisory lock key guarding the populate and clear steps ("overlaps").
const OVERLAP_LOCK_KEY: i64 = 0x6f76_6572_6c61_7073;

/// Rows per INSERT statement; 11 bound parameters each.
const INSERT_CHUNK: usize = 1000;

const LOAD_INTERVALS_SQL: &str = "\
SELECT s.course_id::text AS course_id, \
       s.sec_id::text AS sec_id, \
       s.semester::text AS semester, \
       s.year::int4 AS year, \
       t.day::text AS day, \
       t.start_hr::int4 AS start_hr, \
       t.start_min::int4 AS start_min, \
       t.end_hr::int4 AS end_hr, \
       t.end_min::int4 AS end_min \
FROM section s \
JOIN time_slot t ON s.time_slot_id = t.time_slot_id \
ORDER BY s.course_id, s.sec_id, s.year, s.semester, t.day, t.start_hr, t.start_min";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    ///
    /// # Arguments
    /// * `config` - Database configuration
    ///
    /// # Returns
    /// * `Ok(PostgresRepository)` on success
    /// * `Err(RepositoryError)` if connection or migration fails
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run a blocking database operation on a pooled connection.
    ///
    /// The connection is returned to the pool when the closure finishes,
    /// whichever way it exits.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection"),
                )
            })?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

/// Block until no other transaction holds the overlap lock.
fn lock_overlaps(tx: &mut PgConnection) -> RepositoryResult<()> {
    sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<BigInt, _>(OVERLAP_LOCK_KEY)
        .execute(tx)
        .map(|_| ())
        .map_err(map_diesel_error)
}

fn read_marker(tx: &mut PgConnection) -> RepositoryResult<Option<MaterializationRow>> {
    overlap_materializations::table
        .filter(overlap_materializations::scope.eq(OVERLAP_SCOPE))
        .select(MaterializationRow::as_select())
        .first::<MaterializationRow>(tx)
        .optional()
        .map_err(map_diesel_error)
}

fn has_pair_rows(tx: &mut PgConnection) -> RepositoryResult<bool> {
    diesel::select(exists(overlapping_sections::table.select(overlapping_sections::day)))
        .get_result(tx)
        .map_err(map_diesel_error)
}

/// Refuse to populate when a marker exists or when rows are present without
/// one, as left by an earlier tool that only wrote the table.
fn ensure_unpopulated(marker: Option<&MaterializationRow>, has_rows: bool) -> RepositoryResult<()> {
    let context = ErrorContext::new("persist_overlaps").with_entity(OVERLAP_SCOPE);
    match marker {
        Some(existing) => Err(RepositoryError::materialization_conflict(
            format!(
                "relation already populated at {} with {} pairs",
                existing.materialized_at, existing.pair_count
            ),
            context,
        )),
        None if has_rows => Err(RepositoryError::materialization_conflict(
            "relation holds rows but no materialization marker",
            context,
        )),
        None => Ok(()),
    }
}

#[async_trait]
impl CatalogRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn load_scheduled_intervals(&self) -> RepositoryResult<Vec<ScheduledInterval>> {
        self.with_conn(|conn| {
            let rows: Vec<IntervalSourceRow> = sql_query(LOAD_INTERVALS_SQL)
                .load(conn)
                .map_err(|e| map_diesel_error(e).with_operation("load_intervals"))?;
            debug!("Fetched {} section/time_slot rows", rows.len());

            let mut intervals = Vec::with_capacity(rows.len());
            for row in rows {
                intervals.push(row.into_interval()?);
            }
            Ok(intervals)
        })
        .await
    }
}

#[async_trait]
impl OverlapRepository for PostgresRepository {
    async fn materialization_status(&self) -> RepositoryResult<Option<MaterializationRecord>> {
        self.with_conn(|conn| read_marker(conn)?.map(MaterializationRow::into_record).transpose())
            .await
    }

    async fn persist_overlaps(
        &self,
        batch: &OverlapBatch,
    ) -> RepositoryResult<MaterializationRecord> {
        let rows: Vec<OverlapRow> = batch.pairs.iter().map(OverlapRow::from).collect();
        let marker = MaterializationRow::from_record(&batch.record(Utc::now()))?;

        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                lock_overlaps(tx)?;

                // Re-check under the lock: another run may have committed
                // between our status check and this transaction.
                let marker = read_marker(tx)?;
                let has_rows = has_pair_rows(tx)?;
                ensure_unpopulated(marker.as_ref(), has_rows)?;

                for chunk in rows.chunks(INSERT_CHUNK) {
                    diesel::insert_into(overlapping_sections::table)
                        .values(chunk)
                        .execute(tx)
                        .map_err(|e| map_diesel_error(e).with_operation("persist_overlaps"))?;
                }

                let written: MaterializationRow = diesel::insert_into(overlap_materializations::table)
                    .values(&marker)
                    .returning(MaterializationRow::as_returning())
                    .get_result(tx)
                    .map_err(|e| map_diesel_error(e).with_operation("persist_overlaps"))?;

                info!(
                    "Materialized {} overlapping pairs into Postgres",
                    written.pair_count
                );
                written.into_record()
            })
        })
        .await
    }

    async fn fetch_overlaps(&self) -> RepositoryResult<Vec<OverlapPair>> {
        self.with_conn(|conn| {
            let rows: Vec<OverlapRow> = overlapping_sections::table
                .select(OverlapRow::as_select())
                .load(conn)
                .map_err(map_diesel_error)?;

            let mut pairs = Vec::with_capacity(rows.len());
            for row in rows {
                pairs.push(row.into_pair().map_err(|e| {
                    RepositoryError::from(e).with_operation("fetch_overlaps")
                })?);
            }
            // Text ordering of day codes is not weekday order.
            pairs.sort_by(|a, b| a.key().cmp(&b.key()));
            Ok(pairs)
        })
        .await
    }

    async fn clear_overlaps(&self) -> RepositoryResult<usize> {
        self.with_conn(|conn| {
            conn.transaction(|tx| {
                lock_overlaps(tx)?;
                let removed = diesel::delete(overlapping_sections::table)
                    .execute(tx)
                    .map_err(map_diesel_error)?;
                diesel::delete(
                    overlap_materializations::table
                        .filter(overlap_materializations::scope.eq(OVERLAP_SCOPE)),
                )
                .execute(tx)
                .map_err(map_diesel_error)?;
                Ok(removed)
            })
        })
        .await
    }
}
