//! # Bookstore DB
//!
//! Database access for the Bookstore API:
//!
//! - pool initialisation and migrations
//! - [`StoreError`], the classification of store failures into client and
//!   server errors
//! - [`list`], the executor that turns a decoded
//!   [`FilterParam`](bookstore_core::FilterParam) into a paginated,
//!   parameterised query against an allowlisted entity
//!
//! # Example
//!
//! ```ignore
//! use bookstore_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool().await?;
//! run_migrations(&pool).await?;
//! ```

pub mod error;
pub mod list;

use std::env;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

pub use error::StoreError;
pub use list::{Column, ColumnKind, Listable, Page, delete_by_id, find_by_id, find_many};

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Reversible migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Connects to the database named by `DATABASE_URL`.
pub async fn init_db_pool() -> Result<PgPool, StoreError> {
    let database_url = env::var("DATABASE_URL").map_err(|_| StoreError::MissingDatabaseUrl)?;
    connect(&database_url).await
}

pub async fn connect(database_url: &str) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(StoreError::Database)?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Applies every pending migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), StoreError> {
    MIGRATOR.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Reverts the most recent `steps` applied migrations.
///
/// Returns the version the schema was rolled back to (0 when empty).
pub async fn revert_migrations(pool: &PgPool, steps: usize) -> Result<i64, StoreError> {
    let applied: Vec<i64> = sqlx::query_scalar(
        "SELECT version FROM _sqlx_migrations WHERE success ORDER BY version DESC",
    )
    .fetch_all(pool)
    .await?;

    let target = applied.get(steps).copied().unwrap_or(0);
    MIGRATOR.undo(pool, target).await?;

    tracing::info!(target_version = target, "Database migrations reverted");
    Ok(target)
}
