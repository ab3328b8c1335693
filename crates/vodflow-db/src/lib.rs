//! Persistent catalog
//!
//! Relational store for the permanent Video/Ad/Tag/VideoTag graph. All
//! multi-row writes go through one transaction per operation; partial
//! Video-without-tags or Video-without-ads states are never visible.

mod catalog;
mod memory;
mod postgres;
mod transaction;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use memory::MemoryCatalog;
pub use postgres::PostgresCatalog;
pub use transaction::TransactionGuard;

/// Build the Postgres connection pool.
pub async fn create_pool(
    database_url: &str,
    max_connections: u32,
    timeout_seconds: u64,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(timeout_seconds))
        .connect(database_url)
        .await
}

/// Run embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
