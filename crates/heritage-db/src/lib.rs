//! Postgres access for the heritage map: pool setup, connectivity checks,
//! and the free-text search over the PostGIS heritage tables.

use std::time::Duration;

use heritage_core::AppConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

pub mod search;

pub use search::{
    list_searchable_tables, search_heritage, SearchHit, SearchResponse, SearchTable, NAME_COLUMN,
};

/// Pool sizing, taken from the `HERITAGE_DB_*` settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout: Duration::from_secs(config.db_acquire_timeout_secs),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("search keyword is empty")]
    EmptyKeyword,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// What a successful [`health_check`] learned about the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbHealth {
    /// Installed PostGIS extension version; `None` means search will only
    /// work on tables without geometry.
    pub postgis_version: Option<String>,
}

/// Opens a pool against `database_url`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if no connection can be established.
pub async fn connect_pool(database_url: &str, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await?;
    tracing::debug!(
        max_connections = config.max_connections,
        "database pool connected"
    );
    Ok(pool)
}

/// Round-trips `SELECT 1` through the pool.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Version of the installed `postgis` extension, if any.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the catalog query fails.
pub async fn postgis_version(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT extversion::text FROM pg_extension WHERE extname = 'postgis'",
    )
    .fetch_optional(pool)
    .await
}

/// Pings the pool and reports PostGIS availability.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn health_check(pool: &PgPool) -> Result<DbHealth, DbError> {
    ping(pool).await?;
    let postgis_version = postgis_version(pool).await?;
    if postgis_version.is_none() {
        tracing::warn!("postgis extension is not installed; geometry columns cannot be searched");
    }
    Ok(DbHealth { postgis_version })
}
