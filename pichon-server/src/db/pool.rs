//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits. Every store operation
//! borrows one connection for one statement and hands it straight back.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Default maximum connections for the pool.
/// Kept low: one front end, one statement per request.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connect with the resolved database settings.
///
/// ```ignore
/// let config = Config::from_env(None)?;
/// let pool = connect(&config.database).await?;
/// migrations::run(&pool).await?;
/// ```
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    tracing::debug!(max_connections = config.max_connections, "connecting to PostgreSQL");
    create_pool_with_options(&config.url, config.max_connections).await
}

/// Pool with the default size, for tools and tests holding a bare URL.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Pool of `max_connections` (at least one).
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(database_url)
        .await
}
