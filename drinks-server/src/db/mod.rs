//! SQLite connection pool, migrations and drink storage

pub mod drinks;

use crate::config::DatabaseConfig;
use log::info;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] MigrateError),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open the pool and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> RepoResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .pragma("foreign_keys", "ON");

    let mut pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
    if is_in_memory(&config.url) {
        // Every connection to an in-memory database sees its own empty database,
        // so the single connection must never be recycled.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    info!("Database connection established ({})", config.url);

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply the embedded migrations
pub async fn migrate(pool: &SqlitePool) -> RepoResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Cheap liveness probe
pub async fn ping(pool: &SqlitePool) -> RepoResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        reset_on_start: false,
    })
    .await
    .expect("Failed to open in-memory database")
}
