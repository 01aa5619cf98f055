//! PostgreSQL connection pool.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::debug;

pub type DbPool = sqlx::PgPool;

/// Pool sizing, read from `DB_MAX_CONNECTIONS` / `DB_ACQUIRE_TIMEOUT_SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

pub async fn create_pool(database_url: &str, settings: PoolSettings) -> Result<DbPool, sqlx::Error> {
    debug!(
        max_connections = settings.max_connections,
        acquire_timeout_secs = settings.acquire_timeout.as_secs(),
        "connecting to postgres"
    );
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}
