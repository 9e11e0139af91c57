//! PostgreSQL pool for the API.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, instrument};

use todo_core::error::{StorageError, StorageResult};

/// Pooled connections one connection resolution holds at once: the page
/// read and the count run concurrently.
pub const CONNECTIONS_PER_RESOLUTION: u32 = 2;

/// Pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    /// Never below [`CONNECTIONS_PER_RESOLUTION`].
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a resolver waits for a free connection before failing.
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    /// Preset for the GraphQL API: 15 concurrent resolutions, fail fast
    /// when the pool is exhausted.
    pub fn for_api(url: &str) -> Self {
        Self {
            url: url.to_string(),
            max_connections: 15 * CONNECTIONS_PER_RESOLUTION,
            min_connections: CONNECTIONS_PER_RESOLUTION,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(300),
        }
    }

    /// Override the pool size. Clamped so a single resolution can always
    /// run, and `min_connections` follows it down.
    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max.max(CONNECTIONS_PER_RESOLUTION);
        self.min_connections = self.min_connections.min(self.max_connections);
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Connection resolutions the pool can serve without queueing.
    pub fn concurrent_resolutions(&self) -> u32 {
        self.max_connections / CONNECTIONS_PER_RESOLUTION
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout))
    }
}

/// Shared pool handed to every repository.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[instrument(skip_all)]
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        debug!(
            max_conn = config.max_connections,
            resolutions = config.concurrent_resolutions(),
            acquire_timeout = ?config.acquire_timeout,
            "Creating connection pool"
        );

        let pool = config
            .pool_options()
            .connect(&config.url)
            .await
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply `migrations/` (users and todos tables, keyset indexes).
    #[instrument(skip(self))]
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::MigrationError(e.to_string()))?;

        debug!("Migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Pool that only connects on first use.
    #[cfg(test)]
    pub(crate) fn connect_lazy(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = config
            .pool_options()
            .connect_lazy(&config.url)
            .map_err(|e| StorageError::ConnectionError(e.to_string()))?;
        Ok(Self { pool })
    }
}
