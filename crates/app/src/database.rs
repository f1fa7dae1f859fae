//! Database connection management

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError, postgres::PgPoolOptions, query};
use tracing::warn;

/// How long a request waits for a pooled connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on the availability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or `BEGIN` fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails or the recorded history diverges.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Reports whether the store can currently serve queries.
#[automock]
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// True when a trivial query succeeds within the probe timeout.
    async fn is_available(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct PgDatabaseProbe {
    pool: PgPool,
}

impl PgDatabaseProbe {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseProbe for PgDatabaseProbe {
    async fn is_available(&self) -> bool {
        match tokio::time::timeout(PROBE_TIMEOUT, query("SELECT 1").execute(&self.pool)).await {
            Ok(Ok(_)) => true,
            Ok(Err(error)) => {
                warn!(%error, "database probe failed");
                false
            }
            Err(_elapsed) => {
                warn!("database probe timed out");
                false
            }
        }
    }
}
