//! Database connection pool management and schema bootstrap.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use avis_core::Result;

use crate::catalog::PgCatalogRepository;
use crate::history::PgHistoryRepository;

/// Default maximum number of connections in the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Top-level handle bundling the repositories over one shared pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    pub catalog: PgCatalogRepository,
    pub history: PgHistoryRepository,
}

impl Database {
    /// Connect to PostgreSQL and bootstrap the schema.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!(
            subsystem = "db",
            component = "pool",
            op = "connect",
            max_connections = DEFAULT_MAX_CONNECTIONS,
            "Creating database connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .connect(database_url)
            .await?;

        let db = Self::from_pool(pool);
        db.ensure_schema().await?;
        Ok(db)
    }

    /// Wrap an existing pool without running schema bootstrap.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            catalog: PgCatalogRepository::new(pool.clone()),
            history: PgHistoryRepository::new(pool.clone()),
            pool,
        }
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS species (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL,
                image_url   TEXT,
                image_hint  TEXT,
                size        TEXT NOT NULL,
                habitat     TEXT NOT NULL,
                colors      TEXT[] NOT NULL DEFAULT '{}'
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS identifications (
                id          UUID PRIMARY KEY,
                user_id     UUID NOT NULL,
                species     TEXT NOT NULL,
                method      TEXT NOT NULL,
                confidence  DOUBLE PRECISION,
                description TEXT,
                media_ref   TEXT,
                created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_identifications_user \
             ON identifications (user_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
