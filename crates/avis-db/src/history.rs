//! Identification history repository implementation.
//!
//! Append-only: records are immutable once written and namespaced per user.
//! Concurrent writes from the same user are not coordinated; ordering comes
//! from `created_at` alone.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use avis_core::{
    Error, HistoryRepository, IdentificationRecord, IdentifyMethod, NewIdentification, Result,
};

/// PostgreSQL implementation of [`HistoryRepository`].
#[derive(Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryRepository for PgHistoryRepository {
    async fn append(&self, user_id: Uuid, identification: NewIdentification) -> Result<Uuid> {
        let id = Uuid::now_v7();

        sqlx::query(
            "INSERT INTO identifications \
             (id, user_id, species, method, confidence, description, media_ref) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(id)
        .bind(user_id)
        .bind(&identification.species)
        .bind(identification.method.as_str())
        .bind(identification.confidence)
        .bind(&identification.description)
        .bind(&identification.media_ref)
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "db",
            component = "history",
            op = "append",
            user_id = %user_id,
            species = %identification.species,
            method = %identification.method,
            "Recorded identification"
        );
        Ok(id)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<IdentificationRecord>> {
        let rows = sqlx::query(
            "SELECT id, species, method, confidence, description, media_ref, created_at \
             FROM identifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let method_str: String = row.try_get("method")?;
                let method = IdentifyMethod::parse(&method_str).ok_or_else(|| {
                    Error::Internal(format!("Unknown identification method: {}", method_str))
                })?;
                Ok(IdentificationRecord {
                    id: row.try_get("id")?,
                    species: row.try_get("species")?,
                    date: row.try_get("created_at")?,
                    method,
                    confidence: row.try_get("confidence")?,
                    description: row.try_get("description")?,
                    media_ref: row.try_get("media_ref")?,
                })
            })
            .collect()
    }
}
