//! Species catalog repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};
use tracing::debug;

use avis_core::{
    CatalogRepository, Error, Habitat, NewSpeciesEntry, Result, SpeciesCatalogEntry, SpeciesSize,
};

/// PostgreSQL implementation of [`CatalogRepository`].
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn size_to_str(size: SpeciesSize) -> &'static str {
    match size {
        SpeciesSize::Small => "small",
        SpeciesSize::Medium => "medium",
        SpeciesSize::Large => "large",
    }
}

fn size_from_str(s: &str) -> Result<SpeciesSize> {
    match s {
        "small" => Ok(SpeciesSize::Small),
        "medium" => Ok(SpeciesSize::Medium),
        "large" => Ok(SpeciesSize::Large),
        other => Err(Error::Internal(format!("Unknown species size: {}", other))),
    }
}

fn habitat_to_str(habitat: Habitat) -> &'static str {
    match habitat {
        Habitat::Forest => "forest",
        Habitat::Wetland => "wetland",
        Habitat::Grassland => "grassland",
        Habitat::Urban => "urban",
    }
}

fn habitat_from_str(s: &str) -> Result<Habitat> {
    match s {
        "forest" => Ok(Habitat::Forest),
        "wetland" => Ok(Habitat::Wetland),
        "grassland" => Ok(Habitat::Grassland),
        "urban" => Ok(Habitat::Urban),
        other => Err(Error::Internal(format!("Unknown habitat: {}", other))),
    }
}

fn row_to_entry(row: &sqlx::postgres::PgRow) -> Result<SpeciesCatalogEntry> {
    Ok(SpeciesCatalogEntry {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        image_hint: row.try_get("image_hint")?,
        size: size_from_str(row.try_get::<String, _>("size")?.as_str())?,
        habitat: habitat_from_str(row.try_get::<String, _>("habitat")?.as_str())?,
        colors: row.try_get("colors")?,
    })
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn list(&self) -> Result<Vec<SpeciesCatalogEntry>> {
        let rows = sqlx::query(
            "SELECT id, name, description, image_url, image_hint, size, habitat, colors \
             FROM species ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "catalog",
            op = "list",
            catalog_count = entries.len(),
            "Fetched species catalog"
        );
        Ok(entries)
    }

    async fn append(&self, entry: NewSpeciesEntry) -> Result<SpeciesCatalogEntry> {
        if entry.name.trim().is_empty() || entry.description.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Name and description are required".into(),
            ));
        }

        // Timestamp-derived identifier, matching the catalog store contract.
        let id = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO species (id, name, description, image_url, image_hint, size, habitat, colors) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&id)
        .bind(&entry.name)
        .bind(&entry.description)
        .bind(&entry.image_url)
        .bind(&entry.image_hint)
        .bind(size_to_str(entry.size))
        .bind(habitat_to_str(entry.habitat))
        .bind(&entry.colors)
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "db",
            component = "catalog",
            op = "append",
            species = %entry.name,
            "Registered new species"
        );

        Ok(SpeciesCatalogEntry {
            id,
            name: entry.name,
            description: entry.description,
            image_url: entry.image_url,
            image_hint: entry.image_hint,
            size: entry.size,
            habitat: entry.habitat,
            colors: entry.colors,
        })
    }
}
