//! Species catalog HTTP handlers.

use axum::{extract::State, http::StatusCode, Json};

use avis_core::{CatalogRepository, NewSpeciesEntry, SpeciesCatalogEntry};

use crate::{ApiError, AppState};

/// List the full species catalog, ordered by name.
#[utoipa::path(get, path = "/api/v1/birds", tag = "Birds",
    responses(
        (status = 200, description = "Full species catalog"),
    ))]
pub async fn list_birds(
    State(state): State<AppState>,
) -> Result<Json<Vec<SpeciesCatalogEntry>>, ApiError> {
    let catalog = state.db.catalog.list().await?;
    Ok(Json(catalog))
}

/// Append a new species to the catalog.
///
/// Name and description are required; a blank value in either is rejected
/// before anything is written.
#[utoipa::path(post, path = "/api/v1/birds", tag = "Birds",
    request_body = NewSpeciesEntry,
    responses(
        (status = 201, description = "Species appended to the catalog"),
        (status = 400, description = "Missing name or description"),
    ))]
pub async fn create_bird(
    State(state): State<AppState>,
    Json(entry): Json<NewSpeciesEntry>,
) -> Result<(StatusCode, Json<SpeciesCatalogEntry>), ApiError> {
    let created = state.db.catalog.append(entry).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
