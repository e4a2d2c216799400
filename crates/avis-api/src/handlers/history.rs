//! Identification history HTTP handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use avis_core::{HistoryRepository, IdentificationRecord};

use crate::{ApiError, AppState};

/// List a user's identification history, most recent first.
///
/// Unknown users simply have an empty history; this never 404s.
#[utoipa::path(get, path = "/api/v1/users/{user_id}/history", tag = "History",
    params(
        ("user_id" = Uuid, Path, description = "User whose history to list"),
    ),
    responses(
        (status = 200, description = "Identification history, most recent first"),
        (status = 400, description = "Malformed user ID"),
    ))]
pub async fn list_user_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<IdentificationRecord>>, ApiError> {
    let records = state.db.history.list_for_user(user_id).await?;
    Ok(Json(records))
}
