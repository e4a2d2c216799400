//! Identification HTTP handlers.
//!
//! Media endpoints accept the encoded payload as a `data:<mime>;base64,...`
//! URI; the description endpoint accepts free text. The optional `x-user-id`
//! header attaches the result to a user's history; without it the
//! identification still runs, it just isn't recorded.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use uuid::Uuid;

use avis_core::{EncodedMedia, SingleIdentification, SpeciesSuggestions};

use crate::{ApiError, AppState};

/// Request body for media identification endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyMediaRequest {
    /// Media payload as a `data:<mime>;base64,<payload>` URI.
    pub data_uri: String,
}

/// Request body for the description identification endpoint.
#[derive(Debug, Deserialize)]
pub struct IdentifyDescriptionRequest {
    /// Free-text description of the bird.
    pub description: String,
}

/// Extract the optional `x-user-id` header as a UUID.
fn user_from_headers(headers: &HeaderMap) -> Result<Option<Uuid>, ApiError> {
    let Some(value) = headers.get("x-user-id") else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("x-user-id header is not valid UTF-8".into()))?;
    let user_id = Uuid::parse_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid x-user-id header: {}", e)))?;
    Ok(Some(user_id))
}

/// Identify a bird from a photo.
#[utoipa::path(post, path = "/api/v1/identify/photo", tag = "Identify",
    request_body = IdentifyMediaRequest,
    responses(
        (status = 200, description = "Single-subject identification"),
        (status = 400, description = "Invalid or non-image payload"),
        (status = 502, description = "Classification service failed"),
    ))]
pub async fn identify_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<IdentifyMediaRequest>,
) -> Result<Json<SingleIdentification>, ApiError> {
    let user_id = user_from_headers(&headers)?;
    let media = EncodedMedia::from_data_uri(&req.data_uri)?;
    let result = state.identifier.identify_photo(user_id, media).await?;
    Ok(Json(result))
}

/// Identify a bird from a video recording.
#[utoipa::path(post, path = "/api/v1/identify/video", tag = "Identify",
    request_body = IdentifyMediaRequest,
    responses(
        (status = 200, description = "Single-subject identification"),
        (status = 400, description = "Invalid or non-video payload"),
        (status = 502, description = "Classification service failed"),
    ))]
pub async fn identify_video(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<IdentifyMediaRequest>,
) -> Result<Json<SingleIdentification>, ApiError> {
    let user_id = user_from_headers(&headers)?;
    let media = EncodedMedia::from_data_uri(&req.data_uri)?;
    let result = state.identifier.identify_video(user_id, media).await?;
    Ok(Json(result))
}

/// Identify a bird from an audio recording of its song.
#[utoipa::path(post, path = "/api/v1/identify/song", tag = "Identify",
    request_body = IdentifyMediaRequest,
    responses(
        (status = 200, description = "Single-subject identification"),
        (status = 400, description = "Invalid or non-audio payload"),
        (status = 502, description = "Classification service failed"),
    ))]
pub async fn identify_song(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<IdentifyMediaRequest>,
) -> Result<Json<SingleIdentification>, ApiError> {
    let user_id = user_from_headers(&headers)?;
    let media = EncodedMedia::from_data_uri(&req.data_uri)?;
    let result = state.identifier.identify_song(user_id, media).await?;
    Ok(Json(result))
}

/// Identify birds from a free-text description.
///
/// Returns up to three catalog-augmented suggestions; an empty list means
/// nothing plausible matched. 503 means the species catalog itself was
/// unreachable; the classification service is never consulted in that case.
#[utoipa::path(post, path = "/api/v1/identify/description", tag = "Identify",
    request_body = IdentifyDescriptionRequest,
    responses(
        (status = 200, description = "Ranked species suggestions"),
        (status = 400, description = "Empty description"),
        (status = 502, description = "Classification service failed"),
        (status = 503, description = "Species catalog unreachable"),
    ))]
pub async fn identify_description(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<IdentifyDescriptionRequest>,
) -> Result<Json<SpeciesSuggestions>, ApiError> {
    let user_id = user_from_headers(&headers)?;
    let result = state
        .identifier
        .identify_description(user_id, &req.description)
        .await?;
    Ok(Json(result))
}
