//! The identification service wiring classify → augment → record.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};
use uuid::Uuid;

use avis_core::{
    CatalogRepository, ClassificationBackend, ClassificationResult, ClassifyRequest, EncodedMedia,
    Error, IdentifyMethod, NewIdentification, Result, SingleIdentification, SpeciesSuggestions,
};
use avis_inference::augment_suggestions;
use avis_media::media_ref;

use crate::history_writer::HistoryWriter;

/// Orchestrates one identification: builds the classification request,
/// invokes the backend, augments description results against the catalog,
/// and queues a fire-and-forget history record.
///
/// Errors from the classification flow surface to the caller; history
/// write failures never do.
pub struct Identifier {
    backend: Arc<dyn ClassificationBackend>,
    catalog: Arc<dyn CatalogRepository>,
    history: HistoryWriter,
}

impl Identifier {
    pub fn new(
        backend: Arc<dyn ClassificationBackend>,
        catalog: Arc<dyn CatalogRepository>,
        history: HistoryWriter,
    ) -> Self {
        Self {
            backend,
            catalog,
            history,
        }
    }

    /// The classification backend in use.
    pub fn backend(&self) -> &Arc<dyn ClassificationBackend> {
        &self.backend
    }

    /// Identify a bird from a photo.
    pub async fn identify_photo(
        &self,
        user_id: Option<Uuid>,
        media: EncodedMedia,
    ) -> Result<SingleIdentification> {
        self.identify_media(user_id, IdentifyMethod::Photo, media)
            .await
    }

    /// Identify a bird from a video recording.
    pub async fn identify_video(
        &self,
        user_id: Option<Uuid>,
        media: EncodedMedia,
    ) -> Result<SingleIdentification> {
        self.identify_media(user_id, IdentifyMethod::Video, media)
            .await
    }

    /// Identify a bird from an audio recording of its song.
    pub async fn identify_song(
        &self,
        user_id: Option<Uuid>,
        media: EncodedMedia,
    ) -> Result<SingleIdentification> {
        self.identify_media(user_id, IdentifyMethod::Song, media)
            .await
    }

    /// Identify a bird from one media payload.
    pub async fn identify_media(
        &self,
        user_id: Option<Uuid>,
        method: IdentifyMethod,
        media: EncodedMedia,
    ) -> Result<SingleIdentification> {
        let request = match method {
            IdentifyMethod::Photo => ClassifyRequest::Photo { media },
            IdentifyMethod::Video => ClassifyRequest::Video { media },
            IdentifyMethod::Song => ClassifyRequest::Song { media },
            IdentifyMethod::Description => {
                return Err(Error::InvalidInput(
                    "Description identification takes text, not media".into(),
                ))
            }
        };
        request.validate()?;

        // Content-hash reference only; the payload itself is never persisted.
        let media_ref = request.media().and_then(|m| media_ref(m).ok());

        let start = Instant::now();
        let result = self.backend.classify(&request).await?;
        let single = match result {
            ClassificationResult::Single(s) => s,
            ClassificationResult::Suggestions(_) => {
                return Err(Error::Classification(
                    "Backend returned suggestions for a single-subject request".into(),
                ))
            }
        };

        info!(
            subsystem = "flows",
            component = "identifier",
            op = "identify",
            method = %method,
            species = %single.species,
            confidence = single.confidence,
            duration_ms = start.elapsed().as_millis() as u64,
            "Identification succeeded"
        );

        self.history.record(
            user_id,
            NewIdentification {
                species: single.species.clone(),
                method,
                confidence: Some(single.confidence),
                description: Some(single.description.clone()),
                media_ref,
            },
        );

        Ok(single)
    }

    /// Identify birds from a free-text description.
    ///
    /// The catalog is fetched fresh per request; repeated calls pay the
    /// fetch cost again. Fetch failure is `Upstream` and the classification
    /// service is never called. An empty catalog is not a failure.
    pub async fn identify_description(
        &self,
        user_id: Option<Uuid>,
        text: &str,
    ) -> Result<SpeciesSuggestions> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Description text is empty".into()));
        }

        let catalog = self
            .catalog
            .list()
            .await
            .map_err(|e| Error::Upstream(format!("Catalog fetch failed: {}", e)))?;
        debug!(
            subsystem = "flows",
            component = "identifier",
            catalog_count = catalog.len(),
            "Fetched catalog for description request"
        );

        let start = Instant::now();
        let result = self
            .backend
            .classify(&ClassifyRequest::Description {
                text: text.to_string(),
                catalog: catalog.clone(),
            })
            .await?;
        let suggestions = match result {
            ClassificationResult::Suggestions(s) => s,
            ClassificationResult::Single(_) => {
                return Err(Error::Classification(
                    "Backend returned a single result for a description request".into(),
                ))
            }
        };

        let suggestions = augment_suggestions(suggestions, &catalog);

        info!(
            subsystem = "flows",
            component = "identifier",
            op = "identify",
            method = %IdentifyMethod::Description,
            suggestion_count = suggestions.birds.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Identification succeeded"
        );

        if let Some(top) = suggestions.birds.first() {
            self.history.record(
                user_id,
                NewIdentification {
                    species: top.name.clone(),
                    method: IdentifyMethod::Description,
                    confidence: Some(top.confidence),
                    description: Some(top.description.clone()),
                    media_ref: None,
                },
            );
        }

        Ok(suggestions)
    }
}
