//! Shared data model for the identification pipeline.
//!
//! These types form the stable contract between the media encoder, the
//! classification client, the augmenter, and the persistence layer. Wire
//! names follow the JSON contract of the catalog store and the
//! classification service (camelCase).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// ENCODED MEDIA
// =============================================================================

/// Asset kind expected by a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Returns the kind implied by a MIME type, if any.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime_type.starts_with("audio/") {
            Some(MediaKind::Audio)
        } else if mime_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A MIME-typed, Base64-encoded media payload.
///
/// The canonical wire form is `data:<mime>;base64,<payload>`, the only shape
/// guaranteed stable across the media pipeline. Payloads live only for the
/// duration of one identification request and are never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedMedia {
    /// MIME type of the underlying asset (e.g. "image/jpeg").
    pub mime_type: String,
    /// Base64-encoded binary data (standard alphabet, padded).
    pub data: String,
}

impl EncodedMedia {
    /// Build a payload from already-encoded parts, validating the invariants:
    /// non-empty recognized MIME type and valid non-empty Base64 data.
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        let data = data.into();

        if mime_type.is_empty() {
            return Err(Error::Encoding("MIME type is empty".into()));
        }
        if MediaKind::from_mime(&mime_type).is_none() {
            return Err(Error::Encoding(format!(
                "Unsupported MIME type: {}",
                mime_type
            )));
        }
        if data.is_empty() {
            return Err(Error::Encoding("Media payload is empty".into()));
        }
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&data)
            .map_err(|e| Error::Encoding(format!("Invalid base64 payload: {}", e)))?;

        Ok(Self { mime_type, data })
    }

    /// Asset kind implied by the MIME type.
    ///
    /// Always `Some` for payloads constructed through [`EncodedMedia::new`]
    /// or [`EncodedMedia::from_data_uri`].
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_mime(&self.mime_type)
    }

    /// Serialize as a `data:<mime>;base64,<payload>` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parse a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::Encoding("Not a data URI".into()))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| Error::Encoding("Data URI is not base64-encoded".into()))?;
        Self::new(mime_type, payload)
    }

    /// Decode the Base64 payload back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Encoding(format!("Invalid base64 payload: {}", e)))
    }
}

// =============================================================================
// IDENTIFICATION METHOD
// =============================================================================

/// How an identification was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifyMethod {
    Photo,
    Video,
    Song,
    Description,
}

impl IdentifyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifyMethod::Photo => "photo",
            IdentifyMethod::Video => "video",
            IdentifyMethod::Song => "song",
            IdentifyMethod::Description => "description",
        }
    }

    /// Asset kind this method expects, or `None` for text input.
    pub fn expected_kind(&self) -> Option<MediaKind> {
        match self {
            IdentifyMethod::Photo => Some(MediaKind::Image),
            IdentifyMethod::Video => Some(MediaKind::Video),
            IdentifyMethod::Song => Some(MediaKind::Audio),
            IdentifyMethod::Description => None,
        }
    }

    /// Parse from the lowercase wire form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "photo" => Some(IdentifyMethod::Photo),
            "video" => Some(IdentifyMethod::Video),
            "song" => Some(IdentifyMethod::Song),
            "description" => Some(IdentifyMethod::Description),
            _ => None,
        }
    }
}

impl std::fmt::Display for IdentifyMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// SPECIES CATALOG
// =============================================================================

/// Relative size class of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeciesSize {
    Small,
    Medium,
    Large,
}

/// Primary habitat of a species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Habitat {
    Forest,
    Wetland,
    Grassland,
    Urban,
}

/// One entry in the known-species reference catalog.
///
/// `name` is the join key used to match classification suggestions back to
/// canonical entries. Uniqueness is assumed but not enforced; ambiguous
/// matches resolve to the first hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesCatalogEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
    pub size: SpeciesSize,
    pub habitat: Habitat,
    pub colors: Vec<String>,
}

/// Request for appending a new species to the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSpeciesEntry {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_hint: Option<String>,
    pub size: SpeciesSize,
    pub habitat: Habitat,
    #[serde(default)]
    pub colors: Vec<String>,
}

// =============================================================================
// CLASSIFICATION RESULTS
// =============================================================================

/// Single-subject classification result (photo, video, song).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleIdentification {
    /// Identified species name.
    pub species: String,
    /// Confidence in [0, 1]. Advisory only; never used for filtering.
    pub confidence: f64,
    /// Brief description of the identified species.
    pub description: String,
    /// Alternative species suggestions, most likely first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_species: Vec<String>,
}

/// One suggestion in a multi-subject (description) result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesSuggestion {
    pub name: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_hint: Option<String>,
}

/// Multi-subject classification result (free-text description).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSuggestions {
    /// 0 to 3 suggestions. Empty when nothing matched the description.
    pub birds: Vec<SpeciesSuggestion>,
}

/// Parsed, schema-validated output of the classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResult {
    Single(SingleIdentification),
    Suggestions(SpeciesSuggestions),
}

impl ClassificationResult {
    /// Species name of the primary subject, if any.
    pub fn primary_species(&self) -> Option<&str> {
        match self {
            ClassificationResult::Single(s) => Some(&s.species),
            ClassificationResult::Suggestions(s) => s.birds.first().map(|b| b.name.as_str()),
        }
    }

    /// Confidence of the primary subject, if any.
    pub fn primary_confidence(&self) -> Option<f64> {
        match self {
            ClassificationResult::Single(s) => Some(s.confidence),
            ClassificationResult::Suggestions(s) => s.birds.first().map(|b| b.confidence),
        }
    }

    /// Description of the primary subject, if any.
    pub fn primary_description(&self) -> Option<&str> {
        match self {
            ClassificationResult::Single(s) => Some(&s.description),
            ClassificationResult::Suggestions(s) => s.birds.first().map(|b| b.description.as_str()),
        }
    }
}

// =============================================================================
// CLASSIFICATION REQUESTS
// =============================================================================

/// Input to the classification client, keyed by identification method.
///
/// Media requests carry exactly one [`EncodedMedia`]. Description requests
/// carry the free text plus the full species catalog, fetched fresh per
/// request by the orchestrator.
#[derive(Debug, Clone)]
pub enum ClassifyRequest {
    Photo {
        media: EncodedMedia,
    },
    Video {
        media: EncodedMedia,
    },
    Song {
        media: EncodedMedia,
    },
    Description {
        text: String,
        catalog: Vec<SpeciesCatalogEntry>,
    },
}

impl ClassifyRequest {
    pub fn method(&self) -> IdentifyMethod {
        match self {
            ClassifyRequest::Photo { .. } => IdentifyMethod::Photo,
            ClassifyRequest::Video { .. } => IdentifyMethod::Video,
            ClassifyRequest::Song { .. } => IdentifyMethod::Song,
            ClassifyRequest::Description { .. } => IdentifyMethod::Description,
        }
    }

    /// Media payload for media-based requests.
    pub fn media(&self) -> Option<&EncodedMedia> {
        match self {
            ClassifyRequest::Photo { media }
            | ClassifyRequest::Video { media }
            | ClassifyRequest::Song { media } => Some(media),
            ClassifyRequest::Description { .. } => None,
        }
    }

    /// Verify the payload kind matches the method's expected asset kind.
    pub fn validate(&self) -> Result<()> {
        let expected = self.method().expected_kind();
        match (expected, self.media()) {
            (Some(kind), Some(media)) => {
                if media.kind() != Some(kind) {
                    return Err(Error::InvalidInput(format!(
                        "{} identification expects {} media, got {}",
                        self.method(),
                        kind,
                        media.mime_type
                    )));
                }
                Ok(())
            }
            (None, None) => {
                if let ClassifyRequest::Description { text, .. } = self {
                    if text.trim().is_empty() {
                        return Err(Error::InvalidInput("Description text is empty".into()));
                    }
                }
                Ok(())
            }
            _ => Err(Error::Internal("Malformed classification request".into())),
        }
    }
}

// =============================================================================
// IDENTIFICATION HISTORY
// =============================================================================

/// A new identification to record under a user's history.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIdentification {
    pub species: String,
    pub method: IdentifyMethod,
    pub confidence: Option<f64>,
    pub description: Option<String>,
    /// Content-hash reference to the submitted media, not the payload itself.
    pub media_ref: Option<String>,
}

/// A persisted, per-user log entry of one completed identification.
///
/// Immutable once written; there is no update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationRecord {
    pub id: Uuid,
    pub species: String,
    pub date: DateTime<Utc>,
    pub method: IdentifyMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_ref: Option<String>,
}
