//! Core traits for Avis Explorer abstractions.
//!
//! These traits define the seams between the identification flow and its
//! external collaborators (classification service, catalog store, history
//! store), enabling pluggable backends and testability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ClassificationResult, ClassifyRequest, IdentificationRecord, NewIdentification,
    NewSpeciesEntry, SpeciesCatalogEntry,
};

/// Backend for classifying media or text into species guesses.
///
/// Implementations validate the raw service response against the expected
/// result schema and never pass through non-conforming data.
#[async_trait]
pub trait ClassificationBackend: Send + Sync {
    /// Classify one request. Returns a schema-validated result or
    /// `Error::Classification`.
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassificationResult>;

    /// Check if the classification backend is reachable.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Read/append access to the known-species reference catalog.
///
/// The catalog is shared read-only across concurrent identification
/// requests; `append` exists for the registration path only.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch the full catalog. Order is not significant.
    async fn list(&self) -> Result<Vec<SpeciesCatalogEntry>>;

    /// Append one entry, assigning it a timestamp-derived identifier.
    /// Rejects entries with an empty name or description.
    async fn append(&self, entry: NewSpeciesEntry) -> Result<SpeciesCatalogEntry>;
}

/// Append-only identification history, namespaced per user.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one record under the user's namespace. No deduplication.
    async fn append(&self, user_id: Uuid, identification: NewIdentification) -> Result<Uuid>;

    /// List a user's records, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<IdentificationRecord>>;
}
