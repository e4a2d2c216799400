//! # avis-core
//!
//! Core types, traits, and abstractions for Avis Explorer.
//!
//! This crate provides:
//! - The shared result contract (encoded media, catalog entries,
//!   classification results, identification records)
//! - The error taxonomy for the identification flow
//! - Traits for the external collaborators (classification backend,
//!   catalog store, history store)
//! - Structured logging field constants
//! - Centralized defaults

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    ClassificationResult, ClassifyRequest, EncodedMedia, Habitat, IdentificationRecord,
    IdentifyMethod, MediaKind, NewIdentification, NewSpeciesEntry, SingleIdentification,
    SpeciesCatalogEntry, SpeciesSize, SpeciesSuggestion, SpeciesSuggestions,
};
pub use traits::{CatalogRepository, ClassificationBackend, HistoryRepository};
