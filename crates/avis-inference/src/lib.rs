//! # avis-inference
//!
//! Generative classification backend abstraction for Avis Explorer.
//!
//! This crate provides:
//! - Prompt construction per identification method
//! - Ollama `/api/chat` backend with JSON-schema-constrained output
//! - Strict response validation (schema violations never pass through)
//! - Result augmentation against the species catalog
//! - Mock backend for tests (feature `mock`)

pub mod augment;
pub mod ollama;
pub mod prompt;
pub mod schema;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use augment::{augment, augment_suggestions};
pub use ollama::OllamaClassifier;
pub use schema::{parse_single, parse_suggestions};
