//! # avis-flows
//!
//! Identification orchestration for Avis Explorer.
//!
//! This crate wires the media encoder, classification backend, result
//! augmenter, and history recorder into complete identification flows:
//! - [`Identifier`]: classify → augment → record for each method
//! - [`IdentificationAttempt`]: per-attempt state machine
//!   (`Idle → Capturing → Encoded → Classifying → Succeeded/Failed`)
//! - [`HistoryWriter`]: detached, best-effort history recording

pub mod history_writer;
pub mod identifier;
pub mod session;

pub use history_writer::HistoryWriter;
pub use identifier::Identifier;
pub use session::{AttemptState, IdentificationAttempt};
