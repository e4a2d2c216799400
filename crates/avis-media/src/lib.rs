//! # avis-media
//!
//! Media encoding for Avis Explorer.
//!
//! This crate provides:
//! - Encoding of user-supplied bytes/files into self-describing
//!   `data:<mime>;base64,<payload>` media payloads
//! - Magic-byte MIME sniffing for untyped input
//! - Two-phase recording sessions for live camera/microphone capture
//! - Content-hash media references for history records
//!
//! Source size and type validation is deliberately out of scope here; the
//! upstream input filter and the classification service own those concerns.

pub mod encode;
pub mod recording;

pub use encode::{encode_bytes, encode_file, media_ref};
pub use recording::RecordingSession;
