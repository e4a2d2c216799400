//! Bounded live-capture recording sessions.
//!
//! A session is a two-phase protocol: start → accumulate chunks → stop,
//! which concatenates everything captured so far into one payload. There is
//! no mid-stream cancellation guarantee beyond "stop consumes whatever was
//! captured"; cancel discards the partial capture entirely.

use tracing::debug;

use avis_core::{EncodedMedia, Error, MediaKind, Result};

use crate::encode::encode_bytes;

/// Phase of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    Active,
    Finished,
}

/// An in-progress camera/microphone capture.
///
/// Holds the accumulated binary chunks for one capture. Only one session
/// should be active per orchestrator instance; the attempt state machine
/// guards that invariant.
#[derive(Debug)]
pub struct RecordingSession {
    mime_type: String,
    chunks: Vec<Vec<u8>>,
    phase: SessionPhase,
}

impl RecordingSession {
    /// Start a capture session producing the given MIME type.
    ///
    /// The MIME type must describe an audio or video asset; still images go
    /// through file encoding instead.
    pub fn start(mime_type: impl Into<String>) -> Result<Self> {
        let mime_type = mime_type.into();
        match MediaKind::from_mime(&mime_type) {
            Some(MediaKind::Audio) | Some(MediaKind::Video) => {}
            _ => {
                return Err(Error::Encoding(format!(
                    "Cannot record media of type: {}",
                    mime_type
                )))
            }
        }

        debug!(mime_type = %mime_type, "Recording session started");
        Ok(Self {
            mime_type,
            chunks: Vec::new(),
            phase: SessionPhase::Active,
        })
    }

    /// Append one captured chunk. Empty chunks are ignored.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> Result<()> {
        if self.phase != SessionPhase::Active {
            return Err(Error::Encoding("Recording session already finished".into()));
        }
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Total bytes captured so far.
    pub fn captured_bytes(&self) -> usize {
        self.chunks.iter().map(|c| c.len()).sum()
    }

    /// Stop the capture and encode everything captured so far.
    ///
    /// Stopping with zero bytes captured is an `Encoding` error, never a
    /// silent empty submission.
    pub fn stop(mut self) -> Result<EncodedMedia> {
        self.phase = SessionPhase::Finished;

        let total = self.captured_bytes();
        if total == 0 {
            return Err(Error::Encoding("Recording captured no data".into()));
        }

        let mut bytes = Vec::with_capacity(total);
        for chunk in &self.chunks {
            bytes.extend_from_slice(chunk);
        }

        debug!(
            mime_type = %self.mime_type,
            media_bytes = total,
            "Recording session stopped"
        );
        encode_bytes(&bytes, Some(&self.mime_type))
    }

    /// Abandon the capture, discarding any partial data.
    pub fn cancel(mut self) {
        let discarded = self.captured_bytes();
        self.phase = SessionPhase::Finished;
        self.chunks.clear();
        debug!(media_bytes = discarded, "Recording session cancelled");
    }
}
