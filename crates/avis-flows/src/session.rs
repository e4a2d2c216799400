//! Per-attempt identification state machine.
//!
//! States: `Idle → Capturing (optional) → Encoded → Classifying →
//! {Succeeded, Failed}`. Submission is explicit for every method; stopping
//! a live capture encodes the payload but never auto-submits. Terminal
//! states re-enter `Idle` through a new capture or selection, discarding
//! the previous input.

use tracing::debug;
use uuid::Uuid;

use avis_core::{
    ClassificationResult, EncodedMedia, Error, IdentifyMethod, MediaKind, Result,
};
use avis_media::RecordingSession;

use crate::identifier::Identifier;

/// Observable state of an identification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Capturing,
    Encoded,
    Classifying,
    Succeeded,
    Failed,
}

/// Input gathered for one attempt.
#[derive(Debug, Clone)]
enum AttemptInput {
    Media(EncodedMedia),
    Text(String),
}

/// One identification attempt for a fixed method.
///
/// A new attempt always discards any previous input and result; results
/// never stack. Only one capture session is held at a time, and stopping
/// or cancelling always releases it.
pub struct IdentificationAttempt {
    method: IdentifyMethod,
    state: AttemptState,
    capture: Option<RecordingSession>,
    input: Option<AttemptInput>,
}

impl IdentificationAttempt {
    pub fn new(method: IdentifyMethod) -> Self {
        Self {
            method,
            state: AttemptState::Idle,
            capture: None,
            input: None,
        }
    }

    pub fn method(&self) -> IdentifyMethod {
        self.method
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    fn ensure_not_busy(&self) -> Result<()> {
        match self.state {
            AttemptState::Capturing => Err(Error::InvalidInput(
                "A capture session is already active".into(),
            )),
            AttemptState::Classifying => Err(Error::InvalidInput(
                "A classification is already in flight".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Start a live capture session (song and video methods).
    ///
    /// Discards any previous input or result. Starting while a capture is
    /// active is not a supported transition.
    pub fn start_capture(&mut self, mime_type: &str) -> Result<()> {
        self.ensure_not_busy()?;

        let expected = self.method.expected_kind().ok_or_else(|| {
            Error::InvalidInput("Description identification has no capture phase".into())
        })?;
        if MediaKind::from_mime(mime_type) != Some(expected) {
            return Err(Error::InvalidInput(format!(
                "{} identification expects {} media, got {}",
                self.method, expected, mime_type
            )));
        }

        self.input = None;
        self.capture = Some(RecordingSession::start(mime_type)?);
        self.state = AttemptState::Capturing;
        debug!(method = %self.method, mime_type = %mime_type, "Attempt capturing");
        Ok(())
    }

    /// Append one captured chunk.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) -> Result<()> {
        match self.capture.as_mut() {
            Some(session) => session.push_chunk(chunk),
            None => Err(Error::InvalidInput("No active capture session".into())),
        }
    }

    /// Abandon the capture, discarding partial data, and return to `Idle`.
    pub fn cancel_capture(&mut self) {
        if let Some(session) = self.capture.take() {
            session.cancel();
        }
        if self.state == AttemptState::Capturing {
            self.state = AttemptState::Idle;
        }
    }

    /// Stop the capture and encode whatever was captured so far.
    ///
    /// On encoding failure (including zero bytes captured) the attempt
    /// returns to `Idle`; the device session is released either way.
    pub fn stop_capture(&mut self) -> Result<()> {
        let session = self
            .capture
            .take()
            .ok_or_else(|| Error::InvalidInput("No active capture session".into()))?;

        match session.stop() {
            Ok(media) => {
                self.input = Some(AttemptInput::Media(media));
                self.state = AttemptState::Encoded;
                Ok(())
            }
            Err(e) => {
                self.state = AttemptState::Idle;
                Err(e)
            }
        }
    }

    /// Use an already-encoded payload (file selection path).
    ///
    /// Discards any previous input or result.
    pub fn select_media(&mut self, media: EncodedMedia) -> Result<()> {
        self.ensure_not_busy()?;

        let expected = self.method.expected_kind().ok_or_else(|| {
            Error::InvalidInput("Description identification takes text, not media".into())
        })?;
        if media.kind() != Some(expected) {
            return Err(Error::InvalidInput(format!(
                "{} identification expects {} media, got {}",
                self.method, expected, media.mime_type
            )));
        }

        self.input = Some(AttemptInput::Media(media));
        self.state = AttemptState::Encoded;
        Ok(())
    }

    /// Provide description text (description method only).
    pub fn set_description(&mut self, text: impl Into<String>) -> Result<()> {
        self.ensure_not_busy()?;

        if self.method != IdentifyMethod::Description {
            return Err(Error::InvalidInput(format!(
                "{} identification takes media, not text",
                self.method
            )));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("Description text is empty".into()));
        }

        self.input = Some(AttemptInput::Text(text));
        self.state = AttemptState::Encoded;
        Ok(())
    }

    /// Submit the gathered input for classification.
    ///
    /// Valid from `Encoded`, and from `Failed` to retry with the same
    /// input. The attempt ends `Succeeded` or `Failed`; errors are also
    /// returned to the caller for presentation.
    pub async fn submit(
        &mut self,
        identifier: &Identifier,
        user_id: Option<Uuid>,
    ) -> Result<ClassificationResult> {
        match self.state {
            AttemptState::Encoded | AttemptState::Failed => {}
            _ => {
                return Err(Error::InvalidInput(
                    "Nothing encoded to submit".into(),
                ))
            }
        }
        let input = self
            .input
            .clone()
            .ok_or_else(|| Error::InvalidInput("Nothing encoded to submit".into()))?;

        self.state = AttemptState::Classifying;

        let outcome = match input {
            AttemptInput::Media(media) => identifier
                .identify_media(user_id, self.method, media)
                .await
                .map(ClassificationResult::Single),
            AttemptInput::Text(text) => identifier
                .identify_description(user_id, &text)
                .await
                .map(ClassificationResult::Suggestions),
        };

        self.state = match &outcome {
            Ok(_) => AttemptState::Succeeded,
            Err(_) => AttemptState::Failed,
        };
        outcome
    }
}
