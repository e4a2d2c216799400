//! Mock classification backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use avis_inference::mock::MockClassifier;
//!
//! let backend = MockClassifier::new()
//!     .with_single("Blue Jay", 0.92, "Bright blue plumage.");
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use avis_core::{
    ClassificationBackend, ClassificationResult, ClassifyRequest, Error, IdentifyMethod, Result,
    SingleIdentification, SpeciesSuggestion, SpeciesSuggestions,
};

/// Failure mode injected by a mock classifier.
#[derive(Debug, Clone)]
enum MockFailure {
    None,
    Classification(String),
}

/// Mock classification backend with a fixed response and a call log.
#[derive(Clone)]
pub struct MockClassifier {
    single: Arc<SingleIdentification>,
    suggestions: Arc<SpeciesSuggestions>,
    failure: MockFailure,
    call_log: Arc<Mutex<Vec<IdentifyMethod>>>,
}

impl MockClassifier {
    /// Create a mock that identifies everything as a Blue Jay.
    pub fn new() -> Self {
        Self {
            single: Arc::new(SingleIdentification {
                species: "Blue Jay".to_string(),
                confidence: 0.9,
                description: "A noisy and intelligent bird.".to_string(),
                alternative_species: vec![],
            }),
            suggestions: Arc::new(SpeciesSuggestions {
                birds: vec![SpeciesSuggestion {
                    name: "Blue Jay".to_string(),
                    confidence: 0.9,
                    description: "A noisy and intelligent bird.".to_string(),
                    image_url: None,
                    image_hint: None,
                }],
            }),
            failure: MockFailure::None,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the single-subject result returned for media requests.
    pub fn with_single(
        mut self,
        species: impl Into<String>,
        confidence: f64,
        description: impl Into<String>,
    ) -> Self {
        self.single = Arc::new(SingleIdentification {
            species: species.into(),
            confidence,
            description: description.into(),
            alternative_species: vec![],
        });
        self
    }

    /// Set the suggestions returned for description requests.
    pub fn with_suggestions(mut self, suggestions: SpeciesSuggestions) -> Self {
        self.suggestions = Arc::new(suggestions);
        self
    }

    /// Make every classify call fail with `Error::Classification`.
    pub fn with_classification_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = MockFailure::Classification(message.into());
        self
    }

    /// Methods seen by this mock, in call order.
    pub fn calls(&self) -> Vec<IdentifyMethod> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of classify calls received.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClassificationBackend for MockClassifier {
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassificationResult> {
        request.validate()?;
        self.call_log.lock().unwrap().push(request.method());

        if let MockFailure::Classification(msg) = &self.failure {
            return Err(Error::Classification(msg.clone()));
        }

        Ok(match request.method() {
            IdentifyMethod::Description => {
                ClassificationResult::Suggestions((*self.suggestions).clone())
            }
            _ => ClassificationResult::Single((*self.single).clone()),
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use avis_core::EncodedMedia;

    fn photo_request() -> ClassifyRequest {
        ClassifyRequest::Photo {
            media: EncodedMedia::new("image/png", "YXZpcw==").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_mock_returns_fixed_single() {
        let mock = MockClassifier::new().with_single("Mallard", 0.7, "A duck.");
        let result = mock.classify(&photo_request()).await.unwrap();
        assert_eq!(result.primary_species(), Some("Mallard"));
        assert_eq!(result.primary_confidence(), Some(0.7));
    }

    #[tokio::test]
    async fn test_mock_returns_suggestions_for_description() {
        let mock = MockClassifier::new();
        let result = mock
            .classify(&ClassifyRequest::Description {
                text: "blue bird".into(),
                catalog: vec![],
            })
            .await
            .unwrap();
        assert!(matches!(result, ClassificationResult::Suggestions(_)));
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let mock = MockClassifier::new().with_classification_failure("service down");
        let err = mock.classify(&photo_request()).await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[tokio::test]
    async fn test_mock_call_log() {
        let mock = MockClassifier::new();
        mock.classify(&photo_request()).await.unwrap();
        mock.classify(&ClassifyRequest::Description {
            text: "blue bird".into(),
            catalog: vec![],
        })
        .await
        .unwrap();

        assert_eq!(
            mock.calls(),
            vec![IdentifyMethod::Photo, IdentifyMethod::Description]
        );
        assert_eq!(mock.call_count(), 2);
    }
}
