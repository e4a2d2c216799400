//! Integration tests for the Ollama classification backend against a mock
//! HTTP server.

use avis_core::{
    ClassificationBackend, ClassificationResult, ClassifyRequest, EncodedMedia, Error,
};
use avis_inference::OllamaClassifier;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn photo_request() -> ClassifyRequest {
    ClassifyRequest::Photo {
        media: EncodedMedia::new("image/jpeg", "YXZpcw==").unwrap(),
    }
}

fn chat_body(content: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "message": {
            "role": "assistant",
            "content": content.to_string()
        },
        "done": true
    })
}

#[tokio::test]
async fn test_photo_classification_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "stream": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(serde_json::json!({
            "species": "Blue Jay",
            "confidence": 0.92,
            "description": "A noisy and intelligent bird."
        }))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let result = classifier.classify(&photo_request()).await.unwrap();

    match result {
        ClassificationResult::Single(single) => {
            assert_eq!(single.species, "Blue Jay");
            assert_eq!(single.confidence, 0.92);
        }
        other => panic!("Expected single result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_description_classification_returns_suggestions() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(serde_json::json!({
            "birds": [
                {"name": "Blue Jay", "confidence": 0.8, "description": "Blue."},
                {"name": "Steller's Jay", "confidence": 0.4, "description": "Darker."}
            ]
        }))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let result = classifier
        .classify(&ClassifyRequest::Description {
            text: "a blue bird with a crest".into(),
            catalog: vec![],
        })
        .await
        .unwrap();

    match result {
        ClassificationResult::Suggestions(suggestions) => {
            assert_eq!(suggestions.birds.len(), 2);
            assert_eq!(suggestions.birds[0].name, "Blue Jay");
        }
        other => panic!("Expected suggestions, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_confidence_is_classification_failure() {
    let mock_server = MockServer::start().await;

    // Parses as JSON but violates the schema: no confidence field.
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(serde_json::json!({
            "species": "Sparrow"
        }))))
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let err = classifier.classify(&photo_request()).await.unwrap_err();
    assert!(matches!(err, Error::Classification(_)));
}

#[tokio::test]
async fn test_out_of_range_confidence_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body(serde_json::json!({
            "species": "Sparrow",
            "confidence": 1.5,
            "description": "Too confident."
        }))))
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let err = classifier.classify(&photo_request()).await.unwrap_err();
    assert!(matches!(err, Error::Classification(_)));
}

#[tokio::test]
async fn test_server_error_is_classification_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let err = classifier.classify(&photo_request()).await.unwrap_err();
    match err {
        Error::Classification(msg) => assert!(msg.contains("500")),
        other => panic!("Expected classification error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_content_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": {"role": "assistant", "content": "It looks like a Blue Jay to me!"},
            "done": true
        })))
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let err = classifier.classify(&photo_request()).await.unwrap_err();
    assert!(matches!(err, Error::Classification(_)));
}

#[tokio::test]
async fn test_kind_mismatch_never_reaches_service() {
    let mock_server = MockServer::start().await;

    // No mock mounted: any request to the server would 404 and the error
    // message would differ. The request must fail validation first.
    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    let err = classifier
        .classify(&ClassifyRequest::Photo {
            media: EncodedMedia::new("audio/webm", "YXZpcw==").unwrap(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": []})))
        .mount(&mock_server)
        .await;

    let classifier = OllamaClassifier::with_config(mock_server.uri(), "test-model".to_string());
    assert!(classifier.health_check().await.unwrap());

    let unreachable = OllamaClassifier::with_config(
        "http://127.0.0.1:1".to_string(),
        "test-model".to_string(),
    );
    assert!(!unreachable.health_check().await.unwrap());
}
