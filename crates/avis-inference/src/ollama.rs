//! Ollama classification backend implementation.
//!
//! Uses the `/api/chat` endpoint with the `format` field set to a JSON
//! schema for the expected result shape, so the model is constrained to
//! produce parseable output. Media payloads travel base64-encoded on the
//! user message for the multimodal model to consume.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use avis_core::{
    defaults, ClassificationBackend, ClassificationResult, ClassifyRequest, Error, IdentifyMethod,
    Result,
};

use crate::prompt;
use crate::schema;

/// Ollama classification backend.
pub struct OllamaClassifier {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClassifier {
    /// Create a new classifier with default settings.
    pub fn new() -> Self {
        Self::with_config(
            defaults::OLLAMA_URL.to_string(),
            defaults::CLASSIFY_MODEL.to_string(),
        )
    }

    /// Create a new classifier with custom configuration.
    pub fn with_config(base_url: String, model: String) -> Self {
        let timeout_secs = std::env::var(defaults::ENV_CLASSIFY_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::CLASSIFY_TIMEOUT_SECS);

        info!(
            base_url = %base_url,
            model = %model,
            "Initializing Ollama classifier"
        );

        Self {
            client: Client::new(),
            base_url,
            model,
            timeout_secs,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        let base_url = std::env::var(defaults::ENV_OLLAMA_BASE)
            .unwrap_or_else(|_| defaults::OLLAMA_URL.to_string());
        let model = std::env::var(defaults::ENV_CLASSIFY_MODEL)
            .unwrap_or_else(|_| defaults::CLASSIFY_MODEL.to_string());
        Self::with_config(base_url, model)
    }

    /// Build the user prompt and attached media for a request.
    fn build_message(request: &ClassifyRequest) -> (String, Option<Vec<String>>) {
        match request {
            ClassifyRequest::Photo { media } => {
                (prompt::photo_prompt(), Some(vec![media.data.clone()]))
            }
            ClassifyRequest::Video { media } => {
                (prompt::video_prompt(), Some(vec![media.data.clone()]))
            }
            ClassifyRequest::Song { media } => {
                (prompt::song_prompt(), Some(vec![media.data.clone()]))
            }
            ClassifyRequest::Description { text, catalog } => {
                (prompt::description_prompt(text, catalog), None)
            }
        }
    }

    /// Send one chat request and return the raw response content.
    async fn chat(
        &self,
        user_prompt: String,
        images: Option<Vec<String>>,
        format: serde_json::Value,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt::SYSTEM_PROMPT.to_string(),
                    images: None,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt,
                    images,
                },
            ],
            stream: false,
            format: Some(format),
            think: Some(false),
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .timeout(Duration::from_secs(self.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Classification(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Classification(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Classification(format!("Failed to parse response: {}", e)))?;

        Ok(result.message.content)
    }
}

impl Default for OllamaClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Chat API message for `/api/chat`.
#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
    /// Base64-encoded media attached to this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

/// Request payload for the Ollama `/api/chat` endpoint.
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    /// JSON schema enforcement for structured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
    /// Suppress chain-of-thought for thinking models; schema-constrained
    /// output must not carry reasoning text.
    #[serde(skip_serializing_if = "Option::is_none")]
    think: Option<bool>,
}

/// Response from the Ollama `/api/chat` endpoint.
#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[async_trait]
impl ClassificationBackend for OllamaClassifier {
    #[instrument(skip(self, request), fields(subsystem = "inference", component = "ollama", op = "classify", model = %self.model, method = %request.method()))]
    async fn classify(&self, request: &ClassifyRequest) -> Result<ClassificationResult> {
        request.validate()?;

        let start = Instant::now();
        let method = request.method();
        let (user_prompt, images) = Self::build_message(request);

        let format = match method {
            IdentifyMethod::Description => prompt::suggestions_schema(),
            _ => prompt::single_result_schema(),
        };

        debug!(prompt_len = user_prompt.len(), "Starting classification");
        let content = self.chat(user_prompt, images, format).await?;

        let result = match method {
            IdentifyMethod::Description => {
                ClassificationResult::Suggestions(schema::parse_suggestions(&content)?)
            }
            _ => ClassificationResult::Single(schema::parse_single(&content)?),
        };

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            duration_ms = elapsed,
            species = result.primary_species().unwrap_or("<none>"),
            "Classification complete"
        );
        if elapsed > 30_000 {
            warn!(duration_ms = elapsed, slow = true, "Slow classification");
        }

        Ok(result)
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(defaults::HEALTH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
