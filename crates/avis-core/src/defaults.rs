//! Centralized default constants for Avis Explorer.
//!
//! **This module is the single source of truth** for shared defaults. Crates
//! reference these constants instead of defining their own magic values.

// =============================================================================
// CLASSIFICATION BACKEND
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default multimodal classification model.
pub const CLASSIFY_MODEL: &str = "qwen3-vl:8b";

/// Timeout for classification requests (seconds). Media payloads take
/// noticeably longer than text, hence the generous ceiling.
pub const CLASSIFY_TIMEOUT_SECS: u64 = 120;

/// Timeout for backend health checks (seconds).
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Environment variable selecting the Ollama base URL.
pub const ENV_OLLAMA_BASE: &str = "OLLAMA_BASE";

/// Environment variable selecting the classification model.
pub const ENV_CLASSIFY_MODEL: &str = "AVIS_CLASSIFY_MODEL";

/// Environment variable overriding the classification timeout.
pub const ENV_CLASSIFY_TIMEOUT_SECS: &str = "AVIS_CLASSIFY_TIMEOUT_SECS";

// =============================================================================
// CLASSIFICATION RESULTS
// =============================================================================

/// Maximum number of suggestions in a description result.
pub const MAX_SUGGESTIONS: usize = 3;

// =============================================================================
// API SERVER
// =============================================================================

/// Default API bind address.
pub const API_BIND: &str = "0.0.0.0:9002";

/// Environment variable overriding the bind address.
pub const ENV_API_BIND: &str = "AVIS_BIND";

/// Environment variable supplying the database URL.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Request body size limit in bytes. Encoded video payloads dominate; base64
/// inflates the raw asset by ~33%.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;
