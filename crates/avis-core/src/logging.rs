//! Structured logging field name constants for Avis Explorer.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue (swallowed history write, slow call) |
//! | INFO  | Lifecycle events, completed identifications |
//! | DEBUG | Decision points, intermediate values, config choices |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across request → classification → history write.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "media", "inference", "db", "flows"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "ollama", "recording_session", "history_writer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "classify", "augment", "record", "encode"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// User UUID an identification is recorded under.
pub const USER_ID: &str = "user_id";

/// Identification method ("photo", "video", "song", "description").
pub const METHOD: &str = "method";

/// Identified species name.
pub const SPECIES: &str = "species";

/// Classification confidence in [0, 1].
pub const CONFIDENCE: &str = "confidence";

/// MIME type of a submitted media payload.
pub const MIME_TYPE: &str = "mime_type";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Decoded media payload size in bytes.
pub const MEDIA_BYTES: &str = "media_bytes";

/// Number of catalog entries supplied to a description request.
pub const CATALOG_COUNT: &str = "catalog_count";

/// Number of suggestions returned by a description classification.
pub const SUGGESTION_COUNT: &str = "suggestion_count";

/// Byte length of a prompt or response.
pub const PROMPT_LEN: &str = "prompt_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for classification.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
