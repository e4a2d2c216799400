//! avis-api - HTTP API server for Avis Explorer

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use uuid::Uuid;

use avis_core::{defaults, ClassificationBackend};
use avis_db::Database;
use avis_flows::{HistoryWriter, Identifier};
use avis_inference::OllamaClassifier;

use handlers::{
    birds::{create_bird, list_birds},
    history::list_user_history,
    identify::{identify_description, identify_photo, identify_song, identify_video},
};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging identification failures after the fact.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    db: Database,
    identifier: Arc<Identifier>,
}

/// OpenAPI documentation (utoipa metadata).
///
/// The full OpenAPI spec is maintained in `openapi.yaml` and served at
/// `/openapi.yaml`; the per-handler `#[utoipa::path]` annotations document
/// the routes at the source.
#[allow(dead_code)]
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Avis Explorer API",
        version = "0.3.0",
        description = "AI-assisted bird identification from photos, videos, songs, and descriptions"
    ),
    tags(
        (name = "Birds", description = "Species catalog"),
        (name = "Identify", description = "Bird identification"),
        (name = "History", description = "Per-user identification history"),
        (name = "System", description = "Health checks")
    )
)]
struct ApiDoc;

/// Serve OpenAPI YAML spec
async fn openapi_yaml() -> impl IntoResponse {
    const SPEC: &str = include_str!("openapi.yaml");
    ([(header::CONTENT_TYPE, "application/yaml")], SPEC)
}

// =============================================================================
// CORS CONFIGURATION HELPER
// =============================================================================

/// Parse allowed origins from the comma-separated `ALLOWED_ORIGINS`
/// environment variable. Defaults to the local development frontend.
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    if origins_str.trim().is_empty() {
        return vec![HeaderValue::from_static("http://localhost:3000")];
    }

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "avis_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "avis_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("avis-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url = std::env::var(defaults::ENV_DATABASE_URL)
        .unwrap_or_else(|_| "postgres://localhost/avis".to_string());
    let bind = std::env::var(defaults::ENV_API_BIND)
        .unwrap_or_else(|_| defaults::API_BIND.to_string());

    // Connect to database (bootstraps the schema on first run)
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Classification backend
    let backend = Arc::new(OllamaClassifier::from_env());
    match backend.health_check().await {
        Ok(true) => info!(model = backend.model_name(), "Classification backend ready"),
        Ok(false) | Err(_) => warn!(
            model = backend.model_name(),
            "Classification backend unreachable; identification requests will fail until it recovers"
        ),
    }

    let history = HistoryWriter::spawn(Arc::new(db.history.clone()));
    let identifier = Arc::new(Identifier::new(
        backend,
        Arc::new(db.catalog.clone()),
        history,
    ));

    let state = AppState { db, identifier };

    let app = Router::new()
        // Species catalog
        .route("/api/v1/birds", get(list_birds).post(create_bird))
        // Identification
        .route("/api/v1/identify/photo", post(identify_photo))
        .route("/api/v1/identify/video", post(identify_video))
        .route("/api/v1/identify/song", post(identify_song))
        .route("/api/v1/identify/description", post(identify_description))
        // History
        .route("/api/v1/users/:user_id/history", get(list_user_history))
        // System
        .route("/health", get(health_check))
        .route("/openapi.yaml", get(openapi_yaml))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::HeaderName::from_static("x-user-id"),
                ])
                .max_age(std::time::Duration::from_secs(3600))
        })
        // Encoded video payloads dominate request sizes
        .layer(RequestBodyLimitLayer::new(defaults::BODY_LIMIT_BYTES))
        .with_state(state);

    // Start server
    let addr: SocketAddr = bind.parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backend_reachable = state
        .identifier
        .backend()
        .health_check()
        .await
        .unwrap_or(false);

    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "classification_backend": if backend_reachable { "reachable" } else { "unreachable" },
    }))
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// API-level error mapping the identification error taxonomy to HTTP status
/// codes. Schema violations from the classification service surface as 502:
/// the request was fine, the upstream answer was not.
#[derive(Debug)]
enum ApiError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    BadGateway(String),
    ServiceUnavailable(String),
    Internal(String),
}

impl From<avis_core::Error> for ApiError {
    fn from(err: avis_core::Error) -> Self {
        match err {
            avis_core::Error::Encoding(msg) | avis_core::Error::InvalidInput(msg) => {
                ApiError::BadRequest(msg)
            }
            avis_core::Error::PermissionDenied(msg) => ApiError::Forbidden(msg),
            avis_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            avis_core::Error::Classification(msg) => {
                ApiError::BadGateway(format!("Classification failed: {}", msg))
            }
            avis_core::Error::Upstream(msg) => ApiError::ServiceUnavailable(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (
                avis_core::Error::Encoding("bad payload".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                avis_core::Error::InvalidInput("empty description".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                avis_core::Error::PermissionDenied("microphone".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                avis_core::Error::Classification("confidence out of range".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                avis_core::Error::Upstream("catalog fetch failed".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                avis_core::Error::Internal("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_parse_allowed_origins_default() {
        // ALLOWED_ORIGINS unset in the test environment
        let origins = parse_allowed_origins();
        assert!(!origins.is_empty());
    }

    #[test]
    fn test_request_id_is_uuid() {
        let mut maker = MakeRequestUuidV7;
        let request = axum::http::Request::new(());
        let id = maker.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&value).is_ok());
    }
}
