//! Error types for Avis Explorer.

use thiserror::Error;

/// Result type alias using the Avis Explorer error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for identification operations.
///
/// The four identification-specific variants (`Encoding`, `PermissionDenied`,
/// `Upstream`, `Classification`) are the only errors an identification attempt
/// surfaces to a user. Everything else is ambient infrastructure failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Local media read/record failure. Recoverable by retrying the
    /// capture or selection; no partial payload is ever produced.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Camera/microphone access refused by the user or environment.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A dependency of the classification flow (the species catalog) was
    /// unreachable. The classification service is never called in this case.
    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    /// Classification service unreachable, timed out, or returned output
    /// that violates the expected schema. Invalid data is never passed
    /// through as a partial result.
    #[error("Classification failed: {0}")]
    Classification(String),

    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_encoding() {
        let err = Error::Encoding("unreadable stream".to_string());
        assert_eq!(err.to_string(), "Encoding error: unreadable stream");
    }

    #[test]
    fn test_error_display_permission_denied() {
        let err = Error::PermissionDenied("microphone access refused".to_string());
        assert_eq!(
            err.to_string(),
            "Permission denied: microphone access refused"
        );
    }

    #[test]
    fn test_error_display_upstream() {
        let err = Error::Upstream("catalog fetch failed".to_string());
        assert_eq!(err.to_string(), "Upstream unavailable: catalog fetch failed");
    }

    #[test]
    fn test_error_display_classification() {
        let err = Error::Classification("confidence out of range".to_string());
        assert_eq!(
            err.to_string(),
            "Classification failed: confidence out of range"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::InvalidInput("empty description".to_string());
        assert_eq!(err.to_string(), "Invalid input: empty description");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number");
        assert!(json_err.is_err());

        let err: Error = json_err.unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        match err {
            Error::Io(_) => {}
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
