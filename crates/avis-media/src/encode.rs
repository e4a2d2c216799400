//! Byte and file encoding into self-describing media payloads.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use avis_core::{EncodedMedia, Error, Result};

/// Encode raw bytes into an [`EncodedMedia`] payload.
///
/// When `mime_type` is `None`, the type is sniffed from magic bytes.
/// Empty or unrecognizable input fails with `Error::Encoding`; no partial
/// payload is produced.
pub fn encode_bytes(bytes: &[u8], mime_type: Option<&str>) -> Result<EncodedMedia> {
    if bytes.is_empty() {
        return Err(Error::Encoding("No bytes to encode".into()));
    }

    let mime = match mime_type {
        Some(m) => m.to_string(),
        None => sniff_mime(bytes)?,
    };

    use base64::Engine;
    let data = base64::engine::general_purpose::STANDARD.encode(bytes);

    debug!(
        mime_type = %mime,
        media_bytes = bytes.len(),
        "Encoded media payload"
    );

    EncodedMedia::new(mime, data)
}

/// Read and encode a file from disk.
///
/// The MIME type is sniffed from content, not the file extension; the HTML
/// input `accept` filter upstream is advisory only.
pub async fn encode_file(path: impl AsRef<Path>) -> Result<EncodedMedia> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::Encoding(format!("Failed to read {}: {}", path.display(), e)))?;
    encode_bytes(&bytes, None)
}

/// Detect a media MIME type from magic bytes.
fn sniff_mime(bytes: &[u8]) -> Result<String> {
    let kind = infer::get(bytes)
        .ok_or_else(|| Error::Encoding("Could not detect media type from content".into()))?;
    Ok(kind.mime_type().to_string())
}

/// Compute a stable content-hash reference for a payload.
///
/// History records store this reference instead of the payload itself;
/// encoded media is transient and never persisted.
pub fn media_ref(media: &EncodedMedia) -> Result<String> {
    let bytes = media.decode()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use avis_core::MediaKind;

    // Minimal valid PNG header, enough for magic-byte detection.
    const PNG_BYTES: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    ];

    #[test]
    fn test_encode_bytes_with_explicit_mime() {
        let media = encode_bytes(b"fake-jpeg-bytes", Some("image/jpeg")).unwrap();
        assert_eq!(media.mime_type, "image/jpeg");
        assert_eq!(media.decode().unwrap(), b"fake-jpeg-bytes");
    }

    #[test]
    fn test_encode_bytes_sniffs_png() {
        let media = encode_bytes(PNG_BYTES, None).unwrap();
        assert_eq!(media.mime_type, "image/png");
        assert_eq!(media.kind(), Some(MediaKind::Image));
    }

    #[test]
    fn test_encode_bytes_empty_input_fails() {
        let err = encode_bytes(&[], Some("image/png")).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_encode_bytes_unknown_content_fails() {
        let err = encode_bytes(b"plain text, no magic bytes", None).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[test]
    fn test_data_uri_shape() {
        let media = encode_bytes(b"chirp", Some("audio/webm")).unwrap();
        let uri = media.to_data_uri();
        assert!(uri.starts_with("data:audio/webm;base64,"));
        let re_parsed = EncodedMedia::from_data_uri(&uri).unwrap();
        assert_eq!(re_parsed, media);
    }

    #[test]
    fn test_media_ref_is_content_hash() {
        let a = encode_bytes(b"same bytes", Some("image/png")).unwrap();
        let b = encode_bytes(b"same bytes", Some("image/jpeg")).unwrap();
        let c = encode_bytes(b"other bytes", Some("image/png")).unwrap();

        let ref_a = media_ref(&a).unwrap();
        assert!(ref_a.starts_with("sha256:"));
        assert_eq!(ref_a, media_ref(&b).unwrap());
        assert_ne!(ref_a, media_ref(&c).unwrap());
    }

    #[tokio::test]
    async fn test_encode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bird.png");
        tokio::fs::write(&path, PNG_BYTES).await.unwrap();

        let media = encode_file(&path).await.unwrap();
        assert_eq!(media.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_encode_file_missing_fails() {
        let err = encode_file("/nonexistent/bird.png").await.unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
