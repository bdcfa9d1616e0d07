//! Error types for the imgs2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ExportError`]: **fatal**, the export cannot produce a document
//!   (an image in the list no longer decodes, the PDF could not be written,
//!   the configuration is invalid). No partial PDF is ever returned alongside
//!   it.
//!
//! * [`IngestError`]: **non-fatal**, a single file in an ingest batch was
//!   rejected (wrong media type, unreadable, undecodable). The rest of the
//!   batch is still appended; rejected files are listed in
//!   [`crate::pipeline::ingest::IngestReport`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the export entry points.
#[derive(Debug, Error)]
pub enum ExportError {
    // ── Precondition errors ───────────────────────────────────────────────
    /// Export was requested on an empty content list.
    #[error("Nothing to export: the content list is empty")]
    EmptyList,

    // ── Image errors ──────────────────────────────────────────────────────
    /// A page's image payload could not be decoded.
    #[error("Page {page} ('{name}'): image could not be decoded: {detail}")]
    DecodeFailed {
        page: usize,
        name: String,
        detail: String,
    },

    /// A decoded image could not be re-encoded as JPEG for embedding.
    #[error("Page {page}: JPEG encoding failed: {detail}")]
    EncodeFailed { page: usize, detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// lopdf rejected the document while assembling or serialising it.
    #[error("Failed to build PDF document: {0}")]
    PdfWriteFailed(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output PDF file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a blocking task panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<lopdf::Error> for ExportError {
    fn from(e: lopdf::Error) -> Self {
        ExportError::PdfWriteFailed(e.to_string())
    }
}

/// A non-fatal error for a single file in an ingest batch.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum IngestError {
    /// The declared media type is missing or not `image/*`; never read.
    #[error("'{name}': not an image (media type: {})", .media_type.as_deref().unwrap_or("unknown"))]
    NotAnImage {
        name: String,
        media_type: Option<String>,
    },

    /// The file bytes could not be read from disk.
    #[error("'{name}': read failed: {detail}")]
    ReadFailed { name: String, detail: String },

    /// The bytes were read but are not a decodable image.
    #[error("'{name}': decode failed: {detail}")]
    DecodeFailed { name: String, detail: String },
}

impl IngestError {
    /// Display name of the file this error refers to.
    pub fn name(&self) -> &str {
        match self {
            IngestError::NotAnImage { name, .. }
            | IngestError::ReadFailed { name, .. }
            | IngestError::DecodeFailed { name, .. } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_failed_display() {
        let e = ExportError::DecodeFailed {
            page: 2,
            name: "b.png".into(),
            detail: "truncated".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Page 2"), "got: {msg}");
        assert!(msg.contains("b.png"), "got: {msg}");
    }

    #[test]
    fn not_an_image_display_without_media_type() {
        let e = IngestError::NotAnImage {
            name: "notes.txt".into(),
            media_type: None,
        };
        assert!(e.to_string().contains("unknown"));
        assert_eq!(e.name(), "notes.txt");
    }

    #[test]
    fn not_an_image_display_with_media_type() {
        let e = IngestError::NotAnImage {
            name: "doc.pdf".into(),
            media_type: Some("application/pdf".into()),
        };
        assert!(e.to_string().contains("application/pdf"));
    }

    #[test]
    fn ingest_error_roundtrips_through_json() {
        let e = IngestError::ReadFailed {
            name: "x.png".into(),
            detail: "permission denied".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        let back: IngestError = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, e);
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = ExportError::OutputWriteFailed {
            path: PathBuf::from("/nope/out.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/nope/out.pdf"));
    }
}
