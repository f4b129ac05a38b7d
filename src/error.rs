//! Error types for the pdftranslate library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`RemoteError`] — a single remote translation call failed. Carries the
//!   HTTP status (when one exists) so the retry combinator in
//!   [`crate::retry`] can classify the failure as transient or permanent
//!   without matching on error text.
//!
//! * [`TranslateError`] — **terminal**: the translation run cannot produce a
//!   document (bad input file, extraction failure, a page that exhausted its
//!   retry budget, PDF composition failure). Returned from the top-level
//!   `translate*` functions. No partial document is ever surfaced alongside
//!   one of these.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// HTTP status codes treated as transient and therefore retryable:
/// 429 (rate limit) plus the server-side 5xx family. Everything else —
/// including transport errors with no status at all — is permanent and
/// surfaces immediately.
const TRANSIENT_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// A failure of one remote translation call.
#[derive(Debug, Clone)]
pub struct RemoteError {
    /// HTTP status returned by the service, if the request got that far.
    pub status: Option<u16>,
    /// Human-readable description (response body excerpt or transport error).
    pub message: String,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(s) => write!(f, "HTTP {s}: {}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl RemoteError {
    /// A failure with an HTTP status attached.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// A failure below the HTTP layer (connect, timeout, malformed body).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Whether this failure is safe to retry.
    pub fn is_transient(&self) -> bool {
        matches!(self.status, Some(s) if TRANSIENT_STATUSES.contains(&s))
    }
}

/// All terminal errors returned by the pdftranslate library.
#[derive(Debug, Error)]
pub enum TranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { magic: [u8; 4] },

    /// The extraction engine could not read the document.
    #[error("Failed to extract text from PDF: {detail}")]
    ExtractionFailed { detail: String },

    /// The document contains no pages, or the page selection matched none.
    #[error("No pages to translate (document has {total} pages)")]
    EmptyDocument { total: usize },

    // ── Remote errors ─────────────────────────────────────────────────────
    /// No API key was configured and none was found in the environment.
    #[error("Translation service is not configured.\n{hint}")]
    ApiKeyMissing { hint: String },

    /// A page failed after its retry budget was exhausted (or immediately,
    /// for a permanent remote failure). The whole run aborts; no partial
    /// document is produced.
    #[error("Translation failed on page {page}: {source}")]
    TranslationFailed {
        page: usize,
        #[source]
        source: RemoteError,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The target-script font file could not be loaded or embedded.
    #[error("Failed to load font '{path}': {detail}")]
    FontLoadFailed { path: PathBuf, detail: String },

    /// The PDF authoring engine failed while building the output document.
    #[error("Failed to compose output PDF: {detail}")]
    ComposeFailed { detail: String },

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
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses_classified() {
        for status in [429, 500, 502, 503, 504] {
            assert!(
                RemoteError::http(status, "busy").is_transient(),
                "status {status} should be transient"
            );
        }
    }

    #[test]
    fn permanent_statuses_classified() {
        for status in [400, 401, 403, 404, 422] {
            assert!(
                !RemoteError::http(status, "bad request").is_transient(),
                "status {status} should be permanent"
            );
        }
    }

    #[test]
    fn transport_errors_are_permanent() {
        assert!(!RemoteError::transport("connection reset").is_transient());
    }

    #[test]
    fn remote_error_display() {
        let e = RemoteError::http(429, "quota exceeded");
        assert_eq!(e.to_string(), "HTTP 429: quota exceeded");
        let e = RemoteError::transport("timed out");
        assert_eq!(e.to_string(), "timed out");
    }

    #[test]
    fn translation_failed_display_names_page() {
        let e = TranslateError::TranslationFailed {
            page: 7,
            source: RemoteError::http(503, "overloaded"),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 7"), "got: {msg}");
        assert!(msg.contains("503"), "got: {msg}");
    }

    #[test]
    fn not_a_pdf_display_shows_magic() {
        let e = TranslateError::NotAPdf {
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("not a valid PDF"));
    }
}
