//! Text extraction: pull per-page text out of the source PDF.
//!
//! ## Why spawn_blocking?
//!
//! `pdf-extract` is a synchronous, CPU-bound parser. Running it on a Tokio
//! worker thread would stall every other task sharing that thread, so the
//! whole extraction runs inside `tokio::task::spawn_blocking`.
//!
//! ## Why catch_unwind?
//!
//! `pdf-extract` can panic on malformed documents instead of returning an
//! error. The panic is caught and mapped to
//! [`TranslateError::ExtractionFailed`] so a hostile upload cannot take the
//! worker down.

use crate::error::TranslateError;
use crate::output::SourcePage;
use tracing::{debug, info};

/// Extract per-page text from PDF bytes.
///
/// Returns one [`SourcePage`] per document page, indices 1-based and
/// contiguous, with runs of layout whitespace collapsed to single spaces.
/// Pages with no extractable text are returned with empty `text` rather
/// than skipped, so page indices always line up with the source document.
pub async fn extract_pages(bytes: Vec<u8>) -> Result<Vec<SourcePage>, TranslateError> {
    tokio::task::spawn_blocking(move || extract_pages_blocking(&bytes))
        .await
        .map_err(|e| TranslateError::Internal(format!("extraction task panicked: {e}")))?
}

fn extract_pages_blocking(bytes: &[u8]) -> Result<Vec<SourcePage>, TranslateError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(TranslateError::NotAPdf { magic });
    }

    // pdf-extract can panic on malformed input; treat that as a parse error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| TranslateError::ExtractionFailed {
            detail: "extraction engine panicked on this document".to_string(),
        })?
        .map_err(|e| TranslateError::ExtractionFailed {
            detail: e.to_string(),
        })?;

    info!("Extracted text from {} pages", pages.len());

    Ok(pages
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let normalized = normalize_whitespace(&text);
            debug!("Page {}: {} chars", i + 1, normalized.chars().count());
            SourcePage {
                index: i + 1,
                text: normalized,
            }
        })
        .collect())
}

/// Collapse every run of whitespace to a single space and trim the ends.
///
/// Extracted text carries the source document's layout whitespace (line
/// breaks mid-sentence, column padding); none of it survives translation
/// anyway, and collapsed text chunks more predictably.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
