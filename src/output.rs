//! Output types: pages, stats, and the result of a translation run.

use serde::{Deserialize, Serialize};

/// One page of extracted source text.
///
/// Produced by the extraction stage; immutable once created. `index` is
/// 1-based, contiguous, and unique within the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePage {
    pub index: usize,
    /// Extracted text with runs of layout whitespace collapsed to single
    /// spaces.
    pub text: String,
}

/// One page of translated text.
///
/// `index` matches the source page; `text` is the page's chunk translations
/// joined in original chunk order with a blank-line separator. Exactly one
/// of these exists per input page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedPage {
    pub index: usize,
    pub text: String,
}

/// The result of a successful translation run.
#[derive(Debug)]
pub struct TranslationOutput {
    /// The reconstructed PDF.
    pub pdf_bytes: Vec<u8>,
    /// Translated pages in ascending index order.
    pub pages: Vec<TranslatedPage>,
    /// Run statistics.
    pub stats: TranslationStats,
}

/// Statistics for one translation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages actually translated (after page selection).
    pub translated_pages: usize,
    /// Characters of extracted source text across translated pages.
    pub source_chars: usize,
    /// Characters of translated text.
    pub translated_chars: usize,
    /// Pages in the output document (pagination may split long pages).
    pub output_sheets: usize,
    /// Wall-clock time spent extracting text.
    pub extract_ms: u64,
    /// Wall-clock time spent in translation (all pages, including retries).
    pub translate_ms: u64,
    /// Wall-clock time spent composing the output PDF.
    pub compose_ms: u64,
    /// Total wall-clock time for the run.
    pub total_ms: u64,
}

/// Summary of a document's extractable text, without translating anything.
///
/// Returned by [`crate::inspect`]; needs no API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub page_count: usize,
    pub total_chars: usize,
    pub pages: Vec<PageSummary>,
}

/// Per-page entry of a [`DocumentSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSummary {
    pub index: usize,
    pub chars: usize,
}
