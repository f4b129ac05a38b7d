//! Progress-callback trait for per-page translation events.
//!
//! Inject an `Arc<dyn TranslationProgress>` via
//! [`crate::config::TranslationConfigBuilder::progress`] to receive events
//! as the pipeline works through the document. Callbacks are the
//! least-invasive integration point: the CLI forwards them to a terminal
//! progress bar, a server could forward them to a channel, and the library
//! stays ignorant of either.

use std::sync::Arc;

/// Called by the pipeline as it translates each page.
///
/// Implementations must be `Send + Sync`: pages are translated concurrently,
/// so `on_page_start`/`on_page_complete` may fire from interleaved tasks.
/// All methods have default no-op bodies so callers only override what they
/// care about.
pub trait TranslationProgress: Send + Sync {
    /// Called once, after extraction, with the number of pages that will be
    /// translated.
    fn on_translation_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page's first chunk is sent to the service.
    fn on_page_start(&self, page: usize, total_pages: usize) {
        let _ = (page, total_pages);
    }

    /// Called when a page has been fully translated.
    fn on_page_complete(&self, page: usize, total_pages: usize, translated_chars: usize) {
        let _ = (page, total_pages, translated_chars);
    }

    /// Called when a page fails terminally. The run aborts after this.
    fn on_page_error(&self, page: usize, total_pages: usize, error: &str) {
        let _ = (page, total_pages, error);
    }

    /// Called once after the output document has been composed.
    fn on_translation_complete(&self, total_pages: usize, output_sheets: usize) {
        let _ = (total_pages, output_sheets);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl TranslationProgress for NoopProgress {}

/// Convenience alias matching the type stored in
/// [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgress>;
