//! # pdftranslate
//!
//! Translate the textual content of a PDF document into another language and
//! rebuild a clean, paginated PDF with the translated text.
//!
//! ## What this crate does (and doesn't)
//!
//! The source document's *text* is what gets translated. Visual layout,
//! fonts, images, and multi-column structure are not preserved — the output
//! is a fresh text rendition, word-wrapped and paginated, with a font that
//! covers the target script embedded once per document. Remote translation
//! services rate-limit and fail transiently, so the pipeline is built around
//! a bounded-concurrency schedule with per-chunk retry and backoff.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract    per-page text via pdf-extract (CPU-bound, spawn_blocking)
//!  ├─ 2. Chunk      split page text at whitespace boundaries, ≤ 4000 chars
//!  ├─ 3. Translate  ≤ 3 pages in flight; chunks sequential within a page,
//!  │                each call retried with exponential backoff + jitter
//!  └─ 4. Compose    word-wrap, paginate, embed font, serialise the new PDF
//! ```
//!
//! Output page order always matches input page order: results are written to
//! index-addressed slots, never appended in completion order. The first page
//! failure aborts the run — no partial document is ever produced.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdftranslate::{translate, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from GEMINI_API_KEY if not set in the config.
//!     let config = TranslationConfig::builder()
//!         .source_lang("English")
//!         .target_lang("Thai")
//!         .font(pdftranslate::FontSpec::File("NotoSerifThai-Regular.ttf".into()))
//!         .build()?;
//!     let output = translate("document.pdf", &config).await?;
//!     std::fs::write("translated.pdf", &output.pdf_bytes)?;
//!     eprintln!("{} pages -> {} sheets in {}ms",
//!         output.stats.translated_pages,
//!         output.stats.output_sheets,
//!         output.stats.total_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `pdftranslate` binary (clap + indicatif) |
//! | `server` | on      | Enables the `pdftranslate-server` binary (axum) |
//!
//! Disable both when using only the library:
//! ```toml
//! pdftranslate = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod chunk;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod retry;
pub mod schedule;
#[cfg(feature = "server")]
pub mod server;
pub mod translate;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use chunk::chunk_text;
pub use config::{
    FontSpec, LayoutOptions, PageSelection, TranslationConfig, TranslationConfigBuilder,
};
pub use error::{RemoteError, TranslateError};
pub use output::{
    DocumentSummary, PageSummary, SourcePage, TranslatedPage, TranslationOutput, TranslationStats,
};
pub use pipeline::remote::{GeminiTranslator, Translator};
pub use progress::{NoopProgress, ProgressCallback, TranslationProgress};
pub use retry::{with_retry, RetryPolicy};
pub use schedule::run_bounded;
pub use translate::{inspect, translate, translate_bytes, translate_sync, translate_to_file};
