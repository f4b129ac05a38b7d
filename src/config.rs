//! Configuration types for PDF translation.
//!
//! All behaviour is controlled through [`TranslationConfig`], built via its
//! [`TranslationConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across tasks, log them, and diff two runs to
//! understand why their outputs differ. There are no ambient singletons: the
//! config is constructed once and passed by reference into the pipeline.

use crate::error::TranslateError;
use crate::pipeline::remote::Translator;
use crate::progress::TranslationProgress;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for one translation run.
///
/// Built via [`TranslationConfig::builder()`] or
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use pdftranslate::TranslationConfig;
///
/// let config = TranslationConfig::builder()
///     .target_lang("Thai")
///     .concurrency(3)
///     .model("gemini-1.5-flash")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// API key for the translation service. If `None`, the `GEMINI_API_KEY`
    /// environment variable is consulted when the client is constructed.
    pub api_key: Option<String>,

    /// Model identifier sent to the service. Default: "gemini-1.5-flash".
    pub model: String,

    /// Language of the source document, as a plain English name
    /// ("English", "French"). Used verbatim in the prompt. Default: "English".
    pub source_lang: String,

    /// Language to translate into. Default: "Thai".
    pub target_lang: String,

    /// Number of pages translated concurrently. Default: 3.
    ///
    /// Translation calls are network-bound, so a small ceiling already hides
    /// most of the latency. The ceiling (together with retry backoff) is the
    /// only thing protecting the service's rate limit: raise it and 429s
    /// multiply; the retries then slow the run down more than the extra
    /// parallelism speeds it up.
    pub concurrency: usize,

    /// Maximum characters per chunk sent to the service. Default: 4000.
    ///
    /// Chunks split only at whitespace boundaries, so a single word longer
    /// than this still travels whole.
    pub max_chunk_len: usize,

    /// Maximum retry attempts per chunk on a transient failure. Default: 4.
    ///
    /// Rate limits and 5xx errors clear quickly; permanent errors (bad key,
    /// malformed request) are never retried and abort the run immediately.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 800.
    ///
    /// Doubles after each attempt, with a small random jitter so concurrent
    /// page workers don't retry in lock-step.
    pub retry_backoff_ms: u64,

    /// Per-call HTTP timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// Font used for the output document. Default: a builtin Latin font.
    ///
    /// Non-Latin target scripts need [`FontSpec::File`] pointing at a
    /// TrueType font that covers the script; the file is embedded once per
    /// output document.
    pub font: FontSpec,

    /// Output page geometry and typography.
    pub layout: LayoutOptions,

    /// Pre-constructed translation client. Takes precedence over
    /// `api_key`/`model`; used by tests to inject stubs.
    pub translator: Option<Arc<dyn Translator>>,

    /// Per-page progress events. `None` disables reporting.
    pub progress: Option<Arc<dyn TranslationProgress>>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            source_lang: "English".to_string(),
            target_lang: "Thai".to_string(),
            concurrency: 3,
            max_chunk_len: 4000,
            max_retries: 4,
            retry_backoff_ms: 800,
            api_timeout_secs: 120,
            pages: PageSelection::default(),
            font: FontSpec::default(),
            layout: LayoutOptions::default(),
            translator: None,
            progress: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("concurrency", &self.concurrency)
            .field("max_chunk_len", &self.max_chunk_len)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("pages", &self.pages)
            .field("font", &self.font)
            .field("layout", &self.layout)
            .field("translator", &self.translator.as_ref().map(|_| "<dyn Translator>"))
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.source_lang = lang.into();
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.target_lang = lang.into();
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn max_chunk_len(mut self, n: usize) -> Self {
        self.config.max_chunk_len = n.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn font(mut self, font: FontSpec) -> Self {
        self.config.font = font;
        self
    }

    pub fn layout(mut self, layout: LayoutOptions) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    pub fn progress(mut self, progress: Arc<dyn TranslationProgress>) -> Self {
        self.config.progress = Some(progress);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslateError> {
        let c = &self.config;
        if c.model.is_empty() {
            return Err(TranslateError::InvalidConfig("model must not be empty".into()));
        }
        if c.target_lang.is_empty() {
            return Err(TranslateError::InvalidConfig(
                "target language must not be empty".into(),
            ));
        }
        if c.concurrency == 0 {
            return Err(TranslateError::InvalidConfig("concurrency must be ≥ 1".into()));
        }
        if c.max_chunk_len == 0 {
            return Err(TranslateError::InvalidConfig("chunk length must be ≥ 1".into()));
        }
        self.config.layout.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to translate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Translate all pages (default).
    #[default]
    All,
    /// Translate a single page (1-indexed).
    Single(usize),
    /// Translate a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Translate specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// Font used for the translated output document.
#[derive(Debug, Clone, Default)]
pub enum FontSpec {
    /// Builtin Helvetica. Latin coverage only — fine for Western targets,
    /// useless for Thai, CJK, Arabic and most other scripts.
    #[default]
    Builtin,
    /// A TrueType font file, embedded into the output document.
    File(PathBuf),
}

/// Output page geometry and typography, in PDF points (1/72 inch) except
/// `wrap_width`.
///
/// Defaults reproduce a plain US-Letter text page: 12 pt type on an 18 pt
/// pitch, 40 pt side margins, 50 pt top/bottom margins, 100-character lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Output page width in points. Default: 612 (US Letter).
    pub page_width: f32,
    /// Output page height in points. Default: 792 (US Letter).
    pub page_height: f32,
    /// Left margin (text x position) in points. Default: 40.
    pub margin_x: f32,
    /// Top margin in points; the first baseline sits this far below the top
    /// edge. Default: 50.
    pub margin_top: f32,
    /// Bottom margin in points; a line below this forces a page break.
    /// Default: 50.
    pub margin_bottom: f32,
    /// Font size in points. Default: 12.
    pub font_size: f32,
    /// Vertical distance between consecutive baselines, in points.
    /// Default: 18.
    pub line_pitch: f32,
    /// Maximum characters per wrapped line. Character-count based, not
    /// glyph-width based — the output has no font metrics to consult.
    /// Default: 100.
    pub wrap_width: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_x: 40.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            font_size: 12.0,
            line_pitch: 18.0,
            wrap_width: 100,
        }
    }
}

impl LayoutOptions {
    pub(crate) fn validate(&self) -> Result<(), TranslateError> {
        if !(self.line_pitch > 0.0) {
            return Err(TranslateError::InvalidConfig("line pitch must be > 0".into()));
        }
        if self.wrap_width == 0 {
            return Err(TranslateError::InvalidConfig("wrap width must be ≥ 1".into()));
        }
        if self.page_height - self.margin_top - self.margin_bottom < self.line_pitch {
            return Err(TranslateError::InvalidConfig(
                "page height leaves no room for text between the margins".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_are_valid() {
        let config = TranslationConfig::builder().build().unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.max_chunk_len, 4000);
        assert_eq!(config.model, "gemini-1.5-flash");
    }

    #[test]
    fn builder_clamps_concurrency() {
        let config = TranslationConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn empty_target_lang_is_rejected() {
        let err = TranslationConfig::builder().target_lang("").build();
        assert!(err.is_err());
    }

    #[test]
    fn degenerate_layout_is_rejected() {
        let layout = LayoutOptions {
            page_height: 80.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            ..LayoutOptions::default()
        };
        assert!(TranslationConfig::builder().layout(layout).build().is_err());
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(PageSelection::Set(vec![1, 3, 5]).to_indices(5), vec![0, 2, 4]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn debug_redacts_the_api_key() {
        let config = TranslationConfig::builder().api_key("sk-secret").build().unwrap();
        let s = format!("{config:?}");
        assert!(!s.contains("sk-secret"));
        assert!(s.contains("redacted"));
    }
}
