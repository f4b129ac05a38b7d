//! Top-level translation entry points.
//!
//! The orchestrator sequences the three pipeline stages — extract, translate
//! under the bounded scheduler, compose — and maps any stage failure to a
//! single terminal [`TranslateError`]. It performs no recovery of its own:
//! retry lives below it (per chunk, in [`crate::retry`]) and nothing above
//! it ever sees a partial document.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::output::{DocumentSummary, PageSummary, TranslatedPage, TranslationOutput, TranslationStats};
use crate::pipeline::remote::{GeminiTranslator, Translator};
use crate::pipeline::{compose, extract, translate as page};
use crate::schedule::run_bounded;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Translate a PDF file into a new PDF in the configured target language.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Any stage failure aborts the run: unreadable input, extraction failure,
/// a page whose translation exhausted its retries (or failed permanently),
/// or a composition failure. No partial output is returned.
pub async fn translate(
    input: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let path = input.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => TranslateError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => TranslateError::FileNotFound {
            path: path.to_path_buf(),
        },
    })?;
    translate_bytes(&bytes, config).await
}

/// Translate PDF bytes already in memory.
///
/// This is the API the HTTP boundary uses: the upload never needs to touch
/// disk, and nothing is left behind on either the success or failure path.
pub async fn translate_bytes(
    bytes: &[u8],
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let total_start = Instant::now();
    let translator = resolve_translator(config)?;
    info!(
        "Starting translation: {} -> {} via {}",
        config.source_lang,
        config.target_lang,
        translator.name()
    );

    // ── Extract ──────────────────────────────────────────────────────────
    let extract_start = Instant::now();
    let pages = extract::extract_pages(bytes.to_vec()).await?;
    let extract_ms = extract_start.elapsed().as_millis() as u64;
    let total_pages = pages.len();
    info!("Extracted {} pages in {}ms", total_pages, extract_ms);

    let indices = config.pages.to_indices(total_pages);
    if indices.is_empty() {
        return Err(TranslateError::EmptyDocument { total: total_pages });
    }
    let selected: Vec<_> = indices.into_iter().map(|i| pages[i].clone()).collect();
    let selected_count = selected.len();
    let source_chars: usize = selected.iter().map(|p| p.text.chars().count()).sum();
    debug!("Selected {} pages for translation", selected_count);

    if let Some(ref cb) = config.progress {
        cb.on_translation_start(selected_count);
    }

    // ── Translate under the concurrency ceiling ──────────────────────────
    let translate_start = Instant::now();
    let mut translated = run_bounded(selected, config.concurrency, |_, source_page| {
        let translator = Arc::clone(&translator);
        async move {
            if let Some(ref cb) = config.progress {
                cb.on_page_start(source_page.index, selected_count);
            }
            let result = page::translate_page(&translator, &source_page, config).await;
            if let Some(ref cb) = config.progress {
                match &result {
                    Ok(p) => cb.on_page_complete(p.index, selected_count, p.text.chars().count()),
                    Err(e) => cb.on_page_error(source_page.index, selected_count, &e.to_string()),
                }
            }
            result.map_err(|e| TranslateError::TranslationFailed {
                page: source_page.index,
                source: e,
            })
        }
    })
    .await?;
    let translate_ms = translate_start.elapsed().as_millis() as u64;

    // The scheduler already preserves input order; sorting again keeps the
    // documented invariant at this boundary even if the scheduler changes.
    translated.sort_by_key(|p| p.index);

    // ── Compose ──────────────────────────────────────────────────────────
    let compose_start = Instant::now();
    let sheets = compose::lay_out(&translated, &config.layout).len();
    let pdf_bytes = compose::compose_document(&translated, &config.font, &config.layout)?;
    let compose_ms = compose_start.elapsed().as_millis() as u64;

    let stats = TranslationStats {
        total_pages,
        translated_pages: translated.len(),
        source_chars,
        translated_chars: translated.iter().map(|p| p.text.chars().count()).sum(),
        output_sheets: sheets,
        extract_ms,
        translate_ms,
        compose_ms,
        total_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Translation complete: {}/{} pages, {} sheets, {}ms total",
        stats.translated_pages, stats.total_pages, stats.output_sheets, stats.total_ms
    );

    if let Some(ref cb) = config.progress {
        cb.on_translation_complete(selected_count, stats.output_sheets);
    }

    Ok(TranslationOutput {
        pdf_bytes,
        pages: translated,
        stats,
    })
}

/// Translate a PDF and write the output directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn translate_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationStats, TranslateError> {
    let output = translate(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TranslateError::OutputWriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf_bytes)
        .await
        .map_err(|e| TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`translate`].
///
/// Creates a temporary tokio runtime internally.
pub fn translate_sync(
    input: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TranslateError::Internal(format!("failed to create tokio runtime: {e}")))?
        .block_on(translate(input, config))
}

/// Summarise a document's extractable text without translating anything.
///
/// Does not require an API key.
pub async fn inspect(input: impl AsRef<Path>) -> Result<DocumentSummary, TranslateError> {
    let path = input.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|_| TranslateError::FileNotFound {
            path: path.to_path_buf(),
        })?;
    let pages = extract::extract_pages(bytes).await?;
    Ok(DocumentSummary {
        page_count: pages.len(),
        total_chars: pages.iter().map(|p| p.text.chars().count()).sum(),
        pages: pages
            .iter()
            .map(|p| PageSummary {
                index: p.index,
                chars: p.text.chars().count(),
            })
            .collect(),
    })
}

/// Resolve the translation client, most-specific first:
///
/// 1. **Pre-built client** (`config.translator`) — the caller constructed it
///    entirely; used as-is. This is also the test seam.
/// 2. **Configured API key** (`config.api_key`) — a Gemini client for the
///    configured model.
/// 3. **`GEMINI_API_KEY` environment variable** — convenient for
///    `pdftranslate document.pdf` with no other configuration.
fn resolve_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>, TranslateError> {
    if let Some(ref translator) = config.translator {
        return Ok(Arc::clone(translator));
    }

    let key = match config.api_key.clone() {
        Some(k) if !k.is_empty() => k,
        _ => std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| TranslateError::ApiKeyMissing {
                hint: "Set GEMINI_API_KEY or provide an api_key in the configuration.".to_string(),
            })?,
    };

    Ok(Arc::new(GeminiTranslator::new(
        key,
        config.model.clone(),
        Duration::from_secs(config.api_timeout_secs),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_injected_translator() {
        use crate::error::RemoteError;
        use async_trait::async_trait;

        struct Stub;
        #[async_trait]
        impl Translator for Stub {
            async fn translate(&self, t: &str, _s: &str, _l: &str) -> Result<String, RemoteError> {
                Ok(t.to_string())
            }
            fn name(&self) -> &str {
                "stub"
            }
        }

        let config = TranslationConfig::builder()
            .translator(Arc::new(Stub))
            .build()
            .unwrap();
        let translator = resolve_translator(&config).unwrap();
        assert_eq!(translator.name(), "stub");
    }

    #[test]
    fn resolve_requires_some_key() {
        // No injected translator, no configured key: resolution must fail
        // with the configuration hint unless the environment provides one.
        if std::env::var("GEMINI_API_KEY").is_ok() {
            return;
        }
        let config = TranslationConfig::default();
        assert!(matches!(
            resolve_translator(&config),
            Err(TranslateError::ApiKeyMissing { .. })
        ));
    }

    #[tokio::test]
    async fn translate_missing_file_fails() {
        let config = TranslationConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap();
        let err = translate("/definitely/not/a/real/file.pdf", &config)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::FileNotFound { .. }));
    }
}
