//! Page translation: chunk one page and drive the retried remote calls.
//!
//! Chunks of a page are translated strictly in order, one at a time. There
//! is no intra-page parallelism on purpose: the chunks must be rejoined in
//! reading order anyway, the remote call's latency dominates either way, and
//! cross-page concurrency (see [`crate::schedule`]) already saturates the
//! service's rate limit.

use crate::chunk::chunk_text;
use crate::config::TranslationConfig;
use crate::error::RemoteError;
use crate::output::{SourcePage, TranslatedPage};
use crate::pipeline::remote::Translator;
use crate::retry::{with_retry, RetryPolicy};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Translate one page end to end.
///
/// Chunks the page text, skips chunks that are empty after trimming,
/// translates the rest sequentially (each call wrapped in retry), and joins
/// the results with a blank-line separator. The first chunk that exhausts
/// its retry budget — or fails permanently — fails the whole page.
pub async fn translate_page(
    translator: &Arc<dyn Translator>,
    page: &SourcePage,
    config: &TranslationConfig,
) -> Result<TranslatedPage, RemoteError> {
    let policy = RetryPolicy {
        retries: config.max_retries,
        base_delay: Duration::from_millis(config.retry_backoff_ms),
    };

    let chunks: Vec<String> = chunk_text(&page.text, config.max_chunk_len).collect();
    let total = chunks.len();
    let mut parts: Vec<String> = Vec::with_capacity(total);

    for (i, chunk) in chunks.into_iter().enumerate() {
        if chunk.trim().is_empty() {
            continue;
        }
        debug!("Page {}: translating chunk {}/{}", page.index, i + 1, total);
        let translated = with_retry(
            || translator.translate(&chunk, &config.source_lang, &config.target_lang),
            &policy,
        )
        .await?;
        parts.push(translated);
    }

    Ok(TranslatedPage {
        index: page.index,
        text: parts.join("\n\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub that records every block it is asked to translate.
    struct Recording {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Translator for Recording {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, RemoteError> {
            self.calls.lock().unwrap().push(text.to_string());
            Ok(format!("<{}>", text.trim()))
        }
    }

    /// Stub that fails permanently on a specific call ordinal.
    struct FailOn {
        calls: Mutex<usize>,
        fail_at: usize,
    }

    #[async_trait]
    impl Translator for FailOn {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> Result<String, RemoteError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls == self.fail_at {
                Err(RemoteError::http(400, "bad request"))
            } else {
                Ok(text.to_string())
            }
        }
    }

    fn config(max_chunk_len: usize) -> TranslationConfig {
        TranslationConfig::builder()
            .max_chunk_len(max_chunk_len)
            .max_retries(0)
            .build()
            .unwrap()
    }

    fn page(text: &str) -> SourcePage {
        SourcePage {
            index: 1,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn chunks_are_translated_in_order_and_joined() {
        let translator: Arc<dyn Translator> = Arc::new(Recording {
            calls: Mutex::new(Vec::new()),
        });
        let result = translate_page(&translator, &page("aaa bbb ccc"), &config(4))
            .await
            .unwrap();

        assert_eq!(result.index, 1);
        assert_eq!(result.text, "<aaa>\n\n<bbb>\n\n<ccc>");
    }

    #[tokio::test]
    async fn empty_page_produces_empty_text_without_remote_calls() {
        let recording = Arc::new(Recording {
            calls: Mutex::new(Vec::new()),
        });
        let translator: Arc<dyn Translator> = recording.clone();
        let result = translate_page(&translator, &page("   "), &config(100))
            .await
            .unwrap();

        assert_eq!(result.text, "");
        assert!(recording.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn short_page_is_one_call() {
        let recording = Arc::new(Recording {
            calls: Mutex::new(Vec::new()),
        });
        let translator: Arc<dyn Translator> = recording.clone();
        translate_page(&translator, &page("hello world"), &config(4000))
            .await
            .unwrap();

        let calls = recording.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), ["hello world"]);
    }

    #[tokio::test]
    async fn chunk_failure_fails_the_page() {
        let translator: Arc<dyn Translator> = Arc::new(FailOn {
            calls: Mutex::new(0),
            fail_at: 2,
        });
        let err = translate_page(&translator, &page("aaa bbb ccc"), &config(4))
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(400));
    }
}
