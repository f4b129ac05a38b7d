//! The remote translation collaborator.
//!
//! [`Translator`] is the seam between the pipeline and the outside world:
//! the pipeline only ever sees `translate(text, source, target) →
//! Result<String, RemoteError>`, with the HTTP status surfaced in the error
//! so the retry combinator can classify it. Tests inject stubs through
//! [`crate::config::TranslationConfig::translator`]; production uses
//! [`GeminiTranslator`], a thin reqwest client for the Gemini
//! `generateContent` REST endpoint.

use crate::error::RemoteError;
use crate::prompts::translation_prompt;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A remote text-translation service.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one block of text. The block is at most the configured
    /// chunk length; the implementation must expose the HTTP status of a
    /// failed call in the returned [`RemoteError`].
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, RemoteError>;

    /// Short human-readable name for logging.
    fn name(&self) -> &str {
        "remote"
    }
}

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini-backed [`Translator`].
pub struct GeminiTranslator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiTranslator {
    /// Create a client for the given API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_ENDPOINT.to_string(),
        }
    }

    /// Override the endpoint base URL (self-hosted proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, RemoteError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: translation_prompt(source_lang, target_lang, text),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| match e.status() {
                Some(s) => RemoteError::http(s.as_u16(), e.to_string()),
                None => RemoteError::transport(e.to_string()),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::http(status.as_u16(), excerpt(&body)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::transport(format!("malformed response: {e}")))?;

        let translated: String = body
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if translated.is_empty() {
            return Err(RemoteError::transport(
                "service returned no candidates".to_string(),
            ));
        }

        debug!(
            "Translated {} chars -> {} chars",
            text.chars().count(),
            translated.chars().count()
        );
        Ok(translated)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Trim a response body down to something loggable.
fn excerpt(body: &str) -> String {
    const MAX: usize = 300;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}…")
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}
