//! HTTP request boundary: one upload in, one translated PDF out.
//!
//! The surface is deliberately tiny — a health probe and a single translate
//! route. The route accepts one multipart upload, runs the whole pipeline in
//! memory, and answers with either the reconstructed PDF as an attachment or
//! a structured failure payload. No partial document is ever sent: the
//! pipeline either finished or it didn't.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::translate::translate_bytes;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Uploads above this size are rejected before the pipeline runs.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Structured failure payload returned for any non-success outcome.
#[derive(Debug, Serialize, Deserialize)]
pub struct FailurePayload {
    pub error: String,
    pub detail: String,
}

impl FailurePayload {
    fn new(error: &str, detail: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            detail: detail.into(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    config: Arc<TranslationConfig>,
}

/// Build the application router.
///
/// Exposed separately from [`serve`] so tests can drive it with
/// `tower::ServiceExt::oneshot` without binding a socket.
pub fn router(config: TranslationConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/translate", post(translate_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState {
            config: Arc::new(config),
        })
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: TranslationConfig, port: u16) -> std::io::Result<()> {
    let app = router(config);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server on http://localhost:{port}");
    axum::serve(listener, app).await
}

async fn health() -> &'static str {
    "ok"
}

async fn translate_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    // Pull the uploaded file out of the multipart body.
    let mut file_bytes: Option<Vec<u8>> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("file") => {
                match field.bytes().await {
                    Ok(bytes) => file_bytes = Some(bytes.to_vec()),
                    Err(e) => {
                        return failure(
                            StatusCode::BAD_REQUEST,
                            FailurePayload::new("upload_failed", e.to_string()),
                        );
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                return failure(
                    StatusCode::BAD_REQUEST,
                    FailurePayload::new("upload_failed", e.to_string()),
                );
            }
        }
    }

    let Some(bytes) = file_bytes else {
        return failure(
            StatusCode::BAD_REQUEST,
            FailurePayload::new("no_file", "multipart field 'file' is required"),
        );
    };

    info!("Received upload: {} bytes", bytes.len());

    match translate_bytes(&bytes, &state.config).await {
        Ok(output) => (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=translated.pdf",
                ),
            ],
            output.pdf_bytes,
        )
            .into_response(),
        Err(e) => {
            error!("Translation failed: {e}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                FailurePayload::new(error_code(&e), e.to_string()),
            )
        }
    }
}

/// Stable machine-readable code for the failure payload.
fn error_code(e: &TranslateError) -> &'static str {
    match e {
        TranslateError::NotAPdf { .. } | TranslateError::ExtractionFailed { .. } => {
            "extract_failed"
        }
        _ => "translate_failed",
    }
}

fn failure(status: StatusCode, payload: FailurePayload) -> Response {
    (status, Json(payload)).into_response()
}
