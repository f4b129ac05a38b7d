//! HTTP server binary for pdftranslate.
//!
//! Binds the upload-translate-respond boundary from
//! [`pdftranslate::server`] to a TCP port. All translation behaviour is
//! configured here once, at startup; each request then runs the pipeline
//! against that shared configuration.

use anyhow::{Context, Result};
use clap::Parser;
use pdftranslate::{server, FontSpec, TranslationConfig};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Serve PDF translation over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "pdftranslate-server",
    version,
    about = "HTTP service: upload a PDF, download the translated PDF"
)]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Language of the source documents.
    #[arg(long, default_value = "English")]
    source_lang: String,

    /// Language to translate into.
    #[arg(long, default_value = "Thai")]
    target_lang: String,

    /// Gemini model ID.
    #[arg(long, env = "PDFTRANSLATE_MODEL", default_value = "gemini-1.5-flash")]
    model: String,

    /// API key; falls back to GEMINI_API_KEY at request time.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TrueType font file for the output documents.
    #[arg(long, env = "PDFTRANSLATE_FONT")]
    font: Option<PathBuf>,

    /// Pages translated concurrently per request.
    #[arg(short, long, env = "PDFTRANSLATE_CONCURRENCY", default_value_t = 3)]
    concurrency: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut builder = TranslationConfig::builder()
        .source_lang(&cli.source_lang)
        .target_lang(&cli.target_lang)
        .model(&cli.model)
        .concurrency(cli.concurrency);

    if let Some(key) = cli.api_key.as_deref() {
        builder = builder.api_key(key);
    }
    if let Some(font) = cli.font.clone() {
        anyhow::ensure!(font.exists(), "font file not found: {}", font.display());
        builder = builder.font(FontSpec::File(font));
    }

    let config = builder.build().context("Invalid configuration")?;

    server::serve(config, cli.port)
        .await
        .context("Server failed")
}
