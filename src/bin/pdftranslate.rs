//! CLI binary for pdftranslate.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `TranslationConfig` and writes the translated PDF.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdftranslate::{
    inspect, translate_to_file, FontSpec, PageSelection, TranslationConfig, TranslationProgress,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: a live bar plus one log line per finished page.
/// Pages complete out of order under the concurrent schedule, so the bar
/// tracks counts, not positions.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.set_prefix("Translating");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl TranslationProgress for CliProgress {
    fn on_translation_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
    }

    fn on_page_complete(&self, page: usize, total: usize, translated_chars: usize) {
        self.bar
            .println(format!("  ✓ Page {page:>3}/{total:<3}  {translated_chars:>6} chars"));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page: usize, total: usize, error: &str) {
        let msg: String = error.chars().take(80).collect();
        self.bar.println(format!("  ✗ Page {page:>3}/{total:<3}  {msg}"));
        self.bar.inc(1);
    }

    fn on_translation_complete(&self, total_pages: usize, output_sheets: usize) {
        self.bar.finish_and_clear();
        eprintln!("✔ {total_pages} pages translated ({output_sheets} output pages)");
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Translate to Thai (default), output next to the input
  pdftranslate document.pdf -o translated.pdf

  # Another language pair, with a font covering the target script
  pdftranslate --source-lang English --target-lang Japanese \
      --font NotoSansJP-Regular.ttf document.pdf -o ja.pdf

  # Only pages 3-10
  pdftranslate --pages 3-10 document.pdf -o part.pdf

  # Inspect extractable text without calling the API
  pdftranslate --inspect-only document.pdf

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY            Gemini API key (required unless --api-key is set)
  PDFTRANSLATE_MODEL        Override model ID
  PDFTRANSLATE_CONCURRENCY  Override page concurrency

SETUP:
  1. Set API key:   export GEMINI_API_KEY=...
  2. Translate:     pdftranslate document.pdf -o translated.pdf
"#;

/// Translate PDF documents into another language.
#[derive(Parser, Debug)]
#[command(
    name = "pdftranslate",
    version,
    about = "Translate a PDF's text into another language and rebuild a paginated PDF",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write the translated PDF to this file.
    #[arg(short, long, default_value = "translated.pdf")]
    output: PathBuf,

    /// Language of the source document.
    #[arg(long, default_value = "English")]
    source_lang: String,

    /// Language to translate into.
    #[arg(long, default_value = "Thai")]
    target_lang: String,

    /// Gemini model ID.
    #[arg(long, env = "PDFTRANSLATE_MODEL", default_value = "gemini-1.5-flash")]
    model: String,

    /// API key; falls back to GEMINI_API_KEY.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// TrueType font file for the output document. Required in practice for
    /// non-Latin target scripts; defaults to builtin Helvetica.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Pages translated concurrently.
    #[arg(short, long, env = "PDFTRANSLATE_CONCURRENCY", default_value_t = 3)]
    concurrency: usize,

    /// Maximum characters per translation chunk.
    #[arg(long, default_value_t = 4000)]
    chunk_size: usize,

    /// Retries per chunk on transient API failures.
    #[arg(long, default_value_t = 4)]
    max_retries: u32,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, default_value = "all")]
    pages: String,

    /// Print the run statistics as JSON to stdout.
    #[arg(long)]
    json: bool,

    /// Print per-page character counts only, no translation (no API key needed).
    #[arg(long)]
    inspect_only: bool,

    /// Disable the progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Parse a page-selection string: "all", "7", "3-15", "1,3,5".
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }
    if let Some((a, b)) = s.split_once('-') {
        let start: usize = a.trim().parse().context("invalid range start")?;
        let end: usize = b.trim().parse().context("invalid range end")?;
        return Ok(PageSelection::Range(start, end));
    }
    if s.contains(',') {
        let pages = s
            .split(',')
            .map(|p| p.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .context("invalid page list")?;
        return Ok(PageSelection::Set(pages));
    }
    let page: usize = s.parse().context("invalid page number")?;
    Ok(PageSelection::Single(page))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar is the user-facing feedback; keep library logs at
    // error level while it is active unless --verbose asks for more.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let summary = inspect(&cli.input).await.context("Failed to inspect PDF")?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("File:    {}", cli.input.display());
            println!("Pages:   {}", summary.page_count);
            println!("Chars:   {}", summary.total_chars);
            for page in &summary.pages {
                println!("  page {:>3}: {:>7} chars", page.index, page.chars);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = TranslationConfig::builder()
        .source_lang(&cli.source_lang)
        .target_lang(&cli.target_lang)
        .model(&cli.model)
        .concurrency(cli.concurrency)
        .max_chunk_len(cli.chunk_size)
        .max_retries(cli.max_retries)
        .pages(parse_pages(&cli.pages)?);

    if let Some(key) = cli.api_key.as_deref() {
        builder = builder.api_key(key);
    }
    if let Some(font) = cli.font.clone() {
        if !font.exists() {
            bail!("font file not found: {}", font.display());
        }
        builder = builder.font(FontSpec::File(font));
    }
    if show_progress {
        builder = builder.progress(CliProgress::new());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let stats = translate_to_file(&cli.input, &cli.output, &config)
        .await
        .context("Translation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else if !cli.quiet {
        eprintln!(
            "Wrote {} ({} pages, {:.1}s)",
            cli.output.display(),
            stats.output_sheets,
            stats.total_ms as f64 / 1000.0
        );
    }

    Ok(())
}
