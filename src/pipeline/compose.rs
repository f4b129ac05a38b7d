//! Document reconstruction: lay translated text out into a new paginated PDF.
//!
//! The output makes no attempt to mirror the source document's visual layout
//! (fonts, columns, figures); it is a clean text rendition of the translated
//! content. Layout is computed first as plain data ([`SheetLayout`]) so the
//! wrap/pagination rules are testable without touching the PDF engine; the
//! engine then walks the layout, embeds the configured font once per
//! document, and draws each line at its position.
//!
//! ## Layout rules
//!
//! * Every translated source page starts a fresh output sheet at the top
//!   margin.
//! * Paragraphs are split on blank-line boundaries and word-wrapped to a
//!   fixed column width. The wrap counts characters, not glyph widths —
//!   there are no font metrics to consult, and for scripts without word
//!   spaces (Thai, CJK) the "word" is the whole run and gets hard-cut at the
//!   column width, which is also what the character count is for.
//! * Lines advance the cursor by one line pitch; a line that would land
//!   below the bottom margin opens a new sheet first.
//! * Each paragraph is followed by an extra half-pitch gap. The gap itself
//!   is not checked against the bottom margin: the per-line check above runs
//!   before every emission, so the only consequence is a gap sitting flush
//!   against the margin.

use crate::config::{FontSpec, LayoutOptions};
use crate::error::TranslateError;
use crate::output::TranslatedPage;
use once_cell::sync::Lazy;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, Pt};
use regex::Regex;
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info};

/// One positioned line of output text. `y` is the baseline height in points
/// from the bottom edge; x is always the configured left margin.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub y: f32,
}

/// One output sheet (a page of the *output* document).
#[derive(Debug, Clone, Default)]
pub struct SheetLayout {
    pub lines: Vec<LayoutLine>,
}

/// Lines that fit between the margins of one sheet.
pub fn lines_per_sheet(opts: &LayoutOptions) -> usize {
    let usable = opts.page_height - opts.margin_top - opts.margin_bottom;
    (usable / opts.line_pitch) as usize + 1
}

static RE_PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("static regex"));

/// Word-wrap one paragraph to `width` characters per line.
///
/// Greedy: words are packed until the next word would overflow. A single
/// word longer than `width` is hard-cut into `width`-character pieces.
pub fn wrap_paragraph(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();

        if word_chars > width {
            // Oversized word: flush the current line, then hard-cut.
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_chars = 0;
            }
            let pieces: Vec<String> = word
                .chars()
                .collect::<Vec<_>>()
                .chunks(width)
                .map(|c| c.iter().collect())
                .collect();
            let n = pieces.len();
            for (i, piece) in pieces.into_iter().enumerate() {
                if i + 1 < n {
                    lines.push(piece);
                } else {
                    // The tail piece may still share its line with what follows.
                    current_chars = piece.chars().count();
                    current = piece;
                }
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_chars
        } else {
            current_chars + 1 + word_chars
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
            current_chars = word_chars;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_chars = needed;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Lay the translated pages out into sheets.
///
/// Pages must already be in ascending index order; each starts a fresh sheet.
pub fn lay_out(pages: &[TranslatedPage], opts: &LayoutOptions) -> Vec<SheetLayout> {
    let mut sheets: Vec<SheetLayout> = Vec::new();
    let top = opts.page_height - opts.margin_top;

    for page in pages {
        sheets.push(SheetLayout::default());
        let mut y = top;

        for paragraph in RE_PARAGRAPH_BREAK.split(&page.text) {
            for line in wrap_paragraph(paragraph, opts.wrap_width) {
                if y < opts.margin_bottom {
                    sheets.push(SheetLayout::default());
                    y = top;
                }
                // A sheet was just pushed in both arms above, so last() is
                // always present.
                if let Some(sheet) = sheets.last_mut() {
                    sheet.lines.push(LayoutLine { text: line, y });
                }
                y -= opts.line_pitch;
            }
            // Paragraph gap; deliberately not re-checked against the bottom
            // margin — the per-line check above already guards emission.
            y -= opts.line_pitch * 0.5;
        }
    }

    sheets
}

/// Build the output PDF from translated pages.
///
/// The font is loaded and embedded exactly once per document, regardless of
/// how many sheets the layout produces.
pub fn compose_document(
    pages: &[TranslatedPage],
    font: &FontSpec,
    opts: &LayoutOptions,
) -> Result<Vec<u8>, TranslateError> {
    let sheets = lay_out(pages, opts);
    info!(
        "Composing output PDF: {} translated pages -> {} sheets",
        pages.len(),
        sheets.len()
    );

    let page_w = Mm::from(Pt(opts.page_width));
    let page_h = Mm::from(Pt(opts.page_height));
    let (doc, first_page, first_layer) =
        PdfDocument::new("Translated Document", page_w, page_h, "text");

    let font_ref = embed_font(&doc, font)?;

    for (i, sheet) in sheets.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(page_w, page_h, "text");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for line in &sheet.lines {
            layer.use_text(
                line.text.clone(),
                opts.font_size,
                Mm::from(Pt(opts.margin_x)),
                Mm::from(Pt(line.y)),
                &font_ref,
            );
        }
        debug!("Sheet {}: {} lines", i + 1, sheet.lines.len());
    }

    doc.save_to_bytes()
        .map_err(|e| TranslateError::ComposeFailed {
            detail: e.to_string(),
        })
}

fn embed_font(
    doc: &printpdf::PdfDocumentReference,
    font: &FontSpec,
) -> Result<IndirectFontRef, TranslateError> {
    match font {
        FontSpec::Builtin => {
            doc.add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| TranslateError::ComposeFailed {
                    detail: format!("builtin font: {e}"),
                })
        }
        FontSpec::File(path) => {
            let file = File::open(path).map_err(|e| TranslateError::FontLoadFailed {
                path: path.clone(),
                detail: e.to_string(),
            })?;
            doc.add_external_font(BufReader::new(file))
                .map_err(|e| TranslateError::FontLoadFailed {
                    path: path.clone(),
                    detail: e.to_string(),
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> LayoutOptions {
        LayoutOptions::default()
    }

    fn page(index: usize, text: &str) -> TranslatedPage {
        TranslatedPage {
            index,
            text: text.to_string(),
        }
    }

    // ── wrap_paragraph ───────────────────────────────────────────────────

    #[test]
    fn wrap_packs_words_greedily() {
        let lines = wrap_paragraph("aa bb cc dd", 5);
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn wrap_exact_fit() {
        let lines = wrap_paragraph("abcde fghij", 5);
        assert_eq!(lines, vec!["abcde", "fghij"]);
    }

    #[test]
    fn wrap_empty_paragraph_is_no_lines() {
        assert!(wrap_paragraph("", 10).is_empty());
        assert!(wrap_paragraph("   ", 10).is_empty());
    }

    #[test]
    fn wrap_hard_cuts_oversized_words() {
        let lines = wrap_paragraph("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_oversized_word_tail_shares_line() {
        let lines = wrap_paragraph("abcdefg xy", 5);
        assert_eq!(lines, vec!["abcde", "fg xy"]);
    }

    #[test]
    fn wrap_counts_chars_not_bytes() {
        // Thai has no word spaces: the run is hard-cut at the column width.
        let lines = wrap_paragraph("กขคงจฉ", 3);
        assert_eq!(lines, vec!["กขค", "งจฉ"]);
    }

    // ── lay_out ──────────────────────────────────────────────────────────

    #[test]
    fn each_translated_page_starts_a_fresh_sheet() {
        let pages = vec![page(1, "first"), page(2, "second")];
        let sheets = lay_out(&pages, &opts());
        assert_eq!(sheets.len(), 2);
        let top = opts().page_height - opts().margin_top;
        assert_eq!(sheets[0].lines[0].y, top);
        assert_eq!(sheets[1].lines[0].y, top);
    }

    #[test]
    fn long_page_paginates_to_ceil_of_line_capacity() {
        let o = opts();
        let capacity = lines_per_sheet(&o);

        // One paragraph of distinct short words, wrapped to one word per
        // line: line count is exact and there are no paragraph gaps.
        let line_count = capacity * 2 + 3;
        let words: Vec<String> = (0..line_count).map(|i| format!("w{i:04}")).collect();
        let text = words.join(" ");
        let o = LayoutOptions { wrap_width: 6, ..o };

        let sheets = lay_out(&[page(1, &text)], &o);
        assert_eq!(sheets.len(), line_count.div_ceil(capacity));

        let top = o.page_height - o.margin_top;
        for sheet in &sheets {
            assert_eq!(sheet.lines[0].y, top, "each sheet starts at the top margin");
        }
        let total: usize = sheets.iter().map(|s| s.lines.len()).sum();
        assert_eq!(total, line_count);
    }

    #[test]
    fn paragraph_gap_advances_half_a_pitch() {
        let o = opts();
        let sheets = lay_out(&[page(1, "one\n\ntwo")], &o);
        let lines = &sheets[0].lines;
        assert_eq!(lines.len(), 2);
        let gap = lines[0].y - lines[1].y;
        assert!(
            (gap - o.line_pitch * 1.5).abs() < 1e-3,
            "expected 1.5 pitch between paragraphs, got {gap}"
        );
    }

    #[test]
    fn blank_line_runs_of_any_length_split_paragraphs() {
        let sheets = lay_out(&[page(1, "one\n\n\n\ntwo")], &opts());
        assert_eq!(sheets[0].lines.len(), 2);
    }

    #[test]
    fn empty_page_text_still_produces_a_sheet() {
        let sheets = lay_out(&[page(1, "")], &opts());
        assert_eq!(sheets.len(), 1);
        assert!(sheets[0].lines.is_empty());
    }

    #[test]
    fn lines_never_sit_below_the_bottom_margin() {
        let o = LayoutOptions { wrap_width: 3, ..opts() };
        let text = (0..500).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        for sheet in lay_out(&[page(1, &text)], &o) {
            for line in &sheet.lines {
                assert!(line.y >= o.margin_bottom, "line at y={}", line.y);
            }
        }
    }

    #[test]
    fn lines_per_sheet_matches_defaults() {
        // 792 - 50 - 50 = 692 usable points at 18 pt pitch -> 38 + 1.
        assert_eq!(lines_per_sheet(&opts()), 39);
    }

    // ── compose_document ─────────────────────────────────────────────────

    #[test]
    fn compose_produces_pdf_bytes() {
        let pages = vec![page(1, "Hello world"), page(2, "Second page text")];
        let bytes = compose_document(&pages, &FontSpec::Builtin, &opts()).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output must be a PDF");
        assert!(bytes.len() > 500);
    }

    #[test]
    fn compose_missing_font_file_fails_cleanly() {
        let err = compose_document(
            &[page(1, "text")],
            &FontSpec::File("/definitely/not/a/font.ttf".into()),
            &opts(),
        )
        .unwrap_err();
        assert!(matches!(err, TranslateError::FontLoadFailed { .. }));
    }
}
