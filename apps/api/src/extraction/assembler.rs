//! Layout-ordered text assembler.
//!
//! Flattens a geometry tree into reading order: blocks top to bottom,
//! lines top to bottom within a block, spans left to right within a line.
//! Every sort is stable, so tied coordinates keep the decoder's original
//! order and the output is byte-for-byte deterministic.

use tracing::warn;

use crate::extraction::geometry::{Block, GeometryTree, Line, Page, Span};

/// Assembled text shorter than this is implausible for a real document.
/// Shared with the upload handler, which rejects such results as
/// "no usable text".
pub const MIN_VIABLE_TEXT_LEN: usize = 50;

/// Reading-order text for a whole document.
#[derive(Debug, Clone)]
pub struct AssembledText {
    pub text: String,
    /// Set when the document had pages but yielded implausibly little
    /// text. A soft signal only; the text itself is returned unchanged.
    pub suspiciously_short: bool,
}

/// Assembles the reading-order text: line texts joined with `"\n"` within
/// a page, page texts joined with `"\n\n"`. An undecodable page
/// contributes an empty segment instead of aborting the rest.
pub fn assemble(tree: &GeometryTree) -> AssembledText {
    let page_texts: Vec<String> = tree
        .pages
        .iter()
        .enumerate()
        .map(|(index, outcome)| match outcome {
            Ok(page) => render_page(page),
            Err(err) => {
                warn!("skipping undecodable page {}: {err}", index + 1);
                String::new()
            }
        })
        .collect();

    let text = page_texts.join("\n\n");

    // The threshold is a character count, not a byte count.
    let char_count = text.chars().count();
    let suspiciously_short =
        !text.is_empty() && char_count < MIN_VIABLE_TEXT_LEN && !tree.pages.is_empty();
    if suspiciously_short {
        warn!(
            "assembled text is suspiciously short ({char_count} chars) for a {}-page document",
            tree.pages.len()
        );
    }

    AssembledText {
        text,
        suspiciously_short,
    }
}

/// Renders one page. Blocks without a lines collection (images) and lines
/// without spans are skipped; span texts are joined with a single space.
fn render_page(page: &Page) -> String {
    let mut blocks: Vec<&Block> = page.blocks.iter().collect();
    blocks.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

    let mut line_texts = Vec::new();
    for block in blocks {
        let Some(lines) = &block.lines else { continue };
        let mut lines: Vec<&Line> = lines.iter().collect();
        lines.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));

        for line in lines {
            let Some(spans) = &line.spans else { continue };
            let mut spans: Vec<&Span> = spans.iter().collect();
            spans.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

            let texts: Vec<&str> = spans.iter().map(|s| s.text.as_str()).collect();
            line_texts.push(texts.join(" "));
        }
    }

    line_texts.join("\n")
}
