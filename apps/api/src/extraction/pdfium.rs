//! pdfium-backed PDF decoding engine.
//!
//! Thin glue around the `pdfium-render` crate: each page's positioned
//! text segments become the block/line/span geometry the assembler
//! consumes. One segment maps to one line holding one span; a page's
//! lines are grouped under a single text block.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use pdfium_render::prelude::*;
use tracing::debug;

use crate::extraction::geometry::{
    BBox, Block, DecodeError, GeometryTree, Line, Page, PageError, PageOutcome, PdfEngine, Span,
};

/// Engine backed by a bundled or system pdfium library.
///
/// pdfium itself is not thread-safe, so the library is bound per call and
/// calls are serialized behind a mutex. Concurrent uploads queue here; the
/// handlers already run decode inside `spawn_blocking`.
pub struct PdfiumEngine {
    lib_path: String,
    lock: Mutex<()>,
}

impl PdfiumEngine {
    /// Verifies a pdfium library can be bound at `lib_path` (falling back
    /// to the system library) before accepting any uploads.
    pub fn new(lib_path: &str) -> Result<Self> {
        bind(lib_path).context("failed to bind pdfium library")?;
        Ok(Self {
            lib_path: lib_path.to_string(),
            lock: Mutex::new(()),
        })
    }
}

fn bind(lib_path: &str) -> Result<Pdfium, PdfiumError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
}

impl PdfEngine for PdfiumEngine {
    fn decode(&self, path: &Path) -> Result<GeometryTree, DecodeError> {
        if !path.is_file() {
            return Err(DecodeError::FileNotFound(path.display().to_string()));
        }

        let _guard = self
            .lock
            .lock()
            .map_err(|_| DecodeError::Unreadable("pdfium lock poisoned".to_string()))?;

        let pdfium = bind(&self.lib_path)
            .map_err(|e| DecodeError::Unreadable(format!("pdfium unavailable: {e}")))?;

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| DecodeError::Unreadable(e.to_string()))?;

        let pages: Vec<PageOutcome> = document
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| decode_page(&page, index))
            .collect();

        debug!("decoded {} pages from {}", pages.len(), path.display());
        Ok(GeometryTree { pages })
    }
}

/// Builds one page's geometry. A text extraction failure is confined to
/// this page; the rest of the document still decodes.
fn decode_page(page: &PdfPage, index: usize) -> PageOutcome {
    let text = page.text().map_err(|e| PageError {
        index,
        reason: e.to_string(),
    })?;

    let page_height = page.height().value;
    let mut lines = Vec::new();

    for segment in text.segments().iter() {
        let content = segment.text();
        if content.trim().is_empty() {
            continue;
        }

        let bounds = segment.bounds();
        // pdfium uses a bottom-left origin; flip so smaller y0 means
        // higher on the page.
        let bbox = BBox {
            x0: bounds.left().value,
            y0: page_height - bounds.top().value,
            x1: bounds.right().value,
            y1: page_height - bounds.bottom().value,
        };

        lines.push(Line {
            bbox,
            spans: Some(vec![Span {
                bbox,
                text: content,
            }]),
        });
    }

    if lines.is_empty() {
        return Ok(Page { blocks: vec![] });
    }

    let bbox = lines
        .iter()
        .skip(1)
        .fold(lines[0].bbox, |acc, line| BBox {
            x0: acc.x0.min(line.bbox.x0),
            y0: acc.y0.min(line.bbox.y0),
            x1: acc.x1.max(line.bbox.x1),
            y1: acc.y1.max(line.bbox.y1),
        });

    Ok(Page {
        blocks: vec![Block {
            bbox,
            lines: Some(lines),
        }],
    })
}
