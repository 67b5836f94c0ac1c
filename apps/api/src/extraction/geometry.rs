//! Geometry tree handed over by the PDF decoding engine.
//!
//! The tree is transient: built per extraction call, read once by the
//! assembler, then discarded. Coordinates use a top-left origin, so a
//! smaller `y0` means closer to the top of the page.

use std::path::Path;

use thiserror::Error;

/// Bounding box in page points, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// A positioned run of text.
#[derive(Debug, Clone)]
pub struct Span {
    pub bbox: BBox,
    pub text: String,
}

/// One line of a block. `spans: None` marks a line with no text content.
#[derive(Debug, Clone)]
pub struct Line {
    pub bbox: BBox,
    pub spans: Option<Vec<Span>>,
}

/// One region of a page. `lines: None` marks a non-text block (e.g. an image).
#[derive(Debug, Clone)]
pub struct Block {
    pub bbox: BBox,
    pub lines: Option<Vec<Line>>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub blocks: Vec<Block>,
}

/// Why a single page failed to decode. The surrounding pages are unaffected.
#[derive(Debug, Clone, Error)]
#[error("page {index}: {reason}")]
pub struct PageError {
    pub index: usize,
    pub reason: String,
}

/// Per-page decode outcome. A failed page keeps its slot in the sequence so
/// the assembler preserves the document's page-separator structure.
pub type PageOutcome = Result<Page, PageError>;

/// Positional decomposition of a whole document, one outcome per page.
#[derive(Debug, Default)]
pub struct GeometryTree {
    pub pages: Vec<PageOutcome>,
}

/// The document could not be opened or parsed at all. Distinct from a
/// readable document that simply has zero pages.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unreadable document: {0}")]
    Unreadable(String),
}

/// PDF decoding engine. Implementations are synchronous; callers on the
/// async runtime wrap `decode` in `tokio::task::spawn_blocking`.
pub trait PdfEngine: Send + Sync {
    fn decode(&self, path: &Path) -> Result<GeometryTree, DecodeError>;
}
