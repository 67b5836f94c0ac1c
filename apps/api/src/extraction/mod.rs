// Extraction pipeline: decode -> assemble -> classify.
// Decoding is delegated to an injected engine; assembly and classification
// are pure, synchronous transformations with no shared state, so concurrent
// requests need no coordination. CPU-bound work must run inside
// tokio::task::spawn_blocking.

pub mod assembler;
pub mod classifier;
pub mod geometry;
pub mod handlers;
pub mod pdfium;

// Re-export the public API consumed by other modules (state, main).
pub use geometry::PdfEngine;
pub use pdfium::PdfiumEngine;
