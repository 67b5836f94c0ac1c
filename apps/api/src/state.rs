use std::sync::Arc;

use crate::config::Config;
use crate::extraction::PdfEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Injected PDF decoding engine. Production wires `PdfiumEngine`;
    /// tests swap in a stub that returns a fixed geometry tree.
    pub engine: Arc<dyn PdfEngine>,
}
