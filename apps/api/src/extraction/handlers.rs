use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::assembler::assemble;
use crate::extraction::classifier::{classify, SectionMap};
use crate::extraction::geometry::{GeometryTree, PdfEngine};
use crate::state::AppState;

/// Extraction output: the reading-order text plus its labeled sections.
#[derive(Debug, Serialize)]
pub struct ExtractionResult {
    pub full_text: String,
    pub sections: SectionMap,
    /// Quality signal from assembly: the document had pages but yielded
    /// fewer than `MIN_VIABLE_TEXT_LEN` characters. Not part of the
    /// response body.
    #[serde(skip)]
    pub suspiciously_short: bool,
}

/// Decodes, assembles, and classifies one document.
///
/// A decode failure degrades to empty text instead of erroring; the
/// caller decides whether a result that thin is worth returning.
pub fn process(path: &Path, engine: &dyn PdfEngine) -> ExtractionResult {
    let tree = match engine.decode(path) {
        Ok(tree) => tree,
        Err(err) => {
            warn!("decode failed for {}: {err}", path.display());
            GeometryTree::default()
        }
    };

    let assembled = assemble(&tree);
    let sections = classify(&assembled.text);

    ExtractionResult {
        full_text: assembled.text,
        sections,
        suspiciously_short: assembled.suspiciously_short,
    }
}

fn allowed_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// POST /api/v1/extract
///
/// Multipart upload with a `file` field. Returns the extraction result,
/// 400 on a malformed request, or 422 when no usable text came out.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResult>, AppError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart request: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .map(str::to_string)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| AppError::Validation("No file selected".to_string()))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            upload = Some((filename, bytes));
            break;
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::Validation("No file part in the request".to_string()))?;

    if !allowed_file(&filename) {
        return Err(AppError::Validation("File type not allowed".to_string()));
    }

    // NamedTempFile cleans up on drop, covering every exit path below.
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to create temp file: {e}")))?;
    tmp.write_all(&bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to write temp file: {e}")))?;

    info!("extracting {} ({} bytes)", filename, bytes.len());

    // Decoding is CPU-bound; keep it off the async runtime.
    let engine = Arc::clone(&state.engine);
    let path = tmp.path().to_path_buf();
    let result = tokio::task::spawn_blocking(move || process(&path, engine.as_ref()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?;

    // Empty text never sets the quality signal; both cases are unusable.
    if result.suspiciously_short || result.full_text.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "could not extract enough readable text from the document".to_string(),
        ));
    }

    info!(
        "extracted {} chars into {} sections from {}",
        result.full_text.chars().count(),
        result.sections.len(),
        filename
    );
    Ok(Json(result))
}
