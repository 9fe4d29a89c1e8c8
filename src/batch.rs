//! The batch orchestrator: many documents, one progress stream, one summary.
//!
//! ## Why spawn_blocking?
//!
//! pdfium wraps a C++ library with thread-local state and blocking file I/O,
//! so the whole batch runs on one dedicated blocking thread via
//! [`tokio::task::spawn_blocking`], keeping async callers responsive while
//! documents and pages are processed strictly sequentially on the worker.
//!
//! ## Fault boundary
//!
//! Each document runs inside [`crate::pipeline::job::run_document`], which
//! converts every failure into a [`ConversionResult::error`] value. The loop
//! here therefore cannot abort early: one corrupt document yields one failed
//! result and the batch moves on. The orchestrator itself has no failure
//! path — it always returns a [`BatchSummary`].
//!
//! ## Progress composition
//!
//! For document `i` of `n` reporting per-document fraction `p ∈ [0, 1]`, the
//! overall percentage is `(i / n) * 100 + p * 100 / n`. The sequence is
//! monotonically non-decreasing across the batch and an explicit final
//! `100.0` is pushed after the loop to absorb floating-point rounding.

use crate::config::ConversionSettings;
use crate::error::ConvertError;
use crate::output::{BatchSummary, ConversionResult, DocumentInfo};
use crate::pipeline::job;
use crate::progress::ProgressSink;
use crate::renderer::{DocumentRenderer, PdfiumRenderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Run a batch over an explicit renderer, blocking the current thread.
///
/// Documents are processed in the order given; the caller's ordering is
/// significant (the first document is the natural origin for any
/// "open containing folder" follow-up a front end offers).
///
/// This is the synchronous core the async entry points wrap, and the seam
/// tests use to drive the batch with an in-memory renderer.
pub fn run_batch(
    renderer: &dyn DocumentRenderer,
    documents: &[PathBuf],
    output_root: &Path,
    settings: &ConversionSettings,
    sink: &dyn ProgressSink,
) -> BatchSummary {
    let total = documents.len();
    sink.on_batch_start(total);
    info!(
        "Batch start: {total} documents → {} ({}, {} dpi)",
        output_root.display(),
        settings.format,
        settings.dpi
    );

    let mut results = Vec::with_capacity(total);
    for (index, document) in documents.iter().enumerate() {
        let result = job::run_document(renderer, document, output_root, settings, |p, msg| {
            let overall = (index as f64 / total as f64) * 100.0 + p * 100.0 / total as f64;
            sink.on_progress(overall, msg);
        });

        if let Some(ref e) = result.error {
            warn!("'{}' failed: {e}", document.display());
        }
        results.push(result);
    }

    sink.on_progress(100.0, "Conversion complete");

    let summary = BatchSummary::finalize(results);
    info!(
        "Batch complete: {} files, {} bytes, {}/{} documents failed",
        summary.total_files, summary.total_bytes, summary.failed_documents, total
    );
    sink.on_batch_complete(&summary);
    summary
}

/// Inspect a document without converting it.
pub fn inspect_document(
    renderer: &dyn DocumentRenderer,
    path: &Path,
) -> Result<DocumentInfo, ConvertError> {
    let doc = renderer.open(path)?;
    let page_count = doc.page_count();
    if page_count == 0 {
        return Err(ConvertError::EmptyDocument {
            path: path.to_path_buf(),
        });
    }
    Ok(DocumentInfo {
        path: path.to_path_buf(),
        stem: path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string()),
        page_count,
        page_size: doc.page_size(0)?,
    })
}

/// Convert a batch of PDF files to images using the pdfium renderer.
///
/// This is the primary entry point for the library. The conversion runs on
/// a blocking worker thread; progress is delivered through `sink` from that
/// worker.
///
/// # Errors
/// Only worker plumbing can fail here ([`ConvertError::Internal`]).
/// Per-document failures never surface as `Err`; inspect
/// [`BatchSummary::failed_documents`] and the per-document
/// [`ConversionResult::error`] values instead.
pub async fn convert_batch(
    documents: Vec<PathBuf>,
    output_root: PathBuf,
    settings: ConversionSettings,
    sink: Arc<dyn ProgressSink>,
) -> Result<BatchSummary, ConvertError> {
    tokio::task::spawn_blocking(move || {
        let renderer = PdfiumRenderer::new();
        run_batch(&renderer, &documents, &output_root, &settings, sink.as_ref())
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Batch worker panicked: {e}")))
}

/// Synchronous wrapper around [`convert_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_batch_sync(
    documents: Vec<PathBuf>,
    output_root: PathBuf,
    settings: ConversionSettings,
    sink: Arc<dyn ProgressSink>,
) -> Result<BatchSummary, ConvertError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert_batch(documents, output_root, settings, sink))
}

/// Inspect a PDF with the pdfium renderer, without converting it.
pub async fn inspect(path: impl AsRef<Path>) -> Result<DocumentInfo, ConvertError> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let renderer = PdfiumRenderer::new();
        inspect_document(&renderer, &path)
    })
    .await
    .map_err(|e| ConvertError::Internal(format!("Inspect worker panicked: {e}")))?
}
