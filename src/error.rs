//! Error types for the pdf2img library.
//!
//! Almost every failure here is scoped to a single document: a corrupt PDF,
//! an empty page range, a page that will not rasterise. Those are captured as
//! a [`ConvertError`] value inside
//! [`crate::output::ConversionResult::error`] rather than propagated — the
//! batch orchestrator never aborts because one document is bad, it records
//! the failure and moves on to the next document.
//!
//! Only two variants escape that boundary: [`ConvertError::InvalidSettings`]
//! (caught at build time, before any document is touched) and
//! [`ConvertError::Internal`] (worker-thread plumbing).

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the conversion pipeline.
///
/// Variants carry their detail as plain strings so the error can be cloned
/// into a [`crate::output::ConversionResult`] and serialised in a batch
/// summary report.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ConvertError {
    // ── Document errors ───────────────────────────────────────────────────
    /// The document could not be opened at all (missing, unreadable, corrupt).
    #[error("Cannot open document '{path}': {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    /// The document opened but reports zero renderable pages.
    #[error("Document '{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    /// The requested page range is empty after clamping to the page count.
    #[error("Page range {start}-{end} selects no pages (document has {page_count} pages)")]
    InvalidRange {
        start: usize,
        end: usize,
        page_count: usize,
    },

    // ── Per-page errors ───────────────────────────────────────────────────
    /// The renderer failed to produce a pixel buffer for a page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    Render { page: usize, detail: String },

    /// The image encoder rejected a pixel buffer or its parameters.
    #[error("Encoding failed for page {page}: {detail}")]
    Encode { page: usize, detail: String },

    /// A produced image could not be written to disk.
    #[error("Failed to write output file '{path}': {detail}")]
    OutputWrite { path: PathBuf, detail: String },

    // ── Non-document errors ───────────────────────────────────────────────
    /// Settings validation failed before the batch started.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Unexpected internal error (worker panic, runtime construction).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True when the error is scoped to a single document and the batch
    /// should continue with the next one.
    pub fn is_per_document(&self) -> bool {
        !matches!(
            self,
            ConvertError::InvalidSettings(_) | ConvertError::Internal(_)
        )
    }
}
