//! Result types returned by the conversion pipeline.
//!
//! A batch run always produces a [`BatchSummary`], even when every document
//! failed. Per-document outcomes live in [`ConversionResult`]: a failed
//! document keeps whatever files it produced before the failure (a strict
//! prefix of the selected range) so callers can decide whether partial
//! output is worth keeping.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of converting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Source document path, as given to the batch.
    pub document: PathBuf,

    /// The document's output subfolder (`{output_root}/{stem}_images`).
    ///
    /// Empty when the document failed before its folder was created.
    pub output_folder: PathBuf,

    /// Produced image files in ascending page order.
    ///
    /// On success this has exactly one entry per selected page; on a
    /// partial failure it is a strict prefix of that.
    pub files: Vec<PathBuf>,

    /// Sum of the byte sizes of `files`.
    pub total_bytes: u64,

    /// The failure that stopped this document, if any.
    pub error: Option<ConvertError>,
}

impl ConversionResult {
    /// A result for a document that failed before producing any output.
    pub fn failed(document: PathBuf, error: ConvertError) -> Self {
        Self {
            document,
            output_folder: PathBuf::new(),
            files: Vec::new(),
            total_bytes: 0,
            error: Some(error),
        }
    }

    /// True when every selected page was converted.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Aggregated outcome of a whole batch run.
///
/// Built by the orchestrator after the last document finishes; ownership
/// transfers to the caller when the run returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// One entry per input document, in the order the documents were given.
    pub results: Vec<ConversionResult>,

    /// Total image files produced across all documents.
    pub total_files: usize,

    /// Total bytes written across all documents.
    pub total_bytes: u64,

    /// Number of documents whose result carries an error.
    pub failed_documents: usize,
}

impl BatchSummary {
    /// Sum the per-document results into the batch totals.
    pub fn finalize(results: Vec<ConversionResult>) -> Self {
        let total_files = results.iter().map(|r| r.files.len()).sum();
        let total_bytes = results.iter().map(|r| r.total_bytes).sum();
        let failed_documents = results.iter().filter(|r| r.error.is_some()).count();
        Self {
            results,
            total_files,
            total_bytes,
            failed_documents,
        }
    }
}

/// Basic facts about a document, reported without converting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Source document path.
    pub path: PathBuf,
    /// File stem used for output naming.
    pub stem: String,
    /// Number of pages the renderer reports.
    pub page_count: usize,
    /// Width and height of the first page in points (72-DPI reference).
    pub page_size: (f32, f32),
}
