//! Progress-sink trait for batch conversion events.
//!
//! Inject an `Arc<dyn ProgressSink>` into [`crate::batch::run_batch`] to
//! receive progress as the worker converts pages.
//!
//! # Why a callback trait instead of a channel?
//!
//! The sink is the least-invasive integration point: callers can forward
//! updates to a terminal progress bar, a GUI thread, or a log line without
//! the library knowing how the host application communicates. The trait is
//! `Send + Sync` because the batch runs on a dedicated worker thread while
//! the observer (UI) lives elsewhere; the callback is the thread-safe
//! handoff, so no progress state is ever mutated from two threads.
//!
//! # Ordering
//!
//! `on_progress` calls arrive in strictly increasing `(document, page)`
//! order, and the reported percentage is monotonically non-decreasing
//! across the whole batch, finishing with an explicit `100.0`.

use crate::output::BatchSummary;
use tracing::info;

/// Called by the batch worker as it converts each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ProgressSink: Send + Sync {
    /// Called once before any document is opened.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called after every page completes, and once with `100.0` at the end
    /// of the batch.
    ///
    /// # Arguments
    /// * `percentage` — overall batch progress in `[0, 100]`
    /// * `message`    — human-readable status, e.g. `"Converting page 3 of report"`
    fn on_progress(&self, percentage: f64, message: &str) {
        let _ = (percentage, message);
    }

    /// Called once after the last document, with the finalised summary.
    fn on_batch_complete(&self, summary: &BatchSummary) {
        let _ = summary;
    }
}

/// A no-op sink for callers that don't need progress events.
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {}

/// Headless sink that forwards progress to `tracing` at INFO level.
///
/// Useful when the batch runs without an interactive front end (cron jobs,
/// CI) and the log stream is the only observer.
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn on_batch_start(&self, total_documents: usize) {
        info!("Starting batch of {total_documents} documents");
    }

    fn on_progress(&self, percentage: f64, message: &str) {
        info!("[{percentage:5.1}%] {message}");
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        info!(
            "Batch complete: {} files, {} bytes, {} failed documents",
            summary.total_files, summary.total_bytes, summary.failed_documents
        );
    }
}
