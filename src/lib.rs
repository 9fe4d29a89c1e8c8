//! # pdf2img
//!
//! Batch-convert PDF documents to raster images (PNG, JPEG, WebP, TIFF).
//!
//! ## Why this crate?
//!
//! Turning a stack of PDFs into page images sounds trivial until a batch
//! meets the real world: one corrupt file in twenty, page ranges that
//! overshoot short documents, and a progress bar that has to stay honest
//! across documents of wildly different lengths. This crate owns exactly
//! that state — page-range resolution, per-document fault isolation, and
//! unified batch progress — and delegates pixel production to pdfium.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDFs
//!  │
//!  ├─ 1. Batch    iterate documents in caller order, fault boundary each
//!  ├─ 2. Job      open document, resolve page range, create {stem}_images/
//!  ├─ 3. Render   rasterise each page via pdfium at dpi/72 scale
//!  ├─ 4. Encode   naming, color-mode, and quality rules per format
//!  └─ 5. Summary  files produced, bytes written, per-document failures
//! ```
//!
//! Progress flows back up the same chain as `(percentage, message)` pairs
//! through a [`ProgressSink`], monotonically non-decreasing and finishing
//! at exactly 100.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2img::{convert_batch, ConversionSettings, NoopProgressSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = ConversionSettings::default();
//!     let summary = convert_batch(
//!         vec!["report.pdf".into(), "slides.pdf".into()],
//!         "out".into(),
//!         settings,
//!         Arc::new(NoopProgressSink),
//!     )
//!     .await?;
//!     println!(
//!         "{} images, {} bytes, {} documents failed",
//!         summary.total_files, summary.total_bytes, summary.failed_documents
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Output layout
//!
//! For each input document with stem `S`, a folder `{output_root}/S_images/`
//! is created containing either `S.<ext>` (single-page job) or
//! `S_page_NNN.<ext>` (multi-page job, 1-based, zero-padded to three
//! digits).
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2img` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2img = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod renderer;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{convert_batch, convert_batch_sync, inspect, run_batch};
pub use config::{ConversionSettings, ConversionSettingsBuilder, ImageFormat, PageSelection};
pub use error::ConvertError;
pub use output::{BatchSummary, ConversionResult, DocumentInfo};
pub use progress::{LogProgressSink, NoopProgressSink, ProgressSink};
pub use renderer::{DocumentPages, DocumentRenderer, PdfiumRenderer};
