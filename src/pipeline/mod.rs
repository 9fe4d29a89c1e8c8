//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch rendering backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! job ──▶ render ──▶ encode ──▶ write
//! (per doc)  (pdfium)  (png/jpeg/webp/tiff)  (fs)
//! ```
//!
//! 1. [`job`]    — drives one document: open, resolve the page range, loop
//!    pages, persist files, report fractional progress
//! 2. [`render`] — rasterise one page at the DPI-derived scale factor
//! 3. [`encode`] — turn a pixel buffer into named bytes; the only stage that
//!    knows about formats, and it performs no I/O of its own

pub mod encode;
pub mod job;
pub mod render;
