//! The document-renderer seam: how pages become pixel buffers.
//!
//! The pipeline never talks to pdfium directly; it goes through the
//! [`DocumentRenderer`] / [`DocumentPages`] traits so tests can substitute an
//! in-memory renderer and the rendering backend can be swapped without
//! touching the batch logic.
//!
//! An open document is a scoped resource: [`DocumentRenderer::open`] returns
//! a boxed handle whose `Drop` releases the underlying renderer state, so the
//! handle is freed on every exit path of a document job, including failures.
//!
//! The pdfium implementation is deliberately not shared across threads: the
//! pdfium C++ library keeps thread-local state, so the batch worker owns one
//! [`PdfiumRenderer`] and processes documents and pages strictly
//! sequentially through it.

use crate::error::ConvertError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Opens documents and hands out page-level render handles.
pub trait DocumentRenderer {
    /// Open a document for rendering.
    ///
    /// The returned handle borrows the renderer; dropping it releases the
    /// document. Fails with [`ConvertError::DocumentOpen`] when the file is
    /// missing, unreadable, or not a parseable document.
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn DocumentPages + 'a>, ConvertError>;
}

/// Render operations on one open document.
pub trait DocumentPages {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Width and height of a page in points (72-DPI reference geometry).
    fn page_size(&self, page_index: usize) -> Result<(f32, f32), ConvertError>;

    /// Rasterise one page at a uniform scale factor relative to the 72-DPI
    /// reference. Returns an RGB or RGBA pixel buffer.
    fn rasterize(&self, page_index: usize, scale: f32) -> Result<DynamicImage, ConvertError>;
}

/// pdfium-backed [`DocumentRenderer`].
///
/// Binds to the pdfium shared library on construction (`PDFIUM_LIB_PATH`
/// overrides the default search locations).
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    pub fn new() -> Self {
        let pdfium = match library_override() {
            Some(path) => match Pdfium::bind_to_library(&path) {
                Ok(bindings) => Pdfium::new(bindings),
                Err(e) => {
                    warn!(
                        "Failed to bind PDFIUM_LIB_PATH '{}' ({e:?}); \
                         falling back to the default library search",
                        path.display()
                    );
                    Pdfium::default()
                }
            },
            None => Pdfium::default(),
        };
        Self { pdfium }
    }
}

/// Library path from `PDFIUM_LIB_PATH`, if the variable names an existing
/// file. A set-but-missing path is reported and ignored so the default
/// search still runs.
fn library_override() -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var_os("PDFIUM_LIB_PATH")?);
    if path.exists() {
        return Some(path);
    }
    warn!(
        "PDFIUM_LIB_PATH '{}' does not exist; using the default library search",
        path.display()
    );
    None
}

/// pdfium addresses pages by `u16`, so larger indices cannot name a real
/// page and are rejected instead of silently truncated.
fn pdfium_page_index(page_index: usize) -> Result<u16, ConvertError> {
    u16::try_from(page_index).map_err(|_| ConvertError::Render {
        page: page_index + 1,
        detail: format!("page index {page_index} exceeds the pdfium page limit"),
    })
}

impl Default for PdfiumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PdfiumRenderer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn DocumentPages + 'a>, ConvertError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ConvertError::DocumentOpen {
                path: path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;
        debug!(
            "Opened '{}': {} pages",
            path.display(),
            document.pages().len()
        );
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl DocumentPages for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, page_index: usize) -> Result<(f32, f32), ConvertError> {
        let pages = self.document.pages();
        let page = pages
            .get(pdfium_page_index(page_index)?)
            .map_err(|e| ConvertError::Render {
                page: page_index + 1,
                detail: format!("{e:?}"),
            })?;
        Ok((page.width().value, page.height().value))
    }

    fn rasterize(&self, page_index: usize, scale: f32) -> Result<DynamicImage, ConvertError> {
        let pages = self.document.pages();
        let page = pages
            .get(pdfium_page_index(page_index)?)
            .map_err(|e| ConvertError::Render {
                page: page_index + 1,
                detail: format!("{e:?}"),
            })?;
        let bitmap = page
            .render_with_config(&PdfRenderConfig::new().scale_page_by_factor(scale))
            .map_err(|e| ConvertError::Render {
                page: page_index + 1,
                detail: format!("{e:?}"),
            })?;
        Ok(bitmap.as_image())
    }
}
