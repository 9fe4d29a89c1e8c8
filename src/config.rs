//! Configuration types for batch PDF-to-image conversion.
//!
//! All conversion behaviour is controlled through [`ConversionSettings`],
//! built via its [`ConversionSettingsBuilder`]. The settings value is
//! immutable once built: one value is constructed per batch run and shared
//! by every document job, so two runs with equal settings produce an
//! identical on-disk layout.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest, and gives us one place (`build()`) to
//! validate cross-field constraints before any document is opened.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Target raster format for converted pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless, alpha-capable. (default)
    #[default]
    Png,
    /// Lossy, no alpha channel; pixel data is flattened to RGB before encode.
    Jpeg,
    /// Lossy, alpha-capable.
    Webp,
    /// Lossless, alpha-capable.
    Tiff,
}

impl ImageFormat {
    /// Lower-cased file extension used for produced files.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Webp => "webp",
            ImageFormat::Tiff => "tiff",
        }
    }

    /// Whether the container can carry an alpha channel.
    ///
    /// Formats without alpha support require the pixel buffer be flattened
    /// to RGB before encoding; see [`crate::pipeline::encode`].
    pub fn supports_alpha(&self) -> bool {
        !matches!(self, ImageFormat::Jpeg)
    }

    /// Whether the `quality` setting is attached to the encode call.
    ///
    /// Quality is still validated for the other formats, just not forwarded.
    pub fn is_quality_tunable(&self) -> bool {
        matches!(self, ImageFormat::Jpeg | ImageFormat::Webp)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Specifies which pages of a document to convert.
///
/// Page numbers are 1-based and inclusive, as a front end presents them.
/// [`PageSelection::resolve`] turns the selection into the 0-based half-open
/// interval the pipeline iterates over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert every page. (default)
    #[default]
    All,
    /// Convert a contiguous range of pages (1-based, inclusive).
    Range { start: usize, end: usize },
}

impl PageSelection {
    /// Resolve the selection against a document's page count.
    ///
    /// Returns the 0-based half-open interval `[start, end)` of pages to
    /// convert. Out-of-bounds endpoints are clamped rather than rejected, so
    /// `Range { start: 3, end: 10 }` on a 4-page document yields pages 3–4.
    /// A range that is empty after clamping fails with
    /// [`ConvertError::InvalidRange`].
    ///
    /// Pure: no I/O, same inputs always yield the same interval.
    pub fn resolve(&self, page_count: usize) -> Result<Range<usize>, ConvertError> {
        match *self {
            PageSelection::All => Ok(0..page_count),
            PageSelection::Range { start, end } => {
                let first = start.max(1) - 1;
                let last = end.min(page_count);
                if first >= last {
                    return Err(ConvertError::InvalidRange {
                        start,
                        end,
                        page_count,
                    });
                }
                Ok(first..last)
            }
        }
    }
}

/// Settings for one batch conversion run.
///
/// Built via [`ConversionSettings::builder()`] or
/// [`ConversionSettings::default()`].
///
/// # Example
/// ```rust
/// use pdf2img::{ConversionSettings, ImageFormat, PageSelection};
///
/// let settings = ConversionSettings::builder()
///     .format(ImageFormat::Jpeg)
///     .dpi(150)
///     .quality(85)
///     .pages(PageSelection::Range { start: 2, end: 4 })
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionSettings {
    /// Output raster format. Default: [`ImageFormat::Png`].
    pub format: ImageFormat,

    /// Rendering resolution in dots per inch. Range: 50–600. Default: 150.
    ///
    /// Page geometry is expressed at a 72-DPI reference, so the renderer is
    /// asked for a uniform scale of `dpi / 72.0`. 150 keeps text legible for
    /// screens; 300+ is print territory with roughly 4× the pixel volume.
    pub dpi: u32,

    /// Encoder quality for lossy formats. Range: 1–100. Default: 85.
    ///
    /// Forwarded to the encoder only for JPEG and WebP; validated but
    /// ignored for lossless formats so a settings value can be reused
    /// across formats without re-validation.
    pub quality: u8,

    /// Which pages to convert. Default: all pages.
    pub pages: PageSelection,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            dpi: 150,
            quality: 85,
            pages: PageSelection::All,
        }
    }
}

impl ConversionSettings {
    /// Create a new builder for `ConversionSettings`.
    pub fn builder() -> ConversionSettingsBuilder {
        ConversionSettingsBuilder {
            settings: Self::default(),
        }
    }
}

/// Builder for [`ConversionSettings`].
#[derive(Debug)]
pub struct ConversionSettingsBuilder {
    settings: ConversionSettings,
}

impl ConversionSettingsBuilder {
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.settings.format = format;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.settings.dpi = dpi;
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.settings.quality = quality;
        self
    }

    pub fn pages(mut self, pages: PageSelection) -> Self {
        self.settings.pages = pages;
        self
    }

    /// Build the settings, validating constraints.
    pub fn build(self) -> Result<ConversionSettings, ConvertError> {
        let s = &self.settings;
        if !(50..=600).contains(&s.dpi) {
            return Err(ConvertError::InvalidSettings(format!(
                "DPI must be 50-600, got {}",
                s.dpi
            )));
        }
        if !(1..=100).contains(&s.quality) {
            return Err(ConvertError::InvalidSettings(format!(
                "quality must be 1-100, got {}",
                s.quality
            )));
        }
        if let PageSelection::Range { start, end } = s.pages {
            if start < 1 {
                return Err(ConvertError::InvalidSettings(
                    "pages are 1-indexed, range start must be >= 1".into(),
                ));
            }
            if end < start {
                return Err(ConvertError::InvalidSettings(format!(
                    "page range start {start} exceeds end {end}"
                )));
            }
        }
        Ok(self.settings)
    }
}
