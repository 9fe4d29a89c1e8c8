//! The encoder policy: pixel buffer in, named bytes out.
//!
//! This stage owns three rules and nothing else:
//!
//! * **Naming** — a single-page job produces `{stem}.{ext}`; a multi-page
//!   job produces `{stem}_page_{NNN}.{ext}` with the 1-based page number
//!   zero-padded to at least three digits.
//! * **Color mode** — JPEG has no alpha channel, so RGBA buffers are
//!   flattened to RGB before encoding; alpha-capable formats pass the
//!   buffer through unchanged.
//! * **Quality** — forwarded to the encoder only for the lossy formats
//!   (JPEG, WebP); the settings builder has already validated the range.
//!
//! It performs no file-system writes: the caller persists the returned
//! bytes, which keeps every rule here testable without touching disk.

use crate::config::{ConversionSettings, ImageFormat};
use crate::error::ConvertError;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use std::io::Cursor;

/// An encoded page: a file name relative to the document's output folder,
/// and the bytes to store under it.
#[derive(Debug, Clone)]
pub struct EncodedPage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File name for a page, per the naming rule.
///
/// `page_number` is 1-based; `pages_in_job` is the number of pages the job
/// converts, not the document's page count.
pub fn page_file_name(
    stem: &str,
    page_number: usize,
    pages_in_job: usize,
    format: ImageFormat,
) -> String {
    if pages_in_job == 1 {
        format!("{stem}.{}", format.extension())
    } else {
        format!("{stem}_page_{page_number:03}.{}", format.extension())
    }
}

/// Encode one rendered page according to the settings.
pub fn encode_page(
    image: &DynamicImage,
    page_number: usize,
    pages_in_job: usize,
    stem: &str,
    settings: &ConversionSettings,
) -> Result<EncodedPage, ConvertError> {
    let file_name = page_file_name(stem, page_number, pages_in_job, settings.format);
    let bytes = encode_pixels(image, settings).map_err(|detail| ConvertError::Encode {
        page: page_number,
        detail,
    })?;
    Ok(EncodedPage { file_name, bytes })
}

fn encode_pixels(image: &DynamicImage, settings: &ConversionSettings) -> Result<Vec<u8>, String> {
    match settings.format {
        ImageFormat::Png => write_with(image, image::ImageFormat::Png),
        ImageFormat::Tiff => write_with(image, image::ImageFormat::Tiff),
        ImageFormat::Jpeg => {
            // Flatten any alpha channel; JPEG is strictly 3-channel here.
            let rgb = image.to_rgb8();
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut Cursor::new(&mut buf), settings.quality)
                .encode_image(&rgb)
                .map_err(|e| e.to_string())?;
            Ok(buf)
        }
        ImageFormat::Webp => {
            // The webp encoder accepts only 8-bit RGB/RGBA layouts.
            let normalized;
            let source = match image {
                DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
                _ => {
                    normalized = DynamicImage::ImageRgba8(image.to_rgba8());
                    &normalized
                }
            };
            let encoder = webp::Encoder::from_image(source).map_err(|e| e.to_string())?;
            Ok(encoder.encode(f32::from(settings.quality)).to_vec())
        }
    }
}

fn write_with(image: &DynamicImage, format: image::ImageFormat) -> Result<Vec<u8>, String> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), format)
        .map_err(|e| e.to_string())?;
    Ok(buf)
}
