//! Page rasterisation: one page to one `DynamicImage` at the target DPI.
//!
//! Page geometry is expressed at a 72-DPI reference, so the scale factor
//! handed to the renderer is simply `dpi / 72.0`, applied uniformly to both
//! axes (non-uniform scaling is not supported). This stage adds no pixel
//! processing of its own; it exists so the DPI-to-scale rule lives in
//! exactly one place.

use crate::error::ConvertError;
use crate::renderer::DocumentPages;
use image::DynamicImage;
use tracing::debug;

/// Geometry reference resolution in dots per inch.
const REFERENCE_DPI: f32 = 72.0;

/// Rasterise one page of an open document at the given DPI.
pub fn render_page(
    doc: &dyn DocumentPages,
    page_index: usize,
    dpi: u32,
) -> Result<DynamicImage, ConvertError> {
    let zoom = dpi as f32 / REFERENCE_DPI;
    let image = doc.rasterize(page_index, zoom)?;
    debug!(
        "Rendered page {} at {}dpi (zoom {:.2}) → {}x{} px",
        page_index + 1,
        dpi,
        zoom,
        image.width(),
        image.height()
    );
    Ok(image)
}
