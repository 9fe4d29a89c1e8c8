//! The per-document job: open, resolve, render, encode, persist.
//!
//! A job never returns `Err`. Every failure mode — unopenable document,
//! empty page range, a page that will not render or encode, a write that
//! fails — ends up in [`ConversionResult::error`], with whatever files were
//! produced before the failure kept and counted. The batch orchestrator
//! relies on this: its loop body cannot be derailed by a bad document.
//!
//! The renderer handle is scoped to this function, so it is released on
//! every exit path, including the early failure returns.

use crate::config::ConversionSettings;
use crate::error::ConvertError;
use crate::output::ConversionResult;
use crate::pipeline::{encode, render};
use crate::renderer::DocumentRenderer;
use std::path::Path;
use tracing::{debug, info};

/// Convert one document, writing images into `{output_root}/{stem}_images/`.
///
/// `on_progress` receives the job's fractional progress in `[0, 1]` after
/// each completed page, in ascending page order, together with a status
/// message naming the page and document.
pub fn run_document(
    renderer: &dyn DocumentRenderer,
    document: &Path,
    output_root: &Path,
    settings: &ConversionSettings,
    mut on_progress: impl FnMut(f64, &str),
) -> ConversionResult {
    let stem = document_stem(document);

    let doc = match renderer.open(document) {
        Ok(doc) => doc,
        Err(e) => return ConversionResult::failed(document.to_path_buf(), e),
    };

    let page_count = doc.page_count();
    if page_count == 0 {
        return ConversionResult::failed(
            document.to_path_buf(),
            ConvertError::EmptyDocument {
                path: document.to_path_buf(),
            },
        );
    }

    let range = match settings.pages.resolve(page_count) {
        Ok(range) => range,
        Err(e) => return ConversionResult::failed(document.to_path_buf(), e),
    };
    let pages_in_job = range.len();
    debug!(
        "'{stem}': converting pages {}-{} of {page_count}",
        range.start + 1,
        range.end
    );

    // Idempotent create: a pre-existing folder is reused and its files may
    // be overwritten.
    let output_folder = output_root.join(format!("{stem}_images"));
    if let Err(e) = std::fs::create_dir_all(&output_folder) {
        return ConversionResult::failed(
            document.to_path_buf(),
            ConvertError::OutputWrite {
                path: output_folder,
                detail: e.to_string(),
            },
        );
    }

    let mut result = ConversionResult {
        document: document.to_path_buf(),
        output_folder: output_folder.clone(),
        files: Vec::with_capacity(pages_in_job),
        total_bytes: 0,
        error: None,
    };

    for page_index in range.clone() {
        let outcome = render::render_page(doc.as_ref(), page_index, settings.dpi)
            .and_then(|image| {
                encode::encode_page(&image, page_index + 1, pages_in_job, &stem, settings)
            })
            .and_then(|encoded| {
                let path = output_folder.join(&encoded.file_name);
                std::fs::write(&path, &encoded.bytes).map_err(|e| ConvertError::OutputWrite {
                    path: path.clone(),
                    detail: e.to_string(),
                })?;
                Ok((path, encoded.bytes.len() as u64))
            });

        match outcome {
            Ok((path, bytes)) => {
                result.files.push(path);
                result.total_bytes += bytes;
                let fraction = (page_index - range.start + 1) as f64 / pages_in_job as f64;
                on_progress(
                    fraction,
                    &format!("Converting page {} of {stem}", page_index + 1),
                );
            }
            Err(e) => {
                // A page failure is terminal for this document; keep what
                // was already produced.
                result.error = Some(e);
                break;
            }
        }
    }

    info!(
        "'{stem}': {} files, {} bytes{}",
        result.files.len(),
        result.total_bytes,
        if result.is_success() { "" } else { " (failed)" }
    );

    result
}

/// File stem used for the output folder and file names.
fn document_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}
