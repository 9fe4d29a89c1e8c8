//! Integration tests for the batch conversion pipeline.
//!
//! These drive [`pdf2img::run_batch`] end-to-end through the public
//! renderer seam with an in-memory fake, so they exercise real file-system
//! output without needing the pdfium shared library.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use pdf2img::{
    ConversionSettings, ConvertError, DocumentPages, DocumentRenderer, ImageFormat, NoopProgressSink,
    PageSelection, ProgressSink, run_batch,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Behaviour of one fake document, keyed by file stem.
#[derive(Clone, Copy)]
struct DocSpec {
    pages: usize,
    fail_open: bool,
    /// 0-based page index whose rasterisation fails.
    fail_at_page: Option<usize>,
}

impl DocSpec {
    fn pages(pages: usize) -> Self {
        Self {
            pages,
            fail_open: false,
            fail_at_page: None,
        }
    }
}

struct FakeRenderer {
    docs: HashMap<String, DocSpec>,
}

impl FakeRenderer {
    fn new(docs: &[(&str, DocSpec)]) -> Self {
        Self {
            docs: docs
                .iter()
                .map(|(stem, spec)| (stem.to_string(), *spec))
                .collect(),
        }
    }
}

impl DocumentRenderer for FakeRenderer {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn DocumentPages + 'a>, ConvertError> {
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        let spec = self
            .docs
            .get(&stem)
            .copied()
            .ok_or_else(|| ConvertError::DocumentOpen {
                path: path.to_path_buf(),
                detail: "no such file".into(),
            })?;
        if spec.fail_open {
            return Err(ConvertError::DocumentOpen {
                path: path.to_path_buf(),
                detail: "corrupt header".into(),
            });
        }
        Ok(Box::new(FakeDoc { spec }))
    }
}

struct FakeDoc {
    spec: DocSpec,
}

impl DocumentPages for FakeDoc {
    fn page_count(&self) -> usize {
        self.spec.pages
    }

    fn page_size(&self, _page_index: usize) -> Result<(f32, f32), ConvertError> {
        Ok((612.0, 792.0))
    }

    fn rasterize(&self, page_index: usize, scale: f32) -> Result<DynamicImage, ConvertError> {
        if self.spec.fail_at_page == Some(page_index) {
            return Err(ConvertError::Render {
                page: page_index + 1,
                detail: "unsupported page content".into(),
            });
        }
        // A translucent buffer so the color-mode rule is observable.
        let side = (16.0 * scale).max(1.0) as u32;
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            side,
            side,
            Rgba([30, 60, 90, 200]),
        )))
    }
}

struct RecordingSink {
    updates: Mutex<Vec<(f64, String)>>,
}

impl RecordingSink {
    fn new() -> Self {
        Self {
            updates: Mutex::new(Vec::new()),
        }
    }
}

impl ProgressSink for RecordingSink {
    fn on_progress(&self, percentage: f64, message: &str) {
        self.updates
            .lock()
            .unwrap()
            .push((percentage, message.to_string()));
    }
}

fn settings(format: ImageFormat, pages: PageSelection) -> ConversionSettings {
    ConversionSettings::builder()
        .format(format)
        .dpi(150)
        .quality(85)
        .pages(pages)
        .build()
        .unwrap()
}

// ── Naming and layout ────────────────────────────────────────────────────────

#[test]
fn multi_page_job_names_files_in_ascending_page_order() {
    let renderer = FakeRenderer::new(&[("slides", DocSpec::pages(12))]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &[PathBuf::from("slides.pdf")],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::All),
        &NoopProgressSink,
    );

    let result = &summary.results[0];
    assert!(result.is_success());
    assert_eq!(result.files.len(), 12);

    let names: Vec<String> = result
        .files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names[0], "slides_page_001.png");
    assert_eq!(names[11], "slides_page_012.png");
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted, "files must be in ascending page order");
    assert!(result.files.iter().all(|f| f.exists()));
}

#[test]
fn report_pages_2_to_4_as_jpeg() {
    let renderer = FakeRenderer::new(&[("report", DocSpec::pages(5))]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &[PathBuf::from("report.pdf")],
        out.path(),
        &settings(ImageFormat::Jpeg, PageSelection::Range { start: 2, end: 4 }),
        &NoopProgressSink,
    );

    let result = &summary.results[0];
    assert!(result.is_success());
    assert_eq!(result.output_folder, out.path().join("report_images"));
    let names: Vec<String> = result
        .files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "report_page_002.jpeg",
            "report_page_003.jpeg",
            "report_page_004.jpeg"
        ]
    );
}

#[test]
fn single_page_logo_as_png() {
    let renderer = FakeRenderer::new(&[("logo", DocSpec::pages(1))]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &[PathBuf::from("logo.pdf")],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::All),
        &NoopProgressSink,
    );

    let result = &summary.results[0];
    assert_eq!(result.files.len(), 1);
    assert_eq!(
        result.files[0],
        out.path().join("logo_images").join("logo.png")
    );
}

// ── Color-mode rule, observed on disk ────────────────────────────────────────

#[test]
fn jpeg_output_is_three_channel_png_output_keeps_alpha() {
    let renderer = FakeRenderer::new(&[("page", DocSpec::pages(1))]);
    let out = tempfile::tempdir().unwrap();

    for (format, channels) in [(ImageFormat::Jpeg, 3), (ImageFormat::Png, 4)] {
        let summary = run_batch(
            &renderer,
            &[PathBuf::from("page.pdf")],
            out.path(),
            &settings(format, PageSelection::All),
            &NoopProgressSink,
        );
        let file = &summary.results[0].files[0];
        let decoded = image::open(file).unwrap();
        assert_eq!(
            decoded.color().channel_count(),
            channels,
            "{format:?} channel count"
        );
        if format == ImageFormat::Png {
            assert_eq!(decoded.get_pixel(0, 0)[3], 200, "alpha must survive PNG");
        }
    }
}

// ── Failure isolation ────────────────────────────────────────────────────────

#[test]
fn failing_middle_document_does_not_abort_the_batch() {
    let renderer = FakeRenderer::new(&[
        ("a", DocSpec::pages(2)),
        (
            "b",
            DocSpec {
                pages: 2,
                fail_open: true,
                fail_at_page: None,
            },
        ),
        ("c", DocSpec::pages(2)),
    ]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &["a.pdf".into(), "b.pdf".into(), "c.pdf".into()],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::All),
        &NoopProgressSink,
    );

    assert_eq!(summary.results.len(), 3);
    assert!(summary.results[0].is_success());
    assert!(!summary.results[0].files.is_empty());
    assert!(summary.results[2].is_success());
    assert!(!summary.results[2].files.is_empty());

    let failed = &summary.results[1];
    assert!(failed.files.is_empty());
    assert!(matches!(
        failed.error,
        Some(ConvertError::DocumentOpen { .. })
    ));
    assert_eq!(summary.failed_documents, 1);
    assert_eq!(summary.total_files, 4);
}

#[test]
fn partial_output_is_kept_and_counted() {
    let renderer = FakeRenderer::new(&[(
        "wobbly",
        DocSpec {
            pages: 5,
            fail_open: false,
            fail_at_page: Some(2),
        },
    )]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &[PathBuf::from("wobbly.pdf")],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::All),
        &NoopProgressSink,
    );

    let result = &summary.results[0];
    assert!(matches!(result.error, Some(ConvertError::Render { page: 3, .. })));
    // Pages 1-2 were written before page 3 failed; a strict prefix.
    assert_eq!(result.files.len(), 2);
    assert!(result.files.iter().all(|f| f.exists()));
    assert_eq!(summary.total_files, 2);
    assert!(summary.total_bytes > 0);
}

// ── Progress composition ─────────────────────────────────────────────────────

#[test]
fn batch_progress_is_monotonic_and_finishes_at_100() {
    let renderer = FakeRenderer::new(&[
        ("a", DocSpec::pages(2)),
        ("b", DocSpec::pages(2)),
        ("c", DocSpec::pages(2)),
    ]);
    let out = tempfile::tempdir().unwrap();
    let sink = RecordingSink::new();

    run_batch(
        &renderer,
        &["a.pdf".into(), "b.pdf".into(), "c.pdf".into()],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::All),
        &sink,
    );

    let updates = sink.updates.lock().unwrap();
    // 3 documents x 2 pages, plus the explicit trailing 100.
    assert_eq!(updates.len(), 7);
    for pair in updates.windows(2) {
        assert!(
            pair[1].0 >= pair[0].0,
            "progress went backwards: {} then {}",
            pair[0].0,
            pair[1].0
        );
    }
    assert!((updates[5].0 - 100.0).abs() < 1e-9, "last page lands on 100");
    assert_eq!(updates[6].0, 100.0);

    // Messages walk the documents in order, pages ascending within each.
    assert_eq!(updates[0].1, "Converting page 1 of a");
    assert_eq!(updates[1].1, "Converting page 2 of a");
    assert_eq!(updates[2].1, "Converting page 1 of b");
    assert_eq!(updates[5].1, "Converting page 2 of c");
}

#[test]
fn progress_from_a_failed_document_stays_monotonic() {
    let renderer = FakeRenderer::new(&[
        (
            "broken",
            DocSpec {
                pages: 4,
                fail_open: false,
                fail_at_page: Some(1),
            },
        ),
        ("fine", DocSpec::pages(2)),
    ]);
    let out = tempfile::tempdir().unwrap();
    let sink = RecordingSink::new();

    let summary = run_batch(
        &renderer,
        &["broken.pdf".into(), "fine.pdf".into()],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::All),
        &sink,
    );
    assert_eq!(summary.failed_documents, 1);

    let updates = sink.updates.lock().unwrap();
    for pair in updates.windows(2) {
        assert!(pair[1].0 >= pair[0].0);
    }
    assert_eq!(updates.last().unwrap().0, 100.0);
}

// ── Range clamping through the whole pipeline ────────────────────────────────

#[test]
fn overshooting_range_is_clamped_to_document_length() {
    let renderer = FakeRenderer::new(&[("short", DocSpec::pages(4))]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &[PathBuf::from("short.pdf")],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::Range { start: 3, end: 10 }),
        &NoopProgressSink,
    );

    let result = &summary.results[0];
    assert!(result.is_success());
    let names: Vec<String> = result
        .files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["short_page_003.png", "short_page_004.png"]);
}

#[test]
fn fully_out_of_range_selection_fails_that_document_only() {
    let renderer = FakeRenderer::new(&[("tiny", DocSpec::pages(2)), ("big", DocSpec::pages(8))]);
    let out = tempfile::tempdir().unwrap();

    let summary = run_batch(
        &renderer,
        &["tiny.pdf".into(), "big.pdf".into()],
        out.path(),
        &settings(ImageFormat::Png, PageSelection::Range { start: 5, end: 6 }),
        &NoopProgressSink,
    );

    assert!(matches!(
        summary.results[0].error,
        Some(ConvertError::InvalidRange {
            start: 5,
            end: 6,
            page_count: 2
        })
    ));
    assert!(summary.results[1].is_success());
    assert_eq!(summary.results[1].files.len(), 2);
}

// ── Re-running over existing output ──────────────────────────────────────────

#[test]
fn second_run_overwrites_existing_files() {
    let renderer = FakeRenderer::new(&[("doc", DocSpec::pages(2))]);
    let out = tempfile::tempdir().unwrap();
    let s = settings(ImageFormat::Png, PageSelection::All);

    let first = run_batch(
        &renderer,
        &[PathBuf::from("doc.pdf")],
        out.path(),
        &s,
        &NoopProgressSink,
    );
    let second = run_batch(
        &renderer,
        &[PathBuf::from("doc.pdf")],
        out.path(),
        &s,
        &NoopProgressSink,
    );

    assert!(second.results[0].is_success());
    assert_eq!(first.results[0].files, second.results[0].files);
}
