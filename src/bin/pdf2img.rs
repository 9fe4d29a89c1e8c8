//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionSettings` and renders batch progress in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2img::{
    convert_batch, inspect, BatchSummary, ConversionSettings, ImageFormat, PageSelection,
    ProgressSink,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress sink using indicatif ────────────────────────────────────────

/// Terminal progress sink: a single percentage bar with the current page
/// message, fed by the batch worker thread.
struct CliProgressSink {
    bar: ProgressBar,
}

impl CliProgressSink {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}%  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ProgressSink for CliProgressSink {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.println(format!(
            "{} {}",
            green("◆"),
            bold(&format!("Converting {total_documents} document(s)…"))
        ));
    }

    fn on_progress(&self, percentage: f64, message: &str) {
        self.bar.set_position(percentage.round() as u64);
        self.bar.set_message(message.to_string());
    }

    fn on_batch_complete(&self, _summary: &BatchSummary) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every page of one PDF to PNG next to the current directory
  pdf2img report.pdf

  # Several PDFs, JPEG at 200 DPI, into a chosen folder
  pdf2img -o scans --format jpeg --dpi 200 --quality 90 a.pdf b.pdf c.pdf

  # Pages 2-4 only
  pdf2img --pages 2-4 report.pdf

  # Machine-readable batch summary
  pdf2img --json --no-progress *.pdf > summary.json

  # Page counts and sizes without converting
  pdf2img --inspect-only *.pdf

OUTPUT LAYOUT:
  For each input document with stem S, a folder {output_root}/S_images/ is
  created. A single-page job produces S.<ext>; a multi-page job produces
  S_page_001.<ext>, S_page_002.<ext>, … (1-based, zero-padded).

  A failing document never aborts the batch: its partial output is kept and
  the failure is reported in the summary.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium shared library
"#;

/// Batch-convert PDF documents to raster images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Batch-convert PDF documents to raster images (PNG, JPEG, WebP, TIFF)",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files to convert, processed in the order given.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Root folder for the per-document output subfolders.
    #[arg(short, long, env = "PDF2IMG_OUTPUT_ROOT", default_value = ".")]
    output_root: PathBuf,

    /// Output image format.
    #[arg(long, env = "PDF2IMG_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// Rendering resolution in DPI (50-600).
    #[arg(long, env = "PDF2IMG_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(50..=600))]
    dpi: u32,

    /// Encoder quality for JPEG/WebP (1-100); ignored for lossless formats.
    #[arg(long, env = "PDF2IMG_QUALITY", default_value_t = 85,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Page selection: all, a single page (5), or a range (2-4).
    #[arg(long, env = "PDF2IMG_PAGES", default_value = "all")]
    pages: String,

    /// Print the batch summary as JSON instead of the human report.
    #[arg(long, env = "PDF2IMG_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Print page counts and sizes only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2IMG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
    Webp,
    Tiff,
}

impl From<FormatArg> for ImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Jpeg => ImageFormat::Jpeg,
            FormatArg::Webp => ImageFormat::Webp,
            FormatArg::Tiff => ImageFormat::Tiff,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        for input in &cli.inputs {
            let info = inspect(input)
                .await
                .with_context(|| format!("Failed to inspect {}", input.display()))?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!(
                    "{}:  {} pages, {:.0}x{:.0} pt",
                    info.path.display(),
                    info.page_count,
                    info.page_size.0,
                    info.page_size.1
                );
            }
        }
        return Ok(());
    }

    // ── Build settings ───────────────────────────────────────────────────
    let settings = ConversionSettings::builder()
        .format(cli.format.into())
        .dpi(cli.dpi)
        .quality(cli.quality)
        .pages(parse_pages(&cli.pages)?)
        .build()
        .context("Invalid settings")?;

    let sink: Arc<dyn ProgressSink> = if show_progress {
        CliProgressSink::new()
    } else {
        Arc::new(pdf2img::NoopProgressSink)
    };

    // ── Run batch ────────────────────────────────────────────────────────
    let summary = convert_batch(
        cli.inputs.clone(),
        cli.output_root.clone(),
        settings,
        sink,
    )
    .await
    .context("Conversion failed")?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !cli.quiet {
        print_summary(&summary, &cli.output_root);
    }

    Ok(())
}

/// Human-readable batch report, one line per document plus totals.
fn print_summary(summary: &BatchSummary, output_root: &PathBuf) {
    for result in &summary.results {
        let name = result.document.display().to_string();
        match &result.error {
            None => eprintln!(
                "  {} {:<30} {} files  {}",
                green("✓"),
                name,
                result.files.len(),
                dim(&format!("{:.1} MiB", mib(result.total_bytes))),
            ),
            Some(e) => eprintln!(
                "  {} {:<30} {}{}",
                red("✗"),
                name,
                red(&e.to_string()),
                if result.files.is_empty() {
                    String::new()
                } else {
                    dim(&format!("  ({} partial files kept)", result.files.len()))
                },
            ),
        }
    }

    let mark = if summary.failed_documents == 0 {
        green("✔")
    } else {
        red("⚠")
    };
    eprintln!(
        "{} {} images created ({:.1} MiB) in {}",
        mark,
        bold(&summary.total_files.to_string()),
        mib(summary.total_bytes),
        bold(&output_root.display().to_string()),
    );
    if summary.failed_documents > 0 {
        eprintln!(
            "  {} document(s) failed",
            red(&summary.failed_documents.to_string())
        );
    }
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

/// Parse `--pages` into a `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "2-4"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;
        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {start})");
        }
        if start > end {
            anyhow::bail!("Invalid page range '{start}-{end}': start must be <= end");
        }
        return Ok(PageSelection::Range { start, end });
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {page})");
    }
    Ok(PageSelection::Range {
        start: page,
        end: page,
    })
}
