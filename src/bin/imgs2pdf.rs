//! CLI binary for imgs2pdf.
//!
//! A thin shim over the library crate: files on the command line are
//! ingested into a `Session` in the order given, optional removals are
//! applied, and the list is exported to `<out-dir>/<name>.pdf`.

use anyhow::{Context, Result};
use clap::Parser;
use imgs2pdf::{
    ExportConfig, ExportProgressCallback, ImageQuality, Orientation, PageSize, ProgressCallback,
    Session, SourceFile,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar for the export plus a log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the page currently being placed (pages are sequential).
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Exporting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }

    fn page_elapsed(&self) -> f64 {
        self.page_started
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl ExportProgressCallback for CliProgressCallback {
    fn on_export_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Exporting {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        *self.page_started.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, jpeg_bytes: usize) {
        let elapsed = self.page_elapsed();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<10}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{:>6} KiB", jpeg_bytes / 1024)),
            dim(&format!("{elapsed:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let elapsed = self.page_elapsed();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(error),
            dim(&format!("{elapsed:.1}s")),
        ));
    }

    fn on_export_complete(&self, _total_pages: usize, _succeeded: bool) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Two photos, A4 portrait, saved as ./my-lovely-pdf.pdf
  imgs2pdf a.png b.jpg

  # Named output in another directory
  imgs2pdf -n holiday -o ~/Documents *.jpg

  # Landscape Letter with a smaller margin and lighter JPEGs
  imgs2pdf --page-size letter --orientation landscape --margin 5 --quality low scans/*.png

  # Review the page list, then drop page id 2 before exporting
  imgs2pdf --list a.png b.png c.png
  imgs2pdf --remove 2 a.png b.png c.png

  # Machine-readable summary
  imgs2pdf --json a.png b.png > summary.json

ENVIRONMENT VARIABLES:
  IMGS2PDF_OUT_DIR, IMGS2PDF_NAME, IMGS2PDF_PAGE_SIZE, IMGS2PDF_ORIENTATION,
  IMGS2PDF_QUALITY, IMGS2PDF_MARGIN    Defaults for the matching flags
  RUST_LOG                              Override log filtering
"#;

/// Combine images into a single PDF, one image per page.
#[derive(Parser, Debug)]
#[command(
    name = "imgs2pdf",
    version,
    about = "Combine images into a single PDF, one image per page",
    long_about = "Combine images into a single PDF. Each image gets its own page, is scaled to \
fit inside the margins without distortion, and is centred. Pages follow the order the files \
are given on the command line.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Image files, in page order. Non-image files are skipped.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Directory to write the PDF into.
    #[arg(short, long, env = "IMGS2PDF_OUT_DIR", default_value = ".")]
    out_dir: PathBuf,

    /// PDF file name without extension (blank → my-lovely-pdf).
    #[arg(short, long, env = "IMGS2PDF_NAME", default_value = "")]
    name: String,

    /// Paper format.
    #[arg(long, env = "IMGS2PDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Page orientation.
    #[arg(long, env = "IMGS2PDF_ORIENTATION", value_enum, default_value = "portrait")]
    orientation: OrientationArg,

    /// JPEG quality of embedded images.
    #[arg(long, env = "IMGS2PDF_QUALITY", value_enum, default_value = "high")]
    quality: QualityArg,

    /// Margin on every side, in millimetres.
    #[arg(long, env = "IMGS2PDF_MARGIN", default_value_t = 15.0)]
    margin: f64,

    /// Remove the page with this id after loading (repeatable).
    #[arg(long = "remove", value_name = "ID")]
    remove: Vec<u64>,

    /// Print the page list and exit without exporting.
    #[arg(long)]
    list: bool,

    /// Print a JSON summary instead of human-readable output.
    #[arg(long)]
    json: bool,

    /// Files read at once while loading.
    #[arg(long, env = "IMGS2PDF_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Disable progress bar.
    #[arg(long, env = "IMGS2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "IMGS2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "IMGS2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    A3,
    A4,
    A5,
    B5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A5 => PageSize::A5,
            PageSizeArg::B5 => PageSize::B5,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
            PageSizeArg::Tabloid => PageSize::Tabloid,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for Orientation {
    fn from(v: OrientationArg) -> Self {
        match v {
            OrientationArg::Portrait => Orientation::Portrait,
            OrientationArg::Landscape => Orientation::Landscape,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum QualityArg {
    High,
    Medium,
    Low,
}

impl From<QualityArg> for ImageQuality {
    fn from(v: QualityArg) -> Self {
        match v {
            QualityArg::High => ImageQuality::High,
            QualityArg::Medium => ImageQuality::Medium,
            QualityArg::Low => ImageQuality::Low,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar carries the per-page feedback; keep library INFO
    // logs out of its way unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.list;
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

    // ── Load files ───────────────────────────────────────────────────────
    let mut session = Session::new().with_ingest_concurrency(cli.concurrency);
    let files: Vec<SourceFile> = cli
        .images
        .iter()
        .map(|p| SourceFile::from_path(p.clone()))
        .collect();
    let report = session.ingest(files).await;

    if !cli.quiet && !cli.json {
        for rejected in &report.rejected {
            eprintln!("  {} {}", red("✗"), rejected);
        }
    }

    for &id in &cli.remove {
        if !session.remove(id) && !cli.quiet {
            eprintln!("  {} no page with id {id}", cyan("⚠"));
        }
    }

    // ── List-only mode ───────────────────────────────────────────────────
    if cli.list {
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&session.entries())
                    .context("Failed to serialise page list")?
            );
        } else {
            for entry in session.entries() {
                println!("{:>4}  {}", dim(&format!("#{}", entry.id)), entry.label);
            }
            let label = session.count_label();
            if !label.is_empty() {
                println!("{}", bold(&label));
            }
        }
        return Ok(());
    }

    if !session.actions_enabled() {
        anyhow::bail!("No images to convert");
    }

    if !cli.quiet && !cli.json {
        eprintln!("{} {}", cyan("◆"), session.count_label());
    }

    // ── Export ───────────────────────────────────────────────────────────
    // Validate before the bar starts ticking.
    let mut config = build_config(&cli)?;
    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new();
        config.progress_callback = Some(cb);
    }

    let result = session.convert_to_dir(&cli.out_dir, &config).await;
    if let Some(status) = session.status() {
        if !cli.quiet && !cli.json && result.is_err() {
            eprintln!("{} {}", red("✘"), status.text);
        }
    }
    let output = result.context("Export failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        let path = output
            .saved_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| output.file_name.clone());
        eprintln!(
            "{}  {} pages  {}  {}ms  →  {}",
            green("✔"),
            output.stats.page_count,
            dim(&format!("{} KiB", output.stats.pdf_bytes / 1024)),
            output.stats.total_duration_ms,
            bold(&path),
        );
    }

    Ok(())
}

/// Map CLI args to `ExportConfig`.
fn build_config(cli: &Cli) -> Result<ExportConfig> {
    ExportConfig::builder()
        .pdf_name(cli.name.clone())
        .page_size(cli.page_size.into())
        .orientation(cli.orientation.into())
        .image_quality(cli.quality.into())
        .margin_mm(cli.margin)
        .build()
        .context("Invalid configuration")
}
