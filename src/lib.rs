//! # imgs2pdf
//!
//! Arrange images as ordered pages and export them as one PDF.
//!
//! Each image becomes one page. Images are scaled to fit inside a margin box
//! without distortion, centred, and embedded as JPEG. Page order is list
//! order, always: ingest keeps the selection order even though files are
//! read concurrently, and export places pages strictly one at a time.
//!
//! ## Pipeline Overview
//!
//! ```text
//! files
//!  │
//!  ├─ 1. Ingest   filter image/*, read + probe concurrently, keep input order
//!  ├─ 2. List     ContentList: append / remove(id) / clear
//!  ├─ 3. Encode   decode each payload, re-encode as JPEG (spawn_blocking)
//!  ├─ 4. Layout   fit-to-box inside the margins, centre on the page
//!  └─ 5. PDF      one image XObject per page via lopdf, saved atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgs2pdf::{ExportConfig, Session, SourceFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::new();
//!     session
//!         .ingest(vec![
//!             SourceFile::from_path("a.png"),
//!             SourceFile::from_path("b.jpg"),
//!         ])
//!         .await;
//!     println!("{}", session.count_label());
//!
//!     let config = ExportConfig::builder().pdf_name("photos").build()?;
//!     let output = session.convert_to_dir(".", &config).await?;
//!     eprintln!("wrote {} pages to {:?}", output.stats.page_count, output.saved_path);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `imgs2pdf` binary (clap + anyhow + tracing-subscriber + indicatif + serde_json) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExportConfig, ExportConfigBuilder, ImageQuality, Orientation, PageSize};
pub use content::{count_label, ContentList, ImagePayload, ListEntry, PageItem, PageKind};
pub use error::{ExportError, IngestError};
pub use export::{export, export_sync, export_to_dir};
pub use output::{ExportOutput, ExportStats, PagePlacement};
pub use pipeline::ingest::{IngestReport, SourceFile};
pub use pipeline::layout::{PageGeometry, Placement};
pub use progress::{ExportProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::{Session, StatusKind, StatusMessage};
