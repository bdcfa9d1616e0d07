//! Result types produced by an export.

use crate::pipeline::layout::Placement;
use serde::Serialize;
use std::path::PathBuf;

/// A finished PDF plus what went into it.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutput {
    /// The serialised document.
    #[serde(skip)]
    pub pdf: Vec<u8>,
    /// `<stem>.pdf`, as derived from the config.
    pub file_name: String,
    /// Where the document was written, for the `*_to_dir` entry points.
    pub saved_path: Option<PathBuf>,
    /// One entry per page, in page order.
    pub pages: Vec<PagePlacement>,
    pub stats: ExportStats,
}

/// How one list item was laid out.
#[derive(Debug, Clone, Serialize)]
pub struct PagePlacement {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Id of the [`crate::content::PageItem`] on this page.
    pub item_id: u64,
    pub display_name: String,
    /// Intrinsic image size.
    pub width_px: u32,
    pub height_px: u32,
    /// Millimetres, top-left origin.
    pub placement: Placement,
    /// Size of the embedded JPEG stream.
    pub jpeg_bytes: usize,
}

/// Aggregate numbers for one export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportStats {
    pub page_count: usize,
    pub pdf_bytes: usize,
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub total_duration_ms: u64,
}
