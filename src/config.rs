//! Configuration types for image-to-PDF export.
//!
//! All export behaviour is controlled through [`ExportConfig`], built via its
//! [`ExportConfigBuilder`]. A config is recomputed from the user's current
//! selections on every export; nothing here is a standing entity.

use crate::error::ExportError;
use crate::progress::{ExportProgressCallback, ProgressCallback};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// File stem used when the user leaves the name blank.
pub const DEFAULT_PDF_NAME: &str = "my-lovely-pdf";

/// Blank border kept around every image, in millimetres.
pub const DEFAULT_MARGIN_MM: f64 = 15.0;

/// Configuration for one export.
///
/// # Example
/// ```rust
/// use imgs2pdf::{ExportConfig, Orientation, PageSize};
///
/// let config = ExportConfig::builder()
///     .pdf_name("holiday")
///     .page_size(PageSize::Letter)
///     .orientation(Orientation::Landscape)
///     .build()
///     .unwrap();
/// assert_eq!(config.file_name(), "holiday.pdf");
/// ```
#[derive(Clone)]
pub struct ExportConfig {
    /// Free-text file stem as typed by the user. Trimmed at export time;
    /// see [`ExportConfig::file_stem`].
    pub pdf_name: String,

    /// Standard paper format. Default: [`PageSize::A4`].
    pub page_size: PageSize,

    /// Page orientation. Default: [`Orientation::Portrait`].
    pub orientation: Orientation,

    /// JPEG quality used when embedding images. Default: [`ImageQuality::High`].
    pub image_quality: ImageQuality,

    /// Margin on all four sides, in millimetres. Default: 15.
    pub margin_mm: f64,

    /// Optional progress callback for per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            pdf_name: String::new(),
            page_size: PageSize::default(),
            orientation: Orientation::default(),
            image_quality: ImageQuality::default(),
            margin_mm: DEFAULT_MARGIN_MM,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("pdf_name", &self.pdf_name)
            .field("page_size", &self.page_size)
            .field("orientation", &self.orientation)
            .field("image_quality", &self.image_quality)
            .field("margin_mm", &self.margin_mm)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ExportProgressCallback>"),
            )
            .finish()
    }
}

impl ExportConfig {
    /// Create a new builder for `ExportConfig`.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder {
            config: Self::default(),
        }
    }

    /// The trimmed file stem, reduced to a single path component.
    ///
    /// Path separators and control characters become `_`. Falls back to
    /// [`DEFAULT_PDF_NAME`] when nothing usable is left (blank, `.` or `..`).
    pub fn file_stem(&self) -> Cow<'_, str> {
        let trimmed = self.pdf_name.trim();
        let stem: Cow<'_, str> = if trimmed.contains(is_unsafe_char) {
            Cow::Owned(trimmed.replace(is_unsafe_char, "_"))
        } else {
            Cow::Borrowed(trimmed)
        };
        match stem.as_ref() {
            "" | "." | ".." => Cow::Borrowed(DEFAULT_PDF_NAME),
            _ => stem,
        }
    }

    /// Output file name: `<stem>.pdf`.
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.file_stem())
    }

    /// Page dimensions `(width, height)` in millimetres after orientation.
    pub fn page_dimensions_mm(&self) -> (f64, f64) {
        self.orientation.apply(self.page_size.dimensions_mm())
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn pdf_name(mut self, name: impl Into<String>) -> Self {
        self.config.pdf_name = name.into();
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.config.orientation = orientation;
        self
    }

    pub fn image_quality(mut self, quality: ImageQuality) -> Self {
        self.config.image_quality = quality;
        self
    }

    pub fn margin_mm(mut self, mm: f64) -> Self {
        self.config.margin_mm = mm;
        self
    }

    /// Attach a progress callback.
    pub fn progress_callback(mut self, cb: Arc<dyn ExportProgressCallback>) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExportConfig, ExportError> {
        let c = &self.config;
        if !c.margin_mm.is_finite() || c.margin_mm < 0.0 {
            return Err(ExportError::InvalidConfig(format!(
                "Margin must be a non-negative number of millimetres, got {}",
                c.margin_mm
            )));
        }
        let (w, h) = c.page_dimensions_mm();
        if 2.0 * c.margin_mm >= w.min(h) {
            return Err(ExportError::InvalidConfig(format!(
                "Margin {}mm leaves no usable area on a {}×{}mm page",
                c.margin_mm, w, h
            )));
        }
        Ok(self.config)
    }
}

fn is_unsafe_char(c: char) -> bool {
    matches!(c, '/' | '\\') || c.is_control()
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Standard paper formats, dimensions given portrait-first in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    B5,
    Letter,
    Legal,
    Tabloid,
}

impl PageSize {
    /// Every supported size, in menu order.
    pub const ALL: [PageSize; 7] = [
        PageSize::A3,
        PageSize::A4,
        PageSize::A5,
        PageSize::B5,
        PageSize::Letter,
        PageSize::Legal,
        PageSize::Tabloid,
    ];

    /// `(width, height)` in millimetres, portrait.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageSize::A3 => (297.0, 420.0),
            PageSize::A4 => (210.0, 297.0),
            PageSize::A5 => (148.0, 210.0),
            PageSize::B5 => (176.0, 250.0),
            PageSize::Letter => (215.9, 279.4),
            PageSize::Legal => (215.9, 355.6),
            PageSize::Tabloid => (279.4, 431.8),
        }
    }

    /// Lower-case identifier, as accepted by the CLI.
    pub fn identifier(self) -> &'static str {
        match self {
            PageSize::A3 => "a3",
            PageSize::A4 => "a4",
            PageSize::A5 => "a5",
            PageSize::B5 => "b5",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
            PageSize::Tabloid => "tabloid",
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orient portrait-first `(w, h)`: landscape puts the long edge horizontal.
    pub fn apply(self, (w, h): (f64, f64)) -> (f64, f64) {
        let (short, long) = if w <= h { (w, h) } else { (h, w) };
        match self {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

/// JPEG quality for embedded images.
///
/// Images are always embedded as JPEG (`DCTDecode`); this only chooses how
/// aggressively they are compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    High,
    Medium,
    Low,
}

impl ImageQuality {
    /// Encoder quality in `1..=100`.
    pub fn jpeg_quality(self) -> u8 {
        match self {
            ImageQuality::High => 95,
            ImageQuality::Medium => 80,
            ImageQuality::Low => 60,
        }
    }
}
