//! Page geometry: fit an image inside the margin box and centre it.
//!
//! All values are millimetres with a top-left origin, matching how users
//! think about a page. [`crate::pipeline::pdf`] converts to PDF user space.

use crate::config::ExportConfig;
use serde::{Deserialize, Serialize};

/// Page dimensions and the blank border around the usable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
}

/// Where an image lands on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PageGeometry {
    pub fn new(page_width: f64, page_height: f64, margin: f64) -> Self {
        Self {
            page_width,
            page_height,
            margin,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        let (w, h) = config.page_dimensions_mm();
        Self::new(w, h, config.margin_mm)
    }

    pub fn usable_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f64 {
        self.page_height - 2.0 * self.margin
    }

    /// Scale a `width_px × height_px` image to fit the usable area without
    /// distortion, then centre it on the page.
    ///
    /// Callers guarantee both pixel dimensions are non-zero.
    pub fn place(&self, width_px: u32, height_px: u32) -> Placement {
        let aspect = f64::from(width_px) / f64::from(height_px);
        let (width, height) = fit_to_box(aspect, self.usable_width(), self.usable_height());
        Placement {
            x: (self.page_width - width) / 2.0,
            y: (self.page_height - height) / 2.0,
            width,
            height,
        }
    }
}

/// Largest `(w, h)` with `w / h == aspect` inside `box_w × box_h`.
///
/// Width-bound first; if that overflows vertically, height-bound instead.
pub fn fit_to_box(aspect: f64, box_w: f64, box_h: f64) -> (f64, f64) {
    let mut w = box_w;
    let mut h = w / aspect;
    if h > box_h {
        h = box_h;
        w = h * aspect;
    }
    (w, h)
}
