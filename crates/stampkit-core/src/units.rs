//! Unit conversion utilities
//!
//! Every physical measurement in a stamp design flows through
//! [`UnitConverter`]: millimetres for the document, canvas pixels for
//! element geometry and PostScript points for font sizes and PDF output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canvas pixels per millimetre (96 DPI).
pub const PX_PER_MM: f64 = 3.7795275591;

/// Millimetres per typographic point, as used for font sizes.
pub const PT_TO_MM: f64 = 0.3528;

/// PDF points per millimetre.
pub const MM_TO_PT: f64 = 72.0 / 25.4;

/// Ruler thickness around the work area.
pub const RULER_SIZE_PX: f64 = 24.0;

/// Padding between ruler and work area.
pub const CANVAS_PADDING_PX: f64 = 40.0;

/// Canvas x coordinate of the work area's left edge.
pub const WORK_AREA_LEFT: f64 = RULER_SIZE_PX + CANVAS_PADDING_PX;

/// Canvas y coordinate of the work area's top edge.
pub const WORK_AREA_TOP: f64 = RULER_SIZE_PX + CANVAS_PADDING_PX;

/// Document axis, used in validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal extent
    Width,
    /// Vertical extent
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Pixel size of the work area and of the whole canvas including chrome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasDimensions {
    /// Work area width in pixels.
    pub width_px: f64,
    /// Work area height in pixels.
    pub height_px: f64,
    /// Canvas width including rulers and padding.
    pub total_width: f64,
    /// Canvas height including rulers and padding.
    pub total_height: f64,
}

/// Converts between millimetres, canvas pixels and points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    px_per_mm: f64,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl UnitConverter {
    /// The converter used by the editor canvas.
    pub const STANDARD: UnitConverter = UnitConverter {
        px_per_mm: PX_PER_MM,
    };

    /// Creates a converter with a custom pixel density.
    pub const fn with_px_per_mm(px_per_mm: f64) -> Self {
        Self { px_per_mm }
    }

    pub fn px_per_mm(&self) -> f64 {
        self.px_per_mm
    }

    /// Pixels per typographic point.
    pub fn pt_to_px_ratio(&self) -> f64 {
        PT_TO_MM * self.px_per_mm
    }

    /// Font points to canvas pixels, rounded to two decimals.
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        (pt * self.pt_to_px_ratio() * 100.0).round() / 100.0
    }

    /// Canvas pixels to font points, rounded to one decimal.
    pub fn px_to_pt(&self, px: f64) -> f64 {
        (px / self.pt_to_px_ratio() * 10.0).round() / 10.0
    }

    pub fn mm_to_px(&self, mm: f64) -> f64 {
        mm * self.px_per_mm
    }

    /// Millimetres to whole pixels, as used for zone and grid geometry.
    pub fn mm_to_px_rounded(&self, mm: f64) -> f64 {
        self.mm_to_px(mm).round()
    }

    pub fn px_to_mm(&self, px: f64) -> f64 {
        px / self.px_per_mm
    }

    pub fn mm_to_pt(&self, mm: f64) -> f64 {
        mm * MM_TO_PT
    }

    /// Canvas pixels to PDF points via millimetres, without rounding.
    pub fn px_to_page_pt(&self, px: f64) -> f64 {
        self.mm_to_pt(self.px_to_mm(px))
    }

    /// Work area and total canvas size for a document of the given size.
    pub fn canvas_dimensions(&self, width_mm: f64, height_mm: f64) -> CanvasDimensions {
        let width_px = self.mm_to_px(width_mm);
        let height_px = self.mm_to_px(height_mm);
        CanvasDimensions {
            width_px,
            height_px,
            total_width: width_px + WORK_AREA_LEFT + CANVAS_PADDING_PX,
            total_height: height_px + WORK_AREA_TOP + CANVAS_PADDING_PX,
        }
    }
}
