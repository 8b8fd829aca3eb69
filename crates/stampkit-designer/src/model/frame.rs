use serde::{Deserialize, Serialize};

use super::{ElementMeta, OriginX, OriginY, Placement, StampShape};
use stampkit_core::UnitConverter;

/// Stroke-only rectangular border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampFrame {
    #[serde(flatten)]
    pub meta: ElementMeta,
    #[serde(flatten)]
    pub placement: Placement,
    pub width: f64,
    pub height: f64,
    pub stroke_width_mm: f64,
    pub stroke_color: String,
}

impl StampFrame {
    pub fn new(name: impl Into<String>, left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            meta: ElementMeta::new(name),
            placement: Placement::new(left, top, OriginX::Left, OriginY::Top),
            width,
            height,
            stroke_width_mm: 0.5,
            stroke_color: "#000000".to_string(),
        }
    }
}

impl StampShape for StampFrame {
    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn intrinsic_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn stroke_px(&self) -> f64 {
        UnitConverter::STANDARD.mm_to_px(self.stroke_width_mm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_is_not_scaled() {
        let mut frame = StampFrame::new("Frame 1", 0.0, 0.0, 100.0, 50.0);
        frame.stroke_width_mm = 1.0;
        frame.placement.scale_x = 2.0;
        let (w, h) = frame.scaled_size();
        let stroke = UnitConverter::STANDARD.mm_to_px(1.0);
        assert!((w - (200.0 + stroke)).abs() < 1e-9);
        assert!((h - (50.0 + stroke)).abs() < 1e-9);
    }
}
