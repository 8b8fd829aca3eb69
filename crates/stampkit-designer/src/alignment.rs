//! Alignment and fit operations.
//!
//! These always work against the safety zone, whatever boundary mode is
//! active, so an aligned element is printable.

use serde::{Deserialize, Serialize};

use crate::constraints;
use crate::geometry::Point;
use crate::model::{
    Element, ElementId, ElementMeta, OriginX, OriginY, StampShape, StampText, TextAlign,
};
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    Center,
    Right,
}

impl Scene {
    fn shift(&mut self, id: ElementId, dx: f64, dy: f64) -> bool {
        match self.element_mut(id) {
            Some(element) if !element.is_locked() => {
                let p = element.placement_mut();
                p.left += dx;
                p.top += dy;
                true
            }
            _ => false,
        }
    }

    /// Moves the element so its bounding box touches one safety edge.
    pub fn align_to_edge(&mut self, id: ElementId, edge: Edge) -> bool {
        let zone = self.safety_zone();
        let Some(b) = self.element(id).map(|e| e.bounding_rect()) else {
            return false;
        };
        let (dx, dy) = match edge {
            Edge::Left => (zone.left - b.left, 0.0),
            Edge::Right => (zone.right() - b.right(), 0.0),
            Edge::Top => (0.0, zone.top - b.top),
            Edge::Bottom => (0.0, zone.bottom() - b.bottom()),
        };
        self.shift(id, dx, dy)
    }

    pub fn center_horizontally(&mut self, id: ElementId) -> bool {
        let target = self.safety_zone().center().x;
        let Some(center) = self.element(id).map(|e| e.center()) else {
            return false;
        };
        self.shift(id, target - center.x, 0.0)
    }

    pub fn center_vertically(&mut self, id: ElementId) -> bool {
        let target = self.safety_zone().center().y;
        let Some(center) = self.element(id).map(|e| e.center()) else {
            return false;
        };
        self.shift(id, 0.0, target - center.y)
    }

    pub fn center_both(&mut self, id: ElementId) -> bool {
        self.center_horizontally(id) && self.center_vertically(id)
    }

    /// Nine-point placement: edges come from the safety zone, centres from the work area.
    pub fn align(&mut self, id: ElementId, vertical: VAlign, horizontal: HAlign) -> bool {
        let zone = self.safety_zone();
        let work = self.work_area();
        let Some(b) = self.element(id).map(|e| e.bounding_rect()) else {
            return false;
        };
        let left = match horizontal {
            HAlign::Left => zone.left,
            HAlign::Center => work.center().x - b.width / 2.0,
            HAlign::Right => zone.right() - b.width,
        };
        let top = match vertical {
            VAlign::Top => zone.top,
            VAlign::Middle => work.center().y - b.height / 2.0,
            VAlign::Bottom => zone.bottom() - b.height,
        };
        self.shift(id, left - b.left, top - b.top)
    }

    /// Scales uniformly, up or down, until the bounding box inscribes the safety zone,
    /// then centres it.
    ///
    /// The ratio between the two scale axes is kept.
    pub fn fit_contain(&mut self, id: ElementId) -> bool {
        let zone = self.safety_zone();
        let Some(element) = self.element_mut(id).filter(|e| !e.is_locked()) else {
            return false;
        };
        let Some(ratio) = constraints::fit_ratio(&*element, zone) else {
            tracing::debug!(%id, "fit_contain skipped for degenerate element");
            return false;
        };
        let p = element.placement();
        if !(p.scale_x * ratio).is_finite() || !(p.scale_y * ratio).is_finite() {
            return false;
        }
        constraints::apply_uniform_scale(element, ratio);
        self.center_both(id)
    }

    /// Scales uniformly so the bounding width equals the safety zone width,
    /// then centres horizontally. The anchor's vertical position is unchanged.
    pub fn fit_width(&mut self, id: ElementId) -> bool {
        self.fit_axis(id, true)
    }

    /// Scales uniformly so the bounding height equals the safety zone height,
    /// then centres vertically.
    pub fn fit_height(&mut self, id: ElementId) -> bool {
        self.fit_axis(id, false)
    }

    fn fit_axis(&mut self, id: ElementId, horizontal: bool) -> bool {
        let zone = self.safety_zone();
        let Some(element) = self.element_mut(id).filter(|e| !e.is_locked()) else {
            return false;
        };
        let b = element.bounding_rect();
        let extent = if horizontal { b.width } else { b.height };
        if extent < 1.0 {
            return false;
        }
        let (r_w, r_h) = constraints::fit_ratios(&*element, zone);
        let ratio = if horizontal { r_w } else { r_h };
        let p = element.placement();
        let (sx, sy) = (p.scale_x * ratio, p.scale_y * ratio);
        if !(sx.is_finite() && sy.is_finite()) || sx <= 0.0 || sy <= 0.0 {
            tracing::debug!(%id, ratio, "fit skipped for degenerate scale");
            return false;
        }
        let p = element.placement_mut();
        p.scale_x = sx;
        p.scale_y = sy;
        if horizontal {
            self.center_horizontally(id)
        } else {
            self.center_vertically(id)
        }
    }

    /// Drops horizontal stretch.
    pub fn reset_proportions(&mut self, id: ElementId) -> bool {
        match self.element_mut(id) {
            Some(element) if !element.is_locked() => {
                element.placement_mut().scale_x = 1.0;
                true
            }
            _ => false,
        }
    }

    /// Sets text alignment and moves the anchor to the matching side while
    /// keeping the visual centre in place.
    pub fn set_text_align(&mut self, id: ElementId, align: TextAlign) -> bool {
        let Some(Element::Text(text)) = self.element_mut(id) else {
            return false;
        };
        let size = text.scaled_size();
        let center = text.placement.center(size);
        text.align = align;
        text.placement.origin_x = match align {
            TextAlign::Left => OriginX::Left,
            TextAlign::Right => OriginX::Right,
            TextAlign::Center | TextAlign::Justify => OriginX::Center,
        };
        text.placement
            .set_position_by_origin(center, OriginX::Center, OriginY::Center, size);
        true
    }

    /// Replaces a multi-line text element with one element per line, each
    /// placed where its line was drawn. Returns the new ids in line order.
    pub fn split_by_lines(&mut self, id: ElementId) -> Vec<ElementId> {
        let Some(Element::Text(original)) = self.element(id) else {
            return Vec::new();
        };
        if original.lines.len() < 2 || original.meta.locked {
            return Vec::new();
        }
        let original = original.clone();
        let p = original.placement;
        let top_left = p.point_by_origin(OriginX::Left, OriginY::Top, original.scaled_size());
        let line_step = original.font_size * original.line_height * p.scale_y;
        let (sin, cos) = p.angle.to_radians().sin_cos();
        let font = original.font_key();

        let pieces: Vec<StampText> = original
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let line_width = self.measurer().line_width(
                    line,
                    &font,
                    original.font_size,
                    original.char_spacing,
                );
                let align_offset = match original.align {
                    TextAlign::Left | TextAlign::Justify => 0.0,
                    TextAlign::Center => (original.width - line_width) / 2.0,
                    TextAlign::Right => original.width - line_width,
                } * p.scale_x;
                let dy = i as f64 * line_step;
                let position = Point::new(
                    top_left.x - sin * dy + cos * align_offset,
                    top_left.y + cos * dy + sin * align_offset,
                );

                let mut piece = original.clone();
                piece.meta = ElementMeta::new(format!("{} (line {})", original.meta.name, i + 1));
                piece.meta.visible = original.meta.visible;
                piece.lines = vec![line.clone()];
                piece.styles = original.styles_for_line(i);
                piece.placement.origin_x = OriginX::Left;
                piece.placement.origin_y = OriginY::Top;
                piece.placement.left = position.x;
                piece.placement.top = position.y;
                piece
            })
            .collect();

        self.delete(&[id]);
        let ids: Vec<ElementId> = pieces.into_iter().map(|piece| self.push_text(piece)).collect();
        self.clear_selection();
        tracing::debug!(%id, lines = ids.len(), "split text into lines");
        ids
    }
}
