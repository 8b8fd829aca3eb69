//! Interactive edits. Every geometry change goes through the constraint engine.

use stampkit_core::{WORK_AREA_LEFT, WORK_AREA_TOP};
use stampkit_settings::BoundaryMode;

use super::Scene;
use crate::constraints;
use crate::geometry::Point;
use crate::model::{Element, ElementId, StampShape, StampText, StyleProperty};

impl Scene {
    /// Switches the boundary mode and re-clamps every user element.
    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        self.boundary_mode = mode;
        let zone = self.active_zone();
        for element in &mut self.elements {
            constraints::clamp_position(element, zone);
        }
        tracing::debug!(%mode, "boundary mode changed");
    }

    /// Re-applies position clamping to every user element.
    pub fn clamp_all(&mut self) {
        let zone = self.active_zone();
        for element in &mut self.elements {
            constraints::clamp_position(element, zone);
        }
    }

    fn editable_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.element_mut(id).filter(|e| !e.is_locked())
    }

    /// Moves an anchor to `(left, top)`, snapping to the grid when enabled, then clamps.
    pub fn move_element(&mut self, id: ElementId, left: f64, top: f64) -> bool {
        let zone = self.active_zone();
        let grid = self.snap_to_grid.then(|| self.grid_px());
        let Some(element) = self.editable_mut(id) else {
            return false;
        };
        let mut target = Point::new(left, top);
        if let Some(grid) = grid {
            target = constraints::snap_to_grid(
                target,
                Point::new(WORK_AREA_LEFT, WORK_AREA_TOP),
                grid,
            );
        }
        let p = element.placement_mut();
        p.left = target.x;
        p.top = target.y;
        constraints::clamp_position(element, zone);
        true
    }

    /// Moves an element by a delta.
    pub fn nudge(&mut self, id: ElementId, dx: f64, dy: f64) -> bool {
        let Some(anchor) = self.element(id).map(|e| e.placement().anchor()) else {
            return false;
        };
        self.move_element(id, anchor.x + dx, anchor.y + dy)
    }

    /// Sets both scale factors as an interactive resize would, then shrinks to fit the zone.
    pub fn scale_element(&mut self, id: ElementId, scale_x: f64, scale_y: f64) -> bool {
        if !(scale_x.is_finite() && scale_y.is_finite()) || scale_x == 0.0 || scale_y == 0.0 {
            return false;
        }
        let zone = self.active_zone();
        let Some(element) = self.editable_mut(id) else {
            return false;
        };
        let is_text = matches!(element, Element::Text(_));
        let p = element.placement_mut();
        p.scale_x = scale_x;
        p.scale_y = scale_y;
        constraints::clamp_scaling(element, zone, is_text);
        true
    }

    /// Rotates to `angle` degrees with right-angle snapping, then clamps the position.
    pub fn rotate_element(&mut self, id: ElementId, angle: f64) -> bool {
        let zone = self.active_zone();
        let threshold = self.config.interaction.snap_threshold_deg;
        let Some(element) = self.editable_mut(id) else {
            return false;
        };
        element.placement_mut().angle = constraints::snap_rotation(angle, threshold);
        constraints::clamp_position(element, zone);
        true
    }

    /// Ends an interactive modification: text scale is folded back into the font size.
    pub fn finish_modification(&mut self, id: ElementId) -> bool {
        let units = self.units;
        let (min_pt, max_pt) = (self.config.text.min_font_pt, self.config.text.max_font_pt);
        let changed = match self.element_mut(id) {
            Some(Element::Text(text)) => {
                constraints::normalize_text_scale(text, &units, min_pt, max_pt)
            }
            _ => false,
        };
        if changed {
            self.relayout(id);
        }
        changed
    }

    /// Replaces the content of a text element and fits it back into the safety zone.
    pub fn finish_text_edit(&mut self, id: ElementId, content: &str) -> bool {
        let safety = self.safety_zone();
        let active = self.active_zone();
        let Some(Element::Text(text)) = self.element_mut(id) else {
            return false;
        };
        text.set_text(content);
        self.relayout(id);
        if let Some(Element::Text(text)) = self.element_mut(id) {
            constraints::auto_fit_text(text, safety, active);
        }
        true
    }

    fn edit_text<F>(&mut self, id: ElementId, relayout: bool, edit: F) -> bool
    where
        F: FnOnce(&mut StampText),
    {
        let Some(Element::Text(text)) = self.element_mut(id) else {
            return false;
        };
        edit(text);
        if relayout {
            self.relayout(id);
            let zone = self.active_zone();
            if let Some(element) = self.element_mut(id) {
                constraints::clamp_position(element, zone);
            }
        }
        true
    }

    pub fn set_font_family(&mut self, id: ElementId, family: &str) -> bool {
        self.edit_text(id, true, |t| {
            t.font_family = family.to_string();
            t.clear_style_property(StyleProperty::FontFamily);
        })
    }

    pub fn set_bold(&mut self, id: ElementId, bold: bool) -> bool {
        self.edit_text(id, true, |t| {
            t.bold = bold;
            t.clear_style_property(StyleProperty::Bold);
        })
    }

    pub fn set_italic(&mut self, id: ElementId, italic: bool) -> bool {
        self.edit_text(id, true, |t| {
            t.italic = italic;
            t.clear_style_property(StyleProperty::Italic);
        })
    }

    pub fn set_underline(&mut self, id: ElementId, underline: bool) -> bool {
        self.edit_text(id, false, |t| {
            t.underline = underline;
            t.clear_style_property(StyleProperty::Underline);
        })
    }

    pub fn set_fill(&mut self, id: ElementId, fill: &str) -> bool {
        self.edit_text(id, false, |t| {
            t.fill = fill.to_string();
            t.clear_style_property(StyleProperty::Fill);
        })
    }

    /// Sets the font size in points, bounded like the scale normalizer.
    pub fn set_font_size_pt(&mut self, id: ElementId, size_pt: f64) -> bool {
        if !size_pt.is_finite() || size_pt <= 0.0 {
            return false;
        }
        let pt = size_pt.clamp(self.config.text.min_font_pt, self.config.text.max_font_pt);
        let px = self.units.pt_to_px(pt);
        self.edit_text(id, true, |t| t.font_size = px)
    }

    /// Tracking in thousandths of an em.
    pub fn set_char_spacing(&mut self, id: ElementId, spacing: f64) -> bool {
        if !spacing.is_finite() {
            return false;
        }
        self.edit_text(id, true, |t| t.char_spacing = spacing)
    }

    pub fn set_line_height(&mut self, id: ElementId, line_height: f64) -> bool {
        if !line_height.is_finite() || line_height <= 0.0 {
            return false;
        }
        self.edit_text(id, true, |t| t.line_height = line_height)
    }

    /// Changes a frame's stroke and re-clamps it, since the stroke is part of the box.
    pub fn set_stroke(&mut self, id: ElementId, width_mm: f64, color: Option<&str>) -> bool {
        if !width_mm.is_finite() || width_mm < 0.0 {
            return false;
        }
        let zone = self.active_zone();
        let Some(Element::Frame(frame)) = self.element_mut(id) else {
            return false;
        };
        frame.stroke_width_mm = width_mm;
        if let Some(color) = color {
            frame.stroke_color = color.to_string();
        }
        constraints::clamp_position(frame, zone);
        true
    }
}
