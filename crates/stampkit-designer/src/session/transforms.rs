//! Geometry, style and alignment edits, each committed to history.

use stampkit_settings::BoundaryMode;

use super::StampSession;
use crate::alignment::{Edge, HAlign, VAlign};
use crate::model::{ElementId, TextAlign};

impl StampSession {
    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        self.scene.set_boundary_mode(mode);
        self.commit();
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.scene.set_snap_to_grid(enabled);
    }

    pub fn move_element(&mut self, id: ElementId, left: f64, top: f64) -> bool {
        let changed = self.scene.move_element(id, left, top);
        self.commit_if(changed)
    }

    pub fn nudge(&mut self, id: ElementId, dx: f64, dy: f64) -> bool {
        let changed = self.scene.nudge(id, dx, dy);
        self.commit_if(changed)
    }

    /// A complete resize gesture: clamped scaling, then text scale folded into the font size.
    pub fn scale_element(&mut self, id: ElementId, scale_x: f64, scale_y: f64) -> bool {
        if !self.scene.scale_element(id, scale_x, scale_y) {
            return false;
        }
        self.scene.finish_modification(id);
        self.commit();
        true
    }

    pub fn rotate_element(&mut self, id: ElementId, angle: f64) -> bool {
        let changed = self.scene.rotate_element(id, angle);
        self.commit_if(changed)
    }

    /// Ends inline text editing with the new content.
    pub fn edit_text(&mut self, id: ElementId, content: &str) -> bool {
        let changed = self.scene.finish_text_edit(id, content);
        self.commit_if(changed)
    }

    pub fn set_font_family(&mut self, id: ElementId, family: &str) -> bool {
        let changed = self.scene.set_font_family(id, family);
        self.commit_if(changed)
    }

    pub fn set_font_size_pt(&mut self, id: ElementId, size_pt: f64) -> bool {
        let changed = self.scene.set_font_size_pt(id, size_pt);
        self.commit_if(changed)
    }

    pub fn set_bold(&mut self, id: ElementId, bold: bool) -> bool {
        let changed = self.scene.set_bold(id, bold);
        self.commit_if(changed)
    }

    pub fn set_italic(&mut self, id: ElementId, italic: bool) -> bool {
        let changed = self.scene.set_italic(id, italic);
        self.commit_if(changed)
    }

    pub fn set_underline(&mut self, id: ElementId, underline: bool) -> bool {
        let changed = self.scene.set_underline(id, underline);
        self.commit_if(changed)
    }

    pub fn set_fill(&mut self, id: ElementId, fill: &str) -> bool {
        let changed = self.scene.set_fill(id, fill);
        self.commit_if(changed)
    }

    pub fn set_char_spacing(&mut self, id: ElementId, spacing: f64) -> bool {
        let changed = self.scene.set_char_spacing(id, spacing);
        self.commit_if(changed)
    }

    pub fn set_line_height(&mut self, id: ElementId, line_height: f64) -> bool {
        let changed = self.scene.set_line_height(id, line_height);
        self.commit_if(changed)
    }

    pub fn set_stroke(&mut self, id: ElementId, width_mm: f64, color: Option<&str>) -> bool {
        let changed = self.scene.set_stroke(id, width_mm, color);
        self.commit_if(changed)
    }

    pub fn set_text_align(&mut self, id: ElementId, align: TextAlign) -> bool {
        let changed = self.scene.set_text_align(id, align);
        self.commit_if(changed)
    }

    pub fn align_to_edge(&mut self, id: ElementId, edge: Edge) -> bool {
        let changed = self.scene.align_to_edge(id, edge);
        self.commit_if(changed)
    }

    pub fn center_horizontally(&mut self, id: ElementId) -> bool {
        let changed = self.scene.center_horizontally(id);
        self.commit_if(changed)
    }

    pub fn center_vertically(&mut self, id: ElementId) -> bool {
        let changed = self.scene.center_vertically(id);
        self.commit_if(changed)
    }

    pub fn center_both(&mut self, id: ElementId) -> bool {
        let changed = self.scene.center_both(id);
        self.commit_if(changed)
    }

    pub fn align(&mut self, id: ElementId, vertical: VAlign, horizontal: HAlign) -> bool {
        let changed = self.scene.align(id, vertical, horizontal);
        self.commit_if(changed)
    }

    pub fn fit_contain(&mut self, id: ElementId) -> bool {
        let changed = self.scene.fit_contain(id);
        self.commit_if(changed)
    }

    pub fn fit_width(&mut self, id: ElementId) -> bool {
        let changed = self.scene.fit_width(id);
        self.commit_if(changed)
    }

    pub fn fit_height(&mut self, id: ElementId) -> bool {
        let changed = self.scene.fit_height(id);
        self.commit_if(changed)
    }

    pub fn reset_proportions(&mut self, id: ElementId) -> bool {
        let changed = self.scene.reset_proportions(id);
        self.commit_if(changed)
    }

    pub fn split_by_lines(&mut self, id: ElementId) -> Vec<ElementId> {
        let created = self.scene.split_by_lines(id);
        self.commit_if(!created.is_empty());
        created
    }
}
