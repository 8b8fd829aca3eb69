//! Element creation, removal, duplication and z-order.

use stampkit_core::{WORK_AREA_LEFT, WORK_AREA_TOP};

use super::Scene;
use crate::model::{Element, ElementId, StampFrame, StampShape, StampText};

/// Options for a new text element. Unset fields come from the text settings.
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub text: Option<String>,
    pub font_family: Option<String>,
    /// Size in points
    pub font_size_pt: Option<f64>,
    pub fill: Option<String>,
    pub char_spacing: Option<f64>,
}

/// Options for a new rectangular frame.
#[derive(Debug, Clone)]
pub struct FrameOptions {
    pub stroke_width_mm: f64,
    pub stroke_color: String,
    /// Inset from the work-area edge
    pub margin_mm: f64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            stroke_width_mm: 0.5,
            stroke_color: "#000000".to_string(),
            margin_mm: 2.0,
        }
    }
}

const DEFAULT_TEXT: &str = "Stamp";

impl Scene {
    /// Adds a text element centred horizontally near the top of the work area and selects it.
    pub fn add_text(&mut self, options: TextOptions) -> ElementId {
        self.text_counter += 1;
        let settings = &self.config.text;
        let size_pt = options.font_size_pt.unwrap_or(settings.default_size_pt);
        let family = options
            .font_family
            .unwrap_or_else(|| settings.default_family.clone());
        let content = options.text.unwrap_or_else(|| DEFAULT_TEXT.to_string());
        let size_px = self.units.pt_to_px(size_pt);

        let mut text = StampText::new(
            format!("Text {}", self.text_counter),
            &content,
            &family,
            size_px,
        );
        text.line_height = settings.line_height;
        if let Some(fill) = options.fill {
            text.fill = fill;
        }
        text.char_spacing = options.char_spacing.unwrap_or(0.0);

        let work = self.work_area();
        let safety = self.units.mm_to_px_rounded(self.config.layout.safety_margin_mm);
        text.placement.left = WORK_AREA_LEFT + work.width / 2.0;
        text.placement.top = WORK_AREA_TOP + safety + size_px / 1.5;
        text.relayout(self.measurer.as_ref());

        let id = text.meta.id;
        tracing::debug!(%id, name = %text.meta.name, size_pt, "added text");
        self.elements.push(Element::Text(text));
        self.selection.set(id);
        id
    }

    /// Adds a frame inset by `margin_mm` on every side and selects it.
    pub fn add_frame(&mut self, options: FrameOptions) -> ElementId {
        self.frame_counter += 1;
        let work = self.work_area();
        let margin = self.units.mm_to_px(options.margin_mm);
        let stroke = self.units.mm_to_px(options.stroke_width_mm);

        let mut frame = StampFrame::new(
            format!("Frame {}", self.frame_counter),
            WORK_AREA_LEFT + margin,
            WORK_AREA_TOP + margin,
            (work.width - margin * 2.0 - stroke).max(0.0),
            (work.height - margin * 2.0 - stroke).max(0.0),
        );
        frame.stroke_width_mm = options.stroke_width_mm;
        frame.stroke_color = options.stroke_color;

        let id = frame.meta.id;
        tracing::debug!(%id, name = %frame.meta.name, "added frame");
        self.elements.push(Element::Frame(frame));
        self.selection.set(id);
        id
    }

    /// Inserts an already built element on top, e.g. from a loaded file.
    pub fn insert_element(&mut self, element: Element) -> ElementId {
        let id = element.id();
        self.elements.push(element);
        id
    }

    /// Advances the naming counters past every "Text N" and "Frame N" in the scene.
    pub(crate) fn sync_counters(&mut self) {
        for element in &self.elements {
            let name = element.name();
            let number = |prefix: &str| {
                name.strip_prefix(prefix)
                    .and_then(|rest| rest.trim().parse::<u32>().ok())
            };
            if let Some(n) = number("Text ") {
                self.text_counter = self.text_counter.max(n);
            }
            if let Some(n) = number("Frame ") {
                self.frame_counter = self.frame_counter.max(n);
            }
        }
    }

    pub(crate) fn reset_counters(&mut self) {
        self.text_counter = 0;
        self.frame_counter = 0;
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        match self.position_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                let element = self.elements.remove(pos);
                self.elements.push(element);
                true
            }
            _ => false,
        }
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        match self.position_of(id) {
            Some(pos) if pos > 0 => {
                let element = self.elements.remove(pos);
                self.elements.insert(0, element);
                true
            }
            _ => false,
        }
    }

    pub fn move_up(&mut self, id: ElementId) -> bool {
        match self.position_of(id) {
            Some(pos) if pos + 1 < self.elements.len() => {
                self.elements.swap(pos, pos + 1);
                true
            }
            _ => false,
        }
    }

    pub fn move_down(&mut self, id: ElementId) -> bool {
        match self.position_of(id) {
            Some(pos) if pos > 0 => {
                self.elements.swap(pos, pos - 1);
                true
            }
            _ => false,
        }
    }

    /// Moves an element to a z index; indexes below the guides are clamped to just above them.
    pub fn move_to_index(&mut self, id: ElementId, z_index: usize) -> bool {
        let Some(pos) = self.position_of(id) else {
            return false;
        };
        let target = z_index
            .saturating_sub(self.guides.len())
            .min(self.elements.len() - 1);
        if target == pos {
            return false;
        }
        let element = self.elements.remove(pos);
        self.elements.insert(target, element);
        true
    }

    /// Flips the lock flag and returns the new state. Locking drops the element from the selection.
    pub fn toggle_lock(&mut self, id: ElementId) -> Option<bool> {
        let element = self.element_mut(id)?;
        let meta = element.meta_mut();
        meta.locked = !meta.locked;
        let locked = meta.locked;
        if locked {
            self.selection.remove(id);
        }
        Some(locked)
    }

    /// Flips visibility and returns the new state. Hiding clears the selection.
    pub fn toggle_visibility(&mut self, id: ElementId) -> Option<bool> {
        let element = self.element_mut(id)?;
        let meta = element.meta_mut();
        meta.visible = !meta.visible;
        let visible = meta.visible;
        if !visible {
            self.selection.clear();
        }
        Some(visible)
    }

    pub fn rename(&mut self, id: ElementId, name: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.meta_mut().name = name.into();
                true
            }
            None => false,
        }
    }

    /// Clones each listed element with an offset and a " (Copy)" suffix.
    ///
    /// Relative positions within the batch are kept. The copies become the selection.
    pub fn duplicate(&mut self, ids: &[ElementId]) -> Vec<ElementId> {
        let offset = self.config.interaction.duplicate_offset_px;
        let mut created = Vec::new();
        for id in ids {
            let Some(source) = self.element(*id) else {
                continue;
            };
            let mut copy = source.clone();
            let meta = copy.meta_mut();
            meta.id = ElementId::new();
            meta.name = format!("{} (Copy)", meta.name);
            let p = copy.placement_mut();
            p.left += offset;
            p.top += offset;
            match copy {
                Element::Text(_) => self.text_counter += 1,
                Element::Frame(_) => self.frame_counter += 1,
            }
            created.push(copy.id());
            self.elements.push(copy);
        }
        if !created.is_empty() {
            tracing::debug!(count = created.len(), "duplicated elements");
            self.selection.set_many(created.clone());
        }
        created
    }

    /// Removes the listed elements. Unknown ids are ignored; returns how many were removed.
    pub fn delete(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !ids.contains(&e.id()));
        for id in ids {
            self.selection.remove(*id);
        }
        before - self.elements.len()
    }

    /// Appends a text element built elsewhere (e.g. line splitting) and relayouts it.
    pub(crate) fn push_text(&mut self, mut text: StampText) -> ElementId {
        text.relayout(self.measurer.as_ref());
        let id = text.meta.id;
        self.elements.push(Element::Text(text));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StampSize;
    use crate::text_metrics::ApproximateMeasurer;
    use stampkit_settings::EditorConfig;
    use std::sync::Arc;

    fn scene() -> Scene {
        Scene::new(
            StampSize::default(),
            EditorConfig::default(),
            Arc::new(ApproximateMeasurer),
        )
    }

    #[test]
    fn test_add_text_defaults() {
        let mut s = scene();
        let id = s.add_text(TextOptions::default());
        let text = s.element(id).and_then(Element::as_text).unwrap();
        assert_eq!(text.meta.name, "Text 1");
        assert_eq!(text.text(), "Stamp");
        assert_eq!(text.font_family, "Myriad Pro");
        assert_eq!(text.font_size, 13.33);
        assert!((text.placement.left - (64.0 + 47.0 * stampkit_core::PX_PER_MM / 2.0)).abs() < 1e-9);
        assert!((text.placement.top - (64.0 + 4.0 + 13.33 / 1.5)).abs() < 1e-9);
        assert!(text.width > 0.0);
        assert_eq!(s.selection().primary(), Some(id));
    }

    #[test]
    fn test_add_frame_geometry() {
        let mut s = scene();
        let id = s.add_frame(FrameOptions::default());
        let frame = s.element(id).and_then(Element::as_frame).unwrap();
        let b = frame.bounding_rect();
        let margin = 2.0 * stampkit_core::PX_PER_MM;
        assert!((b.left - (64.0 + margin)).abs() < 1e-9);
        assert!((b.right() - (64.0 + s.work_area().width - margin)).abs() < 1e-9);
        assert_eq!(frame.meta.name, "Frame 1");
    }

    #[test]
    fn test_z_order_stays_above_guides() {
        let mut s = scene();
        let a = s.add_frame(FrameOptions::default());
        let b = s.add_text(TextOptions::default());
        assert_eq!(s.z_index(a), Some(3));
        assert!(s.send_to_back(b));
        assert_eq!(s.z_index(b), Some(3));
        assert!(!s.move_down(b));
        assert!(s.move_to_index(a, 0));
        assert_eq!(s.z_index(a), Some(3));
    }

    #[test]
    fn test_duplicate_and_delete() {
        let mut s = scene();
        let a = s.add_text(TextOptions::default());
        let copies = s.duplicate(&[a]);
        assert_eq!(copies.len(), 1);
        let copy = s.element(copies[0]).unwrap();
        assert_eq!(copy.name(), "Text 1 (Copy)");
        assert_eq!(s.selection().ids(), copies.as_slice());

        assert_eq!(s.delete(&[a, copies[0], ElementId::new()]), 2);
        assert!(s.elements().is_empty());
        assert!(s.selection().is_empty());
    }

    #[test]
    fn test_hidden_and_locked_are_not_selectable() {
        let mut s = scene();
        let a = s.add_text(TextOptions::default());
        assert_eq!(s.toggle_visibility(a), Some(false));
        assert!(s.selection().is_empty());
        assert!(!s.select(a));
        s.toggle_visibility(a);
        assert_eq!(s.toggle_lock(a), Some(true));
        assert!(!s.select(a));
    }
}
