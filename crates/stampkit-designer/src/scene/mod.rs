//! The scene: system guides plus the ordered list of user elements.
//!
//! Guides and user elements are kept in separate lists, so the z-order of
//! every user element is always above all system geometry and nothing that
//! iterates `elements()` can pick up a guide.
//!
//! This module is split into submodules:
//! - `layers`: creation, deletion, duplication and z-order
//! - `selection`: the active selection
//! - `transform`: interactive moves, scaling and rotation through the constraint engine

mod layers;
mod selection;
mod transform;

use std::sync::Arc;

use stampkit_core::{UnitConverter, WORK_AREA_LEFT, WORK_AREA_TOP};
use stampkit_settings::{BoundaryMode, EditorConfig};

use crate::document::StampSize;
use crate::geometry::Rect;
use crate::model::{Element, ElementId, GuideKind, StampShape, SystemGuide};
use crate::text_metrics::TextMeasurer;
use crate::viewport::Viewport;

pub use layers::{FrameOptions, TextOptions};
pub use selection::Selection;

/// Canvas background outside the work area.
pub const DEFAULT_BACKGROUND: &str = "#e5e5e5";

/// All geometry of one open document.
#[derive(Debug, Clone)]
pub struct Scene {
    size: StampSize,
    units: UnitConverter,
    config: EditorConfig,
    boundary_mode: BoundaryMode,
    snap_to_grid: bool,
    guides: Vec<SystemGuide>,
    elements: Vec<Element>,
    selection: Selection,
    viewport: Viewport,
    background: String,
    text_counter: u32,
    frame_counter: u32,
    measurer: Arc<dyn TextMeasurer>,
}

impl Scene {
    pub fn new(size: StampSize, config: EditorConfig, measurer: Arc<dyn TextMeasurer>) -> Self {
        let mut scene = Self {
            size,
            units: UnitConverter::STANDARD,
            boundary_mode: config.interaction.boundary_mode,
            snap_to_grid: config.interaction.snap_to_grid,
            config,
            guides: Vec::new(),
            elements: Vec::new(),
            selection: Selection::new(),
            viewport: Viewport::new(),
            background: DEFAULT_BACKGROUND.to_string(),
            text_counter: 0,
            frame_counter: 0,
            measurer,
        };
        scene.guides = scene.build_guides();
        scene
    }

    fn build_guides(&self) -> Vec<SystemGuide> {
        let work = self.work_area();
        let safety = self.units.mm_to_px_rounded(self.config.layout.safety_margin_mm);
        vec![
            SystemGuide::new(GuideKind::WorkArea, work),
            SystemGuide::new(GuideKind::Border, work),
            SystemGuide::new(GuideKind::Safety, work.inflate(-safety)),
        ]
    }

    pub fn size(&self) -> &StampSize {
        &self.size
    }

    pub fn units(&self) -> &UnitConverter {
        &self.units
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    /// Changes the document size and re-derives every guide.
    ///
    /// Elements keep their positions; callers re-clamp if they need to.
    pub fn resize(&mut self, size: StampSize) {
        tracing::info!(from = %self.size, to = %size, "resizing document");
        let visibility: Vec<bool> = self.guides.iter().map(|g| g.visible).collect();
        self.size = size;
        self.guides = self.build_guides();
        for (guide, visible) in self.guides.iter_mut().zip(visibility) {
            guide.visible = visible;
        }
    }

    /// The printable surface, in canvas pixels.
    pub fn work_area(&self) -> Rect {
        let dims = self
            .units
            .canvas_dimensions(self.size.width_mm, self.size.height_mm);
        Rect::new(WORK_AREA_LEFT, WORK_AREA_TOP, dims.width_px, dims.height_px)
    }

    /// The constraint rectangle for `mode`, on whole-pixel geometry.
    pub fn zone(&self, mode: BoundaryMode) -> Rect {
        let layout = &self.config.layout;
        let work = Rect::new(
            WORK_AREA_LEFT,
            WORK_AREA_TOP,
            self.units.mm_to_px_rounded(self.size.width_mm),
            self.units.mm_to_px_rounded(self.size.height_mm),
        );
        match mode {
            BoundaryMode::Safety => work.inflate(-self.units.mm_to_px_rounded(layout.safety_margin_mm)),
            BoundaryMode::Print => work,
            BoundaryMode::Unlocked => work.inflate(self.units.mm_to_px_rounded(layout.extra_margin_mm)),
        }
    }

    pub fn active_zone(&self) -> Rect {
        self.zone(self.boundary_mode)
    }

    pub fn safety_zone(&self) -> Rect {
        self.zone(BoundaryMode::Safety)
    }

    pub fn boundary_mode(&self) -> BoundaryMode {
        self.boundary_mode
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    pub fn grid_px(&self) -> f64 {
        self.units.mm_to_px_rounded(self.config.layout.grid_mm)
    }

    pub fn guides(&self) -> &[SystemGuide] {
        &self.guides
    }

    pub fn guide(&self, kind: GuideKind) -> Option<&SystemGuide> {
        self.guides.iter().find(|g| g.kind == kind)
    }

    /// Shows or hides every guide at once.
    pub fn set_guides_visible(&mut self, visible: bool) {
        for guide in &mut self.guides {
            guide.visible = visible;
        }
    }

    pub(crate) fn guides_mut(&mut self) -> &mut [SystemGuide] {
        &mut self.guides
    }

    /// User elements, bottom to top.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    pub(crate) fn position_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id() == id)
    }

    /// Z index across guides and elements; user elements start at `guides().len()`.
    pub fn z_index(&self, id: ElementId) -> Option<usize> {
        self.position_of(id).map(|pos| pos + self.guides.len())
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    /// Selects a single element. Locked and hidden elements cannot be selected.
    pub fn select(&mut self, id: ElementId) -> bool {
        match self.element(id) {
            Some(e) if e.is_visible() && !e.is_locked() => {
                self.selection.set(id);
                true
            }
            _ => false,
        }
    }

    /// Selects every listed element that can be selected.
    pub fn select_many(&mut self, ids: &[ElementId]) {
        let selectable: Vec<ElementId> = ids
            .iter()
            .copied()
            .filter(|id| {
                self.element(*id)
                    .is_some_and(|e| e.is_visible() && !e.is_locked())
            })
            .collect();
        self.selection.set_many(selectable);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.background = color.into();
    }

    /// Recomputes the block size of a text element after content or font edits.
    pub(crate) fn relayout(&mut self, id: ElementId) {
        let measurer = Arc::clone(&self.measurer);
        if let Some(Element::Text(text)) = self.element_mut(id) {
            text.relayout(measurer.as_ref());
        }
    }

    /// Replaces all user elements, e.g. when restoring a snapshot.
    pub(crate) fn replace_elements(&mut self, elements: Vec<Element>) {
        self.elements = elements;
        self.selection.clear();
    }

    /// Bounding boxes of all visible user elements.
    pub fn content_bounds(&self) -> Option<Rect> {
        let rects: Vec<Rect> = self
            .elements
            .iter()
            .filter(|e| e.is_visible())
            .map(|e| e.bounding_rect())
            .collect();
        if rects.is_empty() {
            return None;
        }
        let corners: Vec<_> = rects
            .iter()
            .flat_map(|r| {
                [
                    crate::geometry::Point::new(r.left, r.top),
                    crate::geometry::Point::new(r.right(), r.bottom()),
                ]
            })
            .collect();
        Some(Rect::enclosing(&corners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_metrics::ApproximateMeasurer;

    fn scene(w: f64, h: f64) -> Scene {
        Scene::new(
            StampSize::custom(w, h, &Default::default()).unwrap(),
            EditorConfig::default(),
            Arc::new(ApproximateMeasurer),
        )
    }

    #[test]
    fn test_zones_for_default_size() {
        let s = scene(47.0, 18.0);
        assert_eq!(s.zone(BoundaryMode::Print), Rect::new(64.0, 64.0, 178.0, 68.0));
        assert_eq!(s.zone(BoundaryMode::Safety), Rect::new(68.0, 68.0, 170.0, 60.0));
        assert_eq!(
            s.zone(BoundaryMode::Unlocked),
            Rect::new(26.0, 26.0, 254.0, 144.0)
        );
        assert_eq!(s.active_zone(), s.safety_zone());
    }

    #[test]
    fn test_guides_follow_resize() {
        let mut s = scene(47.0, 18.0);
        assert_eq!(s.guides().len(), 3);
        s.set_guides_visible(false);
        s.resize(StampSize::custom(58.0, 22.0, &Default::default()).unwrap());
        let work = s.guide(GuideKind::WorkArea).unwrap();
        assert!((work.rect.width - 58.0 * stampkit_core::PX_PER_MM).abs() < 1e-9);
        assert!(!work.visible);
        let safety = s.guide(GuideKind::Safety).unwrap();
        assert!((safety.rect.left - 68.0).abs() < 1e-9);
    }
}
