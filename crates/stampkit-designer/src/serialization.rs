//! Serialization and deserialization for stamp design files.
//!
//! A design is stored as JSON with its document size, boundary mode and the
//! full list of user elements. Guides are never written. A second, flatter
//! form ([`SceneDescription`]) carries page-space transforms for renderers
//! that do not know the editor's canvas coordinates.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use stampkit_settings::{BoundaryMode, EditorConfig};

use crate::document::StampSize;
use crate::export::PageMapper;
use crate::model::{Element, ElementId, ElementKind, StampShape, TextAlign};
use crate::scene::Scene;
use crate::text_metrics::TextMeasurer;

/// Design file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete design file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignFile {
    pub version: String,
    pub metadata: DesignMetadata,
    #[serde(default)]
    pub viewport: ViewportState,
    pub size: StampSize,
    #[serde(default)]
    pub boundary_mode: BoundaryMode,
    #[serde(default)]
    pub snap_to_grid: bool,
    pub elements: Vec<Element>,
}

/// Design metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Viewport state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl DesignFile {
    /// Creates an empty design of the default size.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DesignMetadata {
                name: name.into(),
                created: now,
                modified: now,
                author: String::new(),
                description: String::new(),
            },
            viewport: ViewportState::default(),
            size: StampSize::default(),
            boundary_mode: BoundaryMode::default(),
            snap_to_grid: false,
            elements: Vec::new(),
        }
    }

    /// Captures the current state of `scene`.
    pub fn from_scene(scene: &Scene, name: impl Into<String>) -> Self {
        let mut design = Self::new(name);
        let viewport = scene.viewport();
        design.viewport = ViewportState {
            zoom: viewport.zoom(),
            pan_x: viewport.pan_x(),
            pan_y: viewport.pan_y(),
        };
        design.size = scene.size().clone();
        design.boundary_mode = scene.boundary_mode();
        design.snap_to_grid = scene.snap_to_grid();
        design.elements = scene.elements().to_vec();
        design
    }

    /// Builds a scene from this design. The size is validated first, so an
    /// invalid file never produces a partially built scene.
    pub fn to_scene(&self, config: EditorConfig, measurer: Arc<dyn TextMeasurer>) -> Result<Scene> {
        self.size
            .validate(&config.document)
            .context("Design file has an unsupported document size")?;

        let mut scene = Scene::new(self.size.clone(), config, measurer);
        scene.set_snap_to_grid(self.snap_to_grid);
        let elements: Vec<Element> = self
            .elements
            .iter()
            .cloned()
            .map(|mut element| {
                if let Element::Text(text) = &mut element {
                    text.relayout(scene.measurer());
                }
                element
            })
            .collect();
        scene.replace_elements(elements);
        scene.sync_counters();
        scene.set_boundary_mode(self.boundary_mode);

        let viewport = scene.viewport_mut();
        viewport.set_zoom(self.viewport.zoom);
        viewport.set_pan(self.viewport.pan_x, self.viewport.pan_y);
        Ok(scene)
    }

    /// Save design to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize design")?;

        std::fs::write(path.as_ref(), json).context("Failed to write design file")?;
        tracing::info!(path = %path.as_ref().display(), elements = self.elements.len(), "design saved");

        Ok(())
    }

    /// Load design from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read design file")?;

        let mut design: DesignFile =
            serde_json::from_str(&content).context("Failed to parse design file")?;

        design.metadata.modified = Utc::now();
        tracing::info!(path = %path.as_ref().display(), elements = design.elements.len(), "design loaded");

        Ok(design)
    }
}

/// Page-space description of a scene for an external renderer.
///
/// Positions are element centres in points from the bottom-left page corner;
/// angles are counter-clockwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    pub width_mm: f64,
    pub height_mm: f64,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
    pub elements: Vec<ElementDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementDescription {
    pub id: ElementId,
    pub name: String,
    pub kind: ElementKind,
    pub center_x_pt: f64,
    pub center_y_pt: f64,
    pub angle_deg: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Unscaled content width
    pub width_pt: f64,
    /// Unscaled content height
    pub height_pt: f64,
    pub content: ElementContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementContent {
    Text {
        lines: Vec<String>,
        font_family: String,
        font_size_pt: f64,
        bold: bool,
        italic: bool,
        underline: bool,
        align: TextAlign,
        fill: String,
        char_spacing: f64,
        line_height: f64,
    },
    Frame {
        stroke_width_pt: f64,
        stroke_color: String,
    },
}

impl SceneDescription {
    /// Describes every visible user element in z-order.
    pub fn from_scene(scene: &Scene) -> Self {
        let mapper = PageMapper::new(scene.size());
        let units = scene.units();
        let (page_width_pt, page_height_pt) = mapper.page_size();

        let elements = scene
            .elements()
            .iter()
            .filter(|e| e.is_visible())
            .map(|element| {
                let center = mapper.point(element.center());
                let placement = element.placement();
                let (width, height) = element.intrinsic_size();
                let content = match element {
                    Element::Text(t) => ElementContent::Text {
                        lines: t.lines.clone(),
                        font_family: t.font_family.clone(),
                        font_size_pt: units.px_to_pt(t.font_size),
                        bold: t.bold,
                        italic: t.italic,
                        underline: t.underline,
                        align: t.align,
                        fill: t.fill.clone(),
                        char_spacing: t.char_spacing,
                        line_height: t.line_height,
                    },
                    Element::Frame(f) => ElementContent::Frame {
                        stroke_width_pt: units.mm_to_pt(f.stroke_width_mm),
                        stroke_color: f.stroke_color.clone(),
                    },
                };
                ElementDescription {
                    id: element.id(),
                    name: element.name().to_string(),
                    kind: element.kind(),
                    center_x_pt: center.x,
                    center_y_pt: center.y,
                    angle_deg: -placement.angle,
                    scale_x: placement.scale_x,
                    scale_y: placement.scale_y,
                    width_pt: mapper.length(width),
                    height_pt: mapper.length(height),
                    content,
                }
            })
            .collect();

        Self {
            width_mm: scene.size().width_mm,
            height_mm: scene.size().height_mm,
            page_width_pt,
            page_height_pt,
            elements,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize scene description")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{FrameOptions, TextOptions};
    use crate::text_metrics::ApproximateMeasurer;

    fn scene() -> Scene {
        Scene::new(
            StampSize::default(),
            EditorConfig::default(),
            Arc::new(ApproximateMeasurer),
        )
    }

    #[test]
    fn test_design_round_trip_keeps_ids_and_order() {
        let mut s = scene();
        let frame = s.add_frame(FrameOptions::default());
        let text = s.add_text(TextOptions::default());
        s.set_boundary_mode(BoundaryMode::Print);

        let design = DesignFile::from_scene(&s, "Office");
        let json = serde_json::to_string(&design).unwrap();
        let loaded: DesignFile = serde_json::from_str(&json).unwrap();
        let restored = loaded
            .to_scene(EditorConfig::default(), Arc::new(ApproximateMeasurer))
            .unwrap();

        let ids: Vec<_> = restored.elements().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![frame, text]);
        assert_eq!(restored.boundary_mode(), BoundaryMode::Print);
        assert_eq!(restored.elements(), s.elements());
    }

    #[test]
    fn test_invalid_size_is_rejected() {
        let mut design = DesignFile::new("Too big");
        design.size.width_mm = 500.0;
        let result = design.to_scene(EditorConfig::default(), Arc::new(ApproximateMeasurer));
        assert!(result.is_err());
    }

    #[test]
    fn test_loaded_names_continue_counters() {
        let mut s = scene();
        s.add_text(TextOptions::default());
        s.add_text(TextOptions::default());
        let design = DesignFile::from_scene(&s, "Counters");
        let mut restored = design
            .to_scene(EditorConfig::default(), Arc::new(ApproximateMeasurer))
            .unwrap();
        let id = restored.add_text(TextOptions::default());
        assert_eq!(restored.element(id).unwrap().name(), "Text 3");
    }

    #[test]
    fn test_description_uses_page_coordinates() {
        let mut s = scene();
        let id = s.add_frame(FrameOptions {
            margin_mm: 0.0,
            ..Default::default()
        });
        assert!(s.element(id).is_some());
        let description = SceneDescription::from_scene(&s);
        assert!((description.page_width_pt - 47.0 * 72.0 / 25.4).abs() < 1e-9);
        let frame = &description.elements[0];
        assert!((frame.center_x_pt - description.page_width_pt / 2.0).abs() < 1e-6);
        assert!((frame.center_y_pt - description.page_height_pt / 2.0).abs() < 1e-6);
        match &frame.content {
            ElementContent::Frame { stroke_width_pt, .. } => {
                assert!((stroke_width_pt - 0.5 * 72.0 / 25.4).abs() < 1e-9)
            }
            other => panic!("unexpected content {:?}", other),
        }
    }
}
