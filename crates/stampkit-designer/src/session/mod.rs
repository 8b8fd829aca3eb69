//! One open stamp document: the scene plus its undo history.
//!
//! Every mutating operation goes through the session so that a snapshot is
//! committed after it. Naming counters, history stacks and file state live
//! here, never in process-wide statics.
//!
//! This module is split into submodules:
//! - `elements`: creation, deletion and layer operations
//! - `transforms`: moves, scaling, rotation, styles and alignment
//! - `history`: snapshot commits, undo and redo
//! - `file_io`: saving and loading design files
//! - `export`: PDF export and scene descriptions

mod elements;
mod export;
mod file_io;
mod history;
mod transforms;

use std::path::PathBuf;
use std::sync::Arc;

use stampkit_core::Result;
use stampkit_settings::EditorConfig;

use crate::document::StampSize;
use crate::history::HistoryManager;
use crate::scene::Scene;
use crate::text_metrics::{ApproximateMeasurer, TextMeasurer};

pub struct StampSession {
    scene: Scene,
    history: HistoryManager,
    pub design_name: String,
    pub current_file_path: Option<PathBuf>,
    pub is_modified: bool,
}

impl StampSession {
    /// Creates a session that measures text with the built-in glyph classes.
    pub fn new(size: StampSize, config: EditorConfig) -> Self {
        Self::with_measurer(size, config, Arc::new(ApproximateMeasurer))
    }

    pub fn with_measurer(
        size: StampSize,
        config: EditorConfig,
        measurer: Arc<dyn TextMeasurer>,
    ) -> Self {
        Self::from_scene(Scene::new(size, config, measurer))
    }

    /// Wraps an existing scene; its current elements become the first history entry.
    pub fn from_scene(scene: Scene) -> Self {
        let mut session = Self {
            history: HistoryManager::new(scene.config().interaction.history_depth),
            scene,
            design_name: "Untitled".to_string(),
            current_file_path: None,
            is_modified: false,
        };
        session.save_state();
        session
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        self.scene.config()
    }

    /// Changes the document size. The new size is validated before anything changes.
    pub fn resize(&mut self, width_mm: f64, height_mm: f64) -> Result<()> {
        let size = StampSize::custom(width_mm, height_mm, &self.scene.config().document)?;
        self.scene.resize(size);
        self.scene.clamp_all();
        self.commit();
        Ok(())
    }

    /// Switches to another size, typically one of [`StampSize::predefined`].
    pub fn resize_to(&mut self, size: StampSize) -> Result<()> {
        size.validate(&self.scene.config().document)?;
        self.scene.resize(size);
        self.scene.clamp_all();
        self.commit();
        Ok(())
    }

    pub fn set_guides_visible(&mut self, visible: bool) {
        self.scene.set_guides_visible(visible);
    }

    pub fn set_background(&mut self, color: &str) {
        self.scene.set_background(color);
    }

    pub fn zoom_in(&mut self) {
        self.scene.viewport_mut().zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.scene.viewport_mut().zoom_out();
    }

    pub fn reset_view(&mut self) {
        self.scene.viewport_mut().reset();
    }
}
