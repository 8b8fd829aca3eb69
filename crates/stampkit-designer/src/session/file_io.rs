//! File I/O operations (save, load, new) for a session.

use std::path::Path;
use std::sync::Arc;

use stampkit_settings::EditorConfig;

use super::StampSession;
use crate::serialization::DesignFile;
use crate::text_metrics::TextMeasurer;

impl StampSession {
    /// Save design to file.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let design = DesignFile::from_scene(&self.scene, &self.design_name);
        design.save_to_file(&path)?;

        self.current_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Opens a design file as a new session with fresh history.
    pub fn load_from_file(
        path: impl AsRef<Path>,
        config: EditorConfig,
        measurer: Arc<dyn TextMeasurer>,
    ) -> anyhow::Result<Self> {
        let design = DesignFile::load_from_file(&path)?;
        let scene = design.to_scene(config, measurer)?;

        let mut session = Self::from_scene(scene);
        session.design_name = design.metadata.name;
        session.current_file_path = Some(path.as_ref().to_path_buf());
        Ok(session)
    }

    /// Clears every element and the history, keeping size and settings.
    pub fn new_design(&mut self) {
        self.scene.replace_elements(Vec::new());
        self.scene.reset_counters();
        self.history.clear();
        self.save_state();
        self.design_name = "Untitled".to_string();
        self.current_file_path = None;
        self.is_modified = false;
    }
}
