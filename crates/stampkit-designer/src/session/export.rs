//! PDF export and portable scene descriptions.

use std::path::Path;

use anyhow::Context;

use super::StampSession;
use crate::export::{self, FontProvider};
use crate::serialization::SceneDescription;
use crate::validation::{self, FontSizeWarning};

impl StampSession {
    pub async fn export_vector(&self, provider: &dyn FontProvider) -> stampkit_core::Result<Vec<u8>> {
        export::export_vector(&self.scene, provider).await
    }

    /// Flattened export with the session's raster settings.
    pub async fn export_flattened(
        &mut self,
        provider: &dyn FontProvider,
    ) -> stampkit_core::Result<Vec<u8>> {
        let settings = self.scene.config().export.clone();
        export::export_flattened(&mut self.scene, provider, &settings).await
    }

    /// Writes either export to `path`.
    pub async fn export_to_file(
        &mut self,
        path: impl AsRef<Path>,
        flatten: bool,
        provider: &dyn FontProvider,
    ) -> anyhow::Result<()> {
        let bytes = if flatten {
            self.export_flattened(provider).await
        } else {
            self.export_vector(provider).await
        }
        .context("Failed to render PDF")?;
        tokio::fs::write(path.as_ref(), bytes)
            .await
            .context("Failed to write PDF file")?;
        tracing::info!(path = %path.as_ref().display(), flatten, "exported");
        Ok(())
    }

    pub fn describe(&self) -> SceneDescription {
        SceneDescription::from_scene(&self.scene)
    }

    pub fn validate_min_font_size(&self) -> Vec<FontSizeWarning> {
        validation::validate_min_font_size(&self.scene)
    }
}
