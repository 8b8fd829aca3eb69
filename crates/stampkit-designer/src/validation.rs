//! Pre-production checks on a finished design.

use crate::model::ElementId;
use crate::scene::Scene;

/// A text element too small to print reliably on rubber.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSizeWarning {
    pub id: ElementId,
    /// First characters of the text
    pub excerpt: String,
    pub size_pt: f64,
    pub min_pt: f64,
}

impl std::fmt::Display for FontSizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Text \"{}...\" is {}pt, below the {}pt minimum; it may not be legible on the stamp.",
            self.excerpt, self.size_pt, self.min_pt
        )
    }
}

/// Warns about every text element smaller than the legibility threshold.
pub fn validate_min_font_size(scene: &Scene) -> Vec<FontSizeWarning> {
    let min_pt = scene.config().text.min_legible_pt;
    scene
        .elements()
        .iter()
        .filter_map(|e| e.as_text())
        .filter_map(|text| {
            let size_pt = scene.units().px_to_pt(text.font_size);
            (size_pt < min_pt).then(|| FontSizeWarning {
                id: text.meta.id,
                excerpt: text.text().chars().take(20).collect(),
                size_pt,
                min_pt,
            })
        })
        .inspect(|w| tracing::warn!(id = %w.id, size_pt = w.size_pt, "text below legible size"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::StampSize;
    use crate::scene::TextOptions;
    use crate::text_metrics::ApproximateMeasurer;
    use stampkit_settings::EditorConfig;
    use std::sync::Arc;

    #[test]
    fn test_small_text_is_reported() {
        let mut scene = Scene::new(
            StampSize::default(),
            EditorConfig::default(),
            Arc::new(ApproximateMeasurer),
        );
        scene.add_text(TextOptions {
            text: Some("Readable".into()),
            font_size_pt: Some(10.0),
            ..Default::default()
        });
        let small = scene.add_text(TextOptions {
            text: Some("ul. Długa 12/3, 00-001 Warszawa".into()),
            font_size_pt: Some(6.0),
            ..Default::default()
        });
        scene.add_text(TextOptions {
            font_size_pt: Some(7.0),
            ..Default::default()
        });

        let warnings = validate_min_font_size(&scene);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].id, small);
        assert_eq!(warnings[0].size_pt, 6.0);
        assert_eq!(warnings[0].excerpt, "ul. Długa 12/3, 00-0");
        assert!(warnings[0].to_string().contains("6pt"));
    }
}
