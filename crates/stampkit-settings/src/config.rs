//! Configuration and settings management for StampKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Layout (safety and extra margins, grid increment)
//! - Interaction (snapping, history depth, boundary mode)
//! - Text (font-size bounds, legibility threshold, line height)
//! - Export (raster resolution, binarization threshold, font directories)
//! - Document (accepted custom size range)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{SettingsError, SettingsResult};

/// Which rectangle constrains element placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Work area inset by the safety margin
    #[default]
    Safety,
    /// Exactly the work area
    Print,
    /// Work area expanded by the extra margin
    Unlocked,
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safety => write!(f, "safety"),
            Self::Print => write!(f, "print"),
            Self::Unlocked => write!(f, "unlocked"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "safety" => Ok(Self::Safety),
            "print" => Ok(Self::Print),
            "unlocked" => Ok(Self::Unlocked),
            _ => Err(format!("Unknown boundary mode: {}", s)),
        }
    }
}

/// Zone geometry settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// Inset of the safety zone from the work area, in mm
    #[serde(default = "default_safety_margin")]
    pub safety_margin_mm: f64,
    /// Outset of the unlocked zone beyond the work area, in mm
    #[serde(default = "default_extra_margin")]
    pub extra_margin_mm: f64,
    /// Snap-to-grid increment in mm
    #[serde(default = "default_grid")]
    pub grid_mm: f64,
}

fn default_safety_margin() -> f64 {
    1.0
}

fn default_extra_margin() -> f64 {
    10.0
}

fn default_grid() -> f64 {
    1.0
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            safety_margin_mm: default_safety_margin(),
            extra_margin_mm: default_extra_margin(),
            grid_mm: default_grid(),
        }
    }
}

/// Interactive editing behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Rotation snap tolerance in degrees
    #[serde(default = "default_snap_threshold")]
    pub snap_threshold_deg: f64,
    /// Whether moves snap to the grid on a new session
    #[serde(default)]
    pub snap_to_grid: bool,
    /// Maximum number of undo snapshots
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Boundary mode for new documents
    #[serde(default)]
    pub boundary_mode: BoundaryMode,
    /// Offset applied to duplicated elements, in px
    #[serde(default = "default_duplicate_offset")]
    pub duplicate_offset_px: f64,
}

fn default_snap_threshold() -> f64 {
    5.0
}

fn default_history_depth() -> usize {
    50
}

fn default_duplicate_offset() -> f64 {
    10.0
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            snap_threshold_deg: default_snap_threshold(),
            snap_to_grid: false,
            history_depth: default_history_depth(),
            boundary_mode: BoundaryMode::default(),
            duplicate_offset_px: default_duplicate_offset(),
        }
    }
}

/// Text defaults and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSettings {
    /// Smallest size the scale normalizer produces, in pt
    #[serde(default = "default_min_font")]
    pub min_font_pt: f64,
    /// Largest size the scale normalizer produces, in pt
    #[serde(default = "default_max_font")]
    pub max_font_pt: f64,
    /// Sizes below this trigger a legibility warning, in pt
    #[serde(default = "default_min_legible")]
    pub min_legible_pt: f64,
    /// Line height as a multiple of the font size
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Family for newly added text
    #[serde(default = "default_family")]
    pub default_family: String,
    /// Size for newly added text, in pt
    #[serde(default = "default_size")]
    pub default_size_pt: f64,
    /// Families offered to the user
    #[serde(default = "default_available_fonts")]
    pub available_fonts: Vec<String>,
}

fn default_min_font() -> f64 {
    4.0
}

fn default_max_font() -> f64 {
    72.0
}

fn default_min_legible() -> f64 {
    7.0
}

fn default_line_height() -> f64 {
    1.16
}

fn default_family() -> String {
    "Myriad Pro".to_string()
}

fn default_size() -> f64 {
    10.0
}

fn default_available_fonts() -> Vec<String> {
    [
        "Arial",
        "Arial Narrow",
        "Times New Roman",
        "Calibri",
        "Myriad Pro",
        "Myriad Pro Condensed",
        "Roboto",
        "Montserrat",
        "Inter",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            min_font_pt: default_min_font(),
            max_font_pt: default_max_font(),
            min_legible_pt: default_min_legible(),
            line_height: default_line_height(),
            default_family: default_family(),
            default_size_pt: default_size(),
            available_fonts: default_available_fonts(),
        }
    }
}

/// PDF export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Raster resolution of the flattened export
    #[serde(default = "default_target_dpi")]
    pub target_dpi: f64,
    /// Average brightness below which a pixel becomes black
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Extra directories scanned for font files
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,
    /// Whether installed system fonts are considered
    #[serde(default = "default_true")]
    pub use_system_fonts: bool,
}

/// Lowest raster resolution that keeps small stamp text sharp.
pub const MIN_TARGET_DPI: f64 = 1000.0;

fn default_target_dpi() -> f64 {
    2000.0
}

fn default_threshold() -> u8 {
    120
}

fn default_true() -> bool {
    true
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            target_dpi: default_target_dpi(),
            threshold: default_threshold(),
            font_dirs: Vec::new(),
            use_system_fonts: true,
        }
    }
}

/// Accepted range for custom document sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    #[serde(default = "default_min_mm")]
    pub min_mm: f64,
    #[serde(default = "default_max_mm")]
    pub max_mm: f64,
}

fn default_min_mm() -> f64 {
    10.0
}

fn default_max_mm() -> f64 {
    100.0
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            min_mm: default_min_mm(),
            max_mm: default_max_mm(),
        }
    }
}

/// Complete editor configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EditorConfig {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub text: TextSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub document: DocumentSettings,
}

impl EditorConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded editor config");
        Ok(config)
    }

    /// Load config from the default location, falling back to defaults when absent
    pub fn load_or_default() -> SettingsResult<Self> {
        match default_config_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match extension(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.layout.safety_margin_mm < 0.0 {
            return Err(SettingsError::invalid(
                "layout.safety_margin_mm",
                "must be >= 0",
            ));
        }
        if self.layout.extra_margin_mm < 0.0 {
            return Err(SettingsError::invalid(
                "layout.extra_margin_mm",
                "must be >= 0",
            ));
        }
        if self.layout.grid_mm <= 0.0 {
            return Err(SettingsError::invalid("layout.grid_mm", "must be > 0"));
        }

        if !(0.0..45.0).contains(&self.interaction.snap_threshold_deg) {
            return Err(SettingsError::invalid(
                "interaction.snap_threshold_deg",
                "must be in [0, 45)",
            ));
        }
        if self.interaction.history_depth < 2 {
            return Err(SettingsError::invalid(
                "interaction.history_depth",
                "must keep at least 2 snapshots",
            ));
        }

        if self.text.min_font_pt <= 0.0 || self.text.max_font_pt <= self.text.min_font_pt {
            return Err(SettingsError::invalid(
                "text.max_font_pt",
                "font bounds must satisfy 0 < min < max",
            ));
        }
        if self.text.line_height <= 0.0 {
            return Err(SettingsError::invalid("text.line_height", "must be > 0"));
        }
        if self.text.default_size_pt <= 0.0 {
            return Err(SettingsError::invalid("text.default_size_pt", "must be > 0"));
        }

        if self.export.target_dpi < MIN_TARGET_DPI {
            return Err(SettingsError::invalid(
                "export.target_dpi",
                format!("must be at least {}", MIN_TARGET_DPI),
            ));
        }

        if self.document.min_mm <= 0.0 || self.document.max_mm < self.document.min_mm {
            return Err(SettingsError::invalid(
                "document.max_mm",
                "size range must satisfy 0 < min <= max",
            ));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

fn extension(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

/// Platform config location: `<config_dir>/stampkit/config.toml`
pub fn default_config_path() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("stampkit").join("config.toml"))
        .ok_or_else(|| SettingsError::ConfigDirectory("no config directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.interaction.history_depth, 50);
        assert_eq!(config.export.threshold, 120);
        assert_eq!(config.text.available_fonts.len(), 9);
    }

    #[test]
    fn test_boundary_mode_parse() {
        assert_eq!("Print".parse::<BoundaryMode>(), Ok(BoundaryMode::Print));
        assert!("nowhere".parse::<BoundaryMode>().is_err());
        assert_eq!(BoundaryMode::Unlocked.to_string(), "unlocked");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = EditorConfig::default();
        config.layout.grid_mm = 0.0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.text.max_font_pt = 2.0;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.interaction.history_depth = 1;
        assert!(config.validate().is_err());

        let mut config = EditorConfig::default();
        config.export.target_dpi = 600.0;
        assert!(config.validate().is_err());
        config.export.target_dpi = MIN_TARGET_DPI;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EditorConfig = toml::from_str("[layout]\ngrid_mm = 0.5\n").unwrap();
        assert_eq!(config.layout.grid_mm, 0.5);
        assert_eq!(config.layout.safety_margin_mm, 1.0);
        assert_eq!(config.text.line_height, 1.16);
    }
}
