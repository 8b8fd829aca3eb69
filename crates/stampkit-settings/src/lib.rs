//! StampKit Settings Crate
//!
//! Handles editor configuration: layout margins, interaction tuning,
//! text limits and export parameters, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, BoundaryMode, DocumentSettings, EditorConfig, ExportSettings,
    InteractionSettings, LayoutSettings, TextSettings,
};
pub use error::{SettingsError, SettingsResult};
