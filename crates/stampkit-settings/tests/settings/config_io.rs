use stampkit_settings::{BoundaryMode, EditorConfig, SettingsError};
use tempfile::tempdir;

#[test]
fn test_json_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = EditorConfig::default();
    config.interaction.boundary_mode = BoundaryMode::Print;
    config.export.target_dpi = 1200.0;
    config.save_to_file(&path).unwrap();

    let loaded = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_toml_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = EditorConfig::default();
    config.layout.extra_margin_mm = 5.0;
    config.export.font_dirs.push(dir.path().to_path_buf());
    config.save_to_file(&path).unwrap();

    let loaded = EditorConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.layout.extra_margin_mm, 5.0);
    assert_eq!(loaded.export.font_dirs, config.export.font_dirs);
}

#[test]
fn test_unknown_extension_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let err = EditorConfig::default().save_to_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedFormat(_)));
}

#[test]
fn test_invalid_file_is_not_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"layout": {"grid_mm": -1.0}}"#).unwrap();
    let err = EditorConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidSetting { .. }));
}
