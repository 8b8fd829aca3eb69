use std::sync::Arc;

use stampkit_designer::{
    ApproximateMeasurer, DesignFile, Element, FrameOptions, RegistryRecord, StampSession,
    StampSize, TextOptions,
};
use stampkit_settings::{BoundaryMode, EditorConfig};
use tempfile::TempDir;

use crate::session;

#[test]
fn test_save_and_load_design() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("office.json");

    let mut original = session();
    original.design_name = "Office".into();
    let frame = original.add_frame(FrameOptions::default());
    let text = original.add_text(TextOptions {
        text: Some("ACME\nWarszawa".into()),
        ..Default::default()
    });
    original.set_boundary_mode(BoundaryMode::Print);
    original.save_to_file(&path).unwrap();
    assert!(!original.is_modified);

    let loaded = StampSession::load_from_file(
        &path,
        EditorConfig::default(),
        Arc::new(ApproximateMeasurer),
    )
    .unwrap();
    assert_eq!(loaded.design_name, "Office");
    assert_eq!(loaded.current_file_path.as_deref(), Some(path.as_path()));
    assert_eq!(loaded.scene().boundary_mode(), BoundaryMode::Print);
    let ids: Vec<_> = loaded.scene().elements().iter().map(Element::id).collect();
    assert_eq!(ids, vec![frame, text]);
    assert_eq!(loaded.scene().elements(), original.scene().elements());
    assert!(!loaded.can_undo());
}

#[test]
fn test_load_rejects_out_of_range_size() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("huge.json");
    let mut design = DesignFile::new("Huge");
    design.size = StampSize {
        width_mm: 250.0,
        height_mm: 18.0,
        label: "250 x 18 mm".into(),
    };
    design.save_to_file(&path).unwrap();

    let result = StampSession::load_from_file(
        &path,
        EditorConfig::default(),
        Arc::new(ApproximateMeasurer),
    );
    assert!(result.is_err());
}

#[test]
fn test_new_design_clears_elements_and_history() {
    let mut session = session();
    session.add_text(TextOptions::default());
    session.new_design();
    assert!(session.scene().elements().is_empty());
    assert!(!session.can_undo());
    let id = session.add_text(TextOptions::default());
    assert_eq!(session.scene().element(id).unwrap().name(), "Text 1");
}

#[test]
fn test_registry_text_is_described_in_page_points() {
    let mut session = session();
    let record = RegistryRecord {
        name: "KOWALSKI SPÓŁKA Z OGRANICZONĄ ODPOWIEDZIALNOŚCIĄ".into(),
        street: "ul. Długa".into(),
        building_number: "12".into(),
        postal_code: "00-001".into(),
        city: "Warszawa".into(),
        tax_id: "5250001009".into(),
        ..Default::default()
    };
    let id = session.add_registry_text(&record);
    let text = session.scene().element(id).and_then(Element::as_text).unwrap();
    assert_eq!(text.lines.len(), 4);
    assert_eq!(text.lines[3], "NIP: 5250001009");
    assert_eq!(text.font_family, "Arial");

    let description = session.describe();
    assert_eq!(description.elements.len(), 1);
    let json = description.to_json().unwrap();
    assert!(json.contains("\"type\": \"text\""));
    assert!(json.contains("NIP: 5250001009"));

    let warnings = session.validate_min_font_size();
    assert!(warnings.is_empty());
    session.set_font_size_pt(id, 6.0);
    assert_eq!(session.validate_min_font_size().len(), 1);
}
