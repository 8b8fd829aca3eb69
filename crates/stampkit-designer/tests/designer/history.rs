use stampkit_designer::{Element, FrameOptions, StampSession, StampShape, StampSize, TextOptions};
use stampkit_settings::EditorConfig;

use crate::session;

#[test]
fn test_undo_redo_round_trip_keeps_ids() {
    let mut session = session();
    let id = session.add_text(TextOptions::default());
    let start = session.scene().element(id).unwrap().clone();

    assert!(session.nudge(id, 5.0, 0.0));
    let moved = session.scene().element(id).unwrap().clone();
    assert_ne!(moved, start);

    assert!(session.undo());
    assert_eq!(session.scene().element(id), Some(&start));
    assert!(session.can_redo());

    assert!(session.redo());
    assert_eq!(session.scene().element(id), Some(&moved));
    assert!(!session.can_redo());
}

#[test]
fn test_new_change_discards_redo() {
    let mut session = session();
    let id = session.add_text(TextOptions::default());
    session.set_bold(id, true);
    session.undo();
    assert!(session.can_redo());
    session.set_italic(id, true);
    assert!(!session.can_redo());
    let text = session.scene().element(id).and_then(Element::as_text).unwrap();
    assert!(!text.bold);
    assert!(text.italic);
}

#[test]
fn test_history_depth_is_bounded() {
    let mut config = EditorConfig::default();
    config.interaction.history_depth = 3;
    let mut session = StampSession::new(StampSize::default(), config);
    let id = session.add_frame(FrameOptions::default());
    for _ in 0..5 {
        session.nudge(id, -1.0, 0.0);
    }
    assert_eq!(session.history().undo_depth(), 3);
    assert!(session.undo());
    assert!(session.undo());
    assert!(!session.undo());
}

#[test]
fn test_undo_after_delete_restores_element() {
    let mut session = session();
    let frame = session.add_frame(FrameOptions::default());
    let text = session.add_text(TextOptions::default());
    assert_eq!(session.delete(&[frame]), 1);
    assert!(session.undo());
    let ids: Vec<_> = session.scene().elements().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![frame, text]);
    let restored = session.scene().element(frame).unwrap();
    assert_eq!(restored.name(), "Frame 1");
    assert!(restored.bounding_rect().width > 0.0);
}
