use stampkit_designer::{Element, FrameOptions, GuideKind, StampShape, StampSize, TextOptions};
use stampkit_settings::BoundaryMode;

use crate::{approx, scene_with};

#[test]
fn test_default_zones_are_whole_pixels() {
    let scene = scene_with(StampSize::default());
    let safety = scene.zone(BoundaryMode::Safety);
    assert_eq!(
        (safety.left, safety.top, safety.width, safety.height),
        (68.0, 68.0, 170.0, 60.0)
    );
    let print = scene.zone(BoundaryMode::Print);
    assert_eq!(
        (print.left, print.top, print.width, print.height),
        (64.0, 64.0, 178.0, 68.0)
    );
    let unlocked = scene.zone(BoundaryMode::Unlocked);
    assert!(unlocked.width > print.width);
}

#[test]
fn test_guides_follow_resize() {
    let mut scene = scene_with(StampSize::default());
    scene.set_guides_visible(false);
    scene.resize("58x22".parse().unwrap());
    let work = scene.guide(GuideKind::WorkArea).unwrap();
    assert!(approx(work.rect.width, 58.0 * stampkit_core::PX_PER_MM, 1e-9));
    assert_eq!(scene.zone(BoundaryMode::Print).width, 219.0);
    assert!(scene.guides().iter().all(|g| !g.visible));
}

#[test]
fn test_elements_keep_z_order_and_ids() {
    let mut scene = scene_with(StampSize::default());
    let frame = scene.add_frame(FrameOptions::default());
    let first = scene.add_text(TextOptions::default());
    let second = scene.add_text(TextOptions::default());

    assert_eq!(scene.element(first).unwrap().name(), "Text 1");
    assert_eq!(scene.element(second).unwrap().name(), "Text 2");
    assert_eq!(scene.element(frame).unwrap().name(), "Frame 1");

    assert!(scene.bring_to_front(frame));
    assert_eq!(scene.z_index(frame), Some(2));
    assert!(scene.send_to_back(frame));
    assert_eq!(scene.z_index(frame), Some(0));
    assert!(scene.move_up(first));
    let ids: Vec<_> = scene.elements().iter().map(Element::id).collect();
    assert_eq!(ids, vec![frame, second, first]);
}

#[test]
fn test_duplicate_offsets_and_selects_copies() {
    let mut scene = scene_with(StampSize::default());
    let id = scene.add_text(TextOptions {
        text: Some("ACME".into()),
        ..Default::default()
    });
    let copies = scene.duplicate(&[id]);
    assert_eq!(copies.len(), 1);
    assert_ne!(copies[0], id);
    assert_eq!(scene.selection().ids(), copies.as_slice());
    let original = scene.element(id).unwrap().placement().anchor();
    let copy = scene.element(copies[0]).unwrap().placement().anchor();
    assert!(copy.x > original.x);
}

#[test]
fn test_locked_element_ignores_moves() {
    let mut scene = scene_with(StampSize::default());
    let id = scene.add_text(TextOptions::default());
    let before = scene.element(id).unwrap().placement().anchor();
    assert_eq!(scene.toggle_lock(id), Some(true));
    assert!(!scene.move_element(id, 100.0, 100.0));
    assert_eq!(scene.element(id).unwrap().placement().anchor(), before);
}

#[test]
fn test_text_edit_auto_fits_into_safety_zone() {
    let mut scene = scene_with(StampSize::default());
    let id = scene.add_text(TextOptions::default());
    let long = "PRZEDSIĘBIORSTWO HANDLOWO USŁUGOWE KOWALSKI I SYNOWIE";
    assert!(scene.finish_text_edit(id, long));
    let b = scene.element(id).unwrap().bounding_rect();
    assert!(b.width <= scene.safety_zone().width + 1e-6);
    assert!(scene.active_zone().contains_rect(&b, 1e-6));
}

#[test]
fn test_rotation_snaps_near_right_angles() {
    let mut scene = scene_with(StampSize::default());
    let id = scene.add_text(TextOptions::default());
    scene.rotate_element(id, 88.0);
    assert_eq!(scene.element(id).unwrap().placement().angle, 90.0);
    scene.rotate_element(id, 357.0);
    assert_eq!(scene.element(id).unwrap().placement().angle, 0.0);
    scene.rotate_element(id, 30.0);
    assert_eq!(scene.element(id).unwrap().placement().angle, 30.0);
}

#[test]
fn test_scale_normalizes_into_font_size() {
    let mut scene = scene_with(StampSize::default());
    let id = scene.add_text(TextOptions {
        text: Some("AB".into()),
        font_size_pt: Some(10.0),
        ..Default::default()
    });
    let size_before = scene.element(id).and_then(Element::as_text).unwrap().font_size;
    scene.scale_element(id, 1.5, 1.2);
    assert!(scene.finish_modification(id));
    let text = scene.element(id).and_then(Element::as_text).unwrap();
    assert!(approx(text.font_size, size_before * 1.2, 1e-9));
    assert!(approx(text.placement.scale_x, 1.25, 1e-9));
    assert_eq!(text.placement.scale_y, 1.0);
}
