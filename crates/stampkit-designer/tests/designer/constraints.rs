use proptest::prelude::*;

use stampkit_designer::constraints::{clamp_position, clamp_scaling, snap_rotation};
use stampkit_designer::{FrameOptions, Rect, StampFrame, StampShape, StampSession, StampSize};
use stampkit_settings::{BoundaryMode, EditorConfig};

fn zone() -> Rect {
    Rect::new(68.0, 68.0, 170.0, 60.0)
}

#[test]
fn test_print_mode_clamps_full_bleed_frame_to_work_area_edge() {
    let size: StampSize = "38x14".parse().unwrap();
    let mut session = StampSession::new(size, EditorConfig::default());
    session.set_boundary_mode(BoundaryMode::Print);
    let id = session.add_frame(FrameOptions {
        margin_mm: 0.0,
        ..Default::default()
    });

    assert!(session.move_element(id, -4000.0, -4000.0));
    let scene = session.scene();
    let b = scene.element(id).unwrap().bounding_rect();
    assert!((b.left - scene.work_area().left).abs() < 1e-9);
    assert!((b.top - scene.work_area().top).abs() < 1e-9);
    assert!(b.left < scene.safety_zone().left);
}

#[test]
fn test_switching_to_safety_pulls_elements_inward() {
    let mut session = StampSession::new(StampSize::default(), EditorConfig::default());
    session.set_boundary_mode(BoundaryMode::Unlocked);
    let id = session.add_frame(FrameOptions {
        margin_mm: 10.0,
        ..Default::default()
    });
    session.move_element(id, 0.0, 0.0);
    let unlocked_left = session.scene().element(id).unwrap().bounding_rect().left;
    assert!(unlocked_left < 64.0);

    session.set_boundary_mode(BoundaryMode::Safety);
    let b = session.scene().element(id).unwrap().bounding_rect();
    assert!(session.scene().safety_zone().contains_rect(&b, 1e-9));
}

#[test]
fn test_frame_scaling_is_uniform_and_never_grows() {
    let mut frame = StampFrame::new("Frame 1", 70.0, 70.0, 100.0, 20.0);
    frame.placement.scale_x = 3.0;
    frame.placement.scale_y = 1.0;
    clamp_scaling(&mut frame, zone(), false);
    let p = frame.placement;
    assert!((p.scale_x / p.scale_y - 3.0).abs() < 1e-9);
    assert!(p.scale_x < 3.0);
    assert!(zone().contains_rect(&frame.bounding_rect(), 1e-6));

    let mut small = StampFrame::new("Frame 2", 70.0, 70.0, 10.0, 10.0);
    clamp_scaling(&mut small, zone(), false);
    assert_eq!(small.placement.scale_x, 1.0);
}

proptest! {
    #[test]
    fn clamped_frames_stay_inside_zone(
        left in -2000.0f64..2000.0,
        top in -2000.0f64..2000.0,
        width in 1.0f64..160.0,
        height in 1.0f64..50.0,
        angle in prop::sample::select(vec![0.0, 90.0, 180.0, 270.0]),
    ) {
        let mut frame = StampFrame::new("Frame 1", left, top, width, height);
        frame.stroke_width_mm = 0.0;
        frame.placement.angle = angle;
        let b = frame.bounding_rect();
        prop_assume!(b.width < zone().width && b.height < zone().height);
        clamp_position(&mut frame, zone());
        prop_assert!(zone().contains_rect(&frame.bounding_rect(), 1e-6));
    }

    #[test]
    fn snapped_angles_are_right_angles_or_unchanged(angle in 0.0f64..360.0) {
        let snapped = snap_rotation(angle, 5.0);
        let near = [0.0, 90.0, 180.0, 270.0, 360.0]
            .iter()
            .any(|a| (angle - a).abs() < 5.0);
        if near {
            prop_assert!([0.0, 90.0, 180.0, 270.0].contains(&snapped));
        } else {
            prop_assert_eq!(snapped, angle);
        }
    }
}
