use stampkit_designer::{Element, ElementId, Point, StampShape, TextAlign, TextOptions};

use crate::{approx, session};

fn three_line_session(align: TextAlign, angle: f64) -> (stampkit_designer::StampSession, ElementId) {
    let mut session = session();
    let id = session.add_text(TextOptions {
        text: Some("ACME\nul. Długa 12\nWarszawa".into()),
        font_size_pt: Some(8.0),
        ..Default::default()
    });
    session.set_text_align(id, align);
    session.rotate_element(id, angle);
    (session, id)
}

fn centers(session: &stampkit_designer::StampSession, ids: &[ElementId]) -> Vec<Point> {
    ids.iter()
        .map(|id| session.scene().element(*id).unwrap().center())
        .collect()
}

#[test]
fn test_split_centred_lines_step_along_rotated_axis() {
    for angle in [0.0, 45.0, 90.0] {
        let (mut session, id) = three_line_session(TextAlign::Center, angle);
        let text = session
            .scene()
            .element(id)
            .and_then(Element::as_text)
            .unwrap()
            .clone();
        let step = text.font_size * text.line_height * text.placement.scale_y;

        let ids = session.split_by_lines(id);
        assert_eq!(ids.len(), 3, "angle {}", angle);
        assert!(session.scene().element(id).is_none());

        let (sin, cos) = angle.to_radians().sin_cos();
        let c = centers(&session, &ids);
        for pair in c.windows(2) {
            assert!(approx(pair[1].x - pair[0].x, -sin * step, 1e-6), "angle {}", angle);
            assert!(approx(pair[1].y - pair[0].y, cos * step, 1e-6), "angle {}", angle);
        }
    }
}

#[test]
fn test_split_keeps_left_and_right_edges() {
    let (mut session, id) = three_line_session(TextAlign::Left, 0.0);
    let left = session.scene().element(id).unwrap().bounding_rect().left;
    let ids = session.split_by_lines(id);
    for id in &ids {
        let b = session.scene().element(*id).unwrap().bounding_rect();
        assert!(approx(b.left, left, 1e-6));
    }

    let (mut session, id) = three_line_session(TextAlign::Right, 0.0);
    let right = session.scene().element(id).unwrap().bounding_rect().right();
    let ids = session.split_by_lines(id);
    for id in &ids {
        let b = session.scene().element(*id).unwrap().bounding_rect();
        assert!(approx(b.right(), right, 1e-6));
    }
    let names: Vec<_> = ids
        .iter()
        .map(|id| session.scene().element(*id).unwrap().name().to_string())
        .collect();
    assert_eq!(names[0], "Text 1 (line 1)");
    assert_eq!(names[2], "Text 1 (line 3)");
}

#[test]
fn test_split_is_one_undo_step() {
    let (mut session, id) = three_line_session(TextAlign::Center, 0.0);
    session.split_by_lines(id);
    assert_eq!(session.scene().elements().len(), 3);
    assert!(session.undo());
    let ids: Vec<_> = session.scene().elements().iter().map(Element::id).collect();
    assert_eq!(ids, vec![id]);
}

#[test]
fn test_fit_width_grows_narrow_text_and_keeps_vertical_position() {
    let mut session = session();
    let id = session.add_text(TextOptions {
        text: Some("ACME".into()),
        font_size_pt: Some(8.0),
        ..Default::default()
    });
    let before = session.scene().element(id).unwrap().clone();
    let zone = session.scene().safety_zone();
    assert!(before.bounding_rect().width < zone.width);

    assert!(session.fit_width(id));
    let after = session.scene().element(id).unwrap();
    let b = after.bounding_rect();
    assert!(approx(b.width, zone.width, 1e-6));
    assert!(approx(b.center().x, zone.center().x, 1e-6));
    assert_eq!(after.placement().top, before.placement().top);
    let (sx, sy) = (after.placement().scale_x, after.placement().scale_y);
    assert!(sx > 1.0);
    assert!(approx(sx, sy, 1e-12));
}

#[test]
fn test_align_keeps_printable_even_when_unlocked() {
    let mut session = session();
    session.set_boundary_mode(stampkit_settings::BoundaryMode::Unlocked);
    let id = session.add_text(TextOptions::default());
    session.align_to_edge(id, stampkit_designer::Edge::Left);
    let b = session.scene().element(id).unwrap().bounding_rect();
    assert!(approx(b.left, session.scene().safety_zone().left, 1e-9));
}
