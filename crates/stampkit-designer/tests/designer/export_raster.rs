use lopdf::{Document, Object};

use stampkit_designer::export::{rasterize, FontCatalog};
use stampkit_designer::model::StampShape;
use stampkit_designer::{FrameOptions, InMemoryFontProvider, StampSession, StampSize, TextOptions};
use stampkit_settings::EditorConfig;

use crate::{approx, scene_with};

#[test]
fn test_empty_work_area_is_white() {
    let mut scene = scene_with(StampSize::default());
    scene.set_guides_visible(false);
    let image = rasterize(&scene, &FontCatalog::default(), 96.0, 128).unwrap();
    assert_eq!(image.dimensions(), (178, 68));
    assert!(image.pixels().all(|p| p.0[0] == 255));
}

#[test]
fn test_frame_stroke_is_pure_black() {
    let mut scene = scene_with(StampSize::default());
    scene.set_guides_visible(false);
    scene.add_frame(FrameOptions::default());
    let image = rasterize(&scene, &FontCatalog::default(), 192.0, 128).unwrap();

    assert!(image.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    assert_eq!(image.get_pixel(0, 0).0[0], 255);
    let (w, h) = image.dimensions();
    assert_eq!(image.get_pixel(w / 2, h / 2).0[0], 255);
    assert!(image.pixels().filter(|p| p.0[0] == 0).count() > 100);
}

#[tokio::test]
async fn test_flatten_restores_editor_state() {
    let mut config = EditorConfig::default();
    config.export.target_dpi = 150.0;
    let mut session = StampSession::new(StampSize::default(), config);
    let frame = session.add_frame(FrameOptions::default());
    session.add_text(TextOptions::default());
    session.select(frame);
    session.set_background("#336699");
    session.zoom_in();
    let zoom = session.scene().viewport().zoom();

    let bytes = session
        .export_flattened(&InMemoryFontProvider::new())
        .await
        .unwrap();

    let scene = session.scene();
    assert!(scene.guides().iter().all(|g| g.visible));
    assert_eq!(scene.selection().ids(), &[frame]);
    assert_eq!(scene.background(), "#336699");
    assert_eq!(scene.viewport().zoom(), zoom);

    let doc = Document::load_mem(&bytes).unwrap();
    let image = doc
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .find(|s| matches!(s.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image"))
        .unwrap();
    let expected_width = (scene.work_area().width * 150.0 / 96.0).round() as i64;
    assert_eq!(image.dict.get(b"Width").unwrap().as_i64().unwrap(), expected_width);
    assert_eq!(image.dict.get(b"BitsPerComponent").unwrap().as_i64().unwrap(), 1);
}

#[test]
fn test_text_with_unknown_family_is_still_inked() {
    let mut scene = scene_with(StampSize::default());
    scene.set_guides_visible(false);
    let id = scene.add_text(TextOptions {
        text: Some("ACME".into()),
        font_family: Some("No Such Family".into()),
        ..Default::default()
    });
    let dpi = 300.0;
    let image = rasterize(&scene, &FontCatalog::default(), dpi, 120).unwrap();

    let bounds = scene.element(id).unwrap().bounding_rect();
    let factor = dpi / 96.0;
    let to_px = |v: f64, origin: f64| ((v - origin) * factor).max(0.0) as u32;
    let (x0, y0) = (to_px(bounds.left, 64.0), to_px(bounds.top, 64.0));
    let x1 = to_px(bounds.left + bounds.width, 64.0).min(image.width());
    let y1 = to_px(bounds.top + bounds.height, 64.0).min(image.height());

    let mut inked = 0;
    for y in y0..y1 {
        for x in x0..x1 {
            if image.get_pixel(x, y).0[0] == 0 {
                inked += 1;
            }
        }
    }
    assert!(inked > 50, "only {} black pixels inside the text box", inked);
}

#[tokio::test]
async fn test_flattened_page_matches_physical_size() {
    let mut config = EditorConfig::default();
    config.export.target_dpi = 96.0;
    let mut sizes = StampSize::predefined();
    sizes.push(StampSize::custom(30.0, 25.0, &config.document).unwrap());

    for size in sizes {
        let (w_mm, h_mm) = (size.width_mm, size.height_mm);
        let mut session = StampSession::new(size, config.clone());
        session.add_text(TextOptions::default());
        let bytes = session
            .export_flattened(&InMemoryFontProvider::new())
            .await
            .unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = f64::from(media_box[2].as_float().unwrap());
        let height = f64::from(media_box[3].as_float().unwrap());
        assert!(approx(width, w_mm * 72.0 / 25.4, 0.01), "{} mm wide gave {}", w_mm, width);
        assert!(approx(height, h_mm * 72.0 / 25.4, 0.01), "{} mm high gave {}", h_mm, height);
    }
}
