use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use stampkit_designer::{FrameOptions, InMemoryFontProvider, StampSession, StampSize, TextOptions};
use stampkit_settings::EditorConfig;

use crate::{approx, session};

fn parse(bytes: &[u8]) -> (Document, ObjectId) {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1);
    let page_id = *pages.values().next().unwrap();
    (doc, page_id)
}

fn operators(doc: &Document, page_id: ObjectId) -> Vec<String> {
    let data = doc.get_page_content(page_id).unwrap();
    Content::decode(&data)
        .unwrap()
        .operations
        .into_iter()
        .map(|op| op.operator)
        .collect()
}

fn count(ops: &[String], name: &str) -> usize {
    ops.iter().filter(|op| op.as_str() == name).count()
}

#[tokio::test]
async fn test_single_text_gives_exact_page_and_one_text_run() {
    let mut session = session();
    session.add_text(TextOptions {
        text: Some("ACME Sp. z o.o.".into()),
        ..Default::default()
    });

    let bytes = session.export_vector(&InMemoryFontProvider::new()).await.unwrap();
    let (doc, page_id) = parse(&bytes);

    let page = doc.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
    let width = media_box[2].as_float().unwrap();
    let height = media_box[3].as_float().unwrap();
    assert!((width - 133.23).abs() < 0.01);
    assert!((height - 51.02).abs() < 0.01);

    let ops = operators(&doc, page_id);
    assert_eq!(count(&ops, "Tj"), 1);
    assert_eq!(count(&ops, "BT"), 1);
    assert_eq!(count(&ops, "q"), count(&ops, "Q"));
}

#[tokio::test]
async fn test_guides_selection_and_hidden_elements_are_not_drawn() {
    let mut session = session();
    let hidden = session.add_text(TextOptions::default());
    session.toggle_visibility(hidden);
    session.add_frame(FrameOptions::default());

    let bytes = session.export_vector(&InMemoryFontProvider::new()).await.unwrap();
    let (doc, page_id) = parse(&bytes);
    let ops = operators(&doc, page_id);
    assert_eq!(count(&ops, "Tj"), 0);
    assert_eq!(count(&ops, "re"), 1);
    assert_eq!(count(&ops, "S"), 1);
}

#[tokio::test]
async fn test_char_spacing_places_each_glyph() {
    let mut session = session();
    let id = session.add_text(TextOptions {
        text: Some("ABC\nDE".into()),
        ..Default::default()
    });
    session.set_char_spacing(id, 120.0);

    let bytes = session.export_vector(&InMemoryFontProvider::new()).await.unwrap();
    let (doc, page_id) = parse(&bytes);
    let ops = operators(&doc, page_id);
    assert_eq!(count(&ops, "Tj"), 5);
    assert_eq!(count(&ops, "Tm"), 5);
}

#[tokio::test]
async fn test_unknown_family_falls_back_to_helvetica() {
    let mut session = StampSession::new("38x14".parse::<StampSize>().unwrap(), EditorConfig::default());
    session.add_text(TextOptions {
        font_family: Some("No Such Family".into()),
        ..Default::default()
    });
    let bytes = session.export_vector(&InMemoryFontProvider::new()).await.unwrap();
    let (doc, _) = parse(&bytes);

    let base_fonts: Vec<Vec<u8>> = doc
        .objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .filter(|d| matches!(d.get(b"Type"), Ok(Object::Name(n)) if n == b"Font"))
        .filter_map(|d| match d.get(b"BaseFont") {
            Ok(Object::Name(n)) => Some(n.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(base_fonts, vec![b"Helvetica".to_vec()]);
}

#[tokio::test]
async fn test_vector_page_matches_physical_size() {
    let config = EditorConfig::default();
    let mut sizes = StampSize::predefined();
    sizes.push(StampSize::custom(30.0, 25.0, &config.document).unwrap());

    for size in sizes {
        let (w_mm, h_mm) = (size.width_mm, size.height_mm);
        let mut session = StampSession::new(size, config.clone());
        session.add_frame(FrameOptions::default());
        let bytes = session.export_vector(&InMemoryFontProvider::new()).await.unwrap();

        let (doc, page_id) = parse(&bytes);
        let page = doc.get_dictionary(page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = f64::from(media_box[2].as_float().unwrap());
        let height = f64::from(media_box[3].as_float().unwrap());
        assert!(approx(width, w_mm * 72.0 / 25.4, 0.01), "{} mm wide gave {}", w_mm, width);
        assert!(approx(height, h_mm * 72.0 / 25.4, 0.01), "{} mm high gave {}", h_mm, height);
    }
}
