//! Flattened export: the work area rendered to a high-resolution bitmap,
//! thresholded to pure black and white and placed on an exact-size page.

use image::{GrayImage, Luma};
use lopdf::content::Content;
use lopdf::{dictionary, Object, Stream};
use rusttype::{point as rt_point, OutlineBuilder};
use tiny_skia::{
    Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect as SkRect, Stroke, StrokeDash,
    Transform,
};

use stampkit_core::{Error, Result, WORK_AREA_LEFT, WORK_AREA_TOP};
use stampkit_settings::ExportSettings;

use super::fonts::{FontCatalog, FontProvider};
use super::pdf::{op, parse_hex_color, real, PdfPage};
use super::vector::{printable_texts, BASELINE_RATIO};
use crate::font_manager;
use crate::model::{Element, GuideKind, StampFrame, StampShape, StampText, TextAlign};
use crate::scene::{Scene, Selection};
use crate::text_metrics::em_scale;
use crate::viewport::Viewport;

/// Screen pixels are 96 per inch.
const SCREEN_DPI: f64 = 96.0;

/// Renders the scene into a single monochrome image on an exact-size page.
///
/// Guides, selection, background and view are replaced for the duration of
/// the render and put back afterwards, whatever the outcome.
pub async fn export_flattened(
    scene: &mut Scene,
    provider: &dyn FontProvider,
    settings: &ExportSettings,
) -> Result<Vec<u8>> {
    let keys: Vec<_> = printable_texts(scene).map(|t| t.font_key()).collect();
    let catalog = FontCatalog::resolve(provider, keys).await;

    let bitmap = {
        let guard = FlattenGuard::new(scene);
        rasterize(guard.scene(), &catalog, settings.target_dpi, settings.threshold)?
    };

    let (width, height) = bitmap.dimensions();
    let mut page = PdfPage::new(scene.size());
    let image_id = page.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 1,
        },
        pack_bits(&bitmap),
    ));
    page.add_resource("XObject", "Im1", image_id);

    let (page_w, page_h) = super::pdf::page_size_pt(scene.size());
    let content = Content {
        operations: vec![
            op("q", vec![]),
            op(
                "cm",
                vec![real(page_w), real(0.0), real(0.0), real(page_h), real(0.0), real(0.0)],
            ),
            op("Do", vec![Object::Name(b"Im1".to_vec())]),
            op("Q", vec![]),
        ],
    };
    let bytes = page.finish(content)?;
    tracing::info!(width, height, bytes = bytes.len(), "flattened PDF written");
    Ok(bytes)
}

/// Puts the scene into print state and restores it when dropped.
struct FlattenGuard<'a> {
    scene: &'a mut Scene,
    guides_visible: Vec<bool>,
    selection: Selection,
    background: String,
    viewport: Viewport,
}

impl<'a> FlattenGuard<'a> {
    fn new(scene: &'a mut Scene) -> Self {
        let guides_visible = scene.guides().iter().map(|g| g.visible).collect();
        let selection = scene.selection().clone();
        let background = scene.background().to_string();
        let viewport = *scene.viewport();

        scene.set_guides_visible(false);
        scene.clear_selection();
        scene.set_background("#ffffff");
        scene.viewport_mut().reset();

        Self {
            scene,
            guides_visible,
            selection,
            background,
            viewport,
        }
    }

    fn scene(&self) -> &Scene {
        self.scene
    }
}

impl Drop for FlattenGuard<'_> {
    fn drop(&mut self) {
        for (guide, visible) in self.scene.guides_mut().iter_mut().zip(&self.guides_visible) {
            guide.visible = *visible;
        }
        *self.scene.selection_mut() = std::mem::take(&mut self.selection);
        self.scene.set_background(std::mem::take(&mut self.background));
        *self.scene.viewport_mut() = self.viewport;
        tracing::debug!("scene state restored after flatten");
    }
}

/// Renders the work area at `dpi` and thresholds it.
///
/// Pixels whose average channel value is below `threshold` become black,
/// everything else white.
pub fn rasterize(scene: &Scene, catalog: &FontCatalog, dpi: f64, threshold: u8) -> Result<GrayImage> {
    let factor = dpi / SCREEN_DPI;
    let work = scene.work_area();
    let width = (work.width * factor).round().max(1.0) as u32;
    let height = (work.height * factor).round().max(1.0) as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::export(format!("cannot allocate {}x{} bitmap", width, height)))?;
    let (r, g, b) = parse_hex_color(scene.background());
    pixmap.fill(Color::from_rgba(r as f32, g as f32, b as f32, 1.0).unwrap_or(Color::WHITE));

    let canvas = Transform::from_translate(-WORK_AREA_LEFT as f32, -WORK_AREA_TOP as f32)
        .post_scale(factor as f32, factor as f32);

    draw_guides(&mut pixmap, scene, canvas);
    for element in scene.elements().iter().filter(|e| e.is_visible()) {
        match element {
            Element::Text(text) if !text.is_blank() => draw_text(&mut pixmap, text, catalog, canvas),
            Element::Text(_) => {}
            Element::Frame(frame) => draw_frame(&mut pixmap, frame, canvas),
        }
    }
    tracing::debug!(width, height, dpi, "work area rasterized");

    let data = pixmap.data();
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let idx = ((y * width + x) * 4) as usize;
        let avg = (u16::from(data[idx]) + u16::from(data[idx + 1]) + u16::from(data[idx + 2])) / 3;
        if avg < u16::from(threshold) {
            Luma([0])
        } else {
            Luma([255])
        }
    }))
}

/// Packs a thresholded image into 1-bit rows, most significant bit first,
/// with 1 meaning white as `DeviceGray` expects.
fn pack_bits(image: &GrayImage) -> Vec<u8> {
    let (width, height) = image.dimensions();
    let row_bytes = (width as usize).div_ceil(8);
    let mut out = vec![0u8; row_bytes * height as usize];
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[0] >= 128 {
            out[y as usize * row_bytes + x as usize / 8] |= 0x80 >> (x % 8);
        }
    }
    out
}

fn draw_guides(pixmap: &mut Pixmap, scene: &Scene, canvas: Transform) {
    for guide in scene.guides().iter().filter(|g| g.visible) {
        let Some(rect) = SkRect::from_xywh(
            guide.rect.left as f32,
            guide.rect.top as f32,
            guide.rect.width as f32,
            guide.rect.height as f32,
        ) else {
            continue;
        };
        let mut paint = Paint::default();
        match guide.kind {
            GuideKind::WorkArea => {
                paint.set_color(Color::WHITE);
                pixmap.fill_rect(rect, &paint, canvas, None);
            }
            GuideKind::Border | GuideKind::Safety => {
                let (r, g, b) = if guide.kind == GuideKind::Border { (120, 120, 120) } else { (220, 60, 60) };
                paint.set_color_rgba8(r, g, b, 255);
                let stroke = Stroke {
                    width: 1.0,
                    dash: StrokeDash::new(vec![4.0, 4.0], 0.0),
                    ..Default::default()
                };
                pixmap.stroke_path(&PathBuilder::from_rect(rect), &paint, &stroke, canvas, None);
            }
        }
    }
}

/// Centre, rotation and optional scale of an element, in canvas pixels.
fn element_transform(shape: &dyn StampShape, scale: (f64, f64), canvas: Transform) -> Transform {
    let center = shape.center();
    Transform::from_translate(center.x as f32, center.y as f32)
        .pre_rotate(shape.placement().angle as f32)
        .pre_scale(scale.0 as f32, scale.1 as f32)
        .post_concat(canvas)
}

fn color_paint(color: &str) -> Paint<'static> {
    let (r, g, b) = parse_hex_color(color);
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba(r as f32, g as f32, b as f32, 1.0).unwrap_or(Color::BLACK));
    paint.anti_alias = true;
    paint
}

fn draw_text(pixmap: &mut Pixmap, text: &StampText, catalog: &FontCatalog, canvas: Transform) {
    let resolved = catalog.get(&text.font_key());
    let Some(font) = resolved
        .outline_font()
        .or_else(|| font_manager::fallback_font(text.bold, text.italic))
    else {
        tracing::warn!(element = %text.meta.name, family = %text.font_family, "no outline font available, text not rasterized");
        return;
    };
    let p = text.placement;
    let transform = element_transform(text, (p.scale_x, p.scale_y), canvas);
    let size = text.font_size;
    let scale = em_scale(font, size);
    let spacing = text.char_spacing / 1000.0 * size;
    let mut builder = GlyphPathBuilder::default();
    let mut underlines = PathBuilder::new();

    for (i, line) in text.lines.iter().enumerate() {
        let gaps = line.chars().count().saturating_sub(1) as f64;
        let width = crate::text_metrics::font_advance(font, line, size) + spacing * gaps;
        let x = match text.align {
            TextAlign::Center => -width / 2.0,
            TextAlign::Right => text.width / 2.0 - width,
            TextAlign::Left | TextAlign::Justify => -text.width / 2.0,
        };
        let baseline = -text.height / 2.0 + size * BASELINE_RATIO + i as f64 * text.line_height * size;

        let mut cursor = x as f32;
        let mut previous = None;
        for ch in line.chars() {
            let glyph = font.glyph(ch);
            let id = glyph.id();
            if let Some(prev) = previous {
                cursor += font.pair_kerning(scale, prev, id);
            }
            let scaled = glyph.scaled(scale);
            let advance = scaled.h_metrics().advance_width;
            scaled
                .positioned(rt_point(cursor, baseline as f32))
                .build_outline(&mut builder);
            cursor += advance + spacing as f32;
            previous = Some(id);
        }

        if text.underline && !line.is_empty() {
            if let Some(rect) = SkRect::from_xywh(
                x as f32,
                (baseline + size * 0.1) as f32,
                width as f32,
                (size * 0.05) as f32,
            ) {
                underlines.push_rect(rect);
            }
        }
    }

    let paint = color_paint(&text.fill);
    if let Some(path) = builder.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
    if let Some(path) = underlines.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}

fn draw_frame(pixmap: &mut Pixmap, frame: &StampFrame, canvas: Transform) {
    let stroke_px = frame.stroke_px();
    if stroke_px <= 0.0 {
        return;
    }
    let (w, h) = frame.scaled_size();
    let (path_w, path_h) = (w - stroke_px, h - stroke_px);
    let Some(rect) = SkRect::from_xywh(
        (-path_w / 2.0) as f32,
        (-path_h / 2.0) as f32,
        path_w as f32,
        path_h as f32,
    ) else {
        return;
    };
    let transform = element_transform(frame, (1.0, 1.0), canvas);
    let stroke = Stroke {
        width: stroke_px as f32,
        ..Default::default()
    };
    pixmap.stroke_path(
        &PathBuilder::from_rect(rect),
        &color_paint(&frame.stroke_color),
        &stroke,
        transform,
        None,
    );
}

/// Collects rusttype glyph outlines into one tiny-skia path.
struct GlyphPathBuilder {
    builder: PathBuilder,
}

impl Default for GlyphPathBuilder {
    fn default() -> Self {
        Self {
            builder: PathBuilder::new(),
        }
    }
}

impl GlyphPathBuilder {
    fn finish(self) -> Option<Path> {
        self.builder.finish()
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
