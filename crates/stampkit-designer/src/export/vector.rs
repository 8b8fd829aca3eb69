//! Vector export: one page the size of the stamp, text kept as selectable
//! glyphs in embedded fonts and frames as stroked paths.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, ObjectId, Stream, StringFormat};

use stampkit_core::Result;

use super::fonts::{win_ansi_encode, EmbeddedFont, FontCatalog, FontProvider, OutlineFlavor, ResolvedFont};
use super::pdf::{op, parse_hex_color, real, PageMapper, PdfPage};
use crate::model::{Element, StampFrame, StampShape, StampText, TextAlign};
use crate::scene::Scene;

/// Distance from the top of a line box to its baseline, relative to the font size.
pub(crate) const BASELINE_RATIO: f64 = 0.75;
const UNDERLINE_OFFSET: f64 = 0.1;
const UNDERLINE_WIDTH: f64 = 0.05;

/// Renders every visible user element of `scene` into a vector PDF.
///
/// System guides, the selection and the canvas background are never drawn.
pub async fn export_vector(scene: &Scene, provider: &dyn FontProvider) -> Result<Vec<u8>> {
    let keys: Vec<_> = printable_texts(scene).map(|t| t.font_key()).collect();
    let catalog = FontCatalog::resolve(provider, keys).await;
    tracing::debug!(fonts = catalog.len(), "resolved export fonts");

    let mapper = PageMapper::new(scene.size());
    let mut ctx = PageContext::new(mapper, scene);
    for element in scene.elements().iter().filter(|e| e.is_visible()) {
        match element {
            Element::Text(text) if !text.is_blank() => ctx.draw_text(text, &catalog),
            Element::Text(_) => {}
            Element::Frame(frame) => ctx.draw_frame(frame),
        }
    }

    let (content, fonts) = ctx.finish();
    let mut page = PdfPage::new(scene.size());
    for font in fonts {
        let id = embed_font(&mut page, &font);
        page.add_resource("Font", &font.name, id);
    }
    let bytes = page.finish(content)?;
    tracing::info!(bytes = bytes.len(), "vector PDF written");
    Ok(bytes)
}

pub(crate) fn printable_texts(scene: &Scene) -> impl Iterator<Item = &StampText> {
    scene
        .elements()
        .iter()
        .filter(|e| e.is_visible())
        .filter_map(Element::as_text)
        .filter(|t| !t.is_blank())
}

/// A font as used on the page, with the glyphs it has to carry.
struct PageFont {
    name: String,
    font: Arc<ResolvedFont>,
    /// glyph id to the character it was drawn for
    glyphs: BTreeMap<u16, char>,
}

struct PageContext<'a> {
    mapper: PageMapper,
    scene: &'a Scene,
    content: Content,
    fonts: Vec<PageFont>,
    by_resource: HashMap<String, usize>,
}

impl<'a> PageContext<'a> {
    fn new(mapper: PageMapper, scene: &'a Scene) -> Self {
        Self {
            mapper,
            scene,
            content: Content { operations: Vec::new() },
            fonts: Vec::new(),
            by_resource: HashMap::new(),
        }
    }

    fn finish(self) -> (Content, Vec<PageFont>) {
        (self.content, self.fonts)
    }

    fn push(&mut self, operation: Operation) {
        self.content.operations.push(operation);
    }

    fn font_index(&mut self, font: Arc<ResolvedFont>) -> usize {
        let key = font.resource_key();
        if let Some(index) = self.by_resource.get(&key) {
            return *index;
        }
        let index = self.fonts.len();
        self.fonts.push(PageFont {
            name: format!("F{}", index + 1),
            font,
            glyphs: BTreeMap::new(),
        });
        self.by_resource.insert(key, index);
        index
    }

    /// Moves the origin to the element centre and applies its rotation and scale.
    fn begin_element(&mut self, shape: &dyn StampShape, scale: (f64, f64)) {
        let center = self.mapper.point(shape.center());
        let rad = -shape.placement().angle.to_radians();
        let (sin, cos) = rad.sin_cos();
        self.push(op("q", vec![]));
        self.push(op(
            "cm",
            vec![real(1.0), real(0.0), real(0.0), real(1.0), real(center.x), real(center.y)],
        ));
        self.push(op(
            "cm",
            vec![real(cos), real(sin), real(-sin), real(cos), real(0.0), real(0.0)],
        ));
        if scale != (1.0, 1.0) {
            self.push(op(
                "cm",
                vec![real(scale.0), real(0.0), real(0.0), real(scale.1), real(0.0), real(0.0)],
            ));
        }
    }

    fn draw_text(&mut self, text: &StampText, catalog: &FontCatalog) {
        let placement = text.placement;
        let font = catalog.get(&text.font_key());
        let index = self.font_index(font.clone());
        let size = self.scene.units().px_to_pt(text.font_size);
        let block_w = self.mapper.length(text.width);
        let block_h = self.mapper.length(text.height);
        let spacing = text.char_spacing / 1000.0 * size;
        let (r, g, b) = parse_hex_color(&text.fill);

        self.begin_element(text, (placement.scale_x, placement.scale_y));
        self.push(op("BT", vec![]));
        self.push(op(
            "Tf",
            vec![Object::Name(self.fonts[index].name.as_bytes().to_vec()), real(size)],
        ));
        self.push(op("rg", vec![real(r), real(g), real(b)]));

        let mut underlines = Vec::new();
        for (i, line) in text.lines.iter().enumerate() {
            let gaps = line.chars().count().saturating_sub(1) as f64;
            let width = font.text_width(line, size) + spacing * gaps;
            let x = match text.align {
                TextAlign::Center => -width / 2.0,
                TextAlign::Right => block_w / 2.0 - width,
                TextAlign::Left | TextAlign::Justify => -block_w / 2.0,
            };
            let y = block_h / 2.0 - size * BASELINE_RATIO - i as f64 * text.line_height * size;
            if line.is_empty() {
                continue;
            }
            if spacing == 0.0 {
                self.set_text_position(x, y);
                let encoded = self.encode(index, line);
                self.push(op("Tj", vec![encoded]));
            } else {
                let mut cursor = x;
                let mut buf = [0u8; 4];
                for ch in line.chars() {
                    self.set_text_position(cursor, y);
                    let encoded = self.encode(index, ch.encode_utf8(&mut buf));
                    self.push(op("Tj", vec![encoded]));
                    cursor += font.char_width(ch, size) + spacing;
                }
            }
            if text.underline {
                underlines.push((x, y - size * UNDERLINE_OFFSET, width));
            }
        }
        self.push(op("ET", vec![]));

        if !underlines.is_empty() {
            self.push(op("w", vec![real(size * UNDERLINE_WIDTH)]));
            self.push(op("RG", vec![real(r), real(g), real(b)]));
            for (x, y, width) in underlines {
                self.push(op("m", vec![real(x), real(y)]));
                self.push(op("l", vec![real(x + width), real(y)]));
                self.push(op("S", vec![]));
            }
        }
        self.push(op("Q", vec![]));
    }

    fn set_text_position(&mut self, x: f64, y: f64) {
        self.push(op(
            "Tm",
            vec![real(1.0), real(0.0), real(0.0), real(1.0), real(x), real(y)],
        ));
    }

    fn encode(&mut self, index: usize, line: &str) -> Object {
        let page_font = &mut self.fonts[index];
        match page_font.font.as_ref() {
            ResolvedFont::Embedded(font) => {
                let mut bytes = Vec::with_capacity(line.len() * 2);
                for ch in line.chars() {
                    let gid = font.glyph_id(ch);
                    page_font.glyphs.entry(gid).or_insert(ch);
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
            ResolvedFont::Helvetica => {
                Object::String(win_ansi_encode(line), StringFormat::Literal)
            }
        }
    }

    /// The path runs along the middle of the stroke, so the outer edge of
    /// the stroke matches the element's bounds.
    fn draw_frame(&mut self, frame: &StampFrame) {
        let stroke_px = frame.stroke_px();
        if stroke_px <= 0.0 {
            return;
        }
        let (w, h) = frame.scaled_size();
        let path_w = self.mapper.length(w - stroke_px);
        let path_h = self.mapper.length(h - stroke_px);
        let (r, g, b) = parse_hex_color(&frame.stroke_color);

        self.begin_element(frame, (1.0, 1.0));
        self.push(op("w", vec![real(self.mapper.length(stroke_px))]));
        self.push(op("RG", vec![real(r), real(g), real(b)]));
        self.push(op(
            "re",
            vec![real(-path_w / 2.0), real(-path_h / 2.0), real(path_w), real(path_h)],
        ));
        self.push(op("S", vec![]));
        self.push(op("Q", vec![]));
    }
}

fn embed_font(page: &mut PdfPage, font: &PageFont) -> ObjectId {
    match font.font.as_ref() {
        ResolvedFont::Helvetica => page.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        }),
        ResolvedFont::Embedded(embedded) => embed_type0(page, embedded, &font.glyphs),
    }
}

/// Embeds a complete font file as a Type0 font with an Identity-H encoding,
/// so the content streams address glyphs directly by id.
fn embed_type0(page: &mut PdfPage, font: &EmbeddedFont, glyphs: &BTreeMap<u16, char>) -> ObjectId {
    let base_name = font.base_name();
    let data = font.data.as_ref().clone();

    let (file_key, file_stream, cid_subtype) = match font.flavor {
        OutlineFlavor::TrueType => (
            "FontFile2",
            Stream::new(dictionary! { "Length1" => data.len() as i64 }, data),
            "CIDFontType2",
        ),
        OutlineFlavor::Cff => (
            "FontFile3",
            Stream::new(dictionary! { "Subtype" => "OpenType" }, data),
            "CIDFontType0",
        ),
    };
    let file_id = page.add_object(file_stream);

    let units_per_em = f64::from(font.font().units_per_em().max(1));
    let v = font.font().v_metrics_unscaled();
    let ascent = f64::from(v.ascent) * 1000.0 / units_per_em;
    let descent = f64::from(v.descent) * 1000.0 / units_per_em;
    let italic_angle = if font.variant.is_italic() { -12 } else { 0 };

    let mut descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => base_name.as_str(),
        "Flags" => 32,
        "FontBBox" => vec![0.into(), real(descent), 1000.into(), real(ascent)],
        "ItalicAngle" => italic_angle,
        "Ascent" => real(ascent),
        "Descent" => real(descent),
        "CapHeight" => real(ascent),
        "StemV" => if font.variant.is_bold() { 120 } else { 80 },
    };
    descriptor.set(file_key, file_id);
    let descriptor_id = page.add_object(descriptor);

    let widths: Vec<Object> = glyphs
        .iter()
        .flat_map(|(gid, ch)| {
            [
                Object::Integer(i64::from(*gid)),
                Object::Array(vec![real(font.glyph_width_1000(*ch).round())]),
            ]
        })
        .collect();

    let mut cid_font = dictionary! {
        "Type" => "Font",
        "Subtype" => cid_subtype,
        "BaseFont" => base_name.as_str(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "W" => widths,
    };
    if font.flavor == OutlineFlavor::TrueType {
        cid_font.set("CIDToGIDMap", "Identity");
    }
    let cid_font_id = page.add_object(cid_font);

    let to_unicode_id = page.add_object(Stream::new(dictionary! {}, to_unicode_cmap(glyphs).into_bytes()));

    page.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => base_name.as_str(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![cid_font_id.into()],
        "ToUnicode" => to_unicode_id,
    })
}

/// Maps glyph ids back to text so the PDF stays searchable.
fn to_unicode_cmap(glyphs: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    let entries: Vec<_> = glyphs.iter().collect();
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let utf16: String = ch
                .encode_utf16(&mut [0; 2])
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, utf16));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}
