//! Page geometry and document assembly shared by both export pipelines.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use stampkit_core::{Error, Result, UnitConverter, WORK_AREA_LEFT, WORK_AREA_TOP};

use crate::document::StampSize;
use crate::geometry::{Point, Rect};

/// Page size in points for a document, exactly `mm × 72 / 25.4`.
pub fn page_size_pt(size: &StampSize) -> (f64, f64) {
    let units = UnitConverter::STANDARD;
    (units.mm_to_pt(size.width_mm), units.mm_to_pt(size.height_mm))
}

/// Maps canvas pixels onto page points: work-area origin removed, y flipped.
#[derive(Debug, Clone, Copy)]
pub struct PageMapper {
    units: UnitConverter,
    width_pt: f64,
    height_pt: f64,
}

impl PageMapper {
    pub fn new(size: &StampSize) -> Self {
        let (width_pt, height_pt) = page_size_pt(size);
        Self {
            units: UnitConverter::STANDARD,
            width_pt,
            height_pt,
        }
    }

    pub fn page_size(&self) -> (f64, f64) {
        (self.width_pt, self.height_pt)
    }

    pub fn length(&self, px: f64) -> f64 {
        self.units.px_to_page_pt(px)
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(
            self.length(p.x - WORK_AREA_LEFT),
            self.height_pt - self.length(p.y - WORK_AREA_TOP),
        )
    }

    /// Rectangle with a bottom-left origin, as PDF `re` expects.
    pub fn rect(&self, r: Rect) -> Rect {
        let top_left = self.point(Point::new(r.left, r.top));
        let width = self.length(r.width);
        let height = self.length(r.height);
        Rect::new(top_left.x, top_left.y - height, width, height)
    }
}

/// `#rrggbb` or `#rgb` to unit RGB; anything else is black.
pub fn parse_hex_color(color: &str) -> (f64, f64, f64) {
    let hex = color.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return (0.0, 0.0, 0.0),
    };
    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i..i + 2], 16)
            .map(|v| f64::from(v) / 255.0)
            .ok()
    };
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => (r, g, b),
        _ => (0.0, 0.0, 0.0),
    }
}

pub(crate) fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

pub(crate) fn op(operator: &str, operands: Vec<Object>) -> Operation {
    Operation::new(operator, operands)
}

/// A one-page document under construction.
pub struct PdfPage {
    doc: Document,
    pages_id: ObjectId,
    width_pt: f64,
    height_pt: f64,
    resources: Dictionary,
}

impl PdfPage {
    pub fn new(size: &StampSize) -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let (width_pt, height_pt) = page_size_pt(size);
        Self {
            doc,
            pages_id,
            width_pt,
            height_pt,
            resources: Dictionary::new(),
        }
    }

    pub fn add_object(&mut self, object: impl Into<Object>) -> ObjectId {
        self.doc.add_object(object)
    }

    /// Registers a named resource in a category such as `Font` or `XObject`.
    pub fn add_resource(&mut self, category: &str, name: &str, id: ObjectId) {
        let mut entries = match self.resources.get(category.as_bytes()) {
            Ok(Object::Dictionary(d)) => d.clone(),
            _ => Dictionary::new(),
        };
        entries.set(name, id);
        self.resources.set(category, entries);
    }

    /// Writes the page with `content`, compresses streams and serializes the file.
    pub fn finish(mut self, content: Content) -> Result<Vec<u8>> {
        let encoded = content
            .encode()
            .map_err(|e| Error::export(format!("content stream: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));
        let resources_id = self.doc.add_object(self.resources);

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), real(self.width_pt), real(self.height_pt)],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        let info_id = self.doc.add_object(dictionary! {
            "Producer" => Object::string_literal("stampkit"),
        });
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        let mut out = Vec::new();
        self.doc
            .save_to(&mut out)
            .map_err(|e| Error::export(format!("writing PDF: {}", e)))?;
        Ok(out)
    }
}
