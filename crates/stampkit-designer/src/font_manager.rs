use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use rusttype::Font;
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fs,
    sync::{Mutex, OnceLock},
};

/// Family plus style flags, the unit of font resolution.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl FontKey {
    pub fn new(family: &str, bold: bool, italic: bool) -> Self {
        Self {
            family: family.to_string(),
            bold,
            italic,
        }
    }

    pub fn variant(&self) -> FontVariant {
        FontVariant::from_flags(self.bold, self.italic)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontVariant {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => FontVariant::BoldItalic,
            (true, false) => FontVariant::Bold,
            (false, true) => FontVariant::Italic,
            (false, false) => FontVariant::Regular,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, FontVariant::Italic | FontVariant::BoldItalic)
    }

    /// This variant followed by the variants tried when it is missing.
    pub fn fallback_chain(self) -> &'static [FontVariant] {
        match self {
            FontVariant::BoldItalic => &[
                FontVariant::BoldItalic,
                FontVariant::Bold,
                FontVariant::Italic,
                FontVariant::Regular,
            ],
            FontVariant::Bold => &[FontVariant::Bold, FontVariant::Regular],
            FontVariant::Italic => &[FontVariant::Italic, FontVariant::Regular],
            FontVariant::Regular => &[FontVariant::Regular],
        }
    }
}

pub(crate) fn system_db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system font database");
        db
    })
}

/// Families installed on this host, sorted and deduplicated.
pub fn list_font_families() -> Vec<String> {
    font_families(system_db())
}

pub fn font_families(db: &Database) -> Vec<String> {
    let mut set = HashSet::new();
    for face in db.faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Public-domain sans face shipped with the crate.
pub fn bundled_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font_data = include_bytes!("../../../assets/fonts/tuffy/Tuffy.ttf");
        Font::try_from_bytes(font_data as &[u8])
    })
    .as_ref()
}

/// Outlines for text whose family resolved to the built-in Helvetica:
/// an installed Helvetica-like sans when there is one, else the bundled face.
pub fn fallback_font(bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    FALLBACK_FAMILIES
        .iter()
        .find_map(|family| get_font_for(family, bold, italic))
        .or_else(bundled_font)
}

const FALLBACK_FAMILIES: [&str; 3] = ["Helvetica", "Arial", "Sans"];

fn query_face(db: &Database, family: &str, bold: bool, italic: bool) -> Option<ID> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    db.query(&query)
}

/// Face of `family` whose weight and slant match `variant` exactly.
pub fn find_exact_face(db: &Database, family: &str, variant: FontVariant) -> Option<ID> {
    let id = query_face(db, family, variant.is_bold(), variant.is_italic())?;
    let face = db.face(id)?;
    let family_matches = face
        .families
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(family.trim()));
    let is_bold = face.weight.0 >= Weight::SEMIBOLD.0;
    let is_italic = face.style != Style::Normal;
    (family_matches && is_bold == variant.is_bold() && is_italic == variant.is_italic())
        .then_some(id)
}

/// Raw file bytes and collection index of a face.
pub fn face_data(db: &Database, id: ID) -> Option<(Vec<u8>, u32)> {
    let face = db.face(id)?;
    let bytes = match &face.source {
        fontdb::Source::File(path) => fs::read(path).ok()?,
        fontdb::Source::SharedFile(path, _) => fs::read(path).ok()?,
        fontdb::Source::Binary(bytes) => bytes.as_ref().as_ref().to_vec(),
    };
    Some((bytes, face.index))
}

/// Closest installed font for measuring, or `None` when the family is unknown.
pub fn get_font_for(family: &str, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey::new(family, bold, italic);

    if let Some(font) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return *font;
    }

    let loaded = load_font_from_system(family, bold, italic);
    let font_ref: Option<&'static Font<'static>> = loaded.map(|font| &*Box::leak(Box::new(font)));
    if font_ref.is_none() {
        tracing::debug!(family, bold, italic, "no installed font for family");
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, font_ref);
    font_ref
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let db = system_db();
    let id = query_face(db, family, bold, italic)?;
    let (bytes, index) = face_data(db, id)?;
    Font::try_from_vec_and_index(bytes, index)
}
