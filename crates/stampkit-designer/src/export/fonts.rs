//! Font resolution for export.
//!
//! A [`FontProvider`] maps a family and style variant to font file bytes.
//! [`FontCatalog::resolve`] walks the variant fallback chain for every text
//! style in the document and degrades to the built-in Helvetica when nothing
//! embeddable is found, so an export always completes.

use async_trait::async_trait;
use fontdb::Database;
use rusttype::Font;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use stampkit_settings::ExportSettings;

use crate::font_manager::{self, FontKey, FontVariant};
use crate::text_metrics;

/// Raw font file contents plus the face index inside a collection.
#[derive(Debug, Clone)]
pub struct FontBytes {
    pub data: Arc<Vec<u8>>,
    pub index: u32,
}

impl FontBytes {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(data),
            index: 0,
        }
    }
}

#[async_trait]
pub trait FontProvider: Send + Sync {
    /// Bytes for exactly this family and variant, or `None`.
    async fn load(&self, family: &str, variant: FontVariant) -> Option<FontBytes>;
}

/// Fonts registered up front, keyed case-insensitively by family.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFontProvider {
    fonts: HashMap<(String, FontVariant), FontBytes>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, family: &str, variant: FontVariant, font: FontBytes) {
        self.fonts.insert((family.to_lowercase(), variant), font);
    }

    pub fn with_font(mut self, family: &str, variant: FontVariant, font: FontBytes) -> Self {
        self.insert(family, variant, font);
        self
    }
}

#[async_trait]
impl FontProvider for InMemoryFontProvider {
    async fn load(&self, family: &str, variant: FontVariant) -> Option<FontBytes> {
        self.fonts.get(&(family.to_lowercase(), variant)).cloned()
    }
}

/// Installed fonts plus any configured font directories, indexed by fontdb.
pub struct FontDbProvider {
    db: Database,
}

impl FontDbProvider {
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub async fn from_settings(settings: &ExportSettings) -> Self {
        let mut db = Database::new();
        if settings.use_system_fonts {
            db.load_system_fonts();
        }
        for dir in &settings.font_dirs {
            load_font_dir(&mut db, dir).await;
        }
        tracing::debug!(faces = db.len(), "font database ready for export");
        Self { db }
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }
}

async fn load_font_dir(db: &mut Database, dir: &Path) {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot read font directory");
            return;
        }
    };
    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "font directory listing failed");
                break;
            }
        };
        let path = entry.path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"))
            .unwrap_or(false);
        if !is_font {
            continue;
        }
        match tokio::fs::read(&path).await {
            Ok(bytes) => db.load_font_data(bytes),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "cannot read font file"),
        }
    }
}

#[async_trait]
impl FontProvider for FontDbProvider {
    async fn load(&self, family: &str, variant: FontVariant) -> Option<FontBytes> {
        let id = font_manager::find_exact_face(&self.db, family, variant)?;
        let (data, index) = font_manager::face_data(&self.db, id)?;
        Some(FontBytes {
            data: Arc::new(data),
            index,
        })
    }
}

/// Outline format of an embeddable font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineFlavor {
    TrueType,
    /// OpenType with CFF outlines (`OTTO`)
    Cff,
}

impl OutlineFlavor {
    /// Detects the format from the sfnt header. Collections are not embeddable.
    pub fn detect(data: &[u8]) -> Option<Self> {
        let magic = data.get(0..4)?;
        if magic == b"OTTO" {
            Some(OutlineFlavor::Cff)
        } else if magic == [0, 1, 0, 0] || magic == b"true" {
            Some(OutlineFlavor::TrueType)
        } else {
            None
        }
    }
}

/// A font file that can be embedded and drawn.
pub struct EmbeddedFont {
    pub family: String,
    pub variant: FontVariant,
    pub data: Arc<Vec<u8>>,
    pub flavor: OutlineFlavor,
    font: Font<'static>,
}

impl std::fmt::Debug for EmbeddedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedFont")
            .field("family", &self.family)
            .field("variant", &self.variant)
            .field("flavor", &self.flavor)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl EmbeddedFont {
    fn parse(family: &str, variant: FontVariant, bytes: FontBytes) -> Option<Self> {
        let flavor = OutlineFlavor::detect(&bytes.data)?;
        let font = Font::try_from_vec_and_index(bytes.data.as_ref().clone(), bytes.index)?;
        Some(Self {
            family: family.to_string(),
            variant,
            data: bytes.data,
            flavor,
            font,
        })
    }

    pub fn font(&self) -> &Font<'static> {
        &self.font
    }

    /// PostScript-style name used for the embedded font.
    pub fn base_name(&self) -> String {
        let family: String = self.family.chars().filter(|c| !c.is_whitespace()).collect();
        match self.variant {
            FontVariant::Regular => family,
            FontVariant::Bold => format!("{}-Bold", family),
            FontVariant::Italic => format!("{}-Italic", family),
            FontVariant::BoldItalic => format!("{}-BoldItalic", family),
        }
    }

    pub fn glyph_id(&self, ch: char) -> u16 {
        self.font.glyph(ch).id().0
    }

    /// Advance of one glyph in thousandths of an em.
    pub fn glyph_width_1000(&self, ch: char) -> f64 {
        text_metrics::font_advance(&self.font, ch.encode_utf8(&mut [0; 4]), 1000.0)
    }
}

/// What a text style draws with.
#[derive(Debug)]
pub enum ResolvedFont {
    Embedded(EmbeddedFont),
    /// Standard Helvetica, not embedded
    Helvetica,
}

impl ResolvedFont {
    /// Identity of the font resource; styles resolving to the same file share it.
    pub fn resource_key(&self) -> String {
        match self {
            ResolvedFont::Embedded(f) => format!("{}|{:?}", f.family.to_lowercase(), f.variant),
            ResolvedFont::Helvetica => "Helvetica".to_string(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedFont::Helvetica)
    }

    /// Outlines for rasterization; the built-in font has none.
    pub fn outline_font(&self) -> Option<&Font<'static>> {
        match self {
            ResolvedFont::Embedded(f) => Some(f.font()),
            ResolvedFont::Helvetica => None,
        }
    }

    pub fn char_width(&self, ch: char, size: f64) -> f64 {
        match self {
            ResolvedFont::Embedded(f) => f.glyph_width_1000(ch) * size / 1000.0,
            ResolvedFont::Helvetica => f64::from(helvetica_width(ch)) * size / 1000.0,
        }
    }

    /// Natural width of a run as the PDF viewer lays it out, without kerning.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().map(|ch| self.char_width(ch, size)).sum()
    }
}

/// Resolved fonts for every text style of one export.
#[derive(Debug, Default)]
pub struct FontCatalog {
    fonts: HashMap<FontKey, Arc<ResolvedFont>>,
}

impl FontCatalog {
    /// Resolves every key: exact variant first, then its fallbacks, then Helvetica.
    pub async fn resolve(
        provider: &dyn FontProvider,
        keys: impl IntoIterator<Item = FontKey>,
    ) -> Self {
        let keys: BTreeSet<FontKey> = keys.into_iter().collect();
        let mut by_resource: HashMap<String, Arc<ResolvedFont>> = HashMap::new();
        let mut fonts = HashMap::new();

        for key in keys {
            let resolved = resolve_one(provider, &key).await;
            let shared = by_resource
                .entry(resolved.resource_key())
                .or_insert_with(|| Arc::new(resolved))
                .clone();
            fonts.insert(key, shared);
        }
        Self { fonts }
    }

    pub fn get(&self, key: &FontKey) -> Arc<ResolvedFont> {
        self.fonts
            .get(key)
            .cloned()
            .unwrap_or_else(|| Arc::new(ResolvedFont::Helvetica))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

async fn resolve_one(provider: &dyn FontProvider, key: &FontKey) -> ResolvedFont {
    for variant in key.variant().fallback_chain() {
        let Some(bytes) = provider.load(&key.family, *variant).await else {
            continue;
        };
        match EmbeddedFont::parse(&key.family, *variant, bytes) {
            Some(font) => {
                if *variant != key.variant() {
                    tracing::warn!(family = %key.family, wanted = ?key.variant(), used = ?variant, "font variant missing, using fallback variant");
                }
                return ResolvedFont::Embedded(font);
            }
            None => {
                tracing::warn!(family = %key.family, variant = ?variant, "font is not embeddable");
            }
        }
    }
    tracing::warn!(family = %key.family, bold = key.bold, italic = key.italic, "font not found, falling back to Helvetica");
    ResolvedFont::Helvetica
}

/// Helvetica advance widths from the standard AFM, per mille of the em.
pub fn helvetica_width(ch: char) -> u16 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        278, 278, 584, 584, 584, 556, 1015, // :..@
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
        278, 278, 278, 469, 556, 333, // [..`
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
        334, 260, 334, 584, // {..~
    ];
    match ch {
        ' '..='~' => ASCII[ch as usize - 0x20],
        _ => 556,
    }
}

/// Encodes text for the built-in font (WinAnsiEncoding); unmappable characters become `?`.
pub fn win_ansi_encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => ch as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_family_falls_back_to_helvetica() {
        let provider = InMemoryFontProvider::new();
        let key = FontKey::new("Myriad Pro", true, true);
        let catalog = FontCatalog::resolve(&provider, [key.clone()]).await;
        assert!(catalog.get(&key).is_fallback());
    }

    #[tokio::test]
    async fn test_unparseable_bytes_fall_back() {
        let provider = InMemoryFontProvider::new().with_font(
            "Broken",
            FontVariant::Regular,
            FontBytes::new(b"not a font".to_vec()),
        );
        let key = FontKey::new("Broken", false, false);
        let catalog = FontCatalog::resolve(&provider, [key.clone()]).await;
        assert!(catalog.get(&key).is_fallback());
    }

    #[test]
    fn test_outline_flavor_detection() {
        assert_eq!(OutlineFlavor::detect(b"OTTO...."), Some(OutlineFlavor::Cff));
        assert_eq!(
            OutlineFlavor::detect(&[0, 1, 0, 0, 0]),
            Some(OutlineFlavor::TrueType)
        );
        assert_eq!(OutlineFlavor::detect(b"ttcf"), None);
    }

    #[test]
    fn test_helvetica_metrics() {
        assert_eq!(helvetica_width(' '), 278);
        assert_eq!(helvetica_width('A'), 667);
        assert_eq!(helvetica_width('z'), 500);
        assert_eq!(helvetica_width('~'), 584);
        let w = ResolvedFont::Helvetica.text_width("AA", 10.0);
        assert!((w - 13.34).abs() < 1e-9);
    }

    #[test]
    fn test_win_ansi() {
        assert_eq!(win_ansi_encode("Aé€ł"), vec![b'A', 0xe9, 0x80, b'?']);
    }
}
