//! Text measurement.
//!
//! Layout needs the advance width of a line at a given pixel size. The
//! [`FontMeasurer`] uses installed fonts through rusttype; the
//! [`ApproximateMeasurer`] gives stable widths from per-glyph classes and is
//! used whenever a family cannot be found.

use rusttype::{Font, Scale};
use std::fmt::Debug;

use crate::font_manager::{self, FontKey};

/// Glyph box height relative to the font size.
pub const FONT_SIZE_MULT: f64 = 1.13;

pub fn default_line_height() -> f64 {
    1.16
}

pub trait TextMeasurer: Send + Sync + Debug {
    /// Natural advance width of `text` at `size_px`, without tracking.
    fn advance_width(&self, text: &str, font: &FontKey, size_px: f64) -> f64;

    /// Width including `char_spacing` (thousandths of an em) between glyphs.
    fn line_width(&self, text: &str, font: &FontKey, size_px: f64, char_spacing: f64) -> f64 {
        let natural = self.advance_width(text, font, size_px);
        let gaps = text.chars().count().saturating_sub(1) as f64;
        natural + char_spacing / 1000.0 * size_px * gaps
    }
}

/// Unscaled block size for `lines`: widest line by stacked line boxes.
pub fn measure_block(
    measurer: &dyn TextMeasurer,
    lines: &[String],
    font: &FontKey,
    size_px: f64,
    char_spacing: f64,
    line_height: f64,
) -> (f64, f64) {
    let width = lines
        .iter()
        .map(|line| measurer.line_width(line, font, size_px, char_spacing))
        .fold(0.0, f64::max);
    let count = lines.len().max(1) as f64;
    let height = size_px * FONT_SIZE_MULT * (line_height * (count - 1.0) + 1.0);
    (width, height)
}

/// rusttype scale for a CSS-style font size (one em equals `size` units).
pub fn em_scale(font: &Font<'_>, size: f64) -> Scale {
    let v = font.v_metrics_unscaled();
    let units_per_em = f64::from(font.units_per_em().max(1));
    let extent = f64::from(v.ascent - v.descent);
    Scale::uniform((size * extent / units_per_em) as f32)
}

/// Advance width of `text` in `font`, kerning included.
pub fn font_advance(font: &Font<'_>, text: &str, size: f64) -> f64 {
    let scale = em_scale(font, size);
    let mut width = 0.0f32;
    let mut previous = None;
    for ch in text.chars() {
        let glyph = font.glyph(ch);
        let id = glyph.id();
        if let Some(prev) = previous {
            width += font.pair_kerning(scale, prev, id);
        }
        width += glyph.scaled(scale).h_metrics().advance_width;
        previous = Some(id);
    }
    f64::from(width)
}

/// Glyph-class widths, in ems, loosely following a humanist sans.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateMeasurer;

impl ApproximateMeasurer {
    fn char_em(ch: char) -> f64 {
        match ch {
            ' ' => 0.28,
            'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.24,
            'f' | 't' | 'r' | 'I' | '(' | ')' | '-' => 0.34,
            'm' | 'w' | 'M' | 'W' => 0.82,
            '0'..='9' => 0.556,
            c if c.is_uppercase() => 0.66,
            _ => 0.52,
        }
    }
}

impl TextMeasurer for ApproximateMeasurer {
    fn advance_width(&self, text: &str, font: &FontKey, size_px: f64) -> f64 {
        let ems: f64 = text.chars().map(Self::char_em).sum();
        let weight = if font.bold { 1.06 } else { 1.0 };
        ems * size_px * weight
    }
}

/// Measures with installed fonts, falling back to [`ApproximateMeasurer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMeasurer {
    fallback: ApproximateMeasurer,
}

impl FontMeasurer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextMeasurer for FontMeasurer {
    fn advance_width(&self, text: &str, font: &FontKey, size_px: f64) -> f64 {
        match font_manager::get_font_for(&font.family, font.bold, font.italic) {
            Some(f) => font_advance(f, text, size_px),
            None => self.fallback.advance_width(text, font, size_px),
        }
    }
}
