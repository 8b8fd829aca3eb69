use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ElementMeta, OriginX, OriginY, Placement, StampShape};
use crate::font_manager::FontKey;
use crate::text_metrics::{self, TextMeasurer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
    Justify,
}

/// Per-character overrides. Unset fields inherit from the element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
}

impl CharStyle {
    pub fn is_empty(&self) -> bool {
        self.font_family.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.fill.is_none()
    }
}

/// Overrides keyed by line index, then character index within the line.
pub type CharStyles = BTreeMap<usize, BTreeMap<usize, CharStyle>>;

/// Which override a whole-element style edit clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleProperty {
    FontFamily,
    Bold,
    Italic,
    Underline,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampText {
    #[serde(flatten)]
    pub meta: ElementMeta,
    #[serde(flatten)]
    pub placement: Placement,
    pub lines: Vec<String>,
    pub font_family: String,
    /// Font size in canvas px
    pub font_size: f64,
    /// Extra tracking in thousandths of an em
    #[serde(default)]
    pub char_spacing: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub align: TextAlign,
    pub fill: String,
    #[serde(default = "text_metrics::default_line_height")]
    pub line_height: f64,
    #[serde(default, with = "styles_as_list")]
    pub styles: CharStyles,
    /// Unscaled block width, recomputed by [`StampText::relayout`]
    pub width: f64,
    /// Unscaled block height, recomputed by [`StampText::relayout`]
    pub height: f64,
}

impl StampText {
    pub fn new(name: impl Into<String>, text: &str, font_family: &str, font_size: f64) -> Self {
        Self {
            meta: ElementMeta::new(name),
            placement: Placement::new(0.0, 0.0, OriginX::Center, OriginY::Center),
            lines: split_lines(text),
            font_family: font_family.to_string(),
            font_size,
            char_spacing: 0.0,
            bold: false,
            italic: false,
            underline: false,
            align: TextAlign::Center,
            fill: "#000000".to_string(),
            line_height: text_metrics::default_line_height(),
            styles: CharStyles::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
        let line_count = self.lines.len();
        self.styles.retain(|line, _| *line < line_count);
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn font_key(&self) -> FontKey {
        FontKey::new(&self.font_family, self.bold, self.italic)
    }

    /// Recomputes the unscaled block size from the current content and font.
    pub fn relayout(&mut self, measurer: &dyn TextMeasurer) {
        let (w, h) = text_metrics::measure_block(
            measurer,
            &self.lines,
            &self.font_key(),
            self.font_size,
            self.char_spacing,
            self.line_height,
        );
        self.width = w;
        self.height = h;
    }

    /// Drops the matching override from every character.
    pub fn clear_style_property(&mut self, property: StyleProperty) {
        for line in self.styles.values_mut() {
            for style in line.values_mut() {
                match property {
                    StyleProperty::FontFamily => style.font_family = None,
                    StyleProperty::Bold => style.bold = None,
                    StyleProperty::Italic => style.italic = None,
                    StyleProperty::Underline => style.underline = None,
                    StyleProperty::Fill => style.fill = None,
                }
            }
            line.retain(|_, style| !style.is_empty());
        }
        self.styles.retain(|_, line| !line.is_empty());
    }

    /// Overrides for one line, re-keyed so the line becomes line 0.
    pub fn styles_for_line(&self, line: usize) -> CharStyles {
        let mut out = CharStyles::new();
        if let Some(chars) = self.styles.get(&line) {
            out.insert(0, chars.clone());
        }
        out
    }
}

/// Overrides are stored as a flat list so integer keys survive tagged
/// and flattened (de)serialization.
mod styles_as_list {
    use super::{CharStyle, CharStyles};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct StyledChar {
        line: usize,
        index: usize,
        #[serde(flatten)]
        style: CharStyle,
    }

    pub fn serialize<S: Serializer>(styles: &CharStyles, serializer: S) -> Result<S::Ok, S::Error> {
        let list: Vec<StyledChar> = styles
            .iter()
            .flat_map(|(line, chars)| {
                chars.iter().map(move |(index, style)| StyledChar {
                    line: *line,
                    index: *index,
                    style: style.clone(),
                })
            })
            .collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CharStyles, D::Error> {
        let list = Vec::<StyledChar>::deserialize(deserializer)?;
        let mut styles = CharStyles::new();
        for item in list {
            styles.entry(item.line).or_default().insert(item.index, item.style);
        }
        Ok(styles)
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect()
}

impl StampShape for StampText {
    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }

    fn placement(&self) -> &Placement {
        &self.placement
    }

    fn placement_mut(&mut self) -> &mut Placement {
        &mut self.placement
    }

    fn intrinsic_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lines() {
        let mut t = StampText::new("Text 1", "ACME\nWarszawa", "Arial", 13.33);
        assert_eq!(t.lines.len(), 2);
        assert_eq!(t.text(), "ACME\nWarszawa");
        t.set_text("single");
        assert_eq!(t.lines, vec!["single".to_string()]);
        assert!(!t.is_blank());
        t.set_text("  \n ");
        assert!(t.is_blank());
    }

    #[test]
    fn test_clear_style_property() {
        let mut t = StampText::new("Text 1", "NIP: 123", "Arial", 9.33);
        let mut line = BTreeMap::new();
        line.insert(
            5,
            CharStyle {
                font_family: Some("Arial Narrow".into()),
                bold: Some(true),
                ..Default::default()
            },
        );
        line.insert(
            6,
            CharStyle {
                font_family: Some("Arial Narrow".into()),
                ..Default::default()
            },
        );
        t.styles.insert(0, line);

        t.clear_style_property(StyleProperty::FontFamily);
        let remaining = &t.styles[&0];
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[&5].bold, Some(true));

        t.clear_style_property(StyleProperty::Bold);
        assert!(t.styles.is_empty());
    }

    #[test]
    fn test_set_text_drops_styles_of_removed_lines() {
        let mut t = StampText::new("Text 1", "a\nb", "Arial", 10.0);
        t.styles.entry(1).or_default().insert(0, CharStyle {
            bold: Some(true),
            ..Default::default()
        });
        t.set_text("a");
        assert!(t.styles.is_empty());
    }
}
