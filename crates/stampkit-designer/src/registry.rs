//! Turns a business-registry record into stamp text.
//!
//! The lookup itself happens elsewhere; this module only wraps the returned
//! strings into lines and adds them to the scene as one text element.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{CharStyle, CharStyles, ElementId};
use crate::scene::{Scene, TextOptions};

/// Name lines are broken near this many characters.
pub const NAME_BREAK_AT: usize = 30;
/// Addresses longer than this put the city on its own line.
pub const ADDRESS_BREAK_AT: usize = 50;
/// Family used for the digits of the identifier line.
pub const DIGIT_FAMILY: &str = "Arial Narrow";
pub const REGISTRY_FAMILY: &str = "Arial";
pub const REGISTRY_SIZE_PT: f64 = 7.0;

/// Company data as returned by a registry lookup. Fields may hold HTML entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryRecord {
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub building_number: String,
    #[serde(default)]
    pub unit_number: Option<String>,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub city: String,
    /// NIP
    #[serde(default)]
    pub tax_id: String,
    /// REGON
    #[serde(default)]
    pub statistical_id: String,
}

/// Lines ready for a text element, with the overrides for the identifier line.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRecord {
    pub lines: Vec<String>,
    pub styles: CharStyles,
}

impl FormattedRecord {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn format_record(record: &RegistryRecord) -> FormattedRecord {
    let mut lines = split_name(&decode_entities(&record.name));
    lines.extend(format_address(record));
    let ids = ids_line(record);
    lines.push(ids.clone());
    lines.retain(|l| !l.trim().is_empty());

    let mut styles = CharStyles::new();
    if !ids.is_empty() {
        if let Some(index) = lines.iter().position(|l| *l == ids) {
            let digits: BTreeMap<usize, CharStyle> = ids
                .chars()
                .enumerate()
                .filter(|(_, c)| c.is_ascii_digit())
                .map(|(i, _)| {
                    let style = CharStyle {
                        font_family: Some(DIGIT_FAMILY.to_string()),
                        ..Default::default()
                    };
                    (i, style)
                })
                .collect();
            if !digits.is_empty() {
                styles.insert(index, digits);
            }
        }
    }
    FormattedRecord { lines, styles }
}

/// Splits a long name at the last space at or before the break column, or
/// failing that at the first space after it.
fn split_name(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= NAME_BREAK_AT {
        return vec![name.to_string()];
    }
    let before = chars[..=NAME_BREAK_AT].iter().rposition(|c| *c == ' ');
    let after = || {
        chars[NAME_BREAK_AT..]
            .iter()
            .position(|c| *c == ' ')
            .map(|i| i + NAME_BREAK_AT)
    };
    match before.or_else(after) {
        Some(at) => vec![
            chars[..at].iter().collect(),
            chars[at + 1..].iter().collect(),
        ],
        None => vec![name.to_string()],
    }
}

fn format_address(record: &RegistryRecord) -> Vec<String> {
    let unit = record
        .unit_number
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(|u| format!("/{}", u))
        .unwrap_or_default();
    let street_part = format!(
        "{} {}{}",
        decode_entities(&record.street),
        record.building_number,
        unit
    );
    let city_part = format!("{} {}", record.postal_code, decode_entities(&record.city));

    if street_part.chars().count() < 2 && city_part.chars().count() > 1 {
        return vec![city_part];
    }
    let full = format!("{}, {}", street_part, city_part);
    if full.chars().count() > ADDRESS_BREAK_AT {
        vec![format!("{},", street_part), city_part]
    } else {
        vec![full]
    }
}

fn ids_line(record: &RegistryRecord) -> String {
    let mut parts = Vec::new();
    if !record.tax_id.is_empty() {
        parts.push(format!("NIP: {}", record.tax_id));
    }
    if !record.statistical_id.is_empty() {
        parts.push(format!("REGON: {}", record.statistical_id));
    }
    parts.join("   ")
}

fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}

impl Scene {
    /// Adds the formatted record as one text element in the registry style.
    pub fn add_registry_text(&mut self, record: &RegistryRecord) -> ElementId {
        let formatted = format_record(record);
        let id = self.add_text(TextOptions {
            text: Some(formatted.text()),
            font_family: Some(REGISTRY_FAMILY.to_string()),
            font_size_pt: Some(REGISTRY_SIZE_PT),
            ..Default::default()
        });
        if let Some(text) = self.element_mut(id).and_then(|e| e.as_text_mut()) {
            text.styles = formatted.styles;
        }
        id
    }
}
