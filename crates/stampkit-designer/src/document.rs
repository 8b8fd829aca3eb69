//! Physical document sizes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use stampkit_core::{Axis, Error, Result};
use stampkit_settings::DocumentSettings;

/// Physical stamp face size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampSize {
    pub width_mm: f64,
    pub height_mm: f64,
    pub label: String,
}

impl StampSize {
    fn labelled(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            label: format!("{} x {} mm", width_mm, height_mm),
        }
    }

    /// The sizes offered without validation.
    pub fn predefined() -> Vec<StampSize> {
        vec![
            Self::labelled(38.0, 14.0),
            Self::labelled(47.0, 18.0),
            Self::labelled(58.0, 22.0),
        ]
    }

    /// A custom size, checked against `range` before anything is built from it.
    pub fn custom(width_mm: f64, height_mm: f64, range: &DocumentSettings) -> Result<Self> {
        validate_axis(Axis::Width, width_mm, range)?;
        validate_axis(Axis::Height, height_mm, range)?;
        Ok(Self::labelled(width_mm, height_mm))
    }

    /// Re-checks a size read from a file or the command line.
    pub fn validate(&self, range: &DocumentSettings) -> Result<()> {
        validate_axis(Axis::Width, self.width_mm, range)?;
        validate_axis(Axis::Height, self.height_mm, range)
    }
}

impl Default for StampSize {
    fn default() -> Self {
        Self::labelled(47.0, 18.0)
    }
}

impl fmt::Display for StampSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Parses `"47x18"` (also `"47 x 18"` and `"47×18"`) without range checks.
impl FromStr for StampSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.replace('×', "x").replace("mm", "");
        let (w, h) = normalized
            .split_once(['x', 'X'])
            .ok_or_else(|| Error::other(format!("Expected WIDTHxHEIGHT, got '{}'", s)))?;
        let parse = |v: &str| {
            v.trim()
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| Error::other(format!("Invalid dimension '{}'", v.trim())))
        };
        Ok(Self::labelled(parse(w)?, parse(h)?))
    }
}

fn validate_axis(axis: Axis, value: f64, range: &DocumentSettings) -> Result<()> {
    if !value.is_finite() || value < range.min_mm || value > range.max_mm {
        return Err(Error::InvalidSize {
            axis,
            value,
            min: range.min_mm,
            max: range.max_mm,
        });
    }
    Ok(())
}
