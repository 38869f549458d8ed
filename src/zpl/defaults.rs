//! Per-label default state.

use crate::label::{FontInfo, Justification, Point, Rotation};

/// Barcode defaults set by `^BY`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodeDefaults {
    pub module_width: u32,
    pub ratio: f64,
    pub height: u32,
}

impl Default for BarcodeDefaults {
    fn default() -> Self {
        Self {
            module_width: 2,
            ratio: 3.0,
            height: 10,
        }
    }
}

/// Defaults scoped to one label.
///
/// Reset at every label start, changed by default-setting commands and only
/// read when a pending field is finalized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LabelDefaults {
    /// `^LH`
    pub home: Point,
    /// `^CF`
    pub font: FontInfo,
    /// `^FW` orientation.
    pub orientation: Rotation,
    /// `^FW` justification.
    pub justification: Justification,
    /// `^BY`
    pub barcode: BarcodeDefaults,
    /// `^LR`
    pub reverse: bool,
}

impl LabelDefaults {
    /// Font for a field: the default font with the field's overrides
    /// applied.
    ///
    /// An override that only gives a height keeps the default's
    /// proportions by leaving the width unset.
    pub fn resolve_font(&self, font: &FontOverride) -> FontInfo {
        let name = font.name.unwrap_or(self.font.name);
        let (height, width) = match (font.height, font.width) {
            (Some(h), Some(w)) => (h, w),
            (Some(h), None) => (h, 0),
            (None, Some(w)) => (self.font.height, w),
            (None, None) => (self.font.height, self.font.width),
        };
        FontInfo {
            name,
            height,
            width,
            orientation: font.orientation.unwrap_or(self.orientation),
        }
    }
}

/// Font attributes given by `^A` on one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FontOverride {
    pub name: Option<char>,
    pub orientation: Option<Rotation>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}
