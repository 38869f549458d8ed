//! Barcode placement and module drawing.
//!
//! An Origin anchor names the top-left corner of the rotated symbol's
//! bounding box; a Typeset anchor names the bottom-left corner of the
//! unrotated symbol. The interpretation line is centered under (or above)
//! the bars in the symbol's own frame, so it rotates with it.

use super::canvas::{Canvas, Ink, Pen};
use super::state::{Baseline, Placement};
use super::text::{PlacedLine, Run, Typeface};
use crate::label::{Anchor, Rotation};
use crate::symbology::Symbol;

/// Interpretation line height in native dots per dot of module width.
pub const INTERPRETATION_HEIGHT: u32 = 9;

/// Share of the line height above the baseline.
const ASCENT: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodeLayout {
    pub pen: Pen,
    /// Local y of the symbol's top edge.
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Device size of one module.
    pub module_width: f64,
    pub row_height: f64,
}

impl BarcodeLayout {
    /// Bottom-left corner of the symbol, advancing by its height.
    pub fn baseline(&self) -> Baseline {
        let (x, y) = self.pen.map(0.0, self.top + self.height);
        Baseline {
            x,
            y,
            rotation: self.pen.rotation,
            advance: self.height,
        }
    }
}

pub fn layout_barcode(
    symbol: &Symbol,
    rotation: Rotation,
    placement: Placement,
    scale: f64,
) -> BarcodeLayout {
    let module_width = symbol.module_width as f64 * scale;
    let row_height = symbol.row_height as f64 * scale;
    let width = symbol.width_dots() as f64 * scale;
    let height = symbol.height_dots() as f64 * scale;

    let (dx, dy, top) = match placement.anchor {
        Some(Anchor::Origin) => {
            let (dx, dy) = match rotation {
                Rotation::R0 => (0.0, 0.0),
                Rotation::R90 => (height, 0.0),
                Rotation::R180 => (width, height),
                Rotation::R270 => (0.0, width),
            };
            (dx, dy, 0.0)
        }
        Some(Anchor::Typeset) | None => (0.0, 0.0, -height),
    };

    BarcodeLayout {
        pen: Pen::new((placement.x + dx, placement.y + dy), rotation),
        top,
        width,
        height,
        module_width,
        row_height,
    }
}

pub fn draw_symbol(canvas: &mut Canvas, layout: &BarcodeLayout, symbol: &Symbol, ink: Ink) {
    for (row, start, len) in symbol.matrix.dark_runs() {
        layout.pen.fill_rect(
            canvas,
            start as f64 * layout.module_width,
            layout.top + row as f64 * layout.row_height,
            len as f64 * layout.module_width,
            layout.row_height,
            ink,
        );
    }
}

/// Human-readable line for a linear symbol, in the symbol's local frame.
/// A gap of one module separates it from the bars.
pub fn interpretation_line(
    layout: &BarcodeLayout,
    text: &str,
    typeface: &Typeface<'_>,
    above: bool,
) -> PlacedLine {
    let width = typeface.measure(text);
    let h = typeface.height;
    let gap = layout.module_width;
    let baseline = if above {
        layout.top - gap - (1.0 - ASCENT) * h
    } else {
        layout.top + layout.height + gap + ASCENT * h
    };
    PlacedLine {
        runs: vec![Run {
            text: text.to_string(),
            x: (layout.width - width) / 2.0,
        }],
        baseline,
    }
}
