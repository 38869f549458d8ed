//! # Label Documents
//!
//! Parsed, immutable label documents. A [`Label`] is produced by the parser
//! when it sees a label-end command and is never modified afterwards; the
//! renderer only reads it.
//!
//! ## Coordinate System
//!
//! All positions and sizes are in native printer dots at
//! [`NATIVE_DPMM`] (8 dots/mm, 203 DPI). The renderer scales them to the
//! requested output resolution.
//!
//! ```text
//! (0,0) ────────────── x ──▶
//!   │   ┌─────────┐
//!   │   │  FIELD  │  ◀─ ^FO x,y : top-left of the field (Origin)
//!   y   └─────────┘
//!   │   TEXT          ◀─ ^FT x,y : text baseline (Typeset)
//!   ▼
//! ```

use serde::Serialize;

/// Resolution the parsed coordinates are expressed in (dots per millimeter).
pub const NATIVE_DPMM: u32 = 8;

/// One printable document, delimited by `^XA` ... `^XZ`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Label {
    /// Label home offset (`^LH`) in native dots.
    pub home: Point,
    /// Elements in encounter order; later elements draw over earlier ones.
    pub elements: Vec<Element>,
}

/// A point in native dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// What a declared field position refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Anchor {
    /// `^FO`: pre-rotation top-left corner of the field.
    #[default]
    Origin,
    /// `^FT`: text baseline (bottom-left for barcodes and graphics).
    Typeset,
}

/// Clockwise field rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
pub enum Rotation {
    /// `N`
    #[default]
    R0,
    /// `R`
    R90,
    /// `I`
    R180,
    /// `B`
    R270,
}

impl Rotation {
    /// Parse a ZPL orientation letter (`N`, `R`, `I`, `B`).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'N' => Some(Self::R0),
            'R' => Some(Self::R90),
            'I' => Some(Self::R180),
            'B' => Some(Self::R270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }
}

/// Horizontal justification of a field (`^FO`/`^FT` third parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Justification {
    #[default]
    Left,
    Right,
}

/// Declared position of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FieldPosition {
    pub x: u32,
    pub y: u32,
    pub anchor: Anchor,
    /// No coordinates were given: place after the previous field of the
    /// same kind.
    pub automatic: bool,
}

impl FieldPosition {
    pub fn at(x: u32, y: u32, anchor: Anchor) -> Self {
        Self {
            x,
            y,
            anchor,
            automatic: false,
        }
    }

    pub fn automatic(anchor: Anchor) -> Self {
        Self {
            x: 0,
            y: 0,
            anchor,
            automatic: true,
        }
    }
}

/// One positioned drawable unit within a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub position: FieldPosition,
    /// Draw with XOR ink (`^FR`, `^LR`).
    pub reverse: bool,
    pub kind: ElementKind,
}

impl Element {
    /// Rotation the element is drawn with.
    pub fn rotation(&self) -> Rotation {
        match &self.kind {
            ElementKind::Text(text) => text.font.orientation,
            ElementKind::Barcode(barcode) => barcode.orientation,
            ElementKind::GraphicBox(_)
            | ElementKind::GraphicLine(_)
            | ElementKind::GraphicCircle(_) => Rotation::R0,
        }
    }

    /// Short kind name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Text(_) => "text",
            ElementKind::Barcode(_) => "barcode",
            ElementKind::GraphicBox(_) => "box",
            ElementKind::GraphicLine(_) => "line",
            ElementKind::GraphicCircle(_) => "circle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElementKind {
    Text(TextField),
    Barcode(Barcode),
    GraphicBox(GraphicBox),
    GraphicLine(GraphicLine),
    GraphicCircle(GraphicCircle),
}

// ============================================================================
// TEXT
// ============================================================================

/// Font selection for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontInfo {
    /// Font code (`0`, `A`..`Z`, `1`..`9`).
    pub name: char,
    /// Character height in dots.
    pub height: u32,
    /// Character width in dots; 0 keeps the face's natural proportions.
    pub width: u32,
    pub orientation: Rotation,
}

impl FontInfo {
    /// Horizontal scale relative to the face's natural proportions, given
    /// the face's nominal width/height ratio.
    pub fn width_scale(&self, nominal_aspect: f64) -> f64 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        (self.width as f64 / self.height as f64) / nominal_aspect
    }
}

impl Default for FontInfo {
    /// Printer power-on font: `A`, 9x5 dots.
    fn default() -> Self {
        Self {
            name: 'A',
            height: 9,
            width: 5,
            orientation: Rotation::R0,
        }
    }
}

/// Text alignment inside a `^FB` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl TextAlignment {
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'L' => Some(Self::Left),
            'C' => Some(Self::Center),
            'R' => Some(Self::Right),
            'J' => Some(Self::Justified),
            _ => None,
        }
    }
}

/// `^FB` field block: multi-line wrapped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextBlock {
    /// Block width in dots.
    pub max_width: u32,
    /// Maximum number of lines; extra lines are dropped.
    pub max_lines: u32,
    /// Extra space between lines in dots.
    pub line_spacing: i32,
    pub alignment: TextAlignment,
}

impl Default for TextBlock {
    fn default() -> Self {
        Self {
            max_width: 0,
            max_lines: 1,
            line_spacing: 0,
            alignment: TextAlignment::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextField {
    pub text: String,
    pub font: FontInfo,
    pub block: Option<TextBlock>,
    pub justification: Justification,
}

// ============================================================================
// BARCODES
// ============================================================================

/// Barcode symbology tag, selected by the `^B?` command letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Symbology {
    Code128,
    Code39,
    Code93,
    Ean13,
    Ean8,
    UpcA,
    Interleaved2of5,
    Codabar,
    Qr,
    Pdf417,
    /// Any other `^B?` command; rendering skips it unless an encoder is
    /// registered for the tag.
    Other(char),
}

impl Symbology {
    /// Map the character after `^B` to a symbology.
    pub fn from_command(code: char) -> Self {
        match code.to_ascii_uppercase() {
            'C' => Self::Code128,
            '3' => Self::Code39,
            'A' => Self::Code93,
            'E' => Self::Ean13,
            '8' => Self::Ean8,
            'U' => Self::UpcA,
            '2' => Self::Interleaved2of5,
            'K' => Self::Codabar,
            'Q' => Self::Qr,
            '7' => Self::Pdf417,
            other => Self::Other(other),
        }
    }

    /// Two-dimensional symbologies have no interpretation line and size
    /// their rows themselves.
    pub fn is_two_dimensional(self) -> bool {
        matches!(self, Self::Qr | Self::Pdf417)
    }
}

/// Symbology-specific parameters carried from the `^B?` command.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SymbolParams {
    /// Mod 43 (Code 39) / mod 10 check digit requested.
    pub check_digit: bool,
    /// QR magnification factor.
    pub magnification: Option<u32>,
    /// QR error correction level (`H`, `Q`, `M`, `L`).
    pub error_correction: Option<char>,
    /// PDF417 data columns.
    pub columns: Option<u32>,
    /// PDF417 rows.
    pub rows: Option<u32>,
    /// Codabar start/stop characters.
    pub start_stop: Option<(char, char)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Barcode {
    pub data: String,
    pub symbology: Symbology,
    pub orientation: Rotation,
    /// Narrow module width in dots.
    pub module_width: u32,
    /// Wide-to-narrow ratio.
    pub ratio: f64,
    /// Bar height in dots.
    pub height: u32,
    /// Print the human-readable interpretation line.
    pub interpretation: bool,
    /// Interpretation line above the symbol instead of below.
    pub interpretation_above: bool,
    pub params: SymbolParams,
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// Graphic ink colour (`B` or `W`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LineColor {
    #[default]
    Black,
    White,
}

impl LineColor {
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'B' => Some(Self::Black),
            'W' => Some(Self::White),
            _ => None,
        }
    }
}

/// `^GB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphicBox {
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
    pub color: LineColor,
    /// Corner rounding, 0..=8.
    pub rounding: u32,
}

/// Which way a `^GD` diagonal leans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Diagonal {
    /// `R` or `/`: bottom-left to top-right.
    #[default]
    RightLeaning,
    /// `L` or `\`: top-left to bottom-right.
    LeftLeaning,
}

/// `^GD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphicLine {
    pub width: u32,
    pub height: u32,
    pub thickness: u32,
    pub color: LineColor,
    pub diagonal: Diagonal,
}

/// `^GC`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphicCircle {
    pub diameter: u32,
    pub thickness: u32,
    pub color: LineColor,
}
