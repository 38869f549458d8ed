//! Command interpreter: tokens → labels.
//!
//! ## State Machine
//!
//! ```text
//!            ^XA (reset defaults)
//!   ┌──────┐ ─────────────────▶ ┌─────────┐
//!   │ Idle │                    │ InLabel │ ◀─┐ field / default commands
//!   └──────┘ ◀───────────────── └─────────┘ ──┘
//!            ^XZ (close field, emit label)
//! ```
//!
//! Inside a label a field is collected in a [`PendingField`] from its first
//! field-level command up to `^FS`. Attributes the field does not set are
//! taken from [`LabelDefaults`] when the field is finalized, so a `^CF`
//! issued after `^FO` but before `^FS` still applies to that field.

use super::ParseError;
use super::defaults::{FontOverride, LabelDefaults};
use super::lexer::{Delimiters, Token, tokenize_with};
use super::params::{Args, decode_hex_escapes};
use crate::label::{
    Anchor, Barcode, Diagonal, Element, ElementKind, FieldPosition, GraphicBox, GraphicCircle,
    GraphicLine, Justification, Label, LineColor, Point, Rotation, SymbolParams, Symbology,
    TextAlignment, TextBlock, TextField,
};

/// Commands that are valid but have no effect on the rendered image.
const NO_EFFECT: &[&str] = &[
    "PQ", "PW", "LL", "LS", "LT", "MN", "MT", "MD", "MM", "PR", "PO", "PM", "PF", "CI", "CW",
    "JA", "JB", "JU", "JS", "TA", "SD", "XB", "FN", "FX", "SN", "SF", "MC", "MF", "ML", "MP",
    "KD", "KL", "KN", "KP", "DF", "XF", "IL", "IS", "ID", "HH", "HS", "HM", "HI", "WC", "FP",
    "FL", "FC", "FE", "FM", "FA", "SS", "ST", "SZ", "SE", "SL", "SO", "SQ", "RF", "RS",
    "JZ", "JJ", "JW", "PH", "PP", "PS", "PL", "PA",
];

/// Largest font height or width `^A` and `^CF` accept.
pub const MAX_FONT_DOTS: u32 = 32_000;

/// Parse a ZPL byte stream into labels.
///
/// Returns an empty vector when the input contains no complete label.
pub fn parse(input: &[u8]) -> Result<Vec<Label>, ParseError> {
    let mut delimiters = Delimiters::default();
    let tokens = tokenize_with(input, &mut delimiters);

    let mut parser = Parser::new();
    for token in &tokens {
        parser.feed(token)?;
    }
    Ok(parser.finish())
}

/// Incremental command interpreter.
#[derive(Debug, Default)]
pub struct Parser {
    labels: Vec<Label>,
    state: State,
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    InLabel(Box<LabelBuilder>),
}

#[derive(Debug, Default)]
struct LabelBuilder {
    elements: Vec<Element>,
    defaults: LabelDefaults,
    pending: Option<PendingField>,
}

/// Field under construction.
#[derive(Debug, Default)]
struct PendingField {
    position: Option<FieldPosition>,
    justification: Option<Justification>,
    font: FontOverride,
    block: Option<TextBlock>,
    barcode: Option<PendingBarcode>,
    graphic: Option<ElementKind>,
    data: Option<String>,
    hex_indicator: Option<char>,
    reverse: bool,
}

#[derive(Debug)]
struct PendingBarcode {
    symbology: Symbology,
    orientation: Option<Rotation>,
    height: Option<u32>,
    interpretation: bool,
    interpretation_above: bool,
    params: SymbolParams,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret one token.
    pub fn feed(&mut self, token: &Token) -> Result<(), ParseError> {
        match &mut self.state {
            State::Idle if token.is("XA") => {
                tracing::trace!(offset = token.offset, "label start");
                self.state = State::InLabel(Box::default());
            }
            State::Idle => {
                tracing::debug!(
                    mnemonic = %token.mnemonic,
                    offset = token.offset,
                    "ignoring command outside a label"
                );
            }
            State::InLabel(_) if token.is("XZ") => {
                if let State::InLabel(builder) = std::mem::take(&mut self.state) {
                    self.labels.push(builder.finish());
                }
            }
            State::InLabel(builder) => builder.apply(token)?,
        }
        Ok(())
    }

    /// Labels completed so far. An unterminated label is dropped.
    pub fn finish(self) -> Vec<Label> {
        if matches!(self.state, State::InLabel(_)) {
            tracing::debug!("input ended inside a label; discarding it");
        }
        self.labels
    }
}

impl LabelBuilder {
    fn finish(mut self) -> Label {
        if let Some(pending) = self.pending.take() {
            self.finalize(pending);
        }
        Label {
            home: self.defaults.home,
            elements: self.elements,
        }
    }

    fn pending(&mut self) -> &mut PendingField {
        self.pending.get_or_insert_with(PendingField::default)
    }

    fn apply(&mut self, token: &Token) -> Result<(), ParseError> {
        let args = Args::new(token);
        let mnemonic = token.mnemonic.as_str();

        match mnemonic {
            "XA" => tracing::debug!(offset = token.offset, "nested label start ignored"),

            // ===== Label defaults =====
            "LH" => {
                let x = args.uint(0)?.unwrap_or(0);
                let y = args.uint(1)?.unwrap_or(0);
                self.defaults.home = Point::new(x, y);
            }
            "LR" => {
                if let Some(reverse) = args.flag(0) {
                    self.defaults.reverse = reverse;
                }
            }
            "CF" => {
                let font = &mut self.defaults.font;
                if let Some(name) = args.char(0) {
                    font.name = name;
                }
                match (font_dots(&args, 1)?, font_dots(&args, 2)?) {
                    (Some(h), Some(w)) => {
                        font.height = h;
                        font.width = w;
                    }
                    (Some(h), None) => {
                        font.height = h;
                        font.width = 0;
                    }
                    (None, Some(w)) => font.width = w,
                    (None, None) => {}
                }
            }
            "FW" => {
                if let Some(rotation) = args.char(0).and_then(Rotation::from_code) {
                    self.defaults.orientation = rotation;
                }
                if let Some(justification) = parse_justification(&args, 1)? {
                    self.defaults.justification = justification;
                }
            }
            "BY" => {
                let barcode = &mut self.defaults.barcode;
                if let Some(w) = args.uint(0)? {
                    barcode.module_width = w.clamp(1, 10);
                }
                if let Some(r) = args.float(1)? {
                    barcode.ratio = r.clamp(2.0, 3.0);
                }
                if let Some(h) = args.uint(2)? {
                    barcode.height = h;
                }
            }

            // ===== Field commands =====
            "FO" | "FT" => {
                let anchor = if mnemonic == "FO" {
                    Anchor::Origin
                } else {
                    Anchor::Typeset
                };
                let x = args.uint(0)?;
                let y = args.uint(1)?;
                let justification = parse_justification(&args, 2)?;
                let position = match (anchor, x, y) {
                    (Anchor::Typeset, None, None) => FieldPosition::automatic(anchor),
                    _ => FieldPosition::at(x.unwrap_or(0), y.unwrap_or(0), anchor),
                };
                let pending = self.pending();
                pending.position = Some(position);
                if justification.is_some() {
                    pending.justification = justification;
                }
            }
            "FB" => {
                let block = TextBlock {
                    max_width: args.uint(0)?.unwrap_or(0),
                    max_lines: args.uint(1)?.unwrap_or(1).max(1),
                    line_spacing: args.int(2)?.unwrap_or(0).clamp(-9999, 9999) as i32,
                    alignment: args
                        .char(3)
                        .and_then(TextAlignment::from_code)
                        .unwrap_or_default(),
                };
                self.pending().block = Some(block);
            }
            "FH" => {
                let indicator = args.str(0).and_then(|s| s.chars().next()).unwrap_or('_');
                self.pending().hex_indicator = Some(indicator);
            }
            "FR" => self.pending().reverse = true,
            "FD" | "FV" => {
                let pending = self.pending();
                let data = match pending.hex_indicator {
                    Some(indicator) => decode_hex_escapes(&token.params, indicator),
                    None => token.params.clone(),
                };
                let data = match &mut pending.barcode {
                    Some(barcode) if barcode.symbology == Symbology::Qr => {
                        split_qr_data(&data, token.separator, &mut barcode.params)
                    }
                    _ => data,
                };
                pending.data = Some(data);
            }
            "FS" => {
                if let Some(pending) = self.pending.take() {
                    self.finalize(pending);
                }
            }

            // ===== Graphics =====
            "GB" => {
                let thickness = args.uint(2)?.unwrap_or(1).max(1);
                let graphic = GraphicBox {
                    width: args.uint(0)?.unwrap_or(thickness).max(thickness),
                    height: args.uint(1)?.unwrap_or(thickness).max(thickness),
                    thickness,
                    color: parse_color(&args, 3),
                    rounding: args.uint(4)?.unwrap_or(0).min(8),
                };
                self.pending().graphic = Some(ElementKind::GraphicBox(graphic));
            }
            "GD" => {
                let thickness = args.uint(2)?.unwrap_or(1).max(1);
                let diagonal = match args.str(4).and_then(|s| s.chars().next()) {
                    Some('L' | 'l' | '\\') => Diagonal::LeftLeaning,
                    _ => Diagonal::RightLeaning,
                };
                let graphic = GraphicLine {
                    width: args.uint(0)?.unwrap_or(thickness).max(thickness),
                    height: args.uint(1)?.unwrap_or(thickness).max(thickness),
                    thickness,
                    color: parse_color(&args, 3),
                    diagonal,
                };
                self.pending().graphic = Some(ElementKind::GraphicLine(graphic));
            }
            "GC" => {
                let diameter = args.uint(0)?.unwrap_or(3).max(3);
                let graphic = GraphicCircle {
                    diameter,
                    thickness: args.uint(1)?.unwrap_or(1).max(1),
                    color: parse_color(&args, 2),
                };
                self.pending().graphic = Some(ElementKind::GraphicCircle(graphic));
            }

            _ if mnemonic.starts_with('A') => {
                let name = mnemonic.chars().nth(1).unwrap_or('0');
                let font = FontOverride {
                    name: Some(name),
                    orientation: args.char(0).and_then(Rotation::from_code),
                    height: font_dots(&args, 1)?,
                    width: font_dots(&args, 2)?,
                };
                self.pending().font = font;
            }
            _ if mnemonic.starts_with('B') => {
                let code = mnemonic.chars().nth(1).unwrap_or(' ');
                let barcode = parse_barcode(Symbology::from_command(code), &args)?;
                self.pending().barcode = Some(barcode);
            }

            _ if NO_EFFECT.contains(&mnemonic) => {
                tracing::trace!(%mnemonic, "command accepted without rendering effect");
            }
            _ => {
                tracing::debug!(
                    %mnemonic,
                    offset = token.offset,
                    "skipping unrecognized command"
                );
            }
        }
        Ok(())
    }

    /// Turn a pending field into an element, filling unset attributes from
    /// the current defaults.
    fn finalize(&mut self, pending: PendingField) {
        let defaults = &self.defaults;
        let position = pending
            .position
            .unwrap_or(FieldPosition::automatic(Anchor::Origin));
        let reverse = pending.reverse != defaults.reverse;

        let kind = if let Some(graphic) = pending.graphic {
            graphic
        } else if let Some(barcode) = pending.barcode {
            let Some(data) = pending.data else {
                tracing::debug!("barcode field without data dropped");
                return;
            };
            ElementKind::Barcode(Barcode {
                data,
                symbology: barcode.symbology,
                orientation: barcode.orientation.unwrap_or(defaults.orientation),
                module_width: defaults.barcode.module_width,
                ratio: defaults.barcode.ratio,
                height: barcode.height.unwrap_or(defaults.barcode.height),
                interpretation: barcode.interpretation,
                interpretation_above: barcode.interpretation_above,
                params: barcode.params,
            })
        } else if let Some(text) = pending.data {
            ElementKind::Text(TextField {
                text,
                font: defaults.resolve_font(&pending.font),
                block: pending.block,
                justification: pending.justification.unwrap_or(defaults.justification),
            })
        } else {
            return;
        };

        self.elements.push(Element {
            position,
            reverse,
            kind,
        });
    }
}

/// Font height or width, capped at the largest size ZPL accepts.
fn font_dots(args: &Args<'_>, index: usize) -> Result<Option<u32>, ParseError> {
    Ok(args.uint(index)?.map(|dots| dots.min(MAX_FONT_DOTS)))
}

fn parse_justification(args: &Args<'_>, index: usize) -> Result<Option<Justification>, ParseError> {
    Ok(args.uint(index)?.map(|z| match z {
        1 => Justification::Right,
        _ => Justification::Left,
    }))
}

fn parse_color(args: &Args<'_>, index: usize) -> LineColor {
    args.char(index)
        .and_then(LineColor::from_code)
        .unwrap_or_default()
}

/// Read the `^B?` parameters. Each symbology orders its parameters
/// differently; orientation is always first.
fn parse_barcode(symbology: Symbology, args: &Args<'_>) -> Result<PendingBarcode, ParseError> {
    let mut barcode = PendingBarcode {
        symbology,
        orientation: args.char(0).and_then(Rotation::from_code),
        height: None,
        interpretation: !symbology.is_two_dimensional(),
        interpretation_above: false,
        params: SymbolParams::default(),
    };

    // (height, interpretation, above) parameter indexes
    let layout = match symbology {
        Symbology::Code39 => {
            barcode.params.check_digit = args.flag(1).unwrap_or(false);
            Some((2, 3, 4))
        }
        Symbology::Codabar => {
            barcode.params.check_digit = args.flag(1).unwrap_or(false);
            let start = args.char(5).unwrap_or('A');
            let stop = args.char(6).unwrap_or('A');
            barcode.params.start_stop = Some((start, stop));
            Some((2, 3, 4))
        }
        Symbology::Code93 | Symbology::UpcA | Symbology::Interleaved2of5 => {
            barcode.params.check_digit = args.flag(4).unwrap_or(false);
            Some((1, 2, 3))
        }
        Symbology::Code128 | Symbology::Ean13 | Symbology::Ean8 | Symbology::Other(_) => {
            Some((1, 2, 3))
        }
        Symbology::Qr => {
            barcode.params.magnification = args.uint(2)?.map(|m| m.clamp(1, 10));
            barcode.params.error_correction = args.char(3);
            None
        }
        Symbology::Pdf417 => {
            barcode.height = args.uint(1)?;
            barcode.params.columns = args.uint(3)?.map(|c| c.clamp(1, 30));
            barcode.params.rows = args.uint(4)?.map(|r| r.clamp(3, 90));
            None
        }
    };

    if let Some((height, interpretation, above)) = layout {
        barcode.height = args.uint(height)?;
        if let Some(flag) = args.flag(interpretation) {
            barcode.interpretation = flag;
        }
        if let Some(flag) = args.flag(above) {
            barcode.interpretation_above = flag;
        }
    }

    Ok(barcode)
}

/// QR field data starts with `{error level}{input mode}{separator}`.
///
/// In manual input mode (`M`) a character mode follows the separator:
/// `N`, `A` or `K`, or `B` plus a four digit byte count.
fn split_qr_data(data: &str, separator: char, params: &mut SymbolParams) -> String {
    let mut chars = data.chars();
    let (Some(level), Some(mode), Some(sep)) = (chars.next(), chars.next(), chars.next()) else {
        return data.to_string();
    };
    if sep != separator {
        return data.to_string();
    }
    let level = level.to_ascii_uppercase();
    if matches!(level, 'H' | 'Q' | 'M' | 'L') {
        params.error_correction = Some(level);
    }

    let payload = chars.as_str();
    if !mode.eq_ignore_ascii_case(&'M') {
        return payload.to_string();
    }
    let mut rest = payload.chars();
    match rest.next().map(|c| c.to_ascii_uppercase()) {
        Some('N' | 'A' | 'K') => rest.as_str().to_string(),
        Some('B') => {
            let body = rest.as_str();
            let count = body.chars().take(4).take_while(|c| c.is_ascii_digit()).count();
            body[count..].to_string()
        }
        _ => payload.to_string(),
    }
}
