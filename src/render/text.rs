//! Text layout and glyph drawing.
//!
//! Layout is a pure function of the field, the face and the output scale
//! ([`layout_text`]); drawing maps the laid-out runs through a [`Pen`].
//!
//! ## Anchors
//!
//! With an Origin anchor the declared point is the pre-rotation top-left of
//! the field, and the baseline is found by these fixed offsets (`h` = line
//! height, `w` = measured width or block width):
//!
//! | Rotation | Offset |
//! |----------|--------|
//! | 0° | (0, ¾h) |
//! | 90° | (¼h, 0) |
//! | 180° | (w, ¼h) |
//! | 270° | (¾h, w) |
//!
//! A Typeset anchor is the baseline itself.

use std::collections::HashMap;

use super::LayoutFault;
use super::canvas::{Canvas, Ink, Pen};
use super::state::{Baseline, Placement};
use crate::fonts::{Face, FaceSlot, GlyphBitmap};
use crate::label::{Anchor, Justification, Rotation, TextAlignment, TextField};

/// Line break inside `^FB` field data.
const LINE_BREAK: &str = "\\&";

/// Word gap used when justified words overflow the block, as a fraction of
/// the line height.
const OVERFLOW_GAP: f64 = 0.3;

/// A face at a concrete size.
#[derive(Debug, Clone, Copy)]
pub struct Typeface<'a> {
    pub slot: FaceSlot,
    pub face: &'a Face,
    /// Line height in device pixels.
    pub height: f64,
    pub width_scale: f64,
}

impl Typeface<'_> {
    pub fn measure(&self, text: &str) -> f64 {
        self.face.measure(text, self.height, self.width_scale)
    }

    fn advance(&self, ch: char) -> f64 {
        self.face.advance(ch, self.height, self.width_scale)
    }
}

/// Text starting at local `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub x: f64,
}

/// One line of laid-out text. The baseline is a local y coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub runs: Vec<Run>,
    pub baseline: f64,
}

impl PlacedLine {
    /// The line's text with runs joined by single spaces.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub pen: Pen,
    /// Lines in drawing order.
    pub lines: Vec<PlacedLine>,
    /// Distance from this field's baseline to a continuation field's.
    pub advance: f64,
}

impl TextLayout {
    pub fn baseline(&self) -> Baseline {
        Baseline {
            x: self.pen.origin.0,
            y: self.pen.origin.1,
            rotation: self.pen.rotation,
            advance: self.advance,
        }
    }
}

/// Baseline offset for an Origin anchor, in device coordinates.
pub fn origin_offset(rotation: Rotation, width: f64, height: f64) -> (f64, f64) {
    match rotation {
        Rotation::R0 => (0.0, 3.0 * height / 4.0),
        Rotation::R90 => (height / 4.0, 0.0),
        Rotation::R180 => (width, height / 4.0),
        Rotation::R270 => (3.0 * height / 4.0, width),
    }
}

/// Greedy word wrap. Paragraphs are split on `\&` and newlines; a word
/// wider than `width` gets a line of its own.
pub fn wrap(text: &str, width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split(LINE_BREAK).flat_map(|p| p.split('\n')) {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if measure(&candidate) <= width + 1e-9 {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// Spread the words of a line over `width`.
fn justify(line: &str, width: f64, typeface: &Typeface<'_>) -> Vec<Run> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() < 2 {
        return vec![Run {
            text: line.to_string(),
            x: 0.0,
        }];
    }

    let widths: Vec<f64> = words.iter().map(|w| typeface.measure(w)).collect();
    let total: f64 = widths.iter().sum();
    let mut gap = (width - total) / (words.len() - 1) as f64;
    if gap < 0.0 {
        gap = typeface.height * OVERFLOW_GAP;
    }

    let mut x = 0.0;
    words
        .iter()
        .zip(&widths)
        .map(|(word, w)| {
            let run = Run {
                text: word.to_string(),
                x,
            };
            x += w + gap;
            run
        })
        .collect()
}

/// Reject glyph cells larger than `limit` dots on either side. Glyphs are
/// rasterized whole, so the cell bounds the memory one glyph can take.
pub fn check_glyph_size(
    typeface: &Typeface<'_>,
    text: &str,
    limit: f64,
) -> Result<(), LayoutFault> {
    let widest = text
        .chars()
        .map(|ch| typeface.advance(ch))
        .fold(0.0_f64, f64::max);
    let size = typeface.height.max(widest);
    if size > limit {
        return Err(LayoutFault::GlyphTooLarge {
            size: size.ceil() as u64,
            limit: limit as u64,
        });
    }
    Ok(())
}

/// Lay out a text field.
pub fn layout_text(
    field: &TextField,
    typeface: &Typeface<'_>,
    placement: Placement,
    scale: f64,
) -> Result<TextLayout, LayoutFault> {
    if field.font.height == 0 || typeface.height <= 0.0 {
        return Err(LayoutFault::ZeroFontHeight);
    }

    let text = if typeface.slot.uppercase_only() {
        field.text.to_uppercase()
    } else {
        field.text.clone()
    };
    let rotation = field.font.orientation;
    let h = typeface.height;

    let Some(block) = field.block else {
        let width = typeface.measure(&text);
        let pen = anchored_pen(placement, rotation, width, h);
        let x = match field.justification {
            Justification::Left => 0.0,
            Justification::Right => -width,
        };
        return Ok(TextLayout {
            pen,
            lines: vec![PlacedLine {
                runs: vec![Run { text, x }],
                baseline: 0.0,
            }],
            advance: h,
        });
    };

    if block.max_width == 0 {
        return Err(LayoutFault::ZeroBlockWidth);
    }
    let width = block.max_width as f64 * scale;
    let max_lines = block.max_lines.max(1) as usize;
    let mut lines = wrap(&text, width, |s| typeface.measure(s));
    lines.truncate(max_lines);

    let pen = anchored_pen(placement, rotation, width, h);
    let shift = match field.justification {
        Justification::Left => 0.0,
        Justification::Right => -width,
    };
    let step = h + block.line_spacing as f64 * scale;
    let count = lines.len();
    let last = count.saturating_sub(1);

    let mut order: Vec<usize> = (0..count).collect();
    // 90° blocks run from the far end: lines are emitted last-first, moving
    // up from the slot of the last possible line.
    let (start, direction) = if rotation == Rotation::R90 {
        order.reverse();
        (-((max_lines - count) as f64) * step, -1.0)
    } else {
        (0.0, 1.0)
    };

    let placed = order
        .into_iter()
        .enumerate()
        .map(|(k, i)| {
            let line = &lines[i];
            let runs = if block.alignment == TextAlignment::Justified && i < last {
                justify(line, width, typeface)
            } else {
                let lw = typeface.measure(line);
                let x = match block.alignment {
                    TextAlignment::Left | TextAlignment::Justified => 0.0,
                    TextAlignment::Center => (width - lw) / 2.0,
                    TextAlignment::Right => width - lw,
                };
                vec![Run {
                    text: line.clone(),
                    x,
                }]
            };
            PlacedLine {
                runs: runs
                    .into_iter()
                    .map(|r| Run {
                        x: r.x + shift,
                        ..r
                    })
                    .collect(),
                baseline: start + direction * k as f64 * step,
            }
        })
        .collect();

    Ok(TextLayout {
        pen,
        lines: placed,
        advance: count as f64 * step,
    })
}

fn anchored_pen(placement: Placement, rotation: Rotation, width: f64, height: f64) -> Pen {
    let (dx, dy) = match placement.anchor {
        Some(Anchor::Origin) => origin_offset(rotation, width, height),
        Some(Anchor::Typeset) | None => (0.0, 0.0),
    };
    Pen::new((placement.x + dx, placement.y + dy), rotation)
}

/// Rasterized glyphs for one render pass.
#[derive(Debug, Default)]
pub struct GlyphCache {
    glyphs: HashMap<(FaceSlot, char, u64, u64), GlyphBitmap>,
}

impl GlyphCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&mut self, typeface: &Typeface<'_>, ch: char) -> &GlyphBitmap {
        let key = (
            typeface.slot,
            ch,
            typeface.height.to_bits(),
            typeface.width_scale.to_bits(),
        );
        self.glyphs
            .entry(key)
            .or_insert_with(|| typeface.face.rasterize(ch, typeface.height, typeface.width_scale))
    }
}

/// Draw laid-out lines through `pen`.
pub fn draw_lines(
    canvas: &mut Canvas,
    pen: &Pen,
    lines: &[PlacedLine],
    typeface: &Typeface<'_>,
    cache: &mut GlyphCache,
    ink: Ink,
) {
    for line in lines {
        for run in &line.runs {
            let mut pen_x = run.x;
            for ch in run.text.chars() {
                let glyph = cache.get(typeface, ch);
                for gy in 0..glyph.height {
                    for gx in 0..glyph.width {
                        if glyph.get(gx, gy) {
                            let lx = pen_x + glyph.left as f64 + gx as f64;
                            let ly = line.baseline + glyph.top as f64 + gy as f64;
                            pen.fill_rect(canvas, lx, ly, 1.0, 1.0, ink);
                        }
                    }
                }
                pen_x += typeface.advance(ch);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontRegistry;
    use crate::label::{FontInfo, TextBlock};
    use pretty_assertions::assert_eq;

    fn field(text: &str, rotation: Rotation, block: Option<TextBlock>) -> TextField {
        TextField {
            text: text.to_string(),
            font: FontInfo {
                name: '0',
                height: 30,
                width: 30,
                orientation: rotation,
            },
            block,
            justification: Justification::Left,
        }
    }

    fn origin(x: f64, y: f64) -> Placement {
        Placement {
            x,
            y,
            anchor: Some(Anchor::Origin),
        }
    }

    fn layout(field: &TextField, placement: Placement, scale: f64) -> TextLayout {
        let fonts = FontRegistry::builtin();
        let (slot, face) = fonts.face_for(field.font.name);
        let typeface = Typeface {
            slot,
            face,
            height: field.font.height as f64 * scale,
            width_scale: field.font.width_scale(slot.nominal_aspect()),
        };
        layout_text(field, &typeface, placement, scale).unwrap()
    }

    fn block(max_width: u32, max_lines: u32, alignment: TextAlignment) -> Option<TextBlock> {
        Some(TextBlock {
            max_width,
            max_lines,
            line_spacing: 0,
            alignment,
        })
    }

    #[test]
    fn test_origin_offsets() {
        assert_eq!(origin_offset(Rotation::R0, 100.0, 40.0), (0.0, 30.0));
        assert_eq!(origin_offset(Rotation::R90, 100.0, 40.0), (10.0, 0.0));
        assert_eq!(origin_offset(Rotation::R180, 100.0, 40.0), (100.0, 10.0));
        assert_eq!(origin_offset(Rotation::R270, 100.0, 40.0), (30.0, 100.0));
    }

    #[test]
    fn test_single_line_origin_anchor() {
        let result = layout(&field("HELLO", Rotation::R0, None), origin(50.0, 50.0), 1.0);
        assert_eq!(result.pen.origin, (50.0, 72.5));
        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].runs[0].x, 0.0);
        assert_eq!(result.advance, 30.0);
    }

    #[test]
    fn test_typeset_anchor_is_baseline() {
        let placement = Placement {
            x: 50.0,
            y: 50.0,
            anchor: Some(Anchor::Typeset),
        };
        let result = layout(&field("HELLO", Rotation::R180, None), placement, 1.0);
        assert_eq!(result.pen.origin, (50.0, 50.0));
    }

    #[test]
    fn test_180_offset_uses_measured_width() {
        // Sans face: 15 px per character at height 30.
        let result = layout(&field("HELLO", Rotation::R180, None), origin(0.0, 0.0), 1.0);
        assert_eq!(result.pen.origin, (75.0, 7.5));
    }

    #[test]
    fn test_right_justified_single_line() {
        let mut right = field("HELLO", Rotation::R0, None);
        right.justification = Justification::Right;
        let result = layout(&right, origin(200.0, 0.0), 1.0);
        assert_eq!(result.lines[0].runs[0].x, -75.0);
    }

    #[test]
    fn test_wrap_greedy() {
        let measure = |s: &str| s.chars().count() as f64 * 10.0;
        assert_eq!(
            wrap("the quick brown fox", 100.0, measure),
            ["the quick", "brown fox"]
        );
        assert_eq!(wrap("supercalifragilistic a", 50.0, measure), [
            "supercalifragilistic",
            "a"
        ]);
        assert_eq!(wrap("one\\&two", 1000.0, measure), ["one", "two"]);
    }

    #[test]
    fn test_block_lines_and_alignment() {
        let text = field(
            "AB CD EF",
            Rotation::R0,
            block(100, 3, TextAlignment::Center),
        );
        let result = layout(&text, origin(0.0, 0.0), 1.0);
        // "AB CD" = 75 px fits, "AB CD EF" = 120 px does not.
        let lines: Vec<String> = result.lines.iter().map(|l| l.text()).collect();
        assert_eq!(lines, ["AB CD", "EF"]);
        assert_eq!(result.lines[0].runs[0].x, 12.5);
        assert_eq!(result.lines[1].runs[0].x, 35.0);
        assert_eq!(result.lines[0].baseline, 0.0);
        assert_eq!(result.lines[1].baseline, 30.0);
        assert_eq!(result.advance, 60.0);
    }

    #[test]
    fn test_excess_lines_dropped() {
        let text = field("AAAA BBBB CCCC", Rotation::R0, block(60, 2, TextAlignment::Left));
        let result = layout(&text, origin(0.0, 0.0), 1.0);
        let lines: Vec<String> = result.lines.iter().map(|l| l.text()).collect();
        assert_eq!(lines, ["AAAA", "BBBB"]);
    }

    #[test]
    fn test_justified_spreads_all_but_last_line() {
        let text = field(
            "AA BB CC DD",
            Rotation::R0,
            block(120, 2, TextAlignment::Justified),
        );
        let result = layout(&text, origin(0.0, 0.0), 1.0);
        // Line one is "AA BB CC" (120 px), so it fits without stretching;
        // with a wider block the gaps grow.
        assert_eq!(result.lines[0].runs.len(), 3);
        assert_eq!(result.lines[1].runs.len(), 1);

        let wide = field(
            "AA BB\\&CC DD",
            Rotation::R0,
            block(200, 2, TextAlignment::Justified),
        );
        let result = layout(&wide, origin(0.0, 0.0), 1.0);
        let first: Vec<f64> = result.lines[0].runs.iter().map(|r| r.x).collect();
        // Two 30 px words spread over 200 px.
        assert_eq!(first, [0.0, 170.0]);
        assert_eq!(result.lines[1].runs.len(), 1);
    }

    #[test]
    fn test_rotated_90_block_anchors_from_far_end() {
        let text = field("HELLO WORLD", Rotation::R90, block(100, 4, TextAlignment::Left));
        let result = layout(&text, origin(100.0, 50.0), 1.0);

        assert_eq!(result.lines.len(), 2);
        // Emitted last line first.
        assert_eq!(result.lines[0].text(), "WORLD");
        assert_eq!(result.lines[1].text(), "HELLO");
        // The first text line sits where a fourth line would.
        assert_eq!(result.lines[1].baseline, -90.0);
        assert_eq!(result.lines[0].baseline, -60.0);
    }

    #[test]
    fn test_bold_uppercased_before_measuring() {
        let mut bold = field("ab cd", Rotation::R0, block(1000, 1, TextAlignment::Left));
        bold.font.name = 'B';
        bold.font.width = 0;
        let result = layout(&bold, origin(0.0, 0.0), 1.0);
        assert_eq!(result.lines[0].text(), "AB CD");
    }

    #[test]
    fn test_layout_scales_linearly() {
        let text = field(
            "HELLO WORLD AGAIN",
            Rotation::R270,
            block(120, 3, TextAlignment::Right),
        );
        let one = layout(&text, origin(40.0, 60.0), 1.0);
        let two = layout(&text, origin(80.0, 120.0), 2.0);

        assert_eq!(two.pen.origin, (one.pen.origin.0 * 2.0, one.pen.origin.1 * 2.0));
        assert_eq!(two.advance, one.advance * 2.0);
        for (a, b) in one.lines.iter().zip(&two.lines) {
            assert_eq!(b.baseline, a.baseline * 2.0);
            assert_eq!(b.runs[0].x, a.runs[0].x * 2.0);
        }
    }

    #[test]
    fn test_degenerate_fields() {
        let fonts = FontRegistry::builtin();
        let (slot, face) = fonts.face_for('0');
        let typeface = Typeface {
            slot,
            face,
            height: 0.0,
            width_scale: 1.0,
        };
        let mut zero = field("X", Rotation::R0, None);
        zero.font.height = 0;
        assert_eq!(
            layout_text(&zero, &typeface, origin(0.0, 0.0), 1.0),
            Err(LayoutFault::ZeroFontHeight)
        );

        let typeface = Typeface {
            height: 30.0,
            ..typeface
        };
        let narrow = field("X", Rotation::R0, block(0, 2, TextAlignment::Left));
        assert_eq!(
            layout_text(&narrow, &typeface, origin(0.0, 0.0), 1.0),
            Err(LayoutFault::ZeroBlockWidth)
        );
    }

    #[test]
    fn test_glyph_size_limit() {
        let fonts = FontRegistry::builtin();
        let (slot, face) = fonts.face_for('0');
        let tall = Typeface {
            slot,
            face,
            height: 96_000.0,
            width_scale: 1.0,
        };
        assert_eq!(
            check_glyph_size(&tall, "AB", 1219.0),
            Err(LayoutFault::GlyphTooLarge {
                size: 96_000,
                limit: 1219
            })
        );

        // Sans cells are half as wide as tall; stretched 3x they are wider.
        let wide = Typeface {
            height: 30.0,
            width_scale: 3.0,
            ..tall
        };
        assert_eq!(check_glyph_size(&wide, "W", 50.0), Ok(()));
        assert_eq!(
            check_glyph_size(&wide, "W", 40.0),
            Err(LayoutFault::GlyphTooLarge { size: 45, limit: 40 })
        );
    }
}
