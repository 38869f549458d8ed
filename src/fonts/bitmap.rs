//! Built-in bitmap faces.
//!
//! Uses the Spleen bitmap font family. Glyphs are scaled to the requested
//! cell size with nearest-neighbor sampling, so every advance is an exact
//! linear function of the character height.

use spleen_font::{FONT_8X16, FONT_12X24, PSF2Font};

use super::GlyphBitmap;

/// Fraction of the cell height above the baseline.
const ASCENT: f64 = 0.8;

/// A Spleen face at its native cell size.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFace {
    data: &'static [u8],
    cell_width: usize,
    cell_height: usize,
    bold: bool,
}

impl BitmapFace {
    /// Proportional-looking face for font `0`.
    pub fn sans() -> Self {
        Self {
            data: FONT_12X24,
            cell_width: 12,
            cell_height: 24,
            bold: false,
        }
    }

    pub fn mono() -> Self {
        Self {
            data: FONT_8X16,
            cell_width: 8,
            cell_height: 16,
            bold: false,
        }
    }

    pub fn mono_bold() -> Self {
        Self {
            bold: true,
            ..Self::mono()
        }
    }

    fn aspect(&self) -> f64 {
        self.cell_width as f64 / self.cell_height as f64
    }

    pub fn advance(&self, height: f64, width_scale: f64) -> f64 {
        height * self.aspect() * width_scale
    }

    pub fn rasterize(&self, ch: char, height: f64, width_scale: f64) -> GlyphBitmap {
        let dst_h = height.round().max(1.0) as usize;
        let dst_w = self.advance(height, width_scale).round().max(1.0) as usize;

        let src = self.source_glyph(ch);
        let mut pixels = vec![false; dst_w * dst_h];
        scale_bitmap(
            &src,
            self.cell_width,
            self.cell_height,
            &mut pixels,
            dst_w,
            dst_h,
        );

        if self.bold {
            embolden(&mut pixels, dst_w, (dst_w / 8).max(1));
        }

        GlyphBitmap {
            width: dst_w,
            height: dst_h,
            left: 0,
            top: -((dst_h as f64 * ASCENT).round() as i32),
            pixels,
        }
    }

    /// Glyph at native cell size. Characters missing from the font get a
    /// box outline.
    fn source_glyph(&self, ch: char) -> Vec<bool> {
        let (w, h) = (self.cell_width, self.cell_height);
        let mut glyph = vec![false; w * h];

        if ch == ' ' {
            return glyph;
        }

        let utf8 = ch.to_string();
        let found = match PSF2Font::new(self.data) {
            Ok(mut font) => match font.glyph_for_utf8(utf8.as_bytes()) {
                Some(spleen_glyph) => {
                    for (row_y, row) in spleen_glyph.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if row_y < h && col_x < w {
                                glyph[row_y * w + col_x] = on;
                            }
                        }
                    }
                    true
                }
                None => false,
            },
            Err(_) => false,
        };

        if !found {
            draw_box(&mut glyph, w, h);
        }
        glyph
    }
}

/// Scale a bitmap from src dimensions to dst dimensions using nearest neighbor.
fn scale_bitmap(
    src: &[bool],
    src_w: usize,
    src_h: usize,
    dst: &mut [bool],
    dst_w: usize,
    dst_h: usize,
) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            let src_idx = sy * src_w + sx;
            let dst_idx = dy * dst_w + dx;
            if src_idx < src.len() && dst_idx < dst.len() {
                dst[dst_idx] = src[src_idx];
            }
        }
    }
}

/// Smear every row `shift` pixels to the right.
fn embolden(pixels: &mut [bool], width: usize, shift: usize) {
    for row in pixels.chunks_mut(width) {
        for x in (0..width).rev() {
            if (1..=shift).any(|s| x >= s && row[x - s]) {
                row[x] = true;
            }
        }
    }
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [bool], width: usize, height: usize) {
    for x in 0..width {
        glyph[x] = true;
        glyph[(height - 1) * width + x] = true;
    }
    for y in 0..height {
        glyph[y * width] = true;
        glyph[y * width + width - 1] = true;
    }
}
