//! Outline (TrueType/OpenType) faces via ab_glyph.
//!
//! Glyphs are rasterized with a 50% coverage threshold, since label output
//! is strictly 1-bit.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

use super::{FontError, GlyphBitmap};

#[derive(Debug, Clone)]
pub struct OutlineFace {
    font: FontArc,
}

impl OutlineFace {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(data).map_err(|e| FontError::Invalid(e.to_string()))?;
        Ok(Self { font })
    }

    fn scale(height: f64, width_scale: f64) -> PxScale {
        PxScale {
            x: (height * width_scale) as f32,
            y: height as f32,
        }
    }

    pub fn advance(&self, ch: char, height: f64, width_scale: f64) -> f64 {
        let scaled = self.font.as_scaled(Self::scale(height, width_scale));
        scaled.h_advance(self.font.glyph_id(ch)) as f64
    }

    pub fn rasterize(&self, ch: char, height: f64, width_scale: f64) -> GlyphBitmap {
        let scale = Self::scale(height, width_scale);
        let glyph = self
            .font
            .glyph_id(ch)
            .with_scale_and_position(scale, ab_glyph::point(0.0, 0.0));

        let Some(outlined) = self.font.outline_glyph(glyph) else {
            return GlyphBitmap::empty();
        };

        let bounds = outlined.px_bounds();
        let width = bounds.width().ceil().max(0.0) as usize;
        let height = bounds.height().ceil().max(0.0) as usize;
        let mut pixels = vec![false; width * height];

        outlined.draw(|px, py, coverage| {
            let (x, y) = (px as usize, py as usize);
            if x < width && y < height && coverage >= 0.5 {
                pixels[y * width + x] = true;
            }
        });

        GlyphBitmap {
            width,
            height,
            left: bounds.min.x.floor() as i32,
            top: bounds.min.y.floor() as i32,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono() -> OutlineFace {
        let data = include_bytes!("../../tests/fixtures/DejaVuSansMono.ttf");
        OutlineFace::from_bytes(data.to_vec()).unwrap()
    }

    #[test]
    fn test_monospaced_advance() {
        let face = mono();
        let narrow = face.advance('i', 40.0, 1.0);
        let wide = face.advance('W', 40.0, 1.0);
        assert!(narrow > 10.0 && narrow < 40.0, "advance = {}", narrow);
        assert!((narrow - wide).abs() < 1e-3);
        let stretched = face.advance('i', 40.0, 2.0);
        assert!((stretched - 2.0 * narrow).abs() < 1e-3);
    }

    #[test]
    fn test_rasterize_sits_on_baseline() {
        let glyph = mono().rasterize('H', 40.0, 1.0);
        assert!(glyph.width > 0 && glyph.height > 0);
        // Capitals are drawn above the baseline.
        assert!(glyph.top < 0);
        assert!(glyph.top + glyph.height as i32 <= 1);
        assert!(glyph.pixels.iter().any(|&p| p));
    }

    #[test]
    fn test_blank_glyph() {
        assert_eq!(mono().rasterize(' ', 40.0, 1.0), GlyphBitmap::empty());
    }
}
