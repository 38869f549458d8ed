//! # Fonts
//!
//! Maps ZPL font codes to a small fixed set of faces and rasterizes glyphs.
//!
//! | Code | Slot | Built-in face |
//! |------|------|---------------|
//! | `0` | [`FaceSlot::Sans`] | Spleen 12x24 |
//! | `B` | [`FaceSlot::MonoBold`] | Spleen 8x16, emboldened, text upper-cased |
//! | anything else | [`FaceSlot::Mono`] | Spleen 8x16 |
//!
//! Unknown codes never fail; they use the monospace slot. Any slot can be
//! replaced by a TrueType face at startup with
//! [`FontRegistry::with_outline_file`]. The registry is read-only after
//! construction and can be shared between concurrent renders.

mod bitmap;
mod outline;

pub use bitmap::BitmapFace;
pub use outline::OutlineFace;

use std::path::Path;
use thiserror::Error;

/// Errors from loading outline fonts.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid font data: {0}")]
    Invalid(String),
}

/// Face slot a font code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceSlot {
    Sans,
    Mono,
    MonoBold,
}

impl FaceSlot {
    pub fn for_code(code: char) -> Self {
        match code.to_ascii_uppercase() {
            '0' => Self::Sans,
            'B' => Self::MonoBold,
            _ => Self::Mono,
        }
    }

    /// Parse a slot name or font code as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "0" | "sans" => Some(Self::Sans),
            "b" | "bold" | "mono-bold" => Some(Self::MonoBold),
            "a" | "mono" => Some(Self::Mono),
            _ => None,
        }
    }

    /// Width/height ratio of a `^A` command that keeps the face's natural
    /// proportions.
    pub fn nominal_aspect(self) -> f64 {
        match self {
            Self::Sans => 1.0,
            Self::Mono => 5.0 / 9.0,
            Self::MonoBold => 7.0 / 11.0,
        }
    }

    /// The emulated bold face only has capitals.
    pub fn uppercase_only(self) -> bool {
        self == Self::MonoBold
    }
}

/// A rasterized glyph, positioned relative to the pen on the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphBitmap {
    pub width: usize,
    pub height: usize,
    /// Offset from the pen x position to the bitmap's left column.
    pub left: i32,
    /// Offset from the baseline to the bitmap's top row (negative is up).
    pub top: i32,
    /// Row-major, `true` = ink.
    pub pixels: Vec<bool>,
}

impl GlyphBitmap {
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            left: 0,
            top: 0,
            pixels: Vec::new(),
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }
}

/// A face that can measure and rasterize text.
#[derive(Debug, Clone)]
pub enum Face {
    Bitmap(BitmapFace),
    Outline(OutlineFace),
}

impl Face {
    /// Horizontal advance of `ch` at `height` pixels, stretched by
    /// `width_scale`.
    pub fn advance(&self, ch: char, height: f64, width_scale: f64) -> f64 {
        match self {
            Self::Bitmap(face) => face.advance(height, width_scale),
            Self::Outline(face) => face.advance(ch, height, width_scale),
        }
    }

    /// Width of a whole run.
    pub fn measure(&self, text: &str, height: f64, width_scale: f64) -> f64 {
        text.chars()
            .map(|ch| self.advance(ch, height, width_scale))
            .sum()
    }

    pub fn rasterize(&self, ch: char, height: f64, width_scale: f64) -> GlyphBitmap {
        match self {
            Self::Bitmap(face) => face.rasterize(ch, height, width_scale),
            Self::Outline(face) => face.rasterize(ch, height, width_scale),
        }
    }
}

/// Faces for every slot.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    sans: Face,
    mono: Face,
    mono_bold: Face,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontRegistry {
    /// Registry backed only by the built-in bitmap faces.
    pub fn builtin() -> Self {
        Self {
            sans: Face::Bitmap(BitmapFace::sans()),
            mono: Face::Bitmap(BitmapFace::mono()),
            mono_bold: Face::Bitmap(BitmapFace::mono_bold()),
        }
    }

    /// Face for a ZPL font code.
    pub fn face_for(&self, code: char) -> (FaceSlot, &Face) {
        let slot = FaceSlot::for_code(code);
        (slot, self.face(slot))
    }

    pub fn face(&self, slot: FaceSlot) -> &Face {
        match slot {
            FaceSlot::Sans => &self.sans,
            FaceSlot::Mono => &self.mono,
            FaceSlot::MonoBold => &self.mono_bold,
        }
    }

    /// Replace a slot with a TrueType/OpenType face.
    pub fn with_outline_bytes(mut self, slot: FaceSlot, data: Vec<u8>) -> Result<Self, FontError> {
        let face = Face::Outline(OutlineFace::from_bytes(data)?);
        match slot {
            FaceSlot::Sans => self.sans = face,
            FaceSlot::Mono => self.mono = face,
            FaceSlot::MonoBold => self.mono_bold = face,
        }
        Ok(self)
    }

    /// Replace a slot with a TrueType/OpenType face read from disk.
    pub fn with_outline_file(self, slot: FaceSlot, path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(?slot, path = %path.display(), "loaded outline font");
        self.with_outline_bytes(slot, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_mapping() {
        assert_eq!(FaceSlot::for_code('0'), FaceSlot::Sans);
        assert_eq!(FaceSlot::for_code('B'), FaceSlot::MonoBold);
        assert_eq!(FaceSlot::for_code('b'), FaceSlot::MonoBold);
        assert_eq!(FaceSlot::for_code('A'), FaceSlot::Mono);
        assert_eq!(FaceSlot::for_code('@'), FaceSlot::Mono);
        assert!(FaceSlot::MonoBold.uppercase_only());
        assert!(!FaceSlot::Sans.uppercase_only());
    }

    #[test]
    fn test_slot_names() {
        assert_eq!(FaceSlot::from_name("0"), Some(FaceSlot::Sans));
        assert_eq!(FaceSlot::from_name("BOLD"), Some(FaceSlot::MonoBold));
        assert_eq!(FaceSlot::from_name("mono"), Some(FaceSlot::Mono));
        assert_eq!(FaceSlot::from_name("x"), None);
    }

    #[test]
    fn test_measure_is_linear_in_height() {
        let fonts = FontRegistry::builtin();
        let (_, face) = fonts.face_for('0');
        let small = face.measure("HELLO", 30.0, 1.0);
        let large = face.measure("HELLO", 60.0, 1.0);
        assert!(small > 0.0);
        assert_eq!(large, small * 2.0);
    }

    #[test]
    fn test_invalid_outline_font() {
        let result = FontRegistry::builtin().with_outline_bytes(FaceSlot::Sans, vec![0, 1, 2, 3]);
        assert!(matches!(result, Err(FontError::Invalid(_))));
    }

    #[test]
    fn test_missing_outline_file() {
        let result = FontRegistry::builtin()
            .with_outline_file(FaceSlot::Mono, Path::new("/nonexistent/font.ttf"));
        assert!(matches!(result, Err(FontError::Io { .. })));
    }
}
