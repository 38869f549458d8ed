//! # Layout Engine
//!
//! Turns one parsed [`Label`] into a 1-bit bitmap at a chosen resolution.
//!
//! ## Pipeline
//!
//! ```text
//! for each element, in encounter order:
//!     resolve position   (explicit → scaled + home, automatic → DrawerState)
//!     apply anchor       (Origin → per-rotation offset, Typeset → baseline)
//!     rotate about anchor, lay out, draw
//!     record baseline    (for the next automatic field of the same kind)
//! ```
//!
//! An element that cannot be drawn (zero font height, zero-width block,
//! unregistered symbology, data the encoder rejects) is skipped with a
//! [`Diagnostic`]; the rest of the label still renders.
//!
//! ## Modules
//!
//! - [`canvas`]: bitmap, ink modes, rotated pen
//! - [`state`]: automatic placement
//! - [`text`]: wrapping, alignment, glyph drawing
//! - [`barcode`]: symbol placement and interpretation line
//! - [`graphics`]: boxes, diagonal lines, circles
//!
//! ## Example
//!
//! ```
//! use zpl_raster::fonts::FontRegistry;
//! use zpl_raster::render::{self, RenderOptions};
//! use zpl_raster::symbology::SymbolRegistry;
//! use zpl_raster::zpl;
//!
//! let labels = zpl::parse(b"^XA^FO50,50^A0N,30,30^FDHELLO^FS^XZ").unwrap();
//! let options = RenderOptions::from_inches(RenderOptions::DPMM_8, 2.0, 1.0);
//! let rendered = render::render(
//!     &labels[0],
//!     &options,
//!     &FontRegistry::builtin(),
//!     &SymbolRegistry::standard(),
//! )
//! .unwrap();
//!
//! assert_eq!(rendered.canvas.width(), 406);
//! assert_eq!(rendered.canvas.height(), 203);
//! assert!(rendered.diagnostics.is_empty());
//! ```

pub mod barcode;
pub mod canvas;
pub mod graphics;
pub mod state;
pub mod text;

use serde::Serialize;
use thiserror::Error;

use crate::fonts::FontRegistry;
use crate::label::{Barcode, Element, ElementKind, Label, LineColor, NATIVE_DPMM, TextField};
use crate::symbology::{ModuleOptions, SymbolError, SymbolRegistry};

pub use canvas::{Canvas, Ink, Pen};
pub use state::DrawerState;

/// Largest canvas side, in dots.
pub const MAX_CANVAS_DOTS: u32 = 16_384;

/// Font code used for barcode interpretation lines.
const INTERPRETATION_FONT: char = 'A';

/// Errors that abort a whole render.
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("Image encoding error: {0}")]
    ImageEncode(String),
}

/// Why a single element was skipped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutFault {
    #[error("font height is zero")]
    ZeroFontHeight,

    #[error("field block width is zero")]
    ZeroBlockWidth,

    #[error("glyph of {size} dots does not fit a {limit} dot canvas")]
    GlyphTooLarge { size: u64, limit: u64 },

    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// A skipped element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Position of the element in the label.
    pub index: usize,
    pub kind: &'static str,
    pub message: String,
}

/// # Render Options
///
/// Output resolution and physical label size.
///
/// ```text
/// canvas width  = round(width_mm  × dpmm)
/// canvas height = round(height_mm × dpmm)
/// scale         = dpmm / 8
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Output dots per millimeter.
    pub dpmm: u32,
    pub width_mm: f64,
    pub height_mm: f64,
}

impl RenderOptions {
    /// 152 DPI
    pub const DPMM_6: u32 = 6;
    /// 203 DPI
    pub const DPMM_8: u32 = 8;
    /// 300 DPI
    pub const DPMM_12: u32 = 12;
    /// 600 DPI
    pub const DPMM_24: u32 = 24;

    pub fn new(dpmm: u32, width_mm: f64, height_mm: f64) -> Self {
        Self {
            dpmm,
            width_mm,
            height_mm,
        }
    }

    pub fn from_inches(dpmm: u32, width_in: f64, height_in: f64) -> Self {
        Self::new(dpmm, width_in * 25.4, height_in * 25.4)
    }

    /// Output pixels per native label dot.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.dpmm as f64 / NATIVE_DPMM as f64
    }

    /// Convert millimeters to output dots.
    #[inline]
    pub fn mm_to_dots(&self, mm: f64) -> u32 {
        (mm * self.dpmm as f64).round() as u32
    }

    /// Canvas size in dots.
    pub fn canvas_size(&self) -> Result<(u32, u32), RenderError> {
        if self.dpmm == 0 {
            return Err(RenderError::InvalidCanvas("resolution must be positive".into()));
        }
        for (name, mm) in [("width", self.width_mm), ("height", self.height_mm)] {
            if !mm.is_finite() || mm <= 0.0 {
                return Err(RenderError::InvalidCanvas(format!(
                    "{} must be positive, got {} mm",
                    name, mm
                )));
            }
        }
        let size = (self.mm_to_dots(self.width_mm), self.mm_to_dots(self.height_mm));
        if size.0 == 0 || size.1 == 0 || size.0 > MAX_CANVAS_DOTS || size.1 > MAX_CANVAS_DOTS {
            return Err(RenderError::InvalidCanvas(format!(
                "{}x{} dots is outside 1..={}",
                size.0, size.1, MAX_CANVAS_DOTS
            )));
        }
        Ok(size)
    }
}

impl Default for RenderOptions {
    /// 4x6 in at 203 DPI.
    fn default() -> Self {
        Self::from_inches(Self::DPMM_8, 4.0, 6.0)
    }
}

/// A rendered label.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub canvas: Canvas,
    /// Elements that were skipped.
    pub diagnostics: Vec<Diagnostic>,
}

impl Rendered {
    /// Encode as an 8-bit grayscale PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        use image::ImageEncoder;

        let img = self.canvas.to_gray_image();
        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::L8,
            )
            .map_err(|e: image::ImageError| RenderError::ImageEncode(e.to_string()))?;

        Ok(png_bytes)
    }
}

/// Render one label.
///
/// `fonts` and `symbols` are only read, so one instance of each can serve
/// any number of concurrent renders.
pub fn render(
    label: &Label,
    options: &RenderOptions,
    fonts: &FontRegistry,
    symbols: &SymbolRegistry,
) -> Result<Rendered, RenderError> {
    let (width, height) = options.canvas_size()?;
    let scale = options.scale();

    let mut renderer = Renderer {
        canvas: Canvas::new(width as usize, height as usize),
        state: DrawerState::new(label.home, scale),
        glyphs: text::GlyphCache::new(),
        scale,
        fonts,
        symbols,
    };

    let mut diagnostics = Vec::new();
    for (index, element) in label.elements.iter().enumerate() {
        if let Err(fault) = renderer.draw(element) {
            let kind = element.kind_name();
            tracing::warn!(index, kind, %fault, "skipping element");
            diagnostics.push(Diagnostic {
                index,
                kind,
                message: fault.to_string(),
            });
        }
    }

    tracing::debug!(
        width,
        height,
        elements = label.elements.len(),
        skipped = diagnostics.len(),
        "rendered label"
    );

    Ok(Rendered {
        canvas: renderer.canvas,
        diagnostics,
    })
}

/// Mutable state of one render pass.
struct Renderer<'a> {
    canvas: Canvas,
    state: DrawerState,
    glyphs: text::GlyphCache,
    scale: f64,
    fonts: &'a FontRegistry,
    symbols: &'a SymbolRegistry,
}

impl Renderer<'_> {
    fn draw(&mut self, element: &Element) -> Result<(), LayoutFault> {
        let ink = |color: LineColor| match (element.reverse, color) {
            (true, _) => Ink::Invert,
            (false, LineColor::Black) => Ink::Black,
            (false, LineColor::White) => Ink::White,
        };

        match &element.kind {
            ElementKind::Text(field) => self.draw_text(element, field, ink(LineColor::Black)),
            ElementKind::Barcode(barcode) => {
                self.draw_barcode(element, barcode, ink(LineColor::Black))
            }
            ElementKind::GraphicBox(graphic) => {
                let h = graphic.height as f64 * self.scale;
                let origin = self.graphic_origin(element, h);
                let paint = ink(graphic.color);
                graphics::draw_box(&mut self.canvas, origin, graphic, self.scale, paint);
                Ok(())
            }
            ElementKind::GraphicLine(graphic) => {
                let h = graphic.height as f64 * self.scale;
                let origin = self.graphic_origin(element, h);
                let paint = ink(graphic.color);
                graphics::draw_line(&mut self.canvas, origin, graphic, self.scale, paint);
                Ok(())
            }
            ElementKind::GraphicCircle(graphic) => {
                let d = graphic.diameter as f64 * self.scale;
                let origin = self.graphic_origin(element, d);
                let paint = ink(graphic.color);
                graphics::draw_circle(&mut self.canvas, origin, graphic, self.scale, paint);
                Ok(())
            }
        }
    }

    /// Top-left corner of a graphic, recording it for continuation.
    fn graphic_origin(&mut self, element: &Element, height: f64) -> (f64, f64) {
        let kind = element.kind_name();
        let placement = self.state.resolve(kind, &element.position);
        let origin = graphics::top_left(placement, height);
        self.state.record(kind, graphics::baseline(origin, height));
        origin
    }

    fn draw_text(
        &mut self,
        element: &Element,
        field: &TextField,
        ink: Ink,
    ) -> Result<(), LayoutFault> {
        let fonts = self.fonts;
        let (slot, face) = fonts.face_for(field.font.name);
        let typeface = text::Typeface {
            slot,
            face,
            height: field.font.height as f64 * self.scale,
            width_scale: field.font.width_scale(slot.nominal_aspect()),
        };

        let limit = self.canvas.width().max(self.canvas.height()) as f64;
        text::check_glyph_size(&typeface, &field.text, limit)?;

        let placement = self.state.resolve("text", &element.position);
        let layout = text::layout_text(field, &typeface, placement, self.scale)?;
        text::draw_lines(
            &mut self.canvas,
            &layout.pen,
            &layout.lines,
            &typeface,
            &mut self.glyphs,
            ink,
        );
        self.state.record("text", layout.baseline());
        Ok(())
    }

    fn draw_barcode(
        &mut self,
        element: &Element,
        barcode: &Barcode,
        ink: Ink,
    ) -> Result<(), LayoutFault> {
        let symbols = self.symbols;
        let encoder = symbols
            .get(barcode.symbology)
            .ok_or(SymbolError::Unsupported(barcode.symbology))?;
        let symbol = encoder.encode(&barcode.data, &ModuleOptions::from(barcode))?;

        let placement = self.state.resolve("barcode", &element.position);
        let layout = barcode::layout_barcode(&symbol, barcode.orientation, placement, self.scale);
        barcode::draw_symbol(&mut self.canvas, &layout, &symbol, ink);

        if barcode.interpretation && !barcode.symbology.is_two_dimensional() {
            let fonts = self.fonts;
            let (slot, face) = fonts.face_for(INTERPRETATION_FONT);
            let typeface = text::Typeface {
                slot,
                face,
                height: (barcode::INTERPRETATION_HEIGHT * symbol.module_width) as f64 * self.scale,
                width_scale: 1.0,
            };
            let line = barcode::interpretation_line(
                &layout,
                &encoder.interpretation(&barcode.data),
                &typeface,
                barcode.interpretation_above,
            );
            text::draw_lines(
                &mut self.canvas,
                &layout.pen,
                &[line],
                &typeface,
                &mut self.glyphs,
                ink,
            );
        }

        self.state.record("barcode", layout.baseline());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zpl;

    fn render_zpl(input: &str, options: &RenderOptions) -> Rendered {
        let labels = zpl::parse(input.as_bytes()).unwrap();
        render(
            &labels[0],
            options,
            &FontRegistry::builtin(),
            &SymbolRegistry::standard(),
        )
        .unwrap()
    }

    fn two_by_one() -> RenderOptions {
        RenderOptions::from_inches(RenderOptions::DPMM_8, 2.0, 1.0)
    }

    #[test]
    fn test_canvas_size() {
        assert_eq!(two_by_one().canvas_size(), Ok((406, 203)));
        assert_eq!(
            RenderOptions::new(RenderOptions::DPMM_12, 100.0, 50.0).canvas_size(),
            Ok((1200, 600))
        );
        assert_eq!(RenderOptions::default().canvas_size(), Ok((813, 1219)));
    }

    #[test]
    fn test_invalid_canvas() {
        assert!(matches!(
            RenderOptions::new(0, 10.0, 10.0).canvas_size(),
            Err(RenderError::InvalidCanvas(_))
        ));
        assert!(matches!(
            RenderOptions::new(8, -1.0, 10.0).canvas_size(),
            Err(RenderError::InvalidCanvas(_))
        ));
        assert!(matches!(
            RenderOptions::new(24, 10_000.0, 10.0).canvas_size(),
            Err(RenderError::InvalidCanvas(_))
        ));
    }

    #[test]
    fn test_scale() {
        assert_eq!(two_by_one().scale(), 1.0);
        assert_eq!(RenderOptions::new(RenderOptions::DPMM_24, 1.0, 1.0).scale(), 3.0);
        assert_eq!(RenderOptions::new(RenderOptions::DPMM_6, 1.0, 1.0).scale(), 0.75);
    }

    #[test]
    fn test_empty_label_is_white() {
        let rendered = render_zpl("^XA^XZ", &two_by_one());
        assert_eq!(rendered.canvas.ink_count(), 0);
    }

    #[test]
    fn test_reverse_field_over_box() {
        let rendered = render_zpl(
            "^XA^FO0,0^GB100,100,100^FS^FO10,10^FR^GB20,20,20^FS^XZ",
            &two_by_one(),
        );
        assert!(rendered.canvas.get(5, 5));
        assert!(!rendered.canvas.get(15, 15));
        assert_eq!(rendered.canvas.ink_count(), 100 * 100 - 20 * 20);
    }

    #[test]
    fn test_label_home_offsets_graphics() {
        let rendered = render_zpl("^XA^LH30,40^FO10,10^GB20,20,20^FS^XZ", &two_by_one());
        assert_eq!(rendered.canvas.ink_bounds(), Some((40, 50, 60, 70)));
    }

    #[test]
    fn test_automatic_graphics_stack() {
        let rendered = render_zpl(
            "^XA^FO10,10^GB20,20,20^FS^GB20,20,20^FS^XZ",
            &two_by_one(),
        );
        assert_eq!(rendered.canvas.ink_bounds(), Some((10, 10, 30, 50)));
    }

    #[test]
    fn test_barcode_with_interpretation() {
        let rendered = render_zpl("^XA^BY2^FO20,20^BCN,50,Y,N^FD12345678^FS^XZ", &two_by_one());
        assert!(rendered.diagnostics.is_empty());
        let (x0, y0, _, y1) = rendered.canvas.ink_bounds().unwrap();
        assert_eq!((x0, y0), (20, 20));
        // Text below the bars.
        assert!(y1 > 70);
    }

    #[test]
    fn test_faults_become_diagnostics() {
        let rendered = render_zpl(
            "^XA^FO10,10^A0N,0,0^FDX^FS^FO10,10^BXN,10^FDX^FS^FO10,10^GB5,5,5^FS^XZ",
            &two_by_one(),
        );
        let kinds: Vec<(usize, &str)> = rendered
            .diagnostics
            .iter()
            .map(|d| (d.index, d.kind))
            .collect();
        assert_eq!(kinds, [(0, "text"), (1, "barcode")]);
        assert_eq!(rendered.canvas.ink_count(), 25);
    }

    #[test]
    fn test_png_output() {
        let rendered = render_zpl("^XA^FO10,10^GB20,20,2^FS^XZ", &two_by_one());
        let png = rendered.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (406, 203));
        assert_eq!(decoded.get_pixel(10, 10).0, [0]);
        assert_eq!(decoded.get_pixel(0, 0).0, [255]);
    }
}
