//! # zpl-raster - ZPL Label Parser and Rasterizer
//!
//! zpl-raster reads Zebra Programming Language (ZPL) label programs and
//! renders them to 1-bit bitmaps. It provides:
//!
//! - **Parsing**: a tokenizer that honors redefined prefixes and
//!   delimiters, and a command interpreter with per-label defaults
//! - **Layout**: anchors, rotation, wrapped and justified text blocks, and
//!   automatic placement of fields without coordinates
//! - **Symbols**: linear barcodes, QR and PDF417 behind one encoder registry
//! - **Output**: canvas at any resolution, PNG encoding
//!
//! ## Quick Start
//!
//! ```
//! use zpl_raster::{FontRegistry, RenderOptions, SymbolRegistry};
//!
//! let input = b"^XA^FO50,50^A0N,30,30^FDHELLO^FS^XZ";
//! let options = RenderOptions::from_inches(RenderOptions::DPMM_8, 2.0, 1.0);
//! let fonts = FontRegistry::builtin();
//! let symbols = SymbolRegistry::standard();
//!
//! let (rendered, count) = zpl_raster::render_label(input, 0, &options, &fonts, &symbols)?;
//! assert_eq!(count, 1);
//! let png = rendered.to_png()?;
//! assert!(!png.is_empty());
//!
//! # Ok::<(), zpl_raster::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`zpl`] | Tokenizer, parameters, defaults, command interpreter |
//! | [`label`] | Parsed label documents |
//! | [`fonts`] | Font code mapping and glyph rasterization |
//! | [`symbology`] | Barcode encoders |
//! | [`render`] | Layout engine and canvas |
//! | [`error`] | Error types |

pub mod error;
pub mod fonts;
pub mod label;
pub mod render;
pub mod symbology;
pub mod zpl;

// Re-exports for convenience
pub use error::LabelError;
pub use fonts::FontRegistry;
pub use label::Label;
pub use render::{RenderOptions, Rendered};
pub use symbology::SymbolRegistry;

/// Parse `input` and render the label at `index`.
///
/// Returns the rendered label together with the number of labels found in
/// the input.
pub fn render_label(
    input: &[u8],
    index: usize,
    options: &RenderOptions,
    fonts: &FontRegistry,
    symbols: &SymbolRegistry,
) -> Result<(Rendered, usize), LabelError> {
    let labels = zpl::parse(input)?;
    let count = labels.len();
    let label = labels
        .get(index)
        .ok_or(LabelError::LabelIndex { index, count })?;
    let rendered = render::render(label, options, fonts, symbols)?;
    Ok((rendered, count))
}
