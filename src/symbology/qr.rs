//! QR codes via the `qrcode` crate.
//!
//! Modules are square, `magnification` dots on a side (default 2, the
//! 203 DPI printer default). No quiet zone is drawn; ZPL leaves that to
//! the label designer.

use qrcode::{Color, EcLevel, QrCode};

use super::{ModuleMatrix, ModuleOptions, Symbol, SymbolEncoder, SymbolError};
use crate::label::Symbology;

const DEFAULT_MAGNIFICATION: u32 = 2;
const MAX_MAGNIFICATION: u32 = 10;

pub struct QrEncoder;

/// Map a ZPL reliability letter to a `qrcode` level. Unknown letters
/// fall back to `M`, the printer default.
fn ec_level(code: Option<char>) -> EcLevel {
    match code.map(|c| c.to_ascii_uppercase()) {
        Some('H') => EcLevel::H,
        Some('Q') => EcLevel::Q,
        Some('L') => EcLevel::L,
        _ => EcLevel::M,
    }
}

impl SymbolEncoder for QrEncoder {
    fn encode(&self, data: &str, options: &ModuleOptions) -> Result<Symbol, SymbolError> {
        let level = ec_level(options.params.error_correction);
        let code = QrCode::with_error_correction_level(data, level)
            .map_err(|e| SymbolError::InvalidData {
                symbology: Symbology::Qr,
                reason: e.to_string(),
            })?;

        let size = code.width();
        let mut matrix = ModuleMatrix::new(size, size);
        for y in 0..size {
            for x in 0..size {
                matrix.set(x, y, code[(x, y)] == Color::Dark);
            }
        }

        let magnification = options
            .params
            .magnification
            .unwrap_or(DEFAULT_MAGNIFICATION)
            .clamp(1, MAX_MAGNIFICATION);

        Ok(Symbol {
            matrix,
            module_width: magnification,
            row_height: magnification,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::SymbolParams;

    fn options(params: SymbolParams) -> ModuleOptions {
        ModuleOptions {
            module_width: 2,
            ratio: 3.0,
            height: 10,
            params,
        }
    }

    #[test]
    fn test_version_one_symbol() {
        let symbol = QrEncoder
            .encode("HELLO", &options(SymbolParams::default()))
            .unwrap();
        assert_eq!(symbol.matrix.columns(), 21);
        assert_eq!(symbol.matrix.rows(), 21);
        assert_eq!(symbol.width_dots(), 42);
        // Finder pattern corner.
        assert!(symbol.matrix.get(0, 0));
    }

    #[test]
    fn test_magnification() {
        let params = SymbolParams {
            magnification: Some(5),
            ..SymbolParams::default()
        };
        let symbol = QrEncoder.encode("HELLO", &options(params)).unwrap();
        assert_eq!(symbol.module_width, 5);
        assert_eq!(symbol.row_height, 5);
        assert_eq!(symbol.height_dots(), 105);
    }

    #[test]
    fn test_error_correction_levels() {
        assert_eq!(ec_level(Some('h')), EcLevel::H);
        assert_eq!(ec_level(Some('Q')), EcLevel::Q);
        assert_eq!(ec_level(Some('L')), EcLevel::L);
        assert_eq!(ec_level(Some('Z')), EcLevel::M);
        assert_eq!(ec_level(None), EcLevel::M);
    }

    #[test]
    fn test_oversized_data_is_invalid() {
        let data = "X".repeat(5000);
        let err = QrEncoder
            .encode(&data, &options(SymbolParams::default()))
            .unwrap_err();
        assert!(matches!(err, SymbolError::InvalidData { .. }));
    }
}
