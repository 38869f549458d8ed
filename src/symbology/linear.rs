//! One-dimensional symbologies, encoded with `barcoders`.
//!
//! Every linear symbol is a single row of modules one `module_width` wide
//! and `height` dots tall. `barcoders` only emits narrow/wide ratios of
//! 2:1 for the two-width symbologies, so the `^BY` ratio is carried but
//! not applied.

use barcoders::sym::codabar::Codabar;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::code128::Code128;
use barcoders::sym::ean8::EAN8;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::tf::TF;

use super::{ModuleMatrix, ModuleOptions, Symbol, SymbolEncoder, SymbolError};
use crate::label::Symbology;

/// Symbologies handled by [`LinearEncoder`].
pub const SUPPORTED: &[Symbology] = &[
    Symbology::Code128,
    Symbology::Code39,
    Symbology::Code93,
    Symbology::Ean13,
    Symbology::Ean8,
    Symbology::UpcA,
    Symbology::Interleaved2of5,
    Symbology::Codabar,
];

// barcoders Code 128 character set selectors
const SET_A: char = '\u{00C0}';
const SET_B: char = '\u{0181}';
const SET_C: char = '\u{0106}';

pub struct LinearEncoder {
    symbology: Symbology,
}

impl LinearEncoder {
    pub fn new(symbology: Symbology) -> Self {
        Self { symbology }
    }

    fn invalid(&self, reason: impl ToString) -> SymbolError {
        SymbolError::InvalidData {
            symbology: self.symbology,
            reason: reason.to_string(),
        }
    }

    fn modules(&self, data: &str, options: &ModuleOptions) -> Result<Vec<u8>, SymbolError> {
        if data.is_empty() {
            return Err(self.invalid("empty data"));
        }
        let encoded = match self.symbology {
            Symbology::Code128 => Code128::new(code128_input(data))
                .map_err(|e| self.invalid(e))?
                .encode(),
            Symbology::Code39 => {
                let upper = data.to_ascii_uppercase();
                let code = if options.params.check_digit {
                    Code39::with_checksum(upper)
                } else {
                    Code39::new(upper)
                };
                code.map_err(|e| self.invalid(e))?.encode()
            }
            Symbology::Code93 => Code93::new(data.to_ascii_uppercase())
                .map_err(|e| self.invalid(e))?
                .encode(),
            Symbology::Ean13 => EAN13::new(digits(data, 12).map_err(|e| self.invalid(e))?)
                .map_err(|e| self.invalid(e))?
                .encode(),
            Symbology::Ean8 => EAN8::new(digits(data, 7).map_err(|e| self.invalid(e))?)
                .map_err(|e| self.invalid(e))?
                .encode(),
            Symbology::UpcA => {
                // UPC-A is EAN-13 with a leading zero.
                let body = digits(data, 11).map_err(|e| self.invalid(e))?;
                EAN13::new(format!("0{}", body))
                    .map_err(|e| self.invalid(e))?
                    .encode()
            }
            Symbology::Interleaved2of5 => {
                let mut body = digits(data, usize::MAX).map_err(|e| self.invalid(e))?;
                if body.len() % 2 == 1 {
                    body.insert(0, '0');
                }
                TF::interleaved(body).map_err(|e| self.invalid(e))?.encode()
            }
            Symbology::Codabar => {
                let (start, stop) = options.params.start_stop.unwrap_or(('A', 'B'));
                Codabar::new(codabar_input(data, start, stop))
                    .map_err(|e| self.invalid(e))?
                    .encode()
            }
            other => return Err(SymbolError::Unsupported(other)),
        };
        Ok(encoded)
    }
}

impl SymbolEncoder for LinearEncoder {
    fn encode(&self, data: &str, options: &ModuleOptions) -> Result<Symbol, SymbolError> {
        let modules = self.modules(data, options)?;
        Ok(Symbol {
            matrix: ModuleMatrix::from_modules(&modules),
            module_width: options.module_width,
            row_height: options.height.max(1),
        })
    }

    fn interpretation(&self, data: &str) -> String {
        match self.symbology {
            Symbology::Code128 => strip_invocation_codes(data),
            Symbology::Code39 | Symbology::Code93 => data.to_ascii_uppercase(),
            _ => data.to_string(),
        }
    }
}

/// First `max` characters of `data`, which must all be digits.
fn digits(data: &str, max: usize) -> Result<String, String> {
    let body: String = data.chars().take(max).collect();
    if body.chars().all(|c| c.is_ascii_digit()) {
        Ok(body)
    } else {
        Err(format!("{:?} is not numeric", data))
    }
}

fn codabar_input(data: &str, start: char, stop: char) -> String {
    let is_guard = |c: char| matches!(c.to_ascii_uppercase(), 'A'..='D');
    let mut chars = data.chars();
    let first = chars.next();
    let last = data.chars().last();
    match (first, last) {
        (Some(f), Some(l)) if data.len() > 1 && is_guard(f) && is_guard(l) => {
            data.to_ascii_uppercase()
        }
        _ => format!("{}{}{}", start, data, stop),
    }
}

/// Translate ZPL `>x` invocation codes into `barcoders` character set
/// selectors. Data without a leading selector starts in set C when it is
/// an even run of digits, set B otherwise.
fn code128_input(data: &str) -> String {
    let mut out = String::with_capacity(data.len() + 1);
    let mut chars = data.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '>' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('>') => out.push('>'),
            Some('9') | Some('7') => out.push(SET_A),
            Some(':') | Some('6') => out.push(SET_B),
            Some(';') | Some('5') => out.push(SET_C),
            Some(_) => {}
            None => out.push('>'),
        }
    }

    if out.starts_with([SET_A, SET_B, SET_C]) {
        return out;
    }
    let numeric = !out.is_empty() && out.chars().all(|c| c.is_ascii_digit());
    let set = if numeric && out.len() % 2 == 0 {
        SET_C
    } else {
        SET_B
    };
    out.insert(0, set);
    out
}

/// Printable text of a Code 128 field: invocation codes removed, `>>`
/// kept as `>`.
fn strip_invocation_codes(data: &str) -> String {
    let mut out = String::with_capacity(data.len());
    let mut chars = data.chars();
    while let Some(ch) = chars.next() {
        if ch != '>' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('>') | None => out.push('>'),
            Some(_) => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::SymbolParams;
    use pretty_assertions::assert_eq;

    fn options() -> ModuleOptions {
        ModuleOptions {
            module_width: 2,
            ratio: 3.0,
            height: 100,
            params: SymbolParams::default(),
        }
    }

    fn encode(symbology: Symbology, data: &str) -> Result<Symbol, SymbolError> {
        LinearEncoder::new(symbology).encode(data, &options())
    }

    #[test]
    fn test_code128_charset_selection() {
        assert_eq!(code128_input("12345678"), format!("{}12345678", SET_C));
        assert_eq!(code128_input("12345"), format!("{}12345", SET_B));
        assert_eq!(code128_input("Hello"), format!("{}Hello", SET_B));
        assert_eq!(code128_input(">;1234>6AB"), format!("{}1234{}AB", SET_C, SET_B));
        assert_eq!(code128_input("A>>B"), format!("{}A>B", SET_B));
    }

    #[test]
    fn test_code128_interpretation_strips_codes() {
        let encoder = LinearEncoder::new(Symbology::Code128);
        assert_eq!(encoder.interpretation(">:ABC>>1"), "ABC>1");
        assert_eq!(encoder.interpretation("PLAIN"), "PLAIN");
    }

    #[test]
    fn test_code128_symbol_geometry() {
        let symbol = encode(Symbology::Code128, "ABC123").unwrap();
        assert_eq!(symbol.matrix.rows(), 1);
        assert_eq!(symbol.module_width, 2);
        assert_eq!(symbol.row_height, 100);
        // Symbols start with a bar and end with the 2-module stop bar.
        assert!(symbol.matrix.get(0, 0));
        assert!(symbol.matrix.get(symbol.matrix.columns() - 1, 0));
    }

    #[test]
    fn test_code39_accepts_lowercase() {
        let lower = encode(Symbology::Code39, "abc").unwrap();
        let upper = encode(Symbology::Code39, "ABC").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_ean13_uses_first_twelve_digits() {
        let twelve = encode(Symbology::Ean13, "400638133393").unwrap();
        let thirteen = encode(Symbology::Ean13, "4006381333931").unwrap();
        assert_eq!(twelve, thirteen);
        assert_eq!(twelve.matrix.columns(), 95);
    }

    #[test]
    fn test_upca_is_ean13_with_leading_zero() {
        let upc = encode(Symbology::UpcA, "03600029145").unwrap();
        let ean = encode(Symbology::Ean13, "003600029145").unwrap();
        assert_eq!(upc, ean);
    }

    #[test]
    fn test_numeric_symbologies_reject_letters() {
        assert!(matches!(
            encode(Symbology::Ean8, "12A4567"),
            Err(SymbolError::InvalidData { .. })
        ));
        assert!(matches!(
            encode(Symbology::Interleaved2of5, "12X"),
            Err(SymbolError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_interleaved_pads_odd_length() {
        let odd = encode(Symbology::Interleaved2of5, "123").unwrap();
        let even = encode(Symbology::Interleaved2of5, "0123").unwrap();
        assert_eq!(odd, even);
    }

    #[test]
    fn test_codabar_guards() {
        assert_eq!(codabar_input("1234", 'A', 'B'), "A1234B");
        assert_eq!(codabar_input("c1234d", 'A', 'B'), "C1234D");
        assert!(encode(Symbology::Codabar, "1234").is_ok());
    }

    #[test]
    fn test_empty_data_is_invalid() {
        assert!(matches!(
            encode(Symbology::Code128, ""),
            Err(SymbolError::InvalidData { .. })
        ));
    }
}
