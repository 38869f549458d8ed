//! PDF417 via the `pdf417` crate.
//!
//! Column count comes from `^B7` (default 4). When no row count is given
//! the smallest row count the data fits in is used. Each row is `height`
//! dots tall. The error correction level is the one `fit_seal` picks for
//! the grid.

use pdf417::{END_PATTERN, PDF417, PDF417Encoder, START_PATTERN};

use super::{ModuleMatrix, ModuleOptions, Symbol, SymbolEncoder, SymbolError};
use crate::label::Symbology;

const DEFAULT_COLUMNS: u32 = 4;
const MIN_ROWS: u32 = 3;
const MAX_ROWS: u32 = 90;
const MAX_COLUMNS: u32 = 30;

pub struct Pdf417Encoder;

/// Module count of one row: start, left indicator, data, right indicator,
/// stop.
fn row_width(columns: u32) -> usize {
    START_PATTERN.size() as usize + 17 + columns as usize * 17 + 17 + END_PATTERN.size() as usize
}

/// Encode into exactly `rows` x `columns` codewords, or `None` if the data
/// does not fit.
fn encode_grid(data: &str, rows: u32, columns: u32) -> Option<ModuleMatrix> {
    let mut codewords = vec![0u16; (rows * columns) as usize];
    let (level, filled) = PDF417Encoder::new(&mut codewords, false)
        .append_ascii(data)
        .fit_seal()?;

    let barcode = PDF417::new(filled, rows as u8, columns as u8, level);
    let width = row_width(columns);
    let mut matrix = ModuleMatrix::new(width, rows as usize);
    for (i, bit) in barcode.bits().enumerate() {
        matrix.set(i % width, i / width, bit);
    }
    Some(matrix)
}

impl SymbolEncoder for Pdf417Encoder {
    fn encode(&self, data: &str, options: &ModuleOptions) -> Result<Symbol, SymbolError> {
        let invalid = |reason: &str| SymbolError::InvalidData {
            symbology: Symbology::Pdf417,
            reason: reason.to_string(),
        };
        if data.is_empty() {
            return Err(invalid("empty data"));
        }

        let columns = options
            .params
            .columns
            .unwrap_or(DEFAULT_COLUMNS)
            .clamp(1, MAX_COLUMNS);

        let matrix = match options.params.rows {
            Some(rows) => encode_grid(data, rows.clamp(MIN_ROWS, MAX_ROWS), columns),
            None => (MIN_ROWS..=MAX_ROWS).find_map(|rows| encode_grid(data, rows, columns)),
        }
        .ok_or_else(|| invalid("data does not fit the symbol"))?;

        Ok(Symbol {
            matrix,
            module_width: options.module_width,
            row_height: options.height.max(1),
        })
    }
}
