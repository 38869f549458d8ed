//! # Symbol Encoders
//!
//! Barcode data → boolean module matrix. Each symbology is a
//! [`SymbolEncoder`] registered in a [`SymbolRegistry`] under its
//! [`Symbology`] tag; the renderer only sees the registry, so encoders can
//! be added or swapped without touching layout code.
//!
//! | Tag | Encoder | Backend |
//! |-----|---------|---------|
//! | Code 128, 39, 93, EAN-13, EAN-8, UPC-A, I2of5, Codabar | [`linear`] | `barcoders` |
//! | QR | [`qr`] | `qrcode` |
//! | PDF417 | [`pdf417`] | `pdf417` |

pub mod linear;
pub mod pdf417;
pub mod qr;

use std::collections::HashMap;
use thiserror::Error;

use crate::label::{Barcode, SymbolParams, Symbology};

/// Errors from encoding one symbol.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("unsupported symbology {0:?}")]
    Unsupported(Symbology),

    #[error("invalid data for {symbology:?}: {reason}")]
    InvalidData {
        symbology: Symbology,
        reason: String,
    },
}

/// Module geometry requested by the label, in native dots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleOptions {
    pub module_width: u32,
    pub ratio: f64,
    pub height: u32,
    pub params: SymbolParams,
}

impl From<&Barcode> for ModuleOptions {
    fn from(barcode: &Barcode) -> Self {
        Self {
            module_width: barcode.module_width.max(1),
            ratio: barcode.ratio,
            height: barcode.height,
            params: barcode.params,
        }
    }
}

/// Row-major grid of modules, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    columns: usize,
    rows: usize,
    cells: Vec<bool>,
}

impl ModuleMatrix {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![false; columns * rows],
        }
    }

    /// Single-row matrix for a linear symbology.
    pub fn from_row(row: Vec<bool>) -> Self {
        Self {
            columns: row.len(),
            rows: 1,
            cells: row,
        }
    }

    /// Matrix from `barcoders`-style module output (1 = bar).
    pub fn from_modules(modules: &[u8]) -> Self {
        Self::from_row(modules.iter().map(|&m| m == 1).collect())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.columns && y < self.rows && self.cells[y * self.columns + x]
    }

    pub fn set(&mut self, x: usize, y: usize, dark: bool) {
        if x < self.columns && y < self.rows {
            self.cells[y * self.columns + x] = dark;
        }
    }

    /// Runs of dark modules per row as `(row, start, length)`.
    pub fn dark_runs(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        (0..self.rows).flat_map(move |y| {
            let row = &self.cells[y * self.columns..(y + 1) * self.columns];
            let mut runs = Vec::new();
            let mut x = 0;
            while x < row.len() {
                if row[x] {
                    let start = x;
                    while x < row.len() && row[x] {
                        x += 1;
                    }
                    runs.push((y, start, x - start));
                } else {
                    x += 1;
                }
            }
            runs
        })
    }
}

/// Encoded symbol plus the size of one module in native dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub matrix: ModuleMatrix,
    pub module_width: u32,
    pub row_height: u32,
}

impl Symbol {
    pub fn width_dots(&self) -> u32 {
        self.matrix.columns() as u32 * self.module_width
    }

    pub fn height_dots(&self) -> u32 {
        self.matrix.rows() as u32 * self.row_height
    }
}

/// Produces the module matrix for one symbology.
pub trait SymbolEncoder: Send + Sync {
    fn encode(&self, data: &str, options: &ModuleOptions) -> Result<Symbol, SymbolError>;

    /// Text for the human-readable interpretation line.
    fn interpretation(&self, data: &str) -> String {
        data.to_string()
    }
}

/// Encoders by symbology tag.
pub struct SymbolRegistry {
    encoders: HashMap<Symbology, Box<dyn SymbolEncoder>>,
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl SymbolRegistry {
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    /// Registry with every built-in encoder.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for symbology in linear::SUPPORTED {
            registry.register(*symbology, Box::new(linear::LinearEncoder::new(*symbology)));
        }
        registry.register(Symbology::Qr, Box::new(qr::QrEncoder));
        registry.register(Symbology::Pdf417, Box::new(pdf417::Pdf417Encoder));
        registry
    }

    pub fn register(&mut self, symbology: Symbology, encoder: Box<dyn SymbolEncoder>) {
        self.encoders.insert(symbology, encoder);
    }

    pub fn get(&self, symbology: Symbology) -> Option<&dyn SymbolEncoder> {
        self.encoders.get(&symbology).map(|e| e.as_ref())
    }
}
