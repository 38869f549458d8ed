//! # ZPL Front End
//!
//! Turns a raw ZPL byte stream into [`Label`](crate::label::Label)
//! documents.
//!
//! ```text
//! bytes → lexer (tokens, live delimiters) → parser (defaults, pending field) → Vec<Label>
//! ```
//!
//! ## Example
//!
//! ```
//! use zpl_raster::zpl;
//!
//! let labels = zpl::parse(b"^XA^FO50,50^A0N,30,30^FDHELLO^FS^XZ").unwrap();
//! assert_eq!(labels.len(), 1);
//! assert_eq!(labels[0].elements.len(), 1);
//! ```

pub mod defaults;
pub mod lexer;
pub mod params;
pub mod parser;

pub use defaults::LabelDefaults;
pub use lexer::{Delimiters, Token, tokenize};
pub use parser::{Parser, parse};

use thiserror::Error;

/// Errors that abort parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A numeric parameter is present but is not a number.
    #[error("invalid number {value:?} in parameter {index} of {command} at offset {offset}")]
    InvalidNumber {
        command: String,
        index: usize,
        value: String,
        offset: usize,
    },
}
