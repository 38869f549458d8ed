//! # Error Types
//!
//! This module defines the top-level error type of the zpl-raster library.
//! Each stage keeps its own error enum next to its code and converts into
//! [`LabelError`] at the API boundary.

use thiserror::Error;

use crate::fonts::FontError;
use crate::render::RenderError;
use crate::zpl::ParseError;

/// Main error type for zpl-raster operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Malformed label program
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Rendering failed as a whole (not a single skipped element)
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Font loading error
    #[error("Font error: {0}")]
    Font(#[from] FontError),

    /// Requested label does not exist in the input
    #[error("Label index {index} out of range ({count} labels found)")]
    LabelIndex { index: usize, count: usize },

    /// Invalid command-line or option value
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Output serialization error
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
