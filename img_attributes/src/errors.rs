//! Attribute Engine Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AttributeError {
    #[error("Memory allocation failed: {0}")]
    ResourceExhaustion(String),

    #[error("Failed to read pixel row {y}")]
    RowRead { y: usize },

    #[error("Failed to write pixel row {y}")]
    RowWrite { y: usize },

    #[error("Pixel buffer geometry mismatch: expected {expected} values, got {actual}")]
    GeometryMismatch { expected: usize, actual: usize },

    #[error("Colormap index {index} out of range for {colors} colors")]
    ColormapRange { index: usize, colors: usize },
}

pub type Result<T> = std::result::Result<T, AttributeError>;
