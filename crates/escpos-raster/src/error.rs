//! Error types for the raster pipeline.

use std::path::PathBuf;

/// Errors that can occur while preparing or encoding a raster image.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported dither mode: {0}")]
    UnsupportedDitherMode(String),

    #[error("Image has zero width or height")]
    EmptyImage,

    /// Payload is larger than the device buffer advertised by the profile.
    #[error("Raster payload of {size} bytes exceeds device buffer of {max} bytes")]
    BufferOverflow { size: usize, max: usize },

    /// A header field cannot carry the value in the chosen framing.
    #[error("{field} value {value} exceeds framing limit {max}")]
    DimensionOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("Printer profile does not support graphics: {0}")]
    GraphicsUnsupported(String),

    #[error("Path is outside the allowed directory: {0}")]
    PathOutsideBase(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Result type alias for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
