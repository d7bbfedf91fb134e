//! ESC/POS raster image pipeline for thermal receipt printers.
//!
//! Turns an arbitrary color image into a `GS v 0` style raster command:
//! resize to the printer's dot grid, convert to grayscale, dither to
//! one bit per dot, pack, and frame with 16-bit or 32-bit length fields.
//!
//! Writing the resulting bytes to a device is left to the caller through
//! the [`RawSink`] interface.

pub mod bitmap;
pub mod dither;
pub mod encoder;
mod error;
pub mod grayscale;
pub mod loader;
pub mod options;
pub mod pipeline;
pub mod profile;
pub mod resize;
pub mod rotate;
pub mod sink;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use bitmap::MonochromeBitmap;
pub use dither::{DitherMode, DitherProcessor, apply};
pub use encoder::{Framing, RasterEncoder, RasterScale};
pub use error::{RasterError, Result};
pub use grayscale::to_grayscale;
pub use options::PipelineOptions;
pub use pipeline::Pipeline;
pub use profile::PrinterProfile;
pub use resize::{TargetHeight, resize_gray_to_width, resize_to_width};
pub use sink::{RawSink, WriterSink};

/// Default print width in dots (58 mm paper at 203 dpi).
pub const DEFAULT_PRINT_WIDTH: u32 = 384;

/// Default black/white decision boundary.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// A grid of 8-bit luminance samples, row-major.
pub type GrayscaleImage = image::GrayImage;
