//! Dithering algorithms for converting grayscale images to 1-bit bitmaps.
//!
//! All algorithms scan in row-major order and make a single decision per
//! pixel: a sample at or below the threshold prints a dot, anything above
//! stays white. The error-diffusion variants perturb upcoming samples in a
//! widened accumulator before that decision is taken; the accumulator is
//! never clamped.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::{GrayscaleImage, MonochromeBitmap, RasterError, Result};

/// Available dithering algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DitherMode {
    /// Plain thresholding, no error propagation.
    #[default]
    Threshold,
    /// Floyd-Steinberg error diffusion.
    FloydSteinberg,
    /// Atkinson error diffusion (3/4 of the error, 1/8 per neighbor).
    Atkinson,
}

impl DitherMode {
    /// Parse a mode name, optionally falling back to `Threshold` when the
    /// name is not recognised.
    pub fn resolve(raw: &str, best_effort: bool) -> Result<Self> {
        match raw.parse() {
            Ok(mode) => Ok(mode),
            Err(_) if best_effort => {
                debug!(mode = raw, "Unknown dither mode, falling back to threshold");
                Ok(Self::Threshold)
            }
            Err(e) => Err(e),
        }
    }

    /// Processor implementing this mode.
    pub fn processor(self) -> &'static dyn DitherProcessor {
        match self {
            Self::Threshold => &ThresholdDither,
            Self::FloydSteinberg => &FloydSteinbergDither,
            Self::Atkinson => &AtkinsonDither,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::FloydSteinberg => "floyd-steinberg",
            Self::Atkinson => "atkinson",
        }
    }
}

impl fmt::Display for DitherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DitherMode {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threshold" | "none" => Ok(Self::Threshold),
            "floyd-steinberg" | "floyd_steinberg" | "floydsteinberg" | "fs" => {
                Ok(Self::FloydSteinberg)
            }
            "atkinson" => Ok(Self::Atkinson),
            _ => Err(RasterError::UnsupportedDitherMode(s.to_string())),
        }
    }
}

impl TryFrom<u8> for DitherMode {
    type Error = RasterError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Threshold),
            1 => Ok(Self::FloydSteinberg),
            2 => Ok(Self::Atkinson),
            other => Err(RasterError::UnsupportedDitherMode(other.to_string())),
        }
    }
}

/// Interface implemented by each dithering algorithm.
pub trait DitherProcessor: Send + Sync {
    /// Human-readable algorithm name.
    fn name(&self) -> &str;

    /// Quantize `img` to one bit per pixel.
    fn process(&self, img: &GrayscaleImage, threshold: u8) -> MonochromeBitmap;
}

/// Dither `img` with the selected algorithm.
pub fn apply(img: &GrayscaleImage, mode: DitherMode, threshold: u8) -> MonochromeBitmap {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold, %mode, "Applying dithering");
    mode.processor().process(img, threshold)
}

/// Dot decision shared by every algorithm: at or below the threshold prints.
fn is_black(value: i32, threshold: u8) -> bool {
    value <= i32::from(threshold)
}

/// Simple threshold conversion without error propagation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdDither;

impl DitherProcessor for ThresholdDither {
    fn name(&self) -> &str {
        "threshold"
    }

    fn process(&self, img: &GrayscaleImage, threshold: u8) -> MonochromeBitmap {
        let mut mono = MonochromeBitmap::new(img.width(), img.height());
        for (x, y, px) in img.enumerate_pixels() {
            if is_black(i32::from(px.0[0]), threshold) {
                mono.set_pixel(x, y, true);
            }
        }
        mono
    }
}

/// Floyd-Steinberg error diffusion.
///
/// ```text
///         X   7/16
/// 3/16  5/16  1/16
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FloydSteinbergDither;

const FLOYD_STEINBERG: Kernel = Kernel {
    taps: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
};

impl DitherProcessor for FloydSteinbergDither {
    fn name(&self) -> &str {
        "floyd-steinberg"
    }

    fn process(&self, img: &GrayscaleImage, threshold: u8) -> MonochromeBitmap {
        diffuse(img, threshold, &FLOYD_STEINBERG)
    }
}

/// Atkinson error diffusion.
///
/// Each of the six neighbors receives `error / 8` (truncated), so at most
/// 3/4 of the error is propagated and the remainder is dropped.
///
/// ```text
///      X   1   1
///  1   1   1
///      1
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AtkinsonDither;

const ATKINSON: Kernel = Kernel {
    taps: &[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)],
    divisor: 8,
};

impl DitherProcessor for AtkinsonDither {
    fn name(&self) -> &str {
        "atkinson"
    }

    fn process(&self, img: &GrayscaleImage, threshold: u8) -> MonochromeBitmap {
        diffuse(img, threshold, &ATKINSON)
    }
}

/// Error-diffusion kernel: `(dx, dy, weight)` taps, each receiving
/// `error * weight / divisor` with integer truncation.
struct Kernel {
    taps: &'static [(i32, i32, i32)],
    divisor: i32,
}

/// Working samples for error diffusion, kept apart from the source image
/// and the output bitmap.
struct Accumulator {
    width: u32,
    height: u32,
    values: Vec<i32>,
}

impl Accumulator {
    fn from_image(img: &GrayscaleImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            values: img.as_raw().iter().map(|&v| i32::from(v)).collect(),
        }
    }

    fn get(&self, x: u32, y: u32) -> i32 {
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// Add `amount` at `(x, y)`; coordinates outside the image are dropped.
    fn add(&mut self, x: i64, y: i64, amount: i32) {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.values[index] += amount;
    }

    /// Spread `error` from `(x, y)` to the kernel's forward neighbors.
    fn spread(&mut self, x: u32, y: u32, error: i32, kernel: &Kernel) {
        for &(dx, dy, weight) in kernel.taps {
            let share = error * weight / kernel.divisor;
            self.add(i64::from(x) + i64::from(dx), i64::from(y) + i64::from(dy), share);
        }
    }
}

fn diffuse(img: &GrayscaleImage, threshold: u8, kernel: &Kernel) -> MonochromeBitmap {
    let (width, height) = img.dimensions();
    let mut acc = Accumulator::from_image(img);
    let mut mono = MonochromeBitmap::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let old = acc.get(x, y);
            let black = is_black(old, threshold);
            let new = if black { 0 } else { 255 };
            if black {
                mono.set_pixel(x, y, true);
            }
            acc.spread(x, y, old - new, kernel);
        }
    }

    mono
}
