//! Image resizing to the printer's dot width.
//!
//! Uses bilinear (`Triangle`) filtering. Images narrower than the target are
//! passed through untouched unless the caller explicitly allows upscaling.

use image::imageops::{self, FilterType};
use image::DynamicImage;
use tracing::debug;

use crate::{GrayscaleImage, RasterError, Result};

const FILTER: FilterType = FilterType::Triangle;

/// How the output height is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetHeight {
    /// `round(source_height * target_width / source_width)`, at least 1.
    PreserveAspect,
    /// Use this exact height.
    Exact(u32),
}

/// Resize a source image to `width` dots.
pub fn resize_to_width(
    img: &DynamicImage,
    width: u32,
    height: TargetHeight,
    allow_upscale: bool,
) -> Result<DynamicImage> {
    match target_dimensions(img.width(), img.height(), width, height, allow_upscale)? {
        Some((w, h)) => {
            debug!(
                orig_w = img.width(),
                orig_h = img.height(),
                new_width = w,
                new_height = h,
                "Resizing image to target width"
            );
            Ok(img.resize_exact(w, h, FILTER))
        }
        None => Ok(img.clone()),
    }
}

/// Resize a grayscale image to `width` dots.
pub fn resize_gray_to_width(
    img: &GrayscaleImage,
    width: u32,
    height: TargetHeight,
    allow_upscale: bool,
) -> Result<GrayscaleImage> {
    let (orig_w, orig_h) = img.dimensions();
    match target_dimensions(orig_w, orig_h, width, height, allow_upscale)? {
        Some((w, h)) => {
            debug!(orig_w, orig_h, new_width = w, new_height = h, "Resizing grayscale image");
            Ok(imageops::resize(img, w, h, FILTER))
        }
        None => Ok(img.clone()),
    }
}

/// Compute the output size, or `None` when the image should pass through.
fn target_dimensions(
    orig_w: u32,
    orig_h: u32,
    width: u32,
    height: TargetHeight,
    allow_upscale: bool,
) -> Result<Option<(u32, u32)>> {
    if width == 0 {
        return Err(RasterError::InvalidInput(
            "target width must be greater than 0".into(),
        ));
    }
    if orig_w == 0 || orig_h == 0 {
        return Err(RasterError::InvalidInput(format!(
            "cannot resize empty image ({orig_w}x{orig_h})"
        )));
    }
    if let TargetHeight::Exact(0) = height {
        return Err(RasterError::InvalidInput(
            "target height must be greater than 0".into(),
        ));
    }

    if width >= orig_w && !(allow_upscale && width > orig_w) {
        debug!(orig_w, width, "Image not wider than target, skipping resize");
        return Ok(None);
    }

    let new_height = match height {
        TargetHeight::PreserveAspect => {
            let ratio = f64::from(width) / f64::from(orig_w);
            ((f64::from(orig_h) * ratio).round() as u32).max(1)
        }
        TargetHeight::Exact(h) => h,
    };
    Ok(Some((width, new_height)))
}
