//! Grayscale conversion.
//!
//! Luminance uses the ITU-R BT.601 weights in 16-bit fixed point
//! (0.299 R + 0.587 G + 0.114 B). Transparent pixels are composited
//! over white paper before weighting.

use image::{DynamicImage, GrayImage, Luma, Rgba};
use tracing::debug;

use crate::{GrayscaleImage, RasterError, Result};

const WEIGHT_R: u32 = 19_595;
const WEIGHT_G: u32 = 38_470;
const WEIGHT_B: u32 = 7_471;

/// Convert any image into 8-bit grayscale samples of the same size.
///
/// Single-channel 8-bit input is returned as-is.
pub fn to_grayscale(img: &DynamicImage) -> Result<GrayscaleImage> {
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidInput(format!(
            "cannot convert empty image ({width}x{height})"
        )));
    }

    if let DynamicImage::ImageLuma8(gray) = img {
        debug!(width, height, "Image already grayscale");
        return Ok(gray.clone());
    }

    debug!(width, height, color = ?img.color(), "Converting image to grayscale");
    let rgba = img.to_rgba8();
    Ok(GrayImage::from_fn(width, height, |x, y| {
        Luma([luminance(*rgba.get_pixel(x, y))])
    }))
}

/// Weighted luminance of a single pixel, alpha blended onto white.
pub fn luminance(px: Rgba<u8>) -> u8 {
    let [r, g, b, a] = px.0;
    let (r, g, b) = (over_white(r, a), over_white(g, a), over_white(b, a));
    ((WEIGHT_R * r + WEIGHT_G * g + WEIGHT_B * b + (1 << 15)) >> 16) as u8
}

fn over_white(channel: u8, alpha: u8) -> u32 {
    let (c, a) = (u32::from(channel), u32::from(alpha));
    (c * a + 255 * (255 - a) + 127) / 255
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA, RgbImage, RgbaImage};

    #[test]
    fn test_primary_weights() {
        assert_eq!(luminance(Rgba([255, 255, 255, 255])), 255);
        assert_eq!(luminance(Rgba([0, 0, 0, 255])), 0);
        assert_eq!(luminance(Rgba([255, 0, 0, 255])), 76);
        assert_eq!(luminance(Rgba([0, 255, 0, 255])), 150);
        assert_eq!(luminance(Rgba([0, 0, 255, 255])), 29);
    }

    #[test]
    fn test_transparent_is_white() {
        assert_eq!(luminance(Rgba([0, 0, 0, 0])), 255);
    }

    #[test]
    fn test_luma_input_is_identity() {
        let gray = GrayImage::from_fn(4, 2, |x, y| Luma([(x * 40 + y * 7) as u8]));
        let result = to_grayscale(&DynamicImage::ImageLuma8(gray.clone())).unwrap();
        assert_eq!(result, gray);
    }

    #[test]
    fn test_opaque_gray_alpha_keeps_luma() {
        let img = GrayAlphaImage::from_pixel(3, 3, LumaA([90, 255]));
        let result = to_grayscale(&DynamicImage::ImageLumaA8(img)).unwrap();
        assert!(result.pixels().all(|p| p.0[0] == 90));
    }

    #[test]
    fn test_preserves_dimensions() {
        let img = RgbImage::from_pixel(7, 5, image::Rgb([10, 200, 30]));
        let result = to_grayscale(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(result.dimensions(), (7, 5));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 4));
        assert!(matches!(
            to_grayscale(&img),
            Err(RasterError::InvalidInput(_))
        ));
    }
}
