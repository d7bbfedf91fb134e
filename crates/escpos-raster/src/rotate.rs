//! Orientation fixes applied before resizing.
//!
//! Both functions take the image by value so an unrotated image is handed
//! back without copying.

use image::DynamicImage;
use tracing::debug;

/// Turn the image upside down, for printers mounted head-down.
pub fn rotate_180(img: DynamicImage) -> DynamicImage {
    debug!(width = img.width(), height = img.height(), "Rotating 180 degrees");
    img.rotate180()
}

/// Turn a landscape image a quarter clockwise so its long side runs along
/// the paper feed. Portrait and square images pass through.
pub fn auto_rotate_portrait(img: DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    if width <= height {
        return img;
    }
    debug!(width, height, "Landscape source, rotating to portrait");
    img.rotate90()
}
