use image::Luma;

use crate::GrayscaleImage;

fn uniform(width: u32, height: u32, value: u8) -> GrayscaleImage {
    GrayscaleImage::from_pixel(width, height, Luma([value]))
}

mod pipeline;
