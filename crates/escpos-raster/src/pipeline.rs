//! End-to-end image processing: rotate, resize, grayscale, dither.

use image::DynamicImage;
use tracing::{debug, info};

use crate::resize::TargetHeight;
use crate::rotate::{auto_rotate_portrait, rotate_180};
use crate::{
    MonochromeBitmap, PipelineOptions, RasterEncoder, RasterError, Result, dither, grayscale,
    resize,
};

/// Image processing pipeline with fixed options.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    opts: PipelineOptions,
}

impl Pipeline {
    pub fn new(opts: PipelineOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.opts
    }

    /// Transform `img` into a monochrome bitmap.
    pub fn process(&self, img: &DynamicImage) -> Result<MonochromeBitmap> {
        if img.width() == 0 || img.height() == 0 {
            return Err(RasterError::InvalidInput(format!(
                "input image is empty ({}x{})",
                img.width(),
                img.height()
            )));
        }

        let mut img = img.clone();
        if self.opts.auto_rotate {
            img = auto_rotate_portrait(img);
        }
        if self.opts.rotate_180 {
            img = rotate_180(img);
        }

        if let Some(width) = self.opts.width {
            let height = match (self.opts.preserve_aspect, self.opts.height) {
                (false, Some(h)) => TargetHeight::Exact(h),
                (false, None) => {
                    return Err(RasterError::InvalidInput(
                        "explicit height required when aspect ratio is not preserved".into(),
                    ));
                }
                (true, _) => TargetHeight::PreserveAspect,
            };
            img = resize::resize_to_width(&img, width, height, self.opts.allow_upscale)?;
        }

        let gray = grayscale::to_grayscale(&img)?;
        let mono = dither::apply(&gray, self.opts.dither, self.opts.threshold);
        debug!(
            width = mono.width(),
            height = mono.height(),
            mode = %self.opts.dither,
            "Image processed"
        );
        Ok(mono)
    }

    /// Process `img` and encode it into a raster command.
    pub fn render(&self, img: &DynamicImage, encoder: &RasterEncoder) -> Result<Vec<u8>> {
        let mono = self.process(img)?;
        let cmd = encoder.encode(&mono)?;
        info!(
            width = mono.width(),
            height = mono.height(),
            bytes = cmd.len(),
            "Raster command ready"
        );
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DitherMode;
    use image::{GrayImage, Luma, RgbImage};

    #[test]
    fn test_process_resizes_to_width() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(768, 200, image::Rgb([0, 0, 0])));
        let mono = Pipeline::default().process(&img).unwrap();
        assert_eq!((mono.width(), mono.height()), (384, 100));
        assert!(mono.raster_bytes().iter().all(|&b| b == 0xff));
    }

    #[test]
    fn test_process_keeps_narrow_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(100, 20, Luma([255])));
        let mono = Pipeline::default().process(&img).unwrap();
        assert_eq!((mono.width(), mono.height()), (100, 20));
        assert!(mono.raster_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_process_without_width_keeps_source() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(1000, 3, Luma([0])));
        let opts = PipelineOptions::new().with_width(None);
        let mono = Pipeline::new(opts).process(&img).unwrap();
        assert_eq!(mono.width(), 1000);
    }

    #[test]
    fn test_process_exact_height() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 800, Luma([0])));
        let opts = PipelineOptions::new().with_width(Some(200)).with_exact_height(10);
        let mono = Pipeline::new(opts).process(&img).unwrap();
        assert_eq!((mono.width(), mono.height()), (200, 10));
    }

    #[test]
    fn test_missing_exact_height() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(800, 800, Luma([0])));
        let mut opts = PipelineOptions::new();
        opts.preserve_aspect = false;
        assert!(matches!(
            Pipeline::new(opts).process(&img),
            Err(RasterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_process_rejects_empty_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        assert!(matches!(
            Pipeline::default().process(&img),
            Err(RasterError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rotate_180_flips_rows() {
        // top row black, bottom row white
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(8, 2, |_, y| {
            Luma([if y == 0 { 0 } else { 255 }])
        }));
        let opts = PipelineOptions::new().with_rotate_180(true);
        let mono = Pipeline::new(opts).process(&img).unwrap();
        assert_eq!(mono.raster_bytes(), &[0x00, 0xff]);
    }

    #[test]
    fn test_render_frames_command() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 2, Luma([0])));
        let opts = PipelineOptions::new().with_dither(DitherMode::Atkinson);
        let cmd = Pipeline::new(opts)
            .render(&img, &RasterEncoder::default())
            .unwrap();
        assert_eq!(cmd, vec![0x1d, 0x76, 0x30, 0, 2, 0, 2, 0, 0xff, 0xff, 0xff, 0xff]);
    }
}
