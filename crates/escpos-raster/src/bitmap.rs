//! Packed 1-bit raster bitmap.
//!
//! Bits are packed MSB-first (bit 7 is the leftmost dot of each byte group)
//! and every row starts on a byte boundary, which is exactly the payload
//! layout expected by the raster command.

use image::{GrayImage, Luma};

use crate::{RasterError, Result};

/// Monochrome bitmap where a set bit means "print a dot".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    width: u32,
    height: u32,
    width_bytes: usize,
    bits: Vec<u8>,
}

impl MonochromeBitmap {
    /// Create an all-white bitmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let width_bytes = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            width_bytes,
            bits: vec![0; width_bytes * height as usize],
        }
    }

    /// Wrap an already packed payload.
    ///
    /// The buffer length must equal `ceil(width / 8) * height`.
    pub fn from_raw(width: u32, height: u32, bits: Vec<u8>) -> Result<Self> {
        let width_bytes = width.div_ceil(8) as usize;
        let expected = width_bytes * height as usize;
        if bits.len() != expected {
            return Err(RasterError::InvalidInput(format!(
                "bitmap {width}x{height} needs {expected} bytes, got {}",
                bits.len()
            )));
        }
        Ok(Self {
            width,
            height,
            width_bytes,
            bits,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row, `ceil(width / 8)`.
    pub fn width_bytes(&self) -> usize {
        self.width_bytes
    }

    /// Returns true if the bitmap covers no dots.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Set or clear the dot at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the bitmap.
    pub fn set_pixel(&mut self, x: u32, y: u32, black: bool) {
        let (index, mask) = self.locate(x, y);
        if black {
            self.bits[index] |= mask;
        } else {
            self.bits[index] &= !mask;
        }
    }

    /// Returns true if the dot at `(x, y)` is printed.
    ///
    /// # Panics
    /// Panics if the coordinate lies outside the bitmap.
    pub fn get_pixel(&self, x: u32, y: u32) -> bool {
        let (index, mask) = self.locate(x, y);
        self.bits[index] & mask != 0
    }

    /// Packed payload, ready to be framed.
    pub fn raster_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Render as a grayscale image (black dots become 0, white 255).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get_pixel(x, y) {
                Luma([0])
            } else {
                Luma([255])
            }
        })
    }

    fn locate(&self, x: u32, y: u32) -> (usize, u8) {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} bitmap",
            self.width,
            self.height
        );
        let index = y as usize * self.width_bytes + (x / 8) as usize;
        (index, 0x80 >> (x % 8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_all_white() {
        let bmp = MonochromeBitmap::new(10, 3);
        assert_eq!(bmp.width_bytes(), 2);
        assert_eq!(bmp.raster_bytes(), &[0u8; 6]);
    }

    #[test]
    fn test_sparse_pixels_round_trip() {
        let points = [(0, 0), (7, 0), (8, 1), (12, 2), (19, 4), (3, 4)];
        let mut bmp = MonochromeBitmap::new(20, 5);
        for &(x, y) in &points {
            bmp.set_pixel(x, y, true);
        }

        for y in 0..5 {
            for x in 0..20 {
                assert_eq!(
                    bmp.get_pixel(x, y),
                    points.contains(&(x, y)),
                    "pixel ({x}, {y})"
                );
            }
        }
        assert_eq!(bmp.raster_bytes().len(), 20usize.div_ceil(8) * 5);
    }

    #[test]
    fn test_msb_is_leftmost() {
        let mut bmp = MonochromeBitmap::new(8, 1);
        bmp.set_pixel(0, 0, true);
        assert_eq!(bmp.raster_bytes(), &[0x80]);
        bmp.set_pixel(7, 0, true);
        assert_eq!(bmp.raster_bytes(), &[0x81]);
    }

    #[test]
    fn test_rows_are_byte_aligned() {
        // 9 dots wide: the 9th dot of row 0 must not spill into row 1
        let mut bmp = MonochromeBitmap::new(9, 2);
        bmp.set_pixel(8, 0, true);
        bmp.set_pixel(0, 1, true);
        assert_eq!(bmp.raster_bytes(), &[0x00, 0x80, 0x80, 0x00]);
    }

    #[test]
    fn test_clear_pixel() {
        let mut bmp = MonochromeBitmap::new(8, 1);
        bmp.set_pixel(3, 0, true);
        bmp.set_pixel(3, 0, false);
        assert!(!bmp.get_pixel(3, 0));
        assert_eq!(bmp.raster_bytes(), &[0x00]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_set_pixel_out_of_range_panics() {
        let mut bmp = MonochromeBitmap::new(8, 2);
        bmp.set_pixel(8, 0, true);
    }

    #[test]
    fn test_from_raw_rejects_wrong_length() {
        let err = MonochromeBitmap::from_raw(16, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, RasterError::InvalidInput(_)));

        let bmp = MonochromeBitmap::from_raw(16, 2, vec![0xff; 4]).unwrap();
        assert!(bmp.get_pixel(15, 1));
    }

    #[test]
    fn test_to_gray_image() {
        let mut bmp = MonochromeBitmap::new(2, 1);
        bmp.set_pixel(1, 0, true);
        let img = bmp.to_gray_image();
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(1, 0).0[0], 0);
    }
}
