//! Decoded raster held in memory as packed ARGB values.

use crate::error::{FilterError, Result};

/// Red component of a packed `0xAARRGGBB` color.
#[inline]
pub fn red(color: u32) -> u8 {
    (color >> 16) as u8
}

/// Green component of a packed `0xAARRGGBB` color.
#[inline]
pub fn green(color: u32) -> u8 {
    (color >> 8) as u8
}

/// Blue component of a packed `0xAARRGGBB` color.
#[inline]
pub fn blue(color: u32) -> u8 {
    color as u8
}

#[inline]
pub fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Packs four 8-bit channels into a single `0xAARRGGBB` value.
#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// A decoded raster: `width * height` packed colors in row-major order.
///
/// The pixel array length always equals `width * height`; every constructor
/// checks this, so indexing within the grid bounds never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelGrid {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(FilterError::InvalidPixelGrid {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Builds an opaque grid from tightly packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self> {
        let pixels = rgb
            .chunks_exact(3)
            .map(|p| argb(0xFF, p[0], p[1], p[2]))
            .collect::<Vec<_>>();
        Self::check_remainder(width, height, rgb.len(), 3, pixels)
    }

    /// Builds a grid from tightly packed RGBA bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<Self> {
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| argb(p[3], p[0], p[1], p[2]))
            .collect::<Vec<_>>();
        Self::check_remainder(width, height, rgba.len(), 4, pixels)
    }

    fn check_remainder(
        width: u32,
        height: u32,
        byte_len: usize,
        stride: usize,
        pixels: Vec<u32>,
    ) -> Result<Self> {
        if byte_len % stride != 0 {
            return Err(FilterError::InvalidPixelGrid {
                width,
                height,
                expected: width as usize * height as usize,
                actual: pixels.len(),
            });
        }
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Row `y` of the grid.
    pub fn row(&self, y: u32) -> &[u32] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Interleaved RGB bytes of the whole grid, alpha dropped.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &c in &self.pixels {
            out.extend_from_slice(&[red(c), green(c), blue(c)]);
        }
        out
    }
}

impl From<image::RgbaImage> for PixelGrid {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| argb(p[3], p[0], p[1], p[2]))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_extraction() {
        let c = 0x80FF_4010;
        assert_eq!(alpha(c), 0x80);
        assert_eq!(red(c), 0xFF);
        assert_eq!(green(c), 0x40);
        assert_eq!(blue(c), 0x10);
        assert_eq!(argb(0x80, 0xFF, 0x40, 0x10), c);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = PixelGrid::new(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(
            err,
            FilterError::InvalidPixelGrid {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_from_rgb_and_rows() {
        let grid = PixelGrid::from_rgb(2, 2, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();
        assert_eq!(grid.row(1), &[0xFF07_0809, 0xFF0A_0B0C]);
        assert_eq!(grid.get(1, 0), Some(0xFF04_0506));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.to_rgb_bytes(), (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_from_rgb_rejects_partial_pixel() {
        assert!(PixelGrid::from_rgb(1, 1, &[1, 2, 3, 4]).is_err());
    }

    #[test]
    fn test_from_rgba_image() {
        let img = image::RgbaImage::from_raw(1, 1, vec![10, 20, 30, 40]).unwrap();
        let grid = PixelGrid::from(img);
        assert_eq!(grid.pixels(), &[argb(40, 10, 20, 30)]);
    }
}
