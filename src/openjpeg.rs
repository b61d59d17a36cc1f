//! OpenJPEG-backed decoder, through the `jpeg2k` bindings.

use jpeg2k::{ColorSpace, Image};

use crate::codec::{DecodedImage, JpxColorSpace, WaveletDecoder};
use crate::error::CodecError;
use crate::options::DecodeOptions;
use crate::pixel::{PixelGrid, argb};

/// Decodes JP2 files and raw codestreams with OpenJPEG.
///
/// One or two components decode as gray (the second as alpha), three as RGB,
/// four as RGBA unless the file declares CMYK, in which case the planes are
/// converted to RGB. Region and sub-sampling options are not applied here.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenJpegDecoder;

impl OpenJpegDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl WaveletDecoder for OpenJpegDecoder {
    fn name(&self) -> &str {
        "openjpeg"
    }

    fn decode(&self, data: &[u8], options: &DecodeOptions) -> Result<DecodedImage, CodecError> {
        options.set_filter_subsampled(false);

        let image = Image::from_bytes(data).map_err(|e| CodecError::Malformed(format!("{e}")))?;
        let width = image.width();
        let height = image.height();
        let components = image.components();
        if components.is_empty() {
            return Err(CodecError::Malformed("image has no components".into()));
        }

        let planes = components
            .iter()
            .take(4)
            .map(|c| Plane {
                data: c.data(),
                width: c.width().max(1),
                height: c.height().max(1),
                precision: c.precision(),
                signed: c.is_signed(),
            })
            .collect::<Vec<_>>();
        let color_space = reported_color_space(image.color_space(), planes.len());

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let s = |i: usize| planes[i].sample(x, y, width, height);
                let color = match planes.len() {
                    1 => {
                        let g = s(0);
                        argb(0xFF, g, g, g)
                    }
                    2 => {
                        let g = s(0);
                        argb(s(1), g, g, g)
                    }
                    3 => argb(0xFF, s(0), s(1), s(2)),
                    _ if color_space == Some(JpxColorSpace::Cmyk) => cmyk_to_argb(s(0), s(1), s(2), s(3)),
                    _ => argb(s(3), s(0), s(1), s(2)),
                };
                pixels.push(color);
            }
        }

        let grid = PixelGrid::new(width, height, pixels)
            .map_err(|e| CodecError::Failed(Box::new(e)))?;
        let precision = planes.iter().map(|p| p.precision).max().unwrap_or(8);
        Ok(DecodedImage {
            grid,
            source_bits_per_component: precision.min(u8::MAX as u32) as u8,
            color_space,
        })
    }
}

// Four planes without a declared color space stay unreported so the JP2 header decides.
fn reported_color_space(declared: ColorSpace, planes: usize) -> Option<JpxColorSpace> {
    match declared {
        ColorSpace::Gray => Some(JpxColorSpace::Gray),
        ColorSpace::SRGB | ColorSpace::SYCC | ColorSpace::EYCC => Some(JpxColorSpace::Rgb),
        ColorSpace::CMYK => Some(JpxColorSpace::Cmyk),
        ColorSpace::Unknown | ColorSpace::Unspecified => match planes {
            1 | 2 => Some(JpxColorSpace::Gray),
            3 => Some(JpxColorSpace::Rgb),
            _ => None,
        },
    }
}

fn cmyk_to_argb(c: u8, m: u8, y: u8, k: u8) -> u32 {
    let ink = |v: u8| ((255 - v as u32) * (255 - k as u32) / 255) as u8;
    argb(0xFF, ink(c), ink(m), ink(y))
}

struct Plane<'a> {
    data: &'a [i32],
    width: u32,
    height: u32,
    precision: u32,
    signed: bool,
}

impl Plane<'_> {
    /// Sample at image coordinates, scaled to 8 bits. Sub-sampled planes are
    /// addressed by nearest neighbour; signed samples are offset to unsigned.
    fn sample(&self, x: u32, y: u32, image_width: u32, image_height: u32) -> u8 {
        let px = (x as u64 * self.width as u64 / image_width.max(1) as u64) as usize;
        let py = (y as u64 * self.height as u64 / image_height.max(1) as u64) as usize;
        let raw = self
            .data
            .get(py * self.width as usize + px)
            .copied()
            .unwrap_or(0) as i64;
        let offset = if self.signed && self.precision > 0 {
            1i64 << (self.precision - 1)
        } else {
            0
        };
        scale_to_u8((raw + offset).clamp(0, u32::MAX as i64) as u32, self.precision)
    }
}

fn scale_to_u8(value: u32, precision: u32) -> u8 {
    match precision {
        0 => 0,
        8 => value.min(255) as u8,
        p if p > 8 => (value >> (p - 8)).min(255) as u8,
        p => {
            let max = (1u32 << p) - 1;
            (value.min(max) * 255 / max) as u8
        }
    }
}
