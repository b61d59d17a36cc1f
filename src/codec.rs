//! Seams to the external wavelet codec.
//!
//! The filter never implements JPEG 2000 itself. A [`WaveletDecoder`] turns a
//! codestream into a [`PixelGrid`]; a [`WaveletEncoder`] is built around one
//! bitmap and turns it into a codestream. Implementations are registered in a
//! [`CodecRegistry`](crate::resolver::CodecRegistry).

use crate::error::{BoxError, CodecError};
use crate::options::DecodeOptions;
use crate::pixel::PixelGrid;

/// Color space reported by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpxColorSpace {
    Gray,
    Rgb,
    Cmyk,
    /// Color space known to the codec but with no PDF device equivalent.
    Other,
}

impl JpxColorSpace {
    /// PDF device color space name matching this color space.
    pub fn device_name(self) -> Option<&'static str> {
        match self {
            JpxColorSpace::Gray => Some("DeviceGray"),
            JpxColorSpace::Rgb => Some("DeviceRGB"),
            JpxColorSpace::Cmyk => Some("DeviceCMYK"),
            JpxColorSpace::Other => None,
        }
    }

    /// Best guess from the number of image components.
    pub fn from_component_count(count: usize) -> Self {
        match count {
            1 | 2 => JpxColorSpace::Gray,
            3 => JpxColorSpace::Rgb,
            4 => JpxColorSpace::Cmyk,
            _ => JpxColorSpace::Other,
        }
    }
}

/// Output of a [`WaveletDecoder`].
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub grid: PixelGrid,
    /// Bit depth of the codestream components before reduction to 8 bits.
    pub source_bits_per_component: u8,
    pub color_space: Option<JpxColorSpace>,
}

impl DecodedImage {
    pub fn new(grid: PixelGrid) -> Self {
        Self {
            grid,
            source_bits_per_component: 8,
            color_space: None,
        }
    }

    pub fn with_color_space(mut self, color_space: JpxColorSpace) -> Self {
        self.color_space = Some(color_space);
        self
    }
}

/// Decodes a JPEG 2000 codestream or JP2 file into a pixel grid.
pub trait WaveletDecoder: Send + Sync {
    /// Human readable name used in diagnostics.
    fn name(&self) -> &str;

    fn decode(&self, data: &[u8], options: &DecodeOptions) -> Result<DecodedImage, CodecError>;
}

/// An encoder constructed around a single bitmap.
pub trait WaveletEncoder {
    /// Produces the complete compressed byte sequence.
    fn encode(&mut self) -> Result<Vec<u8>, BoxError>;
}

/// Builds an encoder for a bitmap.
pub trait EncoderFactory: Send + Sync {
    fn create(&self, bitmap: &PixelGrid) -> Result<Box<dyn WaveletEncoder>, BoxError>;
}

impl<F> EncoderFactory for F
where
    F: Fn(&PixelGrid) -> Result<Box<dyn WaveletEncoder>, BoxError> + Send + Sync,
{
    fn create(&self, bitmap: &PixelGrid) -> Result<Box<dyn WaveletEncoder>, BoxError> {
        self(bitmap)
    }
}
