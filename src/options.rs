//! Decode options handed through to the wavelet decoder.

use std::cell::Cell;

/// Rectangle of the source image to decode, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Options controlling how an image is decoded.
///
/// The filter does not interpret these; they are forwarded to the decoder,
/// which may honour them and report so through [`DecodeOptions::set_filter_subsampled`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    source_region: Option<Region>,
    subsampling_x: u32,
    subsampling_y: u32,
    subsampling_offset_x: u32,
    subsampling_offset_y: u32,
    filter_subsampled: Cell<bool>,
}

/// Full image, no sub-sampling.
impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            source_region: None,
            subsampling_x: 1,
            subsampling_y: 1,
            subsampling_offset_x: 0,
            subsampling_offset_y: 0,
            filter_subsampled: Cell::new(false),
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform sub-sampling in both directions.
    pub fn with_subsampling(subsampling: u32) -> Self {
        Self {
            subsampling_x: subsampling.max(1),
            subsampling_y: subsampling.max(1),
            ..Self::default()
        }
    }

    pub fn with_region(region: Region) -> Self {
        Self {
            source_region: Some(region),
            ..Self::default()
        }
    }

    pub fn source_region(&self) -> Option<Region> {
        self.source_region
    }

    pub fn set_source_region(&mut self, region: Option<Region>) {
        self.source_region = region;
    }

    pub fn subsampling_x(&self) -> u32 {
        self.subsampling_x
    }

    pub fn subsampling_y(&self) -> u32 {
        self.subsampling_y
    }

    pub fn set_subsampling(&mut self, x: u32, y: u32) {
        self.subsampling_x = x.max(1);
        self.subsampling_y = y.max(1);
    }

    pub fn subsampling_offset_x(&self) -> u32 {
        self.subsampling_offset_x
    }

    pub fn subsampling_offset_y(&self) -> u32 {
        self.subsampling_offset_y
    }

    pub fn set_subsampling_offset(&mut self, x: u32, y: u32) {
        self.subsampling_offset_x = x;
        self.subsampling_offset_y = y;
    }

    /// True when the options ask for the full image at full resolution.
    pub fn is_default(&self) -> bool {
        self.source_region.is_none() && self.subsampling_x == 1 && self.subsampling_y == 1
    }

    /// Whether the decoder already applied the region and sub-sampling.
    pub fn is_filter_subsampled(&self) -> bool {
        self.filter_subsampled.get()
    }

    /// Called by a decoder that honoured the region and sub-sampling itself.
    pub fn set_filter_subsampled(&self, value: bool) {
        self.filter_subsampled.set(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = DecodeOptions::default();
        assert!(opts.is_default());
        assert_eq!(opts.subsampling_x(), 1);
        assert!(!opts.is_filter_subsampled());
    }

    #[test]
    fn test_subsampling_is_clamped() {
        let mut opts = DecodeOptions::with_subsampling(0);
        assert_eq!(opts.subsampling_y(), 1);
        opts.set_subsampling(4, 2);
        assert!(!opts.is_default());
        opts.set_filter_subsampled(true);
        assert!(opts.is_filter_subsampled());
    }

    #[test]
    fn test_decoder_flag_does_not_leak_into_fresh_defaults() {
        let shared = DecodeOptions::default();
        shared.set_filter_subsampled(true);
        assert!(shared.is_filter_subsampled());
        assert!(!DecodeOptions::default().is_filter_subsampled());
        assert!(!DecodeOptions::new().is_filter_subsampled());
    }
}
