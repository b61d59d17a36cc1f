//! The stream filter contract shared by every filter in a chain.

use std::io::{Read, Write};

use crate::codec::JpxColorSpace;
use crate::constants::JPX_FILTER_NAME;
use crate::error::Result;
use crate::options::DecodeOptions;
use crate::params::Parameters;

/// Result of a decode: the stream parameters plus whatever the codec reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeResult {
    parameters: Parameters,
    color_space: Option<JpxColorSpace>,
    source_bits_per_component: Option<u8>,
}

impl DecodeResult {
    pub fn new(parameters: Parameters) -> Self {
        Self {
            parameters,
            color_space: None,
            source_bits_per_component: None,
        }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    pub fn into_parameters(self) -> Parameters {
        self.parameters
    }

    /// Color space embedded in the image, when the codec reported one.
    pub fn color_space(&self) -> Option<JpxColorSpace> {
        self.color_space
    }

    pub fn set_color_space(&mut self, color_space: JpxColorSpace) {
        self.color_space = Some(color_space);
    }

    /// Bit depth of the codestream before reduction to 8 bits per component.
    pub fn source_bits_per_component(&self) -> Option<u8> {
        self.source_bits_per_component
    }

    pub fn set_source_bits_per_component(&mut self, bits: u8) {
        self.source_bits_per_component = Some(bits);
    }
}

/// A composable transform applied to a stream.
///
/// `decode` goes from the stored form to the usable form, `encode` the other way.
/// `index` is the filter's position in its chain and is only used for diagnostics.
pub trait Filter: Send + Sync {
    fn decode(
        &self,
        encoded: &mut dyn Read,
        decoded: &mut dyn Write,
        parameters: &Parameters,
        index: usize,
        options: &DecodeOptions,
    ) -> Result<DecodeResult>;

    /// Decodes the full image at full resolution.
    fn decode_default(
        &self,
        encoded: &mut dyn Read,
        decoded: &mut dyn Write,
        parameters: &Parameters,
        index: usize,
    ) -> Result<DecodeResult> {
        self.decode(encoded, decoded, parameters, index, &DecodeOptions::default())
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        encoded: &mut dyn Write,
        parameters: &Parameters,
    ) -> Result<()>;
}

/// Names of the filters this crate provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterName {
    Jpx,
}

impl FilterName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            JPX_FILTER_NAME => Some(FilterName::Jpx),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterName::Jpx => JPX_FILTER_NAME,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_name() {
        assert_eq!(FilterName::from_name("JPXDecode"), Some(FilterName::Jpx));
        assert_eq!(FilterName::from_name("FlateDecode"), None);
        assert_eq!(FilterName::Jpx.as_str(), "JPXDecode");
    }

    #[test]
    fn test_decode_result_keeps_parameters() {
        let mut params = Parameters::new();
        params.set("Width", 3i64);
        let mut result = DecodeResult::new(params.clone());
        assert_eq!(result.parameters(), &params);
        assert_eq!(result.color_space(), None);
        result.set_color_space(JpxColorSpace::Gray);
        assert_eq!(result.color_space(), Some(JpxColorSpace::Gray));
    }
}
