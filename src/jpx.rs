//! `JPXDecode`: JPEG 2000 images to and from interleaved RGB.
//!
//! Decoding requires a [`WaveletDecoder`](crate::codec::WaveletDecoder) in the
//! registry; its absence is a deployment error. Encoding uses the optional
//! encoder registered under [`JP2_ENCODER_NAME`] and fails with an actionable
//! error when none is available.

use std::io::{Read, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::codec::DecodedImage;
use crate::constants::{
    DEFAULT_BUFFER_PIXELS, JP2_ENCODER_NAME, KEY_BITS_PER_COMPONENT, KEY_COLOR_SPACE, KEY_HEIGHT,
    KEY_WIDTH, OUTPUT_BITS_PER_COMPONENT,
};
use crate::error::{FilterError, Result};
use crate::filter::{DecodeResult, Filter};
use crate::jp2;
use crate::options::DecodeOptions;
use crate::params::{Parameters, Value};
use crate::pixel::PixelGrid;
use crate::resolver::{CodecHandle, CodecRegistry};
use crate::writer::PixelStreamWriter;

/// Tunables of [`JpxFilter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpxFilterConfig {
    /// Pixels buffered per write to the decode sink.
    pub buffer_pixels: usize,
    /// Logical name the optional encoder is registered under.
    pub encoder_name: String,
}

impl Default for JpxFilterConfig {
    fn default() -> Self {
        Self {
            buffer_pixels: DEFAULT_BUFFER_PIXELS,
            encoder_name: JP2_ENCODER_NAME.to_string(),
        }
    }
}

/// The JPEG 2000 stream filter.
#[derive(Debug, Clone)]
pub struct JpxFilter {
    registry: Arc<CodecRegistry>,
    writer: PixelStreamWriter,
    encoder_name: String,
}

impl Default for JpxFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl JpxFilter {
    /// Filter backed by the global registry.
    pub fn new() -> Self {
        Self::with_registry(CodecRegistry::global())
    }

    pub fn with_registry(registry: Arc<CodecRegistry>) -> Self {
        Self {
            registry,
            writer: PixelStreamWriter::default(),
            encoder_name: JP2_ENCODER_NAME.to_string(),
        }
    }

    pub fn with_config(registry: Arc<CodecRegistry>, config: JpxFilterConfig) -> Result<Self> {
        Ok(Self {
            registry,
            writer: PixelStreamWriter::with_pixels(config.buffer_pixels)?,
            encoder_name: config.encoder_name,
        })
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Whether [`Filter::encode`] can currently produce output.
    pub fn can_encode(&self) -> bool {
        self.registry.has_encoder(&self.encoder_name)
    }

    // Codec metadata is only added under keys the caller left empty.
    fn report(result: &mut DecodeResult, image: &DecodedImage, data: &[u8]) {
        let color_space = image
            .color_space
            .or_else(|| jp2::read_header(data).ok().map(|h| h.color_space()));

        let params = result.parameters_mut();
        params.set_if_absent(KEY_WIDTH, image.grid.width());
        params.set_if_absent(KEY_HEIGHT, image.grid.height());
        params.set_if_absent(KEY_BITS_PER_COMPONENT, OUTPUT_BITS_PER_COMPONENT);
        if let Some(name) = color_space.and_then(|cs| cs.device_name()) {
            params.set_if_absent(KEY_COLOR_SPACE, Value::Name(name.to_string()));
        }
        if let Some(cs) = color_space {
            result.set_color_space(cs);
        }
        result.set_source_bits_per_component(image.source_bits_per_component);
    }
}

impl Filter for JpxFilter {
    fn decode(
        &self,
        encoded: &mut dyn Read,
        decoded: &mut dyn Write,
        parameters: &Parameters,
        index: usize,
        options: &DecodeOptions,
    ) -> Result<DecodeResult> {
        let mut result = DecodeResult::new(parameters.clone());

        let decoder = self
            .registry
            .decoder()
            .ok_or_else(|| FilterError::DecoderUnavailable {
                reason: "no JPEG 2000 decoder registered (build with the `openjpeg` feature)".into(),
            })?;

        let mut data = Vec::new();
        encoded.read_to_end(&mut data).map_err(FilterError::Read)?;
        log::debug!(
            "filter #{index}: decoding {} bytes of JPX data with {}",
            data.len(),
            decoder.name()
        );

        let image = decoder.decode(&data, options)?;
        Self::report(&mut result, &image, &data);

        let written = self.writer.transcode(&image.grid, decoded)?;
        log::debug!(
            "filter #{index}: wrote {}x{} image ({} bits per source component) as {written} RGB bytes",
            image.grid.width(),
            image.grid.height(),
            image.source_bits_per_component
        );
        Ok(result)
    }

    fn encode(
        &self,
        input: &mut dyn Read,
        encoded: &mut dyn Write,
        _parameters: &Parameters,
    ) -> Result<()> {
        let mut raw = Vec::new();
        input.read_to_end(&mut raw).map_err(FilterError::Read)?;
        let bitmap = PixelGrid::from(image::load_from_memory(&raw)?.to_rgba8());

        let mut encoder = match self.registry.resolve(&self.encoder_name, &bitmap) {
            CodecHandle::Available(encoder) => encoder,
            CodecHandle::Unavailable => {
                return Err(FilterError::EncoderUnavailable {
                    dependency: self.encoder_name.clone(),
                });
            }
        };

        let bytes = match panic::catch_unwind(AssertUnwindSafe(|| encoder.encode())) {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(e)) => {
                return Err(FilterError::EncodeFailed {
                    dependency: self.encoder_name.clone(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                return Err(FilterError::EncodeFailed {
                    dependency: self.encoder_name.clone(),
                    reason: "encoder panicked".into(),
                });
            }
        };

        log::debug!(
            "encoded {}x{} bitmap into {} bytes",
            bitmap.width(),
            bitmap.height(),
            bytes.len()
        );
        encoded.write_all(&bytes).map_err(FilterError::Sink)?;
        encoded.flush().map_err(FilterError::Sink)
    }
}
