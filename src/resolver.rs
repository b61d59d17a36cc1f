//! Runtime lookup of codec implementations.
//!
//! The JPEG 2000 encoder is a soft dependency: when it is missing only JPX
//! output is disabled. Resolution therefore never fails; every failure mode
//! (nothing registered, the factory errors, the factory panics) becomes
//! [`CodecHandle::Unavailable`].

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::codec::{EncoderFactory, WaveletDecoder, WaveletEncoder};
use crate::pixel::PixelGrid;

/// Outcome of resolving an optional encoder.
pub enum CodecHandle {
    Available(Box<dyn WaveletEncoder>),
    Unavailable,
}

impl CodecHandle {
    pub fn is_available(&self) -> bool {
        matches!(self, CodecHandle::Available(_))
    }
}

impl fmt::Debug for CodecHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecHandle::Available(_) => f.write_str("Available(..)"),
            CodecHandle::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Service locator for the decoder and named encoder factories.
#[derive(Clone, Default)]
pub struct CodecRegistry {
    decoder: Option<Arc<dyn WaveletDecoder>>,
    encoders: HashMap<String, Arc<dyn EncoderFactory>>,
}

static GLOBAL: Lazy<Arc<CodecRegistry>> = Lazy::new(|| Arc::new(CodecRegistry::from_features()));

impl CodecRegistry {
    /// An empty registry: no decoder, no encoders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated from the codecs compiled into this build.
    pub fn from_features() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "openjpeg")]
        {
            registry.set_decoder(Arc::new(crate::openjpeg::OpenJpegDecoder::new()));
        }
        registry
    }

    /// Process-wide registry, built once and immutable afterwards.
    pub fn global() -> Arc<CodecRegistry> {
        Arc::clone(&GLOBAL)
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn WaveletDecoder>) -> Self {
        self.set_decoder(decoder);
        self
    }

    pub fn set_decoder(&mut self, decoder: Arc<dyn WaveletDecoder>) {
        self.decoder = Some(decoder);
    }

    pub fn with_encoder(mut self, name: impl Into<String>, factory: impl EncoderFactory + 'static) -> Self {
        self.register_encoder(name, factory);
        self
    }

    pub fn register_encoder(&mut self, name: impl Into<String>, factory: impl EncoderFactory + 'static) {
        self.encoders.insert(name.into(), Arc::new(factory));
    }

    pub fn decoder(&self) -> Option<Arc<dyn WaveletDecoder>> {
        self.decoder.clone()
    }

    pub fn has_encoder(&self, name: &str) -> bool {
        self.encoders.contains_key(name)
    }

    pub fn encoder_names(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    /// Resolves the encoder registered as `name`, built around `bitmap`.
    ///
    /// Negative results are not cached; each call probes again.
    pub fn resolve(&self, name: &str, bitmap: &PixelGrid) -> CodecHandle {
        let Some(factory) = self.encoders.get(name) else {
            log::debug!("no encoder registered as {name}");
            return CodecHandle::Unavailable;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| factory.create(bitmap))) {
            Ok(Ok(encoder)) => CodecHandle::Available(encoder),
            Ok(Err(e)) => {
                log::debug!("encoder {name} could not be constructed: {e}");
                CodecHandle::Unavailable
            }
            Err(_) => {
                log::debug!("encoder {name} panicked during construction");
                CodecHandle::Unavailable
            }
        }
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = self.encoders.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("CodecRegistry")
            .field("decoder", &self.decoder.as_ref().map(|d| d.name().to_string()))
            .field("encoders", &names)
            .finish()
    }
}
