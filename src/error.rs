use std::io;

use thiserror::Error;

/// Boxed error returned by pluggable codec implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the JPX filter.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The mandatory JPEG 2000 decoder is missing or could not be invoked.
    #[error("JPEG 2000 decoder unavailable: {reason}")]
    DecoderUnavailable { reason: String },

    /// The optional JPEG 2000 encoder could not be resolved.
    #[error(
        "JPEG 2000 encoding requires optional dependency {dependency}. \
         Register it in the codec registry or avoid creating PDFs with JPX images."
    )]
    EncoderUnavailable { dependency: String },

    /// The resolved encoder failed while producing the codestream.
    #[error(
        "JPEG 2000 encoder {dependency} failed: {reason}. \
         Check the encoder installation or avoid creating PDFs with JPX images."
    )]
    EncodeFailed { dependency: String, reason: String },

    #[error("Malformed JPX data: {0}")]
    MalformedInput(String),

    #[error("Failed to read input stream: {0}")]
    Read(#[source] io::Error),

    #[error("Failed to write to output sink: {0}")]
    Sink(#[source] io::Error),

    #[error("Failed to decode raster input: {0}")]
    RasterDecode(#[from] image::ImageError),

    #[error("Pixel grid {width}x{height} needs {expected} pixels, got {actual}")]
    InvalidPixelGrid {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Buffer capacity {0} must be a non-zero multiple of 3")]
    InvalidBufferCapacity(usize),
}

impl FilterError {
    /// Returns true for failures that belong to the I/O category of the filter chain.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::DecoderUnavailable { .. }
                | Self::MalformedInput(_)
                | Self::Read(_)
                | Self::Sink(_)
        )
    }
}

impl From<CodecError> for FilterError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Unavailable(reason) => Self::DecoderUnavailable { reason },
            CodecError::Malformed(msg) => Self::MalformedInput(msg),
            CodecError::Failed(source) => Self::DecoderUnavailable {
                reason: source.to_string(),
            },
        }
    }
}

impl From<FilterError> for io::Error {
    fn from(err: FilterError) -> Self {
        let kind = match &err {
            FilterError::MalformedInput(_) | FilterError::RasterDecode(_) => io::ErrorKind::InvalidData,
            FilterError::InvalidPixelGrid { .. } | FilterError::InvalidBufferCapacity(_) => {
                io::ErrorKind::InvalidInput
            }
            _ => io::ErrorKind::Unsupported,
        };
        match err {
            FilterError::Read(e) | FilterError::Sink(e) => e,
            other => io::Error::new(kind, other),
        }
    }
}

/// Errors reported by a wavelet codec implementation.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The codec's backing library is not usable in this process.
    #[error("codec unavailable: {0}")]
    Unavailable(String),

    /// The codec could not parse the encoded data.
    #[error("malformed codestream: {0}")]
    Malformed(String),

    #[error(transparent)]
    Failed(BoxError),
}

pub type Result<T, E = FilterError> = std::result::Result<T, E>;
