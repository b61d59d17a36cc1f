//! JPXDecode stream filter.
//!
//! Converts JPEG 2000 images embedded in documents into row-major,
//! RGB-interleaved bytes, and bitmaps back into JPEG 2000. The wavelet codec
//! itself is external: a decoder and an optional encoder are looked up in a
//! [`CodecRegistry`] at runtime.
//!
//! ```no_run
//! use jpx_filter::{DecodeOptions, Filter, JpxFilter, Parameters};
//!
//! let filter = JpxFilter::new();
//! let jp2 = std::fs::read("image.jp2")?;
//! let mut rgb = Vec::new();
//! let result = filter.decode(
//!     &mut jp2.as_slice(),
//!     &mut rgb,
//!     &Parameters::new(),
//!     0,
//!     &DecodeOptions::default(),
//! )?;
//! println!("{}", result.parameters());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod constants;
pub mod error;
pub mod filter;
pub mod jp2;
pub mod jpx;
#[cfg(feature = "openjpeg")]
pub mod openjpeg;
pub mod options;
pub mod params;
pub mod pixel;
pub mod resolver;
pub mod writer;

pub use codec::{DecodedImage, EncoderFactory, JpxColorSpace, WaveletDecoder, WaveletEncoder};
pub use error::{BoxError, CodecError, FilterError};
pub use filter::{DecodeResult, Filter, FilterName};
pub use jpx::{JpxFilter, JpxFilterConfig};
pub use options::{DecodeOptions, Region};
pub use params::{Parameters, Value};
pub use pixel::PixelGrid;
pub use resolver::{CodecHandle, CodecRegistry};
pub use writer::PixelStreamWriter;
