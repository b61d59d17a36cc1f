//! Buffered pixel-to-byte transcoder.
//!
//! `PixelStreamWriter` turns a [`PixelGrid`] into interleaved RGB bytes and
//! hands them to a byte sink in batches. Writing one pixel at a time costs a
//! sink call per pixel; batching into a fixed buffer whose size is a multiple
//! of three keeps every channel triplet inside a single write.

use std::io::Write;

use crate::constants::{BYTES_PER_PIXEL, DEFAULT_BUFFER_PIXELS};
use crate::error::{FilterError, Result};
use crate::pixel::{PixelGrid, blue, green, red};

/// Writes pixel grids as row-major RGB triplets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelStreamWriter {
    capacity: usize,
}

impl Default for PixelStreamWriter {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_BUFFER_PIXELS * BYTES_PER_PIXEL,
        }
    }
}

impl PixelStreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a writer with a buffer of `capacity` bytes.
    ///
    /// The capacity must be a non-zero multiple of 3.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity % BYTES_PER_PIXEL != 0 {
            return Err(FilterError::InvalidBufferCapacity(capacity));
        }
        Ok(Self { capacity })
    }

    /// Creates a writer buffering `pixels` pixels per flush.
    pub fn with_pixels(pixels: usize) -> Result<Self> {
        let capacity = pixels
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or(FilterError::InvalidBufferCapacity(usize::MAX))?;
        Self::with_capacity(capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Transcodes `grid` into `sink` and returns the number of bytes written.
    ///
    /// Exactly `3 * width * height` bytes are written. A failing write is
    /// returned immediately; bytes already flushed stay in the sink.
    pub fn transcode<W: Write + ?Sized>(&self, grid: &PixelGrid, sink: &mut W) -> Result<u64> {
        let mut buffer = vec![0u8; self.capacity];
        let mut pos = 0;
        let mut written = 0u64;

        for &color in grid.pixels() {
            if pos + BYTES_PER_PIXEL > buffer.len() {
                flush(sink, &buffer[..pos])?;
                written += pos as u64;
                pos = 0;
            }
            buffer[pos] = red(color);
            buffer[pos + 1] = green(color);
            buffer[pos + 2] = blue(color);
            pos += BYTES_PER_PIXEL;
        }

        if pos > 0 {
            flush(sink, &buffer[..pos])?;
            written += pos as u64;
        }
        Ok(written)
    }
}

fn flush<W: Write + ?Sized>(sink: &mut W, bytes: &[u8]) -> Result<()> {
    log::trace!("flushing {} bytes", bytes.len());
    sink.write_all(bytes).map_err(FilterError::Sink)
}
