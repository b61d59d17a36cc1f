/// Logical name under which the optional JPEG 2000 encoder is registered.
pub const JP2_ENCODER_NAME: &str = "jp2-encoder";

/// PDF name of the filter.
pub const JPX_FILTER_NAME: &str = "JPXDecode";

// Number of pixels buffered before the transcoder flushes to its sink.
pub const DEFAULT_BUFFER_PIXELS: usize = 1024;

pub const BYTES_PER_PIXEL: usize = 3;

// Output is always one byte per channel.
pub const OUTPUT_BITS_PER_COMPONENT: i64 = 8;

// The JP2 signature box is exactly 12 bytes (ISO/IEC 15444-1, I.5.1).
pub const JP2_SIGNATURE: &[u8; 12] = b"\x00\x00\x00\x0CjP  \r\n\x87\n";

// SOC marker that opens a raw codestream.
pub const J2K_START_OF_CODESTREAM: [u8; 2] = [0xFF, 0x4F];

// The size in bytes of a box header without the extended length field.
pub const BOX_HEADER_SIZE: usize = 8;

// Extended length field, present when the 32-bit length is 1.
pub const BOX_XL_FIELD_SIZE: usize = 8;

// Parameter keys reported by decode.
pub const KEY_WIDTH: &str = "Width";
pub const KEY_HEIGHT: &str = "Height";
pub const KEY_BITS_PER_COMPONENT: &str = "BitsPerComponent";
pub const KEY_COLOR_SPACE: &str = "ColorSpace";
