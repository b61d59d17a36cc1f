//! Decoding real JPEG 2000 files through the OpenJPEG backend.
//!
//! The fixtures carry no coded coefficients, so every sample decodes to the
//! component's DC level: half range for unsigned components, zero for signed.

#![cfg(feature = "openjpeg")]

use std::sync::Arc;

use jpx_filter::openjpeg::OpenJpegDecoder;
use jpx_filter::{CodecRegistry, DecodeOptions, Filter, JpxColorSpace, JpxFilter, Parameters};

const RGB_SUBSAMPLED: &[u8] = include_bytes!("fixtures/rgb_subsampled.j2k");
const GRAY_SIGNED_12BIT: &[u8] = include_bytes!("fixtures/gray_signed_12bit.j2k");
const CMYK_JP2: &[u8] = include_bytes!("fixtures/cmyk.jp2");

fn filter() -> JpxFilter {
    JpxFilter::with_registry(Arc::new(
        CodecRegistry::new().with_decoder(Arc::new(OpenJpegDecoder::new())),
    ))
}

#[test]
fn test_decode_rgb_codestream_with_subsampled_plane() {
    let mut out = Vec::new();
    let result = filter()
        .decode_default(&mut &RGB_SUBSAMPLED[..], &mut out, &Parameters::new(), 0)
        .unwrap();

    // 8-bit, 1-bit and 2-bit (2x2 sub-sampled) components.
    assert_eq!(out.len(), 4 * 2 * 3);
    assert_eq!(out, [128u8, 255, 170].repeat(8));

    let params = result.parameters();
    assert_eq!(params.get_int("Width"), Some(4));
    assert_eq!(params.get_int("Height"), Some(2));
    assert_eq!(params.get_int("BitsPerComponent"), Some(8));
    assert_eq!(params.get_name("ColorSpace"), Some("DeviceRGB"));
    assert_eq!(result.color_space(), Some(JpxColorSpace::Rgb));
    assert_eq!(result.source_bits_per_component(), Some(8));
}

#[test]
fn test_decode_signed_12bit_gray() {
    let mut out = Vec::new();
    let result = filter()
        .decode_default(&mut &GRAY_SIGNED_12BIT[..], &mut out, &Parameters::new(), 0)
        .unwrap();

    assert_eq!(out, vec![128u8; 3 * 3]);
    assert_eq!(result.parameters().get_name("ColorSpace"), Some("DeviceGray"));
    assert_eq!(result.parameters().get_int("BitsPerComponent"), Some(8));
    assert_eq!(result.source_bits_per_component(), Some(12));
}

#[test]
fn test_decode_cmyk_jp2_reports_cmyk() {
    let mut out = Vec::new();
    let result = filter()
        .decode_default(&mut &CMYK_JP2[..], &mut out, &Parameters::new(), 0)
        .unwrap();

    // C = 1-bit full ink, M = Y = K = half: red is gone, green and blue at a quarter.
    assert_eq!(out.len(), 2 * 2 * 3);
    assert_eq!(out, [0u8, 63, 63].repeat(4));
    assert_eq!(result.color_space(), Some(JpxColorSpace::Cmyk));
    assert_eq!(result.parameters().get_name("ColorSpace"), Some("DeviceCMYK"));
}

#[test]
fn test_decoder_clears_filter_subsampled() {
    let options = DecodeOptions::with_subsampling(2);
    options.set_filter_subsampled(true);
    let mut out = Vec::new();
    filter()
        .decode(&mut &GRAY_SIGNED_12BIT[..], &mut out, &Parameters::new(), 0, &options)
        .unwrap();

    assert!(!options.is_filter_subsampled());
    assert_eq!(out.len(), 9);
}

#[test]
fn test_default_build_registers_openjpeg() {
    let decoder = CodecRegistry::global().decoder().unwrap();
    assert_eq!(decoder.name(), "openjpeg");

    let mut out = Vec::new();
    JpxFilter::new()
        .decode_default(&mut &RGB_SUBSAMPLED[..], &mut out, &Parameters::new(), 0)
        .unwrap();
    assert_eq!(out.len(), 24);
}
