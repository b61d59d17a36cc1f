//! End-to-end runs of the `jpxfilter` binary.

#![cfg(feature = "openjpeg")]

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const RGB_SUBSAMPLED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/rgb_subsampled.j2k");

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, nanos));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn jpxfilter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jpxfilter"))
}

#[test]
fn test_decode_to_raw() {
    let dir = unique_temp_dir("jpxfilter_raw");
    let out = dir.join("image.raw");

    let status = jpxfilter()
        .args(["decode", "-i", RGB_SUBSAMPLED, "--buffer-pixels", "3", "-o"])
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    assert_eq!(fs::read(&out).unwrap(), [128u8, 255, 170].repeat(8));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_decode_to_ppm() {
    let dir = unique_temp_dir("jpxfilter_ppm");
    let out = dir.join("image.ppm");

    let status = jpxfilter()
        .args(["decode", "-i", RGB_SUBSAMPLED, "-f", "ppm", "-o"])
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    let mut expected = b"P6\n4 2\n255\n".to_vec();
    expected.extend([128u8, 255, 170].repeat(8));
    assert_eq!(fs::read(&out).unwrap(), expected);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_failed_decode_leaves_no_output() {
    let dir = unique_temp_dir("jpxfilter_garbage");
    let input = dir.join("garbage.jp2");
    let out = dir.join("image.raw");
    fs::write(&input, b"definitely not JPEG 2000").unwrap();

    let status = jpxfilter()
        .arg("decode")
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&out)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
    assert!(!out.exists());
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_zero_buffer_is_rejected() {
    let dir = unique_temp_dir("jpxfilter_buffer");
    let out = dir.join("image.raw");

    let status = jpxfilter()
        .args(["decode", "-i", RGB_SUBSAMPLED, "--buffer-pixels", "0", "-o"])
        .arg(&out)
        .status()
        .unwrap();

    assert!(!status.success());
    assert!(!out.exists());
    fs::remove_dir_all(&dir).ok();
}
