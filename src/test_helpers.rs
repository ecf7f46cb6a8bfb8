//! Shared test utilities for the exif-frame test suite.
//!
//! Provides float assertions, a reference metadata map, and small synthetic
//! images so tests don't need fixture files.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let caption = build_caption(&acme_metadata());
//! assert_eq!(caption.title, "Acme  X1");
//!
//! let handle = backend.decode(&jpeg_bytes(200, 150)).unwrap();
//! ```

use crate::metadata::{MetadataMap, tags};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};

// =========================================================================
// Assertions
// =========================================================================

/// Assert two floats are equal within 1e-6.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

// =========================================================================
// Metadata
// =========================================================================

/// The reference camera: Acme X1 at 50mm, f/1.8, 1/200s, ISO 400.
pub fn acme_metadata() -> MetadataMap {
    let mut map = MetadataMap::new();
    map.insert(tags::MAKE, "Acme");
    map.insert(tags::MODEL, "X1");
    map.insert(tags::FOCAL_LENGTH_35MM, 50u32);
    map.insert(tags::F_NUMBER, 1.8);
    map.insert(tags::EXPOSURE_TIME, 0.005);
    map.insert(tags::ISO, 400u32);
    map
}

// =========================================================================
// Images
// =========================================================================

/// Opaque RGBA gradient; every pixel differs from its neighbours.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

/// A valid baseline JPEG with no metadata segments.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Insert an APP1 EXIF segment carrying only an Orientation tag right after
/// the JPEG's SOI marker.
pub fn with_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    // Little-endian TIFF: header, one-entry IFD0, no next IFD
    let mut tiff = b"II".to_vec();
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x0112u16.to_le_bytes());
    tiff.extend_from_slice(&3u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&orientation.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_le_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut bytes = jpeg[..2].to_vec();
    bytes.extend_from_slice(&[0xFF, 0xE1]);
    bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    bytes.extend_from_slice(&payload);
    bytes.extend_from_slice(&jpeg[2..]);
    bytes
}
