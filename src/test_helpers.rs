//! Shared test utilities for the photo-relay test suite.
//!
//! Synthetic image builders so tests never depend on fixture files.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let exif = exif_chunk(6, Some("Harbour at dusk"));
//! let jpeg = create_test_jpeg_with_exif(400, 160, &exif);
//! let png = create_test_png_with_exif(400, 160, &exif);
//! ```

use image::{ImageEncoder, RgbImage};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

fn encode(encoder: impl ImageEncoder, width: u32, height: u32) {
    let img = gradient(width, height);
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Encode a gradient JPEG of the given dimensions.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    encode(image::codecs::jpeg::JpegEncoder::new(&mut out), width, height);
    out
}

/// Gradient JPEG carrying a raw EXIF chunk in an APP1 segment.
pub fn create_test_jpeg_with_exif(width: u32, height: u32, exif: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new(&mut out);
    encoder.set_exif_metadata(exif.to_vec()).unwrap();
    encode(encoder, width, height);
    out
}

/// Encode a gradient PNG of the given dimensions.
pub fn create_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    encode(image::codecs::png::PngEncoder::new(&mut out), width, height);
    out
}

/// Gradient PNG carrying a raw EXIF chunk in an `eXIf` chunk.
pub fn create_test_png_with_exif(width: u32, height: u32, exif: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::png::PngEncoder::new(&mut out);
    encoder.set_exif_metadata(exif.to_vec()).unwrap();
    encode(encoder, width, height);
    out
}

/// Lossless gradient WebP carrying a raw EXIF chunk.
pub fn create_test_webp_with_exif(width: u32, height: u32, exif: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::webp::WebPEncoder::new_lossless(&mut out);
    encoder.set_exif_metadata(exif.to_vec()).unwrap();
    encode(encoder, width, height);
    out
}

/// Little-endian TIFF-structured EXIF chunk with an orientation entry and an
/// optional `ImageDescription`.
pub fn exif_chunk(orientation: u16, description: Option<&str>) -> Vec<u8> {
    const ASCII: u16 = 2;
    const SHORT: u16 = 3;

    let description = description.map(|d| {
        let mut bytes = d.as_bytes().to_vec();
        bytes.push(0);
        bytes
    });
    let entry_count: u16 = if description.is_some() { 2 } else { 1 };
    let data_offset = 8 + 2 + 12 * u32::from(entry_count) + 4;

    let mut t = Vec::new();
    t.extend_from_slice(b"II");
    t.extend_from_slice(&42u16.to_le_bytes());
    t.extend_from_slice(&8u32.to_le_bytes());
    t.extend_from_slice(&entry_count.to_le_bytes());

    // Entries must be sorted by tag: ImageDescription (0x010E) first
    if let Some(bytes) = &description {
        t.extend_from_slice(&0x010Eu16.to_le_bytes());
        t.extend_from_slice(&ASCII.to_le_bytes());
        t.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        t.extend_from_slice(&data_offset.to_le_bytes());
    }
    t.extend_from_slice(&0x0112u16.to_le_bytes());
    t.extend_from_slice(&SHORT.to_le_bytes());
    t.extend_from_slice(&1u32.to_le_bytes());
    t.extend_from_slice(&orientation.to_le_bytes());
    t.extend_from_slice(&[0, 0]);
    t.extend_from_slice(&0u32.to_le_bytes());

    if let Some(bytes) = &description {
        t.extend_from_slice(bytes);
    }
    t
}
