//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format sniffing | `image::ImageReader::with_guessed_format` |
//! | Identify | `ImageDecoder::dimensions` + `ImageDecoder::orientation` |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image` crate (pure Rust decoders) |
//! | Orient | `DynamicImage::apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Box fill | fill-resize then centered `crop_imm` |
//! | sRGB | `DynamicImage::to_rgb8` (alpha dropped, ICC not carried) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Metadata | [`SourceMetadata`] read from the decoder, EXIF via the encoder, XMP/IPTC spliced |

use super::backend::{BackendError, ImageBackend};
use super::calculations::{
    calculate_center_crop_origin, calculate_fill_dimensions, calculate_width_fit,
};
use super::metadata::{SourceMetadata, splice_segments};
use super::params::TransformParams;
use crate::classify::ImageMetrics;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a decoder over in-memory bytes, format sniffed from the magic bytes.
fn open(bytes: &[u8]) -> Result<impl ImageDecoder + '_, BackendError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(BackendError::ProcessingFailed(
            "Unrecognized image format".to_string(),
        ));
    }
    reader
        .into_decoder()
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {}", e)))
}

/// Orientation the decoder reports. A malformed EXIF block counts as upright.
fn read_orientation(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or(Orientation::NoTransforms)
}

/// EXIF code for [`ImageMetrics`]; upright sources report none.
fn orientation_code(orientation: Orientation) -> Option<u16> {
    match orientation {
        Orientation::NoTransforms => None,
        other => Some(u16::from(other.to_exif())),
    }
}

/// Cover-fit into an exact box: fill-resize, then center crop.
fn resize_to_box(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let (fill_w, fill_h) = calculate_fill_dimensions((img.width(), img.height()), (width, height));
    let filled = img.resize_exact(fill_w, fill_h, FilterType::Lanczos3);
    let (x, y) = calculate_center_crop_origin((fill_w, fill_h), (width, height));
    filled.crop_imm(x, y, width, height)
}

/// Encode as baseline JPEG in sRGB, with the EXIF block in APP1 when given.
fn encode_jpeg(
    img: &DynamicImage,
    quality: u32,
    exif: Option<Vec<u8>>,
) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, quality as u8);
    if let Some(exif) = exif {
        encoder
            .set_exif_metadata(exif)
            .map_err(|e| BackendError::ProcessingFailed(format!("EXIF not writable: {}", e)))?;
    }
    encoder
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(out)
}

impl ImageBackend for RustBackend {
    fn identify(&self, bytes: &[u8]) -> Result<ImageMetrics, BackendError> {
        let mut decoder = open(bytes)?;
        let (raw_width, raw_height) = decoder.dimensions();
        Ok(ImageMetrics {
            raw_width,
            raw_height,
            orientation: orientation_code(read_orientation(&mut decoder)),
        })
    }

    fn transform(&self, bytes: &[u8], params: &TransformParams) -> Result<Vec<u8>, BackendError> {
        let mut decoder = open(bytes)?;
        // Read before the metadata, which resets the orientation tag
        let orientation = read_orientation(&mut decoder);
        let metadata = SourceMetadata::read(&mut decoder);

        let mut img = DynamicImage::from_decoder(decoder)
            .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {}", e)))?;
        img.apply_orientation(orientation);

        let spec = params.resize;
        let resized = match spec.target_height {
            Some(height) => resize_to_box(&img, spec.target_width, height),
            None => {
                let (w, h) = calculate_width_fit((img.width(), img.height()), spec.target_width);
                img.resize_exact(w, h, FilterType::Lanczos3)
            }
        };

        let segments = metadata.segments();
        let encoded = encode_jpeg(&resized, params.quality.value(), metadata.exif)?;
        Ok(splice_segments(&encoded, &segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{AspectCategory, classify_metrics};
    use crate::plan::ResizeSpec;
    use crate::test_helpers::{
        create_test_jpeg, create_test_jpeg_with_exif, create_test_png, create_test_png_with_exif,
        create_test_webp_with_exif, exif_chunk,
    };

    fn decoded_dims(bytes: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(bytes).unwrap();
        (img.width(), img.height())
    }

    /// Orientation and EXIF block as a reader of the output would see them.
    fn output_exif(bytes: &[u8]) -> (Orientation, Option<Vec<u8>>) {
        let mut decoder = open(bytes).unwrap();
        let orientation = decoder.orientation().unwrap();
        (orientation, decoder.exif_metadata().unwrap())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let bytes = create_test_jpeg(200, 150);
        let metrics = RustBackend::new().identify(&bytes).unwrap();
        assert_eq!(metrics.raw_width, 200);
        assert_eq!(metrics.raw_height, 150);
        assert_eq!(metrics.orientation, None);
    }

    #[test]
    fn identify_reads_jpeg_exif_orientation() {
        let bytes = create_test_jpeg_with_exif(200, 150, &exif_chunk(6, None));
        let metrics = RustBackend::new().identify(&bytes).unwrap();
        assert_eq!((metrics.raw_width, metrics.raw_height), (200, 150));
        assert_eq!(metrics.orientation, Some(6));
    }

    #[test]
    fn identify_png() {
        let metrics = RustBackend::new().identify(&create_test_png(64, 32)).unwrap();
        assert_eq!((metrics.raw_width, metrics.raw_height), (64, 32));
        assert_eq!(metrics.orientation, None);
    }

    #[test]
    fn rotated_png_is_classified_and_published_as_portrait() {
        // Stored 400x300, displayed 300x400
        let bytes = create_test_png_with_exif(400, 300, &exif_chunk(6, None));
        let backend = RustBackend::new();

        let metrics = backend.identify(&bytes).unwrap();
        assert_eq!(metrics.orientation, Some(6));
        let (corrected, category) = classify_metrics(&metrics).unwrap();
        assert_eq!(category, AspectCategory::Portrait);
        assert_eq!((corrected.width, corrected.height), (300, 400));

        let out = backend
            .transform(&bytes, &TransformParams::new(ResizeSpec::width(300)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (300, 400));
    }

    #[test]
    fn rotated_webp_is_turned_upright() {
        let bytes = create_test_webp_with_exif(200, 100, &exif_chunk(8, None));
        let backend = RustBackend::new();

        assert_eq!(backend.identify(&bytes).unwrap().orientation, Some(8));
        let out = backend
            .transform(&bytes, &TransformParams::new(ResizeSpec::width(50)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (50, 100));
    }

    #[test]
    fn identify_garbage_errors() {
        assert!(RustBackend::new().identify(b"definitely not an image").is_err());
        assert!(RustBackend::new().identify(&[]).is_err());
    }

    #[test]
    fn transform_width_only_keeps_aspect() {
        let bytes = create_test_jpeg(400, 160);
        let out = RustBackend::new()
            .transform(&bytes, &TransformParams::new(ResizeSpec::width(250)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (250, 100));
    }

    #[test]
    fn transform_enlarges_when_target_is_wider() {
        let bytes = create_test_jpeg(100, 40);
        let out = RustBackend::new()
            .transform(&bytes, &TransformParams::new(ResizeSpec::width(250)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (250, 100));
    }

    #[test]
    fn transform_exact_box_crops() {
        let bytes = create_test_jpeg(300, 200);
        let out = RustBackend::new()
            .transform(&bytes, &TransformParams::new(ResizeSpec::exact(90, 90)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (90, 90));
    }

    #[test]
    fn transform_output_is_jpeg() {
        let out = RustBackend::new()
            .transform(
                &create_test_png(64, 32),
                &TransformParams::new(ResizeSpec::width(32)),
            )
            .unwrap();
        assert!(out.starts_with(&[0xFF, 0xD8]));
        assert_eq!(decoded_dims(&out), (32, 16));
        assert_eq!(output_exif(&out), (Orientation::NoTransforms, None));
    }

    #[test]
    fn transform_applies_rotation_and_resets_orientation() {
        // Stored 200x100, displayed 100x200
        let bytes = create_test_jpeg_with_exif(200, 100, &exif_chunk(6, Some("Dunes")));
        let out = RustBackend::new()
            .transform(&bytes, &TransformParams::new(ResizeSpec::width(50)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (50, 100));

        let (orientation, exif) = output_exif(&out);
        assert_eq!(orientation, Orientation::NoTransforms);
        assert!(contains(&exif.unwrap(), b"Dunes"));
    }

    #[test]
    fn png_exif_is_carried_into_jpeg_output() {
        let bytes = create_test_png_with_exif(120, 80, &exif_chunk(3, Some("Harbour at dusk")));
        let out = RustBackend::new()
            .transform(&bytes, &TransformParams::new(ResizeSpec::width(60)))
            .unwrap();
        assert_eq!(decoded_dims(&out), (60, 40));

        let (orientation, exif) = output_exif(&out);
        assert_eq!(orientation, Orientation::NoTransforms);
        let exif = exif.expect("EXIF block carried from the PNG eXIf chunk");
        assert!(contains(&exif, b"Harbour at dusk"));
    }

    #[test]
    fn transform_is_deterministic() {
        let bytes = create_test_jpeg(300, 200);
        let params = TransformParams::new(ResizeSpec::width(150));
        let backend = RustBackend::new();
        assert_eq!(
            backend.transform(&bytes, &params).unwrap(),
            backend.transform(&bytes, &params).unwrap()
        );
    }

    #[test]
    fn transform_garbage_errors() {
        let result =
            RustBackend::new().transform(b"nope", &TransformParams::new(ResizeSpec::width(10)));
        assert!(result.is_err());
    }

    #[test]
    fn orientation_codes_map_to_metrics() {
        assert_eq!(orientation_code(Orientation::NoTransforms), None);
        for code in 2..=8u8 {
            let orientation = Orientation::from_exif(code).unwrap();
            assert_eq!(orientation_code(orientation), Some(u16::from(code)));
        }
    }
}
