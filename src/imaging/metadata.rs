//! Descriptive metadata carried from the source into the published JPEG.
//!
//! Reading goes through the `image` decoders, so every supported container
//! contributes: JPEG APP segments, PNG `eXIf`/`iTXt`, WebP `EXIF`/`XMP `
//! chunks, TIFF tags.
//!
//! | Block | Source | Written as |
//! |---|---|---|
//! | EXIF | `ImageDecoder::exif_metadata` | `JpegEncoder::set_exif_metadata` (APP1 `Exif`) |
//! | XMP | `ImageDecoder::xmp_metadata` | APP1 `http://ns.adobe.com/xap/1.0/` segment |
//! | IPTC | `ImageDecoder::iptc_metadata` | APP13 `Photoshop 3.0` segment |
//!
//! The encoder has no setter for XMP or IPTC, so those two are spliced into
//! the encoded bytes. ICC profiles are never carried: output is always sRGB.

use image::ImageDecoder;
use image::metadata::Orientation;

const SOI: [u8; 2] = [0xFF, 0xD8];
const APP0: u8 = 0xE0;
const APP1: u8 = 0xE1;
const APP13: u8 = 0xED;

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const XMP_HEADER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const PHOTOSHOP_HEADER: &[u8] = b"Photoshop 3.0\0";

/// Largest payload a single JPEG marker segment can hold.
const MAX_SEGMENT_PAYLOAD: usize = u16::MAX as usize - 2;

/// Metadata blocks read from a source image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMetadata {
    /// Raw TIFF-structured EXIF, orientation already reset to upright.
    pub exif: Option<Vec<u8>>,
    /// XMP packet without its JPEG namespace header.
    pub xmp: Option<Vec<u8>>,
    /// Photoshop IRB data without its JPEG header.
    pub iptc: Option<Vec<u8>>,
}

impl SourceMetadata {
    /// Collect descriptive metadata from a decoder.
    ///
    /// Unreadable blocks are skipped; metadata never fails a transform. The
    /// EXIF orientation is rewritten to 1 because the caller bakes the
    /// rotation into the pixels.
    pub fn read(decoder: &mut impl ImageDecoder) -> Self {
        let exif = decoder.exif_metadata().ok().flatten().map(|mut exif| {
            if exif.starts_with(EXIF_HEADER) {
                exif = exif[EXIF_HEADER.len()..].to_vec();
            }
            let _ = Orientation::remove_from_exif_chunk(&mut exif);
            exif
        });
        Self {
            exif: exif.filter(|e| {
                !e.is_empty() && e.len() + EXIF_HEADER.len() <= MAX_SEGMENT_PAYLOAD
            }),
            xmp: decoder.xmp_metadata().ok().flatten().filter(|x| !x.is_empty()),
            iptc: decoder.iptc_metadata().ok().flatten().filter(|i| !i.is_empty()),
        }
    }

    /// XMP and IPTC as JPEG segments, ready for [`splice_segments`].
    pub fn segments(&self) -> Vec<MetadataSegment> {
        let xmp = self
            .xmp
            .as_deref()
            .map(|packet| MetadataSegment::with_header(APP1, XMP_HEADER, packet));
        let iptc = self
            .iptc
            .as_deref()
            .map(|data| MetadataSegment::with_header(APP13, PHOTOSHOP_HEADER, data));
        xmp.into_iter()
            .chain(iptc)
            .filter(|s| s.payload.len() <= MAX_SEGMENT_PAYLOAD)
            .collect()
    }
}

/// An owned JPEG marker segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSegment {
    pub marker: u8,
    pub payload: Vec<u8>,
}

impl MetadataSegment {
    fn with_header(marker: u8, header: &[u8], body: &[u8]) -> Self {
        let mut payload = Vec::with_capacity(header.len() + body.len());
        payload.extend_from_slice(header);
        payload.extend_from_slice(body);
        Self { marker, payload }
    }
}

/// Insert segments into an encoded JPEG right after SOI, or after the JFIF
/// APP0 header when the encoder wrote one.
///
/// Returns the input unchanged when it is not a JPEG or there is nothing to
/// insert.
pub fn splice_segments(jpeg: &[u8], segments: &[MetadataSegment]) -> Vec<u8> {
    if segments.is_empty() || !jpeg.starts_with(&SOI) {
        return jpeg.to_vec();
    }

    let insert_at = match jpeg.get(2..6) {
        Some([0xFF, APP0, hi, lo]) => {
            let end = 4 + u16::from_be_bytes([*hi, *lo]) as usize;
            end.min(jpeg.len())
        }
        _ => 2,
    };

    let extra: usize = segments.iter().map(|s| s.payload.len() + 4).sum();
    let mut out = Vec::with_capacity(jpeg.len() + extra);
    out.extend_from_slice(&jpeg[..insert_at]);
    for segment in segments {
        let len = (segment.payload.len() + 2) as u16;
        out.extend_from_slice(&[0xFF, segment.marker]);
        out.extend_from_slice(&len.to_be_bytes());
        out.extend_from_slice(&segment.payload);
    }
    out.extend_from_slice(&jpeg[insert_at..]);
    out
}
