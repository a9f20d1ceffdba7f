//! Orientation-aware aspect classification.
//!
//! Pixel dimensions as stored in a file are not necessarily the dimensions a
//! viewer displays: cameras write sensor-oriented pixels and record the
//! rotation in the EXIF orientation tag. Codes 5–8 describe a quarter turn,
//! so the displayed width is the stored height and vice versa. Classification
//! always happens in displayed space.
//!
//! ## Categories
//!
//! Evaluated in order, first match wins:
//!
//! | Rule | Category |
//! |---|---|
//! | `width / height > 2` | [`AspectCategory::Panorama`] |
//! | `width > height` | [`AspectCategory::Landscape`] |
//! | `width < height` | [`AspectCategory::Portrait`] |
//! | otherwise | [`AspectCategory::Square`] |
//!
//! A 2:1 image is still a landscape; only strictly wider images are panoramas.

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("image dimensions are not defined. Width: {width}, Height: {height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Dimensions as read from the encoded image, before orientation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageMetrics {
    pub raw_width: u32,
    pub raw_height: u32,
    /// EXIF orientation code (1–8), if the image carries one.
    pub orientation: Option<u16>,
}

/// Dimensions in displayed orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectedDimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectCategory {
    Square,
    Landscape,
    Portrait,
    Panorama,
}

impl fmt::Display for AspectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AspectCategory::Square => "square",
            AspectCategory::Landscape => "landscape",
            AspectCategory::Portrait => "portrait",
            AspectCategory::Panorama => "panorama",
        })
    }
}

/// True for the EXIF orientation codes that involve a 90° or 270° turn.
pub fn is_quarter_turn(orientation: Option<u16>) -> bool {
    matches!(orientation, Some(5..=8))
}

/// Resolve displayed dimensions and the aspect category.
///
/// Fails with [`ClassifyError::InvalidDimensions`] when either dimension is
/// zero; the caller must abort the run.
pub fn classify(
    raw_width: u32,
    raw_height: u32,
    orientation: Option<u16>,
) -> Result<(CorrectedDimensions, AspectCategory), ClassifyError> {
    let (width, height) = if is_quarter_turn(orientation) {
        (raw_height, raw_width)
    } else {
        (raw_width, raw_height)
    };

    if width == 0 || height == 0 {
        return Err(ClassifyError::InvalidDimensions { width, height });
    }

    // width / height > 2, without floating point
    let category = if u64::from(width) > 2 * u64::from(height) {
        AspectCategory::Panorama
    } else if width > height {
        AspectCategory::Landscape
    } else if width < height {
        AspectCategory::Portrait
    } else {
        AspectCategory::Square
    };

    Ok((CorrectedDimensions { width, height }, category))
}

/// [`classify`] for a set of metrics.
pub fn classify_metrics(
    metrics: &ImageMetrics,
) -> Result<(CorrectedDimensions, AspectCategory), ClassifyError> {
    classify(metrics.raw_width, metrics.raw_height, metrics.orientation)
}
