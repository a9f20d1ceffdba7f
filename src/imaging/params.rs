//! Parameter types for image operations.
//!
//! These structs describe *what* the transform should produce, not *how*.
//! They are the interface between the pipeline (which decides the target
//! size) and the [`backend`](super::backend) (which does the pixel work), so
//! tests can swap in a recording mock without touching pipeline logic.

use crate::plan::ResizeSpec;

/// Quality setting for lossy image encoding (1-100).
///
/// Only [`OUTPUT_QUALITY`] exists; the field stays private so every value is
/// in range for the JPEG encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn value(self) -> u32 {
        self.0
    }
}

/// Every published image is encoded at this quality.
pub const OUTPUT_QUALITY: Quality = Quality(60);

/// Full specification for one transform: target size plus encoding quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    pub resize: ResizeSpec,
    pub quality: Quality,
}

impl TransformParams {
    /// Transform with the fixed output quality.
    pub fn new(resize: ResizeSpec) -> Self {
        Self {
            resize,
            quality: OUTPUT_QUALITY,
        }
    }
}
