//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the pipeline needs
//! from a pixel engine: identify (dimensions + orientation without a full
//! decode) and transform (decode, resize, convert, encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, built on
//! the `image` crate. Everything works on in-memory buffers; the pipeline
//! owns fetching and publishing the bytes.

use super::params::TransformParams;
use crate::classify::ImageMetrics;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can be shared by parallel runs.
pub trait ImageBackend: Sync {
    /// Read raw pixel dimensions and the EXIF orientation code.
    fn identify(&self, bytes: &[u8]) -> Result<ImageMetrics, BackendError>;

    /// Decode, orient, resize and re-encode. Returns the encoded output.
    fn transform(&self, bytes: &[u8], params: &TransformParams) -> Result<Vec<u8>, BackendError>;
}
