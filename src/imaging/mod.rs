//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | decoder dimensions + `ImageDecoder::orientation` (any container) |
//! | **Orient** | `DynamicImage::apply_orientation` |
//! | **Resize** | Lanczos3 (`resize_exact`, cover crop for fixed boxes) |
//! | **Encode** | `JpegEncoder` at [`OUTPUT_QUALITY`], 8-bit sRGB |
//! | **Metadata** | decoder EXIF/XMP/IPTC, written back as JPEG segments |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a transform
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Metadata**: source EXIF/XMP/IPTC and the JPEG segment splice

pub mod backend;
mod calculations;
mod metadata;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{OUTPUT_QUALITY, Quality, TransformParams};
pub use rust_backend::RustBackend;
