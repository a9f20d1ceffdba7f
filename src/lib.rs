//! # Photo Relay
//!
//! An event-driven worker that normalizes uploaded photos. Each upload lands
//! in a staging store under `collection/group/item.ext`; the worker corrects
//! its orientation, resizes it according to its aspect category, re-encodes
//! it as a quality-60 sRGB JPEG and publishes it to a serving store under the
//! same key. It then removes the original and appends a photo record to the
//! collection/group's list.
//!
//! # Architecture: One Run per Staged Object
//!
//! ```text
//! trigger event ─┬─ key ─→ Fetch → Classify → Plan → Transform → Publish → Cleanup → Record
//!                └─ key ─→ ...          (fatal steps in parallel, bookkeeping in event order)
//! ```
//!
//! Classification and planning are pure functions of a few integers, so the
//! whole resize policy is unit-testable without decoding an image. Pixel work
//! sits behind the [`imaging::ImageBackend`] trait and storage behind
//! [`store::ObjectStore`] / [`store::RecordStore`], so the coordinator in
//! [`pipeline`] is tested against recording mocks.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`key`] | Splits `collection/group/item.ext` object keys |
//! | [`classify`] | Orientation correction and aspect categories |
//! | [`plan`] | Per-category resize policy |
//! | [`imaging`] | Pure-Rust decode, orient, resize, JPEG encode, metadata carry-over |
//! | [`store`] | Object and record store traits plus filesystem implementations |
//! | [`pipeline`] | Run coordination and the partial-failure policy |
//! | [`event`] | Trigger payload parsing |
//! | [`config`] | Layered `photo-relay.toml` + environment configuration |
//! | [`types`] | Photo records and the success response |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Publish Is the Commit Point
//!
//! Everything up to publishing the normalized image is fatal; nothing after
//! it is. A staged original that could not be deleted, or a record that could
//! not be appended, is logged and reported but the run still succeeds, since
//! the serving copy already exists. Nothing is rolled back and nothing is
//! retried here; redelivery belongs to whoever sent the trigger.
//!
//! ## Orientation Is Baked In
//!
//! EXIF orientation is applied to the pixels before resizing and the output's
//! orientation tag is reset to 1, so every consumer sees the image upright
//! whether it honours EXIF or not. Classification uses the same corrected
//! dimensions, so a portrait shot stored sideways is treated as a portrait.
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decoding, Lanczos3
//! resampling and JPEG encoding. No system libraries, no shelling out.

pub mod classify;
pub mod config;
pub mod event;
pub mod imaging;
pub mod key;
pub mod output;
pub mod pipeline;
pub mod plan;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
