//! Storage collaborators: object stores and the photo record store.
//!
//! The pipeline talks to three stores through two traits:
//!
//! | Role | Trait | Operations used |
//! |---|---|---|
//! | Staging store | [`ObjectStore`] | `get`, `delete` |
//! | Serving store | [`ObjectStore`] | `put` |
//! | Record store | [`RecordStore`] | `append_photo` |
//!
//! Handles are built once per process and shared across runs. Both traits
//! require `Sync` so the same handle can serve parallel runs; no business
//! state lives on them between calls.
//!
//! Production implementations:
//! - [`FsObjectStore`] — a directory tree, one file per object key
//! - [`JsonRecordStore`] — a JSON document of photo lists

mod fs;
mod records;

pub use fs::FsObjectStore;
pub use records::JsonRecordStore;

use crate::types::PhotoRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Object not found: {0}")]
    NotFound(String),
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Acknowledgement of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutReceipt {
    pub size: usize,
    /// SHA-256 hex digest of the stored bytes.
    pub etag: String,
}

impl PutReceipt {
    pub fn for_bytes(bytes: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        Self {
            size: bytes.len(),
            etag: format!("{:x}", Sha256::digest(bytes)),
        }
    }
}

/// Key-addressed blob storage.
pub trait ObjectStore: Sync {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write (or overwrite) an object.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<PutReceipt, StoreError>;

    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Ordered photo lists keyed by `(collection_id, group_id)`.
pub trait RecordStore: Sync {
    /// Append to the list, creating it if absent. Appends are not
    /// deduplicated. Returns the list length after the append.
    fn append_photo(
        &self,
        collection_id: &str,
        group_id: &str,
        record: PhotoRecord,
    ) -> Result<usize, StoreError>;
}
