//! Directory-backed object store.
//!
//! Each object key maps to a file path under the store root:
//!
//! ```text
//! staging/
//! └── a1/
//!     └── m2/
//!         └── p3.jpg      ← key "a1/m2/p3.jpg"
//! ```
//!
//! Writes go to a `.partial` sibling first and are renamed into place, so a
//! reader never sees a half-written object. A failed write removes the
//! sibling again.

use super::{ObjectStore, PutReceipt, StoreError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PARTIAL_SUFFIX: &str = ".partial";

#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path inside the root.
    ///
    /// Rejects keys that could escape the root or alias another key: empty
    /// keys, absolute keys, empty segments, `.`/`..` segments and backslashes.
    fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let invalid = key.is_empty()
            || key.contains('\\')
            || key
                .split('/')
                .any(|segment| segment.is_empty() || segment == "." || segment == "..");
        if invalid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(key.split('/').fold(self.root.clone(), |path, s| path.join(s)))
    }
}

/// Write `bytes` to a `.partial` sibling of `path`, then rename it into
/// place. On failure the sibling is removed and `path` is left as it was.
pub(super) fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    let written = fs::write(&partial, bytes).and_then(|()| fs::rename(&partial, path));
    if written.is_err() {
        let _ = fs::remove_file(&partial);
    }
    written
}

fn not_found_as(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |e| {
        if e.kind() == ErrorKind::NotFound {
            StoreError::NotFound(key.to_string())
        } else {
            StoreError::Io(e)
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(key)?;
        fs::read(&path).map_err(not_found_as(key))
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<PutReceipt, StoreError> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        write_replacing(&path, bytes)?;
        Ok(PutReceipt::for_bytes(bytes))
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.object_path(key)?;
        fs::remove_file(&path).map_err(not_found_as(key))
    }
}
