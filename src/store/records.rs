//! JSON-file record store.
//!
//! The whole table is one pretty-printed JSON document, keyed by
//! `"<collection>/<group>"`:
//!
//! ```json
//! {
//!   "a1/m2": {
//!     "collection_id": "a1",
//!     "group_id": "m2",
//!     "photos": [{ "id": "p3.jpg", "legend": "" }]
//!   }
//! }
//! ```
//!
//! Appends are read-modify-write under a process-wide lock and the document
//! is replaced atomically via rename. A missing file is an empty table.

use super::fs::write_replacing;
use super::{RecordStore, StoreError};
use crate::types::PhotoRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

/// Photo list for one collection/group pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoList {
    pub collection_id: String,
    pub group_id: String,
    #[serde(default)]
    pub photos: Vec<PhotoRecord>,
}

type Table = BTreeMap<String, PhotoList>;

#[derive(Debug)]
pub struct JsonRecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

fn table_key(collection_id: &str, group_id: &str) -> String {
    format!("{collection_id}/{group_id}")
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Current photo list for a collection/group (empty if absent).
    pub fn photos(&self, collection_id: &str, group_id: &str) -> Result<Vec<PhotoRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self
            .load()?
            .remove(&table_key(collection_id, group_id))
            .map(|list| list.photos)
            .unwrap_or_default())
    }

    fn load(&self) -> Result<Table, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Table::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Table::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, table: &Table) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(table)?;
        write_replacing(&self.path, json.as_bytes())?;
        Ok(())
    }
}

impl RecordStore for JsonRecordStore {
    fn append_photo(
        &self,
        collection_id: &str,
        group_id: &str,
        record: PhotoRecord,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut table = self.load()?;
        let list = table
            .entry(table_key(collection_id, group_id))
            .or_insert_with(|| PhotoList {
                collection_id: collection_id.to_string(),
                group_id: group_id.to_string(),
                photos: Vec::new(),
            });
        list.photos.push(record);
        let len = list.photos.len();
        self.save(&table)?;
        Ok(len)
    }
}
