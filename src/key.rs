//! Storage key parsing for the `collection/group/item` convention.
//!
//! Every object that lands in the staging store is addressed by a three-part
//! key. The first two segments identify the entity the photo belongs to, the
//! last is the photo itself and keeps its file extension:
//!
//! ```text
//! a1/m2/p3.jpg
//! ^^ ^^ ^^^^^^
//! |  |  item id (published record id)
//! |  group id
//! collection id
//! ```
//!
//! Keys with any other shape are rejected up front instead of flowing
//! downstream as empty ids.

use std::fmt;
use thiserror::Error;

const SEPARATOR: char = '/';

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("key '{key}' has {segments} segments, expected collection/group/item")]
    WrongShape { key: String, segments: usize },
    #[error("key '{0}' has an empty segment")]
    EmptySegment(String),
}

/// Logical identity of a staged photo, derived from its storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub collection_id: String,
    pub group_id: String,
    /// Photo id including its extension (e.g. `p3.jpg`).
    pub item_id: String,
}

impl SourceKey {
    /// Parse a storage key of the form `"<collection>/<group>/<item.ext>"`.
    ///
    /// - `"a1/m2/p3.jpg"` → collection=`a1`, group=`m2`, item=`p3.jpg`
    /// - `"a1/p3.jpg"` → [`KeyError::WrongShape`]
    /// - `"a1//p3.jpg"` → [`KeyError::EmptySegment`]
    pub fn parse(key: &str) -> Result<Self, KeyError> {
        let segments: Vec<&str> = key.split(SEPARATOR).collect();
        let [collection, group, item] = segments.as_slice() else {
            return Err(KeyError::WrongShape {
                key: key.to_string(),
                segments: segments.len(),
            });
        };
        if collection.is_empty() || group.is_empty() || item.is_empty() {
            return Err(KeyError::EmptySegment(key.to_string()));
        }
        Ok(Self {
            collection_id: collection.to_string(),
            group_id: group.to_string(),
            item_id: item.to_string(),
        })
    }

    /// Rebuild the storage key. Staging and serving objects share it.
    pub fn path(&self) -> String {
        format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            self.collection_id, self.group_id, self.item_id
        )
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
