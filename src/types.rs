//! Shared types that cross the crate boundary as JSON.
//!
//! [`PhotoRecord`] is what the record store keeps per photo; [`Response`] is
//! what a successful run hands back to whoever delivered the trigger.

use serde::{Deserialize, Serialize};

/// One entry in a collection/group photo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    /// Item id including its extension, e.g. `p3.jpg`.
    pub id: String,
    /// Caption shown next to the photo. New photos start without one.
    #[serde(default)]
    pub legend: String,
}

impl PhotoRecord {
    /// Record for a freshly published photo.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            legend: String::new(),
        }
    }
}

/// Success payload: `{ "statusCode": 200, "body": { "key": "..." } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: ResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub key: String,
}

impl Response {
    pub fn ok(key: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: ResponseBody { key: key.into() },
        }
    }
}
