//! Trigger payload parsing.
//!
//! The worker is started by an object-created notification in the usual
//! bucket-notification shape:
//!
//! ```json
//! { "Records": [ { "s3": { "object": { "key": "a1/m2/p3.jpg", "size": 81234 } } } ] }
//! ```
//!
//! Only the object key is used. Unknown fields are ignored so full
//! notifications (event names, bucket info, timestamps) parse as-is.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Event contains no records")]
    NoRecords,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerEvent {
    #[serde(rename = "Records")]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "s3")]
    pub storage: StorageEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageEntity {
    pub object: StoredObject,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoredObject {
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl TriggerEvent {
    /// Synthesize an event for a single key.
    pub fn for_key(key: impl Into<String>) -> Self {
        Self {
            records: vec![EventRecord {
                storage: StorageEntity {
                    object: StoredObject {
                        key: key.into(),
                        size: None,
                    },
                },
            }],
        }
    }

    /// Object keys in delivery order.
    pub fn keys(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|r| r.storage.object.key.as_str())
            .collect()
    }
}

/// Parse a trigger payload. An event without records is rejected.
pub fn parse_event(json: &str) -> Result<TriggerEvent, EventError> {
    let event: TriggerEvent = serde_json::from_str(json)?;
    if event.records.is_empty() {
        return Err(EventError::NoRecords);
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_event() {
        let event = parse_event(r#"{"Records":[{"s3":{"object":{"key":"a1/m2/p3.jpg"}}}]}"#)
            .unwrap();
        assert_eq!(event.keys(), vec!["a1/m2/p3.jpg"]);
        assert_eq!(event.records[0].storage.object.size, None);
    }

    #[test]
    fn ignores_unrelated_notification_fields() {
        let json = r#"{
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "staging" },
                    "object": { "key": "a1/m2/p3.jpg", "size": 81234, "eTag": "abc" }
                }
            }]
        }"#;
        let event = parse_event(json).unwrap();
        assert_eq!(event.keys(), vec!["a1/m2/p3.jpg"]);
        assert_eq!(event.records[0].storage.object.size, Some(81234));
    }

    #[test]
    fn keeps_record_order() {
        let json = r#"{"Records":[
            {"s3":{"object":{"key":"a/b/1.jpg"}}},
            {"s3":{"object":{"key":"a/b/2.jpg"}}}
        ]}"#;
        assert_eq!(parse_event(json).unwrap().keys(), vec!["a/b/1.jpg", "a/b/2.jpg"]);
    }

    #[test]
    fn empty_records_rejected() {
        assert!(matches!(
            parse_event(r#"{"Records":[]}"#),
            Err(EventError::NoRecords)
        ));
    }

    #[test]
    fn missing_key_is_json_error() {
        assert!(matches!(
            parse_event(r#"{"Records":[{"s3":{"object":{}}}]}"#),
            Err(EventError::Json(_))
        ));
        assert!(matches!(parse_event("not json"), Err(EventError::Json(_))));
    }

    #[test]
    fn for_key_builds_single_record() {
        assert_eq!(TriggerEvent::for_key("a/b/c.jpg").keys(), vec!["a/b/c.jpg"]);
    }
}
