//! Document store collaborator.
//!
//! The service layer talks to a hosted-document-database shaped trait;
//! the shipped backend persists each collection as one JSON file. Tests
//! substitute [`MemoryStore`].

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The JSON fields of one document, excluding its id.
pub type Fields = serde_json::Map<String, Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document '{0}' not found")]
    NotFound(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// A single stored document: a store-assigned id plus its JSON fields.
///
/// Collections may contain legacy bare-string entries (historical skills
/// data); those deserialize to an id-less document with a single `name`
/// field.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    #[must_use]
    pub fn new(id: String, fields: Fields) -> Self {
        Self { id, fields }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(mut fields) => {
                let id = match fields.remove("id") {
                    Some(Value::String(id)) => id,
                    _ => String::new(),
                };
                Ok(Self { id, fields })
            }
            Value::String(name) => {
                let mut fields = Fields::new();
                fields.insert("name".to_string(), Value::String(name));
                Ok(Self {
                    id: String::new(),
                    fields,
                })
            }
            other => Err(D::Error::custom(format!(
                "expected a document object or legacy string, got {other}"
            ))),
        }
    }
}

/// One operation inside an atomic batch.
#[derive(Debug, Clone)]
pub enum BatchOp {
    /// Upsert: overwrite the document with this id, or append it.
    Put { id: String, fields: Fields },
    /// Remove the document with this id; the whole batch fails if absent.
    Delete { id: String },
}

/// Persistence collaborator for one set of document collections.
///
/// Arrival order of documents inside a collection is preserved and
/// observable through [`DocumentStore::read_all`]. `apply_batch` and
/// `replace_all` are atomic: on failure the collection is unchanged.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every document; an absent collection is an empty list.
    async fn read_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetch a single document by id.
    async fn read(&self, collection: &str, id: &str) -> Result<Document, StoreError>;

    /// Append a document, assigning its id.
    async fn insert(&self, collection: &str, fields: Fields) -> Result<Document, StoreError>;

    /// Overwrite an existing document's fields.
    async fn write(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Remove a document by id.
    async fn remove(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Apply a multi-document batch atomically: all ops or none.
    async fn apply_batch(&self, collection: &str, ops: Vec<BatchOp>) -> Result<(), StoreError>;

    /// Atomically swap the entire collection contents, assigning fresh ids.
    async fn replace_all(
        &self,
        collection: &str,
        docs: Vec<Fields>,
    ) -> Result<Vec<Document>, StoreError>;
}

/// Serialize a record into a fields map, dropping any `id` key.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            map.remove("id");
            Ok(map)
        }
        _ => Err(StoreError::Json(serde_json::Error::custom(
            "record did not serialize to a JSON object",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_deserializes_object_with_id() {
        let doc: Document =
            serde_json::from_str(r#"{"id": "abc", "title": "X", "order": 2}"#).unwrap();
        assert_eq!(doc.id, "abc");
        assert_eq!(doc.fields.get("title").unwrap(), "X");
        assert!(doc.fields.get("id").is_none(), "id never lives in fields");
    }

    #[test]
    fn test_document_deserializes_legacy_string() {
        let doc: Document = serde_json::from_str(r#""TypeScript""#).unwrap();
        assert!(doc.id.is_empty());
        assert_eq!(doc.fields.get("name").unwrap(), "TypeScript");
    }

    #[test]
    fn test_document_rejects_scalars() {
        let result: Result<Document, _> = serde_json::from_str("42");
        assert!(result.is_err());
    }

    #[test]
    fn test_document_serializes_id_at_top_level() {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), Value::String("Rust".to_string()));
        let doc = Document::new("abc".to_string(), fields);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["name"], "Rust");
    }

    #[test]
    fn test_to_fields_strips_id() {
        let value = serde_json::json!({"id": "abc", "title": "X"});
        let fields = to_fields(&value).unwrap();
        assert!(fields.get("id").is_none());
        assert_eq!(fields.get("title").unwrap(), "X");
    }

    #[test]
    fn test_to_fields_rejects_non_objects() {
        assert!(to_fields(&"just a string").is_err());
    }
}
