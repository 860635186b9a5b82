// schemalite-core/src/document.rs
// Self-describing document value model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// A schema-less document: a store-assigned identity plus arbitrary fields.
///
/// `fields` keeps insertion order (serde_json `preserve_order`), so column
/// introspection sees fields in the order documents carry them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Document identity.
///
/// Untagged so it appears as a plain value in serialized documents:
/// `{"_id": 2}` or `{"_id": "9f8c..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum DocumentId {
    Int(i64),
    String(String),
    ObjectId(String),
}

impl DocumentId {
    /// Generate a fresh store-assigned identity (UUID v4)
    pub fn new_object_id() -> Self {
        DocumentId::ObjectId(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentId::Int(n) => write!(f, "{}", n),
            DocumentId::String(s) | DocumentId::ObjectId(s) => write!(f, "{}", s),
        }
    }
}

impl Document {
    pub fn new(id: DocumentId, fields: Map<String, Value>) -> Self {
        Document { id, fields }
    }

    /// Build a document from a JSON value.
    ///
    /// `_id` is consumed into `id` by the rename + flatten combination and
    /// does not show up in `fields`.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Field lookup; `_id` lives in `id`, not in `fields`
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: String, value: Value) {
        self.fields.insert(field, value);
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// The identity as a JSON value
    pub fn id_value(&self) -> Value {
        serde_json::to_value(&self.id).unwrap_or(Value::Null)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        let mut map = Map::new();
        map.insert("_id".to_string(), doc.id_value());
        for (k, v) in doc.fields {
            map.insert(k, v);
        }
        Value::Object(map)
    }
}
