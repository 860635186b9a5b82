// store/memory.rs
//! In-memory document store backing the schema core.
//!
//! All state lives behind one `parking_lot::RwLock`; every trait call is a
//! single lock acquisition, which gives the per-call atomicity the schema
//! core relies on (and nothing more).

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::document::{Document, DocumentId};
use crate::error::{Result, SchemaLiteError};
use crate::index::IndexSpec;
use crate::store::{CollectionStats, CreateCollectionOptions, DocumentStore};

#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<Document>,
    indexes: Vec<IndexSpec>,
    options: CreateCollectionOptions,
}

/// In-memory store-family implementation
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Creation options recorded for a collection, if it exists
    pub fn collection_options(&self, name: &str) -> Option<CreateCollectionOptions> {
        self.collections.read().get(name).map(|c| c.options.clone())
    }
}

impl DocumentStore for MemoryStore {
    fn create_collection(&self, name: &str, options: CreateCollectionOptions) -> Result<()> {
        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(SchemaLiteError::CollectionExists(name.to_string()));
        }
        collections.insert(
            name.to_string(),
            MemoryCollection {
                options,
                ..MemoryCollection::default()
            },
        );
        Ok(())
    }

    fn drop_collection(&self, name: &str) -> Result<()> {
        self.collections.write().remove(name);
        Ok(())
    }

    fn has_collection(&self, name: &str) -> bool {
        self.collections.read().contains_key(name)
    }

    fn collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    fn collection_stats(&self) -> Vec<CollectionStats> {
        self.collections
            .read()
            .iter()
            .map(|(name, collection)| {
                let size_bytes: u64 = collection
                    .documents
                    .iter()
                    .map(|doc| serde_json::to_string(doc).map_or(0, |s| s.len() as u64))
                    .sum();
                CollectionStats {
                    name: name.clone(),
                    size_bytes,
                }
            })
            .collect()
    }

    fn insert_document(&self, collection: &str, doc: Value) -> Result<DocumentId> {
        let obj = match doc {
            Value::Object(map) => map,
            other => {
                return Err(SchemaLiteError::InvalidDocument(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };

        let document = if obj.contains_key("_id") {
            Document::from_value(Value::Object(obj))
                .map_err(|e| SchemaLiteError::InvalidDocument(format!("unusable _id: {}", e)))?
        } else {
            Document::new(DocumentId::new_object_id(), obj)
        };
        let id = document.id.clone();

        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .documents
            .push(document);
        Ok(id)
    }

    fn replace_document(&self, collection: &str, id: &DocumentId, doc: Document) -> Result<()> {
        let mut collections = self.collections.write();
        let coll = collections
            .get_mut(collection)
            .ok_or_else(|| SchemaLiteError::CollectionNotFound(collection.to_string()))?;

        let slot = coll
            .documents
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| SchemaLiteError::DocumentNotFound(id.to_string()))?;
        *slot = doc;
        Ok(())
    }

    fn documents(&self, collection: &str, limit: Option<usize>) -> Result<Vec<Document>> {
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| SchemaLiteError::CollectionNotFound(collection.to_string()))?;

        let bound = limit.unwrap_or(usize::MAX);
        Ok(coll.documents.iter().take(bound).cloned().collect())
    }

    fn index_specs(&self, collection: &str) -> Result<Vec<IndexSpec>> {
        let collections = self.collections.read();
        let coll = collections
            .get(collection)
            .ok_or_else(|| SchemaLiteError::CollectionNotFound(collection.to_string()))?;

        let mut specs = Vec::with_capacity(coll.indexes.len() + 1);
        specs.push(IndexSpec::implicit_id_index());
        specs.extend(coll.indexes.iter().cloned());
        Ok(specs)
    }

    fn create_index(&self, collection: &str, spec: IndexSpec) -> Result<()> {
        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();

        // Last-applied-wins on a raw name collision
        coll.indexes.retain(|existing| existing.name != spec.name);
        coll.indexes.push(spec);
        Ok(())
    }

    fn drop_index(&self, collection: &str, name: &str) -> Result<bool> {
        let mut collections = self.collections.write();
        let coll = match collections.get_mut(collection) {
            Some(coll) => coll,
            None => return Ok(false),
        };

        let before = coll.indexes.len();
        coll.indexes.retain(|spec| spec.name != name);
        Ok(coll.indexes.len() < before)
    }
}
