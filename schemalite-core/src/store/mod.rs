// store/mod.rs
//! Collection-handle abstraction consumed by the schema core.
//!
//! The schema core never owns data; it issues index, introspection and
//! rewrite operations against whatever implements [`DocumentStore`]. The
//! single in-tree implementation is [`MemoryStore`].

use serde_json::Value;

use crate::document::{Document, DocumentId};
use crate::error::Result;
use crate::index::IndexSpec;

mod memory;

pub use memory::MemoryStore;

/// Options for collection creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCollectionOptions {
    /// Fixed-size collection that recycles space
    pub capped: bool,
    /// Maximum size in bytes (capped collections)
    pub size: Option<u64>,
    /// Maximum document count (capped collections)
    pub max: Option<u64>,
}

/// Store-reported storage statistics for one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStats {
    pub name: String,
    /// Storage size in bytes, not document count
    pub size_bytes: u64,
}

/// The narrow interface a document store must expose to the schema core.
///
/// Write paths auto-create the target collection, matching document-store
/// behavior where a collection materializes on first write. Read paths
/// surface `CollectionNotFound`; the schema core maps that to empty results
/// on every introspection call.
pub trait DocumentStore: Send + Sync {
    /// Create a collection up front, optionally capped. Fails with
    /// `CollectionExists` when the name is already taken.
    fn create_collection(&self, name: &str, options: CreateCollectionOptions) -> Result<()>;

    /// Drop a collection and everything in it; no-op when absent
    fn drop_collection(&self, name: &str) -> Result<()>;

    fn has_collection(&self, name: &str) -> bool;

    fn collection_names(&self) -> Vec<String>;

    /// Storage statistics for every collection in the database
    fn collection_stats(&self) -> Vec<CollectionStats>;

    /// Insert a document, assigning an identity when the value has none.
    /// Auto-creates the collection.
    fn insert_document(&self, collection: &str, doc: Value) -> Result<DocumentId>;

    /// Replace the document with the given identity in one atomic step
    fn replace_document(&self, collection: &str, id: &DocumentId, doc: Document) -> Result<()>;

    /// Documents in stored order, bounded by `limit` when given. No
    /// snapshot guarantee; concurrent writers may or may not be visible.
    fn documents(&self, collection: &str, limit: Option<usize>) -> Result<Vec<Document>>;

    /// Raw index specs including the implicit identity index
    fn index_specs(&self, collection: &str) -> Result<Vec<IndexSpec>>;

    /// Register an index spec. Auto-creates the collection. Last-applied
    /// wins on a name collision; conflict detection lives in the
    /// `IndexManager` above this call.
    fn create_index(&self, collection: &str, spec: IndexSpec) -> Result<()>;

    /// Remove an index by exact name; returns whether one was removed
    fn drop_index(&self, collection: &str, name: &str) -> Result<bool>;
}

/// Store that refuses to rewrite one document id, for exercising the
/// per-document failure paths of rename and blueprint flushes
#[cfg(test)]
pub(crate) struct RejectingStore {
    pub inner: MemoryStore,
    pub reject: DocumentId,
}

#[cfg(test)]
impl RejectingStore {
    pub fn rejecting(reject: DocumentId) -> Self {
        RejectingStore {
            inner: MemoryStore::new(),
            reject,
        }
    }
}

#[cfg(test)]
impl DocumentStore for RejectingStore {
    fn create_collection(&self, name: &str, options: CreateCollectionOptions) -> Result<()> {
        self.inner.create_collection(name, options)
    }

    fn drop_collection(&self, name: &str) -> Result<()> {
        self.inner.drop_collection(name)
    }

    fn has_collection(&self, name: &str) -> bool {
        self.inner.has_collection(name)
    }

    fn collection_names(&self) -> Vec<String> {
        self.inner.collection_names()
    }

    fn collection_stats(&self) -> Vec<CollectionStats> {
        self.inner.collection_stats()
    }

    fn insert_document(&self, collection: &str, doc: Value) -> Result<DocumentId> {
        self.inner.insert_document(collection, doc)
    }

    fn replace_document(&self, collection: &str, id: &DocumentId, doc: Document) -> Result<()> {
        if id == &self.reject {
            return Err(crate::error::SchemaLiteError::DocumentNotFound(
                id.to_string(),
            ));
        }
        self.inner.replace_document(collection, id, doc)
    }

    fn documents(&self, collection: &str, limit: Option<usize>) -> Result<Vec<Document>> {
        self.inner.documents(collection, limit)
    }

    fn index_specs(&self, collection: &str) -> Result<Vec<IndexSpec>> {
        self.inner.index_specs(collection)
    }

    fn create_index(&self, collection: &str, spec: IndexSpec) -> Result<()> {
        self.inner.create_index(collection, spec)
    }

    fn drop_index(&self, collection: &str, name: &str) -> Result<bool> {
        self.inner.drop_index(collection, name)
    }
}
