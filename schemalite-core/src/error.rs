// schemalite-core/src/error.rs
// Error taxonomy for schema and index operations

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SchemaLiteError>;

#[derive(Error, Debug)]
pub enum SchemaLiteError {
    /// Malformed index directive: empty key set or unrecognized geo kind
    #[error("Invalid index spec: {0}")]
    InvalidSpec(String),

    /// Strict drop/lookup against an index that does not exist
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// An index with the same name already exists with a different key pattern
    #[error("Index name conflict on '{name}': existing key pattern {existing}, requested {requested}")]
    IndexNameConflict {
        name: String,
        existing: String,
        requested: String,
    },

    /// Store-level absence of a collection.
    ///
    /// Read-side introspection never surfaces this to callers; it is mapped
    /// to an empty result instead.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    /// A document disappeared between scan and rewrite
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// A document is not a JSON object, or carries an unusable _id
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
