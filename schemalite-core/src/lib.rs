// schemalite-core/src/lib.rs
// Schema introspection and index management core for schema-less document
// stores: declarative index/collection vocabulary plus sampled column
// inference, on top of a narrow store abstraction.

pub mod blueprint;
pub mod catalog;
pub mod columns;
pub mod document;
pub mod error;
pub mod index;
pub mod logging;
pub mod rename;
pub mod schema;
pub mod store;

// Public exports
pub use blueprint::{Blueprint, IndexOptions};
pub use catalog::{CatalogReporter, TableInfo};
pub use columns::{
    ColumnDescriptor, ColumnGeneration, ColumnIntrospector, ValueKind, DEFAULT_SAMPLE_SIZE,
};
pub use document::{Document, DocumentId};
pub use error::{Result, SchemaLiteError};
pub use index::{
    default_index_name, IndexDescriptor, IndexDirection, IndexKeys, IndexManager, IndexSpec,
    IndexSpecBuilder, IndexTarget, ID_INDEX_NAME,
};
pub use logging::{get_log_level, set_log_level, LogLevel};
pub use rename::{RenameFailure, RenameOperator, RenameOutcome};
pub use schema::Schema;
pub use store::{CollectionStats, CreateCollectionOptions, DocumentStore, MemoryStore};
