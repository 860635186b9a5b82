// schemalite-core/src/catalog.rs
// Database-wide catalog reporting: collection names and storage stats

use serde::Serialize;

use crate::store::DocumentStore;

/// One collection in the database with its store-reported storage size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub size_bytes: u64,
}

/// Enumerates collections and their storage statistics.
///
/// Only real collections appear; the store trait does not surface views or
/// other catalog entries.
pub struct CatalogReporter<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> CatalogReporter<'a, S> {
    pub fn new(store: &'a S) -> Self {
        CatalogReporter { store }
    }

    /// Every collection with its size in bytes, sorted by name
    pub fn get_tables(&self) -> Vec<TableInfo> {
        let mut tables: Vec<TableInfo> = self
            .store
            .collection_stats()
            .into_iter()
            .map(|stats| TableInfo {
                name: stats.name,
                size_bytes: stats.size_bytes,
            })
            .collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name));
        tables
    }

    /// Collection names only, sorted
    pub fn get_table_listing(&self) -> Vec<String> {
        let mut names = self.store.collection_names();
        names.sort();
        names
    }
}
