// schemalite-core/src/schema.rs
// Schema facade: session entry points plus read-only introspection.
// Introspection on an unknown collection always yields empty results.

use crate::blueprint::Blueprint;
use crate::catalog::{CatalogReporter, TableInfo};
use crate::columns::{ColumnDescriptor, ColumnIntrospector, DEFAULT_SAMPLE_SIZE};
use crate::error::Result;
use crate::index::{IndexDescriptor, IndexManager};
use crate::log_info;
use crate::store::{CreateCollectionOptions, DocumentStore};

/// Entry point for schema-change sessions and introspection over one store
pub struct Schema<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> Schema<S> {
    pub fn new(store: S) -> Self {
        Schema { store }
    }

    /// The underlying store handle
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========== session entry points ==========

    /// Create a collection with default options and no configuration step
    pub fn create(&self, name: &str) -> Result<()> {
        self.store
            .create_collection(name, CreateCollectionOptions::default())?;
        log_info!("Created collection '{}'", name);
        Ok(())
    }

    /// Create a collection, then run a configuration step against a fresh
    /// blueprint session and commit it
    pub fn create_with<F>(&self, name: &str, configure: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint<'_, S>) -> Result<()>,
    {
        self.create(name)?;
        self.table(name, configure)
    }

    /// Create a collection with explicit options (capped, size, max)
    pub fn create_with_options(&self, name: &str, options: CreateCollectionOptions) -> Result<()> {
        self.store.create_collection(name, options)?;
        log_info!("Created collection '{}' with options", name);
        Ok(())
    }

    /// Create with explicit options, then configure and commit
    pub fn create_configured<F>(
        &self,
        name: &str,
        options: CreateCollectionOptions,
        configure: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut Blueprint<'_, S>) -> Result<()>,
    {
        self.create_with_options(name, options)?;
        self.table(name, configure)
    }

    /// Drop a collection; no-op when absent
    pub fn drop(&self, name: &str) -> Result<()> {
        self.store.drop_collection(name)
    }

    /// Open a blueprint session on an existing (or implicitly created)
    /// collection, run the configuration step, commit.
    ///
    /// An `Err` from the configuration step aborts the commit: directives
    /// still pending are discarded, directives already flushed (for example
    /// through an in-session `has_index` probe) stay applied.
    pub fn table<F>(&self, name: &str, configure: F) -> Result<()>
    where
        F: FnOnce(&mut Blueprint<'_, S>) -> Result<()>,
    {
        let mut blueprint = Blueprint::new(&self.store, name);
        configure(&mut blueprint)?;
        blueprint.commit()
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.store.has_collection(name)
    }

    /// Relational-vocabulary alias of `has_collection`
    pub fn has_table(&self, name: &str) -> bool {
        self.has_collection(name)
    }

    // ========== introspection entry points ==========

    /// Inferred columns from a default-size sample; identity column first.
    /// Empty for a missing or empty collection.
    pub fn get_columns(&self, name: &str) -> Result<Vec<ColumnDescriptor>> {
        self.get_columns_with_sample(name, DEFAULT_SAMPLE_SIZE)
    }

    pub fn get_columns_with_sample(
        &self,
        name: &str,
        sample_size: usize,
    ) -> Result<Vec<ColumnDescriptor>> {
        ColumnIntrospector::new(&self.store).get_columns(name, sample_size)
    }

    /// True iff the sampled collection shape shows the field
    pub fn has_column(&self, name: &str, field: &str) -> Result<bool> {
        Ok(self
            .get_columns(name)?
            .iter()
            .any(|column| column.name == field))
    }

    /// True iff every listed field appears in the sampled shape
    pub fn has_columns(&self, name: &str, fields: &[&str]) -> Result<bool> {
        let columns = self.get_columns(name)?;
        Ok(fields
            .iter()
            .all(|field| columns.iter().any(|column| &column.name == field)))
    }

    /// Normalized index descriptors; empty for a missing collection
    pub fn get_indexes(&self, name: &str) -> Result<Vec<IndexDescriptor>> {
        IndexManager::new(&self.store, name).list_indexes()
    }

    /// Every collection with its storage size
    pub fn get_tables(&self) -> Vec<TableInfo> {
        CatalogReporter::new(&self.store).get_tables()
    }

    /// Collection names only
    pub fn get_table_listing(&self) -> Vec<String> {
        CatalogReporter::new(&self.store).get_table_listing()
    }
}
