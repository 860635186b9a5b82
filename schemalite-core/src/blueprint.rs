// schemalite-core/src/blueprint.rs
// Fluent schema-change session for one collection: directives accumulate in
// call order and flush at commit, each one applied independently.

use crate::error::Result;
use crate::index::{IndexKeys, IndexManager, IndexSpec, IndexTarget};
use crate::{log_trace, log_warn};
use crate::rename::RenameOperator;
use crate::store::DocumentStore;

/// Option flags attached to one index directive
#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub name: Option<String>,
    pub unique: bool,
    pub sparse: bool,
    pub ttl_seconds: Option<u64>,
}

/// One recorded fluent call, applied at flush time
#[derive(Debug, Clone)]
enum Directive {
    AddIndex {
        keys: IndexKeys,
        options: IndexOptions,
    },
    /// Geo kind kept raw; validation happens at flush so a bad kind aborts
    /// the commit like any other directive failure
    AddGeoIndex {
        field: String,
        kind: String,
    },
    DropIndex {
        target: IndexTarget,
        if_exists: bool,
    },
    RenameColumn {
        from: String,
        to: String,
    },
}

/// Stateful accumulator a caller mutates during one schema-change session.
///
/// Directives are flushed in order when the session commits. A failing
/// directive aborts the rest of the flush; directives already applied stay
/// applied, there is no rollback.
pub struct Blueprint<'a, S: DocumentStore> {
    store: &'a S,
    collection: String,
    pending: Vec<Directive>,
}

impl<'a, S: DocumentStore> Blueprint<'a, S> {
    pub(crate) fn new(store: &'a S, collection: &str) -> Self {
        Blueprint {
            store,
            collection: collection.to_string(),
            pending: Vec::new(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    // ========== index directives ==========

    /// Plain index; single-field shorthand is ascending on that field
    pub fn index<K: Into<IndexKeys>>(&mut self, keys: K) -> &mut Self {
        self.index_with(keys, IndexOptions::default())
    }

    /// Index under an explicit name instead of the deterministic default
    pub fn index_named<K: Into<IndexKeys>>(&mut self, keys: K, name: &str) -> &mut Self {
        self.index_with(
            keys,
            IndexOptions {
                name: Some(name.to_string()),
                ..IndexOptions::default()
            },
        )
    }

    /// Index with the full option set
    pub fn index_with<K: Into<IndexKeys>>(&mut self, keys: K, options: IndexOptions) -> &mut Self {
        self.pending.push(Directive::AddIndex {
            keys: keys.into(),
            options,
        });
        self
    }

    pub fn unique<K: Into<IndexKeys>>(&mut self, keys: K) -> &mut Self {
        self.index_with(
            keys,
            IndexOptions {
                unique: true,
                ..IndexOptions::default()
            },
        )
    }

    pub fn sparse<K: Into<IndexKeys>>(&mut self, keys: K) -> &mut Self {
        self.index_with(
            keys,
            IndexOptions {
                sparse: true,
                ..IndexOptions::default()
            },
        )
    }

    pub fn sparse_and_unique<K: Into<IndexKeys>>(&mut self, keys: K) -> &mut Self {
        self.index_with(
            keys,
            IndexOptions {
                sparse: true,
                unique: true,
                ..IndexOptions::default()
            },
        )
    }

    /// TTL index: documents expire `seconds` after the field's value
    pub fn expire(&mut self, field: &str, seconds: u64) -> &mut Self {
        self.index_with(
            field.to_string(),
            IndexOptions {
                ttl_seconds: Some(seconds),
                ..IndexOptions::default()
            },
        )
    }

    /// Geospatial index of the default `2d` kind
    pub fn geospatial(&mut self, field: &str) -> &mut Self {
        self.geospatial_with(field, "2d")
    }

    /// Geospatial index of an explicit kind (`2d` or `2dsphere`)
    pub fn geospatial_with(&mut self, field: &str, kind: &str) -> &mut Self {
        self.pending.push(Directive::AddGeoIndex {
            field: field.to_string(),
            kind: kind.to_string(),
        });
        self
    }

    /// Strict drop by name or key set
    pub fn drop_index<T: Into<IndexTarget>>(&mut self, target: T) -> &mut Self {
        self.pending.push(Directive::DropIndex {
            target: target.into(),
            if_exists: false,
        });
        self
    }

    /// Drop that no-ops when the index is absent
    pub fn drop_index_if_exists<T: Into<IndexTarget>>(&mut self, target: T) -> &mut Self {
        self.pending.push(Directive::DropIndex {
            target: target.into(),
            if_exists: true,
        });
        self
    }

    /// Immediate existence check by resolved name.
    ///
    /// Flushes all pending directives first so the answer reflects every
    /// fluent call made earlier in this session.
    pub fn has_index<T: Into<IndexTarget>>(&mut self, target: T) -> Result<bool> {
        self.flush()?;
        IndexManager::new(self.store, &self.collection).has_index(target)
    }

    // ========== column directives ==========

    /// Bulk-rename a field across every document in the collection
    pub fn rename_column(&mut self, from: &str, to: &str) -> &mut Self {
        self.pending.push(Directive::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    // ========== commit ==========

    /// Flush everything still pending; the session is consumed
    pub(crate) fn commit(mut self) -> Result<()> {
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        let manager = IndexManager::new(self.store, &self.collection);

        for directive in self.pending.drain(..) {
            log_trace!("Applying directive on '{}': {:?}", self.collection, directive);
            match directive {
                Directive::AddIndex { keys, options } => {
                    let mut builder = IndexSpec::builder(keys);
                    if let Some(name) = &options.name {
                        builder = builder.name(name);
                    }
                    if options.unique {
                        builder = builder.unique();
                    }
                    if options.sparse {
                        builder = builder.sparse();
                    }
                    if let Some(seconds) = options.ttl_seconds {
                        builder = builder.ttl(seconds);
                    }
                    manager.create_index(builder.build()?)?;
                }
                Directive::AddGeoIndex { field, kind } => {
                    manager.create_index(IndexSpec::geospatial(&field, &kind)?)?;
                }
                Directive::DropIndex { target, if_exists } => {
                    if if_exists {
                        manager.drop_index_if_exists(target)?;
                    } else {
                        manager.drop_index(target)?;
                    }
                }
                Directive::RenameColumn { from, to } => {
                    // Per-document failures do not abort the flush; only
                    // store-level errors do.
                    let outcome = RenameOperator::new(self.store, &self.collection)
                        .rename_column(&from, &to)?;
                    if !outcome.failures.is_empty() {
                        log_warn!(
                            "Rename '{}' -> '{}' on '{}' left {} of {} document(s) unrenamed",
                            from,
                            to,
                            self.collection,
                            outcome.failures.len(),
                            outcome.renamed + outcome.failures.len()
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
