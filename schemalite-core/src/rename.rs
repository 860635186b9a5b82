// schemalite-core/src/rename.rs
// Bulk field rename by per-document rewrite; no collection-wide lock,
// no all-or-nothing guarantee.

use crate::document::DocumentId;
use crate::error::{Result, SchemaLiteError};
use crate::store::DocumentStore;
use crate::{log_debug, log_warn};

/// One document that could not be rewritten
#[derive(Debug, Clone)]
pub struct RenameFailure {
    pub id: DocumentId,
    pub error: String,
}

/// Result of a rename pass over a collection
#[derive(Debug, Clone, Default)]
pub struct RenameOutcome {
    /// Documents successfully rewritten
    pub renamed: usize,
    /// Per-document failures; the pass continues past each one
    pub failures: Vec<RenameFailure>,
}

/// Rewrites every document holding a field so it carries the new name
pub struct RenameOperator<'a, S: DocumentStore> {
    store: &'a S,
    collection: &'a str,
}

impl<'a, S: DocumentStore> RenameOperator<'a, S> {
    pub fn new(store: &'a S, collection: &'a str) -> Self {
        RenameOperator { store, collection }
    }

    /// Rename `from` to `to` in every document that has `from` set,
    /// null values included. Documents without `from` are untouched and
    /// never gain `to`. Each rewrite is atomic in isolation; a failing
    /// document is recorded and the pass moves on.
    pub fn rename_column(&self, from: &str, to: &str) -> Result<RenameOutcome> {
        let docs = match self.store.documents(self.collection, None) {
            Ok(docs) => docs,
            Err(SchemaLiteError::CollectionNotFound(_)) => return Ok(RenameOutcome::default()),
            Err(e) => return Err(e),
        };

        let mut outcome = RenameOutcome::default();
        for mut doc in docs {
            if !doc.contains(from) {
                continue;
            }

            let value = match doc.remove(from) {
                Some(value) => value,
                None => continue,
            };
            doc.set(to.to_string(), value);

            let id = doc.id.clone();
            match self.store.replace_document(self.collection, &id, doc) {
                Ok(()) => outcome.renamed += 1,
                Err(e) => {
                    log_warn!(
                        "Rename '{}' -> '{}' failed for document {} in '{}': {}",
                        from,
                        to,
                        id,
                        self.collection,
                        e
                    );
                    outcome.failures.push(RenameFailure {
                        id,
                        error: e.to_string(),
                    });
                }
            }
        }

        log_debug!(
            "Renamed '{}' -> '{}' in {} document(s) of '{}' ({} failure(s))",
            from,
            to,
            outcome.renamed,
            self.collection,
            outcome.failures.len()
        );
        Ok(outcome)
    }
}
