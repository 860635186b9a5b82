// schemalite-core/src/index.rs
// Index spec normalization, deterministic naming, and idempotent apply/drop

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaLiteError};
use crate::store::DocumentStore;
use crate::{log_debug, log_trace};

/// Name of the store's implicit identity index
pub const ID_INDEX_NAME: &str = "_id_";

/// Per-key direction or geospatial kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexDirection {
    Ascending,
    Descending,
    TwoD,
    TwoDSphere,
}

impl IndexDirection {
    /// The token used in default index names: `1`, `-1`, `2d`, `2dsphere`
    pub fn name_token(&self) -> &'static str {
        match self {
            IndexDirection::Ascending => "1",
            IndexDirection::Descending => "-1",
            IndexDirection::TwoD => "2d",
            IndexDirection::TwoDSphere => "2dsphere",
        }
    }

    pub fn is_geo(&self) -> bool {
        matches!(self, IndexDirection::TwoD | IndexDirection::TwoDSphere)
    }

    /// Parse a geospatial kind string
    pub fn geo_kind(kind: &str) -> Result<Self> {
        match kind {
            "2d" => Ok(IndexDirection::TwoD),
            "2dsphere" => Ok(IndexDirection::TwoDSphere),
            other => Err(SchemaLiteError::InvalidSpec(format!(
                "Unrecognized geospatial kind '{}', expected '2d' or '2dsphere'",
                other
            ))),
        }
    }
}

/// Ordered key set for an index, as written by fluent callers.
///
/// Accepts a single field (ascending), a list of fields (all ascending), or
/// explicit (field, direction) pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexKeys(pub Vec<(String, IndexDirection)>);

impl From<&str> for IndexKeys {
    fn from(field: &str) -> Self {
        IndexKeys(vec![(field.to_string(), IndexDirection::Ascending)])
    }
}

impl From<String> for IndexKeys {
    fn from(field: String) -> Self {
        IndexKeys(vec![(field, IndexDirection::Ascending)])
    }
}

impl<const N: usize> From<[&str; N]> for IndexKeys {
    fn from(fields: [&str; N]) -> Self {
        IndexKeys(
            fields
                .iter()
                .map(|f| (f.to_string(), IndexDirection::Ascending))
                .collect(),
        )
    }
}

impl From<Vec<&str>> for IndexKeys {
    fn from(fields: Vec<&str>) -> Self {
        IndexKeys(
            fields
                .into_iter()
                .map(|f| (f.to_string(), IndexDirection::Ascending))
                .collect(),
        )
    }
}

impl<const N: usize> From<[(&str, IndexDirection); N]> for IndexKeys {
    fn from(keys: [(&str, IndexDirection); N]) -> Self {
        IndexKeys(keys.iter().map(|(f, d)| (f.to_string(), *d)).collect())
    }
}

impl From<Vec<(String, IndexDirection)>> for IndexKeys {
    fn from(keys: Vec<(String, IndexDirection)>) -> Self {
        IndexKeys(keys)
    }
}

/// Deterministic default index name: each key and its direction/kind token,
/// joined by underscores. `{field_a: -1, field_b: 1}` -> `field_a_-1_field_b_1`.
pub fn default_index_name(keys: &[(String, IndexDirection)]) -> String {
    let mut parts = Vec::with_capacity(keys.len() * 2);
    for (field, direction) in keys {
        parts.push(field.clone());
        parts.push(direction.name_token().to_string());
    }
    parts.join("_")
}

/// Render a key pattern for diagnostics: `{field_a: -1, field_b: 1}`
pub fn format_key_pattern(keys: &[(String, IndexDirection)]) -> String {
    let inner: Vec<String> = keys
        .iter()
        .map(|(f, d)| format!("{}: {}", f, d.name_token()))
        .collect();
    format!("{{{}}}", inner.join(", "))
}

/// Normalized index specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub keys: Vec<(String, IndexDirection)>,
    pub name: String,
    pub unique: bool,
    pub sparse: bool,
    pub ttl_seconds: Option<u64>,
}

impl IndexSpec {
    /// Ascending single-field / field-list / explicit-direction spec with
    /// default options. `InvalidSpec` on an empty key set.
    pub fn new<K: Into<IndexKeys>>(keys: K) -> Result<Self> {
        IndexSpec::builder(keys).build()
    }

    pub fn builder<K: Into<IndexKeys>>(keys: K) -> IndexSpecBuilder {
        IndexSpecBuilder {
            keys: keys.into(),
            name: None,
            unique: false,
            sparse: false,
            ttl_seconds: None,
        }
    }

    /// Geospatial spec: the key's "direction" is the geo kind itself
    pub fn geospatial(field: &str, kind: &str) -> Result<Self> {
        let direction = IndexDirection::geo_kind(kind)?;
        IndexSpec::builder(IndexKeys(vec![(field.to_string(), direction)])).build()
    }

    /// Ordered field list covered by this index
    pub fn columns(&self) -> Vec<String> {
        self.keys.iter().map(|(f, _)| f.clone()).collect()
    }

    /// Stable descriptive type string: "btree", or the geo kind for
    /// geospatial indexes
    pub fn index_type(&self) -> &'static str {
        for (_, direction) in &self.keys {
            if direction.is_geo() {
                return direction.name_token();
            }
        }
        "btree"
    }

    /// The store's implicit identity index, as every collection reports it
    pub fn implicit_id_index() -> Self {
        IndexSpec {
            keys: vec![("_id".to_string(), IndexDirection::Ascending)],
            name: ID_INDEX_NAME.to_string(),
            unique: true,
            sparse: false,
            ttl_seconds: None,
        }
    }
}

/// Fluent builder translating order-independent index directives into one
/// normalized `IndexSpec`
#[derive(Debug, Clone)]
pub struct IndexSpecBuilder {
    keys: IndexKeys,
    name: Option<String>,
    unique: bool,
    sparse: bool,
    ttl_seconds: Option<u64>,
}

impl IndexSpecBuilder {
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn sparse(mut self) -> Self {
        self.sparse = true;
        self
    }

    /// TTL: documents expire this many seconds after the indexed field's value
    pub fn ttl(mut self, seconds: u64) -> Self {
        self.ttl_seconds = Some(seconds);
        self
    }

    pub fn build(self) -> Result<IndexSpec> {
        let IndexKeys(keys) = self.keys;
        if keys.is_empty() {
            return Err(SchemaLiteError::InvalidSpec(
                "index requires at least one key".to_string(),
            ));
        }
        let name = self
            .name
            .unwrap_or_else(|| default_index_name(&keys));
        Ok(IndexSpec {
            keys,
            name,
            unique: self.unique,
            sparse: self.sparse,
            ttl_seconds: self.ttl_seconds,
        })
    }
}

/// Either an explicit index name or a key set from which the deterministic
/// name is recomputed. Drop and lookup resolve on the name only, never on
/// semantic key equivalence.
#[derive(Debug, Clone)]
pub enum IndexTarget {
    Name(String),
    Keys(IndexKeys),
}

impl IndexTarget {
    pub fn resolved_name(&self) -> String {
        match self {
            IndexTarget::Name(name) => name.clone(),
            IndexTarget::Keys(IndexKeys(keys)) => default_index_name(keys),
        }
    }
}

impl From<&str> for IndexTarget {
    fn from(name: &str) -> Self {
        IndexTarget::Name(name.to_string())
    }
}

impl From<String> for IndexTarget {
    fn from(name: String) -> Self {
        IndexTarget::Name(name)
    }
}

impl<const N: usize> From<[&str; N]> for IndexTarget {
    fn from(fields: [&str; N]) -> Self {
        IndexTarget::Keys(IndexKeys::from(fields))
    }
}

impl From<Vec<&str>> for IndexTarget {
    fn from(fields: Vec<&str>) -> Self {
        IndexTarget::Keys(IndexKeys::from(fields))
    }
}

impl<const N: usize> From<[(&str, IndexDirection); N]> for IndexTarget {
    fn from(keys: [(&str, IndexDirection); N]) -> Self {
        IndexTarget::Keys(IndexKeys::from(keys))
    }
}

impl From<IndexKeys> for IndexTarget {
    fn from(keys: IndexKeys) -> Self {
        IndexTarget::Keys(keys)
    }
}

/// Normalized row reported by `list_indexes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub index_type: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub primary: bool,
}

/// Applies, drops and queries index specifications against one collection.
///
/// Creation is idempotent: re-applying an identical spec is a no-op, while a
/// name collision with a different key pattern surfaces `IndexNameConflict`.
pub struct IndexManager<'a, S: DocumentStore> {
    store: &'a S,
    collection: &'a str,
}

impl<'a, S: DocumentStore> IndexManager<'a, S> {
    pub fn new(store: &'a S, collection: &'a str) -> Self {
        IndexManager { store, collection }
    }

    /// Idempotent create. Same name + same key pattern: no-op. Same name +
    /// different pattern: `IndexNameConflict`.
    pub fn create_index(&self, spec: IndexSpec) -> Result<()> {
        let existing = self.existing_specs()?;

        if let Some(prev) = existing.iter().find(|s| s.name == spec.name) {
            if prev.keys == spec.keys {
                log_debug!(
                    "Index '{}' already exists on '{}' with identical keys, skipping",
                    spec.name,
                    self.collection
                );
                return Ok(());
            }
            return Err(SchemaLiteError::IndexNameConflict {
                name: spec.name.clone(),
                existing: format_key_pattern(&prev.keys),
                requested: format_key_pattern(&spec.keys),
            });
        }

        log_debug!(
            "Creating index '{}' on '{}' ({})",
            spec.name,
            self.collection,
            format_key_pattern(&spec.keys)
        );
        self.store.create_index(self.collection, spec)
    }

    /// Strict drop: `IndexNotFound` when the resolved name does not exist.
    /// The implicit identity index is never droppable.
    pub fn drop_index<T: Into<IndexTarget>>(&self, target: T) -> Result<()> {
        let name = target.into().resolved_name();
        Self::reject_identity_drop(&name)?;
        if self.store.drop_index(self.collection, &name)? {
            log_debug!("Dropped index '{}' from '{}'", name, self.collection);
            Ok(())
        } else {
            Err(SchemaLiteError::IndexNotFound(name))
        }
    }

    /// Drop that never fails when the index is absent; the identity index
    /// is still rejected
    pub fn drop_index_if_exists<T: Into<IndexTarget>>(&self, target: T) -> Result<()> {
        let name = target.into().resolved_name();
        Self::reject_identity_drop(&name)?;
        let dropped = self.store.drop_index(self.collection, &name)?;
        log_trace!(
            "drop_index_if_exists '{}' on '{}': dropped={}",
            name,
            self.collection,
            dropped
        );
        Ok(())
    }

    /// True iff an index with the resolved name exists. Exact name match
    /// only; `{a: 1}` never matches an index created as `{a: -1}`.
    pub fn has_index<T: Into<IndexTarget>>(&self, target: T) -> Result<bool> {
        let name = target.into().resolved_name();
        Ok(self.existing_specs()?.iter().any(|s| s.name == name))
    }

    /// Every index on the collection in normalized form, the implicit
    /// identity index included. Empty for a missing collection.
    pub fn list_indexes(&self) -> Result<Vec<IndexDescriptor>> {
        Ok(self
            .existing_specs()?
            .into_iter()
            .map(|spec| IndexDescriptor {
                index_type: spec.index_type().to_string(),
                columns: spec.columns(),
                unique: spec.unique,
                primary: spec.name == ID_INDEX_NAME,
                name: spec.name,
            })
            .collect())
    }

    // The store never materializes the identity index, so a drop would
    // otherwise report it as not found even though has_index sees it.
    fn reject_identity_drop(name: &str) -> Result<()> {
        if name == ID_INDEX_NAME {
            return Err(SchemaLiteError::InvalidSpec(format!(
                "the implicit identity index '{}' cannot be dropped",
                ID_INDEX_NAME
            )));
        }
        Ok(())
    }

    /// Raw specs from the store; a missing collection reads as "no indexes"
    fn existing_specs(&self) -> Result<Vec<IndexSpec>> {
        match self.store.index_specs(self.collection) {
            Ok(specs) => Ok(specs),
            Err(SchemaLiteError::CollectionNotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use proptest::prelude::*;

    // ========== default name tests ==========

    #[test]
    fn test_default_name_single_ascending() {
        let spec = IndexSpec::new("mykey").unwrap();
        assert_eq!(spec.name, "mykey_1");
        assert_eq!(spec.index_type(), "btree");
    }

    #[test]
    fn test_default_name_compound_mixed_directions() {
        let spec = IndexSpec::new([
            ("field_a", IndexDirection::Descending),
            ("field_b", IndexDirection::Ascending),
        ])
        .unwrap();
        assert_eq!(spec.name, "field_a_-1_field_b_1");
    }

    #[test]
    fn test_default_name_field_list_all_ascending() {
        let spec = IndexSpec::new(["field_a", "field_b"]).unwrap();
        assert_eq!(spec.name, "field_a_1_field_b_1");
    }

    #[test]
    fn test_explicit_name_overrides_default() {
        let spec = IndexSpec::builder(["field_a", "field_b"])
            .name("custom_index_name")
            .build()
            .unwrap();
        assert_eq!(spec.name, "custom_index_name");
        assert_eq!(spec.columns(), vec!["field_a", "field_b"]);
    }

    // ========== builder flag tests ==========

    #[test]
    fn test_builder_flags() {
        let spec = IndexSpec::builder("sparseuniquekey")
            .sparse()
            .unique()
            .build()
            .unwrap();
        assert!(spec.sparse);
        assert!(spec.unique);
        assert_eq!(spec.ttl_seconds, None);

        let spec = IndexSpec::builder("expirekey").ttl(60).build().unwrap();
        assert_eq!(spec.ttl_seconds, Some(60));
    }

    #[test]
    fn test_empty_keys_rejected() {
        let result = IndexSpec::new(Vec::<&str>::new());
        assert!(matches!(result, Err(SchemaLiteError::InvalidSpec(_))));
    }

    // ========== geospatial tests ==========

    #[test]
    fn test_geospatial_kinds() {
        let spec = IndexSpec::geospatial("point", "2d").unwrap();
        assert_eq!(spec.name, "point_2d");
        assert_eq!(spec.index_type(), "2d");

        let spec = IndexSpec::geospatial("continent", "2dsphere").unwrap();
        assert_eq!(spec.name, "continent_2dsphere");
        assert_eq!(spec.index_type(), "2dsphere");
    }

    #[test]
    fn test_geospatial_unknown_kind_rejected() {
        let result = IndexSpec::geospatial("point", "3d");
        assert!(matches!(result, Err(SchemaLiteError::InvalidSpec(_))));
    }

    // ========== target resolution tests ==========

    #[test]
    fn test_target_resolution() {
        assert_eq!(IndexTarget::from("custom").resolved_name(), "custom");
        assert_eq!(IndexTarget::from(["uniquekey"]).resolved_name(), "uniquekey_1");
        assert_eq!(
            IndexTarget::from([
                ("field_a", IndexDirection::Descending),
                ("field_b", IndexDirection::Ascending),
            ])
            .resolved_name(),
            "field_a_-1_field_b_1"
        );
        // A field literally named like an index name resolves by suffixing,
        // not by recognizing the embedded direction token
        assert_eq!(
            IndexTarget::from(["field_a_1_field_b"]).resolved_name(),
            "field_a_1_field_b_1"
        );
    }

    // ========== manager tests ==========

    #[test]
    fn test_create_is_idempotent_for_identical_spec() {
        let store = MemoryStore::new();
        let manager = IndexManager::new(&store, "users");

        let spec = IndexSpec::new("email").unwrap();
        manager.create_index(spec.clone()).unwrap();
        manager.create_index(spec).unwrap();

        let names: Vec<String> = manager
            .list_indexes()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["_id_", "email_1"]);
    }

    #[test]
    fn test_name_conflict_with_different_keys() {
        let store = MemoryStore::new();
        let manager = IndexManager::new(&store, "users");

        let first = IndexSpec::builder("email").name("lookup").build().unwrap();
        manager.create_index(first).unwrap();

        let second = IndexSpec::builder("username").name("lookup").build().unwrap();
        let err = manager.create_index(second).unwrap_err();
        assert!(matches!(err, SchemaLiteError::IndexNameConflict { .. }));
    }

    #[test]
    fn test_drop_strict_vs_if_exists() {
        let store = MemoryStore::new();
        let manager = IndexManager::new(&store, "users");

        manager.create_index(IndexSpec::new("email").unwrap()).unwrap();
        manager.drop_index("email_1").unwrap();
        assert!(!manager.has_index("email_1").unwrap());

        let err = manager.drop_index("email_1").unwrap_err();
        assert!(matches!(err, SchemaLiteError::IndexNotFound(_)));

        // if-exists variant never fails and leaves other indexes untouched
        manager.create_index(IndexSpec::new("token").unwrap()).unwrap();
        manager.drop_index_if_exists("never_created_1").unwrap();
        assert!(manager.has_index("token_1").unwrap());
    }

    #[test]
    fn test_has_index_is_exact_name_match() {
        let store = MemoryStore::new();
        let manager = IndexManager::new(&store, "users");

        manager.create_index(IndexSpec::new("myhaskey").unwrap()).unwrap();
        assert!(manager.has_index("myhaskey_1").unwrap());
        assert!(!manager.has_index("myhaskey").unwrap());
        assert!(manager.has_index(["myhaskey"]).unwrap());
        assert!(!manager.has_index(["myhaskey_1"]).unwrap());
    }

    #[test]
    fn test_identity_index_visible_but_never_droppable() {
        let store = MemoryStore::new();
        let manager = IndexManager::new(&store, "users");
        manager.create_index(IndexSpec::new("email").unwrap()).unwrap();

        assert!(manager.has_index(ID_INDEX_NAME).unwrap());

        let err = manager.drop_index(ID_INDEX_NAME).unwrap_err();
        assert!(matches!(err, SchemaLiteError::InvalidSpec(_)));
        let err = manager.drop_index_if_exists(ID_INDEX_NAME).unwrap_err();
        assert!(matches!(err, SchemaLiteError::InvalidSpec(_)));

        assert!(manager.has_index(ID_INDEX_NAME).unwrap());
    }

    #[test]
    fn test_list_indexes_missing_collection_is_empty() {
        let store = MemoryStore::new();
        let manager = IndexManager::new(&store, "missing");
        assert!(manager.list_indexes().unwrap().is_empty());
        assert!(!manager.has_index("anything_1").unwrap());
    }

    #[test]
    fn test_list_indexes_reports_primary_identity_index() {
        let store = MemoryStore::new();
        store
            .create_index("users", IndexSpec::new("email").unwrap())
            .unwrap();

        let manager = IndexManager::new(&store, "users");
        let descriptors = manager.list_indexes().unwrap();
        assert_eq!(descriptors.len(), 2);

        let id_index = &descriptors[0];
        assert_eq!(id_index.name, "_id_");
        assert!(id_index.primary);
        assert!(id_index.unique);
        assert_eq!(id_index.index_type, "btree");
        assert_eq!(id_index.columns, vec!["_id"]);

        assert!(!descriptors[1].primary);
    }

    // ========== property tests ==========

    proptest! {
        #[test]
        fn prop_default_name_is_deterministic(
            fields in proptest::collection::vec("[a-z][a-z0-9]{0,7}", 1..4),
            descending in proptest::collection::vec(proptest::bool::ANY, 1..4),
        ) {
            let keys: Vec<(String, IndexDirection)> = fields
                .iter()
                .zip(descending.iter().cycle())
                .map(|(f, d)| {
                    let direction = if *d {
                        IndexDirection::Descending
                    } else {
                        IndexDirection::Ascending
                    };
                    (f.clone(), direction)
                })
                .collect();

            let first = default_index_name(&keys);
            let second = default_index_name(&keys);
            prop_assert_eq!(&first, &second);

            // The spec built from the same keys carries the same name
            let spec = IndexSpec::new(keys.clone()).unwrap();
            prop_assert_eq!(spec.name, first.clone());

            // Target resolution through a key set agrees with the default name
            let target = IndexTarget::Keys(IndexKeys(keys));
            prop_assert_eq!(target.resolved_name(), first);
        }
    }
}
