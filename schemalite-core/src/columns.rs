// schemalite-core/src/columns.rs
// Best-effort columnar view of a schema-less collection, inferred by
// sampling documents and merging observed value kinds per field.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, SchemaLiteError};
use crate::log_trace;
use crate::store::DocumentStore;

/// Documents drawn per collection when no explicit sample size is given
pub const DEFAULT_SAMPLE_SIZE: usize = 50;

/// Kind name used for the store's native identifier type
const ID_TYPE_NAME: &str = "objectId";

/// Native value kind of a document field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Double,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Int
                } else {
                    ValueKind::Double
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Double => "double",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

/// Generation rule for an auto-generated column (the identity field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnGeneration {
    #[serde(rename = "type")]
    pub generation_type: String,
}

/// One inferred column of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    /// Kind name, or the sorted comma-joined distinct kinds when mixed
    #[serde(rename = "type")]
    pub column_type: String,
    /// Alias of `column_type`
    pub type_name: String,
    /// Always None: document stores carry no collation per field
    pub collation: Option<String>,
    pub nullable: bool,
    /// Always None: no defaults without a schema
    pub default: Option<Value>,
    /// Always false: identity generation is reported via `generation`
    pub auto_increment: bool,
    /// `"<n> occurrences"` when the field's kind varies across the sample
    pub comment: String,
    pub generation: Option<ColumnGeneration>,
}

impl ColumnDescriptor {
    fn identity() -> Self {
        ColumnDescriptor {
            name: "_id".to_string(),
            column_type: ID_TYPE_NAME.to_string(),
            type_name: ID_TYPE_NAME.to_string(),
            collation: None,
            nullable: false,
            default: None,
            auto_increment: false,
            comment: String::new(),
            generation: Some(ColumnGeneration {
                generation_type: ID_TYPE_NAME.to_string(),
            }),
        }
    }
}

/// Per-field accumulator over the sample
#[derive(Debug, Default)]
struct FieldProfile {
    /// Distinct kind names, kept sorted for the comma-joined rendering
    kinds: BTreeSet<&'static str>,
    /// Number of sampled documents carrying the field
    present_in: usize,
    saw_null: bool,
}

/// Samples a collection and emits one normalized descriptor per observed
/// field, identity field first.
pub struct ColumnIntrospector<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> ColumnIntrospector<'a, S> {
    pub fn new(store: &'a S) -> Self {
        ColumnIntrospector { store }
    }

    /// Draw up to `sample_size` documents in stored order and merge the
    /// observed shape per field.
    ///
    /// Field order follows first-seen order across the sample. A missing or
    /// empty collection yields an empty sequence, never an error.
    ///
    /// Occurrence rule for mixed-kind fields: the comment counts every
    /// sampled document in which the field is present, since each one
    /// contributes to the observed variety.
    pub fn get_columns(&self, collection: &str, sample_size: usize) -> Result<Vec<ColumnDescriptor>> {
        let docs = match self.store.documents(collection, Some(sample_size)) {
            Ok(docs) => docs,
            Err(SchemaLiteError::CollectionNotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        if docs.is_empty() {
            return Ok(Vec::new());
        }

        log_trace!(
            "Sampling {} document(s) from '{}' for column inference",
            docs.len(),
            collection
        );

        let mut profiles: IndexMap<String, FieldProfile> = IndexMap::new();
        for doc in &docs {
            for (field, value) in &doc.fields {
                let kind = ValueKind::of(value);
                let profile = profiles.entry(field.clone()).or_default();
                profile.kinds.insert(kind.as_str());
                profile.present_in += 1;
                if kind == ValueKind::Null {
                    profile.saw_null = true;
                }
            }
        }

        let total = docs.len();
        let mut columns = Vec::with_capacity(profiles.len() + 1);
        columns.push(ColumnDescriptor::identity());

        for (name, profile) in profiles {
            let mixed = profile.kinds.len() > 1;
            let type_string = profile
                .kinds
                .iter()
                .copied()
                .collect::<Vec<&str>>()
                .join(", ");
            let comment = if mixed {
                format!("{} occurrences", profile.present_in)
            } else {
                String::new()
            };

            columns.push(ColumnDescriptor {
                name,
                column_type: type_string.clone(),
                type_name: type_string,
                collation: None,
                nullable: profile.saw_null || profile.present_in < total,
                default: None,
                auto_increment: false,
                comment,
                generation: None,
            });
        }

        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn columns_of(store: &MemoryStore, collection: &str) -> Vec<ColumnDescriptor> {
        ColumnIntrospector::new(store)
            .get_columns(collection, DEFAULT_SAMPLE_SIZE)
            .unwrap()
    }

    // ========== ValueKind tests ==========

    #[test]
    fn test_value_kind_of() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(42)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Double);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([1])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({"k": 1})), ValueKind::Object);
    }

    // ========== empty / missing tests ==========

    #[test]
    fn test_missing_collection_yields_empty() {
        let store = MemoryStore::new();
        assert!(columns_of(&store, "missing").is_empty());
    }

    #[test]
    fn test_empty_collection_yields_empty() {
        let store = MemoryStore::new();
        store
            .create_collection("empty", Default::default())
            .unwrap();
        assert!(columns_of(&store, "empty").is_empty());
    }

    // ========== inference tests ==========

    #[test]
    fn test_identity_column_comes_first_with_generation() {
        let store = MemoryStore::new();
        store.insert_document("c", json!({"text": "value"})).unwrap();

        let columns = columns_of(&store, "c");
        assert_eq!(columns[0].name, "_id");
        assert_eq!(columns[0].column_type, "objectId");
        assert_eq!(
            columns[0].generation,
            Some(ColumnGeneration {
                generation_type: "objectId".to_string()
            })
        );
        assert!(!columns[0].nullable);

        // Every other column carries no generation rule
        assert!(columns[1].generation.is_none());
    }

    #[test]
    fn test_single_kind_field() {
        let store = MemoryStore::new();
        store.insert_document("c", json!({"text": "a"})).unwrap();
        store.insert_document("c", json!({"text": "b"})).unwrap();

        let columns = columns_of(&store, "c");
        let text = columns.iter().find(|c| c.name == "text").unwrap();
        assert_eq!(text.column_type, "string");
        assert_eq!(text.type_name, "string");
        assert_eq!(text.comment, "");
        assert!(!text.nullable);
        assert!(text.collation.is_none());
        assert!(text.default.is_none());
        assert!(!text.auto_increment);
    }

    #[test]
    fn test_mixed_kinds_sorted_and_counted() {
        let store = MemoryStore::new();
        store
            .insert_document("c", json!({"mixed": {"key": "value"}}))
            .unwrap();
        store.insert_document("c", json!({"mixed": true})).unwrap();

        let columns = columns_of(&store, "c");
        let mixed = columns.iter().find(|c| c.name == "mixed").unwrap();
        assert_eq!(mixed.column_type, "bool, object");
        assert_eq!(mixed.type_name, "bool, object");
        assert_eq!(mixed.comment, "2 occurrences");
    }

    #[test]
    fn test_int_and_string_mix() {
        let store = MemoryStore::new();
        store.insert_document("c", json!({"a": 1})).unwrap();
        store.insert_document("c", json!({"a": "x"})).unwrap();

        let columns = columns_of(&store, "c");
        let a = columns.iter().find(|c| c.name == "a").unwrap();
        assert_eq!(a.column_type, "int, string");
        assert_eq!(a.comment, "2 occurrences");
    }

    #[test]
    fn test_nullable_when_field_absent_somewhere() {
        let store = MemoryStore::new();
        store
            .insert_document("c", json!({"always": 1, "sometimes": 2}))
            .unwrap();
        store.insert_document("c", json!({"always": 3})).unwrap();

        let columns = columns_of(&store, "c");
        let always = columns.iter().find(|c| c.name == "always").unwrap();
        let sometimes = columns.iter().find(|c| c.name == "sometimes").unwrap();
        assert!(!always.nullable);
        assert!(sometimes.nullable);
    }

    #[test]
    fn test_nullable_when_value_is_null() {
        let store = MemoryStore::new();
        store.insert_document("c", json!({"f": null})).unwrap();
        store.insert_document("c", json!({"f": "x"})).unwrap();

        let columns = columns_of(&store, "c");
        let f = columns.iter().find(|c| c.name == "f").unwrap();
        assert!(f.nullable);
        assert_eq!(f.column_type, "null, string");
    }

    #[test]
    fn test_first_seen_field_order() {
        let store = MemoryStore::new();
        store
            .insert_document("c", json!({"zeta": 1, "alpha": 2}))
            .unwrap();
        store
            .insert_document("c", json!({"alpha": 3, "newcomer": 4}))
            .unwrap();

        let names: Vec<String> = columns_of(&store, "c")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["_id", "zeta", "alpha", "newcomer"]);
    }

    #[test]
    fn test_sample_size_bounds_the_scan() {
        let store = MemoryStore::new();
        store.insert_document("c", json!({"a": 1})).unwrap();
        store.insert_document("c", json!({"a": "x"})).unwrap();

        // A sample of one never sees the second document's string kind
        let columns = ColumnIntrospector::new(&store)
            .get_columns("c", 1)
            .unwrap();
        let a = columns.iter().find(|c| c.name == "a").unwrap();
        assert_eq!(a.column_type, "int");
        assert_eq!(a.comment, "");
    }
}
