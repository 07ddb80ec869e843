//! In-memory document store backend.
//!
//! Documents are stored as JSON values in per-collection ordered maps behind
//! an async-aware read-write lock. Queries scan the whole collection (no
//! indexing), which is fine at test and local-development scale.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::Value;
use uuid::Uuid;

use docgate_core::backend::{DeleteOutcome, DocumentBackend, WriteOutcome};
use docgate_core::conform::{ConformedQuery, Filter};
use docgate_core::error::{GatewayError, GatewayResult};

use crate::evaluator::{compare_values, lookup, matches_filter};

type CollectionMap = BTreeMap<String, Value>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document store.
///
/// Cloneable; clones share the same underlying data through an `Arc`-wrapped
/// state, so one instance can serve multiple async tasks.
#[derive(Default, Clone, Debug)]
pub struct MemoryStore {
    /// collection name -> (document id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl MemoryStore {
    /// Creates a new empty store with no collections.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentBackend for MemoryStore {
    async fn insert_one(&self, collection: &str, document: Value) -> GatewayResult<Value> {
        let mut document = document;
        let fields = document
            .as_object_mut()
            .ok_or_else(|| GatewayError::Store("document must be a JSON object".to_string()))?;

        let id = match fields.get("_id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                fields.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
        };

        let mut store = self.store.write().await;
        let collection_map = store.entry(collection.to_string()).or_default();
        if collection_map.contains_key(&id) {
            return Err(GatewayError::Store(format!(
                "document {id} already exists in {collection}"
            )));
        }
        collection_map.insert(id, document.clone());

        Ok(document)
    }

    async fn find(&self, collection: &str, query: &ConformedQuery) -> GatewayResult<Vec<Value>> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(vec![]);
        };

        let mut matched: Vec<&Value> = collection_map
            .values()
            .filter(|doc| matches_filter(doc, &query.filter))
            .collect();

        if let Some(spec) = query.sort.as_deref() {
            sort_documents(&mut matched, spec);
        }

        Ok(matched
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .map(|doc| apply_projection(doc, query.projection.as_deref()))
            .collect())
    }

    async fn count(&self, collection: &str, filter: &Filter) -> GatewayResult<u64> {
        let store = self.store.read().await;
        let Some(collection_map) = store.get(collection) else {
            return Ok(0);
        };

        Ok(collection_map
            .values()
            .filter(|doc| matches_filter(doc, filter))
            .count() as u64)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        projection: Option<&str>,
    ) -> GatewayResult<Option<Value>> {
        let store = self.store.read().await;
        Ok(store
            .get(collection)
            .and_then(|col| col.get(id))
            .map(|doc| apply_projection(doc, projection)))
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Value,
    ) -> GatewayResult<WriteOutcome> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(WriteOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let mut outcome = WriteOutcome {
            matched: 0,
            modified: 0,
        };
        for doc in collection_map.values_mut() {
            if matches_filter(doc, filter) {
                outcome.matched += 1;
                if apply_patch(doc, &patch) {
                    outcome.modified += 1;
                }
            }
        }

        Ok(outcome)
    }

    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> GatewayResult<Option<Value>> {
        let mut store = self.store.write().await;
        let Some(doc) = store.get_mut(collection).and_then(|col| col.get_mut(id)) else {
            return Ok(None);
        };

        let before = doc.clone();
        apply_patch(doc, &patch);

        Ok(Some(before))
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> GatewayResult<DeleteOutcome> {
        let mut store = self.store.write().await;
        let Some(collection_map) = store.get_mut(collection) else {
            return Ok(DeleteOutcome { deleted: 0 });
        };

        let before = collection_map.len();
        collection_map.retain(|_, doc| !matches_filter(doc, filter));

        Ok(DeleteOutcome {
            deleted: (before - collection_map.len()) as u64,
        })
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> GatewayResult<Option<Value>> {
        let mut store = self.store.write().await;
        Ok(store
            .get_mut(collection)
            .and_then(|col| col.remove(id)))
    }
}

/// Stable multi-key sort. The spec is a whitespace- or comma-separated field
/// list; a `-` prefix means descending. A missing field sorts as null.
fn sort_documents(documents: &mut [&Value], spec: &str) {
    let terms: Vec<(&str, bool)> = spec
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(|term| match term.strip_prefix('-') {
            Some(field) => (field, true),
            None => (term, false),
        })
        .collect();
    if terms.is_empty() {
        return;
    }

    documents.sort_by(|a, b| {
        for (field, descending) in &terms {
            let left = lookup(a, field).unwrap_or(&Value::Null);
            let right = lookup(b, field).unwrap_or(&Value::Null);
            let ordering = compare_values(left, right);
            if !ordering.is_eq() {
                return if *descending { ordering.reverse() } else { ordering };
            }
        }
        std::cmp::Ordering::Equal
    });
}

/// Applies a top-level field-selection spec.
///
/// Any unprefixed term switches to inclusion mode: only listed fields
/// survive, plus `_id` unless explicitly excluded. Otherwise every
/// `-`-prefixed field is dropped.
fn apply_projection(document: &Value, spec: Option<&str>) -> Value {
    let Some(spec) = spec else {
        return document.clone();
    };
    let Some(fields) = document.as_object() else {
        return document.clone();
    };

    let terms: Vec<&str> = spec
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .collect();
    if terms.is_empty() {
        return document.clone();
    }

    let inclusion = terms.iter().any(|term| !term.starts_with('-'));
    let exclude_id = terms.contains(&"-_id");

    let projected = if inclusion {
        fields
            .iter()
            .filter(|(key, _)| {
                terms.contains(&key.as_str()) || (key.as_str() == "_id" && !exclude_id)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    } else {
        let excluded: Vec<&str> = terms
            .iter()
            .filter_map(|term| term.strip_prefix('-'))
            .collect();
        fields
            .iter()
            .filter(|(key, _)| !excluded.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    };

    Value::Object(projected)
}

fn apply_patch(document: &mut Value, patch: &Value) -> bool {
    let Some(fields) = patch.as_object() else {
        return false;
    };
    let Some(target) = document.as_object_mut() else {
        return false;
    };

    let mut changed = false;
    for (key, value) in fields {
        // The identifier is immutable.
        if key == "_id" {
            continue;
        }
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            changed = true;
        }
    }

    changed
}
