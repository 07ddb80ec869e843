//! CRUD execution against a resolved schema.
//!
//! The executor runs one store operation per request phase (list reads run
//! two: find, then count) and shapes list results into the response
//! envelope. It never touches the cache; caching wraps the executor at the
//! transport layer.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::{DeleteOutcome, DocumentBackend, WriteOutcome};
use crate::conform::{ConformedQuery, Filter};
use crate::envelope::Envelope;
use crate::error::GatewayResult;
use crate::links::build_links;
use crate::schema::Schema;

/// Executes CRUD operations for resolved schemas against a store backend.
#[derive(Debug, Clone)]
pub struct CrudExecutor {
    store: Arc<dyn DocumentBackend>,
}

impl CrudExecutor {
    pub fn new(store: Arc<dyn DocumentBackend>) -> Self {
        Self { store }
    }

    /// Validates the body against the schema and persists it, returning the
    /// created document.
    pub async fn create(&self, schema: &Schema, body: Value) -> GatewayResult<Value> {
        schema.validate(&body)?;
        self.store.insert_one(schema.collection(), body).await
    }

    /// Runs a list read: fetches the matching page, counts the full
    /// matching set, and wraps both in an envelope with pagination links.
    ///
    /// Idempotent and side-effect-free. `base_url` is the resource URL
    /// without a query string.
    pub async fn list(
        &self,
        schema: &Schema,
        query: &ConformedQuery,
        base_url: &str,
    ) -> GatewayResult<Envelope> {
        let result = self.store.find(schema.collection(), query).await?;
        let total = self.store.count(schema.collection(), &query.filter).await?;

        Ok(Envelope {
            links: build_links(base_url, query, query.page, total, query.limit),
            count: result.len(),
            total,
            result,
        })
    }

    /// Fetches one document by id with an optional projection. An absent
    /// document is `Ok(None)`; the response layer decides the status.
    pub async fn read_by_id(
        &self,
        schema: &Schema,
        id: &str,
        projection: Option<&str>,
    ) -> GatewayResult<Option<Value>> {
        self.store
            .find_by_id(schema.collection(), id, projection)
            .await
    }

    /// Patches every document matching the filter, returning match/modify
    /// counts rather than documents.
    pub async fn update_many(
        &self,
        schema: &Schema,
        filter: &Filter,
        patch: Value,
    ) -> GatewayResult<WriteOutcome> {
        self.store
            .update_many(schema.collection(), filter, patch)
            .await
    }

    /// Patches one document by id.
    ///
    /// Returns the pre-update document: the caller sees the state the patch
    /// replaced, never a mix of old and new.
    pub async fn update_by_id(
        &self,
        schema: &Schema,
        id: &str,
        patch: Value,
    ) -> GatewayResult<Option<Value>> {
        self.store.update_by_id(schema.collection(), id, patch).await
    }

    /// Removes every document matching the filter, returning the removal
    /// count.
    pub async fn delete_many(
        &self,
        schema: &Schema,
        filter: &Filter,
    ) -> GatewayResult<DeleteOutcome> {
        self.store.delete_many(schema.collection(), filter).await
    }

    /// Removes one document by id, returning the removed document.
    pub async fn delete_by_id(&self, schema: &Schema, id: &str) -> GatewayResult<Option<Value>> {
        self.store.delete_by_id(schema.collection(), id).await
    }
}
