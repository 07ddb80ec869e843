//! Document-store backend boundary.
//!
//! The gateway issues at most one store operation per request phase and
//! composes them sequentially; the store provides its own per-operation
//! atomicity. Implementations are thread-safe (`Send + Sync`) and make
//! exactly one attempt per operation: no retries, no timeouts, and whatever
//! atomicity the store gives bulk writes is inherited as-is.
//!
//! Documents cross this boundary as JSON values, matching the transport.
//! Sort specs and projections are raw strings interpreted by each backend
//! with the legacy semantics: whitespace- or comma-separated field lists,
//! with a `-` prefix meaning descending sort or field exclusion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

use crate::conform::{ConformedQuery, Filter};
use crate::error::GatewayResult;

/// Result of a bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Documents the filter matched.
    #[serde(rename = "matchedCount")]
    pub matched: u64,
    /// Documents the patch actually changed.
    #[serde(rename = "modifiedCount")]
    pub modified: u64,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    #[serde(rename = "deletedCount")]
    pub deleted: u64,
}

/// Abstract interface for the document store.
///
/// Every operation returns a [`GatewayResult`]; a failed store call maps to
/// [`GatewayError::Store`](crate::error::GatewayError::Store) and propagates
/// verbatim. A document that does not exist is `Ok(None)`, never an error.
#[async_trait]
pub trait DocumentBackend: Send + Sync + Debug {
    /// Persists one document, assigning an id when the body carries none,
    /// and returns the document as stored.
    async fn insert_one(&self, collection: &str, document: Value) -> GatewayResult<Value>;

    /// Fetches the documents matching the query's filter, with its sort,
    /// projection, limit, and zero-based page offset applied.
    async fn find(&self, collection: &str, query: &ConformedQuery) -> GatewayResult<Vec<Value>>;

    /// Counts all documents matching the filter, ignoring pagination.
    async fn count(&self, collection: &str, filter: &Filter) -> GatewayResult<u64>;

    /// Fetches a single document by identifier with an optional projection.
    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        projection: Option<&str>,
    ) -> GatewayResult<Option<Value>>;

    /// Applies a top-level patch to every document matching the filter.
    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        patch: Value,
    ) -> GatewayResult<WriteOutcome>;

    /// Applies a top-level patch to one document by identifier, returning
    /// the document as it was before the patch.
    async fn update_by_id(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> GatewayResult<Option<Value>>;

    /// Removes every document matching the filter.
    async fn delete_many(&self, collection: &str, filter: &Filter)
    -> GatewayResult<DeleteOutcome>;

    /// Removes one document by identifier, returning the removed document.
    async fn delete_by_id(&self, collection: &str, id: &str) -> GatewayResult<Option<Value>>;
}
