//! Request handlers for the derived CRUD endpoints.
//!
//! Every handler resolves its `{resource}` segment through the schema
//! registry first, so an unknown resource is a 404 before anything else
//! runs. The two read handlers consult the cache, keyed by the verbatim
//! request URL; cache failures are logged and swallowed so a broken cache
//! degrades to a cache-less gateway. A by-id lookup that finds nothing is a
//! 200 with a `null` body, matching the value-not-exception contract of the
//! store boundary.

use std::sync::Arc;

use axum::Json;
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use docgate_core::backend::{DeleteOutcome, WriteOutcome};
use docgate_core::cache::{CACHE_TTL_SECS, CacheBackend};
use docgate_core::conform::conform;
use docgate_core::error::GatewayError;

use crate::state::AppState;

/// Transport-facing wrapper mapping [`GatewayError`] to HTTP statuses.
pub struct ApiError(GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            GatewayError::Validation { fields } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.0.to_string(), "fields": fields }),
            ),
            GatewayError::NotFound(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.0.to_string() }))
            }
            _ => {
                tracing::error!(error = %self.0, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.0.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

type RawParams = Query<Vec<(String, String)>>;

pub async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let created = state.executor.create(schema, body).await?;

    Ok(Json(created).into_response())
}

pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): RawParams,
) -> Result<Response, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let key = cache_key(&uri);

    if let Some(hit) = cache_fetch(&state, &key).await {
        return Ok(json_body(hit));
    }

    let query = conform(params);
    let envelope = state
        .executor
        .list(schema, &query, &base_url(&headers, &uri))
        .await?;
    let body = serde_json::to_string(&envelope).map_err(GatewayError::from)?;
    cache_insert(state.cache.clone(), key, body.clone());

    Ok(json_body(body))
}

pub async fn read_by_id(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
    Query(params): RawParams,
) -> Result<Response, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let key = cache_key(&uri);

    if let Some(hit) = cache_fetch(&state, &key).await {
        return Ok(json_body(hit));
    }

    let query = conform(params);
    let document = state
        .executor
        .read_by_id(schema, &id, query.projection.as_deref())
        .await?;
    // An absent document serializes as `null`, still a 200.
    let body = serde_json::to_string(&document).map_err(GatewayError::from)?;
    cache_insert(state.cache.clone(), key, body.clone());

    Ok(json_body(body))
}

pub async fn update_many(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): RawParams,
    Json(patch): Json<Value>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let filter = conform(params).filter;
    let outcome = state.executor.update_many(schema, &filter, patch).await?;

    Ok(Json(outcome))
}

pub async fn update_by_id(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Result<Json<Option<Value>>, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let previous = state.executor.update_by_id(schema, &id, patch).await?;

    Ok(Json(previous))
}

pub async fn delete_many(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): RawParams,
) -> Result<Json<DeleteOutcome>, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let filter = conform(params).filter;
    let outcome = state.executor.delete_many(schema, &filter).await?;

    Ok(Json(outcome))
}

pub async fn delete_by_id(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Option<Value>>, ApiError> {
    let schema = state.registry.resolve(&resource)?;
    let removed = state.executor.delete_by_id(schema, &id).await?;

    Ok(Json(removed))
}

/// The cache key is the verbatim request URL: path plus query string,
/// parameter order preserved.
fn cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.to_string())
}

/// Link base for list responses: scheme, inbound host, and the resource
/// path with no query string.
fn base_url(headers: &HeaderMap, uri: &Uri) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{}", uri.path())
}

async fn cache_fetch(state: &AppState, key: &str) -> Option<String> {
    match state.cache.fetch(key).await {
        Ok(Some(hit)) => {
            tracing::debug!(key, "cache hit");
            Some(hit)
        }
        Ok(None) => {
            tracing::debug!(key, "cache miss");
            None
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "cache fetch failed");
            None
        }
    }
}

/// Populates the cache off the request path; failures are logged, never
/// surfaced.
fn cache_insert(cache: Arc<dyn CacheBackend>, key: String, value: String) {
    tokio::spawn(async move {
        match cache.insert(&key, CACHE_TTL_SECS, &value).await {
            Ok(()) => tracing::debug!(key, "cached response"),
            Err(err) => tracing::warn!(key, error = %err, "cache insert failed"),
        }
    });
}

fn json_body(body: String) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}
