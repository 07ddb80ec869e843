//! Key-value cache boundary for read responses.
//!
//! The cache is keyed by the complete inbound request URL (path plus query
//! string, verbatim). The key is order-sensitive: two semantically identical
//! queries with reordered parameters are distinct entries. That, and the
//! purely time-based expiry with no invalidation on writes, are accepted
//! limitations of the design, not bugs to fix here.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::GatewayResult;

/// Fixed time-to-live for cached read responses, in seconds.
pub const CACHE_TTL_SECS: u64 = 20;

/// Abstract interface for the response cache.
///
/// Errors from either operation map to
/// [`GatewayError::Cache`](crate::error::GatewayError::Cache); the read
/// pipeline logs and swallows them, so a broken cache degrades to a
/// cache-less gateway rather than failing requests.
#[async_trait]
pub trait CacheBackend: Send + Sync + Debug {
    /// Looks up a serialized response. `Ok(None)` on a miss or an expired
    /// entry; a miss must let the request fall through to the store.
    async fn fetch(&self, key: &str) -> GatewayResult<Option<String>>;

    /// Stores a serialized response that expires after `ttl_secs`.
    async fn insert(&self, key: &str, ttl_secs: u64, value: &str) -> GatewayResult<()>;
}
