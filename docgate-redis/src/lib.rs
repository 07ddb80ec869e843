//! Redis response-cache backend for docgate.
//!
//! Cached read responses live in Redis under their request URL with a
//! per-entry TTL (`SETEX` semantics); expiry is Redis's job, the gateway
//! never deletes keys itself. Connections come from a deadpool pool shared
//! across requests.

use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config, Pool, Runtime};

use docgate_core::cache::CacheBackend;
use docgate_core::error::{GatewayError, GatewayResult};

/// Response cache backed by a Redis connection pool.
#[derive(Debug, Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Builds a pool for the given URL and verifies it with one test
    /// connection.
    pub async fn connect(url: &str) -> GatewayResult<Self> {
        let pool = Config::from_url(url)
            .builder()
            .map_err(|e| GatewayError::Initialization(e.to_string()))?
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;

        let conn = pool
            .get()
            .await
            .map_err(|e| GatewayError::Initialization(e.to_string()))?;
        drop(conn);

        tracing::info!(url, "redis cache connected");

        Ok(Self { pool })
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn fetch(&self, key: &str) -> GatewayResult<Option<String>> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| GatewayError::Cache(e.to_string()))?;

        conn.get(key)
            .await
            .map_err(|e| GatewayError::Cache(e.to_string()))
    }

    async fn insert(&self, key: &str, ttl_secs: u64, value: &str) -> GatewayResult<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| GatewayError::Cache(e.to_string()))?;

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| GatewayError::Cache(e.to_string()))
    }
}
