//! In-memory response cache with per-entry expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use mea::rwlock::RwLock;

use docgate_core::cache::CacheBackend;
use docgate_core::error::GatewayResult;

/// TTL-expiring in-memory cache keyed by request URL.
///
/// Expired entries are dropped lazily on lookup; there is no background
/// sweeper, so an entry that is never fetched again simply lingers. At the
/// scale this backend targets that is acceptable.
#[derive(Default, Clone, Debug)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, (Instant, String)>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn fetch(&self, key: &str) -> GatewayResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).and_then(|(deadline, value)| {
            if Instant::now() < *deadline {
                Some(value.clone())
            } else {
                None
            }
        }))
    }

    async fn insert(&self, key: &str, ttl_secs: u64, value: &str) -> GatewayResult<()> {
        let deadline = Instant::now() + Duration::from_secs(ttl_secs);
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), (deadline, value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_returns_inserted_value_before_expiry() {
        let cache = MemoryCache::new();
        cache.insert("/api/resources/skills", 20, "{}").await.unwrap();
        assert_eq!(
            cache.fetch("/api/resources/skills").await.unwrap(),
            Some("{}".to_string())
        );
        assert_eq!(cache.fetch("/api/resources/other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn zero_ttl_entries_are_already_expired() {
        let cache = MemoryCache::new();
        cache.insert("key", 0, "stale").await.unwrap();
        assert_eq!(cache.fetch("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn reinsert_replaces_the_entry() {
        let cache = MemoryCache::new();
        cache.insert("key", 20, "one").await.unwrap();
        cache.insert("key", 20, "two").await.unwrap();
        assert_eq!(cache.fetch("key").await.unwrap(), Some("two".to_string()));
    }
}
