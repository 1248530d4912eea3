//! In-memory cache implementation - used when Redis is not configured.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Per-process cache on a HashMap behind an async RwLock.
///
/// Expired entries are dropped when read and swept on every write, so the
/// map never holds more than the live keys plus one. Data is lost on restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if entry.is_expired(now) {
            drop(store);
            let mut store = self.store.write().await;
            if store.get(key).is_some_and(|e| e.is_expired(now)) {
                store.remove(key);
            }
            return None;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut store = self.store.write().await;

        store.retain(|_, entry| !entry.is_expired(now));
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| now + d),
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();
        cache.set("index_page:1", "body", None).await.unwrap();
        assert_eq!(cache.get("index_page:1").await, Some("body".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();
        cache.set("index_page:1", "body", None).await.unwrap();
        cache.delete("index_page:1").await.unwrap();
        assert_eq!(cache.get("index_page:1").await, None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache
            .set("index_page:1", "body", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.get("index_page:1").await.is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("index_page:1").await, None);
    }

    #[tokio::test]
    async fn test_write_sweeps_expired_entries() {
        let cache = InMemoryCache::new();
        for page in 0..500 {
            cache
                .set(
                    &format!("index_page:{page}"),
                    "body",
                    Some(Duration::from_millis(5)),
                )
                .await
                .unwrap();
        }
        cache.set("index_page:kept", "body", None).await.unwrap();
        assert_eq!(cache.len().await, 501);

        tokio::time::sleep(Duration::from_millis(30)).await;
        cache.set("index_page:1", "fresh", None).await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert_eq!(cache.get("index_page:kept").await, Some("body".to_string()));
        assert_eq!(cache.get("index_page:1").await, Some("fresh".to_string()));
    }
}
