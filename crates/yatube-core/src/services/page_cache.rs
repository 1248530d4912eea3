//! Time-boxed cache of rendered pages.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::ports::Cache;

/// Key prefix of the cached index feed.
pub const INDEX_CACHE_PREFIX: &str = "index_page";

/// Caches rendered bodies under `<prefix>:<key>` for a fixed interval.
///
/// Entries are shared by every requester and are not invalidated on writes,
/// so content may be stale for up to `ttl`.
#[derive(Clone)]
pub struct PageCache {
    cache: Arc<dyn Cache>,
    prefix: String,
    ttl: Duration,
}

impl PageCache {
    pub fn new(cache: Arc<dyn Cache>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
            ttl,
        }
    }

    /// Return the cached body for `key`, rendering and storing it on a miss.
    ///
    /// A failed cache write is logged and the freshly rendered body is still returned.
    pub async fn get_or_render<F, Fut, E>(&self, key: &str, render: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let key = self.key(key);

        if let Some(body) = self.cache.get(&key).await {
            tracing::trace!(%key, "Page cache hit");
            return Ok(body);
        }

        let body = render().await?;
        if let Err(e) = self.cache.set(&key, &body, Some(self.ttl)).await {
            tracing::warn!(%key, error = %e, "Failed to store page in cache");
        }

        Ok(body)
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }
}
