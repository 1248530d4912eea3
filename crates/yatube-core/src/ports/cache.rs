use async_trait::async_trait;
use std::time::Duration;

/// Expiring key/value cache for rendered responses (Redis, in-memory).
///
/// Reads never fail: an unreachable backend behaves like a miss.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a fresh value from the cache.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Drop a key.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
