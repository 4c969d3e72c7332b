//! Cache adapter trait

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid key pattern: {0}")]
    InvalidPattern(String),
}

/// Key/value cache with TTL expiry, glob key enumeration and bulk delete.
///
/// Values are opaque strings. Expired entries must never be returned by
/// `get` or `keys_matching`.
#[async_trait]
pub trait CacheAdapter: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Keys matching a glob pattern (`*` wildcard)
    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Delete all given keys in one operation, returning how many existed
    async fn delete_many(&self, keys: &[String]) -> Result<u64, CacheError>;
}
