//! In-process cache adapter

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::adapter::{CacheAdapter, CacheError};

#[derive(Debug, Clone)]
struct CachedEntry {
    value: String,
    expires_at: Instant,
}

impl CachedEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Single-process cache with TTL checked on read.
///
/// Only shared by the tasks of one process, so it suits tests and
/// single-instance deployments.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheAdapter for MemoryCache {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(
            key.to_string(),
            CachedEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let matcher =
            glob::Pattern::new(pattern).map_err(|e| CacheError::InvalidPattern(e.to_string()))?;
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired(now) && matcher.matches(key))
            .map(|(key, _)| key.clone())
            .collect())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        let mut entries = self.entries.write().await;
        let removed = keys
            .iter()
            .filter(|key| entries.remove(key.as_str()).is_some())
            .count();
        Ok(removed as u64)
    }
}
