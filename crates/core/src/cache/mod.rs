//! Cache module
//!
//! Cache adapters, the listing key scheme, and [`ListingCache`], the handle
//! through which the services reach an optional cache.

mod adapter;
mod key;
mod memory;
mod redis;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use adapter::{CacheAdapter, CacheError};
pub use key::{ListingKey, OwnerPrefix, ALL_STATUSES, LISTING_NAMESPACE};
pub use memory::MemoryCache;
pub use self::redis::RedisCache;

pub const DEFAULT_LISTING_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(500);

/// Optional cache dependency shared by the listing and invalidation services.
///
/// When no adapter is configured the services skip the cache entirely and
/// behave as a pass-through to the store.
#[derive(Clone)]
pub struct ListingCache {
    adapter: Option<Arc<dyn CacheAdapter>>,
    ttl: Duration,
    timeout: Duration,
}

impl ListingCache {
    pub fn new(adapter: Arc<dyn CacheAdapter>) -> Self {
        Self {
            adapter: Some(adapter),
            ttl: DEFAULT_LISTING_TTL,
            timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    /// A cache handle that is never available
    pub fn disabled() -> Self {
        Self {
            adapter: None,
            ttl: DEFAULT_LISTING_TTL,
            timeout: DEFAULT_CACHE_TIMEOUT,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn adapter(&self) -> Option<&Arc<dyn CacheAdapter>> {
        self.adapter.as_ref()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Backend name, or `disabled`
    pub fn backend_name(&self) -> &'static str {
        self.adapter.as_ref().map_or("disabled", |a| a.name())
    }

    /// Run one cache call, turning an overrun into [`CacheError::Timeout`]
    pub(crate) async fn bounded<T, F>(&self, call: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| CacheError::Timeout(self.timeout))?
    }
}

impl Default for ListingCache {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for ListingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingCache")
            .field("backend", &self.backend_name())
            .field("ttl", &self.ttl)
            .field("timeout", &self.timeout)
            .finish()
    }
}
