//! Write-side invalidation of cached listings

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{ListingCache, OwnerPrefix};

/// Purges every cached listing of an owner after a write.
///
/// A single write can move tasks across pages of every filter and page size
/// a client has cached, so the whole owner prefix is dropped rather than
/// the affected pages.
#[derive(Clone, Debug)]
pub struct InvalidationService {
    cache: ListingCache,
}

impl InvalidationService {
    pub fn new(cache: ListingCache) -> Self {
        Self { cache }
    }

    /// Delete all cached listings for `owner`.
    ///
    /// Must run only after the store write succeeded. Never fails: with no
    /// cache this is a no-op, and cache errors are logged and swallowed,
    /// leaving stale entries to expire by TTL. Returns the number of keys
    /// removed.
    pub async fn invalidate_listings(&self, owner: Uuid) -> u64 {
        let Some(adapter) = self.cache.adapter() else {
            return 0;
        };

        let prefix = OwnerPrefix::new(owner);
        let keys = match self
            .cache
            .bounded(adapter.keys_matching(&prefix.pattern()))
            .await
        {
            Ok(keys) => keys,
            Err(e) => {
                warn!(owner = %owner, error = %e, "failed to enumerate cached listings");
                return 0;
            }
        };

        if keys.is_empty() {
            debug!(owner = %owner, "no cached listings to invalidate");
            return 0;
        }

        match self.cache.bounded(adapter.delete_many(&keys)).await {
            Ok(removed) => {
                info!(owner = %owner, removed, "cache invalidated");
                removed
            }
            Err(e) => {
                warn!(owner = %owner, keys = keys.len(), error = %e, "failed to delete cached listings");
                0
            }
        }
    }
}
