//! Read-through listing service

use std::sync::Arc;

use tracing::{debug, warn};

use super::query::{ListingQuery, ListingResult};
use crate::cache::{CacheAdapter, ListingCache, ListingKey};
use crate::task::TaskRepository;
use crate::Result;

/// Serves listing queries from the cache, falling back to the store on miss.
///
/// Cached values are trusted until their TTL runs out or the owner's
/// listings are invalidated. Any cache failure degrades to a store read for
/// that call and is never returned to the caller.
#[derive(Clone)]
pub struct ListingService {
    store: Arc<dyn TaskRepository>,
    cache: ListingCache,
}

impl ListingService {
    pub fn new(store: Arc<dyn TaskRepository>, cache: ListingCache) -> Self {
        Self { store, cache }
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub async fn get_listing(&self, query: &ListingQuery) -> Result<ListingResult> {
        let Some(adapter) = self.cache.adapter() else {
            return self.load_from_store(query).await;
        };

        let key = ListingKey::for_query(query);
        if let Some(cached) = self.lookup(adapter.as_ref(), &key).await {
            debug!(key = %key, "listing served from cache");
            return Ok(cached);
        }

        let result = self.load_from_store(query).await?;
        self.populate(adapter.as_ref(), &key, &result).await;
        Ok(result)
    }

    async fn lookup(&self, adapter: &dyn CacheAdapter, key: &ListingKey) -> Option<ListingResult> {
        let payload = match self.cache.bounded(adapter.get(key.as_str())).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                debug!(key = %key, "listing cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "cache lookup failed, reading from store");
                return None;
            }
        };

        match serde_json::from_str(&payload) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!(key = %key, error = %e, "discarding undecodable cached listing");
                None
            }
        }
    }

    async fn populate(&self, adapter: &dyn CacheAdapter, key: &ListingKey, result: &ListingResult) {
        let payload = match serde_json::to_string(result) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key = %key, error = %e, "failed to encode listing for cache");
                return;
            }
        };

        let ttl = self.cache.ttl();
        match self
            .cache
            .bounded(adapter.set_with_ttl(key.as_str(), &payload, ttl))
            .await
        {
            Ok(()) => debug!(key = %key, ttl_secs = ttl.as_secs(), "listing cached"),
            Err(e) => warn!(key = %key, error = %e, "failed to cache listing"),
        }
    }

    async fn load_from_store(&self, query: &ListingQuery) -> Result<ListingResult> {
        let total = self
            .store
            .count_matching(query.owner(), query.status())
            .await?;
        let tasks = self
            .store
            .find_page(query.owner(), query.status(), query.skip(), query.page_size())
            .await?;
        Ok(ListingResult::assemble(query, total, tasks))
    }
}
