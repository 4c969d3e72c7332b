//! Application state

use std::sync::Arc;

use taskboard_core::cache::{ListingCache, MemoryCache, RedisCache};
use taskboard_core::service::TaskService;
use taskboard_core::task::{FileTaskStore, MemoryTaskStore, TaskRepository};

use crate::auth::{JwtKeys, UserStore};
use crate::config::{CacheKind, ServerConfig, StoreKind};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    tasks: TaskService,
    users: UserStore,
    jwt: JwtKeys,
}

impl AppState {
    /// Build stores and the cache handle described by `config`.
    ///
    /// An unreachable Redis is not fatal: the server starts with the cache
    /// disabled and every listing is read from the store.
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn TaskRepository> = match config.store {
            StoreKind::File => {
                Arc::new(FileTaskStore::new(config.data_dir.join("tasks.json")).await?)
            }
            StoreKind::Memory => Arc::new(MemoryTaskStore::new()),
        };
        let users = match config.store {
            StoreKind::File => UserStore::new(config.data_dir.join("users.json")).await?,
            StoreKind::Memory => UserStore::in_memory(),
        };
        tracing::info!(store = ?config.store, data_dir = ?config.data_dir, "task store ready");

        let cache = connect_cache(config)
            .await
            .with_ttl(config.cache_ttl)
            .with_timeout(config.cache_timeout);
        tracing::info!(
            backend = cache.backend_name(),
            ttl_secs = cache.ttl().as_secs(),
            timeout_ms = cache.timeout().as_millis() as u64,
            "listing cache ready"
        );

        Ok(Self::with_parts(
            TaskService::new(store, cache),
            users,
            JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_hours),
        ))
    }

    pub fn with_parts(tasks: TaskService, users: UserStore, jwt: JwtKeys) -> Self {
        Self {
            inner: Arc::new(AppStateInner { tasks, users, jwt }),
        }
    }

    pub fn tasks(&self) -> &TaskService {
        &self.inner.tasks
    }

    pub fn users(&self) -> &UserStore {
        &self.inner.users
    }

    pub fn jwt(&self) -> &JwtKeys {
        &self.inner.jwt
    }
}

async fn connect_cache(config: &ServerConfig) -> ListingCache {
    match config.cache {
        CacheKind::Disabled => {
            tracing::info!("Listing cache disabled, serving listings from the store");
            ListingCache::disabled()
        }
        CacheKind::Memory => ListingCache::new(Arc::new(MemoryCache::new())),
        CacheKind::Redis => {
            tracing::info!(url = %config.redis_url, "Connecting to Redis");
            let connect = RedisCache::connect(&config.redis_url);
            match tokio::time::timeout(config.cache_timeout * 4, connect).await {
                Ok(Ok(redis)) => {
                    tracing::info!("Redis connected");
                    ListingCache::new(Arc::new(redis))
                }
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Redis unavailable, running without listing cache");
                    ListingCache::disabled()
                }
                Err(_) => {
                    tracing::warn!("Redis connection timed out, running without listing cache");
                    ListingCache::disabled()
                }
            }
        }
    }
}
