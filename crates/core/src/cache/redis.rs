//! Redis cache adapter
//!
//! Shared by every backend instance pointing at the same Redis, which is
//! what makes owner-wide invalidation visible to all of them.

use std::time::Duration;

use async_trait::async_trait;
use ::redis::aio::MultiplexedConnection;
use ::redis::AsyncCommands;

use super::adapter::{CacheAdapter, CacheError};

pub struct RedisCache {
    conn: MultiplexedConnection,
}

impl RedisCache {
    /// Connect to Redis at `url` (`redis://[:<password>@]<host>:<port>[/<db>]`).
    ///
    /// Fails if the connection cannot be established, so callers can decide
    /// to run without a cache instead.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = ::redis::Client::open(url)
            .map_err(|e| CacheError::Backend(format!("failed to create Redis client: {}", e)))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::Backend(format!("failed to connect to Redis: {}", e)))?;
        Ok(Self { conn })
    }
}

fn map_redis_error(err: ::redis::RedisError, op: &str) -> CacheError {
    CacheError::Backend(format!("Redis {} failed: {}", op, err))
}

#[async_trait]
impl CacheAdapter for RedisCache {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| map_redis_error(e, "GET"))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(|e| map_redis_error(e, "SETEX"))
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.conn.clone();
        conn.keys::<_, Vec<String>>(pattern)
            .await
            .map_err(|e| map_redis_error(e, "KEYS"))
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        conn.del::<_, u64>(keys.to_vec())
            .await
            .map_err(|e| map_redis_error(e, "DEL"))
    }
}
