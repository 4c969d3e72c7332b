//! Test doubles for store and cache adapters

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::cache::{CacheAdapter, CacheError};
use crate::task::{Task, TaskPatch, TaskRepository, TaskStatus};
use crate::{Error, Result};

/// Store wrapper that counts listing page reads
pub struct CountingStore<R> {
    inner: R,
    pages: AtomicUsize,
}

impl<R> CountingStore<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pages: AtomicUsize::new(0),
        }
    }

    pub fn listing_reads(&self) -> usize {
        self.pages.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: TaskRepository> TaskRepository for CountingStore<R> {
    async fn count_matching(&self, owner: Uuid, status: Option<TaskStatus>) -> Result<u64> {
        self.inner.count_matching(owner, status).await
    }

    async fn find_page(
        &self,
        owner: Uuid,
        status: Option<TaskStatus>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Task>> {
        self.pages.fetch_add(1, Ordering::SeqCst);
        self.inner.find_page(owner, status, skip, limit).await
    }

    async fn create(&self, task: Task) -> Result<Task> {
        self.inner.create(task).await
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.inner.get(owner, id).await
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> Result<Task> {
        self.inner.update(owner, id, patch).await
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.inner.delete(owner, id).await
    }
}

/// Store whose every call fails as an unreachable backend would
pub struct FailingStore;

fn store_down<T>() -> Result<T> {
    Err(Error::Storage("store unavailable".to_string()))
}

#[async_trait]
impl TaskRepository for FailingStore {
    async fn count_matching(&self, _owner: Uuid, _status: Option<TaskStatus>) -> Result<u64> {
        store_down()
    }

    async fn find_page(
        &self,
        _owner: Uuid,
        _status: Option<TaskStatus>,
        _skip: u64,
        _limit: u64,
    ) -> Result<Vec<Task>> {
        store_down()
    }

    async fn create(&self, _task: Task) -> Result<Task> {
        store_down()
    }

    async fn get(&self, _owner: Uuid, _id: Uuid) -> Result<Task> {
        store_down()
    }

    async fn update(&self, _owner: Uuid, _id: Uuid, _patch: TaskPatch) -> Result<Task> {
        store_down()
    }

    async fn delete(&self, _owner: Uuid, _id: Uuid) -> Result<Task> {
        store_down()
    }
}

/// Cache whose every call fails
pub struct FailingCache;

#[async_trait]
impl CacheAdapter for FailingCache {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn get(&self, _key: &str) -> std::result::Result<Option<String>, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> std::result::Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn keys_matching(&self, _pattern: &str) -> std::result::Result<Vec<String>, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn delete_many(&self, _keys: &[String]) -> std::result::Result<u64, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }
}

/// Cache that stalls for `delay` before answering like an empty cache
pub struct SlowCache {
    delay: Duration,
}

impl SlowCache {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CacheAdapter for SlowCache {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn get(&self, _key: &str) -> std::result::Result<Option<String>, CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn set_with_ttl(
        &self,
        _key: &str,
        _value: &str,
        _ttl: Duration,
    ) -> std::result::Result<(), CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn keys_matching(&self, _pattern: &str) -> std::result::Result<Vec<String>, CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }

    async fn delete_many(&self, _keys: &[String]) -> std::result::Result<u64, CacheError> {
        tokio::time::sleep(self.delay).await;
        Ok(0)
    }
}
