//! Task service
//!
//! Owner-scoped task operations. Every successful write is followed by
//! invalidation of the owner's cached listings before returning, so the
//! writer's next listing read is computed from the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::cache::ListingCache;
use crate::listing::{InvalidationService, ListingQuery, ListingResult, ListingService};
use crate::task::{Task, TaskPatch, TaskRepository, TaskStatus};
use crate::Result;

/// Fields accepted when creating a task
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn into_task(self, owner: Uuid) -> Result<Task> {
        let mut task = Task::new(owner, &self.title)?;
        if let Some(description) = self.description {
            task = task.with_description(description);
        }
        if let Some(status) = self.status {
            task = task.with_status(status);
        }
        if let Some(due_date) = self.due_date {
            task = task.with_due_date(due_date);
        }
        Ok(task)
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskRepository>,
    listings: ListingService,
    invalidation: InvalidationService,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskRepository>, cache: ListingCache) -> Self {
        Self {
            listings: ListingService::new(Arc::clone(&store), cache.clone()),
            invalidation: InvalidationService::new(cache),
            store,
        }
    }

    pub fn cache(&self) -> &ListingCache {
        self.listings.cache()
    }

    pub async fn get_listing(&self, query: &ListingQuery) -> Result<ListingResult> {
        self.listings.get_listing(query).await
    }

    pub async fn get_task(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.store.get(owner, id).await
    }

    pub async fn create_task(&self, owner: Uuid, input: NewTask) -> Result<Task> {
        let task = input.into_task(owner)?;
        let created = self.store.create(task).await?;
        self.invalidation.invalidate_listings(owner).await;
        Ok(created)
    }

    pub async fn update_task(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> Result<Task> {
        patch.validate()?;
        let updated = self.store.update(owner, id, patch).await?;
        self.invalidation.invalidate_listings(owner).await;
        Ok(updated)
    }

    pub async fn delete_task(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        let deleted = self.store.delete(owner, id).await?;
        self.invalidation.invalidate_listings(owner).await;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheAdapter, ListingKey, MemoryCache};
    use crate::task::MemoryTaskStore;
    use crate::test_support::{CountingStore, FailingCache, FailingStore};
    use crate::Error;

    fn titles(listing: &ListingResult) -> Vec<&str> {
        listing.tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn cached_service() -> (TaskService, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        let service = TaskService::new(
            Arc::new(MemoryTaskStore::new()),
            ListingCache::new(cache.clone()),
        );
        (service, cache)
    }

    #[tokio::test]
    async fn delete_is_visible_on_next_listing() {
        let (service, _cache) = cached_service();
        let owner = Uuid::new_v4();

        let mut ids = Vec::new();
        for title in ["A", "B", "C"] {
            ids.push(service.create_task(owner, NewTask::titled(title)).await.unwrap().id);
        }

        let query = ListingQuery::new(owner, None, 1, 10).unwrap();
        let listing = service.get_listing(&query).await.unwrap();
        assert_eq!(titles(&listing), vec!["C", "B", "A"]);
        assert_eq!(listing.total, 3);
        assert_eq!(listing.total_pages, 1);

        service.delete_task(owner, ids[1]).await.unwrap();

        let listing = service.get_listing(&query).await.unwrap();
        assert_eq!(titles(&listing), vec!["C", "A"]);
        assert_eq!(listing.total, 2);
    }

    #[tokio::test]
    async fn deleting_pending_task_invalidates_filtered_and_unfiltered() {
        let (service, cache) = cached_service();
        let owner = Uuid::new_v4();
        let task = service.create_task(owner, NewTask::titled("Pending")).await.unwrap();

        let all = ListingQuery::new(owner, None, 1, 10).unwrap();
        let pending = ListingQuery::parse(owner, Some("pending"), None, None).unwrap();
        service.get_listing(&all).await.unwrap();
        service.get_listing(&pending).await.unwrap();

        assert_ne!(ListingKey::for_query(&all), ListingKey::for_query(&pending));
        assert_eq!(cache.len().await, 2);

        service.delete_task(owner, task.id).await.unwrap();
        assert!(cache.is_empty().await);

        assert_eq!(service.get_listing(&all).await.unwrap().total, 0);
        assert_eq!(service.get_listing(&pending).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn every_write_recomputes_listings() {
        let store = Arc::new(CountingStore::new(MemoryTaskStore::new()));
        let service = TaskService::new(store.clone(), ListingCache::new(Arc::new(MemoryCache::new())));
        let owner = Uuid::new_v4();
        let query = ListingQuery::new(owner, Some(TaskStatus::Completed), 1, 10).unwrap();

        let task = service.create_task(owner, NewTask::titled("Work")).await.unwrap();
        assert_eq!(service.get_listing(&query).await.unwrap().total, 0);
        assert_eq!(service.get_listing(&query).await.unwrap().total, 0);
        assert_eq!(store.listing_reads(), 1);

        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        service.update_task(owner, task.id, patch).await.unwrap();
        assert_eq!(service.get_listing(&query).await.unwrap().total, 1);
        assert_eq!(store.listing_reads(), 2);

        service.create_task(owner, NewTask::titled("More")).await.unwrap();
        service.get_listing(&query).await.unwrap();
        assert_eq!(store.listing_reads(), 3);
    }

    #[tokio::test]
    async fn writes_do_not_touch_other_owners_cache() {
        let (service, cache) = cached_service();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        service.create_task(bob, NewTask::titled("Bob's")).await.unwrap();

        let bob_query = ListingQuery::new(bob, None, 1, 10).unwrap();
        service.get_listing(&bob_query).await.unwrap();

        service.create_task(alice, NewTask::titled("Alice's")).await.unwrap();
        assert!(cache
            .get(ListingKey::for_query(&bob_query).as_str())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn foreign_task_is_not_found() {
        let (service, _cache) = cached_service();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = service.create_task(owner, NewTask::titled("Mine")).await.unwrap();

        assert!(matches!(
            service.get_task(intruder, task.id).await,
            Err(Error::TaskNotFound(_))
        ));
        assert!(matches!(
            service.update_task(intruder, task.id, TaskPatch::default()).await,
            Err(Error::TaskNotFound(_))
        ));
        assert!(matches!(
            service.delete_task(intruder, task.id).await,
            Err(Error::TaskNotFound(_))
        ));
        assert!(service.get_task(owner, task.id).await.is_ok());
    }

    #[tokio::test]
    async fn validation_errors_leave_cache_untouched() {
        let (service, cache) = cached_service();
        let owner = Uuid::new_v4();
        let task = service.create_task(owner, NewTask::titled("Keep")).await.unwrap();
        service
            .get_listing(&ListingQuery::new(owner, None, 1, 10).unwrap())
            .await
            .unwrap();

        let created = service.create_task(owner, NewTask::titled("  ")).await;
        assert!(matches!(created, Err(Error::InvalidInput(_))));

        let patch = TaskPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_task(owner, task.id, patch).await,
            Err(Error::InvalidInput(_))
        ));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn writes_succeed_without_a_working_cache() {
        for cache in [
            ListingCache::disabled(),
            ListingCache::new(Arc::new(FailingCache)),
        ] {
            let service = TaskService::new(Arc::new(MemoryTaskStore::new()), cache);
            let owner = Uuid::new_v4();

            let task = service.create_task(owner, NewTask::titled("One")).await.unwrap();
            service
                .update_task(
                    owner,
                    task.id,
                    TaskPatch {
                        title: Some("Renamed".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let listing = service
                .get_listing(&ListingQuery::new(owner, None, 1, 10).unwrap())
                .await
                .unwrap();
            assert_eq!(titles(&listing), vec!["Renamed"]);

            service.delete_task(owner, task.id).await.unwrap();
            let listing = service
                .get_listing(&ListingQuery::new(owner, None, 1, 10).unwrap())
                .await
                .unwrap();
            assert_eq!(listing.total, 0);
        }
    }

    #[tokio::test]
    async fn create_applies_optional_fields() {
        let (service, _cache) = cached_service();
        let owner = Uuid::new_v4();
        let due = Utc::now();
        let input = NewTask {
            title: "Full".to_string(),
            description: Some(" details ".to_string()),
            status: Some(TaskStatus::Completed),
            due_date: Some(due),
        };

        let task = service.create_task(owner, input).await.unwrap();
        assert_eq!(task.description.as_deref(), Some("details"));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.due_date, Some(due));
        assert_eq!(task.owner, owner);
    }

    #[tokio::test]
    async fn store_failure_is_returned_and_nothing_is_cached() {
        let cache = Arc::new(MemoryCache::new());
        let service = TaskService::new(Arc::new(FailingStore), ListingCache::new(cache.clone()));
        let owner = Uuid::new_v4();
        let query = ListingQuery::new(owner, None, 1, 10).unwrap();

        let result = service.get_listing(&query).await;
        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn failed_write_does_not_invalidate() {
        let cache = Arc::new(MemoryCache::new());
        let service = TaskService::new(Arc::new(FailingStore), ListingCache::new(cache.clone()));
        let owner = Uuid::new_v4();
        let key = ListingKey::for_query(&ListingQuery::new(owner, None, 1, 10).unwrap());
        cache
            .set_with_ttl(key.as_str(), "{}", std::time::Duration::from_secs(60))
            .await
            .unwrap();

        let created = service.create_task(owner, NewTask::titled("Lost")).await;
        assert!(matches!(created, Err(Error::Storage(_))));
        let deleted = service.delete_task(owner, Uuid::new_v4()).await;
        assert!(matches!(deleted, Err(Error::Storage(_))));

        assert_eq!(cache.get(key.as_str()).await.unwrap().as_deref(), Some("{}"));
    }
}
