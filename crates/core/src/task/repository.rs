//! Task repository trait
//!
//! Defines the interface for owner-scoped task storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Task, TaskPatch, TaskStatus};
use crate::Result;

/// Repository interface for task CRUD and paginated queries.
///
/// Every operation is scoped by owner. A task that exists under a different
/// owner must be reported exactly like a missing one (`Error::TaskNotFound`).
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Count the owner's tasks, optionally restricted to one status
    async fn count_matching(&self, owner: Uuid, status: Option<TaskStatus>) -> Result<u64>;

    /// Return up to `limit` tasks after skipping `skip`, newest first
    async fn find_page(
        &self,
        owner: Uuid,
        status: Option<TaskStatus>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Task>>;

    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get one of the owner's tasks
    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task>;

    /// Apply a patch to one of the owner's tasks
    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> Result<Task>;

    /// Delete one of the owner's tasks, returning the removed record
    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Task>;
}
