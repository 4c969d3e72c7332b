//! In-memory task storage implementation

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Task, TaskPatch, TaskStatus};
use super::repository::TaskRepository;
use super::table::TaskTable;
use crate::Result;

/// Task store that lives only for the lifetime of the process
#[derive(Default)]
pub struct MemoryTaskStore {
    table: RwLock<TaskTable>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryTaskStore {
    async fn count_matching(&self, owner: Uuid, status: Option<TaskStatus>) -> Result<u64> {
        Ok(self.table.read().await.count(owner, status))
    }

    async fn find_page(
        &self,
        owner: Uuid,
        status: Option<TaskStatus>,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Task>> {
        Ok(self.table.read().await.page(owner, status, skip, limit))
    }

    async fn create(&self, task: Task) -> Result<Task> {
        self.table.write().await.insert(task)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.table.read().await.get(owner, id)
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> Result<Task> {
        self.table.write().await.update(owner, id, patch)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.table.write().await.remove(owner, id)
    }
}
