//! File-based task storage implementation
//!
//! Stores tasks as JSON in a file on disk.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Task, TaskPatch, TaskStatus};
use super::repository::TaskRepository;
use super::table::TaskTable;
use crate::{Error, Result};

/// File-based task store using JSON
pub struct FileTaskStore {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the file contents
    table: RwLock<TaskTable>,
}

impl FileTaskStore {
    /// Create a new FileTaskStore
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            TaskTable::default()
        };

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    /// Persist the table to disk
    ///
    /// Called with the write guard held so that concurrent mutations are
    /// written in the order they were applied.
    async fn persist(&self, table: &TaskTable) -> Result<()> {
        let content = serde_json::to_string_pretty(table)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("cannot create {:?}: {}", parent, e)))?;
        }

        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| Error::Storage(format!("cannot write {:?}: {}", self.path, e)))
    }
}

#[async_trait]
impl TaskRepository for FileTaskStore {
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
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let created = next.insert(task)?;
        self.persist(&next).await?;
        *table = next;
        Ok(created)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.table.read().await.get(owner, id)
    }

    async fn update(&self, owner: Uuid, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let updated = next.update(owner, id, patch)?;
        self.persist(&next).await?;
        *table = next;
        Ok(updated)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let removed = next.remove(owner, id)?;
        self.persist(&next).await?;
        *table = next;
        Ok(removed)
    }
}
