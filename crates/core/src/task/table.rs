//! Owner-scoped task table shared by the store implementations

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Task, TaskPatch, TaskStatus};
use crate::{Error, Result};

/// Tasks kept in insertion order.
///
/// Insertion order breaks ties between tasks with the same `created_at`,
/// so that listings are totally ordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct TaskTable {
    tasks: Vec<Task>,
}

impl TaskTable {
    fn matching(
        &self,
        owner: Uuid,
        status: Option<TaskStatus>,
    ) -> impl DoubleEndedIterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |t| t.owner == owner && status.map_or(true, |s| t.status == s))
    }

    pub fn count(&self, owner: Uuid, status: Option<TaskStatus>) -> u64 {
        self.matching(owner, status).count() as u64
    }

    pub fn page(&self, owner: Uuid, status: Option<TaskStatus>, skip: u64, limit: u64) -> Vec<Task> {
        let mut tasks: Vec<&Task> = self.matching(owner, status).rev().collect();
        // Stable sort keeps later inserts first among equal timestamps
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    pub fn insert(&mut self, task: Task) -> Result<Task> {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(Error::InvalidInput(format!(
                "Task with ID {} already exists",
                task.id
            )));
        }
        self.tasks.push(task.clone());
        Ok(task)
    }

    pub fn get(&self, owner: Uuid, id: Uuid) -> Result<Task> {
        self.position(owner, id).map(|idx| self.tasks[idx].clone())
    }

    pub fn update(&mut self, owner: Uuid, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let idx = self.position(owner, id)?;
        let mut task = self.tasks[idx].clone();
        patch.apply(&mut task)?;
        self.tasks[idx] = task.clone();
        Ok(task)
    }

    pub fn remove(&mut self, owner: Uuid, id: Uuid) -> Result<Task> {
        let idx = self.position(owner, id)?;
        Ok(self.tasks.remove(idx))
    }

    fn position(&self, owner: Uuid, id: Uuid) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id && t.owner == owner)
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_orders_newest_first_with_insertion_tiebreak() {
        let owner = Uuid::new_v4();
        let mut table = TaskTable::default();
        let first = Task::new(owner, "A").unwrap();
        let mut second = Task::new(owner, "B").unwrap();
        second.created_at = first.created_at;
        table.insert(first).unwrap();
        table.insert(second).unwrap();

        let titles: Vec<String> = table
            .page(owner, None, 0, 10)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn other_owner_is_not_found() {
        let owner = Uuid::new_v4();
        let mut table = TaskTable::default();
        let task = table.insert(Task::new(owner, "Mine").unwrap()).unwrap();

        let stranger = Uuid::new_v4();
        assert!(matches!(
            table.get(stranger, task.id),
            Err(Error::TaskNotFound(_))
        ));
        assert!(matches!(
            table.remove(stranger, task.id),
            Err(Error::TaskNotFound(_))
        ));
        assert_eq!(table.count(owner, None), 1);
    }

    #[test]
    fn failed_patch_leaves_task_untouched() {
        let owner = Uuid::new_v4();
        let mut table = TaskTable::default();
        let task = table.insert(Task::new(owner, "Keep").unwrap()).unwrap();

        let patch = TaskPatch {
            title: Some("".to_string()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(table.update(owner, task.id, patch).is_err());
        assert_eq!(table.get(owner, task.id).unwrap(), task);
    }
}
