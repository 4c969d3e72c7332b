//! Task model definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Task completion status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(Error::InvalidInput(format!(
                "Invalid status filter '{}'",
                value
            ))),
        }
    }
}

/// A task owned by a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task for `owner`.
    ///
    /// The title is trimmed and must not be empty.
    pub fn new(owner: Uuid, title: impl AsRef<str>) -> Result<Self> {
        let title = normalize_title(title.as_ref())?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: None,
            status: TaskStatus::default(),
            due_date: None,
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Set the description
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = Some(description.as_ref().trim().to_string());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Partial update applied to an existing task
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskPatch {
    /// Reject patches that would leave the task invalid
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            normalize_title(title)?;
        }
        Ok(())
    }

    /// Apply the patch in place and bump `updated_at`
    pub fn apply(self, task: &mut Task) -> Result<()> {
        if let Some(title) = self.title {
            task.title = normalize_title(&title)?;
        }
        if let Some(description) = self.description {
            task.description = Some(description.trim().to_string());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();
        Ok(())
    }
}

fn normalize_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Title is required".to_string()));
    }
    Ok(title.to_string())
}
