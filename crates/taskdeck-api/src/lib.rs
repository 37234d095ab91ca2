//! Wire types shared between the taskdeck client library and its tests.
//!
//! These mirror the remote task store's JSON contract:
//! - `GET /tasks` returns either a bare array of tasks or `{ "tasks": [...] }`
//! - `POST /tasks` takes `{text, status, priority}` and returns the created task
//! - `PATCH /tasks/{id}/status` and `PATCH /tasks/{id}/priority` return the
//!   full updated record
//! - `DELETE /tasks/{id}` returns no required body

pub mod auth;

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single to-do record as the remote store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier. Document-store backends serialize this
    /// field as `_id`; both spellings are accepted.
    #[serde(alias = "_id")]
    pub id: String,
    pub text: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Complete,
}

impl TaskStatus {
    /// The other status. Applying this twice is the identity.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Complete,
            Self::Complete => Self::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Next priority in the low → medium → high → low cycle.
    pub fn cycled(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for `POST /tasks`. The server assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub text: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl CreateTaskRequest {
    /// New-task request with the store defaults: status `pending`,
    /// priority `medium`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
        }
    }
}

/// Body for `PATCH /tasks/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

/// Body for `PATCH /tasks/{id}/priority`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePriorityRequest {
    pub priority: TaskPriority,
}

/// `GET /tasks` response. The store has shipped both a bare array and an
/// object wrapping the array under `tasks`; accept either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskListResponse {
    Tasks(Vec<Task>),
    Wrapped { tasks: Vec<Task> },
}

impl TaskListResponse {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            Self::Tasks(tasks) => tasks,
            Self::Wrapped { tasks } => tasks,
        }
    }
}
