//! Repository port for task persistence, targeted updates, and live queries.

use crate::project::domain::ProjectId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::TaskListSubscription;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Filter for a live task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskQuery {
    /// Every task of a project.
    ByProject(ProjectId),
    /// Tasks of a project with a given status.
    ByStatus {
        /// Owning project.
        project_id: ProjectId,
        /// Required status.
        status: TaskStatus,
    },
    /// Tasks of any project that are not done.
    Pending,
}

impl TaskQuery {
    /// Returns `true` when `task` belongs in the query result.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match *self {
            Self::ByProject(project_id) => task.project_id() == project_id,
            Self::ByStatus { project_id, status } => {
                task.project_id() == project_id && task.status() == status
            }
            Self::Pending => !task.status().is_done(),
        }
    }

    /// Filters `tasks` and orders them newest first.
    ///
    /// Ties on creation time fall back to the identifier, highest first.
    #[must_use]
    pub fn select(&self, tasks: impl IntoIterator<Item = Task>) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks.into_iter().filter(|task| self.matches(task)).collect();
        selected.sort_by_key(|task| Reverse((task.created_at(), task.id())));
        selected
    }
}

/// Task persistence contract.
///
/// Every write is atomic at the store boundary. Stores notify live
/// subscriptions after each write that changes their result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task and returns its identifier.
    ///
    /// Tasks without an identifier receive a new one. A task whose
    /// identifier already exists replaces the stored record.
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<TaskId>;

    /// Persists every field of an existing task.
    ///
    /// Returns the number of affected records (zero when the task is
    /// unknown).
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::MissingIdentity`] when the task has
    /// never been inserted.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<u64>;

    /// Deletes a task and returns the number of deleted records.
    async fn delete(&self, task: &Task) -> TaskRepositoryResult<u64>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Writes the status column only, leaving timer fields untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_status_only(&self, id: TaskId, status: TaskStatus)
    -> TaskRepositoryResult<()>;

    /// Writes the timer columns only, leaving title, description, and status
    /// untouched.
    ///
    /// `timer_started_at` is the start of the open session, or `None` when
    /// the timer is stopped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_timer_state(
        &self,
        id: TaskId,
        worked_time: Duration,
        timer_started_at: Option<DateTime<Utc>>,
    ) -> TaskRepositoryResult<()>;

    /// Deletes every task of a project and returns how many were removed.
    async fn delete_all_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64>;

    /// Registers a live query.
    ///
    /// The subscription starts with the current result and receives a new
    /// snapshot whenever a write changes it.
    async fn subscribe(&self, query: TaskQuery) -> TaskRepositoryResult<TaskListSubscription>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task has no store-assigned identifier.
    #[error("task has not been persisted yet")]
    MissingIdentity,

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
