//! Task status changes written as targeted status-only updates.

use crate::task::{
    domain::{Task, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for status changes.
#[derive(Debug, Error)]
pub enum TaskStatusError {
    /// The task has not been saved, so it has no identifier to update.
    #[error("task has not been saved yet")]
    MissingIdentity,
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for status operations.
pub type TaskStatusResult<T> = Result<T, TaskStatusError>;

/// Applies status transitions through the status-only write.
///
/// No transition graph is enforced. Writing the status column alone keeps a
/// concurrently running timer's fields intact.
#[derive(Clone)]
pub struct TaskStatusService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskStatusService<R>
where
    R: TaskRepository,
{
    /// Creates a new status service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Flips a task between done and pending and returns the new status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStatusError::MissingIdentity`] for an unsaved task, or
    /// the repository error when the write fails.
    pub async fn toggle_completion(&self, task: &Task) -> TaskStatusResult<TaskStatus> {
        let task_id = task.id().ok_or(TaskStatusError::MissingIdentity)?;
        let next = task.status().toggled_completion();
        self.set_status(task_id, next).await?;
        Ok(next)
    }

    /// Moves a task to any status.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the write fails or the task does
    /// not exist.
    pub async fn set_status(&self, task_id: TaskId, status: TaskStatus) -> TaskStatusResult<()> {
        self.repository.update_status_only(task_id, status).await?;
        info!(%task_id, %status, "task status updated");
        Ok(())
    }
}
