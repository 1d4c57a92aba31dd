//! Repository port for project persistence and lookup.

use crate::project::domain::{Project, ProjectId, ProjectStatus};
use crate::task::ports::TaskRepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
///
/// Deleting a project must also delete every task it owns.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project and returns its store-assigned identifier.
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<ProjectId>;

    /// Persists changes to an existing project.
    ///
    /// Returns the number of affected records (zero when the project is
    /// unknown).
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::MissingIdentity`] when the project
    /// has never been inserted.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<u64>;

    /// Deletes a project together with its tasks.
    ///
    /// Returns the number of deleted projects.
    async fn delete(&self, project: &Project) -> ProjectRepositoryResult<u64>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Lists every project ordered by deadline, earliest first.
    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>>;

    /// Lists projects with the given status ordered by deadline.
    async fn list_by_status(&self, status: ProjectStatus)
    -> ProjectRepositoryResult<Vec<Project>>;

    /// Lists projects whose client name contains `client`, ignoring case.
    async fn list_by_client(&self, client: &str) -> ProjectRepositoryResult<Vec<Project>>;

    /// Lists open projects whose deadline is at or after `from`, earliest
    /// first.
    async fn upcoming_deadlines(
        &self,
        from: DateTime<Utc>,
    ) -> ProjectRepositoryResult<Vec<Project>>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// The project has no store-assigned identifier.
    #[error("project has not been persisted yet")]
    MissingIdentity,

    /// Deleting the project's tasks failed.
    #[error("failed to delete tasks of project {project_id}: {source}")]
    Cascade {
        /// Project whose tasks could not be deleted.
        project_id: ProjectId,
        /// Underlying task repository failure.
        #[source]
        source: TaskRepositoryError,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
