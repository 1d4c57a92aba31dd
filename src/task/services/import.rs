//! Bulk import of open issues as pending tasks.

use crate::config::ImportConfig;
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{ExternalIssue, Task, TaskDomainError, TaskId},
    ports::{IssueSource, IssueSourceError, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for importing the open issues of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    owner: String,
    repository: String,
    project_id: ProjectId,
}

impl ImportRequest {
    /// Creates a request targeting `project_id`.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        project_id: ProjectId,
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            project_id,
        }
    }

    /// Returns the repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }
}

/// Outcome of a completed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    task_ids: Vec<TaskId>,
}

impl ImportReport {
    /// Returns how many tasks were written.
    #[must_use]
    pub fn imported(&self) -> usize {
        self.task_ids.len()
    }

    /// Returns the identifiers of the written tasks, in write order.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }
}

/// Errors returned by the import pipeline.
#[derive(Debug, Error)]
pub enum IssueImportError {
    /// The owner was blank; nothing was fetched.
    #[error("repository owner must not be blank")]
    BlankOwner,

    /// The repository was blank; nothing was fetched.
    #[error("repository name must not be blank")]
    BlankRepository,

    /// The transport failed; nothing was written.
    #[error("failed to fetch issues from {owner}/{repository}: {source}")]
    Transport {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repository: String,
        /// Transport failure.
        #[source]
        source: IssueSourceError,
    },

    /// The transport did not answer in time; nothing was written.
    #[error("fetching issues from {owner}/{repository} timed out after {timeout:?}")]
    TimedOut {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repository: String,
        /// Configured bound.
        timeout: Duration,
    },

    /// An issue could not be turned into a task; nothing was written.
    #[error("issue at position {position} could not be imported: {source}")]
    Mapping {
        /// Zero-based position of the issue in the fetched list.
        position: usize,
        /// Validation failure.
        #[source]
        source: TaskDomainError,
    },

    /// A write failed; tasks written before it are kept.
    #[error("import stopped after {imported} tasks: {source}")]
    Persistence {
        /// Tasks written before the failure.
        imported: usize,
        /// Repository failure.
        #[source]
        source: TaskRepositoryError,
    },
}

impl IssueImportError {
    /// Returns how many tasks were written before the failure.
    #[must_use]
    pub const fn imported(&self) -> usize {
        match self {
            Self::Persistence { imported, .. } => *imported,
            Self::BlankOwner
            | Self::BlankRepository
            | Self::Transport { .. }
            | Self::TimedOut { .. }
            | Self::Mapping { .. } => 0,
        }
    }
}

/// Result type for import operations.
pub type IssueImportResult<T> = Result<T, IssueImportError>;

/// Fetches open issues and writes them as pending tasks.
///
/// Re-importing a repository creates new tasks each time: records are keyed
/// by local identifier only, never by external issue.
#[derive(Clone)]
pub struct IssueImportService<R, S, C>
where
    R: TaskRepository,
    S: IssueSource,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    source: Arc<S>,
    clock: Arc<C>,
    config: ImportConfig,
}

impl<R, S, C> IssueImportService<R, S, C>
where
    R: TaskRepository,
    S: IssueSource,
    C: Clock + Send + Sync,
{
    /// Creates a new import service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        source: Arc<S>,
        clock: Arc<C>,
        config: ImportConfig,
    ) -> Self {
        Self {
            repository,
            source,
            clock,
            config,
        }
    }

    /// Imports the open issues of a repository into a project.
    ///
    /// Issues are mapped as a whole before the first write, then written one
    /// by one. There is no transaction around the batch: a failed write
    /// stops the import and keeps what was already written.
    ///
    /// # Errors
    ///
    /// Returns [`IssueImportError`] for blank input, transport failure or
    /// timeout, an unmappable issue, or a failed write.
    pub async fn import(&self, request: &ImportRequest) -> IssueImportResult<ImportReport> {
        let (owner, repository) = validate_target(request.owner(), request.repository())?;
        let issues = self.fetch(owner, repository).await?;

        let clock = &*self.clock;
        let tasks = issues
            .iter()
            .enumerate()
            .map(|(position, issue)| {
                Task::from_issue(issue, request.project_id(), clock)
                    .map_err(|source| IssueImportError::Mapping { position, source })
            })
            .collect::<IssueImportResult<Vec<Task>>>()?;

        let mut task_ids = Vec::with_capacity(tasks.len());
        for task in &tasks {
            match self.repository.insert(task).await {
                Ok(task_id) => task_ids.push(task_id),
                Err(source) => {
                    warn!(
                        owner,
                        repository,
                        imported = task_ids.len(),
                        error = %source,
                        "import stopped by a failed write"
                    );
                    return Err(IssueImportError::Persistence {
                        imported: task_ids.len(),
                        source,
                    });
                }
            }
        }

        info!(
            owner,
            repository,
            project_id = %request.project_id(),
            imported = task_ids.len(),
            "issues imported"
        );
        Ok(ImportReport { task_ids })
    }

    /// Reports whether the transport can reach the configured probe
    /// repository. Writes nothing.
    pub async fn probe_connectivity(&self) -> bool {
        let owner = self.config.probe_owner.as_str();
        let repository = self.config.probe_repository.as_str();
        match self.fetch(owner, repository).await {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "connectivity probe failed");
                false
            }
        }
    }

    async fn fetch(
        &self,
        owner: &str,
        repository: &str,
    ) -> IssueImportResult<Vec<ExternalIssue>> {
        let timeout = self.config.timeout();
        match tokio::time::timeout(timeout, self.source.fetch_open_issues(owner, repository)).await
        {
            Ok(Ok(issues)) => Ok(issues),
            Ok(Err(source)) => Err(IssueImportError::Transport {
                owner: owner.to_owned(),
                repository: repository.to_owned(),
                source,
            }),
            Err(_) => Err(IssueImportError::TimedOut {
                owner: owner.to_owned(),
                repository: repository.to_owned(),
                timeout,
            }),
        }
    }
}

/// Rejects blank input before anything reaches the transport.
fn validate_target<'a>(
    owner: &'a str,
    repository: &'a str,
) -> IssueImportResult<(&'a str, &'a str)> {
    let owner_trimmed = owner.trim();
    if owner_trimmed.is_empty() {
        return Err(IssueImportError::BlankOwner);
    }
    let repository_trimmed = repository.trim();
    if repository_trimmed.is_empty() {
        return Err(IssueImportError::BlankRepository);
    }
    Ok((owner_trimmed, repository_trimmed))
}
