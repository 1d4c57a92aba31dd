//! Per-project facade consumed by presentation.

use crate::config::ImportConfig;
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{Task, TaskStatus},
    ports::{IssueSource, TaskListSubscription, TaskQuery, TaskRepository, TaskRepositoryResult},
    views::TaskSummary,
};
use mockable::Clock;
use std::sync::Arc;

use super::{
    ImportReport, ImportRequest, IssueImportResult, IssueImportService, TaskStatusResult,
    TaskStatusService,
};

/// Live task list of one project plus its status and import entry points.
///
/// Each operation replaces the retained message with its outcome: an error
/// description, an import notice, or nothing.
pub struct ProjectBoard<R, S, C>
where
    R: TaskRepository,
    S: IssueSource,
    C: Clock + Send + Sync,
{
    project_id: ProjectId,
    tasks: TaskListSubscription,
    statuses: TaskStatusService<R>,
    importer: IssueImportService<R, S, C>,
    message: Option<String>,
}

impl<R, S, C> ProjectBoard<R, S, C>
where
    R: TaskRepository,
    S: IssueSource,
    C: Clock + Send + Sync,
{
    /// Subscribes to the project's tasks and wires the services.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the subscription fails.
    pub async fn open(
        repository: Arc<R>,
        source: Arc<S>,
        clock: Arc<C>,
        config: ImportConfig,
        project_id: ProjectId,
    ) -> TaskRepositoryResult<Self> {
        let tasks = repository.subscribe(TaskQuery::ByProject(project_id)).await?;
        Ok(Self {
            project_id,
            tasks,
            statuses: TaskStatusService::new(Arc::clone(&repository)),
            importer: IssueImportService::new(repository, source, clock, config),
            message: None,
        })
    }

    /// Returns the project shown on the board.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the latest task list, newest first.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.current()
    }

    /// Waits for the task list to change and returns the new list.
    ///
    /// Returns `None` once the store has gone away.
    pub async fn next_tasks(&mut self) -> Option<Vec<Task>> {
        self.tasks.next().await
    }

    /// Returns aggregate figures for the latest task list.
    #[must_use]
    pub fn summary(&self) -> TaskSummary {
        TaskSummary::from_tasks(&self.tasks.current())
    }

    /// Flips a task between done and pending.
    ///
    /// # Errors
    ///
    /// Returns the status service error; its description is retained.
    pub async fn toggle_completion(&mut self, task: &Task) -> TaskStatusResult<TaskStatus> {
        let result = self.statuses.toggle_completion(task).await;
        self.message = result
            .as_ref()
            .err()
            .map(|err| format!("failed to update task: {err}"));
        result
    }

    /// Imports the open issues of `owner/repository` into the project.
    ///
    /// # Errors
    ///
    /// Returns the import error; its description is retained.
    pub async fn import_issues(
        &mut self,
        owner: &str,
        repository: &str,
    ) -> IssueImportResult<ImportReport> {
        let request = ImportRequest::new(owner, repository, self.project_id);
        let result = self.importer.import(&request).await;
        self.message = Some(match &result {
            Ok(report) => format!("{} tasks imported", report.imported()),
            Err(err) => format!("import failed: {err}"),
        });
        result
    }

    /// Checks whether the import transport is reachable.
    pub async fn probe_connectivity(&self) -> bool {
        self.importer.probe_connectivity().await
    }

    /// Returns the retained message, if any.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Forgets the retained message.
    pub fn clear_message(&mut self) {
        self.message = None;
    }
}
