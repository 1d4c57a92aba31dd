//! In-memory project repository with task cascade.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{PersistedProjectData, Project, ProjectId, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::task::ports::TaskRepository;

/// Thread-safe in-memory project repository.
///
/// Deleting a project removes its tasks from the paired task repository.
#[derive(Debug, Clone)]
pub struct InMemoryProjectRepository<T>
where
    T: TaskRepository,
{
    state: Arc<RwLock<InMemoryProjectState>>,
    tasks: Arc<T>,
}

#[derive(Debug, Default)]
struct InMemoryProjectState {
    rows: BTreeMap<ProjectId, PersistedProjectData>,
    last_id: i64,
}

impl<T> InMemoryProjectRepository<T>
where
    T: TaskRepository,
{
    /// Creates an empty repository that cascades deletes into `tasks`.
    #[must_use]
    pub fn new(tasks: Arc<T>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryProjectState::default())),
            tasks,
        }
    }

    fn list_where(
        &self,
        predicate: impl Fn(&PersistedProjectData) -> bool,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut projects: Vec<Project> = state
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .map(Project::from_persisted)
            .collect();
        projects.sort_by_key(Project::deadline);
        Ok(projects)
    }
}

#[async_trait]
impl<T> ProjectRepository for InMemoryProjectRepository<T>
where
    T: TaskRepository,
{
    async fn insert(&self, project: &Project) -> ProjectRepositoryResult<ProjectId> {
        let mut state = self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let id = match project.id() {
            Some(id) => id,
            None => ProjectId::new(state.last_id.saturating_add(1))
                .map_err(ProjectRepositoryError::persistence)?,
        };
        state.last_id = state.last_id.max(id.value());
        state.rows.insert(id, project.to_persisted(id));
        Ok(id)
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<u64> {
        let id = project.id().ok_or(ProjectRepositoryError::MissingIdentity)?;
        let mut state = self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let Some(row) = state.rows.get_mut(&id) else {
            return Ok(0);
        };
        *row = project.to_persisted(id);
        Ok(1)
    }

    async fn delete(&self, project: &Project) -> ProjectRepositoryResult<u64> {
        let id = project.id().ok_or(ProjectRepositoryError::MissingIdentity)?;
        let exists = {
            let state = self.state.read().map_err(|err| {
                ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
            })?;
            state.rows.contains_key(&id)
        };
        if !exists {
            return Ok(0);
        }
        // A failed cascade must leave the project row in place.
        self.tasks
            .delete_all_for_project(id)
            .await
            .map_err(|source| ProjectRepositoryError::Cascade {
                project_id: id,
                source,
            })?;
        let mut state = self.state.write().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(u64::from(state.rows.remove(&id).is_some()))
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let state = self.state.read().map_err(|err| {
            ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.rows.get(&id).cloned().map(Project::from_persisted))
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.list_where(|_| true)
    }

    async fn list_by_status(
        &self,
        status: ProjectStatus,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        self.list_where(|row| row.status == status)
    }

    async fn list_by_client(&self, client: &str) -> ProjectRepositoryResult<Vec<Project>> {
        let needle = client.trim().to_lowercase();
        self.list_where(|row| row.client.to_lowercase().contains(&needle))
    }

    async fn upcoming_deadlines(
        &self,
        from: DateTime<Utc>,
    ) -> ProjectRepositoryResult<Vec<Project>> {
        self.list_where(|row| row.deadline >= from && !row.status.is_closed())
    }
}
