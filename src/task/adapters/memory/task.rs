//! In-memory task store with live query fan-out.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::watch;

use crate::project::domain::ProjectId;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{
        TaskListSubscription, TaskQuery, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult,
    },
};

/// Thread-safe in-memory task repository.
///
/// Records are kept in their persisted layout, so reads go through the same
/// conversion a real store would apply.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    rows: BTreeMap<TaskId, PersistedTaskData>,
    last_id: i64,
    subscribers: Vec<Subscriber>,
}

#[derive(Debug)]
struct Subscriber {
    query: TaskQuery,
    sender: watch::Sender<Vec<Task>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn len(&self) -> TaskRepositoryResult<usize> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.rows.len())
    }

    /// Returns the raw stored record, bypassing domain conversion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn raw_record(&self, id: TaskId) -> TaskRepositoryResult<Option<PersistedTaskData>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.rows.get(&id).cloned())
    }

    /// Writes a raw record as-is, bypassing domain conversion.
    ///
    /// Lets callers seed records left behind by an interrupted process.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lock is poisoned.
    pub fn put_raw_record(&self, record: PersistedTaskData) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.last_id = state.last_id.max(record.id.value());
        state.rows.insert(record.id, record);
        notify_subscribers(&mut state);
        Ok(())
    }
}

fn snapshot(rows: &BTreeMap<TaskId, PersistedTaskData>, query: TaskQuery) -> Vec<Task> {
    query.select(rows.values().cloned().map(Task::from_persisted))
}

/// Pushes fresh snapshots to live subscribers and forgets dropped ones.
fn notify_subscribers(state: &mut InMemoryTaskState) {
    state.subscribers.retain(|subscriber| !subscriber.sender.is_closed());
    for subscriber in &state.subscribers {
        let next = snapshot(&state.rows, subscriber.query);
        subscriber.sender.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: &Task) -> TaskRepositoryResult<TaskId> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let id = match task.id() {
            Some(id) => id,
            None => TaskId::new(state.last_id.saturating_add(1))
                .map_err(TaskRepositoryError::persistence)?,
        };
        state.last_id = state.last_id.max(id.value());
        state.rows.insert(id, task.to_persisted(id));
        notify_subscribers(&mut state);
        Ok(id)
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<u64> {
        let id = task.id().ok_or(TaskRepositoryError::MissingIdentity)?;
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let Some(row) = state.rows.get_mut(&id) else {
            return Ok(0);
        };
        *row = task.to_persisted(id);
        notify_subscribers(&mut state);
        Ok(1)
    }

    async fn delete(&self, task: &Task) -> TaskRepositoryResult<u64> {
        let id = task.id().ok_or(TaskRepositoryError::MissingIdentity)?;
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.rows.remove(&id).is_none() {
            return Ok(0);
        }
        notify_subscribers(&mut state);
        Ok(1)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.rows.get(&id).cloned().map(Task::from_persisted))
    }

    async fn update_status_only(
        &self,
        id: TaskId,
        status: TaskStatus,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let row = state
            .rows
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        row.status = status;
        notify_subscribers(&mut state);
        Ok(())
    }

    async fn update_timer_state(
        &self,
        id: TaskId,
        worked_time: Duration,
        timer_started_at: Option<DateTime<Utc>>,
    ) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let row = state
            .rows
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        row.set_timer_state(worked_time, timer_started_at);
        notify_subscribers(&mut state);
        Ok(())
    }

    async fn delete_all_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<u64> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let before = state.rows.len();
        state.rows.retain(|_, row| row.project_id != project_id);
        let removed = before.saturating_sub(state.rows.len());
        if removed > 0 {
            notify_subscribers(&mut state);
        }
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    async fn subscribe(&self, query: TaskQuery) -> TaskRepositoryResult<TaskListSubscription> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let (sender, receiver) = watch::channel(snapshot(&state.rows, query));
        state.subscribers.push(Subscriber { query, sender });
        Ok(TaskListSubscription::new(receiver))
    }
}
