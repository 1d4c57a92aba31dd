//! Per-task editing session with a start/pause work timer.
//!
//! The session owns one working copy of a task and at most one background
//! ticker. The ticker only refreshes the displayed live value; persisted work
//! time changes only when a session is closed by pause, save, or exit.

use crate::config::TimerConfig;
use crate::project::domain::ProjectId;
use crate::task::{
    domain::{Task, TaskDomainError, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Service-level errors for time tracking.
#[derive(Debug, Error)]
pub enum TimeTrackingError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task does not exist in the store.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

/// Result type for time-tracking operations.
pub type TimeTrackingResult<T> = Result<T, TimeTrackingError>;

/// Observable state of the session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// No session is open.
    Stopped,
    /// A session has been open since `started_at`.
    Running {
        /// Start of the open session.
        started_at: DateTime<Utc>,
    },
}

/// Unsaved edits to the task's descriptive fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingEdits {
    title: String,
    description: String,
    status: TaskStatus,
}

impl PendingEdits {
    fn from_task(task: &Task) -> Self {
        Self {
            title: task.title().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
        }
    }

    fn apply_to(&self, task: &mut Task) {
        task.set_title(self.title.clone());
        task.set_description(self.description.clone());
        task.set_status(self.status);
    }
}

/// Editing session for a single task.
///
/// Timer writes touch the timer columns only; edits made through the setters
/// reach the store only on [`TimeTrackingSession::save_and_stop`]. In-memory state changes only
/// after the corresponding write succeeds, so a failed operation can be
/// retried as-is.
pub struct TimeTrackingSession<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    repository: Arc<R>,
    clock: Arc<C>,
    tick_interval: Duration,
    task: Task,
    edits: PendingEdits,
    live: Arc<watch::Sender<Duration>>,
    ticker: Option<JoinHandle<()>>,
    last_error: Option<String>,
}

impl<R, C> TimeTrackingSession<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Opens a session over a stored task.
    ///
    /// A record stored with an open timer is treated as stopped: the stale
    /// session is dropped without accruing time and the stored flag is
    /// corrected by the next write.
    ///
    /// # Errors
    ///
    /// Returns [`TimeTrackingError::TaskNotFound`] when the task does not
    /// exist, or the repository error when the lookup fails.
    pub async fn open(
        repository: Arc<R>,
        clock: Arc<C>,
        config: &TimerConfig,
        task_id: TaskId,
    ) -> TimeTrackingResult<Self> {
        let mut task = repository
            .find_by_id(task_id)
            .await?
            .ok_or(TimeTrackingError::TaskNotFound(task_id))?;
        if task.discard_timer() {
            warn!(%task_id, "task was stored with an open timer; treating it as stopped");
        }
        Ok(Self::with_task(repository, clock, config, task))
    }

    /// Starts a session over a new, unsaved task.
    ///
    /// Timer writes are skipped until the first save inserts the task.
    #[must_use]
    pub fn new_task(
        repository: Arc<R>,
        clock: Arc<C>,
        config: &TimerConfig,
        project_id: ProjectId,
    ) -> Self {
        let task = Task::draft(project_id, &*clock);
        Self::with_task(repository, clock, config, task)
    }

    fn with_task(repository: Arc<R>, clock: Arc<C>, config: &TimerConfig, task: Task) -> Self {
        let (live, _) = watch::channel(task.worked_time());
        Self {
            repository,
            clock,
            tick_interval: config.tick_interval(),
            edits: PendingEdits::from_task(&task),
            task,
            live: Arc::new(live),
            ticker: None,
            last_error: None,
        }
    }

    /// Returns the working copy as last persisted (or drafted).
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns `true` when the session edits a stored task.
    #[must_use]
    pub const fn is_edit_mode(&self) -> bool {
        self.task.id().is_some()
    }

    /// Returns the timer state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.task
            .timer_started_at()
            .map_or(TimerState::Stopped, |started_at| TimerState::Running {
                started_at,
            })
    }

    /// Returns `true` while the live-value ticker is scheduled.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Returns the work time including the open session, computed now.
    #[must_use]
    pub fn live_worked_time(&self) -> Duration {
        self.task.live_worked_time(&*self.clock)
    }

    /// Subscribes to the live work-time value refreshed by the ticker.
    #[must_use]
    pub fn subscribe_live(&self) -> watch::Receiver<Duration> {
        self.live.subscribe()
    }

    /// Returns the message of the last failed operation, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Forgets the last error message.
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Returns the unsaved title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.edits.title
    }

    /// Returns the unsaved description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.edits.description
    }

    /// Returns the unsaved status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.edits.status
    }

    /// Edits the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.edits.title = title.into();
    }

    /// Edits the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.edits.description = description.into();
    }

    /// Edits the status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.edits.status = status;
    }

    /// Opens a timer session and persists the running flag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TimerAlreadyRunning`] when a session is
    /// already open, or the repository error when the write fails.
    pub async fn start(&mut self) -> TimeTrackingResult<()> {
        let result = self.try_start().await;
        self.record(result)
    }

    async fn try_start(&mut self) -> TimeTrackingResult<()> {
        let mut next = self.task.clone();
        next.start_timer(&*self.clock)?;
        self.write_timer_state(&next).await?;
        self.task = next;
        self.spawn_ticker();
        info!(task_id = ?self.task.id(), "timer started");
        Ok(())
    }

    /// Closes the open timer session and persists the new work time.
    ///
    /// Does nothing when no session is open.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the write fails; the session then
    /// keeps running.
    pub async fn pause(&mut self) -> TimeTrackingResult<()> {
        let result = self.try_pause().await;
        self.record(result)
    }

    async fn try_pause(&mut self) -> TimeTrackingResult<()> {
        if !self.task.timer_active() {
            return Ok(());
        }
        let mut next = self.task.clone();
        let elapsed = next.stop_timer(&*self.clock);
        self.write_timer_state(&next).await?;
        self.commit_stopped(next);
        info!(
            task_id = ?self.task.id(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "timer paused"
        );
        Ok(())
    }

    /// Starts the timer when stopped, pauses it when running.
    ///
    /// # Errors
    ///
    /// Returns the error of the delegated operation.
    pub async fn toggle(&mut self) -> TimeTrackingResult<()> {
        if self.task.timer_active() {
            self.pause().await
        } else {
            self.start().await
        }
    }

    /// Closes any open session and persists the whole record including the
    /// pending edits.
    ///
    /// A new task is inserted and receives its identifier here.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the edited title is
    /// blank, or the repository error when the write fails. Nothing changes
    /// in memory on error.
    pub async fn save_and_stop(&mut self) -> TimeTrackingResult<Task> {
        let result = self.try_save().await;
        self.record(result)
    }

    async fn try_save(&mut self) -> TimeTrackingResult<Task> {
        let mut next = self.task.clone();
        self.edits.apply_to(&mut next);
        next.validate()?;
        next.stop_timer(&*self.clock);
        let saved = match next.id() {
            Some(task_id) => {
                if self.repository.update(&next).await? == 0 {
                    return Err(TimeTrackingError::TaskNotFound(task_id));
                }
                next
            }
            None => {
                let task_id = self.repository.insert(&next).await?;
                next.with_id(task_id)
            }
        };
        self.commit_stopped(saved.clone());
        info!(task_id = ?saved.id(), "task saved");
        Ok(saved)
    }

    /// Pauses an open session when the editor is left without saving.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the pause write fails.
    pub async fn on_session_exit(&mut self) -> TimeTrackingResult<()> {
        self.pause().await
    }

    /// Deletes the stored task and ends the session.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the delete fails.
    pub async fn delete(mut self) -> TimeTrackingResult<()> {
        self.cancel_ticker();
        if self.task.id().is_some() {
            self.repository.delete(&self.task).await?;
            info!(task_id = ?self.task.id(), "task deleted");
        }
        Ok(())
    }

    /// Tears the session down, cancelling the ticker whatever the timer
    /// state.
    ///
    /// An open session is neither paused nor persisted; the stored record
    /// keeps its running flag and is read back as stopped.
    pub fn on_cleared(&mut self) {
        self.cancel_ticker();
        debug!(task_id = ?self.task.id(), "session cleared");
    }

    /// Persists the timer columns of `next`; the stored title, description,
    /// and status stay as they are.
    async fn write_timer_state(&self, next: &Task) -> TimeTrackingResult<()> {
        let Some(task_id) = next.id() else {
            debug!("task not saved yet; skipping timer write");
            return Ok(());
        };
        match self
            .repository
            .update_timer_state(task_id, next.worked_time(), next.timer_started_at())
            .await
        {
            Ok(()) => Ok(()),
            Err(TaskRepositoryError::NotFound(_)) => Err(TimeTrackingError::TaskNotFound(task_id)),
            Err(err) => Err(err.into()),
        }
    }

    fn commit_stopped(&mut self, next: Task) {
        self.cancel_ticker();
        self.live.send_replace(next.worked_time());
        self.task = next;
    }

    fn spawn_ticker(&mut self) {
        self.cancel_ticker();
        self.ticker = Some(tokio::spawn(refresh_live_value(
            self.task.clone(),
            Arc::clone(&self.clock),
            Arc::clone(&self.live),
            self.tick_interval,
        )));
    }

    /// The only place the ticker is stopped.
    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    fn record<T>(&mut self, result: TimeTrackingResult<T>) -> TimeTrackingResult<T> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(err) => {
                warn!(task_id = ?self.task.id(), error = %err, "time tracking operation failed");
                self.last_error = Some(err.to_string());
            }
        }
        result
    }
}

/// Recomputes the live value of a running task once per `period`, forever.
async fn refresh_live_value<C>(
    running: Task,
    clock: Arc<C>,
    live: Arc<watch::Sender<Duration>>,
    period: Duration,
) where
    C: Clock + Send + Sync,
{
    loop {
        tokio::time::sleep(period).await;
        live.send_replace(running.live_worked_time(&*clock));
    }
}

impl<R, C> Drop for TimeTrackingSession<R, C>
where
    R: TaskRepository + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
