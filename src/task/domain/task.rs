//! Task aggregate, status set, and timer arithmetic.

use super::{ExternalIssue, ParseTaskStatusError, TaskDomainError, TaskId};
use crate::project::domain::ProjectId;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Task status.
///
/// Any status may move to any other by explicit choice; only completion
/// toggling is automated (see [`TaskStatus::toggled_completion`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    #[default]
    Pending,
    /// Work is under way.
    InProgress,
    /// Work is finished.
    Done,
    /// The task was dropped.
    Cancelled,
}

impl TaskStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Done, Self::Cancelled];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the upper-case label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns `true` for [`TaskStatus::Done`].
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Flips completion: `Done` becomes `Pending`, anything else becomes
    /// `Done`.
    #[must_use]
    pub const fn toggled_completion(self) -> Self {
        match self {
            Self::Done => Self::Pending,
            Self::Pending | Self::InProgress | Self::Cancelled => Self::Done,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task aggregate root.
///
/// `timer_started_at` is `Some` exactly while a timer session is open, so
/// "timer active" and "last timer start" can never disagree in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: Option<TaskId>,
    project_id: ProjectId,
    title: String,
    description: String,
    status: TaskStatus,
    worked_time: Duration,
    timer_started_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

/// Persisted record layout of a task.
///
/// Work time and timer start are stored as milliseconds; a
/// `last_timer_start_ms` of zero means no open session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Display title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Current status.
    pub status: TaskStatus,
    /// Accumulated work time in milliseconds.
    pub worked_time_ms: u64,
    /// Whether a timer session was open when the record was written.
    pub timer_active: bool,
    /// Start of the open session in milliseconds since the epoch, or zero.
    pub last_timer_start_ms: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PersistedTaskData {
    /// Overwrites the timer columns, leaving every other field as stored.
    pub fn set_timer_state(
        &mut self,
        worked_time: Duration,
        timer_started_at: Option<DateTime<Utc>>,
    ) {
        self.worked_time_ms = u64::try_from(worked_time.as_millis()).unwrap_or(u64::MAX);
        self.timer_active = timer_started_at.is_some();
        self.last_timer_start_ms =
            timer_started_at.map_or(0, |started_at| started_at.timestamp_millis());
    }
}

impl Task {
    /// Creates an empty pending task shell for direct authoring.
    #[must_use]
    pub fn draft(project_id: ProjectId, clock: &impl Clock) -> Self {
        Self {
            id: None,
            project_id,
            title: String::new(),
            description: String::new(),
            status: TaskStatus::Pending,
            worked_time: Duration::ZERO,
            timer_started_at: None,
            created_at: clock.utc(),
        }
    }

    /// Creates a pending task from an imported issue.
    ///
    /// The description is the issue body, or empty when the issue has none.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyIssueTitle`] when the issue title is
    /// blank.
    pub fn from_issue(
        issue: &ExternalIssue,
        project_id: ProjectId,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let title = issue.title().trim();
        if title.is_empty() {
            return Err(TaskDomainError::EmptyIssueTitle);
        }
        let mut task = Self::draft(project_id, clock);
        title.clone_into(&mut task.title);
        task.description = issue.body().unwrap_or_default().to_owned();
        Ok(task)
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// A record claiming an open session without a start timestamp is read
    /// as having no open session.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let timer_started_at = if data.timer_active && data.last_timer_start_ms != 0 {
            DateTime::from_timestamp_millis(data.last_timer_start_ms)
        } else {
            None
        };
        Self {
            id: Some(data.id),
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            worked_time: Duration::from_millis(data.worked_time_ms),
            timer_started_at,
            created_at: data.created_at,
        }
    }

    /// Converts the task into its persisted layout under `id`.
    #[must_use]
    pub fn to_persisted(&self, id: TaskId) -> PersistedTaskData {
        let mut data = PersistedTaskData {
            id,
            project_id: self.project_id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            worked_time_ms: 0,
            timer_active: false,
            last_timer_start_ms: 0,
            created_at: self.created_at,
        };
        data.set_timer_state(self.worked_time, self.timer_started_at);
        data
    }

    /// Returns the task with its store-assigned identifier.
    #[must_use]
    pub const fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the identifier, absent before the first insert.
    #[must_use]
    pub const fn id(&self) -> Option<TaskId> {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the work time folded in by completed sessions.
    #[must_use]
    pub const fn worked_time(&self) -> Duration {
        self.worked_time
    }

    /// Returns `true` while a timer session is open.
    #[must_use]
    pub const fn timer_active(&self) -> bool {
        self.timer_started_at.is_some()
    }

    /// Returns the start of the open timer session, if any.
    #[must_use]
    pub const fn timer_started_at(&self) -> Option<DateTime<Utc>> {
        self.timer_started_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Checks the fields required before a task may be saved.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(())
    }

    /// Opens a timer session starting now.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TimerAlreadyRunning`] when a session is
    /// already open.
    pub fn start_timer(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.timer_started_at.is_some() {
            return Err(TaskDomainError::TimerAlreadyRunning);
        }
        self.timer_started_at = Some(clock.utc().trunc_subsecs(3));
        Ok(())
    }

    /// Closes the open timer session, folding its elapsed time into the
    /// work-time total.
    ///
    /// Returns the elapsed time that was added; zero when no session was
    /// open.
    pub fn stop_timer(&mut self, clock: &impl Clock) -> Duration {
        let Some(started_at) = self.timer_started_at.take() else {
            return Duration::ZERO;
        };
        let elapsed = elapsed_between(started_at, clock.utc());
        self.worked_time = self.worked_time.saturating_add(elapsed);
        elapsed
    }

    /// Drops an open session without accruing its elapsed time.
    ///
    /// Returns `true` when a session was discarded.
    pub const fn discard_timer(&mut self) -> bool {
        self.timer_started_at.take().is_some()
    }

    /// Returns the work time including the open session, if any.
    ///
    /// This value is for display and is never persisted.
    #[must_use]
    pub fn live_worked_time(&self, clock: &impl Clock) -> Duration {
        self.timer_started_at.map_or(self.worked_time, |started_at| {
            self.worked_time
                .saturating_add(elapsed_between(started_at, clock.utc()))
        })
    }
}

/// Whole milliseconds between two instants; zero when the clock went
/// backwards.
fn elapsed_between(start: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let millis = (now - start).num_milliseconds();
    Duration::from_millis(u64::try_from(millis).unwrap_or_default())
}
