//! Completion ratio, per-status counts, and work-time totals.

use crate::project::domain::ProjectId;
use crate::task::domain::{Task, TaskStatus};
use std::collections::BTreeMap;
use std::time::Duration;

/// Aggregate figures over a task collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSummary {
    total: usize,
    pending: usize,
    in_progress: usize,
    done: usize,
    cancelled: usize,
    worked_time: Duration,
}

impl TaskSummary {
    /// Summarises `tasks`.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        tasks.into_iter().fold(Self::default(), |mut summary, task| {
            summary.total += 1;
            *summary.slot(task.status()) += 1;
            summary.worked_time = summary.worked_time.saturating_add(task.worked_time());
            summary
        })
    }

    const fn slot(&mut self, status: TaskStatus) -> &mut usize {
        match status {
            TaskStatus::Pending => &mut self.pending,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
            TaskStatus::Cancelled => &mut self.cancelled,
        }
    }

    /// Returns the number of tasks.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of tasks with `status`.
    #[must_use]
    pub const fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
            TaskStatus::Cancelled => self.cancelled,
        }
    }

    /// Returns the number of tasks that are not done.
    #[must_use]
    pub const fn open(&self) -> usize {
        self.total.saturating_sub(self.done)
    }

    /// Returns `true` when every task is done; `false` for no tasks.
    #[must_use]
    pub const fn all_done(&self) -> bool {
        self.total > 0 && self.done == self.total
    }

    /// Returns the persisted work time of all tasks combined.
    #[must_use]
    pub const fn worked_time(&self) -> Duration {
        self.worked_time
    }

    /// Returns the share of done tasks in `[0, 1]`; zero for no tasks.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        clippy::float_arithmetic,
        reason = "ratio is display-only and counts stay far below 2^52"
    )]
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.done as f64 / self.total as f64
    }
}

/// Counts tasks per owning project.
#[must_use]
pub fn count_by_project(tasks: &[Task]) -> BTreeMap<ProjectId, usize> {
    let mut counts = BTreeMap::new();
    for task in tasks {
        *counts.entry(task.project_id()).or_insert(0) += 1;
    }
    counts
}
