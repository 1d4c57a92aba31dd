//! Plain-text reports for sharing project and task progress.

use crate::project::domain::Project;
use crate::task::domain::{Task, TaskStatus};
use minijinja::{Environment, context};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::TaskSummary;

const PROJECT_REPORT_TEMPLATE: &str = "Project report: {{ name }}\n\
Client: {{ client }}\n\
Deadline: {{ deadline }}\n\
Progress: {{ done }} of {{ total }} tasks completed.\n\
\n\
{% if tasks %}--- Tasks ---\n\
{% for task in tasks %}- {{ task.title }} ({{ task.status }})\n\
{% endfor %}{% else %}No tasks registered.\n\
{% endif %}";

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Template rendering failed.
    #[error("failed to render report: {0}")]
    Render(#[from] minijinja::Error),
}

#[derive(Serialize)]
struct TaskLine<'a> {
    title: &'a str,
    status: &'static str,
}

/// Renders the project report: header, deadline as `dd/mm/yyyy`, progress
/// line, and one bullet per task.
///
/// # Errors
///
/// Returns [`ReportError::Render`] when the template fails to render.
pub fn project_report(project: &Project, tasks: &[Task]) -> Result<String, ReportError> {
    let summary = TaskSummary::from_tasks(tasks);
    let lines: Vec<TaskLine<'_>> = tasks
        .iter()
        .map(|task| TaskLine {
            title: task.title(),
            status: task.status().label(),
        })
        .collect();
    let environment = Environment::new();
    let rendered = environment.render_str(
        PROJECT_REPORT_TEMPLATE,
        context! {
            name => project.name(),
            client => project.client(),
            deadline => project.deadline().format("%d/%m/%Y").to_string(),
            done => summary.count(TaskStatus::Done),
            total => summary.total(),
            tasks => lines,
        },
    )?;
    Ok(rendered)
}

/// Short text for sharing a single task's status.
#[must_use]
pub fn task_share_text(task: &Task, project_name: &str) -> String {
    format!(
        "Check out the status of my task:\nProject: {project_name}\nTask: {}\nStatus: {}",
        task.title(),
        task.status().label()
    )
}

/// Formats a work time as `HH:MM:SS`; hours grow past two digits as needed.
#[must_use]
#[expect(
    clippy::integer_division,
    clippy::integer_division_remainder_used,
    reason = "splitting whole seconds into clock fields"
)]
pub fn format_worked_time(worked_time: Duration) -> String {
    let total_seconds = worked_time.as_secs();
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
