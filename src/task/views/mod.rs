//! Read-only computations over task collections for presentation.

mod report;
mod summary;

pub use report::{ReportError, format_worked_time, project_report, task_share_text};
pub use summary::{TaskSummary, count_by_project};
