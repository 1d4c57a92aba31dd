//! Application services for time tracking, status changes, and issue
//! import.

mod board;
mod import;
mod status;
mod timer;

pub use board::ProjectBoard;
pub use import::{
    ImportReport, ImportRequest, IssueImportError, IssueImportResult, IssueImportService,
};
pub use status::{TaskStatusError, TaskStatusResult, TaskStatusService};
pub use timer::{TimeTrackingError, TimeTrackingResult, TimeTrackingSession, TimerState};
