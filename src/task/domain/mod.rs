//! Domain model for tasks and their accumulated work time.
//!
//! A task belongs to a project, carries a status and a work-time total, and
//! may have one open timer session. Timer arithmetic lives here so services
//! only decide when to persist.

mod error;
mod ids;
mod issue;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use issue::ExternalIssue;
pub use task::{PersistedTaskData, Task, TaskStatus};
