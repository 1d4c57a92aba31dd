//! Port contracts for task persistence and issue import.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod issue_source;
pub mod repository;
pub mod subscription;

pub use issue_source::{IssueSource, IssueSourceError, IssueSourceResult};
pub use repository::{TaskQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use subscription::TaskListSubscription;

#[cfg(test)]
pub use repository::MockTaskRepository;
