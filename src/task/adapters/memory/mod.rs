//! In-memory adapters for the task store and the issue transport.

mod issue_source;
mod task;

pub use issue_source::ScriptedIssueSource;
pub use task::InMemoryTaskRepository;
