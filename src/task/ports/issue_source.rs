//! Transport port for fetching open issues from an external tracker.

use crate::task::domain::ExternalIssue;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for issue source operations.
pub type IssueSourceResult<T> = Result<T, IssueSourceError>;

/// Source of open issues for an `owner/repository` pair.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Fetches the open issues of a repository in one call.
    async fn fetch_open_issues(
        &self,
        owner: &str,
        repository: &str,
    ) -> IssueSourceResult<Vec<ExternalIssue>>;
}

/// Errors returned by issue source adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueSourceError {
    /// The remote answered with a non-success status.
    #[error("HTTP {code}: {message}")]
    Status {
        /// Response status code.
        code: u16,
        /// Response reason or body excerpt.
        message: String,
    },

    /// The remote could not be reached.
    #[error("connection error: {0}")]
    Connection(String),
}
