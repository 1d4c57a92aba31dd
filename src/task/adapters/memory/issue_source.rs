//! Scripted issue transport for tests and offline use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::task::{
    domain::ExternalIssue,
    ports::{IssueSource, IssueSourceError, IssueSourceResult},
};

type RepositoryKey = (String, String);

/// Issue source that answers from canned responses.
///
/// Unknown repositories answer with an HTTP 404 status error, matching what a
/// hosted tracker reports for a missing repository.
#[derive(Debug, Clone, Default)]
pub struct ScriptedIssueSource {
    responses: Arc<RwLock<HashMap<RepositoryKey, IssueSourceResult<Vec<ExternalIssue>>>>>,
    latency: Option<Duration>,
    fetches: Arc<AtomicUsize>,
}

impl ScriptedIssueSource {
    /// Creates a source with no scripted repositories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the open issues of a repository.
    #[must_use]
    pub fn with_issues(
        self,
        owner: impl Into<String>,
        repository: impl Into<String>,
        issues: Vec<ExternalIssue>,
    ) -> Self {
        self.script((owner.into(), repository.into()), Ok(issues));
        self
    }

    /// Scripts the open issues of a repository from a provider JSON payload.
    ///
    /// The payload is an array of issue objects; only `title` and `body`
    /// are read.
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the payload is not an array of issues.
    pub fn with_json(
        self,
        owner: impl Into<String>,
        repository: impl Into<String>,
        payload: &str,
    ) -> Result<Self, serde_json::Error> {
        let issues: Vec<ExternalIssue> = serde_json::from_str(payload)?;
        Ok(self.with_issues(owner, repository, issues))
    }

    /// Scripts a failure for a repository.
    #[must_use]
    pub fn with_failure(
        self,
        owner: impl Into<String>,
        repository: impl Into<String>,
        error: IssueSourceError,
    ) -> Self {
        self.script((owner.into(), repository.into()), Err(error));
        self
    }

    /// Delays every fetch by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns how many fetches have been issued.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn script(&self, key: RepositoryKey, response: IssueSourceResult<Vec<ExternalIssue>>) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, response);
    }
}

#[async_trait]
impl IssueSource for ScriptedIssueSource {
    async fn fetch_open_issues(
        &self,
        owner: &str,
        repository: &str,
    ) -> IssueSourceResult<Vec<ExternalIssue>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let responses = self
            .responses
            .read()
            .map_err(|err| IssueSourceError::Connection(err.to_string()))?;
        responses
            .get(&(owner.to_owned(), repository.to_owned()))
            .cloned()
            .unwrap_or_else(|| {
                Err(IssueSourceError::Status {
                    code: 404,
                    message: "Not Found".to_owned(),
                })
            })
    }
}
