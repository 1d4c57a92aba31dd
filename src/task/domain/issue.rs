//! Issues fetched from an external tracker.

use serde::{Deserialize, Serialize};

/// An open issue as returned by the import transport.
///
/// Only the title and body survive import. Any other field present in a
/// provider payload (labels, assignees, dates) is ignored on deserialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIssue {
    title: String,
    #[serde(default)]
    body: Option<String>,
}

impl ExternalIssue {
    /// Creates an issue from its title and optional body.
    #[must_use]
    pub fn new(title: impl Into<String>, body: Option<String>) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    /// Returns the issue title as received.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the issue body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}
