//! Project aggregate.

use super::{ParseProjectStatusError, ProjectDomainError, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work on the project is ongoing.
    #[default]
    Active,
    /// The project is on hold.
    Paused,
    /// The project has been delivered.
    Completed,
    /// The project was called off.
    Cancelled,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` when the project no longer accepts work.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A client project that owns zero or more tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: Option<ProjectId>,
    name: String,
    client: String,
    deadline: DateTime<Utc>,
    status: ProjectStatus,
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted display name.
    pub name: String,
    /// Persisted client name.
    pub client: String,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
}

impl Project {
    /// Creates a new, not yet persisted, active project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        client: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Result<Self, ProjectDomainError> {
        let raw_name = name.into();
        let normalized = raw_name.trim();
        if normalized.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }
        Ok(Self {
            id: None,
            name: normalized.to_owned(),
            client: client.into().trim().to_owned(),
            deadline,
            status: ProjectStatus::Active,
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: Some(data.id),
            name: data.name,
            client: data.client,
            deadline: data.deadline,
            status: data.status,
        }
    }

    /// Converts the project into its persisted layout under `id`.
    #[must_use]
    pub fn to_persisted(&self, id: ProjectId) -> PersistedProjectData {
        PersistedProjectData {
            id,
            name: self.name.clone(),
            client: self.client.clone(),
            deadline: self.deadline,
            status: self.status,
        }
    }

    /// Returns the project with its store-assigned identifier.
    #[must_use]
    pub const fn with_id(mut self, id: ProjectId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the project with a different status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the identifier, absent before the first insert.
    #[must_use]
    pub const fn id(&self) -> Option<ProjectId> {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the client name.
    #[must_use]
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }
}
