//! Domain model for projects.

mod error;
mod ids;
mod project;

pub use error::{ParseProjectStatusError, ProjectDomainError};
pub use ids::ProjectId;
pub use project::{PersistedProjectData, Project, ProjectStatus};
