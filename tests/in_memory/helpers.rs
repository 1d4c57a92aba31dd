//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rstest::fixture;
use worktrack::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, ProjectId},
    ports::ProjectRepository,
};
use worktrack::task::adapters::memory::InMemoryTaskRepository;

use crate::test_helpers::ManualClock;

/// Paired project and task stores sharing one task table.
pub struct Stores {
    pub tasks: Arc<InMemoryTaskRepository>,
    pub projects: InMemoryProjectRepository<InMemoryTaskRepository>,
}

/// Provides empty stores wired for cascading deletes.
#[fixture]
pub fn stores() -> Stores {
    let tasks = Arc::new(InMemoryTaskRepository::new());
    let projects = InMemoryProjectRepository::new(Arc::clone(&tasks));
    Stores { tasks, projects }
}

/// Provides a manually driven clock.
#[fixture]
pub fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new())
}

/// Builds a UTC timestamp at noon on the given day.
///
/// # Panics
///
/// Panics when the date does not exist.
pub fn day(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, date, 12, 0, 0)
        .single()
        .expect("valid calendar day")
}

/// Inserts an active project and returns its identifier.
///
/// # Errors
///
/// Returns an error when the project is invalid or the insert fails.
pub async fn seed_project(
    projects: &InMemoryProjectRepository<InMemoryTaskRepository>,
    name: &str,
    client: &str,
    deadline: DateTime<Utc>,
) -> Result<ProjectId, eyre::Report> {
    let project = Project::new(name, client, deadline)?;
    Ok(projects.insert(&project).await?)
}
