//! In-memory integration tests for project storage and task cascade.

use std::sync::Arc;

use rstest::rstest;
use worktrack::project::{
    domain::{Project, ProjectDomainError, ProjectId, ProjectStatus},
    ports::{ProjectRepository, ProjectRepositoryError},
};
use worktrack::task::{
    domain::Task,
    ports::{TaskQuery, TaskRepository},
};

use super::helpers::{Stores, clock, day, seed_project, stores};
use crate::test_helpers::ManualClock;

async fn seed_titled_task(
    stores: &Stores,
    project_id: ProjectId,
    title: &str,
    clock: &ManualClock,
) -> Result<(), eyre::Report> {
    let mut task = Task::draft(project_id, clock);
    task.set_title(title);
    stores.tasks.insert(&task).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_round_trips_through_the_store(stores: Stores) -> Result<(), eyre::Report> {
    let deadline = day(2025, 9, 1);
    let project_id = seed_project(&stores.projects, "  Mobile app ", "Globex", deadline).await?;

    let found = stores
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| eyre::eyre!("project should exist"))?;

    eyre::ensure!(found.id() == Some(project_id), "identifier mismatch");
    eyre::ensure!(found.name() == "Mobile app", "name should be trimmed");
    eyre::ensure!(found.client() == "Globex", "client mismatch");
    eyre::ensure!(found.deadline() == deadline, "deadline mismatch");
    eyre::ensure!(found.status() == ProjectStatus::Active, "new projects are active");
    Ok(())
}

#[rstest]
fn blank_project_name_is_rejected() {
    let result = Project::new("   ", "Globex", day(2025, 9, 1));

    assert_eq!(result.err(), Some(ProjectDomainError::EmptyName));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_status_and_ignores_unknown_projects(
    stores: Stores,
) -> Result<(), eyre::Report> {
    let project_id = seed_project(&stores.projects, "Mobile app", "Globex", day(2025, 9, 1)).await?;
    let stored = stores
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| eyre::eyre!("project should exist"))?;

    let affected = stores
        .projects
        .update(&stored.clone().with_status(ProjectStatus::Paused))
        .await?;
    let unknown = stored.with_id(ProjectId::new(404)?);

    eyre::ensure!(affected == 1, "expected one updated project");
    eyre::ensure!(
        stores.projects.update(&unknown).await? == 0,
        "unknown project must not be updated"
    );
    let reloaded = stores.projects.find_by_id(project_id).await?;
    eyre::ensure!(
        reloaded.map(|project| project.status()) == Some(ProjectStatus::Paused),
        "status should be persisted"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unsaved_project_cannot_be_updated(stores: Stores) -> Result<(), eyre::Report> {
    let draft = Project::new("Mobile app", "Globex", day(2025, 9, 1))?;

    let result = stores.projects.update(&draft).await;

    assert!(matches!(result, Err(ProjectRepositoryError::MissingIdentity)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listings_are_ordered_by_deadline_and_filtered(
    stores: Stores,
) -> Result<(), eyre::Report> {
    let late = seed_project(&stores.projects, "Late", "Acme Ltd", day(2025, 12, 1)).await?;
    let early = seed_project(&stores.projects, "Early", "Globex", day(2025, 4, 1)).await?;
    let middle = seed_project(&stores.projects, "Middle", "ACME Corp", day(2025, 8, 1)).await?;
    let closed = stores
        .projects
        .find_by_id(middle)
        .await?
        .ok_or_else(|| eyre::eyre!("project should exist"))?
        .with_status(ProjectStatus::Completed);
    stores.projects.update(&closed).await?;

    let all: Vec<Option<ProjectId>> = stores
        .projects
        .list_all()
        .await?
        .iter()
        .map(Project::id)
        .collect();
    let acme: Vec<Option<ProjectId>> = stores
        .projects
        .list_by_client("acme")
        .await?
        .iter()
        .map(Project::id)
        .collect();
    let completed = stores
        .projects
        .list_by_status(ProjectStatus::Completed)
        .await?;
    let upcoming: Vec<Option<ProjectId>> = stores
        .projects
        .upcoming_deadlines(day(2025, 5, 1))
        .await?
        .iter()
        .map(Project::id)
        .collect();

    assert_eq!(all, [Some(early), Some(middle), Some(late)]);
    assert_eq!(acme, [Some(middle), Some(late)]);
    assert_eq!(completed.len(), 1);
    assert_eq!(upcoming, [Some(late)]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_project_deletes_its_tasks(
    stores: Stores,
    clock: Arc<ManualClock>,
) -> Result<(), eyre::Report> {
    let doomed = seed_project(&stores.projects, "Doomed", "Acme Ltd", day(2025, 6, 1)).await?;
    let kept = seed_project(&stores.projects, "Kept", "Globex", day(2025, 7, 1)).await?;
    seed_titled_task(&stores, doomed, "Spec", &clock).await?;
    seed_titled_task(&stores, doomed, "Build", &clock).await?;
    seed_titled_task(&stores, kept, "Review", &clock).await?;
    let doomed_tasks = stores.tasks.subscribe(TaskQuery::ByProject(doomed)).await?;
    let project = stores
        .projects
        .find_by_id(doomed)
        .await?
        .ok_or_else(|| eyre::eyre!("project should exist"))?;

    let deleted = stores.projects.delete(&project).await?;

    eyre::ensure!(deleted == 1, "expected one deleted project");
    eyre::ensure!(doomed_tasks.is_empty(), "live list should empty out");
    eyre::ensure!(stores.tasks.len()? == 1, "only the kept task should remain");
    eyre::ensure!(
        stores.projects.find_by_id(doomed).await?.is_none(),
        "project should be gone"
    );
    eyre::ensure!(
        stores.projects.delete(&project).await? == 0,
        "second delete should affect nothing"
    );
    Ok(())
}
