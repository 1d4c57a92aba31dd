//! Given steps for issue import BDD scenarios.

use super::world::{ImportWorld, run_async, split_slug};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use mockable::DefaultClock;
use rstest_bdd_macros::given;
use worktrack::project::{domain::Project, ports::ProjectRepository};
use worktrack::task::{
    domain::{ExternalIssue, Task},
    ports::{IssueSourceError, TaskRepository},
};

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut ImportWorld, name: String) -> Result<(), eyre::Report> {
    let project = Project::new(name, "Acme Ltd", Utc::now() + Duration::days(30))
        .wrap_err("build scenario project")?;
    let project_id = run_async(world.projects.insert(&project)).wrap_err("insert project")?;
    world.project_id = Some(project_id);
    Ok(())
}

#[given(r#"the project already has a task "{title}""#)]
fn existing_task(world: &mut ImportWorld, title: String) -> Result<(), eyre::Report> {
    let mut task = Task::draft(world.project_id()?, &DefaultClock);
    task.set_title(title);
    run_async(world.tasks.insert(&task)).wrap_err("insert existing task")?;
    Ok(())
}

#[given(r#"the repository "{slug}" has an open issue "{title}" with body "{body}""#)]
fn open_issue_with_body(
    world: &mut ImportWorld,
    slug: String,
    title: String,
    body: String,
) -> Result<(), eyre::Report> {
    let key = split_slug(&slug)?;
    world
        .scripted_issues
        .entry(key)
        .or_default()
        .push(ExternalIssue::new(title, Some(body)));
    Ok(())
}

#[given(r#"the repository "{slug}" has an open issue "{title}" without a body"#)]
fn open_issue_without_body(
    world: &mut ImportWorld,
    slug: String,
    title: String,
) -> Result<(), eyre::Report> {
    let key = split_slug(&slug)?;
    world
        .scripted_issues
        .entry(key)
        .or_default()
        .push(ExternalIssue::new(title, None));
    Ok(())
}

#[given(r#"the repository "{slug}" is unreachable"#)]
fn unreachable_repository(world: &mut ImportWorld, slug: String) -> Result<(), eyre::Report> {
    let key = split_slug(&slug)?;
    world.scripted_failures.insert(
        key,
        IssueSourceError::Connection("connection refused".to_owned()),
    );
    Ok(())
}
