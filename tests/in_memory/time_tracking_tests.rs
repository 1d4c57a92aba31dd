//! In-memory integration tests for timer sessions over shared stores.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use worktrack::config::{TimerConfig, WorktrackConfig};
use worktrack::project::ports::ProjectRepository;
use worktrack::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskId, TaskStatus},
    ports::{TaskQuery, TaskRepository},
    services::{TaskStatusService, TimeTrackingSession, TimerState},
    views::{TaskSummary, format_worked_time, project_report},
};

use super::helpers::{Stores, clock, day, seed_project, stores};
use crate::test_helpers::ManualClock;

type Session = TimeTrackingSession<InMemoryTaskRepository, ManualClock>;

async fn reopen(
    stores: &Stores,
    clock: &Arc<ManualClock>,
    task_id: TaskId,
) -> Result<Session, eyre::Report> {
    Ok(TimeTrackingSession::open(
        Arc::clone(&stores.tasks),
        Arc::clone(clock),
        &TimerConfig::default(),
        task_id,
    )
    .await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn work_accumulates_across_sessions(
    stores: Stores,
    clock: Arc<ManualClock>,
) -> Result<(), eyre::Report> {
    let project_id = seed_project(&stores.projects, "Website", "Acme Ltd", day(2025, 9, 1)).await?;
    let mut draft = TimeTrackingSession::new_task(
        Arc::clone(&stores.tasks),
        Arc::clone(&clock),
        &TimerConfig::default(),
        project_id,
    );
    draft.set_title("Landing page");
    draft.start().await?;
    clock.advance(Duration::from_secs(25 * 60));
    let saved = draft.save_and_stop().await?;
    let task_id = saved
        .id()
        .ok_or_else(|| eyre::eyre!("saved task should have an id"))?;
    drop(draft);

    let mut session = reopen(&stores, &clock, task_id).await?;
    session.start().await?;
    clock.advance(Duration::from_secs(35 * 60));
    session.on_session_exit().await?;

    let stored = stores
        .tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(
        format_worked_time(stored.worked_time()) == "01:00:00",
        "expected an hour of work, found {}",
        format_worked_time(stored.worked_time())
    );
    eyre::ensure!(!stored.timer_active(), "timer should be stopped");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_toggle_during_a_running_session_keeps_the_timer(
    stores: Stores,
    clock: Arc<ManualClock>,
) -> Result<(), eyre::Report> {
    let project_id = seed_project(&stores.projects, "Website", "Acme Ltd", day(2025, 9, 1)).await?;
    let mut draft = TimeTrackingSession::new_task(
        Arc::clone(&stores.tasks),
        Arc::clone(&clock),
        &TimerConfig::default(),
        project_id,
    );
    draft.set_title("Contact form");
    let task_id = draft
        .save_and_stop()
        .await?
        .id()
        .ok_or_else(|| eyre::eyre!("saved task should have an id"))?;

    let mut session = reopen(&stores, &clock, task_id).await?;
    session.start().await?;
    let statuses = TaskStatusService::new(Arc::clone(&stores.tasks));
    statuses.set_status(task_id, TaskStatus::Done).await?;

    let mid_session = stores
        .tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(mid_session.status() == TaskStatus::Done, "status should change");
    eyre::ensure!(mid_session.timer_active(), "running timer must survive");
    eyre::ensure!(
        matches!(session.state(), TimerState::Running { .. }),
        "session should still be running"
    );

    clock.advance(Duration::from_secs(90));
    session.pause().await?;
    let stored = stores
        .tasks
        .find_by_id(task_id)
        .await?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    eyre::ensure!(
        stored.worked_time() == Duration::from_secs(90),
        "pause should fold in the session"
    );
    eyre::ensure!(
        stored.status() == TaskStatus::Done,
        "pause must keep the status written mid-session, found {:?}",
        stored.status()
    );
    eyre::ensure!(!stored.timer_active(), "timer should be stopped");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn totals_and_report_reflect_saved_work(
    stores: Stores,
    clock: Arc<ManualClock>,
) -> Result<(), eyre::Report> {
    let deadline = day(2025, 9, 1);
    let project_id = seed_project(&stores.projects, "Website", "Acme Ltd", deadline).await?;
    let config = WorktrackConfig::default();
    for (title, minutes) in [("Header", 10_u64), ("Footer", 20_u64)] {
        let mut session = TimeTrackingSession::new_task(
            Arc::clone(&stores.tasks),
            Arc::clone(&clock),
            &config.timer,
            project_id,
        );
        session.set_title(title);
        session.start().await?;
        clock.advance(Duration::from_secs(minutes * 60));
        session.save_and_stop().await?;
    }
    let tasks = stores
        .tasks
        .subscribe(TaskQuery::ByProject(project_id))
        .await?
        .current();
    let project = stores
        .projects
        .find_by_id(project_id)
        .await?
        .ok_or_else(|| eyre::eyre!("project should exist"))?;

    let summary = TaskSummary::from_tasks(&tasks);
    let report = project_report(&project, &tasks)?;

    eyre::ensure!(
        summary.worked_time() == Duration::from_secs(30 * 60),
        "total work time mismatch"
    );
    eyre::ensure!(
        report.contains("Progress: 0 of 2 tasks completed."),
        "unexpected report: {report}"
    );
    eyre::ensure!(report.contains("- Footer (PENDING)"), "unexpected report: {report}");
    eyre::ensure!(report.contains("Deadline: 01/09/2025"), "unexpected report: {report}");
    Ok(())
}
