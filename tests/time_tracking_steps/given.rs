//! Given steps for time tracking BDD scenarios.

use super::world::TimerWorld;
use eyre::WrapErr;
use mockable::Clock;
use rstest_bdd_macros::given;

#[given(r#"an open editing session for the task "{title}""#)]
fn open_session_for_task(world: &mut TimerWorld, title: String) -> Result<(), eyre::Report> {
    world.store_task(&title).wrap_err("store scenario task")?;
    world.open_session().wrap_err("open editing session")
}

#[given(r#"the task "{title}" was stored with a running timer"#)]
fn task_with_running_timer(world: &mut TimerWorld, title: String) -> Result<(), eyre::Report> {
    let task_id = world.store_task(&title).wrap_err("store scenario task")?;
    let mut record = world
        .tasks
        .raw_record(task_id)?
        .ok_or_else(|| eyre::eyre!("stored record missing"))?;
    record.timer_active = true;
    record.last_timer_start_ms = world.clock.utc().timestamp_millis();
    record.worked_time_ms = 5_000;
    world.tasks.put_raw_record(record)?;
    Ok(())
}
