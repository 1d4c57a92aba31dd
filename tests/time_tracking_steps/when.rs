//! When steps for time tracking BDD scenarios.

use std::time::Duration;

use super::world::{TimerWorld, run_async};
use rstest_bdd_macros::when;

#[when("the timer is started")]
fn start_timer(world: &mut TimerWorld) -> Result<(), eyre::Report> {
    let session = world.session()?;
    run_async(session.start()).map_err(|err| eyre::eyre!("start failed: {err}"))
}

#[when("the timer is paused")]
fn pause_timer(world: &mut TimerWorld) -> Result<(), eyre::Report> {
    let session = world.session()?;
    run_async(session.pause()).map_err(|err| eyre::eyre!("pause failed: {err}"))
}

#[when("{seconds:u64} seconds pass")]
fn seconds_pass(world: &mut TimerWorld, seconds: u64) {
    world.clock.advance(Duration::from_secs(seconds));
}

#[when("the editor is left without saving")]
fn leave_editor(world: &mut TimerWorld) -> Result<(), eyre::Report> {
    let session = world.session()?;
    run_async(session.on_session_exit()).map_err(|err| eyre::eyre!("exit failed: {err}"))
}

#[when("the task is opened for editing")]
fn open_for_editing(world: &mut TimerWorld) -> Result<(), eyre::Report> {
    world.open_session()
}

#[when("the task is saved")]
fn save_task(world: &mut TimerWorld) -> Result<(), eyre::Report> {
    let session = world.session()?;
    let result = run_async(session.save_and_stop());
    world.last_save_result = Some(result);
    Ok(())
}

#[when("the title is cleared and the task is saved")]
fn clear_title_and_save(world: &mut TimerWorld) -> Result<(), eyre::Report> {
    let session = world.session()?;
    session.set_title("");
    let result = run_async(session.save_and_stop());
    world.last_save_result = Some(result);
    Ok(())
}
