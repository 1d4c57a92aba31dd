//! When steps for issue import BDD scenarios.

use super::world::{ImportWorld, run_async, split_slug};
use rstest_bdd_macros::when;
use worktrack::task::services::ImportRequest;

#[when(r#"the issues of "{slug}" are imported into the project"#)]
fn import_issues(world: &mut ImportWorld, slug: String) -> Result<(), eyre::Report> {
    let (owner, repository) = split_slug(&slug)?;
    let request = ImportRequest::new(owner, repository, world.project_id()?);
    let service = world.import_service();
    world.last_import_result = Some(run_async(service.import(&request)));
    Ok(())
}

#[when("the issues are imported with a blank owner")]
fn import_with_blank_owner(world: &mut ImportWorld) -> Result<(), eyre::Report> {
    let request = ImportRequest::new("   ", "widgets", world.project_id()?);
    let service = world.import_service();
    world.last_import_result = Some(run_async(service.import(&request)));
    Ok(())
}
