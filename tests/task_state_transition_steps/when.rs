//! When steps for task status lifecycle BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use rstest_bdd_macros::when;
use tasklane::task::services::UpdateTaskStatusRequest;

#[when(r#"the task status is set to "{status}""#)]
fn set_task_status(world: &mut TaskTransitionWorld, status: String) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(
        world
            .service
            .update_status(UpdateTaskStatusRequest::new(task_id, status)),
    );
    if let Ok(ref updated) = result {
        world.current_task = Some(updated.clone());
    }
    world.last_update_result = Some(result);
    Ok(())
}
