//! Given steps for task status lifecycle BDD scenarios.

use super::world::{TaskTransitionWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use tasklane::task::services::{CreateTaskRequest, UpdateTaskStatusRequest};

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut TaskTransitionWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create(CreateTaskRequest::new(title)))
        .wrap_err("create task for transition scenario")?;
    world.current_task = Some(created);
    Ok(())
}

#[given(r#"the task has been moved to "{status}""#)]
fn task_has_been_moved(
    world: &mut TaskTransitionWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let moved = run_async(
        world
            .service
            .update_status(UpdateTaskStatusRequest::new(task_id, status)),
    )
    .wrap_err("move task in scenario setup")?;
    world.current_task = Some(moved);
    Ok(())
}
