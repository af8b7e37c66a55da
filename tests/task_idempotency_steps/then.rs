//! Then steps for idempotent creation BDD scenarios.

use super::world::{IdempotencyWorld, run_async};
use rstest_bdd_macros::then;
use tasklane::task::services::{ErrorKind, ListTasksRequest, TaskLifecycleError};

fn assert_stored_count(world: &IdempotencyWorld, expected: usize) -> Result<(), eyre::Report> {
    let stored = run_async(world.service.list(ListTasksRequest::default()))?;
    if stored.len() != expected {
        return Err(eyre::eyre!(
            "expected {expected} stored task(s), found {}",
            stored.len()
        ));
    }
    Ok(())
}

#[then("the creation succeeds")]
fn creation_succeeds(world: &IdempotencyWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_create_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing create result in scenario world"))?;
    result
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected task creation failure: {err}"))?;
    Ok(())
}

#[then("the creation fails as a duplicate")]
fn creation_fails_as_duplicate(world: &IdempotencyWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_create_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing create result in scenario world"))?;
    match result {
        Err(err @ TaskLifecycleError::DuplicateRequest(_)) if err.kind() == ErrorKind::Conflict => {
            Ok(())
        }
        other => Err(eyre::eyre!("expected duplicate request error, got {other:?}")),
    }
}

#[then("{count:usize} task is stored")]
fn one_task_is_stored(world: &IdempotencyWorld, count: usize) -> Result<(), eyre::Report> {
    assert_stored_count(world, count)
}

#[then("{count:usize} tasks are stored")]
fn tasks_are_stored(world: &IdempotencyWorld, count: usize) -> Result<(), eyre::Report> {
    assert_stored_count(world, count)
}
