//! Given steps for idempotent creation BDD scenarios.

use super::world::{IdempotencyWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"the idempotency key "{key}""#)]
fn idempotency_key(world: &mut IdempotencyWorld, key: String) {
    world.idempotency_key = Some(key);
}

#[given(r#"a task titled "{title}" has been created"#)]
fn task_has_been_created(world: &mut IdempotencyWorld, title: String) -> Result<(), eyre::Report> {
    let request = world.request(title);
    run_async(world.service.create(request)).wrap_err("create task in scenario setup")?;
    Ok(())
}
