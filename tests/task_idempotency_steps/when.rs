//! When steps for idempotent creation BDD scenarios.

use super::world::{IdempotencyWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#"a task titled "{title}" is created"#)]
fn task_is_created(world: &mut IdempotencyWorld, title: String) {
    let request = world.request(title);
    world.last_create_result = Some(run_async(world.service.create(request)));
}
