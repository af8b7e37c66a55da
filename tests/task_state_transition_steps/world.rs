//! Shared world state for task status lifecycle BDD scenarios.

use rstest::fixture;
use tasklane::{
    app::{TaskService, in_memory_service},
    task::{domain::Task, services::TaskLifecycleError},
};

/// Scenario world for task transition behaviour tests.
pub struct TaskTransitionWorld {
    pub service: TaskService,
    pub current_task: Option<Task>,
    pub last_update_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskTransitionWorld {
    /// Creates a world backed by fresh in-memory adapters.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory service cannot be assembled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: in_memory_service().expect("in-memory service should assemble"),
            current_task: None,
            last_update_result: None,
        }
    }

    /// Returns the task under test.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been created yet.
    pub fn task(&self) -> Result<&Task, eyre::Report> {
        self.current_task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTransitionWorld {
    TaskTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
