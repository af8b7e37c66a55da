//! Shared world state for idempotent creation BDD scenarios.

use rstest::fixture;
use tasklane::{
    app::{TaskService, in_memory_service},
    task::{
        domain::Task,
        services::{CreateTaskRequest, TaskLifecycleError},
    },
};

/// Scenario world for idempotent creation behaviour tests.
pub struct IdempotencyWorld {
    pub service: TaskService,
    pub idempotency_key: Option<String>,
    pub last_create_result: Option<Result<Task, TaskLifecycleError>>,
}

impl IdempotencyWorld {
    /// Creates a world backed by fresh in-memory adapters.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory service cannot be assembled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: in_memory_service().expect("in-memory service should assemble"),
            idempotency_key: None,
            last_create_result: None,
        }
    }

    /// Builds a create request carrying the scenario's key, if any.
    #[must_use]
    pub fn request(&self, title: String) -> CreateTaskRequest {
        let request = CreateTaskRequest::new(title);
        match self.idempotency_key.clone() {
            Some(key) => request.with_idempotency_key(key),
            None => request,
        }
    }
}

impl Default for IdempotencyWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> IdempotencyWorld {
    IdempotencyWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
