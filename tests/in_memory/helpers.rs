//! Shared helpers for in-memory service integration tests.

use chrono::{DateTime, FixedOffset};
use rstest::fixture;
use tasklane::{
    app::{TaskService, in_memory_service},
    task::{
        domain::{Task, TaskStatus},
        services::{CreateTaskRequest, UpdateTaskStatusRequest},
    },
};

/// Provides a service wired to fresh in-memory adapters for each test.
#[fixture]
pub fn service() -> TaskService {
    in_memory_service().expect("in-memory service should assemble")
}

/// Parses an RFC 3339 timestamp, keeping its offset.
///
/// # Errors
///
/// Returns an error if `raw` is not a valid RFC 3339 timestamp.
pub fn due(raw: &str) -> Result<DateTime<FixedOffset>, eyre::Report> {
    Ok(DateTime::parse_from_rfc3339(raw)?)
}

/// Creates a task and walks it forward to `status`.
///
/// # Errors
///
/// Returns an error if creation or any status update fails.
pub async fn create_in_status(
    service: &TaskService,
    request: CreateTaskRequest,
    status: TaskStatus,
) -> Result<Task, eyre::Report> {
    let mut task = service.create(request).await?;
    let steps: &[TaskStatus] = match status {
        TaskStatus::Open => &[],
        TaskStatus::InProgress => &[TaskStatus::InProgress],
        TaskStatus::Done => &[TaskStatus::InProgress, TaskStatus::Done],
    };
    for step in steps {
        task = service
            .update_status(UpdateTaskStatusRequest::new(task.id(), step.as_str()))
            .await?;
    }
    Ok(task)
}

/// Returns the titles of `tasks` in order.
#[must_use]
pub fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::title).collect()
}
