//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or changing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The requested page number is below one.
    #[error("invalid page {0}, expected a positive integer")]
    InvalidPage(u32),

    /// The requested page size is outside `1..=100`.
    #[error(
        "invalid page size {0}, expected a value between 1 and {max}",
        max = super::MAX_PAGE_SIZE
    )]
    InvalidPageSize(u32),

    /// The lifecycle table refuses the requested change.
    #[error("task {task_id}: {reason}")]
    InvalidStateTransition {
        /// Task whose status change was refused.
        task_id: TaskId,
        /// Status held when the change was requested.
        from: TaskStatus,
        /// Status the caller asked for.
        to: TaskStatus,
        /// Human-readable refusal reason.
        reason: &'static str,
    },
}

/// Error returned while parsing task statuses from callers or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
