//! Application services for task lifecycle orchestration.

pub mod idempotency;
pub mod listing;
mod lifecycle;

pub use idempotency::{Admission, CreatePayload, IdempotencyGuard, RequestFingerprint};
pub use lifecycle::{
    CreateTaskRequest, ErrorKind, ListTasksRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, UpdateTaskStatusRequest,
};
pub use listing::{
    DEFAULT_STRATEGY, DueDateListingStrategy, MissingDefaultStrategy, StatusListingStrategy,
    TaskListingDispatcher, TaskListingStrategy,
};
