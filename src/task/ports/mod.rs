//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod idempotency;
pub mod repository;

pub use idempotency::{
    IdempotencyKey, IdempotencyRecord, IdempotencyStore, IdempotencyStoreError,
    IdempotencyStoreResult,
};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
