//! In-memory adapters for task lifecycle ports.

mod idempotency;
mod task;

pub use idempotency::InMemoryIdempotencyStore;
pub use task::InMemoryTaskRepository;
