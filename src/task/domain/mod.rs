//! Domain model for task lifecycle management.
//!
//! The task domain models task creation, the status lifecycle, and listing
//! windows while keeping all infrastructure concerns outside of the domain
//! boundary.

mod error;
mod ids;
mod page;
mod status;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use page::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest};
pub use status::{LifecycleIntent, TaskStatus, TransitionOutcome};
pub use task::{PersistedTaskData, Task};
