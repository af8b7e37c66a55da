//! Service layer for task creation, lookup, listing, status changes and
//! deletion.

use super::{
    idempotency::{Admission, CreatePayload, IdempotencyGuard},
    listing::TaskListingDispatcher,
};
use crate::task::{
    domain::{PageRequest, ParseTaskStatusError, Task, TaskDomainError, TaskId, TaskStatus},
    ports::{
        IdempotencyKey, IdempotencyStore, IdempotencyStoreError, TaskRepository,
        TaskRepositoryError,
    },
};
use chrono::{DateTime, FixedOffset};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    due_at: Option<DateTime<FixedOffset>>,
    idempotency_key: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_at: None,
            idempotency_key: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due timestamp.
    #[must_use]
    pub const fn with_due_at(mut self, due_at: DateTime<FixedOffset>) -> Self {
        self.due_at = Some(due_at);
        self
    }

    /// Sets the raw idempotency key. A blank key is treated as absent.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Request payload for listing one page of tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTasksRequest {
    page: u32,
    page_size: u32,
    sort: Option<String>,
}

impl ListTasksRequest {
    /// Creates a request for `page` (one-based) of `page_size` tasks.
    #[must_use]
    pub const fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            sort: None,
        }
    }

    /// Names the listing strategy to apply.
    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

impl Default for ListTasksRequest {
    fn default() -> Self {
        let page = PageRequest::default();
        Self::new(page.page(), page.page_size())
    }
}

/// Request payload for changing a task's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskStatusRequest {
    task_id: String,
    target_status: String,
}

impl UpdateTaskStatusRequest {
    /// Creates a request asking for `target_status` on `task_id`.
    #[must_use]
    pub fn new(task_id: impl ToString, target_status: impl Into<String>) -> Self {
        Self {
            task_id: task_id.to_string(),
            target_status: target_status.into(),
        }
    }
}

/// Broad failure classes a transport layer maps onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input was malformed; retrying it unchanged cannot succeed.
    Validation,
    /// The referenced task does not exist.
    NotFound,
    /// The request clashes with current state; retrying is unsafe.
    Conflict,
    /// A storage collaborator failed.
    Storage,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a lifecycle rule failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The requested status is not a known status.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// No task exists with the given identifier.
    #[error("task '{0}' not found")]
    NotFound(String),
    /// The idempotency key was already claimed by an earlier request.
    #[error("duplicate request for idempotency key '{0}'")]
    DuplicateRequest(IdempotencyKey),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Idempotency store operation failed.
    #[error(transparent)]
    IdempotencyStore(#[from] IdempotencyStoreError),
}

impl TaskLifecycleError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(TaskDomainError::InvalidStateTransition { .. })
            | Self::DuplicateRequest(_) => ErrorKind::Conflict,
            Self::Domain(_) | Self::InvalidStatus(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) | Self::IdempotencyStore(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Holds no mutable state of its own; all state lives behind the repository
/// and idempotency-store ports.
pub struct TaskLifecycleService<R, S, C>
where
    R: TaskRepository + ?Sized,
    S: IdempotencyStore + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    guard: IdempotencyGuard<S>,
    listing: Arc<TaskListingDispatcher>,
    clock: Arc<C>,
}

impl<R, S, C> Clone for TaskLifecycleService<R, S, C>
where
    R: TaskRepository + ?Sized,
    S: IdempotencyStore + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            guard: self.guard.clone(),
            listing: Arc::clone(&self.listing),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, S, C> TaskLifecycleService<R, S, C>
where
    R: TaskRepository + ?Sized,
    S: IdempotencyStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        idempotency_store: Arc<S>,
        listing: TaskListingDispatcher,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            guard: IdempotencyGuard::new(idempotency_store),
            listing: Arc::new(listing),
            clock,
        }
    }

    /// Creates and persists a new `OPEN` task.
    ///
    /// When the request carries a non-blank idempotency key, the key is
    /// claimed before anything is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for a blank title,
    /// [`TaskLifecycleError::DuplicateRequest`] when the key was already
    /// claimed, or a storage error from either port.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            title,
            description,
            due_at,
            idempotency_key,
        } = request;

        let task = Task::new(&title, description.as_deref(), due_at, &*self.clock)?;

        let key = IdempotencyKey::parse(idempotency_key.as_deref());
        let payload = CreatePayload {
            title: &title,
            description: description.as_deref(),
            due_at,
        };
        if let Admission::Duplicate(duplicate) = self.guard.admit(key.as_ref(), &payload).await? {
            warn!(idempotency_key = %duplicate, "refusing duplicate create request");
            return Err(TaskLifecycleError::DuplicateRequest(duplicate));
        }

        self.repository.save(&task).await?;
        info!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when no such task exists, or
    /// [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn get(&self, task_id: &str) -> TaskLifecycleResult<Task> {
        self.find_existing(task_id).await
    }

    /// Lists one page of tasks with the requested ordering.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for an invalid page window, or
    /// [`TaskLifecycleError::Repository`] when fetching fails.
    pub async fn list(&self, request: ListTasksRequest) -> TaskLifecycleResult<Vec<Task>> {
        let page = PageRequest::new(request.page, request.page_size)?;
        Ok(self.listing.list(page, request.sort.as_deref()).await?)
    }

    /// Applies a requested status through the lifecycle table and persists
    /// the result.
    ///
    /// A refused transition leaves the stored task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidStatus`] for an unknown status,
    /// [`TaskLifecycleError::NotFound`] when the task does not exist,
    /// [`TaskLifecycleError::Domain`] when the transition is refused, or
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn update_status(
        &self,
        request: UpdateTaskStatusRequest,
    ) -> TaskLifecycleResult<Task> {
        let target = TaskStatus::try_from(request.target_status.as_str())?;
        let task = self.find_existing(&request.task_id).await?;
        let updated = task.with_status(target, &*self.clock)?;
        self.repository.save(&updated).await?;
        info!(
            task_id = %updated.id(),
            from = %task.status(),
            to = %updated.status(),
            "task status updated"
        );
        Ok(updated)
    }

    /// Deletes an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist;
    /// no delete is issued in that case.
    pub async fn delete(&self, task_id: &str) -> TaskLifecycleResult<()> {
        let task = self.find_existing(task_id).await?;
        self.repository.delete(task.id()).await?;
        info!(task_id = %task.id(), "task deleted");
        Ok(())
    }

    async fn find_existing(&self, task_id: &str) -> TaskLifecycleResult<Task> {
        let Some(id) = TaskId::parse(task_id) else {
            return Err(TaskLifecycleError::NotFound(task_id.to_owned()));
        };
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(task_id.to_owned()))
    }
}
