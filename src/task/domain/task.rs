//! Task aggregate root.

use super::{LifecycleIntent, TaskDomainError, TaskId, TaskStatus, TransitionOutcome};
use chrono::{DateTime, FixedOffset, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Task aggregate root.
///
/// Tasks are immutable values: a status change yields a new `Task` carrying
/// the same identifier. Equality and hashing consider only the identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    status: TaskStatus,
    due_at: Option<DateTime<FixedOffset>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted due timestamp, if any.
    pub due_at: Option<DateTime<FixedOffset>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `OPEN` task with a fresh identifier.
    ///
    /// Title and description are trimmed; a missing description becomes
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        title: &str,
        description: Option<&str>,
        due_at: Option<DateTime<FixedOffset>>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: normalize_title(title)?,
            description: description.map(str::trim).unwrap_or_default().to_owned(),
            status: TaskStatus::Open,
            due_at,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the stored title is blank.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        Ok(Self {
            id: data.id,
            title: normalize_title(&data.title)?,
            description: data
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_owned(),
            status: data.status,
            due_at: data.due_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the trimmed description, empty when none was supplied.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due timestamp with the offset it was submitted in.
    #[must_use]
    pub const fn due_at(&self) -> Option<DateTime<FixedOffset>> {
        self.due_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Produces the task that results from requesting `target`.
    ///
    /// Requesting `OPEN`, or an intent that is already satisfied, returns an
    /// unchanged copy. A real transition refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the lifecycle
    /// table refuses the change.
    pub fn with_status(
        &self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let Some(intent) = LifecycleIntent::for_target(target) else {
            return Ok(self.clone());
        };

        match intent.apply(self.status) {
            TransitionOutcome::Advance(status) => Ok(Self {
                status,
                updated_at: clock.utc(),
                ..self.clone()
            }),
            TransitionOutcome::Unchanged => Ok(self.clone()),
            TransitionOutcome::Refused(reason) => Err(TaskDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.status,
                to: target,
                reason,
            }),
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn normalize_title(title: &str) -> Result<String, TaskDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
