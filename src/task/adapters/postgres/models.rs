//! Diesel row models and row/domain mapping for task persistence.

use super::schema::{idempotency_entry, tasks};
use crate::task::domain::{
    ParseTaskStatusError, PersistedTaskData, Task, TaskDomainError, TaskId, TaskStatus,
};
use chrono::{DateTime, FixedOffset, Utc};
use diesel::prelude::*;
use thiserror::Error;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Due instant.
    pub due_at: Option<DateTime<Utc>>,
    /// Offset the due timestamp was submitted with.
    pub due_at_offset_seconds: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Trimmed title.
    pub title: String,
    /// Trimmed description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Due instant.
    pub due_at: Option<DateTime<Utc>>,
    /// Offset the due timestamp was submitted with.
    pub due_at_offset_seconds: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for idempotency claims.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = idempotency_entry)]
pub struct NewIdempotencyRow {
    /// Claimed key.
    pub id_key: String,
    /// Fingerprint of the claiming request.
    pub fingerprint: String,
    /// Claim timestamp.
    pub created_at: DateTime<Utc>,
}

/// Errors raised while turning a stored row back into a task.
#[derive(Debug, Error)]
pub enum RowMappingError {
    /// The stored status is not a known lifecycle status.
    #[error(transparent)]
    Status(#[from] ParseTaskStatusError),
    /// The stored offset is outside the representable range.
    #[error("invalid due offset of {0} seconds")]
    InvalidOffset(i32),
    /// The stored values violate a domain invariant.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

impl NewTaskRow {
    /// Builds the insert row for a task.
    pub fn from_task(task: &Task) -> Self {
        let description = Some(task.description().to_owned()).filter(|text| !text.is_empty());
        Self {
            id: task.id().into_inner(),
            title: task.title().to_owned(),
            description,
            status: task.status().as_str().to_owned(),
            due_at: task.due_at().map(|due| due.with_timezone(&Utc)),
            due_at_offset_seconds: task.due_at().map(|due| due.offset().local_minus_utc()),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

impl TaskRow {
    /// Reconstructs the task aggregate stored in this row.
    ///
    /// A due instant without a recorded offset is read back in UTC.
    pub fn into_task(self) -> Result<Task, RowMappingError> {
        let status = TaskStatus::try_from(self.status.as_str())?;
        let due_at = self
            .due_at
            .map(|instant| restore_offset(instant, self.due_at_offset_seconds))
            .transpose()?;

        let data = PersistedTaskData {
            id: TaskId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            status,
            due_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        Ok(Task::from_persisted(data)?)
    }
}

fn restore_offset(
    instant: DateTime<Utc>,
    offset_seconds: Option<i32>,
) -> Result<DateTime<FixedOffset>, RowMappingError> {
    let seconds = offset_seconds.unwrap_or_default();
    let offset = FixedOffset::east_opt(seconds).ok_or(RowMappingError::InvalidOffset(seconds))?;
    Ok(instant.with_timezone(&offset))
}
