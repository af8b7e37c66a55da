//! Task status values and the lifecycle transition table.
//!
//! Callers name a target status. The target is mapped to one of two intents
//! (`start` or `complete`) and the intent is looked up against the current
//! status. `OPEN` is never a real transition: asking for it leaves the task
//! as it is.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    #[default]
    Open,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed. No further transition succeeds.
    Done,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Returns `true` when no intent can move the task any further.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "OPEN" => Ok(Self::Open),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract lifecycle operation derived from a requested target status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleIntent {
    /// Begin work on the task.
    Start,
    /// Finish the task.
    Complete,
}

/// Result of looking an intent up in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The task moves to a new status.
    Advance(TaskStatus),
    /// The intent is already satisfied; the task stays as it is.
    Unchanged,
    /// The intent is illegal from the current status.
    Refused(&'static str),
}

impl LifecycleIntent {
    /// Maps a requested target status onto an intent.
    ///
    /// Returns `None` for [`TaskStatus::Open`], which is accepted as a no-op.
    #[must_use]
    pub const fn for_target(target: TaskStatus) -> Option<Self> {
        match target {
            TaskStatus::Open => None,
            TaskStatus::InProgress => Some(Self::Start),
            TaskStatus::Done => Some(Self::Complete),
        }
    }

    /// Applies this intent to `current` using the lifecycle table.
    #[must_use]
    pub const fn apply(self, current: TaskStatus) -> TransitionOutcome {
        match (current, self) {
            (TaskStatus::Open, Self::Start) => TransitionOutcome::Advance(TaskStatus::InProgress),
            (TaskStatus::Open, Self::Complete) => {
                TransitionOutcome::Refused("cannot complete from OPEN")
            }
            (TaskStatus::InProgress, Self::Start) | (TaskStatus::Done, Self::Complete) => {
                TransitionOutcome::Unchanged
            }
            (TaskStatus::InProgress, Self::Complete) => {
                TransitionOutcome::Advance(TaskStatus::Done)
            }
            (TaskStatus::Done, Self::Start) => TransitionOutcome::Refused("already DONE"),
        }
    }
}
