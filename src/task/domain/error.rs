//! Error types for task domain validation and transitions.

use super::{TaskId, TaskStatus};
use crate::error::{Classify, ErrorKind};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The progress value lies outside `0..=100`.
    #[error("progress {0} is out of range, expected 0..=100")]
    ProgressOutOfRange(i64),

    /// The requested status change is not permitted by the state machine.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the task currently holds.
        from: TaskStatus,
        /// Status the transition requested.
        to: TaskStatus,
    },

    /// The transition requires an assignee but the task has none.
    #[error("task {task_id} has no assignee and cannot move to {to}")]
    MissingAssignee {
        /// Task whose transition was rejected.
        task_id: TaskId,
        /// Status the transition requested.
        to: TaskStatus,
    },

    /// Progress cannot be recorded before the task leaves `Pending`.
    #[error("task {task_id} is pending and does not track progress yet")]
    ProgressBeforeAssignment {
        /// Task whose progress update was rejected.
        task_id: TaskId,
    },
}

impl Classify for TaskDomainError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle | Self::ProgressOutOfRange(_) => ErrorKind::Validation,
            Self::InvalidStatusTransition { .. }
            | Self::MissingAssignee { .. }
            | Self::ProgressBeforeAssignment { .. } => ErrorKind::Conflict,
        }
    }
}

/// Error returned while parsing task statuses from the boundary or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

impl Classify for ParseTaskStatusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Error returned while parsing priorities from the boundary or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

impl Classify for ParsePriorityError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
