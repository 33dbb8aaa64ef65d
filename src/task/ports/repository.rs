//! Repository port for task persistence with optimistic status updates.

use crate::identity::domain::UserId;
use crate::task::domain::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Updates are optimistic: the caller states the status it loaded, and the
/// store applies the write only while that status still holds. A transition
/// raced by another writer fails with [`TaskRepositoryError::StaleStatus`]
/// instead of silently overwriting.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task, guarded by the status the caller
    /// observed when loading it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::StaleStatus`] when the stored status no
    /// longer matches `expected`.
    async fn update(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<()>;

    /// Finds a task by internal task identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks whose assignee is set.
    ///
    /// The filter is an explicit assignee-is-present check; unassigned tasks
    /// never appear in the result.
    async fn list_assigned(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns all tasks assigned to the given user.
    async fn list_for_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored status diverged from the status the caller loaded.
    #[error("task {task_id} changed concurrently, expected status {expected}")]
    StaleStatus {
        /// Task whose update was rejected.
        task_id: TaskId,
        /// Status the caller loaded before mutating.
        expected: TaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
