//! Repository port for notification persistence and recipient-scoped lookup.

use crate::identity::domain::UserId;
use crate::notification::domain::{Notification, NotificationId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification repository operations.
pub type NotificationRepositoryResult<T> = Result<T, NotificationRepositoryError>;

/// Notification persistence contract.
///
/// Lookups are recipient-scoped: a notification belonging to another user is
/// indistinguishable from one that does not exist, so callers cannot probe
/// for foreign notification ids.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Stores a new notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::DuplicateNotification`] when the
    /// notification ID already exists.
    async fn store(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Persists changes to an existing notification (read flag).
    ///
    /// # Errors
    ///
    /// Returns [`NotificationRepositoryError::NotFound`] when the notification
    /// does not exist.
    async fn update(&self, notification: &Notification) -> NotificationRepositoryResult<()>;

    /// Finds a notification by identifier, scoped to its owning recipient.
    ///
    /// Returns `None` both when the notification does not exist and when it
    /// belongs to a different recipient.
    async fn find_owned(
        &self,
        id: NotificationId,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Option<Notification>>;

    /// Returns the recipient's notifications, newest first.
    async fn list_for_recipient(
        &self,
        recipient: UserId,
    ) -> NotificationRepositoryResult<Vec<Notification>>;
}

/// Errors returned by notification repository implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationRepositoryError {
    /// A notification with the same identifier already exists.
    #[error("duplicate notification identifier: {0}")]
    DuplicateNotification(NotificationId),

    /// The notification was not found.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
