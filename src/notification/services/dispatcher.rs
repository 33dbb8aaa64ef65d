//! Dispatcher service: persist a notification, then best-effort publish.

use crate::error::{Classify, ErrorKind};
use crate::identity::domain::UserId;
use crate::notification::{
    domain::{Notification, NotificationDomainError, NotificationId, NotificationKind},
    ports::{
        NotificationRepository, NotificationRepositoryError, PushMessage, RealtimeChannel,
        user_channel,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for dispatching a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    kind: NotificationKind,
    recipient: UserId,
    title: String,
    message: String,
    link: Option<String>,
}

impl DispatchRequest {
    /// Creates a request with required notification fields.
    #[must_use]
    pub fn new(
        kind: NotificationKind,
        recipient: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            recipient,
            title: title.into(),
            message: message.into(),
            link: None,
        }
    }

    /// Sets the link target.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Outcome of a dispatch: the persisted row plus the live-push result.
///
/// `published` reports the best-effort push only; the persisted row is the
/// durable fallback a client reads after missing the live message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// The persisted notification row.
    pub notification: Notification,
    /// Whether the live publish reached the transport.
    pub published: bool,
}

/// Service-level errors for notification operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] NotificationDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] NotificationRepositoryError),
    /// The notification does not exist or belongs to another recipient.
    #[error("notification not found: {0}")]
    NotFound(NotificationId),
}

impl Classify for DispatchError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(NotificationRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(NotificationRepositoryError::DuplicateNotification(_)) => {
                ErrorKind::Conflict
            }
            Self::Repository(NotificationRepositoryError::Persistence(_)) => ErrorKind::Internal,
        }
    }
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Notification persistence and fan-out service.
#[derive(Clone)]
pub struct NotificationDispatcher<R, P, C>
where
    R: NotificationRepository,
    P: RealtimeChannel,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    channel: Arc<P>,
    clock: Arc<C>,
}

impl<R, P, C> NotificationDispatcher<R, P, C>
where
    R: NotificationRepository,
    P: RealtimeChannel,
    C: Clock + Send + Sync,
{
    /// Creates a new dispatcher.
    #[must_use]
    pub const fn new(repository: Arc<R>, channel: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            channel,
            clock,
        }
    }

    /// Persists a notification row, then publishes to the recipient's
    /// channel.
    ///
    /// The publish is fire-and-forget: a transport failure is logged and
    /// reported through [`DispatchReceipt::published`], never as an error and
    /// never by rolling back the persisted row.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when validation fails or the row cannot be
    /// persisted.
    pub async fn dispatch(&self, request: DispatchRequest) -> DispatchResult<DispatchReceipt> {
        let DispatchRequest {
            kind,
            recipient,
            title,
            message,
            link,
        } = request;

        let mut notification = Notification::new(kind, recipient, title, message, &*self.clock)?;
        if let Some(link) = link {
            notification = notification.with_link(link);
        }
        self.repository.store(&notification).await?;

        let push = PushMessage {
            notification_id: notification.id(),
            kind: notification.kind(),
            title: notification.title().to_owned(),
            message: notification.message().to_owned(),
            link: notification.link().map(ToOwned::to_owned),
        };
        let channel = user_channel(recipient);
        let published = match self.channel.publish(&channel, &push).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    notification = %notification.id(),
                    channel = %channel,
                    error = %err,
                    "dropping failed live publish; persisted row remains readable"
                );
                false
            }
        };

        Ok(DispatchReceipt {
            notification,
            published,
        })
    }

    /// Marks a notification as read on behalf of its recipient.
    ///
    /// Idempotent: marking an already-read notification succeeds without a
    /// second write.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NotFound`] when the notification does not
    /// exist or belongs to another recipient; foreign notifications are never
    /// revealed as forbidden.
    pub async fn mark_read(
        &self,
        actor: UserId,
        id: NotificationId,
    ) -> DispatchResult<Notification> {
        let mut notification = self
            .repository
            .find_owned(id, actor)
            .await?
            .ok_or(DispatchError::NotFound(id))?;

        if notification.mark_read() {
            self.repository.update(&notification).await?;
        }
        Ok(notification)
    }

    /// Returns the recipient's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Repository`] when persistence lookup fails.
    pub async fn list_for(&self, recipient: UserId) -> DispatchResult<Vec<Notification>> {
        Ok(self.repository.list_for_recipient(recipient).await?)
    }
}
