//! Notification aggregate root and notification kinds.

use super::{NotificationDomainError, NotificationId, ParseNotificationKindError};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a notification, driving its rendering at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A task was assigned to the recipient.
    TaskAssigned,
    /// A task created by the recipient was accepted.
    TaskAccepted,
    /// The status of a task created by the recipient changed.
    StatusChanged,
    /// A meeting invitation received a response.
    MeetingResponse,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskAccepted => "task_accepted",
            Self::StatusChanged => "status_changed",
            Self::MeetingResponse => "meeting_response",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for NotificationKind {
    type Error = ParseNotificationKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "task_assigned" => Ok(Self::TaskAssigned),
            "task_accepted" => Ok(Self::TaskAccepted),
            "status_changed" => Ok(Self::StatusChanged),
            "meeting_response" => Ok(Self::MeetingResponse),
            _ => Err(ParseNotificationKindError(value.to_owned())),
        }
    }
}

/// Notification aggregate root.
///
/// A notification is owned by its recipient: it is created by the dispatcher,
/// read by its owner, and mutated only to flip the read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    kind: NotificationKind,
    title: String,
    message: String,
    recipient: UserId,
    link: Option<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedNotificationData {
    /// Persisted notification identifier.
    pub id: NotificationId,
    /// Persisted kind.
    pub kind: NotificationKind,
    /// Persisted title.
    pub title: String,
    /// Persisted message body.
    pub message: String,
    /// Persisted recipient.
    pub recipient: UserId,
    /// Persisted link, if any.
    pub link: Option<String>,
    /// Persisted read flag.
    pub is_read: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a new unread notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationDomainError::EmptyTitle`] or
    /// [`NotificationDomainError::EmptyMessage`] when either text is blank.
    pub fn new(
        kind: NotificationKind,
        recipient: UserId,
        title: impl Into<String>,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, NotificationDomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(NotificationDomainError::EmptyTitle);
        }
        let message = message.into();
        if message.trim().is_empty() {
            return Err(NotificationDomainError::EmptyMessage);
        }

        Ok(Self {
            id: NotificationId::new(),
            kind,
            title,
            message,
            recipient,
            link: None,
            is_read: false,
            created_at: clock.utc(),
        })
    }

    /// Attaches a link target.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedNotificationData) -> Self {
        Self {
            id: data.id,
            kind: data.kind,
            title: data.title,
            message: data.message,
            recipient: data.recipient,
            link: data.link,
            is_read: data.is_read,
            created_at: data.created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the notification kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the owning recipient.
    #[must_use]
    pub const fn recipient(&self) -> UserId {
        self.recipient
    }

    /// Returns the link target, if any.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Returns `true` once the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the notification as read.
    ///
    /// Idempotent: returns `true` when the flag flipped, `false` when the
    /// notification was already read. A repeated call is a no-op, not an
    /// error.
    pub const fn mark_read(&mut self) -> bool {
        if self.is_read {
            false
        } else {
            self.is_read = true;
            true
        }
    }
}
