//! Publish-only port for the real-time push transport.

use crate::identity::domain::UserId;
use crate::notification::domain::{NotificationId, NotificationKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for channel operations.
pub type RealtimeChannelResult<T> = Result<T, RealtimeChannelError>;

/// Payload pushed to a recipient's live channel.
///
/// The push mirrors the persisted notification row; a client that misses the
/// live message still sees the row on its next read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Identifier of the persisted notification row.
    pub notification_id: NotificationId,
    /// Notification kind.
    pub kind: NotificationKind,
    /// Notification title.
    pub title: String,
    /// Notification message body.
    pub message: String,
    /// Optional link target.
    pub link: Option<String>,
}

impl PushMessage {
    /// Renders the JSON payload handed to the push transport.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the payload cannot be rendered;
    /// with the current field types this does not happen in practice.
    pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Returns the channel name for a recipient's private push channel.
#[must_use]
pub fn user_channel(recipient: UserId) -> String {
    format!("user-{recipient}")
}

/// Real-time push transport contract.
///
/// The transport is publish-only and best-effort: the dispatcher never
/// blocks a task mutation on delivery, and a failed publish is dropped after
/// logging rather than retried.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    /// Publishes a message to the named channel.
    ///
    /// # Errors
    ///
    /// Returns [`RealtimeChannelError`] when the transport rejects or cannot
    /// deliver the publish.
    async fn publish(&self, channel: &str, message: &PushMessage) -> RealtimeChannelResult<()>;
}

/// Errors returned by channel implementations.
#[derive(Debug, Clone, Error)]
pub enum RealtimeChannelError {
    /// The transport rejected or could not deliver the publish.
    #[error("channel error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RealtimeChannelError {
    /// Wraps a transport-side error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
