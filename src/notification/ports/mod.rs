//! Port contracts for notification fan-out.
//!
//! Ports define infrastructure-agnostic interfaces used by the dispatcher.

pub mod channel;
pub mod repository;

pub use channel::{
    PushMessage, RealtimeChannel, RealtimeChannelError, RealtimeChannelResult, user_channel,
};
pub use repository::{
    NotificationRepository, NotificationRepositoryError, NotificationRepositoryResult,
};
