//! In-memory adapters for notification ports.

mod channel;
mod notification;

pub use channel::InMemoryRealtimeChannel;
pub use notification::InMemoryNotificationRepository;
