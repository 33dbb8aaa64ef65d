//! Domain model for notification fan-out.
//!
//! The notification domain models recipient-owned notification records and
//! their single permitted mutation, the idempotent read flag.

mod error;
mod ids;
mod notification;

pub use error::{NotificationDomainError, ParseNotificationKindError};
pub use ids::NotificationId;
pub use notification::{Notification, NotificationKind, PersistedNotificationData};
