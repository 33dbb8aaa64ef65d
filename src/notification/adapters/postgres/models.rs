//! Diesel row models for notification persistence.

use super::schema::notifications;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for notification records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Notification kind.
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification message body.
    pub message: String,
    /// Owning recipient.
    pub recipient: uuid::Uuid,
    /// Optional link target.
    pub link: Option<String>,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Notification kind.
    pub kind: String,
    /// Notification title.
    pub title: String,
    /// Notification message body.
    pub message: String,
    /// Owning recipient.
    pub recipient: uuid::Uuid,
    /// Optional link target.
    pub link: Option<String>,
    /// Read flag.
    pub is_read: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
