//! Diesel schema for notification persistence.

diesel::table! {
    /// Notification rows owned by their recipient.
    notifications (id) {
        /// Notification identifier.
        id -> Uuid,
        /// Notification kind.
        #[max_length = 50]
        kind -> Varchar,
        /// Notification title.
        #[max_length = 255]
        title -> Varchar,
        /// Notification message body.
        message -> Text,
        /// Owning recipient.
        recipient -> Uuid,
        /// Optional link target.
        #[max_length = 255]
        link -> Nullable<Varchar>,
        /// Whether the recipient has read the notification.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
