//! Error types for notification domain validation and parsing.

use crate::error::{Classify, ErrorKind};
use thiserror::Error;

/// Errors returned while constructing notification domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotificationDomainError {
    /// The notification title is empty after trimming.
    #[error("notification title must not be empty")]
    EmptyTitle,

    /// The notification message is empty after trimming.
    #[error("notification message must not be empty")]
    EmptyMessage,
}

impl Classify for NotificationDomainError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Error returned while parsing notification kinds from storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown notification kind: {0}")]
pub struct ParseNotificationKindError(pub String);

impl Classify for ParseNotificationKindError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
