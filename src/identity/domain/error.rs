//! Error types for identity domain validation and parsing.

use crate::error::{Classify, ErrorKind};
use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The external identity reference is empty after trimming.
    #[error("no verified external identity supplied")]
    MissingExternalIdentity,

    /// The profile display name is empty after trimming.
    #[error("profile name must not be empty")]
    EmptyDisplayName,

    /// The profile email address is malformed.
    #[error("invalid email address '{0}'")]
    InvalidEmail(String),
}

impl Classify for IdentityDomainError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingExternalIdentity => ErrorKind::Unauthenticated,
            Self::EmptyDisplayName | Self::InvalidEmail(_) => ErrorKind::Validation,
        }
    }
}

/// Error returned while parsing role strings from the boundary or storage.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl Classify for ParseRoleError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
