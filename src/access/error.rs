//! Error type for authorization denials.

use super::{Action, Actor};
use crate::error::{Classify, ErrorKind};
use crate::identity::domain::Role;
use thiserror::Error;

/// Denial returned by the authorization policy.
///
/// A denial always means the identity was verified but insufficient; it is
/// never used for unauthenticated or missing-resource conditions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The actor's role or ownership does not permit the action.
    #[error("role {role} may not perform {action}")]
    Forbidden {
        /// Role held by the denied actor.
        role: Role,
        /// Canonical name of the denied action.
        action: &'static str,
    },
}

impl AccessError {
    /// Builds the denial for an actor/action pair.
    #[must_use]
    pub const fn forbidden(actor: &Actor, action: &Action) -> Self {
        Self::Forbidden {
            role: actor.role(),
            action: action.name(),
        }
    }
}

impl Classify for AccessError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Forbidden
    }
}
