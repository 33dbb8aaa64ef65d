//! Boundary error taxonomy shared by all feature modules.
//!
//! Every service error in this crate maps onto exactly one [`ErrorKind`]
//! through the [`Classify`] trait. The kinds mirror the HTTP-shaped boundary:
//! unauthenticated, forbidden, not-found, conflict, and validation failures
//! are surfaced verbatim to callers, while internal failures render opaquely
//! and keep their cause server-side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable machine-readable failure classification surfaced at the boundary.
///
/// The three access-shaped kinds are deliberately distinct: collapsing
/// [`ErrorKind::Unauthenticated`], [`ErrorKind::Forbidden`], and
/// [`ErrorKind::NotFound`] into one another leaks more or less information
/// than intended to callers probing access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No verified identity accompanied the request.
    Unauthenticated,
    /// The identity is verified but the role or ownership check failed.
    Forbidden,
    /// The referenced record does not exist or does not belong to the caller.
    NotFound,
    /// A state-machine precondition no longer holds.
    Conflict,
    /// The input is malformed or out of range.
    Validation,
    /// A storage or channel failure; details stay server-side.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns the HTTP-equivalent status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Validation => 422,
            Self::Internal => 500,
        }
    }

    /// Returns `true` when the kind must not leak its cause to callers.
    #[must_use]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a module error onto its boundary classification.
pub trait Classify: fmt::Display {
    /// Returns the boundary kind for this error.
    fn kind(&self) -> ErrorKind;

    /// Returns the message safe to surface to the caller.
    ///
    /// User-facing kinds render their full message; internal failures render
    /// opaquely so storage details never cross the boundary.
    fn public_message(&self) -> String {
        if self.kind().is_internal() {
            "internal error".to_owned()
        } else {
            self.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;

    #[test]
    fn status_codes_match_boundary_contract() {
        assert_eq!(ErrorKind::Unauthenticated.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Validation.status_code(), 422);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn only_internal_is_opaque() {
        assert!(ErrorKind::Internal.is_internal());
        assert!(!ErrorKind::Forbidden.is_internal());
        assert!(!ErrorKind::NotFound.is_internal());
    }
}
