//! User roles and role parsing.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role held by an authenticated user.
///
/// The set is closed: every stored user holds exactly one of these values,
/// and role strings arriving at the boundary are normalized case-insensitively
/// before storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administers roles and runs maintenance batches.
    Manager,
    /// Assigns tasks and tracks team progress.
    TeamLeader,
    /// Accepts and progresses assigned tasks.
    Employee,
    /// Default role for first-contact users.
    Client,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::TeamLeader => "team_leader",
            Self::Employee => "employee",
            Self::Client => "client",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Client
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "manager" => Ok(Self::Manager),
            "team_leader" => Ok(Self::TeamLeader),
            "employee" => Ok(Self::Employee),
            "client" => Ok(Self::Client),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
