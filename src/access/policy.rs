//! Role-based authorization decision table.

use super::AccessError;
use crate::identity::domain::{Role, UserId};
use serde::{Deserialize, Serialize};

/// Resolved identity of the caller performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: UserId,
    role: Role,
}

impl Actor {
    /// Creates an actor from a resolved user identity.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns the actor's user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Guarded operation, carrying the ownership facts its check needs.
///
/// Consolidating each role and ownership check into one tagged variant keeps
/// the whole policy in a single decision table instead of per-route
/// conditionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Assign a pending task to an employee.
    AssignTask,
    /// Accept a task assigned to the actor.
    AcceptTask {
        /// Current assignee of the task, if any.
        assigned_to: Option<UserId>,
    },
    /// Update progress on a task owned by the actor's team.
    UpdateProgress {
        /// Leader of the task's team, if the task has one.
        team_leader: Option<UserId>,
    },
    /// Change the status of a task assigned to the actor.
    UpdateStatus {
        /// Current assignee of the task, if any.
        assigned_to: Option<UserId>,
    },
    /// Change a user's role.
    ChangeRole,
    /// Release tasks whose assignee no longer exists.
    CleanupTasks,
    /// Read the dashboard for a role namespace.
    ReadOwnDashboard {
        /// Role namespace of the requested dashboard.
        namespace: Role,
    },
}

impl Action {
    /// Returns the canonical action name used in denial reasons.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssignTask => "assign_task",
            Self::AcceptTask { .. } => "accept_task",
            Self::UpdateProgress { .. } => "update_progress",
            Self::UpdateStatus { .. } => "update_status",
            Self::ChangeRole => "change_role",
            Self::CleanupTasks => "cleanup_tasks",
            Self::ReadOwnDashboard { .. } => "read_own_dashboard",
        }
    }
}

/// Decides whether `actor` may perform `action`.
///
/// The function is pure: every input it consults arrives via the actor and
/// the action's ownership facts, so the policy can be exercised without any
/// infrastructure.
///
/// # Errors
///
/// Returns [`AccessError::Forbidden`] when the actor's role or ownership does
/// not satisfy the action's rule. Denial never reveals whether the resource
/// exists; existence checks belong to the caller and surface as not-found.
pub fn authorize(actor: &Actor, action: &Action) -> Result<(), AccessError> {
    let allowed = match *action {
        Action::AssignTask => actor.role() == Role::TeamLeader,
        Action::AcceptTask { assigned_to } | Action::UpdateStatus { assigned_to } => {
            assigned_to == Some(actor.id())
        }
        Action::UpdateProgress { team_leader } => team_leader == Some(actor.id()),
        Action::ChangeRole | Action::CleanupTasks => actor.role() == Role::Manager,
        Action::ReadOwnDashboard { namespace } => actor.role() == namespace,
    };

    if allowed {
        Ok(())
    } else {
        Err(AccessError::forbidden(actor, action))
    }
}
