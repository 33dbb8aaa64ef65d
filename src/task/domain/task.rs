//! Task aggregate root and lifecycle state machine.

use super::{
    ParsePriorityError, ParseTaskStatusError, Progress, ProjectId, TaskDomainError, TaskId,
    TaskTitle, TeamId,
};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// The forward chain is `Pending → Assigned → Accepted → InProgress → Done`;
/// `Pending` is reachable again from any non-terminal state through
/// [`Task::release`]. `Done` is terminal: reopening completed work is
/// unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task exists but has not been handed to anyone.
    Pending,
    /// Task has been assigned and awaits acceptance.
    Assigned,
    /// The assignee has accepted the task.
    Accepted,
    /// Work on the task is underway.
    InProgress,
    /// The task has been completed.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Assigned => "assigned",
            Self::Accepted => "accepted",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns `true` when no further transitions leave this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns `true` when the status-change matrix permits `self → to`.
    ///
    /// Forward jumps are allowed (an assignee may close an accepted task
    /// without recording intermediate states); backward moves and
    /// self-transitions are not. Returning to `Pending` is the release
    /// transition and is validated separately.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        match self {
            Self::Pending => matches!(to, Self::Assigned),
            Self::Assigned => matches!(to, Self::Accepted | Self::InProgress | Self::Done),
            Self::Accepted => matches!(to, Self::InProgress | Self::Done),
            Self::InProgress => matches!(to, Self::Done),
            Self::Done => false,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "assigned" => Ok(Self::Assigned),
            "accepted" => Ok(Self::Accepted),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Routine work.
    Low,
    /// Default priority.
    Medium,
    /// Urgent work.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Snapshot of the team owning a task and the leader gating its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    team_id: TeamId,
    leader: UserId,
}

impl TeamRef {
    /// Creates a team reference.
    #[must_use]
    pub const fn new(team_id: TeamId, leader: UserId) -> Self {
        Self { team_id, leader }
    }

    /// Returns the team identifier.
    #[must_use]
    pub const fn team_id(&self) -> TeamId {
        self.team_id
    }

    /// Returns the team leader's user identifier.
    #[must_use]
    pub const fn leader(&self) -> UserId {
        self.leader
    }
}

/// Task aggregate root.
///
/// Invariants held by construction and transitions:
///
/// - a task in `Assigned` or any later status always has an assignee;
/// - progress is only recorded once the status has left `Pending`;
/// - `Done` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    status: TaskStatus,
    priority: Priority,
    progress: Progress,
    deadline: Option<DateTime<Utc>>,
    assigned_to: Option<UserId>,
    creator: UserId,
    project: Option<ProjectId>,
    team: Option<TeamRef>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted progress.
    pub progress: Progress,
    /// Persisted deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted creator.
    pub creator: UserId,
    /// Persisted project reference, if any.
    pub project: Option<ProjectId>,
    /// Persisted team snapshot, if any.
    pub team: Option<TeamRef>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new pending task.
    #[must_use]
    pub fn new(title: TaskTitle, creator: UserId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title,
            status: TaskStatus::Pending,
            priority: Priority::default(),
            progress: Progress::zero(),
            deadline: None,
            assigned_to: None,
            creator,
            project: None,
            team: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Places the task in a project.
    #[must_use]
    pub const fn with_project(mut self, project: ProjectId) -> Self {
        self.project = Some(project);
        self
    }

    /// Attaches the owning team snapshot.
    #[must_use]
    pub const fn with_team(mut self, team: TeamRef) -> Self {
        self.team = Some(team);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            status: data.status,
            priority: data.priority,
            progress: data.progress,
            deadline: data.deadline,
            assigned_to: data.assigned_to,
            creator: data.creator,
            project: data.project,
            team: data.team,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the recorded progress.
    #[must_use]
    pub const fn progress(&self) -> Progress {
        self.progress
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creator.
    #[must_use]
    pub const fn creator(&self) -> UserId {
        self.creator
    }

    /// Returns the project reference, if any.
    #[must_use]
    pub const fn project(&self) -> Option<ProjectId> {
        self.project
    }

    /// Returns the owning team snapshot, if any.
    #[must_use]
    pub const fn team(&self) -> Option<&TeamRef> {
        self.team.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Hands the task to an assignee with a deadline and priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] unless the task is
    /// currently `Pending`.
    pub fn assign(
        &mut self,
        assignee: UserId,
        deadline: Option<DateTime<Utc>>,
        priority: Priority,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_transition(TaskStatus::Assigned)?;
        self.assigned_to = Some(assignee);
        self.deadline = deadline;
        self.priority = priority;
        self.status = TaskStatus::Assigned;
        self.touch(clock);
        Ok(())
    }

    /// Records the assignee's acceptance.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] unless the task is
    /// currently `Assigned`; a second acceptance is rejected the same way.
    pub fn accept(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Accepted, clock)
    }

    /// Records a progress value.
    ///
    /// Progress and status are independent: reaching 100 does not complete
    /// the task. Repeated identical values are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ProgressBeforeAssignment`] while the task is
    /// still `Pending`.
    pub fn set_progress(
        &mut self,
        progress: Progress,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if self.status == TaskStatus::Pending {
            return Err(TaskDomainError::ProgressBeforeAssignment { task_id: self.id });
        }
        self.progress = progress;
        self.touch(clock);
        Ok(())
    }

    /// Applies a validated status change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the matrix
    /// rejects the move, or [`TaskDomainError::MissingAssignee`] when the
    /// target status requires an assignee the task does not have.
    pub fn transition_to(
        &mut self,
        to: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.check_transition(to)?;
        if self.assigned_to.is_none() && to != TaskStatus::Pending {
            return Err(TaskDomainError::MissingAssignee {
                task_id: self.id,
                to,
            });
        }
        self.status = to;
        self.touch(clock);
        Ok(())
    }

    /// Releases the task back to `Pending`, clearing its assignee.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// already `Done`; completed work is never resurrected.
    pub fn release(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.status.is_terminal() {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: TaskStatus::Pending,
            });
        }
        self.assigned_to = None;
        self.status = TaskStatus::Pending;
        self.touch(clock);
        Ok(())
    }

    /// Validates a status change against the matrix without applying it.
    const fn check_transition(&self, to: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to,
            })
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
