//! Service layer for task lifecycle transitions.
//!
//! Every mutating operation follows the same shape: load current state,
//! authorize the actor against the policy, apply the domain transition, and
//! persist with an optimistic status guard. Notifications are dispatched
//! after the persisted mutation and never roll it back.

use crate::access::{AccessError, Action, Actor, authorize};
use crate::error::{Classify, ErrorKind};
use crate::identity::domain::UserId;
use crate::identity::ports::{UserRepository, UserRepositoryError};
use crate::notification::domain::NotificationKind;
use crate::notification::ports::{NotificationRepository, RealtimeChannel};
use crate::notification::services::{DispatchReceipt, DispatchRequest, NotificationDispatcher};
use crate::task::{
    domain::{
        ParsePriorityError, ParseTaskStatusError, Priority, Progress, ProjectId, Task,
        TaskDomainError, TaskId, TaskStatus, TaskTitle, TeamRef,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a pending task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    project: Option<ProjectId>,
    team: Option<TeamRef>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            project: None,
            team: None,
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
}

/// Request payload for assigning a pending task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignTaskRequest {
    task_id: TaskId,
    assignee: UserId,
    deadline: Option<DateTime<Utc>>,
    priority: Priority,
}

impl AssignTaskRequest {
    /// Creates a request with required assignment fields.
    #[must_use]
    pub const fn new(task_id: TaskId, assignee: UserId) -> Self {
        Self {
            task_id,
            assignee,
            deadline: None,
            priority: Priority::Medium,
        }
    }

    /// Sets the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// Result of dispatching the notification that follows a transition.
///
/// The transition itself has already been persisted by the time this is
/// produced; a failed dispatch is a partial success, not a rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// The notification row was persisted; the receipt reports the live push.
    Delivered(DispatchReceipt),
    /// Persisting the notification failed after the task mutation held.
    Failed,
}

/// Outcome of a task transition together with its notification side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// The task as persisted after the transition.
    pub task: Task,
    /// What became of the follow-up notification.
    pub notification: NotificationOutcome,
}

/// Per-task failure recorded by the cleanup batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupFailure {
    /// Task that could not be released.
    pub task_id: TaskId,
    /// Human-readable failure description.
    pub reason: String,
}

/// Outcome of the cleanup batch.
///
/// One bad row never aborts the batch: failures are accumulated next to the
/// identifiers that were successfully reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Tasks released back to `Pending`.
    pub reset: Vec<TaskId>,
    /// Tasks the batch could not release.
    pub failures: Vec<CleanupFailure>,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The policy denied the actor.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// Domain validation or a state-machine guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The status string could not be parsed.
    #[error(transparent)]
    ParseStatus(#[from] ParseTaskStatusError),
    /// The priority string could not be parsed.
    #[error(transparent)]
    ParsePriority(#[from] ParsePriorityError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The requested assignee does not exist.
    #[error("assignee not found: {0}")]
    AssigneeNotFound(UserId),
    /// User repository operation failed.
    #[error(transparent)]
    UserStore(#[from] UserRepositoryError),
}

impl Classify for TaskLifecycleError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Access(err) => err.kind(),
            Self::Domain(err) => err.kind(),
            Self::ParseStatus(err) => err.kind(),
            Self::ParsePriority(err) => err.kind(),
            Self::TaskNotFound(_) | Self::AssigneeNotFound(_) => ErrorKind::NotFound,
            Self::Repository(err) => match err {
                TaskRepositoryError::NotFound(_) => ErrorKind::NotFound,
                TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::StaleStatus { .. } => {
                    ErrorKind::Conflict
                }
                TaskRepositoryError::Persistence(_) => ErrorKind::Internal,
            },
            Self::UserStore(err) => match err {
                UserRepositoryError::NotFound(_) => ErrorKind::NotFound,
                UserRepositoryError::DuplicateUser(_)
                | UserRepositoryError::DuplicateExternalIdentity(_) => ErrorKind::Conflict,
                UserRepositoryError::Persistence(_) => ErrorKind::Internal,
            },
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<T, U, N, P, C>
where
    T: TaskRepository,
    U: UserRepository,
    N: NotificationRepository,
    P: RealtimeChannel,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    dispatcher: NotificationDispatcher<N, P, C>,
    clock: Arc<C>,
}

impl<T, U, N, P, C> TaskLifecycleService<T, U, N, P, C>
where
    T: TaskRepository,
    U: UserRepository,
    N: NotificationRepository,
    P: RealtimeChannel,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        tasks: Arc<T>,
        users: Arc<U>,
        dispatcher: NotificationDispatcher<N, P, C>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            users,
            dispatcher,
            clock,
        }
    }

    /// Creates a new pending task with the actor as creator.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title fails validation or the
    /// repository rejects persistence.
    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            title,
            project,
            team,
        } = request;

        let title = TaskTitle::new(title)?;
        let mut task = Task::new(title, actor.id(), &*self.clock);
        if let Some(project) = project {
            task = task.with_project(project);
        }
        if let Some(team) = team {
            task = task.with_team(team);
        }
        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Assigns a pending task to an assignee with deadline and priority.
    ///
    /// Dispatches a [`NotificationKind::TaskAssigned`] notification to the
    /// assignee after the transition is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the actor is not a team leader,
    /// the task or assignee does not exist, or the task is not `Pending`.
    pub async fn assign(
        &self,
        actor: &Actor,
        request: AssignTaskRequest,
    ) -> TaskLifecycleResult<TransitionOutcome> {
        let AssignTaskRequest {
            task_id,
            assignee,
            deadline,
            priority,
        } = request;

        authorize(actor, &Action::AssignTask)?;
        let mut task = self.load(task_id).await?;
        if !self.users.exists(assignee).await? {
            return Err(TaskLifecycleError::AssigneeNotFound(assignee));
        }

        let expected = task.status();
        task.assign(assignee, deadline, priority, &*self.clock)?;
        self.tasks.update(&task, expected).await?;

        let notice = DispatchRequest::new(
            NotificationKind::TaskAssigned,
            assignee,
            "Task assigned",
            format!("You have been assigned '{}'", task.title()),
        )
        .with_link(task_link(task.id()));
        let notification = self.dispatch_after_commit(&task, notice).await;

        Ok(TransitionOutcome { task, notification })
    }

    /// Records the assignee's acceptance of a task.
    ///
    /// Dispatches a [`NotificationKind::TaskAccepted`] notification to the
    /// task's creator on the creator's channel after the transition is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task does not exist, the actor
    /// is not its assignee, or the task is not `Assigned` (a second accept is
    /// a conflict).
    pub async fn accept(
        &self,
        actor: &Actor,
        task_id: TaskId,
    ) -> TaskLifecycleResult<TransitionOutcome> {
        let mut task = self.load(task_id).await?;
        authorize(
            actor,
            &Action::AcceptTask {
                assigned_to: task.assigned_to(),
            },
        )?;

        let expected = task.status();
        task.accept(&*self.clock)?;
        self.tasks.update(&task, expected).await?;

        let notice = DispatchRequest::new(
            NotificationKind::TaskAccepted,
            task.creator(),
            "Task accepted",
            format!("'{}' was accepted by its assignee", task.title()),
        )
        .with_link(task_link(task.id()));
        let notification = self.dispatch_after_commit(&task, notice).await;

        Ok(TransitionOutcome { task, notification })
    }

    /// Records a progress value on behalf of the task's team leader.
    ///
    /// Progress and status stay independent: no value triggers a status
    /// change, and repeated identical values are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the value is outside `0..=100`,
    /// the task does not exist, or the actor does not lead the task's team.
    pub async fn set_progress(
        &self,
        actor: &Actor,
        task_id: TaskId,
        value: i64,
    ) -> TaskLifecycleResult<Task> {
        let progress = Progress::new(value)?;
        let mut task = self.load(task_id).await?;
        authorize(
            actor,
            &Action::UpdateProgress {
                team_leader: task.team().map(TeamRef::leader),
            },
        )?;

        let expected = task.status();
        task.set_progress(progress, &*self.clock)?;
        self.tasks.update(&task, expected).await?;
        Ok(task)
    }

    /// Applies a status change requested by the task's assignee.
    ///
    /// The raw status string is normalized and validated before any
    /// authorization or storage work. Dispatches a
    /// [`NotificationKind::StatusChanged`] notification to the task's creator
    /// after the transition is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the status string is unknown, the
    /// task does not exist, the actor is not its assignee, or the transition
    /// matrix rejects the move.
    pub async fn set_status(
        &self,
        actor: &Actor,
        task_id: TaskId,
        status_input: &str,
    ) -> TaskLifecycleResult<TransitionOutcome> {
        let status = TaskStatus::try_from(status_input)?;
        let mut task = self.load(task_id).await?;
        authorize(
            actor,
            &Action::UpdateStatus {
                assigned_to: task.assigned_to(),
            },
        )?;

        let expected = task.status();
        task.transition_to(status, &*self.clock)?;
        self.tasks.update(&task, expected).await?;

        let notice = DispatchRequest::new(
            NotificationKind::StatusChanged,
            task.creator(),
            "Task status updated",
            format!("'{}' moved to {}", task.title(), status),
        )
        .with_link(task_link(task.id()));
        let notification = self.dispatch_after_commit(&task, notice).await;

        Ok(TransitionOutcome { task, notification })
    }

    /// Releases every assigned task whose assignee no longer exists.
    ///
    /// Manager-only batch. Rows are processed independently: a failure on one
    /// task is recorded and the batch continues. Completed tasks are left
    /// untouched; `Done` is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the actor is not a manager or the
    /// assigned-task scan itself fails.
    pub async fn cleanup(&self, actor: &Actor) -> TaskLifecycleResult<CleanupReport> {
        authorize(actor, &Action::CleanupTasks)?;

        let mut report = CleanupReport::default();
        for mut task in self.tasks.list_assigned().await? {
            let Some(assignee) = task.assigned_to() else {
                continue;
            };
            if task.status().is_terminal() {
                continue;
            }

            match self.users.exists(assignee).await {
                Ok(true) => {}
                Ok(false) => match self.release_task(&mut task).await {
                    Ok(()) => report.reset.push(task.id()),
                    Err(err) => {
                        tracing::warn!(task = %task.id(), error = %err, "cleanup could not release task");
                        report.failures.push(CleanupFailure {
                            task_id: task.id(),
                            reason: err.to_string(),
                        });
                    }
                },
                Err(err) => {
                    tracing::warn!(task = %task.id(), error = %err, "cleanup could not check assignee");
                    report.failures.push(CleanupFailure {
                        task_id: task.id(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            reset = report.reset.len(),
            failed = report.failures.len(),
            "task cleanup batch finished"
        );
        Ok(report)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    /// Returns the tasks assigned to the given user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn list_for_assignee(&self, assignee: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_for_assignee(assignee).await?)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn release_task(&self, task: &mut Task) -> TaskLifecycleResult<()> {
        let expected = task.status();
        task.release(&*self.clock)?;
        self.tasks.update(task, expected).await?;
        Ok(())
    }

    /// Dispatches the notification that follows a persisted transition.
    ///
    /// The transition has already committed; a dispatch failure is logged and
    /// reported as a partial success, never propagated.
    async fn dispatch_after_commit(
        &self,
        task: &Task,
        request: DispatchRequest,
    ) -> NotificationOutcome {
        match self.dispatcher.dispatch(request).await {
            Ok(receipt) => NotificationOutcome::Delivered(receipt),
            Err(err) => {
                tracing::warn!(
                    task = %task.id(),
                    error = %err,
                    "task transition persisted but notification dispatch failed"
                );
                NotificationOutcome::Failed
            }
        }
    }
}

/// Returns the in-app link for a task.
fn task_link(task_id: TaskId) -> String {
    format!("/tasks/{task_id}")
}
