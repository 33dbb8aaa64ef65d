//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Completion percentage.
    pub progress: i32,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Optional assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creator of the task.
    pub creator: uuid::Uuid,
    /// Optional project reference.
    pub project_id: Option<uuid::Uuid>,
    /// Optional owning team.
    pub team_id: Option<uuid::Uuid>,
    /// Leader of the owning team, if any.
    pub team_leader: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Lifecycle status.
    pub status: String,
    /// Priority.
    pub priority: String,
    /// Completion percentage.
    pub progress: i32,
    /// Optional deadline.
    pub deadline: Option<DateTime<Utc>>,
    /// Optional assignee.
    pub assigned_to: Option<uuid::Uuid>,
    /// Creator of the task.
    pub creator: uuid::Uuid,
    /// Optional project reference.
    pub project_id: Option<uuid::Uuid>,
    /// Optional owning team.
    pub team_id: Option<uuid::Uuid>,
    /// Leader of the owning team, if any.
    pub team_leader: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
