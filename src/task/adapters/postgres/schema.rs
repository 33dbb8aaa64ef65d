//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with lifecycle status and assignment state.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Task lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Task priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Completion percentage.
        progress -> Int4,
        /// Optional deadline.
        deadline -> Nullable<Timestamptz>,
        /// Optional assignee.
        assigned_to -> Nullable<Uuid>,
        /// Creator of the task.
        creator -> Uuid,
        /// Optional project reference.
        project_id -> Nullable<Uuid>,
        /// Optional owning team.
        team_id -> Nullable<Uuid>,
        /// Leader of the owning team, if any.
        team_leader -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
