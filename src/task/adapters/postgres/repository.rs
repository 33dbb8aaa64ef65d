//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::identity::domain::UserId;
use crate::task::{
    domain::{
        PersistedTaskData, Priority, Progress, ProjectId, Task, TaskId, TaskStatus, TaskTitle,
        TeamId, TeamRef,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// Updates are guarded by the caller's expected status in the `WHERE` clause,
/// so a concurrently-applied transition makes the write a no-op that is then
/// reported as a stale-status conflict.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task, expected: TaskStatus) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_new_row(task);

        self.run_blocking(move |connection| {
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::status.eq(expected.as_str())),
            )
            .set((
                tasks::status.eq(row.status),
                tasks::priority.eq(row.priority),
                tasks::progress.eq(row.progress),
                tasks::deadline.eq(row.deadline),
                tasks::assigned_to.eq(row.assigned_to),
                tasks::updated_at.eq(row.updated_at),
            ))
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if affected == 0 {
                let exists = tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .count()
                    .get_result::<i64>(connection)
                    .map_err(TaskRepositoryError::persistence)?
                    > 0;
                if exists {
                    return Err(TaskRepositoryError::StaleStatus { task_id, expected });
                }
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_assigned(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.is_not_null())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_for_assignee(&self, assignee: UserId) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::assigned_to.eq(assignee.into_inner()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().as_str().to_owned(),
        progress: i32::from(task.progress().value()),
        deadline: task.deadline(),
        assigned_to: task.assigned_to().map(UserId::into_inner),
        creator: task.creator().into_inner(),
        project_id: task.project().map(ProjectId::into_inner),
        team_id: task.team().map(|team| team.team_id().into_inner()),
        team_leader: task.team().map(|team| team.leader().into_inner()),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let title = TaskTitle::new(row.title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(row.status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority =
        Priority::try_from(row.priority.as_str()).map_err(TaskRepositoryError::persistence)?;
    let progress =
        Progress::new(i64::from(row.progress)).map_err(TaskRepositoryError::persistence)?;
    let team = match (row.team_id, row.team_leader) {
        (Some(team_id), Some(leader)) => Some(TeamRef::new(
            TeamId::from_uuid(team_id),
            UserId::from_uuid(leader),
        )),
        _ => None,
    };

    let data = PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        title,
        status,
        priority,
        progress,
        deadline: row.deadline,
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        creator: UserId::from_uuid(row.creator),
        project: row.project_id.map(ProjectId::from_uuid),
        team,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Task::from_persisted(data))
}
