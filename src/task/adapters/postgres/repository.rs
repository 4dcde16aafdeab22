//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, ProjectRow, TaskChangeset, TaskRow, UserRow},
    pool::TaskPgPool,
    schema::{projects, tasks, users},
};
use crate::task::{
    domain::{
        DueDate, PersistedTaskData, Project, ProjectId, Task, TaskChanges, TaskDescription,
        TaskDetails, TaskDraft, TaskId, TaskStatus, User, UserId,
    },
    ports::{
        ProjectRepository, TaskFilter, TaskQuery, TaskRepository, TaskRepositoryError,
        TaskRepositoryResult, TaskSort,
    },
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Unique index enforcing case-insensitive description uniqueness.
pub(super) const DESCRIPTION_UNIQUE_INDEX: &str = "idx_tasks_description_unique";

/// `PostgreSQL`-backed task repository.
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
    async fn find_one(&self, filter: &TaskFilter) -> TaskRepositoryResult<Option<Task>> {
        let lookup = filter.clone();
        self.run_blocking(move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed::<Pg>();
            if let Some(id) = lookup.id {
                query = query.filter(tasks::id.eq(id.into_inner()));
            }
            if let Some(description) = &lookup.description {
                query = query.filter(tasks::description.eq(description.as_str().to_owned()));
            }
            if let Some(project_id) = lookup.project_id {
                query = query.filter(tasks::project_id.eq(project_id.into_inner()));
            }
            if let Some(user_id) = lookup.assigned_to_id {
                query = query.filter(tasks::assigned_to_id.eq(user_id.into_inner()));
            }
            let row = query
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn find_all(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<TaskDetails>> {
        let lookup = query.clone();
        self.run_blocking(move |connection| {
            let mut statement = tasks::table
                .left_join(projects::table)
                .left_join(users::table)
                .select((
                    TaskRow::as_select(),
                    Option::<ProjectRow>::as_select(),
                    Option::<UserRow>::as_select(),
                ))
                .into_boxed::<Pg>();
            let filter = &lookup.filter;
            if let Some(id) = filter.id {
                statement = statement.filter(tasks::id.eq(id.into_inner()));
            }
            if let Some(description) = &filter.description {
                statement =
                    statement.filter(tasks::description.eq(description.as_str().to_owned()));
            }
            if let Some(project_id) = filter.project_id {
                statement = statement.filter(tasks::project_id.eq(project_id.into_inner()));
            }
            if let Some(user_id) = filter.assigned_to_id {
                statement = statement.filter(tasks::assigned_to_id.eq(user_id.into_inner()));
            }
            statement = match lookup.sort {
                TaskSort::CreatedAtDesc => statement.order(tasks::created_at.desc()),
                TaskSort::CreatedAtAsc => statement.order(tasks::created_at.asc()),
            };

            let rows = statement
                .load::<(TaskRow, Option<ProjectRow>, Option<UserRow>)>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter()
                .map(|(task, project, user)| {
                    Ok(TaskDetails {
                        task: row_to_task(task)?,
                        project: project.map(row_to_project),
                        assigned_to: user.map(row_to_user),
                    })
                })
                .collect()
        })
        .await
    }

    async fn create(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        let task = Task::from_draft(TaskId::new(), draft.clone());
        let new_row = to_new_row(&task);

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(|err| map_write_error(err, &task))?;
            row_to_task(row)
        })
        .await
    }

    async fn update(
        &self,
        id: TaskId,
        changes: &TaskChanges,
    ) -> TaskRepositoryResult<Option<Task>> {
        let changeset = to_changeset(changes);
        let changed_description = changes.description.clone();

        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table.find(id.into_inner()))
                .set(&changeset)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(|err| map_update_error(err, changed_description.as_ref()))?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = diesel::delete(tasks::table.find(id.into_inner()))
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }
}

#[async_trait]
impl ProjectRepository for PostgresTaskRepository {
    async fn find_project(&self, id: ProjectId) -> TaskRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .find(id.into_inner())
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            Ok(row.map(row_to_project))
        })
        .await
    }
}

pub(super) fn map_write_error(err: DieselError, task: &Task) -> TaskRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_description_unique_violation(info.as_ref()) =>
        {
            TaskRepositoryError::DuplicateDescription(task.description().clone())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
            if info.column_name() == Some("project_id")
                || info
                    .constraint_name()
                    .is_some_and(|name| name.contains("project")) =>
        {
            TaskRepositoryError::MissingProject(task.project_id())
        }
        _ => TaskRepositoryError::persistence(err),
    }
}

pub(super) fn map_update_error(
    err: DieselError,
    changed_description: Option<&TaskDescription>,
) -> TaskRepositoryError {
    match (err, changed_description) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info), Some(description))
            if is_description_unique_violation(info.as_ref()) =>
        {
            TaskRepositoryError::DuplicateDescription(description.clone())
        }
        (other, _) => TaskRepositoryError::persistence(other),
    }
}

pub(super) fn is_description_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == DESCRIPTION_UNIQUE_INDEX)
}

pub(super) fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        description: task.description().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date().as_datetime(),
        project_id: task.project_id().into_inner(),
        assigned_to_id: task.assigned_to_id().map(UserId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

pub(super) fn to_changeset(changes: &TaskChanges) -> TaskChangeset {
    TaskChangeset {
        description: changes
            .description
            .as_ref()
            .map(|description| description.as_str().to_owned()),
        status: changes.status.map(|status| status.as_str().to_owned()),
        due_date: changes.due_date.map(DueDate::as_datetime),
        assigned_to_id: changes
            .assigned_to_id
            .map(|assignee| assignee.map(UserId::into_inner)),
        updated_at: changes.updated_at,
    }
}

pub(super) fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        description: persisted_description,
        status: persisted_status,
        due_date,
        project_id,
        assigned_to_id,
        created_at,
        updated_at,
    } = row;

    let description =
        TaskDescription::new(persisted_description).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        description,
        status,
        due_date: DueDate::from_datetime(due_date),
        project_id: ProjectId::from_uuid(project_id),
        assigned_to_id: assigned_to_id.map(UserId::from_uuid),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn row_to_project(row: ProjectRow) -> Project {
    Project::new(ProjectId::from_uuid(row.id), row.name)
}

fn row_to_user(row: UserRow) -> User {
    User::new(UserId::from_uuid(row.id), row.name)
}
