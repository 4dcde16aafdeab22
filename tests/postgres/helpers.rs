//! Shared fixtures for `PostgreSQL` task store integration tests.

pub use super::cluster::{BoxError, PostgresCluster, TemporaryDatabase, shared_cluster};
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;
use taskboard::task::{
    adapters::{
        memory::RecordingNotificationDispatcher,
        postgres::{DATABASE_URL_ENV, POOL_SIZE_ENV, PostgresPoolConfig, PostgresTaskRepository},
    },
    domain::{DueDate, ProjectId, TaskDescription, TaskDraft, TaskStatus, UserId},
    services::{CreateTaskRequest, TaskService},
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Schema applied to the template database.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2026-01-15-000000_create_tasks/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "taskboard_test_template";

/// Service type used by the `PostgreSQL` integration tests.
pub type PgTaskService =
    TaskService<PostgresTaskRepository, RecordingNotificationDispatcher, DefaultClock>;

/// Service and repository over a private database cloned from the template.
///
/// Field order matters: the pool must close before the database is dropped.
pub struct TaskStore {
    pub service: PgTaskService,
    pub repository: Arc<PostgresTaskRepository>,
    pub dispatcher: RecordingNotificationDispatcher,
    pub runtime: Runtime,
    pub database: TemporaryDatabase,
}

impl TaskStore {
    /// Inserts a project row and returns its id.
    pub fn seed_project(&self, name: &str) -> Result<ProjectId, BoxError> {
        let id = ProjectId::new();
        self.insert_named("projects", id.into_inner(), name)?;
        Ok(id)
    }

    /// Inserts a user row and returns its id.
    pub fn seed_user(&self, name: &str) -> Result<UserId, BoxError> {
        let id = UserId::new();
        self.insert_named("users", id.into_inner(), name)?;
        Ok(id)
    }

    fn insert_named(&self, table: &str, id: Uuid, name: &str) -> Result<(), BoxError> {
        let mut conn = PgConnection::establish(self.database.url())
            .map_err(|err| Box::new(err) as BoxError)?;
        diesel::sql_query(format!("INSERT INTO {table} (id, name) VALUES ($1, $2)"))
            .bind::<diesel::sql_types::Uuid, _>(id)
            .bind::<diesel::sql_types::Text, _>(name)
            .execute(&mut conn)
            .map_err(|err| Box::new(err) as BoxError)?;
        Ok(())
    }
}

/// Builds a create request for `project_id` due at the end of 2026.
pub fn request(description: &str, project_id: ProjectId) -> CreateTaskRequest {
    CreateTaskRequest::new(
        description,
        "in-progress",
        "2026-12-31T09:00:00Z",
        project_id.to_string(),
    )
}

/// Builds a repository draft with an explicit creation time.
pub fn draft(
    description: &str,
    project_id: ProjectId,
    created_at: DateTime<Utc>,
) -> Result<TaskDraft, BoxError> {
    Ok(TaskDraft {
        description: TaskDescription::new(description)?,
        status: TaskStatus::InProgress,
        due_date: DueDate::parse("2026-12-31")?,
        project_id,
        assigned_to_id: None,
        created_at,
    })
}

/// Ensures the template database exists with the schema applied.
pub fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    cluster.ensure_template_exists(TEMPLATE_DB, |url| {
        let mut conn = PgConnection::establish(url).map_err(|err| Box::new(err) as BoxError)?;
        conn.batch_execute(CREATE_TASKS_SQL)
            .map_err(|err| Box::new(err) as BoxError)
    })
}

/// Provides a [`TaskStore`], or `None` when no cluster is available.
#[fixture]
pub fn task_store() -> Result<Option<TaskStore>, BoxError> {
    let Some(cluster) = shared_cluster() else {
        return Ok(None);
    };
    ensure_template(cluster)?;
    let database = cluster
        .temporary_database_from_template(&format!("tasks_{}", Uuid::new_v4()), TEMPLATE_DB)?;

    let url = database.url().to_owned();
    let config = PostgresPoolConfig::from_lookup(|name| match name {
        DATABASE_URL_ENV => Some(url.clone()),
        POOL_SIZE_ENV => Some("4".to_owned()),
        _ => None,
    })?;
    let repository = Arc::new(PostgresTaskRepository::new(config.build_pool()?));
    let dispatcher = RecordingNotificationDispatcher::new();
    let service = TaskService::new(
        Arc::clone(&repository),
        Arc::new(dispatcher.clone()),
        Arc::new(DefaultClock),
    );
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| Box::new(err) as BoxError)?;

    Ok(Some(TaskStore {
        service,
        repository,
        dispatcher,
        runtime,
        database,
    }))
}
