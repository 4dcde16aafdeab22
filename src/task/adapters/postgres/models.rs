//! Diesel row models for task persistence.

use super::schema::{projects, tasks, users};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Lowercased description.
    pub description: String,
    /// Status in storage form.
    pub status: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Assigned user.
    pub assigned_to_id: Option<uuid::Uuid>,
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
    /// Lowercased description.
    pub description: String,
    /// Status in storage form.
    pub status: String,
    /// Due date.
    pub due_date: DateTime<Utc>,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Assigned user.
    pub assigned_to_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Partial update for task records; `None` leaves a column untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: Option<String>,
    /// Replacement due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Replacement assignee; `Some(None)` writes `NULL`.
    pub assigned_to_id: Option<Option<uuid::Uuid>>,
    /// Modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for joined project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
}

/// Query result row for joined user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub name: String,
}
