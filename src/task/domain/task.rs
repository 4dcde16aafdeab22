//! Task aggregate root and the write models used to create and change it.

use super::{DueDate, ProjectId, TaskDescription, TaskId, TaskStatus, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    description: TaskDescription,
    status: TaskStatus,
    due_date: DueDate,
    project_id: ProjectId,
    assigned_to_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted canonical description.
    pub description: TaskDescription,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date.
    pub due_date: DueDate,
    /// Owning project.
    pub project_id: ProjectId,
    /// Assigned user, if any.
    pub assigned_to_id: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Validated task awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Canonical description.
    pub description: TaskDescription,
    /// Initial status.
    pub status: TaskStatus,
    /// Normalised due date.
    pub due_date: DueDate,
    /// Owning project, checked for existence before the draft is built.
    pub project_id: ProjectId,
    /// Assigned user, if any.
    pub assigned_to_id: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Materialises a draft under the identifier chosen by the store.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Self {
        Self {
            id,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            project_id: draft.project_id,
            assigned_to_id: draft.assigned_to_id,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            project_id: data.project_id,
            assigned_to_id: data.assigned_to_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the canonical description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DueDate {
        self.due_date
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assigned_to_id(&self) -> Option<UserId> {
        self.assigned_to_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a set of field changes in place.
    ///
    /// The owning project is not part of [`TaskChanges`] and never changes.
    pub fn apply(&mut self, changes: &TaskChanges) {
        if let Some(description) = &changes.description {
            self.description = description.clone();
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(assigned_to_id) = changes.assigned_to_id {
            self.assigned_to_id = assigned_to_id;
        }
        self.updated_at = changes.updated_at;
    }
}

/// Validated partial update for a stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    /// Replacement description.
    pub description: Option<TaskDescription>,
    /// Replacement status.
    pub status: Option<TaskStatus>,
    /// Replacement due date.
    pub due_date: Option<DueDate>,
    /// Replacement assignee; `Some(None)` clears the assignment.
    pub assigned_to_id: Option<Option<UserId>>,
    /// Modification timestamp recorded with the change.
    pub updated_at: DateTime<Utc>,
}

impl TaskChanges {
    /// Creates an empty change set stamped with the current clock time.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        Self {
            description: None,
            status: None,
            due_date: None,
            assigned_to_id: None,
            updated_at: clock.utc(),
        }
    }

    /// Sets the replacement status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns whether any task field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assigned_to_id.is_none()
    }
}
