//! Repository ports for task persistence and project lookup.

use crate::task::domain::{
    Project, ProjectId, Task, TaskChanges, TaskDescription, TaskDetails, TaskDraft, TaskId, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Field-equality predicate over stored tasks.
///
/// Unset fields match every task; set fields must all match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Match on task identifier.
    pub id: Option<TaskId>,
    /// Match on canonical description.
    pub description: Option<TaskDescription>,
    /// Match on owning project.
    pub project_id: Option<ProjectId>,
    /// Match on assigned user.
    pub assigned_to_id: Option<UserId>,
}

impl TaskFilter {
    /// Filter matching every task.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching a single task identifier.
    #[must_use]
    pub fn by_id(id: TaskId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Filter matching a canonical description.
    #[must_use]
    pub fn by_description(description: TaskDescription) -> Self {
        Self {
            description: Some(description),
            ..Self::default()
        }
    }

    /// Filter matching tasks of one project.
    #[must_use]
    pub fn by_project(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    /// Filter matching tasks assigned to one user.
    #[must_use]
    pub fn by_assignee(user_id: UserId) -> Self {
        Self {
            assigned_to_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Returns whether the task satisfies every set predicate.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.id.is_none_or(|id| task.id() == id)
            && self
                .description
                .as_ref()
                .is_none_or(|description| task.description() == description)
            && self
                .project_id
                .is_none_or(|project_id| task.project_id() == project_id)
            && self
                .assigned_to_id
                .is_none_or(|user_id| task.assigned_to_id() == Some(user_id))
    }
}

/// Listing order for [`TaskRepository::find_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskSort {
    /// Newest tasks first.
    #[default]
    CreatedAtDesc,
    /// Oldest tasks first.
    CreatedAtAsc,
}

/// Listing query: filter plus sort order. Joins are always resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Predicate applied before sorting.
    pub filter: TaskFilter,
    /// Result ordering.
    pub sort: TaskSort,
}

impl TaskQuery {
    /// Creates a query with the default newest-first ordering.
    #[must_use]
    pub const fn new(filter: TaskFilter) -> Self {
        Self {
            filter,
            sort: TaskSort::CreatedAtDesc,
        }
    }

    /// Sets the result ordering.
    #[must_use]
    pub const fn sorted(mut self, sort: TaskSort) -> Self {
        self.sort = sort;
        self
    }
}

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds the first task matching the filter.
    ///
    /// Returns `None` when no task matches.
    async fn find_one(&self, filter: &TaskFilter) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task matching the query, joined with its project and
    /// assignee.
    ///
    /// An empty `Vec` means nothing matched.
    async fn find_all(&self, query: &TaskQuery) -> TaskRepositoryResult<Vec<TaskDetails>>;

    /// Stores a new task and returns it with its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateDescription`] when another
    /// task already uses the description, and
    /// [`TaskRepositoryError::MissingProject`] when the store rejects the
    /// project reference.
    async fn create(&self, draft: &TaskDraft) -> TaskRepositoryResult<Task>;

    /// Applies changes to a stored task and returns the updated task.
    ///
    /// Returns `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateDescription`] when a changed
    /// description collides with another task.
    async fn update(&self, id: TaskId, changes: &TaskChanges)
    -> TaskRepositoryResult<Option<Task>>;

    /// Removes a task and returns the removed record.
    ///
    /// Returns `None` when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
}

/// Read access to projects owned by another service.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_project(&self, id: ProjectId) -> TaskRepositoryResult<Option<Project>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// Another task already uses the description.
    #[error("duplicate task description: {0}")]
    DuplicateDescription(TaskDescription),

    /// The referenced project does not exist in the store.
    #[error("project not found: {0}")]
    MissingProject(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
