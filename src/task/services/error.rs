//! Service-level error taxonomy.

use crate::task::{
    domain::{TaskDescription, TaskDomainError},
    ports::TaskRepositoryError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced project or task does not exist.
    NotFound,
    /// The caller supplied a malformed or disallowed value.
    InvalidArgument,
    /// The change collides with existing data.
    Conflict,
    /// An unexpected failure in a collaborator.
    Internal,
}

impl ErrorKind {
    /// Status code reported for this kind.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::InvalidArgument => 400,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum TaskServiceError {
    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(String),

    /// The project has no tasks.
    #[error("no tasks found for project: {0}")]
    NoTasksForProject(String),

    /// Domain validation failed.
    #[error(transparent)]
    InvalidArgument(#[from] TaskDomainError),

    /// Another task already uses the description.
    #[error("a task with description '{0}' already exists")]
    Conflict(TaskDescription),

    /// A collaborator failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskServiceError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound(_) | Self::TaskNotFound(_) | Self::NoTasksForProject(_) => {
                ErrorKind::NotFound
            }
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Status code reported for this error.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.kind().code()
    }
}

impl From<TaskRepositoryError> for TaskServiceError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::DuplicateDescription(description) => Self::Conflict(description),
            TaskRepositoryError::MissingProject(project_id) => {
                Self::ProjectNotFound(project_id.to_string())
            }
            TaskRepositoryError::Persistence(_) => Self::Internal(err.to_string()),
        }
    }
}

/// Result type for task service internals.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;
