//! Entities referenced by tasks and the joined read model.
//!
//! Projects and users are owned by other services; the task core only needs
//! their identifiers and a display name for joined reads.

use super::{ProjectId, Task, UserId};
use serde::{Deserialize, Serialize};

/// Project a task belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project identifier.
    pub id: ProjectId,
    /// Display name.
    pub name: String,
}

impl Project {
    /// Creates a project reference.
    #[must_use]
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// User a task may be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
}

impl User {
    /// Creates a user reference.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Task joined with its project and assignee.
///
/// Either side of the join is `None` when the referenced row is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// The task itself.
    pub task: Task,
    /// Owning project.
    pub project: Option<Project>,
    /// Assigned user.
    pub assigned_to: Option<User>,
}

impl TaskDetails {
    /// Wraps a task without resolving its project or assignee.
    #[must_use]
    pub const fn unjoined(task: Task) -> Self {
        Self {
            task,
            project: None,
            assigned_to: None,
        }
    }
}
