//! Domain model for task lifecycle management.
//!
//! Tasks belong to a project, may be assigned to a user, and carry a
//! canonical description, a two-valued status and a normalised due date.
//! Infrastructure concerns stay outside of the domain boundary.

mod error;
mod ids;
mod references;
mod status;
mod task;
mod values;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{ProjectId, TaskId, UserId};
pub use references::{Project, TaskDetails, User};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskChanges, TaskDraft};
pub use values::{DueDate, TaskDescription};
