//! Application services for task lifecycle orchestration.

mod config;
mod envelope;
mod error;
mod lifecycle;

pub use config::{NotificationEvent, NotificationPolicy, TaskServiceConfig};
pub use envelope::{Envelope, ErrorDetails, NotificationReport, NotificationStatus};
pub use error::{ErrorKind, TaskServiceError, TaskServiceResult};
pub use lifecycle::{CreateTaskRequest, TaskService, UpdateTaskRequest};
