//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod notification;
pub mod repository;

pub use notification::{
    Notification, NotificationDispatcher, NotificationError, NotificationReceipt,
    NotificationResult,
};
pub use repository::{
    ProjectRepository, TaskFilter, TaskQuery, TaskRepository, TaskRepositoryError,
    TaskRepositoryResult, TaskSort,
};

#[cfg(test)]
pub use notification::MockNotificationDispatcher;
