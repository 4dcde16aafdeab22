//! Task service configuration.

use crate::task::{domain::Task, ports::NotificationError};
use minijinja::{Environment, context};
use serde::{Deserialize, Serialize};

/// Mutation that may trigger a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationEvent {
    /// `update_task` committed.
    Updated,
    /// `patch_task` committed.
    Patched,
    /// `update_task_status` committed.
    StatusChanged,
    /// `delete_task_from_project` committed.
    Deleted,
}

/// Which mutations notify the assignee, and the message templates used.
///
/// Templates are rendered with `minijinja`; `description` and `status` are
/// available in the context.
///
/// # Examples
///
/// ```
/// use taskboard::task::services::NotificationPolicy;
///
/// let policy = NotificationPolicy::default();
/// assert!(policy.notify_on_update);
/// assert!(!policy.notify_on_patch);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPolicy {
    /// Notify after `update_task`.
    pub notify_on_update: bool,
    /// Notify after `patch_task`.
    pub notify_on_patch: bool,
    /// Notify after `update_task_status`.
    pub notify_on_status_change: bool,
    /// Notify after `delete_task_from_project`.
    pub notify_on_delete: bool,
    /// Message sent after an update or patch.
    pub updated_template: String,
    /// Message sent after a status change.
    pub status_changed_template: String,
    /// Message sent after a deletion.
    pub deleted_template: String,
}

impl Default for NotificationPolicy {
    fn default() -> Self {
        Self {
            notify_on_update: true,
            notify_on_patch: false,
            notify_on_status_change: false,
            notify_on_delete: true,
            updated_template: "'{{ description }}' updated!".to_owned(),
            status_changed_template: "'{{ description }}' marked {{ status }}!".to_owned(),
            deleted_template: "'{{ description }}' deleted!".to_owned(),
        }
    }
}

impl NotificationPolicy {
    /// Policy that never notifies.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            notify_on_update: false,
            notify_on_delete: false,
            ..Self::default()
        }
    }

    /// Policy that notifies after every mutation.
    #[must_use]
    pub fn notify_all() -> Self {
        Self {
            notify_on_patch: true,
            notify_on_status_change: true,
            ..Self::default()
        }
    }

    /// Returns whether the event notifies the assignee.
    #[must_use]
    pub const fn is_enabled(&self, event: NotificationEvent) -> bool {
        match event {
            NotificationEvent::Updated => self.notify_on_update,
            NotificationEvent::Patched => self.notify_on_patch,
            NotificationEvent::StatusChanged => self.notify_on_status_change,
            NotificationEvent::Deleted => self.notify_on_delete,
        }
    }

    /// Renders the message for an event.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Template`] when the template is invalid.
    pub fn render(&self, event: NotificationEvent, task: &Task) -> Result<String, NotificationError> {
        let template = match event {
            NotificationEvent::Updated | NotificationEvent::Patched => &self.updated_template,
            NotificationEvent::StatusChanged => &self.status_changed_template,
            NotificationEvent::Deleted => &self.deleted_template,
        };
        Environment::new()
            .render_str(
                template,
                context! {
                    description => task.description().as_str(),
                    status => task.status().as_str(),
                },
            )
            .map_err(|err| NotificationError::Template(err.to_string()))
    }
}

/// Configuration for [`super::TaskService`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskServiceConfig {
    /// Notification policy.
    pub notifications: NotificationPolicy,
}

impl TaskServiceConfig {
    /// Configuration that never notifies.
    #[must_use]
    pub fn silent() -> Self {
        Self {
            notifications: NotificationPolicy::silent(),
        }
    }

    /// Configuration that notifies after every mutation.
    #[must_use]
    pub fn notify_all() -> Self {
        Self {
            notifications: NotificationPolicy::notify_all(),
        }
    }
}
