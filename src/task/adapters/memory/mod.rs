//! In-memory adapters for task persistence and notification dispatch.

mod notification;
mod task;

pub use notification::RecordingNotificationDispatcher;
pub use task::InMemoryTaskRepository;
