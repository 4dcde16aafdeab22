//! Notification port used to tell assignees about task changes.

use crate::task::domain::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification dispatch.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Message addressed to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Rendered message text.
    pub message: String,
    /// Receiving user.
    pub recipient: UserId,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(message: impl Into<String>, recipient: UserId) -> Self {
        Self {
            message: message.into(),
            recipient,
        }
    }
}

/// Acknowledgement returned by a dispatcher that accepted a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReceipt {
    /// Status code reported by the dispatcher.
    pub code: u16,
    /// Message reported by the dispatcher.
    pub message: String,
}

/// Delivery contract for task notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Rejected`] when the dispatcher answers
    /// with a non-success code, or [`NotificationError::Transport`] when it
    /// cannot be reached.
    async fn create_notification(
        &self,
        notification: &Notification,
    ) -> NotificationResult<NotificationReceipt>;
}

/// Errors raised while building or sending a notification.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The dispatcher answered with a non-success code.
    #[error("notification rejected with code {code}: {message}")]
    Rejected {
        /// Code reported by the dispatcher.
        code: u16,
        /// Message reported by the dispatcher.
        message: String,
    },

    /// The message template could not be rendered.
    #[error("notification template error: {0}")]
    Template(String),

    /// The dispatcher could not be reached.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Status code describing the failure.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::Rejected { code, .. } => *code,
            Self::Template(_) | Self::Transport(_) => 500,
        }
    }
}
