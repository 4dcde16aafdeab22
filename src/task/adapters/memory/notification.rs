//! Recording notification dispatcher.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::task::ports::{
    Notification, NotificationDispatcher, NotificationError, NotificationReceipt,
    NotificationResult,
};

/// Dispatcher that keeps every notification it receives in memory.
///
/// It can be switched into a rejecting mode to exercise partial-failure
/// handling; rejected notifications are still recorded as attempts.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotificationDispatcher {
    state: Arc<Mutex<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<Notification>,
    rejection: Option<(u16, String)>,
}

impl RecordingNotificationDispatcher {
    /// Creates a dispatcher that accepts every notification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher that rejects every notification.
    #[must_use]
    pub fn rejecting(code: u16, message: impl Into<String>) -> Self {
        let dispatcher = Self::new();
        dispatcher.reject_with(code, message);
        dispatcher
    }

    /// Switches the dispatcher into rejecting mode.
    pub fn reject_with(&self, code: u16, message: impl Into<String>) {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.rejection = Some((code, message.into()));
    }

    /// Returns every notification received so far, in arrival order.
    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .sent
            .clone()
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingNotificationDispatcher {
    async fn create_notification(
        &self,
        notification: &Notification,
    ) -> NotificationResult<NotificationReceipt> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.sent.push(notification.clone());
        match &state.rejection {
            Some((code, message)) => Err(NotificationError::Rejected {
                code: *code,
                message: message.clone(),
            }),
            None => Ok(NotificationReceipt {
                code: 201,
                message: "Notification created".to_owned(),
            }),
        }
    }
}
