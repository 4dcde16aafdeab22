//! Uniform result envelope returned by every task service operation.

use super::{ErrorKind, TaskServiceError};
use crate::task::{
    domain::UserId,
    ports::{NotificationError, NotificationReceipt},
};
use serde::{Deserialize, Serialize};

/// Structured error carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error classification.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub reason: String,
}

/// Whether a notification reached the dispatcher successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    /// The dispatcher accepted the notification.
    Delivered,
    /// Rendering or dispatch failed.
    Failed,
}

/// Outcome of the notification attempted after a mutation.
///
/// This never changes the primary envelope code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationReport {
    /// Delivery status.
    pub status: NotificationStatus,
    /// Intended recipient.
    pub recipient: UserId,
    /// Code reported by the dispatcher, or 500 for local failures.
    pub code: u16,
    /// Message reported by the dispatcher or the failure cause.
    pub message: String,
}

impl NotificationReport {
    /// Builds a report from a dispatcher receipt.
    ///
    /// Receipts with a code outside `2xx` are reported as failures.
    #[must_use]
    pub fn from_receipt(recipient: UserId, receipt: NotificationReceipt) -> Self {
        let status = if (200..300).contains(&receipt.code) {
            NotificationStatus::Delivered
        } else {
            NotificationStatus::Failed
        };
        Self {
            status,
            recipient,
            code: receipt.code,
            message: receipt.message,
        }
    }

    /// Builds a failure report.
    #[must_use]
    pub fn from_error(recipient: UserId, err: &NotificationError) -> Self {
        let message = match err {
            NotificationError::Rejected { message, .. } => message.clone(),
            NotificationError::Template(_) | NotificationError::Transport(_) => err.to_string(),
        };
        Self {
            status: NotificationStatus::Failed,
            recipient,
            code: err.code(),
            message,
        }
    }

    /// Returns whether the notification was delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.status == NotificationStatus::Delivered
    }
}

/// Result envelope: `{code, message, details}` plus an optional structured
/// error and notification report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Status code of the primary operation.
    pub code: u16,
    /// Human-readable summary.
    pub message: String,
    /// Payload of a successful operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
    /// Cause of a failed operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Notification side effect, when one was attempted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationReport>,
}

impl<T> Envelope<T> {
    /// Creates a successful envelope.
    #[must_use]
    pub fn success(code: u16, message: impl Into<String>, details: T) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
            error: None,
            notification: None,
        }
    }

    /// Creates a failed envelope from a service error.
    #[must_use]
    pub fn failure(err: &TaskServiceError) -> Self {
        let reason = err.to_string();
        Self {
            code: err.code(),
            message: reason.clone(),
            details: None,
            error: Some(ErrorDetails {
                kind: err.kind(),
                reason,
            }),
            notification: None,
        }
    }

    /// Attaches a notification report.
    #[must_use]
    pub fn with_notification(mut self, report: Option<NotificationReport>) -> Self {
        self.notification = report;
        self
    }

    /// Returns whether the primary operation succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the error kind of a failed envelope.
    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|error| error.kind)
    }
}
