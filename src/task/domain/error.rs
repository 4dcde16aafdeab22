//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The status value is not one of the recognised task statuses.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The due date could not be parsed into an instant.
    #[error("invalid due date '{0}', expected an RFC 3339 timestamp or YYYY-MM-DD date")]
    InvalidDueDate(String),

    /// An identifier supplied by the caller is not a valid UUID.
    #[error("invalid {kind} identifier '{value}'")]
    InvalidIdentifier {
        /// Which identifier failed to parse.
        kind: &'static str,
        /// The raw value supplied by the caller.
        value: String,
    },
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status '{0}', expected 'in-progress' or 'completed'")]
pub struct ParseTaskStatusError(pub String);
