//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The block marker is empty or contains non-alphanumeric characters.
    #[error("invalid block marker '{0}', expected ASCII letters and digits")]
    InvalidBlockMarker(String),

    /// The remote task identifier is empty after trimming.
    #[error("remote task identifier must not be empty")]
    EmptyRemoteTaskId,

    /// The task list identifier is empty after trimming.
    #[error("task list identifier must not be empty")]
    EmptyTaskListId,

    /// A remote identifier was attached to a record without a block marker.
    #[error("remote task {0} cannot be attached to a task line without a block marker")]
    RemoteIdWithoutMarker(String),
}

/// Error returned while parsing task statuses from remote payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task importance from remote payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task importance: {0}")]
pub struct ParseImportanceError(pub String);
