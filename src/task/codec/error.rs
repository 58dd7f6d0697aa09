//! Error types for parsing and rendering task lines.

use crate::task::{domain::TaskDomainError, ports::IdentityStoreError};
use thiserror::Error;

/// Errors returned while parsing a task line.
#[derive(Debug, Clone, Error)]
pub enum TaskParseError {
    /// Nothing is left of the line once every recognised marker is removed.
    #[error("task line has an empty title after removing markers")]
    EmptyTitle,

    /// The identity lookup capability failed.
    #[error(transparent)]
    IdentityLookup(#[from] IdentityStoreError),

    /// The parsed fields violate a task record invariant.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Errors returned while rendering a task record into text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskRenderError {
    /// The replacement line template failed to render.
    #[error("failed to render task line template: {reason}")]
    Template {
        /// Renderer diagnostic.
        reason: String,
    },

    /// The created-date format string produced no output.
    #[error("invalid created-date format '{0}'")]
    DateFormat(String),
}

/// Errors returned while building a task line codec from display options.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DisplayOptionsError {
    /// A grammar pattern derived from the options does not compile.
    #[error("invalid task line pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The replacement line template is not a valid template.
    #[error(transparent)]
    Template(#[from] TaskRenderError),

    /// The created-date format string contains unknown specifiers.
    #[error("invalid created-date format '{0}'")]
    InvalidDateFormat(String),

    /// The replacement line template never renders the task title.
    #[error("replacement line template '{0}' has no task placeholder")]
    MissingTaskPlaceholder(String),

    /// The host settings document is not valid JSON for display options.
    #[error("invalid display options document: {0}")]
    InvalidDocument(String),
}
