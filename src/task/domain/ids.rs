//! Identifier types linking task lines to remote task records.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix carried by every block marker minted by Tasklink.
pub const BLOCK_MARKER_PREFIX: &str = "MSTD";

/// Opaque token embedded at the end of a task line as `^token`.
///
/// The marker is the only durable link between a line of text and its remote
/// task record. Markers are compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockMarker(String);

impl BlockMarker {
    /// Creates a validated block marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidBlockMarker`] when the value is empty
    /// or contains anything other than ASCII letters and digits.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        if raw.is_empty() || !raw.chars().all(|character| character.is_ascii_alphanumeric()) {
            return Err(TaskDomainError::InvalidBlockMarker(raw));
        }
        Ok(Self(raw))
    }

    /// Builds a marker from a random salt and a store sequence number.
    ///
    /// The result is `MSTD` followed by the salt and the sequence
    /// zero-padded to five digits, for example `MSTDa8de00053`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidBlockMarker`] when the salt contains
    /// non-alphanumeric characters.
    pub fn mint(salt: &str, sequence: u64) -> Result<Self, TaskDomainError> {
        Self::new(format!("{BLOCK_MARKER_PREFIX}{salt}{sequence:05}"))
    }

    /// Returns the marker as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BlockMarker {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BlockMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for BlockMarker {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BlockMarker> for String {
    fn from(value: BlockMarker) -> Self {
        value.0
    }
}

/// Identifier assigned to a task by the remote task service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteTaskId(String);

impl RemoteTaskId {
    /// Creates a validated remote task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyRemoteTaskId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyRemoteTaskId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RemoteTaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RemoteTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RemoteTaskId {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RemoteTaskId> for String {
    fn from(value: RemoteTaskId) -> Self {
        value.0
    }
}

/// Identifier of the remote task list that receives synchronised tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskListId(String);

impl TaskListId {
    /// Creates a validated task list identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskListId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskListId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TaskListId {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskListId> for String {
    fn from(value: TaskListId) -> Self {
        value.0
    }
}
