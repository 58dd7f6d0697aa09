//! Remote task service port.

use crate::task::domain::{ExportedTask, RemoteTask, RemoteTaskId, TaskListId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote task service operations.
pub type RemoteTaskResult<T> = Result<T, RemoteTaskError>;

/// Create and update operations of the remote task service.
///
/// Transport concerns (authentication, retries, pagination) belong to the
/// implementation; callers never retry.
#[async_trait]
pub trait RemoteTaskService: Send + Sync {
    /// Creates a task in the given list.
    ///
    /// The returned task carries at least its identifier and status.
    async fn create_task(
        &self,
        list_id: &TaskListId,
        task: &ExportedTask,
    ) -> RemoteTaskResult<RemoteTask>;

    /// Updates an existing task in the given list.
    async fn update_task(
        &self,
        list_id: &TaskListId,
        remote_id: &RemoteTaskId,
        task: &ExportedTask,
    ) -> RemoteTaskResult<RemoteTask>;
}

/// Errors returned by remote task service adapters.
#[derive(Debug, Clone, Error)]
pub enum RemoteTaskError {
    /// The task list does not exist.
    #[error("task list {0} not found")]
    ListNotFound(TaskListId),

    /// The task does not exist in the list.
    #[error("remote task {0} not found")]
    TaskNotFound(RemoteTaskId),

    /// The service rejected the payload.
    #[error("remote service rejected the task: {0}")]
    Rejected(String),

    /// Network or authentication failure.
    #[error("remote transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteTaskError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
