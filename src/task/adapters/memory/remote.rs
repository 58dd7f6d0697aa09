//! In-memory remote task service.

use crate::task::{
    domain::{ExportedTask, RemoteTask, RemoteTaskId, TaskListId},
    ports::{RemoteTaskError, RemoteTaskResult, RemoteTaskService},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use uuid::Uuid;

/// A call received by [`InMemoryRemoteTaskService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    /// `create_task` with the submitted title.
    Create {
        /// Target list.
        list_id: TaskListId,
        /// Submitted title.
        title: String,
    },
    /// `update_task` for the given remote task.
    Update {
        /// Target list.
        list_id: TaskListId,
        /// Updated task.
        remote_id: RemoteTaskId,
    },
}

/// Thread-safe in-memory remote task service.
///
/// Tasks get random UUID identifiers. Titles can be configured to fail or to
/// respond after a delay, so tests can inject errors and reorder
/// completions.
#[derive(Debug, Clone)]
pub struct InMemoryRemoteTaskService {
    state: Arc<RwLock<InMemoryRemoteState>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryRemoteState {
    lists: HashMap<TaskListId, HashMap<RemoteTaskId, RemoteTask>>,
    failing_titles: HashSet<String>,
    latencies: HashMap<String, Duration>,
    calls: Vec<RemoteCall>,
}

impl Default for InMemoryRemoteTaskService {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl InMemoryRemoteTaskService {
    /// Creates a service with no lists; created tasks are stamped with
    /// `created_at`.
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryRemoteState::default())),
            created_at,
        }
    }

    /// Adds an empty task list.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::Transport`] when the lock is poisoned.
    pub fn add_list(&self, list_id: &TaskListId) -> RemoteTaskResult<()> {
        self.write()?.lists.entry(list_id.clone()).or_default();
        Ok(())
    }

    /// Stores a task directly, bypassing the call log.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::ListNotFound`] when the list is unknown.
    pub fn insert_task(&self, list_id: &TaskListId, task: RemoteTask) -> RemoteTaskResult<()> {
        let mut state = self.write()?;
        let list = state
            .lists
            .get_mut(list_id)
            .ok_or_else(|| RemoteTaskError::ListNotFound(list_id.clone()))?;
        list.insert(task.id.clone(), task);
        Ok(())
    }

    /// Makes every call for a task with this title fail.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::Transport`] when the lock is poisoned.
    pub fn fail_title(&self, title: impl Into<String>) -> RemoteTaskResult<()> {
        self.write()?.failing_titles.insert(title.into());
        Ok(())
    }

    /// Delays every call for a task with this title.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::Transport`] when the lock is poisoned.
    pub fn set_latency(&self, title: impl Into<String>, delay: Duration) -> RemoteTaskResult<()> {
        self.write()?.latencies.insert(title.into(), delay);
        Ok(())
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::Transport`] when the lock is poisoned.
    pub fn task(
        &self,
        list_id: &TaskListId,
        remote_id: &RemoteTaskId,
    ) -> RemoteTaskResult<Option<RemoteTask>> {
        Ok(self
            .read()?
            .lists
            .get(list_id)
            .and_then(|list| list.get(remote_id))
            .cloned())
    }

    /// Returns the number of tasks in a list.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::Transport`] when the lock is poisoned.
    pub fn task_count(&self, list_id: &TaskListId) -> RemoteTaskResult<usize> {
        Ok(self.read()?.lists.get(list_id).map_or(0, HashMap::len))
    }

    /// Returns the calls received so far, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskError::Transport`] when the lock is poisoned.
    pub fn calls(&self) -> RemoteTaskResult<Vec<RemoteCall>> {
        Ok(self.read()?.calls.clone())
    }

    fn read(&self) -> RemoteTaskResult<RwLockReadGuard<'_, InMemoryRemoteState>> {
        self.state
            .read()
            .map_err(|err| RemoteTaskError::transport(std::io::Error::other(err.to_string())))
    }

    fn write(&self) -> RemoteTaskResult<RwLockWriteGuard<'_, InMemoryRemoteState>> {
        self.state
            .write()
            .map_err(|err| RemoteTaskError::transport(std::io::Error::other(err.to_string())))
    }

    async fn delay_for(&self, title: &str) -> RemoteTaskResult<()> {
        let latency = self.read()?.latencies.get(title).copied();
        if let Some(delay) = latency {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn check_failure(&self, title: &str) -> RemoteTaskResult<()> {
        if self.read()?.failing_titles.contains(title) {
            return Err(RemoteTaskError::Rejected(format!(
                "injected failure for '{title}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteTaskService for InMemoryRemoteTaskService {
    async fn create_task(
        &self,
        list_id: &TaskListId,
        task: &ExportedTask,
    ) -> RemoteTaskResult<RemoteTask> {
        self.delay_for(&task.title).await?;
        self.check_failure(&task.title)?;

        let mut state = self.write()?;
        state.calls.push(RemoteCall::Create {
            list_id: list_id.clone(),
            title: task.title.clone(),
        });
        let list = state
            .lists
            .get_mut(list_id)
            .ok_or_else(|| RemoteTaskError::ListNotFound(list_id.clone()))?;
        let remote_id = RemoteTaskId::new(Uuid::new_v4().to_string())
            .map_err(|err| RemoteTaskError::Rejected(err.to_string()))?;
        let created = RemoteTask::from_exported(remote_id.clone(), task, self.created_at);
        list.insert(remote_id, created.clone());
        Ok(created)
    }

    async fn update_task(
        &self,
        list_id: &TaskListId,
        remote_id: &RemoteTaskId,
        task: &ExportedTask,
    ) -> RemoteTaskResult<RemoteTask> {
        self.delay_for(&task.title).await?;
        self.check_failure(&task.title)?;

        let mut state = self.write()?;
        state.calls.push(RemoteCall::Update {
            list_id: list_id.clone(),
            remote_id: remote_id.clone(),
        });
        let list = state
            .lists
            .get_mut(list_id)
            .ok_or_else(|| RemoteTaskError::ListNotFound(list_id.clone()))?;
        let existing = list
            .get_mut(remote_id)
            .ok_or_else(|| RemoteTaskError::TaskNotFound(remote_id.clone()))?;
        existing.apply_patch(task);
        Ok(existing.clone())
    }
}
