//! Payloads exchanged with the remote task service.

use super::{ChecklistItem, Importance, ItemBody, LinkedResource, RemoteTaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields of a task record that are sent to the remote service.
///
/// Optional fields are omitted from the serialised payload so the remote
/// service keeps its own value for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedTask {
    /// Task title.
    pub title: String,
    /// Task body, when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,
    /// Task status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Task importance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    /// Checklist items, only when explicitly exported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checklist_items: Vec<ChecklistItem>,
    /// Linked resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_resources: Vec<LinkedResource>,
}

/// Task record as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTask {
    /// Remote identifier.
    pub id: RemoteTaskId,
    /// Task title.
    #[serde(default)]
    pub title: Option<String>,
    /// Task status.
    #[serde(default)]
    pub status: Option<TaskStatus>,
    /// Task importance.
    #[serde(default)]
    pub importance: Option<Importance>,
    /// Task body.
    #[serde(default)]
    pub body: Option<ItemBody>,
    /// Checklist items.
    #[serde(default)]
    pub checklist_items: Vec<ChecklistItem>,
    /// Linked resources.
    #[serde(default)]
    pub linked_resources: Vec<LinkedResource>,
    /// Creation timestamp assigned by the remote service.
    #[serde(default)]
    pub created_date_time: Option<DateTime<Utc>>,
}

impl RemoteTask {
    /// Creates a remote task carrying only its identifier.
    #[must_use]
    pub const fn new(id: RemoteTaskId) -> Self {
        Self {
            id,
            title: None,
            status: None,
            importance: None,
            body: None,
            checklist_items: Vec::new(),
            linked_resources: Vec::new(),
            created_date_time: None,
        }
    }

    /// Creates a remote task from an exported payload, as a remote service
    /// does on creation.
    #[must_use]
    pub fn from_exported(
        id: RemoteTaskId,
        exported: &ExportedTask,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut task = Self::new(id);
        task.status = Some(TaskStatus::NotStarted);
        task.importance = Some(Importance::Normal);
        task.created_date_time = Some(created_at);
        task.apply_patch(exported);
        task
    }

    /// Applies an exported payload with partial-update semantics: fields
    /// present in the payload replace the stored values.
    pub fn apply_patch(&mut self, exported: &ExportedTask) {
        self.title = Some(exported.title.clone());
        if let Some(body) = &exported.body {
            self.body = Some(body.clone());
        }
        if let Some(status) = exported.status {
            self.status = Some(status);
        }
        if let Some(importance) = exported.importance {
            self.importance = Some(importance);
        }
        if !exported.checklist_items.is_empty() {
            self.checklist_items.clone_from(&exported.checklist_items);
        }
        if !exported.linked_resources.is_empty() {
            self.linked_resources.clone_from(&exported.linked_resources);
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the importance.
    #[must_use]
    pub fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: ItemBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_date_time(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_date_time = Some(created_at);
        self
    }
}
