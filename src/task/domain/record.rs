//! Task record aggregate: the reconciled view of one task line and its
//! remote counterpart.

use super::{
    BlockMarker, ChecklistItem, ExportedTask, Importance, ItemBody, LinkedResource, RemoteTask,
    RemoteTaskId, TaskDomainError, TaskStatus, TrackingLocator,
};
use chrono::NaiveDate;

/// Reconciled view of one task, local and remote.
///
/// A record never carries a remote identifier without a block marker: the
/// marker is the only value written into the text that can find the remote
/// record again on a later parse. Identity is therefore only ever set through
/// [`TaskRecord::resolve_remote_id`] (marker already present) or
/// [`TaskRecord::stamp_identity`] (both values at once).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    local_token: Option<BlockMarker>,
    remote_id: Option<RemoteTaskId>,
    title: String,
    status: TaskStatus,
    importance: Importance,
    body: Option<ItemBody>,
    checklist_items: Vec<ChecklistItem>,
    linked_resources: Vec<LinkedResource>,
    source_document: String,
    created_on: Option<NaiveDate>,
}

impl TaskRecord {
    /// Creates a never-synchronised record with default status, importance
    /// and provenance body.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty after
    /// trimming.
    pub fn new(
        title: impl Into<String>,
        source_document: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let raw_title = title.into();
        let trimmed = raw_title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let document = source_document.into();
        Ok(Self {
            local_token: None,
            remote_id: None,
            title: trimmed.to_owned(),
            status: TaskStatus::default(),
            importance: Importance::default(),
            body: Some(ItemBody::created_in(&document)),
            checklist_items: Vec::new(),
            linked_resources: Vec::new(),
            source_document: document,
            created_on: None,
        })
    }

    /// Builds a record from a remote task.
    ///
    /// `marker` is the block marker already mapped to the remote identifier,
    /// if any. Without a marker the record stays unsynchronised so that it
    /// never carries a remote identifier on its own. The body is the remote
    /// one only; no provenance body is added.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the remote title is
    /// missing or blank.
    pub fn from_remote(
        remote: &RemoteTask,
        source_document: impl Into<String>,
        marker: Option<BlockMarker>,
        locator: &TrackingLocator,
    ) -> Result<Self, TaskDomainError> {
        let mut record = Self::new(remote.title.clone().unwrap_or_default(), source_document)?;
        record.body = None;
        record.checklist_items.clone_from(&remote.checklist_items);
        record.update_from_remote(remote);
        if let Some(known_marker) = marker {
            record.stamp_identity(known_marker, remote.id.clone());
        }
        if record.linked_resources.is_empty() {
            record.attach_tracking_resource(locator);
        }
        Ok(record)
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the importance.
    #[must_use]
    pub const fn with_importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    /// Sets the block marker found in the text, without a remote identifier.
    #[must_use]
    pub fn with_local_token(mut self, marker: BlockMarker) -> Self {
        self.local_token = Some(marker);
        self.remote_id = None;
        self
    }

    /// Returns the block marker, if any.
    #[must_use]
    pub const fn local_token(&self) -> Option<&BlockMarker> {
        self.local_token.as_ref()
    }

    /// Returns the remote identifier, if any.
    #[must_use]
    pub const fn remote_id(&self) -> Option<&RemoteTaskId> {
        self.remote_id.as_ref()
    }

    /// Returns `true` when both the block marker and the remote identifier
    /// are known.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.local_token.is_some() && self.remote_id.is_some()
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the importance.
    #[must_use]
    pub const fn importance(&self) -> Importance {
        self.importance
    }

    /// Returns the body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&ItemBody> {
        self.body.as_ref()
    }

    /// Returns the checklist items in insertion order.
    #[must_use]
    pub fn checklist_items(&self) -> &[ChecklistItem] {
        &self.checklist_items
    }

    /// Returns the linked resources.
    #[must_use]
    pub fn linked_resources(&self) -> &[LinkedResource] {
        &self.linked_resources
    }

    /// Returns the originating note.
    #[must_use]
    pub fn source_document(&self) -> &str {
        &self.source_document
    }

    /// Returns the remote creation date to render, if any.
    #[must_use]
    pub const fn created_on(&self) -> Option<NaiveDate> {
        self.created_on
    }

    /// Attaches the remote identifier resolved for the record's block marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RemoteIdWithoutMarker`] when the record has
    /// no block marker.
    pub fn resolve_remote_id(&mut self, remote_id: RemoteTaskId) -> Result<(), TaskDomainError> {
        if self.local_token.is_none() {
            return Err(TaskDomainError::RemoteIdWithoutMarker(remote_id.to_string()));
        }
        self.remote_id = Some(remote_id);
        Ok(())
    }

    /// Stamps a freshly minted identity onto the record.
    ///
    /// Any stale marker carried by the text is replaced.
    pub fn stamp_identity(&mut self, marker: BlockMarker, remote_id: RemoteTaskId) {
        self.local_token = Some(marker);
        self.remote_id = Some(remote_id);
    }

    /// Sets the status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Replaces the body with plain text.
    pub fn set_body(&mut self, content: impl Into<String>) {
        self.body = Some(ItemBody::text(content));
    }

    /// Sets or clears the creation date rendered after the title.
    pub const fn set_created_on(&mut self, created_on: Option<NaiveDate>) {
        self.created_on = created_on;
    }

    /// Appends a checklist item.
    pub fn add_checklist_item(&mut self, item: ChecklistItem) {
        self.checklist_items.push(item);
    }

    /// Replaces the tracking link owned by `locator`'s application with one
    /// that points at the current block marker.
    pub fn attach_tracking_resource(&mut self, locator: &TrackingLocator) {
        self.linked_resources
            .retain(|resource| resource.application_name != locator.application_name);
        self.linked_resources.push(LinkedResource::tracking(
            locator,
            &self.source_document,
            self.local_token.as_ref(),
        ));
    }

    /// Overlays populated remote fields onto the record; the remote side wins
    /// for every field it populates. Checklist items are left untouched.
    pub fn update_from_remote(&mut self, remote: &RemoteTask) {
        if let Some(title) = remote
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
        {
            title.clone_into(&mut self.title);
        }
        if let Some(body) = remote.body.as_ref().filter(|body| !body.is_blank()) {
            self.body = Some(body.clone());
        }
        if let Some(status) = remote.status {
            self.status = status;
        }
        if let Some(importance) = remote.importance {
            self.importance = importance;
        }
        if !remote.linked_resources.is_empty() {
            self.linked_resources.clone_from(&remote.linked_resources);
        }
    }

    /// Returns the fields sent to the remote service.
    ///
    /// Checklist items are only included when `with_checklist` is set and
    /// the record has any.
    #[must_use]
    pub fn export(&self, with_checklist: bool) -> ExportedTask {
        ExportedTask {
            title: self.title.clone(),
            body: self.body.clone().filter(|body| !body.is_blank()),
            status: Some(self.status),
            importance: Some(self.importance),
            checklist_items: if with_checklist {
                self.checklist_items.clone()
            } else {
                Vec::new()
            },
            linked_resources: self.linked_resources.clone(),
        }
    }
}
