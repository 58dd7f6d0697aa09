//! Display options controlling how task lines are parsed and rendered.

use super::DisplayOptionsError;
use crate::task::domain::{Importance, TaskStatus, TrackingLocator};
use serde::{Deserialize, Serialize};

/// Default replacement line template.
pub const DEFAULT_LINE_TEMPLATE: &str = "- [{{ status_symbol }}] {{ task }} {{ importance }}";

/// Configuration for the task line grammar and the serializer.
///
/// The options mirror the host's settings document, so they deserialise
/// from camelCase JSON and every missing key falls back to its default.
///
/// # Examples
///
/// ```
/// use tasklink::task::codec::DisplayOptions;
///
/// let options = DisplayOptions::default();
/// assert_eq!(options.status_completed_glyph, "x");
///
/// let custom = DisplayOptions::from_json_str(r#"{"taskCreatedPrefix": "@"}"#)
///     .expect("valid options document");
/// assert_eq!(custom.task_created_prefix, "@");
/// assert_eq!(custom.status_completed_glyph, "x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplayOptions {
    /// `chrono` format string for created-date markers.
    pub date_format: String,
    /// Prefix introducing a created-date marker.
    pub task_created_prefix: String,
    /// Prefix introducing a body excerpt in listings rendered by the host.
    pub task_body_prefix: String,
    /// Marker denoting low importance.
    pub importance_low_marker: String,
    /// Marker denoting normal importance.
    pub importance_normal_marker: String,
    /// Marker denoting high importance.
    pub importance_high_marker: String,
    /// Checkbox glyph for tasks that have not started.
    pub status_not_started_glyph: String,
    /// Checkbox glyph for tasks in progress.
    pub status_in_progress_glyph: String,
    /// Checkbox glyph for completed tasks.
    pub status_completed_glyph: String,
    /// `minijinja` template for a rendered task line. Recognised variables
    /// are `task`, `status_symbol` and `importance`.
    pub replacement_line_template: String,
    /// Tracking link settings.
    pub tracking: TrackingLocator,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_owned(),
            task_created_prefix: "🔎".to_owned(),
            task_body_prefix: "💡".to_owned(),
            importance_low_marker: "🔽".to_owned(),
            importance_normal_marker: String::new(),
            importance_high_marker: "⏫".to_owned(),
            status_not_started_glyph: " ".to_owned(),
            status_in_progress_glyph: "/".to_owned(),
            status_completed_glyph: "x".to_owned(),
            replacement_line_template: DEFAULT_LINE_TEMPLATE.to_owned(),
            tracking: TrackingLocator::default(),
        }
    }
}

impl DisplayOptions {
    /// Reads options from the host's JSON settings document.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayOptionsError::InvalidDocument`] when the document is
    /// not valid JSON or a key has the wrong type.
    pub fn from_json_str(document: &str) -> Result<Self, DisplayOptionsError> {
        serde_json::from_str(document)
            .map_err(|error| DisplayOptionsError::InvalidDocument(error.to_string()))
    }

    /// Returns the checkbox glyph for `status`.
    ///
    /// Statuses without a configured glyph render as a blank checkbox.
    #[must_use]
    pub fn status_glyph(&self, status: TaskStatus) -> &str {
        match status {
            TaskStatus::NotStarted => &self.status_not_started_glyph,
            TaskStatus::InProgress => &self.status_in_progress_glyph,
            TaskStatus::Completed => &self.status_completed_glyph,
            TaskStatus::WaitingOnOthers | TaskStatus::Deferred => " ",
        }
    }

    /// Returns the marker configured for `importance`.
    #[must_use]
    pub fn importance_marker(&self, importance: Importance) -> &str {
        match importance {
            Importance::Low => &self.importance_low_marker,
            Importance::Normal => &self.importance_normal_marker,
            Importance::High => &self.importance_high_marker,
        }
    }
}
