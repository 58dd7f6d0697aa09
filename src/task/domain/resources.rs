//! Value objects attached to a task: body, checklist items and linked
//! resources.

use super::BlockMarker;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Label prefixed to the provenance body of tasks created from a note.
const CREATED_IN_FILE_LABEL: &str = "Created in file";

/// Content type of a task body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyContentType {
    /// Plain text.
    #[default]
    Text,
    /// HTML markup.
    Html,
}

/// Free-text body of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    /// Body text.
    pub content: String,
    /// Interpretation of `content`.
    #[serde(default)]
    pub content_type: BodyContentType,
}

impl ItemBody {
    /// Creates a plain-text body.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            content_type: BodyContentType::Text,
        }
    }

    /// Creates the default provenance body pointing at the source note.
    #[must_use]
    pub fn created_in(source_document: &str) -> Self {
        Self::text(format!("{CREATED_IN_FILE_LABEL} [[{source_document}]]"))
    }

    /// Returns `true` when the body carries no visible text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Sub-item of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Item text.
    pub display_name: String,
    /// Whether the item has been ticked.
    #[serde(default)]
    pub is_checked: bool,
}

impl ChecklistItem {
    /// Creates a checklist item.
    #[must_use]
    pub fn new(display_name: impl Into<String>, is_checked: bool) -> Self {
        Self {
            display_name: display_name.into(),
            is_checked,
        }
    }
}

/// External resource linked to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedResource {
    /// Deep link to the resource.
    pub web_url: String,
    /// Name of the application that owns the link.
    pub application_name: String,
    /// Identifier of the resource inside the owning application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Human-readable label.
    pub display_name: String,
}

impl LinkedResource {
    /// Builds the tracking link that points back at the source note and the
    /// block marker of the task line.
    #[must_use]
    pub fn tracking(
        locator: &TrackingLocator,
        source_document: &str,
        marker: Option<&BlockMarker>,
    ) -> Self {
        let block = marker.map(BlockMarker::as_str).unwrap_or_default();
        Self {
            web_url: format!(
                "{}?vault={}&filepath={}&block={block}",
                locator.redirect_base_url,
                encode_uri_component(&locator.vault_name),
                encode_uri_component(source_document),
            ),
            application_name: locator.application_name.clone(),
            external_id: marker.map(ToString::to_string),
            display_name: format!("Tracking Block Link: {block}"),
        }
    }
}

/// Settings used to build the tracking link attached to every task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingLocator {
    /// Redirect page that opens the note at the given block.
    pub redirect_base_url: String,
    /// Name of the note vault.
    pub vault_name: String,
    /// Application name recorded on the linked resource.
    pub application_name: String,
}

impl Default for TrackingLocator {
    fn default() -> Self {
        Self {
            redirect_base_url: "http://localhost:8901/redirectpage.html".to_owned(),
            vault_name: "vault".to_owned(),
            application_name: "Tasklink".to_owned(),
        }
    }
}

/// Bytes escaped in a URI component: everything but letters, digits and
/// `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}
