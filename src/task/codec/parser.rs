//! Parser from a Markdown task line to a [`TaskRecord`].

use super::{TaskLineCodec, TaskParseError, extract_importance};
use crate::task::{
    domain::{ChecklistItem, Importance, TaskRecord, TaskStatus},
    ports::IdentityLookup,
};
use tracing::debug;

impl TaskLineCodec {
    /// Parses a raw task line into a fresh [`TaskRecord`].
    ///
    /// The extractors run in a fixed order, each on the residual of the
    /// previous one: block marker, checkbox, created-date marker, importance
    /// marker, then leading decoration. A block marker with no mapping in
    /// `lookup` leaves the remote identifier unset.
    ///
    /// # Errors
    ///
    /// Returns [`TaskParseError::EmptyTitle`] when nothing remains of the
    /// title, or [`TaskParseError::IdentityLookup`] when the lookup fails.
    pub fn parse_line<L>(
        &self,
        raw: &str,
        source_document: &str,
        lookup: &L,
    ) -> Result<TaskRecord, TaskParseError>
    where
        L: IdentityLookup + ?Sized,
    {
        let (marker_match, without_marker) = self.grammar.strip_block_marker(raw.trim());
        let (status, without_checkbox) = self.grammar.extract_status(&without_marker);
        let without_date = self.grammar.strip_created_date_marker(&without_checkbox);
        let importance = extract_importance(
            raw,
            &self.options.importance_low_marker,
            &self.options.importance_high_marker,
        );
        let without_importance = match importance {
            Importance::Normal => without_date,
            level => {
                let marker = self.options.importance_marker(level);
                without_date
                    .replace(&format!(" {marker}"), "")
                    .replace(marker, "")
            }
        };
        let title = self.grammar.strip_decoration(&without_importance);

        let mut record = TaskRecord::new(title, source_document)
            .map_err(|_| TaskParseError::EmptyTitle)?
            .with_status(status)
            .with_importance(importance);

        if let Some(found) = marker_match {
            if found.is_ambiguous() {
                debug!(
                    marker = %found.marker(),
                    skipped = found.skipped_candidates(),
                    "kept right-most block marker candidate"
                );
            }
            let marker = found.into_marker();
            let resolved = lookup.lookup(&marker)?;
            record = record.with_local_token(marker);
            if let Some(remote_id) = resolved {
                record.resolve_remote_id(remote_id)?;
            }
        }

        record.attach_tracking_resource(&self.options.tracking);
        debug!(
            line = raw,
            title = record.title(),
            synced = record.is_synced(),
            "parsed task line"
        );
        Ok(record)
    }

    /// Parses an indented sub-item line into a checklist item.
    ///
    /// Returns `None` when the line has no text once decoration is removed.
    #[must_use]
    pub fn parse_checklist_item(&self, raw: &str) -> Option<ChecklistItem> {
        let (status, without_checkbox) = self.grammar.extract_status(raw.trim());
        let display_name = self.grammar.strip_decoration(&without_checkbox);
        if display_name.is_empty() {
            return None;
        }
        Some(ChecklistItem::new(
            display_name,
            status == TaskStatus::Completed,
        ))
    }
}
