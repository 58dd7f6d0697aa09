//! Pushing a multi-line selection of task lines in one batch.

use super::{ReconciledTask, ReconciliationService};
use crate::task::{
    codec::{RenderMode, TaskLineCodec, TaskParseError},
    domain::TaskListId,
    ports::{IdentityStore, RemoteTaskService},
};
use mockable::Clock;
use tracing::warn;

/// What happened to one line of a selection.
#[derive(Debug, Clone)]
pub enum SelectionLine {
    /// A blank line, kept verbatim.
    Blank(String),
    /// A line that did not parse and was not sent anywhere.
    Rejected {
        /// The line as submitted.
        original: String,
        /// Why parsing failed.
        error: TaskParseError,
    },
    /// A line that was parsed and reconciled.
    Reconciled {
        /// The line as submitted.
        original: String,
        /// The reconciliation result.
        task: ReconciledTask,
    },
}

impl SelectionLine {
    /// Returns the line as submitted.
    #[must_use]
    pub fn original(&self) -> &str {
        match self {
            Self::Blank(original)
            | Self::Rejected { original, .. }
            | Self::Reconciled { original, .. } => original,
        }
    }
}

/// Per-line results of a selection push, in input order.
#[derive(Debug, Clone, Default)]
pub struct SelectionReport {
    lines: Vec<SelectionLine>,
}

impl SelectionReport {
    /// Returns the per-line results.
    #[must_use]
    pub fn lines(&self) -> &[SelectionLine] {
        &self.lines
    }

    /// Returns the number of lines that were reconciled successfully.
    #[must_use]
    pub fn reconciled_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| {
                matches!(line, SelectionLine::Reconciled { task, .. } if !task.outcome.is_failure())
            })
            .count()
    }

    /// Returns the number of lines that were rejected or failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|line| match line {
                SelectionLine::Blank(_) => false,
                SelectionLine::Rejected { .. } => true,
                SelectionLine::Reconciled { task, .. } => task.outcome.is_failure(),
            })
            .count()
    }

    /// Builds the text that replaces the selection.
    ///
    /// Reconciled lines are re-rendered with their block marker. Blank,
    /// rejected and failed lines keep their original text, as does a line
    /// whose rendering fails.
    #[must_use]
    pub fn replacement_text(&self, codec: &TaskLineCodec, mode: RenderMode) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                SelectionLine::Reconciled { original, task }
                    if !task.outcome.is_failure() =>
                {
                    codec.serialize(&task.record, mode).unwrap_or_else(|err| {
                        warn!(line = %original, error = %err, "keeping original line");
                        original.clone()
                    })
                }
                other => other.original().to_owned(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

enum PendingLine<'a> {
    Blank(&'a str),
    Rejected(&'a str, TaskParseError),
    Parsed(&'a str),
}

impl<R, S, C> ReconciliationService<R, S, C>
where
    R: RemoteTaskService + 'static,
    S: IdentityStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Parses every non-blank line of `text` and reconciles the parsed
    /// records as one batch.
    ///
    /// Lines that fail to parse are reported and never reach the remote
    /// service.
    pub async fn push_selection(
        &self,
        text: &str,
        source_document: &str,
        list_id: &TaskListId,
    ) -> SelectionReport {
        let mut pending = Vec::new();
        let mut records = Vec::new();
        for raw in text.lines() {
            if raw.trim().is_empty() {
                pending.push(PendingLine::Blank(raw));
                continue;
            }
            match self.parse_line(raw, source_document) {
                Ok(record) => {
                    records.push(record);
                    pending.push(PendingLine::Parsed(raw));
                }
                Err(error) => {
                    warn!(line = raw, error = %error, "skipping line that is not a task");
                    pending.push(PendingLine::Rejected(raw, error));
                }
            }
        }

        let mut reconciled = self.reconcile(records, list_id).await.into_results().into_iter();
        let lines = pending
            .into_iter()
            .map(|line| match line {
                PendingLine::Blank(raw) => SelectionLine::Blank(raw.to_owned()),
                PendingLine::Rejected(raw, error) => SelectionLine::Rejected {
                    original: raw.to_owned(),
                    error,
                },
                // The batch reports exactly one result per submitted record.
                PendingLine::Parsed(raw) => reconciled.next().map_or_else(
                    || SelectionLine::Blank(raw.to_owned()),
                    |task| SelectionLine::Reconciled {
                        original: raw.to_owned(),
                        task,
                    },
                ),
            })
            .collect();
        SelectionReport { lines }
    }
}
