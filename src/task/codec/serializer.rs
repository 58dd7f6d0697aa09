//! Serializer from a [`TaskRecord`] to canonical task line text.

use super::{DisplayOptionsError, TaskLineCodec, TaskRenderError};
use crate::task::domain::{Importance, TaskRecord};
use chrono::format::{Item, StrftimeItems};
use minijinja::{Environment, context};
use std::fmt::Write;
use tracing::debug;

/// Title used to check that a template renders the task placeholder.
const TITLE_PROBE: &str = "\u{1f}task\u{1f}";

/// Indentation of body and checklist lines under a task line.
const CHILD_INDENT: &str = "  ";

/// How much of a record is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Only the task line.
    SingleLine,
    /// The task line followed by indented body and checklist lines.
    MultiLine,
}

/// Checks that a line template and date format are usable.
pub(super) fn check_template(template: &str, date_format: &str) -> Result<(), DisplayOptionsError> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(DisplayOptionsError::InvalidDateFormat(date_format.to_owned()));
    }
    let probe = render_line(template, TITLE_PROBE, " ", "")?;
    if !probe.contains(TITLE_PROBE) {
        return Err(DisplayOptionsError::MissingTaskPlaceholder(
            template.to_owned(),
        ));
    }
    Ok(())
}

fn render_line(
    template: &str,
    task: &str,
    status_symbol: &str,
    importance: &str,
) -> Result<String, TaskRenderError> {
    let environment = Environment::new();
    environment
        .render_str(
            template,
            context! {
                task => task,
                status_symbol => status_symbol,
                importance => importance,
            },
        )
        .map_err(|error| TaskRenderError::Template {
            reason: error.to_string(),
        })
}

impl TaskLineCodec {
    /// Renders a record as canonical task text.
    ///
    /// The line template receives the trimmed title and the status glyph. A
    /// non-normal importance marker is only inserted when the templated line
    /// does not already contain it. The block marker, when set, is appended
    /// as ` ^marker`, after any created-date marker.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRenderError`] when the template or the date format
    /// fails to render.
    pub fn serialize(
        &self,
        record: &TaskRecord,
        mode: RenderMode,
    ) -> Result<String, TaskRenderError> {
        let template = &self.options.replacement_line_template;
        let title = record.title().trim();
        let status_symbol = self.options.status_glyph(record.status());

        let plain = render_line(template, title, status_symbol, "")?;
        let templated = match record.importance() {
            Importance::Normal => plain,
            level => {
                let marker = self.options.importance_marker(level);
                if marker.is_empty() || plain.contains(marker) {
                    plain
                } else {
                    render_line(template, title, status_symbol, marker)?
                }
            }
        };

        let mut line = templated.trim().to_owned();
        if let Some(created_on) = record.created_on() {
            write!(
                line,
                " {}[[{}]]",
                self.options.task_created_prefix,
                created_on.format(&self.options.date_format)
            )
            .map_err(|_| TaskRenderError::DateFormat(self.options.date_format.clone()))?;
        }
        if let Some(marker) = record.local_token() {
            line.push_str(" ^");
            line.push_str(marker.as_str());
        }
        debug!(line = %line, "rendered task line");

        if mode == RenderMode::SingleLine {
            return Ok(line);
        }

        let mut lines = vec![line];
        if let Some(body) = record.body() {
            lines.extend(
                body.content
                    .lines()
                    .filter(|body_line| !body_line.trim().is_empty())
                    .map(|body_line| format!("{CHILD_INDENT}{body_line}")),
            );
        }
        lines.extend(record.checklist_items().iter().map(|item| {
            let glyph = if item.is_checked { "x" } else { " " };
            format!("{CHILD_INDENT}- [{glyph}] {}", item.display_name)
        }));
        Ok(lines.join("\n"))
    }
}
