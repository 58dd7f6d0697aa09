//! Regular-expression grammar for task lines.
//!
//! Each extractor works on an immutable input and returns the extracted
//! value together with the residual text, so the parser can compose them in
//! a fixed order and each ambiguity rule can be tested on its own.

use super::DisplayOptionsError;
use crate::task::domain::{BlockMarker, Importance, TaskStatus};
use regex::Regex;
use std::ops::Range;

/// Block marker chosen for a line, with the evidence behind the choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    marker: BlockMarker,
    range: Range<usize>,
    skipped_candidates: usize,
}

impl MarkerMatch {
    /// Returns the chosen marker.
    #[must_use]
    pub const fn marker(&self) -> &BlockMarker {
        &self.marker
    }

    /// Returns the byte range of `^marker` in the input line.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns how many earlier marker-looking substrings were left in the
    /// text as literal prose.
    #[must_use]
    pub const fn skipped_candidates(&self) -> usize {
        self.skipped_candidates
    }

    /// Returns `true` when more than one marker-looking substring was found.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        self.skipped_candidates > 0
    }

    /// Consumes the match and returns the marker.
    #[must_use]
    pub fn into_marker(self) -> BlockMarker {
        self.marker
    }
}

/// Compiled task line grammar.
#[derive(Debug, Clone)]
pub struct LineGrammar {
    block_marker: Regex,
    marker_candidate: Regex,
    checkbox: Regex,
    decoration: Regex,
    created_date: Regex,
    created_prefix: String,
}

impl LineGrammar {
    /// Compiles the grammar for the given created-date prefix.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayOptionsError::InvalidPattern`] when a pattern fails to
    /// compile.
    pub fn new(created_prefix: &str) -> Result<Self, DisplayOptionsError> {
        let prefix = regex::escape(created_prefix);
        Ok(Self {
            block_marker: Regex::new(r"\A\^([A-Za-z0-9]+)")?,
            marker_candidate: Regex::new(r"\^[A-Za-z0-9]+")?,
            checkbox: Regex::new(r"\[(.)\]")?,
            decoration: Regex::new(r"(?m)(- \[[ /x]\] )|\*|^> |^#* |- ")?,
            created_date: Regex::new(&format!(
                r"{prefix}\[\[[^\]]*\]\]|{prefix}\d{{4}}-\d{{2}}-\d{{2}}"
            ))?,
            created_prefix: created_prefix.to_owned(),
        })
    }

    /// Finds the block marker of a line.
    ///
    /// Only the last `^` of the line can start a marker, so a line such as
    /// `task ^AAA more ^BBB` resolves to `BBB` and keeps `^AAA` as prose. A
    /// trailing `^` that is not followed by letters or digits means the line
    /// has no marker at all.
    #[must_use]
    pub fn extract_block_marker(&self, line: &str) -> Option<MarkerMatch> {
        let caret = line.rfind('^')?;
        let tail = line.get(caret..)?;
        let captures = self.block_marker.captures(tail)?;
        let whole = captures.get(0)?;
        let token = captures.get(1)?;
        let marker = BlockMarker::new(token.as_str()).ok()?;
        let skipped_candidates = self
            .marker_candidate
            .find_iter(line)
            .filter(|candidate| candidate.start() < caret)
            .count();
        Some(MarkerMatch {
            marker,
            range: caret..caret.saturating_add(whole.end()),
            skipped_candidates,
        })
    }

    /// Removes the block marker from `line`.
    ///
    /// Returns the marker match, if any, and the residual text.
    #[must_use]
    pub fn strip_block_marker(&self, line: &str) -> (Option<MarkerMatch>, String) {
        let mut residual = line.to_owned();
        let found = self.extract_block_marker(line);
        if let Some(marker_match) = &found {
            residual.replace_range(marker_match.range(), "");
        }
        (found, residual)
    }

    /// Reads the status from the first single-character checkbox.
    ///
    /// `[x]` means completed and any other single character means not
    /// started; without a checkbox the status is not started and the text is
    /// returned unchanged. The checkbox is removed from the residual, and the
    /// surrounding whitespace is kept for the decoration pass.
    #[must_use]
    pub fn extract_status(&self, text: &str) -> (TaskStatus, String) {
        let Some(captures) = self.checkbox.captures(text) else {
            return (TaskStatus::NotStarted, text.to_owned());
        };
        let status = if captures.get(1).is_some_and(|glyph| glyph.as_str() == "x") {
            TaskStatus::Completed
        } else {
            TaskStatus::NotStarted
        };
        (status, self.checkbox.replace(text, "").into_owned())
    }

    /// Removes created-date markers (`<prefix>[[date]]` and
    /// `<prefix>YYYY-MM-DD`) when the text contains the prefix.
    #[must_use]
    pub fn strip_created_date_marker(&self, text: &str) -> String {
        if self.created_prefix.is_empty() || !text.contains(&self.created_prefix) {
            return text.to_owned();
        }
        self.created_date.replace_all(text, "").into_owned()
    }

    /// Removes list, quote and heading decoration and checkbox syntax until
    /// nothing more matches, then trims.
    ///
    /// Trailing whitespace is only dropped once the text is stable, since the
    /// list and heading patterns end in a space. The result is a fixpoint, so
    /// applying this twice gives the same text as applying it once.
    #[must_use]
    pub fn strip_decoration(&self, text: &str) -> String {
        let mut current = text.trim_start().to_owned();
        loop {
            let next = self
                .decoration
                .replace_all(&current, "")
                .trim_start()
                .to_owned();
            if next == current {
                return current.trim_end().to_owned();
            }
            current = next;
        }
    }
}

/// Reads the importance of a line from the configured markers.
///
/// The low marker is checked first and the first match wins. Empty markers
/// never match.
#[must_use]
pub fn extract_importance(line: &str, low_marker: &str, high_marker: &str) -> Importance {
    let contains = |marker: &str| !marker.is_empty() && line.contains(marker);
    if contains(low_marker) {
        Importance::Low
    } else if contains(high_marker) {
        Importance::High
    } else {
        Importance::Normal
    }
}
