//! Task line codec: the grammar, parser and serializer that convert between
//! Markdown task lines and [`TaskRecord`](crate::task::domain::TaskRecord)s.
//!
//! Parsing is a pure function of the line, the originating note, the
//! identity lookup capability and the [`DisplayOptions`]; rendering is a pure
//! function of the record and the options.

mod error;
mod grammar;
mod options;
mod parser;
mod serializer;

pub use error::{DisplayOptionsError, TaskParseError, TaskRenderError};
pub use grammar::{LineGrammar, MarkerMatch, extract_importance};
pub use options::{DEFAULT_LINE_TEMPLATE, DisplayOptions};
pub use serializer::RenderMode;

/// Parser and serializer configured from one set of display options.
#[derive(Debug, Clone)]
pub struct TaskLineCodec {
    options: DisplayOptions,
    grammar: LineGrammar,
}

impl TaskLineCodec {
    /// Builds a codec, compiling the grammar and checking the line template.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayOptionsError`] when a grammar pattern does not
    /// compile, the date format is invalid, the template is malformed, or the
    /// template never renders the task title.
    pub fn new(options: DisplayOptions) -> Result<Self, DisplayOptionsError> {
        let grammar = LineGrammar::new(&options.task_created_prefix)?;
        serializer::check_template(&options.replacement_line_template, &options.date_format)?;
        Ok(Self { options, grammar })
    }

    /// Returns the display options.
    #[must_use]
    pub const fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Returns the compiled line grammar.
    #[must_use]
    pub const fn grammar(&self) -> &LineGrammar {
        &self.grammar
    }
}
