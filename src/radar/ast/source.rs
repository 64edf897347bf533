//! Verbatim access to the source text behind a tree
//!
//! The inversion rule rebuilds an expression from the exact text of its operands, so it
//! needs a way back from a [Range] to the characters it covers. [SourceText] is that
//! capability; [SourceCode] is the implementation the bundled linter uses.

use super::range::{Range, SourceLocation};

pub trait SourceText {
    /// Exact text covered by `range`, or `None` when the range does not fall on valid
    /// boundaries of this source
    fn text(&self, range: &Range) -> Option<&str>;
}

impl SourceText for str {
    fn text(&self, range: &Range) -> Option<&str> {
        self.get(range.span.clone())
    }
}

impl SourceText for String {
    fn text(&self, range: &Range) -> Option<&str> {
        self.as_str().text(range)
    }
}

/// Source text paired with its line index
#[derive(Debug, Clone)]
pub struct SourceCode {
    text: String,
    location: SourceLocation,
}

impl SourceCode {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let location = SourceLocation::new(&text);
        Self { text, location }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}

impl SourceText for SourceCode {
    fn text(&self, range: &Range) -> Option<&str> {
        self.text.as_str().text(range)
    }
}
