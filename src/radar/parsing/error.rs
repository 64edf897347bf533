//! Error types for lexing and parsing

use crate::radar::ast::Range;
use thiserror::Error;

#[cfg(test)]
use crate::radar::ast::Position;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The lexer could not make a token out of the input at `range`
    #[error("Invalid token '{text}' at {}", .range.start)]
    InvalidToken { text: String, range: Range },

    #[error("Unexpected {found} at {}, expected {expected}", .range.start)]
    UnexpectedToken {
        found: String,
        expected: String,
        range: Range,
    },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String, range: Range },

    /// Nesting past `limit` levels, refused before parsing starts
    #[error("Nesting deeper than {limit} levels at {}", .range.start)]
    TooDeep { limit: usize, range: Range },
}

impl ParseError {
    pub fn range(&self) -> &Range {
        match self {
            ParseError::InvalidToken { range, .. }
            | ParseError::UnexpectedToken { range, .. }
            | ParseError::UnexpectedEnd { range, .. }
            | ParseError::TooDeep { range, .. } => range,
        }
    }
}

/// Type alias for parser results with boxed errors (reduces stack size)
pub type ParseResult<T> = Result<T, Box<ParseError>>;

/// Format source code context around an error location
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, range: &Range) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = range.start.line;

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    (start_line..end_line)
        .map(|line_num| {
            let marker = if line_num == error_line { ">>" } else { "  " };
            format!("{} {:3} | {}\n", marker, line_num + 1, lines[line_num])
        })
        .collect()
}
