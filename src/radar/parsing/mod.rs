//! Parsing of the javascript subset into the node model
//!
//!     The grammar is written with chumsky combinators over the logos token stream (see
//!     [parser]). It exists so the linter can run on source files; the analysis core itself
//!     never depends on it.
//!
//!     Supported statements: blocks, `if`/`else`, `for` in its three forms, `while`,
//!     `do`/`while`, `switch`, `try`/`catch`/`finally`, `return`, `throw`, `break` and
//!     `continue` with optional labels, labeled statements, `var`/`let`/`const`
//!     declarations, function declarations, expression statements and empty statements.
//!     Expressions include arrow functions, `async`/`await`, spread and regular expression
//!     literals. Object literals, template literals, class declarations and `import`/
//!     `export` forms other than exported declarations are kept as opaque nodes carrying
//!     their verbatim text.
//!
//!     As in ESTree, parentheses do not produce nodes: `(a)` parses to the identifier `a`
//!     with a range that excludes the parentheses.
//!
//!     Input nested deeper than [MAX_NESTING] levels, or with a run of more than
//!     [MAX_OPERATOR_CHAIN] binary operators, is refused with [ParseError::TooDeep] before
//!     the grammar runs.

pub mod error;
mod nesting;
mod parser;

pub use error::{format_source_context, ParseError, ParseResult};
pub use nesting::{MAX_NESTING, MAX_OPERATOR_CHAIN};

use crate::radar::ast::Node;
use crate::radar::lexing::{tokenize, Token};
use chumsky::{prelude::*, Stream};
use parser::{NodeBuilder, TokenSpan};
use std::ops::Range as ByteRange;
use tracing::debug;

/// Parse a complete program
pub fn parse_program(source: &str) -> ParseResult<Node> {
    let builder = NodeBuilder::new(source);
    let tokens = checked_tokens(source, &builder)?;
    let program = parser::program(&builder)
        .parse(stream(source, tokens))
        .map_err(|errors| builder.error(errors))?;
    debug!(bytes = source.len(), "parsed program");
    Ok(program)
}

/// Parse a single expression, which must span the whole input
pub fn parse_expression(source: &str) -> ParseResult<Node> {
    let builder = NodeBuilder::new(source);
    let tokens = checked_tokens(source, &builder)?;
    let result = parser::expression(&builder)
        .parse(stream(source, tokens))
        .map_err(|errors| builder.error(errors));
    result
}

fn checked_tokens(
    source: &str,
    builder: &NodeBuilder<'_>,
) -> ParseResult<Vec<(Token, ByteRange<usize>)>> {
    let tokens = tokenize(source)?;
    nesting::check_nesting(&tokens, builder.location())?;
    Ok(tokens)
}

type TokenStream<I> = Stream<'static, TokenSpan, ByteRange<usize>, I>;

fn stream(
    source: &str,
    tokens: Vec<(Token, ByteRange<usize>)>,
) -> TokenStream<impl Iterator<Item = (TokenSpan, ByteRange<usize>)>> {
    let end = source.len();
    Stream::from_iter(
        end..end,
        tokens
            .into_iter()
            .map(|(token, span)| ((token, span.clone()), span)),
    )
}
