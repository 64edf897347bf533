//! Nesting limits checked on the token stream before parsing
//!
//!     The grammar, the tree walk and the comparator all recurse once per nesting level, so
//!     input nested deeply enough would exhaust the stack. The check below measures two
//!     things and refuses the input with [ParseError::TooDeep] when either is over its
//!     limit:
//!
//!     - Nesting: open brackets, plus the prefix operators, `?`, `=>`, assignments and
//!       `else` seen since the last `;` or `,` at each open level. Each of those starts a
//!       construct whose operand is parsed recursively.
//!     - Operator chains: binary operators in a row at one level. `a + b + c` parses
//!       without recursion but builds a tree as deep as the chain is long.

use super::error::{ParseError, ParseResult};
use crate::radar::ast::SourceLocation;
use crate::radar::lexing::Token;
use std::ops::Range as ByteRange;

/// Deepest nesting the parser accepts
pub const MAX_NESTING: usize = 64;

/// Longest run of binary operators at one level
pub const MAX_OPERATOR_CHAIN: usize = 1024;

#[derive(Default)]
struct Level {
    nesting: usize,
    operators: usize,
}

pub(super) fn check_nesting(
    tokens: &[(Token, ByteRange<usize>)],
    location: &SourceLocation,
) -> ParseResult<()> {
    let mut levels = vec![Level::default()];
    let mut previous: Option<Token> = None;

    for (token, span) in tokens {
        match token {
            Token::OpenParen | Token::OpenBracket | Token::OpenBrace => {
                levels.push(Level::default())
            }
            Token::CloseParen | Token::CloseBracket | Token::CloseBrace => {
                if levels.len() > 1 {
                    levels.pop();
                }
            }
            Token::Semicolon | Token::Comma => {
                if let Some(level) = levels.last_mut() {
                    *level = Level::default();
                }
            }
            Token::If if previous != Some(Token::Else) => {
                if let Some(level) = levels.last_mut() {
                    level.nesting = 0;
                }
            }
            _ if opens_operand(*token, previous) => {
                if let Some(level) = levels.last_mut() {
                    level.nesting += 1;
                }
            }
            _ if is_binary_operator(*token) => {
                if let Some(level) = levels.last_mut() {
                    level.operators += 1;
                    if level.operators > MAX_OPERATOR_CHAIN {
                        return Err(too_deep(MAX_OPERATOR_CHAIN, location, span));
                    }
                }
            }
            _ => {}
        }

        let depth = levels.len() - 1 + levels.iter().map(|level| level.nesting).sum::<usize>();
        if depth > MAX_NESTING {
            return Err(too_deep(MAX_NESTING, location, span));
        }
        previous = Some(*token);
    }

    Ok(())
}

fn too_deep(limit: usize, location: &SourceLocation, span: &ByteRange<usize>) -> Box<ParseError> {
    Box::new(ParseError::TooDeep {
        limit,
        range: location.range(span.clone()),
    })
}

fn opens_operand(token: Token, previous: Option<Token>) -> bool {
    match token {
        Token::Bang
        | Token::Tilde
        | Token::TypeOf
        | Token::Void
        | Token::Delete
        | Token::Await
        | Token::New
        | Token::Ellipsis
        | Token::Question
        | Token::Arrow
        | Token::Else
        | Token::Assign
        | Token::PlusAssign
        | Token::MinusAssign
        | Token::StarAssign
        | Token::SlashAssign
        | Token::PercentAssign
        | Token::StarStarAssign
        | Token::LessLessAssign
        | Token::GreaterGreaterAssign
        | Token::GreaterGreaterGreaterAssign
        | Token::AmpAssign
        | Token::PipeAssign
        | Token::CaretAssign
        | Token::AmpAmpAssign
        | Token::PipePipeAssign
        | Token::QuestionQuestionAssign => true,
        // Prefix only when no operand came right before
        Token::Plus | Token::Minus | Token::PlusPlus | Token::MinusMinus => !matches!(
            previous,
            Some(
                Token::Identifier
                    | Token::Number
                    | Token::BigInt
                    | Token::String
                    | Token::Template
                    | Token::RegExp
                    | Token::This
                    | Token::True
                    | Token::False
                    | Token::Null
                    | Token::CloseParen
                    | Token::CloseBracket
                    | Token::CloseBrace
            )
        ),
        _ => false,
    }
}

fn is_binary_operator(token: Token) -> bool {
    matches!(
        token,
        Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::StarStar
            | Token::EqualEqual
            | Token::BangEqual
            | Token::EqualEqualEqual
            | Token::BangEqualEqual
            | Token::Less
            | Token::LessEqual
            | Token::Greater
            | Token::GreaterEqual
            | Token::LessLess
            | Token::GreaterGreater
            | Token::GreaterGreaterGreater
            | Token::Amp
            | Token::Pipe
            | Token::Caret
            | Token::AmpAmp
            | Token::PipePipe
            | Token::QuestionQuestion
            | Token::In
            | Token::InstanceOf
            | Token::Dot
            | Token::QuestionDot
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::lexing::tokenize;

    fn check(source: &str) -> ParseResult<()> {
        let tokens = tokenize(source).unwrap();
        check_nesting(&tokens, &SourceLocation::new(source))
    }

    fn limit_of(source: &str) -> Option<usize> {
        match check(source) {
            Ok(()) => None,
            Err(error) => match *error {
                ParseError::TooDeep { limit, .. } => Some(limit),
                other => panic!("unexpected error: {other:?}"),
            },
        }
    }

    #[test]
    fn test_ordinary_code_passes() {
        assert!(check("if (a) { f(x, [1, 2], { b: (c + d) * e }); } else if (b) { g(); }").is_ok());
        assert!(check("x = -a - -b + +c;").is_ok());
    }

    #[test]
    fn test_deep_brackets() {
        let source = format!("{}a{};", "(".repeat(3000), ")".repeat(3000));
        assert_eq!(limit_of(&source), Some(MAX_NESTING));
        let source = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert_eq!(limit_of(&source), Some(MAX_NESTING));
    }

    #[test]
    fn test_deep_prefix_operators() {
        let source = format!("{}a;", "!".repeat(5000));
        assert_eq!(limit_of(&source), Some(MAX_NESTING));
        let source = format!("x = {}a;", "- ".repeat(500));
        assert_eq!(limit_of(&source), Some(MAX_NESTING));
    }

    #[test]
    fn test_long_operator_chain() {
        let source = format!("x = a{};", " + a".repeat(2000));
        assert_eq!(limit_of(&source), Some(MAX_OPERATOR_CHAIN));
        let source = format!("x = a{};", " + a".repeat(500));
        assert_eq!(limit_of(&source), None);
    }

    #[test]
    fn test_statements_reset_the_count() {
        let source = "x = !a;\n".repeat(1000);
        assert_eq!(limit_of(&source), None);
        let source = "if (a) {}\n".repeat(1000);
        assert_eq!(limit_of(&source), None);
    }

    #[test]
    fn test_long_else_if_chain() {
        let source = format!("if (a) {{}}{}", " else if (a) {}".repeat(500));
        assert_eq!(limit_of(&source), Some(MAX_NESTING));
    }
}
