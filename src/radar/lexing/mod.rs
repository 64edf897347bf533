//! Tokenization of javascript source
//!
//! The tokenization is handled by logos; this module pairs tokens with their byte spans,
//! turns lexer failures into [ParseError]s and settles the two tokens whose meaning
//! depends on the previous token. When it does, it restarts logos right after the
//! settled token.

pub mod token;

pub use token::Token;

use crate::radar::ast::SourceLocation;
use crate::radar::parsing::{ParseError, ParseResult};
use logos::Logos;
use std::ops::Range as ByteRange;

/// Tokenize `source`, returning each token with its byte span
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token, ByteRange<usize>)>> {
    let mut tokens: Vec<(Token, ByteRange<usize>)> = Vec::new();
    let mut offset = 0;

    'restart: loop {
        let mut lexer = Token::lexer(&source[offset..]);

        while let Some(result) = lexer.next() {
            let span = offset + lexer.span().start..offset + lexer.span().end;
            match result {
                Ok(Token::QuestionDot) if starts_with_digit(&source[span.end..]) => {
                    tokens.push((Token::Question, span.start..span.start + 1));
                    offset = span.start + 1;
                    continue 'restart;
                }
                Ok(Token::Slash | Token::SlashAssign) if expects_operand(tokens.last()) => {
                    let length = regexp_length(&source[span.start..])
                        .ok_or_else(|| invalid_token(source, span.clone()))?;
                    let end = span.start + length;
                    tokens.push((Token::RegExp, span.start..end));
                    offset = end;
                    continue 'restart;
                }
                Ok(token) => tokens.push((token, span)),
                Err(()) => return Err(invalid_token(source, span)),
            }
        }

        return Ok(tokens);
    }
}

fn invalid_token(source: &str, span: ByteRange<usize>) -> Box<ParseError> {
    let location = SourceLocation::new(source);
    Box::new(ParseError::InvalidToken {
        text: source[span.clone()].to_string(),
        range: location.range(span),
    })
}

fn starts_with_digit(rest: &str) -> bool {
    rest.starts_with(|c: char| c.is_ascii_digit())
}

/// Whether a `/` after `previous` begins an operand rather than a division
fn expects_operand(previous: Option<&(Token, ByteRange<usize>)>) -> bool {
    !matches!(
        previous.map(|(token, _)| token),
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
                | Token::PlusPlus
                | Token::MinusMinus
        )
    )
}

/// Byte length of the regular expression literal at the start of `text`, flags included
fn regexp_length(text: &str) -> Option<usize> {
    let mut in_class = false;
    let mut escaped = false;

    for (index, ch) in text.char_indices().skip(1) {
        match ch {
            '\n' | '\r' => return None,
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let flags = text[index + 1..]
                    .find(|c: char| !c.is_ascii_alphabetic())
                    .unwrap_or(text.len() - index - 1);
                return Some(index + 1 + flags);
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(token, _)| token)
            .collect()
    }

    #[test]
    fn test_tokens_with_spans() {
        let tokens = tokenize("!(x >= 10)").unwrap();
        assert_eq!(
            tokens,
            vec![
                (Token::Bang, 0..1),
                (Token::OpenParen, 1..2),
                (Token::Identifier, 2..3),
                (Token::GreaterEqual, 4..6),
                (Token::Number, 7..9),
                (Token::CloseParen, 9..10),
            ]
        );
    }

    #[test]
    fn test_invalid_token_reports_position() {
        let error = tokenize("a;\nb # c").unwrap_err();
        match *error {
            ParseError::InvalidToken { ref text, ref range } => {
                assert_eq!(text, "#");
                assert_eq!(range.span, 5..6);
                assert_eq!(range.start.line, 1);
            }
            ref other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("  // nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn test_spans_after_block_comment() {
        let tokens = tokenize("/** a */ b").unwrap();
        assert_eq!(tokens, vec![(Token::Identifier, 9..10)]);
    }

    #[test]
    fn test_question_before_fraction() {
        let tokens = tokenize("c ?.5 : 1").unwrap();
        assert_eq!(
            tokens,
            vec![
                (Token::Identifier, 0..1),
                (Token::Question, 2..3),
                (Token::Number, 3..5),
                (Token::Colon, 6..7),
                (Token::Number, 8..9),
            ]
        );
        assert_eq!(
            kinds("a?.b"),
            vec![Token::Identifier, Token::QuestionDot, Token::Identifier]
        );
    }

    #[test]
    fn test_regexp_where_an_operand_is_expected() {
        let tokens = tokenize("x = /a[/]b\\//gi.test(s)").unwrap();
        assert_eq!(tokens[2], (Token::RegExp, 4..15));
        assert_eq!(tokens[3].0, Token::Dot);

        assert_eq!(
            kinds("a / b / c"),
            vec![
                Token::Identifier,
                Token::Slash,
                Token::Identifier,
                Token::Slash,
                Token::Identifier,
            ]
        );
        assert_eq!(kinds("f(/=/)"), vec![
            Token::Identifier,
            Token::OpenParen,
            Token::RegExp,
            Token::CloseParen,
        ]);
    }

    #[test]
    fn test_unterminated_regexp() {
        let error = tokenize("x = /abc\n").unwrap_err();
        assert!(matches!(*error, ParseError::InvalidToken { .. }));
    }
}
