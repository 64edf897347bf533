//! Grammar of the javascript subset, built from chumsky combinators
//!
//!     Every builder takes the [NodeBuilder] for the file being parsed and, where the
//!     construct nests, the recursive `assignment` and `statement` parsers. Expression
//!     builders return the node together with its outer byte span, which includes any
//!     parentheses around it: ESTree gives the node itself the span without them, while
//!     the enclosing node starts and ends at the parentheses.

use super::error::ParseError;
use crate::radar::ast::{
    AssignmentOperator, BinaryOperator, DeclarationKind, Literal, LogicalOperator, Node,
    NodeKind, SourceLocation, UnaryOperator, UpdateOperator,
};
use crate::radar::lexing::Token;
use chumsky::prelude::*;
use std::ops::Range as ByteRange;
use std::str::Chars;

/// Type alias for token with byte span
pub(super) type TokenSpan = (Token, ByteRange<usize>);

/// Type alias for parser error
pub(super) type ParserError = Simple<TokenSpan>;

/// Expression node with its outer byte span
type Spanned = (Node, ByteRange<usize>);

type Expr<'a> = BoxedParser<'a, TokenSpan, Spanned, ParserError>;
type Stmt<'a> = BoxedParser<'a, TokenSpan, Node, ParserError>;

#[derive(Debug, Clone, Copy)]
enum Infix {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Unary(UnaryOperator),
    Update(UpdateOperator),
    Await,
}

enum Suffix {
    Member {
        property: Node,
        computed: bool,
        optional: bool,
    },
    Call {
        arguments: Vec<Node>,
        optional: bool,
    },
}

/// Source text and line index of the file being parsed; turns spans into nodes
pub(super) struct NodeBuilder<'src> {
    source: &'src str,
    location: SourceLocation,
}

impl<'src> NodeBuilder<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            location: SourceLocation::new(source),
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    fn text(&self, span: &ByteRange<usize>) -> &'src str {
        &self.source[span.clone()]
    }

    fn node(&self, kind: NodeKind, span: ByteRange<usize>) -> Node {
        Node::new(kind).at(self.location.range(span))
    }

    fn spanned(&self, kind: NodeKind, span: ByteRange<usize>) -> Spanned {
        (self.node(kind, span.clone()), span)
    }

    /// Verbatim text of `span` as an [NodeKind::Opaque] node
    fn opaque(&self, span: ByteRange<usize>) -> Node {
        let text = self.text(&span).to_string();
        self.node(NodeKind::Opaque { text }, span)
    }

    /// Move `node` to `span`, for statements whose range takes in a trailing `;`
    fn widen(&self, node: Node, span: ByteRange<usize>) -> Node {
        node.at(self.location.range(span))
    }

    fn infix(&self, operator: Infix, (left, left_span): Spanned, (right, right_span): Spanned) -> Spanned {
        let span = left_span.start..right_span.end;
        let (left, right) = (Box::new(left), Box::new(right));
        let kind = match operator {
            Infix::Binary(operator) => NodeKind::Binary {
                operator,
                left,
                right,
            },
            Infix::Logical(operator) => NodeKind::Logical {
                operator,
                left,
                right,
            },
        };
        self.spanned(kind, span)
    }

    fn prefix(&self, operator: Prefix, start: usize, (argument, span): Spanned) -> Spanned {
        let argument = Box::new(argument);
        let kind = match operator {
            Prefix::Unary(operator) => NodeKind::Unary { operator, argument },
            Prefix::Update(operator) => NodeKind::Update {
                operator,
                prefix: true,
                argument,
            },
            Prefix::Await => NodeKind::Await { argument },
        };
        self.spanned(kind, start..span.end)
    }

    fn suffix(&self, (object, span): Spanned, suffix: Suffix, end: usize) -> Spanned {
        let object = Box::new(object);
        let kind = match suffix {
            Suffix::Member {
                property,
                computed,
                optional,
            } => NodeKind::Member {
                object,
                property: Box::new(property),
                computed,
                optional,
            },
            Suffix::Call {
                arguments,
                optional,
            } => NodeKind::Call {
                callee: object,
                arguments,
                optional,
            },
        };
        self.spanned(kind, span.start..end)
    }

    pub fn program(&self, body: Vec<Node>) -> Node {
        self.node(NodeKind::Program { body }, 0..self.source.len())
    }

    /// Convert the first chumsky error into a [ParseError]
    pub fn error(&self, errors: Vec<ParserError>) -> Box<ParseError> {
        let end = self.source.len();
        let Some(error) = errors.into_iter().next() else {
            return Box::new(ParseError::UnexpectedEnd {
                expected: "a statement".to_string(),
                range: self.location.range(end..end),
            });
        };

        let expected = describe_expected(&error);
        let error = match error.found() {
            Some((_, span)) => ParseError::UnexpectedToken {
                found: format!("'{}'", self.text(span)),
                expected,
                range: self.location.range(span.clone()),
            },
            None => ParseError::UnexpectedEnd {
                expected,
                range: self.location.range(end..end),
            },
        };
        Box::new(error)
    }
}

fn describe_expected(error: &ParserError) -> String {
    if let Some(label) = error.label() {
        return label.to_string();
    }
    let mut expected: Vec<&str> = error
        .expected()
        .filter_map(|item| item.as_ref())
        .map(|(token, _)| token.describe())
        .collect();
    expected.sort_unstable();
    expected.dedup();

    match expected.as_slice() {
        [] => "an expression".to_string(),
        [single] => single.to_string(),
        many => many.join(" or "),
    }
}

// Entry points

pub(super) fn program<'a>(
    builder: &'a NodeBuilder<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + 'a {
    statement(builder)
        .repeated()
        .then_ignore(end())
        .map(move |body| builder.program(body))
}

pub(super) fn expression<'a>(
    builder: &'a NodeBuilder<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + 'a {
    full_expression(builder)
        .then_ignore(end())
        .map(|(node, _)| node)
}

fn statement<'a>(builder: &'a NodeBuilder<'a>) -> Stmt<'a> {
    recursive(|statement: Recursive<'a, TokenSpan, Node, ParserError>| {
        let statement = statement.boxed();
        let assignment = recursive(|assignment: Recursive<'a, TokenSpan, Spanned, ParserError>| {
            assignment_layer(builder, assignment.boxed(), statement.clone())
        });
        statement_layer(builder, assignment.boxed(), statement)
    })
    .boxed()
}

fn full_expression<'a>(builder: &'a NodeBuilder<'a>) -> Expr<'a> {
    let assignment = recursive(|assignment: Recursive<'a, TokenSpan, Spanned, ParserError>| {
        let assignment = assignment.boxed();
        let statement = recursive(|statement: Recursive<'a, TokenSpan, Node, ParserError>| {
            statement_layer(builder, assignment.clone(), statement.boxed())
        });
        assignment_layer(builder, assignment, statement.boxed())
    });
    sequence(builder, assignment.boxed())
}

// Tokens

/// Match one token, returning its span
fn token(expected: Token) -> impl Parser<TokenSpan, ByteRange<usize>, Error = ParserError> + Clone {
    filter_map(move |span, (token, range): TokenSpan| {
        if token == expected {
            Ok(range)
        } else {
            Err(ParserError::expected_input_found(
                span,
                [Some((expected, 0..0))],
                Some((token, range)),
            ))
        }
    })
}

/// Match a token that `select` maps to a value
fn operator<'a, T, F>(
    select: F,
) -> impl Parser<TokenSpan, (T, ByteRange<usize>), Error = ParserError> + Clone + 'a
where
    T: 'a,
    F: Fn(Token) -> Option<T> + Clone + 'a,
{
    filter_map(move |span, (token, range): TokenSpan| match select(token) {
        Some(value) => Ok((value, range)),
        None => Err(ParserError::expected_input_found(
            span,
            Vec::new(),
            Some((token, range)),
        )),
    })
}

/// Balanced `open ... close` group, contents unparsed
fn balanced(open: Token, close: Token) -> impl Parser<TokenSpan, (), Error = ParserError> + Clone {
    recursive(move |group| {
        group
            .or(filter(move |(token, _): &TokenSpan| *token != open && *token != close).ignored())
            .repeated()
            .delimited_by(token(open), token(close))
            .ignored()
    })
}

fn identifier<'a>(
    builder: &'a NodeBuilder<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + Clone + 'a {
    token(Token::Identifier).map(move |span| {
        let name = builder.text(&span).to_string();
        builder.node(NodeKind::Identifier { name }, span)
    })
}

/// Name after `.`, where keywords are allowed (`promise.then`, `map.delete`)
fn property_name<'a>(
    builder: &'a NodeBuilder<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + Clone + 'a {
    filter_map(move |span, (token, range): TokenSpan| {
        let text = builder.text(&range);
        if text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$') {
            let name = text.to_string();
            Ok(builder.node(NodeKind::Identifier { name }, range))
        } else {
            Err(ParserError::expected_input_found(
                span,
                [Some((Token::Identifier, 0..0))],
                Some((token, range)),
            ))
        }
    })
}

// Expressions

fn sequence<'a>(builder: &'a NodeBuilder<'a>, assignment: Expr<'a>) -> Expr<'a> {
    assignment
        .clone()
        .then(token(Token::Comma).ignore_then(assignment).repeated())
        .map(move |(first, rest)| {
            let Some(end) = rest.last().map(|(_, span)| span.end) else {
                return first;
            };
            let span = first.1.start..end;
            let expressions = std::iter::once(first)
                .chain(rest)
                .map(|(node, _)| node)
                .collect();
            builder.spanned(NodeKind::Sequence { expressions }, span)
        })
        .boxed()
}

/// One level of the assignment grammar, from primary expressions up
fn assignment_layer<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
    statement: Stmt<'a>,
) -> Expr<'a> {
    let sequence = sequence(builder, assignment.clone());
    let primary = primary(builder, assignment.clone(), sequence.clone(), statement.clone());
    let member = member_call(builder, primary, assignment.clone(), sequence);
    let unary = unary(builder, member);

    let exponent = unary
        .clone()
        .then(token(Token::StarStar).ignore_then(unary).repeated())
        .map(move |(first, mut rest)| {
            // Right-associative: fold from the last operand back
            let Some(mut right) = rest.pop() else {
                return first;
            };
            while let Some(left) = rest.pop() {
                right = builder.infix(Infix::Binary(BinaryOperator::Exponent), left, right);
            }
            builder.infix(Infix::Binary(BinaryOperator::Exponent), first, right)
        })
        .boxed();

    let mut binary = exponent;
    for precedence in (1..=10).rev() {
        binary = infix_level(builder, binary, precedence);
    }

    let conditional = binary
        .then(
            token(Token::Question)
                .ignore_then(assignment.clone())
                .then_ignore(token(Token::Colon))
                .then(assignment.clone())
                .or_not(),
        )
        .map(move |(test, branches)| match branches {
            None => test,
            Some((consequent, alternate)) => {
                let span = test.1.start..alternate.1.end;
                let kind = NodeKind::Conditional {
                    test: Box::new(test.0),
                    consequent: Box::new(consequent.0),
                    alternate: Box::new(alternate.0),
                };
                builder.spanned(kind, span)
            }
        });

    let assign = conditional
        .then(
            operator(assignment_operator)
                .then(assignment.clone())
                .or_not(),
        )
        .map(move |(left, right)| match right {
            None => left,
            Some(((operator, _), right)) => {
                let span = left.1.start..right.1.end;
                let kind = NodeKind::Assignment {
                    operator,
                    left: Box::new(left.0),
                    right: Box::new(right.0),
                };
                builder.spanned(kind, span)
            }
        });

    arrow_function(builder, assignment, statement)
        .or(assign)
        .boxed()
}

fn infix_level<'a>(builder: &'a NodeBuilder<'a>, operand: Expr<'a>, precedence: u8) -> Expr<'a> {
    let infix = operator(move |token| {
        infix_operator(token)
            .filter(|(level, _)| *level == precedence)
            .map(|(_, infix)| infix)
    });
    operand
        .clone()
        .then(infix.then(operand).repeated())
        .foldl(move |left, ((infix, _), right)| builder.infix(infix, left, right))
        .boxed()
}

fn unary<'a>(builder: &'a NodeBuilder<'a>, operand: Expr<'a>) -> Expr<'a> {
    let postfix = operand
        .then(operator(update_operator).or_not())
        .map(move |(argument, update)| match update {
            None => argument,
            Some((operator, range)) => {
                let span = argument.1.start..range.end;
                let kind = NodeKind::Update {
                    operator,
                    prefix: false,
                    argument: Box::new(argument.0),
                };
                builder.spanned(kind, span)
            }
        });

    operator(prefix_operator)
        .repeated()
        .then(postfix)
        .foldr(move |(prefix, range), argument| builder.prefix(prefix, range.start, argument))
        .boxed()
}

/// Member accesses, calls and `new`, applied left to right
fn member_call<'a>(
    builder: &'a NodeBuilder<'a>,
    primary: Expr<'a>,
    assignment: Expr<'a>,
    sequence: Expr<'a>,
) -> Expr<'a> {
    let arguments = arguments(builder, assignment);
    let computed = sequence
        .delimited_by(token(Token::OpenBracket), token(Token::CloseBracket))
        .map(|(property, _)| property);

    let member = choice((
        token(Token::Dot)
            .ignore_then(property_name(builder))
            .map(|property| Suffix::Member {
                property,
                computed: false,
                optional: false,
            }),
        computed.clone().map(|property| Suffix::Member {
            property,
            computed: true,
            optional: false,
        }),
    ))
    .map_with_span(|suffix, span: ByteRange<usize>| (suffix, span.end));

    let optional = token(Token::QuestionDot).ignore_then(choice((
        arguments.clone().map(|arguments| Suffix::Call {
            arguments,
            optional: true,
        }),
        computed.map(|property| Suffix::Member {
            property,
            computed: true,
            optional: true,
        }),
        property_name(builder).map(|property| Suffix::Member {
            property,
            computed: false,
            optional: true,
        }),
    )));
    let call = arguments.clone().map(|arguments| Suffix::Call {
        arguments,
        optional: false,
    });
    let suffix = member.clone().or(call
        .or(optional)
        .map_with_span(|suffix, span: ByteRange<usize>| (suffix, span.end)));

    // `new` takes the member chain after it, and the first argument list only
    let new = recursive(|new: Recursive<'a, TokenSpan, Spanned, ParserError>| {
        token(Token::New)
            .then(
                new.or(primary.clone())
                    .then(member.repeated())
                    .foldl(move |callee, (suffix, end)| builder.suffix(callee, suffix, end)),
            )
            .then(
                arguments
                    .map_with_span(|arguments, span: ByteRange<usize>| (arguments, span.end))
                    .or_not(),
            )
            .map(move |((start, (callee, callee_span)), arguments)| {
                let (arguments, end) = arguments.unwrap_or((Vec::new(), callee_span.end));
                let kind = NodeKind::New {
                    callee: Box::new(callee),
                    arguments,
                };
                builder.spanned(kind, start.start..end)
            })
    });

    new.or(primary)
        .then(suffix.repeated())
        .foldl(move |object, (suffix, end)| builder.suffix(object, suffix, end))
        .boxed()
}

fn arguments<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
) -> impl Parser<TokenSpan, Vec<Node>, Error = ParserError> + Clone + 'a {
    spread_or(builder, assignment)
        .separated_by(token(Token::Comma))
        .allow_trailing()
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
}

/// `...argument`, or a plain assignment expression
fn spread_or<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + Clone + 'a {
    token(Token::Ellipsis)
        .ignore_then(assignment.clone())
        .map_with_span(move |(argument, _), span| {
            let kind = NodeKind::Spread {
                argument: Box::new(argument),
            };
            builder.node(kind, span)
        })
        .or(assignment.map(|(node, _)| node))
}

fn primary<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
    sequence: Expr<'a>,
    statement: Stmt<'a>,
) -> Expr<'a> {
    let parenthesized = sequence
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .map_with_span(|(node, _), span| (node, span));

    choice((
        literal(builder),
        identifier(builder).map_with_span(|node, span| (node, span)),
        array(builder, assignment.clone()),
        object(builder),
        function(builder, assignment, statement, false),
        parenthesized,
    ))
    .boxed()
}

fn literal<'a>(
    builder: &'a NodeBuilder<'a>,
) -> impl Parser<TokenSpan, Spanned, Error = ParserError> + Clone + 'a {
    filter_map(move |span, (token, range): TokenSpan| {
        let text = builder.text(&range);
        let kind = match token {
            Token::Number => number_value(text).map(|value| NodeKind::Literal(Literal::Number(value))),
            Token::BigInt => Some(NodeKind::Literal(Literal::BigInt(
                text.trim_end_matches('n').to_string(),
            ))),
            Token::String => Some(NodeKind::Literal(Literal::String(cook_string(text)))),
            Token::RegExp => regexp_literal(text),
            Token::Template => Some(NodeKind::Opaque {
                text: text.to_string(),
            }),
            Token::True => Some(NodeKind::Literal(Literal::Boolean(true))),
            Token::False => Some(NodeKind::Literal(Literal::Boolean(false))),
            Token::Null => Some(NodeKind::Literal(Literal::Null)),
            Token::This => Some(NodeKind::This),
            _ => None,
        };
        match kind {
            Some(kind) => Ok(builder.spanned(kind, range)),
            None => Err(ParserError::expected_input_found(
                span,
                Vec::new(),
                Some((token, range)),
            )),
        }
    })
}

/// `None` elements are holes; a single trailing comma does not add one
fn array<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
) -> impl Parser<TokenSpan, Spanned, Error = ParserError> + Clone + 'a {
    spread_or(builder, assignment)
        .or_not()
        .separated_by(token(Token::Comma))
        .delimited_by(token(Token::OpenBracket), token(Token::CloseBracket))
        .map_with_span(move |mut elements, span| {
            if matches!(elements.last(), Some(None)) {
                elements.pop();
            }
            builder.spanned(NodeKind::Array { elements }, span)
        })
}

/// Object literals are not modeled; keep the balanced braces as verbatim text
fn object<'a>(
    builder: &'a NodeBuilder<'a>,
) -> impl Parser<TokenSpan, Spanned, Error = ParserError> + Clone + 'a {
    balanced(Token::OpenBrace, Token::CloseBrace)
        .map_with_span(move |(), span: ByteRange<usize>| (builder.opaque(span.clone()), span))
}

fn function<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
    statement: Stmt<'a>,
    declaration: bool,
) -> Expr<'a> {
    let name = if declaration {
        identifier(builder).map(Some).boxed()
    } else {
        identifier(builder).or_not().boxed()
    };

    token(Token::Async)
        .or_not()
        .then_ignore(token(Token::Function))
        .then(name)
        .then(parameters(builder, assignment))
        .then(block(builder, statement))
        .map_with_span(move |(((is_async, id), params), body), span| {
            let kind = NodeKind::Function {
                id: id.map(Box::new),
                params,
                body: Box::new(body),
                is_async: is_async.is_some(),
            };
            builder.spanned(kind, span)
        })
        .boxed()
}

fn arrow_function<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
    statement: Stmt<'a>,
) -> Expr<'a> {
    // Looked up ahead over balanced parentheses, so a parenthesized expression that is
    // not a parameter list is only parsed once
    let head = token(Token::Async)
        .or_not()
        .then(token(Token::Identifier).ignored().or(balanced(Token::OpenParen, Token::CloseParen)))
        .then(token(Token::Arrow))
        .rewind();

    let params = identifier(builder)
        .map(|name| vec![name])
        .or(parameters(builder, assignment.clone()));
    let body = block(builder, statement).or(assignment.map(|(node, _)| node));

    head.ignore_then(token(Token::Async).or_not())
        .then(params)
        .then_ignore(token(Token::Arrow))
        .then(body)
        .map_with_span(move |((is_async, params), body), span| {
            let kind = NodeKind::ArrowFunction {
                params,
                body: Box::new(body),
                is_async: is_async.is_some(),
            };
            builder.spanned(kind, span)
        })
        .boxed()
}

/// Binding target: a name, or a destructuring pattern
fn binding<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + Clone + 'a {
    identifier(builder)
        .or(object(builder).map(|(node, _)| node))
        .or(array(builder, assignment).map(|(node, _)| node))
}

fn parameters<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
) -> BoxedParser<'a, TokenSpan, Vec<Node>, ParserError> {
    let binding = binding(builder, assignment.clone());

    let rest = token(Token::Ellipsis)
        .ignore_then(binding.clone())
        .map_with_span(move |argument, span| {
            let kind = NodeKind::Spread {
                argument: Box::new(argument),
            };
            builder.node(kind, span)
        });

    let with_default = binding
        .then(token(Token::Assign).ignore_then(assignment).or_not())
        .map_with_span(move |(target, default), span| match default {
            None => target,
            Some((value, _)) => {
                let kind = NodeKind::Assignment {
                    operator: AssignmentOperator::Assign,
                    left: Box::new(target),
                    right: Box::new(value),
                };
                builder.node(kind, span)
            }
        });

    rest.or(with_default)
        .separated_by(token(Token::Comma))
        .allow_trailing()
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .boxed()
}

// Statements

fn block<'a>(
    builder: &'a NodeBuilder<'a>,
    statement: Stmt<'a>,
) -> impl Parser<TokenSpan, Node, Error = ParserError> + Clone + 'a {
    statement
        .repeated()
        .delimited_by(token(Token::OpenBrace), token(Token::CloseBrace))
        .map_with_span(move |body, span| builder.node(NodeKind::Block { body }, span))
}

/// `var`/`let`/`const` and its declarators, without the trailing `;`
fn declaration<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
) -> BoxedParser<'a, TokenSpan, Node, ParserError> {
    let declarator = binding(builder, assignment.clone())
        .then(token(Token::Assign).ignore_then(assignment).or_not())
        .map_with_span(move |(id, init), span| {
            let kind = NodeKind::VariableDeclarator {
                id: Box::new(id),
                init: init.map(|(node, _)| Box::new(node)),
            };
            builder.node(kind, span)
        });

    operator(declaration_kind)
        .then(declarator.separated_by(token(Token::Comma)).at_least(1))
        .map_with_span(move |((kind, _), declarations), span| {
            builder.node(NodeKind::VariableDeclaration { kind, declarations }, span)
        })
        .boxed()
}

fn statement_layer<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
    statement: Stmt<'a>,
) -> Stmt<'a> {
    let expression = sequence(builder, assignment.clone());
    let condition = expression
        .clone()
        .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
        .map(|(node, _)| node);
    let semicolon = token(Token::Semicolon).or_not();
    let block = block(builder, statement.clone());
    let declaration = declaration(builder, assignment.clone());
    let binding = binding(builder, assignment.clone());

    let empty = token(Token::Semicolon).map(move |span| builder.node(NodeKind::Empty, span));

    let variable = declaration
        .clone()
        .then_ignore(semicolon.clone())
        .map_with_span(move |node, span| builder.widen(node, span));

    let function_declaration =
        function(builder, assignment.clone(), statement.clone(), true).map(|(node, _)| node);

    let class = token(Token::Class)
        .then(filter(|(token, _): &TokenSpan| *token != Token::OpenBrace).repeated())
        .then(balanced(Token::OpenBrace, Token::CloseBrace))
        .map_with_span(move |_, span| builder.opaque(span));

    let if_statement = token(Token::If)
        .ignore_then(condition.clone())
        .then(statement.clone())
        .then(token(Token::Else).ignore_then(statement.clone()).or_not())
        .map_with_span(move |((test, consequent), alternate), span| {
            let kind = NodeKind::If {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: alternate.map(Box::new),
            };
            builder.node(kind, span)
        });

    let for_each = {
        let declarator = binding.clone().map_with_span(move |id, span| {
            let kind = NodeKind::VariableDeclarator {
                id: Box::new(id),
                init: None,
            };
            builder.node(kind, span)
        });
        let declared = operator(declaration_kind).then(declarator).map_with_span(
            move |((kind, _), declarator), span| {
                let declarations = vec![declarator];
                builder.node(NodeKind::VariableDeclaration { kind, declarations }, span)
            },
        );
        let of = filter(move |(token, range): &TokenSpan| {
            *token == Token::Identifier && builder.text(range) == "of"
        });
        let each = token(Token::In).to(false).or(of.to(true));

        token(Token::For)
            .ignore_then(
                declared
                    .or(binding.clone())
                    .then(each)
                    .then(expression.clone())
                    .delimited_by(token(Token::OpenParen), token(Token::CloseParen)),
            )
            .then(statement.clone())
            .map_with_span(move |(((left, of), (right, _)), body), span| {
                let (left, right, body) = (Box::new(left), Box::new(right), Box::new(body));
                let kind = if of {
                    NodeKind::ForOf { left, right, body }
                } else {
                    NodeKind::ForIn { left, right, body }
                };
                builder.node(kind, span)
            })
    };

    let for_statement = {
        let init = declaration
            .clone()
            .or(expression.clone().map(|(node, _)| node));
        let clause = expression.clone().map(|(node, _)| Box::new(node)).or_not();

        token(Token::For)
            .ignore_then(
                init.or_not()
                    .then_ignore(token(Token::Semicolon))
                    .then(clause.clone())
                    .then_ignore(token(Token::Semicolon))
                    .then(clause)
                    .delimited_by(token(Token::OpenParen), token(Token::CloseParen)),
            )
            .then(statement.clone())
            .map_with_span(move |(((init, test), update), body), span| {
                let kind = NodeKind::For {
                    init: init.map(Box::new),
                    test,
                    update,
                    body: Box::new(body),
                };
                builder.node(kind, span)
            })
    };

    let while_statement = token(Token::While)
        .ignore_then(condition.clone())
        .then(statement.clone())
        .map_with_span(move |(test, body), span| {
            let kind = NodeKind::While {
                test: Box::new(test),
                body: Box::new(body),
            };
            builder.node(kind, span)
        });

    let do_while = token(Token::Do)
        .ignore_then(statement.clone())
        .then_ignore(token(Token::While))
        .then(condition)
        .then_ignore(semicolon.clone())
        .map_with_span(move |(body, test), span| {
            let kind = NodeKind::DoWhile {
                body: Box::new(body),
                test: Box::new(test),
            };
            builder.node(kind, span)
        });

    let return_statement = token(Token::Return)
        .ignore_then(expression.clone().or_not())
        .then_ignore(semicolon.clone())
        .map_with_span(move |argument, span| {
            let argument = argument.map(|(node, _)| Box::new(node));
            builder.node(NodeKind::Return { argument }, span)
        });

    let label = identifier(builder).map(Box::new).or_not();
    let break_statement = token(Token::Break)
        .ignore_then(label.clone())
        .then_ignore(semicolon.clone())
        .map_with_span(move |label, span| builder.node(NodeKind::Break { label }, span));
    let continue_statement = token(Token::Continue)
        .ignore_then(label)
        .then_ignore(semicolon.clone())
        .map_with_span(move |label, span| builder.node(NodeKind::Continue { label }, span));

    let throw = token(Token::Throw)
        .ignore_then(expression.clone())
        .then_ignore(semicolon.clone())
        .map_with_span(move |(argument, _), span| {
            let kind = NodeKind::Throw {
                argument: Box::new(argument),
            };
            builder.node(kind, span)
        });

    let try_statement = {
        let catch = token(Token::Catch)
            .ignore_then(
                binding
                    .delimited_by(token(Token::OpenParen), token(Token::CloseParen))
                    .or_not(),
            )
            .then(block.clone())
            .map_with_span(move |(param, body), span| {
                let kind = NodeKind::CatchClause {
                    param: param.map(Box::new),
                    body: Box::new(body),
                };
                builder.node(kind, span)
            });

        token(Token::Try)
            .ignore_then(block.clone())
            .then(catch.or_not())
            .then(token(Token::Finally).ignore_then(block.clone()).or_not())
            .map_with_span(move |((block, handler), finalizer), span| {
                let kind = NodeKind::Try {
                    block: Box::new(block),
                    handler: handler.map(Box::new),
                    finalizer: finalizer.map(Box::new),
                };
                builder.node(kind, span)
            })
    };

    let switch = {
        let test = token(Token::Case)
            .ignore_then(expression.clone())
            .map(|(node, _)| Some(Box::new(node)))
            .or(token(Token::Default).to(None));
        let case = test
            .then_ignore(token(Token::Colon))
            .then(statement.clone().repeated())
            .map_with_span(move |(test, consequent), span| {
                builder.node(NodeKind::SwitchCase { test, consequent }, span)
            });

        token(Token::Switch)
            .ignore_then(
                expression
                    .clone()
                    .delimited_by(token(Token::OpenParen), token(Token::CloseParen)),
            )
            .then(
                case.repeated()
                    .delimited_by(token(Token::OpenBrace), token(Token::CloseBrace)),
            )
            .map_with_span(move |((discriminant, _), cases), span| {
                let kind = NodeKind::Switch {
                    discriminant: Box::new(discriminant),
                    cases,
                };
                builder.node(kind, span)
            })
    };

    let labeled = identifier(builder)
        .then_ignore(token(Token::Colon))
        .then(statement.clone())
        .map_with_span(move |(label, body), span| {
            let kind = NodeKind::Labeled {
                label: Box::new(label),
                body: Box::new(body),
            };
            builder.node(kind, span)
        });

    let expression_statement = expression
        .clone()
        .then_ignore(semicolon.clone())
        .map_with_span(move |(expression, _), span| {
            let kind = NodeKind::ExpressionStatement {
                expression: Box::new(expression),
            };
            builder.node(kind, span)
        });
    // A statement starting with `{`, `function` or `class` is never an expression
    let guarded_expression_statement = filter(|(token, _): &TokenSpan| {
        !matches!(token, Token::OpenBrace | Token::Function | Token::Class)
    })
    .rewind()
    .ignore_then(expression_statement.clone());

    let module = module_declaration(
        builder,
        assignment,
        statement.clone(),
        class.clone().boxed(),
        expression_statement.boxed(),
    );

    choice((
        block,
        empty,
        variable,
        function_declaration,
        class,
        if_statement,
        for_each,
        for_statement,
        while_statement,
        do_while,
    ))
    .or(choice((
        return_statement,
        break_statement,
        continue_statement,
        throw,
        try_statement,
        switch,
        module,
        labeled,
        guarded_expression_statement,
    )))
    .boxed()
}

/// `import` and `export`. Exported declarations parse as the declaration itself; the
/// other forms are kept as opaque text.
fn module_declaration<'a>(
    builder: &'a NodeBuilder<'a>,
    assignment: Expr<'a>,
    statement: Stmt<'a>,
    class: Stmt<'a>,
    expression_statement: Stmt<'a>,
) -> Stmt<'a> {
    let semicolon = token(Token::Semicolon).or_not();
    let from = filter(move |(token, range): &TokenSpan| {
        *token == Token::Identifier && builder.text(range) == "from"
    })
    .then(token(Token::String));

    let import = token(Token::Import)
        .then(filter(|(token, _): &TokenSpan| *token != Token::String).repeated())
        .then(token(Token::String))
        .then(semicolon.clone())
        .map_with_span(move |_, span| builder.opaque(span));

    let export_all = token(Token::Export)
        .then(token(Token::Star))
        .then(filter(|(token, _): &TokenSpan| *token != Token::String).repeated())
        .then(token(Token::String))
        .then(semicolon.clone())
        .map_with_span(move |_, span| builder.opaque(span));

    let export_list = token(Token::Export)
        .then(balanced(Token::OpenBrace, Token::CloseBrace))
        .then(from.or_not())
        .then(semicolon)
        .map_with_span(move |_, span| builder.opaque(span));

    let export_default = token(Token::Export)
        .then(token(Token::Default))
        .ignore_then(
            function(builder, assignment, statement.clone(), false)
                .map(|(node, _)| node)
                .or(class)
                .or(expression_statement),
        );

    let export_declaration = token(Token::Export).ignore_then(statement);

    choice((import, export_all, export_list, export_default, export_declaration)).boxed()
}

// Operator tables

fn infix_operator(token: Token) -> Option<(u8, Infix)> {
    use BinaryOperator as B;

    let entry = match token {
        Token::QuestionQuestion => (1, Infix::Logical(LogicalOperator::NullishCoalescing)),
        Token::PipePipe => (1, Infix::Logical(LogicalOperator::Or)),
        Token::AmpAmp => (2, Infix::Logical(LogicalOperator::And)),
        Token::Pipe => (3, Infix::Binary(B::BitOr)),
        Token::Caret => (4, Infix::Binary(B::BitXor)),
        Token::Amp => (5, Infix::Binary(B::BitAnd)),
        Token::EqualEqual => (6, Infix::Binary(B::Equal)),
        Token::BangEqual => (6, Infix::Binary(B::NotEqual)),
        Token::EqualEqualEqual => (6, Infix::Binary(B::StrictEqual)),
        Token::BangEqualEqual => (6, Infix::Binary(B::StrictNotEqual)),
        Token::Less => (7, Infix::Binary(B::LessThan)),
        Token::LessEqual => (7, Infix::Binary(B::LessThanOrEqual)),
        Token::Greater => (7, Infix::Binary(B::GreaterThan)),
        Token::GreaterEqual => (7, Infix::Binary(B::GreaterThanOrEqual)),
        Token::InstanceOf => (7, Infix::Binary(B::InstanceOf)),
        Token::In => (7, Infix::Binary(B::In)),
        Token::LessLess => (8, Infix::Binary(B::LeftShift)),
        Token::GreaterGreater => (8, Infix::Binary(B::RightShift)),
        Token::GreaterGreaterGreater => (8, Infix::Binary(B::UnsignedRightShift)),
        Token::Plus => (9, Infix::Binary(B::Add)),
        Token::Minus => (9, Infix::Binary(B::Subtract)),
        Token::Star => (10, Infix::Binary(B::Multiply)),
        Token::Slash => (10, Infix::Binary(B::Divide)),
        Token::Percent => (10, Infix::Binary(B::Remainder)),
        _ => return None,
    };
    Some(entry)
}

fn prefix_operator(token: Token) -> Option<Prefix> {
    let prefix = match token {
        Token::Bang => Prefix::Unary(UnaryOperator::Not),
        Token::Minus => Prefix::Unary(UnaryOperator::Minus),
        Token::Plus => Prefix::Unary(UnaryOperator::Plus),
        Token::Tilde => Prefix::Unary(UnaryOperator::BitNot),
        Token::TypeOf => Prefix::Unary(UnaryOperator::TypeOf),
        Token::Void => Prefix::Unary(UnaryOperator::Void),
        Token::Delete => Prefix::Unary(UnaryOperator::Delete),
        Token::PlusPlus => Prefix::Update(UpdateOperator::Increment),
        Token::MinusMinus => Prefix::Update(UpdateOperator::Decrement),
        Token::Await => Prefix::Await,
        _ => return None,
    };
    Some(prefix)
}

fn update_operator(token: Token) -> Option<UpdateOperator> {
    match token {
        Token::PlusPlus => Some(UpdateOperator::Increment),
        Token::MinusMinus => Some(UpdateOperator::Decrement),
        _ => None,
    }
}

fn assignment_operator(token: Token) -> Option<AssignmentOperator> {
    use AssignmentOperator as A;

    let operator = match token {
        Token::Assign => A::Assign,
        Token::PlusAssign => A::AddAssign,
        Token::MinusAssign => A::SubtractAssign,
        Token::StarAssign => A::MultiplyAssign,
        Token::SlashAssign => A::DivideAssign,
        Token::PercentAssign => A::RemainderAssign,
        Token::StarStarAssign => A::ExponentAssign,
        Token::LessLessAssign => A::LeftShiftAssign,
        Token::GreaterGreaterAssign => A::RightShiftAssign,
        Token::GreaterGreaterGreaterAssign => A::UnsignedRightShiftAssign,
        Token::AmpAssign => A::BitAndAssign,
        Token::PipeAssign => A::BitOrAssign,
        Token::CaretAssign => A::BitXorAssign,
        Token::AmpAmpAssign => A::AndAssign,
        Token::PipePipeAssign => A::OrAssign,
        Token::QuestionQuestionAssign => A::NullishAssign,
        _ => return None,
    };
    Some(operator)
}

fn declaration_kind(token: Token) -> Option<DeclarationKind> {
    match token {
        Token::Var => Some(DeclarationKind::Var),
        Token::Let => Some(DeclarationKind::Let),
        Token::Const => Some(DeclarationKind::Const),
        _ => None,
    }
}

// Literal values

fn number_value(text: &str) -> Option<f64> {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return text.parse().ok(),
    };
    // Accumulated in f64, digits may run past 64 bits
    text[2..].chars().try_fold(0f64, |value, ch| {
        ch.to_digit(radix)
            .map(|digit| value * f64::from(radix) + f64::from(digit))
    })
}

/// Split `/pattern/flags`
fn regexp_literal(text: &str) -> Option<NodeKind> {
    let close = text.rfind('/').filter(|&close| close > 0)?;
    Some(NodeKind::Literal(Literal::RegExp {
        pattern: text[1..close].to_string(),
        flags: text[close + 1..].to_string(),
    }))
}

/// Decode the escapes of a quoted string literal
fn cook_string(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut cooked = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            cooked.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => cooked.push('\n'),
            Some('t') => cooked.push('\t'),
            Some('r') => cooked.push('\r'),
            Some('b') => cooked.push('\u{8}'),
            Some('f') => cooked.push('\u{c}'),
            Some('v') => cooked.push('\u{b}'),
            Some('0') => cooked.push('\0'),
            Some('x') => cooked.extend(hex_escape(&mut chars, 2)),
            Some('u') => cooked.extend(unicode_escape(&mut chars)),
            Some(other) => cooked.push(other),
            None => {}
        }
    }

    cooked
}

fn hex_escape(chars: &mut Chars, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}

fn unicode_escape(chars: &mut Chars) -> Option<char> {
    if chars.clone().next() != Some('{') {
        return hex_escape(chars, 4);
    }
    chars.next();
    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}
