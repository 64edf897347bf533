//! `no-inverted-boolean-check`: negated comparisons
//!
//! `!(a == b)` says the same as `a != b` with more punctuation. The rule reports the
//! negation and offers a fix that rebuilds the comparison from the verbatim text of both
//! operands joined by the opposite operator, so whatever the operands contain (calls,
//! parentheses, odd spacing) is carried over untouched.

use crate::radar::ast::{BinaryOperator, Node, NodeKind, SourceText, UnaryOperator};
use crate::radar::diagnostics::{format_message, Fix, Reporter};
use tracing::trace;

const MESSAGE: &str = "Use the opposite operator ({{invertedOperator}}) instead.";

/// Each comparison and the operator that negates it
pub const INVERTED_OPERATORS: [(BinaryOperator, BinaryOperator); 8] = [
    (BinaryOperator::Equal, BinaryOperator::NotEqual),
    (BinaryOperator::NotEqual, BinaryOperator::Equal),
    (BinaryOperator::StrictEqual, BinaryOperator::StrictNotEqual),
    (BinaryOperator::StrictNotEqual, BinaryOperator::StrictEqual),
    (BinaryOperator::GreaterThan, BinaryOperator::LessThanOrEqual),
    (BinaryOperator::LessThan, BinaryOperator::GreaterThanOrEqual),
    (BinaryOperator::GreaterThanOrEqual, BinaryOperator::LessThan),
    (BinaryOperator::LessThanOrEqual, BinaryOperator::GreaterThan),
];

pub fn inverted_operator(operator: BinaryOperator) -> Option<BinaryOperator> {
    INVERTED_OPERATORS
        .iter()
        .find(|(from, _)| *from == operator)
        .map(|(_, to)| *to)
}

/// Check a unary expression. Anything other than `!` applied to a comparison is ignored.
pub fn check_unary_expression(node: &Node, source: &dyn SourceText, reporter: &mut Reporter) {
    let NodeKind::Unary {
        operator: UnaryOperator::Not,
        argument,
    } = &node.kind
    else {
        return;
    };
    let NodeKind::Binary {
        operator,
        left,
        right,
    } = &argument.kind
    else {
        return;
    };
    let Some(inverted) = inverted_operator(*operator) else {
        return;
    };

    let operands = (
        node.range.as_ref(),
        left.range.as_ref().and_then(|range| source.text(range)),
        right.range.as_ref().and_then(|range| source.text(range)),
    );
    let (Some(range), Some(left), Some(right)) = operands else {
        trace!(rule = %reporter.rule(), "negated comparison without usable text, skipped");
        return;
    };

    let fix = Fix {
        range: range.clone(),
        text: format!("{left} {inverted} {right}"),
    };
    reporter.report_with_fix(
        format_message(MESSAGE, &[("invertedOperator", inverted.as_str())]),
        range,
        fix,
    );
}
