//! `no-identical-conditions`: related `if`/`else if` branches testing the same condition
//!
//! The second of two identical conditions in a chain can never be taken, which is almost
//! always a copy-paste bug:
//!
//! ```text
//! if (x > 0) { a(); } else if (x > 0) { b(); }
//! ```
//!
//! The scan starts at the head of a chain and compares every `else if` test against the
//! head's test. Each duplicate is reported on its own, always pointing back at the head's
//! condition as the "Original".

use crate::radar::ast::{Node, NodeKind};
use crate::radar::diagnostics::Reporter;
use crate::radar::equivalence::are_equivalent;
use tracing::trace;

/// Scan the chain headed by `node`. Anything other than an `if` statement is ignored.
///
/// Call this for chain heads only: an `if` that is itself the `else` branch of another
/// `if` has already been walked as part of that chain.
pub fn check_if_statement(node: &Node, reporter: &mut Reporter) {
    let NodeKind::If {
        test: condition,
        alternate,
        ..
    } = &node.kind
    else {
        return;
    };

    let mut statement = alternate.as_deref();
    while let Some(NodeKind::If {
        test, alternate, ..
    }) = statement.map(|s| &s.kind)
    {
        if are_equivalent(condition, test) {
            report_duplicate(node, condition, test, reporter);
        }
        statement = alternate.as_deref();
    }
}

fn report_duplicate(head: &Node, original: &Node, duplicate: &Node, reporter: &mut Reporter) {
    let (Some(head_range), Some(original_range), Some(duplicate_range)) =
        (&head.range, &original.range, &duplicate.range)
    else {
        trace!(rule = %reporter.rule(), "duplicate condition without location, skipped");
        return;
    };

    let line = head_range.start.display_line();
    reporter.report(
        format!("This branch duplicates the one on line {line}"),
        duplicate_range,
        [(original_range.clone(), "Original")],
    );
}
