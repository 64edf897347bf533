//! Structural equivalence of two subtrees
//!
//!     Two nodes are equivalent when they have the same kind, the same operators and
//!     pairwise equivalent children in the same positions. Ranges are ignored, so two
//!     occurrences of the same code anywhere in a file compare equal, while `a < b` and
//!     `b < a` do not.
//!
//!     Literals compare by kind and value: `1` and `1.0` are the same number, `1` and `"1"`
//!     differ. Strings compare by their cooked value, so `'a'` and `"a"` are equal.
//!
//!     Nodes of different kinds are never equivalent. Constructs that only exist as
//!     [NodeKind::Opaque] compare by verbatim text; this is the only place where text
//!     matters.
//!
//!     The comparison is total, symmetric and reflexive, and stops at the first mismatch.

use super::ast::{Literal, Node, NodeKind};

/// Whether `a` and `b` are structurally identical
pub fn are_equivalent(a: &Node, b: &Node) -> bool {
    use NodeKind::*;

    match (&a.kind, &b.kind) {
        (Identifier { name: x }, Identifier { name: y }) => x == y,
        (NodeKind::Literal(x), NodeKind::Literal(y)) => literals_equal(x, y),
        (This, This) | (Empty, Empty) => true,
        (Opaque { text: x }, Opaque { text: y }) => x == y,

        (
            Binary {
                operator: op_a,
                left: left_a,
                right: right_a,
            },
            Binary {
                operator: op_b,
                left: left_b,
                right: right_b,
            },
        ) => op_a == op_b && are_equivalent(left_a, left_b) && are_equivalent(right_a, right_b),
        (
            Logical {
                operator: op_a,
                left: left_a,
                right: right_a,
            },
            Logical {
                operator: op_b,
                left: left_b,
                right: right_b,
            },
        ) => op_a == op_b && are_equivalent(left_a, left_b) && are_equivalent(right_a, right_b),
        (
            Assignment {
                operator: op_a,
                left: left_a,
                right: right_a,
            },
            Assignment {
                operator: op_b,
                left: left_b,
                right: right_b,
            },
        ) => op_a == op_b && are_equivalent(left_a, left_b) && are_equivalent(right_a, right_b),
        (
            Unary {
                operator: op_a,
                argument: arg_a,
            },
            Unary {
                operator: op_b,
                argument: arg_b,
            },
        ) => op_a == op_b && are_equivalent(arg_a, arg_b),
        (
            Update {
                operator: op_a,
                prefix: prefix_a,
                argument: arg_a,
            },
            Update {
                operator: op_b,
                prefix: prefix_b,
                argument: arg_b,
            },
        ) => op_a == op_b && prefix_a == prefix_b && are_equivalent(arg_a, arg_b),
        (
            Conditional {
                test: test_a,
                consequent: cons_a,
                alternate: alt_a,
            },
            Conditional {
                test: test_b,
                consequent: cons_b,
                alternate: alt_b,
            },
        ) => {
            are_equivalent(test_a, test_b)
                && are_equivalent(cons_a, cons_b)
                && are_equivalent(alt_a, alt_b)
        }
        (
            Call {
                callee: callee_a,
                arguments: args_a,
                optional: opt_a,
            },
            Call {
                callee: callee_b,
                arguments: args_b,
                optional: opt_b,
            },
        ) => opt_a == opt_b && are_equivalent(callee_a, callee_b) && all_equivalent(args_a, args_b),
        (
            New {
                callee: callee_a,
                arguments: args_a,
            },
            New {
                callee: callee_b,
                arguments: args_b,
            },
        ) => are_equivalent(callee_a, callee_b) && all_equivalent(args_a, args_b),
        (
            Member {
                object: obj_a,
                property: prop_a,
                computed: computed_a,
                optional: opt_a,
            },
            Member {
                object: obj_b,
                property: prop_b,
                computed: computed_b,
                optional: opt_b,
            },
        ) => {
            computed_a == computed_b
                && opt_a == opt_b
                && are_equivalent(obj_a, obj_b)
                && are_equivalent(prop_a, prop_b)
        }
        (Array { elements: x }, Array { elements: y }) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y)
                    .all(|(a, b)| optional_equivalent(a.as_ref(), b.as_ref()))
        }
        (Sequence { expressions: x }, Sequence { expressions: y }) => all_equivalent(x, y),
        (Spread { argument: x }, Spread { argument: y })
        | (Await { argument: x }, Await { argument: y })
        | (Throw { argument: x }, Throw { argument: y }) => are_equivalent(x, y),
        (
            ArrowFunction {
                params: params_a,
                body: body_a,
                is_async: async_a,
            },
            ArrowFunction {
                params: params_b,
                body: body_b,
                is_async: async_b,
            },
        ) => async_a == async_b && all_equivalent(params_a, params_b) && are_equivalent(body_a, body_b),

        (Program { body: x }, Program { body: y }) | (Block { body: x }, Block { body: y }) => {
            all_equivalent(x, y)
        }
        (ExpressionStatement { expression: x }, ExpressionStatement { expression: y }) => {
            are_equivalent(x, y)
        }
        (
            If {
                test: test_a,
                consequent: cons_a,
                alternate: alt_a,
            },
            If {
                test: test_b,
                consequent: cons_b,
                alternate: alt_b,
            },
        ) => {
            are_equivalent(test_a, test_b)
                && are_equivalent(cons_a, cons_b)
                && optional_equivalent(alt_a.as_deref(), alt_b.as_deref())
        }
        (
            While {
                test: test_a,
                body: body_a,
            },
            While {
                test: test_b,
                body: body_b,
            },
        ) => are_equivalent(test_a, test_b) && are_equivalent(body_a, body_b),
        (
            DoWhile {
                body: body_a,
                test: test_a,
            },
            DoWhile {
                body: body_b,
                test: test_b,
            },
        ) => are_equivalent(body_a, body_b) && are_equivalent(test_a, test_b),
        (
            For {
                init: init_a,
                test: test_a,
                update: update_a,
                body: body_a,
            },
            For {
                init: init_b,
                test: test_b,
                update: update_b,
                body: body_b,
            },
        ) => {
            optional_equivalent(init_a.as_deref(), init_b.as_deref())
                && optional_equivalent(test_a.as_deref(), test_b.as_deref())
                && optional_equivalent(update_a.as_deref(), update_b.as_deref())
                && are_equivalent(body_a, body_b)
        }
        (
            ForIn {
                left: left_a,
                right: right_a,
                body: body_a,
            },
            ForIn {
                left: left_b,
                right: right_b,
                body: body_b,
            },
        )
        | (
            ForOf {
                left: left_a,
                right: right_a,
                body: body_a,
            },
            ForOf {
                left: left_b,
                right: right_b,
                body: body_b,
            },
        ) => {
            are_equivalent(left_a, left_b)
                && are_equivalent(right_a, right_b)
                && are_equivalent(body_a, body_b)
        }
        (Return { argument: x }, Return { argument: y }) => {
            optional_equivalent(x.as_deref(), y.as_deref())
        }
        (Break { label: x }, Break { label: y }) | (Continue { label: x }, Continue { label: y }) => {
            optional_equivalent(x.as_deref(), y.as_deref())
        }
        (
            Try {
                block: block_a,
                handler: handler_a,
                finalizer: final_a,
            },
            Try {
                block: block_b,
                handler: handler_b,
                finalizer: final_b,
            },
        ) => {
            are_equivalent(block_a, block_b)
                && optional_equivalent(handler_a.as_deref(), handler_b.as_deref())
                && optional_equivalent(final_a.as_deref(), final_b.as_deref())
        }
        (
            CatchClause {
                param: param_a,
                body: body_a,
            },
            CatchClause {
                param: param_b,
                body: body_b,
            },
        ) => optional_equivalent(param_a.as_deref(), param_b.as_deref()) && are_equivalent(body_a, body_b),
        (
            Switch {
                discriminant: disc_a,
                cases: cases_a,
            },
            Switch {
                discriminant: disc_b,
                cases: cases_b,
            },
        ) => are_equivalent(disc_a, disc_b) && all_equivalent(cases_a, cases_b),
        (
            SwitchCase {
                test: test_a,
                consequent: cons_a,
            },
            SwitchCase {
                test: test_b,
                consequent: cons_b,
            },
        ) => optional_equivalent(test_a.as_deref(), test_b.as_deref()) && all_equivalent(cons_a, cons_b),
        (
            Labeled {
                label: label_a,
                body: body_a,
            },
            Labeled {
                label: label_b,
                body: body_b,
            },
        ) => are_equivalent(label_a, label_b) && are_equivalent(body_a, body_b),
        (
            VariableDeclaration {
                kind: kind_a,
                declarations: decl_a,
            },
            VariableDeclaration {
                kind: kind_b,
                declarations: decl_b,
            },
        ) => kind_a == kind_b && all_equivalent(decl_a, decl_b),
        (
            VariableDeclarator {
                id: id_a,
                init: init_a,
            },
            VariableDeclarator {
                id: id_b,
                init: init_b,
            },
        ) => are_equivalent(id_a, id_b) && optional_equivalent(init_a.as_deref(), init_b.as_deref()),
        (
            Function {
                id: id_a,
                params: params_a,
                body: body_a,
                is_async: async_a,
            },
            Function {
                id: id_b,
                params: params_b,
                body: body_b,
                is_async: async_b,
            },
        ) => {
            async_a == async_b
                && optional_equivalent(id_a.as_deref(), id_b.as_deref())
                && all_equivalent(params_a, params_b)
                && are_equivalent(body_a, body_b)
        }

        _ => false,
    }
}

/// Same length and pairwise equivalent in order
fn all_equivalent(a: &[Node], b: &[Node]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| are_equivalent(x, y))
}

/// Absent slots only match absent slots
fn optional_equivalent(a: Option<&Node>, b: Option<&Node>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => are_equivalent(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn literals_equal(a: &Literal, b: &Literal) -> bool {
    match (a, b) {
        // Bitwise so that a NaN built by hand still equals itself
        (Literal::Number(x), Literal::Number(y)) => x.to_bits() == y.to_bits(),
        (Literal::String(x), Literal::String(y)) => x == y,
        (Literal::Boolean(x), Literal::Boolean(y)) => x == y,
        (Literal::Null, Literal::Null) => true,
        (Literal::BigInt(x), Literal::BigInt(y)) => x == y,
        (
            Literal::RegExp {
                pattern: pattern_a,
                flags: flags_a,
            },
            Literal::RegExp {
                pattern: pattern_b,
                flags: flags_b,
            },
        ) => pattern_a == pattern_b && flags_a == flags_b,
        _ => false,
    }
}
