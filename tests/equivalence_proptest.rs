//! Property-based tests for structural equivalence
//!
//! Expressions are generated as source text, parsed twice and compared. Parsing the same text
//! twice gives two trees with no shared nodes, so reflexivity is checked on independent trees.

use proptest::prelude::*;
use radar::radar::equivalence::are_equivalent;
use radar::radar::parsing::parse_expression;

/// Generate leaf expressions
fn atom_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Identifiers
        "[a-z][a-z0-9_]{0,5}".prop_filter("reserved word", |name| !is_reserved(name)),
        // Numbers
        "[0-9]{1,4}",
        "[0-9]{1,3}\\.[0-9]{1,2}",
        // Strings
        "[a-z ]{0,6}".prop_map(|s| format!("'{}'", s)),
        Just("true".to_string()),
        Just("null".to_string()),
        Just("this".to_string()),
    ]
}

fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "do" | "if"
            | "in"
            | "for"
            | "let"
            | "new"
            | "try"
            | "var"
            | "case"
            | "async"
            | "await"
            | "else"
            | "enum"
            | "null"
            | "this"
            | "true"
            | "void"
            | "with"
            | "break"
            | "catch"
            | "class"
            | "const"
            | "false"
            | "super"
            | "throw"
            | "while"
            | "yield"
            | "delete"
            | "export"
            | "import"
            | "return"
            | "switch"
            | "typeof"
            | "default"
            | "extends"
            | "finally"
            | "continue"
            | "debugger"
            | "function"
            | "instanceof"
    )
}

fn binary_operator_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "==", "!=", "===", "!==", "<", "<=", ">", ">=", "+", "-", "*", "/", "%", "&&", "||",
        "&", "|", "^", "<<", ">>",
    ])
}

/// Generate nested expressions, parenthesizing every compound so precedence never matters
fn expression_strategy() -> impl Strategy<Value = String> {
    atom_strategy().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), binary_operator_strategy(), inner.clone())
                .prop_map(|(l, op, r)| format!("({} {} {})", l, op, r)),
            inner.clone().prop_map(|e| format!("!({})", e)),
            inner.clone().prop_map(|e| format!("-({})", e)),
            (inner.clone(), "[a-z]{1,4}").prop_map(|(e, p)| format!("({}).{}", e, p)),
            (inner.clone(), inner.clone()).prop_map(|(o, k)| format!("({})[{}]", o, k)),
            ("[a-z]{1,4}", prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| format!("{}_fn({})", f, args.join(", "))),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(t, c, a)| format!("({} ? {} : {})", t, c, a)),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_reflexive_over_independent_parses(source in expression_strategy()) {
        let a = parse_expression(&source).expect("generated expression to parse");
        let b = parse_expression(&source).expect("generated expression to parse");
        prop_assert!(are_equivalent(&a, &a));
        prop_assert!(are_equivalent(&a, &b));
    }

    #[test]
    fn test_symmetric(left in expression_strategy(), right in expression_strategy()) {
        let a = parse_expression(&left).expect("generated expression to parse");
        let b = parse_expression(&right).expect("generated expression to parse");
        prop_assert_eq!(are_equivalent(&a, &b), are_equivalent(&b, &a));
    }

    #[test]
    fn test_position_is_ignored(source in expression_strategy(), padding in "[ \n]{1,8}") {
        let a = parse_expression(&source).expect("generated expression to parse");
        let b = parse_expression(&format!("{}{}", padding, source))
            .expect("padded expression to parse");
        prop_assert!(are_equivalent(&a, &b));
    }

    #[test]
    fn test_swapped_operands_differ(left in "[a-m]{1,3}", right in "[n-z]{1,3}") {
        prop_assume!(!is_reserved(&left) && !is_reserved(&right));
        let a = parse_expression(&format!("{} < {}", left, right)).unwrap();
        let b = parse_expression(&format!("{} < {}", right, left)).unwrap();
        prop_assert!(!are_equivalent(&a, &b));
    }
}
