//! End-to-end checks of both rules through the public API
//!
//! Sources are parsed with the bundled parser, linted with the default configuration and the
//! resulting diagnostics inspected field by field.

use radar::radar::ast::Position;
use radar::radar::config::load_defaults;
use radar::radar::diagnostics::{Diagnostic, Severity};
use radar::radar::equivalence::are_equivalent;
use radar::radar::fixing::apply_fixes;
use radar::radar::linter::Linter;
use radar::radar::parsing::parse_expression;
use radar::radar::rules::RuleId;
use rstest::rstest;

fn lint(source: &str) -> Vec<Diagnostic> {
    let linter = Linter::new(&load_defaults().expect("defaults to load"));
    linter.lint_source(source).expect("source to parse")
}

fn text<'a>(source: &'a str, diagnostic: &Diagnostic) -> &'a str {
    &source[diagnostic.range.span.clone()]
}

fn equivalent(a: &str, b: &str) -> bool {
    let a = parse_expression(a).expect("left expression to parse");
    let b = parse_expression(b).expect("right expression to parse");
    are_equivalent(&a, &b)
}

#[test]
fn test_duplicate_condition_is_reported_once() {
    let source = "if (x > 0) { } else if (x > 0) { }";
    let diagnostics = lint(source);

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, RuleId::NoIdenticalConditions);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!(diagnostic.range.span, 24..29);
    assert_eq!(diagnostic.message, "This branch duplicates the one on line 1");
    assert!(diagnostic.fix.is_none());

    assert_eq!(diagnostic.secondary.len(), 1);
    assert_eq!(diagnostic.secondary[0].label, "Original");
    assert_eq!(diagnostic.secondary[0].range.span, 4..9);
}

#[test]
fn test_distinct_conditions_are_clean() {
    assert!(lint("if (x > 0) { } else if (y > 0) { }").is_empty());
}

#[test]
fn test_every_duplicate_is_anchored_to_the_head() {
    let source = "if (a) {}\nelse if (a) {}\nelse if (a) {}";
    let diagnostics = lint(source);

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0].range.start, Position::new(1, 9));
    assert_eq!(diagnostics[1].range.start, Position::new(2, 9));
    for diagnostic in &diagnostics {
        assert_eq!(text(source, diagnostic), "a");
        assert_eq!(diagnostic.secondary[0].range.span, 4..5);
        assert_eq!(diagnostic.secondary[0].label, "Original");
    }
}

#[test]
fn test_message_names_the_line_of_the_chain() {
    let source = "let n = 0;\n\nif (check(n, 'x')) {\n  go();\n} else if (check(n, \"x\")) {\n  stop();\n}";
    let diagnostics = lint(source);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].message, "This branch duplicates the one on line 3");
    assert_eq!(text(source, &diagnostics[0]), "check(n, \"x\")");
}

#[test]
fn test_inverted_check_gets_a_fix() {
    let source = "!(x >= 10)";
    let diagnostics = lint(source);

    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.code, RuleId::NoInvertedBooleanCheck);
    assert_eq!(diagnostic.severity, Severity::Warning);
    assert_eq!(diagnostic.message, "Use the opposite operator (<) instead.");
    assert!(diagnostic.secondary.is_empty());

    let fix = diagnostic.fix.as_ref().expect("fix to be attached");
    assert_eq!(fix.range.span, 0..10);
    assert_eq!(fix.text, "x < 10");
}

#[test]
fn test_logical_negation_is_left_alone() {
    assert!(lint("!(x && y)").is_empty());
}

#[test]
fn test_fix_keeps_operand_text() {
    let source = "!(foo() >= bar.baz)";
    let diagnostics = lint(source);
    let fix = diagnostics[0].fix.as_ref().unwrap();
    assert_eq!(fix.text, "foo() < bar.baz");

    let source = "!( foo(a,  b) === c[ 0 ] )";
    let diagnostics = lint(source);
    let fix = diagnostics[0].fix.as_ref().unwrap();
    assert_eq!(fix.text, "foo(a,  b) !== c[ 0 ]");
}

#[test]
fn test_applied_fixes_leave_clean_source() {
    let source = "if (!(a == b)) {\n  run(!(c != d));\n}\n";
    let outcome = apply_fixes(source, &lint(source));

    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.output, "if (a != b) {\n  run(c == d);\n}\n");
    assert!(lint(&outcome.output).is_empty());
}

#[rstest]
#[case("a < b", "a < b")]
#[case("f(a, 'b')", "f(a, \"b\")")]
#[case("obj.prop[key]", "obj.prop[key]")]
#[case("(x)", "x")]
#[case("0x10 === 16", "16 === 16")]
#[case("a ? b : c", "a ? b : c")]
fn test_same_code_is_equivalent(#[case] a: &str, #[case] b: &str) {
    assert!(equivalent(a, b));
    assert!(equivalent(b, a));
}

#[rstest]
#[case("a < b", "b < a")]
#[case("a < b", "a <= b")]
#[case("a && b", "a || b")]
#[case("f(a)", "f(a, b)")]
#[case("1", "'1'")]
#[case("x.y", "x[y]")]
#[case("-a", "!a")]
#[case("a", "this")]
fn test_changed_code_is_not_equivalent(#[case] a: &str, #[case] b: &str) {
    assert!(!equivalent(a, b));
    assert!(!equivalent(b, a));
}
