//! Applying fixes to source text
//!
//! Fixes are applied in order of their start offset. A fix that overlaps one already
//! applied is skipped; running the linter again on the output picks it up if it still
//! applies.

use super::ast::Range;
use super::diagnostics::{Diagnostic, Fix};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub output: String,
    pub applied: usize,
    pub skipped: usize,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.applied > 0
    }
}

pub fn apply_fixes(source: &str, diagnostics: &[Diagnostic]) -> FixOutcome {
    let mut fixes: Vec<&Fix> = diagnostics.iter().filter_map(|d| d.fix.as_ref()).collect();
    fixes.sort_by_key(|fix| (fix.range.span.start, fix.range.span.end));

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    let mut last: Option<&Range> = None;
    let mut applied = 0;
    let mut skipped = 0;

    for fix in fixes {
        let span = &fix.range.span;
        if last.is_some_and(|last| last.overlaps(&fix.range)) {
            debug!(range = %fix.range, "skipping overlapping fix");
            skipped += 1;
            continue;
        }
        let (Some(kept), Some(_)) = (source.get(cursor..span.start), source.get(span.clone()))
        else {
            debug!(range = %fix.range, "skipping fix outside the source");
            skipped += 1;
            continue;
        };
        output.push_str(kept);
        output.push_str(&fix.text);
        cursor = span.end;
        last = Some(&fix.range);
        applied += 1;
    }
    output.push_str(&source[cursor..]);

    FixOutcome {
        output,
        applied,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::ast::SourceLocation;
    use crate::radar::config::load_defaults;
    use crate::radar::diagnostics::Severity;
    use crate::radar::linter::Linter;
    use crate::radar::rules::RuleId;

    fn lint(source: &str) -> Vec<Diagnostic> {
        Linter::new(&load_defaults().unwrap())
            .lint_source(source)
            .unwrap()
    }

    #[test]
    fn test_applies_all_disjoint_fixes() {
        let source = "if (!(a == b) && !(c > d)) { run(); }";
        let outcome = apply_fixes(source, &lint(source));

        assert_eq!(outcome.output, "if (a != b && c <= d) { run(); }");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 0);
        assert!(outcome.changed());
    }

    #[test]
    fn test_nested_fixes_are_deferred() {
        let source = "!(!(a < b) == c)";
        let diagnostics = lint(source);
        assert_eq!(diagnostics.len(), 2);

        let outcome = apply_fixes(source, &diagnostics);
        assert_eq!(outcome.output, "!(a < b) != c");
        assert_eq!(outcome.skipped, 1);

        // A second pass picks up the inner negation
        let outcome = apply_fixes(&outcome.output, &lint(&outcome.output));
        assert_eq!(outcome.output, "a >= b != c");
    }

    #[test]
    fn test_diagnostics_without_fixes_leave_source_alone() {
        let source = "if (a) {} else if (a) {}";
        let outcome = apply_fixes(source, &lint(source));

        assert_eq!(outcome.output, source);
        assert!(!outcome.changed());
    }

    fn replacement(source: &str, span: std::ops::Range<usize>, text: &str) -> Diagnostic {
        let range = SourceLocation::new(source).range(span);
        Diagnostic::new(
            RuleId::NoInvertedBooleanCheck,
            range.clone(),
            Severity::Warning,
            "replace".to_string(),
        )
        .with_fix(Fix {
            range,
            text: text.to_string(),
        })
    }

    #[test]
    fn test_touching_fixes_both_apply() {
        let source = "abcdef";
        let diagnostics = vec![
            replacement(source, 3..6, "XYZ"),
            replacement(source, 0..3, "123"),
            replacement(source, 2..4, "--"),
        ];
        let outcome = apply_fixes(source, &diagnostics);

        assert_eq!(outcome.output, "123XYZ");
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_fix_outside_the_source_is_skipped() {
        let diagnostics = vec![replacement("a much longer source", 8..14, "x")];
        let outcome = apply_fixes("short", &diagnostics);

        assert_eq!(outcome.output, "short");
        assert_eq!(outcome.skipped, 1);
    }
}
