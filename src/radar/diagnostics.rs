//! Diagnostic records and the reporter that assembles them
//!
//! A [Diagnostic] is one finding: a message, the primary [Range] it is anchored to,
//! optional secondary locations that point at related code (for instance the original
//! condition a duplicate repeats), and an optional [Fix].
//!
//! Rules never build diagnostics directly. They hand message, range and secondary
//! locations to a [Reporter], which stamps the rule id and the configured severity and
//! appends the result to the caller's output. The reporter does not filter, sort or
//! deduplicate: every call yields exactly one diagnostic.

use super::ast::Range;
use super::rules::RuleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity levels matching LSP protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A related location shown alongside the primary one
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryLocation {
    pub range: Range,
    pub label: String,
}

/// A proposed replacement of the text covered by `range`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fix {
    pub range: Range,
    pub text: String,
}

/// Structured diagnostic produced by a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    pub code: RuleId,
    pub source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub secondary: Vec<SecondaryLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Diagnostic {
    pub fn new(code: RuleId, range: Range, severity: Severity, message: String) -> Self {
        Self {
            range,
            severity,
            message,
            code,
            source: "radar".to_string(),
            secondary: Vec::new(),
            fix: None,
        }
    }

    pub fn with_secondary(mut self, range: Range, label: impl Into<String>) -> Self {
        self.secondary.push(SecondaryLocation {
            range,
            label: label.into(),
        });
        self
    }

    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity, self.code, self.message, self.range.start
        )
    }
}

/// Fill `{{name}}` placeholders in a message template.
///
/// Placeholders without a matching entry in `data` are left untouched.
pub fn format_message(template: &str, data: &[(&str, &str)]) -> String {
    data.iter().fold(template.to_string(), |message, (key, value)| {
        message.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// Collects diagnostics on behalf of one rule
pub struct Reporter<'a> {
    rule: RuleId,
    severity: Severity,
    sink: &'a mut Vec<Diagnostic>,
}

impl<'a> Reporter<'a> {
    pub fn new(rule: RuleId, severity: Severity, sink: &'a mut Vec<Diagnostic>) -> Self {
        Self {
            rule,
            severity,
            sink,
        }
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    /// Emit one diagnostic at `range` with the given secondary `(range, label)` pairs
    pub fn report<'l, I>(&mut self, message: impl Into<String>, range: &Range, secondary: I)
    where
        I: IntoIterator<Item = (Range, &'l str)>,
    {
        let diagnostic = secondary.into_iter().fold(
            Diagnostic::new(self.rule, range.clone(), self.severity, message.into()),
            |diagnostic, (range, label)| diagnostic.with_secondary(range, label),
        );
        self.sink.push(diagnostic);
    }

    /// Emit one diagnostic at `range` carrying a fix
    pub fn report_with_fix(&mut self, message: impl Into<String>, range: &Range, fix: Fix) {
        let diagnostic = Diagnostic::new(self.rule, range.clone(), self.severity, message.into())
            .with_fix(fix);
        self.sink.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::radar::ast::Position;

    fn range(start: usize, end: usize) -> Range {
        Range::new(start..end, Position::new(0, start), Position::new(0, end))
    }

    #[test]
    fn test_format_message() {
        let message = format_message(
            "Use the opposite operator ({{invertedOperator}}) instead.",
            &[("invertedOperator", "<")],
        );
        assert_eq!(message, "Use the opposite operator (<) instead.");
    }

    #[test]
    fn test_format_message_keeps_unknown_placeholders() {
        assert_eq!(format_message("{{a}} {{b}}", &[("a", "1")]), "1 {{b}}");
    }

    #[test]
    fn test_reporter_appends_one_per_call() {
        let mut sink = Vec::new();
        let mut reporter = Reporter::new(RuleId::NoIdenticalConditions, Severity::Error, &mut sink);

        reporter.report("first", &range(4, 5), [(range(0, 1), "Original")]);
        reporter.report("first", &range(4, 5), [(range(0, 1), "Original")]);

        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0], sink[1]);
        assert_eq!(sink[0].secondary.len(), 1);
        assert_eq!(sink[0].secondary[0].label, "Original");
        assert_eq!(sink[0].code, RuleId::NoIdenticalConditions);
        assert_eq!(sink[0].source, "radar");
        assert!(sink[0].fix.is_none());
    }

    #[test]
    fn test_reporter_with_fix() {
        let mut sink = Vec::new();
        let mut reporter =
            Reporter::new(RuleId::NoInvertedBooleanCheck, Severity::Warning, &mut sink);
        let fix = Fix {
            range: range(0, 10),
            text: "x < 10".to_string(),
        };
        reporter.report_with_fix("message", &range(0, 10), fix.clone());

        assert_eq!(sink[0].fix, Some(fix));
        assert!(sink[0].secondary.is_empty());
        assert_eq!(sink[0].severity, Severity::Warning);
    }

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            RuleId::NoInvertedBooleanCheck,
            range(3, 9),
            Severity::Warning,
            "Use the opposite operator (<) instead.".to_string(),
        );
        insta::assert_snapshot!(
            diagnostic.to_string(),
            @"warning [no-inverted-boolean-check]: Use the opposite operator (<) instead. at 0:3"
        );
    }

    #[test]
    fn test_json_shape() {
        let diagnostic = Diagnostic::new(
            RuleId::NoIdenticalConditions,
            range(0, 1),
            Severity::Error,
            "m".to_string(),
        );
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "no-identical-conditions");
        assert_eq!(json["severity"], "error");
        assert_eq!(json["range"]["span"]["start"], 0);
        assert!(json.get("fix").is_none());
        assert!(json.get("secondary").is_none());
    }
}
