//! Drives the rules over a program
//!
//! The linter walks the tree once, depth-first in source order, and hands each node to
//! the rules interested in it:
//!
//! - an `if` statement that heads a chain goes to `no-identical-conditions` (`else if`
//!   links are covered by the scan of their head);
//! - a unary expression goes to `no-inverted-boolean-check`.
//!
//! Diagnostics come out in the order they are found. The linter does not sort or
//! deduplicate them.

use super::ast::{Node, NodeKind, SourceCode, SourceText};
use super::config::RadarConfig;
use super::diagnostics::{Diagnostic, Reporter, Severity};
use super::parsing::{parse_program, ParseResult};
use super::rules::{identical_conditions, inverted_boolean_check, RuleId};
use super::visitor::{is_else_branch, walk, Visitor};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Linter {
    identical_conditions: Option<Severity>,
    inverted_boolean_check: Option<Severity>,
}

impl Linter {
    pub fn new(config: &RadarConfig) -> Self {
        Self {
            identical_conditions: config.severity(RuleId::NoIdenticalConditions),
            inverted_boolean_check: config.severity(RuleId::NoInvertedBooleanCheck),
        }
    }

    /// Parse `source` and lint the resulting program
    pub fn lint_source(&self, source: &str) -> ParseResult<Vec<Diagnostic>> {
        let program = parse_program(source)?;
        let code = SourceCode::new(source);
        Ok(self.lint_program(&program, &code))
    }

    /// Lint an already parsed tree whose ranges index into `source`
    pub fn lint_program(&self, program: &Node, source: &dyn SourceText) -> Vec<Diagnostic> {
        let mut pass = LintPass {
            linter: self,
            source,
            diagnostics: Vec::new(),
        };
        walk(program, &mut pass);
        debug!(diagnostics = pass.diagnostics.len(), "lint pass finished");
        pass.diagnostics
    }
}

struct LintPass<'a> {
    linter: &'a Linter,
    source: &'a dyn SourceText,
    diagnostics: Vec<Diagnostic>,
}

impl Visitor for LintPass<'_> {
    fn enter(&mut self, node: &Node, parent: Option<&Node>) {
        match &node.kind {
            NodeKind::If { .. } if !is_else_branch(node, parent) => {
                if let Some(severity) = self.linter.identical_conditions {
                    let mut reporter = Reporter::new(
                        RuleId::NoIdenticalConditions,
                        severity,
                        &mut self.diagnostics,
                    );
                    identical_conditions::check_if_statement(node, &mut reporter);
                }
            }
            NodeKind::Unary { .. } => {
                if let Some(severity) = self.linter.inverted_boolean_check {
                    let mut reporter = Reporter::new(
                        RuleId::NoInvertedBooleanCheck,
                        severity,
                        &mut self.diagnostics,
                    );
                    inverted_boolean_check::check_unary_expression(
                        node,
                        self.source,
                        &mut reporter,
                    );
                }
            }
            _ => {}
        }
    }
}
