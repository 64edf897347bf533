//! The rules and their metadata
//!
//! Each rule is a plain function over a node that reports through a
//! [Reporter](crate::radar::diagnostics::Reporter). Which nodes a rule is handed, and
//! whether it runs at all, is decided by the [linter](crate::radar::linter).

pub mod identical_conditions;
pub mod inverted_boolean_check;

use super::diagnostics::Severity;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    NoIdenticalConditions,
    NoInvertedBooleanCheck,
}

impl RuleId {
    pub const ALL: [RuleId; 2] = [RuleId::NoIdenticalConditions, RuleId::NoInvertedBooleanCheck];

    pub fn as_str(self) -> &'static str {
        match self {
            RuleId::NoIdenticalConditions => "no-identical-conditions",
            RuleId::NoInvertedBooleanCheck => "no-inverted-boolean-check",
        }
    }

    pub fn meta(self) -> &'static RuleMeta {
        &CATALOGUE[self.as_str()]
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown rule: {0}")]
pub struct UnknownRule(pub String);

impl FromStr for RuleId {
    type Err = UnknownRule;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        lookup(name)
            .map(|meta| meta.id)
            .ok_or_else(|| UnknownRule(name.to_string()))
    }
}

/// Whether a rule points at likely bugs or at code that reads badly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Problem,
    Suggestion,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleMeta {
    pub id: RuleId,
    pub description: &'static str,
    pub category: &'static str,
    pub kind: RuleKind,
    pub fixable: bool,
    pub default_severity: Severity,
}

static CATALOGUE: Lazy<BTreeMap<&'static str, RuleMeta>> = Lazy::new(|| {
    [
        RuleMeta {
            id: RuleId::NoIdenticalConditions,
            description: "Related \"if/else if\" statements should not have the same condition",
            category: "Bug Detection",
            kind: RuleKind::Problem,
            fixable: false,
            default_severity: Severity::Error,
        },
        RuleMeta {
            id: RuleId::NoInvertedBooleanCheck,
            description: "Boolean checks should not be inverted",
            category: "Code Smell Detection",
            kind: RuleKind::Suggestion,
            fixable: true,
            default_severity: Severity::Warning,
        },
    ]
    .into_iter()
    .map(|meta| (meta.id.as_str(), meta))
    .collect()
});

/// All rules, ordered by id
pub fn catalogue() -> impl Iterator<Item = &'static RuleMeta> {
    CATALOGUE.values()
}

pub fn lookup(name: &str) -> Option<&'static RuleMeta> {
    CATALOGUE.get(name)
}
