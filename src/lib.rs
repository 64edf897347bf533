//! # radar
//!
//! Detects redundant and invertible logic in JavaScript sources.
//!
//! Two rules are provided:
//!
//! - `no-identical-conditions`: an `if`/`else if` chain that tests the same condition twice.
//! - `no-inverted-boolean-check`: a negated comparison such as `!(a == b)` that reads better
//!   with the opposite operator.
//!
//! File Layout
//!
//! The analysis core (ast, equivalence, rules, diagnostics) works on an already parsed tree
//! and never touches source files. Everything else is host code that produces that tree and
//! consumes the diagnostics:
//! src/radar
//!   ├── ast            Node model, ranges and verbatim source access
//!   ├── equivalence    Structural comparison of two subtrees
//!   ├── rules          The two rules plus their metadata
//!   ├── diagnostics    Diagnostic records and the reporter
//!   ├── lexing         Host: logos tokenizer for the javascript subset
//!   ├── parsing        Host: chumsky grammar and nesting limits
//!   ├── visitor        Host: depth-first traversal
//!   ├── linter         Host: drives the rules over a program
//!   ├── config         Host: layered rule configuration
//!   └── fixing         Host: applies fixes to source text

pub mod radar;
