//! AST definitions for the javascript subset analysed by radar
//!
//!     The tree mirrors the shape of ESTree: statements and expressions are nodes tagged by
//!     kind, each with its named children and an optional source range. The analysis core only
//!     ever reads a tree; who built it (the bundled parser, or a host with its own parser) is
//!     irrelevant as long as ranges, when present, index into the text exposed through
//!     [SourceText].
//!
//!     Ranges are advisory. Comparison never looks at them, and rules that need a range to
//!     anchor a finding simply stay quiet when it is missing.

pub mod node;
pub mod operators;
pub mod range;
pub mod source;

pub use node::{DeclarationKind, Literal, Node, NodeKind};
pub use operators::{
    AssignmentOperator, BinaryOperator, LogicalOperator, UnaryOperator, UpdateOperator,
};
pub use range::{Position, Range, SourceLocation};
pub use source::{SourceCode, SourceText};
