//! Main module for radar library functionality

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod equivalence;
pub mod fixing;
pub mod lexing;
pub mod linter;
pub mod parsing;
pub mod rules;
pub mod visitor;
