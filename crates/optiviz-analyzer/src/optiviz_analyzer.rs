//! Optiviz Analyzer - Query suggestion rules
//!
//! This crate provides functionality for:
//! - Walking SQL ASTs and matching known node shapes (column references,
//!   string constants, function calls, comparison expressions)
//! - Unwrapping and traversing PostgreSQL EXPLAIN (FORMAT JSON) plans
//! - Running an ordered set of rules that turn both trees into suggestions

pub mod ast;
pub mod explain;
pub mod rules;

pub use ast::*;
pub use explain::*;
pub use rules::*;
