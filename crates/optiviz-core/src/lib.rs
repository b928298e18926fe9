//! Optiviz Core - Shared types for the query suggestion engine
//!
//! This crate provides the types every other Optiviz crate depends on:
//!
//! - `TreeValue` - the generic JSON tree used for both the AST and the execution plan
//! - `TreeAccess` - option-returning accessors for navigating trees by key
//! - `AnalyzeRequest` / `AnalyzeResponse` - the request and response of one analysis
//! - `Suggestion` / `Severity` - the engine's output
//! - `OptivizError` - errors shared across crates

mod error;
mod tree;
mod types;

pub use error::*;
pub use tree::*;
pub use types::*;
