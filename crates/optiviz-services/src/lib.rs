//! Optiviz service layer
//!
//! Sits between the entry points (the CLI) and the rule engine. The service
//! validates a request, obtains the AST and the execution plan from its
//! collaborators, and runs the rule engine over them.
//!
//! ```text
//! Entry point (optiviz-cli)
//!     ↓
//! Service layer (optiviz-services) ← This crate
//!     ↓
//! Rule engine (optiviz-analyzer)
//!     ↓
//! Shared types (optiviz-core)
//! ```
//!
//! # Collaborators
//!
//! - [`SqlParser`] - turns SQL text into an AST tree ([`SqlparserAstParser`],
//!   [`PreparsedAst`])
//! - [`PlanProvider`] - runs EXPLAIN against a live database
//!   ([`PostgresPlanProvider`])

mod analyzer_service;
mod ast_builder;
mod error;
mod parser;
mod plan_provider;

pub use analyzer_service::AnalyzerService;
pub use ast_builder::SqlparserAstParser;
pub use error::{ServiceError, ServiceResult};
pub use parser::{ParseError, PreparsedAst, SqlParser};
pub use plan_provider::{ExplainOptions, PlanProvider, PostgresPlanProvider};
