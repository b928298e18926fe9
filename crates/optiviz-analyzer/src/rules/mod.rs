//! Suggestion Rules Module
//!
//! A [`Rule`] inspects the AST and/or the execution plan of one request and returns
//! zero or more suggestions. The [`RuleEngine`] runs an ordered list of rules and
//! concatenates their output.
//!
//! Built-in rules:
//! - [`SeqScanRule`] - sequential scans in the plan
//! - [`LeadingWildcardRule`] - `LIKE '%...'` predicates
//! - [`FunctionOnColumnRule`] - functions wrapping a column inside a predicate

mod engine;
mod function_on_column;
mod leading_wildcard;
mod seq_scan;

#[cfg(test)]
pub(crate) mod fixtures;

pub use engine::{EngineError, RuleEngine};
pub use function_on_column::FunctionOnColumnRule;
pub use leading_wildcard::LeadingWildcardRule;
pub use seq_scan::SeqScanRule;

use crate::ast::{ComparisonExpr, object_nodes};
use crate::explain::{PlanNodeIter, extract_plan_root};
use optiviz_core::{AnalyzeRequest, Suggestion, TreeObject, TreeValue};
use thiserror::Error;

/// Errors a rule may raise.
///
/// Built-in rules never return these: a node that does not have the expected shape
/// simply does not match.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unexpected node shape: {0}")]
    UnexpectedShape(String),
}

/// A unit of analysis over one request's trees.
///
/// Implementations must be deterministic and keep no state between calls.
pub trait Rule: Send + Sync {
    /// Stable identifier used in logs and error attribution
    fn name(&self) -> &'static str;

    /// Inspects `input` and returns suggestions in emission order
    fn apply(&self, input: &RuleInput<'_>) -> Result<Vec<Suggestion>, RuleError>;
}

/// Read-only input handed to every rule
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    /// Parsed AST, if a parser was available
    pub ast: Option<&'a TreeValue>,
    /// Normalized EXPLAIN output, if one was obtained
    pub plan: Option<&'a TreeValue>,
    /// The request being analysed
    pub request: &'a AnalyzeRequest,
}

impl<'a> RuleInput<'a> {
    /// Creates an input with neither tree present
    pub fn new(request: &'a AnalyzeRequest) -> Self {
        Self {
            ast: None,
            plan: None,
            request,
        }
    }

    pub fn with_ast(mut self, ast: Option<&'a TreeValue>) -> Self {
        self.ast = ast;
        self
    }

    pub fn with_plan(mut self, plan: Option<&'a TreeValue>) -> Self {
        self.plan = plan;
        self
    }

    /// Every object in the AST, pre-order; empty when there is no AST
    pub fn ast_nodes(self) -> impl Iterator<Item = &'a TreeObject> {
        self.ast.into_iter().flat_map(object_nodes)
    }

    /// Every `A_Expr` comparison in the AST
    pub fn comparisons(self) -> impl Iterator<Item = ComparisonExpr<'a>> {
        self.ast_nodes().filter_map(ComparisonExpr::from_node)
    }

    /// Every node of the plan starting at its unwrapped root
    pub fn plan_nodes(self) -> PlanNodeIter<'a> {
        PlanNodeIter::new(extract_plan_root(self.plan))
    }
}
