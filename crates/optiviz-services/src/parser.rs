//! SQL-to-AST collaborators

use optiviz_core::{TreeValue, parse_tree};
use thiserror::Error;

/// Errors raised while producing an AST
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("invalid AST JSON: {0}")]
    InvalidAst(String),
}

/// Turns SQL text into an AST tree shaped like PostgreSQL's own parse tree
/// (`{"stmts": [{"stmt": {"SelectStmt": ...}}]}`).
pub trait SqlParser: Send + Sync {
    fn parse(&self, query: &str) -> Result<TreeValue, ParseError>;
}

/// An AST produced outside this process, returned as-is for every query.
///
/// Used when a grammar-accurate parser runs elsewhere and hands over its JSON
/// output.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparsedAst {
    ast: TreeValue,
}

impl PreparsedAst {
    pub fn new(ast: TreeValue) -> Self {
        Self { ast }
    }

    /// Parses the AST from its JSON text
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        parse_tree(json)
            .map(Self::new)
            .map_err(|e| ParseError::InvalidAst(e.to_string()))
    }

    pub fn ast(&self) -> &TreeValue {
        &self.ast
    }
}

impl SqlParser for PreparsedAst {
    fn parse(&self, _query: &str) -> Result<TreeValue, ParseError> {
        Ok(self.ast.clone())
    }
}
