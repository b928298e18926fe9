//! Request, response and suggestion types

use crate::{OptivizError, TreeValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the execution plan for a request is obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzeMode {
    /// The caller supplies EXPLAIN JSON alongside the query
    #[default]
    Manual,
    /// The plan is fetched by running EXPLAIN against a live database
    Connected,
}

impl AnalyzeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Connected => "connected",
        }
    }
}

impl FromStr for AnalyzeMode {
    type Err = OptivizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "connected" => Ok(Self::Connected),
            _ => Err(OptivizError::UnsupportedMode(s.to_string())),
        }
    }
}

impl fmt::Display for AnalyzeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single analysis request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub mode: AnalyzeMode,
    /// Connection string for connected mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    /// Raw SQL text
    pub query: String,
    /// Raw EXPLAIN (FORMAT JSON) output for manual mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explain_json: Option<String>,
}

impl AnalyzeRequest {
    /// Creates a manual-mode request with the given EXPLAIN JSON
    pub fn manual(query: impl Into<String>, explain_json: impl Into<String>) -> Self {
        Self {
            mode: AnalyzeMode::Manual,
            connection_string: None,
            query: query.into(),
            explain_json: Some(explain_json.into()),
        }
    }

    /// Creates a connected-mode request against the given database
    pub fn connected(query: impl Into<String>, connection_string: impl Into<String>) -> Self {
        Self {
            mode: AnalyzeMode::Connected,
            connection_string: Some(connection_string.into()),
            query: query.into(),
            explain_json: None,
        }
    }
}

/// Severity of a suggestion, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Returns true if this is the highest severity
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding produced by a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    /// Short label
    pub title: String,
    /// What was found, with concrete identifiers and values
    pub description: String,
    /// Suggested action to fix it
    pub recommendation: String,
    pub severity: Severity,
}

impl Suggestion {
    /// Creates a new suggestion
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
            severity,
        }
    }
}

/// Result of analysing one request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Parsed AST, if a parser was available
    pub ast: Option<TreeValue>,
    /// Normalized EXPLAIN output
    pub explain_plan: Option<TreeValue>,
    /// Suggestions in rule registration order
    pub suggestions: Vec<Suggestion>,
}

impl AnalyzeResponse {
    /// Returns true if any suggestion is high severity
    pub fn has_high_severity(&self) -> bool {
        self.suggestions.iter().any(|s| s.severity.is_high())
    }

    /// Returns the number of suggestions with the given severity
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.suggestions
            .iter()
            .filter(|s| s.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests;
