//! Rule Engine - runs rules in registration order

use super::{
    FunctionOnColumnRule, LeadingWildcardRule, Rule, RuleError, RuleInput, SeqScanRule,
};
use optiviz_core::Suggestion;
use std::fmt;
use thiserror::Error;

/// A rule failed while the engine was evaluating
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule {rule}: {source}")]
    Rule {
        rule: &'static str,
        #[source]
        source: RuleError,
    },
}

/// Ordered, immutable set of rules.
///
/// The engine holds no per-call state; one instance can serve concurrent
/// evaluations from several threads.
pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleEngine {
    /// Creates an engine running `rules` in the given order
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// Creates an engine with the built-in rules: sequential scans, leading
    /// wildcards, functions on columns
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            Box::new(SeqScanRule),
            Box::new(LeadingWildcardRule),
            Box::new(FunctionOnColumnRule),
        ])
    }

    /// Appends a rule; it runs after every rule already registered
    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Names of the registered rules in evaluation order
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule against `input`.
    ///
    /// Suggestions are ordered by rule registration, then by each rule's emission
    /// order. The first failing rule aborts evaluation and nothing collected so far
    /// is returned.
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Result<Vec<Suggestion>, EngineError> {
        let mut suggestions = Vec::new();

        for rule in &self.rules {
            let result = rule.apply(input).map_err(|source| {
                tracing::warn!(rule = rule.name(), error = %source, "rule failed");
                EngineError::Rule {
                    rule: rule.name(),
                    source,
                }
            })?;

            tracing::debug!(
                rule = rule.name(),
                suggestions = result.len(),
                "rule applied"
            );
            suggestions.extend(result);
        }

        Ok(suggestions)
    }
}
