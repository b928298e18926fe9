use super::{Rule, RuleError, RuleInput};
use crate::ast::{extract_column_name, extract_const_string};
use optiviz_core::{Severity, Suggestion};
use std::collections::HashSet;

/// Column label used when the left operand is not a plain column reference
const FALLBACK_COLUMN: &str = "column";

/// Flags `LIKE` predicates whose pattern starts with `%`
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingWildcardRule;

impl Rule for LeadingWildcardRule {
    fn name(&self) -> &'static str {
        "LeadingWildcard"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<Vec<Suggestion>, RuleError> {
        let mut suggestions = Vec::new();
        // (column, pattern); the column is keyed before the fallback label applies
        let mut seen = HashSet::new();

        for expr in input.comparisons().filter(|expr| expr.is_like()) {
            let Some(pattern) = expr.right().and_then(extract_const_string) else {
                continue;
            };
            if !pattern.starts_with('%') {
                continue;
            }

            let column = expr
                .left()
                .and_then(extract_column_name)
                .filter(|name| !name.is_empty());
            if !seen.insert((column, pattern)) {
                continue;
            }

            let column = column.unwrap_or(FALLBACK_COLUMN);
            suggestions.push(Suggestion::new(
                "Leading wildcard in LIKE pattern",
                format!(
                    "Predicate `LIKE '{}'` prevents index usage on {}.",
                    pattern, column
                ),
                format!(
                    "Rewrite the predicate on {} to avoid a leading wildcard or use full-text search mechanisms.",
                    column
                ),
                Severity::Medium,
            ));
        }

        Ok(suggestions)
    }
}
