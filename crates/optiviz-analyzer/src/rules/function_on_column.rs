use super::{Rule, RuleError, RuleInput};
use crate::ast::{extract_column_name, extract_function_call};
use optiviz_core::{Severity, Suggestion};
use std::collections::HashSet;

/// Flags predicates that wrap a column in a function call, e.g. `lower(email) = 'x'`.
///
/// Only the first argument is inspected; `coalesce(a, b)` reports `a`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionOnColumnRule;

impl Rule for FunctionOnColumnRule {
    fn name(&self) -> &'static str {
        "FunctionOnColumn"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<Vec<Suggestion>, RuleError> {
        let mut suggestions = Vec::new();
        let mut seen = HashSet::new();

        for expr in input.comparisons() {
            for operand in [expr.left(), expr.right()].into_iter().flatten() {
                let Some(call) = extract_function_call(operand) else {
                    continue;
                };
                let Some(column) = call
                    .first_arg()
                    .and_then(extract_column_name)
                    .filter(|name| !name.is_empty())
                else {
                    continue;
                };

                if !seen.insert((call.name.clone(), column)) {
                    continue;
                }

                suggestions.push(Suggestion::new(
                    "Function applied to column in predicate",
                    format!(
                        "Function {} is applied to column {} in a predicate, disabling index usage.",
                        call.name, column
                    ),
                    format!(
                        "Pre-compute {} or rewrite the predicate to avoid wrapping the column in a function.",
                        column
                    ),
                    Severity::Medium,
                ));
            }
        }

        Ok(suggestions)
    }
}
