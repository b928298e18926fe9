use super::{Rule, RuleError, RuleInput};
use optiviz_core::{Severity, Suggestion};

/// Relation label used when a scan node carries no relation name
const FALLBACK_RELATION: &str = "target table";

/// Flags every sequential scan in the execution plan
#[derive(Debug, Clone, Copy, Default)]
pub struct SeqScanRule;

impl Rule for SeqScanRule {
    fn name(&self) -> &'static str {
        "SeqScan"
    }

    fn apply(&self, input: &RuleInput<'_>) -> Result<Vec<Suggestion>, RuleError> {
        let suggestions = input
            .plan_nodes()
            .filter(|node| node.is_seq_scan())
            .map(|node| {
                let relation = node.relation().unwrap_or(FALLBACK_RELATION);
                Suggestion::new(
                    "Sequential scan detected",
                    format!("The query plan uses a sequential scan on {:?}.", relation),
                    format!(
                        "Consider adding an appropriate index on {:?} or rewriting the filter to enable index usage.",
                        relation
                    ),
                    Severity::High,
                )
            })
            .collect();

        Ok(suggestions)
    }
}
