//! PostgreSQL EXPLAIN decoding
//!
//! Turns raw `EXPLAIN (FORMAT JSON)` output into the plan tree handed to the
//! rules. PostgreSQL wraps the plan in a one-element array; the array is
//! unwrapped here, the `{"Plan": ...}` envelope is left for
//! [`extract_plan_root`](super::extract_plan_root).

use optiviz_core::{TreeAccess, TreeValue};
use thiserror::Error;

/// Errors that can occur when obtaining or decoding an EXPLAIN plan
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("empty explain result")]
    EmptyResult,

    #[error("unexpected explain array shape")]
    UnexpectedShape,

    #[error("unsupported explain plan format")]
    UnsupportedFormat,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),
}

/// Result type for plan decoding
pub type Result<T> = std::result::Result<T, PlanError>;

/// Parses EXPLAIN JSON text and normalizes it with [`normalize_plan`]
pub fn decode_plan(json: &str) -> Result<TreeValue> {
    let payload: TreeValue = serde_json::from_str(json)?;
    normalize_plan(payload)
}

/// Reduces an EXPLAIN payload to a single plan object.
///
/// Objects pass through unchanged. Arrays yield their first element, which must be
/// an object. Any other JSON value is rejected.
pub fn normalize_plan(payload: TreeValue) -> Result<TreeValue> {
    match payload {
        TreeValue::Object(_) => Ok(payload),
        TreeValue::Array(items) => match items.into_iter().next() {
            None => Err(PlanError::EmptyResult),
            Some(first @ TreeValue::Object(_)) => Ok(first),
            Some(_) => Err(PlanError::UnexpectedShape),
        },
        _ => Err(PlanError::UnsupportedFormat),
    }
}

/// Timing information reported by EXPLAIN ANALYZE
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlanTiming {
    pub planning_time_ms: Option<f64>,
    pub execution_time_ms: Option<f64>,
}

/// Reads `Planning Time` / `Execution Time` from a normalized plan.
///
/// Returns `None` when neither is present (plain EXPLAIN without ANALYZE).
pub fn plan_timing(plan: &TreeValue) -> Option<PlanTiming> {
    let timing = PlanTiming {
        planning_time_ms: plan.field("Planning Time").and_then(TreeValue::as_f64),
        execution_time_ms: plan.field("Execution Time").and_then(TreeValue::as_f64),
    };

    if timing == PlanTiming::default() {
        None
    } else {
        Some(timing)
    }
}

#[cfg(test)]
mod tests;
