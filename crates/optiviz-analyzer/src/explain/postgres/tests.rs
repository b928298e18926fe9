//! Tests for EXPLAIN decoding

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_decode_array_payload() {
    let json = r#"[
        {
            "Plan": {
                "Node Type": "Seq Scan",
                "Relation Name": "users",
                "Startup Cost": 0.00,
                "Total Cost": 10.50
            }
        }
    ]"#;

    let plan = decode_plan(json).expect("decode failed");
    assert_eq!(plan["Plan"]["Relation Name"], json!("users"));
}

#[test]
fn test_decode_object_payload() {
    let plan = decode_plan(r#"{"Plan": {"Node Type": "Result"}}"#).expect("decode failed");
    assert_eq!(plan, json!({"Plan": {"Node Type": "Result"}}));
}

#[test]
fn test_decode_invalid_json() {
    let err = decode_plan("not-json").unwrap_err();
    assert!(matches!(err, PlanError::InvalidJson(_)));
}

#[test]
fn test_normalize_empty_array() {
    let err = normalize_plan(json!([])).unwrap_err();
    assert!(matches!(err, PlanError::EmptyResult));
    assert_eq!(err.to_string(), "empty explain result");
}

#[test]
fn test_normalize_array_of_scalars() {
    let err = normalize_plan(json!(["Seq Scan"])).unwrap_err();
    assert!(matches!(err, PlanError::UnexpectedShape));
}

#[test]
fn test_normalize_scalar_payload() {
    for payload in [json!("plan"), json!(1), json!(null), json!(true)] {
        let err = normalize_plan(payload).unwrap_err();
        assert!(matches!(err, PlanError::UnsupportedFormat));
    }
}

#[test]
fn test_normalize_keeps_only_first_statement() {
    let plan = normalize_plan(json!([{"Plan": {"Node Type": "A"}}, {"Plan": {"Node Type": "B"}}]))
        .unwrap();
    assert_eq!(plan, json!({"Plan": {"Node Type": "A"}}));
}

#[test]
fn test_plan_timing_from_explain_analyze() {
    let plan = json!({
        "Plan": {"Node Type": "Seq Scan"},
        "Planning Time": 0.125,
        "Execution Time": 4.5
    });

    assert_eq!(
        plan_timing(&plan),
        Some(PlanTiming {
            planning_time_ms: Some(0.125),
            execution_time_ms: Some(4.5),
        })
    );
}

#[test]
fn test_plan_timing_absent_without_analyze() {
    assert_eq!(plan_timing(&json!({"Plan": {"Node Type": "Seq Scan"}})), None);
}
