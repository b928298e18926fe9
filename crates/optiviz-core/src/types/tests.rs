//! Tests for request, response and suggestion types

use super::*;
use pretty_assertions::assert_eq;

mod analyze_mode_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("manual".parse::<AnalyzeMode>().unwrap(), AnalyzeMode::Manual);
        assert_eq!(
            " Connected ".parse::<AnalyzeMode>().unwrap(),
            AnalyzeMode::Connected
        );
    }

    #[test]
    fn test_from_str_rejects_unknown_mode() {
        let err = "offline".parse::<AnalyzeMode>().unwrap_err();
        assert!(matches!(err, OptivizError::UnsupportedMode(ref m) if m == "offline"));
        assert_eq!(err.to_string(), "unsupported mode \"offline\"");
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&AnalyzeMode::Connected).unwrap();
        assert_eq!(json, "\"connected\"");

        let parsed: AnalyzeMode = serde_json::from_str("\"manual\"").unwrap();
        assert_eq!(parsed, AnalyzeMode::Manual);
    }
}

mod analyze_request_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_manual_constructor() {
        let request = AnalyzeRequest::manual("SELECT 1", "{}");
        assert_eq!(request.mode, AnalyzeMode::Manual);
        assert_eq!(request.explain_json.as_deref(), Some("{}"));
        assert!(request.connection_string.is_none());
    }

    #[test]
    fn test_deserialize_wire_format() {
        let request: AnalyzeRequest = serde_json::from_str(
            r#"{"mode": "connected", "query": "SELECT 1", "connection_string": "postgres://localhost"}"#,
        )
        .unwrap();

        assert_eq!(
            request,
            AnalyzeRequest::connected("SELECT 1", "postgres://localhost")
        );
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let json = serde_json::to_value(AnalyzeRequest::default()).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "manual", "query": ""}));
    }
}

mod severity_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn test_serialization_uses_capitalized_names() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
        assert_eq!(Severity::Medium.to_string(), "Medium");
        assert!(Severity::High.is_high());
        assert!(!Severity::Low.is_high());
    }
}

mod analyze_response_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn suggestion(severity: Severity) -> Suggestion {
        Suggestion::new("title", "description", "recommendation", severity)
    }

    #[test]
    fn test_severity_counts() {
        let response = AnalyzeResponse {
            ast: None,
            explain_plan: None,
            suggestions: vec![
                suggestion(Severity::High),
                suggestion(Severity::Medium),
                suggestion(Severity::Medium),
            ],
        };

        assert!(response.has_high_severity());
        assert_eq!(response.count_by_severity(Severity::Medium), 2);
        assert_eq!(response.count_by_severity(Severity::Low), 0);
    }

    #[test]
    fn test_absent_trees_serialize_as_null() {
        let json = serde_json::to_value(AnalyzeResponse::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"ast": null, "explain_plan": null, "suggestions": []})
        );
    }
}
