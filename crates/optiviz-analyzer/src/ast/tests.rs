//! Tests for AST traversal and extractors

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn column_ref(parts: &[&str]) -> TreeValue {
    let fields: Vec<_> = parts
        .iter()
        .map(|part| json!({"String": {"sval": part}}))
        .collect();
    json!({"ColumnRef": {"fields": fields}})
}

// ============================================================================
// Walk
// ============================================================================

mod walk_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_visits_every_object_in_pre_order() {
        let tree = json!({
            "id": "root",
            "first": {"id": "a", "nested": {"id": "a1"}},
            "list": [{"id": "b"}, 1, "text", [{"id": "c"}]],
            "last": {"id": "d"},
        });

        let mut seen = Vec::new();
        walk(&tree, |node| {
            seen.push(node.get("id").and_then(TreeValue::as_str).unwrap_or("?"));
        });

        assert_eq!(seen, vec!["root", "a", "a1", "b", "c", "d"]);
    }

    #[test]
    fn test_scalar_root_visits_nothing() {
        let mut count = 0;
        walk(&json!("just a string"), |_| count += 1);
        walk(&TreeValue::Null, |_| count += 1);
        walk(&json!(42), |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_array_root_visits_elements() {
        let tree = json!([{"a": 1}, {"b": {"c": 2}}]);
        assert_eq!(object_nodes(&tree).count(), 3);
    }

    #[test]
    fn test_deeply_nested_tree_does_not_overflow() {
        let mut tree = json!({"leaf": true});
        for _ in 0..10_000 {
            let mut parent = TreeObject::new();
            parent.insert("child".to_string(), TreeValue::Array(vec![tree]));
            tree = TreeValue::Object(parent);
        }

        assert_eq!(object_nodes(&tree).count(), 10_001);

        // `Value` drops recursively
        std::mem::forget(tree);
    }
}

// ============================================================================
// Extractors
// ============================================================================

mod column_name_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_column() {
        assert_eq!(extract_column_name(&column_ref(&["email"])), Some("email"));
    }

    #[test]
    fn test_qualified_column_uses_last_segment() {
        let node = column_ref(&["public", "users", "email"]);
        assert_eq!(extract_column_name(&node), Some("email"));
    }

    #[test]
    fn test_star_does_not_match() {
        let node = json!({"ColumnRef": {"fields": [{"A_Star": {}}]}});
        assert_eq!(extract_column_name(&node), None);
    }

    #[test]
    fn test_mismatched_shapes() {
        assert_eq!(extract_column_name(&json!({"ColumnRef": {"fields": []}})), None);
        assert_eq!(extract_column_name(&json!({"ColumnRef": {"fields": "email"}})), None);
        assert_eq!(extract_column_name(&json!({"ColumnRef": "email"})), None);
        assert_eq!(extract_column_name(&json!({"A_Const": {}})), None);
        assert_eq!(extract_column_name(&json!(["ColumnRef"])), None);
        assert_eq!(
            extract_column_name(&json!({"ColumnRef": {"fields": [{"String": {"sval": 7}}]}})),
            None
        );
    }
}

mod const_string_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_constant() {
        let node = json!({"A_Const": {"sval": {"sval": "%foo"}}});
        assert_eq!(extract_const_string(&node), Some("%foo"));
    }

    #[test]
    fn test_non_string_constants_do_not_match() {
        assert_eq!(extract_const_string(&json!({"A_Const": {"ival": {"ival": 1}}})), None);
        assert_eq!(extract_const_string(&json!({"A_Const": {"sval": "flat"}})), None);
        assert_eq!(extract_const_string(&column_ref(&["email"])), None);
        assert_eq!(extract_const_string(&TreeValue::Null), None);
    }
}

mod function_call_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn func_call(name: &[&str], args: Vec<TreeValue>) -> TreeValue {
        let funcname: Vec<_> = name
            .iter()
            .map(|part| json!({"String": {"sval": part}}))
            .collect();
        json!({"FuncCall": {"funcname": funcname, "args": args}})
    }

    #[test]
    fn test_name_is_lower_cased() {
        let node = func_call(&["LOWER"], vec![column_ref(&["email"])]);
        let call = extract_function_call(&node).expect("should match");

        assert_eq!(call.name, "lower");
        assert_eq!(call.args.len(), 1);
        assert_eq!(call.first_arg().and_then(extract_column_name), Some("email"));
    }

    #[test]
    fn test_qualified_name_uses_last_segment() {
        let node = func_call(&["pg_catalog", "Upper"], vec![]);
        assert_eq!(extract_function_call(&node).unwrap().name, "upper");
    }

    #[test]
    fn test_missing_args_yield_empty_list() {
        let node = json!({"FuncCall": {"funcname": [{"String": {"sval": "now"}}]}});
        let call = extract_function_call(&node).expect("should match");
        assert!(call.args.is_empty());
        assert!(call.first_arg().is_none());
    }

    #[test]
    fn test_empty_or_missing_name_fails() {
        assert!(extract_function_call(&json!({"FuncCall": {"funcname": []}})).is_none());
        assert!(extract_function_call(&json!({"FuncCall": {"args": []}})).is_none());
        assert!(
            extract_function_call(&json!({"FuncCall": {"funcname": [{"A_Star": {}}]}}))
                .is_none()
        );
    }
}

mod comparison_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_like_comparison() {
        let node = json!({"A_Expr": {
            "kind": "AEXPR_LIKE",
            "lexpr": column_ref(&["email"]),
            "rexpr": {"A_Const": {"sval": {"sval": "%foo"}}},
        }});
        let expr = ComparisonExpr::from_node(node.as_object().unwrap()).expect("should match");

        assert!(expr.is_like());
        assert_eq!(expr.left().and_then(extract_column_name), Some("email"));
        assert_eq!(expr.right().and_then(extract_const_string), Some("%foo"));
    }

    #[test]
    fn test_operator_comparison_is_not_like() {
        let node = json!({"A_Expr": {"kind": "AEXPR_OP"}});
        let expr = ComparisonExpr::from_node(node.as_object().unwrap()).unwrap();

        assert_eq!(expr.kind(), Some("AEXPR_OP"));
        assert!(!expr.is_like());
        assert!(expr.left().is_none());
        assert!(expr.right().is_none());
    }

    #[test]
    fn test_non_comparison_nodes() {
        let node = json!({"BoolExpr": {"args": []}});
        assert!(ComparisonExpr::from_node(node.as_object().unwrap()).is_none());

        let node = json!({"A_Expr": "broken"});
        assert!(ComparisonExpr::from_node(node.as_object().unwrap()).is_none());
    }
}
