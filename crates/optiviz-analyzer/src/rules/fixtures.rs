//! AST and plan builders shared by rule tests

use optiviz_core::TreeValue;
use serde_json::json;

pub(crate) fn column_ref(name: &str) -> TreeValue {
    json!({"ColumnRef": {"fields": [{"String": {"sval": name}}]}})
}

pub(crate) fn string_const(text: &str) -> TreeValue {
    json!({"A_Const": {"sval": {"sval": text}}})
}

pub(crate) fn int_const(value: i64) -> TreeValue {
    json!({"A_Const": {"ival": {"ival": value}}})
}

pub(crate) fn func_call(name: &str, args: Vec<TreeValue>) -> TreeValue {
    json!({"FuncCall": {
        "funcname": [{"String": {"sval": name}}],
        "args": args,
    }})
}

pub(crate) fn a_expr(kind: &str, lexpr: TreeValue, rexpr: TreeValue) -> TreeValue {
    json!({"A_Expr": {"kind": kind, "lexpr": lexpr, "rexpr": rexpr}})
}

pub(crate) fn like(lexpr: TreeValue, pattern: &str) -> TreeValue {
    a_expr("AEXPR_LIKE", lexpr, string_const(pattern))
}

pub(crate) fn and(args: Vec<TreeValue>) -> TreeValue {
    json!({"BoolExpr": {"boolop": "AND_EXPR", "args": args}})
}

/// `SELECT * FROM users WHERE <where_clause>`
pub(crate) fn select_where(where_clause: TreeValue) -> TreeValue {
    json!({
        "version": 160001,
        "stmts": [{
            "stmt": {"SelectStmt": {
                "fromClause": [{"RangeVar": {"relname": "users", "inh": true}}],
                "whereClause": where_clause,
            }}
        }]
    })
}

/// `SELECT * FROM users WHERE lower(email) LIKE '%foo'`
pub(crate) fn lower_email_like_ast() -> TreeValue {
    select_where(like(
        func_call("lower", vec![column_ref("email")]),
        "%foo",
    ))
}

pub(crate) fn seq_scan_plan(relation: &str) -> TreeValue {
    json!({"Plan": {"Node Type": "Seq Scan", "Relation Name": relation}})
}
