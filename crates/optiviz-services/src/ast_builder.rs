//! In-process SQL parser backed by `sqlparser`
//!
//! `sqlparser` produces its own typed AST. The rules match PostgreSQL parse-tree
//! node shapes (`SelectStmt`, `A_Expr`, `ColumnRef`, `FuncCall`, ...), so the typed
//! AST is rendered into those shapes here. Constructs with no counterpart below are
//! left out of the tree.

use optiviz_core::{TreeObject, TreeValue};
use serde_json::json;
use sqlparser::ast::{
    BinaryOperator, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments, Ident,
    JoinConstraint, JoinOperator, ObjectName, Query, Select, SelectItem, SetExpr, Statement,
    TableFactor, TableWithJoins, UnaryOperator, Value,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::parser::{ParseError, SqlParser};

/// Parse-tree format version reported alongside the statements
const PARSE_TREE_VERSION: u32 = 160001;

/// Parses PostgreSQL SQL with `sqlparser` and emits a PostgreSQL-shaped parse tree
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlparserAstParser;

impl SqlparserAstParser {
    pub fn new() -> Self {
        Self
    }
}

impl SqlParser for SqlparserAstParser {
    fn parse(&self, query: &str) -> Result<TreeValue, ParseError> {
        let statements = Parser::parse_sql(&PostgreSqlDialect {}, query)
            .map_err(|e| ParseError::Syntax(e.to_string()))?;

        let stmts: Vec<TreeValue> = statements
            .iter()
            .filter_map(statement_node)
            .map(|stmt| json!({ "stmt": stmt }))
            .collect();

        tracing::debug!(statements = stmts.len(), "parsed query");

        Ok(json!({ "version": PARSE_TREE_VERSION, "stmts": stmts }))
    }
}

fn statement_node(statement: &Statement) -> Option<TreeValue> {
    match statement {
        Statement::Query(query) => Some(query_node(query)),
        Statement::Update {
            table, selection, ..
        } => {
            let mut node = TreeObject::new();
            if let Some(relation) = table_factor_node(&table.relation) {
                node.insert("relation".into(), relation);
            }
            insert_expr(&mut node, "whereClause", selection.as_ref());
            Some(json!({ "UpdateStmt": node }))
        }
        Statement::Delete(delete) => {
            let mut node = TreeObject::new();
            insert_expr(&mut node, "whereClause", delete.selection.as_ref());
            Some(json!({ "DeleteStmt": node }))
        }
        Statement::Insert(insert) => {
            let mut node = TreeObject::new();
            if let Some(source) = &insert.source {
                node.insert("selectStmt".into(), query_node(source));
            }
            Some(json!({ "InsertStmt": node }))
        }
        Statement::Explain { statement, .. } => {
            let inner = statement_node(statement)?;
            Some(json!({ "ExplainStmt": { "query": inner } }))
        }
        _ => None,
    }
}

/// The statement node for `query.body`, with any CTEs attached as its
/// `withClause`
fn query_node(query: &Query) -> TreeValue {
    let mut node = set_expr_node(&query.body);

    if let Some(with) = &query.with {
        let ctes: Vec<TreeValue> = with
            .cte_tables
            .iter()
            .map(|cte| {
                json!({ "CommonTableExpr": {
                    "ctename": ident_name(&cte.alias.name),
                    "ctequery": query_node(&cte.query),
                }})
            })
            .collect();

        // node is `{"<Kind>Stmt": {...}}`
        if let Some(stmt) = node
            .as_object_mut()
            .and_then(|wrapper| wrapper.values_mut().next())
            .and_then(TreeValue::as_object_mut)
        {
            stmt.insert(
                "withClause".into(),
                json!({ "ctes": ctes, "recursive": with.recursive }),
            );
        }
    }

    node
}

fn set_expr_node(body: &SetExpr) -> TreeValue {
    match body {
        SetExpr::Select(select) => select_node(select),
        SetExpr::Query(query) => query_node(query),
        SetExpr::SetOperation {
            op, left, right, ..
        } => json!({ "SelectStmt": {
            "op": format!("SETOP_{}", op.to_string().to_uppercase()),
            "larg": set_expr_node(left),
            "rarg": set_expr_node(right),
        }}),
        SetExpr::Insert(statement) | SetExpr::Update(statement) => {
            statement_node(statement).unwrap_or_else(|| json!({}))
        }
        _ => json!({ "SelectStmt": {} }),
    }
}

fn select_node(select: &Select) -> TreeValue {
    let mut node = TreeObject::new();

    let targets: Vec<TreeValue> = select.projection.iter().map(select_item_node).collect();
    if !targets.is_empty() {
        node.insert("targetList".into(), TreeValue::Array(targets));
    }

    let from: Vec<TreeValue> = select.from.iter().filter_map(from_item_node).collect();
    if !from.is_empty() {
        node.insert("fromClause".into(), TreeValue::Array(from));
    }

    insert_expr(&mut node, "whereClause", select.selection.as_ref());
    insert_expr(&mut node, "havingClause", select.having.as_ref());

    json!({ "SelectStmt": node })
}

fn select_item_node(item: &SelectItem) -> TreeValue {
    match item {
        SelectItem::UnnamedExpr(expr) => json!({ "ResTarget": { "val": expr_node(expr) } }),
        SelectItem::ExprWithAlias { expr, alias } => json!({ "ResTarget": {
            "name": ident_name(alias),
            "val": expr_node(expr),
        }}),
        SelectItem::QualifiedWildcard(name, _) => {
            let mut fields: Vec<TreeValue> = name.0.iter().map(ident_string).collect();
            fields.push(json!({ "A_Star": {} }));
            json!({ "ResTarget": { "val": { "ColumnRef": { "fields": fields } } } })
        }
        SelectItem::Wildcard(_) => {
            json!({ "ResTarget": { "val": { "ColumnRef": { "fields": [{ "A_Star": {} }] } } } })
        }
    }
}

/// A FROM item with its joins folded left to right into nested `JoinExpr` nodes
fn from_item_node(item: &TableWithJoins) -> Option<TreeValue> {
    let mut node = table_factor_node(&item.relation)?;

    for join in &item.joins {
        let Some(rarg) = table_factor_node(&join.relation) else {
            continue;
        };
        let (jointype, quals) = join_parts(&join.join_operator);

        let mut join_node = TreeObject::new();
        join_node.insert("jointype".into(), jointype.into());
        join_node.insert("larg".into(), node);
        join_node.insert("rarg".into(), rarg);
        insert_expr(&mut join_node, "quals", quals);
        node = json!({ "JoinExpr": join_node });
    }

    Some(node)
}

fn join_parts(operator: &JoinOperator) -> (&'static str, Option<&Expr>) {
    fn on(constraint: &JoinConstraint) -> Option<&Expr> {
        match constraint {
            JoinConstraint::On(expr) => Some(expr),
            _ => None,
        }
    }

    match operator {
        JoinOperator::Inner(constraint) => ("JOIN_INNER", on(constraint)),
        JoinOperator::LeftOuter(constraint) => ("JOIN_LEFT", on(constraint)),
        JoinOperator::RightOuter(constraint) => ("JOIN_RIGHT", on(constraint)),
        JoinOperator::FullOuter(constraint) => ("JOIN_FULL", on(constraint)),
        _ => ("JOIN_INNER", None),
    }
}

fn table_factor_node(factor: &TableFactor) -> Option<TreeValue> {
    match factor {
        TableFactor::Table { name, alias, .. } => {
            let mut node = range_var(name);
            if let Some(alias) = alias {
                node.insert(
                    "alias".into(),
                    json!({ "aliasname": ident_name(&alias.name) }),
                );
            }
            Some(json!({ "RangeVar": node }))
        }
        TableFactor::Derived {
            subquery, alias, ..
        } => {
            let mut node = TreeObject::new();
            node.insert("subquery".into(), query_node(subquery));
            if let Some(alias) = alias {
                node.insert(
                    "alias".into(),
                    json!({ "aliasname": ident_name(&alias.name) }),
                );
            }
            Some(json!({ "RangeSubselect": node }))
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => from_item_node(table_with_joins),
        _ => None,
    }
}

fn range_var(name: &ObjectName) -> TreeObject {
    let mut node = TreeObject::new();
    let mut parts = name.0.iter().rev();
    if let Some(relname) = parts.next() {
        node.insert("relname".into(), ident_name(relname).into());
    }
    if let Some(schemaname) = parts.next() {
        node.insert("schemaname".into(), ident_name(schemaname).into());
    }
    node.insert("inh".into(), true.into());
    node
}

fn insert_expr(node: &mut TreeObject, key: &str, expr: Option<&Expr>) {
    if let Some(expr) = expr {
        node.insert(key.into(), expr_node(expr));
    }
}

fn expr_node(expr: &Expr) -> TreeValue {
    match expr {
        Expr::Identifier(ident) => column_ref(std::slice::from_ref(ident)),
        Expr::CompoundIdentifier(idents) => column_ref(idents),
        Expr::Value(value) => const_node(value),
        Expr::Nested(inner) => expr_node(inner),
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => bool_expr("AND_EXPR", flatten_bool(expr, op)),
            BinaryOperator::Or => bool_expr("OR_EXPR", flatten_bool(expr, op)),
            _ => a_expr(
                "AEXPR_OP",
                &op.to_string(),
                Some(expr_node(left)),
                expr_node(right),
            ),
        },
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => bool_expr("NOT_EXPR", vec![expr_node(expr)]),
        Expr::UnaryOp { op, expr } => a_expr("AEXPR_OP", &op.to_string(), None, expr_node(expr)),
        Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => a_expr(
            "AEXPR_LIKE",
            if *negated { "!~~" } else { "~~" },
            Some(expr_node(expr)),
            expr_node(pattern),
        ),
        Expr::ILike {
            negated,
            expr,
            pattern,
            ..
        } => a_expr(
            "AEXPR_ILIKE",
            if *negated { "!~~*" } else { "~~*" },
            Some(expr_node(expr)),
            expr_node(pattern),
        ),
        Expr::InList {
            expr,
            list,
            negated,
            ..
        } => a_expr(
            "AEXPR_IN",
            if *negated { "<>" } else { "=" },
            Some(expr_node(expr)),
            TreeValue::Array(list.iter().map(expr_node).collect()),
        ),
        Expr::Between {
            expr,
            negated,
            low,
            high,
            ..
        } => a_expr(
            if *negated {
                "AEXPR_NOT_BETWEEN"
            } else {
                "AEXPR_BETWEEN"
            },
            if *negated { "NOT BETWEEN" } else { "BETWEEN" },
            Some(expr_node(expr)),
            json!([expr_node(low), expr_node(high)]),
        ),
        Expr::IsNull(inner) => null_test(inner, "IS_NULL"),
        Expr::IsNotNull(inner) => null_test(inner, "IS_NOT_NULL"),
        Expr::Function(function) => func_call(function),
        Expr::Cast {
            expr, data_type, ..
        } => json!({ "TypeCast": {
            "arg": expr_node(expr),
            "typeName": { "names": [string_value(&data_type.to_string().to_lowercase())] },
        }}),
        Expr::Subquery(query) => json!({ "SubLink": {
            "subLinkType": "EXPR_SUBLINK",
            "subselect": query_node(query),
        }}),
        Expr::Exists {
            subquery, negated, ..
        } => {
            let link = json!({ "SubLink": {
                "subLinkType": "EXISTS_SUBLINK",
                "subselect": query_node(subquery),
            }});
            if *negated {
                bool_expr("NOT_EXPR", vec![link])
            } else {
                link
            }
        }
        Expr::InSubquery {
            expr,
            subquery,
            negated,
            ..
        } => {
            let link = json!({ "SubLink": {
                "subLinkType": "ANY_SUBLINK",
                "testexpr": expr_node(expr),
                "subselect": query_node(subquery),
            }});
            if *negated {
                bool_expr("NOT_EXPR", vec![link])
            } else {
                link
            }
        }
        _ => TreeValue::Null,
    }
}

/// Collects the operands of a chain of the same boolean operator, so that
/// `a AND b AND c` becomes one `BoolExpr` with three arguments.
fn flatten_bool(expr: &Expr, operator: &BinaryOperator) -> Vec<TreeValue> {
    let mut args = Vec::new();
    let mut pending = vec![expr];

    while let Some(current) = pending.pop() {
        match current {
            Expr::BinaryOp { left, op, right } if op == operator => {
                pending.push(right);
                pending.push(left);
            }
            other => args.push(expr_node(other)),
        }
    }

    args
}

fn bool_expr(boolop: &str, args: Vec<TreeValue>) -> TreeValue {
    json!({ "BoolExpr": { "boolop": boolop, "args": args } })
}

fn a_expr(kind: &str, name: &str, lexpr: Option<TreeValue>, rexpr: TreeValue) -> TreeValue {
    let mut node = TreeObject::new();
    node.insert("kind".into(), kind.into());
    node.insert("name".into(), json!([string_value(name)]));
    if let Some(lexpr) = lexpr {
        node.insert("lexpr".into(), lexpr);
    }
    node.insert("rexpr".into(), rexpr);
    json!({ "A_Expr": node })
}

fn null_test(arg: &Expr, nulltesttype: &str) -> TreeValue {
    json!({ "NullTest": { "arg": expr_node(arg), "nulltesttype": nulltesttype } })
}

fn func_call(function: &Function) -> TreeValue {
    let mut node = TreeObject::new();
    let funcname: Vec<TreeValue> = function.name.0.iter().map(ident_string).collect();
    node.insert("funcname".into(), TreeValue::Array(funcname));

    if let FunctionArguments::List(list) = &function.args {
        let mut args = Vec::new();
        for arg in &list.args {
            match arg {
                FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => args.push(expr_node(expr)),
                FunctionArg::Unnamed(FunctionArgExpr::Wildcard) => {
                    node.insert("agg_star".into(), true.into());
                }
                FunctionArg::Named {
                    arg: FunctionArgExpr::Expr(expr),
                    ..
                } => args.push(expr_node(expr)),
                _ => {}
            }
        }
        if !args.is_empty() {
            node.insert("args".into(), TreeValue::Array(args));
        }
    }

    json!({ "FuncCall": node })
}

fn column_ref(idents: &[Ident]) -> TreeValue {
    let fields: Vec<TreeValue> = idents.iter().map(ident_string).collect();
    json!({ "ColumnRef": { "fields": fields } })
}

fn const_node(value: &Value) -> TreeValue {
    match value {
        Value::SingleQuotedString(text)
        | Value::EscapedStringLiteral(text)
        | Value::NationalStringLiteral(text) => json!({ "A_Const": { "sval": { "sval": text } } }),
        Value::DollarQuotedString(dollar) => {
            json!({ "A_Const": { "sval": { "sval": dollar.value } } })
        }
        Value::Number(number, _) => match number.parse::<i64>() {
            Ok(ival) => json!({ "A_Const": { "ival": { "ival": ival } } }),
            Err(_) => json!({ "A_Const": { "fval": { "fval": number } } }),
        },
        Value::Boolean(boolval) => json!({ "A_Const": { "boolval": { "boolval": boolval } } }),
        Value::Null => json!({ "A_Const": { "isnull": true } }),
        Value::Placeholder(placeholder) => {
            let number = placeholder
                .trim_start_matches('$')
                .parse::<u32>()
                .unwrap_or_default();
            json!({ "ParamRef": { "number": number } })
        }
        _ => json!({ "A_Const": {} }),
    }
}

/// Identifier text as PostgreSQL stores it: unquoted names fold to lower case
fn ident_name(ident: &Ident) -> String {
    match ident.quote_style {
        Some(_) => ident.value.clone(),
        None => ident.value.to_lowercase(),
    }
}

fn ident_string(ident: &Ident) -> TreeValue {
    string_value(&ident_name(ident))
}

fn string_value(text: &str) -> TreeValue {
    json!({ "String": { "sval": text } })
}
