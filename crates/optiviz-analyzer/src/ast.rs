//! AST traversal and pattern extraction
//!
//! The AST follows the external parser's JSON conventions: every construct is an
//! object keyed by its node name (`A_Expr`, `ColumnRef`, `A_Const`, `FuncCall`, ...).
//! The walk here knows nothing about those names. Extractors opt in to a specific
//! shape and return `None` when the node does not have it.

use optiviz_core::{TreeAccess, TreeObject, TreeValue};

/// `kind` tag of a `LIKE` comparison
pub const LIKE_KIND: &str = "AEXPR_LIKE";

/// Calls `visitor` once for every object in the tree, parents before children.
///
/// Object values are visited in key order and array elements in index order.
/// Scalars are never passed to the visitor.
pub fn walk<'a, F>(value: &'a TreeValue, mut visitor: F)
where
    F: FnMut(&'a TreeObject),
{
    for node in object_nodes(value) {
        visitor(node);
    }
}

/// Returns an iterator over every object in the tree, in [`walk`] order
pub fn object_nodes(value: &TreeValue) -> ObjectNodes<'_> {
    ObjectNodes { stack: vec![value] }
}

/// Depth-first, pre-order iterator over the objects of a tree
pub struct ObjectNodes<'a> {
    stack: Vec<&'a TreeValue>,
}

impl<'a> Iterator for ObjectNodes<'a> {
    type Item = &'a TreeObject;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(value) = self.stack.pop() {
            match value {
                TreeValue::Object(node) => {
                    // Push in reverse so the first key is visited first
                    self.stack.extend(node.values().rev());
                    return Some(node);
                }
                TreeValue::Array(items) => self.stack.extend(items.iter().rev()),
                _ => {}
            }
        }
        None
    }
}

/// Decodes a `{"String": {"sval": ...}}` name segment
fn string_node(value: &TreeValue) -> Option<&str> {
    value.object("String")?.string("sval")
}

/// Returns the unqualified column name of a `ColumnRef` node.
///
/// Qualified references (`t.email`) store the column as the last `fields` segment.
pub fn extract_column_name(node: &TreeValue) -> Option<&str> {
    let fields = node.object("ColumnRef")?.array("fields")?;
    string_node(fields.last()?)
}

/// Returns the literal text of an `A_Const` string constant
pub fn extract_const_string(node: &TreeValue) -> Option<&str> {
    node.object("A_Const")?.object("sval")?.string("sval")
}

/// A `FuncCall` node with its name and arguments
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall<'a> {
    /// Lower-cased last segment of the function name
    pub name: String,
    pub args: &'a [TreeValue],
}

impl<'a> FunctionCall<'a> {
    pub fn first_arg(&self) -> Option<&'a TreeValue> {
        self.args.first()
    }
}

/// Returns the function call encoded by `node`.
///
/// Schema-qualified names (`pg_catalog.lower`) match on their last segment. A call
/// without arguments yields an empty argument list.
pub fn extract_function_call(node: &TreeValue) -> Option<FunctionCall<'_>> {
    let call = node.object("FuncCall")?;
    let name = string_node(call.array("funcname")?.last()?)?;

    Some(FunctionCall {
        name: name.to_lowercase(),
        args: call.array("args").unwrap_or(&[]),
    })
}

/// View over an `A_Expr` comparison wrapper
#[derive(Debug, Clone, Copy)]
pub struct ComparisonExpr<'a> {
    expr: &'a TreeObject,
}

impl<'a> ComparisonExpr<'a> {
    /// Returns the comparison wrapped by `node`, if it holds one
    pub fn from_node(node: &'a TreeObject) -> Option<Self> {
        node.object("A_Expr").map(|expr| Self { expr })
    }

    pub fn kind(&self) -> Option<&'a str> {
        let expr: &'a TreeObject = self.expr;
        expr.string("kind")
    }

    pub fn is_like(&self) -> bool {
        self.kind() == Some(LIKE_KIND)
    }

    /// Left operand (`lexpr`)
    pub fn left(&self) -> Option<&'a TreeValue> {
        self.expr.get("lexpr")
    }

    /// Right operand (`rexpr`)
    pub fn right(&self) -> Option<&'a TreeValue> {
        self.expr.get("rexpr")
    }
}

#[cfg(test)]
mod tests;
