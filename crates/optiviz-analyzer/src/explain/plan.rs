//! Query Plan Model - Read-only views over EXPLAIN plan trees
//!
//! Plan nodes stay as [`TreeValue`] objects. [`PlanNode`] reads the well-known keys
//! (`Node Type`, `Relation Name`, `Alias`, `Filter`, `Plans`) on demand, so a
//! truncated or partially malformed plan yields fewer nodes rather than an error.

use optiviz_core::{TreeAccess, TreeObject, TreeValue};

const NODE_TYPE: &str = "Node Type";
const RELATION_NAME: &str = "Relation Name";
const ALIAS: &str = "Alias";
const FILTER: &str = "Filter";
const PLANS: &str = "Plans";
const PLAN_ENVELOPE: &str = "Plan";

/// `Node Type` tag of a sequential scan
const SEQ_SCAN: &str = "Seq Scan";

/// Returns the real root node of an EXPLAIN payload.
///
/// A top-level array contributes only its first element; multi-statement output is
/// not examined past the first plan. A `{"Plan": ...}` envelope is unwrapped.
/// Anything else is treated as the root itself.
pub fn extract_plan_root(plan: Option<&TreeValue>) -> Option<&TreeValue> {
    let mut root = plan?;
    if let Some(items) = root.as_array() {
        root = items.first()?;
    }
    Some(root.field(PLAN_ENVELOPE).unwrap_or(root))
}

/// Calls `visitor` for `node` and then for each descendant, parents first.
///
/// Children are visited in `Plans` order. Values that are not objects are skipped.
pub fn traverse_plan<'a, F>(node: Option<&'a TreeValue>, mut visitor: F)
where
    F: FnMut(PlanNode<'a>),
{
    for plan_node in PlanNodeIter::new(node) {
        visitor(plan_node);
    }
}

/// Returns an iterator over `root` and all of its descendants
pub fn plan_nodes(root: &TreeValue) -> PlanNodeIter<'_> {
    PlanNodeIter::new(Some(root))
}

/// Read-only view over a single plan node object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanNode<'a> {
    node: &'a TreeObject,
}

impl<'a> PlanNode<'a> {
    /// Returns a view if `value` is an object
    pub fn from_value(value: &'a TreeValue) -> Option<Self> {
        value.as_object().map(|node| Self { node })
    }

    /// Raw `Node Type` tag, e.g. `"Seq Scan"`
    pub fn node_type(&self) -> Option<&'a str> {
        self.text(NODE_TYPE)
    }

    /// Whether this node reads its relation with a sequential scan
    pub fn is_seq_scan(&self) -> bool {
        self.node_type() == Some(SEQ_SCAN)
    }

    pub fn relation(&self) -> Option<&'a str> {
        self.text(RELATION_NAME)
    }

    pub fn alias(&self) -> Option<&'a str> {
        self.text(ALIAS)
    }

    /// Filter condition applied at this node
    pub fn filter(&self) -> Option<&'a str> {
        self.text(FILTER)
    }

    /// Child nodes in `Plans` order, skipping malformed entries
    pub fn children(self) -> impl DoubleEndedIterator<Item = PlanNode<'a>> {
        let node: &'a TreeObject = self.node;
        node.array(PLANS)
            .unwrap_or(&[])
            .iter()
            .filter_map(PlanNode::from_value)
    }

    /// The underlying object, for keys this view does not expose
    pub fn as_object(&self) -> &'a TreeObject {
        self.node
    }

    /// Non-empty string under `key`
    fn text(&self, key: &str) -> Option<&'a str> {
        let node: &'a TreeObject = self.node;
        node.string(key).filter(|s| !s.is_empty())
    }
}

/// Iterator for traversing plan nodes depth-first, pre-order
pub struct PlanNodeIter<'a> {
    stack: Vec<PlanNode<'a>>,
}

impl<'a> PlanNodeIter<'a> {
    /// Starts at `root`; yields nothing if it is absent or not an object
    pub fn new(root: Option<&'a TreeValue>) -> Self {
        Self {
            stack: root.and_then(PlanNode::from_value).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PlanNodeIter<'a> {
    type Item = PlanNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order so we visit them in order
        self.stack.extend(node.children().rev());
        Some(node)
    }
}
