//! Generic tree value
//!
//! Both the SQL AST and the execution plan arrive as JSON documents. They are held
//! as [`TreeValue`] and navigated dynamically: node shapes are discovered by key
//! lookup, and every accessor returns `None` when the shape does not match.

use crate::Result;

/// A parsed JSON tree (object, array, string, number, bool or null).
///
/// Object keys keep the order in which the upstream producer emitted them.
pub type TreeValue = serde_json::Value;

/// The object variant of a [`TreeValue`].
pub type TreeObject = serde_json::Map<String, TreeValue>;

/// Parses JSON text into a tree.
pub fn parse_tree(text: &str) -> Result<TreeValue> {
    Ok(serde_json::from_str(text)?)
}

/// Keyed, shape-checked access into a tree node.
///
/// Every method returns `None` when the node is not an object, the key is missing,
/// or the value under the key has a different type.
pub trait TreeAccess {
    /// Returns the raw value stored under `key`
    fn field(&self, key: &str) -> Option<&TreeValue>;

    /// Returns the value under `key` if it is an object
    fn object(&self, key: &str) -> Option<&TreeObject> {
        self.field(key).and_then(TreeValue::as_object)
    }

    /// Returns the value under `key` if it is an array
    fn array(&self, key: &str) -> Option<&[TreeValue]> {
        self.field(key)
            .and_then(TreeValue::as_array)
            .map(Vec::as_slice)
    }

    /// Returns the value under `key` if it is a string
    fn string(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(TreeValue::as_str)
    }
}

impl TreeAccess for TreeValue {
    fn field(&self, key: &str) -> Option<&TreeValue> {
        self.as_object()?.get(key)
    }
}

impl TreeAccess for TreeObject {
    fn field(&self, key: &str) -> Option<&TreeValue> {
        self.get(key)
    }
}
