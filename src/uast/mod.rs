//! Syntax tree types - the UAST node model
//!
//! Trees are produced by the external UAST service. This crate decodes them,
//! renders them as JSON and queries them, but never builds one for a client.
//!
//! Every node carries:
//! - `internal_type`: the driver's type tag (`File`, `CallExpression`, ...)
//! - `token`: the source token, empty for inner nodes
//! - `properties`: extra driver attributes, ordered by key
//! - `children`: ordered child nodes
//! - a position range and the roles assigned in annotated/semantic modes

pub mod codec;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest root-to-leaf path, in nodes, a decoded tree may have.
///
/// Decoding, cloning, dropping and JSON rendering all recurse per level, so
/// the cap keeps them within a worker thread's stack.
pub const MAX_TREE_DEPTH: usize = 512;

/// A point in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the content (0-indexed)
    pub offset: u32,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed)
    pub col: u32,
}

impl Position {
    pub fn new(offset: u32, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// A node in a syntax tree.
///
/// Properties use a `BTreeMap` so that encoding and JSON rendering are
/// deterministic for identical trees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub internal_type: String,
    pub token: String,
    pub properties: BTreeMap<String, String>,
    #[serde(deserialize_with = "depth::children")]
    pub children: Vec<Node>,
    pub start_position: Option<Position>,
    pub end_position: Option<Position>,
    pub roles: Vec<String>,
}

impl Node {
    /// Create a node with the given internal type
    pub fn new(internal_type: impl Into<String>) -> Self {
        Self {
            internal_type: internal_type.into(),
            ..Self::default()
        }
    }

    /// Builder: set the token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Builder: add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Builder: append a child
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: add a role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Builder: set the position range
    pub fn with_span(mut self, start: Position, end: Position) -> Self {
        self.start_position = Some(start);
        self.end_position = Some(end);
        self
    }

    /// Look up an attribute by the name used in query predicates.
    ///
    /// `internalType` and `token` address the node fields, anything else is
    /// looked up in the property map. Roles are multi-valued and are not
    /// reachable here.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "internalType" => Some(self.internal_type.as_str()),
            "token" => Some(self.token.as_str()),
            _ => self.properties.get(name).map(String::as_str),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Iterate the subtree rooted at this node in pre-order (document order)
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of nodes in the subtree, including this one
    pub fn size(&self) -> usize {
        self.pre_order().count()
    }
}

mod depth {
    use super::{Node, MAX_TREE_DEPTH};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use std::cell::Cell;

    thread_local! {
        static DEPTH: Cell<usize> = const { Cell::new(0) };
    }

    /// One level of nesting on the current thread; released on drop
    struct Level;

    impl Level {
        fn enter() -> Option<Self> {
            DEPTH.with(|depth| {
                let next = depth.get() + 1;
                if next > MAX_TREE_DEPTH {
                    return None;
                }
                depth.set(next);
                Some(Level)
            })
        }
    }

    impl Drop for Level {
        fn drop(&mut self) {
            DEPTH.with(|depth| depth.set(depth.get() - 1));
        }
    }

    pub(super) fn children<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let _level = Level::enter().ok_or_else(|| {
            D::Error::custom(format!("tree exceeds maximum depth {}", MAX_TREE_DEPTH))
        })?;
        Vec::<Node>::deserialize(deserializer)
    }
}

/// Depth-first, pre-order traversal without recursion
pub struct PreOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::new("File")
            .with_child(
                Node::new("Call")
                    .with_child(Node::new("Identifier").with_token("log"))
                    .with_child(Node::new("String").with_token("test")),
            )
            .with_child(Node::new("Comment").with_token("// done"))
    }

    #[test]
    fn test_pre_order() {
        let tree = sample();
        let types: Vec<_> = tree.pre_order().map(|n| n.internal_type.as_str()).collect();
        assert_eq!(types, vec!["File", "Call", "Identifier", "String", "Comment"]);
        assert_eq!(tree.size(), 5);
    }

    #[test]
    fn test_attribute_lookup() {
        let node = Node::new("Identifier")
            .with_token("console")
            .with_property("computed", "false")
            .with_role("Expression");

        assert_eq!(node.attribute("internalType"), Some("Identifier"));
        assert_eq!(node.attribute("token"), Some("console"));
        assert_eq!(node.attribute("computed"), Some("false"));
        assert_eq!(node.attribute("missing"), None);
        assert!(node.has_role("Expression"));
        assert!(!node.has_role("Call"));
    }

    #[test]
    fn test_json_field_names() {
        let node = Node::new("String")
            .with_token("test")
            .with_span(Position::new(12, 1, 13), Position::new(18, 1, 19));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["internalType"], "String");
        assert_eq!(json["startPosition"]["col"], 13);
        assert_eq!(json["endPosition"]["offset"], 18);
    }
}
