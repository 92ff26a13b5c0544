//! Query evaluation
//!
//! The tree is flattened into pre-order slots. Slot 0 is the virtual document
//! root and slot `i > 0` is the `i`-th node visited. Every subtree then covers
//! a contiguous slot range, and a sorted slot set is already in document order.

use std::collections::BTreeSet;

use super::{Axis, Query, Step};
use crate::uast::Node;

const DOCUMENT: usize = 0;

struct FlatTree<'a> {
    /// Node for slot `i` lives at `nodes[i - 1]`
    nodes: Vec<&'a Node>,
    /// Child slots per slot, in order
    children: Vec<Vec<usize>>,
    /// One past the last slot of each subtree
    ends: Vec<usize>,
}

impl<'a> FlatTree<'a> {
    fn new(root: &'a Node) -> Self {
        let mut nodes = Vec::new();
        let mut parents = vec![DOCUMENT];
        let mut stack: Vec<(&'a Node, usize)> = vec![(root, DOCUMENT)];

        while let Some((node, parent)) = stack.pop() {
            nodes.push(node);
            let slot = nodes.len();
            parents.push(parent);
            stack.extend(node.children.iter().rev().map(|child| (child, slot)));
        }

        let len = nodes.len() + 1;
        let mut children = vec![Vec::new(); len];
        let mut ends: Vec<usize> = (1..=len).collect();
        ends[DOCUMENT] = len;

        for slot in 1..len {
            children[parents[slot]].push(slot);
        }
        // Children always sit after their parent, so one backwards pass settles the ranges
        for slot in (1..len).rev() {
            let parent = parents[slot];
            ends[parent] = ends[parent].max(ends[slot]);
        }

        Self { nodes, children, ends }
    }

    fn node(&self, slot: usize) -> &'a Node {
        self.nodes[slot - 1]
    }

    fn step(&self, context: &BTreeSet<usize>, step: &Step) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        for &slot in context {
            match step.axis {
                Axis::Child => out.extend(self.children[slot].iter().copied()),
                Axis::Descendant => out.extend(slot + 1..self.ends[slot]),
            }
        }

        out.retain(|&slot| {
            let node = self.node(slot);
            step.test.matches(node) && step.predicates.iter().all(|p| p.matches(node))
        });
        out
    }
}

/// Evaluate a query against one tree; matches come back in document order
pub fn evaluate<'a>(query: &Query, root: &'a Node) -> Vec<&'a Node> {
    let tree = FlatTree::new(root);

    let mut context = BTreeSet::from([DOCUMENT]);
    for step in &query.steps {
        if context.is_empty() {
            break;
        }
        context = tree.step(&context, step);
    }

    context.into_iter().map(|slot| tree.node(slot)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `console.log('test')` shaped like a JavaScript driver's output
    fn js_tree() -> Node {
        Node::new("File").with_child(
            Node::new("Program").with_child(
                Node::new("ExpressionStatement").with_child(
                    Node::new("CallExpression")
                        .with_role("Call")
                        .with_child(
                            Node::new("MemberExpression")
                                .with_child(Node::new("Identifier").with_token("console"))
                                .with_child(Node::new("Identifier").with_token("log")),
                        )
                        .with_child(Node::new("StringLiteral").with_token("test")),
                ),
            ),
        )
    }

    fn run(query: &str, tree: &Node) -> Vec<String> {
        Query::parse(query)
            .unwrap()
            .evaluate(tree)
            .into_iter()
            .map(|n| {
                if n.token.is_empty() {
                    n.internal_type.clone()
                } else {
                    format!("{}({})", n.internal_type, n.token)
                }
            })
            .collect()
    }

    #[test]
    fn test_flat_tree_ranges() {
        let tree = js_tree();
        let flat = FlatTree::new(&tree);
        assert_eq!(flat.nodes.len(), 8);
        assert_eq!(flat.ends[DOCUMENT], 9);
        assert_eq!(flat.ends[1], 9);
        // MemberExpression holds the two identifiers
        assert_eq!(flat.node(5).internal_type, "MemberExpression");
        assert_eq!(flat.ends[5], 8);
        assert_eq!(flat.children[4], vec![5, 8]);
    }

    #[test]
    fn test_wildcard_is_pre_order() {
        let tree = js_tree();
        assert_eq!(
            run("//*", &tree),
            vec![
                "File",
                "Program",
                "ExpressionStatement",
                "CallExpression",
                "MemberExpression",
                "Identifier(console)",
                "Identifier(log)",
                "StringLiteral(test)",
            ]
        );
    }

    #[test]
    fn test_root_type() {
        let tree = js_tree();
        assert_eq!(run("//File", &tree), vec!["File"]);
        assert_eq!(run("/File", &tree), vec!["File"]);
        assert!(run("/Program", &tree).is_empty());
    }

    #[test]
    fn test_type_at_any_depth() {
        let tree = js_tree();
        assert_eq!(run("//Identifier", &tree), vec!["Identifier(console)", "Identifier(log)"]);
    }

    #[test]
    fn test_child_steps() {
        let tree = js_tree();
        assert_eq!(run("/File/Program/*", &tree), vec!["ExpressionStatement"]);
        assert_eq!(run("//CallExpression/*", &tree), vec!["MemberExpression", "StringLiteral(test)"]);
    }

    #[test]
    fn test_descendant_excludes_context() {
        let tree = js_tree();
        assert_eq!(run("//MemberExpression//*", &tree), vec!["Identifier(console)", "Identifier(log)"]);
    }

    #[test]
    fn test_nested_matches_dedupe() {
        let tree = Node::new("Block").with_child(Node::new("Block").with_child(Node::new("Leaf")));
        // Leaf is reachable from both blocks but reported once
        assert_eq!(run("//Block//Leaf", &tree), vec!["Leaf"]);
        assert_eq!(run("//Block", &tree), vec!["Block", "Block"]);
    }

    #[test]
    fn test_predicates_filter() {
        let tree = js_tree();
        assert_eq!(run("//Identifier[@token='log']", &tree), vec!["Identifier(log)"]);
        assert_eq!(run("//*[@role='Call']", &tree), vec!["CallExpression"]);
        assert_eq!(run("//*[@token]", &tree).len(), 3);
    }

    #[test]
    fn test_no_match() {
        let tree = js_tree();
        assert!(run("//FunctionDeclaration", &tree).is_empty());
        assert!(run("/Nope//*", &tree).is_empty());
    }
}
