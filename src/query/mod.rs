//! Path queries over syntax trees
//!
//! A small XPath subset. A query is an absolute location path made of steps:
//!
//! ```text
//! //*                         every node, root included
//! //CallExpression            every node typed CallExpression, at any depth
//! /File/Program               Program children of a File root
//! //Identifier[@token='log']  predicates on attributes
//! //*[@role='Call']           role membership
//! ```
//!
//! Queries are evaluated against a virtual document root whose only child is
//! the tree root, so `/File` selects a root typed `File`.

pub mod parser;
pub mod eval;

use crate::uast::Node;
use std::fmt;

/// A compiled path query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub steps: Vec<Step>,
}

/// One location step: axis, node test, predicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/` - direct children of the context node
    Child,
    /// `//` - any node below the context node
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// `*`
    Any,
    /// Matches `internal_type`
    Type(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[@name]` - attribute present and non-empty
    Has(String),
    /// `[@name='value']`
    Equals(String, String),
}

/// Query compilation error, with the byte offset of the offending input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at offset {position}")]
pub struct QueryError {
    pub position: usize,
    pub message: String,
}

impl QueryError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

impl Query {
    /// Compile a query string
    pub fn parse(input: &str) -> std::result::Result<Self, QueryError> {
        parser::parse(input)
    }

    /// Matches in document order
    pub fn evaluate<'a>(&self, root: &'a Node) -> Vec<&'a Node> {
        eval::evaluate(self, root)
    }
}

impl NodeTest {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            NodeTest::Any => true,
            NodeTest::Type(name) => node.internal_type == *name,
        }
    }
}

impl Predicate {
    pub fn matches(&self, node: &Node) -> bool {
        match self {
            Predicate::Has(name) if name == "role" => !node.roles.is_empty(),
            Predicate::Has(name) => node.attribute(name).is_some_and(|v| !v.is_empty()),
            Predicate::Equals(name, value) if name == "role" => node.has_role(value),
            Predicate::Equals(name, value) => node.attribute(name) == Some(value.as_str()),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match step.axis {
                Axis::Child => write!(f, "/")?,
                Axis::Descendant => write!(f, "//")?,
            }
            match &step.test {
                NodeTest::Any => write!(f, "*")?,
                NodeTest::Type(name) => write!(f, "{}", name)?,
            }
            for predicate in &step.predicates {
                match predicate {
                    Predicate::Has(name) => write!(f, "[@{}]", name)?,
                    Predicate::Equals(name, value) if value.contains('\'') => {
                        write!(f, "[@{}=\"{}\"]", name, value)?
                    }
                    Predicate::Equals(name, value) => write!(f, "[@{}='{}']", name, value)?,
                }
            }
        }
        Ok(())
    }
}
