//! Path Expression Results

use crate::dom::{Node, NodeList};

/// Outcome of evaluating a path expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[must_use]
pub enum PathResult<'a> {
    /// Nothing matched, or the expression was malformed
    #[default]
    Empty,
    /// Single node
    Node(Node<'a>),
    /// Matches of a `//name` step, possibly none
    Nodes(NodeList<'a>),
    /// Output of `text()`, `//text()` or `@attr`
    Text(String),
}

impl<'a> PathResult<'a> {
    pub fn is_empty(&self) -> bool {
        matches!(self, PathResult::Empty)
    }

    /// True for a node list
    pub fn is_multi(&self) -> bool {
        matches!(self, PathResult::Nodes(_))
    }

    pub fn as_node(&self) -> Option<Node<'a>> {
        match self {
            PathResult::Node(node) => Some(*node),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&NodeList<'a>> {
        match self {
            PathResult::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PathResult::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Node results as a list; text and empty results give an empty list
    pub fn into_nodes(self) -> NodeList<'a> {
        match self {
            PathResult::Node(node) => std::iter::once(node).collect(),
            PathResult::Nodes(nodes) => nodes,
            PathResult::Empty | PathResult::Text(_) => NodeList::new(),
        }
    }
}

impl<'a> From<Node<'a>> for PathResult<'a> {
    fn from(node: Node<'a>) -> Self {
        PathResult::Node(node)
    }
}

impl<'a> From<NodeList<'a>> for PathResult<'a> {
    fn from(nodes: NodeList<'a>) -> Self {
        PathResult::Nodes(nodes)
    }
}

impl From<String> for PathResult<'_> {
    fn from(text: String) -> Self {
        PathResult::Text(text)
    }
}
