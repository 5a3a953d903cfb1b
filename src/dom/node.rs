//! XML Node representation
//!
//! Nodes live in the document's arena and are addressed by NodeId (u32).
//! `Node<'a>` is the public handle: a document reference plus an id, cheap to
//! copy and safe to share across threads.

use std::fmt;
use std::ptr;

use super::document::Document;
use super::list::{AttributeList, ChildList};

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Element without character data
    Element,
    /// Element carrying text
    Text,
    /// Element carrying a CDATA section, or a CDATA section in the preamble
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
    /// DOCTYPE declaration
    DocType,
}

/// Stored attribute: interned key and unquoted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub key: u32,
    pub value: u32,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    /// String pool id of the name
    pub name: Option<u32>,
    /// String pool id of the text payload
    pub text: Option<u32>,
    pub parent: Option<NodeId>,
    /// Position in the parent's children (or in the preamble)
    pub index: u32,
    pub attributes: AttributeList,
    pub children: ChildList,
}

impl NodeData {
    pub fn new(kind: NodeKind, parent: Option<NodeId>, index: u32) -> Self {
        NodeData {
            kind,
            name: None,
            text: None,
            parent,
            index,
            attributes: AttributeList::new(),
            children: ChildList::new(),
        }
    }
}

/// Resolved attribute borrowed from a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Handle to a node inside a [`Document`]
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    #[inline]
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Node { doc, id }
    }

    #[inline]
    fn data(&self) -> &'a NodeData {
        self.doc.data(self.id)
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Owning document
    #[inline]
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Element name, PI target, or the raw literal of a comment/doctype
    pub fn name(&self) -> Option<&'a str> {
        self.data().name.map(|id| self.doc.resolve(id))
    }

    /// Raw text payload (undecoded)
    pub fn text(&self) -> Option<&'a str> {
        self.data().text.map(|id| self.doc.resolve(id))
    }

    /// True for element kinds (with or without text)
    pub fn is_element(&self) -> bool {
        let data = self.data();
        matches!(data.kind, NodeKind::Element | NodeKind::Text | NodeKind::CData)
            && data.name.is_some()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        self.data().parent.map(|id| Node::new(self.doc, id))
    }

    /// Position within the parent's children
    #[inline]
    pub fn index(&self) -> usize {
        self.data().index as usize
    }

    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            ids: self.data().children.iter(),
        }
    }

    /// Child at a signed index (`-1` is the last child)
    pub fn child(&self, index: isize) -> Option<Node<'a>> {
        self.data()
            .children
            .get(index)
            .map(|&id| Node::new(self.doc, id))
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes {
            doc: self.doc,
            attrs: self.data().attributes.iter(),
        }
    }

    /// Value of the first attribute named `key`
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attributes()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value)
    }

    /// Attribute at a signed index (`-1` is the last attribute)
    pub fn attribute_at(&self, index: isize) -> Option<Attr<'a>> {
        self.data()
            .attributes
            .get(index)
            .map(|attr| self.doc.resolve_attr(attr))
    }

    #[inline]
    pub fn attribute_count(&self) -> usize {
        self.data().attributes.len()
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes().any(|attr| attr.key == key)
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

/// Iterator over the children of a node
#[derive(Clone)]
pub struct Children<'a> {
    doc: &'a Document,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Node<'a>> {
        self.ids.next().map(|&id| Node::new(self.doc, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| Node::new(self.doc, id))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Iterator over the attributes of a node
#[derive(Clone)]
pub struct Attributes<'a> {
    doc: &'a Document,
    attrs: std::slice::Iter<'a, Attribute>,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = Attr<'a>;

    fn next(&mut self) -> Option<Attr<'a>> {
        self.attrs.next().map(|attr| self.doc.resolve_attr(attr))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.attrs.size_hint()
    }
}

impl ExactSizeIterator for Attributes<'_> {}
