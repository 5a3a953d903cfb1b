//! DOM Module - Arena-based XML Document
//!
//! Implements the document tree using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices, with `Node<'a>` handles for navigation
//! - String interning backed by the document source
//! - Growable lists with signed indexing for children, attributes and results

pub mod document;
pub mod list;
pub mod node;
mod parser;
pub mod select;
pub mod strings;

pub use document::Document;
pub use list::{AttributeList, ChildList, GrowList, NodeList};
pub use node::{Attr, Attribute, Attributes, Children, Node, NodeData, NodeId, NodeKind};
pub use strings::StringPool;
