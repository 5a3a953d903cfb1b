//! XML Document - Arena-based DOM representation
//!
//! The document owns its source text, the node arena and the string pool.
//! Names, attribute values and single text runs are stored as offsets into
//! the source; nothing is copied unless several text runs had to be joined.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::list::{ChildList, NodeList};
use super::node::{Attr, Attribute, Node, NodeData, NodeId};
use super::parser::TreeBuilder;
use super::strings::StringPool;
use crate::error::{ParseError, XmlError};
use crate::options::ParseOptions;

/// A parsed XML document
pub struct Document {
    source: String,
    file: Option<String>,
    nodes: Vec<NodeData>,
    strings: StringPool,
    preamble: ChildList,
    root: NodeId,
}

impl Document {
    /// Parse with default (lenient) options
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        Self::parse_with(source, &ParseOptions::default())
    }

    /// Parse with explicit options
    pub fn parse_with(
        source: impl Into<String>,
        options: &ParseOptions,
    ) -> Result<Self, ParseError> {
        let source = source.into();
        // The builder borrows `source`; its output only holds offsets
        let tree = TreeBuilder::new(&source, options).build();

        match tree {
            Ok(tree) => {
                debug!(
                    nodes = tree.nodes.len(),
                    preamble = tree.preamble.len(),
                    bytes = source.len(),
                    file = options.file_label.as_deref(),
                    "parsed document"
                );
                Ok(Document {
                    source,
                    file: options.file_label.clone(),
                    nodes: tree.nodes,
                    strings: tree.strings,
                    preamble: tree.preamble,
                    root: tree.root,
                })
            }
            Err(err) => {
                debug!(error = %err, file = options.file_label.as_deref(), "parse failed");
                Err(err)
            }
        }
    }

    /// Read a file fully into memory and parse it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, XmlError> {
        Self::from_file_with(path, &ParseOptions::default())
    }

    /// Read a file and parse it with explicit options
    ///
    /// The path becomes the file label unless the options already carry one.
    pub fn from_file_with(
        path: impl AsRef<Path>,
        options: &ParseOptions,
    ) -> Result<Self, XmlError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| XmlError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut options = options.clone();
        if options.file_label.is_none() {
            options.file_label = Some(path.display().to_string());
        }
        Ok(Self::parse_with(source, &options)?)
    }

    /// The text the document was parsed from
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File label given at parse time
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Root element
    #[inline]
    pub fn root(&self) -> Node<'_> {
        Node::new(self, self.root)
    }

    /// Nodes before the root element, in document order
    pub fn preamble(&self) -> NodeList<'_> {
        self.preamble.iter().map(|&id| Node::new(self, id)).collect()
    }

    /// Node by arena id
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        ((id as usize) < self.nodes.len()).then(|| Node::new(self, id))
    }

    /// Every node in the arena, in creation (document) order
    pub fn nodes(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        (0..self.nodes.len() as NodeId).map(move |id| Node::new(self, id))
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Interned strings backing this document
    pub fn strings(&self) -> &StringPool {
        &self.strings
    }

    /// Handles are only created for ids inside the arena
    #[inline]
    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id as usize]
    }

    #[inline]
    pub(crate) fn resolve(&self, id: u32) -> &str {
        self.strings.get_str(id, &self.source).unwrap_or("")
    }

    #[inline]
    pub(crate) fn resolve_attr(&self, attr: &Attribute) -> Attr<'_> {
        Attr {
            key: self.resolve(attr.key),
            value: self.resolve(attr.value),
        }
    }
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Document::parse(s)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file", &self.file)
            .field("nodes", &self.nodes.len())
            .field("root", &self.root().name())
            .finish()
    }
}
