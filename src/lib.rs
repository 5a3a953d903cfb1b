//! minixml - Small XML document engine
//!
//! Parses XML text into an arena-backed tree and answers two kinds of
//! structural query:
//! - Child paths: `root.select("items/item[-1]")`, `find_all`, `find_where`
//! - Path expressions: `root.xpath("/item[@id=42]/text()")`
//!
//! ```
//! use minixml::Document;
//!
//! let doc = Document::parse("<r><p>hello</p></r>").unwrap();
//! assert_eq!(doc.root().xpath("/p/text()").as_text(), Some("hello"));
//! assert_eq!(doc.root().select("p").and_then(|p| p.text()), Some("hello"));
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod options;
pub mod strategy;
pub mod xpath;

pub use crate::core::decode_text;
pub use dom::{Attr, Document, GrowList, Node, NodeId, NodeKind, NodeList};
pub use error::{LexError, Location, ParseError, PathError, XmlError};
pub use options::{NameMatch, ParseOptions};
pub use xpath::{evaluate, try_evaluate, CompiledPath, PathCache, PathResult};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
