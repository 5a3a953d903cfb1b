//! Tree builder
//!
//! Consumes lexer tokens and fills the node arena. Open elements are kept on
//! an explicit stack so nesting depth is bounded by memory, not by the call
//! stack. Any error aborts the build; no partial tree escapes.
//!
//! Grammar, with the current token on `<`:
//!
//! ```text
//! element  := '<' NAME (NAME '=' STRING)* ('/>' | '>' content* '</' NAME '>')
//! content  := element | TEXT | CDATA | COMMENT
//! document := (COMMENT | DOCTYPE | CDATA | pi)* element EOF
//! pi       := '<?' NAME (NAME '=' STRING)* '?>'
//! ```

use tracing::trace;

use super::list::ChildList;
use super::node::{Attribute, NodeData, NodeId, NodeKind};
use super::strings::{StringPool, MAX_SOURCE_LEN};
use crate::core::lexer::{Lexer, Token, TokenKind};
use crate::error::ParseError;
use crate::options::ParseOptions;

/// Arena and string pool produced by a successful build
///
/// Holds no borrow of the source: string entries are offsets.
pub(crate) struct ParsedTree {
    pub nodes: Vec<NodeData>,
    pub strings: StringPool,
    pub preamble: ChildList,
    pub root: NodeId,
}

/// Text gathered for one element, finalized when the element closes
enum PendingText {
    Empty,
    /// One run, still a plain slice of the source
    Span { offset: usize, len: usize },
    /// Several runs joined together
    Joined(String),
}

impl PendingText {
    fn append(&mut self, source: &str, token: &Token<'_>) {
        *self = match std::mem::replace(self, PendingText::Empty) {
            PendingText::Empty => PendingText::Span {
                offset: token.offset,
                len: token.text.len(),
            },
            PendingText::Span { offset, len } => {
                let first = source.get(offset..offset + len).unwrap_or("");
                let mut joined = String::with_capacity(len + token.text.len());
                joined.push_str(first);
                joined.push_str(token.text);
                PendingText::Joined(joined)
            }
            PendingText::Joined(mut joined) => {
                joined.push_str(token.text);
                PendingText::Joined(joined)
            }
        };
    }
}

/// Element whose closing tag has not been seen yet
struct OpenElement<'a> {
    id: NodeId,
    name: &'a str,
    text: PendingText,
}

/// Where a new node is linked
#[derive(Clone, Copy)]
enum Slot {
    Root,
    Preamble,
    Child(NodeId),
}

/// Result of reading a start tag
enum StartTag<'a> {
    /// `<name ... />`
    Closed(NodeId),
    /// `<name ...>`, content follows
    Open(OpenElement<'a>),
}

pub(crate) struct TreeBuilder<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    options: &'a ParseOptions,
    nodes: Vec<NodeData>,
    strings: StringPool,
    preamble: ChildList,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(source: &'a str, options: &'a ParseOptions) -> Self {
        TreeBuilder {
            lexer: Lexer::new(source, options.file_label.as_deref()),
            source,
            options,
            // Rough guess: one node per 32 bytes of markup
            nodes: Vec::with_capacity(source.len() / 32 + 1),
            strings: StringPool::new(),
            preamble: ChildList::new(),
        }
    }

    pub fn build(mut self) -> Result<ParsedTree, ParseError> {
        check_source_len(self.source.len())?;
        self.lexer.prime()?;
        self.parse_preamble()?;

        if !self.lexer.current_is(TokenKind::OpenTag) {
            return Err(unexpected(TokenKind::OpenTag.describe(), self.lexer.current()));
        }
        let root = self.parse_element()?;

        self.lexer.advance()?;
        let after = self.lexer.current();
        if after.kind != TokenKind::Eof {
            return Err(ParseError::TrailingContent {
                found: after.kind,
                location: after.pos.to_location(),
            });
        }

        Ok(ParsedTree {
            nodes: self.nodes,
            strings: self.strings,
            preamble: self.preamble,
            root,
        })
    }

    /// Comments, doctype, CDATA and processing instructions before the root
    fn parse_preamble(&mut self) -> Result<(), ParseError> {
        loop {
            let token = *self.lexer.current();
            let id = match token.kind {
                TokenKind::Comment => self.comment_node(&token, Slot::Preamble),
                TokenKind::DocType => {
                    let id = self.push_node(NodeKind::DocType, Slot::Preamble);
                    self.nodes[id as usize].name = Some(self.intern(&token));
                    id
                }
                TokenKind::CData => {
                    let id = self.push_node(NodeKind::CData, Slot::Preamble);
                    self.nodes[id as usize].text = Some(self.intern(&token));
                    id
                }
                TokenKind::HeaderOpen => self.parse_processing_instruction()?,
                _ => return Ok(()),
            };
            trace!(kind = ?self.nodes[id as usize].kind, "preamble node");
            self.preamble.push(id);
            self.lexer.advance()?;
        }
    }

    /// `<? target k="v" ... ?>`, current token on `<?`
    fn parse_processing_instruction(&mut self) -> Result<NodeId, ParseError> {
        self.lexer.expect(TokenKind::Name)?;
        let target = *self.lexer.current();
        let id = self.push_node(NodeKind::ProcessingInstruction, Slot::Preamble);
        self.nodes[id as usize].name = Some(self.intern(&target));

        while self.lexer.peek_is(TokenKind::Name) {
            self.lexer.advance()?;
            self.parse_attribute(id)?;
        }
        self.lexer.expect(TokenKind::HeaderClose)?;
        Ok(id)
    }

    /// Parse one element and everything inside it
    ///
    /// Starts on `<` and returns with the current token on the element's last
    /// `>` or `/>`.
    fn parse_element(&mut self) -> Result<NodeId, ParseError> {
        let root = match self.parse_start_tag(Slot::Root)? {
            StartTag::Closed(id) => return Ok(id),
            StartTag::Open(open) => open,
        };
        let root_id = root.id;
        let mut stack = vec![root];

        while let Some(top) = stack.last_mut() {
            self.lexer.advance()?;
            let token = *self.lexer.current();

            match token.kind {
                TokenKind::OpenTag => {
                    let parent = top.id;
                    match self.parse_start_tag(Slot::Child(parent))? {
                        StartTag::Closed(_) => {}
                        StartTag::Open(child) => stack.push(child),
                    }
                }
                TokenKind::OpenCloseTag => {
                    self.lexer.expect(TokenKind::Name)?;
                    let close = *self.lexer.current();
                    if !self.options.close_tag_match.matches(top.name, close.text) {
                        return Err(ParseError::MismatchedTag {
                            open: top.name.to_string(),
                            close: close.text.to_string(),
                            location: close.pos.to_location(),
                        });
                    }
                    self.lexer.expect(TokenKind::CloseTag)?;
                    if let Some(done) = stack.pop() {
                        self.finish_element(done);
                    }
                }
                TokenKind::Text => {
                    top.text.append(self.source, &token);
                    self.nodes[top.id as usize].kind = NodeKind::Text;
                }
                TokenKind::CData => {
                    top.text.append(self.source, &token);
                    self.nodes[top.id as usize].kind = NodeKind::CData;
                }
                TokenKind::Comment => {
                    let parent = top.id;
                    self.comment_node(&token, Slot::Child(parent));
                }
                TokenKind::Eof => {
                    return Err(ParseError::UnexpectedEof {
                        element: top.name.to_string(),
                        location: token.pos.to_location(),
                    });
                }
                _ => return Err(unexpected("element content", &token)),
            }
        }

        Ok(root_id)
    }

    /// Name and attributes of a start tag, current token on `<`
    fn parse_start_tag(&mut self, slot: Slot) -> Result<StartTag<'a>, ParseError> {
        self.lexer.expect(TokenKind::Name)?;
        let name = *self.lexer.current();
        let id = self.push_node(NodeKind::Element, slot);
        self.nodes[id as usize].name = Some(self.intern(&name));

        loop {
            self.lexer.advance()?;
            let token = *self.lexer.current();
            match token.kind {
                TokenKind::Name => self.parse_attribute(id)?,
                TokenKind::CloseTag => {
                    return Ok(StartTag::Open(OpenElement {
                        id,
                        name: name.text,
                        text: PendingText::Empty,
                    }))
                }
                TokenKind::SelfClose => return Ok(StartTag::Closed(id)),
                _ => return Err(unexpected("attribute name, '>' or '/>'", &token)),
            }
        }
    }

    /// `NAME '=' STRING`, current token on the name
    fn parse_attribute(&mut self, owner: NodeId) -> Result<(), ParseError> {
        let key = *self.lexer.current();
        self.lexer.expect(TokenKind::Assign)?;
        self.lexer.expect(TokenKind::Str)?;
        let value = *self.lexer.current();

        let key = self.intern(&key);
        let unquoted = value.unquoted();
        let value = self
            .strings
            .intern_ref(unquoted, self.source, value.offset + 1);
        self.nodes[owner as usize]
            .attributes
            .push(Attribute { key, value });
        Ok(())
    }

    /// Comment node: raw literal as name, inner content as text
    fn comment_node(&mut self, token: &Token<'a>, slot: Slot) -> NodeId {
        let id = self.push_node(NodeKind::Comment, slot);
        let name = self.intern(token);
        let inner = token
            .text
            .get(4..token.text.len().saturating_sub(3))
            .unwrap_or("");
        let text = self.strings.intern_ref(inner, self.source, token.offset + 4);
        let node = &mut self.nodes[id as usize];
        node.name = Some(name);
        node.text = Some(text);
        id
    }

    /// Store accumulated text on the element
    fn finish_element(&mut self, open: OpenElement<'a>) {
        let text = match open.text {
            PendingText::Empty => return,
            PendingText::Span { offset, len } => {
                let slice = self.source.get(offset..offset + len).unwrap_or("");
                self.strings.intern_ref(slice, self.source, offset)
            }
            PendingText::Joined(joined) => self.strings.intern(&joined, self.source),
        };
        self.nodes[open.id as usize].text = Some(text);
    }

    /// Allocate a node; children are linked under their parent here,
    /// preamble nodes by the caller
    ///
    /// Every node spans at least one source byte, so ids stay in range.
    fn push_node(&mut self, kind: NodeKind, slot: Slot) -> NodeId {
        let id = self.nodes.len() as NodeId;
        let (parent, index) = match slot {
            Slot::Root => (None, 0),
            Slot::Preamble => (None, self.preamble.len()),
            Slot::Child(p) => {
                let siblings = &mut self.nodes[p as usize].children;
                siblings.push(id);
                (Some(p), siblings.len() - 1)
            }
        };
        self.nodes.push(NodeData::new(kind, parent, index as u32));
        id
    }

    #[inline]
    fn intern(&mut self, token: &Token<'a>) -> u32 {
        self.strings.intern_ref(token.text, self.source, token.offset)
    }
}

fn unexpected(expected: &'static str, found: &Token<'_>) -> ParseError {
    ParseError::UnexpectedToken {
        expected,
        found: found.kind,
        location: found.pos.to_location(),
    }
}

/// Reject sources whose offsets would not fit the string pool
fn check_source_len(len: usize) -> Result<(), ParseError> {
    if len > MAX_SOURCE_LEN {
        return Err(ParseError::SourceTooLarge {
            len,
            max: MAX_SOURCE_LEN,
        });
    }
    Ok(())
}
