//! XML Lexer - tag/text mode state machine
//!
//! Produces one token at a time from a borrowed source buffer. The lexer
//! keeps two slots (current and peek) so the tree builder can decide on one
//! token of lookahead. Token text is always a slice of the source.
//!
//! Mode switching:
//! - outside a tag, everything up to the next `<` is one TEXT token
//! - `<`, `</` and `<?` enter tag mode; `>`, `/>` and `?>` leave it
//! - comments, CDATA sections and DOCTYPE declarations are single tokens
//!   and never change mode

use std::fmt;

use super::scanner::{is_name_start_char, Scanner};
use crate::error::{Construct, LexError, Location, ParseError};

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Slot not filled yet (before the lexer is primed)
    Start,
    /// End of input
    Eof,
    /// `<`
    OpenTag,
    /// `>`
    CloseTag,
    /// `</`
    OpenCloseTag,
    /// `/>`
    SelfClose,
    /// `<?`
    HeaderOpen,
    /// `?>`
    HeaderClose,
    /// Tag, attribute or processing-instruction name
    Name,
    /// `=`
    Assign,
    /// Quoted attribute value, quotes included
    Str,
    /// Raw character data between tags
    Text,
    /// `<!-- ... -->`
    Comment,
    /// `<![CDATA[ ... ]]>`
    CData,
    /// `<!DOCTYPE ...>`
    DocType,
}

impl TokenKind {
    /// Short human-readable description used in error messages
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Start => "start of input",
            TokenKind::Eof => "end of input",
            TokenKind::OpenTag => "'<'",
            TokenKind::CloseTag => "'>'",
            TokenKind::OpenCloseTag => "'</'",
            TokenKind::SelfClose => "'/>'",
            TokenKind::HeaderOpen => "'<?'",
            TokenKind::HeaderClose => "'?>'",
            TokenKind::Name => "NAME",
            TokenKind::Assign => "'='",
            TokenKind::Str => "STRING",
            TokenKind::Text => "TEXT",
            TokenKind::Comment => "COMMENT",
            TokenKind::CData => "CDATA",
            TokenKind::DocType => "DOCTYPE",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Where a token begins in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos<'a> {
    pub file: Option<&'a str>,
    pub line: u32,
    pub column: u32,
}

impl SourcePos<'_> {
    /// Owned copy for error reporting
    pub fn to_location(&self) -> Location {
        Location {
            file: self.file.map(str::to_string),
            line: self.line,
            column: self.column,
        }
    }
}

/// A lexed token borrowing its text from the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Slice of the source covered by the token
    pub text: &'a str,
    /// Byte offset of `text` in the source
    pub offset: usize,
    pub pos: SourcePos<'a>,
}

impl<'a> Token<'a> {
    fn start(file: Option<&'a str>) -> Self {
        Token {
            kind: TokenKind::Start,
            text: "",
            offset: 0,
            pos: SourcePos {
                file,
                line: 1,
                column: 1,
            },
        }
    }

    /// For STRING tokens, the text between the quotes
    pub fn unquoted(&self) -> &'a str {
        let text = self.text;
        if self.kind == TokenKind::Str && text.len() >= 2 {
            &text[1..text.len() - 1]
        } else {
            text
        }
    }
}

/// XML lexer with a two-token window
pub struct Lexer<'a> {
    source: &'a str,
    file: Option<&'a str>,
    scanner: Scanner<'a>,
    in_tag: bool,
    current: Token<'a>,
    peek: Token<'a>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer; both token slots start empty (`TokenKind::Start`)
    pub fn new(source: &'a str, file: Option<&'a str>) -> Self {
        Lexer {
            source,
            file,
            scanner: Scanner::new(source.as_bytes()),
            in_tag: false,
            current: Token::start(file),
            peek: Token::start(file),
        }
    }

    /// Fill both slots so `current()` holds the first token
    pub fn prime(&mut self) -> Result<(), LexError> {
        self.advance()?;
        self.advance()
    }

    /// Shift peek into current and lex the next token into peek
    pub fn advance(&mut self) -> Result<(), LexError> {
        let next = self.next_raw()?;
        self.current = std::mem::replace(&mut self.peek, next);
        Ok(())
    }

    /// Advance only if the peek token has `kind`
    pub fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.peek.kind != kind {
            return Err(ParseError::UnexpectedToken {
                expected: kind.describe(),
                found: self.peek.kind,
                location: self.peek.pos.to_location(),
            });
        }
        self.advance()?;
        Ok(())
    }

    #[inline]
    pub fn current(&self) -> &Token<'a> {
        &self.current
    }

    #[inline]
    pub fn peek(&self) -> &Token<'a> {
        &self.peek
    }

    #[inline]
    pub fn current_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    #[inline]
    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// True between `<`/`</`/`<?` and the matching close
    #[inline]
    pub fn in_tag(&self) -> bool {
        self.in_tag
    }

    #[inline]
    pub fn file(&self) -> Option<&'a str> {
        self.file
    }

    fn here(&self) -> SourcePos<'a> {
        SourcePos {
            file: self.file,
            line: self.scanner.line(),
            column: self.scanner.column(),
        }
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize, pos: SourcePos<'a>) -> Token<'a> {
        Token {
            kind,
            text: self.source.get(start..end).unwrap_or(""),
            offset: start,
            pos,
        }
    }

    /// Emit a fixed-width punctuation token and move past it
    fn punct(&mut self, kind: TokenKind, width: usize, pos: SourcePos<'a>) -> Token<'a> {
        let start = self.scanner.position();
        self.scanner.advance(width);
        self.token(kind, start, start + width, pos)
    }

    /// Lex the next raw token
    fn next_raw(&mut self) -> Result<Token<'a>, LexError> {
        self.scanner.skip_whitespace();

        let pos = self.here();
        let start = self.scanner.position();

        let byte = match self.scanner.peek() {
            Some(b) => b,
            None => return Ok(self.token(TokenKind::Eof, start, start, pos)),
        };

        if byte == b'<' {
            return self.lex_markup(pos);
        }

        if !self.in_tag {
            let end = self.scanner.find_byte(b'<').unwrap_or(self.source.len());
            self.scanner.advance_to(end);
            return Ok(self.token(TokenKind::Text, start, end, pos));
        }

        match byte {
            b'>' => {
                self.in_tag = false;
                Ok(self.punct(TokenKind::CloseTag, 1, pos))
            }
            b'/' if self.scanner.peek_at(1) == Some(b'>') => {
                self.in_tag = false;
                Ok(self.punct(TokenKind::SelfClose, 2, pos))
            }
            b'?' if self.scanner.peek_at(1) == Some(b'>') => {
                self.in_tag = false;
                Ok(self.punct(TokenKind::HeaderClose, 2, pos))
            }
            b'=' => Ok(self.punct(TokenKind::Assign, 1, pos)),
            b'"' | b'\'' => self.lex_string(byte, pos),
            b if is_name_start_char(b) => {
                let name_len = self.scanner.read_name().map_or(0, <[u8]>::len);
                Ok(self.token(TokenKind::Name, start, start + name_len, pos))
            }
            _ => Err(LexError::UnexpectedChar {
                ch: self
                    .source
                    .get(start..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
                location: pos.to_location(),
            }),
        }
    }

    /// Lex a construct starting with `<`
    fn lex_markup(&mut self, pos: SourcePos<'a>) -> Result<Token<'a>, LexError> {
        if self.scanner.starts_with(b"<!--") {
            return self.lex_delimited(TokenKind::Comment, Construct::Comment, 4, b"-->", pos);
        }
        if self.scanner.starts_with(b"<![CDATA[") {
            return self.lex_delimited(TokenKind::CData, Construct::CData, 9, b"]]>", pos);
        }
        if self.starts_with_doctype() {
            return self.lex_doctype(pos);
        }

        self.in_tag = true;
        match self.scanner.peek_at(1) {
            Some(b'/') => Ok(self.punct(TokenKind::OpenCloseTag, 2, pos)),
            Some(b'?') => Ok(self.punct(TokenKind::HeaderOpen, 2, pos)),
            _ => Ok(self.punct(TokenKind::OpenTag, 1, pos)),
        }
    }

    fn starts_with_doctype(&self) -> bool {
        self.scanner
            .remaining()
            .get(..9)
            .is_some_and(|head| head.eq_ignore_ascii_case(b"<!DOCTYPE"))
    }

    /// Token running from the cursor through the closing `terminator`
    fn lex_delimited(
        &mut self,
        kind: TokenKind,
        construct: Construct,
        opener_len: usize,
        terminator: &[u8],
        pos: SourcePos<'a>,
    ) -> Result<Token<'a>, LexError> {
        let start = self.scanner.position();
        let close = self
            .scanner
            .find_seq_from(start + opener_len, terminator)
            .ok_or_else(|| LexError::Unterminated {
                construct,
                location: pos.to_location(),
            })?;
        let end = close + terminator.len();
        self.scanner.advance_to(end);
        Ok(self.token(kind, start, end, pos))
    }

    /// `<!DOCTYPE ...>` including an optional `[...]` internal subset
    fn lex_doctype(&mut self, pos: SourcePos<'a>) -> Result<Token<'a>, LexError> {
        let start = self.scanner.position();
        let bytes = self.source.as_bytes();
        let mut depth = 0usize;
        let mut quote: Option<u8> = None;
        let mut i = start + 9;

        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None => match b {
                    b'"' | b'\'' => quote = Some(b),
                    b'[' => depth += 1,
                    b']' => depth = depth.saturating_sub(1),
                    b'>' if depth == 0 => {
                        self.scanner.advance_to(i + 1);
                        return Ok(self.token(TokenKind::DocType, start, i + 1, pos));
                    }
                    _ => {}
                },
            }
            i += 1;
        }

        Err(LexError::Unterminated {
            construct: Construct::DocType,
            location: pos.to_location(),
        })
    }

    /// Quoted run closed by the same quote character
    fn lex_string(&mut self, quote: u8, pos: SourcePos<'a>) -> Result<Token<'a>, LexError> {
        let start = self.scanner.position();
        self.scanner.advance(1);
        let close = self
            .scanner
            .find_byte(quote)
            .ok_or_else(|| LexError::Unterminated {
                construct: Construct::QuotedString,
                location: pos.to_location(),
            })?;
        self.scanner.advance_to(close + 1);
        Ok(self.token(TokenKind::Str, start, close + 1, pos))
    }
}

/// Lex a whole buffer, stopping before EOF
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut lexer = Lexer::new(source, None);
    let mut tokens = Vec::new();
    loop {
        lexer.advance()?;
        match lexer.peek().kind {
            TokenKind::Eof => break,
            _ => tokens.push(*lexer.peek()),
        }
    }
    Ok(tokens)
}
