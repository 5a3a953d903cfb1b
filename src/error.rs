//! Error types
//!
//! Load and parse failures are fatal to building a [`Document`](crate::Document).
//! Path-expression errors only affect the query that produced them.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::lexer::TokenKind;

/// Source location attached to lexer and parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// File label given to the lexer, if any
    pub file: Option<String>,
    /// 1-based line
    pub line: u32,
    /// 1-based column, counted in characters
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file, self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// Construct left open at end of input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Comment,
    CData,
    DocType,
    QuotedString,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Construct::Comment => "comment",
            Construct::CData => "CDATA section",
            Construct::DocType => "DOCTYPE declaration",
            Construct::QuotedString => "quoted string",
        };
        f.write_str(name)
    }
}

/// Tokenizer failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated {construct} starting at {location}")]
    Unterminated {
        construct: Construct,
        location: Location,
    },

    #[error("unexpected character '{ch}' inside tag at {location}")]
    UnexpectedChar { ch: char, location: Location },
}

/// Structural failure while building the tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {location}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
        location: Location,
    },

    #[error("mismatched closing tag: <{open}> closed by </{close}> at {location}")]
    MismatchedTag {
        open: String,
        close: String,
        location: Location,
    },

    #[error("unexpected end of input inside <{element}> at {location}")]
    UnexpectedEof { element: String, location: Location },

    #[error("expected end of input after root element, found {found} at {location}")]
    TrailingContent {
        found: TokenKind,
        location: Location,
    },

    #[error("source is {len} bytes, the limit is {max}")]
    SourceTooLarge { len: usize, max: usize },
}

/// Failure to build a document from a file
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Malformed path expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty path expression")]
    Empty,

    #[error("empty step in path expression '{expr}'")]
    EmptyStep { expr: String },

    #[error("unbalanced brackets in step '{step}'")]
    UnbalancedBrackets { step: String },

    #[error("invalid index in step '{step}' (expected a positive integer)")]
    InvalidIndex { step: String },

    #[error("missing attribute name in step '{step}'")]
    MissingAttribute { step: String },

    #[error("predicates are not supported on '//' steps: '{step}'")]
    PredicateOnDescendant { step: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let with_file = Location {
            file: Some("doc.xml".to_string()),
            line: 3,
            column: 7,
        };
        assert_eq!(with_file.to_string(), "doc.xml:3:7");

        let bare = Location {
            file: None,
            line: 1,
            column: 1,
        };
        assert_eq!(bare.to_string(), "1:1");
    }

    #[test]
    fn test_mismatch_message_names_both_tags() {
        let err = ParseError::MismatchedTag {
            open: "a".to_string(),
            close: "b".to_string(),
            location: Location {
                file: None,
                line: 1,
                column: 8,
            },
        };
        assert_eq!(err.to_string(), "mismatched closing tag: <a> closed by </b> at 1:8");
    }

    #[test]
    fn test_lex_error_converts() {
        let lex = LexError::Unterminated {
            construct: Construct::Comment,
            location: Location {
                file: None,
                line: 2,
                column: 1,
            },
        };
        let parse: ParseError = lex.clone().into();
        assert_eq!(parse, ParseError::Lex(lex));
        assert!(parse.to_string().contains("unterminated comment"));
    }
}
