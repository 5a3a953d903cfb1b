//! Core XML parsing primitives
//!
//! This module contains the fundamental building blocks for XML parsing:
//! - Scanner: memchr-accelerated delimiter detection with line/column tracking
//! - Lexer: tag/text mode state machine producing borrowed tokens
//! - Entities: predefined-entity and CDATA-marker decoding with Cow

pub mod entities;
pub mod lexer;
pub mod scanner;

pub use entities::decode_text;
pub use lexer::{tokenize, Lexer, SourcePos, Token, TokenKind};
