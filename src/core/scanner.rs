//! Byte cursor over XML source using memchr
//!
//! Delimiter searches go through memchr (SSE2/AVX2/NEON where available).
//! Every movement of the cursor keeps the line/column pair current so the
//! lexer can stamp tokens with the position where they began.

use memchr::memmem;
use memchr::{memchr, memchr_iter, memrchr};

/// Scanner for XML delimiter detection with position bookkeeping
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner positioned at line 1, column 1
    #[inline]
    pub fn new(input: &'a [u8]) -> Self {
        Scanner {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current byte offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Get remaining bytes
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos.min(self.input.len())..]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.advance_to(self.pos + n);
    }

    /// Move the cursor forward to `target`, updating line and column
    pub fn advance_to(&mut self, target: usize) {
        let target = target.min(self.input.len());
        if target <= self.pos {
            return;
        }
        let skipped = &self.input[self.pos..target];
        match memrchr(b'\n', skipped) {
            Some(last_newline) => {
                self.line += memchr_iter(b'\n', skipped).count() as u32;
                self.column = 1 + count_chars(&skipped[last_newline + 1..]);
            }
            None => self.column += count_chars(skipped),
        }
        self.pos = target;
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let start = self.pos;
        let mut end = start;
        while end < self.input.len() {
            match self.input[end] {
                b' ' | b'\t' | b'\n' | b'\r' => end += 1,
                _ => break,
            }
        }
        self.advance_to(end);
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.remaining()).map(|i| self.pos + i)
    }

    /// Find the start of the next occurrence of `needle`, searching from `from`
    #[inline]
    pub fn find_seq_from(&self, from: usize, needle: &[u8]) -> Option<usize> {
        let from = from.min(self.input.len());
        memmem::find(&self.input[from..], needle).map(|i| from + i)
    }

    /// Read an XML name and advance past it
    pub fn read_name(&mut self) -> Option<&'a [u8]> {
        let start = self.pos;
        let first = *self.input.get(start)?;
        if !is_name_start_char(first) {
            return None;
        }

        let mut end = start + 1;
        while end < self.input.len() && is_name_char(self.input[end]) {
            end += 1;
        }

        self.advance_to(end);
        Some(&self.input[start..end])
    }
}

/// Number of characters in a UTF-8 byte run (continuation bytes don't count)
#[inline]
fn count_chars(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&b| (b & 0xC0) != 0x80).count() as u32
}

/// Check if byte is valid XML name start character
/// Allows ASCII letters, underscore, colon, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

/// Check if byte is valid XML name character
/// Allows ASCII alphanumeric, punctuation, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' | b'.' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_byte() {
        let scanner = Scanner::new(b"hello <world>");
        assert_eq!(scanner.find_byte(b'<'), Some(6));
        assert_eq!(scanner.find_byte(b'#'), None);
    }

    #[test]
    fn test_find_seq_from() {
        let scanner = Scanner::new(b"<!-- a -- b -->tail");
        assert_eq!(scanner.find_seq_from(4, b"-->"), Some(12));
        assert_eq!(scanner.find_seq_from(15, b"-->"), None);
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new(b"element-name>");
        assert_eq!(scanner.read_name(), Some(b"element-name" as &[u8]));
        assert_eq!(scanner.position(), 12);
        assert_eq!(scanner.column(), 13);
    }

    #[test]
    fn test_read_name_rejects_digit_start() {
        let mut scanner = Scanner::new(b"1abc");
        assert_eq!(scanner.read_name(), None);
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_skip_whitespace_tracks_lines() {
        let mut scanner = Scanner::new(b"  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
        assert_eq!(scanner.line(), 2);
        assert_eq!(scanner.column(), 2);
    }

    #[test]
    fn test_columns_count_characters() {
        let input = "héllo<".as_bytes();
        let mut scanner = Scanner::new(input);
        let lt = scanner.find_byte(b'<').unwrap();
        scanner.advance_to(lt);
        assert_eq!(scanner.column(), 6);
    }
}
