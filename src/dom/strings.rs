//! String Interning Pool
//!
//! Storage for element names, attribute keys/values and text payloads.
//!
//! Two storage modes:
//! - Offset-based: (source_offset, len) referencing the document source (zero-copy)
//! - Copied: strings assembled during parsing (concatenated text runs),
//!   stored in the pool buffer
//!
//! Uses hash-based lookup to avoid storing duplicate string data.
//!
//! Offsets and lengths are `u32`. The tree builder rejects sources longer
//! than [`MAX_SOURCE_LEN`], and copied text is never longer than the source
//! it was gathered from, so every value fits.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Largest source the pool can address
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

/// Entry type for string storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEntry {
    /// References the document source: (offset_in_source, length)
    InputRef(u32, u32),
    /// Copied string: (offset_in_pool_data, length)
    Copied(u32, u32),
}

/// String interning pool with zero-copy support
///
/// Id 0 is reserved for the empty string.
#[derive(Debug)]
pub struct StringPool {
    entries: Vec<StringEntry>,
    /// Buffer for copied strings only
    data: String,
    /// Hash of string content -> ids with that hash
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: String::new(),
            hash_index: HashMap::new(),
        };
        pool.entries.push(StringEntry::InputRef(0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    fn lookup(&self, hash: u64, s: &str, source: &str) -> Option<u32> {
        self.hash_index
            .get(&hash)?
            .iter()
            .copied()
            .find(|&id| self.get_str(id, source) == Some(s))
    }

    /// Intern a slice of `source` without copying
    ///
    /// `s` must be `&source[offset..offset + s.len()]`.
    pub fn intern_ref(&mut self, s: &str, source: &str, offset: usize) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let hash = Self::compute_hash(s);
        if let Some(id) = self.lookup(hash, s, source) {
            return id;
        }

        let id = self.entries.len() as u32;
        self.entries
            .push(StringEntry::InputRef(offset as u32, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Intern a string by copying it into the pool
    pub fn intern(&mut self, s: &str, source: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let hash = Self::compute_hash(s);
        if let Some(id) = self.lookup(hash, s, source) {
            return id;
        }

        let offset = self.data.len() as u32;
        self.data.push_str(s);

        let id = self.entries.len() as u32;
        self.entries.push(StringEntry::Copied(offset, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Resolve an id, reading InputRef entries from `source`
    pub fn get_str<'a>(&'a self, id: u32, source: &'a str) -> Option<&'a str> {
        match *self.entries.get(id as usize)? {
            StringEntry::InputRef(offset, len) => {
                let start = offset as usize;
                source.get(start..start + len as usize)
            }
            StringEntry::Copied(offset, len) => {
                let start = offset as usize;
                self.data.get(start..start + len as usize)
            }
        }
    }

    /// Number of distinct strings stored, the reserved empty entry included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}
