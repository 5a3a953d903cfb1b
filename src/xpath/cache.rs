//! Compiled expression cache
//!
//! Keeps the most recently used compiled paths so repeated queries skip the
//! compiler. Compile failures are never stored.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::trace;

use super::compiler::{compile, CompiledPath};
use super::eval::or_empty;
use super::value::PathResult;
use crate::dom::Node;
use crate::error::PathError;

/// Default number of cached expressions
pub const DEFAULT_CAPACITY: usize = 128;

/// LRU cache of compiled path expressions
pub struct PathCache {
    entries: LruCache<String, Arc<CompiledPath>>,
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PathCache {
    /// A capacity of 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        PathCache {
            entries: LruCache::new(capacity),
        }
    }

    /// Cached program for `expr`, compiling it on a miss
    pub fn get_or_compile(&mut self, expr: &str) -> Result<Arc<CompiledPath>, PathError> {
        if let Some(hit) = self.entries.get(expr) {
            trace!(expr, "path cache hit");
            return Ok(Arc::clone(hit));
        }

        trace!(expr, "path cache miss");
        let compiled = Arc::new(compile(expr)?);
        self.entries.put(expr.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Evaluate through the cache; malformed expressions give `Empty`
    pub fn evaluate<'a>(&mut self, node: Node<'a>, expr: &str) -> PathResult<'a> {
        let result = self.get_or_compile(expr).map(|compiled| compiled.execute(node));
        or_empty(expr, result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_same_program_for_repeated_expression() {
        let mut cache = PathCache::default();
        let first = cache.get_or_compile("/a/b").unwrap();
        let second = cache.get_or_compile("/a/b").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_errors_not_cached() {
        let mut cache = PathCache::new(4);
        assert!(cache.get_or_compile("/a[").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_eviction() {
        let mut cache = PathCache::new(2);
        let a = cache.get_or_compile("/a").unwrap();
        cache.get_or_compile("/b").unwrap();
        cache.get_or_compile("/c").unwrap();
        assert_eq!(cache.len(), 2);
        let a_again = cache.get_or_compile("/a").unwrap();
        assert!(!Arc::ptr_eq(&a, &a_again));
    }

    #[test]
    fn test_evaluate_and_clear() {
        let doc = Document::parse("<r><p>hello</p></r>").unwrap();
        let mut cache = PathCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.evaluate(doc.root(), "/p/text()").as_text(), Some("hello"));
        assert!(cache.evaluate(doc.root(), "").is_empty());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
