//! Growable ordered containers
//!
//! `GrowList` is an append-only list with signed indexing: `-1` is the last
//! element, `-len` the first. Anything outside `[-len, len - 1]` is `None`.

use super::node::{Attribute, Node, NodeId};

/// Append-only list with negative indexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrowList<T> {
    items: Vec<T>,
}

/// Attributes of one node, in document order
pub type AttributeList = GrowList<Attribute>;

/// Query result list of node handles
pub type NodeList<'a> = GrowList<Node<'a>>;

/// Child ids of one node, in document order
pub type ChildList = GrowList<NodeId>;

impl<T> Default for GrowList<T> {
    fn default() -> Self {
        GrowList { items: Vec::new() }
    }
}

impl<T> GrowList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        GrowList {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Move every element of `other` to the end of this list
    pub fn absorb(&mut self, other: GrowList<T>) {
        self.items.extend(other.items);
    }

    /// Resolve a signed index to a position
    #[inline]
    pub fn resolve(&self, index: isize) -> Option<usize> {
        let len = self.items.len();
        if index >= 0 {
            let i = index as usize;
            (i < len).then_some(i)
        } else {
            len.checked_sub(index.unsigned_abs())
        }
    }

    /// Element at a signed index
    #[inline]
    pub fn get(&self, index: isize) -> Option<&T> {
        self.resolve(index).and_then(|i| self.items.get(i))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> From<Vec<T>> for GrowList<T> {
    fn from(items: Vec<T>) -> Self {
        GrowList { items }
    }
}

impl<T> FromIterator<T> for GrowList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        GrowList {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for GrowList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for GrowList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'l, T> IntoIterator for &'l GrowList<T> {
    type Item = &'l T;
    type IntoIter = std::slice::Iter<'l, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(n: i32) -> GrowList<i32> {
        (0..n).collect()
    }

    #[test]
    fn test_positive_index() {
        let l = list(3);
        assert_eq!(l.get(0), Some(&0));
        assert_eq!(l.get(2), Some(&2));
        assert_eq!(l.get(3), None);
    }

    #[test]
    fn test_negative_index() {
        let l = list(3);
        assert_eq!(l.get(-1), Some(&2));
        assert_eq!(l.get(-3), Some(&0));
        assert_eq!(l.get(-4), None);
        assert_eq!(l.get(isize::MIN), None);
    }

    #[test]
    fn test_empty() {
        let l: GrowList<i32> = GrowList::new();
        assert!(l.is_empty());
        assert_eq!(l.get(0), None);
        assert_eq!(l.get(-1), None);
        assert_eq!(l.first(), None);
    }

    #[test]
    fn test_absorb_appends_in_order() {
        let mut a = list(2);
        let mut b = GrowList::new();
        b.push(10);
        b.push(11);
        a.absorb(b);
        assert_eq!(a.as_slice(), &[0, 1, 10, 11]);
        assert_eq!(a.last(), Some(&11));
    }

    #[test]
    fn test_growth() {
        let mut l = GrowList::with_capacity(1);
        for i in 0..1000 {
            l.push(i);
        }
        assert_eq!(l.len(), 1000);
        assert_eq!(l.get(-1), Some(&999));
    }
}
