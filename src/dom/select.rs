//! Simple path selection over direct children
//!
//! Paths are `/`-separated segments, each either `name` (first child whose
//! name matches) or `name[i]` (child at signed position `i` among all
//! children, which must also match `name`). Matching is prefix-based unless
//! a [`NameMatch`] is given.

use std::borrow::Cow;

use super::list::NodeList;
use super::node::Node;
use crate::core::entities;
use crate::options::NameMatch;

/// One parsed path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'p> {
    Named(&'p str),
    Indexed(&'p str, isize),
}

/// Parse `name` or `name[index]`; `None` on malformed brackets or index
fn parse_segment(segment: &str) -> Option<Segment<'_>> {
    let open = segment.find('[');
    let close = segment.find(']');
    match (open, close) {
        (None, None) => Some(Segment::Named(segment)),
        (Some(open), Some(close)) => {
            let well_formed = open < close
                && close == segment.len() - 1
                && segment.matches('[').count() == 1
                && segment.matches(']').count() == 1;
            if !well_formed {
                return None;
            }
            let index = segment[open + 1..close].trim().parse::<isize>().ok()?;
            Some(Segment::Indexed(&segment[..open], index))
        }
        _ => None,
    }
}

fn name_matches(node: &Node<'_>, name: &str, mode: NameMatch) -> bool {
    node.name().is_some_and(|n| mode.matches(n, name))
}

impl<'a> Node<'a> {
    /// Follow a child path with prefix name matching
    ///
    /// An empty path returns the node itself.
    pub fn select(&self, path: &str) -> Option<Node<'a>> {
        self.select_with(path, NameMatch::Prefix)
    }

    /// Follow a child path with the given name matching mode
    pub fn select_with(&self, path: &str, mode: NameMatch) -> Option<Node<'a>> {
        let mut current = *self;
        for raw in path.split('/').filter(|s| !s.is_empty()) {
            current = match parse_segment(raw)? {
                Segment::Named(name) => current.find_first_with(name, mode)?,
                Segment::Indexed(name, index) => {
                    let child = current.child(index)?;
                    if !name_matches(&child, name, mode) {
                        return None;
                    }
                    child
                }
            };
        }
        Some(current)
    }

    pub fn find_first(&self, name: &str) -> Option<Node<'a>> {
        self.find_first_with(name, NameMatch::Prefix)
    }

    /// First direct child whose name matches
    pub fn find_first_with(&self, name: &str, mode: NameMatch) -> Option<Node<'a>> {
        self.children().find(|c| name_matches(c, name, mode))
    }

    pub fn find_all(&self, name: &str) -> NodeList<'a> {
        self.find_all_with(name, NameMatch::Prefix)
    }

    /// Every direct child whose name matches, in document order
    pub fn find_all_with(&self, name: &str, mode: NameMatch) -> NodeList<'a> {
        self.children()
            .filter(|c| name_matches(c, name, mode))
            .collect()
    }

    /// Direct children accepted by `pred(child, index)`
    pub fn find_where<F>(&self, mut pred: F) -> NodeList<'a>
    where
        F: FnMut(Node<'a>, usize) -> bool,
    {
        self.children()
            .enumerate()
            .filter(|&(i, child)| pred(child, i))
            .map(|(_, child)| child)
            .collect()
    }

    /// Concatenate `selector(child, index)` over the direct children
    pub fn find_by_selector<F>(&self, mut selector: F) -> NodeList<'a>
    where
        F: FnMut(Node<'a>, usize) -> NodeList<'a>,
    {
        let mut found = NodeList::new();
        for (i, child) in self.children().enumerate() {
            found.absorb(selector(child, i));
        }
        found
    }

    /// Text payload with entities decoded and CDATA markers removed
    pub fn decode_text(&self) -> Option<Cow<'a, str>> {
        self.text().map(entities::decode_text)
    }

    /// Following node in the parent's children
    pub fn next_sibling(&self) -> Option<Node<'a>> {
        let parent = self.parent()?;
        let next = isize::try_from(self.index()).ok()?.checked_add(1)?;
        parent.child(next)
    }

    /// Preceding node in the parent's children
    pub fn previous_sibling(&self) -> Option<Node<'a>> {
        let parent = self.parent()?;
        let prev = self.index().checked_sub(1)?;
        parent.child(isize::try_from(prev).ok()?)
    }
}
