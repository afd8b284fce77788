//! Internal node structure for the crit-bit tree.
//!
//! A `Node` is either empty (the root of an empty tree, never a child),
//! a leaf holding one entry, or an inner branch point holding the encoded
//! critical bit at which its two subtrees diverge. Inner nodes along any
//! root-to-leaf path carry strictly increasing critical bits; that ordering
//! is what the tree engine's splice-point search relies on.

use crate::key::{CritBit, Key};

/// A terminal node holding one key-value entry.
#[derive(Clone, Debug)]
pub(crate) struct Leaf<V> {
    pub(crate) key: Key,
    pub(crate) value: V,
}

/// A branch point with exactly two children. Child 0 collects keys whose
/// critical bit is clear (or that end at it), child 1 keys with it set.
#[derive(Clone, Debug)]
pub(crate) struct Inner<V> {
    pub(crate) bit: CritBit,
    pub(crate) children: [Node<V>; 2],
}

#[derive(Clone, Debug)]
pub(crate) enum Node<V> {
    Empty,
    Leaf(Box<Leaf<V>>),
    Inner(Box<Inner<V>>),
}

impl<V> Default for Node<V> {
    fn default() -> Node<V> {
        Node::Empty
    }
}

impl<V> Node<V> {
    /// Blind descent: follows `direction` at every inner node and returns
    /// whatever leaf the walk ends at, ignoring critical-bit values. The
    /// result is not necessarily an exact match for `key`, but it shares
    /// enough structure with it to compute the correct critical bit.
    pub(crate) fn find_leaf(&self, key: &Key) -> Option<&Leaf<V>> {
        let mut node = self;
        loop {
            match node {
                Node::Inner(inner) => node = &inner.children[key.direction(inner.bit)],
                Node::Leaf(leaf) => return Some(&**leaf),
                Node::Empty => return None,
            }
        }
    }

    /// Mutable variant of [`find_leaf`](Node::find_leaf).
    pub(crate) fn find_leaf_mut(&mut self, key: &Key) -> Option<&mut Leaf<V>> {
        let mut node = self;
        loop {
            match node {
                Node::Inner(inner) => node = &mut inner.children[key.direction(inner.bit)],
                Node::Leaf(leaf) => return Some(&mut **leaf),
                Node::Empty => return None,
            }
        }
    }

    /// Longest-prefix search: the deepest leaf whose key is a prefix of
    /// `key`.
    ///
    /// The preferred child is tried first. A fallback to child 0 happens
    /// only when the preferred direction was 1: shorter stored keys that
    /// end before the branch bit live on the 0 side, while nothing on the
    /// 1 side can be a prefix of a key that routed to 0.
    pub(crate) fn longest(&self, key: &Key) -> Option<&Leaf<V>> {
        match self {
            Node::Empty => None,
            Node::Leaf(leaf) => {
                if key.starts_with(&leaf.key) {
                    Some(&**leaf)
                } else {
                    None
                }
            }
            Node::Inner(inner) => {
                let dir = key.direction(inner.bit);
                inner.children[dir].longest(key).or_else(|| {
                    if dir == 1 {
                        inner.children[0].longest(key)
                    } else {
                        None
                    }
                })
            }
        }
    }

    /// Unwraps a leaf node into its value. `None` for the other variants.
    pub(crate) fn into_value(self) -> Option<V> {
        match self {
            Node::Leaf(leaf) => Some(leaf.value),
            _ => None,
        }
    }
}
