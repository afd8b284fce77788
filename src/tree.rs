//! The main tree implementation.
//!
//! This module contains the `Tree` type, which provides the primary API for
//! working with the crit-bit tree: exact lookup, insertion, removal,
//! longest prefix matching and ordered iteration.

use std::fmt;
use std::iter::FromIterator;
use std::mem;

use crate::key::{CritBit, Key};
use crate::node::{Inner, Leaf, Node};
use crate::scan::{IntoIter, Iter, Keys, Values};

/// An ordered map from binary keys to values, implemented as a crit-bit
/// tree (a space-efficient PATRICIA trie).
///
/// Every operation runs in time proportional to the key length in bits,
/// independent of the number of stored entries, and iteration yields
/// entries in ascending bit-string order. Keys of different lengths can
/// coexist, which together with [`longest_match`](Tree::longest_match)
/// makes the tree a natural fit for IP routing tables and other
/// prefix-keyed indexes.
///
/// The tree is not internally synchronized; wrap it in a lock for shared
/// use, like any other std collection.
///
/// # Examples
///
/// ```
/// use critbit_tree::{Key, Tree};
///
/// let mut tree = Tree::new();
/// tree.insert(Key::from("hello"), 1);
/// tree.insert(Key::from("world"), 2);
///
/// assert_eq!(tree.get(&Key::from("hello")), Some(&1));
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Clone)]
pub struct Tree<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Tree<V> {
    /// Creates a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_tree::Tree;
    ///
    /// let tree = Tree::<u32>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub fn new() -> Tree<V> {
        Tree {
            root: Node::Empty,
            len: 0,
        }
    }

    /// Returns the number of entries stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Retrieves a reference to the value stored for the given key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_tree::{Key, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(Key::from("hello"), 42);
    ///
    /// assert_eq!(tree.get(&Key::from("hello")), Some(&42));
    /// assert_eq!(tree.get(&Key::from("world")), None);
    /// ```
    pub fn get(&self, key: &Key) -> Option<&V> {
        match self.root.find_leaf(key) {
            Some(leaf) if leaf.key == *key => Some(&leaf.value),
            _ => None,
        }
    }

    /// Retrieves a mutable reference to the value stored for the given
    /// key, if any.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut V> {
        match self.root.find_leaf_mut(key) {
            Some(leaf) if leaf.key == *key => Some(&mut leaf.value),
            _ => None,
        }
    }

    /// Returns `true` if the tree contains the given key.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was already present.
    ///
    /// Replacing an existing key updates the leaf in place and leaves the
    /// tree structure and length untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_tree::{Key, Tree};
    ///
    /// let mut tree = Tree::new();
    /// assert_eq!(tree.insert(Key::from("hello"), 1), None);
    /// assert_eq!(tree.insert(Key::from("hello"), 2), Some(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        // Blind descent to a probe leaf. Its key shares enough structure
        // with the tree's branching to yield the correct critical bit.
        let bit = match self.root.find_leaf_mut(&key) {
            None => {
                self.root = Node::Leaf(Box::new(Leaf { key, value }));
                self.len += 1;
                return None;
            }
            Some(probe) => match probe.key.critbit(&key) {
                None => return Some(mem::replace(&mut probe.value, value)),
                Some(bit) => bit,
            },
        };

        Self::splice(&mut self.root, Box::new(Leaf { key, value }), bit);
        self.len += 1;
        None
    }

    /// Second descent of an insertion: walk through inner nodes whose
    /// critical bit precedes the new one, then replace the first node at
    /// or past it with a fresh branch point. The displaced subtree keeps
    /// the slot opposite the new leaf's direction.
    fn splice(node: &mut Node<V>, leaf: Box<Leaf<V>>, bit: CritBit) {
        match node {
            Node::Inner(inner) if inner.bit < bit => {
                let dir = leaf.key.direction(inner.bit);
                Self::splice(&mut inner.children[dir], leaf, bit);
            }
            _ => {
                let dir = leaf.key.direction(bit);
                let mut children = [Node::Empty, Node::Empty];
                children[dir ^ 1] = mem::take(node);
                children[dir] = Node::Leaf(leaf);
                *node = Node::Inner(Box::new(Inner { bit, children }));
            }
        }
    }

    /// Removes a key from the tree, returning its value.
    ///
    /// Removing an absent key is a no-op and returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_tree::{Key, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(Key::from("hello"), 42);
    ///
    /// assert_eq!(tree.remove(&Key::from("hello")), Some(42));
    /// assert_eq!(tree.remove(&Key::from("hello")), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: &Key) -> Option<V> {
        let removed = Self::remove_node(&mut self.root, key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Removing a leaf detaches its parent as well: the sibling subtree is
    /// promoted into the parent's slot, shortening that path by one level.
    /// The leaf-at-root case collapses the tree back to empty.
    fn remove_node(node: &mut Node<V>, key: &Key) -> Option<V> {
        match node {
            Node::Empty => None,
            Node::Leaf(leaf) => {
                if leaf.key != *key {
                    return None;
                }
                mem::take(node).into_value()
            }
            Node::Inner(inner) => {
                let dir = key.direction(inner.bit);
                match &inner.children[dir] {
                    Node::Leaf(leaf) if leaf.key == *key => {
                        let removed = mem::take(&mut inner.children[dir]);
                        let sibling = mem::take(&mut inner.children[dir ^ 1]);
                        *node = sibling;
                        removed.into_value()
                    }
                    _ => Self::remove_node(&mut inner.children[dir], key),
                }
            }
        }
    }

    /// Finds the entry whose key is the longest prefix of `key`.
    ///
    /// This is the classic routing-table lookup: among all stored keys
    /// that are prefixes of the query, the most specific one wins. The
    /// query key itself counts as its own prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_tree::{Key, Tree};
    ///
    /// let mut table = Tree::new();
    /// table.insert(Key::from_bits([10], 8), "core");
    /// table.insert(Key::from_bits([10, 1], 16), "edge");
    ///
    /// let dst = Key::from_bytes([10, 1, 2, 3]);
    /// assert_eq!(table.longest_match(&dst), Some(&"edge"));
    ///
    /// let other = Key::from_bytes([10, 9, 9, 9]);
    /// assert_eq!(table.longest_match(&other), Some(&"core"));
    ///
    /// let miss = Key::from_bytes([192, 0, 0, 1]);
    /// assert_eq!(table.longest_match(&miss), None);
    /// ```
    pub fn longest_match(&self, key: &Key) -> Option<&V> {
        self.root.longest(key).map(|leaf| &leaf.value)
    }

    /// Returns an iterator over the entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use critbit_tree::{Key, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(Key::from(2u8), 'b');
    /// tree.insert(Key::from(1u8), 'a');
    ///
    /// let keys: Vec<_> = tree.iter().map(|(k, _)| k.clone()).collect();
    /// assert_eq!(keys, vec![Key::from(1u8), Key::from(2u8)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root, false)
    }

    /// Returns an iterator over the entries in descending key order.
    pub fn iter_rev(&self) -> Iter<'_, V> {
        Iter::new(&self.root, true)
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys::new(&self.root)
    }

    /// Returns an iterator over the values, ordered by their keys.
    pub fn values(&self) -> Values<'_, V> {
        Values::new(&self.root)
    }
}

impl<V> Default for Tree<V> {
    fn default() -> Tree<V> {
        Tree::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Tree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for Tree<V> {
    fn eq(&self, other: &Tree<V>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for Tree<V> {}

impl<'a, V> IntoIterator for &'a Tree<V> {
    type Item = (&'a Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Iter<'a, V> {
        self.iter()
    }
}

impl<V> IntoIterator for Tree<V> {
    type Item = (Key, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter::new(self.root)
    }
}

impl<V> Extend<(Key, V)> for Tree<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<V> FromIterator<(Key, V)> for Tree<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Tree<V> {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    fn dataset(n: u32) -> Vec<(Key, u32)> {
        (0..n).map(|i| (Key::from(i), i)).collect()
    }

    fn shuffled(n: usize, seed: u64) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut StdRng::seed_from_u64(seed));
        order
    }

    #[test]
    fn test_new_tree() {
        let tree: Tree<u32> = Tree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.get(&Key::default()), None);
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn test_insert_get_iterate_delete_cycle() {
        let data = dataset(256);
        let order = shuffled(data.len(), 1);
        let mut tree = Tree::new();

        for &i in &order {
            assert_eq!(tree.insert(data[i].0.clone(), data[i].1), None);
        }
        assert_eq!(tree.len(), data.len());

        // Replacing every entry changes values but not the shape.
        for &i in &order {
            assert_eq!(tree.insert(data[i].0.clone(), data[i].1 + 1), Some(data[i].1));
        }
        assert_eq!(tree.len(), data.len());

        for (key, value) in &data {
            assert_eq!(tree.get(key), Some(&(value + 1)));
        }
        assert_eq!(tree.get(&Key::default()), None);

        // Big-endian u32 keys iterate in numeric order.
        for (i, (key, value)) in tree.iter().enumerate() {
            assert_eq!(key, &data[i].0);
            assert_eq!(*value, data[i].1 + 1);
        }
        for (i, (key, _)) in tree.iter_rev().enumerate() {
            assert_eq!(key, &data[data.len() - 1 - i].0);
        }

        for &i in &order {
            assert_eq!(tree.remove(&data[i].0), Some(data[i].1 + 1));
            // Already deleted.
            assert_eq!(tree.remove(&data[i].0), None);
        }
        assert!(tree.is_empty());
        for (key, _) in &data {
            assert_eq!(tree.get(key), None);
        }

        // Deleting from an empty tree stays a no-op.
        assert_eq!(tree.remove(&data[0].0), None);
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_single_entry_collapse() {
        let mut tree = Tree::new();
        tree.insert(Key::from("only"), 7);
        assert_eq!(tree.remove(&Key::from("only")), Some(7));
        assert!(tree.is_empty());

        // The tree is fully reusable afterwards.
        tree.insert(Key::from("again"), 8);
        assert_eq!(tree.get(&Key::from("again")), Some(&8));
    }

    #[test]
    fn test_get_mut() {
        let mut tree = Tree::new();
        tree.insert(Key::from("counter"), 1);
        if let Some(v) = tree.get_mut(&Key::from("counter")) {
            *v += 10;
        }
        assert_eq!(tree.get(&Key::from("counter")), Some(&11));
        assert_eq!(tree.get_mut(&Key::from("missing")), None);
    }

    #[test]
    fn test_keys_of_mixed_lengths() {
        let mut tree = Tree::new();
        let keys = vec![
            Key::default(),
            Key::from_bits([0b0000_0000], 1),
            Key::from_bits([0b1000_0000], 1),
            Key::from_bits([0b1000_0000], 2),
            Key::from_bits([0b1100_0000], 2),
            Key::from_bytes([0b1100_0000]),
        ];
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key.clone(), i);
        }
        assert_eq!(tree.len(), keys.len());

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(tree.get(key), Some(&i));
        }

        // A key and its extensions are distinct entries, and the
        // zero-length key sorts first.
        let scanned: Vec<Key> = tree.keys().cloned().collect();
        assert_eq!(scanned, keys);
    }

    #[test]
    fn test_zero_length_key() {
        let mut tree = Tree::new();
        tree.insert(Key::default(), "default");
        tree.insert(Key::from_bytes([200]), "specific");

        assert_eq!(tree.get(&Key::default()), Some(&"default"));
        // The empty key is a prefix of everything.
        assert_eq!(tree.longest_match(&Key::from_bytes([17])), Some(&"default"));
        assert_eq!(
            tree.longest_match(&Key::from_bytes([200])),
            Some(&"specific")
        );

        let first = tree.iter().next();
        assert_eq!(first, Some((&Key::default(), &"default")));
    }

    #[test]
    fn test_equality_and_clone() {
        let mut a = Tree::new();
        a.insert(Key::from("x"), 1);
        a.insert(Key::from("y"), 2);

        let b: Tree<u32> = vec![(Key::from("y"), 2), (Key::from("x"), 1)]
            .into_iter()
            .collect();
        assert_eq!(a, b);

        let mut c = a.clone();
        c.insert(Key::from("z"), 3);
        assert_ne!(a, c);
        assert_eq!(a.len(), 2);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_into_iterator() {
        let tree: Tree<u32> = (0..10u32).map(|i| (Key::from(i), i)).collect();

        let borrowed: Vec<u32> = (&tree).into_iter().map(|(_, v)| *v).collect();
        assert_eq!(borrowed, (0..10).collect::<Vec<u32>>());

        let owned: Vec<(Key, u32)> = tree.into_iter().collect();
        assert_eq!(owned.len(), 10);
        for (i, (key, value)) in owned.into_iter().enumerate() {
            assert_eq!(key, Key::from(i as u32));
            assert_eq!(value, i as u32);
        }
    }

    #[test]
    fn test_debug_output() {
        let mut tree = Tree::new();
        tree.insert(Key::from(1u8), 'a');
        assert_eq!(format!("{:?}", tree), "{Key(01/8): 'a'}");
    }
}
