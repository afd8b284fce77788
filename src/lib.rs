//! # Crit-bit Tree
//!
//! An ordered map keyed by arbitrary-length bit strings, implemented as a
//! crit-bit tree (also known as a PATRICIA trie).
//!
//! Lookups, insertions and removals run in O(k) where k is the key length
//! in bits, independent of how many entries are stored. Keys of different
//! bit lengths coexist in one tree, which makes longest-prefix matching a
//! natural operation rather than a bolt-on.
//!
//! ## Features
//!
//! - **Bit-granular keys**: keys need not be byte-aligned; a `/13` network
//!   prefix is a 13-bit key
//! - **Ordered iteration**: ascending or descending bit-string order via an
//!   explicit-stack scanner with no recursion
//! - **Longest prefix match**: the routing-table lookup in one descent with
//!   a bounded fallback
//! - **Path compression**: branch nodes exist only where stored keys
//!   actually diverge
//!
//! ## Example
//!
//! ```rust
//! use critbit_tree::{Key, Tree};
//!
//! let mut table = Tree::new();
//! table.insert(Key::from_bits([10], 8), "10.0.0.0/8");
//! table.insert(Key::from_bits([10, 1], 16), "10.1.0.0/16");
//!
//! // Exact lookup.
//! assert_eq!(table.get(&Key::from_bits([10], 8)), Some(&"10.0.0.0/8"));
//!
//! // Longest prefix match for an address.
//! let dst = Key::from_bytes([10, 1, 2, 3]);
//! assert_eq!(table.longest_match(&dst), Some(&"10.1.0.0/16"));
//! ```

mod key;
mod node;
mod scan;
mod tree;

// Re-export public types
pub use crate::key::Key;
pub use crate::scan::{IntoIter, Iter, Keys, Values};
pub use crate::tree::Tree;
