//! Red-black tree index, an ordered map from unique keys to values.
//!
//! ```
//! use rbtree_index::Rbtree;
//!
//! let mut tree: Rbtree<u64, &str> = Rbtree::new();
//! for (key, value) in vec![(5, "e"), (3, "c"), (8, "h"), (1, "a")] {
//!     assert!(tree.set(key, value).is_none());
//! }
//! assert_eq!(tree.set(3, "C"), Some("c"));
//! assert_eq!(tree.get(&3), Some(&"C"));
//! assert_eq!(tree.remove(&8), Some("h"));
//! assert_eq!(tree.len(), 3);
//! assert!(tree.validate().is_ok());
//! ```

mod depth;
mod error;
mod node;
mod rbtree;
mod traverse;

pub use crate::depth::Depth;
pub use crate::error::Error;
pub use crate::node::{Color, NodeRef};
pub use crate::rbtree::{Rbtree, Stats};
pub use crate::traverse::{InOrder, InOrderReverse, Iter, IterRev, Limit, Range, Traversal};

#[cfg(test)]
mod traverse_test;
