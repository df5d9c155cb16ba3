use std::{fmt, ptr};

use crate::rbtree::Rbtree;

/// Link to a node, as an index into the tree's node arena. `None` is
/// an empty (nil) position.
pub(crate) type Link = Option<usize>;

/// Color of a node. Empty positions count as [`Color::Black`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}

// Storage record for a single entry. The arena owns every record, the
// child links define the shape of the tree and `parent` is only used
// to navigate upwards.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) parent: Link,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl<K, V> Node<K, V> {
    // new nodes are always red leaves.
    pub(crate) fn new(key: K, value: V, parent: Link) -> Node<K, V> {
        Node {
            key,
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}

/// NodeRef is a read-only cursor on a single entry of [`Rbtree`].
///
/// Cursors move in key order with [`NodeRef::next`] and
/// [`NodeRef::previous`]. Stepping past either end gives `None`, which
/// is the same value [`Rbtree::end`] returns:
///
/// ```
/// use rbtree_index::Rbtree;
///
/// let tree: Rbtree<u32, &str> = vec![(2, "b"), (1, "a")].into_iter().collect();
/// let mut keys = vec![];
/// let mut node = tree.first();
/// while node != tree.end() {
///     let n = node.unwrap();
///     keys.push(*n.key());
///     node = n.next();
/// }
/// assert_eq!(keys, vec![1, 2]);
/// ```
pub struct NodeRef<'a, K, V> {
    tree: &'a Rbtree<K, V>,
    index: usize,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) fn new(tree: &'a Rbtree<K, V>, index: usize) -> NodeRef<'a, K, V> {
        NodeRef { tree, index }
    }

    #[inline]
    fn node(&self) -> &'a Node<K, V> {
        &self.tree.nodes[self.index]
    }

    /// Return the key of this entry.
    pub fn key(&self) -> &'a K {
        &self.node().key
    }

    /// Return the value of this entry.
    pub fn value(&self) -> &'a V {
        &self.node().value
    }

    /// Return the color of this node.
    pub fn color(&self) -> Color {
        self.node().color
    }

    /// In-order successor, `None` if this is the last entry.
    pub fn next(&self) -> Option<NodeRef<'a, K, V>> {
        let index = self.tree.next_of(self.index)?;
        Some(NodeRef::new(self.tree, index))
    }

    /// In-order predecessor, `None` if this is the first entry.
    pub fn previous(&self) -> Option<NodeRef<'a, K, V>> {
        let index = self.tree.prev_of(self.index)?;
        Some(NodeRef::new(self.tree, index))
    }
}

impl<'a, K, V> Clone for NodeRef<'a, K, V> {
    fn clone(&self) -> Self {
        NodeRef::new(self.tree, self.index)
    }
}

impl<'a, K, V> Copy for NodeRef<'a, K, V> {}

// Two cursors are equal when they point at the same node of the same tree.
impl<'a, K, V> PartialEq for NodeRef<'a, K, V> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl<'a, K, V> Eq for NodeRef<'a, K, V> {}

impl<'a, K, V> fmt::Debug for NodeRef<'a, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tree.fmt_subtree(Some(self.index), f)
    }
}

// Navigation over the node arena, by pure link walking.
impl<K, V> Rbtree<K, V> {
    #[inline]
    pub(crate) fn color_of(&self, link: Link) -> Color {
        link.map_or(Color::Black, |index| self.nodes[index].color)
    }

    #[inline]
    pub(crate) fn set_color(&mut self, link: Link, color: Color) {
        if let Some(index) = link {
            self.nodes[index].color = color
        }
    }

    pub(crate) fn is_left_child(&self, index: usize) -> bool {
        match self.nodes[index].parent {
            Some(parent) => self.nodes[parent].left == Some(index),
            None => false,
        }
    }

    pub(crate) fn sibling(&self, index: usize) -> Link {
        let parent = self.nodes[index].parent?;
        if self.nodes[parent].left == Some(index) {
            self.nodes[parent].right
        } else {
            self.nodes[parent].left
        }
    }

    pub(crate) fn minimum(&self, mut index: usize) -> usize {
        while let Some(left) = self.nodes[index].left {
            index = left;
        }
        index
    }

    pub(crate) fn maximum(&self, mut index: usize) -> usize {
        while let Some(right) = self.nodes[index].right {
            index = right;
        }
        index
    }

    pub(crate) fn next_of(&self, index: usize) -> Link {
        if let Some(right) = self.nodes[index].right {
            return Some(self.minimum(right));
        }
        let mut index = index;
        while let Some(parent) = self.nodes[index].parent {
            if self.nodes[parent].right != Some(index) {
                return Some(parent);
            }
            index = parent;
        }
        None
    }

    pub(crate) fn prev_of(&self, index: usize) -> Link {
        if let Some(left) = self.nodes[index].left {
            return Some(self.maximum(left));
        }
        let mut index = index;
        while let Some(parent) = self.nodes[index].parent {
            if self.nodes[parent].left != Some(index) {
                return Some(parent);
            }
            index = parent;
        }
        None
    }

    pub(crate) fn fmt_subtree(&self, link: Link, f: &mut fmt::Formatter<'_>) -> fmt::Result
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        match link {
            None => write!(f, "nil"),
            Some(index) => {
                let node = &self.nodes[index];
                write!(f, "({:?}, {:?}, {}, left: ", node.key, node.value, node.color)?;
                self.fmt_subtree(node.left, f)?;
                write!(f, ", right: ")?;
                self.fmt_subtree(node.right, f)?;
                write!(f, ")")
            }
        }
    }
}
