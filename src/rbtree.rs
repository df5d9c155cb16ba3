use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt,
    iter::FromIterator,
    mem,
};

use log::{debug, trace};
use rand::Rng;

use crate::depth::Depth;
use crate::error::Error;
use crate::node::{Color, Link, Node, NodeRef};

/// Rbtree manage a single instance of in-memory index using
/// [red-black][rbtree] tree.
///
/// Nodes are kept in an arena and linked by index, every node carries
/// a link to its parent so that cursors can walk the tree in both
/// directions without an explicit stack. Keys are unique, setting an
/// existing key overwrites its value.
///
/// The ordering supplied by `K: Ord` must be a total order, an
/// inconsistent ordering leaves the tree in an unspecified state.
///
/// [rbtree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
#[derive(Clone)]
pub struct Rbtree<K, V> {
    pub(crate) nodes: Vec<Node<K, V>>,
    pub(crate) root: Link,
}

/// Different ways to construct a new Rbtree instance.
impl<K, V> Rbtree<K, V>
where
    K: Ord,
{
    /// Create an empty instance of Rbtree.
    pub fn new() -> Rbtree<K, V> {
        Rbtree {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Create a new instance of Rbtree and load it with entries from
    /// `iter`. When `iter` yields the same key more than once, the
    /// last value wins.
    pub fn load_from<I>(iter: I) -> Rbtree<K, V>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut tree = Rbtree::new();
        let mut overwrites = 0_usize;
        for (key, value) in iter {
            if tree.set(key, value).is_some() {
                overwrites += 1;
            }
        }
        debug!(
            target: "rbtree",
            "loaded {} entries, {} overwrites", tree.len(), overwrites
        );
        tree
    }
}

impl<K, V> Default for Rbtree<K, V>
where
    K: Ord,
{
    fn default() -> Rbtree<K, V> {
        Rbtree::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Rbtree<K, V>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> Rbtree<K, V>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Rbtree::load_from(iter)
    }
}

impl<K, V> Extend<(K, V)> for Rbtree<K, V>
where
    K: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

/// Maintenance API.
impl<K, V> Rbtree<K, V> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Return the number of edges on the longest path from root to a
    /// leaf. Computed by walking the whole tree, meant for diagnostics.
    pub fn height(&self) -> usize {
        self.levels(self.root).saturating_sub(1)
    }

    fn levels(&self, link: Link) -> usize {
        match link {
            None => 0,
            Some(index) => {
                let node = &self.nodes[index];
                1 + self.levels(node.left).max(self.levels(node.right))
            }
        }
    }

    /// Return quickly with basic statisics, only entries() and
    /// node_size() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<K, V>>())
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}

/// Cursor API.
impl<K, V> Rbtree<K, V> {
    /// Return the entry with the smallest key.
    pub fn first(&self) -> Option<NodeRef<K, V>> {
        let root = self.root?;
        Some(NodeRef::new(self, self.minimum(root)))
    }

    /// Return the entry with the largest key.
    pub fn last(&self) -> Option<NodeRef<K, V>> {
        let root = self.root?;
        Some(NodeRef::new(self, self.maximum(root)))
    }

    /// End sentinel, what [`NodeRef::next`] and [`NodeRef::previous`]
    /// return after stepping past either end of the tree.
    #[inline]
    pub fn end(&self) -> Option<NodeRef<K, V>> {
        None
    }

    /// Return a random entry from this index.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(&K, &V)> {
        let mut index = self.root?;
        let mut at_depth = rng.gen::<u8>() % 64;
        loop {
            let node = &self.nodes[index];
            let next = if rng.gen::<bool>() {
                node.left
            } else {
                node.right
            };
            match next {
                Some(next) if at_depth > 0 => {
                    at_depth -= 1;
                    index = next;
                }
                _ => break Some((&node.key, &node.value)),
            }
        }
    }
}

/// Read operations on Rbtree instance.
impl<K, V> Rbtree<K, V>
where
    K: Ord,
{
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key)?;
        Some(&self.nodes[index].value)
    }

    /// Get a mutable reference to the value for key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key)?;
        Some(&mut self.nodes[index].value)
    }

    /// Check whether key is present in this index.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Return a cursor positioned on key, if present.
    pub fn lookup<Q>(&self, key: &Q) -> Option<NodeRef<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key)?;
        Some(NodeRef::new(self, index))
    }

    pub(crate) fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut link = self.root;
        while let Some(index) = link {
            let node = &self.nodes[index];
            link = match node.key.borrow().cmp(key) {
                Ordering::Less => node.right,
                Ordering::Greater => node.left,
                Ordering::Equal => return Some(index),
            };
        }
        None
    }
}

/// Write operations on Rbtree instance.
impl<K, V> Rbtree<K, V>
where
    K: Ord,
{
    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        match self.descend(&key) {
            Ok(index) => Some(mem::replace(&mut self.nodes[index].value, value)),
            Err(slot) => {
                self.attach(slot, key, value);
                None
            }
        }
    }

    /// Create a new {key, value} entry in the index. If key is already
    /// present return error, leaving the index untouched.
    pub fn create(&mut self, key: K, value: V) -> Result<(), Error<K>> {
        match self.descend(&key) {
            Ok(_) => Err(Error::OverwriteKey),
            Err(slot) => {
                self.attach(slot, key, value);
                Ok(())
            }
        }
    }

    /// Delete key from this instance and return its value. If key is
    /// not present, then delete is effectively a no-op.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let index = self.find(key)?;
        Some(self.delete(index).1)
    }

    /// Remove and return the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let index = self.minimum(root);
        Some(self.delete(index))
    }

    /// Remove and return the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let root = self.root?;
        let index = self.maximum(root);
        Some(self.delete(index))
    }

    // Ok(index) of the node holding key, else Err((parent, is_left))
    // locating the empty slot where key belongs.
    fn descend(&self, key: &K) -> Result<usize, (Link, bool)> {
        let (mut parent, mut is_left) = (None, false);
        let mut link = self.root;
        while let Some(index) = link {
            let node = &self.nodes[index];
            parent = link;
            match node.key.cmp(key) {
                Ordering::Greater => {
                    is_left = true;
                    link = node.left;
                }
                Ordering::Less => {
                    is_left = false;
                    link = node.right;
                }
                Ordering::Equal => return Ok(index),
            }
        }
        Err((parent, is_left))
    }
}

impl<K, V> Rbtree<K, V> {
    fn attach(&mut self, (parent, is_left): (Link, bool), key: K, value: V) {
        let index = self.nodes.len();
        self.nodes.push(Node::new(key, value, parent));
        match parent {
            None => self.root = Some(index),
            Some(parent) if is_left => self.nodes[parent].left = Some(index),
            Some(parent) => self.nodes[parent].right = Some(index),
        }
        self.fix_insert(index);
    }

    // physically remove the entry at `index` and return its key, value.
    fn delete(&mut self, mut index: usize) -> (K, V) {
        // with two children, move the in-order predecessor's entry into
        // this node and remove the predecessor instead.
        if let (Some(left), Some(_)) = (self.nodes[index].left, self.nodes[index].right) {
            let max = self.maximum(left);
            self.swap_entries(index, max);
            index = max;
        }

        // node has at most one child from here on.
        let child = self.nodes[index].right.or(self.nodes[index].left);
        // removing a red node keeps every invariant.
        if self.nodes[index].color == Color::Black {
            self.nodes[index].color = self.color_of(child);
            self.fix_remove(index);
        }

        self.replace(index, child);
        self.set_color(self.root, Color::Black);

        self.nodes[index].detach();
        let node = self.release(index);
        (node.key, node.value)
    }

    fn swap_entries(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.nodes.split_at_mut(hi);
        mem::swap(&mut head[lo].key, &mut tail[0].key);
        mem::swap(&mut head[lo].value, &mut tail[0].value);
    }

    // Free the slot of a detached node. The last node of the arena is
    // moved into the freed slot and its neighbours relinked.
    fn release(&mut self, index: usize) -> Node<K, V> {
        let last = self.nodes.len() - 1;
        if index != last {
            let (parent, left, right) = {
                let node = &self.nodes[last];
                (node.parent, node.left, node.right)
            };
            match parent {
                None => self.root = Some(index),
                Some(p) if self.nodes[p].left == Some(last) => self.nodes[p].left = Some(index),
                Some(p) => self.nodes[p].right = Some(index),
            }
            for child in [left, right].iter().flatten() {
                self.nodes[*child].parent = Some(index);
            }
        }
        self.nodes.swap_remove(index)
    }
}

// Balancing engine.
impl<K, V> Rbtree<K, V> {
    fn fix_insert(&mut self, mut node: usize) {
        loop {
            // a. node is root, colour it black.
            let parent = match self.nodes[node].parent {
                None => {
                    self.nodes[node].color = Color::Black;
                    return;
                }
                Some(parent) => parent,
            };

            // b. black parent, tree is already balanced.
            if self.nodes[parent].color == Color::Black {
                return;
            }

            // parent is red, hence it is not the root.
            let grandparent = match self.nodes[parent].parent {
                Some(grandparent) => grandparent,
                None => panic!("fix_insert(): red root ? call the programmer"),
            };

            // c. red uncle, push the red up to grandparent and repeat.
            let uncle = self.sibling(parent);
            if self.color_of(uncle) == Color::Red {
                trace!(target: "rbtree", "fix_insert: red uncle at {}", grandparent);
                self.nodes[parent].color = Color::Black;
                self.set_color(uncle, Color::Black);
                self.nodes[grandparent].color = Color::Red;
                node = grandparent;
                continue;
            }

            // d. turn a zig-zag into a zig-zig.
            let parent_is_left = self.is_left_child(parent);
            let node_is_left = self.is_left_child(node);
            let parent = if parent_is_left && !node_is_left {
                self.rotate_left(parent);
                node
            } else if !parent_is_left && node_is_left {
                self.rotate_right(parent);
                node
            } else {
                parent
            };

            // e. rotate grandparent away from the red pair.
            trace!(target: "rbtree", "fix_insert: rotate at {}", grandparent);
            self.nodes[parent].color = Color::Black;
            self.nodes[grandparent].color = Color::Red;
            if parent_is_left {
                self.rotate_right(grandparent);
            } else {
                self.rotate_left(grandparent);
            }
            return;
        }
    }

    // `node` is black and about to be removed from its position, which
    // leaves its side of the parent one black short.
    fn fix_remove(&mut self, mut node: usize) {
        loop {
            // i. node is the tree root, nothing to do.
            let parent = match self.nodes[node].parent {
                None => return,
                Some(parent) => parent,
            };
            let node_is_left = self.nodes[parent].left == Some(node);

            // ii. red sibling, rotate so that the sibling is black.
            let mut sibling = self.sibling_of(node);
            if self.nodes[sibling].color == Color::Red {
                trace!(target: "rbtree", "fix_remove: red sibling at {}", sibling);
                self.nodes[parent].color = Color::Red;
                self.nodes[sibling].color = Color::Black;
                if node_is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                sibling = self.sibling_of(node);
            }

            let (near, far) = self.nephews(sibling, node_is_left);
            if self.color_of(near) == Color::Black && self.color_of(far) == Color::Black {
                self.nodes[sibling].color = Color::Red;
                if self.nodes[parent].color == Color::Black {
                    // iii. push the deficiency up to the parent.
                    trace!(target: "rbtree", "fix_remove: recurse at {}", parent);
                    node = parent;
                    continue;
                }
                // iv. red parent absorbs the deficiency.
                self.nodes[parent].color = Color::Black;
                return;
            }

            // v. near nephew red, far nephew black, rotate at sibling
            // so that the red nephew ends up on the far side.
            if self.color_of(far) == Color::Black {
                self.set_color(near, Color::Black);
                self.nodes[sibling].color = Color::Red;
                if node_is_left {
                    self.rotate_right(sibling);
                } else {
                    self.rotate_left(sibling);
                }
                sibling = self.sibling_of(node);
            }

            // vi. far nephew red, rotate at parent towards node.
            trace!(target: "rbtree", "fix_remove: rotate at {}", parent);
            let (_, far) = self.nephews(sibling, node_is_left);
            self.nodes[sibling].color = self.nodes[parent].color;
            self.nodes[parent].color = Color::Black;
            self.set_color(far, Color::Black);
            if node_is_left {
                self.rotate_left(parent);
            } else {
                self.rotate_right(parent);
            }
            return;
        }
    }

    // a black non-root node always has a sibling.
    fn sibling_of(&self, node: usize) -> usize {
        match self.sibling(node) {
            Some(sibling) => sibling,
            None => panic!("fix_remove(): missing sibling ? call the programmer"),
        }
    }

    // (near, far) children of sibling, relative to node's side.
    fn nephews(&self, sibling: usize, node_is_left: bool) -> (Link, Link) {
        let sibling = &self.nodes[sibling];
        if node_is_left {
            (sibling.left, sibling.right)
        } else {
            (sibling.right, sibling.left)
        }
    }

    //              (p)                       (p)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr       left   xl
    //
    pub(crate) fn rotate_left(&mut self, node: usize) {
        let x = match self.nodes[node].right {
            Some(x) => x,
            None => panic!("rotate_left(): missing right child ? call the programmer"),
        };
        self.replace(node, Some(x));
        let xl = self.nodes[x].left;
        self.nodes[node].right = xl;
        if let Some(xl) = xl {
            self.nodes[xl].parent = Some(node);
        }
        self.nodes[node].parent = Some(x);
        self.nodes[x].left = Some(node);
    }

    //              (p)                       (p)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x      right             xl      node
    //          / \                               / \
    //        xl   xr                            xr  right
    //
    pub(crate) fn rotate_right(&mut self, node: usize) {
        let x = match self.nodes[node].left {
            Some(x) => x,
            None => panic!("rotate_right(): missing left child ? call the programmer"),
        };
        self.replace(node, Some(x));
        let xr = self.nodes[x].right;
        self.nodes[node].left = xr;
        if let Some(xr) = xr {
            self.nodes[xr].parent = Some(node);
        }
        self.nodes[node].parent = Some(x);
        self.nodes[x].right = Some(node);
    }

    // splice `new` into the position of `old`, under old's parent or as
    // the root. Links of `old` itself are left untouched.
    pub(crate) fn replace(&mut self, old: usize, new: Link) {
        let parent = self.nodes[old].parent;
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
        if let Some(new) = new {
            self.nodes[new].parent = parent;
        }
    }
}

/// Validation API.
impl<K, V> Rbtree<K, V>
where
    K: Ord + Clone,
{
    /// Validate red-black tree with following rules:
    ///
    /// * Root node is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    /// * Parent links agree with child links.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, Error<K>> {
        if self.color_of(self.root) == Color::Red {
            return Err(Error::RedRoot);
        }
        if let Some(root) = self.root {
            if let Some(parent) = self.nodes[root].parent {
                let msg = format!("root {} has parent {}", root, parent);
                return Err(Error::DanglingParent(msg));
            }
        }

        let mut stats = Stats::new(self.len(), mem::size_of::<Node<K, V>>());
        let mut depths = Depth::new();
        let mut count = 0;
        let blacks = self.validate_tree(self.root, 0, &mut depths, &mut count)?;
        if count != self.len() {
            return Err(Error::CountMismatch(count, self.len()));
        }
        debug!(
            target: "rbtree",
            "validated {} entries, blacks:{} depth:{:?}", count, blacks, depths
        );
        stats.set_blacks(blacks);
        stats.set_depths(depths);
        Ok(stats)
    }

    fn validate_tree(
        &self,
        link: Link,
        depth: usize,
        depths: &mut Depth,
        count: &mut usize,
    ) -> Result<usize, Error<K>> {
        let index = match link {
            None => {
                depths.sample(depth);
                return Ok(1);
            }
            Some(index) => index,
        };
        *count += 1;

        let node = &self.nodes[index];
        let red = node.color == Color::Red;
        if red && (self.color_of(node.left) == Color::Red || self.color_of(node.right) == Color::Red)
        {
            return Err(Error::ConsecutiveReds);
        }
        for child in [node.left, node.right].iter().flatten() {
            let child_node = &self.nodes[*child];
            if child_node.parent != Some(index) {
                let msg = format!("node {} parent {:?}, expected {}", child, child_node.parent, index);
                return Err(Error::DanglingParent(msg));
            }
        }
        if let Some(left) = node.left {
            if self.nodes[left].key >= node.key {
                let (lkey, parent) = (self.nodes[left].key.clone(), node.key.clone());
                return Err(Error::SortError(lkey, parent));
            }
        }
        if let Some(right) = node.right {
            if self.nodes[right].key <= node.key {
                let (rkey, parent) = (self.nodes[right].key.clone(), node.key.clone());
                return Err(Error::SortError(rkey, parent));
            }
        }

        let lblacks = self.validate_tree(node.left, depth + 1, depths, count)?;
        let rblacks = self.validate_tree(node.right, depth + 1, depths, count)?;
        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }
        Ok(if red { lblacks } else { lblacks + 1 })
    }
}

impl<K, V> fmt::Debug for Rbtree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_subtree(self.root, f)
    }
}

/// Statistics on [`Rbtree`]. Serves two purpose:
///
/// * To get partial but quick statistics via [`Rbtree::stats`] method.
/// * To get full statisics via [`Rbtree::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize,
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Rbtree`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Rbtree<K,V>`. The
    /// overhead is the color tag and three links.
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black nodes from root to any nil position,
    /// counting the nil position itself.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics.
    pub fn depths(&self) -> Option<&Depth> {
        self.depths.as_ref()
    }
}
