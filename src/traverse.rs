//! Ordered traversal over [`Rbtree`] entries.
//!
//! All iterators here are lazy: they hold a position in the tree and
//! step to the in-order successor (or predecessor) on demand by walking
//! the parent and child links, no intermediate buffer is built.
//! Traversals are restartable, calling the producer again starts a
//! fresh walk.

use std::{
    borrow::Borrow,
    cmp::Ordering,
    iter::FusedIterator,
    ops::{Bound, RangeBounds},
};

use crate::node::Link;
use crate::rbtree::Rbtree;

/// Traversal produces a lazy sequence of entries from a tree. Implement
/// this to plug new orderings into [`Rbtree::visit_with`].
pub trait Traversal<K, V> {
    /// Start a fresh walk over `tree`.
    fn walk<'a>(&self, tree: &'a Rbtree<K, V>) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a>;
}

/// Ascending key order, left-self-right.
#[derive(Clone, Copy, Debug, Default)]
pub struct InOrder;

/// Descending key order, right-self-left.
#[derive(Clone, Copy, Debug, Default)]
pub struct InOrderReverse;

/// Limit decorates another traversal and stops it after at most
/// `limit` entries.
///
/// ```
/// use rbtree_index::{InOrderReverse, Limit, Rbtree};
///
/// let tree: Rbtree<i32, i32> = (0..10).map(|i| (i, i * 10)).collect();
/// let mut values = vec![];
/// tree.visit_with(Limit::new(3, InOrderReverse), |v| values.push(*v));
/// assert_eq!(values, vec![90, 80, 70]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Limit<T> {
    limit: usize,
    inner: T,
}

impl<T> Limit<T> {
    /// Cap `inner` at `limit` entries.
    pub fn new(limit: usize, inner: T) -> Limit<T> {
        Limit { limit, inner }
    }
}

impl<K, V> Traversal<K, V> for InOrder {
    fn walk<'a>(&self, tree: &'a Rbtree<K, V>) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a> {
        Box::new(tree.iter())
    }
}

impl<K, V> Traversal<K, V> for InOrderReverse {
    fn walk<'a>(&self, tree: &'a Rbtree<K, V>) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a> {
        Box::new(tree.iter_rev())
    }
}

impl<K, V, T> Traversal<K, V> for Limit<T>
where
    T: Traversal<K, V>,
{
    fn walk<'a>(&self, tree: &'a Rbtree<K, V>) -> Box<dyn Iterator<Item = (&'a K, &'a V)> + 'a> {
        Box::new(self.inner.walk(tree).take(self.limit))
    }
}

/// Traversal API.
impl<K, V> Rbtree<K, V> {
    /// Return an iterator over all entries in ascending key order.
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            tree: self,
            next: self.root.map(|root| self.minimum(root)),
            remaining: self.len(),
        }
    }

    /// Return an iterator over all entries in descending key order.
    pub fn iter_rev(&self) -> IterRev<K, V> {
        IterRev {
            tree: self,
            next: self.root.map(|root| self.maximum(root)),
            remaining: self.len(),
        }
    }

    /// Call `callback` with every value in ascending key order.
    pub fn visit<F>(&self, callback: F)
    where
        F: FnMut(&V),
    {
        self.visit_with(InOrder, callback)
    }

    /// Call `callback` with every value produced by `traversal`.
    pub fn visit_with<T, F>(&self, traversal: T, mut callback: F)
    where
        T: Traversal<K, V>,
        F: FnMut(&V),
    {
        for (_, value) in traversal.walk(self) {
            callback(value)
        }
    }
}

impl<K, V> Rbtree<K, V>
where
    K: Ord,
{
    /// Range over all entries from low to high, in ascending order.
    pub fn range<Q, R>(&self, range: R) -> Range<K, V>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ?Sized,
    {
        let low = self.seek_low(range.start_bound());
        let high = self.seek_high(range.end_bound());
        let next = match (low, high) {
            (Some(low), Some(high)) if self.nodes[low].key <= self.nodes[high].key => Some(low),
            _ => None,
        };
        let stop = match next {
            Some(_) => high.and_then(|high| self.next_of(high)),
            None => None,
        };
        Range {
            tree: self,
            next,
            stop,
        }
    }

    // first node whose key is within the lower bound.
    fn seek_low<Q>(&self, bound: Bound<&Q>) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut link, mut found) = (self.root, None);
        while let Some(index) = link {
            let node = &self.nodes[index];
            let within = match bound {
                Bound::Unbounded => true,
                Bound::Included(low) => node.key.borrow().cmp(low) != Ordering::Less,
                Bound::Excluded(low) => node.key.borrow().cmp(low) == Ordering::Greater,
            };
            if within {
                found = link;
                link = node.left;
            } else {
                link = node.right;
            }
        }
        found
    }

    // last node whose key is within the upper bound.
    fn seek_high<Q>(&self, bound: Bound<&Q>) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut link, mut found) = (self.root, None);
        while let Some(index) = link {
            let node = &self.nodes[index];
            let within = match bound {
                Bound::Unbounded => true,
                Bound::Included(high) => node.key.borrow().cmp(high) != Ordering::Greater,
                Bound::Excluded(high) => node.key.borrow().cmp(high) == Ordering::Less,
            };
            if within {
                found = link;
                link = node.right;
            } else {
                link = node.left;
            }
        }
        found
    }
}

impl<'a, K, V> IntoIterator for &'a Rbtree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Ascending iterator, refer to [`Rbtree::iter`].
pub struct Iter<'a, K, V> {
    tree: &'a Rbtree<K, V>,
    next: Link,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.tree.next_of(index);
        self.remaining -= 1;
        let node = &self.tree.nodes[index];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> FusedIterator for Iter<'a, K, V> {}

/// Descending iterator, refer to [`Rbtree::iter_rev`].
pub struct IterRev<'a, K, V> {
    tree: &'a Rbtree<K, V>,
    next: Link,
    remaining: usize,
}

impl<'a, K, V> Iterator for IterRev<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = self.tree.prev_of(index);
        self.remaining -= 1;
        let node = &self.tree.nodes[index];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> ExactSizeIterator for IterRev<'a, K, V> {}

impl<'a, K, V> FusedIterator for IterRev<'a, K, V> {}

/// Iterator over a key range, refer to [`Rbtree::range`].
pub struct Range<'a, K, V> {
    tree: &'a Rbtree<K, V>,
    next: Link,
    stop: Link, // successor of the last entry in range, exclusive.
}

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        self.next = match self.tree.next_of(index) {
            next if next == self.stop => None,
            next => next,
        };
        let node = &self.tree.nodes[index];
        Some((&node.key, &node.value))
    }
}

impl<'a, K, V> FusedIterator for Range<'a, K, V> {}
