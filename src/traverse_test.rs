use std::ops::Bound;

use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::rbtree::Rbtree;
use crate::traverse::{InOrder, InOrderReverse, Limit, Traversal};

fn make_tree(keys: &[u32]) -> Rbtree<u32, u32> {
    let mut tree = Rbtree::new();
    for key in keys.iter() {
        tree.set(*key, key * 100);
    }
    tree
}

#[test]
fn test_visit() {
    let tree = make_tree(&[5, 3, 8, 1, 4, 7, 9]);
    let mut values = vec![];
    tree.visit(|value| values.push(*value / 100));
    assert_eq!(values, vec![1, 3, 4, 5, 7, 8, 9]);

    let mut values = vec![];
    tree.visit_with(InOrderReverse, |value| values.push(*value / 100));
    assert_eq!(values, vec![9, 8, 7, 5, 4, 3, 1]);

    let empty: Rbtree<u32, u32> = Rbtree::new();
    let mut count = 0;
    empty.visit(|_| count += 1);
    assert_eq!(count, 0);
}

#[test]
fn test_iter() {
    let tree = make_tree(&[5, 3, 8, 1, 4, 7, 9]);
    let keys: Vec<u32> = tree.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.iter().len(), 7);

    let keys: Vec<u32> = tree.iter_rev().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![9, 8, 7, 5, 4, 3, 1]);

    // restartable.
    assert_eq!(tree.iter().count(), tree.iter().count());

    let mut n = 0;
    for (key, value) in &tree {
        assert_eq!(*value, key * 100);
        n += 1;
    }
    assert_eq!(n, tree.len());
}

#[test]
fn test_limit() {
    let tree = make_tree(&(0..20).collect::<Vec<u32>>());
    for limit in [0, 1, 5, 19, 20, 21, 100].iter() {
        let want = std::cmp::min(*limit, tree.len());

        let mut count = 0;
        tree.visit_with(Limit::new(*limit, InOrder), |_| count += 1);
        assert_eq!(count, want);

        let mut values = vec![];
        tree.visit_with(Limit::new(*limit, InOrderReverse), |v| values.push(*v));
        assert_eq!(values.len(), want);
        let expected: Vec<u32> = (0..20).rev().take(want).map(|k| k * 100).collect();
        assert_eq!(values, expected);
    }

    // limits compose, the tighter one wins.
    let nested = Limit::new(10, Limit::new(3, InOrder));
    let keys: Vec<u32> = nested.walk(&tree).map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![0, 1, 2]);

    // and compose with other iterator adaptors.
    let odd: Vec<u32> = Limit::new(6, InOrder)
        .walk(&tree)
        .filter(|(k, _)| *k % 2 == 1)
        .map(|(k, _)| *k)
        .collect();
    assert_eq!(odd, vec![1, 3, 5]);
}

#[test]
fn test_cursor() {
    let tree = make_tree(&[5, 3, 8, 1, 4, 7, 9]);
    assert_eq!(*tree.first().unwrap().key(), 1);
    assert_eq!(*tree.last().unwrap().key(), 9);
    assert!(tree.first().unwrap().previous().is_none());
    assert!(tree.last().unwrap().next() == tree.end());

    let mut keys = vec![];
    let mut node = tree.first();
    while node != tree.end() {
        let n = node.unwrap();
        keys.push(*n.key());
        assert_eq!(*n.value(), n.key() * 100);
        node = n.next();
    }
    assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);

    let mut keys = vec![];
    let mut node = tree.last();
    while let Some(n) = node {
        keys.push(*n.key());
        node = n.previous();
    }
    assert_eq!(keys, vec![9, 8, 7, 5, 4, 3, 1]);
}

#[test]
fn test_next_previous() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    let mut keys: Vec<u32> = (0..2000).collect();
    keys.shuffle(&mut rng);
    let mut tree = make_tree(&keys);
    for key in keys[..700].iter() {
        tree.remove(key);
    }

    let mut node = tree.first();
    while let Some(n) = node {
        if let Some(m) = n.next() {
            assert!(n.key() < m.key());
            assert_eq!(m.previous(), Some(n));
        }
        node = n.next();
    }
    let mut node = tree.last();
    while let Some(n) = node {
        if let Some(m) = n.previous() {
            assert_eq!(m.next(), Some(n));
        }
        node = n.previous();
    }
}

#[test]
fn test_range() {
    let tree = make_tree(&[10, 20, 30, 40, 50]);
    let keys = |r: Vec<(&u32, &u32)>| r.into_iter().map(|(k, _)| *k).collect::<Vec<u32>>();

    assert_eq!(keys(tree.range(20..40).collect()), vec![20, 30]);
    assert_eq!(keys(tree.range(20..=40).collect()), vec![20, 30, 40]);
    assert_eq!(keys(tree.range(15..45).collect()), vec![20, 30, 40]);
    assert_eq!(keys(tree.range::<u32, _>(..).collect()), vec![10, 20, 30, 40, 50]);
    assert_eq!(keys(tree.range(..=10).collect()), vec![10]);
    assert_eq!(keys(tree.range(50..).collect()), vec![50]);
    assert!(tree.range(51..).next().is_none());
    assert!(tree.range(21..29).next().is_none());
    assert!(tree.range(30..30).next().is_none());
    assert!(tree.range(40..20).next().is_none());

    let empty: Rbtree<u32, u32> = Rbtree::new();
    assert!(empty.range::<u32, _>(..).next().is_none());
}

#[test]
fn test_string_keys() {
    let mut tree: Rbtree<String, usize> = Rbtree::new();
    for (i, word) in ["pear", "apple", "fig", "kiwi", "banana"].iter().enumerate() {
        tree.set(word.to_string(), i);
    }
    let words: Vec<&str> = tree.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(words, vec!["apple", "banana", "fig", "kiwi", "pear"]);
    let words: Vec<&str> = tree
        .range::<str, _>((Bound::Included("b"), Bound::Excluded("l")))
        .map(|(k, _)| k.as_str())
        .collect();
    assert_eq!(words, vec!["banana", "fig", "kiwi"]);
}
