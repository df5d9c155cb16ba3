use std::{error, fmt};

/// Error enumerates over all possible errors that this package
/// shall return.
#[derive(Debug, PartialEq)]
pub enum Error<K> {
    /// Fatal case, root node is colored red.
    RedRoot,
    /// Fatal case, a red node has a red parent or a red child.
    ConsecutiveReds,
    /// Fatal case, two paths from the root cross different number of
    /// black nodes. The String component can be used for debugging.
    UnbalancedBlacks(String),
    /// Fatal case, index entries are not in sort-order. Holds the
    /// offending child key and its parent key.
    SortError(K, K),
    /// Fatal case, a parent link does not point back to the node
    /// owning the child link.
    DanglingParent(String),
    /// Fatal case, number of reachable nodes does not match the count
    /// maintained by the tree, (counted, expected).
    CountMismatch(usize, usize),
    /// Returned by create() API when key is already present.
    OverwriteKey,
}

impl<K> fmt::Display for Error<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RedRoot => write!(f, "root node is red"),
            Error::ConsecutiveReds => write!(f, "consecutive red nodes"),
            Error::UnbalancedBlacks(msg) => write!(f, "unbalanced blacks, {}", msg),
            Error::SortError(key, parent) => {
                write!(f, "key {:?} out of order under {:?}", key, parent)
            }
            Error::DanglingParent(msg) => write!(f, "dangling parent link, {}", msg),
            Error::CountMismatch(counted, expected) => {
                write!(f, "counted {} nodes, expected {}", counted, expected)
            }
            Error::OverwriteKey => write!(f, "key already present"),
        }
    }
}

impl<K> error::Error for Error<K> where K: fmt::Debug {}
