//! Height-balanced ordered index (AVL tree).
//!
//! Keys are ordered by a comparator injected at construction rather than by
//! the key type's own `Ord`, so one record type can be indexed several ways.
//!
//! ```rust
//! use ordhash_rs::AvlTree;
//!
//! let mut by_len = AvlTree::new(|a: &&str, b: &&str| a.len().cmp(&b.len()));
//! by_len.insert("pear");
//! by_len.insert("fig");
//! by_len.insert("banana");
//!
//! assert_eq!(by_len.traverse_ascending(), vec![&"fig", &"pear", &"banana"]);
//! assert_eq!(by_len.find(&"kiwi"), Some(&"pear"));
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Comparator used by [`AvlTree::natural`].
pub type NaturalOrder<K> = fn(&K, &K) -> Ordering;

type Link<K> = Option<Box<Node<K>>>;

#[derive(Clone)]
struct Node<K> {
    key: K,
    /// Height of the subtree rooted here; a leaf has height 1.
    height: u32,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn leaf(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            height: 1,
            left: None,
            right: None,
        })
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// `height(left) - height(right)`
    #[inline]
    fn balance(&self) -> i64 {
        i64::from(height(&self.left)) - i64::from(height(&self.right))
    }
}

#[inline]
fn height<K>(link: &Link<K>) -> u32 {
    link.as_ref().map_or(0, |n| n.height)
}

#[inline]
fn balance_of<K>(link: &Link<K>) -> i64 {
    link.as_ref().map_or(0, |n| n.balance())
}

// =============================================================================
// Rotations
// =============================================================================

/// Lift `y.left` above `y`. `y` must have a left child.
fn rotate_right<K>(mut y: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut x) = y.left.take() else {
        debug_assert!(false, "rotate_right without a left child");
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Lift `x.right` above `x`. `x` must have a right child.
fn rotate_left<K>(mut x: Box<Node<K>>) -> Box<Node<K>> {
    let Some(mut y) = x.right.take() else {
        debug_assert!(false, "rotate_left without a right child");
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

// =============================================================================
// Insertion
// =============================================================================

/// What one insert frame reports to its parent.
#[derive(Clone, Copy)]
enum Inserted {
    /// An equal key was already present; nothing below changed.
    Duplicate,
    /// A fresh leaf now occupies the slot.
    Leaf,
    /// The key went below this node, on the side given by `cmp(key, node.key)`.
    Below(Ordering),
}

fn insert_node<K, C>(cmp: &C, link: Link<K>, key: K) -> (Box<Node<K>>, Inserted)
where
    C: Fn(&K, &K) -> Ordering,
{
    let Some(mut node) = link else {
        return (Node::leaf(key), Inserted::Leaf);
    };

    let side = cmp(&key, &node.key);
    let child = match side {
        Ordering::Less => {
            let (left, child) = insert_node(cmp, node.left.take(), key);
            node.left = Some(left);
            child
        }
        Ordering::Greater => {
            let (right, child) = insert_node(cmp, node.right.take(), key);
            node.right = Some(right);
            child
        }
        Ordering::Equal => return (node, Inserted::Duplicate),
    };
    if let Inserted::Duplicate = child {
        return (node, Inserted::Duplicate);
    }

    node.update_height();
    let balance = node.balance();

    // `child` carries the comparison of the new key against the heavy
    // child's key, made one frame down.
    let node = match child {
        Inserted::Below(Ordering::Less) if balance > 1 => rotate_right(node),
        Inserted::Below(Ordering::Greater) if balance < -1 => rotate_left(node),
        Inserted::Below(Ordering::Greater) if balance > 1 => {
            node.left = node.left.take().map(rotate_left);
            rotate_right(node)
        }
        Inserted::Below(Ordering::Less) if balance < -1 => {
            node.right = node.right.take().map(rotate_right);
            rotate_left(node)
        }
        _ => node,
    };
    (node, Inserted::Below(side))
}

// =============================================================================
// Deletion
// =============================================================================

/// Restore balance on the unwind of a deletion, looking at the heavy child's
/// own balance since there is no inserted key to compare against.
fn rebalance_after_delete<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let balance = node.balance();
    if balance > 1 {
        if balance_of(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if balance_of(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

/// Unlink the minimum of `node`'s subtree, rebalancing along the left spine.
/// Returns the remaining subtree and the detached key.
fn take_min<K>(mut node: Box<Node<K>>) -> (Link<K>, K) {
    match node.left.take() {
        None => {
            let Node { key, right, .. } = *node;
            (right, key)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            node.update_height();
            (Some(rebalance_after_delete(node)), min)
        }
    }
}

fn delete_node<K, C>(cmp: &C, link: Link<K>, key: &K) -> (Link<K>, Option<K>)
where
    C: Fn(&K, &K) -> Ordering,
{
    let Some(mut node) = link else {
        return (None, None);
    };

    let removed = match cmp(key, &node.key) {
        Ordering::Less => {
            let (left, removed) = delete_node(cmp, node.left.take(), key);
            node.left = left;
            removed
        }
        Ordering::Greater => {
            let (right, removed) = delete_node(cmp, node.right.take(), key);
            node.right = right;
            removed
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            (None, None) => {
                let Node { key, .. } = *node;
                return (None, Some(key));
            }
            (Some(child), None) | (None, Some(child)) => {
                let Node { key, .. } = *std::mem::replace(&mut node, child);
                Some(key)
            }
            (Some(left), Some(right)) => {
                // Successor key moves up into this node; the successor's
                // node is the one that leaves the tree.
                let (right, successor) = take_min(right);
                node.left = Some(left);
                node.right = right;
                Some(std::mem::replace(&mut node.key, successor))
            }
        },
    };

    node.update_height();
    (Some(rebalance_after_delete(node)), removed)
}

/// Leftmost node of the subtree rooted at `node`.
fn min_value_node<K>(node: &Node<K>) -> &Node<K> {
    let mut current = node;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    current
}

fn max_value_node<K>(node: &Node<K>) -> &Node<K> {
    let mut current = node;
    while let Some(right) = current.right.as_deref() {
        current = right;
    }
    current
}

fn collect_in_order<'a, K>(link: &'a Link<K>, out: &mut Vec<&'a K>) {
    if let Some(node) = link {
        collect_in_order(&node.left, out);
        out.push(&node.key);
        collect_in_order(&node.right, out);
    }
}

fn drain_in_order<K>(link: Link<K>, out: &mut Vec<K>) {
    if let Some(node) = link {
        let Node {
            key, left, right, ..
        } = *node;
        drain_in_order(left, out);
        out.push(key);
        drain_in_order(right, out);
    }
}

// =============================================================================
// Public tree
// =============================================================================

/// A self-balancing binary search tree ordered by a caller-supplied
/// comparator.
///
/// The comparator must be a strict total order over the keys that will be
/// stored; if it is not, lookups and the tree shape are unspecified (but
/// memory-safe).
///
/// Keys compared `Equal` are considered the same key: a second insert of an
/// equal key is ignored and the original stays in place.
#[derive(Clone)]
pub struct AvlTree<K, C> {
    root: Link<K>,
    len: usize,
    cmp: C,
}

impl<K: Ord> AvlTree<K, NaturalOrder<K>> {
    /// Tree ordered by `K`'s own `Ord` implementation.
    pub fn natural() -> Self {
        Self::new(<K as Ord>::cmp)
    }
}

impl<K: Ord> Default for AvlTree<K, NaturalOrder<K>> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<K, C> AvlTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Create an empty tree ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        Self {
            root: None,
            len: 0,
            cmp,
        }
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the whole tree; 0 when empty.
    #[inline]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Insert `key` unless an equal key is already stored.
    ///
    /// Returns `true` if the key was added. A duplicate leaves the tree
    /// untouched and `key` is dropped.
    pub fn insert(&mut self, key: K) -> bool {
        let (root, outcome) = insert_node(&self.cmp, self.root.take(), key);
        self.root = Some(root);
        let added = !matches!(outcome, Inserted::Duplicate);
        if added {
            self.len += 1;
        }
        added
    }

    /// Remove the key equal to `key`, returning the stored key if there was
    /// one.
    pub fn delete(&mut self, key: &K) -> Option<K> {
        let (root, removed) = delete_node(&self.cmp, self.root.take(), key);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Stored key equal to `key`, in O(log n).
    pub fn find(&self, key: &K) -> Option<&K> {
        self.find_by(|stored| (self.cmp)(key, stored))
    }

    /// Descend using `locate`, which reports how the sought key orders
    /// relative to a stored key (`Less` goes left).
    ///
    /// `locate` must agree with the tree's comparator.
    pub fn find_by<F>(&self, locate: F) -> Option<&K>
    where
        F: Fn(&K) -> Ordering,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match locate(&node.key) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.key),
            };
        }
        None
    }

    /// Whether a key equal to `key` is stored.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Smallest key.
    pub fn min(&self) -> Option<&K> {
        self.root.as_deref().map(|n| &min_value_node(n).key)
    }

    /// Largest key.
    pub fn max(&self) -> Option<&K> {
        self.root.as_deref().map(|n| &max_value_node(n).key)
    }

    /// Every key in ascending comparator order.
    pub fn traverse_ascending(&self) -> Vec<&K> {
        let mut out = Vec::with_capacity(self.len);
        collect_in_order(&self.root, &mut out);
        out
    }

    /// Consume the tree, yielding its keys in ascending order.
    pub fn into_sorted_vec(self) -> Vec<K> {
        let mut out = Vec::with_capacity(self.len);
        drain_in_order(self.root, &mut out);
        out
    }

    /// Insert every key in sequence order through [`insert`](Self::insert).
    ///
    /// Returns how many keys were new.
    pub fn bulk_load<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        let mut inserted = 0;
        for key in keys {
            inserted += usize::from(self.insert(key));
        }
        tracing::trace!(inserted, total = self.len, "avl bulk load");
        inserted
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }
}

impl<K, C> Extend<K> for AvlTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for AvlTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = Vec::with_capacity(self.len);
        collect_in_order(&self.root, &mut keys);
        f.debug_set().entries(keys).finish()
    }
}

#[cfg(test)]
impl<K, C> AvlTree<K, C>
where
    C: Fn(&K, &K) -> Ordering,
{
    /// Check heights, balance, ordering and the cached length.
    pub(crate) fn validate(&self) {
        fn walk<K, C: Fn(&K, &K) -> Ordering>(
            cmp: &C,
            link: &Link<K>,
            lower: Option<&K>,
            upper: Option<&K>,
        ) -> (u32, usize) {
            let Some(node) = link else {
                return (0, 0);
            };
            if let Some(lower) = lower {
                assert_eq!(cmp(lower, &node.key), Ordering::Less, "key below lower bound");
            }
            if let Some(upper) = upper {
                assert_eq!(cmp(&node.key, upper), Ordering::Less, "key above upper bound");
            }
            let (lh, lc) = walk(cmp, &node.left, lower, Some(&node.key));
            let (rh, rc) = walk(cmp, &node.right, Some(&node.key), upper);
            assert_eq!(node.height, 1 + lh.max(rh), "stale cached height");
            assert!(
                (i64::from(lh) - i64::from(rh)).abs() <= 1,
                "balance factor out of range: {lh} vs {rh}"
            );
            (node.height, lc + rc + 1)
        }

        let (_, count) = walk(&self.cmp, &self.root, None, None);
        assert_eq!(count, self.len, "cached len must match reachable nodes");
    }
}
