//! HAMT node types and the freeze protocol.

use std::fmt;
use std::sync::Arc;

use crate::bitmap::{Bitmap, BitmapIndex, HashCode, NodeIndex};

/// Shared handle to a trie node.
pub type NodeRef<K, V> = Arc<Node<K, V>>;

/// HAMT trie node.
///
/// Every variant carries a `frozen` tag. A node that is not frozen was
/// allocated by one builder and is reachable only from it; such a node may
/// be edited in place. A frozen node may be shared by any number of maps
/// and builders and is never edited again.
pub enum Node<K, V> {
    /// Internal branch.
    Index(IndexNode<K, V>),
    /// Leaf with one entry.
    Single(SingleValueNode<K, V>),
    /// Leaf with entries sharing one full hash.
    Collision(CollisionNode<K, V>),
}

/// Internal branch: one child per set bitmap bit, ordered by slot.
///
/// Invariant: `children.len() == bitmap.len()` and never zero.
pub struct IndexNode<K, V> {
    pub(crate) bitmap: Bitmap,
    pub(crate) children: Vec<NodeRef<K, V>>,
    pub(crate) frozen: bool,
}

/// Terminal leaf holding exactly one entry.
pub struct SingleValueNode<K, V> {
    pub(crate) hash: HashCode,
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) frozen: bool,
}

/// Leaf for keys whose entire hash is equal.
///
/// Invariant: no two keys compare equal under the active key comparer.
pub struct CollisionNode<K, V> {
    pub(crate) hash: HashCode,
    pub(crate) pairs: Vec<(K, V)>,
    pub(crate) frozen: bool,
}

impl<K, V> IndexNode<K, V> {
    /// Creates a mutable branch.
    pub(crate) const fn new(bitmap: Bitmap, children: Vec<NodeRef<K, V>>) -> Self {
        Self { bitmap, children, frozen: false }
    }

    /// Returns the child occupying `index`, if any.
    pub(crate) fn child(&self, index: BitmapIndex) -> Option<&NodeRef<K, V>> {
        if self.bitmap.has(index) {
            self.children.get(self.bitmap.position(index).0)
        } else {
            None
        }
    }

    /// Returns the child at dense position `index`.
    pub(crate) fn child_at(&self, index: NodeIndex) -> Option<&NodeRef<K, V>> {
        self.children.get(index.0)
    }

    /// Number of children.
    pub(crate) fn len(&self) -> usize {
        self.children.len()
    }
}

impl<K, V> SingleValueNode<K, V> {
    /// Creates a mutable leaf.
    pub(crate) const fn new(hash: HashCode, key: K, value: V) -> Self {
        Self { hash, key, value, frozen: false }
    }
}

impl<K, V> CollisionNode<K, V> {
    /// Creates a mutable collision leaf.
    pub(crate) const fn new(hash: HashCode, pairs: Vec<(K, V)>) -> Self {
        Self { hash, pairs, frozen: false }
    }
}

impl<K, V> Node<K, V> {
    /// Returns `true` if the node has been published and must not change.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        match self {
            Self::Index(n) => n.frozen,
            Self::Single(n) => n.frozen,
            Self::Collision(n) => n.frozen,
        }
    }

    /// Marks this node and every non-frozen descendant as frozen.
    fn freeze_in_place(&mut self) {
        match self {
            Self::Index(n) => {
                for child in &mut n.children {
                    freeze(child);
                }
                n.frozen = true;
            }
            Self::Single(n) => n.frozen = true,
            Self::Collision(n) => n.frozen = true,
        }
    }
}

/// Returns mutable access to the node in `slot` if it may be edited in place.
///
/// Requires the node to be unfrozen and exclusively owned by the caller.
pub(crate) fn editable<K, V>(slot: &mut NodeRef<K, V>) -> Option<&mut Node<K, V>> {
    if slot.is_frozen() {
        return None;
    }
    Arc::get_mut(slot)
}

/// Freezes the subtree in `slot`.
///
/// Already-frozen subtrees are not visited. Depth is bounded by
/// [`MAX_DEPTH`](crate::bitmap::MAX_DEPTH).
pub(crate) fn freeze<K, V>(slot: &mut NodeRef<K, V>) {
    if let Some(node) = editable(slot) {
        node.freeze_in_place();
    }
}

// ---------------------------------------------------------------------------
// Manual trait impls, avoiding false `K: Debug, V: Debug` bounds.
// ---------------------------------------------------------------------------

impl<K, V> fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(n) => f
                .debug_struct("Index")
                .field("bitmap", &n.bitmap)
                .field("children", &n.children.len())
                .field("frozen", &n.frozen)
                .finish(),
            Self::Single(n) => f
                .debug_struct("Single")
                .field("hash", &n.hash)
                .field("frozen", &n.frozen)
                .finish_non_exhaustive(),
            Self::Collision(n) => f
                .debug_struct("Collision")
                .field("hash", &n.hash)
                .field("pairs", &n.pairs.len())
                .field("frozen", &n.frozen)
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(hash: u32, key: u32) -> NodeRef<u32, u32> {
        Arc::new(Node::Single(SingleValueNode::new(HashCode(hash), key, key)))
    }

    #[test]
    fn freeze_marks_whole_subtree() {
        let inner = Arc::new(Node::Index(IndexNode::new(
            Bitmap::from_index(BitmapIndex(1)),
            vec![leaf(33, 1)],
        )));
        let mut root = Arc::new(Node::Index(IndexNode::new(
            Bitmap::from_pair(BitmapIndex(0), BitmapIndex(1)),
            vec![leaf(0, 0), inner],
        )));
        freeze(&mut root);
        assert!(root.is_frozen());
        let Node::Index(index) = &*root else {
            panic!("root must be an index node");
        };
        for child in &index.children {
            assert!(child.is_frozen());
        }
        let Node::Index(inner) = &*index.children[1] else {
            panic!("second child must be an index node");
        };
        assert!(inner.children[0].is_frozen());
    }

    #[test]
    fn frozen_or_shared_nodes_are_not_editable() {
        let mut shared = leaf(7, 7);
        let other = Arc::clone(&shared);
        assert!(editable(&mut shared).is_none());
        drop(other);
        assert!(editable(&mut shared).is_some());

        freeze(&mut shared);
        assert!(editable(&mut shared).is_none());
    }
}
