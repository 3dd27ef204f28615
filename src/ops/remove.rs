//! Removal operation: in-place or path-copy delete, optionally conditional.

use std::sync::Arc;

use crate::array;
use crate::bitmap::{HashCode, Shift};
use crate::comparer::Comparers;
use crate::node::{self, CollisionNode, IndexNode, Node, NodeRef, SingleValueNode};
use crate::pool::ArrayPool;

/// Key to remove plus an optional value it must match.
pub struct RemoveArgs<'a, K, V> {
    /// Key to remove.
    pub key: &'a K,
    /// When set, the entry is removed only if its value is equal.
    pub expected: Option<&'a V>,
    /// Comparers of the owning map.
    pub comparers: &'a Comparers<K, V>,
}

/// Outcome of a recursive remove.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Key absent or value mismatch; tree unchanged.
    NotFound,
    /// Entry removed; the slot holds the shrunken subtree.
    Removed,
    /// Entry removed and the subtree is now empty; the parent must detach it.
    Emptied,
}

impl RemoveOutcome {
    /// Returns `true` if an entry was removed (count delta -1).
    #[must_use]
    pub const fn removed(self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Replacement node for a frozen slot (`None` keeps the slot as is).
type Rewrite<K, V> = (Option<Node<K, V>>, RemoveOutcome);

/// Removes `args.key` from the subtree held by `slot`.
pub fn remove_recursive<K, V>(
    slot: &mut NodeRef<K, V>,
    hash: HashCode,
    shift: Shift,
    args: &RemoveArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> RemoveOutcome
where
    K: Clone,
    V: Clone,
{
    if let Some(node) = node::editable(slot) {
        return match node {
            Node::Index(index) => remove_index_in_place(index, hash, shift, args, pool),
            Node::Single(leaf) => single_outcome(leaf, hash, args),
            Node::Collision(leaf) => remove_pair_in_place(leaf, hash, args),
        };
    }

    let (replacement, outcome) = match &**slot {
        Node::Index(index) => copy_index(index, hash, shift, args, pool),
        Node::Single(leaf) => (None, single_outcome(leaf, hash, args)),
        Node::Collision(leaf) => copy_collision(leaf, hash, args),
    };
    if let Some(node) = replacement {
        *slot = Arc::new(node);
    }
    outcome
}

fn value_matches<K, V>(args: &RemoveArgs<'_, K, V>, stored: &V) -> bool {
    args.expected
        .is_none_or(|expected| args.comparers.values_equal(expected, stored))
}

/// A matching single leaf empties its slot; nothing else changes.
fn single_outcome<K, V>(
    leaf: &SingleValueNode<K, V>,
    hash: HashCode,
    args: &RemoveArgs<'_, K, V>,
) -> RemoveOutcome {
    if leaf.hash == hash
        && args.comparers.keys_equal(args.key, &leaf.key)
        && value_matches(args, &leaf.value)
    {
        RemoveOutcome::Emptied
    } else {
        RemoveOutcome::NotFound
    }
}

/// Position of the matching pair in a collision node.
fn locate<K, V>(leaf: &CollisionNode<K, V>, hash: HashCode, args: &RemoveArgs<'_, K, V>) -> Option<usize> {
    if leaf.hash != hash {
        return None;
    }
    let at = leaf
        .pairs
        .iter()
        .position(|(k, _)| args.comparers.keys_equal(args.key, k))?;
    value_matches(args, &leaf.pairs[at].1).then_some(at)
}

// ---------------------------------------------------------------------------
// In-place edits (unfrozen, exclusively owned)
// ---------------------------------------------------------------------------

fn remove_index_in_place<K, V>(
    index: &mut IndexNode<K, V>,
    hash: HashCode,
    shift: Shift,
    args: &RemoveArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> RemoveOutcome
where
    K: Clone,
    V: Clone,
{
    let bitmap_index = hash.bitmap_index(shift);
    if !index.bitmap.has(bitmap_index) {
        return RemoveOutcome::NotFound;
    }
    let pos = index.bitmap.position(bitmap_index);
    let outcome = remove_recursive(&mut index.children[pos.0], hash, shift.next(), args, pool);
    if outcome != RemoveOutcome::Emptied {
        // NotFound, or the child already rewrote its own slot.
        return outcome;
    }

    let bitmap = index.bitmap.without(bitmap_index);
    if bitmap.is_empty() {
        // This branch is detached by the parent; recycle its array.
        pool.give_back(std::mem::take(&mut index.children));
        return RemoveOutcome::Emptied;
    }
    drop(array::remove_in_place(pool, &mut index.children, pos.0));
    index.bitmap = bitmap;
    RemoveOutcome::Removed
}

/// Removes one pair; a collision node left with one pair is kept as is.
fn remove_pair_in_place<K, V>(
    leaf: &mut CollisionNode<K, V>,
    hash: HashCode,
    args: &RemoveArgs<'_, K, V>,
) -> RemoveOutcome {
    let Some(at) = locate(leaf, hash, args) else {
        return RemoveOutcome::NotFound;
    };
    if leaf.pairs.len() == 1 {
        return RemoveOutcome::Emptied;
    }
    leaf.pairs.remove(at);
    RemoveOutcome::Removed
}

// ---------------------------------------------------------------------------
// Copy-on-write (frozen or shared)
// ---------------------------------------------------------------------------

fn copy_index<K, V>(
    index: &IndexNode<K, V>,
    hash: HashCode,
    shift: Shift,
    args: &RemoveArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> Rewrite<K, V>
where
    K: Clone,
    V: Clone,
{
    let bitmap_index = hash.bitmap_index(shift);
    if !index.bitmap.has(bitmap_index) {
        return (None, RemoveOutcome::NotFound);
    }
    let pos = index.bitmap.position(bitmap_index);
    let mut child = Arc::clone(&index.children[pos.0]);

    let replacement = match remove_recursive(&mut child, hash, shift.next(), args, pool) {
        RemoveOutcome::NotFound => return (None, RemoveOutcome::NotFound),
        RemoveOutcome::Emptied => {
            let bitmap = index.bitmap.without(bitmap_index);
            if bitmap.is_empty() {
                return (None, RemoveOutcome::Emptied);
            }
            let children = array::copied_remove(&index.children, pos.0, pool.rent(index.len() - 1));
            IndexNode::new(bitmap, children)
        }
        RemoveOutcome::Removed => {
            let children =
                array::copied_update(&index.children, pos.0, child, pool.rent(index.len()));
            IndexNode::new(index.bitmap, children)
        }
    };
    (Some(Node::Index(replacement)), RemoveOutcome::Removed)
}

fn copy_collision<K, V>(
    leaf: &CollisionNode<K, V>,
    hash: HashCode,
    args: &RemoveArgs<'_, K, V>,
) -> Rewrite<K, V>
where
    K: Clone,
    V: Clone,
{
    let Some(at) = locate(leaf, hash, args) else {
        return (None, RemoveOutcome::NotFound);
    };
    if leaf.pairs.len() == 1 {
        return (None, RemoveOutcome::Emptied);
    }
    let out = Vec::with_capacity(leaf.pairs.len() - 1);
    let pairs = array::copied_remove(&leaf.pairs, at, out);
    (Some(Node::Collision(CollisionNode::new(hash, pairs))), RemoveOutcome::Removed)
}
