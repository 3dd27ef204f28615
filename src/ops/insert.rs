//! Set operation: in-place edit of owned nodes, path copy of frozen ones.

use std::sync::Arc;

use crate::array;
use crate::behavior::CollisionBehavior;
use crate::bitmap::{Bitmap, HashCode, Shift};
use crate::comparer::Comparers;
use crate::error::{MapError, Result};
use crate::node::{self, CollisionNode, IndexNode, Node, NodeRef, SingleValueNode};
use crate::pool::ArrayPool;

/// Entry to store plus the policy for an existing key.
pub struct SetArgs<'c, K, V> {
    /// Key to store.
    pub key: K,
    /// Value to store.
    pub value: V,
    /// Comparers of the owning map.
    pub comparers: &'c Comparers<K, V>,
    /// Policy applied when the key already exists.
    pub behavior: CollisionBehavior,
}

/// Outcome of a recursive set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetOutcome {
    /// Subtree untouched; the slot still holds the same node.
    Unchanged,
    /// An existing entry was overwritten.
    Updated,
    /// A new key was inserted (count delta +1).
    Inserted,
}

/// Replacement node for a frozen slot (`None` keeps the slot as is).
type Rewrite<K, V> = (Option<Node<K, V>>, SetOutcome);

enum Resolution {
    Keep,
    Overwrite,
}

/// Sets an entry in the subtree held by `slot`.
///
/// The node in the slot is edited in place when it is unfrozen and
/// exclusively owned; otherwise the slot receives a fresh copy. A policy
/// failure is reported before any node is touched.
pub fn set_recursive<K, V>(
    slot: &mut NodeRef<K, V>,
    hash: HashCode,
    shift: Shift,
    args: SetArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> Result<SetOutcome>
where
    K: Clone,
    V: Clone,
{
    // Leaves that turn into a larger structure, whoever owns them.
    match &**slot {
        Node::Single(leaf) if leaf.hash != hash => {
            let existing_hash = leaf.hash;
            return Ok(grow(slot, existing_hash, hash, shift, args, pool));
        }
        Node::Collision(leaf) if leaf.hash != hash => {
            let existing_hash = leaf.hash;
            return Ok(grow(slot, existing_hash, hash, shift, args, pool));
        }
        Node::Single(leaf) if !args.comparers.keys_equal(&args.key, &leaf.key) => {
            // Same hash, different key → promote to a collision node.
            let pairs = vec![
                (leaf.key.clone(), leaf.value.clone()),
                (args.key, args.value),
            ];
            *slot = Arc::new(Node::Collision(CollisionNode::new(hash, pairs)));
            return Ok(SetOutcome::Inserted);
        }
        _ => {}
    }

    if let Some(node) = node::editable(slot) {
        return match node {
            Node::Index(index) => set_index_in_place(index, hash, shift, args, pool),
            Node::Single(leaf) => set_single_in_place(leaf, args),
            Node::Collision(leaf) => set_collision_in_place(leaf, args),
        };
    }

    let (replacement, outcome) = match &**slot {
        Node::Index(index) => copy_index(index, hash, shift, args, pool)?,
        Node::Single(leaf) => copy_single(leaf, args)?,
        Node::Collision(leaf) => copy_collision(leaf, args)?,
    };
    if let Some(node) = replacement {
        *slot = Arc::new(node);
    }
    Ok(outcome)
}

/// Creates a root branch holding a single entry.
pub fn new_root<K, V>(
    hash: HashCode,
    key: K,
    value: V,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> NodeRef<K, V> {
    let mut children = pool.rent(1);
    children.push(single(hash, key, value));
    let bitmap = Bitmap::from_index(hash.bitmap_index(Shift::ZERO));
    Arc::new(Node::Index(IndexNode::new(bitmap, children)))
}

// ---------------------------------------------------------------------------
// In-place edits (unfrozen, exclusively owned)
// ---------------------------------------------------------------------------

fn set_index_in_place<K, V>(
    index: &mut IndexNode<K, V>,
    hash: HashCode,
    shift: Shift,
    args: SetArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> Result<SetOutcome>
where
    K: Clone,
    V: Clone,
{
    let bitmap_index = hash.bitmap_index(shift);
    let pos = index.bitmap.position(bitmap_index);

    if index.bitmap.has(bitmap_index) {
        // The child rewrites its own slot.
        return set_recursive(&mut index.children[pos.0], hash, shift.next(), args, pool);
    }

    let leaf = single(hash, args.key, args.value);
    array::insert_in_place(pool, &mut index.children, pos.0, leaf);
    index.bitmap = index.bitmap.with(bitmap_index);
    Ok(SetOutcome::Inserted)
}

fn set_single_in_place<K, V>(
    leaf: &mut SingleValueNode<K, V>,
    args: SetArgs<'_, K, V>,
) -> Result<SetOutcome> {
    let comparers = args.comparers;
    match resolve(args.behavior, || comparers.values_equal(&args.value, &leaf.value))? {
        Resolution::Keep => Ok(SetOutcome::Unchanged),
        Resolution::Overwrite => {
            leaf.key = args.key;
            leaf.value = args.value;
            Ok(SetOutcome::Updated)
        }
    }
}

fn set_collision_in_place<K, V>(
    leaf: &mut CollisionNode<K, V>,
    args: SetArgs<'_, K, V>,
) -> Result<SetOutcome> {
    let comparers = args.comparers;
    let Some(at) = leaf
        .pairs
        .iter()
        .position(|(k, _)| comparers.keys_equal(&args.key, k))
    else {
        leaf.pairs.push((args.key, args.value));
        return Ok(SetOutcome::Inserted);
    };

    let stored = &leaf.pairs[at].1;
    match resolve(args.behavior, || comparers.values_equal(&args.value, stored))? {
        Resolution::Keep => Ok(SetOutcome::Unchanged),
        Resolution::Overwrite => {
            leaf.pairs[at] = (args.key, args.value);
            Ok(SetOutcome::Updated)
        }
    }
}

// ---------------------------------------------------------------------------
// Copy-on-write (frozen or shared)
// ---------------------------------------------------------------------------

fn copy_index<K, V>(
    index: &IndexNode<K, V>,
    hash: HashCode,
    shift: Shift,
    args: SetArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> Result<Rewrite<K, V>>
where
    K: Clone,
    V: Clone,
{
    let bitmap_index = hash.bitmap_index(shift);
    let pos = index.bitmap.position(bitmap_index);

    if index.bitmap.has(bitmap_index) {
        let mut child = Arc::clone(&index.children[pos.0]);
        let outcome = set_recursive(&mut child, hash, shift.next(), args, pool)?;
        if outcome == SetOutcome::Unchanged {
            return Ok((None, outcome));
        }
        let children = array::copied_update(&index.children, pos.0, child, pool.rent(index.len()));
        return Ok((Some(Node::Index(IndexNode::new(index.bitmap, children))), outcome));
    }

    let leaf = single(hash, args.key, args.value);
    let children = array::copied_insert(&index.children, pos.0, leaf, pool.rent(index.len() + 1));
    let bitmap = index.bitmap.with(bitmap_index);
    Ok((Some(Node::Index(IndexNode::new(bitmap, children))), SetOutcome::Inserted))
}

fn copy_single<K, V>(leaf: &SingleValueNode<K, V>, args: SetArgs<'_, K, V>) -> Result<Rewrite<K, V>> {
    let comparers = args.comparers;
    match resolve(args.behavior, || comparers.values_equal(&args.value, &leaf.value))? {
        Resolution::Keep => Ok((None, SetOutcome::Unchanged)),
        Resolution::Overwrite => {
            let node = SingleValueNode::new(leaf.hash, args.key, args.value);
            Ok((Some(Node::Single(node)), SetOutcome::Updated))
        }
    }
}

fn copy_collision<K, V>(leaf: &CollisionNode<K, V>, args: SetArgs<'_, K, V>) -> Result<Rewrite<K, V>>
where
    K: Clone,
    V: Clone,
{
    let comparers = args.comparers;
    let Some(at) = leaf
        .pairs
        .iter()
        .position(|(k, _)| comparers.keys_equal(&args.key, k))
    else {
        let out = Vec::with_capacity(leaf.pairs.len() + 1);
        let pairs = array::copied_push(&leaf.pairs, (args.key, args.value), out);
        let node = CollisionNode::new(leaf.hash, pairs);
        return Ok((Some(Node::Collision(node)), SetOutcome::Inserted));
    };

    let stored = &leaf.pairs[at].1;
    match resolve(args.behavior, || comparers.values_equal(&args.value, stored))? {
        Resolution::Keep => Ok((None, SetOutcome::Unchanged)),
        Resolution::Overwrite => {
            let out = Vec::with_capacity(leaf.pairs.len());
            let pairs = array::copied_update(&leaf.pairs, at, (args.key, args.value), out);
            let node = CollisionNode::new(leaf.hash, pairs);
            Ok((Some(Node::Collision(node)), SetOutcome::Updated))
        }
    }
}

/// Applies the collision policy to an existing key.
fn resolve(behavior: CollisionBehavior, values_equal: impl FnOnce() -> bool) -> Result<Resolution> {
    match behavior {
        CollisionBehavior::Skip => Ok(Resolution::Keep),
        CollisionBehavior::ThrowAlways => Err(MapError::DuplicateKey),
        CollisionBehavior::SetValue => {
            if values_equal() {
                Ok(Resolution::Keep)
            } else {
                Ok(Resolution::Overwrite)
            }
        }
        CollisionBehavior::ThrowIfValueDifferent => {
            if values_equal() {
                Ok(Resolution::Keep)
            } else {
                Err(MapError::DuplicateKey)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Subtree creation
// ---------------------------------------------------------------------------

/// Replaces the leaf in `slot` by a branch holding it and the new entry.
fn grow<K, V>(
    slot: &mut NodeRef<K, V>,
    existing_hash: HashCode,
    hash: HashCode,
    shift: Shift,
    args: SetArgs<'_, K, V>,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> SetOutcome {
    let existing = Arc::clone(slot);
    let added = single(hash, args.key, args.value);
    *slot = split(existing, existing_hash, added, hash, shift, pool);
    SetOutcome::Inserted
}

/// Builds the smallest subtree separating two leaves with different hashes.
///
/// Descends while both hashes select the same slot, wrapping each level in
/// a single-child branch. Two distinct 32-bit hashes differ in some 5-bit
/// fragment, so the descent stops by [`MAX_SHIFT`](crate::bitmap::MAX_SHIFT).
fn split<K, V>(
    existing: NodeRef<K, V>,
    existing_hash: HashCode,
    added: NodeRef<K, V>,
    added_hash: HashCode,
    shift: Shift,
    pool: &mut ArrayPool<NodeRef<K, V>>,
) -> NodeRef<K, V> {
    debug_assert_ne!(existing_hash, added_hash, "split requires distinct hashes");
    let left = existing_hash.bitmap_index(shift);
    let right = added_hash.bitmap_index(shift);

    if left == right && !shift.is_exhausted() {
        let child = split(existing, existing_hash, added, added_hash, shift.next(), pool);
        let mut children = pool.rent(1);
        children.push(child);
        return Arc::new(Node::Index(IndexNode::new(Bitmap::from_index(left), children)));
    }

    let mut children = pool.rent(2);
    if left < right {
        children.push(existing);
        children.push(added);
    } else {
        children.push(added);
        children.push(existing);
    }
    Arc::new(Node::Index(IndexNode::new(Bitmap::from_pair(left, right), children)))
}

fn single<K, V>(hash: HashCode, key: K, value: V) -> NodeRef<K, V> {
    Arc::new(Node::Single(SingleValueNode::new(hash, key, value)))
}
