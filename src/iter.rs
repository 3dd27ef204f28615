//! Iterator types for persistent maps and builders.
//!
//! Traversal is depth-first without recursion: a fixed stack of
//! `(branch, next child)` frames bounded by [`MAX_DEPTH`], plus a cursor
//! over the pairs of the collision node being drained. Order follows hash
//! bits and is otherwise unspecified.

use std::iter::FusedIterator;
use std::slice;

use arrayvec::ArrayVec;

use crate::bitmap::{MAX_DEPTH, NodeIndex};
use crate::error::{MapError, Result};
use crate::node::{IndexNode, Node};

struct Frame<'a, K, V> {
    node: &'a IndexNode<K, V>,
    next: usize,
}

/// Iterator over `(&K, &V)` pairs of a map or builder.
pub struct Iter<'a, K, V> {
    stack: ArrayVec<Frame<'a, K, V>, MAX_DEPTH>,
    pairs: slice::Iter<'a, (K, V)>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Creates an iterator over the trie rooted at `root` holding `len` entries.
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut stack = ArrayVec::new();
        match root {
            Some(Node::Index(node)) => stack.push(Frame { node, next: 0 }),
            Some(_) => log::error!("{}", MapError::InvalidState("root is not an index node")),
            None => {}
        }
        Self {
            stack,
            pairs: slice::Iter::default(),
            remaining: len,
        }
    }

    fn yielded(&mut self, key: &'a K, value: &'a V) -> Option<(&'a K, &'a V)> {
        self.remaining = self.remaining.saturating_sub(1);
        Some((key, value))
    }

    /// Stops the traversal after a structural fault.
    fn abort(&mut self, err: &MapError) {
        log::error!("iteration aborted: {err}");
        self.stack.clear();
        self.pairs = slice::Iter::default();
        self.remaining = 0;
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Drain the current collision node first.
            if let Some((k, v)) = self.pairs.next() {
                return self.yielded(k, v);
            }

            let frame = self.stack.last_mut()?;
            let parent: &'a IndexNode<K, V> = frame.node;
            let Some(child) = parent.child_at(NodeIndex(frame.next)) else {
                // Branch exhausted.
                self.stack.pop();
                continue;
            };
            frame.next += 1;

            match &**child {
                Node::Index(node) => {
                    if self.stack.try_push(Frame { node, next: 0 }).is_err() {
                        self.abort(&MapError::InvalidState("trie deeper than the hash width"));
                        return None;
                    }
                }
                Node::Single(leaf) => return self.yielded(&leaf.key, &leaf.value),
                Node::Collision(leaf) => self.pairs = leaf.pairs.iter(),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Clones every pair yielded by `iter` into `dest[index..]`.
///
/// Capacity is checked before the first write.
pub(crate) fn copy_into<K: Clone, V: Clone>(
    iter: Iter<'_, K, V>,
    dest: &mut [(K, V)],
    index: usize,
) -> Result<usize> {
    let required = iter.len();
    let available = dest.len().saturating_sub(index);
    if available < required {
        return Err(MapError::InsufficientCapacity { required, available });
    }
    if let Some(tail) = dest.get_mut(index..) {
        for (slot, (k, v)) in tail.iter_mut().zip(iter) {
            *slot = (k.clone(), v.clone());
        }
    }
    Ok(required)
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over the keys of a map or builder.
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// Iterator over the values of a map or builder.
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
