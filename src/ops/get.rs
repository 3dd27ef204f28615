//! Lookup operation: traverses the trie to find a key.

use crate::bitmap::{HashCode, Shift};
use crate::comparer::Comparers;
use crate::node::Node;

/// Searches for `key` in the subtree rooted at `node`.
///
/// Returns the stored key and value if found. The stored key may differ
/// from `key` when the key comparer treats distinct keys as equal.
pub fn get_recursive<'a, K, V>(
    node: &'a Node<K, V>,
    hash: HashCode,
    key: &K,
    shift: Shift,
    comparers: &Comparers<K, V>,
) -> Option<(&'a K, &'a V)> {
    match node {
        Node::Index(index) => {
            // Unset bit → fail fast.
            let child = index.child(hash.bitmap_index(shift))?;
            get_recursive(child, hash, key, shift.next(), comparers)
        }
        Node::Single(leaf) => {
            if leaf.hash == hash && comparers.keys_equal(key, &leaf.key) {
                Some((&leaf.key, &leaf.value))
            } else {
                None
            }
        }
        Node::Collision(leaf) => {
            if leaf.hash != hash {
                return None;
            }
            // Linear search through collision pairs.
            leaf.pairs
                .iter()
                .find(|(k, _)| comparers.keys_equal(key, k))
                .map(|(k, v)| (k, v))
        }
    }
}
