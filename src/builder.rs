//! Transient builder over the persistent trie.

use std::fmt;
use std::hash::Hash;

use crate::behavior::CollisionBehavior;
use crate::bitmap::Shift;
use crate::comparer::Comparers;
use crate::error::{MapError, Result};
use crate::iter::{self, Iter, Keys, Values};
use crate::map::PersistentHashMap;
use crate::node::{self, NodeRef};
use crate::ops::get::get_recursive;
use crate::ops::insert::{self, SetArgs, SetOutcome, set_recursive};
use crate::ops::remove::{RemoveArgs, RemoveOutcome, remove_recursive};
use crate::pool::ArrayPool;

/// Mutable view over a persistent map.
///
/// Nodes the builder allocated since its last [`build`](Self::build) are
/// edited in place; nodes shared with a published map are copied on first
/// write. Each builder owns its [`ArrayPool`].
pub struct PersistentHashMapBuilder<K, V> {
    root: Option<NodeRef<K, V>>,
    count: usize,
    comparers: Comparers<K, V>,
    pool: ArrayPool<NodeRef<K, V>>,
}

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V> PersistentHashMapBuilder<K, V> {
    /// Creates an empty builder using `comparers`.
    #[must_use]
    pub fn with_comparers(comparers: Comparers<K, V>) -> Self {
        Self::from_parts(None, 0, comparers)
    }

    pub(crate) fn from_parts(
        root: Option<NodeRef<K, V>>,
        count: usize,
        comparers: Comparers<K, V>,
    ) -> Self {
        Self {
            root,
            count,
            comparers,
            pool: ArrayPool::default(),
        }
    }

    /// Replaces the array pool by one retaining `limit` arrays per length.
    #[must_use]
    pub fn with_pool_limit(mut self, limit: usize) -> Self {
        self.pool = ArrayPool::new(limit);
        self
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the builder holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The comparers in use.
    #[must_use]
    pub const fn comparers(&self) -> &Comparers<K, V> {
        &self.comparers
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.count = 0;
    }

    /// Freezes the current trie and returns a map sharing it.
    ///
    /// The builder keeps its reference; later writes copy the frozen nodes
    /// they touch, so the returned map never observes them.
    pub fn build(&mut self) -> PersistentHashMap<K, V> {
        if let Some(root) = self.root.as_mut() {
            if !root.is_frozen() {
                log::trace!("freezing builder trie with {} entries", self.count);
            }
            node::freeze(root);
        }
        PersistentHashMap::from_parts(self.root.clone(), self.count, self.comparers.clone())
    }

    /// Returns an iterator over `(&K, &V)` pairs.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.count)
    }

    /// Returns an iterator over the keys.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }
}

impl<K: Hash + Eq, V: PartialEq> PersistentHashMapBuilder<K, V> {
    /// Creates an empty builder with natural comparers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparers(Comparers::natural())
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K, V> PersistentHashMapBuilder<K, V> {
    fn entry(&self, key: &K) -> Option<(&K, &V)> {
        let root = self.root.as_deref()?;
        get_recursive(root, self.comparers.hash(key), key, Shift::ZERO, &self.comparers)
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entry(key).map(|(_, v)| v)
    }

    /// Returns the value stored for `key`.
    ///
    /// # Errors
    ///
    /// [`MapError::NotFound`] if the key is absent.
    pub fn lookup(&self, key: &K) -> Result<&V> {
        self.get(key).ok_or(MapError::NotFound)
    }

    /// Returns the stored key equal to `key` under the key comparer.
    #[must_use]
    pub fn get_key(&self, key: &K) -> Option<&K> {
        self.entry(key).map(|(k, _)| k)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entry(key).is_some()
    }

    /// Returns `true` if `key` is present with a value equal to `value`.
    #[must_use]
    pub fn contains(&self, key: &K, value: &V) -> bool {
        self.get(key)
            .is_some_and(|stored| self.comparers.values_equal(value, stored))
    }
}

impl<K: Clone, V: Clone> PersistentHashMapBuilder<K, V> {
    /// Clones every entry into `dest` starting at `index`.
    ///
    /// Returns the number of entries written.
    ///
    /// # Errors
    ///
    /// [`MapError::InsufficientCapacity`] if fewer than `len()` slots follow
    /// `index`; `dest` is left untouched.
    pub fn copy_to(&self, dest: &mut [(K, V)], index: usize) -> Result<usize> {
        iter::copy_into(self.iter(), dest, index)
    }
}

// ---------------------------------------------------------------------------
// Write operations (K: Clone, V: Clone)
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> PersistentHashMapBuilder<K, V> {
    /// Stores `value` under `key`, resolving an existing key by `behavior`.
    ///
    /// Returns `true` if the key was new.
    ///
    /// # Errors
    ///
    /// [`MapError::DuplicateKey`] when `behavior` rejects the existing key.
    /// The builder is unchanged on error.
    pub fn set_with(&mut self, key: K, value: V, behavior: CollisionBehavior) -> Result<bool> {
        let hash = self.comparers.hash(&key);
        let Some(root) = self.root.as_mut() else {
            self.root = Some(insert::new_root(hash, key, value, &mut self.pool));
            self.count = 1;
            return Ok(true);
        };

        let args = SetArgs {
            key,
            value,
            comparers: &self.comparers,
            behavior,
        };
        let outcome = set_recursive(root, hash, Shift::ZERO, args, &mut self.pool)?;
        if outcome == SetOutcome::Inserted {
            self.count += 1;
        }
        Ok(outcome == SetOutcome::Inserted)
    }

    /// Inserts or overwrites `key`. Returns `true` if the key was new.
    pub fn set(&mut self, key: K, value: V) -> bool {
        // SetValue never rejects a key.
        self.set_with(key, value, CollisionBehavior::SetValue)
            .unwrap_or(false)
    }

    /// Inserts `key`, accepting an existing key only with an equal value.
    ///
    /// # Errors
    ///
    /// [`MapError::DuplicateKey`] if the key is present with a different value.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        self.set_with(key, value, CollisionBehavior::ThrowIfValueDifferent)
            .map(drop)
    }

    /// Inserts `key` unless it is present. Returns `true` if inserted.
    pub fn try_add(&mut self, key: K, value: V) -> bool {
        self.set_with(key, value, CollisionBehavior::Skip)
            .unwrap_or(false)
    }

    /// Removes `key`. Returns `true` if it was present.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key, None)
    }

    /// Removes `key` only if its value equals `value`.
    pub fn remove_if(&mut self, key: &K, value: &V) -> bool {
        self.remove_entry(key, Some(value))
    }

    fn remove_entry(&mut self, key: &K, expected: Option<&V>) -> bool {
        let Some(root) = self.root.as_mut() else {
            return false;
        };
        let hash = self.comparers.hash(key);
        let args = RemoveArgs {
            key,
            expected,
            comparers: &self.comparers,
        };
        let outcome = remove_recursive(root, hash, Shift::ZERO, &args, &mut self.pool);
        if outcome == RemoveOutcome::Emptied {
            self.root = None;
        }
        if outcome.removed() {
            self.count -= 1;
        }
        outcome.removed()
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V: PartialEq> Default for PersistentHashMapBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for PersistentHashMapBuilder<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentHashMapBuilder")
            .field("len", &self.count)
            .field("comparers", &self.comparers)
            .finish_non_exhaustive()
    }
}

impl<K: Clone, V: Clone> Extend<(K, V)> for PersistentHashMapBuilder<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMapBuilder<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
