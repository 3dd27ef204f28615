//! Immutable map handle.

use std::fmt;
use std::hash::Hash;
use std::ops;
use std::sync::Arc;

use crate::bitmap::Shift;
use crate::builder::PersistentHashMapBuilder;
use crate::comparer::{Comparers, DefaultComparer, KeyComparer, ValueComparer};
use crate::error::{MapError, Result};
use crate::iter::{self, Iter, Keys, Values};
use crate::node::NodeRef;
use crate::ops::get::get_recursive;

/// Persistent hash map based on a HAMT.
///
/// Every write returns a new map and leaves the receiver untouched; the
/// two share every subtree the write did not pass through. Cloning is O(1).
/// Use [`to_builder`](Self::to_builder) to batch many writes.
pub struct PersistentHashMap<K, V> {
    root: Option<NodeRef<K, V>>,
    count: usize,
    comparers: Comparers<K, V>,
}

// ---------------------------------------------------------------------------
// Construction & accessors (no trait bounds)
// ---------------------------------------------------------------------------

impl<K, V> PersistentHashMap<K, V> {
    /// Creates an empty map using `comparers`.
    #[must_use]
    pub const fn with_comparers(comparers: Comparers<K, V>) -> Self {
        Self::from_parts(None, 0, comparers)
    }

    /// Wraps a frozen root.
    pub(crate) const fn from_parts(
        root: Option<NodeRef<K, V>>,
        count: usize,
        comparers: Comparers<K, V>,
    ) -> Self {
        Self {
            root,
            count,
            comparers,
        }
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<&NodeRef<K, V>> {
        self.root.as_ref()
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The comparers in use.
    #[must_use]
    pub const fn comparers(&self) -> &Comparers<K, V> {
        &self.comparers
    }

    /// Returns a builder seeded with this map's entries.
    #[must_use]
    pub fn to_builder(&self) -> PersistentHashMapBuilder<K, V> {
        PersistentHashMapBuilder::from_parts(self.root.clone(), self.count, self.comparers.clone())
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

impl<K: Hash + Eq, V: PartialEq> PersistentHashMap<K, V> {
    /// Creates an empty map with natural comparers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparers(Comparers::natural())
    }

    /// Returns an empty map with natural comparers.
    ///
    /// Custom comparers of the receiver are not carried over; use
    /// [`with_comparers`](Self::with_comparers) to keep them.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K, V> PersistentHashMap<K, V> {
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
    ///
    /// With a comparer that equates distinct keys (case-insensitive
    /// strings, say) this recovers the spelling that was inserted.
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

// ---------------------------------------------------------------------------
// Write operations (K: Clone, V: Clone)
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> PersistentHashMap<K, V> {
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

    /// Returns a map with `key` added.
    ///
    /// Adding a key that is already present with an equal value returns an
    /// equivalent map.
    ///
    /// # Errors
    ///
    /// [`MapError::DuplicateKey`] if the key is present with a different value.
    pub fn add(&self, key: K, value: V) -> Result<Self> {
        let mut builder = self.to_builder();
        builder.add(key, value)?;
        Ok(builder.build())
    }

    /// Returns a map with `key` set to `value`, inserting or overwriting.
    #[must_use]
    pub fn set(&self, key: K, value: V) -> Self {
        let mut builder = self.to_builder();
        builder.set(key, value);
        builder.build()
    }

    /// Returns a map without `key`.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let mut builder = self.to_builder();
        builder.remove(key);
        builder.build()
    }

    /// Returns a map without `key` if its value equals `value`.
    #[must_use]
    pub fn remove_if(&self, key: &K, value: &V) -> Self {
        let mut builder = self.to_builder();
        builder.remove_if(key, value);
        builder.build()
    }

    /// Returns a map with every pair of `items` added.
    ///
    /// # Errors
    ///
    /// [`MapError::DuplicateKey`] on the first key present with a different
    /// value; no map is produced.
    pub fn add_range<I>(&self, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut builder = self.to_builder();
        for (key, value) in items {
            builder.add(key, value)?;
        }
        Ok(builder.build())
    }

    /// Returns a map with every pair of `items` set, later pairs winning.
    #[must_use]
    pub fn set_items<I>(&self, items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut builder = self.to_builder();
        builder.extend(items);
        builder.build()
    }

    /// Returns a map without any of `keys`.
    #[must_use]
    pub fn remove_range<'k, I>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = &'k K>,
        K: 'k,
    {
        let mut builder = self.to_builder();
        for key in keys {
            builder.remove(key);
        }
        builder.build()
    }
}

// ---------------------------------------------------------------------------
// Comparer replacement (K: Hash + Eq + Clone, V: PartialEq + Clone)
// ---------------------------------------------------------------------------

impl<K, V> PersistentHashMap<K, V>
where
    K: Hash + Eq + Clone,
    V: PartialEq + Clone,
{
    /// Returns a map using the given comparers; `None` selects the natural
    /// comparer of the element type.
    ///
    /// Swapping only the value comparer shares the trie. A different key
    /// comparer rehashes every entry into a new trie.
    ///
    /// # Errors
    ///
    /// [`MapError::DuplicateKey`] if two keys become equal under the new
    /// key comparer while their values differ under the new value comparer.
    pub fn replace_comparers(
        &self,
        key: Option<Arc<dyn KeyComparer<K>>>,
        value: Option<Arc<dyn ValueComparer<V>>>,
    ) -> Result<Self> {
        let key = key.unwrap_or_else(|| -> Arc<dyn KeyComparer<K>> { Arc::new(DefaultComparer) });
        let value =
            value.unwrap_or_else(|| -> Arc<dyn ValueComparer<V>> { Arc::new(DefaultComparer) });

        if self.comparers.same_key_comparer(&key) {
            if self.comparers.same_value_comparer(&value) {
                return Ok(self.clone());
            }
            let comparers = Comparers::new(key, value);
            return Ok(Self::from_parts(self.root.clone(), self.count, comparers));
        }

        log::debug!("key comparer replaced, rehashing {} entries", self.count);
        let mut builder = PersistentHashMapBuilder::with_comparers(Comparers::new(key, value));
        for (k, v) in self {
            builder.add(k.clone(), v.clone())?;
        }
        Ok(builder.build())
    }
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V: PartialEq> Default for PersistentHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for PersistentHashMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            count: self.count,
            comparers: self.comparers.clone(),
        }
    }
}

impl<K, V> fmt::Debug for PersistentHashMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentHashMap")
            .field("len", &self.count)
            .field("comparers", &self.comparers)
            .finish_non_exhaustive()
    }
}

/// Content equality: same length and every pair of `other` is contained in
/// `self` under `self`'s comparers.
impl<K, V> PartialEq for PersistentHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.count != other.count {
            return false;
        }
        match (&self.root, &other.root) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => other.iter().all(|(k, v)| self.contains(k, v)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for PersistentHashMap<K, V>
where
    K: Hash + Eq + Clone,
    V: PartialEq + Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut builder = PersistentHashMapBuilder::new();
        builder.extend(iter);
        builder.build()
    }
}

impl<K, V> ops::Index<&K> for PersistentHashMap<K, V> {
    type Output = V;

    fn index(&self, key: &K) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
