//! Key and value comparers.
//!
//! Bucket placement depends on the key comparer's hash, so a map whose key
//! comparer changes must be rebuilt. The value comparer only decides
//! equality of stored values and can be swapped freely.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::bitmap::HashCode;

/// Equality and hashing for keys.
pub trait KeyComparer<K: ?Sized>: Send + Sync {
    /// Returns the 32-bit hash code of `key`.
    fn hash_key(&self, key: &K) -> u32;

    /// Returns `true` if both keys denote the same entry.
    fn keys_equal(&self, a: &K, b: &K) -> bool;

    /// Returns `true` for the natural comparer of the key type.
    fn is_natural(&self) -> bool {
        false
    }
}

/// Equality for values.
pub trait ValueComparer<V: ?Sized>: Send + Sync {
    /// Returns `true` if both values are equal.
    fn values_equal(&self, a: &V, b: &V) -> bool;

    /// Returns `true` for the natural comparer of the value type.
    fn is_natural(&self) -> bool {
        false
    }
}

/// Computes the 32-bit hash of a value using the standard hasher.
///
/// The 64-bit digest is folded so both halves contribute.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn hash_one<T: Hash + ?Sized>(value: &T) -> u32 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    let digest = hasher.finish();
    (digest ^ (digest >> 32)) as u32
}

/// Natural comparer: [`Hash`] + [`Eq`] for keys, [`PartialEq`] for values.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultComparer;

impl<K: Hash + Eq + ?Sized> KeyComparer<K> for DefaultComparer {
    fn hash_key(&self, key: &K) -> u32 {
        hash_one(key)
    }

    fn keys_equal(&self, a: &K, b: &K) -> bool {
        a == b
    }

    fn is_natural(&self) -> bool {
        true
    }
}

impl<V: PartialEq + ?Sized> ValueComparer<V> for DefaultComparer {
    fn values_equal(&self, a: &V, b: &V) -> bool {
        a == b
    }

    fn is_natural(&self) -> bool {
        true
    }
}

/// Key comparer built from an equality closure and a hash closure.
pub struct FnKeyComparer<E, H> {
    eq: E,
    hash: H,
}

impl<E, H> FnKeyComparer<E, H> {
    /// Wraps `eq` and `hash`; keys equal under `eq` must hash alike.
    #[must_use]
    pub const fn new(eq: E, hash: H) -> Self {
        Self { eq, hash }
    }
}

impl<K: ?Sized, E, H> KeyComparer<K> for FnKeyComparer<E, H>
where
    E: Fn(&K, &K) -> bool + Send + Sync,
    H: Fn(&K) -> u32 + Send + Sync,
{
    fn hash_key(&self, key: &K) -> u32 {
        (self.hash)(key)
    }

    fn keys_equal(&self, a: &K, b: &K) -> bool {
        (self.eq)(a, b)
    }
}

/// Value comparer built from an equality closure.
pub struct FnValueComparer<E> {
    eq: E,
}

impl<E> FnValueComparer<E> {
    /// Wraps `eq`.
    #[must_use]
    pub const fn new(eq: E) -> Self {
        Self { eq }
    }
}

impl<V: ?Sized, E> ValueComparer<V> for FnValueComparer<E>
where
    E: Fn(&V, &V) -> bool + Send + Sync,
{
    fn values_equal(&self, a: &V, b: &V) -> bool {
        (self.eq)(a, b)
    }
}

/// The comparer pair attached to a map or builder.
pub struct Comparers<K, V> {
    key: Arc<dyn KeyComparer<K>>,
    value: Arc<dyn ValueComparer<V>>,
}

impl<K, V> Comparers<K, V> {
    /// Pairs a key comparer with a value comparer.
    #[must_use]
    pub fn new(key: Arc<dyn KeyComparer<K>>, value: Arc<dyn ValueComparer<V>>) -> Self {
        Self { key, value }
    }

    /// The key comparer.
    #[must_use]
    pub const fn key(&self) -> &Arc<dyn KeyComparer<K>> {
        &self.key
    }

    /// The value comparer.
    #[must_use]
    pub const fn value(&self) -> &Arc<dyn ValueComparer<V>> {
        &self.value
    }

    /// Returns `true` if `other` hashes and compares keys the same way.
    ///
    /// Two natural comparers are always the same; otherwise identity is
    /// pointer identity of the shared comparer.
    #[must_use]
    pub fn same_key_comparer(&self, other: &Arc<dyn KeyComparer<K>>) -> bool {
        Arc::ptr_eq(&self.key, other) || (self.key.is_natural() && other.is_natural())
    }

    /// Returns `true` if `other` compares values the same way.
    #[must_use]
    pub fn same_value_comparer(&self, other: &Arc<dyn ValueComparer<V>>) -> bool {
        Arc::ptr_eq(&self.value, other) || (self.value.is_natural() && other.is_natural())
    }

    #[inline]
    pub(crate) fn hash(&self, key: &K) -> HashCode {
        HashCode(self.key.hash_key(key))
    }

    #[inline]
    pub(crate) fn keys_equal(&self, a: &K, b: &K) -> bool {
        self.key.keys_equal(a, b)
    }

    #[inline]
    pub(crate) fn values_equal(&self, a: &V, b: &V) -> bool {
        self.value.values_equal(a, b)
    }
}

impl<K: Hash + Eq, V: PartialEq> Comparers<K, V> {
    /// Natural comparers for both keys and values.
    #[must_use]
    pub fn natural() -> Self {
        Self::new(Arc::new(DefaultComparer), Arc::new(DefaultComparer))
    }
}

impl<K: Hash + Eq, V: PartialEq> Default for Comparers<K, V> {
    fn default() -> Self {
        Self::natural()
    }
}

impl<K, V> Clone for Comparers<K, V> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            value: Arc::clone(&self.value),
        }
    }
}

impl<K, V> fmt::Debug for Comparers<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparers")
            .field("natural_key", &self.key.is_natural())
            .field("natural_value", &self.value.is_natural())
            .finish()
    }
}
