//! Recycling cache for child arrays.
//!
//! Index nodes resize their child array on every insert or remove of a
//! slot. A builder keeps one [`ArrayPool`] and threads it through every
//! write, so arrays released by in-place resizes are reused by the next
//! copy-on-write instead of going back to the allocator. The pool is owned
//! by exactly one builder and never crosses threads.

use crate::bitmap::MAX_CHILDREN;

/// Default number of arrays retained per capacity class.
pub const DEFAULT_POOL_LIMIT: usize = 8;

/// Free-lists of empty vectors keyed by exact capacity (`0..=32`).
pub struct ArrayPool<T> {
    stacks: Vec<Vec<Vec<T>>>,
    limit: usize,
}

impl<T> ArrayPool<T> {
    /// Creates a pool retaining at most `limit` arrays per capacity.
    ///
    /// Free-lists are allocated on the first array handed back.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { stacks: Vec::new(), limit }
    }

    /// Returns an empty vector able to hold `len` items without growing.
    #[must_use]
    pub fn rent(&mut self, len: usize) -> Vec<T> {
        self.stacks
            .get_mut(len)
            .and_then(Vec::pop)
            .unwrap_or_else(|| Vec::with_capacity(len))
    }

    /// Hands a no-longer-referenced array back for reuse.
    ///
    /// The array is cleared first; arrays outside the tracked capacity
    /// range or beyond the retention limit are dropped.
    pub fn give_back(&mut self, mut array: Vec<T>) {
        array.clear();
        let capacity = array.capacity();
        if capacity <= MAX_CHILDREN && self.stacks.len() <= capacity {
            self.stacks.resize_with(MAX_CHILDREN + 1, Vec::new);
        }
        let limit = self.limit;
        match self.stacks.get_mut(capacity) {
            Some(stack) if stack.len() < limit => stack.push(array),
            _ => log::trace!("pool dropped array of capacity {capacity}"),
        }
    }

    /// Number of arrays currently cached for `capacity`.
    #[must_use]
    pub fn cached(&self, capacity: usize) -> usize {
        self.stacks.get(capacity).map_or(0, Vec::len)
    }

    /// Retention limit per capacity class.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

impl<T> Default for ArrayPool<T> {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_LIMIT)
    }
}
