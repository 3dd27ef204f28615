//! Copy-on-write and in-place array edits.
//!
//! The `copied_*` functions leave the source untouched and fill `out`,
//! which is either a fresh allocation or a buffer rented from the
//! [`ArrayPool`]. The `*_in_place` functions edit an exclusively owned
//! array, growing through the pool when capacity runs out.

use crate::pool::ArrayPool;

/// Copies `src` into `out` with `value` inserted at `at`.
pub fn copied_insert<T: Clone>(src: &[T], at: usize, value: T, mut out: Vec<T>) -> Vec<T> {
    out.extend_from_slice(&src[..at]);
    out.push(value);
    out.extend_from_slice(&src[at..]);
    out
}

/// Copies `src` into `out` with `value` appended.
pub fn copied_push<T: Clone>(src: &[T], value: T, mut out: Vec<T>) -> Vec<T> {
    out.extend_from_slice(src);
    out.push(value);
    out
}

/// Copies `src` into `out` without the item at `at`.
pub fn copied_remove<T: Clone>(src: &[T], at: usize, mut out: Vec<T>) -> Vec<T> {
    out.extend_from_slice(&src[..at]);
    out.extend_from_slice(&src[at + 1..]);
    out
}

/// Copies `src` into `out` with the item at `at` replaced by `value`.
pub fn copied_update<T: Clone>(src: &[T], at: usize, value: T, mut out: Vec<T>) -> Vec<T> {
    out.extend_from_slice(&src[..at]);
    out.push(value);
    out.extend_from_slice(&src[at + 1..]);
    out
}

/// Inserts `value` at `at`, swapping in a pooled array when full.
///
/// The displaced array is returned to the pool.
pub fn insert_in_place<T>(pool: &mut ArrayPool<T>, array: &mut Vec<T>, at: usize, value: T) {
    if array.len() < array.capacity() {
        array.insert(at, value);
        return;
    }
    let mut grown = pool.rent(array.len() + 1);
    grown.extend(array.drain(..at));
    grown.push(value);
    grown.append(array);
    let old = std::mem::replace(array, grown);
    pool.give_back(old);
}

/// Removes and returns the item at `at`, moving the rest into a pooled
/// array of the exact new length.
pub fn remove_in_place<T>(pool: &mut ArrayPool<T>, array: &mut Vec<T>, at: usize) -> T {
    let removed = array.remove(at);
    let mut shrunk = pool.rent(array.len());
    shrunk.append(array);
    let old = std::mem::replace(array, shrunk);
    pool.give_back(old);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copied_edits_leave_source_intact() {
        let src = vec![1, 2, 3];
        assert_eq!(copied_insert(&src, 1, 9, Vec::new()), [1, 9, 2, 3]);
        assert_eq!(copied_push(&src, 4, Vec::new()), [1, 2, 3, 4]);
        assert_eq!(copied_remove(&src, 0, Vec::new()), [2, 3]);
        assert_eq!(copied_update(&src, 2, 7, Vec::new()), [1, 2, 7]);
        assert_eq!(src, [1, 2, 3]);
    }

    #[test]
    fn insert_in_place_recycles_full_array() {
        let mut pool = ArrayPool::new(4);
        let mut array = Vec::with_capacity(2);
        array.extend([1, 3]);
        insert_in_place(&mut pool, &mut array, 1, 2);
        assert_eq!(array, [1, 2, 3]);
        assert_eq!(pool.cached(2), 1);
    }

    #[test]
    fn remove_in_place_shrinks_through_pool() {
        let mut pool = ArrayPool::new(4);
        let mut array = vec![1, 2, 3];
        assert_eq!(remove_in_place(&mut pool, &mut array, 1), 2);
        assert_eq!(array, [1, 3]);
        assert_eq!(array.capacity(), 2);
        assert_eq!(pool.cached(3), 1);
    }
}
