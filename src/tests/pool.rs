use crate::{ArrayPool, DEFAULT_POOL_LIMIT, PersistentHashMapBuilder};

#[test]
fn default_limit() {
    let pool: ArrayPool<u8> = ArrayPool::default();
    assert_eq!(pool.limit(), DEFAULT_POOL_LIMIT);
    assert_eq!(pool.cached(4), 0);
}

#[test]
fn rent_reuses_given_back_array() {
    let mut pool = ArrayPool::new(2);
    let mut array: Vec<u32> = pool.rent(4);
    array.extend([1, 2, 3, 4]);
    let ptr = array.as_ptr();
    pool.give_back(array);
    assert_eq!(pool.cached(4), 1);

    let again = pool.rent(4);
    assert!(again.is_empty());
    assert_eq!(again.as_ptr(), ptr);
    assert_eq!(pool.cached(4), 0);
}

#[test]
fn retention_limit() {
    let mut pool = ArrayPool::new(2);
    for _ in 0..5 {
        pool.give_back(Vec::<u8>::with_capacity(3));
    }
    assert_eq!(pool.cached(3), 2);
}

#[test]
fn oversized_arrays_are_dropped() {
    let mut pool = ArrayPool::new(4);
    pool.give_back(Vec::<u8>::with_capacity(64));
    assert_eq!(pool.cached(64), 0);
}

#[test]
fn zero_limit_caches_nothing() {
    let mut pool = ArrayPool::new(0);
    pool.give_back(Vec::<u8>::with_capacity(1));
    assert_eq!(pool.cached(1), 0);
}

/// Churn through one builder; the pool recycles arrays across resizes.
#[test]
fn builder_churn() {
    let mut builder = PersistentHashMapBuilder::new().with_pool_limit(16);
    for round in 0..4 {
        builder.extend((0..300).map(|i| (i, round)));
        for i in (0..300).step_by(2) {
            assert!(builder.remove(&i));
        }
        for i in (1..300).step_by(2) {
            assert!(builder.remove(&i));
        }
        assert!(builder.is_empty());
    }
}
