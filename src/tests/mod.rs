mod basic;
mod pool;
mod stress;
mod sync;

use std::sync::Arc;

use crate::{Comparers, DefaultComparer, FnKeyComparer};

/// Natural equality with a caller-chosen hash, for forcing trie shapes.
pub(crate) fn hashed_by<K, V>(hash: fn(&K) -> u32) -> Comparers<K, V>
where
    K: Eq + Send + Sync + 'static,
    V: PartialEq,
{
    Comparers::new(
        Arc::new(FnKeyComparer::new(|a: &K, b: &K| a == b, hash)),
        Arc::new(DefaultComparer),
    )
}
