//! Persistent hash map based on a HAMT.
//!
//! A HAMT (Hash Array Mapped Trie) consumes five bits of a 32-bit key hash
//! per level to pick one of up to 32 children, storing only the children
//! that exist behind a bitmap. Keys whose full hashes are equal share a
//! collision leaf.
//!
//! # Key properties
//!
//! - **Persistence**: every write returns a new [`PersistentHashMap`];
//!   older handles are never affected
//! - **Structural sharing**: unchanged subtrees are shared through [`Arc`](std::sync::Arc)
//! - **Transient builder**: [`PersistentHashMapBuilder`] edits nodes it owns
//!   in place and freezes them on [`build`](PersistentHashMapBuilder::build)
//! - **Custom comparers**: key hashing and key/value equality are pluggable
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # Example
//!
//! ```
//! use hamt_map::PersistentHashMap;
//!
//! let empty = PersistentHashMap::new();
//! let one = empty.add(1, "a").unwrap();
//! let two = one.add(2, "b").unwrap();
//!
//! assert_eq!(empty.len(), 0);
//! assert_eq!(one.len(), 1);
//! assert_eq!(two[&2], "b");
//! ```
//!
//! # References
//!
//! - Bagwell, 2001, "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod bitmap;
pub mod comparer;
pub mod iter;
pub mod node;
pub mod pool;

mod array;
mod behavior;
mod builder;
mod error;
mod map;
mod ops;

#[cfg(test)]
mod tests;

pub use behavior::CollisionBehavior;
pub use builder::PersistentHashMapBuilder;
pub use comparer::{
    Comparers, DefaultComparer, FnKeyComparer, FnValueComparer, KeyComparer, ValueComparer,
};
pub use error::{MapError, Result};
pub use iter::{Iter, Keys, Values};
pub use map::PersistentHashMap;
pub use pool::{ArrayPool, DEFAULT_POOL_LIMIT};
