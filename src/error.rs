//! Error type shared by maps and builders.

use thiserror::Error;

/// Failure reported by a map or builder operation.
///
/// A failed operation leaves the receiver unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MapError {
    /// Indexed read of a key that is not present.
    #[error("key not found")]
    NotFound,
    /// Insert of a key that already exists, rejected by the collision policy.
    #[error("an entry with the same key already exists")]
    DuplicateKey,
    /// Destination slice shorter than the number of entries to copy.
    #[error("destination holds {available} entries but {required} are required")]
    InsufficientCapacity {
        /// Entries that had to be copied.
        required: usize,
        /// Slots available from the starting index.
        available: usize,
    },
    /// Internal structure violated an invariant.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
}

/// Result alias for map operations.
pub type Result<T> = std::result::Result<T, MapError>;
