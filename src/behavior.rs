//! Policy for inserting a key that is already present.

/// What a set operation does when the key already exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollisionBehavior {
    /// Overwrite the stored entry. An equal value leaves the entry untouched.
    #[default]
    SetValue,
    /// Keep the stored entry.
    Skip,
    /// Fail with [`DuplicateKey`](crate::MapError::DuplicateKey) unless the
    /// stored value is equal.
    ThrowIfValueDifferent,
    /// Always fail with [`DuplicateKey`](crate::MapError::DuplicateKey).
    ThrowAlways,
}
