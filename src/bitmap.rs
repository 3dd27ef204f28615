//! Hash, shift and bitmap helpers shared by every trie level.
//!
//! Two index spaces exist at each level: the [`BitmapIndex`] (0..31, taken
//! straight from hash bits) and the [`NodeIndex`] (the dense position in
//! the child array once empty slots are compressed out).

use std::fmt;

/// Bits consumed per trie level (5 → 32-way branching).
pub const BITS_PER_LEVEL: u32 = 5;

/// Number of slots addressable by one level.
pub const MAX_CHILDREN: usize = 1 << BITS_PER_LEVEL;

/// Largest meaningful shift for a 32-bit hash; the level at 30 sees 2 bits.
pub const MAX_SHIFT: u32 = 30;

/// Maximum number of index levels from the root down to the last shift.
pub const MAX_DEPTH: usize = (MAX_SHIFT / BITS_PER_LEVEL) as usize + 1;

const MASK: u32 = 0x1F;

/// 32-bit hash code of a key, computed once per operation.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashCode(pub u32);

impl HashCode {
    /// Returns the 5-bit slot selected by this hash at `shift`.
    #[inline]
    #[must_use]
    pub const fn bitmap_index(self, shift: Shift) -> BitmapIndex {
        // Shifts past the hash width yield zero instead of overflowing.
        let bits = match self.0.checked_shr(shift.0) {
            Some(bits) => bits,
            None => 0,
        };
        BitmapIndex(bits & MASK)
    }
}

impl fmt::Debug for HashCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashCode({:#010x})", self.0)
    }
}

/// Current trie depth expressed in consumed hash bits (0, 5, 10, …).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Shift(pub u32);

impl Shift {
    /// The root level.
    pub const ZERO: Self = Self(0);

    /// Returns the shift of the next level down.
    #[inline]
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + BITS_PER_LEVEL)
    }

    /// Returns `true` once every hash bit has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(self) -> bool {
        self.0 > MAX_SHIFT
    }
}

/// Raw slot selector at one level, in `0..32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct BitmapIndex(pub u32);

/// Dense position of a child in its parent's child array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

/// 32-bit presence map: bit *i* set means slot *i* has a child.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Bitmap(pub u32);

impl Bitmap {
    /// Bitmap with no slots present.
    pub const EMPTY: Self = Self(0);

    /// Bitmap with exactly one slot present.
    #[inline]
    #[must_use]
    pub const fn from_index(index: BitmapIndex) -> Self {
        Self(1 << index.0)
    }

    /// Bitmap with two slots present.
    #[inline]
    #[must_use]
    pub const fn from_pair(a: BitmapIndex, b: BitmapIndex) -> Self {
        Self((1 << a.0) | (1 << b.0))
    }

    /// Returns `true` if no slot is present.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of present slots, equal to the child array length.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if slot `index` is present.
    #[inline]
    #[must_use]
    pub const fn has(self, index: BitmapIndex) -> bool {
        self.0 & (1 << index.0) != 0
    }

    /// Compacted position of slot `index`: set bits strictly below it.
    #[inline]
    #[must_use]
    pub const fn position(self, index: BitmapIndex) -> NodeIndex {
        let below = (1_u32 << index.0) - 1;
        NodeIndex((self.0 & below).count_ones() as usize)
    }

    /// Returns a copy with slot `index` marked present.
    #[inline]
    #[must_use]
    pub const fn with(self, index: BitmapIndex) -> Self {
        Self(self.0 | (1 << index.0))
    }

    /// Returns a copy with slot `index` marked absent.
    #[inline]
    #[must_use]
    pub const fn without(self, index: BitmapIndex) -> Self {
        Self(self.0 & !(1 << index.0))
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({:#034b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitmap_index_takes_five_bits_per_level() {
        let hash = HashCode(0b11111_00011_00010_00001);
        assert_eq!(hash.bitmap_index(Shift::ZERO), BitmapIndex(1));
        assert_eq!(hash.bitmap_index(Shift(5)), BitmapIndex(2));
        assert_eq!(hash.bitmap_index(Shift(10)), BitmapIndex(3));
        assert_eq!(hash.bitmap_index(Shift(15)), BitmapIndex(31));
        assert_eq!(HashCode(u32::MAX).bitmap_index(Shift(MAX_SHIFT)), BitmapIndex(3));
        assert_eq!(HashCode(u32::MAX).bitmap_index(Shift(35)), BitmapIndex(0));
    }

    #[test]
    fn position_counts_bits_below() {
        let bitmap = Bitmap::EMPTY
            .with(BitmapIndex(1))
            .with(BitmapIndex(4))
            .with(BitmapIndex(31));
        assert_eq!(bitmap.len(), 3);
        assert_eq!(bitmap.position(BitmapIndex(0)), NodeIndex(0));
        assert_eq!(bitmap.position(BitmapIndex(4)), NodeIndex(1));
        assert_eq!(bitmap.position(BitmapIndex(31)), NodeIndex(2));
        assert!(bitmap.has(BitmapIndex(31)));
        assert!(!bitmap.without(BitmapIndex(31)).has(BitmapIndex(31)));
    }

    #[test]
    fn depth_constants() {
        assert_eq!(MAX_DEPTH, 7);
        assert!(!Shift(MAX_SHIFT).is_exhausted());
        assert!(Shift(MAX_SHIFT).next().is_exhausted());
    }
}
