//! Subsets of a 3×3 block.

use std::{
    fmt,
    ops::{BitAnd, BitOr, Not},
};

/// A subset of the cells of a 3×3 block.
///
/// Bit `dy * 3 + dx` is set when the cell at offset `(dx, dy)` from the block's
/// top-left anchor is a member. Only the low nine bits are ever used.
///
/// # Examples
///
/// ```
/// use mines_solver::CellMask;
///
/// let mask = CellMask::single(1, 1) | CellMask::single(2, 1);
/// assert_eq!(mask.len(), 2);
///
/// // The same cells seen from an anchor one column further right.
/// let shifted = mask.translate(-1, 0);
/// assert_eq!(shifted, CellMask::single(0, 1) | CellMask::single(1, 1));
/// ```
#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellMask(u16);

impl CellMask {
    /// The empty mask.
    pub const EMPTY: Self = Self(0);
    /// All nine cells.
    pub const FULL: Self = Self(0x1ff);
    /// The left column.
    pub const LEFT_COLUMN: Self = Self(0b001_001_001);
    /// The top row.
    pub const TOP_ROW: Self = Self(0b000_000_111);

    /// Creates a mask from raw bits, discarding anything above bit 8.
    #[must_use]
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::FULL.0)
    }

    /// Returns the raw bits.
    #[must_use]
    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Creates a mask holding the single cell at `(dx, dy)`.
    ///
    /// # Panics
    ///
    /// Panics if either offset is 3 or more.
    #[must_use]
    #[inline]
    pub const fn single(dx: usize, dy: usize) -> Self {
        assert!(dx < 3 && dy < 3);
        Self(1 << (dy * 3 + dx))
    }

    /// Returns the number of cells in the mask.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if the mask holds no cells.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the cell at `(dx, dy)` is a member.
    #[must_use]
    #[inline]
    pub const fn contains(self, dx: usize, dy: usize) -> bool {
        dx < 3 && dy < 3 && self.0 & (1 << (dy * 3 + dx)) != 0
    }

    /// Returns the cells in `self` but not in `other`.
    #[must_use]
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Re-expresses the mask relative to a different anchor.
    ///
    /// `(dx, dy)` is the displacement from the new anchor to the old one. Cells
    /// that fall outside the new 3×3 block are dropped.
    #[must_use]
    pub fn translate(self, dx: isize, dy: isize) -> Self {
        let mut out = Self::EMPTY;
        for (x, y) in self.offsets() {
            let (Some(x), Some(y)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
                continue;
            };
            if x < 3 && y < 3 {
                out.0 |= 1 << (y * 3 + x);
            }
        }
        out
    }

    /// Iterates over the `(dx, dy)` offsets of the member cells in row-major order.
    pub fn offsets(self) -> impl Iterator<Item = (usize, usize)> {
        (0..9)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(|i| (i % 3, i / 3))
    }
}

impl BitAnd for CellMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for CellMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl Not for CellMask {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::FULL.0)
    }
}

impl fmt::Debug for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellMask({:03x})", self.0)
    }
}
