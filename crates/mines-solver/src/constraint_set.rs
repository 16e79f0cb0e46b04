//! Constraints of the form "exactly N of these cells are mines".

use std::fmt::{self, Display};

use mines_core::Position;

use crate::CellMask;

/// A local constraint: exactly `mines` of the cells in `mask` are mines.
///
/// The mask is relative to the top-left `anchor` of a 3×3 block. Sets are kept
/// normalized so that the mask always touches both the left column and the top
/// row of the block, which makes `(anchor, mask)` a unique identity for a given
/// group of cells.
///
/// # Examples
///
/// ```
/// use mines_core::Position;
/// use mines_solver::{CellMask, ConstraintSet};
///
/// // The right column of the block anchored one cell left of the origin.
/// let set = ConstraintSet::normalized(-1, 0, CellMask::from_bits(0b100_100_100), 1).unwrap();
/// assert_eq!(set.anchor(), Position::new(1, 0));
/// assert_eq!(set.mask(), CellMask::from_bits(0b001_001_001));
/// assert!(set.contains(Position::new(1, 1)));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintSet {
    anchor: Position,
    mask: CellMask,
    mines: u8,
}

/// Identity of a [`ConstraintSet`] in a set store, ordered by row, column and mask.
pub(crate) type SetKey = (usize, usize, CellMask);

impl ConstraintSet {
    /// Creates a normalized set from a possibly off-grid anchor.
    ///
    /// Returns `None` if the mask is empty or any member cell would have a
    /// negative coordinate.
    #[must_use]
    pub fn normalized(mut x: isize, mut y: isize, mut mask: CellMask, mines: u8) -> Option<Self> {
        if mask.is_empty() {
            return None;
        }
        while (mask & CellMask::LEFT_COLUMN).is_empty() {
            mask = mask.translate(-1, 0);
            x += 1;
        }
        while (mask & CellMask::TOP_ROW).is_empty() {
            mask = mask.translate(0, -1);
            y += 1;
        }
        let anchor = Position::new(usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        debug_assert!(usize::from(mines) <= mask.len());
        Some(Self {
            anchor,
            mask,
            mines,
        })
    }

    /// Returns the top-left corner of the set's 3×3 block.
    #[must_use]
    #[inline]
    pub fn anchor(&self) -> Position {
        self.anchor
    }

    /// Returns the member cells relative to the anchor.
    #[must_use]
    #[inline]
    pub fn mask(&self) -> CellMask {
        self.mask
    }

    /// Returns the number of mines among the member cells.
    #[must_use]
    #[inline]
    pub fn mines(&self) -> u8 {
        self.mines
    }

    /// Returns the number of member cells.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    /// Always `false`; normalized sets hold at least one cell.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub(crate) fn with_mines(self, mines: u8) -> Self {
        Self { mines, ..self }
    }

    pub(crate) fn key(&self) -> SetKey {
        (self.anchor.y(), self.anchor.x(), self.mask)
    }

    pub(crate) fn signed_anchor(&self) -> (isize, isize) {
        (signed(self.anchor.x()), signed(self.anchor.y()))
    }

    /// Returns the absolute positions of the member cells.
    pub fn cells(&self) -> impl Iterator<Item = Position> + use<> {
        absolute(self.anchor, self.mask)
    }

    /// Returns `true` if `pos` is a member cell.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x() >= self.anchor.x()
            && pos.y() >= self.anchor.y()
            && self
                .mask
                .contains(pos.x() - self.anchor.x(), pos.y() - self.anchor.y())
    }

    /// Returns the cells of `other` that fall in this set's block, relative to this set's anchor.
    #[must_use]
    pub fn project(&self, other: &Self) -> CellMask {
        let (x, y) = self.signed_anchor();
        let (ox, oy) = other.signed_anchor();
        other.mask.translate(ox - x, oy - y)
    }

    /// Returns `true` if the two sets share at least one cell.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.mask & self.project(other)).is_empty()
    }
}

impl Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mines in {:03x}@{}",
            self.mines,
            self.mask.bits(),
            self.anchor
        )
    }
}

/// Returns the positions of the cells of `mask` anchored at `anchor`.
pub(crate) fn absolute(anchor: Position, mask: CellMask) -> impl Iterator<Item = Position> {
    mask.offsets()
        .map(move |(dx, dy)| Position::new(anchor.x() + dx, anchor.y() + dy))
}

pub(crate) fn signed(v: usize) -> isize {
    isize::try_from(v).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_moves_anchor_to_bounding_box() {
        let set = ConstraintSet::normalized(2, 3, CellMask::single(2, 2), 1).unwrap();
        assert_eq!(set.anchor(), Position::new(4, 5));
        assert_eq!(set.mask(), CellMask::single(0, 0));
        assert_eq!(set.cells().collect::<Vec<_>>(), vec![Position::new(4, 5)]);
    }

    #[test]
    fn test_normalize_rejects_empty_and_off_grid() {
        assert_eq!(ConstraintSet::normalized(0, 0, CellMask::EMPTY, 0), None);
        assert_eq!(
            ConstraintSet::normalized(-1, 0, CellMask::single(0, 1), 0),
            None
        );
    }

    #[test]
    fn test_same_cells_normalize_identically() {
        let a = ConstraintSet::normalized(0, 0, CellMask::single(1, 1) | CellMask::single(2, 1), 1)
            .unwrap();
        let b = ConstraintSet::normalized(1, 0, CellMask::single(0, 1) | CellMask::single(1, 1), 1)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_overlaps() {
        let a = ConstraintSet::normalized(0, 0, CellMask::TOP_ROW, 1).unwrap();
        let b = ConstraintSet::normalized(2, 0, CellMask::LEFT_COLUMN, 1).unwrap();
        let c = ConstraintSet::normalized(3, 0, CellMask::LEFT_COLUMN, 1).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert_eq!(a.mask() & a.project(&b), CellMask::single(2, 0));
    }
}
