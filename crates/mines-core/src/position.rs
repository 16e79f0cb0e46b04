//! Cell coordinates and grid geometry.

use std::fmt::{self, Display};

/// A cell position on the grid.
///
/// `x` is the column (left to right) and `y` the row (top to bottom).
///
/// # Examples
///
/// ```
/// use mines_core::Position;
///
/// let pos = Position::new(3, 5);
/// assert_eq!(pos.x(), 3);
/// assert_eq!(pos.y(), 5);
/// assert_eq!(pos.to_string(), "3,5");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    x: usize,
    y: usize,
}

impl Position {
    /// Creates a position from column and row.
    #[must_use]
    #[inline]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns the column.
    #[must_use]
    #[inline]
    pub const fn x(self) -> usize {
        self.x
    }

    /// Returns the row.
    #[must_use]
    #[inline]
    pub const fn y(self) -> usize {
        self.y
    }

    /// Returns `true` if `other` lies within the 3×3 square centred on `self`.
    ///
    /// A position is adjacent to itself under this definition.
    #[must_use]
    #[inline]
    pub fn is_within_one(self, other: Position) -> bool {
        self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Dimensions of a rectangular grid.
///
/// Cells are stored in row-major order; [`GridSize::index_of`] and
/// [`GridSize::position_at`] convert between positions and linear indices.
///
/// # Examples
///
/// ```
/// use mines_core::{GridSize, Position};
///
/// let size = GridSize::new(4, 3);
/// assert_eq!(size.area(), 12);
/// assert_eq!(size.index_of(Position::new(1, 2)), 9);
/// assert_eq!(size.neighbors(Position::new(0, 0)).count(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: usize,
    height: usize,
}

impl GridSize {
    /// Creates a grid size.
    #[must_use]
    #[inline]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Returns the number of columns.
    #[must_use]
    #[inline]
    pub const fn width(self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    #[inline]
    pub const fn height(self) -> usize {
        self.height
    }

    /// Returns the number of cells.
    #[must_use]
    #[inline]
    pub const fn area(self) -> usize {
        self.width * self.height
    }

    /// Returns `true` if the position lies on the grid.
    #[must_use]
    #[inline]
    pub const fn contains(self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Returns the position offset by `(dx, dy)`, or `None` if it falls off the grid.
    #[must_use]
    pub fn offset(self, pos: Position, dx: isize, dy: isize) -> Option<Position> {
        let x = pos.x.checked_add_signed(dx)?;
        let y = pos.y.checked_add_signed(dy)?;
        let pos = Position::new(x, y);
        self.contains(pos).then_some(pos)
    }

    /// Converts a position to its row-major index.
    #[must_use]
    #[inline]
    pub fn index_of(self, pos: Position) -> usize {
        debug_assert!(self.contains(pos), "{pos} outside {self:?}");
        pos.y * self.width + pos.x
    }

    /// Converts a row-major index back to a position.
    #[must_use]
    #[inline]
    pub fn position_at(self, index: usize) -> Position {
        debug_assert!(index < self.area());
        Position::new(index % self.width, index / self.width)
    }

    /// Returns all positions in row-major order.
    pub fn positions(self) -> impl Iterator<Item = Position> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }

    /// Returns the on-grid cells of the 3×3 square centred on `pos`, including `pos`.
    ///
    /// Cells are yielded in row-major order.
    pub fn neighborhood(self, pos: Position) -> impl Iterator<Item = Position> {
        debug_assert!(self.contains(pos));
        let xs = pos.x.saturating_sub(1)..=usize::min(pos.x + 1, self.width - 1);
        let ys = pos.y.saturating_sub(1)..=usize::min(pos.y + 1, self.height - 1);
        ys.flat_map(move |y| xs.clone().map(move |x| Position::new(x, y)))
    }

    /// Returns the on-grid cells adjacent to `pos`, excluding `pos` itself.
    pub fn neighbors(self, pos: Position) -> impl Iterator<Item = Position> {
        self.neighborhood(pos).filter(move |&p| p != pos)
    }
}
