//! Mine bitmaps.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::{GridSize, Position};

/// A width × height bitmap of mine positions.
///
/// `MineField` is the hidden truth of a game: which cells are mines. It is
/// mutated only during generation (mine placement and perturbation) and is
/// treated as immutable once a game starts.
///
/// # Text format
///
/// [`FromStr`] and [`Display`] use one line per row, `*` for a mine and `.` for
/// a clear cell. When parsing, surrounding whitespace is ignored, blank lines are
/// skipped and `x`/`X` and `-` are accepted as alternatives.
///
/// # Examples
///
/// ```
/// use mines_core::{MineField, Position};
///
/// let field: MineField = "
///     .*.
///     ...
/// "
/// .parse()
/// .unwrap();
/// assert_eq!(field.size().width(), 3);
/// assert_eq!(field.mine_count(), 1);
/// assert!(field.is_mine(Position::new(1, 0)));
/// assert_eq!(field.adjacent_mines(Position::new(0, 1)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MineField {
    size: GridSize,
    mines: Vec<bool>,
}

impl MineField {
    /// Creates a field with no mines.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            mines: vec![false; size.area()],
        }
    }

    /// Creates a field with mines at the given positions.
    #[must_use]
    pub fn from_mines<I>(size: GridSize, mines: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let mut field = Self::new(size);
        for pos in mines {
            field.set_mine(pos, true);
        }
        field
    }

    /// Unpacks a most-significant-bit-first bitmap.
    ///
    /// Bit `i` of the stream (bit `7 - i % 8` of byte `i / 8`) describes the cell
    /// with row-major index `i`. Missing trailing bytes are treated as zero.
    #[must_use]
    pub fn from_bitmap(size: GridSize, bitmap: &[u8]) -> Self {
        let mines = (0..size.area())
            .map(|i| bitmap.get(i / 8).is_some_and(|b| b & (0x80 >> (i % 8)) != 0))
            .collect();
        Self { size, mines }
    }

    /// Packs the field into a most-significant-bit-first bitmap of `area.div_ceil(8)` bytes.
    ///
    /// Pad bits past the last cell are zero.
    #[must_use]
    pub fn to_bitmap(&self) -> Vec<u8> {
        let mut bitmap = vec![0; self.mines.len().div_ceil(8)];
        for (i, _) in self.mines.iter().enumerate().filter(|(_, m)| **m) {
            bitmap[i / 8] |= 0x80 >> (i % 8);
        }
        bitmap
    }

    /// Returns the grid dimensions.
    #[must_use]
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns `true` if the cell holds a mine.
    #[must_use]
    #[inline]
    pub fn is_mine(&self, pos: Position) -> bool {
        self.mines[self.size.index_of(pos)]
    }

    /// Places or clears a mine.
    #[inline]
    pub fn set_mine(&mut self, pos: Position, mine: bool) {
        let i = self.size.index_of(pos);
        self.mines[i] = mine;
    }

    /// Returns the total number of mines.
    #[must_use]
    pub fn mine_count(&self) -> usize {
        self.mines.iter().filter(|m| **m).count()
    }

    /// Returns the positions of all mines in row-major order.
    pub fn mine_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.size.positions().filter(|&pos| self.is_mine(pos))
    }

    /// Returns the number of mines adjacent to `pos`, not counting `pos` itself.
    #[must_use]
    pub fn adjacent_mines(&self, pos: Position) -> u8 {
        let count = self
            .size
            .neighbors(pos)
            .filter(|&p| self.is_mine(p))
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }
}

/// Errors returned when parsing a [`MineField`] from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FieldParseError {
    /// The text contains no rows.
    #[display("mine field has no rows")]
    Empty,
    /// A row has a different length from the first row.
    #[display("row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Length of the offending row.
        len: usize,
        /// Length of the first row.
        expected: usize,
    },
    /// A character other than a mine or clear marker was found.
    #[display("invalid mine field character {_0:?}")]
    InvalidChar(#[error(not(source))] char),
}

impl FromStr for MineField {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let Some(first) = rows.first() else {
            return Err(FieldParseError::Empty);
        };
        let width = first.chars().count();
        let mut mines = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(FieldParseError::RaggedRow {
                    row,
                    len,
                    expected: width,
                });
            }
            for c in line.chars() {
                mines.push(match c {
                    '*' | 'x' | 'X' => true,
                    '.' | '-' => false,
                    _ => return Err(FieldParseError::InvalidChar(c)),
                });
            }
        }
        Ok(Self {
            size: GridSize::new(width, rows.len()),
            mines,
        })
    }
}

impl Display for MineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.height() {
            for x in 0..self.size.width() {
                let c = if self.is_mine(Position::new(x, y)) { '*' } else { '.' };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
