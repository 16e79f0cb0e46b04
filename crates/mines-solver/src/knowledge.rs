//! The solver's view of the grid.

use std::{
    fmt::{self, Display},
    ops::Index,
};

use mines_core::{GridSize, MineField, Position};

/// What the solver currently knows about a single cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum Knowledge {
    /// Nothing is known yet.
    #[default]
    Unknown,
    /// The cell is known to hold a mine.
    Mine,
    /// The cell is known to be clear, with this many adjacent mines.
    Clear(u8),
}

/// The solver's knowledge of every cell on the grid.
///
/// Knowledge only ever grows during a solve, except when a perturbation
/// rewrites the numbers around cells whose mines moved.
///
/// # Examples
///
/// ```
/// use mines_core::{GridSize, Position};
/// use mines_solver::{Knowledge, KnowledgeGrid};
///
/// let mut grid = KnowledgeGrid::new(GridSize::new(3, 2));
/// grid.set(Position::new(0, 0), Knowledge::Clear(1));
/// grid.set(Position::new(1, 0), Knowledge::Mine);
/// assert_eq!(grid.unknown_count(), 4);
/// assert_eq!(grid.to_string(), "1*?\n???\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KnowledgeGrid {
    size: GridSize,
    cells: Vec<Knowledge>,
}

impl KnowledgeGrid {
    /// Creates a grid where every cell is unknown.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Knowledge::Unknown; size.area()],
        }
    }

    /// Creates a grid where every cell is known, copied from `field`.
    #[must_use]
    pub fn revealed(field: &MineField) -> Self {
        let size = field.size();
        let cells = size
            .positions()
            .map(|pos| {
                if field.is_mine(pos) {
                    Knowledge::Mine
                } else {
                    Knowledge::Clear(field.adjacent_mines(pos))
                }
            })
            .collect();
        Self { size, cells }
    }

    /// Returns the grid dimensions.
    #[must_use]
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the knowledge of a cell.
    #[must_use]
    #[inline]
    pub fn get(&self, pos: Position) -> Knowledge {
        self.cells[self.size.index_of(pos)]
    }

    /// Overwrites the knowledge of a cell.
    #[inline]
    pub fn set(&mut self, pos: Position, knowledge: Knowledge) {
        let i = self.size.index_of(pos);
        self.cells[i] = knowledge;
    }

    /// Returns the number of unknown cells.
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.cells.iter().filter(|k| k.is_unknown()).count()
    }

    /// Returns the number of cells known to be mines.
    #[must_use]
    pub fn known_mine_count(&self) -> usize {
        self.cells.iter().filter(|k| k.is_mine()).count()
    }

    /// Returns `true` once no cell is unknown.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.cells.iter().any(|k| k.is_unknown())
    }

    /// Returns the positions of all unknown cells in row-major order.
    pub fn unknown_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.size.positions().filter(|&pos| self.get(pos).is_unknown())
    }

    /// Returns `true` if any neighbour of `pos` is known.
    #[must_use]
    pub fn borders_known(&self, pos: Position) -> bool {
        self.size.neighbors(pos).any(|p| !self.get(p).is_unknown())
    }
}

impl Index<Position> for KnowledgeGrid {
    type Output = Knowledge;

    fn index(&self, pos: Position) -> &Knowledge {
        &self.cells[self.size.index_of(pos)]
    }
}

impl Display for KnowledgeGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size.height() {
            for x in 0..self.size.width() {
                match self.get(Position::new(x, y)) {
                    Knowledge::Unknown => write!(f, "?")?,
                    Knowledge::Mine => write!(f, "*")?,
                    Knowledge::Clear(0) => write!(f, "-")?,
                    Knowledge::Clear(n) => write!(f, "{n}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
