//! Edits to the hidden layout and the interface through which the solver requests them.

use mines_core::{MineField, Position};
use rand::Rng;

use crate::{ConstraintSet, KnowledgeGrid};

/// Direction of a single mine change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum MineDelta {
    /// The cell gained a mine.
    Added,
    /// The cell lost its mine.
    Removed,
}

impl MineDelta {
    /// Returns `+1` or `-1`.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Added => 1,
            Self::Removed => -1,
        }
    }
}

/// A single cell whose mine state was flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MineChange {
    /// The cell that changed.
    pub pos: Position,
    /// Whether it gained or lost a mine.
    pub delta: MineDelta,
}

/// An ordered list of mine changes applied to the hidden layout.
///
/// Perturbations produced by a well-behaved oracle conserve the mine count, so
/// [`Perturbation::net_delta`] is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Perturbation {
    changes: Vec<MineChange>,
}

impl Perturbation {
    /// Wraps a list of changes.
    #[must_use]
    pub fn new(changes: Vec<MineChange>) -> Self {
        Self { changes }
    }

    /// Returns the changes in the order they were made.
    #[must_use]
    pub fn changes(&self) -> &[MineChange] {
        &self.changes
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the change in total mine count.
    #[must_use]
    pub fn net_delta(&self) -> i64 {
        self.changes.iter().map(|c| i64::from(c.delta.value())).sum()
    }
}

/// The footprint a perturbation must resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerturbTarget {
    /// The cells of a pending constraint set.
    Set(ConstraintSet),
    /// Every unknown cell; used when no constraint sets remain.
    UnknownRegion,
}

impl PerturbTarget {
    /// Returns `true` if `pos` is inside the footprint.
    #[must_use]
    pub fn contains(&self, grid: &KnowledgeGrid, pos: Position) -> bool {
        match self {
            Self::Set(set) => set.contains(pos),
            Self::UnknownRegion => grid.get(pos).is_unknown(),
        }
    }
}

/// Access to the hidden layout during a solve.
///
/// The solver never sees the layout directly: it asks the oracle to open cells
/// it has proven safe and, when deduction stalls, to rewrite the layout so that
/// deduction can continue.
pub trait MineOracle {
    /// Opens a cell the solver has deduced to be safe.
    ///
    /// Returns the number of adjacent mines, or `None` if the cell is a mine.
    fn open(&mut self, pos: Position) -> Option<u8>;

    /// Moves mines so that `target` becomes decidable.
    ///
    /// Implementations update the numbers in `grid` that the change invalidates
    /// and report every flipped cell. Returning `None` tells the solver to give
    /// up. The default implementation never perturbs.
    fn perturb<R>(
        &mut self,
        grid: &mut KnowledgeGrid,
        target: PerturbTarget,
        rng: &mut R,
    ) -> Option<Perturbation>
    where
        R: Rng + ?Sized,
    {
        let _ = (grid, target, rng);
        None
    }
}

/// An oracle backed by a fixed layout that is never perturbed.
///
/// # Examples
///
/// ```
/// use mines_core::{MineField, Position};
/// use mines_solver::{FieldOracle, MineOracle};
///
/// let field: MineField = "*..\n...".parse().unwrap();
/// let mut oracle = FieldOracle::new(&field);
/// assert_eq!(oracle.open(Position::new(1, 1)), Some(1));
/// assert_eq!(oracle.open(Position::new(0, 0)), None);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldOracle<'a> {
    field: &'a MineField,
}

impl<'a> FieldOracle<'a> {
    /// Creates an oracle over `field`.
    #[must_use]
    pub fn new(field: &'a MineField) -> Self {
        Self { field }
    }
}

impl MineOracle for FieldOracle<'_> {
    fn open(&mut self, pos: Position) -> Option<u8> {
        (!self.field.is_mine(pos)).then(|| self.field.adjacent_mines(pos))
    }
}
