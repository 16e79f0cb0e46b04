use mines_core::Position;

/// Errors that can occur during solving.
///
/// Every variant means the solver's knowledge is inconsistent with the layout
/// behind the oracle. Running out of deductions is not an error; see
/// [`SolveOutcome::Stalled`](crate::SolveOutcome::Stalled).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum SolverError {
    /// A constraint would need a negative or over-full mine count.
    #[display("contradiction: {mines} mines owed by {cells} cells anchored at {x},{y}")]
    Contradiction {
        /// Anchor column, which may lie one cell off the grid.
        x: isize,
        /// Anchor row, which may lie one cell off the grid.
        y: isize,
        /// Number of cells in the constraint.
        cells: usize,
        /// Mine count the constraint would need.
        mines: i32,
    },
    /// The known mines cannot be reconciled with the layout's mine count.
    #[display("contradiction: {known} mines known but the layout holds {total}")]
    MineCountMismatch {
        /// Mines known so far.
        known: usize,
        /// Mines in the layout.
        total: usize,
    },
    /// A cell deduced to be safe turned out to be a mine.
    #[display("cell {_0} was deduced safe but holds a mine")]
    Detonation(#[error(not(source))] Position),
}
