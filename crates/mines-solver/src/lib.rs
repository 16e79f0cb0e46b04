//! Deductive Minesweeper solver.
//!
//! The solver decides cells purely by logic, working from the cells already
//! known in a [`KnowledgeGrid`] and opening each cell it proves safe through a
//! [`MineOracle`]. The layout generator uses it to check that a layout can be
//! cleared without guessing, and supplies an oracle that can rewrite the hidden
//! layout when the solver gets stuck.
//!
//! # Overview
//!
//! - [`CellMask`]: a 9-bit subset of a 3×3 block.
//! - [`ConstraintSet`] and [`SetStore`]: local facts of the form "exactly N of
//!   these cells are mines", deduplicated and queued for processing.
//! - [`MineSolver`]: the deduction loop, configured by [`SolverConfig`].
//! - [`MineOracle`], [`Perturbation`] and [`PerturbTarget`]: the interface to
//!   the hidden layout. [`FieldOracle`] serves a fixed [`MineField`](mines_core::MineField).
//!
//! # Examples
//!
//! ```
//! use mines_core::{MineField, Position};
//! use mines_solver::{FieldOracle, Knowledge, KnowledgeGrid, MineOracle, MineSolver};
//!
//! // Nothing tells the mine in the top row apart from its neighbour.
//! let field: MineField = "
//!     *.
//!     ..
//!     ..
//! "
//! .parse()
//! .unwrap();
//!
//! let mut oracle = FieldOracle::new(&field);
//! let mut grid = KnowledgeGrid::new(field.size());
//! let start = Position::new(0, 2);
//! grid.set(start, Knowledge::Clear(oracle.open(start).unwrap()));
//!
//! let outcome = MineSolver::default().solve(&mut grid, None, &mut oracle, &mut rand::rng())?;
//! assert!(outcome.is_stalled());
//! assert_eq!(grid.unknown_count(), 2);
//! # Ok::<(), mines_solver::SolverError>(())
//! ```

pub mod cell_mask;
pub mod constraint_set;
pub mod error;
pub mod knowledge;
pub mod mine_solver;
pub mod perturbation;
pub mod set_store;

#[cfg(test)]
mod testing;

pub use self::{
    cell_mask::CellMask,
    constraint_set::ConstraintSet,
    error::SolverError,
    knowledge::{Knowledge, KnowledgeGrid},
    mine_solver::{MineSolver, SolveOutcome, SolverConfig},
    perturbation::{
        FieldOracle, MineChange, MineDelta, MineOracle, PerturbTarget, Perturbation,
    },
    set_store::SetStore,
};
