//! Helpers shared by the solver's unit tests.

use mines_core::{MineField, Position};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;

use crate::{
    FieldOracle, Knowledge, KnowledgeGrid, MineOracle as _, MineSolver, SolveOutcome, SolverError,
};

/// Returns a fixed-seed generator so solver runs are reproducible.
pub(crate) fn rng() -> Pcg64 {
    Pcg64::seed_from_u64(0x6d69_6e65)
}

/// Parses a layout; see [`MineField`]'s text format.
#[track_caller]
pub(crate) fn field(s: &str) -> MineField {
    s.parse().unwrap()
}

/// Opens `start` and solves the rest of `field` without perturbation.
#[track_caller]
pub(crate) fn solve_from(
    field: &MineField,
    start: Position,
    total_mines: Option<usize>,
) -> (KnowledgeGrid, Result<SolveOutcome, SolverError>) {
    let mut oracle = FieldOracle::new(field);
    let mut grid = KnowledgeGrid::new(field.size());
    let count = oracle.open(start).expect("start cell must be clear");
    grid.set(start, Knowledge::Clear(count));
    let outcome = MineSolver::default().solve(&mut grid, total_mines, &mut oracle, &mut rng());
    (grid, outcome)
}

/// Asserts that every known cell of `grid` agrees with `field`.
#[track_caller]
pub(crate) fn assert_consistent(field: &MineField, grid: &KnowledgeGrid) {
    for pos in field.size().positions() {
        match grid.get(pos) {
            Knowledge::Unknown => {}
            Knowledge::Mine => assert!(field.is_mine(pos), "{pos} marked as a mine"),
            Knowledge::Clear(n) => {
                assert!(!field.is_mine(pos), "{pos} opened but holds a mine");
                assert_eq!(n, field.adjacent_mines(pos), "wrong count at {pos}");
            }
        }
    }
}
