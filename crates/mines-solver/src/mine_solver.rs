//! The deduction loop.

use std::collections::VecDeque;

use mines_core::Position;
use rand::Rng;
use tinyvec::TinyVec;

use crate::{
    CellMask, ConstraintSet, Knowledge, KnowledgeGrid, MineOracle, PerturbTarget, SetStore,
    SolverError,
    constraint_set::{absolute, signed},
};

/// Configuration for [`MineSolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Largest number of pending constraint sets for which global deduction
    /// searches disjoint unions.
    ///
    /// The search visits up to `2^max_global_sets` combinations. Changing this
    /// changes which layouts the generator accepts.
    pub max_global_sets: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_global_sets: 10,
        }
    }
}

/// The result of a solve that found no contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SolveOutcome {
    /// Every cell is known.
    Solved {
        /// Number of perturbations the oracle applied along the way.
        perturbations: usize,
    },
    /// Deduction ran out and the oracle declined to perturb.
    Stalled,
}

impl SolveOutcome {
    /// Returns the perturbation count of a successful solve.
    #[must_use]
    pub fn perturbations(self) -> Option<usize> {
        match self {
            Self::Solved { perturbations } => Some(perturbations),
            Self::Stalled => None,
        }
    }
}

/// A Minesweeper solver that uses only logical deduction.
///
/// Starting from the known cells of a [`KnowledgeGrid`], the solver repeats the
/// following until every cell is known or nothing more can be done:
///
/// 1. Each newly known number becomes a [`ConstraintSet`] over its unknown
///    neighbours, and every set containing a newly known cell shrinks.
/// 2. A pending set whose count is zero or full decides all its cells. Otherwise
///    it is compared with each overlapping set, deciding wings whose size
///    matches the difference in counts and splitting off subsets.
/// 3. When the total mine count is known, the remaining count decides the
///    cells outside small disjoint unions of sets.
/// 4. As a last resort, the [`MineOracle`] is asked to perturb the layout.
///
/// Cells are opened through the oracle as soon as they are proven safe.
///
/// # Examples
///
/// ```
/// use mines_core::{MineField, Position};
/// use mines_solver::{FieldOracle, Knowledge, KnowledgeGrid, MineOracle, MineSolver, SolveOutcome};
///
/// let field: MineField = "
///     ....
///     ....
///     ...*
/// "
/// .parse()
/// .unwrap();
/// let mut oracle = FieldOracle::new(&field);
/// let mut grid = KnowledgeGrid::new(field.size());
/// let start = Position::new(0, 0);
/// grid.set(start, Knowledge::Clear(oracle.open(start).unwrap()));
///
/// let solver = MineSolver::default();
/// let outcome = solver.solve(&mut grid, Some(1), &mut oracle, &mut rand::rng())?;
/// assert_eq!(outcome, SolveOutcome::Solved { perturbations: 0 });
/// assert_eq!(grid.get(Position::new(3, 2)), Knowledge::Mine);
/// # Ok::<(), mines_solver::SolverError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MineSolver {
    config: SolverConfig,
}

impl MineSolver {
    /// Creates a solver.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Deduces as much of `grid` as possible.
    ///
    /// `total_mines`, when given, enables global deduction from the remaining
    /// mine count. `rng` picks the set handed to the oracle for perturbation.
    /// On return `grid` holds everything that was deduced, even when the
    /// outcome is [`SolveOutcome::Stalled`].
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the knowledge in `grid` contradicts itself or
    /// the layout behind `oracle`.
    pub fn solve<O, R>(
        &self,
        grid: &mut KnowledgeGrid,
        total_mines: Option<usize>,
        oracle: &mut O,
        rng: &mut R,
    ) -> Result<SolveOutcome, SolverError>
    where
        O: MineOracle,
        R: Rng + ?Sized,
    {
        let known = grid
            .size()
            .positions()
            .filter(|&pos| !grid.get(pos).is_unknown())
            .collect();
        Session {
            config: self.config,
            grid,
            total_mines,
            oracle,
            rng,
            store: SetStore::new(),
            known,
            perturbations: 0,
        }
        .run()
    }
}

enum GlobalStep {
    Finished,
    Progress,
    Stuck,
}

struct Session<'a, O, R: ?Sized> {
    config: SolverConfig,
    grid: &'a mut KnowledgeGrid,
    total_mines: Option<usize>,
    oracle: &'a mut O,
    rng: &'a mut R,
    store: SetStore,
    known: VecDeque<Position>,
    perturbations: usize,
}

impl<O, R> Session<'_, O, R>
where
    O: MineOracle,
    R: Rng + ?Sized,
{
    fn run(mut self) -> Result<SolveOutcome, SolverError> {
        loop {
            while let Some(pos) = self.known.pop_front() {
                self.absorb_known(pos)?;
            }

            if let Some(set) = self.store.pop_todo() {
                self.process_set(set)?;
                continue;
            }

            match self.global_deduction()? {
                GlobalStep::Finished => break,
                GlobalStep::Progress => continue,
                GlobalStep::Stuck => {}
            }

            if !self.perturb()? {
                log::trace!("solver stalled:\n{}", self.grid);
                break;
            }
        }

        if self.grid.is_complete() {
            Ok(SolveOutcome::Solved {
                perturbations: self.perturbations,
            })
        } else {
            Ok(SolveOutcome::Stalled)
        }
    }

    /// Turns a newly known cell into constraints and removes it from existing ones.
    fn absorb_known(&mut self, pos: Position) -> Result<(), SolverError> {
        let (x, y) = (signed(pos.x()), signed(pos.y()));
        let size = self.grid.size();

        if let Knowledge::Clear(n) = self.grid.get(pos) {
            let mut mask = CellMask::EMPTY;
            let mut mines = i32::from(n);
            for (dx, dy) in CellMask::FULL.offsets() {
                let Some(p) = size.offset(pos, signed(dx) - 1, signed(dy) - 1) else {
                    continue;
                };
                match self.grid.get(p) {
                    Knowledge::Mine => mines -= 1,
                    Knowledge::Unknown => mask = mask | CellMask::single(dx, dy),
                    Knowledge::Clear(_) => {}
                }
            }
            self.add_set(x - 1, y - 1, mask, mines)?;
        }

        let is_mine = i32::from(self.grid.get(pos).is_mine());
        for set in self.store.overlapping(x, y, CellMask::single(0, 0)) {
            let (sx, sy) = set.signed_anchor();
            let rest = set
                .mask()
                .difference(CellMask::single(0, 0).translate(x - sx, y - sy));
            self.add_set(sx, sy, rest, i32::from(set.mines()) - is_mine)?;
            self.store.remove(&set);
        }
        Ok(())
    }

    fn process_set(&mut self, set: ConstraintSet) -> Result<(), SolverError> {
        if set.mines() == 0 || usize::from(set.mines()) == set.len() {
            log::trace!("easy set: {set}");
            return self.mark_known(set.cells(), set.mines() != 0);
        }

        for other in self.store.overlapping_set(&set) {
            let wing = set.mask().difference(set.project(&other));
            let other_wing = other.mask().difference(other.project(&set));
            let wing_len = cardinality(wing);
            let other_wing_len = cardinality(other_wing);
            let diff = i32::from(set.mines()) - i32::from(other.mines());

            // A wing with as many cells as its extra mines is all mines, and the
            // opposite wing is then all clear.
            if wing_len == diff || other_wing_len == -diff {
                log::trace!("wing deduction: {set} against {other}");
                self.mark_known(absolute(set.anchor(), wing), wing_len == diff)?;
                self.mark_known(absolute(other.anchor(), other_wing), other_wing_len == -diff)?;
                continue;
            }

            if wing_len == 0 && other_wing_len != 0 {
                log::trace!("subset: {set} within {other}");
                let (ox, oy) = other.signed_anchor();
                self.add_set(ox, oy, other_wing, -diff)?;
            } else if other_wing_len == 0 && wing_len != 0 {
                log::trace!("subset: {other} within {set}");
                let (sx, sy) = set.signed_anchor();
                self.add_set(sx, sy, wing, diff)?;
            }
        }
        Ok(())
    }

    fn global_deduction(&mut self) -> Result<GlobalStep, SolverError> {
        let squares_left = self.grid.unknown_count();
        let known = self.grid.known_mine_count();

        let Some(total) = self.total_mines else {
            return Ok(if squares_left == 0 {
                GlobalStep::Finished
            } else {
                GlobalStep::Stuck
            });
        };
        let mines_left = total
            .checked_sub(known)
            .filter(|&left| left <= squares_left)
            .ok_or(SolverError::MineCountMismatch { known, total })?;

        if squares_left == 0 {
            return Ok(GlobalStep::Finished);
        }

        if mines_left == 0 || mines_left == squares_left {
            log::trace!("global deduction: {mines_left} mines in {squares_left} unknown cells");
            let cells: Vec<_> = self.grid.unknown_positions().collect();
            self.mark_known(cells, mines_left != 0)?;
            return Ok(GlobalStep::Progress);
        }

        if self.store.len() > self.config.max_global_sets {
            return Ok(GlobalStep::Stuck);
        }

        let sets: TinyVec<[ConstraintSet; 10]> = self.store.iter().collect();
        let mut used: TinyVec<[bool; 10]> = sets.iter().map(|_| false).collect();
        log::trace!(
            "global deduction over {} sets: {mines_left} mines in {squares_left} cells",
            sets.len()
        );
        let Some(mine) = find_disjoint_union(&sets, &mut used, 0, squares_left, mines_left)
        else {
            return Ok(GlobalStep::Stuck);
        };

        let outside: Vec<_> = self
            .grid
            .unknown_positions()
            .filter(|&pos| {
                !sets
                    .iter()
                    .zip(&used)
                    .any(|(set, &used)| used && set.contains(pos))
            })
            .collect();
        log::trace!(
            "global deduction: {} cells outside the union are all {}",
            outside.len(),
            if mine { "mines" } else { "clear" }
        );
        self.mark_known(outside, mine)?;
        Ok(GlobalStep::Progress)
    }

    /// Asks the oracle to perturb the layout. Returns `false` if it declined.
    fn perturb(&mut self) -> Result<bool, SolverError> {
        self.perturbations += 1;

        let target = if self.store.is_empty() {
            PerturbTarget::UnknownRegion
        } else {
            let index = self.rng.random_range(0..self.store.len());
            self.store
                .nth(index)
                .map_or(PerturbTarget::UnknownRegion, PerturbTarget::Set)
        };
        log::trace!("perturbing {target:?}");

        let Some(perturbation) = self
            .oracle
            .perturb(&mut *self.grid, target, &mut *self.rng)
        else {
            return Ok(false);
        };
        if perturbation.is_empty() {
            return Ok(false);
        }

        for change in perturbation.changes() {
            log::trace!("perturbation {:?} mine at {}", change.delta, change.pos);
            let pos = change.pos;
            if change.delta.is_removed() && !self.grid.get(pos).is_unknown() {
                self.known.push_back(pos);
            }
            for set in self
                .store
                .overlapping(signed(pos.x()), signed(pos.y()), CellMask::single(0, 0))
            {
                let (sx, sy) = set.signed_anchor();
                let mines = owed(
                    sx,
                    sy,
                    set.mask(),
                    i32::from(set.mines()) + change.delta.value(),
                )?;
                self.store.set_mines(&set, mines);
                self.store.schedule(&set);
            }
        }
        Ok(true)
    }

    fn add_set(
        &mut self,
        x: isize,
        y: isize,
        mask: CellMask,
        mines: i32,
    ) -> Result<(), SolverError> {
        let mines = owed(x, y, mask, mines)?;
        if let Some(set) = ConstraintSet::normalized(x, y, mask, mines) {
            self.store.insert(set);
        }
        Ok(())
    }

    /// Marks every unknown cell in `cells` as a mine, or opens it through the oracle.
    fn mark_known<I>(&mut self, cells: I, mine: bool) -> Result<(), SolverError>
    where
        I: IntoIterator<Item = Position>,
    {
        for pos in cells {
            if !self.grid.get(pos).is_unknown() {
                continue;
            }
            let knowledge = if mine {
                Knowledge::Mine
            } else {
                let count = self.oracle.open(pos).ok_or(SolverError::Detonation(pos))?;
                Knowledge::Clear(count)
            };
            self.grid.set(pos, knowledge);
            self.known.push_back(pos);
        }
        Ok(())
    }
}

/// Validates a constraint's mine count.
fn owed(x: isize, y: isize, mask: CellMask, mines: i32) -> Result<u8, SolverError> {
    u8::try_from(mines)
        .ok()
        .filter(|&m| usize::from(m) <= mask.len())
        .ok_or(SolverError::Contradiction {
            x,
            y,
            cells: mask.len(),
            mines,
        })
}

fn cardinality(mask: CellMask) -> i32 {
    i32::try_from(mask.len()).unwrap_or(i32::MAX)
}

/// Searches for a disjoint union of `sets` whose complement is all mines or all clear.
///
/// Sets are tried in order, each first included (if it is disjoint from those
/// already chosen) and then excluded. On success `used` marks the union and the
/// result says whether the complement is all mines.
fn find_disjoint_union(
    sets: &[ConstraintSet],
    used: &mut [bool],
    depth: usize,
    squares_left: usize,
    mines_left: usize,
) -> Option<bool> {
    let Some(set) = sets.get(depth) else {
        let decided = squares_left > 0 && (mines_left == 0 || mines_left == squares_left);
        return decided.then_some(mines_left != 0);
    };

    let disjoint = sets[..depth]
        .iter()
        .zip(used.iter())
        .all(|(other, &used)| !used || !other.overlaps(set));
    if disjoint
        && let Some(squares) = squares_left.checked_sub(set.len())
        && let Some(mines) = mines_left.checked_sub(usize::from(set.mines()))
    {
        used[depth] = true;
        if let Some(mine) = find_disjoint_union(sets, used, depth + 1, squares, mines) {
            return Some(mine);
        }
    }
    used[depth] = false;
    find_disjoint_union(sets, used, depth + 1, squares_left, mines_left)
}

#[cfg(test)]
mod tests {
    use mines_core::{GridSize, MineField};
    use proptest::{bool::weighted, collection::vec, prelude::*};
    use rand_pcg::Pcg64;

    use super::*;
    use crate::testing::{assert_consistent, field, solve_from};

    #[test]
    fn test_zero_region_opens_everything() {
        let field = field(
            "
            ....
            ....
            ....
            ",
        );
        let (grid, outcome) = solve_from(&field, Position::new(1, 1), None);
        assert_eq!(outcome, Ok(SolveOutcome::Solved { perturbations: 0 }));
        assert!(grid.is_complete());
        assert_consistent(&field, &grid);
    }

    #[test]
    fn test_easy_set_marks_mine() {
        let field = field(
            "
            ...
            ...
            ..*
            ",
        );
        let (grid, outcome) = solve_from(&field, Position::new(0, 0), None);
        assert_eq!(outcome, Ok(SolveOutcome::Solved { perturbations: 0 }));
        assert_eq!(grid.get(Position::new(2, 2)), Knowledge::Mine);
    }

    #[test]
    fn test_fifty_fifty_stalls() {
        let field = field(
            "
            *.
            ..
            ..
            ",
        );
        let (grid, outcome) = solve_from(&field, Position::new(0, 2), Some(1));
        assert_eq!(outcome, Ok(SolveOutcome::Stalled));
        assert_eq!(grid.unknown_count(), 2);
        assert_consistent(&field, &grid);
    }

    #[test]
    fn test_total_mine_count_clears_isolated_cells() {
        let field = field("..*..");

        let (grid, outcome) = solve_from(&field, Position::new(0, 0), None);
        assert_eq!(outcome, Ok(SolveOutcome::Stalled));
        assert_eq!(grid.get(Position::new(2, 0)), Knowledge::Mine);
        assert_eq!(grid.get(Position::new(3, 0)), Knowledge::Unknown);

        let (grid, outcome) = solve_from(&field, Position::new(0, 0), Some(1));
        assert_eq!(outcome, Ok(SolveOutcome::Solved { perturbations: 0 }));
        assert_eq!(grid.get(Position::new(4, 0)), Knowledge::Clear(0));
    }

    fn frontier_grid(field: &MineField, known_rows: std::ops::RangeFrom<usize>) -> KnowledgeGrid {
        let mut grid = KnowledgeGrid::new(field.size());
        for pos in field.size().positions() {
            if known_rows.contains(&pos.y()) {
                grid.set(pos, Knowledge::Clear(field.adjacent_mines(pos)));
            }
        }
        grid
    }

    #[test]
    fn test_disjoint_union_decides_complement() {
        // The pair in the second row holds the only mine, so the unconstrained
        // top row must be clear.
        let field = field(
            "
            ..
            *.
            ..
            ..
            ",
        );
        let solve = |config: SolverConfig, total: Option<usize>| {
            let mut grid = frontier_grid(&field, 2..);
            let mut oracle = crate::FieldOracle::new(&field);
            let outcome = MineSolver::new(config).solve(
                &mut grid,
                total,
                &mut oracle,
                &mut crate::testing::rng(),
            );
            (grid, outcome)
        };

        let (grid, outcome) = solve(SolverConfig::default(), Some(1));
        assert_eq!(outcome, Ok(SolveOutcome::Stalled));
        assert_eq!(grid.get(Position::new(0, 0)), Knowledge::Clear(1));
        assert_eq!(grid.get(Position::new(1, 0)), Knowledge::Clear(1));
        assert_consistent(&field, &grid);

        let (grid, _) = solve(SolverConfig::default(), None);
        assert_eq!(grid.get(Position::new(0, 0)), Knowledge::Unknown);

        let (grid, _) = solve(SolverConfig { max_global_sets: 0 }, Some(1));
        assert_eq!(grid.get(Position::new(0, 0)), Knowledge::Unknown);
    }

    #[test]
    fn test_contradictory_grid_is_an_error() {
        let field = field("...");
        let mut grid = KnowledgeGrid::new(field.size());
        grid.set(Position::new(0, 0), Knowledge::Clear(2));
        let mut oracle = crate::FieldOracle::new(&field);
        let result =
            MineSolver::default().solve(&mut grid, None, &mut oracle, &mut crate::testing::rng());
        assert!(result.is_err_and(|e| e.is_contradiction()));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let field = field(
            "
            ..*....*
            ........
            *...*...
            ......*.
            .*......
            ........
            ",
        );
        let start = Position::new(6, 5);
        let first = solve_from(&field, start, Some(field.mine_count()));
        let second = solve_from(&field, start, Some(field.mine_count()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_disjoint_union() {
        let sets = [ConstraintSet::normalized(0, 0, CellMask::TOP_ROW, 1).unwrap()];
        let mut used = [false];
        assert_eq!(find_disjoint_union(&sets, &mut used, 0, 4, 2), Some(true));
        assert_eq!(used, [true]);
        assert_eq!(find_disjoint_union(&sets, &mut used, 0, 4, 3), None);
    }

    fn session<'a, O>(
        grid: &'a mut KnowledgeGrid,
        oracle: &'a mut O,
        rng: &'a mut Pcg64,
    ) -> Session<'a, O, Pcg64> {
        Session {
            config: SolverConfig::default(),
            grid,
            total_mines: None,
            oracle,
            rng,
            store: SetStore::new(),
            known: VecDeque::new(),
            perturbations: 0,
        }
    }

    #[test]
    fn test_wing_deduction() {
        // Two of the first three cells and one of the last three are mines, so
        // the leftmost cell is a mine and the rightmost is clear.
        let field = field("*.*.");
        let left = ConstraintSet::normalized(0, 0, CellMask::TOP_ROW, 2).unwrap();
        let right = ConstraintSet::normalized(1, 0, CellMask::TOP_ROW, 1).unwrap();

        for (queued, processed) in [(left, right), (right, left)] {
            let mut grid = KnowledgeGrid::new(field.size());
            let mut oracle = crate::FieldOracle::new(&field);
            let mut rng = crate::testing::rng();
            let mut session = session(&mut grid, &mut oracle, &mut rng);
            session.store.insert(queued);
            session.store.insert(processed);
            session.process_set(processed).unwrap();

            assert_eq!(grid.get(Position::new(0, 0)), Knowledge::Mine);
            assert_eq!(grid.get(Position::new(3, 0)), Knowledge::Clear(1));
            assert_eq!(grid.get(Position::new(1, 0)), Knowledge::Unknown);
            assert_eq!(grid.get(Position::new(2, 0)), Knowledge::Unknown);
        }
    }

    #[test]
    fn test_subset_split_both_directions() {
        let field = field("...\n...");
        // {(0,0), (1,0)} holds one mine and {(0,0), (1,0), (2,0), (0,1)} two, so
        // {(2,0), (0,1)} holds one.
        let small = ConstraintSet::normalized(0, 0, CellMask::from_bits(0b0011), 1).unwrap();
        let large = ConstraintSet::normalized(0, 0, CellMask::from_bits(0b1111), 2).unwrap();
        let split = ConstraintSet::normalized(0, 0, CellMask::from_bits(0b1100), 1).unwrap();

        for (first, second) in [(small, large), (large, small)] {
            let mut grid = KnowledgeGrid::new(field.size());
            let mut oracle = crate::FieldOracle::new(&field);
            let mut rng = crate::testing::rng();
            let mut session = session(&mut grid, &mut oracle, &mut rng);

            session.store.insert(first);
            assert_eq!(session.store.pop_todo(), Some(first));
            session.process_set(first).unwrap();
            session.store.insert(second);
            assert_eq!(session.store.pop_todo(), Some(second));
            session.process_set(second).unwrap();

            assert!(
                session.store.iter().any(|set| set == split),
                "{first} then {second}: {:?}",
                session.store.iter().collect::<Vec<_>>()
            );
            assert_eq!(session.store.pop_todo(), Some(split));
        }
    }

    proptest! {
        #[test]
        fn test_deductions_match_layout(
            width in 3usize..=10,
            height in 3usize..=10,
            sx in 0usize..10,
            sy in 0usize..10,
            mines in vec(weighted(0.2), 100),
            total_known in any::<bool>(),
        ) {
            let size = GridSize::new(width, height);
            let start = Position::new(sx % width, sy % height);
            let field = MineField::from_mines(
                size,
                size.positions()
                    .filter(|&p| mines[size.index_of(p)] && !p.is_within_one(start)),
            );
            let total = total_known.then(|| field.mine_count());
            let (grid, outcome) = solve_from(&field, start, total);
            prop_assert!(outcome.is_ok(), "{outcome:?}");
            for pos in size.positions() {
                match grid.get(pos) {
                    Knowledge::Mine => prop_assert!(field.is_mine(pos)),
                    Knowledge::Clear(n) => {
                        prop_assert!(!field.is_mine(pos));
                        prop_assert_eq!(n, field.adjacent_mines(pos));
                    }
                    Knowledge::Unknown => {}
                }
            }
        }
    }
}
