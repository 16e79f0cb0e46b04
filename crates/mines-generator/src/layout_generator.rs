//! Random layouts and the search for ones that need no guessing.

use mines_core::{GameParams, MineField, ParamsError, Position};
use mines_solver::{Knowledge, KnowledgeGrid, MineSolver, SolveOutcome, SolverConfig};
use rand::{Rng, seq::SliceRandom as _};

use crate::{GenerationOracle, LayoutSeed};

/// Settings for [`LayoutGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Settings for the solver that checks each candidate layout.
    pub solver: SolverConfig,
    /// Number of failed attempts after which the oracle may rewrite the whole
    /// unknown region instead of a single constraint set.
    pub big_perturbation_threshold: usize,
    /// Maximum number of layouts to try before giving up, or `None` to keep
    /// trying forever.
    pub max_attempts: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            big_perturbation_threshold: 100,
            max_attempts: Some(10_000),
        }
    }
}

/// A layout produced by [`LayoutGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLayout {
    /// The mine layout.
    pub field: MineField,
    /// The cell the first click opens; it always shows zero.
    pub start: Position,
    /// Number of random placements tried, including the accepted one.
    pub attempts: usize,
}

/// Errors returned by [`LayoutGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GenerateError {
    /// The parameters cannot describe a playable game.
    #[display("invalid parameters: {_0}")]
    InvalidParams(ParamsError),
    /// The starting cell is not on the grid.
    #[display("starting cell {_0} is outside the grid")]
    #[from(ignore)]
    StartOutOfBounds(#[error(not(source))] Position),
    /// No acceptable layout was found within the attempt limit.
    #[display("no solvable layout found after {attempts} attempts")]
    #[from(ignore)]
    Exhausted {
        /// Number of layouts tried.
        attempts: usize,
    },
}

/// Generates mine layouts, optionally ones that can be cleared without guessing.
///
/// Mines are scattered at random outside the 3×3 block around the starting
/// cell. When uniqueness is requested the layout is solved from the starting
/// cell with a [`GenerationOracle`] that moves mines whenever the solver gets
/// stuck. The solve is repeated on the moved layout until it needs no moves at
/// all; if a run fails, or needs at least as many moves as the run before it,
/// the layout is thrown away and a new one is scattered.
///
/// # Examples
///
/// ```
/// use mines_core::{GameParams, Position};
/// use mines_generator::{LayoutGenerator, LayoutSeed};
///
/// let generator = LayoutGenerator::default();
/// let params = GameParams::new(9, 9, 10, true);
/// let start = Position::new(4, 4);
/// let layout = generator.generate_with_seed(&params, start, LayoutSeed::from_text("doc"))?;
/// assert_eq!(layout.field.mine_count(), 10);
/// assert_eq!(layout.field.adjacent_mines(start), 0);
/// # Ok::<(), mines_generator::GenerateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayoutGenerator {
    config: GeneratorConfig,
    solver: MineSolver,
}

impl LayoutGenerator {
    /// Creates a generator with the given settings.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            solver: MineSolver::new(config.solver),
        }
    }

    /// Returns the generator settings.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a layout for a game whose first click is `start`, drawing
    /// randomness from a fresh generator seeded with `seed`.
    ///
    /// # Errors
    ///
    /// See [`LayoutGenerator::generate`].
    pub fn generate_with_seed(
        &self,
        params: &GameParams,
        start: Position,
        seed: LayoutSeed,
    ) -> Result<GeneratedLayout, GenerateError> {
        self.generate(params, start, &mut seed.rng())
    }

    /// Generates a layout for a game whose first click is `start`.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::InvalidParams`] if `params` fails validation.
    /// - [`GenerateError::StartOutOfBounds`] if `start` is not on the grid.
    /// - [`GenerateError::Exhausted`] if [`GeneratorConfig::max_attempts`] is
    ///   reached.
    pub fn generate<R>(
        &self,
        params: &GameParams,
        start: Position,
        rng: &mut R,
    ) -> Result<GeneratedLayout, GenerateError>
    where
        R: Rng + ?Sized,
    {
        params.validate(false)?;
        let size = params.size();
        if !size.contains(start) {
            return Err(GenerateError::StartOutOfBounds(start));
        }

        let mut candidates: Vec<Position> = size
            .positions()
            .filter(|pos| !pos.is_within_one(start))
            .collect();

        let mut attempts = 0;
        loop {
            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                log::warn!("giving up on {params} after {attempts} attempts");
                return Err(GenerateError::Exhausted { attempts });
            }
            attempts += 1;

            let allow_big_perturbations = attempts > self.config.big_perturbation_threshold;
            if attempts == self.config.big_perturbation_threshold + 1 {
                log::info!("allowing whole-region perturbations after {attempts} attempts");
            }

            let (mines, _) = candidates.partial_shuffle(rng, params.mine_count);
            let mut field = MineField::from_mines(size, mines.iter().copied());

            if !params.unique || self.converge(&mut field, start, allow_big_perturbations, rng) {
                log::info!("accepted layout for {params} after {attempts} attempts");
                return Ok(GeneratedLayout {
                    field,
                    start,
                    attempts,
                });
            }
        }
    }

    /// Solves and perturbs `field` until a solve needs no perturbation.
    ///
    /// Returns `false` if the layout should be thrown away.
    fn converge<R>(
        &self,
        field: &mut MineField,
        start: Position,
        allow_big_perturbations: bool,
        rng: &mut R,
    ) -> bool
    where
        R: Rng + ?Sized,
    {
        let total = field.mine_count();
        let mut previous: Option<usize> = None;
        loop {
            let mut grid = KnowledgeGrid::new(field.size());
            grid.set(start, Knowledge::Clear(field.adjacent_mines(start)));
            let mut oracle = GenerationOracle::new(field, start, allow_big_perturbations);
            match self.solver.solve(&mut grid, Some(total), &mut oracle, rng) {
                Ok(SolveOutcome::Solved { perturbations: 0 }) => return true,
                Ok(SolveOutcome::Solved { perturbations }) => {
                    if previous.is_some_and(|p| perturbations >= p) {
                        log::debug!(
                            "rejecting layout: {perturbations} perturbations, {previous:?} before"
                        );
                        return false;
                    }
                    log::trace!("solved with {perturbations} perturbations, retrying");
                    previous = Some(perturbations);
                }
                Ok(SolveOutcome::Stalled) => {
                    log::debug!("rejecting layout: solver stalled");
                    return false;
                }
                Err(e) => {
                    log::warn!("rejecting layout: {e}");
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mines_core::GridSize;
    use mines_solver::FieldOracle;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn assert_no_guessing(layout: &GeneratedLayout) {
        let mut grid = KnowledgeGrid::new(layout.field.size());
        grid.set(
            layout.start,
            Knowledge::Clear(layout.field.adjacent_mines(layout.start)),
        );
        let outcome = MineSolver::default().solve(
            &mut grid,
            Some(layout.field.mine_count()),
            &mut FieldOracle::new(&layout.field),
            &mut Pcg64::seed_from_u64(0),
        );
        assert_eq!(outcome, Ok(SolveOutcome::Solved { perturbations: 0 }));
        assert!(grid.is_complete());
    }

    #[test]
    fn test_unique_layouts_need_no_guessing() {
        let generator = LayoutGenerator::default();
        let mut rng = Pcg64::seed_from_u64(7);
        for (params, start) in [
            (GameParams::new(9, 9, 10, true), Position::new(4, 4)),
            (GameParams::new(16, 16, 40, true), Position::new(0, 0)),
            (GameParams::new(8, 5, 6, true), Position::new(7, 2)),
        ] {
            let layout = generator.generate(&params, start, &mut rng).unwrap();
            assert_eq!(layout.field.size(), params.size());
            assert_eq!(layout.field.mine_count(), params.mine_count);
            assert_eq!(layout.field.adjacent_mines(start), 0);
            assert!(!layout.field.is_mine(start));
            assert!(layout.attempts >= 1);
            assert_no_guessing(&layout);
        }
    }

    #[test]
    fn test_non_unique_accepts_first_layout() {
        let generator = LayoutGenerator::default();
        let params = GameParams::new(9, 9, 60, false);
        let start = Position::new(0, 8);
        let layout = generator
            .generate(&params, start, &mut Pcg64::seed_from_u64(1))
            .unwrap();
        assert_eq!(layout.attempts, 1);
        assert_eq!(layout.field.mine_count(), 60);
        assert!(
            GridSize::new(9, 9)
                .neighborhood(start)
                .all(|pos| !layout.field.is_mine(pos))
        );
    }

    #[test]
    fn test_same_seed_same_layout() {
        let generator = LayoutGenerator::default();
        let params = GameParams::default();
        let start = Position::new(2, 6);
        let seed = LayoutSeed::from_text("repeatable");
        let a = generator.generate_with_seed(&params, start, seed).unwrap();
        let b = generator.generate_with_seed(&params, start, seed).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_errors() {
        let generator = LayoutGenerator::default();
        let mut rng = Pcg64::seed_from_u64(2);

        let params = GameParams::new(4, 4, 8, false);
        assert_eq!(
            generator.generate(&params, Position::new(0, 0), &mut rng),
            Err(GenerateError::InvalidParams(ParamsError::TooManyMines))
        );

        let params = GameParams::default();
        assert_eq!(
            generator.generate(&params, Position::new(9, 0), &mut rng),
            Err(GenerateError::StartOutOfBounds(Position::new(9, 0)))
        );

        let generator = LayoutGenerator::new(GeneratorConfig {
            max_attempts: Some(0),
            ..GeneratorConfig::default()
        });
        assert_eq!(
            generator.generate(&params, Position::new(0, 0), &mut rng),
            Err(GenerateError::Exhausted { attempts: 0 })
        );
    }
}
