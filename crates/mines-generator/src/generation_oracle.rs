//! Mine moves applied while a layout is being generated.

use mines_core::{MineField, Position};
use mines_solver::{
    Knowledge, KnowledgeGrid, MineChange, MineDelta, MineOracle, PerturbTarget, Perturbation,
};
use rand::{Rng, seq::SliceRandom as _};

/// A [`MineOracle`] that may move mines in the layout being generated.
///
/// When the solver stalls on a constraint set, the oracle either empties or
/// fills that set by swapping its cells with cells elsewhere on the grid, so
/// the total number of mines never changes. Swap partners are preferred in
/// this order, each group shuffled:
///
/// 1. unknown cells bordering known territory,
/// 2. other unknown cells,
/// 3. known cells, as a last resort.
///
/// Cells within one step of the starting click are never touched, so the
/// first click always opens a zero.
#[derive(Debug)]
pub struct GenerationOracle<'a> {
    field: &'a mut MineField,
    start: Position,
    allow_big_perturbations: bool,
}

impl<'a> GenerationOracle<'a> {
    /// Creates an oracle over `field` for a game that starts at `start`.
    ///
    /// `allow_big_perturbations` permits rewriting the whole unknown region when
    /// no constraint sets are left, which succeeds more often on dense grids at
    /// the cost of less natural layouts.
    #[must_use]
    pub fn new(field: &'a mut MineField, start: Position, allow_big_perturbations: bool) -> Self {
        Self {
            field,
            start,
            allow_big_perturbations,
        }
    }

    /// Flips one cell in the layout and fixes up the numbers `grid` shows around it.
    fn apply(&mut self, grid: &mut KnowledgeGrid, change: MineChange) {
        let pos = change.pos;
        let mine = change.delta.is_added();
        debug_assert_ne!(self.field.is_mine(pos), mine);
        self.field.set_mine(pos, mine);

        for p in self.field.size().neighborhood(pos) {
            match grid.get(p) {
                Knowledge::Unknown => {}
                _ if p == pos => {
                    let knowledge = if mine {
                        Knowledge::Mine
                    } else {
                        Knowledge::Clear(self.field.adjacent_mines(p))
                    };
                    grid.set(p, knowledge);
                }
                Knowledge::Clear(n) => {
                    let n = if mine {
                        n.saturating_add(1)
                    } else {
                        n.saturating_sub(1)
                    };
                    grid.set(p, Knowledge::Clear(n));
                }
                Knowledge::Mine => {}
            }
        }
    }
}

impl MineOracle for GenerationOracle<'_> {
    fn open(&mut self, pos: Position) -> Option<u8> {
        (!self.field.is_mine(pos)).then(|| self.field.adjacent_mines(pos))
    }

    fn perturb<R>(
        &mut self,
        grid: &mut KnowledgeGrid,
        target: PerturbTarget,
        rng: &mut R,
    ) -> Option<Perturbation>
    where
        R: Rng + ?Sized,
    {
        if target == PerturbTarget::UnknownRegion && !self.allow_big_perturbations {
            return None;
        }

        let size = self.field.size();
        let mut frontier = Vec::new();
        let mut hinterland = Vec::new();
        let mut known = Vec::new();
        for pos in size.positions() {
            if pos.is_within_one(self.start) || target.contains(grid, pos) {
                continue;
            }
            if !grid.get(pos).is_unknown() {
                known.push(pos);
            } else if grid.borders_known(pos) {
                frontier.push(pos);
            } else {
                hinterland.push(pos);
            }
        }
        frontier.shuffle(rng);
        hinterland.shuffle(rng);
        known.shuffle(rng);

        let inside: Vec<Position> = match target {
            PerturbTarget::Set(set) => set.cells().collect(),
            PerturbTarget::UnknownRegion => grid
                .unknown_positions()
                .filter(|pos| !pos.is_within_one(self.start))
                .collect(),
        };
        let (full, mut empty): (Vec<Position>, Vec<Position>) =
            inside.iter().partition(|&&pos| self.field.is_mine(pos));

        // Collect outside cells until there are enough clear ones to take every
        // mine out of the footprint, or enough mines to fill it.
        let mut to_fill = Vec::new();
        let mut to_empty = Vec::new();
        for pos in frontier.into_iter().chain(hinterland).chain(known) {
            if self.field.is_mine(pos) {
                to_empty.push(pos);
            } else {
                to_fill.push(pos);
            }
            if to_fill.len() == full.len() || to_empty.len() == empty.len() {
                break;
            }
        }

        let (outside, outside_delta, inside, inside_delta) = if to_fill.len() == full.len() {
            (to_fill, MineDelta::Added, full, MineDelta::Removed)
        } else if to_empty.len() == empty.len() {
            (to_empty, MineDelta::Removed, empty, MineDelta::Added)
        } else {
            // Not enough of either: fill as much of the footprint as possible.
            if to_empty.is_empty() {
                return None;
            }
            let (chosen, _) = empty.partial_shuffle(rng, to_empty.len());
            let chosen = chosen.to_vec();
            (to_empty, MineDelta::Removed, chosen, MineDelta::Added)
        };

        let changes: Vec<MineChange> = outside
            .into_iter()
            .map(|pos| MineChange {
                pos,
                delta: outside_delta,
            })
            .chain(inside.into_iter().map(|pos| MineChange {
                pos,
                delta: inside_delta,
            }))
            .collect();
        if changes.is_empty() {
            return None;
        }

        log::trace!("moving {} mines around {target:?}", changes.len() / 2);
        for &change in &changes {
            self.apply(grid, change);
        }
        Some(Perturbation::new(changes))
    }
}
