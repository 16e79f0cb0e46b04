use std::rc::Rc;

use mines_core::{GameParams, GridSize, MineField, Position};
use mines_generator::{LayoutGenerator, PuzzleDescriptor};

use crate::{CellState, GameError, MineLayout, Move};

/// Overall state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameStatus {
    /// Still being played.
    Ongoing,
    /// Every safe cell was opened by the player.
    Won,
    /// A mine was opened, or the solution was revealed with [`Game::solve`].
    Lost,
}

/// A Minesweeper game session.
///
/// Tracks what the player can see of a [`MineLayout`]. Cloning a game is cheap
/// and the clone shares the layout, so a layout generated by the first click
/// in one state is visible from every other state of the same game.
///
/// # Example
///
/// ```
/// use mines_core::{GameParams, Position};
/// use mines_game::{CellState, Game};
///
/// let params = GameParams::default();
/// let seed = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
/// let mut game = Game::new(&params, &format!("r10,u,{seed}"))?;
/// assert_eq!(game.status_text(), "Marked: 0 / 10");
///
/// game.open(Position::new(4, 4))?;
/// assert_eq!(game.cell(Position::new(4, 4)), CellState::Revealed(0));
/// assert!(game.resolved_descriptor().unwrap().starts_with("4,4,m"));
/// # Ok::<(), mines_game::GameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Game {
    layout: Rc<MineLayout>,
    cells: Vec<CellState>,
    dead: bool,
    won: bool,
    used_solve: bool,
}

impl Game {
    /// Creates a game from parameters and a descriptor.
    ///
    /// A resolved descriptor with a starting cell opens that cell right away.
    /// An unresolved one is generated when the first cell is opened.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidParams`] or [`GameError::InvalidDescriptor`]
    /// if either fails validation.
    pub fn new(params: &GameParams, descriptor: &str) -> Result<Self, GameError> {
        Self::with_generator(params, descriptor, LayoutGenerator::default())
    }

    /// Like [`Game::new`], with the generator used for an unresolved descriptor.
    ///
    /// # Errors
    ///
    /// See [`Game::new`].
    pub fn with_generator(
        params: &GameParams,
        descriptor: &str,
        generator: LayoutGenerator,
    ) -> Result<Self, GameError> {
        params.validate(false)?;
        let size = params.size();
        match PuzzleDescriptor::parse(size, descriptor)? {
            PuzzleDescriptor::Resolved { start, field, .. } => {
                let mut game = Self::from_layout(MineLayout::fixed(field));
                if let Some(start) = start {
                    game.open(start)?;
                }
                Ok(game)
            }
            PuzzleDescriptor::Unresolved {
                mine_count,
                unique,
                seed,
            } => Ok(Self::from_layout(MineLayout::pending(
                size, mine_count, unique, seed, generator,
            ))),
        }
    }

    /// Creates a game over a hand-built layout with nothing opened.
    ///
    /// # Example
    ///
    /// ```
    /// use mines_core::{MineField, Position};
    /// use mines_game::Game;
    ///
    /// let field: MineField = "***\n*.*\n***".parse().unwrap();
    /// let mut game = Game::from_field(field);
    /// game.open(Position::new(1, 1))?;
    /// assert!(game.status().is_won());
    /// assert_eq!(game.text_format(), "***\n*8*\n***\n");
    /// # Ok::<(), mines_game::GameError>(())
    /// ```
    #[must_use]
    pub fn from_field(field: MineField) -> Self {
        Self::from_layout(MineLayout::fixed(field))
    }

    fn from_layout(layout: MineLayout) -> Self {
        let area = layout.size().area();
        Self {
            layout: Rc::new(layout),
            cells: vec![CellState::Unknown; area],
            dead: false,
            won: false,
            used_solve: false,
        }
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.layout.size()
    }

    /// Returns the number of mines in the layout.
    #[must_use]
    pub fn mine_count(&self) -> usize {
        self.layout.mine_count()
    }

    /// Returns the shared layout.
    #[must_use]
    pub fn layout(&self) -> &MineLayout {
        &self.layout
    }

    /// Returns the descriptor that replaces an unresolved one once the first
    /// cell has been opened.
    #[must_use]
    pub fn resolved_descriptor(&self) -> Option<&str> {
        self.layout.resolved_descriptor()
    }

    /// Returns the state of the cell at `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the grid.
    #[must_use]
    pub fn cell(&self, pos: Position) -> CellState {
        self.cells[self.size().index_of(pos)]
    }

    fn set_cell(&mut self, pos: Position, state: CellState) {
        let index = self.size().index_of(pos);
        self.cells[index] = state;
    }

    fn check_move(&self, pos: Position) -> Result<(), GameError> {
        if self.dead {
            return Err(GameError::GameOver);
        }
        if !self.size().contains(pos) {
            return Err(GameError::OutOfBounds(pos));
        }
        Ok(())
    }

    /// Opens the cell at `pos`.
    ///
    /// Opening a mine loses the game and exposes only that mine. Opening a cell
    /// with no adjacent mines also opens its unknown neighbours, repeatedly.
    /// When the only covered cells left are mines, they are all flagged and the
    /// game is won. Opening a cell that is not [`CellState::Unknown`] does
    /// nothing. On a game whose layout is still pending, this generates the
    /// layout with `pos` as the first click.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameOver`] if the player has already lost.
    /// - [`GameError::OutOfBounds`] if `pos` is outside the grid.
    /// - [`GameError::Generate`] if the pending layout cannot be generated.
    pub fn open(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_move(pos)?;
        self.open_cell(pos)
    }

    fn open_cell(&mut self, pos: Position) -> Result<(), GameError> {
        if !self.cell(pos).is_unknown() {
            return Ok(());
        }
        let layout = Rc::clone(&self.layout);
        let field = layout.resolve(pos)?;

        if field.is_mine(pos) {
            log::debug!("mine opened at {pos}");
            self.dead = true;
            self.set_cell(pos, CellState::Exploded);
            return Ok(());
        }

        let size = self.size();
        let mut todo = vec![pos];
        while let Some(pos) = todo.pop() {
            if !self.cell(pos).is_unknown() {
                continue;
            }
            let count = field.adjacent_mines(pos);
            self.set_cell(pos, CellState::Revealed(count));
            if count == 0 {
                todo.extend(size.neighbors(pos).filter(|&p| self.cell(p).is_unknown()));
            }
        }

        // A player who has already lost cannot also win.
        if self.dead {
            return Ok(());
        }
        let covered = self.cells.iter().filter(|c| c.is_covered()).count();
        debug_assert!(covered >= field.mine_count());
        if covered == field.mine_count() {
            for cell in &mut self.cells {
                if cell.is_covered() {
                    *cell = CellState::Flagged;
                }
            }
            self.won = true;
            log::debug!("all safe cells opened");
        }
        Ok(())
    }

    /// Toggles the flag on the cell at `pos`.
    ///
    /// # Errors
    ///
    /// - [`GameError::GameOver`] if the player has already lost.
    /// - [`GameError::OutOfBounds`] if `pos` is outside the grid.
    /// - [`GameError::InvalidMove`] if the cell has been opened.
    pub fn toggle_flag(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_move(pos)?;
        match self.cell(pos) {
            CellState::Unknown => self.set_cell(pos, CellState::Flagged),
            CellState::Flagged => self.set_cell(pos, CellState::Unknown),
            _ => return Err(GameError::InvalidMove(pos)),
        }
        Ok(())
    }

    /// Opens every unknown cell in the 3×3 block around `pos`.
    ///
    /// Flagged cells are left alone, so chording a number whose mines are all
    /// flagged opens the rest of its neighbours. Every unknown cell is opened
    /// even if an earlier one was a mine.
    ///
    /// # Errors
    ///
    /// See [`Game::open`].
    pub fn chord(&mut self, pos: Position) -> Result<(), GameError> {
        self.check_move(pos)?;
        let size = self.size();
        for p in size.neighborhood(pos) {
            self.open_cell(p)?;
        }
        Ok(())
    }

    /// Reveals the solution.
    ///
    /// A player who is still alive sees the whole layout as if they had
    /// cleared it. A player who has lost sees the mines they missed and the
    /// flags they placed wrongly. Either way the game counts as lost.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotStarted`] if the layout has not been generated.
    pub fn solve(&mut self) -> Result<(), GameError> {
        let layout = Rc::clone(&self.layout);
        let field = layout.field().ok_or(GameError::NotStarted)?;
        let size = self.size();

        for pos in size.positions() {
            let cell = self.cell(pos);
            let mine = field.is_mine(pos);
            let solved = if !self.dead {
                if mine {
                    CellState::Flagged
                } else {
                    CellState::Revealed(field.adjacent_mines(pos))
                }
            } else if cell.is_unknown() && mine {
                CellState::Mine
            } else if cell.is_flagged() && !mine {
                CellState::WrongFlag
            } else {
                cell
            };
            self.set_cell(pos, solved);
        }
        if !self.dead {
            self.won = true;
        }
        self.used_solve = true;
        Ok(())
    }

    /// Applies a single move.
    ///
    /// # Errors
    ///
    /// Returns the error of the corresponding operation.
    pub fn apply_move(&mut self, mv: &Move) -> Result<(), GameError> {
        match *mv {
            Move::Flag(pos) => self.toggle_flag(pos),
            Move::Open(pos) => self.open(pos),
            Move::Chord(pos) => self.chord(pos),
            Move::Solve => self.solve(),
        }
    }

    /// Parses and applies a `;`-separated sequence of moves.
    ///
    /// Either every move is applied or, on error, none is.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ParseMove`] if the text is malformed, or the error
    /// of the first move that fails.
    pub fn apply_moves(&mut self, moves: &str) -> Result<(), GameError> {
        let moves = Move::parse_sequence(moves)?;
        let mut next = self.clone();
        for mv in &moves {
            next.apply_move(mv)?;
        }
        *self = next;
        Ok(())
    }

    /// Returns the overall state of the game.
    ///
    /// Revealing the solution with [`Game::solve`] counts as a loss even if
    /// the player was still alive.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.dead || (self.won && self.used_solve) {
            GameStatus::Lost
        } else if self.won {
            GameStatus::Won
        } else {
            GameStatus::Ongoing
        }
    }

    /// Returns the status line shown below the grid.
    ///
    /// # Example
    ///
    /// ```
    /// use mines_core::{MineField, Position};
    /// use mines_game::Game;
    ///
    /// let field: MineField = "*...\n....\n...*".parse().unwrap();
    /// let mut game = Game::from_field(field);
    /// game.toggle_flag(Position::new(0, 0))?;
    /// assert_eq!(game.status_text(), "Marked: 1 / 2");
    /// game.open(Position::new(3, 0))?;
    /// assert_eq!(game.status_text(), "Marked: 1 / 2 (4 safe squares remain)");
    /// # Ok::<(), mines_game::GameError>(())
    /// ```
    #[must_use]
    pub fn status_text(&self) -> String {
        if self.dead {
            return "DEAD!".to_owned();
        }
        if self.won {
            let text = if self.used_solve {
                "Auto-solved."
            } else {
                "COMPLETED!"
            };
            return text.to_owned();
        }

        let mines = self.mine_count();
        let markers = self.cells.iter().filter(|c| c.is_flagged()).count();
        let closed = self.cells.iter().filter(|c| c.is_covered()).count();
        let mut text = format!("Marked: {markers} / {mines}");
        match closed.saturating_sub(mines) {
            1 => text.push_str(" (1 safe square remains)"),
            n @ 2..=9 => text.push_str(&format!(" ({n} safe squares remain)")),
            _ => {}
        }
        text
    }

    /// Returns the grid as text, one row per line.
    ///
    /// See [`CellState::to_char`] for the characters used.
    #[must_use]
    pub fn text_format(&self) -> String {
        let width = self.size().width();
        let mut text = String::with_capacity((width + 1) * self.size().height());
        for row in self.cells.chunks(width) {
            text.extend(row.iter().map(|c| c.to_char()));
            text.push('\n');
        }
        text
    }
}
