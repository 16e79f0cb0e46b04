//! Minesweeper game sessions.
//!
//! A [`Game`] holds what the player sees of a [`MineLayout`]: which cells are
//! opened, flagged or still unknown. The layout is shared between every clone
//! of a game and may be generated lazily on the first click, so the first
//! opened cell is always a zero.
//!
//! # Overview
//!
//! - [`Game`]: opening cells with flood fill, flags, chords, solving, and the
//!   status line.
//! - [`CellState`]: what a single cell shows.
//! - [`Move`]: the replayable text form of player actions.
//! - [`MineLayout`]: the fixed or pending layout behind a game.
//!
//! # Examples
//!
//! ```
//! use mines_core::{GameParams, Position};
//! use mines_game::{Game, GameStatus};
//!
//! let params = GameParams::default();
//! let mut game = Game::new(&params, "4,4,u000000000000000000000")?;
//! assert_eq!(game.status(), GameStatus::Won);
//! # Ok::<(), mines_game::GameError>(())
//! ```

mod cell_state;
mod error;
mod game;
mod layout;
mod moves;

pub use self::{
    cell_state::CellState,
    error::GameError,
    game::{Game, GameStatus},
    layout::MineLayout,
    moves::{Move, MoveParseError},
};
