use mines_core::{ParamsError, Position};
use mines_generator::{DescriptorError, GenerateError};

use crate::MoveParseError;

/// Errors that can occur during game operations.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GameError {
    /// The game parameters are invalid.
    #[display("{_0}")]
    InvalidParams(ParamsError),
    /// The game descriptor is invalid.
    #[display("{_0}")]
    InvalidDescriptor(DescriptorError),
    /// The layout could not be generated on the first click.
    #[display("{_0}")]
    Generate(GenerateError),
    /// The move text could not be parsed.
    #[display("{_0}")]
    ParseMove(MoveParseError),
    /// The layout does not exist until the first cell is opened.
    #[display("Game has not been started yet")]
    #[from(ignore)]
    NotStarted,
    /// The move does not apply to the cell in its current state.
    #[display("invalid move at {_0}")]
    #[from(ignore)]
    InvalidMove(#[error(not(source))] Position),
    /// The position is outside the grid.
    #[display("position {_0} is outside the grid")]
    #[from(ignore)]
    OutOfBounds(#[error(not(source))] Position),
    /// The player has lost and can no longer move.
    #[display("the game is over")]
    #[from(ignore)]
    GameOver,
}
