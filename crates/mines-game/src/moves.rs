use std::{
    fmt::{self, Display},
    str::FromStr,
};

use mines_core::Position;

/// A single player action, in the form games are replayed from.
///
/// # Text format
///
/// `F<x>,<y>` toggles a flag, `O<x>,<y>` opens a cell, `C<x>,<y>` opens every
/// unknown cell around one, and `S` solves the game. A sequence of moves is
/// joined with `;`.
///
/// # Examples
///
/// ```
/// use mines_core::Position;
/// use mines_game::Move;
///
/// let moves = Move::parse_sequence("O4,4;F0,1")?;
/// assert_eq!(moves, [Move::Open(Position::new(4, 4)), Move::Flag(Position::new(0, 1))]);
/// assert_eq!(Move::format_sequence(&moves), "O4,4;F0,1");
/// # Ok::<(), mines_game::MoveParseError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// Toggles the flag on a covered cell.
    Flag(Position),
    /// Opens a cell.
    Open(Position),
    /// Opens every unknown cell in the 3×3 block around a cell.
    Chord(Position),
    /// Reveals the solution.
    Solve,
}

/// The text of a move could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid move {_0:?}")]
pub struct MoveParseError(#[error(not(source))] String);

impl Move {
    /// Parses moves joined with `;`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveParseError`] naming the first move that fails to parse.
    pub fn parse_sequence(s: &str) -> Result<Vec<Self>, MoveParseError> {
        s.split(';').map(str::parse).collect()
    }

    /// Joins moves with `;`.
    #[must_use]
    pub fn format_sequence(moves: &[Self]) -> String {
        moves
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(pos) => write!(f, "F{pos}"),
            Self::Open(pos) => write!(f, "O{pos}"),
            Self::Chord(pos) => write!(f, "C{pos}"),
            Self::Solve => f.write_str("S"),
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || MoveParseError(s.to_owned());
        if s == "S" {
            return Ok(Self::Solve);
        }
        let mut chars = s.chars();
        let kind = chars.next().ok_or_else(error)?;
        let (x, y) = chars.as_str().split_once(',').ok_or_else(error)?;
        let x = x.parse().map_err(|_| error())?;
        let y = y.parse().map_err(|_| error())?;
        let pos = Position::new(x, y);
        match kind {
            'F' => Ok(Self::Flag(pos)),
            'O' => Ok(Self::Open(pos)),
            'C' => Ok(Self::Chord(pos)),
            _ => Err(error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_moves() {
        assert_eq!("S".parse(), Ok(Move::Solve));
        assert_eq!("C10,2".parse(), Ok(Move::Chord(Position::new(10, 2))));
        assert_eq!(
            Move::parse_sequence("F0,0;O1,2"),
            Ok(vec![
                Move::Flag(Position::new(0, 0)),
                Move::Open(Position::new(1, 2)),
            ])
        );
    }

    #[test]
    fn test_reject_malformed_moves() {
        for s in ["", "X1,2", "O1", "O1,", "O-1,2", "F1,2,3", "s"] {
            assert_eq!(
                s.parse::<Move>(),
                Err(MoveParseError(s.to_owned())),
                "{s:?}"
            );
        }
        assert_eq!(
            Move::parse_sequence("O1,1;Q"),
            Err(MoveParseError("Q".to_owned()))
        );
    }
}
