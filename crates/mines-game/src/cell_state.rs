use std::fmt::{self, Display};

/// What the player sees in a single cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum CellState {
    /// Not opened yet.
    #[default]
    Unknown,
    /// Marked as a mine by the player, or automatically on a win.
    Flagged,
    /// Opened, showing the number of adjacent mines.
    Revealed(u8),
    /// The mine that ended the game.
    Exploded,
    /// A mine the player missed, shown by solving after a loss.
    Mine,
    /// A flag on a safe cell, shown by solving after a loss.
    WrongFlag,
}

impl CellState {
    /// Returns `true` if the cell has not been opened, flagged or not.
    #[must_use]
    pub fn is_covered(self) -> bool {
        matches!(self, Self::Unknown | Self::Flagged)
    }

    /// Returns the character used for this cell in text output.
    ///
    /// # Examples
    ///
    /// ```
    /// use mines_game::CellState;
    ///
    /// assert_eq!(CellState::Revealed(0).to_char(), '-');
    /// assert_eq!(CellState::Revealed(3).to_char(), '3');
    /// assert_eq!(CellState::Flagged.to_char(), '*');
    /// assert_eq!(CellState::Unknown.to_char(), '?');
    /// assert_eq!(CellState::Exploded.to_char(), '!');
    /// ```
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Self::Revealed(0) => '-',
            Self::Revealed(n) => char::from_digit(u32::from(n), 10).unwrap_or('#'),
            Self::Flagged => '*',
            Self::Unknown => '?',
            Self::Exploded | Self::Mine | Self::WrongFlag => '!',
        }
    }
}

impl Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
