//! Generation parameters and their textual form.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::GridSize;

/// Largest accepted width or height.
const MAX_DIMENSION: usize = 32767;

/// Exclusive upper bound on the grid area.
const MAX_AREA: usize = (1 << 28) - 1;

/// Number of cells in the clear area around the first click.
const START_AREA: usize = 9;

/// Parameters controlling layout generation.
///
/// # Text format
///
/// `<w>x<h>n<mines>[a]`: width, height, mine count and an optional trailing `a`
/// that disables the uniqueness requirement. [`GameParams::decode`] is lenient in
/// the same way hand-typed game IDs need it to be:
///
/// - a missing `x<h>` makes the grid square,
/// - a missing `n<mines>` uses a tenth of the area,
/// - an `a` anywhere after the mine count disables uniqueness,
/// - anything else is skipped.
///
/// # Examples
///
/// ```
/// use mines_core::GameParams;
///
/// let params = GameParams::decode("16x16n40");
/// assert_eq!((params.width, params.height, params.mine_count), (16, 16, 40));
/// assert!(params.unique);
///
/// let params = GameParams::decode("10a");
/// assert_eq!((params.width, params.height, params.mine_count), (10, 10, 10));
/// assert!(!params.unique);
/// assert_eq!(params.to_string(), "10x10n10a");
/// assert_eq!(params.encode(false), "10x10");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameParams {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of mines to place.
    pub mine_count: usize,
    /// Whether the layout must be solvable without guessing.
    pub unique: bool,
}

impl Default for GameParams {
    fn default() -> Self {
        Self::new(9, 9, 10, true)
    }
}

impl GameParams {
    /// Built-in presets, from beginner to expert sizes.
    pub const PRESETS: [Self; 6] = [
        Self::new(9, 9, 10, true),
        Self::new(9, 9, 35, true),
        Self::new(16, 16, 40, true),
        Self::new(16, 16, 99, true),
        Self::new(30, 16, 99, true),
        Self::new(30, 16, 170, true),
    ];

    /// Creates parameters.
    #[must_use]
    pub const fn new(width: usize, height: usize, mine_count: usize, unique: bool) -> Self {
        Self {
            width,
            height,
            mine_count,
            unique,
        }
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.width, self.height)
    }

    /// Returns the menu label of these parameters, e.g. `9x9, 10 mines`.
    #[must_use]
    pub fn preset_name(&self) -> String {
        format!("{}x{}, {} mines", self.width, self.height, self.mine_count)
    }

    /// Parses a parameters string without validating it.
    ///
    /// This never fails; see the type-level documentation for how incomplete
    /// strings are filled in. Use [`GameParams::validate`] (or [`FromStr`], which
    /// does both) before generating from the result.
    #[must_use]
    pub fn decode(s: &str) -> Self {
        let mut cursor = Cursor::new(s);
        let mut params = Self::default();

        params.width = cursor.number();
        params.height = if cursor.eat(b'x') {
            cursor.number()
        } else {
            params.width
        };
        if cursor.eat(b'n') {
            params.mine_count = cursor.number();
            cursor.skip_while(|b| b == b'.' || b.is_ascii_digit());
        } else if params.width > 0
            && params.height > 0
            && let Some(area) = params.width.checked_mul(params.height)
        {
            params.mine_count = area / 10;
        }

        params.unique = !cursor.rest().contains(&b'a');
        params
    }

    /// Encodes the parameters.
    ///
    /// The mine count and uniqueness flag are generation-time parameters: they can
    /// be recovered from a resolved layout, so they are only emitted when `full`
    /// is set.
    #[must_use]
    pub fn encode(&self, full: bool) -> String {
        let mut s = format!("{}x{}", self.width, self.height);
        if full {
            s.push_str(&format!("n{}", self.mine_count));
            if !self.unique {
                s.push('a');
            }
        }
        s
    }

    /// Checks that the parameters describe a playable grid.
    ///
    /// `full` adds the checks that only matter at generation time: a grid that must
    /// be solvable without guessing needs both dimensions to exceed two, because
    /// 2×n grids are frequently impossible to disambiguate.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamsError`] found.
    pub fn validate(&self, full: bool) -> Result<(), ParamsError> {
        if full && self.unique && (self.width <= 2 || self.height <= 2) {
            return Err(ParamsError::TooSmallForUnique);
        }
        if self.width < 1 || self.height < 1 {
            return Err(ParamsError::TooSmall);
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ParamsError::TooLarge);
        }
        if self.width > MAX_AREA / self.height {
            return Err(ParamsError::AreaTooLarge);
        }
        if self.mine_count.saturating_add(START_AREA) > self.width * self.height {
            return Err(ParamsError::TooManyMines);
        }
        Ok(())
    }
}

impl Display for GameParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(true))
    }
}

impl FromStr for GameParams {
    type Err = ParamsError;

    /// Decodes and fully validates a parameters string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let params = Self::decode(s);
        params.validate(true)?;
        Ok(params)
    }
}

/// Reasons a [`GameParams`] value cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParamsError {
    /// A uniquely solvable grid was requested with a dimension of two or less.
    #[display("Width and height must both be greater than two")]
    TooSmallForUnique,
    /// A dimension is zero.
    #[display("Width and height must both be at least one")]
    TooSmall,
    /// A dimension exceeds the supported maximum.
    #[display("Neither width nor height may be unreasonably large")]
    TooLarge,
    /// The area exceeds the supported maximum.
    #[display("Width times height must not be unreasonably large")]
    AreaTooLarge,
    /// The mines do not fit outside the clear area around the first click.
    #[display("Too many mines for grid size")]
    TooManyMines,
}

/// Byte cursor for the lenient parameter grammar.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.bytes.get(self.pos) == Some(&b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_while(&mut self, mut pred: impl FnMut(u8) -> bool) {
        while self.bytes.get(self.pos).is_some_and(|&b| pred(b)) {
            self.pos += 1;
        }
    }

    /// Reads a decimal number, yielding 0 when there are no digits.
    fn number(&mut self) -> usize {
        let mut n = 0usize;
        while let Some(&b) = self.bytes.get(self.pos)
            && b.is_ascii_digit()
        {
            n = n.saturating_mul(10).saturating_add(usize::from(b - b'0'));
            self.pos += 1;
        }
        n
    }

    fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full() {
        let params = GameParams::decode("30x16n170");
        assert_eq!(params, GameParams::new(30, 16, 170, true));
    }

    #[test]
    fn test_decode_fills_missing_parts() {
        assert_eq!(GameParams::decode("12"), GameParams::new(12, 12, 14, true));
        assert_eq!(GameParams::decode("8x5"), GameParams::new(8, 5, 4, true));
    }

    #[test]
    fn test_decode_skips_fraction_and_gunk() {
        let params = GameParams::decode("9x9n10.5zza");
        assert_eq!(params, GameParams::new(9, 9, 10, false));
    }

    #[test]
    fn test_encode() {
        let params = GameParams::new(16, 16, 40, false);
        assert_eq!(params.encode(false), "16x16");
        assert_eq!(params.encode(true), "16x16n40a");
        assert_eq!(GameParams::default().to_string(), "9x9n10");
    }

    #[test]
    fn test_validate() {
        assert_eq!(GameParams::new(9, 9, 72, true).validate(true), Ok(()));
        assert_eq!(
            GameParams::new(9, 9, 73, true).validate(true),
            Err(ParamsError::TooManyMines)
        );
        assert_eq!(
            GameParams::new(2, 9, 1, true).validate(true),
            Err(ParamsError::TooSmallForUnique)
        );
        assert_eq!(GameParams::new(2, 9, 1, false).validate(true), Ok(()));
        assert_eq!(GameParams::new(2, 9, 1, true).validate(false), Ok(()));
        assert_eq!(
            GameParams::new(0, 9, 0, false).validate(false),
            Err(ParamsError::TooSmall)
        );
        assert_eq!(
            GameParams::new(40_000, 3, 0, false).validate(false),
            Err(ParamsError::TooLarge)
        );
        assert_eq!(
            GameParams::new(30_000, 30_000, 0, false).validate(false),
            Err(ParamsError::AreaTooLarge)
        );
    }

    #[test]
    fn test_from_str_validates() {
        assert_eq!("9x9n10".parse(), Ok(GameParams::default()));
        assert_eq!(
            "3x3n1".parse::<GameParams>(),
            Err(ParamsError::TooManyMines)
        );
        assert_eq!(
            "3x3n1".parse::<GameParams>().unwrap_err().to_string(),
            "Too many mines for grid size"
        );
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in GameParams::PRESETS {
            assert_eq!(preset.validate(true), Ok(()), "{}", preset.preset_name());
        }
    }
}
