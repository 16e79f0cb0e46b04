//! Textual game descriptors.
//!
//! A descriptor is the shareable form of a single game. It comes in two forms:
//!
//! - Resolved, `<x>,<y>,m<hex>`: the layout is fixed. `x,y` is the cell opened
//!   at the start and may be omitted. `m` marks a bitmap masked with
//!   [`obfuscate`](crate::obfuscate::obfuscate); `u`, or no marker at all, marks
//!   a plain one so descriptors can be written by hand. The bitmap holds one bit
//!   per cell in row-major order, most significant bit first, written as
//!   `ceil(width * height / 4)` hex digits.
//! - Unresolved, `r<mines>,<u|a>,<seed>`: the layout is generated on the first
//!   click from the given [`LayoutSeed`]. `u` requires a layout that can be
//!   cleared without guessing, `a` accepts any.

use std::fmt::{self, Display};

use mines_core::{GameParams, GridSize, MineField, Position};
use rand::Rng;

use crate::{
    GenerateError, LayoutGenerator, LayoutSeed,
    obfuscate::{deobfuscate, obfuscate},
};

/// Cells kept free of mines around the first click.
const START_AREA: usize = 9;

/// A parsed game descriptor.
///
/// # Examples
///
/// ```
/// use mines_core::{GridSize, Position};
/// use mines_generator::PuzzleDescriptor;
///
/// let size = GridSize::new(3, 3);
/// let desc = PuzzleDescriptor::parse(size, "1,1,u808")?;
/// let PuzzleDescriptor::Resolved { start, field, masked } = &desc else {
///     unreachable!();
/// };
/// assert_eq!(*start, Some(Position::new(1, 1)));
/// assert!(field.is_mine(Position::new(2, 2)));
/// assert!(!masked);
/// assert_eq!(desc.to_string(), "1,1,u808");
/// # Ok::<(), mines_generator::DescriptorError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum PuzzleDescriptor {
    /// A fixed layout.
    Resolved {
        /// The cell to open when the game starts.
        start: Option<Position>,
        /// The mine layout.
        field: MineField,
        /// Whether the bitmap is written masked.
        masked: bool,
    },
    /// A layout to be generated on the first click.
    Unresolved {
        /// Number of mines to place.
        mine_count: usize,
        /// Whether the layout must be solvable without guessing.
        unique: bool,
        /// Seed for generation.
        seed: LayoutSeed,
    },
}

/// Reasons a descriptor is rejected.
///
/// The display strings are meant to be shown to players as they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DescriptorError {
    /// `r` is not followed by a mine count.
    #[display("No initial mine count in game description")]
    NoMineCount,
    /// The mine count leaves no room for the clear area around the first click.
    #[display("Too many mines for grid size")]
    TooManyMines,
    /// A number is not followed by a comma.
    #[display("No ',' after initial x-coordinate in game description")]
    NoCommaAfterX,
    /// The uniqueness flag is neither `u` nor `a`.
    #[display("No uniqueness specifier in game description")]
    NoUniqueness,
    /// The uniqueness flag is not followed by a comma.
    #[display("No ',' after uniqueness specifier in game description")]
    NoCommaAfterUniqueness,
    /// The seed is not 64 hex digits.
    #[display("Invalid random state in game description")]
    InvalidRandomState,
    /// The starting column is off the grid.
    #[display("Initial x-coordinate was out of range")]
    XOutOfRange,
    /// The starting column is not followed by a row.
    #[display("No initial y-coordinate in game description")]
    NoY,
    /// The starting row is off the grid.
    #[display("Initial y-coordinate was out of range")]
    YOutOfRange,
    /// The starting row is not followed by a comma.
    #[display("No ',' after initial y-coordinate in game description")]
    NoCommaAfterY,
    /// The bitmap does not have one hex digit per four cells.
    #[display("Game description is wrong length")]
    WrongLength,
    /// The bitmap contains a character that is not a hex digit.
    #[display("Invalid hex digit in game description")]
    InvalidHexDigit,
    /// A layout was required but the descriptor is unresolved.
    #[display("Game description does not contain a mine layout")]
    NoLayout,
}

impl PuzzleDescriptor {
    /// Parses a descriptor for a grid of the given size.
    ///
    /// # Errors
    ///
    /// Returns the first [`DescriptorError`] found.
    pub fn parse(size: GridSize, s: &str) -> Result<Self, DescriptorError> {
        match s.strip_prefix('r') {
            Some(rest) => parse_unresolved(size, rest),
            None => parse_resolved(size, s),
        }
    }

    /// Returns the cell opened at the start of a resolved game.
    #[must_use]
    pub fn start(&self) -> Option<Position> {
        match self {
            Self::Resolved { start, .. } => *start,
            Self::Unresolved { .. } => None,
        }
    }
}

impl Display for PuzzleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved {
                start,
                field,
                masked,
            } => {
                if let Some(start) = start {
                    write!(f, "{start},")?;
                }
                f.write_str(if *masked { "m" } else { "u" })?;
                f.write_str(&layout_hex(field, *masked))
            }
            Self::Unresolved {
                mine_count,
                unique,
                seed,
            } => {
                let unique = if *unique { 'u' } else { 'a' };
                write!(f, "r{mine_count},{unique},{seed}")
            }
        }
    }
}

/// Checks that `s` is a valid descriptor for a grid of the given size.
///
/// # Errors
///
/// Returns the reason the descriptor is rejected.
pub fn validate(size: GridSize, s: &str) -> Result<(), DescriptorError> {
    PuzzleDescriptor::parse(size, s).map(|_| ())
}

/// Writes the resolved descriptor `<x>,<y>,m<hex>` (or `u<hex>` when
/// `obfuscate` is `false`) for `field` started at `start`.
///
/// # Examples
///
/// ```
/// use mines_core::{MineField, Position};
/// use mines_generator::describe_layout;
///
/// let field: MineField = "*..\n...\n..*".parse().unwrap();
/// assert_eq!(describe_layout(&field, Position::new(1, 1), false), "1,1,u808");
/// assert!(describe_layout(&field, Position::new(1, 1), true).starts_with("1,1,m"));
/// ```
#[must_use]
pub fn describe_layout(field: &MineField, start: Position, obfuscate: bool) -> String {
    let marker = if obfuscate { 'm' } else { 'u' };
    format!("{start},{marker}{}", layout_hex(field, obfuscate))
}

/// Creates the descriptor of a new game.
///
/// The starting cell is always drawn from `rng` first, followed by the seed
/// that generation uses, so a batch descriptor and an interactive one made
/// from the same `rng` state describe the same layout once the interactive
/// game is started at that cell.
///
/// With `interactive` the descriptor is unresolved. Otherwise the layout is
/// generated immediately and written masked.
///
/// # Errors
///
/// Returns any [`GenerateError`] from validation or generation.
pub fn new_game_description<R>(
    generator: &LayoutGenerator,
    params: &GameParams,
    rng: &mut R,
    interactive: bool,
) -> Result<String, GenerateError>
where
    R: Rng + ?Sized,
{
    params.validate(false)?;
    let start = Position::new(
        rng.random_range(0..params.width),
        rng.random_range(0..params.height),
    );
    let seed = LayoutSeed::from_rng(rng);

    if interactive {
        let desc = PuzzleDescriptor::Unresolved {
            mine_count: params.mine_count,
            unique: params.unique,
            seed,
        };
        return Ok(desc.to_string());
    }
    let layout = generator.generate_with_seed(params, start, seed)?;
    Ok(describe_layout(&layout.field, start, true))
}

/// Converts a resolved descriptor between its masked and plain forms.
///
/// # Examples
///
/// ```
/// use mines_core::GridSize;
/// use mines_generator::descriptor::toggle_masking;
///
/// let size = GridSize::new(3, 3);
/// let masked = toggle_masking(size, "1,1,u808")?;
/// assert!(masked.starts_with("1,1,m"));
/// assert_eq!(toggle_masking(size, &masked)?, "1,1,u808");
/// # Ok::<(), mines_generator::DescriptorError>(())
/// ```
///
/// # Errors
///
/// Returns [`DescriptorError::NoLayout`] for unresolved descriptors, or the
/// reason the descriptor fails to parse.
pub fn toggle_masking(size: GridSize, s: &str) -> Result<String, DescriptorError> {
    match PuzzleDescriptor::parse(size, s)? {
        PuzzleDescriptor::Resolved {
            start,
            field,
            masked,
        } => Ok(PuzzleDescriptor::Resolved {
            start,
            field,
            masked: !masked,
        }
        .to_string()),
        PuzzleDescriptor::Unresolved { .. } => Err(DescriptorError::NoLayout),
    }
}

fn parse_unresolved(size: GridSize, s: &str) -> Result<PuzzleDescriptor, DescriptorError> {
    let (digits, rest) = split_number(s);
    if digits.is_empty() {
        return Err(DescriptorError::NoMineCount);
    }
    let mine_count = digits
        .parse::<usize>()
        .ok()
        .filter(|n| n.saturating_add(START_AREA) <= size.area())
        .ok_or(DescriptorError::TooManyMines)?;
    let rest = rest
        .strip_prefix(',')
        .ok_or(DescriptorError::NoCommaAfterX)?;
    let unique = match rest.as_bytes().first() {
        Some(b'u') => true,
        Some(b'a') => false,
        _ => return Err(DescriptorError::NoUniqueness),
    };
    let rest = rest[1..]
        .strip_prefix(',')
        .ok_or(DescriptorError::NoCommaAfterUniqueness)?;
    let seed = rest
        .parse()
        .map_err(|_| DescriptorError::InvalidRandomState)?;
    Ok(PuzzleDescriptor::Unresolved {
        mine_count,
        unique,
        seed,
    })
}

fn parse_resolved(size: GridSize, s: &str) -> Result<PuzzleDescriptor, DescriptorError> {
    let mut rest = s;
    let mut start = None;
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        let (digits, tail) = split_number(rest);
        let x = coordinate(digits, size.width()).ok_or(DescriptorError::XOutOfRange)?;
        let tail = tail
            .strip_prefix(',')
            .ok_or(DescriptorError::NoCommaAfterX)?;
        let (digits, tail) = split_number(tail);
        if digits.is_empty() {
            return Err(DescriptorError::NoY);
        }
        let y = coordinate(digits, size.height()).ok_or(DescriptorError::YOutOfRange)?;
        rest = tail
            .strip_prefix(',')
            .ok_or(DescriptorError::NoCommaAfterY)?;
        start = Some(Position::new(x, y));
    }

    let masked = rest.starts_with('m');
    if let Some(tail) = rest.strip_prefix(['m', 'u']) {
        rest = tail;
    }

    let area = size.area();
    if rest.len() != area.div_ceil(4) {
        return Err(DescriptorError::WrongLength);
    }
    let mut bitmap = vec![0; area.div_ceil(8)];
    for (i, c) in rest.chars().enumerate() {
        let nibble = c
            .to_digit(16)
            .and_then(|d| u8::try_from(d).ok())
            .ok_or(DescriptorError::InvalidHexDigit)?;
        bitmap[i / 2] |= if i % 2 == 0 { nibble << 4 } else { nibble };
    }
    if masked {
        deobfuscate(&mut bitmap, area);
    }

    Ok(PuzzleDescriptor::Resolved {
        start,
        field: MineField::from_bitmap(size, &bitmap),
        masked,
    })
}

fn coordinate(digits: &str, limit: usize) -> Option<usize> {
    digits.parse().ok().filter(|&v| v < limit)
}

/// Splits `s` after its leading ASCII digits.
fn split_number(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn layout_hex(field: &MineField, masked: bool) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let area = field.size().area();
    let mut bitmap = field.to_bitmap();
    if masked {
        obfuscate(&mut bitmap, area);
    }
    (0..area.div_ceil(4))
        .map(|i| {
            let byte = bitmap[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0xf };
            char::from(HEX[usize::from(nibble)])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    const SEED: &str = "1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

    fn corners() -> MineField {
        "*..\n...\n..*".parse().unwrap()
    }

    #[test]
    fn test_describe_layout() {
        let field = corners();
        assert_eq!(describe_layout(&field, Position::new(1, 1), false), "1,1,u808");

        let masked = describe_layout(&field, Position::new(0, 2), true);
        assert!(masked.starts_with("0,2,m"));
        assert_eq!(masked.len(), "0,2,m".len() + 3);
        assert_eq!(
            PuzzleDescriptor::parse(field.size(), &masked),
            Ok(PuzzleDescriptor::Resolved {
                start: Some(Position::new(0, 2)),
                field,
                masked: true,
            })
        );
    }

    #[test]
    fn test_parse_hand_written_layout() {
        let size = GridSize::new(3, 3);
        let desc = PuzzleDescriptor::parse(size, "u808").unwrap();
        assert_eq!(
            desc,
            PuzzleDescriptor::Resolved {
                start: None,
                field: corners(),
                masked: false,
            }
        );
        assert_eq!(desc.start(), None);
        assert_eq!(desc.to_string(), "u808");

        let upper = PuzzleDescriptor::parse(GridSize::new(4, 2), "AF").unwrap();
        let PuzzleDescriptor::Resolved { field, .. } = upper else {
            panic!("expected a resolved descriptor");
        };
        assert_eq!(field.mine_count(), 8 - 2);
    }

    #[test]
    fn test_parse_unresolved() {
        let size = GridSize::new(9, 9);
        let text = format!("r10,a,{SEED}");
        let desc = PuzzleDescriptor::parse(size, &text).unwrap();
        assert_eq!(
            desc,
            PuzzleDescriptor::Unresolved {
                mine_count: 10,
                unique: false,
                seed: SEED.parse().unwrap(),
            }
        );
        assert!(desc.is_unresolved());
        assert_eq!(desc.to_string(), text);
        assert_eq!(validate(size, &format!("r72,u,{SEED}")), Ok(()));
    }

    #[test]
    fn test_validation_errors() {
        let size = GridSize::new(9, 9);
        let bitmap = "0".repeat(21);
        let cases = [
            ("r".to_owned(), DescriptorError::NoMineCount),
            ("rx".to_owned(), DescriptorError::NoMineCount),
            (format!("r73,u,{SEED}"), DescriptorError::TooManyMines),
            ("r10".to_owned(), DescriptorError::NoCommaAfterX),
            ("r10,x,".to_owned(), DescriptorError::NoUniqueness),
            ("r10,".to_owned(), DescriptorError::NoUniqueness),
            ("r10,u".to_owned(), DescriptorError::NoCommaAfterUniqueness),
            ("r10,u,zz".to_owned(), DescriptorError::InvalidRandomState),
            (format!("9,0,m{bitmap}"), DescriptorError::XOutOfRange),
            ("1".to_owned(), DescriptorError::NoCommaAfterX),
            ("1,".to_owned(), DescriptorError::NoY),
            (format!("1,9,m{bitmap}"), DescriptorError::YOutOfRange),
            ("1,2".to_owned(), DescriptorError::NoCommaAfterY),
            ("1,2,m00".to_owned(), DescriptorError::WrongLength),
            (format!("u{bitmap}0"), DescriptorError::WrongLength),
            (bitmap.clone(), DescriptorError::NoCommaAfterX),
            (format!("1,2,g{}", &bitmap[1..]), DescriptorError::InvalidHexDigit),
        ];
        for (desc, expected) in cases {
            assert_eq!(validate(size, &desc), Err(expected), "{desc}");
        }
        assert_eq!(validate(size, &format!("1,2,{bitmap}")), Ok(()));
        assert_eq!(
            DescriptorError::WrongLength.to_string(),
            "Game description is wrong length"
        );
    }

    #[test]
    fn test_new_game_description() {
        let generator = LayoutGenerator::default();
        let params = GameParams::default();

        let batch = new_game_description(&generator, &params, &mut Pcg64::seed_from_u64(5), false)
            .unwrap();
        let PuzzleDescriptor::Resolved {
            start: Some(start),
            field,
            masked: true,
        } = PuzzleDescriptor::parse(params.size(), &batch).unwrap()
        else {
            panic!("expected a masked layout with a start: {batch}");
        };
        assert_eq!(field.mine_count(), 10);
        assert_eq!(field.adjacent_mines(start), 0);

        let interactive =
            new_game_description(&generator, &params, &mut Pcg64::seed_from_u64(5), true)
                .unwrap();
        assert!(interactive.starts_with("r10,u,"), "{interactive}");
        let PuzzleDescriptor::Unresolved { seed, .. } =
            PuzzleDescriptor::parse(params.size(), &interactive).unwrap()
        else {
            panic!("expected an unresolved descriptor: {interactive}");
        };
        let layout = generator.generate_with_seed(&params, start, seed).unwrap();
        assert_eq!(layout.field, field, "both modes agree on the layout");
    }

    #[test]
    fn test_toggle_masking() {
        let size = GridSize::new(9, 9);
        let plain = format!("3,4,u{}", "1".repeat(20) + "8");
        let masked = toggle_masking(size, &plain).unwrap();
        assert_ne!(masked, plain);
        assert!(masked.starts_with("3,4,m"));
        assert_eq!(toggle_masking(size, &masked), Ok(plain));
        assert_eq!(
            toggle_masking(size, &format!("r10,u,{SEED}")),
            Err(DescriptorError::NoLayout)
        );
    }
}
