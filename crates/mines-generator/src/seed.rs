//! Reproducible randomness for layout generation.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use rand::{RngCore, SeedableRng as _};
use rand_pcg::Pcg64;
use sha2::{Digest as _, Sha256};

/// A 256-bit seed for reproducible layout generation.
///
/// The same seed, parameters and starting cell always generate the same
/// layout. Seeds are written as 64 hexadecimal digits.
///
/// # Examples
///
/// ```
/// use mines_generator::LayoutSeed;
///
/// let seed = LayoutSeed::from_text("daily puzzle 2026-10-16");
/// let text = seed.to_string();
/// assert_eq!(text.len(), 64);
/// assert_eq!(text.parse::<LayoutSeed>(), Ok(seed));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayoutSeed([u8; 32]);

impl LayoutSeed {
    /// Creates a seed from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Draws a seed from the thread-local generator.
    #[must_use]
    pub fn random() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    /// Draws a seed from `rng`.
    #[must_use]
    pub fn from_rng<R>(rng: &mut R) -> Self
    where
        R: RngCore + ?Sized,
    {
        let mut bytes = [0; 32];
        rng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Derives a seed from arbitrary text by hashing it with SHA-256.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut bytes = [0; 32];
        bytes.copy_from_slice(&Sha256::digest(text.as_bytes()));
        Self(bytes)
    }

    /// Returns a fresh generator seeded with this seed.
    #[must_use]
    pub fn rng(&self) -> Pcg64 {
        Pcg64::from_seed(self.0)
    }
}

impl Display for LayoutSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Errors returned when parsing a [`LayoutSeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SeedParseError {
    /// The text is not 64 characters long.
    #[display("seed must be 64 hex digits, got {_0} characters")]
    InvalidLength(#[error(not(source))] usize),
    /// The text contains a character that is not a hex digit.
    #[display("invalid hex digit {_0:?} in seed")]
    InvalidDigit(#[error(not(source))] char),
}

impl FromStr for LayoutSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if len != 64 {
            return Err(SeedParseError::InvalidLength(len));
        }
        let mut bytes = [0; 32];
        let mut digits = s.chars().map(|c| {
            c.to_digit(16)
                .and_then(|d| u8::try_from(d).ok())
                .ok_or(SeedParseError::InvalidDigit(c))
        });
        for byte in &mut bytes {
            let (Some(hi), Some(lo)) = (digits.next(), digits.next()) else {
                return Err(SeedParseError::InvalidLength(len));
            };
            *byte = (hi? << 4) | lo?;
        }
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng as _;

    use super::*;

    const SEED: &str = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";

    #[test]
    fn test_parse_and_display() {
        let seed: LayoutSeed = SEED.parse().unwrap();
        assert_eq!(seed.as_bytes()[0], 0xc1);
        assert_eq!(seed.as_bytes()[31], 0xf1);
        assert_eq!(seed.to_string(), SEED);
        assert_eq!(
            SEED.to_uppercase().parse::<LayoutSeed>(),
            Ok(seed),
            "upper case is accepted"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "abc".parse::<LayoutSeed>(),
            Err(SeedParseError::InvalidLength(3))
        );
        let bad = format!("{}g", &SEED[..63]);
        assert_eq!(
            bad.parse::<LayoutSeed>(),
            Err(SeedParseError::InvalidDigit('g'))
        );
    }

    #[test]
    fn test_rng_is_reproducible() {
        let seed = LayoutSeed::from_text("mines");
        let a: [u64; 4] = seed.rng().random();
        let b: [u64; 4] = seed.rng().random();
        assert_eq!(a, b);
        assert_ne!(seed, LayoutSeed::from_text("mines!"));
    }
}
