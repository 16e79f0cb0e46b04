//! Mine layout generation and game descriptors.
//!
//! # Overview
//!
//! - [`LayoutGenerator`]: scatters mines around the first click and, when
//!   requested, reshapes the layout until [`mines_solver::MineSolver`] clears it
//!   without guessing.
//! - [`GenerationOracle`]: the oracle that moves mines while the solver runs.
//! - [`LayoutSeed`]: reproducible randomness, written as 64 hex digits.
//! - [`descriptor`]: the textual form of a game, either a fixed layout or a
//!   seed to generate one from on the first click.
//! - [`obfuscate`]: reversible masking of the layout bitmap inside descriptors.
//!
//! # Examples
//!
//! ```
//! use mines_core::{GameParams, GridSize};
//! use mines_generator::{LayoutGenerator, PuzzleDescriptor, new_game_description};
//!
//! let params: GameParams = "9x9n10".parse()?;
//! let generator = LayoutGenerator::default();
//! let desc = new_game_description(&generator, &params, &mut rand::rng(), false)?;
//!
//! let parsed = PuzzleDescriptor::parse(params.size(), &desc)?;
//! assert!(parsed.is_resolved());
//! assert!(parsed.start().is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod descriptor;
pub mod generation_oracle;
pub mod layout_generator;
pub mod obfuscate;
pub mod seed;

pub use self::{
    descriptor::{
        DescriptorError, PuzzleDescriptor, describe_layout, new_game_description, toggle_masking,
    },
    generation_oracle::GenerationOracle,
    layout_generator::{GenerateError, GeneratedLayout, GeneratorConfig, LayoutGenerator},
    seed::{LayoutSeed, SeedParseError},
};
