//! Core data structures for Minesweeper applications.
//!
//! This crate provides the small, shared vocabulary used by the solver, the
//! layout generator and the game session crates.
//!
//! # Overview
//!
//! - [`position`]: Cell coordinates ([`Position`]) and grid geometry ([`GridSize`]),
//!   including bounded neighbourhood iteration.
//! - [`mine_field`]: [`MineField`], a width × height bitmap of mine positions with
//!   adjacency counting and conversion to and from packed bit strings.
//! - [`params`]: [`GameParams`], the generation configuration and its textual
//!   `<w>x<h>n<mines>[a]` form.
//!
//! # Examples
//!
//! ```
//! use mines_core::{GameParams, MineField, Position};
//!
//! let params: GameParams = "9x9n10".parse()?;
//! assert!(params.unique);
//!
//! let field: MineField = "
//!     *..
//!     ...
//!     ..*
//! "
//! .parse()
//! .unwrap();
//! assert_eq!(field.adjacent_mines(Position::new(1, 1)), 2);
//! # Ok::<(), mines_core::ParamsError>(())
//! ```

pub mod mine_field;
pub mod params;
pub mod position;

pub use self::{
    mine_field::{FieldParseError, MineField},
    params::{GameParams, ParamsError},
    position::{GridSize, Position},
};
