use std::cell::OnceCell;

use mines_core::{GameParams, GridSize, MineField, Position};
use mines_generator::{GenerateError, LayoutGenerator, LayoutSeed, describe_layout};

/// The mine layout behind a game, shared by every state of that game.
///
/// A layout is either fixed from the start or pending: a pending layout holds
/// the seed it will be generated from and is resolved exactly once, by the
/// first cell the player opens. Every [`Game`](crate::Game) cloned from the
/// same original sees the resolution.
#[derive(Debug)]
pub struct MineLayout {
    size: GridSize,
    mine_count: usize,
    field: OnceCell<MineField>,
    pending: Option<PendingLayout>,
    descriptor: OnceCell<String>,
}

#[derive(Debug)]
struct PendingLayout {
    unique: bool,
    seed: LayoutSeed,
    generator: LayoutGenerator,
}

impl MineLayout {
    /// Creates a layout that is already fixed.
    #[must_use]
    pub fn fixed(field: MineField) -> Self {
        Self {
            size: field.size(),
            mine_count: field.mine_count(),
            field: OnceCell::from(field),
            pending: None,
            descriptor: OnceCell::new(),
        }
    }

    /// Creates a layout to be generated from `seed` when the first cell is opened.
    #[must_use]
    pub fn pending(
        size: GridSize,
        mine_count: usize,
        unique: bool,
        seed: LayoutSeed,
        generator: LayoutGenerator,
    ) -> Self {
        Self {
            size,
            mine_count,
            field: OnceCell::new(),
            pending: Some(PendingLayout {
                unique,
                seed,
                generator,
            }),
            descriptor: OnceCell::new(),
        }
    }

    /// Returns the grid dimensions.
    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Returns the number of mines.
    #[must_use]
    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    /// Returns the layout, or `None` if it has not been generated yet.
    #[must_use]
    pub fn field(&self) -> Option<&MineField> {
        self.field.get()
    }

    /// Returns `true` if the layout has been generated.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.field.get().is_some()
    }

    /// Returns the resolved descriptor `<x>,<y>,m<hex>` of a layout that was
    /// generated on the first click.
    ///
    /// Fixed layouts and pending ones that are still unresolved return `None`.
    #[must_use]
    pub fn resolved_descriptor(&self) -> Option<&str> {
        self.descriptor.get().map(String::as_str)
    }

    /// Returns the layout, generating it with `start` as the first click if
    /// it is still pending.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError`] if generation fails. The layout stays pending.
    pub fn resolve(&self, start: Position) -> Result<&MineField, GenerateError> {
        if let Some(field) = self.field.get() {
            return Ok(field);
        }
        let Some(pending) = &self.pending else {
            unreachable!("fixed layouts are set on construction");
        };

        let params = GameParams::new(
            self.size.width(),
            self.size.height(),
            self.mine_count,
            pending.unique,
        );
        let layout = pending
            .generator
            .generate_with_seed(&params, start, pending.seed)?;
        log::debug!(
            "resolved {params} layout at {start} after {} attempts",
            layout.attempts
        );
        let _ = self
            .descriptor
            .set(describe_layout(&layout.field, start, true));
        Ok(self.field.get_or_init(|| layout.field))
    }
}
