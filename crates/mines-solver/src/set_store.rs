//! Storage and scheduling of constraint sets.

use std::collections::{BTreeMap, VecDeque};

use crate::{
    CellMask, ConstraintSet,
    constraint_set::{SetKey, signed},
};

#[derive(Debug, Clone, Copy)]
struct Entry {
    set: ConstraintSet,
    /// Ticket of the pending to-do queue slot, if the set is scheduled.
    queued: Option<u64>,
}

/// A deduplicated collection of [`ConstraintSet`]s with a FIFO to-do queue.
///
/// Sets are ordered by anchor row, anchor column and mask. Each set is in the
/// to-do queue at most once; removing or rescheduling a set leaves a stale
/// queue slot behind, which [`SetStore::pop_todo`] skips.
///
/// # Examples
///
/// ```
/// use mines_solver::{CellMask, ConstraintSet, SetStore};
///
/// let mut store = SetStore::new();
/// let set = ConstraintSet::normalized(0, 0, CellMask::TOP_ROW, 1).unwrap();
/// assert!(store.insert(set));
/// assert!(!store.insert(set));
///
/// assert_eq!(store.pop_todo(), Some(set));
/// assert_eq!(store.pop_todo(), None);
/// assert_eq!(store.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SetStore {
    sets: BTreeMap<SetKey, Entry>,
    todo: VecDeque<(SetKey, u64)>,
    next_ticket: u64,
}

impl SetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` if the store holds no sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Adds a set and schedules it.
    ///
    /// Returns `false`, leaving the store unchanged, if a set with the same
    /// cells is already present.
    pub fn insert(&mut self, set: ConstraintSet) -> bool {
        let key = set.key();
        if self.sets.contains_key(&key) {
            return false;
        }
        self.sets.insert(
            key,
            Entry {
                set,
                queued: None,
            },
        );
        self.schedule(&set);
        log::trace!("new set: {set}");
        true
    }

    /// Removes a set.
    ///
    /// A pending to-do slot for it stays queued and is skipped by
    /// [`SetStore::pop_todo`].
    pub fn remove(&mut self, set: &ConstraintSet) {
        self.sets.remove(&set.key());
    }

    /// Puts a stored set at the back of the to-do queue unless it is already queued.
    pub fn schedule(&mut self, set: &ConstraintSet) {
        let Some(entry) = self.sets.get_mut(&set.key()) else {
            return;
        };
        if entry.queued.is_none() {
            let ticket = self.next_ticket;
            self.next_ticket += 1;
            entry.queued = Some(ticket);
            self.todo.push_back((set.key(), ticket));
        }
    }

    /// Replaces the mine count of a stored set.
    pub fn set_mines(&mut self, set: &ConstraintSet, mines: u8) {
        if let Some(entry) = self.sets.get_mut(&set.key()) {
            entry.set = entry.set.with_mines(mines);
        }
    }

    /// Takes the oldest scheduled set off the to-do queue.
    ///
    /// The set stays in the store.
    pub fn pop_todo(&mut self) -> Option<ConstraintSet> {
        while let Some((key, ticket)) = self.todo.pop_front() {
            if let Some(entry) = self.sets.get_mut(&key)
                && entry.queued == Some(ticket)
            {
                entry.queued = None;
                return Some(entry.set);
            }
        }
        None
    }

    /// Returns every set sharing a cell with the footprint `mask` anchored at `(x, y)`.
    ///
    /// Sets are returned in store order.
    #[must_use]
    pub fn overlapping(&self, x: isize, y: isize, mask: CellMask) -> Vec<ConstraintSet> {
        let mut found = Vec::new();
        for ay in (y - 2..=y + 2).filter_map(|v| usize::try_from(v).ok()) {
            for ax in (x - 2..=x + 2).filter_map(|v| usize::try_from(v).ok()) {
                let footprint = mask.translate(x - signed(ax), y - signed(ay));
                if footprint.is_empty() {
                    continue;
                }
                let range = (ay, ax, CellMask::EMPTY)..=(ay, ax, CellMask::FULL);
                found.extend(
                    self.sets
                        .range(range)
                        .map(|(_, entry)| entry.set)
                        .filter(|set| !(set.mask() & footprint).is_empty()),
                );
            }
        }
        found
    }

    /// Returns every set sharing a cell with `set`, excluding `set` itself.
    #[must_use]
    pub fn overlapping_set(&self, set: &ConstraintSet) -> Vec<ConstraintSet> {
        let (x, y) = set.signed_anchor();
        let mut found = self.overlapping(x, y, set.mask());
        found.retain(|s| s.key() != set.key());
        found
    }

    /// Returns the set at position `index` in store order.
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<ConstraintSet> {
        self.sets.values().nth(index).map(|entry| entry.set)
    }

    /// Iterates over all sets in store order.
    pub fn iter(&self) -> impl Iterator<Item = ConstraintSet> + '_ {
        self.sets.values().map(|entry| entry.set)
    }
}
