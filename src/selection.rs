//! Selection state machine.
//!
//! The selection is the ephemeral set of creatures the user has clicked,
//! capped by the active [`SelectionMode`]. It is never persisted. Toggling
//! a selected creature removes it; toggling a new one when full evicts the
//! oldest entry first.

use crate::creature::SelectedCreature;
use std::collections::VecDeque;
use std::fmt;

/// What the selection is being collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Pick one creature to send to training.
    Train,
    /// Pick two creatures to fight each other.
    #[default]
    Battle,
}

impl SelectionMode {
    /// Maximum number of selected creatures in this mode.
    pub const fn capacity(&self) -> usize {
        match self {
            SelectionMode::Train => 1,
            SelectionMode::Battle => 2,
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Train => f.write_str("train"),
            SelectionMode::Battle => f.write_str("battle"),
        }
    }
}

/// Result of a [`Selection::toggle`].
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    /// The creature was appended.
    Selected,
    /// The creature was already selected and has been removed.
    Deselected,
    /// The selection was full: `evicted` (the oldest entry) made room.
    Replaced { evicted: SelectedCreature },
}

/// Ordered, capped selection with FIFO eviction.
///
/// # Examples
///
/// ```rust
/// use digivault::{SelectedCreature, Selection, SelectionMode, StatTriple, Level};
///
/// let pick = |name: &str| SelectedCreature {
///     name: name.to_string(),
///     img: String::new(),
///     stats: StatTriple::new(50, 50, 50),
///     level: Level::Rookie,
/// };
///
/// let mut selection = Selection::new(SelectionMode::Battle);
/// selection.toggle(pick("Agumon"));
/// selection.toggle(pick("Gabumon"));
/// selection.toggle(pick("Patamon"));
///
/// let names: Vec<_> = selection.names().collect();
/// assert_eq!(names, ["Gabumon", "Patamon"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Selection {
    mode: SelectionMode,
    entries: VecDeque<SelectedCreature>,
}

impl Selection {
    /// Create an empty selection in `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            entries: VecDeque::with_capacity(mode.capacity()),
        }
    }

    /// The active mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switch mode. If the new capacity is smaller, the oldest entries are
    /// dropped until the selection fits.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        while self.entries.len() > mode.capacity() {
            self.entries.pop_front();
        }
    }

    /// Select or deselect `creature`, matching by name.
    pub fn toggle(&mut self, creature: SelectedCreature) -> ToggleOutcome {
        if let Some(idx) = self.position(&creature.name) {
            self.entries.remove(idx);
            return ToggleOutcome::Deselected;
        }

        let evicted = if self.is_full() {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(creature);

        match evicted {
            Some(evicted) => ToggleOutcome::Replaced { evicted },
            None => ToggleOutcome::Selected,
        }
    }

    /// Whether a creature named `name` is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Selected creatures, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &SelectedCreature> {
        self.entries.iter()
    }

    /// Selected names, oldest first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Number of selected creatures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the selection is at capacity for its mode.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.mode.capacity()
    }

    /// The single selected creature, when exactly one is selected.
    pub fn single(&self) -> Option<&SelectedCreature> {
        match self.entries.len() {
            1 => self.entries.front(),
            _ => None,
        }
    }

    /// The two fighters, oldest first, when exactly two are selected.
    pub fn pair(&self) -> Option<(&SelectedCreature, &SelectedCreature)> {
        match (self.entries.len(), self.entries.front(), self.entries.back()) {
            (2, Some(first), Some(second)) => Some((first, second)),
            _ => None,
        }
    }

    /// Drop every selected creature.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }
}
