//! Gallery application state.
//!
//! All UI state lives in one [`GalleryState`] value that changes only
//! through [`GalleryState::apply`]. Presentation goes through the
//! [`RenderSink`] trait, so the state never knows how cards are drawn.

use crate::battle::{simulate_battle_with, BattleReport, Combatant};
use crate::creature::{Creature, SelectedCreature};
use crate::selection::{Selection, SelectionMode, ToggleOutcome};
use crate::stat_store::StatStore;
use crate::stats::StatTriple;
use crate::storage::KeyValueStore;
use rand::Rng;
use tracing::{info, warn};

/// Status text while the creature list is being fetched.
pub const LOADING_STATUS: &str = "Loading Digimon...";

/// Presentation layer for the gallery.
pub trait RenderSink {
    /// Handle returned for each drawn card.
    type CardHandle;

    /// Draw one card.
    fn render_card(
        &mut self,
        creature: &Creature,
        stats: StatTriple,
        selected: bool,
    ) -> Self::CardHandle;

    /// Draw the "nothing found" placeholder.
    fn render_empty(&mut self);

    /// Replace the status line.
    fn set_status(&mut self, status: &str);

    /// Show the outcome of the last battle.
    fn show_battle(&mut self, _report: &BattleReport) {}
}

/// Progress of the one-off creature list fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

/// How a failed fetch is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDisplay {
    /// Put the error in the status line.
    #[default]
    Status,
    /// Leave the status line empty.
    Silent,
}

/// Text and level filters applied to the creature list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryFilter {
    /// Case-insensitive substring of the name. Blank matches everything.
    pub query: String,
    /// Case-insensitive level. Blank matches everything.
    pub level: String,
}

impl GalleryFilter {
    /// Whether `creature` passes both filters.
    pub fn matches(&self, creature: &Creature) -> bool {
        let query = self.query.trim().to_lowercase();
        let name_ok = query.is_empty() || creature.name.to_lowercase().contains(&query);
        let level_ok = self.level.is_empty() || creature.level.matches_filter(&self.level);
        name_ok && level_ok
    }
}

/// Events that drive the gallery.
#[derive(Debug, Clone)]
pub enum Action {
    /// The creature list arrived.
    Loaded(Vec<Creature>),
    /// The creature list could not be fetched.
    LoadFailed(String),
    /// The search box changed.
    SetQuery(String),
    /// The level dropdown changed.
    SetLevel(String),
    /// A card was clicked.
    Toggle(SelectedCreature),
    /// Switch between train and battle picking.
    SetMode(SelectionMode),
    /// Forget every selected creature.
    ClearSelection,
    /// A battle finished.
    BattleFinished(BattleReport),
}

/// The whole gallery UI state.
///
/// # Examples
///
/// ```rust
/// use digivault::gallery::{Action, GalleryState};
/// use digivault::Creature;
///
/// let mut state = GalleryState::new();
/// state.apply(Action::Loaded(vec![
///     Creature::new("Agumon", "", "Rookie"),
///     Creature::new("Greymon", "", "Champion"),
/// ]));
/// state.apply(Action::SetLevel("champion".to_string()));
///
/// assert_eq!(state.visible().count(), 1);
/// assert_eq!(state.status(), "Showing 1 of 2");
/// ```
#[derive(Debug, Clone, Default)]
pub struct GalleryState {
    creatures: Vec<Creature>,
    filter: GalleryFilter,
    visible: Vec<usize>,
    selection: Selection,
    load: LoadState,
    status: String,
    error_display: ErrorDisplay,
    last_battle: Option<BattleReport>,
}

impl GalleryState {
    /// Empty gallery waiting for its creature list.
    pub fn new() -> Self {
        Self {
            status: LOADING_STATUS.to_string(),
            ..Self::default()
        }
    }

    /// Choose how a failed fetch is shown.
    pub fn with_error_display(mut self, display: ErrorDisplay) -> Self {
        self.error_display = display;
        self
    }

    /// Start picking in `mode`.
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.selection.set_mode(mode);
        self
    }

    /// Apply one event. Returns whether anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Loaded(creatures) => {
                info!("Loaded {} creatures", creatures.len());
                self.creatures = creatures;
                self.load = LoadState::Ready;
                self.refilter();
                self.status = format!("Found {} Digimon", self.creatures.len());
                true
            }
            Action::LoadFailed(error) => {
                warn!("Creature list failed to load: {}", error);
                self.status = match self.error_display {
                    ErrorDisplay::Status => format!("Failed to load Digimon: {}", error),
                    ErrorDisplay::Silent => String::new(),
                };
                self.load = LoadState::Failed(error);
                true
            }
            Action::SetQuery(query) => {
                if self.filter.query == query {
                    return false;
                }
                self.filter.query = query;
                self.apply_filter_status();
                true
            }
            Action::SetLevel(level) => {
                if self.filter.level == level {
                    return false;
                }
                self.filter.level = level;
                self.apply_filter_status();
                true
            }
            Action::Toggle(creature) => {
                self.selection.toggle(creature);
                true
            }
            Action::SetMode(mode) => {
                if self.selection.mode() == mode {
                    return false;
                }
                self.selection.set_mode(mode);
                true
            }
            Action::ClearSelection => {
                let changed = !self.selection.is_empty();
                self.selection.clear();
                changed
            }
            Action::BattleFinished(report) => {
                self.last_battle = Some(report);
                true
            }
        }
    }

    /// Handle a click on the card named `name`: look up the stats it shows
    /// and toggle it in the selection.
    ///
    /// Returns `None` if no loaded creature has that name.
    pub fn click<S: KeyValueStore>(
        &mut self,
        name: &str,
        stats: &mut StatStore<S>,
    ) -> Option<ToggleOutcome> {
        let creature = self.creatures.iter().find(|c| c.name == name)?;
        let shown = stats.display_stats(creature);
        let selected = SelectedCreature::from_creature(creature, shown);
        Some(self.selection.toggle(selected))
    }

    /// Fight the two selected creatures and record the report.
    ///
    /// Returns `None` unless exactly two creatures are selected.
    pub fn fight_with<R: Rng>(&mut self, rng: &mut R) -> Option<BattleReport> {
        let (a, b) = self.selection.pair()?;
        let report = simulate_battle_with(Combatant::from(a), Combatant::from(b), rng);
        self.apply(Action::BattleFinished(report.clone()));
        Some(report)
    }

    /// Fight with the thread-local random source.
    pub fn fight(&mut self) -> Option<BattleReport> {
        self.fight_with(&mut rand::thread_rng())
    }

    /// Draw the gallery into `sink`.
    ///
    /// Nothing is drawn while loading. Cards use pre-supplied stats when the
    /// API sent them and the stat store otherwise.
    pub fn render<S: KeyValueStore, R: RenderSink>(
        &self,
        stats: &mut StatStore<S>,
        sink: &mut R,
    ) -> Vec<R::CardHandle> {
        sink.set_status(&self.status);
        if self.load != LoadState::Ready {
            return Vec::new();
        }

        let cards = if self.visible.is_empty() {
            sink.render_empty();
            Vec::new()
        } else {
            self.visible()
                .map(|creature| {
                    let shown = stats.display_stats(creature);
                    let selected = self.selection.contains(&creature.name);
                    sink.render_card(creature, shown, selected)
                })
                .collect()
        };

        if let Some(report) = &self.last_battle {
            sink.show_battle(report);
        }
        cards
    }

    /// Creatures passing the current filter, in list order.
    pub fn visible(&self) -> impl Iterator<Item = &Creature> {
        self.visible.iter().map(move |&idx| &self.creatures[idx])
    }

    /// Every loaded creature.
    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    /// Look up a loaded creature by exact name.
    pub fn find(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.name == name)
    }

    pub fn filter(&self) -> &GalleryFilter {
        &self.filter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn last_battle(&self) -> Option<&BattleReport> {
        self.last_battle.as_ref()
    }

    /// Prompt shown in the arena panel.
    pub fn arena_hint(&self) -> &'static str {
        match (self.selection.mode(), self.selection.len()) {
            (SelectionMode::Train, 1) => "Ready to train (In Training only)",
            (SelectionMode::Battle, 2) => "Ready to fight",
            (SelectionMode::Battle, 1) => "Select one more Digimon",
            _ => "Select a Digimon",
        }
    }

    fn refilter(&mut self) {
        self.visible = self
            .creatures
            .iter()
            .enumerate()
            .filter(|(_, creature)| self.filter.matches(creature))
            .map(|(idx, _)| idx)
            .collect();
    }

    fn apply_filter_status(&mut self) {
        self.refilter();
        if self.load == LoadState::Ready {
            self.status = format!(
                "Showing {} of {}",
                self.visible.len(),
                self.creatures.len()
            );
        }
    }
}
