//! # digivault - Deterministic Digimon Stats, Collection and Battles
//!
//! The data layer of a Digimon gallery and casual battle toy:
//! - **Deterministic** stats (same name and level → same triple)
//! - **Cached** per name in a persistent key-value store
//! - **Collection** records: owned creatures, coins, items, battle team
//! - **Selection** state machine with FIFO eviction
//! - **Battles** decided by a randomized single-round score comparison
//!
//! ## Core Concepts
//!
//! ### Stat Pipeline
//!
//! ```text
//! [Creature] → name hash × level weight → [StatTriple] → stored under name
//! ```
//!
//! 1. The name is hashed with a 32-bit polynomial rolling hash
//! 2. The hash picks a base and three per-stat offsets
//! 3. The level weight scales them; each component is capped at 100
//! 4. The first lookup persists the triple; later lookups return it as-is
//!
//! ### Storage
//!
//! Everything persisted goes through [`KeyValueStore`](storage::KeyValueStore),
//! modelled on browser local storage: independent string keys, no
//! transactions. Storage problems are logged and degraded, never raised.
//!
//! ## Example
//!
//! ```rust
//! use digivault::*;
//! use digivault::storage::MemoryStore;
//! use rand::SeedableRng;
//!
//! let mut collection = CollectionStore::new(MemoryStore::new());
//! let agumon = Creature::new("Agumon", "agumon.jpg", "Rookie");
//! let gabumon = Creature::new("Gabumon", "gabumon.jpg", "Rookie");
//! collection.add_owned(&agumon);
//!
//! let mut selection = Selection::new(SelectionMode::Battle);
//! for creature in [&agumon, &gabumon] {
//!     let stats = collection.stats().get_stats(creature);
//!     selection.toggle(SelectedCreature::from_creature(creature, stats));
//! }
//!
//! let (a, b) = selection.pair().unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let report = simulate_battle_with(a.into(), b.into(), &mut rng);
//! assert!(report.winner == "Agumon" || report.winner == "Gabumon");
//! ```
//!
//! ## Modules
//!
//! - [`level`] - Level tiers and weights
//! - [`creature`] - Creature records
//! - [`stats`] - Stat triple and generator
//! - [`storage`] - Key-value stores and JSON helpers
//! - [`stat_store`] - Cached stat lookup
//! - [`collection`] - Coins, owned creatures, items, battle team
//! - [`selection`] - Selection state machine
//! - [`battle`] - Battle simulation
//! - [`gallery`] - Gallery state and render sink
//! - [`train`] - Training hand-off
//! - [`api`] - Creature list client
//! - [`config`] - Environment configuration
//! - [`error`] - Error types

pub mod api;
pub mod battle;
pub mod collection;
pub mod config;
pub mod creature;
pub mod error;
pub mod gallery;
pub mod level;
pub mod selection;
pub mod stat_store;
pub mod stats;
pub mod storage;
pub mod train;

// Re-export main types for convenience
pub use battle::{simulate_battle, simulate_battle_with, BattleReport, Combatant};
pub use collection::CollectionStore;
pub use creature::{Creature, OwnedEntry, SelectedCreature};
pub use error::{FetchError, StoreError, TrainError};
pub use level::Level;
pub use selection::{Selection, SelectionMode, ToggleOutcome};
pub use stat_store::{StatStore, StatsNamespace};
pub use stats::StatTriple;
