//! Cached stat lookup.
//!
//! Provides [`StatStore`], which hands out the stat triple of a creature,
//! generating it on first request and persisting it. Later lookups return
//! the stored triple untouched, keyed purely by name.

use crate::creature::Creature;
use crate::error::StoreError;
use crate::stats::{generate_stats, StatTriple, FALLBACK_STATS};
use crate::storage::{keys, read_json, read_json_or, write_json, KeyValueStore};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Persisted shape of the stats cache: name → triple.
pub type StatsMap = BTreeMap<String, StatTriple>;

/// The stats cache as stored. Entries are decoded one at a time so a
/// malformed entry only affects its own name.
type RawStatsMap = BTreeMap<String, Value>;

fn decode_entry(value: &Value) -> Option<StatTriple> {
    serde_json::from_value(value.clone()).ok()
}

/// Which stats cache a [`StatStore`] reads and writes.
///
/// The two caches are independent and may disagree for the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsNamespace {
    /// The collection-era cache (`dc_digimon_stats_v1`).
    #[default]
    Current,
    /// The gallery-only cache (`digimon_stats_v1`).
    Legacy,
}

impl StatsNamespace {
    /// Storage key of this cache.
    pub fn key(&self) -> &'static str {
        match self {
            StatsNamespace::Current => keys::STATS,
            StatsNamespace::Legacy => keys::LEGACY_STATS,
        }
    }
}

impl FromStr for StatsNamespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "current" => Ok(StatsNamespace::Current),
            "legacy" => Ok(StatsNamespace::Legacy),
            other => Err(format!("unknown stats namespace: {}", other)),
        }
    }
}

/// Deterministic, persisted stat lookup.
///
/// # Examples
///
/// ```rust
/// use digivault::{Creature, StatStore, StatTriple};
/// use digivault::storage::MemoryStore;
///
/// let mut stats = StatStore::new(MemoryStore::new());
/// let agumon = Creature::new("Agumon", "", "Rookie");
///
/// let first = stats.get_stats(&agumon);
/// assert_eq!(first, StatTriple { atk: 45, def: 59, esp: 46 });
///
/// // Cached by name: a different level does not change the result
/// let later = stats.get_stats(&Creature::new("Agumon", "", "Mega"));
/// assert_eq!(first, later);
/// ```
#[derive(Debug)]
pub struct StatStore<S: KeyValueStore> {
    store: S,
    namespace: StatsNamespace,
}

impl<S: KeyValueStore> StatStore<S> {
    /// Open the current stats cache over `store`.
    pub fn new(store: S) -> Self {
        Self::with_namespace(store, StatsNamespace::Current)
    }

    /// Open a specific stats cache over `store`.
    pub fn with_namespace(store: S, namespace: StatsNamespace) -> Self {
        Self { store, namespace }
    }

    /// The cache this store is bound to.
    pub fn namespace(&self) -> StatsNamespace {
        self.namespace
    }

    /// Get the stats of a creature, generating and persisting them on the
    /// first lookup of its name.
    ///
    /// Creatures without a name get [`FALLBACK_STATS`] and storage is not
    /// touched. If storage fails, the failure is logged and a freshly
    /// generated triple is returned without being cached.
    pub fn get_stats(&mut self, creature: &Creature) -> StatTriple {
        if !creature.has_name() {
            return FALLBACK_STATS;
        }

        match self.lookup_or_insert(creature) {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Stats lookup for {} failed: {}", creature.name, e);
                generate_stats(&creature.name, &creature.level)
            }
        }
    }

    /// Stats to show on a card.
    ///
    /// Pre-supplied stats win for this render only and are never persisted;
    /// otherwise this is [`get_stats`](Self::get_stats).
    pub fn display_stats(&mut self, creature: &Creature) -> StatTriple {
        match creature.presupplied_stats() {
            Some(stats) => stats,
            None => self.get_stats(creature),
        }
    }

    /// The persisted triple for `name`, without generating one.
    pub fn cached(&self, name: &str) -> Option<StatTriple> {
        self.raw_map().get(name).and_then(decode_entry)
    }

    /// All persisted triples. Malformed entries are skipped.
    pub fn all(&self) -> StatsMap {
        self.raw_map()
            .iter()
            .filter_map(|(name, value)| Some((name.clone(), decode_entry(value)?)))
            .collect()
    }

    /// Borrow the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutably borrow the backing store.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the backing store.
    pub fn into_inner(self) -> S {
        self.store
    }

    fn lookup_or_insert(&mut self, creature: &Creature) -> Result<StatTriple, StoreError> {
        let key = self.namespace.key();
        let mut map: RawStatsMap = read_json(&self.store, key)?.unwrap_or_default();

        if let Some(value) = map.get(&creature.name) {
            if let Some(stats) = decode_entry(value) {
                debug!("Stats cache hit for {}", creature.name);
                return Ok(stats);
            }
            warn!("Replacing malformed stats entry for {}", creature.name);
        }

        let stats = generate_stats(&creature.name, &creature.level);
        debug!("Generated stats for {}: {}", creature.name, stats);
        map.insert(creature.name.clone(), serde_json::to_value(stats)?);
        write_json(&mut self.store, key, &map)?;
        Ok(stats)
    }

    fn raw_map(&self) -> RawStatsMap {
        read_json_or(&self.store, self.namespace.key(), RawStatsMap::new())
    }
}
