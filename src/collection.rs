//! Collection and economy records.
//!
//! [`CollectionStore`] keeps the owned-creature list, the coin balance, the
//! inventory and the battle team, each under its own storage key. Every
//! operation reads and writes independently; nothing is grouped into a
//! transaction. Storage failures never reach the caller: reads fall back to
//! a default and writes are dropped, both with a warning.

use crate::creature::{Creature, OwnedEntry};
use crate::stat_store::StatStore;
use crate::storage::{keys, read_json, read_json_or, write_json_logged, KeyValueStore};
use serde_json::Value;
use tracing::{info, warn};

/// Balance granted the first time coins are read.
pub const STARTING_COINS: i64 = 1000;

/// Maximum number of creatures in the battle team.
pub const BATTLE_TEAM_SIZE: usize = 2;

/// Coerce an untyped value to a number the way a loose `Number(value)`
/// conversion would: numbers pass through, numeric strings parse, booleans
/// become 1 or 0, blanks and nulls become 0, anything else is NaN.
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}

/// Turn an untyped value into a coin amount: NaN becomes 0 and fractions
/// are truncated. The sign is kept; callers clamp.
fn coins_from_value(value: &Value) -> i64 {
    let n = coerce_number(value);
    if n.is_nan() {
        0
    } else {
        n.trunc() as i64
    }
}

/// Owned creatures, coins, items and battle team over one backing store.
///
/// The collection owns a [`StatStore`] over the same store so that adding a
/// creature also assigns its stats.
///
/// # Examples
///
/// ```rust
/// use digivault::{CollectionStore, Creature};
/// use digivault::storage::MemoryStore;
///
/// let mut collection = CollectionStore::new(MemoryStore::new());
/// assert_eq!(collection.coins(), 1000);
/// assert_eq!(collection.add_coins(-2000), 0);
///
/// collection.add_owned(&Creature::new("Agumon", "a.png", "Rookie"));
/// collection.add_owned(&Creature::new("Agumon", "a.png", "Rookie"));
/// assert_eq!(collection.owned().len(), 1);
/// ```
#[derive(Debug)]
pub struct CollectionStore<S: KeyValueStore> {
    stats: StatStore<S>,
}

impl<S: KeyValueStore> CollectionStore<S> {
    /// Open the collection over `store`, with stats in the current cache.
    pub fn new(store: S) -> Self {
        Self {
            stats: StatStore::new(store),
        }
    }

    /// Open the collection on top of an existing stat store.
    pub fn with_stats(stats: StatStore<S>) -> Self {
        Self { stats }
    }

    /// The stat store sharing this collection's backing store.
    pub fn stats(&mut self) -> &mut StatStore<S> {
        &mut self.stats
    }

    /// Borrow the backing store.
    pub fn store(&self) -> &S {
        self.stats.store()
    }

    /// Give back the backing store.
    pub fn into_inner(self) -> S {
        self.stats.into_inner()
    }

    // ---------- coins ----------

    /// Current balance. The first read ever initialises it to
    /// [`STARTING_COINS`] and persists that.
    pub fn coins(&mut self) -> i64 {
        match read_json::<Value>(self.stats.store(), keys::COINS) {
            Ok(Some(value)) if !value.is_null() => coins_from_value(&value).max(0),
            Ok(_) => {
                info!("Initialising coin balance to {}", STARTING_COINS);
                write_json_logged(self.stats.store_mut(), keys::COINS, &STARTING_COINS);
                STARTING_COINS
            }
            Err(e) => {
                warn!("Failed reading storage key {}: {}", keys::COINS, e);
                write_json_logged(self.stats.store_mut(), keys::COINS, &STARTING_COINS);
                STARTING_COINS
            }
        }
    }

    /// Overwrite the balance, flooring at 0.
    pub fn set_coins(&mut self, value: i64) {
        write_json_logged(self.stats.store_mut(), keys::COINS, &value.max(0));
    }

    /// Overwrite the balance from an untyped value. Non-numeric input
    /// stores 0.
    pub fn set_coins_value(&mut self, value: &Value) {
        self.set_coins(coins_from_value(value));
    }

    /// Add `delta` to the balance, flooring at 0. Returns the new balance.
    pub fn add_coins(&mut self, delta: i64) -> i64 {
        let next = self.coins().saturating_add(delta).max(0);
        self.set_coins(next);
        next
    }

    /// Add an untyped delta. Non-numeric input adds 0.
    pub fn add_coins_value(&mut self, delta: &Value) -> i64 {
        self.add_coins(coins_from_value(delta))
    }

    // ---------- owned ----------

    /// Owned creatures, in insertion order.
    pub fn owned(&self) -> Vec<OwnedEntry> {
        read_json_or(self.stats.store(), keys::OWNED, Vec::new())
    }

    /// Whether a creature named `name` is owned.
    pub fn owns(&self, name: &str) -> bool {
        self.owned().iter().any(|entry| entry.name == name)
    }

    /// Add a creature to the collection unless one with the same name is
    /// already owned, then make sure its stats exist.
    ///
    /// Creatures without a name are ignored. Returns whether a new entry
    /// was stored; a dropped write counts as not stored.
    pub fn add_owned(&mut self, creature: &Creature) -> bool {
        if !creature.has_name() {
            return false;
        }

        let mut owned = self.owned();
        let stored = if owned.iter().any(|entry| entry.name == creature.name) {
            false
        } else {
            owned.push(OwnedEntry::from(creature));
            write_json_logged(self.stats.store_mut(), keys::OWNED, &owned)
        };

        self.stats.get_stats(creature);
        stored
    }

    /// Remove the creature named exactly `name`. Returns whether one was
    /// removed.
    pub fn remove_owned(&mut self, name: &str) -> bool {
        let owned = self.owned();
        let before = owned.len();
        let kept: Vec<OwnedEntry> = owned.into_iter().filter(|entry| entry.name != name).collect();
        if kept.len() == before {
            return false;
        }
        write_json_logged(self.stats.store_mut(), keys::OWNED, &kept);
        true
    }

    // ---------- items ----------

    /// Inventory, in insertion order.
    pub fn items(&self) -> Vec<Value> {
        read_json_or(self.stats.store(), keys::ITEMS, Vec::new())
    }

    /// Append an item. No validation and no deduplication.
    pub fn add_item(&mut self, item: Value) {
        let mut items = self.items();
        items.push(item);
        write_json_logged(self.stats.store_mut(), keys::ITEMS, &items);
    }

    // ---------- battle team ----------

    /// The persisted battle team.
    pub fn battle_team(&self) -> Vec<OwnedEntry> {
        read_json_or(self.stats.store(), keys::BATTLE, Vec::new())
    }

    /// Replace the battle team with the first two entries of `team`, each
    /// stripped to `name`, `img` and `level`. Returns what was stored.
    pub fn set_battle_team<I, E>(&mut self, team: I) -> Vec<OwnedEntry>
    where
        I: IntoIterator<Item = E>,
        E: Into<OwnedEntry>,
    {
        let cleaned: Vec<OwnedEntry> = team
            .into_iter()
            .take(BATTLE_TEAM_SIZE)
            .map(Into::into)
            .collect();
        write_json_logged(self.stats.store_mut(), keys::BATTLE, &cleaned);
        cleaned
    }

    /// Empty the battle team.
    pub fn clear_battle_team(&mut self) {
        write_json_logged(self.stats.store_mut(), keys::BATTLE, &Vec::<OwnedEntry>::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use serde_json::json;

    fn collection() -> CollectionStore<MemoryStore> {
        CollectionStore::new(MemoryStore::new())
    }

    #[test]
    fn test_coins_initialise_once() {
        let mut c = collection();
        assert_eq!(c.coins(), STARTING_COINS);
        assert_eq!(
            c.store().get(keys::COINS).unwrap().as_deref(),
            Some("1000")
        );

        c.set_coins(5);
        assert_eq!(c.coins(), 5);
    }

    #[test]
    fn test_coins_floor_at_zero() {
        let mut c = collection();
        c.set_coins(-5);
        assert_eq!(c.coins(), 0);

        c.set_coins(1000);
        assert_eq!(c.add_coins(-2000), 0);
        assert_eq!(c.coins(), 0);
    }

    #[test]
    fn test_untyped_coin_input() {
        let mut c = collection();
        c.set_coins_value(&json!("abc"));
        assert_eq!(c.coins(), 0);

        c.set_coins_value(&json!("250"));
        assert_eq!(c.coins(), 250);

        assert_eq!(c.add_coins_value(&json!({"not": "a number"})), 250);
        assert_eq!(c.add_coins_value(&json!(null)), 250);
        assert_eq!(c.add_coins_value(&json!(10.9)), 260);
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(3)), 3.0);
        assert_eq!(coerce_number(&json!(" 12 ")), 12.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert!(coerce_number(&json!([1])).is_nan());
    }

    #[test]
    fn test_add_owned_is_idempotent_and_assigns_stats() {
        let mut c = collection();
        let agumon = Creature::new("Agumon", "a.png", "Rookie");

        assert!(c.add_owned(&agumon));
        assert!(!c.add_owned(&agumon));
        assert_eq!(c.owned(), vec![OwnedEntry::from(&agumon)]);
        assert!(c.stats().cached("Agumon").is_some());
    }

    #[test]
    fn test_add_owned_keeps_level_spelling() {
        let mut c = collection();
        c.add_owned(&Creature::new("Koromon", "k.png", "In-Training"));
        c.set_battle_team(&[Creature::new("Tokomon", "t.png", "In-Training")]);

        let owned: Value =
            serde_json::from_str(&c.store().get(keys::OWNED).unwrap().unwrap()).unwrap();
        assert_eq!(
            owned,
            json!([{"name": "Koromon", "img": "k.png", "level": "In-Training"}])
        );
        assert_eq!(c.battle_team()[0].level.as_str(), "In-Training");
    }

    #[test]
    fn test_add_owned_reports_dropped_write() {
        let mut c = CollectionStore::new(MemoryStore::with_quota(40));
        assert!(!c.add_owned(&Creature::new("Agumon", "https://example.com/agumon.jpg", "Rookie")));
        assert!(c.owned().is_empty());
    }

    #[test]
    fn test_add_owned_without_name_is_noop() {
        let mut c = collection();
        assert!(!c.add_owned(&Creature::default()));
        assert!(c.owned().is_empty());
        assert!(c.store().is_empty());
    }

    #[test]
    fn test_remove_owned() {
        let mut c = collection();
        c.add_owned(&Creature::new("Agumon", "", "Rookie"));
        c.add_owned(&Creature::new("Gabumon", "", "Rookie"));

        assert!(!c.remove_owned("agumon"));
        assert!(c.remove_owned("Agumon"));
        assert!(!c.owns("Agumon"));
        assert!(c.owns("Gabumon"));
        // Stats are never deleted
        assert!(c.stats().cached("Agumon").is_some());
    }

    #[test]
    fn test_items_append_without_dedup() {
        let mut c = collection();
        c.add_item(json!("potion"));
        c.add_item(json!("potion"));
        c.add_item(json!({"kind": "chip", "power": 3}));
        assert_eq!(c.items().len(), 3);
        assert_eq!(c.items()[0], json!("potion"));
    }

    #[test]
    fn test_battle_team_truncates_and_strips() {
        let mut c = collection();
        let mut agumon = Creature::new("Agumon", "a.png", "Rookie");
        agumon.atk = Some(80.0);
        let team = vec![
            agumon,
            Creature::new("Gabumon", "g.png", "Rookie"),
            Creature::new("Patamon", "p.png", "Rookie"),
        ];

        let stored = c.set_battle_team(&team);
        assert_eq!(stored.len(), 2);
        assert_eq!(c.battle_team(), stored);

        let raw: Value =
            serde_json::from_str(&c.store().get(keys::BATTLE).unwrap().unwrap()).unwrap();
        assert_eq!(
            raw,
            json!([
                {"name": "Agumon", "img": "a.png", "level": "Rookie"},
                {"name": "Gabumon", "img": "g.png", "level": "Rookie"}
            ])
        );

        c.clear_battle_team();
        assert!(c.battle_team().is_empty());
    }

    #[test]
    fn test_storage_failure_degrades() {
        let mut store = MemoryStore::new();
        store.set_available(false);
        let mut c = CollectionStore::new(store);

        assert_eq!(c.coins(), STARTING_COINS);
        assert!(c.owned().is_empty());
        assert!(!c.add_owned(&Creature::new("Agumon", "", "Rookie")));
        assert!(c.owned().is_empty());
        c.add_item(json!(1));
        assert!(c.items().is_empty());
    }

    #[test]
    fn test_quota_drops_write() {
        let mut c = CollectionStore::new(MemoryStore::with_quota(64));
        c.set_coins(10);
        c.add_item(json!("x".repeat(100)));
        assert!(c.items().is_empty());
        assert_eq!(c.coins(), 10);
    }
}
