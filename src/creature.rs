//! Creature records.
//!
//! [`Creature`] is what the API returns. [`OwnedEntry`] is the stripped
//! shape persisted in the collection and battle team, and
//! [`SelectedCreature`] is the in-memory shape held by the selection.

use crate::level::Level;
use crate::stats::StatTriple;
use serde::{Deserialize, Serialize};

/// A creature as supplied by the network source.
///
/// The name is the unique key. An empty name means "no name": such a
/// creature gets fallback stats and is ignored by collection mutations.
/// The API may also pre-supply `atk`/`def`/`esp`.
///
/// # Examples
///
/// ```rust
/// use digivault::{Creature, Level};
///
/// let json = r#"{"name":"Koromon","img":"https://x/koromon.jpg","level":"In Training"}"#;
/// let creature: Creature = serde_json::from_str(json).unwrap();
/// assert_eq!(creature.level, Level::from("In Training"));
/// assert!(creature.presupplied_stats().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Creature {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atk: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esp: Option<f64>,
}

impl Creature {
    /// Create a creature without pre-supplied stats.
    pub fn new(name: impl Into<String>, img: impl Into<String>, level: impl Into<Level>) -> Self {
        Self {
            name: name.into(),
            img: img.into(),
            level: level.into(),
            ..Self::default()
        }
    }

    /// Whether the creature carries a usable name.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// The pre-supplied triple, if the API sent all three components.
    pub fn presupplied_stats(&self) -> Option<StatTriple> {
        match (self.atk, self.def, self.esp) {
            (Some(atk), Some(def), Some(esp)) => {
                Some(StatTriple::new(atk.round() as i64, def.round() as i64, esp.round() as i64))
            }
            _ => None,
        }
    }
}

/// A collection or battle-team entry: only `name`, `img` and `level`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OwnedEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub level: Level,
}

impl OwnedEntry {
    /// Rebuild a creature from this entry (without pre-supplied stats).
    pub fn to_creature(&self) -> Creature {
        Creature::new(self.name.clone(), self.img.clone(), self.level.clone())
    }
}

impl From<&Creature> for OwnedEntry {
    fn from(creature: &Creature) -> Self {
        Self {
            name: creature.name.clone(),
            img: creature.img.clone(),
            level: creature.level.clone(),
        }
    }
}

impl From<Creature> for OwnedEntry {
    fn from(creature: Creature) -> Self {
        Self {
            name: creature.name,
            img: creature.img,
            level: creature.level,
        }
    }
}

impl From<&SelectedCreature> for OwnedEntry {
    fn from(selected: &SelectedCreature) -> Self {
        Self {
            name: selected.name.clone(),
            img: selected.img.clone(),
            level: selected.level.clone(),
        }
    }
}

impl From<&OwnedEntry> for OwnedEntry {
    fn from(entry: &OwnedEntry) -> Self {
        entry.clone()
    }
}

/// A creature picked by the user, carrying the stats shown on its card.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCreature {
    pub name: String,
    pub img: String,
    pub stats: StatTriple,
    pub level: Level,
}

impl SelectedCreature {
    /// Pair a creature with the stats it was rendered with.
    pub fn from_creature(creature: &Creature, stats: StatTriple) -> Self {
        Self {
            name: creature.name.clone(),
            img: creature.img.clone(),
            stats,
            level: creature.level.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let creature: Creature = serde_json::from_str("{}").unwrap();
        assert!(!creature.has_name());
        assert!(creature.level.is_missing());
    }

    #[test]
    fn test_presupplied_requires_all_three() {
        let json = r#"{"name":"Agumon","atk":80,"def":50}"#;
        let creature: Creature = serde_json::from_str(json).unwrap();
        assert!(creature.presupplied_stats().is_none());

        let json = r#"{"name":"Agumon","atk":80,"def":50,"esp":140}"#;
        let creature: Creature = serde_json::from_str(json).unwrap();
        assert_eq!(
            creature.presupplied_stats(),
            Some(StatTriple { atk: 80, def: 50, esp: 100 })
        );
    }

    #[test]
    fn test_owned_entry_strips_extra_fields() {
        let mut creature = Creature::new("Agumon", "a.png", "Rookie");
        creature.atk = Some(99.0);
        let entry = OwnedEntry::from(&creature);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Agumon", "img": "a.png", "level": "Rookie"})
        );
    }
}
