//! Stat triples and their deterministic generator.
//!
//! Every creature gets three combat attributes derived only from its name
//! and level. The same inputs always produce the same triple; there is no
//! randomness in generation.

use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of every stat component.
pub const STAT_MAX: u8 = 100;

/// Triple returned for creatures that have no name.
pub const FALLBACK_STATS: StatTriple = StatTriple {
    atk: 10,
    def: 10,
    esp: 10,
};

/// The three derived combat attributes of a creature.
///
/// Components are always within `0..=100`. Values read from JSON are
/// rounded and clamped on the way in, so a hand-edited store cannot
/// produce out-of-range stats.
///
/// # Examples
///
/// ```rust
/// use digivault::StatTriple;
///
/// let stats = StatTriple::new(120, -4, 55);
/// assert_eq!(stats, StatTriple { atk: 100, def: 0, esp: 55 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStatTriple")]
pub struct StatTriple {
    pub atk: u8,
    pub def: u8,
    pub esp: u8,
}

impl StatTriple {
    /// Build a triple, clamping each component into `0..=100`.
    pub fn new(atk: i64, def: i64, esp: i64) -> Self {
        Self {
            atk: clamp_component(atk as f64),
            def: clamp_component(def as f64),
            esp: clamp_component(esp as f64),
        }
    }

    /// Sum of all three components.
    pub fn total(&self) -> u16 {
        self.atk as u16 + self.def as u16 + self.esp as u16
    }
}

impl fmt::Display for StatTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ATK {} / DEF {} / ESP {}", self.atk, self.def, self.esp)
    }
}

/// Wire shape accepted when reading triples back from storage.
#[derive(Deserialize)]
struct RawStatTriple {
    #[serde(default)]
    atk: f64,
    #[serde(default)]
    def: f64,
    #[serde(default)]
    esp: f64,
}

impl From<RawStatTriple> for StatTriple {
    fn from(raw: RawStatTriple) -> Self {
        Self {
            atk: clamp_component(raw.atk),
            def: clamp_component(raw.def),
            esp: clamp_component(raw.esp),
        }
    }
}

fn clamp_component(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, STAT_MAX as f64) as u8
}

/// Polynomial rolling hash of a name.
///
/// Computes `hash = hash * 31 + unit` over the UTF-16 code units of the
/// name with 32-bit signed wrap-around, starting at 0.
///
/// # Examples
///
/// ```rust
/// use digivault::stats::name_hash;
///
/// assert_eq!(name_hash(""), 0);
/// assert_eq!(name_hash("a"), 97);
/// assert_eq!(name_hash("ab"), 97 * 31 + 98);
/// ```
pub fn name_hash(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(unit as i32)
        })
}

/// Generate the stat triple for a name at a given level.
///
/// The base value is `45 + |hash| % 20`; each component then adds its own
/// slice of the hash (`|hash|`, `|hash| >> 3`, `|hash| >> 6`, each mod 25),
/// is scaled by the level weight, rounded, and capped at 100.
///
/// # Examples
///
/// ```rust
/// use digivault::{Level, StatTriple};
/// use digivault::stats::generate_stats;
///
/// let stats = generate_stats("Agumon", &Level::Rookie);
/// assert_eq!(stats, StatTriple { atk: 45, def: 59, esp: 46 });
/// ```
pub fn generate_stats(name: &str, level: &Level) -> StatTriple {
    let abs = name_hash(name).unsigned_abs();
    let weight = level.weight();

    let base = 45 + abs % 20;
    let component = |slice: u32| -> u8 {
        let scaled = ((base + slice % 25) as f64 * weight).round();
        scaled.min(STAT_MAX as f64) as u8
    };

    StatTriple {
        atk: component(abs),
        def: component(abs >> 3),
        esp: component(abs >> 6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_hash_known_values() {
        assert_eq!(name_hash("Agumon"), 1_959_611_325);
        // Long names wrap into the negative range
        assert_eq!(name_hash("WarGreymon"), -380_350_491);
    }

    #[test]
    fn test_generate_known_triples() {
        assert_eq!(
            generate_stats("Agumon", &Level::Rookie),
            StatTriple { atk: 45, def: 59, esp: 46 }
        );
        assert_eq!(
            generate_stats("Gabumon", &Level::Rookie),
            StatTriple { atk: 55, def: 50, esp: 55 }
        );
        assert_eq!(
            generate_stats("Koromon", &Level::from("In Training")),
            StatTriple { atk: 60, def: 63, esp: 59 }
        );
        assert_eq!(
            generate_stats("WarGreymon", &Level::Mega),
            StatTriple { atk: 97, def: 90, esp: 77 }
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        for name in ["Agumon", "Botamon", "Omnimon", "", "Ω-mon"] {
            let a = generate_stats(name, &Level::Champion);
            let b = generate_stats(name, &Level::Champion);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_level_changes_triple() {
        let rookie = generate_stats("Agumon", &Level::Rookie);
        let mega = generate_stats("Agumon", &Level::Mega);
        assert_ne!(rookie, mega);
        assert_eq!(mega, StatTriple { atk: 68, def: 88, esp: 69 });
    }

    #[test]
    fn test_components_within_bounds() {
        let levels = [
            Level::Fresh,
            Level::from("In Training"),
            Level::Rookie,
            Level::Champion,
            Level::Ultimate,
            Level::Mega,
            Level::default(),
        ];
        for i in 0..500 {
            let name = format!("Creature{}", i * 7919);
            for level in &levels {
                let stats = generate_stats(&name, level);
                assert!(stats.atk <= STAT_MAX);
                assert!(stats.def <= STAT_MAX);
                assert!(stats.esp <= STAT_MAX);
            }
        }
    }

    #[test]
    fn test_empty_name_uses_zero_hash() {
        assert_eq!(i32::MIN.unsigned_abs(), 2_147_483_648);
        // base 45, every slice 0: 45 * 1.35 = 60.75
        assert_eq!(
            generate_stats("", &Level::Mega),
            StatTriple { atk: 61, def: 61, esp: 61 }
        );
    }

    #[test]
    fn test_deserialize_clamps() {
        let stats: StatTriple =
            serde_json::from_str(r#"{"atk": 250, "def": -3, "esp": 41.6}"#).unwrap();
        assert_eq!(stats, StatTriple { atk: 100, def: 0, esp: 42 });
    }

    #[test]
    fn test_deserialize_missing_fields_default_to_zero() {
        let stats: StatTriple = serde_json::from_str(r#"{"atk": 12}"#).unwrap();
        assert_eq!(stats, StatTriple { atk: 12, def: 0, esp: 0 });
    }

    #[test]
    fn test_display() {
        let stats = StatTriple::new(1, 2, 3);
        assert_eq!(stats.to_string(), "ATK 1 / DEF 2 / ESP 3");
        assert_eq!(stats.total(), 6);
    }
}
