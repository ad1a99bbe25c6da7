//! Level tiers.
//!
//! A level is the evolutionary stage string reported by the creature API
//! ("Rookie", "Champion", ...). It doubles as the multiplier key for stat
//! generation. Unknown strings are kept verbatim so they round-trip through
//! storage unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight applied to levels that are missing or not in the table.
pub const DEFAULT_LEVEL_WEIGHT: f64 = 0.95;

/// Evolutionary stage of a creature.
///
/// Parsing is exact (case-sensitive), matching the weight table. Both
/// `"In Training"` and `"In-Training"` map to [`Level::InTraining`], which
/// keeps the spelling it was read with so it is written back unchanged.
///
/// # Examples
///
/// ```rust
/// use digivault::Level;
///
/// assert_eq!(Level::from("Rookie"), Level::Rookie);
/// assert_eq!(Level::from("In-Training").weight(), 0.75);
/// assert_eq!(Level::from("In-Training").as_str(), "In-Training");
/// assert_eq!(Level::from("Armor").weight(), 0.95);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Level {
    Fresh,
    /// "In Training" or "In-Training", as spelled by the source.
    InTraining(String),
    Rookie,
    Champion,
    Ultimate,
    Mega,
    /// Any other stage string, including the empty string for "missing".
    Other(String),
}

impl Level {
    /// Multiplier used by stat generation.
    pub fn weight(&self) -> f64 {
        match self {
            Level::Fresh => 0.6,
            Level::InTraining(_) => 0.75,
            Level::Rookie => 0.9,
            Level::Champion => 1.05,
            Level::Ultimate => 1.2,
            Level::Mega => 1.35,
            Level::Other(_) => DEFAULT_LEVEL_WEIGHT,
        }
    }

    /// The level as spelled by the source.
    pub fn as_str(&self) -> &str {
        match self {
            Level::Fresh => "Fresh",
            Level::InTraining(s) => s,
            Level::Rookie => "Rookie",
            Level::Champion => "Champion",
            Level::Ultimate => "Ultimate",
            Level::Mega => "Mega",
            Level::Other(s) => s,
        }
    }

    /// Whether the level is missing entirely.
    pub fn is_missing(&self) -> bool {
        matches!(self, Level::Other(s) if s.is_empty())
    }

    /// Whether a creature at this level may be sent to training.
    ///
    /// Matches "in training" case-insensitively with an optional space or
    /// hyphen, anywhere in the string.
    pub fn is_trainable(&self) -> bool {
        match self {
            Level::InTraining(_) => true,
            Level::Other(s) => {
                let lower = s.to_lowercase();
                ["in training", "in-training", "intraining"]
                    .iter()
                    .any(|pattern| lower.contains(pattern))
            }
            _ => false,
        }
    }

    /// Case-insensitive comparison against a filter string.
    pub fn matches_filter(&self, filter: &str) -> bool {
        self.as_str().to_lowercase() == filter.to_lowercase()
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Other(String::new())
    }
}

impl From<&str> for Level {
    fn from(s: &str) -> Self {
        match s {
            "Fresh" => Level::Fresh,
            "In Training" | "In-Training" => Level::InTraining(s.to_string()),
            "Rookie" => Level::Rookie,
            "Champion" => Level::Champion,
            "Ultimate" => Level::Ultimate,
            "Mega" => Level::Mega,
            other => Level::Other(other.to_string()),
        }
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match Level::from(s.as_str()) {
            Level::Other(_) => Level::Other(s),
            Level::InTraining(_) => Level::InTraining(s),
            known => known,
        }
    }
}

impl From<Option<String>> for Level {
    fn from(s: Option<String>) -> Self {
        s.map(Level::from).unwrap_or_default()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        match level {
            Level::Other(s) | Level::InTraining(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
