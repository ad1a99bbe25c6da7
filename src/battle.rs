//! Single-round battle simulation.
//!
//! A battle compares two randomized scores. Each side's offense is its
//! attack scaled by a random factor plus 60% of its special; its score is
//! that offense minus the opponent's randomly scaled defense. Scores closer
//! than [`TIE_THRESHOLD`] are settled by a coin flip.
//!
//! The outcome depends on the random source and is never cached.

use crate::creature::SelectedCreature;
use crate::stats::StatTriple;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Random factor range applied to attack.
pub const OFFENSE_FACTOR: Range<f64> = 0.85..1.15;

/// Random factor range applied to defense.
pub const DEFENSE_FACTOR: Range<f64> = 0.9..1.1;

/// Share of the special stat added to offense.
pub const ESP_WEIGHT: f64 = 0.6;

/// Score gap below which the battle is a technical tie.
pub const TIE_THRESHOLD: f64 = 1.0;

/// One side of a battle: a name and the stats it fights with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combatant<'a> {
    pub name: &'a str,
    pub stats: StatTriple,
}

impl<'a> Combatant<'a> {
    pub fn new(name: &'a str, stats: StatTriple) -> Self {
        Self { name, stats }
    }
}

impl<'a> From<&'a SelectedCreature> for Combatant<'a> {
    fn from(selected: &'a SelectedCreature) -> Self {
        Self {
            name: &selected.name,
            stats: selected.stats,
        }
    }
}

/// Per-side figures of a finished battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideResult {
    pub name: String,
    /// Randomized attack plus special contribution.
    pub offense: f64,
    /// Offense minus the opponent's randomized defense.
    pub score: f64,
}

/// Outcome of [`simulate_battle`].
///
/// `logs` always holds both sides' offensive totals (one decimal place),
/// a tie line if the coin was flipped, and a final winner line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub winner: String,
    pub logs: Vec<String>,
    pub sides: [SideResult; 2],
    /// Whether the winner was decided by a coin flip.
    pub tie: bool,
}

impl BattleReport {
    /// Whether `name` won.
    pub fn is_winner(&self, name: &str) -> bool {
        self.winner == name
    }
}

/// Simulate a battle using the thread-local random source.
///
/// # Examples
///
/// ```rust
/// use digivault::{simulate_battle, Combatant, StatTriple};
///
/// let report = simulate_battle(
///     Combatant::new("Agumon", StatTriple::new(80, 50, 40)),
///     Combatant::new("Gabumon", StatTriple::new(40, 90, 20)),
/// );
/// assert!(report.winner == "Agumon" || report.winner == "Gabumon");
/// assert!(report.logs.last().unwrap().contains(&report.winner));
/// ```
pub fn simulate_battle(a: Combatant<'_>, b: Combatant<'_>) -> BattleReport {
    simulate_battle_with(a, b, &mut rand::thread_rng())
}

/// Simulate a battle with an explicit random source.
///
/// Four independent draws are made: an offense factor and a defense factor
/// for each side.
pub fn simulate_battle_with<R: Rng>(
    a: Combatant<'_>,
    b: Combatant<'_>,
    rng: &mut R,
) -> BattleReport {
    let offense_a = offense(&a.stats, rng);
    let defense_b = defense(&b.stats, rng);
    let offense_b = offense(&b.stats, rng);
    let defense_a = defense(&a.stats, rng);

    let score_a = offense_a - defense_b;
    let score_b = offense_b - defense_a;

    let mut logs = vec![
        format!("{} attacks with {:.1}", a.name, offense_a),
        format!("{} attacks with {:.1}", b.name, offense_b),
    ];

    let tie = (score_a - score_b).abs() < TIE_THRESHOLD;
    let a_wins = if tie {
        logs.push("Technical tie! A coin flip decides the winner.".to_string());
        rng.gen_bool(0.5)
    } else {
        score_a > score_b
    };

    let winner = if a_wins { a.name } else { b.name };
    logs.push(format!("Winner: {}", winner));

    BattleReport {
        winner: winner.to_string(),
        logs,
        sides: [
            SideResult {
                name: a.name.to_string(),
                offense: offense_a,
                score: score_a,
            },
            SideResult {
                name: b.name.to_string(),
                offense: offense_b,
                score: score_b,
            },
        ],
        tie,
    }
}

fn offense<R: Rng>(stats: &StatTriple, rng: &mut R) -> f64 {
    stats.atk as f64 * rng.gen_range(OFFENSE_FACTOR) + stats.esp as f64 * ESP_WEIGHT
}

fn defense<R: Rng>(stats: &StatTriple, rng: &mut R) -> f64 {
    stats.def as f64 * rng.gen_range(DEFENSE_FACTOR)
}
