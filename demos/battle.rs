//! Battle example: Deterministic stats feeding a randomized fight
//!
//! This example demonstrates:
//! - Generating stats through the cached stat store
//! - Picking two creatures with the selection
//! - Running a seeded battle and reading the report

use digivault::storage::MemoryStore;
use digivault::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    let mut stats = StatStore::new(MemoryStore::new());
    let mut selection = Selection::new(SelectionMode::Battle);

    println!("Picking fighters:");
    for (name, level) in [("Agumon", "Rookie"), ("Gabumon", "Rookie"), ("Greymon", "Champion")] {
        let creature = Creature::new(name, "", level);
        let triple = stats.get_stats(&creature);
        println!("  - {} ({}): {}", name, level, triple);

        // A third pick evicts the oldest one
        if let ToggleOutcome::Replaced { evicted } =
            selection.toggle(SelectedCreature::from_creature(&creature, triple))
        {
            println!("    {} left the arena", evicted.name);
        }
    }

    let Some((a, b)) = selection.pair() else {
        println!("Select two Digimon first");
        return;
    };

    let mut rng = StdRng::seed_from_u64(42);
    let report = simulate_battle_with(a.into(), b.into(), &mut rng);

    println!("\n=== Battle ===");
    for line in &report.logs {
        println!("{}", line);
    }

    println!("\nScore Breakdown:");
    for side in &report.sides {
        println!("  {}: offense {:.2}, score {:.2}", side.name, side.offense, side.score);
    }
}
