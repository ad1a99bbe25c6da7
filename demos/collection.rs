//! Collection example: Coins, owned creatures and the battle team
//!
//! This example demonstrates:
//! - The starting coin balance and its floor at zero
//! - Adding owned creatures (stats are assigned on the way in)
//! - Storing a two-creature battle team

use digivault::storage::MemoryStore;
use digivault::*;
use serde_json::json;

fn main() {
    let mut collection = CollectionStore::new(MemoryStore::new());

    println!("Starting balance: {}", collection.coins());
    println!("After spending 300: {}", collection.add_coins(-300));
    println!("After overspending: {}", collection.add_coins(-5000));

    println!("\nAdding creatures:");
    for (name, level) in [("Agumon", "Rookie"), ("Koromon", "In-Training"), ("Agumon", "Rookie")] {
        let added = collection.add_owned(&Creature::new(name, "", level));
        println!("  - {} ({}): {}", name, level, if added { "added" } else { "already owned" });
    }

    collection.add_item(json!({"name": "Potion", "heal": 20}));

    println!("\n=== Collection ===");
    for entry in collection.owned() {
        let triple = collection.stats().get_stats(&entry.to_creature());
        println!("{:<10} {:<12} {}", entry.name, entry.level, triple);
    }
    println!("Items: {}", collection.items().len());

    let owned = collection.owned();
    let team = collection.set_battle_team(&owned);
    println!("\nBattle team:");
    for entry in &team {
        println!("  - {}", entry.name);
    }
}
