use digivault::gallery::{Action, GalleryState};
use digivault::stats::{generate_stats, STAT_MAX};
use digivault::storage::{keys, KeyValueStore, MemoryStore};
use digivault::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn pick(collection: &mut CollectionStore<MemoryStore>, creature: &Creature) -> SelectedCreature {
    let stats = collection.stats().get_stats(creature);
    SelectedCreature::from_creature(creature, stats)
}

// ============================================================================
// Stats
// ============================================================================

/// Test that lookups are idempotent even when other fields change.
#[test]
fn test_get_stats_idempotent_across_field_changes() {
    let mut stats = StatStore::new(MemoryStore::new());

    let mut agumon = Creature::new("Agumon", "agumon.jpg", "Rookie");
    let first = stats.get_stats(&agumon);

    agumon.level = Level::Mega;
    agumon.img = "other.jpg".to_string();
    let second = stats.get_stats(&agumon);

    assert_eq!(first, second);
    assert_eq!(first, generate_stats("Agumon", &Level::Rookie));
}

/// Test the worked example: Agumon at Rookie.
#[test]
fn test_agumon_example() {
    let mut store = MemoryStore::new();
    {
        let mut stats = StatStore::new(&mut store);
        let triple = stats.get_stats(&Creature::new("Agumon", "", "Rookie"));
        assert_eq!(triple, StatTriple { atk: 45, def: 59, esp: 46 });
    }

    // A fresh store over the same storage returns the persisted triple
    let mut reopened = StatStore::new(&mut store);
    assert_eq!(
        reopened.cached("Agumon"),
        Some(StatTriple { atk: 45, def: 59, esp: 46 })
    );
    assert_eq!(
        reopened.get_stats(&Creature::new("Agumon", "", "Mega")),
        StatTriple { atk: 45, def: 59, esp: 46 }
    );
}

/// Test that every generated component is within bounds.
#[test]
fn test_all_components_bounded() {
    let mut stats = StatStore::new(MemoryStore::new());
    let levels = ["Fresh", "In Training", "Rookie", "Champion", "Ultimate", "Mega", "Armor", ""];

    for i in 0..300 {
        for level in levels {
            let creature = Creature::new(format!("Digi{}{}", level, i), "", level);
            let triple = stats.get_stats(&creature);
            assert!(triple.atk <= STAT_MAX);
            assert!(triple.def <= STAT_MAX);
            assert!(triple.esp <= STAT_MAX);
        }
    }
}

// ============================================================================
// Collection
// ============================================================================

/// Test coin flooring from the documented examples.
#[test]
fn test_coin_floor_examples() {
    let mut collection = CollectionStore::new(MemoryStore::new());

    collection.set_coins(-5);
    assert_eq!(collection.coins(), 0);

    collection.set_coins(1000);
    assert_eq!(collection.add_coins(-2000), 0);
}

/// Test that adding an owned creature writes the owned list and the stats
/// map as two separate keys.
#[test]
fn test_add_owned_writes_two_keys() {
    let mut collection = CollectionStore::new(MemoryStore::new());
    collection.add_owned(&Creature::new("Patamon", "p.png", "Rookie"));

    let store = collection.store();
    assert!(store.get(keys::OWNED).unwrap().is_some());
    assert!(store.get(keys::STATS).unwrap().is_some());
    assert!(store.get(keys::COINS).unwrap().is_none());
}

/// Test that the battle team keeps the first two entries, stripped.
#[test]
fn test_battle_team_from_selection() {
    let mut collection = CollectionStore::new(MemoryStore::new());
    let team: Vec<SelectedCreature> = ["Agumon", "Gabumon", "Patamon"]
        .iter()
        .map(|name| pick(&mut collection, &Creature::new(*name, "", "Rookie")))
        .collect();

    collection.set_battle_team(&team);
    let stored = collection.battle_team();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].name, "Agumon");
    assert_eq!(stored[1].name, "Gabumon");

    let raw = collection.store().get(keys::BATTLE).unwrap().unwrap();
    assert!(!raw.contains("stats"));
    assert!(!raw.contains("atk"));
}

// ============================================================================
// Selection and battle
// ============================================================================

/// Test that toggling a creature twice restores the selection.
#[test]
fn test_double_toggle_restores_selection() {
    let mut collection = CollectionStore::new(MemoryStore::new());
    let agumon = pick(&mut collection, &Creature::new("Agumon", "", "Rookie"));
    let gabumon = pick(&mut collection, &Creature::new("Gabumon", "", "Rookie"));

    let mut selection = Selection::new(SelectionMode::Battle);
    selection.toggle(agumon);
    let before: Vec<String> = selection.names().map(String::from).collect();

    selection.toggle(gabumon.clone());
    selection.toggle(gabumon);
    let after: Vec<String> = selection.names().map(String::from).collect();

    assert_eq!(before, after);
}

/// Test that a third pick evicts exactly the first one.
#[test]
fn test_third_pick_evicts_first() {
    let mut collection = CollectionStore::new(MemoryStore::new());
    let mut selection = Selection::new(SelectionMode::Battle);

    for name in ["Agumon", "Gabumon", "Patamon"] {
        let selected = pick(&mut collection, &Creature::new(name, "", "Rookie"));
        selection.toggle(selected);
    }

    assert!(!selection.contains("Agumon"));
    assert!(selection.contains("Gabumon"));
    assert!(selection.contains("Patamon"));
}

/// Test the battle distribution between a strong and a weak creature.
#[test]
fn test_battle_distribution() {
    let strong = StatTriple::new(80, 50, 40);
    let weak = StatTriple::new(40, 90, 20);
    let mut rng = StdRng::seed_from_u64(2024);

    let mut strong_wins = 0;
    let mut weak_wins = 0;
    for _ in 0..1000 {
        let report = simulate_battle_with(
            Combatant::new("Strong", strong),
            Combatant::new("Weak", weak),
            &mut rng,
        );
        for side in &report.sides {
            assert!(side.offense.is_finite());
            assert!(side.score.is_finite());
        }
        match report.winner.as_str() {
            "Strong" => strong_wins += 1,
            "Weak" => weak_wins += 1,
            other => panic!("unexpected winner {}", other),
        }
    }

    assert!(strong_wins > weak_wins);
    assert!(strong_wins > 700);
    assert!(weak_wins > 0);
}

// ============================================================================
// Gallery flow
// ============================================================================

/// Test the full flow: load, filter, pick two, fight.
#[test]
fn test_gallery_flow() {
    let mut stats = StatStore::new(MemoryStore::new());
    let mut state = GalleryState::new();

    state.apply(Action::Loaded(vec![
        Creature::new("Agumon", "a.jpg", "Rookie"),
        Creature::new("Gabumon", "g.jpg", "Rookie"),
        Creature::new("Greymon", "gr.jpg", "Champion"),
    ]));
    state.apply(Action::SetLevel("Rookie".to_string()));
    assert_eq!(state.visible().count(), 2);

    state.click("Agumon", &mut stats);
    state.click("Gabumon", &mut stats);
    state.click("Greymon", &mut stats);

    let names: Vec<&str> = state.selection().names().collect();
    assert_eq!(names, ["Gabumon", "Greymon"]);

    let mut rng = StdRng::seed_from_u64(9);
    let report = state.fight_with(&mut rng).unwrap();
    assert!(report.logs.iter().any(|line| line.starts_with("Gabumon attacks with")));
    assert!(report.logs.iter().any(|line| line.starts_with("Greymon attacks with")));

    // Every clicked creature now has persisted stats
    for name in ["Agumon", "Gabumon", "Greymon"] {
        assert!(stats.cached(name).is_some());
    }
}
