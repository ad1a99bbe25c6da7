//! Terminal front end for the gallery, collection and arena.
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use digivault::api::{load_creatures_file, DigimonApi};
use digivault::battle::simulate_battle_with;
use digivault::config::Config;
use digivault::gallery::{Action, GalleryState, RenderSink};
use digivault::storage::FileStore;
use digivault::train::train_selection;
use digivault::{
    BattleReport, CollectionStore, Creature, SelectedCreature, SelectionMode, StatStore,
    StatTriple,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "digivault", about = "Digimon gallery, collection and arena")]
struct Cli {
    /// Directory holding storage.json (overrides DIGIVAULT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read the creature list from a JSON file instead of the API
    #[arg(long, global = true)]
    offline: Option<PathBuf>,

    /// Use the gallery-only stats cache
    #[arg(long, global = true)]
    legacy_stats: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List creatures with their stats
    Gallery {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        level: String,
    },
    /// Show the stats of one creature
    Stats {
        name: String,
        /// Level to use if the creature is not in the list
        #[arg(long)]
        level: Option<String>,
    },
    /// Fight two creatures
    Battle {
        a: String,
        b: String,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Send one creature to training
    Train { name: String },
    /// Manage owned creatures
    Owned {
        #[command(subcommand)]
        action: OwnedCommand,
    },
    /// Manage the coin balance
    Coins {
        #[command(subcommand)]
        action: CoinsCommand,
    },
    /// Manage the inventory
    Items {
        #[command(subcommand)]
        action: ItemsCommand,
    },
    /// Manage the battle team
    Team {
        #[command(subcommand)]
        action: TeamCommand,
    },
}

#[derive(Subcommand, Debug)]
enum OwnedCommand {
    List,
    Add { name: String },
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
enum CoinsCommand {
    Show,
    Set { value: String },
    Add { delta: String },
}

#[derive(Subcommand, Debug)]
enum ItemsCommand {
    List,
    /// Append a JSON value (bare words are stored as strings)
    Add { item: String },
}

#[derive(Subcommand, Debug)]
enum TeamCommand {
    Show,
    Set { names: Vec<String> },
    Clear,
}

/// Prints cards as one line each.
struct TextSink;

impl RenderSink for TextSink {
    type CardHandle = ();

    fn render_card(&mut self, creature: &Creature, stats: StatTriple, selected: bool) {
        let mark = if selected { "*" } else { " " };
        println!(
            "{} {:<24} {:<12} {}",
            mark, creature.name, creature.level, stats
        );
    }

    fn render_empty(&mut self) {
        println!("No Digimon found.");
    }

    fn set_status(&mut self, status: &str) {
        if !status.is_empty() {
            println!("{}", status);
        }
    }

    fn show_battle(&mut self, report: &BattleReport) {
        for line in &report.logs {
            println!("{}", line);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }
    if cli.legacy_stats {
        config.stats_namespace = digivault::StatsNamespace::Legacy;
    }

    let data_dir = config.resolve_data_dir();
    let store = FileStore::open_in_dir(&data_dir)
        .with_context(|| format!("opening storage in {}", data_dir.display()))?
        .with_quota(config.storage_quota);
    let mut collection =
        CollectionStore::with_stats(StatStore::with_namespace(store, config.stats_namespace));

    match cli.command {
        Command::Gallery { search, level } => {
            let mut state = load_gallery(&config, cli.offline.as_deref()).await;
            state.apply(Action::SetQuery(search));
            state.apply(Action::SetLevel(level));
            state.render(collection.stats(), &mut TextSink);
        }
        Command::Stats { name, level } => {
            let creature = match find_creature(&config, cli.offline.as_deref(), &name).await {
                Ok(creature) => creature,
                Err(e) if level.is_some() => {
                    tracing::debug!("{}; using --level", e);
                    Creature::new(name.clone(), "", level.unwrap_or_default())
                }
                Err(e) => return Err(e),
            };
            let stats = collection.stats().display_stats(&creature);
            println!("{} ({}): {}", creature.name, creature.level, stats);
        }
        Command::Battle { a, b, seed } => {
            let mut state = load_gallery(&config, cli.offline.as_deref()).await;
            for name in [&a, &b] {
                if state.click(name, collection.stats()).is_none() {
                    bail!("unknown Digimon: {}", name);
                }
            }
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let (first, second) = state
                .selection()
                .pair()
                .ok_or_else(|| anyhow!("select two different Digimon"))?;
            let report = simulate_battle_with(first.into(), second.into(), &mut rng);
            TextSink.show_battle(&report);
        }
        Command::Train { name } => {
            let mut state = load_gallery(&config, cli.offline.as_deref())
                .await
                .with_mode(SelectionMode::Train);
            if state.click(&name, collection.stats()).is_none() {
                bail!("unknown Digimon: {}", name);
            }
            let url = train_selection(state.selection())?;
            println!("{}", url);
        }
        Command::Owned { action } => match action {
            OwnedCommand::List => {
                for entry in collection.owned() {
                    let stats = collection.stats().get_stats(&entry.to_creature());
                    println!("{:<24} {:<12} {}", entry.name, entry.level, stats);
                }
            }
            OwnedCommand::Add { name } => {
                let creature = find_creature(&config, cli.offline.as_deref(), &name).await?;
                if collection.add_owned(&creature) {
                    println!("Added {}", creature.name);
                } else {
                    println!("{} is already owned", creature.name);
                }
            }
            OwnedCommand::Remove { name } => {
                if collection.remove_owned(&name) {
                    println!("Removed {}", name);
                } else {
                    println!("{} is not owned", name);
                }
            }
        },
        Command::Coins { action } => {
            match action {
                CoinsCommand::Show => {}
                CoinsCommand::Set { value } => collection.set_coins_value(&parse_loose(&value)),
                CoinsCommand::Add { delta } => {
                    collection.add_coins_value(&parse_loose(&delta));
                }
            }
            println!("Coins: {}", collection.coins());
        }
        Command::Items { action } => match action {
            ItemsCommand::List => {
                for item in collection.items() {
                    println!("{}", item);
                }
            }
            ItemsCommand::Add { item } => {
                collection.add_item(parse_loose(&item));
                println!("Inventory holds {} items", collection.items().len());
            }
        },
        Command::Team { action } => match action {
            TeamCommand::Show => {
                for entry in collection.battle_team() {
                    println!("{:<24} {}", entry.name, entry.level);
                }
            }
            TeamCommand::Set { names } => {
                let mut team = Vec::new();
                for name in &names {
                    let creature = find_creature(&config, cli.offline.as_deref(), name).await?;
                    let stats = collection.stats().get_stats(&creature);
                    team.push(SelectedCreature::from_creature(&creature, stats));
                }
                let stored = collection.set_battle_team(&team);
                println!("Battle team: {} Digimon", stored.len());
            }
            TeamCommand::Clear => {
                collection.clear_battle_team();
                println!("Battle team cleared");
            }
        },
    }

    Ok(())
}

/// Fetch the creature list into a fresh gallery. A failed fetch leaves the
/// gallery in its failed state; the configured display policy decides
/// whether the error reaches the status line.
async fn load_gallery(config: &Config, offline: Option<&std::path::Path>) -> GalleryState {
    let mut state = GalleryState::new().with_error_display(config.error_display);
    let action = match offline {
        Some(path) => match load_creatures_file(path) {
            Ok(creatures) => Action::Loaded(creatures),
            Err(e) => Action::LoadFailed(e.to_string()),
        },
        None => DigimonApi::new(config.api_url.clone()).load_action().await,
    };
    state.apply(action);
    state
}

async fn find_creature(
    config: &Config,
    offline: Option<&std::path::Path>,
    name: &str,
) -> Result<Creature> {
    let state = load_gallery(config, offline).await;
    state
        .find(name)
        .cloned()
        .ok_or_else(|| anyhow!("unknown Digimon: {} ({})", name, state.status()))
}

/// Parse a CLI argument as JSON, falling back to a plain string.
fn parse_loose(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}
