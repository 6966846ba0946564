//! Horology headless driver.
//! Loads a save, runs the economy at a fixed cadence with a scripted player,
//! then saves and logs a summary.

mod autoplay;
mod storage;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use horology_core::event::event_multiplier;
use horology_core::rates::{cash_rate, collection_value, momentum_rate};
use horology_core::registry::Registry;
use horology_core::serialize::{SerializeError, encode};
use horology_core::sim::{SimConfig, step};
use horology_core::storage::{LoadOutcome, SaveStorage, StorageError, load_game, save_game};
use horology_data::{DataLoadError, GameData, load_game_data};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::autoplay::Autoplayer;
use crate::storage::FileStorage;

/// Run the idle economy without a UI
#[derive(Parser, Debug)]
#[command(name = "horology-headless")]
#[command(about = "Simulate the watch-collecting economy with a scripted player")]
struct Args {
    /// Directory holding optional balance.* and sim.* files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Save file to resume from and write back to
    #[arg(long, default_value = "horology-save.json")]
    save: PathBuf,

    /// Ignore and delete any existing save
    #[arg(long, default_value_t = false)]
    fresh: bool,

    /// Number of simulation steps to run
    #[arg(long, default_value_t = 3_600)]
    steps: u64,

    /// Milliseconds covered by each step
    #[arg(long, default_value_t = 1_000)]
    step_ms: u64,

    /// Start clock in epoch milliseconds (defaults to the wall clock)
    #[arg(long)]
    start_ms: Option<u64>,

    /// Seed for negotiation rolls
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Tension the player negotiates at
    #[arg(long, default_value_t = 3)]
    tension: u32,

    /// Log a progress line every this many steps (0 disables)
    #[arg(long, default_value_t = 600)]
    report_every: u64,

    /// Print the final save envelope to stdout
    #[arg(long, default_value_t = false)]
    dump: bool,
}

#[derive(Debug, thiserror::Error)]
enum HeadlessError {
    #[error(transparent)]
    Data(#[from] DataLoadError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error("could not format save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("system clock is before the unix epoch")]
    Clock,
}

fn wall_clock_ms() -> Result<u64, HeadlessError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| HeadlessError::Clock)?;
    Ok(elapsed.as_millis() as u64)
}

fn run(args: Args) -> Result<(), HeadlessError> {
    let GameData { registry, sim } = match &args.data_dir {
        Some(dir) => load_game_data(dir)?,
        None => GameData {
            registry: Registry::standard().clone(),
            sim: SimConfig::default(),
        },
    };

    let mut storage = FileStorage::new(args.save.clone());
    if args.fresh {
        storage.clear()?;
    }

    let mut now = match args.start_ms {
        Some(ms) => ms,
        None => wall_clock_ms()?,
    };

    let mut state = match load_game(&storage, &registry)? {
        LoadOutcome::Fresh(state) => {
            info!(save = %storage.path().display(), "starting a new game");
            state
        }
        LoadOutcome::Restored(save) => {
            if let Some(from) = save.migrated_from {
                info!(from, "save upgraded from an older format");
            }
            // One catch-up step; long absences are clamped by max_step_ms.
            let away = now.saturating_sub(save.header.saved_at);
            step(&save.state, away, now, &registry, &sim)
        }
        LoadOutcome::Rejected { state, reason } => {
            warn!(%reason, "discarding unreadable save");
            storage.clear()?;
            state
        }
    };

    let mut player = Autoplayer::new(args.seed, args.tension);
    for i in 1..=args.steps {
        now = now.saturating_add(args.step_ms);
        state = step(&state, args.step_ms, now, &registry, &sim);
        state = player.act(&state, &registry, now);

        if args.report_every > 0 && i % args.report_every == 0 {
            info!(
                step = i,
                cash = state.cash,
                momentum = state.momentum,
                items = state.total_owned(),
                cash_per_s = cash_rate(&state, &registry, event_multiplier(&state, &registry, now)),
                "progress"
            );
        }
    }

    save_game(&mut storage, &state, now)?;

    let stats = player.stats();
    info!(
        cash = state.cash,
        momentum = state.momentum,
        collection_value = collection_value(&state, &registry),
        momentum_per_s = momentum_rate(&state, &registry),
        blueprints = state.workshop.blueprints,
        heritage = state.maison.heritage,
        reputation = state.maison.reputation,
        nostalgia_points = state.nostalgia.points,
        achievements = state.achievements.len(),
        career_level = state.career.level,
        "final state"
    );
    info!(?stats, "autoplay summary");

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&encode(&state, now)?)?);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        error!(error = %err, "headless run failed");
        std::process::exit(1);
    }
}
