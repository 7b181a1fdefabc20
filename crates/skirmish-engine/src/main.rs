//! Match engine binary.
//!
//! Loads the arena catalogue from `skirmish-config.yaml`, builds the
//! engine, and drives it with a fixed-interval tick loop until
//! interrupted. Without a host process attached it runs against the
//! in-memory session stub and plays out one demo match, which makes the
//! binary useful for watching the phase machine in the logs.
//!
//! # Startup Sequence
//!
//! 1. Load configuration (`SKIRMISH_CONFIG` overrides the path)
//! 2. Initialize structured logging (tracing)
//! 3. Build the arena catalogue and the engine
//! 4. Seed the demo match
//! 5. Run the tick loop until Ctrl-C

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use skirmish_core::config::EngineConfig;
use skirmish_core::engine::Engine;
use skirmish_core::sessions::{SessionDirectory, StubSessions};
use skirmish_types::{ArenaRules, PlayerId, Position, TeamColor};

use crate::error::EngineError;

/// Default config path, relative to the working directory.
const CONFIG_PATH: &str = "skirmish-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the demo match
/// cannot be seeded.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    let config = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!(
        tick_interval_ms = config.engine.tick_interval_ms,
        arenas = config.arenas.len(),
        "skirmish-engine starting"
    );

    let sessions = Arc::new(StubSessions::new());
    let mut engine = Engine::from_config(&config, Arc::clone(&sessions) as Arc<dyn SessionDirectory>);
    if engine.arena_names().is_empty() {
        warn!("No arenas configured, registering the demo arena");
        engine.register_arena(demo_arena());
    }

    seed_demo_match(&mut engine, &sessions)?;

    let mut interval = tokio::time::interval(Duration::from_millis(config.engine.tick_interval_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                engine.tick();
            }
            _ = tokio::signal::ctrl_c() => {
                info!(ticks = engine.ticks(), "Shutdown requested");
                break;
            }
        }
    }

    info!(
        ticks = engine.ticks(),
        active_matches = engine.active_matches(),
        "skirmish-engine stopped"
    );
    Ok(())
}

/// Load configuration from disk, falling back to defaults when no file
/// exists (the demo arena covers the empty catalogue).
fn load_config() -> Result<EngineConfig, EngineError> {
    let path_value = std::env::var("SKIRMISH_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_owned());
    let path = Path::new(&path_value);
    if path.exists() {
        Ok(EngineConfig::from_file(path)?)
    } else {
        Ok(EngineConfig::default())
    }
}

/// A small two-team arena with a short countdown, used when the config
/// file provides no arenas.
fn demo_arena() -> skirmish_core::arena::Arena {
    let rules = ArenaRules {
        min_players: 2,
        waiting_countdown_seconds: 10,
        playing_max_seconds: 120,
        done_seconds: 10,
        ..ArenaRules::default()
    };
    let mut arena =
        skirmish_core::arena::Arena::new("demo", Position::new(0.0, 70.0, 0.0), rules);
    for (color, x) in [(TeamColor::Red, -16.0), (TeamColor::Blue, 16.0)] {
        if let Some(allocation) = arena.spawns_mut(color) {
            let _ = allocation.add(Position::new(x, 64.0, -8.0));
            let _ = allocation.add(Position::new(x, 64.0, 8.0));
        }
    }
    arena
}

/// Connect four stub players and put them into the first arena so the
/// tick loop has a match to run.
fn seed_demo_match(engine: &mut Engine, sessions: &StubSessions) -> Result<(), EngineError> {
    let Some(arena) = engine.arena_names().into_iter().next() else {
        return Ok(());
    };

    for name in ["ada", "brooks", "casey", "devon"] {
        let player = PlayerId::new();
        sessions.connect(player, name);
        engine.join(&arena, player)?;
    }
    info!(arena, "Demo match seeded");
    Ok(())
}
