//! Headless world driver.
//!
//! Opens (or creates) a save directory, walks the main player to the right
//! for a fixed number of ticks, then saves.
//!
//! Usage: `strata-headless [config.toml] [save-dir] [seed phrase]`
//!
//! Log level follows `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use strata_core::Vec3;
use strata_procedural::WorldSeed;
use strata_world::{GameWorld, WorldConfig, WorldLoader, WorldResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Simulated frame length in milliseconds.
const TICK_MS: f32 = 16.0;

/// Number of simulated frames.
const TICKS: u32 = 1_800;

/// Rightward push applied to the main player every frame.
const WALK_ACCELERATION: f32 = 60.0;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map_or_else(|| PathBuf::from("strata.toml"), PathBuf::from);
    let save_dir = args
        .next()
        .map_or_else(|| Path::new("saves").join(WorldLoader::dummy_world_name()), PathBuf::from);
    let phrase = args.next();

    match run(&config_path, &save_dir, phrase.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "headless run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path, save_dir: &Path, phrase: Option<&str>) -> WorldResult<()> {
    let config = WorldConfig::load(config_path)?;

    let mut world = if WorldLoader::world_path(save_dir).exists() {
        WorldLoader::load_world(save_dir, config)?
    } else {
        let seed = phrase.map_or_else(WorldSeed::default, WorldSeed::from_phrase);
        let mut world = GameWorld::new(config, seed)?;
        world.set_save_directory(save_dir.to_path_buf());
        world
    };

    for tick in 0..TICKS {
        world
            .main_player_mut()
            .accelerate(Vec3::new(WALK_ACCELERATION, 0.0, 0.0));
        world.update(TICK_MS);

        if tick % 300 == 0 {
            let player = world.main_player();
            info!(
                tick,
                x = player.position().x,
                chunk = world.entity_chunk(player),
                resident = ?world.loaded_chunks().keys().collect::<Vec<_>>(),
                daylight = world.day_cycle().daylight(),
                "tick"
            );
        }
    }

    world.save_all()?;
    info!(path = ?save_dir, "session saved");
    Ok(())
}
