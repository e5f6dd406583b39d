//! # World Persistence
//!
//! One directory per save:
//!
//! - `world.dat`: seed, day length and time, then the players
//! - `chunk<id>.dat`: one file per chunk that has been written out
//!
//! Every file is a whitespace-separated text record. A record is parsed into
//! temporaries first and only turned into live state once all of it parsed,
//! so a truncated file never leaves a half-loaded world or chunk behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use strata_core::record::{write_line, RecordError, Tokens};
use strata_core::{ChunkDims, Entity};
use strata_procedural::{Chunk, WorldSeed};
use tracing::{debug, info};

use crate::config::WorldConfig;
use crate::error::{WorldError, WorldResult};
use crate::streamer::GameWorld;

/// World-level scalars stored in `world.dat`.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldRecord {
    /// World seed.
    pub seed: WorldSeed,
    /// Length of a day in seconds.
    pub day_duration: f32,
    /// Seconds since sunrise.
    pub day_time: f32,
    /// Players, main player first.
    pub players: Vec<Entity>,
}

impl WorldRecord {
    /// Serializes the record:
    ///
    /// ```text
    /// seed
    /// dayDuration dayTime
    /// playerCount
    /// <one line per player>
    /// ```
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        write_line(&mut out, [self.seed.value()]);
        write_line(&mut out, [self.day_duration, self.day_time]);
        write_line(&mut out, [self.players.len()]);
        for player in &self.players {
            player.serialize(&mut out);
        }
        out
    }

    /// Parses a record written by [`WorldRecord::serialize`].
    ///
    /// # Errors
    ///
    /// Fails on truncation, bad or non-finite tokens, a non-positive day
    /// length, or trailing data.
    pub fn deserialize(text: &str) -> Result<Self, RecordError> {
        let mut tokens = Tokens::new(text);
        let seed = WorldSeed::new(tokens.take("seed")?);
        let day_duration = tokens.take_finite("day duration")?;
        let day_time = tokens.take_finite("day time")?;
        if day_duration <= 0.0 {
            return Err(RecordError::Inconsistent(format!(
                "day duration {day_duration} is not positive"
            )));
        }

        let count: usize = tokens.take("player count")?;
        let mut players = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            players.push(Entity::deserialize(&mut tokens)?);
        }

        if !tokens.is_exhausted() {
            return Err(RecordError::Inconsistent(
                "unexpected data after the last player".to_owned(),
            ));
        }

        Ok(Self {
            seed,
            day_duration,
            day_time,
            players,
        })
    }
}

/// Reads and writes save directories.
pub struct WorldLoader;

impl WorldLoader {
    /// Name of the world-level file.
    pub const WORLD_FILE: &'static str = "world.dat";

    /// Path of `world.dat` in a save directory.
    #[must_use]
    pub fn world_path(dir: &Path) -> PathBuf {
        dir.join(Self::WORLD_FILE)
    }

    /// Path of `chunk<id>.dat` in a save directory.
    #[must_use]
    pub fn chunk_path(dir: &Path, id: i32) -> PathBuf {
        dir.join(format!("chunk{id}.dat"))
    }

    /// Placeholder name for a new save: `World_<unix seconds>`.
    #[must_use]
    pub fn dummy_world_name() -> String {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        format!("World_{seconds}")
    }

    /// Saves `world.dat` and every resident chunk into `dir`, creating it if
    /// needed. The world adopts `dir` as its save directory only after every
    /// write succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptySavePath`] for an empty path and
    /// [`WorldError::Io`] for any failed write.
    pub fn save_world(dir: &Path, world: &mut GameWorld) -> WorldResult<()> {
        if dir.as_os_str().is_empty() {
            return Err(WorldError::EmptySavePath);
        }
        create_dir(dir)?;

        let record = world.record();
        write_file(&Self::world_path(dir), &record.serialize())?;
        for chunk in world.loaded_chunks().values() {
            Self::save_chunk(dir, chunk)?;
        }

        world.set_save_directory(dir.to_path_buf());
        info!(path = ?dir, chunks = world.loaded_chunks().len(), "saved world");
        Ok(())
    }

    /// Loads a world from `dir`.
    ///
    /// The players' neighbourhoods are admitted immediately, reading chunk
    /// files from `dir` and generating the ones that are missing.
    ///
    /// # Errors
    ///
    /// Fails if `world.dat` is missing, unreadable, malformed or lists no
    /// players, or if `config` is invalid. Nothing is constructed on failure.
    pub fn load_world(dir: &Path, config: WorldConfig) -> WorldResult<GameWorld> {
        let record = Self::read_world_record(dir)?;
        let world = GameWorld::restore(config, record, dir.to_path_buf())?;
        info!(path = ?dir, "loaded world");
        Ok(world)
    }

    /// Reads and validates `world.dat` without building a world.
    ///
    /// # Errors
    ///
    /// See [`WorldLoader::load_world`].
    pub fn read_world_record(dir: &Path) -> WorldResult<WorldRecord> {
        let path = Self::world_path(dir);
        let text = fs::read_to_string(&path).map_err(|source| WorldError::Io {
            path: path.clone(),
            source,
        })?;
        let record = WorldRecord::deserialize(&text).map_err(|source| WorldError::Malformed {
            path: path.clone(),
            source,
        })?;
        if record.players.is_empty() {
            return Err(WorldError::NoPlayers(path));
        }
        Ok(record)
    }

    /// Writes `chunk<id>.dat`, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Io`] if the directory or file cannot be written.
    pub fn save_chunk(dir: &Path, chunk: &Chunk) -> WorldResult<()> {
        if dir.as_os_str().is_empty() {
            return Err(WorldError::EmptySavePath);
        }
        create_dir(dir)?;
        write_file(&Self::chunk_path(dir, chunk.id()), &chunk.serialize())?;
        debug!(chunk_id = chunk.id(), "saved chunk");
        Ok(())
    }

    /// Reads `chunk<id>.dat`.
    ///
    /// Returns `Ok(None)` when the file does not exist; the caller is
    /// expected to generate the chunk instead.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, does not parse, or was written with
    /// chunk dimensions other than `dims`.
    pub fn load_chunk(dir: &Path, id: i32, dims: ChunkDims) -> WorldResult<Option<Chunk>> {
        let path = Self::chunk_path(dir, id);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(WorldError::Io { path, source }),
        };

        let chunk = Chunk::deserialize(id, &text)
            .map_err(|source| WorldError::Malformed { path, source })?;
        if chunk.dims() != dims {
            return Err(WorldError::DimensionMismatch {
                chunk_id: id,
                found_width: chunk.dims().width(),
                found_height: chunk.dims().height(),
                width: dims.width(),
                height: dims.height(),
            });
        }

        debug!(chunk_id = id, "loaded chunk");
        Ok(Some(chunk))
    }
}

fn create_dir(dir: &Path) -> WorldResult<()> {
    fs::create_dir_all(dir).map_err(|source| WorldError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> WorldResult<()> {
    fs::write(path, contents).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })
}
