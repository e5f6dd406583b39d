//! # World Streamer
//!
//! Keeps a sliding window of chunks resident around every player.
//!
//! ## Streaming Guarantee
//!
//! After every admission pass, for every player standing in chunk `c`, the
//! chunks `c - 1`, `c` and `c + 1` are resident.
//!
//! ## Admission / Eviction
//!
//! 1. **Eviction**: a chunk whose centre is farther than the retention radius
//!    from every player is written to the save directory and dropped.
//! 2. **Admission**: each player's missing neighbourhood chunks are read
//!    from the save directory, or generated when no file exists.
//!
//! Eviction runs first, so a chunk is never evicted and re-admitted in the
//! same pass. With the minimum retention factor of 1.5 a player's own
//! neighbourhood always satisfies the retention test.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use strata_core::{BlockType, ChunkDims, Entity, EntityType, Rect, Vec3, BLOCK_HEIGHT, BLOCK_WIDTH};
use strata_procedural::{world_x_to_column, world_y_to_row, Chunk, TerrainGenerator, WorldSeed};
use tracing::{debug, info, warn};

use crate::config::WorldConfig;
use crate::day_cycle::DayCycle;
use crate::error::{WorldError, WorldResult};
use crate::persistence::{WorldLoader, WorldRecord};

/// The live world: resident chunks, players and the clock.
#[derive(Debug)]
pub struct GameWorld {
    config: WorldConfig,
    dims: ChunkDims,
    generator: TerrainGenerator,
    seed: WorldSeed,
    day: DayCycle,
    save_directory: Option<PathBuf>,
    chunks: BTreeMap<i32, Chunk>,
    players: Vec<Entity>,
    /// Chunk id of each player as of the last admission pass.
    player_chunks: Vec<i32>,
    has_changed: bool,
}

impl GameWorld {
    /// Creates a new world: generates the initial strip of
    /// `config.initial_chunks` chunks around chunk 0 and stands one player
    /// on chunk 0.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] if `config` does not validate.
    pub fn new(config: WorldConfig, seed: WorldSeed) -> WorldResult<Self> {
        config.validate()?;
        let mut world = Self::empty(config, seed, 0.0, None);

        for id in TerrainGenerator::initial_ids(world.config.initial_chunks) {
            let chunk = world.generate(id);
            world.chunks.insert(id, chunk);
        }
        let position = world.chunks.get(&0).map_or(Vec3::ZERO, spawn_position);
        world.players.push(Entity::spawn(position, EntityType::Player));
        world.recompute_loaded_chunks();

        info!(seed = seed.value(), "created world");
        Ok(world)
    }

    /// Adopts chunks produced by the generator.
    ///
    /// An empty list is replaced by a single flat chunk. Chunks with the
    /// wrong dimensions are dropped. The player spawns on chunk 0 when it is
    /// present, otherwise on the first chunk.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Config`] if `config` does not validate.
    pub fn from_chunks(config: WorldConfig, chunks: Vec<Chunk>, seed: WorldSeed) -> WorldResult<Self> {
        config.validate()?;
        let mut world = Self::empty(config, seed, 0.0, None);

        for chunk in chunks {
            if chunk.dims() != world.dims {
                warn!(chunk_id = chunk.id(), "dropping chunk with foreign dimensions");
                continue;
            }
            world.chunks.insert(chunk.id(), chunk);
        }
        if world.chunks.is_empty() {
            warn!("no chunks given, starting from a single flat chunk");
            world.chunks.insert(0, world.generator.generate_flat_chunk());
        }

        let spawn_id = if world.chunks.contains_key(&0) {
            0
        } else {
            world.chunks.keys().next().copied().unwrap_or(0)
        };
        let position = world
            .chunks
            .get(&spawn_id)
            .map_or(Vec3::ZERO, spawn_position);
        world.players.push(Entity::spawn(position, EntityType::Player));
        world.recompute_loaded_chunks();
        Ok(world)
    }

    /// Rebuilds a world from a validated `world.dat` record.
    pub(crate) fn restore(config: WorldConfig, record: WorldRecord, dir: PathBuf) -> WorldResult<Self> {
        if record.players.is_empty() {
            return Err(WorldError::NoPlayers(WorldLoader::world_path(&dir)));
        }
        let config = WorldConfig {
            day_duration: record.day_duration,
            ..config
        };
        config.validate()?;

        let mut world = Self::empty(config, record.seed, record.day_time, Some(dir));
        world.players = record.players;
        world.recompute_loaded_chunks();
        Ok(world)
    }

    fn empty(config: WorldConfig, seed: WorldSeed, day_time: f32, save_directory: Option<PathBuf>) -> Self {
        let dims = config.dims();
        Self {
            day: DayCycle::new(config.day_duration, day_time),
            generator: TerrainGenerator::new(dims),
            dims,
            config,
            seed,
            save_directory,
            chunks: BTreeMap::new(),
            players: Vec::new(),
            player_chunks: Vec::new(),
            has_changed: true,
        }
    }

    /// Advances the simulation by `dt_ms` milliseconds.
    ///
    /// Moves the clock, every player and every resident entity, hands
    /// entities that crossed a chunk border to their new chunk, and runs an
    /// admission pass if any player changed chunk.
    pub fn update(&mut self, dt_ms: f32) {
        let drag = self.config.drag;
        self.day.update(dt_ms);

        for player in &mut self.players {
            player.update(dt_ms, drag);
        }
        for chunk in self.chunks.values_mut() {
            for entity in chunk.entities_mut() {
                entity.update(dt_ms, drag);
            }
        }
        self.rehome_entities();

        let current: Vec<i32> = self.players.iter().map(|p| self.entity_chunk(p)).collect();
        if current != self.player_chunks {
            self.recompute_loaded_chunks();
        }
    }

    /// Moves entities that left their chunk into the resident chunk that now
    /// contains them. Entities heading into non-resident chunks stay put.
    fn rehome_entities(&mut self) {
        let dims = self.dims;
        let resident: BTreeSet<i32> = self.chunks.keys().copied().collect();
        let mut moving = Vec::new();

        for (&id, chunk) in &mut self.chunks {
            let entities = chunk.entities_mut();
            let mut index = 0;
            while index < entities.len() {
                let target = dims.chunk_id_at(entities[index].position().x);
                if target != id && resident.contains(&target) {
                    moving.push((target, entities.remove(index)));
                } else {
                    index += 1;
                }
            }
        }
        for (target, entity) in moving {
            if let Some(chunk) = self.chunks.get_mut(&target) {
                chunk.add_entity(entity);
            }
        }
    }

    /// Runs one eviction pass followed by one admission pass.
    pub fn recompute_loaded_chunks(&mut self) {
        let max_distance = self.config.max_distance_squared();
        let player_xs: Vec<f32> = self.players.iter().map(|p| p.position().x).collect();

        let evicted: Vec<i32> = self
            .chunks
            .values()
            .filter(|chunk| {
                let center = chunk.center_x();
                player_xs
                    .iter()
                    .all(|&x| (center - x) * (center - x) > max_distance)
            })
            .map(Chunk::id)
            .collect();
        for id in evicted {
            if let Some(chunk) = self.chunks.remove(&id) {
                self.persist(&chunk);
            }
        }

        let dims = self.dims;
        self.player_chunks = self
            .players
            .iter()
            .map(|p| dims.chunk_id_at(p.position().x))
            .collect();
        let mut wanted: Vec<i32> = self
            .player_chunks
            .iter()
            .flat_map(|&id| [id - 1, id, id + 1])
            .collect();
        wanted.sort_unstable();
        wanted.dedup();

        for id in wanted {
            if !self.chunks.contains_key(&id) {
                let chunk = self.load_or_generate(id);
                self.chunks.insert(id, chunk);
                self.has_changed = true;
            }
        }

        debug!(resident = self.chunks.len(), "recomputed loaded chunks");
    }

    /// Writes an evicted chunk to the save directory. Without a save
    /// directory the chunk is dropped and will be regenerated.
    fn persist(&mut self, chunk: &Chunk) {
        self.has_changed = true;
        let Some(dir) = &self.save_directory else {
            debug!(chunk_id = chunk.id(), "evicted chunk without a save directory");
            return;
        };
        match WorldLoader::save_chunk(dir, chunk) {
            Ok(()) => debug!(chunk_id = chunk.id(), "evicted chunk"),
            Err(e) => warn!(chunk_id = chunk.id(), error = %e, "failed to save evicted chunk"),
        }
    }

    /// Reads chunk `id` from the save directory, or generates it.
    fn load_or_generate(&self, id: i32) -> Chunk {
        if let Some(dir) = &self.save_directory {
            match WorldLoader::load_chunk(dir, id, self.dims) {
                Ok(Some(chunk)) => return chunk,
                Ok(None) => {}
                Err(e) => warn!(chunk_id = id, error = %e, "failed to load chunk, generating"),
            }
        }
        self.generate(id)
    }

    fn generate(&self, id: i32) -> Chunk {
        if self.config.flat {
            let mut chunk = self.generator.generate_flat_chunk();
            chunk.set_id(id);
            return chunk;
        }
        self.generator
            .generate_world_chunk(self.seed, id, self.config.biome_choice(), self.config.decorate)
    }

    /// Sets the block at world coordinates.
    ///
    /// Returns false, logging why, if `y` lies outside the world or `x`
    /// falls in a chunk that is not resident.
    pub fn set_block(&mut self, x: f32, y: f32, block: BlockType) -> bool {
        let Some(row) = world_y_to_row(self.dims, y) else {
            debug!(x, y, "ignoring edit outside the world's vertical extent");
            return false;
        };
        let (id, column) = world_x_to_column(self.dims, x);
        let Some(chunk) = self.chunks.get_mut(&id) else {
            warn!(chunk_id = id, x, y, "cannot edit a chunk that is not loaded");
            return false;
        };
        chunk.set_block(column, row, block);
        self.has_changed = true;
        true
    }

    /// Block at world coordinates. Air outside the world or in chunks that
    /// are not resident.
    #[must_use]
    pub fn get_block(&self, x: f32, y: f32) -> BlockType {
        let Some(row) = world_y_to_row(self.dims, y) else {
            return BlockType::Air;
        };
        let (id, column) = world_x_to_column(self.dims, x);
        self.chunks
            .get(&id)
            .map_or(BlockType::Air, |chunk| chunk.get_block(column, row))
    }

    /// Resident chunks overlapping the viewport rectangle.
    #[must_use]
    pub fn visible_chunks(&self, viewport: &Rect) -> Vec<&Chunk> {
        self.chunks
            .values()
            .filter(|chunk| chunk.bounds().intersects(viewport))
            .collect()
    }

    /// Id of the chunk containing an entity, derived from its position.
    #[must_use]
    pub fn entity_chunk(&self, entity: &Entity) -> i32 {
        self.dims.chunk_id_at(entity.position().x)
    }

    /// Adds an entity to the world.
    ///
    /// Players join the player list and trigger an admission pass. Other
    /// entities go to the resident chunk containing them; if that chunk is
    /// not resident the entity is rejected and false is returned.
    pub fn spawn_entity(&mut self, entity: Entity) -> bool {
        if entity.is_player() {
            self.players.push(entity);
            self.recompute_loaded_chunks();
            return true;
        }

        let id = self.entity_chunk(&entity);
        let Some(chunk) = self.chunks.get_mut(&id) else {
            warn!(chunk_id = id, "cannot spawn an entity in a chunk that is not loaded");
            return false;
        };
        chunk.add_entity(entity);
        self.has_changed = true;
        true
    }

    /// Saves `world.dat` and every resident chunk to the save directory.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptySavePath`] when no save directory is set,
    /// or the first write error.
    pub fn save_all(&mut self) -> WorldResult<()> {
        let dir = self.save_directory.clone().ok_or(WorldError::EmptySavePath)?;
        WorldLoader::save_world(&dir, self)
    }

    /// World-level scalars as written to `world.dat`.
    #[must_use]
    pub fn record(&self) -> WorldRecord {
        WorldRecord {
            seed: self.seed,
            day_duration: self.day.duration(),
            day_time: self.day.time(),
            players: self.players.clone(),
        }
    }

    /// World seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Session settings.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Chunk dimensions of the session.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Day/night clock.
    #[inline]
    #[must_use]
    pub const fn day_cycle(&self) -> &DayCycle {
        &self.day
    }

    /// True if blocks or resident chunks changed since the flag was cleared.
    #[inline]
    #[must_use]
    pub const fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// Sets or clears the change flag (the renderer clears it after
    /// rebuilding its draw data).
    pub fn set_has_changed(&mut self, changed: bool) {
        self.has_changed = changed;
    }

    /// Directory evicted chunks are written to, if any.
    #[must_use]
    pub fn save_directory(&self) -> Option<&Path> {
        self.save_directory.as_deref()
    }

    /// Sets the directory evicted chunks are written to.
    pub fn set_save_directory(&mut self, dir: PathBuf) {
        self.save_directory = Some(dir);
    }

    /// The first player.
    #[must_use]
    pub fn main_player(&self) -> &Entity {
        &self.players[0]
    }

    /// Mutable access to the first player, for input handling.
    pub fn main_player_mut(&mut self) -> &mut Entity {
        &mut self.players[0]
    }

    /// All players, main player first.
    #[must_use]
    pub fn players(&self) -> &[Entity] {
        &self.players
    }

    /// Mutable access to the players. The list itself cannot shrink, so
    /// there is always at least one player.
    pub fn players_mut(&mut self) -> &mut [Entity] {
        &mut self.players
    }

    /// Resident chunks by id.
    #[must_use]
    pub fn loaded_chunks(&self) -> &BTreeMap<i32, Chunk> {
        &self.chunks
    }

    /// A resident chunk.
    #[must_use]
    pub fn chunk(&self, id: i32) -> Option<&Chunk> {
        self.chunks.get(&id)
    }
}

/// Spawn point above the surface at the middle column of a chunk.
fn spawn_position(chunk: &Chunk) -> Vec3 {
    let dims = chunk.dims();
    let column = dims.width() / 2;
    let row = chunk.surface_row(column).unwrap_or(dims.height() - 1);
    Vec3::new(
        chunk.world_position().x + (column as f32 + 0.5) * BLOCK_WIDTH,
        (dims.height() - row) as f32 * BLOCK_HEIGHT,
        0.0,
    )
}
