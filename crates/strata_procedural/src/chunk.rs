//! # Chunk
//!
//! A chunk is a fixed-size vertical slice of the world: a flat, row-major
//! grid of blocks (row 0 at the top) plus the entities standing in it.
//!
//! Chunks tile horizontally only. The world position of a chunk is derived
//! from its id and never stored.

use strata_core::record::{write_line, RecordError, RecordResult, Tokens};
use strata_core::{BiomeType, BlockType, ChunkDims, Entity, Rect, Vec2, BLOCK_HEIGHT, BLOCK_WIDTH};

use crate::structure::{read_block, Structure};

/// A resident slice of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    id: i32,
    biome: BiomeType,
    dims: ChunkDims,
    blocks: Vec<BlockType>,
    entities: Vec<Entity>,
    /// Whether this chunk has been modified since it was generated or loaded.
    pub modified: bool,
}

impl Chunk {
    /// Creates a chunk filled with air.
    #[must_use]
    pub fn new(id: i32, biome: BiomeType, dims: ChunkDims) -> Self {
        Self {
            id,
            biome,
            dims,
            blocks: vec![BlockType::Air; dims.area()],
            entities: Vec::new(),
            modified: false,
        }
    }

    /// Chunk id. Negative ids lie left of the spawn chunk.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    /// Re-labels the chunk. Blocks and entities are unchanged.
    pub fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    /// Biome the chunk was generated with.
    #[inline]
    #[must_use]
    pub const fn biome(&self) -> BiomeType {
        self.biome
    }

    /// Dimensions of the block grid.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Top-left corner in world units: `(id * width, height)`.
    #[must_use]
    pub fn world_position(&self) -> Vec2 {
        Vec2::new(
            self.id as f32 * self.dims.world_width(),
            self.dims.height() as f32 * BLOCK_HEIGHT,
        )
    }

    /// World-space rectangle covered by the chunk.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.world_position(),
            self.dims.world_width(),
            self.dims.world_height(),
        )
    }

    /// World x coordinate of the chunk centre.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.world_position().x + self.dims.world_width() / 2.0
    }

    /// Flat index of a cell: `row * width + column`.
    #[inline]
    #[must_use]
    pub const fn block_index(&self, x: usize, y: usize) -> usize {
        y * self.dims.width() + x
    }

    /// Block at (column, row). Out-of-range cells read as air.
    #[inline]
    #[must_use]
    pub fn get_block(&self, x: usize, y: usize) -> BlockType {
        if x < self.dims.width() && y < self.dims.height() {
            self.blocks[self.block_index(x, y)]
        } else {
            BlockType::Air
        }
    }

    /// Sets the block at (column, row). Returns false for out-of-range cells.
    #[inline]
    pub fn set_block(&mut self, x: usize, y: usize, block: BlockType) -> bool {
        if x < self.dims.width() && y < self.dims.height() {
            let index = self.block_index(x, y);
            self.blocks[index] = block;
            self.modified = true;
            true
        } else {
            false
        }
    }

    /// All blocks, row-major.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// Fills a whole row with one block.
    pub fn fill_row(&mut self, y: usize, block: BlockType) {
        for x in 0..self.dims.width() {
            self.set_block(x, y, block);
        }
    }

    /// Topmost non-air row of a column, if any.
    #[must_use]
    pub fn surface_row(&self, x: usize) -> Option<usize> {
        (0..self.dims.height()).find(|&y| !self.get_block(x, y).is_air())
    }

    /// Stamps a structure into the chunk.
    ///
    /// Air cells of the template and cells falling outside the chunk are
    /// skipped. Returns the number of blocks written.
    pub fn place_structure(&mut self, structure: &Structure) -> usize {
        let width = self.dims.width() as i64;
        let height = self.dims.height() as i64;
        let mut placed = 0;

        for (x, y, block) in structure.cells() {
            if block.is_air() || !(0..width).contains(&x) || !(0..height).contains(&y) {
                continue;
            }
            if self.set_block(x as usize, y as usize, block) {
                placed += 1;
            }
        }
        placed
    }

    /// Entities owned by this chunk.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Mutable access to the owned entities.
    #[inline]
    pub fn entities_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.entities
    }

    /// Hands an entity to this chunk.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// True if world x coordinate `x` lies inside this chunk.
    #[must_use]
    pub fn contains_x(&self, x: f32) -> bool {
        self.dims.chunk_id_at(x) == self.id
    }

    /// Serializes the chunk as a text record:
    ///
    /// ```text
    /// biomeId
    /// width height
    /// <one line of block ids per row>
    /// entityCount
    /// <one line per entity>
    /// ```
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.blocks.len() * 3 + 64);
        write_line(&mut out, [self.biome.id()]);
        write_line(&mut out, [self.dims.width(), self.dims.height()]);
        for row in self.blocks.chunks(self.dims.width()) {
            write_line(&mut out, row.iter().map(|block| block.id()));
        }
        write_line(&mut out, [self.entities.len()]);
        for entity in &self.entities {
            entity.serialize(&mut out);
        }
        out
    }

    /// Parses a chunk record written by [`Chunk::serialize`].
    ///
    /// The record is parsed completely before a chunk is built, so a
    /// truncated or corrupt file never yields a half-filled chunk.
    ///
    /// # Errors
    ///
    /// Fails on truncation, bad tokens, unknown ids, dimensions below the
    /// minimum or too large to address, or trailing garbage.
    pub fn deserialize(id: i32, text: &str) -> RecordResult<Self> {
        let mut tokens = Tokens::new(text);

        let biome_id: u32 = tokens.take("biome id")?;
        let biome = BiomeType::from_id(biome_id).ok_or(RecordError::UnknownId {
            kind: "biome",
            id: u64::from(biome_id),
        })?;

        let width: usize = tokens.take("chunk width")?;
        let height: usize = tokens.take("chunk height")?;
        let dims = ChunkDims::checked(width, height).ok_or_else(|| {
            RecordError::Inconsistent(format!("chunk dimensions {width}x{height} are out of range"))
        })?;

        // The header is untrusted; the block count only grows as tokens are read.
        let mut blocks = Vec::with_capacity(dims.area().min(1 << 16));
        for _ in 0..dims.area() {
            blocks.push(read_block(&mut tokens)?);
        }

        let entity_count: usize = tokens.take("entity count")?;
        let mut entities = Vec::with_capacity(entity_count.min(1024));
        for _ in 0..entity_count {
            entities.push(Entity::deserialize(&mut tokens)?);
        }

        if !tokens.is_exhausted() {
            return Err(RecordError::Inconsistent(
                "unexpected data after the last entity".to_owned(),
            ));
        }

        Ok(Self {
            id,
            biome,
            dims,
            blocks,
            entities,
            modified: false,
        })
    }
}

/// Converts a world y coordinate to a chunk row (row 0 = top).
///
/// Returns `None` outside `[0, height)`.
#[must_use]
pub fn world_y_to_row(dims: ChunkDims, y: f32) -> Option<usize> {
    let cell = (y / BLOCK_HEIGHT).floor();
    if cell < 0.0 || cell >= dims.height() as f32 {
        return None;
    }
    Some(dims.height() - 1 - cell as usize)
}

/// Converts a world x coordinate to `(chunk id, column)`.
#[must_use]
pub fn world_x_to_column(dims: ChunkDims, x: f32) -> (i32, usize) {
    let id = dims.chunk_id_at(x);
    let cell = (x / BLOCK_WIDTH).floor() as i64;
    let column = cell - i64::from(id) * dims.width() as i64;
    (id, column.clamp(0, dims.width() as i64 - 1) as usize)
}
