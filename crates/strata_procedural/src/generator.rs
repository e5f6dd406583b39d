//! # Terrain Generator
//!
//! Constrained control-point interpolation:
//!
//! 1. Pick the biome (or take the requested one) from the chunk seed's
//!    biome stream.
//! 2. Seed a [`ChaCha8Rng`] from the chunk seed.
//! 3. Resolve the biome's terrain shape for the chunk dimensions.
//! 4. Random-walk `N` control heights inside the biome's height band, each
//!    step bounded by the biome's slope range.
//! 5. Linearly interpolate a surface height for every column.
//! 6. Lay down the surface block, two rows of sub-surface, then filler.
//! 7. Overwrite the bottom row with bedrock.
//!
//! Decoration (trees, ponds, ores) is a separate pass that draws from its
//! own derived stream, so it never changes the terrain profile.

use std::ops::RangeInclusive;

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use strata_core::{BiomeProperties, BiomeType, BlockType, ChunkDims};
use tracing::debug;

use crate::chunk::Chunk;
use crate::decoration;
use crate::seed::WorldSeed;

/// Rows of `layer2_block` under the surface block.
pub const SUBSURFACE_DEPTH: usize = 2;

/// Which biome a chunk should be generated with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BiomeChoice {
    /// Uniformly among all biomes except [`BiomeType::SuperFlat`].
    #[default]
    Random,
    /// A specific biome.
    Fixed(BiomeType),
}

impl From<BiomeType> for BiomeChoice {
    fn from(biome: BiomeType) -> Self {
        Self::Fixed(biome)
    }
}

impl From<Option<BiomeType>> for BiomeChoice {
    fn from(biome: Option<BiomeType>) -> Self {
        biome.map_or(Self::Random, Self::Fixed)
    }
}

/// Surface profile computed while generating a chunk.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainProfile {
    /// Interpolation anchors, in blocks above the world bottom.
    pub control_heights: Vec<f32>,
    /// Row of the surface block in each column (row 0 = top).
    pub surface_rows: Vec<usize>,
}

/// Generates chunks for one world session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainGenerator {
    dims: ChunkDims,
}

impl TerrainGenerator {
    /// Creates a generator for the given chunk dimensions.
    #[must_use]
    pub const fn new(dims: ChunkDims) -> Self {
        Self { dims }
    }

    /// Chunk dimensions this generator produces.
    #[inline]
    #[must_use]
    pub const fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Generates an undecorated chunk (id 0).
    #[must_use]
    pub fn generate_chunk(&self, seed: WorldSeed, biome: impl Into<BiomeChoice>) -> Chunk {
        self.generate_terrain(seed, biome).0
    }

    /// Generates an undecorated chunk (id 0) and returns its surface profile.
    #[must_use]
    pub fn generate_terrain(
        &self,
        seed: WorldSeed,
        biome: impl Into<BiomeChoice>,
    ) -> (Chunk, TerrainProfile) {
        let biome = match biome.into() {
            BiomeChoice::Fixed(biome) => biome,
            // SuperFlat is the last id and never picked at random.
            BiomeChoice::Random => {
                let mut rng = seed.derive(WorldSeed::BIOME).rng();
                BiomeType::ALL[rng.gen_range(0..BiomeType::COUNT - 1)]
            }
        };
        let mut rng = seed.rng();
        self.generate_with_properties(&mut rng, biome, biome.properties())
    }

    /// Generates terrain from explicit biome properties.
    ///
    /// A control-point count below 2 is raised to 2.
    #[must_use]
    pub fn generate_with_properties(
        &self,
        rng: &mut ChaCha8Rng,
        biome: BiomeType,
        props: &BiomeProperties,
    ) -> (Chunk, TerrainProfile) {
        let width = self.dims.width();
        let height = self.dims.height();
        let shape = props.terrain_shape(self.dims);
        let points = shape.control_point_count.max(2);

        let min_height = shape.min_height as f32;
        let max_height = shape.max_height as f32;
        let mut control_heights = Vec::with_capacity(points);
        control_heights.push(rng.gen_range(shape.min_height..=shape.max_height) as f32);
        for i in 1..points {
            let slope = if shape.min_slope < shape.max_slope {
                rng.gen_range(shape.min_slope..=shape.max_slope)
            } else {
                shape.min_slope
            };
            let next = (control_heights[i - 1] + slope).clamp(min_height, max_height);
            control_heights.push(next);
        }

        let spacing = width as f32 / (points - 1) as f32;
        let mut chunk = Chunk::new(0, biome, self.dims);
        let mut surface_rows = Vec::with_capacity(width);

        for x in 0..width {
            let surface = interpolate(&control_heights, spacing, x as f32);
            let cell = (surface.floor() as i64).clamp(0, height as i64 - 1) as usize;
            let row = height - 1 - cell;
            surface_rows.push(row);

            for y in row..height - 1 {
                let block = if y == row {
                    props.layer1_block
                } else if y <= row + SUBSURFACE_DEPTH {
                    props.layer2_block
                } else {
                    props.layer3_block
                };
                chunk.set_block(x, y, block);
            }
        }

        chunk.fill_row(height - 1, BlockType::FLOOR);
        chunk.modified = false;

        debug!(biome = %biome, points, "generated terrain");

        (
            chunk,
            TerrainProfile {
                control_heights,
                surface_rows,
            },
        )
    }

    /// Generates a chunk and then scatters trees, water and ores over it.
    #[must_use]
    pub fn generate_decorated_chunk(&self, seed: WorldSeed, biome: impl Into<BiomeChoice>) -> Chunk {
        let (mut chunk, profile) = self.generate_terrain(seed, biome);
        let mut rng = seed.derive(WorldSeed::DECORATION).rng();
        decoration::decorate(&mut chunk, &profile, &mut rng);
        chunk.modified = false;
        chunk
    }

    /// Generates chunk `id` of a world, seeded with `world_seed + id` and
    /// optionally decorated.
    #[must_use]
    pub fn generate_world_chunk(
        &self,
        world_seed: WorldSeed,
        id: i32,
        biome: impl Into<BiomeChoice>,
        decorate: bool,
    ) -> Chunk {
        let seed = world_seed.for_chunk(id);
        let mut chunk = if decorate {
            self.generate_decorated_chunk(seed, biome)
        } else {
            self.generate_chunk(seed, biome)
        };
        chunk.set_id(id);
        chunk
    }

    /// Generates a super-flat chunk (id 0): air over the top half, one row of
    /// grass, two rows of dirt, stone, and a bedrock bottom row.
    #[must_use]
    pub fn generate_flat_chunk(&self) -> Chunk {
        let height = self.dims.height();
        let props = BiomeType::SuperFlat.properties();
        let mut chunk = Chunk::new(0, BiomeType::SuperFlat, self.dims);

        let surface = height / 2;
        for y in surface..height - 1 {
            let block = if y == surface {
                props.layer1_block
            } else if y <= surface + SUBSURFACE_DEPTH {
                props.layer2_block
            } else {
                props.layer3_block
            };
            chunk.fill_row(y, block);
        }
        chunk.fill_row(height - 1, BlockType::FLOOR);
        chunk.modified = false;
        chunk
    }

    /// Generates the initial chunks of a random world.
    ///
    /// `count == 0` means 3. Ids are contiguous around 0, see
    /// [`TerrainGenerator::initial_ids`].
    #[must_use]
    pub fn generate_world(&self, seed: WorldSeed, count: usize, decorate: bool) -> Vec<Chunk> {
        Self::initial_ids(count)
            .map(|id| self.generate_world_chunk(seed, id, BiomeChoice::Random, decorate))
            .collect()
    }

    /// Generates the initial chunks of a super-flat world.
    #[must_use]
    pub fn generate_flat_world(&self, count: usize) -> Vec<Chunk> {
        Self::initial_ids(count)
            .map(|id| {
                let mut chunk = self.generate_flat_chunk();
                chunk.set_id(id);
                chunk
            })
            .collect()
    }

    /// Ids of the first `count` chunks of a world (`0` means 3).
    ///
    /// `floor((count - 1) / 2)` chunks go left of the root, the rest to its
    /// right, so for even counts the root sits just left of the centre.
    #[must_use]
    pub fn initial_ids(count: usize) -> RangeInclusive<i32> {
        let count = if count == 0 { 3 } else { count as i32 };
        let left = (count - 1) / 2;
        -left..=count - 1 - left
    }
}

/// Linear interpolation between the two control points bracketing `x`.
fn interpolate(heights: &[f32], spacing: f32, x: f32) -> f32 {
    let last = heights.len() - 1;
    let segment = ((x / spacing).floor() as usize).min(last - 1);
    let t = (x - segment as f32 * spacing) / spacing;
    heights[segment] + (heights[segment + 1] - heights[segment]) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::ControlPoints;

    #[test]
    fn test_same_seed_same_chunk() {
        let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
        let a = generator.generate_chunk(WorldSeed::new(1234), BiomeType::Forest);
        let b = generator.generate_chunk(WorldSeed::new(1234), BiomeType::Forest);
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn test_random_biome_is_reproducible() {
        let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
        let a = generator.generate_chunk(WorldSeed::new(77), BiomeChoice::Random);
        let b = generator.generate_chunk(WorldSeed::new(77), BiomeChoice::Random);
        assert_eq!(a.biome(), b.biome());
        assert_eq!(a.blocks(), b.blocks());
    }

    #[test]
    fn test_biome_pick_leaves_terrain_stream_alone() {
        let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
        for seed in 0..10 {
            let seed = WorldSeed::new(seed);
            let (random, random_profile) = generator.generate_terrain(seed, BiomeChoice::Random);
            let (fixed, fixed_profile) = generator.generate_terrain(seed, random.biome());
            assert_eq!(random_profile, fixed_profile);
            assert_eq!(random.blocks(), fixed.blocks());
        }
    }

    #[test]
    fn test_bottom_row_is_bedrock() {
        let generator = TerrainGenerator::new(ChunkDims::new(12, 9));
        for seed in 0..20 {
            let chunk = generator.generate_chunk(WorldSeed::new(seed), BiomeChoice::Random);
            for x in 0..12 {
                assert_eq!(chunk.get_block(x, 8), BlockType::Bedrock, "seed {seed}");
            }
        }
    }

    #[test]
    fn test_interpolation_hits_control_points() {
        let heights = [4.0, 8.0, 6.0];
        assert!((interpolate(&heights, 9.0, 0.0) - 4.0).abs() < 1e-6);
        assert!((interpolate(&heights, 9.0, 4.5) - 6.0).abs() < 1e-6);
        assert!((interpolate(&heights, 9.0, 9.0) - 8.0).abs() < 1e-6);
        assert!((interpolate(&heights, 9.0, 18.0) - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_control_points_are_clamped() {
        let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
        let props = BiomeProperties {
            control_points: ControlPoints::Fixed(0),
            ..*BiomeType::Plain.properties()
        };
        let mut rng = WorldSeed::new(3).rng();
        let (chunk, profile) = generator.generate_with_properties(&mut rng, BiomeType::Plain, &props);

        assert_eq!(profile.control_heights.len(), 2);
        assert_eq!(profile.surface_rows.len(), 18);
        assert_eq!(chunk.get_block(0, 17), BlockType::Bedrock);
    }

    #[test]
    fn test_flat_chunk_layers() {
        let chunk = TerrainGenerator::new(ChunkDims::DEFAULT).generate_flat_chunk();
        assert_eq!(chunk.biome(), BiomeType::SuperFlat);
        for x in 0..18 {
            assert_eq!(chunk.get_block(x, 8), BlockType::Air);
            assert_eq!(chunk.get_block(x, 9), BlockType::Grass);
            assert_eq!(chunk.get_block(x, 10), BlockType::Dirt);
            assert_eq!(chunk.get_block(x, 11), BlockType::Dirt);
            assert_eq!(chunk.get_block(x, 12), BlockType::Stone);
            assert_eq!(chunk.get_block(x, 17), BlockType::Bedrock);
        }
    }

    #[test]
    fn test_initial_ids() {
        assert_eq!(TerrainGenerator::initial_ids(0), -1..=1);
        assert_eq!(TerrainGenerator::initial_ids(1), 0..=0);
        assert_eq!(TerrainGenerator::initial_ids(2), 0..=1);
        assert_eq!(TerrainGenerator::initial_ids(4), -1..=2);
        assert_eq!(TerrainGenerator::initial_ids(5), -2..=2);
    }

    #[test]
    fn test_world_chunks_are_seeded_by_id() {
        let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
        let world = generator.generate_world(WorldSeed::new(10), 3, false);
        let ids: Vec<i32> = world.iter().map(Chunk::id).collect();
        assert_eq!(ids, vec![-1, 0, 1]);

        let single = generator.generate_chunk(WorldSeed::new(11), BiomeChoice::Random);
        assert_eq!(world[2].blocks(), single.blocks());
    }

    #[test]
    fn test_decoration_keeps_terrain_profile() {
        let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
        for seed in 0..10 {
            let seed = WorldSeed::new(seed);
            let (plain, profile) = generator.generate_terrain(seed, BiomeType::Forest);
            let decorated = generator.generate_decorated_chunk(seed, BiomeType::Forest);

            for (x, &row) in profile.surface_rows.iter().enumerate() {
                assert_eq!(decorated.get_block(x, row), plain.get_block(x, row));
                assert_eq!(decorated.get_block(x, 17), BlockType::Bedrock);
            }
        }
    }
}
