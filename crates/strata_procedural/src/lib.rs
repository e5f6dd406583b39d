//! # STRATA Procedural Generation
//!
//! Deterministic terrain for an unbounded, horizontally chunked 2D world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed always produces the same chunk
//! 2. **Chunked**: The world is generated one fixed-size slice at a time
//! 3. **Streamable**: Chunks can be generated and discarded independently
//! 4. **Biome-bounded**: Surface height and slope never leave the biome's band
//!
//! ## Core Components
//!
//! - `WorldSeed`: per-chunk and per-purpose seed derivation
//! - `TerrainGenerator`: control-point interpolation and layering
//! - `Chunk`: block grid, entity list and the chunk save record
//! - `Structure`: block templates stamped into chunks (trees)
//!
//! ## Example
//!
//! ```rust
//! use strata_core::{BiomeType, BlockType, ChunkDims};
//! use strata_procedural::{TerrainGenerator, WorldSeed};
//!
//! let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
//! let chunk = generator.generate_chunk(WorldSeed::new(42), BiomeType::Plain);
//!
//! // The world bottom is always bedrock
//! assert_eq!(chunk.get_block(0, 17), BlockType::Bedrock);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
mod decoration;
pub mod generator;
pub mod seed;
pub mod structure;

pub use chunk::{world_x_to_column, world_y_to_row, Chunk};
pub use generator::{BiomeChoice, TerrainGenerator, TerrainProfile, SUBSURFACE_DEPTH};
pub use seed::WorldSeed;
pub use structure::Structure;
