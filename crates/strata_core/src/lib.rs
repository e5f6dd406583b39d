//! # STRATA Core
//!
//! Static vocabulary shared by terrain generation, streaming and save files.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER perform I/O or hold mutable global state. Every
//! table is a compile-time literal and every lookup is a pure function.
//!
//! ## Contents
//!
//! - [`BlockType`] / [`BlockCatalog`]: block ids and physical properties
//! - [`BiomeType`] / [`BiomeCatalog`]: terrain-shape policy per biome
//! - [`TreeType`]: tree palettes and sizes
//! - [`ChunkDims`]: per-session chunk size
//! - [`Entity`]: ballistic bodies and their save record
//! - [`record`]: whitespace token reader used by every save format

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod biome;
pub mod block;
pub mod dims;
pub mod entity;
pub mod math;
pub mod record;

pub use biome::{
    BiomeCatalog, BiomeProperties, BiomeType, ControlPoints, TerrainShape, TreeProperties,
    TreeType,
};
pub use block::{BlockCatalog, BlockProperties, BlockType};
pub use dims::{ChunkDims, BLOCK_HEIGHT, BLOCK_WIDTH};
pub use entity::{Entity, EntityType};
pub use math::{rects_intersect, Rect, Vec2, Vec3};
pub use record::{RecordError, RecordResult, Tokens};
