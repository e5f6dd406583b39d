//! # STRATA World
//!
//! The live world: a sliding window of resident chunks around the players,
//! entity simulation, the day cycle and save directories.
//!
//! ## Call Surface
//!
//! A renderer or game loop drives the world through a handful of calls:
//!
//! - [`GameWorld::update`]: advance the simulation by `dt` milliseconds
//! - [`GameWorld::set_block`] / [`GameWorld::get_block`]: world-space edits
//! - [`GameWorld::visible_chunks`]: chunks overlapping a camera rectangle
//! - [`GameWorld::players_mut`]: steer players by setting acceleration
//!
//! ## Example
//!
//! ```rust
//! use strata_core::BlockType;
//! use strata_procedural::WorldSeed;
//! use strata_world::{GameWorld, WorldConfig};
//!
//! let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(42)).unwrap();
//! assert!(world.set_block(3.0, 17.5, BlockType::Glass));
//! assert_eq!(world.get_block(3.0, 17.5), BlockType::Glass);
//! world.update(16.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod day_cycle;
pub mod error;
pub mod persistence;
pub mod streamer;

pub use config::WorldConfig;
pub use day_cycle::DayCycle;
pub use error::{ConfigError, WorldError, WorldResult};
pub use persistence::{WorldLoader, WorldRecord};
pub use streamer::GameWorld;
