//! # World Error Types
//!
//! All errors that can occur while configuring, loading or saving a world.
//! None of them are fatal to a running session: the streamer logs them and
//! falls back to procedural generation.

use std::path::PathBuf;

use strata_core::RecordError;
use thiserror::Error;

/// Errors raised by world persistence and construction.
#[derive(Error, Debug)]
pub enum WorldError {
    /// Reading or writing a save file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A save file exists but does not parse.
    #[error("malformed record in {}: {source}", path.display())]
    Malformed {
        /// Offending file.
        path: PathBuf,
        /// What was wrong with it.
        #[source]
        source: RecordError,
    },

    /// A chunk file was written with different chunk dimensions.
    #[error("chunk {chunk_id} is {found_width}x{found_height}, session uses {width}x{height}")]
    DimensionMismatch {
        /// Chunk id.
        chunk_id: i32,
        /// Width stored in the file.
        found_width: usize,
        /// Height stored in the file.
        found_height: usize,
        /// Session chunk width.
        width: usize,
        /// Session chunk height.
        height: usize,
    },

    /// No save directory was given.
    #[error("save directory path is empty")]
    EmptySavePath,

    /// A world record lists no players.
    #[error("world record in {} has no players", .0.display())]
    NoPlayers(PathBuf),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors in a world configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The TOML text does not parse.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// The config file could not be read.
    #[error("failed to read config {}: {reason}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Reason reported by the OS.
        reason: String,
    },

    /// Chunks must be at least 8x8.
    #[error("invalid chunk dimensions {width}x{height}: both must be at least 8")]
    InvalidDimensions {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },

    /// The retention factor must be finite and at least 1.5, or a
    /// player's neighbour chunks could be evicted.
    #[error("invalid retention factor {0}: must be >= 1.5")]
    InvalidRetention(f32),

    /// Drag must lie in `(0, 1]`.
    #[error("invalid drag {0}: must be in (0, 1]")]
    InvalidDrag(f32),

    /// The day must last a positive number of seconds.
    #[error("invalid day duration {0}: must be > 0")]
    InvalidDayDuration(f32),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
