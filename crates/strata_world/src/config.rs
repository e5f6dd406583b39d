//! World settings loaded from TOML.
//!
//! ```toml
//! chunk_width = 18
//! chunk_height = 18
//! retention_factor = 1.5
//! drag = 0.9
//! day_duration = 1200.0
//! initial_chunks = 3
//! decorate = true
//! flat = false
//! biome = "forest"   # optional, random when absent
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_core::{BiomeType, ChunkDims};
use strata_procedural::BiomeChoice;
use tracing::info;

use crate::error::ConfigError;

/// Settings fixed for one world session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk width in blocks (>= 8).
    pub chunk_width: usize,
    /// Chunk height in blocks (>= 8). Also the world's vertical extent.
    pub chunk_height: usize,
    /// Retention radius as a multiple of the chunk width.
    pub retention_factor: f32,
    /// Velocity multiplier applied once per update.
    pub drag: f32,
    /// Length of a full day in seconds.
    pub day_duration: f32,
    /// Chunks generated for a new world (0 means 3).
    pub initial_chunks: usize,
    /// Scatter trees, water and ores over generated chunks.
    pub decorate: bool,
    /// Generate super-flat chunks instead of biome terrain.
    pub flat: bool,
    /// Force every generated chunk into one biome.
    pub biome: Option<BiomeType>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_width: ChunkDims::DEFAULT.width(),
            chunk_height: ChunkDims::DEFAULT.height(),
            retention_factor: 1.5,
            drag: 0.9,
            day_duration: 1200.0,
            initial_chunks: 3,
            decorate: true,
            flat: false,
            biome: None,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for bad TOML and the matching
    /// validation error for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(?path, "no world config found, using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(?path, "loaded world config");
        Ok(config)
    }

    /// Serializes the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks every value range.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if ChunkDims::checked(self.chunk_width, self.chunk_height).is_none() {
            return Err(ConfigError::InvalidDimensions {
                width: self.chunk_width,
                height: self.chunk_height,
            });
        }
        if !self.retention_factor.is_finite() || self.retention_factor < 1.5 {
            return Err(ConfigError::InvalidRetention(self.retention_factor));
        }
        if !(self.drag > 0.0 && self.drag <= 1.0) {
            return Err(ConfigError::InvalidDrag(self.drag));
        }
        if !(self.day_duration.is_finite() && self.day_duration > 0.0) {
            return Err(ConfigError::InvalidDayDuration(self.day_duration));
        }
        Ok(())
    }

    /// Chunk dimensions of the session.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions are below 8x8. Call [`WorldConfig::validate`]
    /// first to get an error instead.
    #[must_use]
    pub fn dims(&self) -> ChunkDims {
        ChunkDims::new(self.chunk_width, self.chunk_height)
    }

    /// Squared retention radius in world units.
    #[must_use]
    pub fn max_distance_squared(&self) -> f32 {
        let radius = self.retention_factor * self.dims().world_width();
        radius * radius
    }

    /// Biome used for newly generated chunks.
    #[must_use]
    pub fn biome_choice(&self) -> BiomeChoice {
        self.biome.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dims(), ChunkDims::DEFAULT);
        assert!((config.max_distance_squared() - 729.0).abs() < 1e-3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = WorldConfig::from_toml_str("chunk_width = 32\nbiome = \"snowy_forest\"\n").unwrap();
        assert_eq!(config.chunk_width, 32);
        assert_eq!(config.chunk_height, 18);
        assert_eq!(config.biome, Some(BiomeType::SnowyForest));
        assert_eq!(config.biome_choice(), BiomeChoice::Fixed(BiomeType::SnowyForest));
    }

    #[test]
    fn test_small_chunks_are_rejected() {
        assert_eq!(
            WorldConfig::from_toml_str("chunk_height = 4"),
            Err(ConfigError::InvalidDimensions {
                width: 18,
                height: 4
            })
        );
    }

    #[test]
    fn test_ranges_are_checked() {
        assert!(matches!(
            WorldConfig::from_toml_str("drag = 1.5"),
            Err(ConfigError::InvalidDrag(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("retention_factor = 1.0"),
            Err(ConfigError::InvalidRetention(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("day_duration = 0.0"),
            Err(ConfigError::InvalidDayDuration(_))
        ));
        assert!(matches!(
            WorldConfig::from_toml_str("drag = \"high\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = WorldConfig {
            flat: true,
            biome: Some(BiomeType::Jungle),
            ..WorldConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(WorldConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("strata_config_that_does_not_exist.toml");
        assert_eq!(WorldConfig::load(&path).unwrap(), WorldConfig::default());
    }
}
