//! # World Seeds
//!
//! Every random decision in generation is drawn from a [`ChaCha8Rng`]
//! seeded from a [`WorldSeed`].
//!
//! ## Determinism Guarantee
//!
//! Given the same `WorldSeed`, chunk id and biome, generation produces
//! **exactly** the same blocks on any platform, any time.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Purpose tag for tree, water and ore placement.
    pub const DECORATION: u64 = 0x6465_636f;

    /// Purpose tag for picking a random biome.
    pub const BIOME: u64 = 0x6269_6f6d;

    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Seed of one chunk: `world seed + chunk id`, wrapping.
    ///
    /// Neighbouring chunks get distinct but reproducible seeds.
    #[inline]
    #[must_use]
    pub const fn for_chunk(self, chunk_id: i32) -> Self {
        Self(self.0.wrapping_add_signed(chunk_id as i64))
    }

    /// Derives a sub-seed for a specific purpose (e.g., decoration).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }

    /// Derives a seed from a phrase typed by a player (FNV-1a).
    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;

        let hash = phrase
            .bytes()
            .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME));
        Self(hash)
    }

    /// Fresh random stream for this seed.
    #[must_use]
    pub fn rng(self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.0)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

impl From<u64> for WorldSeed {
    fn from(seed: u64) -> Self {
        Self(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_chunk_seeds_are_offsets() {
        let seed = WorldSeed::new(42);
        assert_eq!(seed.for_chunk(0).value(), 42);
        assert_eq!(seed.for_chunk(3).value(), 45);
        assert_eq!(seed.for_chunk(-2).value(), 40);
        assert_eq!(WorldSeed::new(0).for_chunk(-1).value(), u64::MAX);
    }

    #[test]
    fn test_derive_differs_by_purpose() {
        let seed = WorldSeed::new(7);
        assert_ne!(seed.derive(WorldSeed::DECORATION), seed.derive(WorldSeed::BIOME));
        assert_eq!(seed.derive(1), seed.derive(1));
    }

    #[test]
    fn test_phrase_is_stable() {
        assert_eq!(WorldSeed::from_phrase(""), WorldSeed::new(0xcbf2_9ce4_8422_2325));
        assert_eq!(WorldSeed::from_phrase("a").value(), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(WorldSeed::from_phrase("hello"), WorldSeed::from_phrase("hellp"));
    }

    #[test]
    fn test_rng_is_reproducible() {
        let a: Vec<u32> = WorldSeed::new(9).rng().sample_iter(rand::distributions::Standard).take(8).collect();
        let b: Vec<u32> = WorldSeed::new(9).rng().sample_iter(rand::distributions::Standard).take(8).collect();
        assert_eq!(a, b);
    }
}
