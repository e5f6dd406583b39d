//! Chunk dimensions shared by every chunk in a world session.

/// Width of one block in world units.
pub const BLOCK_WIDTH: f32 = 1.0;

/// Height of one block in world units.
pub const BLOCK_HEIGHT: f32 = 1.0;

/// Width and height of a chunk, in blocks.
///
/// Fixed for a whole world session. Chunks tile horizontally only, so the
/// height is also the vertical extent of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDims {
    width: usize,
    height: usize,
}

impl ChunkDims {
    /// Smallest supported width and height.
    pub const MIN: usize = 8;

    /// Dimensions used when nothing else is configured.
    pub const DEFAULT: Self = Self {
        width: 18,
        height: 18,
    };

    /// Creates chunk dimensions.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is below [`ChunkDims::MIN`]. Terrain
    /// generation needs at least two columns between control points.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        assert!(
            width >= Self::MIN && height >= Self::MIN,
            "chunk dimensions must be at least 8x8"
        );
        Self { width, height }
    }

    /// Same as [`ChunkDims::new`] but returns `None` instead of panicking.
    ///
    /// Also returns `None` when `width * height` does not fit in a `usize`.
    #[must_use]
    pub const fn checked(width: usize, height: usize) -> Option<Self> {
        if width < Self::MIN || height < Self::MIN || width.checked_mul(height).is_none() {
            return None;
        }
        Some(Self { width, height })
    }

    /// Chunk width in blocks.
    #[inline]
    #[must_use]
    pub const fn width(self) -> usize {
        self.width
    }

    /// Chunk height in blocks.
    #[inline]
    #[must_use]
    pub const fn height(self) -> usize {
        self.height
    }

    /// Number of cells in a chunk.
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        self.width * self.height
    }

    /// Chunk width in world units.
    #[inline]
    #[must_use]
    pub fn world_width(self) -> f32 {
        self.width as f32 * BLOCK_WIDTH
    }

    /// Chunk height in world units.
    #[inline]
    #[must_use]
    pub fn world_height(self) -> f32 {
        self.height as f32 * BLOCK_HEIGHT
    }

    /// Id of the chunk containing world x coordinate `x`.
    #[inline]
    #[must_use]
    pub fn chunk_id_at(self, x: f32) -> i32 {
        (x / self.world_width()).floor() as i32
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_id_at() {
        let dims = ChunkDims::DEFAULT;
        assert_eq!(dims.chunk_id_at(0.0), 0);
        assert_eq!(dims.chunk_id_at(17.9), 0);
        assert_eq!(dims.chunk_id_at(18.0), 1);
        assert_eq!(dims.chunk_id_at(-0.1), -1);
        assert_eq!(dims.chunk_id_at(-18.0), -1);
        assert_eq!(dims.chunk_id_at(-18.1), -2);
    }

    #[test]
    fn test_checked_rejects_small_chunks() {
        assert!(ChunkDims::checked(7, 18).is_none());
        assert!(ChunkDims::checked(18, 4).is_none());
        assert_eq!(ChunkDims::checked(8, 8), Some(ChunkDims::new(8, 8)));
    }

    #[test]
    fn test_checked_rejects_overflowing_area() {
        assert!(ChunkDims::checked(1 << 32, 1 << 32).is_none());
        assert!(ChunkDims::checked(usize::MAX, 8).is_none());
    }

    #[test]
    #[should_panic(expected = "at least 8x8")]
    fn test_new_panics_below_minimum() {
        let _ = ChunkDims::new(4, 18);
    }
}
