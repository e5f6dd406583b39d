//! Stampable block templates (trees, ruins, player builds).

use strata_core::record::{write_line, RecordError, RecordResult, Tokens};
use strata_core::BlockType;
use tracing::warn;

/// A rectangular block template.
///
/// `blocks` are row-major with row 0 at the top, like a chunk. When placed,
/// the cell at `origin` lands on the chunk cell `spawn_point`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Structure {
    spawn_point: (i32, i32),
    width: usize,
    height: usize,
    blocks: Vec<BlockType>,
    origin: (usize, usize),
}

impl Structure {
    /// Creates a structure.
    ///
    /// A block vector whose length is not `width * height` is rejected with a
    /// warning and the structure comes out empty.
    #[must_use]
    pub fn new(
        spawn_point: (i32, i32),
        blocks: Vec<BlockType>,
        width: usize,
        height: usize,
        origin: (usize, usize),
    ) -> Self {
        if width * height != blocks.len() {
            warn!(
                width,
                height,
                blocks = blocks.len(),
                "structure size does not match its block count"
            );
            return Self {
                spawn_point,
                origin,
                ..Self::default()
            };
        }

        Self {
            spawn_point,
            width,
            height,
            blocks,
            origin,
        }
    }

    /// Chunk cell (column, row) the origin is placed on.
    #[inline]
    #[must_use]
    pub const fn spawn_point(&self) -> (i32, i32) {
        self.spawn_point
    }

    /// Moves the structure to another chunk cell.
    pub fn set_spawn_point(&mut self, spawn_point: (i32, i32)) {
        self.spawn_point = spawn_point;
    }

    /// Width in blocks.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in blocks.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Cell (column, row) of the template anchored at the spawn point.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> (usize, usize) {
        self.origin
    }

    /// Template blocks, row-major.
    #[inline]
    #[must_use]
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }

    /// True when the template holds no blocks.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Template block at (column, row).
    #[inline]
    #[must_use]
    pub fn block(&self, x: usize, y: usize) -> BlockType {
        if x < self.width && y < self.height {
            self.blocks[y * self.width + x]
        } else {
            BlockType::Air
        }
    }

    /// Iterates over `(chunk column, chunk row, block)` for every cell of the
    /// template, relative to the spawn point. Coordinates may be negative.
    pub fn cells(&self) -> impl Iterator<Item = (i64, i64, BlockType)> + '_ {
        let base_x = i64::from(self.spawn_point.0) - self.origin.0 as i64;
        let base_y = i64::from(self.spawn_point.1) - self.origin.1 as i64;
        self.blocks.iter().enumerate().map(move |(index, &block)| {
            let x = (index % self.width) as i64;
            let y = (index / self.width) as i64;
            (base_x + x, base_y + y, block)
        })
    }

    /// Appends the structure as one record line:
    /// `spawnX spawnY width height originX originY blocks...`.
    pub fn serialize(&self, out: &mut String) {
        let header = [
            i64::from(self.spawn_point.0),
            i64::from(self.spawn_point.1),
            self.width as i64,
            self.height as i64,
            self.origin.0 as i64,
            self.origin.1 as i64,
        ];
        let blocks = self.blocks.iter().map(|block| i64::from(block.id()));
        write_line(out, header.into_iter().chain(blocks));
    }

    /// Reads one structure record. Nothing is returned unless the whole
    /// record parsed.
    ///
    /// # Errors
    ///
    /// Fails on truncated or malformed tokens and unknown block ids.
    pub fn deserialize(tokens: &mut Tokens<'_>) -> RecordResult<Self> {
        let spawn_point = (
            tokens.take("structure spawn x")?,
            tokens.take("structure spawn y")?,
        );
        let width: usize = tokens.take("structure width")?;
        let height: usize = tokens.take("structure height")?;
        let origin = (
            tokens.take("structure origin x")?,
            tokens.take("structure origin y")?,
        );

        let count = width
            .checked_mul(height)
            .ok_or_else(|| RecordError::Inconsistent(format!("structure {width}x{height} is too large")))?;
        let mut blocks = Vec::with_capacity(count.min(1 << 16));
        for _ in 0..count {
            blocks.push(read_block(tokens)?);
        }

        Ok(Self {
            spawn_point,
            width,
            height,
            blocks,
            origin,
        })
    }
}

/// Reads one block id token.
pub(crate) fn read_block(tokens: &mut Tokens<'_>) -> RecordResult<BlockType> {
    let id: u8 = tokens.take("block id")?;
    BlockType::from_id(id).ok_or(RecordError::UnknownId {
        kind: "block",
        id: u64::from(id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Structure {
        use BlockType::{Air, OakLeaf, OakWood};
        Structure::new(
            (4, 10),
            vec![OakLeaf, OakLeaf, OakLeaf, Air, OakWood, Air],
            3,
            2,
            (1, 1),
        )
    }

    #[test]
    fn test_mismatched_blocks_yield_empty() {
        let structure = Structure::new((0, 0), vec![BlockType::Stone; 5], 2, 2, (0, 0));
        assert!(structure.is_empty());
        assert_eq!(structure.width(), 0);
    }

    #[test]
    fn test_cells_are_anchored_at_origin() {
        let structure = sample();
        let trunk: Vec<_> = structure
            .cells()
            .filter(|&(_, _, block)| block == BlockType::OakWood)
            .collect();
        assert_eq!(trunk, vec![(4, 10, BlockType::OakWood)]);

        let (x, y, _) = structure.cells().next().unwrap();
        assert_eq!((x, y), (3, 9));
    }

    #[test]
    fn test_record_round_trip() {
        let structure = sample();
        let mut text = String::new();
        structure.serialize(&mut text);

        let restored = Structure::deserialize(&mut Tokens::new(&text)).unwrap();
        assert_eq!(restored, structure);
    }

    #[test]
    fn test_truncated_record_is_rejected() {
        let mut text = String::new();
        sample().serialize(&mut text);
        let cut = &text[..text.len() - 4];

        assert!(matches!(
            Structure::deserialize(&mut Tokens::new(cut)),
            Err(RecordError::Truncated { .. })
        ));
    }
}
