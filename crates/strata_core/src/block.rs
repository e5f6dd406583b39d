//! # Block Catalog
//!
//! Every block type in the world and its fixed physical properties.
//!
//! ## Single Source of Truth
//!
//! The `BlockType` enum and its property table are emitted by one macro
//! invocation. Each line declares the id, the display name and the properties
//! together, so the table can never fall out of step with the enum.
//!
//! Ids are stable: they are written into chunk save files and used by the
//! renderer as tile indices. Append new blocks before `Air` and renumber
//! `Air`; never reorder existing entries.

/// Physical properties shared by every instance of a block type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockProperties {
    /// Whether entities collide with the block.
    pub collidable: bool,
    /// Break resistance (0 = breaks instantly, 255 = unbreakable).
    pub hardness: u8,
    /// Emitted light level (0..=7).
    pub luminance: u8,
}

impl BlockProperties {
    /// Highest representable light level.
    pub const MAX_LUMINANCE: u8 = 7;

    /// Hardness of blocks that can never be broken.
    pub const UNBREAKABLE: u8 = u8::MAX;

    /// Creates a property record, clamping luminance to `0..=7`.
    #[inline]
    #[must_use]
    pub const fn new(collidable: bool, hardness: u8, luminance: u8) -> Self {
        Self {
            collidable,
            hardness,
            luminance: if luminance > Self::MAX_LUMINANCE {
                Self::MAX_LUMINANCE
            } else {
                luminance
            },
        }
    }

    /// Returns true if the block can never be broken.
    #[inline]
    #[must_use]
    pub const fn is_unbreakable(self) -> bool {
        self.hardness == Self::UNBREAKABLE
    }

    /// Packs the properties into 16 bits.
    ///
    /// Layout: `[hardness:8][unused:4][collidable:1][luminance:3]`.
    #[inline]
    #[must_use]
    pub const fn pack(self) -> u16 {
        let mut bits = (self.hardness as u16) << 8;
        if self.collidable {
            bits |= 0b1000;
        }
        bits | (self.luminance as u16 & 0b111)
    }

    /// Inverse of [`BlockProperties::pack`].
    #[inline]
    #[must_use]
    pub const fn unpack(bits: u16) -> Self {
        Self {
            collidable: bits & 0b1000 != 0,
            hardness: (bits >> 8) as u8,
            luminance: (bits & 0b111) as u8,
        }
    }
}

macro_rules! block_types {
    (
        $(
            $(#[$doc:meta])*
            $variant:ident = $id:literal => ($name:literal, $collidable:literal, $hardness:literal, $luminance:literal)
        ),+ $(,)?
    ) => {
        /// Every block type in the world.
        ///
        /// Stored as a single byte per cell in chunks and save files.
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum BlockType {
            $(
                $(#[$doc])*
                $variant = $id,
            )+
        }

        impl BlockType {
            /// All block types, in id order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Number of block types.
            pub const COUNT: usize = Self::ALL.len();

            /// Decodes a block id.
            ///
            /// Returns `None` for ids that name no block.
            #[must_use]
            pub const fn from_id(id: u8) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Human readable name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }

            /// Physical properties of this block type.
            #[must_use]
            pub const fn properties(self) -> BlockProperties {
                match self {
                    $(Self::$variant => BlockProperties::new($collidable, $hardness, $luminance),)+
                }
            }
        }
    };
}

block_types! {
    // Terrain
    /// Grass-covered soil.
    Grass = 0 => ("grass", true, 2, 0),
    /// Plain soil.
    Dirt = 1 => ("dirt", true, 2, 0),
    /// Stone.
    Stone = 2 => ("stone", true, 4, 0),
    /// Cobblestone.
    Cobblestone = 3 => ("cobblestone", true, 4, 0),
    /// Gravel.
    Gravel = 4 => ("gravel", true, 2, 0),
    /// Mycelium-covered soil.
    Mycelium = 5 => ("mycelium", true, 2, 0),
    /// Sand.
    Sand = 6 => ("sand", true, 2, 0),
    /// Unworked sandstone.
    SandstoneRaw = 7 => ("raw sandstone", true, 4, 0),
    /// Sandstone.
    Sandstone = 8 => ("sandstone", true, 4, 0),
    /// Polished sandstone.
    SandstonePolished = 9 => ("polished sandstone", true, 4, 0),
    /// Snow-covered grass.
    GrassSnow = 10 => ("snowy grass", true, 2, 0),
    /// Snow.
    Snow = 11 => ("snow", true, 2, 0),
    /// Ice.
    Ice = 12 => ("ice", true, 2, 0),
    /// Clay.
    Clay = 13 => ("clay", true, 2, 0),
    /// Obsidian.
    Obsidian = 14 => ("obsidian", true, 8, 0),
    /// World floor, never breaks.
    Bedrock = 15 => ("bedrock", true, 255, 0),

    // Wood and trees
    /// Oak log.
    OakWood = 16 => ("oak wood", true, 3, 0),
    /// Oak leaves.
    OakLeaf = 17 => ("oak leaf", true, 2, 0),
    /// Oak planks.
    OakPlank = 18 => ("oak plank", true, 3, 0),
    /// Oak sapling.
    OakSapling = 19 => ("oak sapling", false, 0, 0),
    /// Birch log.
    BirchWood = 20 => ("birch wood", true, 3, 0),
    /// Birch leaves.
    BirchLeaf = 21 => ("birch leaf", true, 2, 0),
    /// Birch planks.
    BirchPlank = 22 => ("birch plank", true, 3, 0),
    /// Birch sapling.
    BirchSapling = 23 => ("birch sapling", false, 0, 0),
    /// Jungle log.
    JungleWood = 24 => ("jungle wood", true, 3, 0),
    /// Jungle leaves.
    JungleLeaf = 25 => ("jungle leaf", true, 2, 0),
    /// Jungle planks.
    JunglePlank = 26 => ("jungle plank", true, 3, 0),
    /// Jungle sapling.
    JungleSapling = 27 => ("jungle sapling", false, 0, 0),
    /// Spruce log.
    SpruceWood = 28 => ("spruce wood", true, 3, 0),
    /// Spruce leaves.
    SpruceLeaf = 29 => ("spruce leaf", true, 2, 0),
    /// Spruce planks.
    SprucePlank = 30 => ("spruce plank", true, 3, 0),
    /// Spruce sapling.
    SpruceSapling = 31 => ("spruce sapling", false, 0, 0),

    // Minerals
    /// Coal ore.
    CoalOre = 32 => ("coal ore", true, 4, 0),
    /// Block of coal.
    CoalBlock = 33 => ("coal block", true, 4, 0),
    /// Iron ore.
    IronOre = 34 => ("iron ore", true, 4, 0),
    /// Block of iron.
    IronBlock = 35 => ("iron block", true, 4, 0),
    /// Gold ore.
    GoldOre = 36 => ("gold ore", true, 4, 0),
    /// Block of gold.
    GoldBlock = 37 => ("gold block", true, 4, 0),
    /// Diamond ore.
    DiamondOre = 38 => ("diamond ore", true, 4, 0),
    /// Block of diamond.
    DiamondBlock = 39 => ("diamond block", true, 4, 0),
    /// Emerald ore.
    EmeraldOre = 40 => ("emerald ore", true, 4, 0),
    /// Block of emerald.
    EmeraldBlock = 41 => ("emerald block", true, 4, 0),
    /// Redstone ore.
    RedstoneOre = 42 => ("redstone ore", true, 4, 1),
    /// Block of redstone.
    RedstoneBlock = 43 => ("redstone block", true, 4, 1),
    /// Lapis lazuli ore.
    LapisOre = 44 => ("lapis ore", true, 4, 0),
    /// Block of lapis lazuli.
    LapisBlock = 45 => ("lapis block", true, 4, 0),

    // Masonry
    /// Mossy cobblestone.
    MossyCobblestone = 46 => ("mossy cobblestone", true, 4, 0),
    /// Mossy brick.
    MossyBrick = 47 => ("mossy brick", true, 4, 0),

    // Furniture
    /// Crafting workbench.
    Workbench = 48 => ("workbench", false, 2, 0),
    /// Unlit furnace.
    Furnace = 49 => ("furnace", false, 3, 0),
    /// Burning furnace.
    FurnaceActive = 50 => ("active furnace", false, 3, 4),
    /// Storage chest.
    Chest = 51 => ("chest", false, 2, 0),
    /// Lower half of an open door.
    DoorOpenLow = 52 => ("open door (low)", false, 2, 0),
    /// Upper half of an open door.
    DoorOpenHigh = 53 => ("open door (high)", false, 2, 0),
    /// Closed door.
    DoorClosed = 54 => ("closed door", true, 2, 0),
    /// Open trapdoor.
    TrapOpen = 55 => ("open trapdoor", false, 2, 0),
    /// Closed trapdoor.
    TrapClosed = 56 => ("closed trapdoor", true, 2, 0),
    /// Stair.
    Stair = 57 => ("stair", false, 2, 0),
    /// Foot of a bed.
    BedEnd = 58 => ("bed end", false, 2, 0),
    /// Head of a bed.
    BedStart = 59 => ("bed start", false, 2, 0),

    // Miscellaneous
    /// Explosive.
    Tnt = 60 => ("tnt", true, 0, 0),
    /// Wool.
    Wool = 61 => ("wool", true, 2, 0),
    /// Piston.
    Piston = 62 => ("piston", true, 3, 0),
    /// Enchantment bench.
    EnchantmentBench = 63 => ("enchantment bench", false, 3, 2),
    /// Brick.
    Brick = 64 => ("brick", true, 4, 0),
    /// Glass.
    Glass = 65 => ("glass", true, 2, 0),
    /// Bookshelf.
    Library = 66 => ("library", false, 3, 0),
    /// Red flower.
    FlowerRed = 67 => ("red flower", false, 0, 0),
    /// Yellow flower.
    FlowerYellow = 68 => ("yellow flower", false, 0, 0),
    /// Dry shrub.
    Shrub = 69 => ("shrub", false, 0, 0),
    /// Red mushroom.
    MushroomRed = 70 => ("red mushroom", false, 0, 0),
    /// Brown mushroom.
    MushroomBrown = 71 => ("brown mushroom", false, 0, 1),

    // Liquids
    /// Water.
    Water = 72 => ("water", false, 0, 0),
    /// Lava.
    Lava = 73 => ("lava", false, 0, 7),

    /// Empty space. Keep last.
    #[default]
    Air = 74 => ("air", false, 0, 0),
}

impl BlockType {
    /// The block written into the bottom row of every chunk.
    pub const FLOOR: Self = Self::Bedrock;

    /// Returns the numeric id stored in chunks and save files.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// Returns true for empty space.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Returns true for water and lava.
    #[inline]
    #[must_use]
    pub const fn is_liquid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only access to block properties.
///
/// The table is compiled into the binary; lookups are a single `match`.
pub struct BlockCatalog;

impl BlockCatalog {
    /// Properties of a block type.
    #[inline]
    #[must_use]
    pub const fn properties(block: BlockType) -> BlockProperties {
        block.properties()
    }

    /// Properties of a raw block id.
    ///
    /// An unknown id is a programming error: debug builds panic, release
    /// builds answer with the properties of `Air`.
    #[must_use]
    pub fn properties_by_id(id: u8) -> BlockProperties {
        debug_assert!(
            (id as usize) < BlockType::COUNT,
            "block id {id} is outside the catalog"
        );
        BlockType::from_id(id).unwrap_or(BlockType::Air).properties()
    }

    /// Returns true if entities collide with the block.
    #[inline]
    #[must_use]
    pub const fn is_collidable(block: BlockType) -> bool {
        block.properties().collidable
    }
}
