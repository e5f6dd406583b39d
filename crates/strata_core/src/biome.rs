//! # Biome and Tree Catalogs
//!
//! A biome is a terrain-generation policy: how many control points shape the
//! surface, how high and how steep it may get, which blocks make up its three
//! layers, and how often trees and water appear.
//!
//! Heights and control-point counts are stored relative to the chunk
//! dimensions and resolved with [`BiomeProperties::terrain_shape`], so the
//! same table serves any chunk size.

use serde::{Deserialize, Serialize};

use crate::block::BlockType;
use crate::dims::ChunkDims;

/// How many terrain control points a biome uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlPoints {
    /// `floor(chunk_width * percent / 100)` points.
    PercentOfWidth(u8),
    /// A fixed number of points.
    Fixed(u8),
}

impl ControlPoints {
    /// Resolves the point count for a chunk width. May be below 2.
    #[must_use]
    pub const fn resolve(self, chunk_width: usize) -> usize {
        match self {
            Self::PercentOfWidth(percent) => chunk_width * percent as usize / 100,
            Self::Fixed(count) => count as usize,
        }
    }
}

/// Terrain constraints of a biome, resolved for concrete chunk dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainShape {
    /// Number of interpolation anchors across the chunk width (before clamping to 2).
    pub control_point_count: usize,
    /// Lowest surface height, in blocks above the world bottom.
    pub min_height: usize,
    /// Highest surface height, in blocks above the world bottom.
    pub max_height: usize,
    /// Most negative height change between consecutive control points.
    pub min_slope: f32,
    /// Most positive height change between consecutive control points.
    pub max_slope: f32,
}

/// Generation policy for one biome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeProperties {
    /// Human readable name.
    pub name: &'static str,
    /// Control points used to shape the surface.
    pub control_points: ControlPoints,
    /// Lowest surface height, as an offset from half the chunk height.
    pub min_height_offset: i8,
    /// Highest surface height, as an offset from half the chunk height.
    pub max_height_offset: i8,
    /// Minimum slope between control points (blocks).
    pub min_slope: f32,
    /// Maximum slope between control points (blocks).
    pub max_slope: f32,
    /// Surface block.
    pub layer1_block: BlockType,
    /// Block for the two rows under the surface.
    pub layer2_block: BlockType,
    /// Block filling everything further down.
    pub layer3_block: BlockType,
    /// Chance (0..=1) that a surface column grows a tree.
    pub tree_spawn_prob: f32,
    /// Tree kinds that may grow in this biome.
    pub spawnable_trees: &'static [TreeType],
    /// Chance (0..=1) that a chunk of this biome holds a pond.
    pub water_spawn_prob: f32,
}

impl BiomeProperties {
    /// Resolves heights and control points for the given chunk dimensions.
    ///
    /// Heights are clamped to `0..height`; an inverted band collapses to its
    /// lower bound.
    #[must_use]
    pub fn terrain_shape(&self, dims: ChunkDims) -> TerrainShape {
        let top = dims.height() as i64 - 1;
        let middle = dims.height() as i64 / 2;
        let min_height = (middle + i64::from(self.min_height_offset)).clamp(0, top) as usize;
        let max_height = (middle + i64::from(self.max_height_offset)).clamp(0, top) as usize;

        TerrainShape {
            control_point_count: self.control_points.resolve(dims.width()),
            min_height,
            max_height: max_height.max(min_height),
            min_slope: self.min_slope.min(self.max_slope),
            max_slope: self.max_slope.max(self.min_slope),
        }
    }
}

macro_rules! biome_types {
    (
        $(
            $(#[$doc:meta])*
            $variant:ident = $id:literal => $props:expr
        ),+ $(,)?
    ) => {
        /// Every biome a chunk can belong to.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        #[repr(u32)]
        pub enum BiomeType {
            $(
                $(#[$doc])*
                $variant = $id,
            )+
        }

        impl BiomeType {
            /// All biomes, in id order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Number of biomes.
            pub const COUNT: usize = Self::ALL.len();

            /// Decodes a biome id. Returns `None` for unknown ids.
            #[must_use]
            pub const fn from_id(id: u32) -> Option<Self> {
                match id {
                    $($id => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// Generation policy of this biome.
            #[must_use]
            pub fn properties(self) -> &'static BiomeProperties {
                match self {
                    $(Self::$variant => {
                        static PROPS: BiomeProperties = $props;
                        &PROPS
                    })+
                }
            }
        }
    };
}

biome_types! {
    /// Mostly flat grassland.
    Plain = 0 => BiomeProperties {
        name: "plain",
        control_points: ControlPoints::PercentOfWidth(30),
        min_height_offset: -1,
        max_height_offset: 1,
        min_slope: -0.7,
        max_slope: 0.7,
        layer1_block: BlockType::Grass,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.2,
        spawnable_trees: &[TreeType::Oak],
        water_spawn_prob: 0.2,
    },
    /// Hilly land with oak and birch trees.
    Forest = 1 => BiomeProperties {
        name: "forest",
        control_points: ControlPoints::PercentOfWidth(40),
        min_height_offset: -2,
        max_height_offset: 2,
        min_slope: -1.0,
        max_slope: 1.0,
        layer1_block: BlockType::Grass,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.8,
        spawnable_trees: &[TreeType::Oak, TreeType::Birch],
        water_spawn_prob: 0.3,
    },
    /// Steep terrain.
    Mountain = 2 => BiomeProperties {
        name: "mountain",
        control_points: ControlPoints::PercentOfWidth(80),
        min_height_offset: -2,
        max_height_offset: 4,
        min_slope: -3.0,
        max_slope: 3.0,
        layer1_block: BlockType::Grass,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.1,
        spawnable_trees: &[TreeType::Oak, TreeType::Birch],
        water_spawn_prob: 0.0,
    },
    /// Flat land under snow.
    SnowyPlain = 3 => BiomeProperties {
        name: "snowy plain",
        control_points: ControlPoints::PercentOfWidth(30),
        min_height_offset: -1,
        max_height_offset: 1,
        min_slope: -0.7,
        max_slope: 0.7,
        layer1_block: BlockType::GrassSnow,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.2,
        spawnable_trees: &[TreeType::Spruce],
        water_spawn_prob: 0.2,
    },
    /// Hilly snow-covered land with spruce trees.
    SnowyForest = 4 => BiomeProperties {
        name: "snowy forest",
        control_points: ControlPoints::PercentOfWidth(40),
        min_height_offset: -2,
        max_height_offset: 2,
        min_slope: -1.0,
        max_slope: 1.0,
        layer1_block: BlockType::GrassSnow,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.8,
        spawnable_trees: &[TreeType::Spruce],
        water_spawn_prob: 0.3,
    },
    /// Steep snow-covered terrain.
    SnowyMountain = 5 => BiomeProperties {
        name: "snowy mountain",
        control_points: ControlPoints::PercentOfWidth(80),
        min_height_offset: -2,
        max_height_offset: 4,
        min_slope: -3.0,
        max_slope: 3.0,
        layer1_block: BlockType::GrassSnow,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.1,
        spawnable_trees: &[TreeType::Spruce],
        water_spawn_prob: 0.0,
    },
    /// Dense, hilly jungle.
    Jungle = 6 => BiomeProperties {
        name: "jungle",
        control_points: ControlPoints::PercentOfWidth(40),
        min_height_offset: -2,
        max_height_offset: 2,
        min_slope: -1.0,
        max_slope: 1.0,
        layer1_block: BlockType::Grass,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.95,
        spawnable_trees: &[TreeType::Jungle],
        water_spawn_prob: 0.0,
    },
    /// Perfectly flat terrain at half height. Also the fallback biome.
    SuperFlat = 7 => BiomeProperties {
        name: "super flat",
        control_points: ControlPoints::Fixed(2),
        min_height_offset: 0,
        max_height_offset: 0,
        min_slope: 0.0,
        max_slope: 0.0,
        layer1_block: BlockType::Grass,
        layer2_block: BlockType::Dirt,
        layer3_block: BlockType::Stone,
        tree_spawn_prob: 0.5,
        spawnable_trees: &[TreeType::Oak],
        water_spawn_prob: 0.0,
    },
}

impl BiomeType {
    /// Biome used when an id cannot be decoded.
    pub const FALLBACK: Self = Self::SuperFlat;

    /// Numeric id written into chunk save files.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.properties().name
    }
}

impl std::fmt::Display for BiomeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only access to biome properties.
pub struct BiomeCatalog;

impl BiomeCatalog {
    /// Properties of a biome.
    #[inline]
    #[must_use]
    pub fn properties(biome: BiomeType) -> &'static BiomeProperties {
        biome.properties()
    }

    /// Properties of a raw biome id.
    ///
    /// Unknown ids panic in debug builds and fall back to
    /// [`BiomeType::FALLBACK`] in release builds.
    #[must_use]
    pub fn properties_by_id(id: u32) -> &'static BiomeProperties {
        debug_assert!(
            (id as usize) < BiomeType::COUNT,
            "biome id {id} is outside the catalog"
        );
        BiomeType::from_id(id)
            .unwrap_or(BiomeType::FALLBACK)
            .properties()
    }
}

/// Every kind of tree the generator can grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TreeType {
    /// Oak.
    Oak = 0,
    /// Birch.
    Birch = 1,
    /// Jungle tree.
    Jungle = 2,
    /// Spruce.
    Spruce = 3,
}

/// Shape and palette of a tree kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeProperties {
    /// Trunk block.
    pub log_block: BlockType,
    /// Crown block.
    pub leaf_block: BlockType,
    /// Narrowest trunk, in blocks.
    pub min_width: u8,
    /// Widest trunk, in blocks.
    pub max_width: u8,
    /// Shortest trunk, in blocks.
    pub min_height: u8,
    /// Tallest trunk, in blocks.
    pub max_height: u8,
}

impl TreeType {
    /// All tree kinds.
    pub const ALL: &'static [Self] = &[Self::Oak, Self::Birch, Self::Jungle, Self::Spruce];

    /// Shape and palette of this tree kind.
    #[must_use]
    pub const fn properties(self) -> TreeProperties {
        match self {
            Self::Oak => TreeProperties {
                log_block: BlockType::OakWood,
                leaf_block: BlockType::OakLeaf,
                min_width: 1,
                max_width: 2,
                min_height: 5,
                max_height: 10,
            },
            Self::Birch => TreeProperties {
                log_block: BlockType::BirchWood,
                leaf_block: BlockType::BirchLeaf,
                min_width: 1,
                max_width: 2,
                min_height: 5,
                max_height: 10,
            },
            Self::Jungle => TreeProperties {
                log_block: BlockType::JungleWood,
                leaf_block: BlockType::JungleLeaf,
                min_width: 1,
                max_width: 3,
                min_height: 5,
                max_height: 20,
            },
            Self::Spruce => TreeProperties {
                log_block: BlockType::SpruceWood,
                leaf_block: BlockType::SpruceLeaf,
                min_width: 1,
                max_width: 2,
                min_height: 5,
                max_height: 12,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_contiguous() {
        for (index, biome) in BiomeType::ALL.iter().enumerate() {
            assert_eq!(biome.id() as usize, index);
            assert_eq!(BiomeType::from_id(biome.id()), Some(*biome));
        }
        assert_eq!(BiomeType::from_id(BiomeType::COUNT as u32), None);
    }

    #[test]
    fn test_plain_shape_for_default_chunk() {
        let shape = BiomeType::Plain
            .properties()
            .terrain_shape(ChunkDims::DEFAULT);

        // floor(18 * 30 / 100) = 5
        assert_eq!(shape.control_point_count, 5);
        assert_eq!(shape.min_height, 8);
        assert_eq!(shape.max_height, 10);
        assert!((shape.min_slope + 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_shapes_stay_inside_chunk() {
        let dims = ChunkDims::new(8, 8);
        for biome in BiomeType::ALL {
            let shape = biome.properties().terrain_shape(dims);
            assert!(shape.min_height <= shape.max_height, "{biome}");
            assert!(shape.max_height < dims.height(), "{biome}");
            assert!(shape.min_slope <= shape.max_slope, "{biome}");
        }
    }

    #[test]
    fn test_every_biome_can_grow_a_tree() {
        for biome in BiomeType::ALL {
            let props = biome.properties();
            assert!(!props.spawnable_trees.is_empty(), "{biome}");
            assert!((0.0..=1.0).contains(&props.tree_spawn_prob));
            assert!((0.0..=1.0).contains(&props.water_spawn_prob));
        }
    }

    #[test]
    fn test_super_flat_is_fallback() {
        assert_eq!(BiomeType::FALLBACK, BiomeType::SuperFlat);
        assert_eq!(BiomeCatalog::properties_by_id(7).name, "super flat");
    }

    #[test]
    fn test_tree_heights_are_ordered() {
        for tree in TreeType::ALL {
            let props = tree.properties();
            assert!(props.min_height <= props.max_height);
            assert!(props.min_width <= props.max_width);
            assert!(!props.log_block.is_air());
        }
    }
}
