//! Decoration pass: ponds, ore veins and trees.
//!
//! Runs after terrain generation on its own random stream. Every rule only
//! writes into air or filler stone, so the surface profile and the bedrock
//! row survive untouched.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use strata_core::{BlockType, TreeType};

use crate::chunk::Chunk;
use crate::generator::TerrainProfile;
use crate::structure::Structure;

/// Blocks of water above the lowest surface cell.
const POND_DEPTH: usize = 2;

/// Leaf rows above the trunk.
const CROWN_ROWS: usize = 2;

/// Ore veins: block, chance per filler cell, and the band (as a fraction of
/// the chunk height above the bottom) the ore may appear in.
const ORE_VEINS: &[(BlockType, f64, f32)] = &[
    (BlockType::DiamondOre, 0.010, 0.20),
    (BlockType::EmeraldOre, 0.005, 0.25),
    (BlockType::GoldOre, 0.020, 0.30),
    (BlockType::RedstoneOre, 0.030, 0.35),
    (BlockType::LapisOre, 0.020, 0.35),
    (BlockType::IronOre, 0.050, 0.50),
    (BlockType::CoalOre, 0.080, 1.00),
];

/// Applies every decoration rule to a freshly generated chunk.
pub(crate) fn decorate(chunk: &mut Chunk, profile: &TerrainProfile, rng: &mut ChaCha8Rng) {
    let props = chunk.biome().properties();

    if rng.gen_bool(f64::from(props.water_spawn_prob)) {
        fill_pond(chunk, &profile.surface_rows);
    }

    scatter_ores(chunk, props.layer3_block, rng);

    let width = chunk.dims().width();
    for x in 0..width {
        if !rng.gen_bool(f64::from(props.tree_spawn_prob)) {
            continue;
        }
        let Some(&tree) = props.spawnable_trees.choose(rng) else {
            continue;
        };
        let surface = profile.surface_rows[x];
        if chunk.get_block(x, surface) != props.layer1_block {
            continue;
        }
        let structure = build_tree(tree, rng);
        plant(chunk, structure, x, surface);
    }
}

/// Floods the basin around the lowest surface column.
fn fill_pond(chunk: &mut Chunk, surface_rows: &[usize]) {
    // Largest row number = lowest ground.
    let Some((deepest, &lowest_row)) = surface_rows
        .iter()
        .enumerate()
        .max_by_key(|&(x, &row)| (row, std::cmp::Reverse(x)))
    else {
        return;
    };
    let water_line = lowest_row.saturating_sub(POND_DEPTH);

    let below_line = |x: usize| surface_rows[x] > water_line;
    let mut left = deepest;
    while left > 0 && below_line(left - 1) {
        left -= 1;
    }
    let mut right = deepest;
    while right + 1 < surface_rows.len() && below_line(right + 1) {
        right += 1;
    }

    for x in left..=right {
        for y in water_line..surface_rows[x] {
            if chunk.get_block(x, y).is_air() {
                chunk.set_block(x, y, BlockType::Water);
            }
        }
    }
}

/// Replaces filler blocks with ores by depth band. Bedrock is never touched.
fn scatter_ores(chunk: &mut Chunk, filler: BlockType, rng: &mut ChaCha8Rng) {
    let dims = chunk.dims();
    let bottom = dims.height() - 1;

    for y in 0..bottom {
        let elevation = (bottom - y) as f32 / dims.height() as f32;
        for x in 0..dims.width() {
            if chunk.get_block(x, y) != filler {
                continue;
            }
            let roll: f64 = rng.gen();
            let mut cumulative = 0.0;
            for &(ore, chance, band) in ORE_VEINS {
                if elevation > band {
                    continue;
                }
                cumulative += chance;
                if roll < cumulative {
                    chunk.set_block(x, y, ore);
                    break;
                }
            }
        }
    }
}

/// Builds a tree template: a narrow crown row, a full crown row, then the
/// trunk. The origin is the bottom-left trunk cell.
pub(crate) fn build_tree(tree: TreeType, rng: &mut ChaCha8Rng) -> Structure {
    let props = tree.properties();
    let trunk_width = usize::from(rng.gen_range(props.min_width..=props.max_width));
    let trunk_height = usize::from(rng.gen_range(props.min_height..=props.max_height));

    let width = trunk_width + 2;
    let height = trunk_height + CROWN_ROWS;
    let mut blocks = vec![BlockType::Air; width * height];

    blocks[1..=trunk_width].fill(props.leaf_block);
    blocks[width..2 * width].fill(props.leaf_block);
    for row in blocks.chunks_mut(width).skip(CROWN_ROWS) {
        row[1..=trunk_width].fill(props.log_block);
    }
    // Leaves hug the top of the trunk.
    blocks[CROWN_ROWS * width] = props.leaf_block;
    blocks[CROWN_ROWS * width + width - 1] = props.leaf_block;

    Structure::new((0, 0), blocks, width, height, (1, height - 1))
}

/// Places a tree on the surface cell `(x, surface)` if its whole footprint
/// fits inside the chunk and only covers air.
fn plant(chunk: &mut Chunk, mut structure: Structure, x: usize, surface: usize) -> bool {
    if surface == 0 {
        return false;
    }
    structure.set_spawn_point((x as i32, surface as i32 - 1));

    let width = chunk.dims().width() as i64;
    let height = chunk.dims().height() as i64;
    let fits = structure.cells().all(|(cx, cy, block)| {
        (0..width).contains(&cx)
            && (0..height).contains(&cy)
            && (block.is_air() || chunk.get_block(cx as usize, cy as usize).is_air())
    });
    if fits {
        chunk.place_structure(&structure);
    }
    fits
}
