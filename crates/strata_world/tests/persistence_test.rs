//! Save directory tests.
//!
//! Every test works in its own directory under the system temp dir and
//! removes it afterwards.

use std::fs;
use std::path::PathBuf;

use strata_core::{BiomeType, BlockType, ChunkDims, Entity, EntityType, Vec3};
use strata_procedural::{BiomeChoice, TerrainGenerator, WorldSeed};
use strata_world::{GameWorld, WorldConfig, WorldError, WorldLoader};

fn temp_save_dir() -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("strata_test_{id}"))
}

#[test]
fn test_chunk_round_trip() {
    let dir = temp_save_dir();
    let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
    let mut chunk = generator.generate_world_chunk(WorldSeed::new(9), -4, BiomeChoice::Random, true);
    chunk.add_entity(Entity::spawn(Vec3::new(-60.0, 12.0, 0.0), EntityType::Chicken));

    WorldLoader::save_chunk(&dir, &chunk).unwrap();
    assert!(dir.join("chunk-4.dat").exists());

    let loaded = WorldLoader::load_chunk(&dir, -4, ChunkDims::DEFAULT)
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id(), -4);
    assert_eq!(loaded.biome(), chunk.biome());
    assert_eq!(loaded.blocks(), chunk.blocks());
    assert_eq!(loaded.entities(), chunk.entities());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_chunk_is_none() {
    let dir = temp_save_dir();
    fs::create_dir_all(&dir).unwrap();

    let loaded = WorldLoader::load_chunk(&dir, 12, ChunkDims::DEFAULT).unwrap();
    assert!(loaded.is_none());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_malformed_chunk_is_error() {
    let dir = temp_save_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(WorldLoader::chunk_path(&dir, 5), "not a chunk").unwrap();

    assert!(matches!(
        WorldLoader::load_chunk(&dir, 5, ChunkDims::DEFAULT),
        Err(WorldError::Malformed { .. })
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_foreign_dimensions_are_rejected() {
    let dir = temp_save_dir();
    let small = TerrainGenerator::new(ChunkDims::new(8, 8)).generate_flat_chunk();
    WorldLoader::save_chunk(&dir, &small).unwrap();

    assert!(matches!(
        WorldLoader::load_chunk(&dir, 0, ChunkDims::DEFAULT),
        Err(WorldError::DimensionMismatch {
            chunk_id: 0,
            found_width: 8,
            found_height: 8,
            ..
        })
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_save_and_load_world() {
    let dir = temp_save_dir();
    let config = WorldConfig {
        biome: Some(BiomeType::Forest),
        ..WorldConfig::default()
    };

    let mut world = GameWorld::new(config.clone(), WorldSeed::new(1234)).unwrap();
    world.set_save_directory(dir.clone());
    assert!(world.set_block(-10.5, 16.5, BlockType::Glass));
    world.update(5_000.0);
    let player = world.main_player().clone();
    world.save_all().unwrap();
    assert!(WorldLoader::world_path(&dir).exists());

    let loaded = WorldLoader::load_world(&dir, config).unwrap();
    assert_eq!(loaded.seed(), WorldSeed::new(1234));
    assert_eq!(loaded.save_directory(), Some(dir.as_path()));
    assert_eq!(loaded.players().len(), 1);
    assert_eq!(loaded.main_player().position(), player.position());
    assert!((loaded.day_cycle().time() - world.day_cycle().time()).abs() < 1e-3);
    assert_eq!(loaded.get_block(-10.5, 16.5), BlockType::Glass);
    for (id, chunk) in world.loaded_chunks() {
        assert_eq!(loaded.chunk(*id).unwrap().blocks(), chunk.blocks());
    }

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_evicted_chunk_keeps_edits() {
    let dir = temp_save_dir();
    let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(77)).unwrap();
    world.set_save_directory(dir.clone());
    assert!(world.set_block(4.5, 17.5, BlockType::Brick));

    world.main_player_mut().set_position(Vec3::new(400.0, 10.0, 0.0));
    world.update(0.0);
    assert!(world.chunk(0).is_none());
    assert!(WorldLoader::chunk_path(&dir, 0).exists());

    world.main_player_mut().set_position(Vec3::new(9.5, 10.0, 0.0));
    world.update(0.0);
    assert_eq!(world.get_block(4.5, 17.5), BlockType::Brick);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_evicted_chunk_without_save_dir_regenerates() {
    let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(77)).unwrap();
    let original = world.chunk(0).unwrap().blocks().to_vec();
    assert!(world.set_block(4.5, 17.5, BlockType::Brick));

    world.main_player_mut().set_position(Vec3::new(400.0, 10.0, 0.0));
    world.update(0.0);
    world.main_player_mut().set_position(Vec3::new(9.5, 10.0, 0.0));
    world.update(0.0);

    assert_eq!(world.chunk(0).unwrap().blocks(), &original[..]);
}

#[test]
fn test_save_without_directory_fails() {
    let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(3)).unwrap();
    assert!(matches!(world.save_all(), Err(WorldError::EmptySavePath)));
    assert!(matches!(
        WorldLoader::save_world(std::path::Path::new(""), &mut world),
        Err(WorldError::EmptySavePath)
    ));
}

#[test]
fn test_failed_save_keeps_previous_directory() {
    let base = temp_save_dir();
    fs::create_dir_all(&base).unwrap();
    let blocker = base.join("blocker");
    fs::write(&blocker, "file, not a directory").unwrap();

    let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(3)).unwrap();
    let result = WorldLoader::save_world(&blocker.join("save"), &mut world);

    assert!(matches!(result, Err(WorldError::Io { .. })));
    assert!(world.save_directory().is_none());

    fs::remove_dir_all(&base).ok();
}

#[test]
fn test_load_world_without_players_fails() {
    let dir = temp_save_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(WorldLoader::world_path(&dir), "42\n1200 0\n0\n").unwrap();

    assert!(matches!(
        WorldLoader::load_world(&dir, WorldConfig::default()),
        Err(WorldError::NoPlayers(_))
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_load_missing_world_fails() {
    let dir = temp_save_dir();
    assert!(matches!(
        WorldLoader::load_world(&dir, WorldConfig::default()),
        Err(WorldError::Io { .. })
    ));
}

#[test]
fn test_corrupt_chunk_is_regenerated_on_load() {
    let dir = temp_save_dir();
    let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(8)).unwrap();
    world.set_save_directory(dir.clone());
    world.save_all().unwrap();
    let expected = world.chunk(1).unwrap().blocks().to_vec();

    fs::write(WorldLoader::chunk_path(&dir, 1), "3 18 18\n").unwrap();
    let loaded = WorldLoader::load_world(&dir, WorldConfig::default()).unwrap();
    assert_eq!(loaded.chunk(1).unwrap().blocks(), &expected[..]);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_oversized_chunk_header_is_rejected() {
    let dir = temp_save_dir();
    fs::create_dir_all(&dir).unwrap();
    fs::write(WorldLoader::chunk_path(&dir, 0), "0\n4294967296 4294967296\n").unwrap();

    assert!(matches!(
        WorldLoader::load_chunk(&dir, 0, ChunkDims::DEFAULT),
        Err(WorldError::Malformed { .. })
    ));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_oversized_chunk_header_is_regenerated_on_load() {
    let dir = temp_save_dir();
    let mut world = GameWorld::new(WorldConfig::default(), WorldSeed::new(8)).unwrap();
    world.set_save_directory(dir.clone());
    world.save_all().unwrap();
    let expected = world.chunk(0).unwrap().blocks().to_vec();

    fs::write(WorldLoader::chunk_path(&dir, 0), "0\n4294967296 4294967296\n").unwrap();
    let loaded = WorldLoader::load_world(&dir, WorldConfig::default()).unwrap();
    assert_eq!(loaded.chunk(0).unwrap().blocks(), &expected[..]);

    fs::remove_dir_all(&dir).ok();
}
