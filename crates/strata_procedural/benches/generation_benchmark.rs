//! Benchmark for chunk generation throughput.
//!
//! A streaming pass admits at most a handful of chunks per tick, so a single
//! chunk must generate well inside one frame.
//!
//! Run with: cargo bench --package strata_procedural --bench generation_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use strata_core::{BiomeType, ChunkDims};
use strata_procedural::{BiomeChoice, TerrainGenerator, WorldSeed};

fn benchmark_single_chunk(c: &mut Criterion) {
    let generator = TerrainGenerator::new(ChunkDims::DEFAULT);

    c.bench_function("single_chunk_terrain", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(generator.generate_chunk(WorldSeed::new(seed), BiomeChoice::Random))
        });
    });

    c.bench_function("single_chunk_decorated", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            black_box(generator.generate_decorated_chunk(WorldSeed::new(seed), BiomeType::Jungle))
        });
    });
}

fn benchmark_world_strip(c: &mut Criterion) {
    let generator = TerrainGenerator::new(ChunkDims::new(64, 128));
    let seed = WorldSeed::new(42);

    let mut group = c.benchmark_group("world_strip");
    group.throughput(Throughput::Elements(256));
    group.bench_function("256_large_chunks", |b| {
        b.iter(|| {
            for id in -128..128 {
                black_box(generator.generate_world_chunk(seed, id, BiomeChoice::Random, true));
            }
        });
    });
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let generator = TerrainGenerator::new(ChunkDims::DEFAULT);
    let chunk = generator.generate_decorated_chunk(WorldSeed::new(7), BiomeType::Forest);
    let text = chunk.serialize();

    c.bench_function("chunk_record_write", |b| b.iter(|| black_box(chunk.serialize())));
    c.bench_function("chunk_record_read", |b| {
        b.iter(|| black_box(strata_procedural::Chunk::deserialize(0, &text)))
    });
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_world_strip,
    benchmark_serialize
);
criterion_main!(benches);
