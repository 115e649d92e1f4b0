//! Benchmarks for the scratchpad PoW engine

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use scratchpow_core::{MiningEngine, hash256};

fn bench_hash256(c: &mut Criterion) {
    let input = [0x5Au8; 64];
    c.bench_function("sha3_256_64b", |b| b.iter(|| hash256(black_box(&input))));
}

fn bench_scratchpad_init(c: &mut Criterion) {
    let mut engine = MiningEngine::new();
    let prev_hash = [0u8; 32];
    let miner_addr = [1u8; 32];

    c.bench_function("scratchpad_init", |b| {
        b.iter(|| {
            engine
                .initialize_scratchpad(black_box(&prev_hash), black_box(&miner_addr))
                .unwrap()
        })
    });
}

fn bench_verify(c: &mut Criterion) {
    let engine = MiningEngine::for_template(&[0u8; 32], &[1u8; 32], 512).unwrap();
    let header = [0u8; 140];
    let target = [0xFFu8; 32];

    c.bench_function("verify_single", |b| {
        let mut nonce: u64 = 0;
        b.iter(|| {
            nonce = nonce.wrapping_add(1);
            engine.compute_and_verify(black_box(&header), nonce, &target)
        })
    });
}

criterion_group!(benches, bench_hash256, bench_scratchpad_init, bench_verify);
criterion_main!(benches);
