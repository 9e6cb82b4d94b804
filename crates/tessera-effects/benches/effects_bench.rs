//! Criterion benchmarks for tessera effects
//!
//! Run with: cargo bench -p tessera-effects
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_core::Effect;
use tessera_effects::{Chorus, Delay, EffectsChain, Reverb};

const SAMPLE_RATE: f64 = 192_000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_effect<E: Effect>(c: &mut Criterion, name: &str, mut effect: E) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    effect.process_block_stereo(black_box(&mut left), black_box(&mut right));
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_chorus(c: &mut Criterion) {
    let mut effect = Chorus::new(SAMPLE_RATE);
    effect.set_depth(0.8);
    bench_effect(c, "Chorus", effect);
}

fn bench_delay(c: &mut Criterion) {
    let mut effect = Delay::new(SAMPLE_RATE);
    effect.set_time_ms(375.0);
    effect.set_feedback(0.6);
    bench_effect(c, "Delay", effect);
}

fn bench_reverb(c: &mut Criterion) {
    let mut effect = Reverb::new(SAMPLE_RATE);
    effect.set_decay(0.8);
    bench_effect(c, "Reverb", effect);
}

fn bench_chain(c: &mut Criterion) {
    bench_effect(c, "EffectsChain", EffectsChain::new(SAMPLE_RATE));
}

criterion_group!(benches, bench_chorus, bench_delay, bench_reverb, bench_chain);
criterion_main!(benches);
