//! Criterion benchmarks for tessera-core DSP primitives
//!
//! Run with: cargo bench -p tessera-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_core::{
    AllpassFilter, CombFilter, DelayLine, LadderFilter, Lfo, LfoShape, StateVariableFilter,
};

const SAMPLE_RATE: f64 = 192_000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            (std::f64::consts::TAU * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_svf(c: &mut Criterion) {
    let mut group = c.benchmark_group("SVF");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut svf = StateVariableFilter::new(SAMPLE_RATE);
                svf.set_cutoff(2000.0);
                svf.set_resonance(0.7);
                svf.set_drive(0.6);
                b.iter(|| {
                    for &sample in &input {
                        black_box(svf.process(black_box(sample)));
                    }
                });
            },
        );
    }

    // Per-sample cutoff modulation recomputes sin() every call
    group.bench_function("modulated_cutoff_512", |b| {
        let input = generate_test_signal(512);
        let mut svf = StateVariableFilter::new(SAMPLE_RATE);
        b.iter(|| {
            for (i, &sample) in input.iter().enumerate() {
                svf.set_cutoff(500.0 + i as f64 * 10.0);
                black_box(svf.process(black_box(sample)));
            }
        });
    });

    group.finish();
}

fn bench_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ladder");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut ladder = LadderFilter::new(SAMPLE_RATE);
                ladder.set_cutoff(1200.0);
                ladder.set_resonance(0.8);
                b.iter(|| {
                    for &sample in &input {
                        black_box(ladder.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_lfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("LFO");

    for shape in LfoShape::ALL {
        group.bench_function(shape.name(), |b| {
            let mut lfo = Lfo::with_seed(SAMPLE_RATE, 1);
            lfo.set_rate(5.0);
            lfo.set_shape(shape);
            b.iter(|| {
                for _ in 0..512 {
                    black_box(lfo.process());
                }
            });
        });
    }

    group.finish();
}

fn bench_delay_structures(c: &mut Criterion) {
    let mut group = c.benchmark_group("Delay");
    let input = generate_test_signal(512);

    group.bench_function("fractional_read_512", |b| {
        let mut line = DelayLine::new(9600);
        b.iter(|| {
            for (i, &sample) in input.iter().enumerate() {
                line.write(sample);
                black_box(line.read_fractional(1344.0 + (i % 7) as f64 * 0.37));
                line.advance();
            }
        });
    });

    group.bench_function("comb_512", |b| {
        let mut comb = CombFilter::new(11_996);
        comb.set_feedback(0.4);
        b.iter(|| {
            for &sample in &input {
                black_box(comb.process(black_box(sample)));
            }
        });
    });

    group.bench_function("allpass_512", |b| {
        let mut ap = AllpassFilter::new(2084, 0.7);
        b.iter(|| {
            for &sample in &input {
                black_box(ap.process(black_box(sample)));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_svf,
    bench_ladder,
    bench_lfo,
    bench_delay_structures
);
criterion_main!(benches);
