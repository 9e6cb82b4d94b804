//! Criterion benchmarks for tessera-synth components
//!
//! Run with: cargo bench -p tessera-synth
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tessera_synth::{
    Adsr, BlendOscillator, DigitalEngine, DigitalMode, Oscillator, PRESETS, SynthEngine, Voice,
    WaveMix, Waveform,
};

const SAMPLE_RATE: f64 = 192_000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

// ============================================================================
// Oscillator benchmarks
// ============================================================================

fn bench_oscillator_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oscillator");

    for waveform in Waveform::ALL {
        let mut osc = Oscillator::new(SAMPLE_RATE);
        osc.set_frequency(440.0);
        osc.set_waveform(waveform);

        group.bench_with_input(
            BenchmarkId::new(waveform.name(), 512),
            &512usize,
            |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0;
                    for _ in 0..size {
                        sum += osc.process();
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

fn bench_blend(c: &mut Criterion) {
    let mut group = c.benchmark_group("BlendOscillator");

    let mixes = [
        ("saw", WaveMix::solo(Waveform::Saw)),
        ("saw_square", WaveMix::new(0.0, 0.0, 0.6, 0.4, 0.0)),
        ("all_five", WaveMix::new(0.2, 0.2, 0.2, 0.2, 0.2)),
    ];

    for (name, mix) in mixes {
        let mut osc = BlendOscillator::new(SAMPLE_RATE);
        osc.set_frequency(220.0);
        osc.set_mix(mix);

        group.bench_function(name, |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for _ in 0..512 {
                    sum += osc.process();
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_digital(c: &mut Criterion) {
    let mut group = c.benchmark_group("DigitalEngine");

    for mode in DigitalMode::ALL {
        let mut engine = DigitalEngine::new(SAMPLE_RATE);
        engine.set_frequency(330.0);
        engine.set_mode(mode);
        engine.set_mod_index(0.4);

        group.bench_function(mode.name(), |b| {
            b.iter(|| {
                let mut sum = 0.0;
                for _ in 0..512 {
                    sum += engine.process();
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Envelope and voice benchmarks
// ============================================================================

fn bench_envelope(c: &mut Criterion) {
    c.bench_function("Adsr/cycle_512", |b| {
        let mut env = Adsr::new(SAMPLE_RATE);
        b.iter(|| {
            env.note_on();
            for _ in 0..256 {
                black_box(env.process());
            }
            env.note_off();
            for _ in 0..256 {
                black_box(env.process());
            }
        });
    });
}

fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("Voice");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, &size| {
                let mut voice = Voice::new(SAMPLE_RATE);
                voice.apply_preset(&PRESETS[2]);
                voice.note_on(60, 1.0);
                b.iter(|| {
                    let mut sum = 0.0;
                    for _ in 0..size {
                        sum += voice.process(0.1);
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Engine benchmarks
// ============================================================================

fn bench_engine_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("SynthEngine");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("four_voices", block_size),
            &block_size,
            |b, &size| {
                let mut engine: SynthEngine = SynthEngine::new(SAMPLE_RATE);
                engine.load_preset(8);
                for note in [48, 55, 60, 64] {
                    engine.note_on(note, 0.8);
                }
                let mut left = vec![0.0; size];
                let mut right = vec![0.0; size];
                b.iter(|| {
                    engine.process_block_stereo(&mut left, &mut right);
                    black_box(left[size - 1])
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_oscillator_waveforms,
    bench_blend,
    bench_digital,
    bench_envelope,
    bench_voice,
    bench_engine_blocks
);
criterion_main!(benches);
