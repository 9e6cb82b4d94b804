//! Integration tests for tessera-synth.
//!
//! Covers phase accumulation, envelope timing at the native rate, wave-mix
//! normalization, voice allocation and stealing, and whole-engine output for
//! every factory preset.

use tessera_synth::{
    Adsr, BlendOscillator, Command, EnvelopeParams, EnvelopeState, Oscillator, PRESETS,
    StealPolicy, SynthEngine, WaveMix, Waveform,
};

const SR: f64 = 192_000.0;

fn phase_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}

// ---------------------------------------------------------------------------
// 1. Phase accumulator
// ---------------------------------------------------------------------------

#[test]
fn phase_matches_closed_form_after_n_samples() {
    for &(freq, sr) in &[(440.0, SR), (1234.567, 48000.0), (20.0, SR), (23999.0, 48000.0)] {
        let mut osc = Oscillator::new(sr);
        osc.set_frequency(freq);
        let n = 100_000;
        for _ in 0..n {
            osc.process();
        }
        let expected = (freq / sr * n as f64).fract();
        assert!(
            phase_distance(osc.phase(), expected) < 1e-8,
            "freq {} sr {}: phase {} expected {}",
            freq,
            sr,
            osc.phase(),
            expected
        );
        assert!((0.0..1.0).contains(&osc.phase()));
    }
}

// ---------------------------------------------------------------------------
// 2. Envelope timing at 192 kHz
// ---------------------------------------------------------------------------

#[test]
fn envelope_stage_timing_matches_coefficients() {
    let mut env = Adsr::new(SR);
    env.set_params(EnvelopeParams::new(0.01, 0.1, 0.7, 0.3));

    let ca = env.attack_coefficient();
    let attack_samples = (libm::log(0.3 / 1.3) / libm::log(1.0 - ca)).ceil() as usize;

    env.note_on();
    let mut n = 0;
    while env.state() == EnvelopeState::Attack {
        env.process();
        n += 1;
        assert!(n <= attack_samples + 2, "attack overran {} samples", attack_samples);
    }
    assert!(n + 2 >= attack_samples, "attack finished early at {}", n);
    assert!(env.output() >= 0.999);

    while env.state() == EnvelopeState::Decay {
        env.process();
    }
    assert_eq!(env.state(), EnvelopeState::Sustain);
    for _ in 0..192_000 {
        assert_eq!(env.process(), 0.7);
    }

    let cr = env.release_coefficient();
    let release_samples = (libm::log(0.001 / 0.7) / libm::log(1.0 - cr)).ceil() as usize;

    env.note_off();
    let mut prev = env.output();
    let mut n = 0;
    while env.state() == EnvelopeState::Release {
        let out = env.process();
        assert!(out <= prev);
        prev = out;
        n += 1;
        assert!(n <= release_samples + 2, "release overran {} samples", release_samples);
    }
    assert!(n + 2 >= release_samples);
    assert_eq!(env.state(), EnvelopeState::Idle);
    assert_eq!(env.output(), 0.0);
}

// ---------------------------------------------------------------------------
// 3. Wave-mix normalization
// ---------------------------------------------------------------------------

#[test]
fn scaled_weights_produce_identical_output() {
    let mut loud = BlendOscillator::with_seed(SR, 21);
    let mut soft = BlendOscillator::with_seed(SR, 21);
    loud.set_mix(WaveMix::new(2.0, 2.0, 0.0, 0.0, 0.0));
    soft.set_mix(WaveMix::new(0.5, 0.5, 0.0, 0.0, 0.0));
    loud.set_frequency(311.0);
    soft.set_frequency(311.0);

    for _ in 0..10_000 {
        assert_eq!(loud.process(), soft.process());
    }
}

#[test]
fn all_zero_weights_are_silent() {
    let mut osc = BlendOscillator::with_seed(SR, 1);
    osc.set_mix(WaveMix::SILENT);
    osc.set_frequency(1000.0);
    assert!((0..10_000).all(|_| osc.process() == 0.0));
}

// ---------------------------------------------------------------------------
// 4. Voice allocation and stealing
// ---------------------------------------------------------------------------

#[test]
fn four_notes_fill_four_distinct_slots() {
    let mut engine: SynthEngine<4> = SynthEngine::new(SR);
    for (i, note) in [60, 64, 67, 71].into_iter().enumerate() {
        engine.note_on(note, 1.0);
        assert_eq!(engine.voices()[i].note(), note);
    }
    assert_eq!(engine.active_voice_count(), 4);
}

#[test]
fn fifth_note_restarts_slot_zero_abruptly() {
    let mut engine: SynthEngine<4> = SynthEngine::new(SR);
    for note in [60, 64, 67, 71] {
        engine.note_on(note, 1.0);
    }
    for _ in 0..10_000 {
        engine.process();
    }
    assert!(engine.voices()[0].amp_envelope().output() > 0.5);

    engine.note_on(74, 1.0);
    let slot0 = &engine.voices()[0];
    assert_eq!(slot0.note(), 74);
    assert_eq!(slot0.amp_envelope().state(), EnvelopeState::Attack);
    assert_eq!(slot0.amp_envelope().output(), 0.0);
    assert_eq!(engine.active_voice_count(), 4);
    for (i, note) in [64, 67, 71].into_iter().enumerate() {
        assert_eq!(engine.voices()[i + 1].note(), note);
    }
}

#[test]
fn released_voice_is_reused_before_stealing() {
    let mut engine: SynthEngine<2> = SynthEngine::new(SR);
    engine.set_amp_envelope(EnvelopeParams::new(0.001, 0.01, 0.5, 0.001));
    engine.note_on(60, 1.0);
    engine.note_on(62, 1.0);
    engine.note_off(62);
    for _ in 0..20_000 {
        engine.process();
    }
    assert_eq!(engine.active_voice_count(), 1);

    engine.note_on(65, 1.0);
    assert_eq!(engine.voices()[0].note(), 60);
    assert_eq!(engine.voices()[1].note(), 65);
}

#[test]
fn fast_release_steal_has_no_step() {
    let mut engine: SynthEngine<1> = SynthEngine::new(SR);
    engine.set_steal_policy(StealPolicy::FastRelease);
    engine.set_amp_envelope(EnvelopeParams::new(0.001, 0.1, 1.0, 0.3));
    engine.set_wave_mix(WaveMix::solo(Waveform::Sine));
    engine.note_on(45, 1.0);
    let mut prev = 0.0;
    for _ in 0..5000 {
        prev = engine.process();
    }

    engine.note_on(57, 1.0);
    let mut max_step: f64 = 0.0;
    for _ in 0..200 {
        let s = engine.process();
        max_step = max_step.max((s - prev).abs());
        prev = s;
    }
    // A 110 Hz sine at 192 kHz moves far less than 0.05 per sample.
    assert!(max_step < 0.05, "step of {}", max_step);
    assert_eq!(engine.voices()[0].note(), 57);
}

// ---------------------------------------------------------------------------
// 5. Whole engine
// ---------------------------------------------------------------------------

#[test]
fn every_preset_renders_finite_bounded_audio() {
    let sr = 48000.0;
    for (index, preset) in PRESETS.iter().enumerate() {
        let mut engine: SynthEngine = SynthEngine::with_seed(sr, 7);
        engine.apply(Command::LoadPreset(index));
        for note in [36, 48, 60, 72] {
            engine.note_on(note, 1.0);
        }
        let mut peak: f64 = 0.0;
        for i in 0..48_000 {
            if i == 24_000 {
                engine.all_notes_off();
            }
            let s = engine.process();
            assert!(s.is_finite(), "{} produced {}", preset.name, s);
            peak = peak.max(s.abs());
        }
        assert!(peak < 8.0, "{} peaked at {}", preset.name, peak);
    }
}

#[test]
fn same_seed_renders_identical_noise() {
    let mut a: SynthEngine = SynthEngine::with_seed(SR, 99);
    let mut b: SynthEngine = SynthEngine::with_seed(SR, 99);
    a.load_preset(5); // Snare
    b.load_preset(5);
    a.note_on(50, 1.0);
    b.note_on(50, 1.0);
    for _ in 0..20_000 {
        assert_eq!(a.process(), b.process());
    }
}

#[test]
fn digital_level_zero_leaves_output_unchanged() {
    let mut plain: SynthEngine = SynthEngine::with_seed(SR, 3);
    let mut with_engine: SynthEngine = SynthEngine::with_seed(SR, 3);
    with_engine.apply(Command::SetDigitalShape(0.9));
    with_engine.apply(Command::SetDigitalRatio(0.5));
    plain.note_on(60, 1.0);
    with_engine.note_on(60, 1.0);
    for _ in 0..5000 {
        assert_eq!(plain.process(), with_engine.process());
    }

    with_engine.apply(Command::SetDigitalLevel(1.0));
    let differs = (0..5000).any(|_| plain.process() != with_engine.process());
    assert!(differs);
}

#[test]
fn master_volume_scales_linearly() {
    let mut full: SynthEngine = SynthEngine::with_seed(SR, 5);
    let mut half: SynthEngine = SynthEngine::with_seed(SR, 5);
    full.set_master_volume(0.8);
    half.set_master_volume(0.4);
    full.note_on(64, 1.0);
    half.note_on(64, 1.0);
    for _ in 0..2000 {
        let a = full.process();
        let b = half.process();
        assert!((a * 0.5 - b).abs() < 1e-12);
    }
}
