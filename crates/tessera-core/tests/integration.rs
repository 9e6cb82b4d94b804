//! Integration tests for tessera-core DSP primitives.
//!
//! Signal-level checks: filter responses measured with sine sweeps, cutoff
//! sweeps at maximum resonance, delay-line timing and reset behavior.

use tessera_core::{
    AllpassFilter, CombFilter, DelayLine, FilterMode, LadderFilter, Lfo, LfoShape,
    StateVariableFilter,
};

const SR: f64 = 192_000.0;
const TAU: f64 = core::f64::consts::TAU;

fn generate_sine(freq_hz: f64, sample_rate: f64, num_samples: usize) -> Vec<f64> {
    (0..num_samples)
        .map(|n| libm::sin(TAU * freq_hz * n as f64 / sample_rate))
        .collect()
}

fn rms(signal: &[f64]) -> f64 {
    let sum_sq: f64 = signal.iter().map(|&s| s * s).sum();
    libm::sqrt(sum_sq / signal.len() as f64)
}

fn to_db(linear: f64) -> f64 {
    20.0 * libm::log10(linear.max(1e-12))
}

fn measure_svf(svf: &mut StateVariableFilter, freq_hz: f64) -> f64 {
    let n = 48_000;
    let settle = 24_000;
    let input = generate_sine(freq_hz, SR, n);
    svf.reset();
    let output: Vec<f64> = input.iter().map(|&x| svf.process(x)).collect();
    to_db(rms(&output[settle..]) / rms(&input[settle..]))
}

// ============================================================================
// 1. Filter responses
// ============================================================================

#[test]
fn svf_lowpass_response() {
    let mut svf = StateVariableFilter::new(SR);
    svf.set_cutoff(1000.0);
    svf.set_resonance(0.0);

    let pass = measure_svf(&mut svf, 100.0);
    let stop = measure_svf(&mut svf, 30_000.0);
    assert!(pass.abs() < 1.0, "passband gain {} dB", pass);
    assert!(stop < -20.0, "stopband gain {} dB", stop);
}

#[test]
fn svf_highpass_response() {
    let mut svf = StateVariableFilter::new(SR);
    svf.set_cutoff(1000.0);
    svf.set_mode(FilterMode::Highpass);

    let stop = measure_svf(&mut svf, 50.0);
    let pass = measure_svf(&mut svf, 30_000.0);
    assert!(stop < -20.0, "stopband gain {} dB", stop);
    assert!(pass.abs() < 1.5, "passband gain {} dB", pass);
}

#[test]
fn svf_resonance_boosts_near_cutoff() {
    let mut flat = StateVariableFilter::new(SR);
    flat.set_cutoff(2000.0);
    let mut peaky = flat.clone();
    peaky.set_resonance(0.9);

    // Doubled integration puts the resonant peak near twice the nominal cutoff.
    let probe = 4000.0;
    assert!(measure_svf(&mut peaky, probe) > measure_svf(&mut flat, probe) + 6.0);
}

// ============================================================================
// 2. Stability under sweeps
// ============================================================================

#[test]
fn svf_full_range_sweep_at_max_resonance_is_stable() {
    // Ten seconds at 48 kHz: cutoff sweeps 20 Hz → 0.9 × Nyquist and back.
    let sr = 48_000.0;
    let n = 480_000;
    let mut driven = StateVariableFilter::new(sr);
    driven.set_resonance(0.99);
    driven.set_drive(1.0);
    let mut clean = StateVariableFilter::new(sr);
    clean.set_resonance(0.99);

    let top = sr * 0.5 * 0.9;
    for i in 0..n {
        let t = i as f64 / n as f64;
        let tri = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
        let cutoff = 20.0 * libm::pow(top / 20.0, tri);
        driven.set_cutoff(cutoff);
        clean.set_cutoff(cutoff);

        let x = if i % 200 < 100 { 0.5 } else { -0.5 };
        let y = driven.process(x);
        assert!(y.is_finite() && y.abs() <= 4.0, "driven output {} at {}", y, i);

        let (lp, hp, bp, notch) = clean.process_all(x);
        assert!(
            lp.is_finite() && hp.is_finite() && bp.is_finite() && notch.is_finite(),
            "non-finite output at sample {}",
            i
        );
    }
}

#[test]
fn ladder_full_range_sweep_is_bounded() {
    let mut ladder = LadderFilter::new(SR);
    ladder.set_resonance(1.0);
    let top = SR * 0.5 * 0.45;
    for i in 0..192_000 {
        let t = i as f64 / 192_000.0;
        ladder.set_cutoff(20.0 * libm::pow(top / 20.0, t));
        let y = ladder.process(if i % 300 < 150 { 1.0 } else { -1.0 });
        assert!(y.is_finite() && y.abs() <= 1.0);
    }
}

// ============================================================================
// 3. Delay structures
// ============================================================================

#[test]
fn delay_line_integer_delay_is_sample_accurate() {
    let delay = 77;
    let mut line = DelayLine::new(200);
    let mut first_nonzero = None;
    for i in 0..300 {
        let out = line.read(delay);
        if first_nonzero.is_none() && out != 0.0 {
            first_nonzero = Some(i);
        }
        line.push(if i == 0 { 1.0 } else { 0.0 });
    }
    assert_eq!(first_nonzero, Some(delay));
}

#[test]
fn comb_and_allpass_clear_twice_equals_once() {
    let mut comb = CombFilter::new(2999);
    comb.set_feedback(0.7);
    let mut ap = AllpassFilter::new(521, 0.7);
    for i in 0..10_000 {
        let x = if i % 50 == 0 { 1.0 } else { 0.0 };
        ap.process(comb.process(x));
    }

    comb.clear();
    ap.clear();
    let once: Vec<f64> = (0..100).map(|_| ap.process(comb.process(0.0))).collect();

    comb.clear();
    comb.clear();
    ap.clear();
    ap.clear();
    let twice: Vec<f64> = (0..100).map(|_| ap.process(comb.process(0.0))).collect();

    assert_eq!(once, twice);
    assert!(once.iter().all(|&s| s == 0.0));
}

// ============================================================================
// 4. LFO shapes
// ============================================================================

#[test]
fn lfo_square_duty_cycle_is_half() {
    let mut lfo = Lfo::new(SR);
    lfo.set_shape(LfoShape::Square);
    lfo.set_rate(10.0);
    let n = 192_000;
    let high = (0..n).filter(|_| lfo.process() > 0.0).count();
    let duty = high as f64 / n as f64;
    assert!((duty - 0.5).abs() < 0.001, "duty = {}", duty);
}

#[test]
fn lfo_triangle_peaks_at_half_cycle() {
    let mut lfo = Lfo::new(1000.0);
    lfo.set_rate(1.0);
    let values: Vec<f64> = (0..1000).map(|_| lfo.process()).collect();
    let (idx, max) = values
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
    assert!((max - 1.0).abs() < 0.01);
    assert!((idx as i64 - 499).abs() <= 1, "peak at {}", idx);
}
