//! Integration tests for the effects chain.
//!
//! Run with: cargo test -p tessera-effects --test integration

use tessera_core::{Effect, ParameterInfo};
use tessera_effects::{Chorus, Delay, EffectsChain, Reverb, SLOT_COUNT};

const SR: f64 = 48000.0;

fn test_signal(len: usize) -> Vec<(f64, f64)> {
    (0..len)
        .map(|i| {
            let t = i as f64 / SR;
            let l = (2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5;
            let r = (2.0 * std::f64::consts::PI * 660.0 * t).sin() * 0.3;
            (l, r)
        })
        .collect()
}

fn assert_identity<E: Effect>(fx: &mut E, name: &str) {
    for (i, (l, r)) in test_signal(20000).into_iter().enumerate() {
        let out = fx.process_stereo(l, r);
        assert_eq!(out, (l, r), "{name} altered frame {i}");
    }
}

// ============================================================================
// Dry passthrough
// ============================================================================

#[test]
fn test_chorus_zero_mix_is_identity() {
    let mut chorus = Chorus::new(SR);
    chorus.set_depth(1.0);
    chorus.set_rate(5.0);
    chorus.set_mix(0.0);
    assert_identity(&mut chorus, "chorus");
}

#[test]
fn test_delay_zero_mix_is_identity() {
    let mut delay = Delay::new(SR);
    delay.set_time_ms(3.0);
    delay.set_feedback(0.95);
    delay.set_mix(0.0);
    assert_identity(&mut delay, "delay");
}

#[test]
fn test_reverb_zero_mix_is_identity() {
    let mut reverb = Reverb::new(SR);
    reverb.set_decay(0.99);
    reverb.set_mix(0.0);
    assert_identity(&mut reverb, "reverb");
}

#[test]
fn test_chain_zero_mix_is_identity() {
    let mut chain = EffectsChain::new(SR);
    for slot in 0..SLOT_COUNT {
        let mix = chain
            .slot(slot)
            .and_then(|fx| fx.find_param_by_name("mix"))
            .expect("every slot has a mix");
        chain.set_param(slot, mix, 0.0);
    }
    assert_identity(&mut chain, "chain");
}

// ============================================================================
// Stability
// ============================================================================

#[test]
fn test_max_feedback_stays_bounded() {
    let mut chain = EffectsChain::new(SR);
    chain.delay_mut().set_feedback(1.0);
    chain.delay_mut().set_time_ms(1.0);
    chain.reverb_mut().set_decay(1.0);
    chain.chorus_mut().set_depth(1.0);

    let mut peak = 0.0_f64;
    for (l, r) in test_signal(SR as usize * 2) {
        let (ol, or) = chain.process_stereo(l, r);
        assert!(ol.is_finite() && or.is_finite());
        peak = peak.max(ol.abs()).max(or.abs());
    }
    // Delay gain at most 1 / (1 − 0.95), reverb combs below unity.
    assert!(peak < 20.0, "peak {peak}");
}

#[test]
fn test_reverb_tail_decays() {
    let mut reverb = Reverb::new(SR);
    reverb.set_mix(1.0);
    reverb.set_decay(0.5);
    reverb.process_stereo(1.0, 1.0);

    let mut late_peak = 0.0_f64;
    for i in 0..(SR as usize * 3) {
        let (l, _) = reverb.process_stereo(0.0, 0.0);
        if i > SR as usize * 2 {
            late_peak = late_peak.max(l.abs());
        }
    }
    assert!(late_peak < 1e-6, "late tail {late_peak}");
}

// ============================================================================
// Clearing
// ============================================================================

#[test]
fn test_clear_is_idempotent() {
    let mut chain = EffectsChain::new(SR);
    for (l, r) in test_signal(10000) {
        chain.process_stereo(l, r);
    }
    chain.clear();
    chain.clear();
    assert!(chain.reverb().is_silent());

    for _ in 0..(SR as usize) {
        assert_eq!(chain.process_stereo(0.0, 0.0), (0.0, 0.0));
    }
}

#[test]
fn test_clear_keeps_parameters() {
    let mut chain = EffectsChain::new(SR);
    chain.set_param(1, 0, 123.0);
    chain.set_param(2, 0, 0.7);
    chain.clear();
    assert_eq!(chain.get_param(1, 0), 123.0);
    assert_eq!(chain.get_param(2, 0), 0.7);
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_chain_matches_manual_series() {
    let mut chain = EffectsChain::new(SR);
    let mut chorus = Chorus::new(SR);
    let mut delay = Delay::new(SR);
    let mut reverb = Reverb::new(SR);
    delay.set_time_ms(20.0);
    chain.delay_mut().set_time_ms(20.0);

    for (l, r) in test_signal(5000) {
        let a = chorus.process_stereo(l, r);
        let b = delay.process_stereo(a.0, a.1);
        let expected = reverb.process_stereo(b.0, b.1);
        assert_eq!(chain.process_stereo(l, r), expected);
    }
}

#[test]
fn test_bypass_skips_only_that_slot() {
    let mut chain = EffectsChain::new(SR);
    let mut chorus = Chorus::new(SR);
    let mut reverb = Reverb::new(SR);
    chain.set_enabled(1, false);

    for (l, r) in test_signal(3000) {
        let a = chorus.process_stereo(l, r);
        let expected = reverb.process_stereo(a.0, a.1);
        assert_eq!(chain.process_stereo(l, r), expected);
    }
}
