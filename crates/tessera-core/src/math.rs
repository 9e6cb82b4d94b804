//! Mathematical utility functions for DSP.
//!
//! All functions are allocation-free and `no_std` compatible.
//!
//! # Waveshaping
//!
//! | Function | Curve | Use |
//! |----------|-------|-----|
//! | [`rational_clip`] | `x(27+x²)/(27+9x²)`, hard ±1 beyond ±3 | SVF drive stage |
//! | `libm::tanh` | hyperbolic tangent | Ladder stages |

use libm::pow;

/// 2π as `f64`.
pub const TWO_PI: f64 = core::f64::consts::TAU;

/// Sample rate the engine is voiced for (Hz).
///
/// Fixed-length structures (reverb combs) are specified at this rate and
/// scaled when running elsewhere.
pub const NATIVE_SAMPLE_RATE: f64 = 192_000.0;

/// Convert a MIDI note number to frequency in Hz (A4 = 69 = 440 Hz).
///
/// # Example
/// ```rust
/// use tessera_core::midi_to_freq;
///
/// assert!((midi_to_freq(69) - 440.0).abs() < 1e-9);
/// assert!((midi_to_freq(81) - 880.0).abs() < 1e-9);
/// ```
#[inline]
pub fn midi_to_freq(note: u8) -> f64 {
    440.0 * pow(2.0, (f64::from(note) - 69.0) / 12.0)
}

/// Rational soft clipper, a Padé approximation of tanh.
///
/// Exactly ±1 for |x| > 3; for |x| ≤ 3 the curve is
/// `x × (27 + x²) / (27 + 9x²)`, which meets ±1 at the boundary.
///
/// # Example
/// ```rust
/// use tessera_core::rational_clip;
///
/// assert_eq!(rational_clip(5.0), 1.0);
/// assert_eq!(rational_clip(-5.0), -1.0);
/// assert!((rational_clip(3.0) - 1.0).abs() < 1e-12);
/// assert_eq!(rational_clip(0.0), 0.0);
/// ```
#[inline]
pub fn rational_clip(x: f64) -> f64 {
    if x > 3.0 {
        return 1.0;
    }
    if x < -3.0 {
        return -1.0;
    }
    let x2 = x * x;
    x * (27.0 + x2) / (27.0 + 9.0 * x2)
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f64, sample_rate: f64) -> f64 {
    ms * sample_rate / 1000.0
}

/// Flush values below the subnormal threshold to zero.
///
/// Use in feedback loops (combs, allpasses, delay feedback) where a signal can
/// decay indefinitely toward zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f64) -> f64 {
    if x.abs() < 1e-300 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals: `dry × (1 − mix) + wet × mix`.
///
/// With `mix == 0.0` the result is bit-identical to `dry` for any finite
/// `wet`, so a fully dry effect is a true passthrough.
#[inline]
pub fn wet_dry_mix(dry: f64, wet: f64, mix: f64) -> f64 {
    dry * (1.0 - mix) + wet * mix
}
