//! Four-pole ladder filter.
//!
//! Four cascaded one-pole lowpass stages (24 dB/oct) with global feedback
//! from the last stage. Every stage input passes through `tanh`, so the
//! stage values can never leave [-1, 1].

use core::f64::consts::PI;
use libm::{tan, tanh};

/// Moog-style 4-pole lowpass.
///
/// ## Parameters
///
/// - `cutoff`: 20 Hz to 0.45 × Nyquist (default 1000)
/// - `resonance`: 0.0 to 1.0, feedback `k = 4 × resonance` (default 0.0)
///
/// # Example
///
/// ```rust
/// use tessera_core::LadderFilter;
///
/// let mut ladder = LadderFilter::new(192000.0);
/// ladder.set_cutoff(800.0);
/// ladder.set_resonance(0.7);
/// let y = ladder.process(0.25);
/// assert!(y.abs() <= 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LadderFilter {
    cutoff: f64,
    resonance: f64,
    sample_rate: f64,
    stage: [f64; 4],
    g: f64,
    k: f64,
}

impl LadderFilter {
    /// Create a ladder at 1 kHz with no resonance.
    pub fn new(sample_rate: f64) -> Self {
        let mut ladder = Self {
            cutoff: 1000.0,
            resonance: 0.0,
            sample_rate,
            stage: [0.0; 4],
            g: 0.0,
            k: 0.0,
        };
        ladder.update_coefficients();
        ladder
    }

    /// Set cutoff in Hz, clamped to [20, 0.45 × Nyquist].
    pub fn set_cutoff(&mut self, freq: f64) {
        self.cutoff = freq.clamp(20.0, self.sample_rate * 0.5 * 0.45);
        self.update_coefficients();
    }

    /// Current cutoff in Hz.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Set resonance, clamped to [0, 1].
    pub fn set_resonance(&mut self, res: f64) {
        self.resonance = res.clamp(0.0, 1.0);
        self.k = 4.0 * self.resonance;
    }

    /// Current resonance.
    pub fn resonance(&self) -> f64 {
        self.resonance
    }

    /// Update the sample rate and recompute the stage gain.
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.set_cutoff(self.cutoff);
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let input = tanh(input - self.stage[3] * self.k);

        let mut prev = input;
        for stage in &mut self.stage {
            *stage += self.g * (tanh(prev) - *stage);
            prev = *stage;
        }

        self.stage[3]
    }

    /// Zero all stages.
    pub fn reset(&mut self) {
        self.stage = [0.0; 4];
    }

    fn update_coefficients(&mut self) {
        let wc = 2.0 * tan(PI * self.cutoff / self.sample_rate);
        self.g = wc / (1.0 + wc);
    }
}
